#![forbid(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A value guarded by a single lock
//!
//! [`Guarded`] is the one place a slot map, or anything else that is not
//! internally synchronized, gets wrapped when it has to be shared between
//! threads. Access is scoped: [`Guarded::lock`] returns a guard that releases
//! the lock when dropped, and [`Guarded::with`] runs a closure under the lock
//! so no reference to the guarded value can escape.
//!
//! # Features
//!
//! `parking_lot` (default) - back the lock with [`parking_lot::Mutex`].
//! Without it [`std::sync::Mutex`] is used, and lock poisoning is ignored:
//! a panic while the lock is held leaves the value as the panicking code
//! left it, and the next caller gets it anyway.

use core::{
    fmt,
    ops::{Deref, DerefMut},
};

cfg_if::cfg_if! {
    if #[cfg(feature = "parking_lot")] {
        type Mutex<T> = parking_lot::Mutex<T>;
        type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

        fn acquire<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock() }

        fn try_acquire<T>(mutex: &Mutex<T>) -> Option<MutexGuard<'_, T>> { mutex.try_lock() }

        fn inner_mut<T>(mutex: &mut Mutex<T>) -> &mut T { mutex.get_mut() }

        fn into_inner<T>(mutex: Mutex<T>) -> T { mutex.into_inner() }
    } else {
        use std::sync::{PoisonError, TryLockError};

        type Mutex<T> = std::sync::Mutex<T>;
        type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;

        fn acquire<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }

        fn try_acquire<T>(mutex: &Mutex<T>) -> Option<MutexGuard<'_, T>> {
            match mutex.try_lock() {
                Ok(guard) => Some(guard),
                Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => None,
            }
        }

        fn inner_mut<T>(mutex: &mut Mutex<T>) -> &mut T { mutex.get_mut().unwrap_or_else(PoisonError::into_inner) }

        fn into_inner<T>(mutex: Mutex<T>) -> T { mutex.into_inner().unwrap_or_else(PoisonError::into_inner) }
    }
}

/// A value that can only be reached while holding its lock
pub struct Guarded<T> {
    mutex: Mutex<T>,
}

/// Exclusive access to a [`Guarded`] value, the lock is released on drop
pub struct GuardedMut<'a, T> {
    guard: MutexGuard<'a, T>,
}

impl<T> Guarded<T> {
    /// Guard `value` behind a new lock
    pub fn new(value: T) -> Self { Self { mutex: Mutex::new(value) } }

    /// Block until the lock is acquired
    ///
    /// Acquiring the lock again on the same thread while the returned guard
    /// is alive deadlocks.
    pub fn lock(&self) -> GuardedMut<'_, T> {
        GuardedMut {
            guard: acquire(&self.mutex),
        }
    }

    /// Acquire the lock if no one else holds it
    pub fn try_lock(&self) -> Option<GuardedMut<'_, T>> { try_acquire(&self.mutex).map(|guard| GuardedMut { guard }) }

    /// Run `f` while holding the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R { f(&mut *self.lock()) }

    /// Get the value without locking, exclusive access is already proven
    pub fn get_mut(&mut self) -> &mut T { inner_mut(&mut self.mutex) }

    /// Take the value out of the lock
    pub fn into_inner(self) -> T { into_inner(self.mutex) }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self { Self::new(T::default()) }
}

impl<T> From<T> for Guarded<T> {
    fn from(value: T) -> Self { Self::new(value) }
}

impl<T: fmt::Debug> fmt::Debug for Guarded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_lock() {
            Some(value) => f.debug_struct("Guarded").field("value", &*value).finish(),
            None => f.debug_struct("Guarded").field("value", &format_args!("<locked>")).finish(),
        }
    }
}

impl<T> Deref for GuardedMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T { &self.guard }
}

impl<T> DerefMut for GuardedMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T { &mut self.guard }
}

impl<T: fmt::Debug> fmt::Debug for GuardedMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(&**self, f) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scoped_access() {
        let guarded = Guarded::new(Vec::new());
        guarded.lock().push(1);
        guarded.with(|values| values.push(2));
        assert_eq!(*guarded.lock(), [1, 2]);
        assert_eq!(guarded.into_inner(), [1, 2]);
    }

    #[test]
    fn try_lock_while_held() {
        let guarded = Guarded::new(0);
        let held = guarded.lock();
        assert!(guarded.try_lock().is_none());
        assert_eq!(format!("{:?}", guarded), "Guarded { value: <locked> }");
        drop(held);

        *guarded.try_lock().unwrap() += 1;
        assert_eq!(format!("{:?}", guarded), "Guarded { value: 1 }");
    }

    #[test]
    fn get_mut_skips_the_lock() {
        let mut guarded = Guarded::from(String::from("a"));
        guarded.get_mut().push('b');
        assert_eq!(*guarded.lock(), "ab");
    }
}
