use core::{
    fmt,
    mem::MaybeUninit,
    ops::{Index, IndexMut},
};
use std::vec::Vec;

use slotted_core::{Generation, Handle, Tag};

use crate::{
    iter::{Drain, Entries, EntriesMut, IntoIter, Keys, Occupied, Values, ValuesMut},
    Error,
};

/// The maximum capacity of [`SlotMap::new`]
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 22;

/// The largest maximum capacity a slot map can have, indices are `u32`
pub const MAX_INDEX_COUNT: usize = u32::MAX as usize;

pub(crate) struct Slot<T> {
    pub(crate) generation: Generation,
    pub(crate) value: MaybeUninit<T>,
}

/// A dense generational slot map
///
/// Values live in one growable array of slots, each carrying a [`Generation`]
/// word. Vacated slots are kept on a free list and reused most recently freed
/// first. Insertion fails with [`Error::CapacityExhausted`] once every slot up
/// to the maximum capacity is occupied.
///
/// Growth may move values around in memory, so keep [`Handle`]s, not
/// references, across insertions.
///
/// A handle carries no identity of the slot map that issued it. A handle
/// from another slot map is rejected only when its generation differs from
/// the slot it names, otherwise it is accepted as if it were issued here.
#[derive(Debug, Clone)]
pub struct SlotMap<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    num_elements: usize,
    max_capacity: usize,
}

/// An empty slot in a slot map
///
/// Dropping the entry without filling it leaves the slot vacant and ready for
/// the next insertion.
pub struct VacantEntry<'a, T> {
    arena: &'a mut SlotMap<T>,
    index: u32,
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        if self.generation.is_full() {
            unsafe { self.value.assume_init_drop() }
        }
    }
}

impl<T> Slot<T> {
    const fn vacant() -> Self {
        Self {
            generation: Generation::EMPTY,
            value: MaybeUninit::uninit(),
        }
    }

    /// # Safety
    ///
    /// The slot must be occupied
    pub(crate) unsafe fn value_unchecked(&self) -> &T { self.value.assume_init_ref() }

    /// # Safety
    ///
    /// The slot must be occupied
    pub(crate) unsafe fn value_unchecked_mut(&mut self) -> &mut T { self.value.assume_init_mut() }

    /// Move the value out and advance the generation
    ///
    /// # Safety
    ///
    /// The slot must be occupied
    pub(crate) unsafe fn take_unchecked(&mut self) -> T {
        let value = self.value.assume_init_read();
        self.generation = self.generation.mark_empty();
        value
    }
}

impl<T> VacantEntry<'_, T> {
    /// Get the handle the value will have once this entry is filled by
    /// [`VacantEntry::insert`]
    pub fn key(&self) -> Handle { self.key_tagged(0) }

    /// Get the handle the value will have once this entry is filled by
    /// [`VacantEntry::insert_tagged`] with `tag`
    pub fn key_tagged(&self, tag: Tag) -> Handle {
        let slot = unsafe { self.arena.slots.get_unchecked(self.index as usize) };
        Handle::new(self.index, slot.generation.with_tag(tag).mark_full().save())
    }

    /// Insert a value into the vacant entry
    pub fn insert(self, value: T) -> Handle { self.insert_tagged(value, 0) }

    /// Insert a value into the vacant entry, tagging the slot with `tag`
    pub fn insert_tagged(self, value: T, tag: Tag) -> Handle {
        let Self { arena, index } = self;
        let popped = arena.free.pop();
        debug_assert_eq!(popped, Some(index));

        let slot = unsafe { arena.slots.get_unchecked_mut(index as usize) };
        slot.value.write(value);
        slot.generation = slot.generation.with_tag(tag).mark_full();
        arena.num_elements += 1;

        Handle::new(index, slot.generation.save())
    }
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self { Self::new() }
}

impl<T> SlotMap<T> {
    /// Create a new slot map bounded by [`DEFAULT_MAX_CAPACITY`]
    pub const fn new() -> Self { Self::with_max_capacity(DEFAULT_MAX_CAPACITY) }

    /// Create a new slot map that holds at most `max_capacity` values
    ///
    /// The bound is clamped to [`MAX_INDEX_COUNT`]. No memory is allocated up
    /// front, see [`SlotMap::reserve`].
    pub const fn with_max_capacity(max_capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            num_elements: 0,
            max_capacity: if max_capacity < MAX_INDEX_COUNT {
                max_capacity
            } else {
                MAX_INDEX_COUNT
            },
        }
    }

    /// Returns true if the slot map holds no values
    pub fn is_empty(&self) -> bool { self.num_elements == 0 }

    /// Returns the number of live values
    pub fn len(&self) -> usize { self.num_elements }

    /// Returns the number of slots that can be held without reallocating
    pub fn capacity(&self) -> usize { self.slots.capacity() }

    /// Returns the most values this slot map will ever hold
    pub fn max_capacity(&self) -> usize { self.max_capacity }

    /// Reserves room for at least `additional` more values, without
    /// exceeding the maximum capacity
    pub fn reserve(&mut self, additional: usize) {
        let missing = additional.saturating_sub(self.free.len());
        let room = self.max_capacity - self.slots.len();
        self.slots.reserve(missing.min(room));
    }

    /// Return a handle to a vacant entry allowing for further manipulation.
    ///
    /// This function is useful when creating values that must contain their
    /// key. The returned `VacantEntry` reserves a slot in the slot map and is
    /// able to query the associated key.
    pub fn vacant_entry(&mut self) -> Result<VacantEntry<'_, T>, Error> {
        #[cold]
        #[inline(never)]
        fn allocate_vacant_slot<T>(this: &mut SlotMap<T>) -> Result<u32, Error> {
            let index = this.slots.len();
            if index >= this.max_capacity {
                return Err(Error::CapacityExhausted {
                    max_capacity: this.max_capacity,
                });
            }

            // the bound is at most `MAX_INDEX_COUNT`, so this can't truncate
            let index = index as u32;
            this.slots.push(Slot::vacant());
            this.free.push(index);
            Ok(index)
        }

        let index = match self.free.last() {
            Some(&index) => index,
            None => allocate_vacant_slot(self)?,
        };

        Ok(VacantEntry { arena: self, index })
    }

    /// Insert a value in the slot map, returning the handle assigned to it.
    ///
    /// The most recently vacated slot is reused first, otherwise a new slot
    /// is appended.
    pub fn insert(&mut self, value: T) -> Result<Handle, Error> { Ok(self.vacant_entry()?.insert(value)) }

    /// Insert a value in the slot map, embedding `tag` in the returned handle.
    ///
    /// The slot map never looks at the tag, it is there so callers can tell
    /// handles apart without a second lookup.
    pub fn insert_tagged(&mut self, value: T, tag: Tag) -> Result<Handle, Error> {
        Ok(self.vacant_entry()?.insert_tagged(value, tag))
    }

    /// Return true if a value is associated with the given handle.
    ///
    /// Only the index and generation are checked, see [`SlotMap`] for
    /// handles issued by another slot map.
    pub fn contains(&self, handle: Handle) -> bool {
        match self.slots.get(handle.index() as usize) {
            Some(slot) => slot.generation.equals_saved(handle.generation()),
            None => false,
        }
    }

    /// Remove and return the value associated with the given handle.
    ///
    /// The slot's generation advances, so `handle` and every copy of it
    /// becomes stale. Returns `None`, and changes nothing, if the handle
    /// is not associated with a value. A handle is checked as in
    /// [`SlotMap::contains`].
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if self.contains(handle) {
            Some(unsafe { self.remove_unchecked(handle.index()) })
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// The slot at `index` must be occupied
    unsafe fn remove_unchecked(&mut self, index: u32) -> T {
        self.num_elements -= 1;
        let value = self.slots.get_unchecked_mut(index as usize).take_unchecked();
        self.free.push(index);
        value
    }

    /// Removes and drops the value associated with the given handle.
    ///
    /// Returns true if the value was removed, and false otherwise
    pub fn delete(&mut self, handle: Handle) -> bool { self.remove(handle).is_some() }

    /// Return a shared reference to the value associated with the given handle.
    ///
    /// If the given handle is not associated with a value, then None is returned.
    /// A handle is checked as in [`SlotMap::contains`].
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if self.contains(handle) {
            unsafe { Some(self.get_unchecked(handle.index() as usize)) }
        } else {
            None
        }
    }

    /// Return a unique reference to the value associated with the given handle.
    ///
    /// If the given handle is not associated with a value, then None is returned.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if self.contains(handle) {
            unsafe { Some(self.get_unchecked_mut(handle.index() as usize)) }
        } else {
            None
        }
    }

    /// Return a shared reference to the value at `index` without
    /// performing bounds checking, or checking that the slot is occupied
    ///
    /// # Safety
    ///
    /// The slot at `index` must exist and be occupied. A handle `h` for which
    /// `contains(h)` returns true satisfies this for `h.index()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T { self.slots.get_unchecked(index).value_unchecked() }

    /// Return a unique reference to the value at `index` without
    /// performing bounds checking, or checking that the slot is occupied
    ///
    /// # Safety
    ///
    /// The slot at `index` must exist and be occupied. A handle `h` for which
    /// `contains(h)` returns true satisfies this for `h.index()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        self.slots.get_unchecked_mut(index).value_unchecked_mut()
    }

    /// Retain only the values specified by the predicate.
    ///
    /// If the predicate returns true for a given value, then the value is
    /// kept in the slot map.
    pub fn retain<F: FnMut(&mut T) -> bool>(&mut self, mut f: F) {
        for index in 0..self.slots.len() {
            let slot = unsafe { self.slots.get_unchecked_mut(index) };
            if slot.generation.is_full() && !f(unsafe { slot.value_unchecked_mut() }) {
                drop(unsafe { self.remove_unchecked(index as u32) });
            }
        }
    }

    /// Removes every value, keeping the allocated slots
    ///
    /// Generations advance as with [`SlotMap::remove`], so handles created
    /// before the call stay stale after it.
    pub fn clear(&mut self) { self.retain(|_| false) }

    /// An iterator over the handles of the slot map, in storage order
    pub fn keys(&self) -> Keys<'_, T> { Keys::new(self.entries()) }

    /// An iterator of shared references to the live values, in storage order
    ///
    /// Storage order is the order of the slots' indices, not insertion order.
    /// The iterator borrows the slot map, so it can't outlive an insertion or
    /// removal. Call `values` again to restart.
    pub fn values(&self) -> Values<'_, T> { Values::new(Occupied::new(self.slots.iter())) }

    /// An iterator of unique references to the live values, in storage order
    pub fn values_mut(&mut self) -> ValuesMut<'_, T> { ValuesMut::new(Occupied::new(self.slots.iter_mut())) }

    /// An iterator of handles and shared references to the live values,
    /// in storage order
    pub fn entries(&self) -> Entries<'_, T> { Entries::new(Occupied::new(self.slots.iter().enumerate())) }

    /// An iterator of handles and unique references to the live values,
    /// in storage order
    pub fn entries_mut(&mut self) -> EntriesMut<'_, T> {
        EntriesMut::new(Occupied::new(self.slots.iter_mut().enumerate()))
    }

    /// Return a draining iterator that removes all values from the
    /// slot map and yields the removed values.
    ///
    /// Note: Values are removed even if the iterator is only partially
    /// consumed or not consumed at all.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(
            Occupied::new(self.slots.iter_mut().enumerate()),
            &mut self.free,
            &mut self.num_elements,
        )
    }
}

impl<T> IntoIterator for SlotMap<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter { IntoIter::new(Occupied::new(self.slots.into_iter())) }
}

impl<T> Index<Handle> for SlotMap<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Tried to access `SlotMap` with a stale `Handle`")
    }
}

impl<T> IndexMut<Handle> for SlotMap<T> {
    #[track_caller]
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Tried to access `SlotMap` with a stale `Handle`")
    }
}

impl<T: Clone> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            value: if self.generation.is_full() {
                MaybeUninit::new(unsafe { self.value_unchecked() }.clone())
            } else {
                MaybeUninit::uninit()
            },
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation.is_full() {
            f.debug_struct("Occupied")
                .field("generation", &self.generation)
                .field("value", unsafe { self.value_unchecked() })
                .finish()
        } else {
            f.debug_struct("Vacant").field("generation", &self.generation).finish()
        }
    }
}
