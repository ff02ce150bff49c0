use core::{
    iter::{Enumerate, FusedIterator},
    mem::ManuallyDrop,
    slice,
};
use std::vec::{self, Vec};

use slotted_core::Handle;

use crate::slot_map::Slot;

pub(crate) struct Occupied<I> {
    slots: I,
}

impl<I> Occupied<I> {
    pub(crate) fn new(slots: I) -> Self { Self { slots } }
}

trait AsSlot {
    type Item;

    fn as_slot(&self) -> &Slot<Self::Item>;
}

impl<T> AsSlot for Slot<T> {
    type Item = T;

    #[inline]
    fn as_slot(&self) -> &Slot<Self::Item> { self }
}

impl<T> AsSlot for &Slot<T> {
    type Item = T;

    #[inline]
    fn as_slot(&self) -> &Slot<Self::Item> { self }
}

impl<T> AsSlot for &mut Slot<T> {
    type Item = T;

    #[inline]
    fn as_slot(&self) -> &Slot<Self::Item> { self }
}

impl<S: AsSlot> AsSlot for (usize, S) {
    type Item = S::Item;

    #[inline]
    fn as_slot(&self) -> &Slot<Self::Item> { self.1.as_slot() }
}

impl<I: Iterator> Iterator for Occupied<I>
where
    I::Item: AsSlot,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> { self.slots.by_ref().find(|slot| slot.as_slot().generation.is_full()) }

    fn size_hint(&self) -> (usize, Option<usize>) { (0, self.slots.size_hint().1) }
}

impl<I: DoubleEndedIterator> DoubleEndedIterator for Occupied<I>
where
    I::Item: AsSlot,
{
    fn next_back(&mut self) -> Option<Self::Item> { self.slots.by_ref().rfind(|slot| slot.as_slot().generation.is_full()) }
}

fn handle_of<T>(index: usize, slot: &Slot<T>) -> Handle { Handle::new(index as u32, slot.generation.save()) }

/// Returned by [`SlotMap::values`](crate::SlotMap::values)
pub struct Values<'a, T> {
    slots: Occupied<slice::Iter<'a, Slot<T>>>,
}

impl<'a, T> Values<'a, T> {
    pub(crate) fn new(slots: Occupied<slice::Iter<'a, Slot<T>>>) -> Self { Self { slots } }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> { self.slots.next().map(|slot| unsafe { slot.value_unchecked() }) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.slots.size_hint() }
}

impl<T> DoubleEndedIterator for Values<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> { self.slots.next_back().map(|slot| unsafe { slot.value_unchecked() }) }
}

impl<T> FusedIterator for Values<'_, T> {}

impl<T> Clone for Values<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: Occupied::new(self.slots.slots.clone()),
        }
    }
}

/// Returned by [`SlotMap::values_mut`](crate::SlotMap::values_mut)
pub struct ValuesMut<'a, T> {
    slots: Occupied<slice::IterMut<'a, Slot<T>>>,
}

impl<'a, T> ValuesMut<'a, T> {
    pub(crate) fn new(slots: Occupied<slice::IterMut<'a, Slot<T>>>) -> Self { Self { slots } }
}

impl<'a, T> Iterator for ValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> { self.slots.next().map(|slot| unsafe { slot.value_unchecked_mut() }) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.slots.size_hint() }
}

impl<T> DoubleEndedIterator for ValuesMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back().map(|slot| unsafe { slot.value_unchecked_mut() })
    }
}

impl<T> FusedIterator for ValuesMut<'_, T> {}

/// Returned by [`SlotMap::entries`](crate::SlotMap::entries)
pub struct Entries<'a, T> {
    slots: Occupied<Enumerate<slice::Iter<'a, Slot<T>>>>,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(slots: Occupied<Enumerate<slice::Iter<'a, Slot<T>>>>) -> Self { Self { slots } }
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .next()
            .map(|(index, slot)| (handle_of(index, slot), unsafe { slot.value_unchecked() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.slots.size_hint() }
}

impl<T> DoubleEndedIterator for Entries<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots
            .next_back()
            .map(|(index, slot)| (handle_of(index, slot), unsafe { slot.value_unchecked() }))
    }
}

impl<T> FusedIterator for Entries<'_, T> {}

impl<T> Clone for Entries<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: Occupied::new(self.slots.slots.clone()),
        }
    }
}

/// Returned by [`SlotMap::entries_mut`](crate::SlotMap::entries_mut)
pub struct EntriesMut<'a, T> {
    slots: Occupied<Enumerate<slice::IterMut<'a, Slot<T>>>>,
}

impl<'a, T> EntriesMut<'a, T> {
    pub(crate) fn new(slots: Occupied<Enumerate<slice::IterMut<'a, Slot<T>>>>) -> Self { Self { slots } }
}

impl<'a, T> Iterator for EntriesMut<'a, T> {
    type Item = (Handle, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .next()
            .map(|(index, slot)| (handle_of(index, slot), unsafe { slot.value_unchecked_mut() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.slots.size_hint() }
}

impl<T> DoubleEndedIterator for EntriesMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots
            .next_back()
            .map(|(index, slot)| (handle_of(index, slot), unsafe { slot.value_unchecked_mut() }))
    }
}

impl<T> FusedIterator for EntriesMut<'_, T> {}

/// Returned by [`SlotMap::keys`](crate::SlotMap::keys)
pub struct Keys<'a, T> {
    entries: Entries<'a, T>,
}

impl<'a, T> Keys<'a, T> {
    pub(crate) fn new(entries: Entries<'a, T>) -> Self { Self { entries } }
}

impl<T> Iterator for Keys<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> { self.entries.next().map(|(key, _)| key) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.entries.size_hint() }
}

impl<T> DoubleEndedIterator for Keys<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> { self.entries.next_back().map(|(key, _)| key) }
}

impl<T> FusedIterator for Keys<'_, T> {}

/// Returned by [`SlotMap::into_iter`](crate::SlotMap::into_iter)
pub struct IntoIter<T> {
    slots: Occupied<vec::IntoIter<Slot<T>>>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(slots: Occupied<vec::IntoIter<Slot<T>>>) -> Self { Self { slots } }
}

fn into_value<T>(slot: Slot<T>) -> T {
    let slot = ManuallyDrop::new(slot);
    unsafe { slot.value.assume_init_read() }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> { self.slots.next().map(into_value) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.slots.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> { self.slots.next_back().map(into_value) }
}

impl<T> FusedIterator for IntoIter<T> {}

/// Returned by [`SlotMap::drain`](crate::SlotMap::drain)
pub struct Drain<'a, T> {
    slots: Occupied<Enumerate<slice::IterMut<'a, Slot<T>>>>,
    free: &'a mut Vec<u32>,
    num_elements: &'a mut usize,
}

impl<'a, T> Drain<'a, T> {
    pub(crate) fn new(
        slots: Occupied<Enumerate<slice::IterMut<'a, Slot<T>>>>,
        free: &'a mut Vec<u32>,
        num_elements: &'a mut usize,
    ) -> Self {
        Self {
            slots,
            free,
            num_elements,
        }
    }
}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) { self.for_each(drop); }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let free = &mut *self.free;
        let num_elements = &mut *self.num_elements;
        self.slots.next().map(|(index, slot)| unsafe {
            *num_elements -= 1;
            free.push(index as u32);
            slot.take_unchecked()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (*self.num_elements, Some(*self.num_elements)) }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let free = &mut *self.free;
        let num_elements = &mut *self.num_elements;
        self.slots.next_back().map(|(index, slot)| unsafe {
            *num_elements -= 1;
            free.push(index as u32);
            slot.take_unchecked()
        })
    }
}

impl<T> FusedIterator for Drain<'_, T> {}
