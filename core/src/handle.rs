use core::fmt;

use crate::{generation::STATE_MASK, Generation, Tag};

/// A key into a slot map
///
/// A handle is an inert value: it owns nothing, and it is only meaningful to
/// the arena that created it. Comparing, hashing and ordering look at all of
/// the handle's bits, including the tag.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Create a new handle from an index and a saved generation
    ///
    /// Any state bits in `generation` are cleared, handles never carry them.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation: generation & !STATE_MASK,
        }
    }

    /// The index of the slot this handle refers to
    pub const fn index(&self) -> u32 { self.index }

    /// The saved generation: tag and counter, without the state
    pub const fn generation(&self) -> u32 { self.generation }

    /// The pure generation counter
    pub const fn counter(&self) -> u32 { Generation::from_bits(self.generation).counter() }

    /// The caller's tag
    pub const fn tag(&self) -> Tag { Generation::from_bits(self.generation).tag() }

    /// The same handle with a different tag
    ///
    /// The tag does not take part in validity checks, so the new handle
    /// refers to the same value as `self`.
    pub const fn with_tag(self, tag: Tag) -> Self {
        Self {
            index: self.index,
            generation: Generation::from_bits(self.generation).with_tag(tag).to_bits(),
        }
    }

    /// Pack this handle into a single integer, index in the high half
    pub const fn to_bits(self) -> u64 { (self.index as u64) << 32 | self.generation as u64 }

    /// Unpack a handle created by [`Handle::to_bits`]
    pub const fn from_bits(bits: u64) -> Self { Self::new((bits >> 32) as u32, bits as u32) }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("counter", &self.counter())
            .field("tag", &self.tag())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn state_bits_are_stripped() {
        let full = Generation::EMPTY.with_tag(9).mark_full();
        let handle = Handle::new(4, full.to_bits());
        assert_eq!(handle.generation(), full.save());
        assert_eq!(handle.tag(), 9);
        assert_eq!(handle.counter(), 0);
    }

    #[test]
    fn retag() {
        let handle = Handle::new(2, Generation::EMPTY.mark_full().mark_empty().save());
        let tagged = handle.with_tag(0x7f);
        assert_eq!(tagged.index(), 2);
        assert_eq!(tagged.counter(), handle.counter());
        assert_eq!(tagged.tag(), 0x7f);
        assert_ne!(tagged, handle);
    }

    #[test]
    fn packed() {
        let handle = Handle::new(0xdead, Generation::EMPTY.with_tag(1).mark_full().mark_empty().save());
        let bits = handle.to_bits();
        assert_eq!(bits >> 32, 0xdead);
        assert_eq!(Handle::from_bits(bits), handle);
    }
}
