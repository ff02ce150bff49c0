//! The packed generation word, see [`Generation`] for details

/// The number of low bits reserved for the caller's tag
pub const TAG_BITS: u32 = 8;
/// The mask for the caller's tag
pub const TAG_MASK: u32 = (1 << TAG_BITS) - 1;

/// The number of bits, after the tag, that store the state of a slot
pub const STATE_BITS: u32 = 2;
/// The mask for the state of a slot
pub const STATE_MASK: u32 = 0b11 << TAG_BITS;

/// The state of a slot that holds no value
pub const VACANT: u32 = 0b00 << TAG_BITS;
/// The state of a slot that holds a value
pub const OCCUPIED: u32 = 0b01 << TAG_BITS;

/// The offset of the pure generation counter
pub const GENERATION_SHIFT: u32 = TAG_BITS + STATE_BITS;
/// The mask for the pure generation counter, excluding state and tag
pub const GENERATION_MASK: u32 = u32::MAX << GENERATION_SHIFT;
/// The smallest amount the pure generation counter can advance by
pub const GENERATION_STEP: u32 = 1 << GENERATION_SHIFT;

/// The generation word stored alongside every slot
///
/// # Wraparound
///
/// The counter has 22 bits, so a single slot wraps after about four million
/// insertion/removal pairs. When that happens the counter skips over zero,
/// which is reserved for slots that were never vacated. A handle that is
/// held across exactly 2^22 - 1 reuses of its slot can alias again, that
/// is the price of a fixed width handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u32);

impl Default for Generation {
    fn default() -> Self { Self::EMPTY }
}

impl Generation {
    /// The generation of a slot that was just allocated
    pub const EMPTY: Self = Self(VACANT);

    /// Reinterpret raw bits as a generation word
    pub const fn from_bits(bits: u32) -> Self { Self(bits) }

    /// The raw bits of this generation word
    pub const fn to_bits(self) -> u32 { self.0 }

    /// The caller's tag
    pub const fn tag(self) -> crate::Tag { (self.0 & TAG_MASK) as crate::Tag }

    /// Replace the caller's tag, leaving state and counter alone
    pub const fn with_tag(self, tag: crate::Tag) -> Self { Self((self.0 & !TAG_MASK) | tag as u32) }

    /// The pure generation counter, shifted down to start at bit zero
    pub const fn counter(self) -> u32 { (self.0 & GENERATION_MASK) >> GENERATION_SHIFT }

    /// Check if the slot holds a value
    pub const fn is_full(self) -> bool { self.0 & STATE_MASK == OCCUPIED }

    /// Check if the slot holds no value
    pub const fn is_empty(self) -> bool { !self.is_full() }

    /// Mark a vacant slot as occupied
    ///
    /// The counter is left untouched, it was already advanced when the slot
    /// was last vacated.
    pub fn mark_full(self) -> Self {
        debug_assert!(self.is_empty(), "tried to fill an occupied slot");
        Self((self.0 & !STATE_MASK) | OCCUPIED)
    }

    /// Mark an occupied slot as vacant, advancing the counter
    ///
    /// The tag survives, so a slot keeps the tag it was last filled with
    /// until it is filled again.
    pub fn mark_empty(self) -> Self {
        debug_assert!(self.is_full(), "tried to vacate a vacant slot");
        let mut counter = (self.0 & GENERATION_MASK).wrapping_add(GENERATION_STEP);
        if counter == 0 {
            counter = GENERATION_STEP;
        }
        Self((self.0 & TAG_MASK) | counter | VACANT)
    }

    /// The bits a handle remembers: tag and counter, without the state
    pub const fn save(self) -> u32 { self.0 & !STATE_MASK }

    /// Check if a saved generation still refers to the value in this slot
    ///
    /// This can only be true if the slot is occupied, and the counter hasn't
    /// moved since the save was made. The tag does not take part.
    pub const fn equals_saved(self, saved: u32) -> bool {
        self.is_full() && self.0 & GENERATION_MASK == saved & GENERATION_MASK
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(TAG_MASK, 0xff);
        assert_eq!(STATE_MASK, 0x300);
        assert_eq!(GENERATION_MASK, 0xffff_fc00);
        assert_eq!(GENERATION_STEP, 0x400);
        assert_eq!(TAG_MASK & STATE_MASK, 0);
        assert_eq!(STATE_MASK & GENERATION_MASK, 0);
        assert_eq!(TAG_MASK | STATE_MASK | GENERATION_MASK, u32::MAX);
    }

    #[test]
    fn fill_then_vacate() {
        let empty = Generation::EMPTY;
        assert!(empty.is_empty());
        assert_eq!(empty.counter(), 0);

        let full = empty.mark_full();
        assert!(full.is_full());
        assert_eq!(full.counter(), 0);

        let empty = full.mark_empty();
        assert!(empty.is_empty());
        assert_eq!(empty.counter(), 1);

        let full = empty.mark_full();
        assert_eq!(full.counter(), 1);
    }

    #[test]
    fn tag_survives_vacate() {
        let full = Generation::EMPTY.with_tag(0xab).mark_full();
        assert_eq!(full.tag(), 0xab);
        let empty = full.mark_empty();
        assert_eq!(empty.tag(), 0xab);
        assert_eq!(empty.counter(), 1);
    }

    #[test]
    fn wraparound_skips_zero() {
        let last = Generation::from_bits(GENERATION_MASK | OCCUPIED | 7);
        assert_eq!(last.counter(), GENERATION_MASK >> GENERATION_SHIFT);

        let wrapped = last.mark_empty();
        assert!(wrapped.is_empty());
        assert_eq!(wrapped.counter(), 1);
        assert_eq!(wrapped.tag(), 7);
    }

    #[test]
    fn saved_generation() {
        let full = Generation::EMPTY.with_tag(3).mark_full();
        let saved = full.save();
        assert_eq!(saved & STATE_MASK, 0);
        assert!(full.equals_saved(saved));

        // the tag does not take part in the comparison
        assert!(full.equals_saved(saved ^ 0xff));

        let vacated = full.mark_empty();
        assert!(!vacated.equals_saved(saved));
        assert!(!vacated.mark_full().equals_saved(saved));
        assert!(vacated.mark_full().equals_saved(vacated.save()));
    }
}
