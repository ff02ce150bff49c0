use thiserror::Error;

/// Errors reported by a [`SlotMap`](crate::SlotMap) and the collaborators built on it
///
/// Lookups and removals on the slot map itself report a missing value as
/// `None`, [`Error::NotFound`] is the same outcome for callers that want to
/// propagate it with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The handle is out of range, points at a vacant slot, or is stale.
    #[error("no live value is associated with the handle")]
    NotFound,

    /// Every slot up to the maximum capacity is occupied.
    #[error("slot map is full, all {max_capacity} slots are occupied")]
    CapacityExhausted {
        /// The bound the slot map was created with.
        max_capacity: usize,
    },
}
