#![no_std]
#![forbid(missing_docs)]

//! Packed generational handles
//!
//! A slot map stores one [`Generation`] word per slot, and hands out
//! [`Handle`]s that remember which index they point at and which generation
//! of that slot they were created for. Once a slot is vacated its generation
//! advances, so every handle created before that point goes stale.
//!
//! The generation word is laid out as follows (least significant bit first)
//!
//! ```text
//! | tag: 8 bits | state: 2 bits | counter: 22 bits |
//! ```
//!
//! The tag is owned by the caller, the arena never looks at it. The state
//! says whether the slot is vacant or occupied, and the counter is advanced
//! every time the slot is vacated.

pub mod generation;
mod handle;

pub use generation::Generation;
pub use handle::Handle;

/// A caller-defined value carried in the low bits of every handle
pub type Tag = u8;
