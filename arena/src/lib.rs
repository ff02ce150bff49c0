#![no_std]
#![forbid(missing_docs)]
#![deny(clippy::missing_safety_doc)]

//! A dense generational slot map
//!
//! [`SlotMap`] stores values in a single growable array of slots, and hands
//! out [`Handle`]s to them. A handle stays valid until the value it refers to
//! is removed, after which it is rejected by every lookup, even if the slot
//! it pointed at gets reused by a later insertion.
//!
//! ```
//! use slotted_arena::SlotMap;
//!
//! let mut map = SlotMap::new();
//! let a = map.insert("a").unwrap();
//! assert_eq!(map.get(a), Some(&"a"));
//!
//! assert_eq!(map.remove(a), Some("a"));
//! assert_eq!(map.get(a), None);
//!
//! // the slot is reused, but the old handle stays stale
//! let b = map.insert("b").unwrap();
//! assert_eq!(a.index(), b.index());
//! assert_eq!(map.get(a), None);
//! assert_eq!(map[b], "b");
//! ```
//!
//! The slot map is not synchronized. Wrap it in a single lock per owner if it
//! has to be shared between threads.

#[doc(hidden)]
pub extern crate alloc as std;

mod error;
mod iter;
mod slot_map;

pub use error::Error;
pub use iter::{Drain, Entries, EntriesMut, IntoIter, Keys, Values, ValuesMut};
pub use slot_map::{SlotMap, VacantEntry, DEFAULT_MAX_CAPACITY, MAX_INDEX_COUNT};
pub use slotted_core::{generation, Generation, Handle, Tag};
