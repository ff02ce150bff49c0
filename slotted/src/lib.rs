#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use slotted_arena as arena;
pub use slotted_core as core;
#[cfg(feature = "slotted-guard")]
#[cfg_attr(docsrs, doc(cfg(feature = "guard")))]
pub use slotted_guard as guard;
#[cfg(feature = "slotted-registry")]
#[cfg_attr(docsrs, doc(cfg(feature = "registry")))]
pub use slotted_registry as registry;

pub use slotted_arena::{Error, Handle, SlotMap};
