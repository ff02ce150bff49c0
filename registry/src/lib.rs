#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A registry of GPU resources keyed by tagged slot map handles
//!
//! Buffers, images and swapchains are each kept in their own
//! [`SlotMap`](slotted_arena::SlotMap), behind one
//! [`Guarded`](slotted_guard::Guarded) lock per kind. The handle tag records
//! the kind, so any handle the registry issued can be routed back to the
//! right arena.
//!
//! Alongside every resource the registry keeps the last [`ResourceAccess`]
//! made to it, and [`ResourceRegistry::record_access`] reports the
//! [`Barrier`] needed before the next one.
//!
//! ```
//! use slotted_registry::{AccessFlags, PipelineStages, ResourceAccess, ResourceRegistry};
//!
//! let registry = ResourceRegistry::<&str, (), ()>::new();
//! let buffer = registry.register_buffer("uniforms").unwrap();
//!
//! let upload = ResourceAccess::new(PipelineStages::TRANSFER, AccessFlags::TRANSFER_WRITE);
//! let read = ResourceAccess::new(PipelineStages::VERTEX_SHADER, AccessFlags::UNIFORM_READ);
//!
//! assert!(registry.record_access(buffer, upload).unwrap().is_none());
//! let barrier = registry.record_access(buffer, read).unwrap().unwrap();
//! assert_eq!(barrier.src, upload);
//! assert_eq!(barrier.dst, read);
//! ```
//!
//! # Logging
//!
//! The registry logs through the [`log`] facade: registration and release at
//! `debug`, recorded accesses and barriers at `trace`, and a full arena at
//! `warn`.

mod access;
mod error;
mod registry;

pub use access::{AccessFlags, Barrier, ImageLayout, PipelineStages, ResourceAccess, QUEUE_FAMILY_IGNORED};
pub use error::Error;
pub use registry::{RegistryConfig, Resource, ResourceKind, ResourceRegistry};
pub use slotted_arena::Handle;
