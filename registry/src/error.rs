use slotted_arena::Tag;
use thiserror::Error;

use crate::ResourceKind;

/// Errors reported by a [`ResourceRegistry`](crate::ResourceRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The arena of the handle's kind rejected it, or is full
    #[error(transparent)]
    Arena(#[from] slotted_arena::Error),

    /// The handle was not issued by a [`ResourceRegistry`](crate::ResourceRegistry)
    #[error("handle tag {0:#04x} does not name a resource kind")]
    UnknownKind(Tag),

    /// The handle names a different kind of resource than the operation takes
    #[error("expected {expected} handle, found {found} handle")]
    WrongKind {
        /// The kind the operation takes
        expected: ResourceKind,
        /// The kind the handle's tag names
        found: ResourceKind,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Error::UnknownKind(7).to_string(), "handle tag 0x07 does not name a resource kind");
        assert_eq!(
            Error::WrongKind {
                expected: ResourceKind::Image,
                found: ResourceKind::Buffer,
            }
            .to_string(),
            "expected image handle, found buffer handle"
        );
        assert_eq!(
            Error::from(slotted_arena::Error::NotFound).to_string(),
            slotted_arena::Error::NotFound.to_string()
        );
    }
}
