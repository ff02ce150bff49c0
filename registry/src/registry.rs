use core::{fmt, mem};

use log::{debug, trace, warn};
use slotted_arena::{Handle, SlotMap, Tag, DEFAULT_MAX_CAPACITY, MAX_INDEX_COUNT};
use slotted_guard::Guarded;

use crate::{Barrier, Error, ResourceAccess};

/// What a handle issued by a [`ResourceRegistry`] refers to, stored in the handle's tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
    /// A linear allocation
    Buffer = 1,
    /// A texture or attachment
    Image = 2,
    /// A presentation surface's image chain
    Swapchain = 3,
}

impl ResourceKind {
    /// Every kind, in tag order
    pub const ALL: [Self; 3] = [Self::Buffer, Self::Image, Self::Swapchain];

    /// The handle tag of this kind
    pub const fn tag(self) -> Tag { self as Tag }

    /// The kind a handle tag names, if any
    pub const fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            1 => Some(Self::Buffer),
            2 => Some(Self::Image),
            3 => Some(Self::Swapchain),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buffer => "buffer",
            Self::Image => "image",
            Self::Swapchain => "swapchain",
        })
    }
}

/// How many resources of each kind a registry can hold at once
///
/// All kinds share one `u32` index space, so the bounds are clamped in order
/// (buffers, then images, then swapchains) to fit in it together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryConfig {
    /// The most buffers held at once
    pub max_buffers: usize,
    /// The most images held at once
    pub max_images: usize,
    /// The most swapchains held at once
    pub max_swapchains: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_buffers: DEFAULT_MAX_CAPACITY,
            max_images: DEFAULT_MAX_CAPACITY,
            max_swapchains: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// A resource taken back out of a [`ResourceRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<B, I, S> {
    /// A released buffer
    Buffer(B),
    /// A released image
    Image(I),
    /// A released swapchain
    Swapchain(S),
}

impl<B, I, S> Resource<B, I, S> {
    /// The kind of the released resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Buffer(_) => ResourceKind::Buffer,
            Self::Image(_) => ResourceKind::Image,
            Self::Swapchain(_) => ResourceKind::Swapchain,
        }
    }
}

#[derive(Debug)]
struct Tracked<R> {
    resource: R,
    last_access: ResourceAccess,
}

type Arena<R> = Guarded<SlotMap<Tracked<R>>>;

/// Buffers, images and swapchains, each kind in its own lock-guarded slot map
///
/// Every operation locks the arena of one kind exactly once, and values are
/// only reachable through closures that run under that lock. The lock is not
/// reentrant: a closure passed to `with_*` that calls back into the registry
/// for the same kind deadlocks.
///
/// Handles are tagged with their [`ResourceKind`], and each kind owns a
/// disjoint range of handle indices. A handle is only accepted when its tag
/// and its index range name the same kind, so a handle retagged with
/// [`Handle::with_tag`] never reaches another kind's arena.
#[derive(Debug)]
pub struct ResourceRegistry<B, I, S> {
    buffers: Arena<B>,
    images: Arena<I>,
    swapchains: Arena<S>,
    image_base: u32,
    swapchain_base: u32,
}

impl<B, I, S> Default for ResourceRegistry<B, I, S> {
    fn default() -> Self { Self::new() }
}

impl<B, I, S> ResourceRegistry<B, I, S> {
    /// Create an empty registry with the default bounds
    pub fn new() -> Self { Self::with_config(RegistryConfig::default()) }

    /// Create an empty registry bounded by `config`
    pub fn with_config(config: RegistryConfig) -> Self {
        let max_buffers = config.max_buffers.min(MAX_INDEX_COUNT);
        let max_images = config.max_images.min(MAX_INDEX_COUNT - max_buffers);
        let max_swapchains = config.max_swapchains.min(MAX_INDEX_COUNT - max_buffers - max_images);

        // the bounds add up to at most `MAX_INDEX_COUNT`, so these can't truncate
        Self {
            buffers: Guarded::new(SlotMap::with_max_capacity(max_buffers)),
            images: Guarded::new(SlotMap::with_max_capacity(max_images)),
            swapchains: Guarded::new(SlotMap::with_max_capacity(max_swapchains)),
            image_base: max_buffers as u32,
            swapchain_base: (max_buffers + max_images) as u32,
        }
    }

    fn base(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Buffer => 0,
            ResourceKind::Image => self.image_base,
            ResourceKind::Swapchain => self.swapchain_base,
        }
    }

    fn kind_at(&self, index: u32) -> ResourceKind {
        if index < self.image_base {
            ResourceKind::Buffer
        } else if index < self.swapchain_base {
            ResourceKind::Image
        } else {
            ResourceKind::Swapchain
        }
    }

    /// Turn a handle from the arena of `kind` into one the registry hands out
    fn issue(&self, kind: ResourceKind, local: Handle) -> Handle {
        Handle::new(local.index() + self.base(kind), local.generation())
    }

    /// Find the kind of `handle` and the handle its arena knows it by
    fn resolve(&self, handle: Handle) -> Result<(ResourceKind, Handle), Error> {
        let kind = self.kind_of(handle)?;

        if self.kind_at(handle.index()) != kind {
            return Err(slotted_arena::Error::NotFound.into());
        }

        Ok((kind, Handle::new(handle.index() - self.base(kind), handle.generation())))
    }

    fn resolve_as(&self, handle: Handle, expected: ResourceKind) -> Result<Handle, Error> {
        let found = self.kind_of(handle)?;

        if found != expected {
            return Err(Error::WrongKind { expected, found });
        }

        self.resolve(handle).map(|(_, local)| local)
    }

    /// Add a buffer, returning its handle
    pub fn register_buffer(&self, buffer: B) -> Result<Handle, Error> {
        register(&self.buffers, ResourceKind::Buffer, buffer).map(|local| self.issued(ResourceKind::Buffer, local))
    }

    /// Add an image, returning its handle
    pub fn register_image(&self, image: I) -> Result<Handle, Error> {
        register(&self.images, ResourceKind::Image, image).map(|local| self.issued(ResourceKind::Image, local))
    }

    /// Add a swapchain, returning its handle
    pub fn register_swapchain(&self, swapchain: S) -> Result<Handle, Error> {
        register(&self.swapchains, ResourceKind::Swapchain, swapchain)
            .map(|local| self.issued(ResourceKind::Swapchain, local))
    }

    fn issued(&self, kind: ResourceKind, local: Handle) -> Handle {
        let handle = self.issue(kind, local);
        debug!("registered {} {:?}", kind, handle);
        handle
    }

    /// Decode the kind from the handle's tag, this does not check if the handle is live
    pub fn kind_of(&self, handle: Handle) -> Result<ResourceKind, Error> {
        ResourceKind::from_tag(handle.tag()).ok_or(Error::UnknownKind(handle.tag()))
    }

    /// Run `f` on the buffer while holding the buffer lock
    pub fn with_buffer<T>(&self, handle: Handle, f: impl FnOnce(&mut B) -> T) -> Result<T, Error> {
        let local = self.resolve_as(handle, ResourceKind::Buffer)?;
        visit(&self.buffers, local, f)
    }

    /// Run `f` on the image while holding the image lock
    pub fn with_image<T>(&self, handle: Handle, f: impl FnOnce(&mut I) -> T) -> Result<T, Error> {
        let local = self.resolve_as(handle, ResourceKind::Image)?;
        visit(&self.images, local, f)
    }

    /// Run `f` on the swapchain while holding the swapchain lock
    pub fn with_swapchain<T>(&self, handle: Handle, f: impl FnOnce(&mut S) -> T) -> Result<T, Error> {
        let local = self.resolve_as(handle, ResourceKind::Swapchain)?;
        visit(&self.swapchains, local, f)
    }

    /// The access recorded last for the resource, [`ResourceAccess::NONE`] if it was never used
    pub fn last_access(&self, handle: Handle) -> Result<ResourceAccess, Error> {
        match self.resolve(handle)? {
            (ResourceKind::Buffer, local) => last_access(&self.buffers, local),
            (ResourceKind::Image, local) => last_access(&self.images, local),
            (ResourceKind::Swapchain, local) => last_access(&self.swapchains, local),
        }
    }

    /// Record `next` as the latest access to the resource
    ///
    /// Returns the barrier that has to be placed between the previous access
    /// and `next`, if any.
    pub fn record_access(&self, handle: Handle, next: ResourceAccess) -> Result<Option<Barrier>, Error> {
        let previous = match self.resolve(handle)? {
            (ResourceKind::Buffer, local) => track(&self.buffers, local, next),
            (ResourceKind::Image, local) => track(&self.images, local, next),
            (ResourceKind::Swapchain, local) => track(&self.swapchains, local, next),
        }
        .ok_or(slotted_arena::Error::NotFound)?;

        if previous.needs_barrier_before(&next) {
            let barrier = Barrier {
                resource: handle,
                src: previous,
                dst: next,
            };
            trace!("{:?} needs {:?}", handle, barrier);
            Ok(Some(barrier))
        } else {
            trace!("{:?} accessed without a barrier", handle);
            Ok(None)
        }
    }

    /// Take the resource out of the registry, every handle to it becomes stale
    pub fn release(&self, handle: Handle) -> Result<Resource<B, I, S>, Error> {
        let resource = match self.resolve(handle)? {
            (ResourceKind::Buffer, local) => release(&self.buffers, local).map(Resource::Buffer),
            (ResourceKind::Image, local) => release(&self.images, local).map(Resource::Image),
            (ResourceKind::Swapchain, local) => release(&self.swapchains, local).map(Resource::Swapchain),
        }
        .ok_or(slotted_arena::Error::NotFound)?;

        debug!("released {} {:?}", resource.kind(), handle);
        Ok(resource)
    }

    /// The number of live resources of `kind`
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Buffer => self.buffers.lock().len(),
            ResourceKind::Image => self.images.lock().len(),
            ResourceKind::Swapchain => self.swapchains.lock().len(),
        }
    }

    /// Returns true if no resource of any kind is registered
    pub fn is_empty(&self) -> bool { ResourceKind::ALL.iter().all(|&kind| self.len(kind) == 0) }

    /// A snapshot of the live handles of `kind`, in storage order
    pub fn handles(&self, kind: ResourceKind) -> Vec<Handle> {
        let locals: Vec<Handle> = match kind {
            ResourceKind::Buffer => self.buffers.with(|arena| arena.keys().collect()),
            ResourceKind::Image => self.images.with(|arena| arena.keys().collect()),
            ResourceKind::Swapchain => self.swapchains.with(|arena| arena.keys().collect()),
        };

        locals.into_iter().map(|local| self.issue(kind, local)).collect()
    }
}

fn register<R>(arena: &Arena<R>, kind: ResourceKind, resource: R) -> Result<Handle, Error> {
    let tracked = Tracked {
        resource,
        last_access: ResourceAccess::NONE,
    };

    let inserted = arena.lock().insert_tagged(tracked, kind.tag());

    inserted.map_err(|error| {
        warn!("could not register {}: {}", kind, error);
        error.into()
    })
}

fn visit<R, T>(arena: &Arena<R>, handle: Handle, f: impl FnOnce(&mut R) -> T) -> Result<T, Error> {
    arena
        .with(|arena| arena.get_mut(handle).map(|tracked| f(&mut tracked.resource)))
        .ok_or(Error::Arena(slotted_arena::Error::NotFound))
}

fn last_access<R>(arena: &Arena<R>, handle: Handle) -> Result<ResourceAccess, Error> {
    arena
        .with(|arena| arena.get(handle).map(|tracked| tracked.last_access))
        .ok_or(Error::Arena(slotted_arena::Error::NotFound))
}

/// Swap in the latest access, returning the one it replaces
fn track<R>(arena: &Arena<R>, handle: Handle, next: ResourceAccess) -> Option<ResourceAccess> {
    arena.with(|arena| {
        arena
            .get_mut(handle)
            .map(|tracked| mem::replace(&mut tracked.last_access, next))
    })
}

fn release<R>(arena: &Arena<R>, handle: Handle) -> Option<R> {
    arena.lock().remove(handle).map(|tracked| tracked.resource)
}
