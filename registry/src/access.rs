//! The last access made to a tracked resource, and the barriers between accesses

use bitflags::bitflags;
use slotted_arena::Handle;

/// The queue family of an access that doesn't care which queue it runs on
pub const QUEUE_FAMILY_IGNORED: u32 = u32::MAX;

bitflags! {
    /// Pipeline stages an access happens in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PipelineStages: u64 {
        /// Before any command work starts
        const TOP_OF_PIPE = 1 << 0;
        /// Reading indirect draw and dispatch arguments
        const DRAW_INDIRECT = 1 << 1;
        /// Fetching vertex and index data
        const VERTEX_INPUT = 1 << 2;
        /// Vertex shading
        const VERTEX_SHADER = 1 << 3;
        /// Fragment shading
        const FRAGMENT_SHADER = 1 << 7;
        /// Depth and stencil tests before fragment shading
        const EARLY_FRAGMENT_TESTS = 1 << 8;
        /// Depth and stencil tests after fragment shading
        const LATE_FRAGMENT_TESTS = 1 << 9;
        /// Writing blended color attachment output
        const COLOR_ATTACHMENT_OUTPUT = 1 << 10;
        /// Compute shading
        const COMPUTE_SHADER = 1 << 11;
        /// Copies, blits, resolves and clears
        const TRANSFER = 1 << 12;
        /// After all command work finished
        const BOTTOM_OF_PIPE = 1 << 13;
        /// Reads and writes by the host
        const HOST = 1 << 14;
        /// Every graphics stage
        const ALL_GRAPHICS = 1 << 15;
        /// Every stage of every command
        const ALL_COMMANDS = 1 << 16;
    }
}

bitflags! {
    /// Kinds of memory access
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u64 {
        /// Indirect command arguments are read
        const INDIRECT_COMMAND_READ = 1 << 0;
        /// Index buffers are read
        const INDEX_READ = 1 << 1;
        /// Vertex buffers are read
        const VERTEX_ATTRIBUTE_READ = 1 << 2;
        /// Uniform buffers are read
        const UNIFORM_READ = 1 << 3;
        /// Storage or sampled resources are read by a shader
        const SHADER_READ = 1 << 5;
        /// Storage resources are written by a shader
        const SHADER_WRITE = 1 << 6;
        /// Color attachments are read, as in blending
        const COLOR_ATTACHMENT_READ = 1 << 7;
        /// Color attachments are written
        const COLOR_ATTACHMENT_WRITE = 1 << 8;
        /// Depth or stencil attachments are read
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 9;
        /// Depth or stencil attachments are written
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 10;
        /// The source of a transfer
        const TRANSFER_READ = 1 << 11;
        /// The destination of a transfer
        const TRANSFER_WRITE = 1 << 12;
        /// The host reads mapped memory
        const HOST_READ = 1 << 13;
        /// The host writes mapped memory
        const HOST_WRITE = 1 << 14;
        /// Any read
        const MEMORY_READ = 1 << 15;
        /// Any write
        const MEMORY_WRITE = 1 << 16;

        /// Every read access
        const READS = Self::INDIRECT_COMMAND_READ.bits()
            | Self::INDEX_READ.bits()
            | Self::VERTEX_ATTRIBUTE_READ.bits()
            | Self::UNIFORM_READ.bits()
            | Self::SHADER_READ.bits()
            | Self::COLOR_ATTACHMENT_READ.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT_READ.bits()
            | Self::TRANSFER_READ.bits()
            | Self::HOST_READ.bits()
            | Self::MEMORY_READ.bits();

        /// Every write access
        const WRITES = Self::SHADER_WRITE.bits()
            | Self::COLOR_ATTACHMENT_WRITE.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT_WRITE.bits()
            | Self::TRANSFER_WRITE.bits()
            | Self::HOST_WRITE.bits()
            | Self::MEMORY_WRITE.bits();
    }
}

/// The layout an image is kept in between accesses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageLayout {
    /// Contents are undefined, also the layout of every buffer
    #[default]
    Undefined,
    /// Usable by every access, at some cost
    General,
    /// Rendered to as a color attachment
    ColorAttachment,
    /// Rendered to as a depth or stencil attachment
    DepthStencilAttachment,
    /// Sampled or read by shaders
    ShaderReadOnly,
    /// The source of a transfer
    TransferSrc,
    /// The destination of a transfer
    TransferDst,
    /// Handed to the presentation engine
    PresentSrc,
}

/// One access to a resource: where it happens, what it does, and on which queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceAccess {
    /// The stages the access happens in
    pub stages: PipelineStages,
    /// What the access does to memory
    pub access: AccessFlags,
    /// The layout the image is in during the access
    pub layout: ImageLayout,
    /// The queue family the access runs on, or [`QUEUE_FAMILY_IGNORED`]
    pub queue_family: u32,
}

impl Default for ResourceAccess {
    fn default() -> Self { Self::NONE }
}

impl ResourceAccess {
    /// The access of a resource that was never used
    pub const NONE: Self = Self {
        stages: PipelineStages::empty(),
        access: AccessFlags::empty(),
        layout: ImageLayout::Undefined,
        queue_family: QUEUE_FAMILY_IGNORED,
    };

    /// An access in `stages` doing `access`, in no particular layout or queue
    pub const fn new(stages: PipelineStages, access: AccessFlags) -> Self {
        Self {
            stages,
            access,
            ..Self::NONE
        }
    }

    /// The same access with the image in `layout`
    pub const fn with_layout(self, layout: ImageLayout) -> Self { Self { layout, ..self } }

    /// The same access running on `queue_family`
    pub const fn on_queue(self, queue_family: u32) -> Self { Self { queue_family, ..self } }

    /// Returns true if the access writes memory
    pub fn contains_write(&self) -> bool { self.access.intersects(AccessFlags::WRITES) }

    /// Returns true if the access reads memory
    pub fn contains_read(&self) -> bool { self.access.intersects(AccessFlags::READS) }

    fn is_unused(&self) -> bool { self.stages.is_empty() && self.access.is_empty() }

    /// Check if going from `self` to `next` has to be synchronized
    ///
    /// Only read after read on the same queue in the same layout is free.
    /// A resource that was never used only needs a barrier to change layout.
    pub fn needs_barrier_before(&self, next: &Self) -> bool {
        if self.layout != next.layout {
            return true;
        }

        if self.is_unused() {
            return false;
        }

        let queue_transfer = self.queue_family != QUEUE_FAMILY_IGNORED
            && next.queue_family != QUEUE_FAMILY_IGNORED
            && self.queue_family != next.queue_family;

        queue_transfer || self.contains_write() || next.contains_write()
    }
}

/// A synchronization point between two accesses to the same resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Barrier {
    /// The resource both accesses touch
    pub resource: Handle,
    /// The access that has to finish first
    pub src: ResourceAccess,
    /// The access that waits on `src`
    pub dst: ResourceAccess,
}

impl Barrier {
    /// Returns true if the image changes layout at this barrier
    pub fn is_layout_transition(&self) -> bool { self.src.layout != self.dst.layout }

    /// Returns true if the resource moves to another queue family at this barrier
    pub fn is_queue_transfer(&self) -> bool {
        self.src.queue_family != QUEUE_FAMILY_IGNORED
            && self.dst.queue_family != QUEUE_FAMILY_IGNORED
            && self.src.queue_family != self.dst.queue_family
    }
}
