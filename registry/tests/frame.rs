use std::{sync::Arc, thread};

use slotted_registry::{
    AccessFlags, Error, ImageLayout, PipelineStages, Resource, ResourceAccess, ResourceKind, ResourceRegistry,
};

#[derive(Debug, PartialEq)]
struct Image {
    width: u32,
    height: u32,
}

type Registry = ResourceRegistry<Vec<u8>, Image, u32>;

fn init() { let _ = env_logger::builder().is_test(true).try_init(); }

fn upload() -> ResourceAccess {
    ResourceAccess::new(PipelineStages::TRANSFER, AccessFlags::TRANSFER_WRITE).with_layout(ImageLayout::TransferDst)
}

fn sample() -> ResourceAccess {
    ResourceAccess::new(PipelineStages::FRAGMENT_SHADER, AccessFlags::SHADER_READ)
        .with_layout(ImageLayout::ShaderReadOnly)
}

#[test]
fn texture_upload_then_sampling() {
    init();

    let registry = Registry::new();
    let texture = registry.register_image(Image { width: 4, height: 4 }).unwrap();

    let to_transfer = registry.record_access(texture, upload()).unwrap().unwrap();
    assert!(to_transfer.is_layout_transition());
    assert_eq!(to_transfer.resource, texture);

    let to_sampled = registry.record_access(texture, sample()).unwrap().unwrap();
    assert_eq!(to_sampled.src, upload());
    assert_eq!(to_sampled.dst, sample());

    // sampling twice in a row is a read after read
    assert_eq!(registry.record_access(texture, sample()).unwrap(), None);
    assert_eq!(registry.last_access(texture).unwrap(), sample());
}

#[test]
fn buffer_hazards() {
    init();

    let registry = Registry::new();
    let vertices = registry.register_buffer(vec![0; 64]).unwrap();

    let write = ResourceAccess::new(PipelineStages::COMPUTE_SHADER, AccessFlags::SHADER_WRITE);
    let read = ResourceAccess::new(PipelineStages::VERTEX_INPUT, AccessFlags::VERTEX_ATTRIBUTE_READ);

    assert_eq!(registry.record_access(vertices, write).unwrap(), None);
    assert!(registry.record_access(vertices, read).unwrap().is_some());
    assert!(registry.record_access(vertices, read).unwrap().is_none());
    assert!(registry.record_access(vertices, write).unwrap().is_some());
    assert!(registry.record_access(vertices, write).unwrap().is_some());
}

#[test]
fn queue_ownership_transfer() {
    init();

    let registry = Registry::new();
    let buffer = registry.register_buffer(Vec::new()).unwrap();

    let graphics = ResourceAccess::new(PipelineStages::VERTEX_SHADER, AccessFlags::SHADER_READ).on_queue(0);
    let compute = ResourceAccess::new(PipelineStages::COMPUTE_SHADER, AccessFlags::SHADER_READ).on_queue(1);

    assert!(registry.record_access(buffer, graphics).unwrap().is_none());
    let barrier = registry.record_access(buffer, compute).unwrap().unwrap();
    assert!(barrier.is_queue_transfer());
    assert!(!barrier.is_layout_transition());
}

#[test]
fn released_handle_is_not_reused_by_accident() {
    init();

    let registry = Registry::new();
    let first = registry.register_swapchain(1).unwrap();
    assert_eq!(registry.release(first).unwrap(), Resource::Swapchain(1));

    let second = registry.register_swapchain(2).unwrap();
    assert_eq!(first.index(), second.index());
    assert_ne!(first, second);

    assert_eq!(registry.with_swapchain(second, |id| *id), Ok(2));
    assert_eq!(
        registry.record_access(first, ResourceAccess::NONE),
        Err(Error::Arena(slotted_arena::Error::NotFound))
    );
    assert_eq!(registry.handles(ResourceKind::Swapchain), [second]);
}

#[test]
fn shared_between_threads() {
    init();

    let registry = Arc::new(Registry::new());

    let workers = (0..4u32)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..50u32)
                    .map(|i| {
                        let image = registry
                            .register_image(Image {
                                width: worker,
                                height: i,
                            })
                            .unwrap();
                        registry.record_access(image, sample()).unwrap();
                        image
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    let images = workers
        .into_iter()
        .flat_map(|worker| worker.join().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(registry.len(ResourceKind::Image), 200);
    assert_eq!(registry.handles(ResourceKind::Image).len(), 200);

    for &image in &images {
        assert_eq!(registry.last_access(image), Ok(sample()));
        assert!(registry.with_image(image, |image| image.width < 4 && image.height < 50).unwrap());
    }

    for image in images {
        assert!(matches!(registry.release(image), Ok(Resource::Image(_))));
    }
    assert!(registry.is_empty());
}

#[test]
fn retagged_handle_does_not_cross_kinds() {
    init();

    let registry = Registry::new();
    let buffer = registry.register_buffer(vec![1, 2, 3]).unwrap();
    let image = registry.register_image(Image { width: 8, height: 8 }).unwrap();

    let retagged = buffer.with_tag(ResourceKind::Image.tag());
    let not_found = Error::Arena(slotted_arena::Error::NotFound);

    assert_eq!(registry.release(retagged), Err(not_found));
    assert_eq!(registry.record_access(retagged, sample()), Err(not_found));
    assert_eq!(registry.last_access(retagged), Err(not_found));
    assert_eq!(registry.with_image(retagged, |image| image.width), Err(not_found));

    // both resources are untouched
    assert_eq!(registry.last_access(image), Ok(ResourceAccess::NONE));
    assert_eq!(registry.release(image), Ok(Resource::Image(Image { width: 8, height: 8 })));
    assert_eq!(registry.release(buffer), Ok(Resource::Buffer(vec![1, 2, 3])));
}
