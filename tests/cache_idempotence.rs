//! Animation caching across calls and across processes.
//!
//! Run with: cargo test --test cache_idempotence

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use orrery::prelude::*;

/// Wraps the GIF encoder and counts invocations.
struct CountingGif {
    calls: Arc<AtomicUsize>,
    inner: GifRenderer,
}

impl AnimationRenderer for CountingGif {
    fn render(&self, scene: &AnimationScene) -> OrreryResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.render(scene)
    }
}

fn orrery(cache: RenderCache, calls: &Arc<AtomicUsize>) -> Orrery {
    let config = OrreryConfig::builder().animation_size(120).build();
    Orrery::with_parts(
        BodyRegistry::solar_system(),
        cache,
        CountingGif {
            calls: Arc::clone(calls),
            inner: GifRenderer::new(),
        },
        config,
    )
    .ok()
    .unwrap()
}

fn request(bodies: &[&str]) -> AnimationRequest {
    AnimationRequest {
        bodies: bodies.iter().map(|s| (*s).to_string()).collect(),
        three_d: false,
    }
}

#[test]
fn second_call_is_served_from_cache() {
    let dir = tempfile::tempdir().ok().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let orrery = orrery(RenderCache::on_disk(dir.path()), &calls);

    let first = orrery.animation_bytes(&request(&["Earth", "Mars"])).ok().unwrap();
    let second = orrery.animation_bytes(&request(&["Earth", "Mars"])).ok().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert!(first.starts_with(b"GIF89a"));
}

#[test]
fn name_spelling_does_not_split_the_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orrery = orrery(RenderCache::in_memory(), &calls);

    let a = orrery.animate(&request(&["earth", "MARS"])).ok().unwrap();
    let b = orrery.animate(&request(&[" Earth ", "Mars"])).ok().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(a, b);
}

#[test]
fn dimension_and_selection_are_separate_entries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orrery = orrery(RenderCache::in_memory(), &calls);

    let flat = request(&["Venus"]);
    let mut tilted = request(&["Venus"]);
    tilted.three_d = true;

    orrery.animation_bytes(&flat).ok().unwrap();
    orrery.animation_bytes(&tilted).ok().unwrap();
    orrery.animation_bytes(&request(&["Venus", "Earth"])).ok().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn disk_cache_survives_a_restart() {
    let dir = tempfile::tempdir().ok().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = orrery(RenderCache::on_disk(dir.path()), &calls)
        .animation_bytes(&request(&["Mercury"]))
        .ok()
        .unwrap();
    let second = orrery(RenderCache::on_disk(dir.path()), &calls)
        .animation_bytes(&request(&["Mercury"]))
        .ok()
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[test]
fn failed_request_leaves_cache_untouched() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orrery = orrery(RenderCache::in_memory(), &calls);

    assert!(matches!(
        orrery.animation_bytes(&request(&["Vulcan"])),
        Err(OrreryError::UnknownBody(_))
    ));
    assert!(matches!(
        orrery.animation_bytes(&request(&[])),
        Err(OrreryError::EmptySelection(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
