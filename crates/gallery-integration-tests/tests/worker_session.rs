//! The bundled fixture exhibition driven the way an interactive host drives
//! it: scenes load on the background worker while the visitor moves around,
//! images complete as they are requested.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gallery_core::id::FrameId;
use gallery_core::image::{ImageLoader, ImageState};
use gallery_core::interaction::PointerEvent;
use gallery_core::view::{RoomView, SceneView};
use gallery_core::viewer::{LoadRequest, Viewer};
use gallery_data::config::SourceResolver;
use gallery_data::glb::FsSceneLoader;
use gallery_data::image_url::FsImageLoader;
use gallery_data::worker::SceneWorker;
use gallery_data::{Gallery, load_gallery};

const WAIT: Duration = Duration::from_secs(5);

fn fixtures() -> Gallery {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../gallery-data/fixtures");
    load_gallery(dir).unwrap()
}

fn session(gallery: &Gallery) -> Viewer<SourceResolver> {
    Viewer::new(
        Arc::new(gallery.exhibition.clone()),
        gallery.config.clone(),
        gallery.resolver(),
    )
}

/// Hand scene requests to the worker and finish image requests on the spot.
/// Returns the number of scenes submitted.
fn dispatch(viewer: &mut Viewer<SourceResolver>, worker: &SceneWorker) -> usize {
    let mut submitted = 0;
    for request in viewer.take_requests() {
        match request {
            LoadRequest::Scene { room, address } => {
                assert!(worker.submit(room, address));
                submitted += 1;
            }
            LoadRequest::Image { key, url } => {
                viewer.complete_image(key, FsImageLoader.load(&url));
            }
        }
    }
    submitted
}

#[test]
fn navigating_while_scenes_load_converges_to_synchronous_view() {
    let gallery = fixtures();
    let worker = SceneWorker::spawn(FsSceneLoader::new(&gallery.dir)).unwrap();
    let mut live = session(&gallery);

    let mut in_flight = dispatch(&mut live, &worker);
    live.next();
    live.next();
    in_flight += dispatch(&mut live, &worker);
    // Startup preloaded every room; moving around requests nothing new.
    assert_eq!(in_flight, 3);
    assert_eq!(live.view().scene, SceneView::Loading);

    let mut visible = 0;
    for _ in 0..in_flight {
        let loaded = worker.recv_timeout(WAIT).unwrap();
        if live.complete_scene(loaded.room, loaded.result) {
            visible += 1;
        }
    }
    // Only the room on screen changes the view; the rest fill the cache.
    assert_eq!(visible, 1);
    assert_eq!(dispatch(&mut live, &worker), 0);

    let mut reference = session(&gallery);
    reference.goto(2);
    reference.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);

    let live_json = serde_json::to_value(live.view()).unwrap();
    let reference_json = serde_json::to_value(reference.view()).unwrap();
    assert_eq!(live_json, reference_json);

    // Rooms passed through while loading are ready on return.
    live.prev();
    assert!(live.view().scene.handle().is_some());
}

#[test]
fn room_view_serializes_for_external_renderers() {
    let gallery = fixtures();
    let mut viewer = session(&gallery);
    viewer.next();
    viewer.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);

    let json = serde_json::to_value(viewer.view()).unwrap();
    assert_eq!(json["label"], "Room 2 / 3");
    assert_eq!(json["room_name"], "Sculpture Court");
    assert_eq!(json["scene"]["Ready"]["address"], "models/room2.gltf");
    assert_eq!(json["slots"].as_array().unwrap().len(), 7);
    assert!(json["modal"].is_null());

    let back: RoomView = serde_json::from_value(json).unwrap();
    assert_eq!(back, viewer.view());
}

#[test]
fn detail_overlay_over_explicit_room() {
    let gallery = fixtures();
    let scenes = FsSceneLoader::new(&gallery.dir);
    let mut viewer = session(&gallery);
    viewer.next();
    viewer.pump(&scenes, &FsImageLoader);

    let court_1 = FrameId::new("court-1");
    viewer.pointer(PointerEvent::Enter(court_1.clone()));
    let label = viewer.view().hover_label.unwrap();
    assert_eq!(label.text, "Winter Ferry");

    // A frame whose artwork was removed shows nothing and opens nothing.
    assert!(viewer.click(&FrameId::new("court-7")).is_none());
    assert!(viewer.view().modal.is_none());

    viewer.click(&court_1).unwrap();
    viewer.pump(&scenes, &FsImageLoader);
    let modal = viewer.view().modal.unwrap();
    assert_eq!(modal.detail.artist, "Mara Ito");
    match &modal.image {
        ImageState::Ready { url } => {
            assert!(url.ends_with("1200x1200/2aeef8e8e6dc3ee7e1f6b47d.png"));
        }
        other => panic!("detail image not ready: {other:?}"),
    }

    // Moving on drops the hover but leaves the overlay up.
    viewer.next();
    let view = viewer.view();
    assert!(view.hover_label.is_none());
    assert!(view.modal.is_some());

    viewer.escape();
    assert!(viewer.view().modal.is_none());
}
