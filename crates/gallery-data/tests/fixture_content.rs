//! Loads the bundled fixture content and tours it with real loaders.

use std::path::PathBuf;
use std::sync::Arc;

use gallery_core::id::{ArtworkId, FrameId, RoomIndex};
use gallery_core::placement::PlacementStrategy;
use gallery_core::view::SceneView;
use gallery_core::viewer::{LoadRequest, Viewer};
use gallery_data::config::ImageSource;
use gallery_data::glb::FsSceneLoader;
use gallery_data::image_url::FsImageLoader;
use gallery_data::worker::SceneWorker;
use gallery_data::{Gallery, load_gallery};

fn fixtures() -> Gallery {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    load_gallery(dir).unwrap()
}

#[test]
fn fixture_exhibition_shape() {
    let gallery = fixtures();
    let exhibition = &gallery.exhibition;
    assert_eq!(exhibition.title, "Coastlines");
    assert_eq!(exhibition.artworks.len(), 21);
    assert_eq!(exhibition.rooms.len(), 3);
    assert!(exhibition.rooms[0].frames.is_empty());
    assert_eq!(exhibition.rooms[1].frames.len(), 7);
    assert_eq!(gallery.config.scene_template, "models/room{n}.gltf");
    assert_eq!(
        gallery.images,
        ImageSource::Local {
            root: PathBuf::from("images")
        }
    );
}

#[test]
fn tour_with_filesystem_loaders() {
    let gallery = fixtures();
    let mut viewer = Viewer::new(
        Arc::new(gallery.exhibition.clone()),
        gallery.config.clone(),
        gallery.resolver(),
    );
    let scenes = FsSceneLoader::new(&gallery.dir);
    viewer.pump(&scenes, &FsImageLoader);

    // Room 1: grid of the first page, scene floored at y = 0.
    let view = viewer.view();
    assert_eq!(viewer.placement().strategy, PlacementStrategy::Grid);
    assert_eq!(view.slots.len(), 7);
    assert!(view.slots.iter().all(|s| s.texture.is_ready()));
    let handle = view.scene.handle().unwrap();
    assert!(handle.normalized_bounds().min.y.abs() < 1e-5);

    // Room 2: explicit frames, one bound to an artwork that no longer exists.
    viewer.next();
    viewer.pump(&scenes, &FsImageLoader);
    let view = viewer.view();
    assert_eq!(viewer.placement().strategy, PlacementStrategy::Explicit);
    assert_eq!(view.slots.len(), 7);
    let retired = view.slot(&FrameId::new("court-7")).unwrap();
    assert!(retired.artwork.is_none());
    assert_eq!(
        view.slot(&FrameId::new("court-1")).unwrap().artwork,
        Some(ArtworkId::new("artwork-08"))
    );

    // Room 3: no scene file ships with the fixtures.
    viewer.next();
    viewer.pump(&scenes, &FsImageLoader);
    let view = viewer.view();
    assert_eq!(view.scene, SceneView::Unavailable);
    assert_eq!(view.slots.len(), 7);
    assert_eq!(view.slots[0].artwork, Some(ArtworkId::new("artwork-15")));
}

#[test]
fn worker_feeds_viewer() {
    let gallery = fixtures();
    let mut viewer = Viewer::new(
        Arc::new(gallery.exhibition.clone()),
        gallery.config.clone(),
        gallery.resolver(),
    );
    let worker = SceneWorker::spawn(FsSceneLoader::new(&gallery.dir)).unwrap();

    let mut submitted = 0;
    for request in viewer.take_requests() {
        if let LoadRequest::Scene { room, address } = request {
            assert!(worker.submit(room, address));
            submitted += 1;
        }
    }
    assert_eq!(submitted, 3);

    for _ in 0..submitted {
        let loaded = worker
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        viewer.complete_scene(loaded.room, loaded.result);
    }
    assert!(viewer.scene_view(RoomIndex(0)).handle().is_some());
    assert!(viewer.scene_view(RoomIndex(1)).handle().is_some());
    assert_eq!(viewer.scene_view(RoomIndex(2)), SceneView::Unavailable);
}
