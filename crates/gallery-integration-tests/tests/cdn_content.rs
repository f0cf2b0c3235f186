//! A content directory backed by the image CDN, with no rooms defined: the
//! viewer falls back to the configured room count and pages artworks across
//! generated grids, requesting every image at the two configured sizes.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use gallery_core::id::{ArtworkId, RoomIndex};
use gallery_core::image::{ImageKey, ImageVariant};
use gallery_core::placement::PlacementStrategy;
use gallery_core::test_utils::{StubImageLoader, StubSceneLoader};
use gallery_core::view::SceneView;
use gallery_core::viewer::{LoadRequest, Viewer};
use gallery_data::config::{ImageSource, SourceResolver};
use gallery_data::load_gallery;
use serde_json::json;

const CDN: &str = "https://cdn.sanity.io/images/abc123/production";

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "gallery_it_cdn_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_content(dir: &PathBuf) {
    let artworks: Vec<_> = (0..5)
        .map(|i| {
            json!({
                "_id": format!("work-{i}"),
                "title": format!("Study {i}"),
                "artist": "R. Vale",
                "year": 2001 + i,
                "medium": "Gouache",
                "image": {
                    "_type": "image",
                    "asset": {"_ref": format!("image-hash{i}-800x600-jpg"), "_type": "reference"}
                }
            })
        })
        .collect();
    let exhibition = json!({
        "_id": "exhibition-studies",
        "title": "Studies",
        "startDate": "2026-01-10",
        "endDate": "2026-03-01",
        "isActive": true,
        "artworks": artworks,
        "rooms": null
    });
    fs::write(
        dir.join("exhibition.json"),
        serde_json::to_string_pretty(&exhibition).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("images.toml"),
        "[cdn]\nproject_id = \"abc123\"\ndataset = \"production\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("viewer.toml"),
        "page_size = 2\nfallback_room_count = 3\npreload_rooms = false\n",
    )
    .unwrap();
}

fn open(suffix: &str) -> Viewer<SourceResolver> {
    let dir = make_test_dir(suffix);
    write_content(&dir);
    let gallery = load_gallery(&dir).unwrap();
    assert!(matches!(gallery.images, ImageSource::Cdn { .. }));
    Viewer::new(
        Arc::new(gallery.exhibition.clone()),
        gallery.config.clone(),
        gallery.resolver(),
    )
}

fn image_urls(requests: &[LoadRequest]) -> Vec<String> {
    requests
        .iter()
        .filter_map(|r| match r {
            LoadRequest::Image { url, .. } => Some(url.clone()),
            LoadRequest::Scene { .. } => None,
        })
        .collect()
}

#[test]
fn textures_resolve_to_sized_cdn_urls() {
    let mut viewer = open("textures");
    assert_eq!(viewer.room_count(), 3);
    assert_eq!(viewer.placement().strategy, PlacementStrategy::Grid);

    let requests = viewer.take_requests();
    // No preload: only the first room's scene.
    let scenes: Vec<_> = requests
        .iter()
        .filter(|r| matches!(r, LoadRequest::Scene { .. }))
        .collect();
    assert_eq!(scenes.len(), 1);
    assert_eq!(
        image_urls(&requests),
        vec![
            format!("{CDN}/hash0-800x600.jpg?w=512&h=512"),
            format!("{CDN}/hash1-800x600.jpg?w=512&h=512"),
        ]
    );
}

#[test]
fn last_page_is_short_and_detail_uses_large_size() {
    let mut viewer = open("detail");
    viewer.take_requests();

    viewer.goto(2);
    let slots = &viewer.placement().slots;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].artwork, Some(ArtworkId::new("work-4")));
    let frame = slots[0].frame.clone();
    viewer.take_requests();

    let selection = viewer.click(&frame).unwrap();
    assert_eq!(
        selection.detail.image_url.as_deref(),
        Some(format!("{CDN}/hash4-800x600.jpg?w=1200&h=1200").as_str())
    );
    let requests = viewer.take_requests();
    assert_eq!(
        requests,
        vec![LoadRequest::Image {
            key: ImageKey {
                artwork: ArtworkId::new("work-4"),
                variant: ImageVariant::Detail,
            },
            url: format!("{CDN}/hash4-800x600.jpg?w=1200&h=1200"),
        }]
    );
}

#[test]
fn rooms_without_scene_files_still_show_artworks() {
    let mut viewer = open("render");
    let scenes = StubSceneLoader::new().with_unit("models/room1.glb");
    let images = StubImageLoader::default();
    viewer.pump(&scenes, &images);

    let view = viewer.view();
    assert!(view.scene.handle().is_some());
    assert!(view.slots.iter().all(|s| s.texture.is_ready()));

    viewer.next();
    viewer.pump(&scenes, &images);
    let view = viewer.view();
    assert_eq!(view.room, RoomIndex(1));
    assert_eq!(view.scene, SceneView::Unavailable);
    assert_eq!(
        view.artwork_ids(),
        vec![ArtworkId::new("work-2"), ArtworkId::new("work-3")]
    );
    assert!(view.slots.iter().all(|s| s.texture.is_ready()));
}
