//! Headless walkthrough: tour the bundled exhibition without a renderer.
//!
//! Loads the fixture content, preloads every room scene, walks all rooms
//! printing what hangs where, hovers and selects an artwork, and checks that
//! a second session over the same content produces identical views.
//!
//! Run with: `cargo run -p gallery-data --example headless_walkthrough`
//! Pass a content directory as the first argument to tour something else.

use std::path::PathBuf;
use std::sync::Arc;

use gallery_core::interaction::PointerEvent;
use gallery_core::view::{RoomView, SceneView};
use gallery_core::viewer::Viewer;
use gallery_data::config::SourceResolver;
use gallery_data::glb::FsSceneLoader;
use gallery_data::image_url::FsImageLoader;
use gallery_data::{Gallery, load_gallery};

fn session(gallery: &Gallery) -> Viewer<SourceResolver> {
    let mut viewer = Viewer::new(
        Arc::new(gallery.exhibition.clone()),
        gallery.config.clone(),
        gallery.resolver(),
    );
    let loads = viewer.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);
    log::info!("startup performed {loads} loads");
    viewer
}

fn print_room(view: &RoomView) {
    let name = view.room_name.as_deref().unwrap_or("(unnamed)");
    println!("=== {} -- {name} ===", view.label);
    match &view.scene {
        SceneView::Ready(handle) => println!(
            "scene {} ({} meshes), offset {:?}",
            handle.address, handle.mesh_count, handle.offset
        ),
        SceneView::Loading => println!("scene still loading"),
        SceneView::Unavailable => println!("scene unavailable, showing frames only"),
    }
    for slot in &view.slots {
        let title = slot.title.as_deref().unwrap_or("(empty)");
        let texture = if slot.texture.is_ready() { "ok" } else { "placeholder" };
        println!(
            "  {:<12} {:<22} at ({:>5.2}, {:>5.2}, {:>5.2})  texture: {texture}",
            slot.frame.as_str(),
            title,
            slot.position.x,
            slot.position.y,
            slot.position.z,
        );
    }
    println!();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
    let gallery = load_gallery(&dir).expect("failed to load content directory");

    println!(
        "{} ({} to {})\n",
        gallery.exhibition.title, gallery.exhibition.dates.start, gallery.exhibition.dates.end
    );

    let mut viewer = session(&gallery);
    let mut tour = Vec::new();
    for _ in 0..viewer.room_count() {
        let view = viewer.view();
        print_room(&view);
        tour.push(view);
        viewer.next();
        viewer.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);
    }

    // Hover and open the first artwork of the first room.
    viewer.goto(0);
    let first = viewer
        .placement()
        .slots
        .iter()
        .find(|s| s.artwork.is_some())
        .map(|s| s.frame.clone());
    if let Some(frame) = first {
        viewer.pointer(PointerEvent::Enter(frame.clone()));
        if let Some(label) = viewer.view().hover_label {
            println!("hover label: \"{}\" at {:?}", label.text, label.position);
        }
        viewer.click(&frame);
        viewer.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);
        if let Some(modal) = viewer.view().modal {
            let d = &modal.detail;
            println!("detail: {} -- {} ({}), {}", d.title, d.artist, d.year, d.medium);
            println!("        image {}", modal.image.url().unwrap_or("(none)"));
        }
        viewer.escape();
    }

    // A fresh session over the same content must see exactly the same rooms.
    let mut replay = session(&gallery);
    for (i, expected) in tour.iter().enumerate() {
        let view = replay.view();
        assert_eq!(&view, expected, "room {} differs between sessions", i + 1);
        replay.next();
        replay.pump(&FsSceneLoader::new(&gallery.dir), &FsImageLoader);
    }
    println!("\ndeterminism check passed for {} rooms", tour.len());
}
