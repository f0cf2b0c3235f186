mod camera;
mod frames;
mod room;
mod state;
mod ui;

use std::path::PathBuf;

use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;

const SKY_BLUE: Color = Color::srgb(0.529, 0.808, 0.922);

fn main() {
    let dir = content_dir();
    let gallery = gallery_data::load_gallery(&dir).expect("failed to load content directory");

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: gallery.exhibition.title.clone(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: dir.to_string_lossy().into_owned(),
                    ..default()
                }),
        )
        .add_plugins(MeshPickingPlugin)
        .insert_resource(ClearColor(SKY_BLUE))
        .insert_resource(state::Content(gallery))
        .add_plugins((
            state::StatePlugin,
            camera::CameraPlugin,
            room::RoomPlugin,
            frames::FramesPlugin,
            ui::UiPlugin,
        ))
        .run();
}

/// `GALLERY_CONTENT_DIR`, or the fixture exhibition bundled with gallery-data.
fn content_dir() -> PathBuf {
    let dir = std::env::var_os("GALLERY_CONTENT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../gallery-data/fixtures"))
        });
    // The asset server resolves relative roots against the executable, not the cwd.
    std::fs::canonicalize(&dir).unwrap_or(dir)
}
