use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::asset::LoadState;
use bevy::prelude::*;
use gallery_core::error::AssetLoadError;
use gallery_core::image::{ImageKey, LoadedImage};
use gallery_core::view::RoomView;
use gallery_core::viewer::{LoadRequest, Viewer};
use gallery_data::Gallery;
use gallery_data::config::SourceResolver;
use gallery_data::glb::FsSceneLoader;
use gallery_data::worker::SceneWorker;

pub struct StatePlugin;

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (GallerySet::Input, GallerySet::Sync, GallerySet::Render).chain(),
        )
        .add_systems(PreStartup, init_gallery_state)
        .add_systems(
            Update,
            (dispatch_requests, poll_scenes, poll_images, refresh_view)
                .chain()
                .in_set(GallerySet::Sync),
        );
    }
}

/// Frame phases: user input mutates the viewer, loads are synced, then the
/// scene and HUD are brought in line with the fresh [`CurrentView`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GallerySet {
    Input,
    Sync,
    Render,
}

/// Loaded content, consumed at startup.
#[derive(Resource)]
pub struct Content(pub Gallery);

/// The viewer plus the host-side loading machinery feeding it.
#[derive(Resource)]
pub struct GalleryState {
    pub viewer: Viewer<SourceResolver>,
    worker: SceneWorker,
    dir: PathBuf,
    pending: Vec<PendingImage>,
}

struct PendingImage {
    key: ImageKey,
    url: String,
    handle: Handle<Image>,
}

/// The room view as of the last sync. Only marked changed when it differs.
#[derive(Resource, PartialEq)]
pub struct CurrentView(pub RoomView);

/// Image handles by resolved URL. Holding the strong handle keeps each
/// texture alive for the session.
#[derive(Resource, Default)]
pub struct Textures(HashMap<String, Handle<Image>>);

impl Textures {
    pub fn get(&self, url: &str) -> Option<&Handle<Image>> {
        self.0.get(url)
    }
}

fn init_gallery_state(world: &mut World) {
    let Some(Content(gallery)) = world.remove_resource::<Content>() else {
        return;
    };
    let resolver = gallery.resolver();
    let viewer = Viewer::new(Arc::new(gallery.exhibition), gallery.config, resolver);
    // Every room preloads at startup; give each its own loader where possible.
    let worker = SceneWorker::with_threads(FsSceneLoader::new(&gallery.dir), viewer.room_count())
        .expect("failed to start scene loader threads");
    info!(
        "opened '{}' with {} rooms",
        viewer.exhibition().title,
        viewer.room_count()
    );

    world.insert_resource(CurrentView(viewer.view()));
    world.insert_resource(GalleryState {
        viewer,
        worker,
        dir: gallery.dir,
        pending: Vec::new(),
    });
    world.insert_resource(Textures::default());
}

/// Resolved URLs for local files are absolute; the asset server wants them
/// relative to the content directory.
fn asset_path(dir: &Path, url: &str) -> String {
    match Path::new(url).strip_prefix(dir) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => url.to_string(),
    }
}

fn dispatch_requests(
    mut state: ResMut<GalleryState>,
    mut textures: ResMut<Textures>,
    asset_server: Res<AssetServer>,
) {
    let state = &mut *state;
    for request in state.viewer.take_requests() {
        match request {
            LoadRequest::Scene { room, address } => {
                if !state.worker.submit(room, address.clone()) {
                    state.viewer.complete_scene(
                        room,
                        Err(AssetLoadError::Io {
                            address,
                            detail: "scene loader thread has stopped".to_string(),
                        }),
                    );
                }
            }
            LoadRequest::Image { key, url } => {
                let handle = textures
                    .0
                    .entry(url.clone())
                    .or_insert_with(|| asset_server.load(asset_path(&state.dir, &url)))
                    .clone();
                state.pending.push(PendingImage { key, url, handle });
            }
        }
    }
}

fn poll_scenes(mut state: ResMut<GalleryState>) {
    let state = &mut *state;
    for loaded in state.worker.poll() {
        state.viewer.complete_scene(loaded.room, loaded.result);
    }
}

fn poll_images(mut state: ResMut<GalleryState>, asset_server: Res<AssetServer>) {
    if state.pending.is_empty() {
        return;
    }
    let pending = std::mem::take(&mut state.pending);
    for image in pending {
        match asset_server.get_load_state(&image.handle) {
            Some(LoadState::Loaded) => {
                state
                    .viewer
                    .complete_image(image.key, Ok(LoadedImage { url: image.url }));
            }
            Some(LoadState::Failed(err)) => {
                let err = AssetLoadError::Io {
                    address: image.url,
                    detail: err.to_string(),
                };
                state.viewer.complete_image(image.key, Err(err));
            }
            _ => state.pending.push(image),
        }
    }
}

fn refresh_view(state: Res<GalleryState>, mut current: ResMut<CurrentView>) {
    current.set_if_neq(CurrentView(state.viewer.view()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_urls_become_relative_asset_paths() {
        let dir = Path::new("/srv/gallery");
        assert_eq!(
            asset_path(dir, "/srv/gallery/images/512x512/abc.png"),
            "images/512x512/abc.png"
        );
        assert_eq!(
            asset_path(dir, "https://cdn.example/abc.png"),
            "https://cdn.example/abc.png"
        );
    }
}
