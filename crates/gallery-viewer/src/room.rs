use bevy::prelude::*;
use gallery_core::id::RoomIndex;

use crate::state::{CurrentView, GallerySet};

pub struct RoomPlugin;

impl Plugin for RoomPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_lights)
            .add_systems(Update, sync_room_scene.in_set(GallerySet::Render));
    }
}

/// The spawned 3D scene of a room.
#[derive(Component)]
pub struct RoomScene {
    pub room: RoomIndex,
}

/// Key light, aimed at the room origin.
pub const SUN_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
/// Fill light hanging above the room centre.
pub const FILL_POSITION: Vec3 = Vec3::new(0.0, 3.0, 0.0);

fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 1_000_000.0,
            range: 30.0,
            ..default()
        },
        Transform::from_translation(FILL_POSITION),
    ));
}

/// Keep exactly the current room's scene spawned, once its bounds are known.
/// Rooms whose scene failed to load show their frames only.
fn sync_room_scene(
    mut commands: Commands,
    view: Res<CurrentView>,
    asset_server: Res<AssetServer>,
    spawned: Query<(Entity, &RoomScene)>,
) {
    if !view.is_changed() {
        return;
    }
    let wanted = view.0.scene.handle();

    let mut present = false;
    for (entity, scene) in &spawned {
        if wanted.is_some_and(|handle| handle.room == scene.room) {
            present = true;
        } else {
            commands.entity(entity).despawn_recursive();
        }
    }

    let Some(handle) = wanted else {
        return;
    };
    if present {
        return;
    }
    debug!("spawning {} with offset {:?}", handle.address, handle.offset);
    commands.spawn((
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(handle.address.clone()))),
        Transform::from_translation(handle.offset),
        RoomScene { room: handle.room },
    ));
}
