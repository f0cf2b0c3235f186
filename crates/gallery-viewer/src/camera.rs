use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use gallery_core::config::CameraConfig;

use crate::state::{GallerySet, GalleryState};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (camera_drag, camera_zoom, apply_orbit)
                .chain()
                .in_set(GallerySet::Input),
        );
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Radians per pixel of drag.
const ORBIT_SPEED: f32 = 0.005;
/// Fraction of the orbit distance moved per pixel of drag.
const PAN_SPEED: f32 = 0.0015;
const MAX_PITCH: f32 = 1.5;

/// Orbit-controls state: the camera sits `distance` from `target`, turned
/// by `yaw` about +Y and raised by `pitch`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Orbit {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Orbit {
    pub fn from_config(config: &CameraConfig) -> Self {
        let offset = config.position - config.target;
        let length = offset.length().max(f32::EPSILON);
        Self {
            target: config.target,
            distance: config.clamp_distance(length),
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / length).clamp(-1.0, 1.0).asin(),
        }
    }

    fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0)
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.rotation() * Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

fn setup_camera(mut commands: Commands, state: Res<GalleryState>) {
    let config = &state.viewer.config().camera;
    let orbit = Orbit::from_config(config);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            ..default()
        }),
        orbit.transform(),
        orbit,
        MainCamera,
    ));
}

fn camera_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<CursorMoved>,
    state: Res<GalleryState>,
    mut camera_q: Query<&mut Orbit, With<MainCamera>>,
    mut last_pos: Local<Option<Vec2>>,
) {
    let config = &state.viewer.config().camera;
    let orbiting = config.orbit && mouse.pressed(MouseButton::Left);
    let panning = config.pan && mouse.pressed(MouseButton::Right);

    // The overlay owns the pointer while it is open.
    if state.viewer.modal().is_open() || !(orbiting || panning) {
        *last_pos = None;
        motion.clear();
        return;
    }

    let Some(current) = motion.read().last().map(|e| e.position) else {
        return;
    };
    if let Some(prev) = *last_pos {
        let delta = current - prev;
        if let Ok(mut orbit) = camera_q.get_single_mut() {
            if orbiting {
                orbit.yaw -= delta.x * ORBIT_SPEED;
                orbit.pitch = (orbit.pitch + delta.y * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
            } else {
                let rotation = orbit.rotation();
                let scale = orbit.distance * PAN_SPEED;
                orbit.target += (rotation * Vec3::X) * -delta.x * scale;
                orbit.target += (rotation * Vec3::Y) * delta.y * scale;
            }
        }
    }
    *last_pos = Some(current);
}

fn camera_zoom(
    mut scroll: EventReader<MouseWheel>,
    state: Res<GalleryState>,
    mut camera_q: Query<&mut Orbit, With<MainCamera>>,
) {
    let config = &state.viewer.config().camera;
    if !config.zoom || state.viewer.modal().is_open() {
        scroll.clear();
        return;
    }
    for event in scroll.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        if let Ok(mut orbit) = camera_q.get_single_mut() {
            orbit.distance = config.clamp_distance(orbit.distance * (1.0 - scroll_amount));
        }
    }
}

fn apply_orbit(mut camera_q: Query<(&Orbit, &mut Transform), Changed<Orbit>>) {
    for (orbit, mut transform) in &mut camera_q {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_reproduces_configured_position() {
        let config = CameraConfig {
            position: Vec3::new(3.0, 4.0, 12.0),
            target: Vec3::new(0.0, 1.5, 0.0),
            min_distance: 0.1,
            max_distance: 100.0,
            ..CameraConfig::default()
        };
        let orbit = Orbit::from_config(&config);
        assert!(orbit.eye().distance(config.position) < 1e-4);
    }

    #[test]
    fn orbit_distance_is_clamped() {
        let config = CameraConfig {
            position: Vec3::new(0.0, 0.0, 500.0),
            target: Vec3::ZERO,
            min_distance: 1.0,
            max_distance: 20.0,
            ..CameraConfig::default()
        };
        let orbit = Orbit::from_config(&config);
        assert_eq!(orbit.distance, 20.0);
        assert!(orbit.eye().distance(Vec3::new(0.0, 0.0, 20.0)) < 1e-4);
    }
}
