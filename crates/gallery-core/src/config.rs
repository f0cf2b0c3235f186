//! Session-wide viewer configuration.
//!
//! Every value is a constant for the lifetime of a session. Defaults
//! reproduce the walkthrough's stock behaviour; hosts may override any field
//! from a config file (see `gallery-data`).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::id::RoomIndex;

/// Artworks per room when a room has no explicit frame slots.
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Room count used when the exhibition defines no rooms of its own.
pub const DEFAULT_ROOM_COUNT: usize = 3;

/// Placeholder in [`ViewerConfig::scene_template`] replaced by the one-based room number.
pub const ROOM_NUMBER_PLACEHOLDER: &str = "{n}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub page_size: usize,
    pub fallback_room_count: usize,
    /// Scene address convention, e.g. `models/room{n}.glb`.
    pub scene_template: String,
    /// Square edge length requested for in-scene textures.
    pub texture_size: u32,
    /// Square edge length requested for the detail overlay.
    pub detail_size: u32,
    /// Preload every room's scene when the session starts.
    pub preload_rooms: bool,
    /// Offset of the hover label from the hovered slot, in slot space.
    pub label_offset: Vec3,
    pub camera: CameraConfig,
    pub grid: GridLayout,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fallback_room_count: DEFAULT_ROOM_COUNT,
            scene_template: "models/room{n}.glb".to_string(),
            texture_size: 512,
            detail_size: 1200,
            preload_rooms: true,
            label_offset: Vec3::new(0.0, -0.85, 0.1),
            camera: CameraConfig::default(),
            grid: GridLayout::default(),
        }
    }
}

impl ViewerConfig {
    /// Scene address for `room` under the naming convention.
    pub fn scene_address(&self, room: RoomIndex) -> String {
        self.scene_template
            .replace(ROOM_NUMBER_PLACEHOLDER, &room.number().to_string())
    }
}

/// Static camera-control settings. Never derived from scene geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit: bool,
    pub pan: bool,
    pub zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 0.1),
            target: Vec3::new(0.0, 1.6, -2.0),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            orbit: true,
            pan: true,
            zoom: true,
            min_distance: 0.5,
            max_distance: 30.0,
        }
    }
}

impl CameraConfig {
    /// Clamp a requested orbit distance to the zoom bounds.
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

/// Layout of generated slots for rooms without explicit frames.
///
/// Slots fill rows left to right, centred on the x axis, on a wall plane at
/// `wall_z` facing the default camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub columns: usize,
    /// Centre-to-centre distance between neighbouring slots.
    pub spacing: Vec2,
    /// Height of the first row's centres.
    pub top_row_height: f32,
    pub wall_z: f32,
    pub frame_size: Vec2,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            spacing: Vec2::new(1.8, 1.6),
            top_row_height: 2.4,
            wall_z: -4.0,
            frame_size: Vec2::new(1.2, 1.2),
        }
    }
}

impl GridLayout {
    /// Centre position of the `slot`-th generated frame.
    pub fn position(&self, slot: usize) -> Vec3 {
        let columns = self.columns.max(1);
        let row = slot / columns;
        let col = slot % columns;
        let offset = col as f32 - (columns - 1) as f32 / 2.0;
        Vec3::new(
            offset * self.spacing.x,
            self.top_row_height - row as f32 * self.spacing.y,
            self.wall_z,
        )
    }
}
