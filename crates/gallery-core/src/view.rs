//! Backend-neutral description of what to render for the current room.
//!
//! Renderers (Bevy, a web canvas, a test) consume [`RoomView`] and never
//! look at viewer state directly.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::exhibition::ArtworkDetail;
use crate::id::{ArtworkId, FrameId, RoomIndex};
use crate::image::ImageState;
use crate::interaction::HoverLabel;
use crate::scene::SceneHandle;

/// Render state of the room's 3D scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneView {
    /// Load requested or in flight; render nothing yet.
    Loading,
    Ready(Arc<SceneHandle>),
    /// The load failed; the room is shown without a scene for the session.
    Unavailable,
}

impl SceneView {
    pub fn handle(&self) -> Option<&SceneHandle> {
        match self {
            SceneView::Ready(handle) => Some(handle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub frame: FrameId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: Vec2,
    pub artwork: Option<ArtworkId>,
    pub title: Option<String>,
    pub texture: ImageState,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalView {
    pub detail: ArtworkDetail,
    pub image: ImageState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub room: RoomIndex,
    pub room_count: usize,
    /// Position indicator, e.g. `Room 1 / 3`.
    pub label: String,
    pub room_name: Option<String>,
    pub scene: SceneView,
    pub slots: Vec<SlotView>,
    pub hover_label: Option<HoverLabel>,
    pub modal: Option<ModalView>,
}

impl RoomView {
    pub fn slot(&self, frame: &FrameId) -> Option<&SlotView> {
        self.slots.iter().find(|s| &s.frame == frame)
    }

    pub fn artwork_ids(&self) -> Vec<ArtworkId> {
        self.slots.iter().filter_map(|s| s.artwork.clone()).collect()
    }
}
