//! Pointer interaction with frame slots.
//!
//! Hover is exclusive: entering a slot replaces whatever was hovered before,
//! and leaving only clears the hover if it is the slot currently hovered
//! (pointer-out for the old slot may arrive after pointer-over for the new
//! one). Hover never outlives the room that produced it.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::exhibition::{ArtworkDetail, Exhibition};
use crate::id::FrameId;
use crate::image::{ImageResolver, ImageVariant, image_url};
use crate::placement::{RoomPlacement, SlotPlacement};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    Enter(FrameId),
    Leave(FrameId),
    /// Drop any hover, e.g. on room change.
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(FrameId),
}

impl HoverState {
    pub fn reduce(self, event: PointerEvent) -> Self {
        match (self, event) {
            (_, PointerEvent::Enter(frame)) => HoverState::Hovering(frame),
            (HoverState::Hovering(current), PointerEvent::Leave(frame)) if current != frame => {
                HoverState::Hovering(current)
            }
            (_, PointerEvent::Leave(_)) | (_, PointerEvent::Clear) => HoverState::Idle,
        }
    }

    pub fn hovered(&self) -> Option<&FrameId> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(frame) => Some(frame),
        }
    }
}

/// Title label shown next to the hovered slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverLabel {
    pub frame: FrameId,
    pub text: String,
    /// World-space anchor for the label.
    pub position: Vec3,
}

/// Emitted when a visitor clicks a slot holding an artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub frame: FrameId,
    pub detail: ArtworkDetail,
}

/// Rotation of a slot, from its Euler XYZ angles.
pub fn slot_rotation(slot: &SlotPlacement) -> Quat {
    Quat::from_euler(EulerRot::XYZ, slot.rotation.x, slot.rotation.y, slot.rotation.z)
}

/// Slot-space to world-space transform.
pub fn slot_transform(slot: &SlotPlacement) -> Mat4 {
    Mat4::from_rotation_translation(slot_rotation(slot), slot.position)
}

/// Label for the hovered slot. Empty slots are hoverable but show no label.
pub fn hover_label(
    hover: &HoverState,
    placement: &RoomPlacement,
    exhibition: &Exhibition,
    config: &ViewerConfig,
) -> Option<HoverLabel> {
    let frame = hover.hovered()?;
    let slot = placement.slot(frame)?;
    let artwork = exhibition.artwork(slot.artwork.as_ref()?)?;
    Some(HoverLabel {
        frame: frame.clone(),
        text: artwork.title.clone(),
        position: slot_transform(slot).transform_point3(config.label_offset),
    })
}

/// Build the selection for a click on `frame`, or `None` for an empty or
/// unknown slot.
pub fn select(
    frame: &FrameId,
    placement: &RoomPlacement,
    exhibition: &Exhibition,
    resolver: &impl ImageResolver,
    config: &ViewerConfig,
) -> Option<Selection> {
    let slot = placement.slot(frame)?;
    let artwork = exhibition.artwork(slot.artwork.as_ref()?)?;
    let url = image_url(resolver, artwork, ImageVariant::Detail, config);
    Some(Selection {
        frame: frame.clone(),
        detail: ArtworkDetail::from_artwork(artwork, url),
    })
}
