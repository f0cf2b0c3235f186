use bevy::prelude::*;
use gallery_core::id::{FrameId, RoomIndex};
use gallery_core::image::ImageState;
use gallery_core::interaction::PointerEvent;
use gallery_core::view::SlotView;

use crate::state::{CurrentView, GallerySet, GalleryState, Textures};

pub struct FramesPlugin;

impl Plugin for FramesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (spawn_frames, update_frame_materials)
                .chain()
                .in_set(GallerySet::Render),
        );
    }
}

/// A frame slot rendered as a flat quad.
#[derive(Component)]
pub struct FrameQuad {
    pub frame: FrameId,
    pub room: RoomIndex,
}

const PLACEHOLDER: Color = Color::srgb(0.6, 0.6, 0.6);
const HOVER_GLOW: LinearRgba = LinearRgba::rgb(0.15, 0.15, 0.12);

/// Apply a slot's texture and hover state to its material.
fn paint(material: &mut StandardMaterial, slot: &SlotView, textures: &Textures) {
    let texture = match &slot.texture {
        ImageState::Ready { url } => textures.get(url).cloned(),
        ImageState::Loading { .. } | ImageState::Placeholder => None,
    };
    material.base_color = if texture.is_some() {
        Color::WHITE
    } else {
        PLACEHOLDER
    };
    material.base_color_texture = texture;
    material.emissive = if slot.hovered {
        HOVER_GLOW
    } else {
        LinearRgba::BLACK
    };
}

fn spawn_frames(
    mut commands: Commands,
    view: Res<CurrentView>,
    textures: Res<Textures>,
    frames: Query<(Entity, &FrameQuad)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !view.is_changed() {
        return;
    }
    let room = view.0.room;
    if frames.iter().any(|(_, quad)| quad.room == room) {
        return;
    }
    for (entity, _) in &frames {
        commands.entity(entity).despawn_recursive();
    }

    for slot in &view.0.slots {
        let mut material = StandardMaterial {
            perceptual_roughness: 0.9,
            ..default()
        };
        paint(&mut material, slot, &textures);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            slot.rotation.x,
            slot.rotation.y,
            slot.rotation.z,
        );

        commands
            .spawn((
                Mesh3d(meshes.add(Rectangle::new(slot.size.x, slot.size.y))),
                MeshMaterial3d(materials.add(material)),
                Transform::from_translation(slot.position).with_rotation(rotation),
                FrameQuad {
                    frame: slot.frame.clone(),
                    room,
                },
            ))
            .observe(hover_frame)
            .observe(leave_frame)
            .observe(click_frame);
    }
}

fn update_frame_materials(
    view: Res<CurrentView>,
    textures: Res<Textures>,
    frames: Query<(&FrameQuad, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !view.is_changed() {
        return;
    }
    for (quad, handle) in &frames {
        let Some(slot) = view.0.slot(&quad.frame) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&handle.0) {
            paint(material, slot, &textures);
        }
    }
}

fn hover_frame(
    trigger: Trigger<Pointer<Over>>,
    frames: Query<&FrameQuad>,
    mut state: ResMut<GalleryState>,
) {
    if let Ok(quad) = frames.get(trigger.entity()) {
        state.viewer.pointer(PointerEvent::Enter(quad.frame.clone()));
    }
}

fn leave_frame(
    trigger: Trigger<Pointer<Out>>,
    frames: Query<&FrameQuad>,
    mut state: ResMut<GalleryState>,
) {
    if let Ok(quad) = frames.get(trigger.entity()) {
        state.viewer.pointer(PointerEvent::Leave(quad.frame.clone()));
    }
}

fn click_frame(
    trigger: Trigger<Pointer<Click>>,
    frames: Query<&FrameQuad>,
    mut state: ResMut<GalleryState>,
) {
    if trigger.event().button != PointerButton::Primary {
        return;
    }
    if let Ok(quad) = frames.get(trigger.entity()) {
        if let Some(selection) = state.viewer.click(&quad.frame) {
            info!("selected '{}'", selection.detail.title);
        }
    }
}
