use bevy::prelude::*;
use gallery_core::image::ImageState;
use gallery_core::modal::ModalClick;
use gallery_core::view::ModalView;

use crate::camera::MainCamera;
use crate::state::{CurrentView, GallerySet, GalleryState, Textures};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (handle_nav_buttons, keyboard_input).in_set(GallerySet::Input),
            )
            .add_systems(
                Update,
                (update_room_indicator, update_hover_label, sync_modal).in_set(GallerySet::Render),
            );
    }
}

const ROOM_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const INSTRUCTIONS: &str = "Drag to orbit, right-drag to pan, scroll to zoom.\n\
    Click an artwork for details. Arrow keys or 1-9 change rooms.";

// -----------------------------------------------------------------------
// HUD
// -----------------------------------------------------------------------

#[derive(Component)]
struct HudRoot;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum NavButton {
    Prev,
    Next,
}

#[derive(Component)]
struct RoomIndicator;

#[derive(Component)]
struct HoverLabelText;

fn spawn_hud(mut commands: Commands) {
    let panel_bg = Color::srgba(0.1, 0.1, 0.12, 0.75);
    let btn_bg = Color::srgb(0.22, 0.22, 0.28);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            PickingBehavior::IGNORE,
            HudRoot,
        ))
        .with_children(|root| {
            // Navigation bar
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(12.0),
                    ..default()
                },
                BackgroundColor(panel_bg),
                PickingBehavior::IGNORE,
            ))
            .with_children(|bar| {
                spawn_nav_button(bar, NavButton::Prev, "< Prev", btn_bg);
                bar.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    PickingBehavior::IGNORE,
                    RoomIndicator,
                ));
                spawn_nav_button(bar, NavButton::Next, "Next >", btn_bg);
            });

            // Usage
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(panel_bg),
                PickingBehavior::IGNORE,
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new(INSTRUCTIONS),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.8, 0.8, 0.8)),
                    PickingBehavior::IGNORE,
                ));
            });

            // Hover label, positioned every frame
            root.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    padding: UiRect::axes(Val::Px(6.0), Val::Px(3.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
                Visibility::Hidden,
                PickingBehavior::IGNORE,
                HoverLabelText,
            ));
        });
}

fn spawn_nav_button(parent: &mut ChildBuilder, button: NavButton, label: &str, bg: Color) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(bg),
            button,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn handle_nav_buttons(
    interactions: Query<(&Interaction, &NavButton), Changed<Interaction>>,
    mut state: ResMut<GalleryState>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            NavButton::Prev => state.viewer.prev(),
            NavButton::Next => state.viewer.next(),
        };
    }
}

fn keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<GalleryState>) {
    if keys.just_pressed(KeyCode::Escape) {
        state.viewer.escape();
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        state.viewer.next();
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        state.viewer.prev();
    }
    let room_count = state.viewer.room_count();
    for (room, key) in ROOM_KEYS.iter().enumerate().take(room_count) {
        if keys.just_pressed(*key) {
            state.viewer.goto(room);
        }
    }
}

fn update_room_indicator(
    view: Res<CurrentView>,
    mut indicator: Query<&mut Text, With<RoomIndicator>>,
) {
    if !view.is_changed() {
        return;
    }
    let label = match &view.0.room_name {
        Some(name) => format!("{}  {name}", view.0.label),
        None => view.0.label.clone(),
    };
    for mut text in &mut indicator {
        **text = label.clone();
    }
}

fn update_hover_label(
    view: Res<CurrentView>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut label_q: Query<(&mut Text, &mut Node, &mut Visibility), With<HoverLabelText>>,
) {
    let Ok((mut text, mut node, mut visibility)) = label_q.get_single_mut() else {
        return;
    };
    let Some(label) = &view.0.hover_label else {
        *visibility = Visibility::Hidden;
        return;
    };
    let Ok((camera, camera_transform)) = camera_q.get_single() else {
        return;
    };

    // The camera moves independently of the view, so project every frame.
    match camera.world_to_viewport(camera_transform, label.position) {
        Ok(screen) => {
            if text.0 != label.text {
                **text = label.text.clone();
            }
            node.left = Val::Px(screen.x);
            node.top = Val::Px(screen.y);
            *visibility = Visibility::Visible;
        }
        Err(_) => *visibility = Visibility::Hidden,
    }
}

// -----------------------------------------------------------------------
// Detail overlay
// -----------------------------------------------------------------------

#[derive(Component)]
struct ModalRoot;

/// Rebuild the overlay whenever what it should show changes.
fn sync_modal(
    mut commands: Commands,
    view: Res<CurrentView>,
    textures: Res<Textures>,
    roots: Query<Entity, With<ModalRoot>>,
    mut shown: Local<Option<ModalView>>,
) {
    if !view.is_changed() || *shown == view.0.modal {
        return;
    }
    for entity in &roots {
        commands.entity(entity).despawn_recursive();
    }
    *shown = view.0.modal.clone();
    if let Some(modal) = &view.0.modal {
        spawn_modal(&mut commands, modal, &textures);
    }
}

fn spawn_modal(commands: &mut Commands, modal: &ModalView, textures: &Textures) {
    let detail = &modal.detail;
    let image = match &modal.image {
        ImageState::Ready { url } => textures.get(url).cloned(),
        ImageState::Loading { .. } | ImageState::Placeholder => None,
    };
    let image_caption = match &modal.image {
        ImageState::Loading { .. } => "Loading image...",
        _ => "Image unavailable",
    };

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GlobalZIndex(10),
            ModalRoot,
        ))
        .observe(click_backdrop)
        .with_children(|backdrop| {
            backdrop
                .spawn((
                    Node {
                        width: Val::Percent(80.0),
                        max_width: Val::Px(960.0),
                        max_height: Val::Percent(85.0),
                        padding: UiRect::all(Val::Px(24.0)),
                        column_gap: Val::Px(24.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.97, 0.97, 0.95)),
                ))
                .observe(contain_click)
                .with_children(|content| {
                    match image {
                        Some(handle) => {
                            content.spawn((
                                ImageNode::new(handle),
                                Node {
                                    width: Val::Percent(55.0),
                                    ..default()
                                },
                            ));
                        }
                        None => {
                            content
                                .spawn((
                                    Node {
                                        width: Val::Percent(55.0),
                                        min_height: Val::Px(320.0),
                                        align_items: AlignItems::Center,
                                        justify_content: JustifyContent::Center,
                                        ..default()
                                    },
                                    BackgroundColor(Color::srgb(0.8, 0.8, 0.8)),
                                ))
                                .with_children(|placeholder| {
                                    placeholder.spawn((
                                        Text::new(image_caption),
                                        TextFont {
                                            font_size: 14.0,
                                            ..default()
                                        },
                                        TextColor(Color::srgb(0.4, 0.4, 0.4)),
                                    ));
                                });
                        }
                    }

                    content
                        .spawn(Node {
                            flex_direction: FlexDirection::Column,
                            flex_grow: 1.0,
                            row_gap: Val::Px(8.0),
                            ..default()
                        })
                        .with_children(|info| {
                            info.spawn((
                                Text::new(&detail.title),
                                TextFont {
                                    font_size: 26.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.1, 0.1, 0.1)),
                            ));
                            info.spawn((
                                Text::new(format!("{}, {}", detail.artist, detail.year)),
                                TextFont {
                                    font_size: 16.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.3, 0.3, 0.3)),
                            ));
                            info.spawn((
                                Text::new(&detail.medium),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.4, 0.4, 0.4)),
                            ));
                            if let Some(description) = &detail.description {
                                info.spawn((
                                    Text::new(description),
                                    TextFont {
                                        font_size: 13.0,
                                        ..default()
                                    },
                                    TextColor(Color::srgb(0.2, 0.2, 0.2)),
                                ));
                            }
                        });

                    content
                        .spawn((
                            Button,
                            Node {
                                position_type: PositionType::Absolute,
                                top: Val::Px(8.0),
                                right: Val::Px(8.0),
                                padding: UiRect::axes(Val::Px(8.0), Val::Px(2.0)),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(0.85, 0.85, 0.85)),
                        ))
                        .observe(click_close)
                        .with_children(|btn| {
                            btn.spawn((
                                Text::new("X"),
                                TextFont {
                                    font_size: 16.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.1, 0.1, 0.1)),
                            ));
                        });
                });
        });
}

fn click_backdrop(_trigger: Trigger<Pointer<Click>>, mut state: ResMut<GalleryState>) {
    state.viewer.modal_click(ModalClick::Backdrop);
}

/// Clicks inside the panel stop here and never reach the backdrop.
fn contain_click(mut trigger: Trigger<Pointer<Click>>, mut state: ResMut<GalleryState>) {
    trigger.propagate(false);
    state.viewer.modal_click(ModalClick::Content);
}

fn click_close(mut trigger: Trigger<Pointer<Click>>, mut state: ResMut<GalleryState>) {
    trigger.propagate(false);
    state.viewer.modal_click(ModalClick::CloseButton);
}
