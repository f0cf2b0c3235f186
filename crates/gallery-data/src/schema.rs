//! Serde structs for exhibition documents as the content store returns them.
//!
//! Documents are fully dereferenced: artwork references inside the
//! exhibition and inside frame configurations arrive as embedded artwork
//! documents. Field names follow the store's camelCase convention with
//! `_id`/`_key`/`_ref` system fields. Conversion into the typed
//! [`Exhibition`] is infallible; missing optional data becomes defaults.

use std::collections::HashSet;

use gallery_core::exhibition::{Artwork, DateRange, Exhibition, FrameHint, FrameSlot, Room};
use gallery_core::id::{ArtworkId, FrameId, ImageRef};
use glam::{Vec2, Vec3};
use serde::Deserialize;

/// Frame size used when a frame configuration omits its size.
pub const DEFAULT_FRAME_SIZE: Vec2 = Vec2::new(1.2, 1.2);

// ===========================================================================
// Top level
// ===========================================================================

/// A content file: one exhibition, or a list to pick the active one from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentDocument {
    List(Vec<ExhibitionDoc>),
    Single(Box<ExhibitionDoc>),
}

impl ContentDocument {
    /// The exhibition to show: the single document, or the first active one
    /// in a list.
    pub fn into_active(self) -> Option<ExhibitionDoc> {
        match self {
            ContentDocument::Single(doc) => Some(*doc),
            ContentDocument::List(docs) => docs.into_iter().find(|d| d.is_active),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<SlugDoc>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub cover_image: Option<ImageDoc>,
    #[serde(default)]
    pub artworks: Option<Vec<Option<ArtworkDoc>>>,
    #[serde(default)]
    pub rooms: Option<Vec<RoomDoc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlugDoc {
    pub current: String,
}

// ===========================================================================
// Images
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ImageDoc {
    #[serde(default)]
    pub asset: Option<AssetRefDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetRefDoc {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageDoc {
    fn image_ref(&self) -> Option<ImageRef> {
        self.asset
            .as_ref()
            .and_then(|a| a.reference.clone())
            .map(ImageRef)
    }
}

// ===========================================================================
// Artworks
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// The store keeps years as plain numbers.
    #[serde(default)]
    pub year: f64,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageDoc>,
    #[serde(default)]
    pub frame_position: Option<FramePositionDoc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FramePositionDoc {
    #[serde(default = "one")]
    pub room: u32,
    #[serde(default = "one")]
    pub frame: u32,
}

fn one() -> u32 {
    1
}

impl ArtworkDoc {
    pub fn into_artwork(self) -> Artwork {
        Artwork {
            id: ArtworkId(self.id),
            title: self.title,
            artist: self.artist,
            year: self.year as i32,
            medium: self.medium,
            description: self.description,
            image: self.image.as_ref().and_then(ImageDoc::image_ref),
            frame_hint: self.frame_position.map(|p| FrameHint {
                room: p.room,
                frame: p.frame,
            }),
        }
    }
}

/// A frame's artwork: embedded when the query dereferenced it, otherwise a
/// bare reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArtworkRefDoc {
    Embedded(Box<ArtworkDoc>),
    Reference {
        #[serde(rename = "_ref")]
        reference: String,
    },
}

impl ArtworkRefDoc {
    pub fn id(&self) -> &str {
        match self {
            ArtworkRefDoc::Embedded(doc) => &doc.id,
            ArtworkRefDoc::Reference { reference } => reference,
        }
    }
}

// ===========================================================================
// Rooms and frames
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDoc {
    #[serde(rename = "_key", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Dereferenced file asset: `{ _ref, url }`.
    #[serde(default)]
    pub model_file: Option<AssetRefDoc>,
    #[serde(default)]
    pub frames: Option<Vec<FrameDoc>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct XyzDoc {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl From<XyzDoc> for Vec3 {
    fn from(v: XyzDoc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SizeDoc {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDoc {
    #[serde(rename = "_key", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub frame_id: Option<String>,
    #[serde(default)]
    pub position: Option<XyzDoc>,
    #[serde(default)]
    pub rotation: Option<XyzDoc>,
    #[serde(default)]
    pub size: Option<SizeDoc>,
    #[serde(default)]
    pub artwork: Option<ArtworkRefDoc>,
}

impl FrameDoc {
    /// Slot id: the authored frame id, else the array key, else a
    /// positional id. Frame ids are free text, so one already taken in the
    /// room gives way to the key and then to the positional id.
    fn slot_id(&self, room: usize, index: usize, taken: &HashSet<String>) -> FrameId {
        let positional = format!("room{}-frame{}", room + 1, index + 1);
        let id = [self.frame_id.as_ref(), self.key.as_ref()]
            .into_iter()
            .flatten()
            .find(|id| !taken.contains(id.as_str()))
            .cloned()
            .unwrap_or(positional);
        FrameId(id)
    }
}

// ===========================================================================
// Conversion
// ===========================================================================

impl ExhibitionDoc {
    /// Convert into the typed model.
    ///
    /// Artworks embedded in frame configurations but missing from the
    /// exhibition's own list go to `frame_artworks`, so every embedded
    /// binding resolves while the list grid rooms page through stays as
    /// authored. Bare references are kept as-is and resolve (or not) at
    /// placement.
    pub fn into_exhibition(self) -> Exhibition {
        let artworks: Vec<Artwork> = self
            .artworks
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(ArtworkDoc::into_artwork)
            .collect();
        let mut known: HashSet<String> = artworks.iter().map(|a| a.id.0.clone()).collect();
        let mut frame_artworks = Vec::new();

        let rooms = self
            .rooms
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, room)| {
                let mut taken = HashSet::new();
                let frames = room
                    .frames
                    .unwrap_or_default()
                    .into_iter()
                    .enumerate()
                    .map(|(k, frame)| {
                        let id = frame.slot_id(index, k, &taken);
                        taken.insert(id.0.clone());
                        let artwork = frame.artwork.map(|binding| {
                            let artwork_id = ArtworkId(binding.id().to_string());
                            if let ArtworkRefDoc::Embedded(doc) = binding {
                                if known.insert(doc.id.clone()) {
                                    log::debug!(
                                        "adding artwork '{}' embedded in frame '{id}'",
                                        doc.id
                                    );
                                    frame_artworks.push(doc.into_artwork());
                                }
                            }
                            artwork_id
                        });
                        FrameSlot {
                            id,
                            position: frame.position.unwrap_or_default().into(),
                            rotation: frame.rotation.unwrap_or_default().into(),
                            size: frame
                                .size
                                .map(|s| Vec2::new(s.width, s.height))
                                .unwrap_or(DEFAULT_FRAME_SIZE),
                            artwork,
                        }
                    })
                    .collect();
                Room {
                    name: room
                        .name
                        .unwrap_or_else(|| format!("Room {}", index + 1)),
                    scene: room.model_file.and_then(|m| m.url.or(m.reference)),
                    frames,
                }
            })
            .collect();

        Exhibition {
            id: self.id,
            title: self.title,
            slug: self.slug.map(|s| s.current),
            description: self.description,
            dates: DateRange {
                start: self.start_date,
                end: self.end_date,
            },
            is_active: self.is_active,
            cover_image: self.cover_image.as_ref().and_then(ImageDoc::image_ref),
            artworks,
            frame_artworks,
            rooms,
        }
    }
}
