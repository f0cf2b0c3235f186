//! The typed exhibition model handed to the core by the content layer.
//!
//! Everything here is immutable for the duration of a viewing session. The
//! viewer holds the exhibition behind an `Arc` and only ever reads it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::id::{ArtworkId, FrameId, ImageRef, RoomIndex};

/// Inclusive date range of an exhibition, as ISO-8601 calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// A fully dereferenced exhibition: rooms and artworks are resolved values,
/// not references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub dates: DateRange,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub cover_image: Option<ImageRef>,
    /// The exhibition's own ordered list. Grid rooms page through this.
    #[serde(default)]
    pub artworks: Vec<Artwork>,
    /// Artworks that only appear inside frame configurations. Frame bindings
    /// resolve against them, but no grid page ever includes them.
    #[serde(default)]
    pub frame_artworks: Vec<Artwork>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Exhibition {
    /// Look up an artwork by id, in the listed artworks first and then in
    /// those only embedded in frames.
    pub fn artwork(&self, id: &ArtworkId) -> Option<&Artwork> {
        self.artworks
            .iter()
            .chain(&self.frame_artworks)
            .find(|a| &a.id == id)
    }

    /// The room definition at `index`, if the exhibition defines one.
    pub fn room(&self, index: RoomIndex) -> Option<&Room> {
        self.rooms.get(index.0)
    }
}

/// One navigable space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Address of the room's 3D scene. When absent, the index-based naming
    /// convention from the viewer config applies.
    #[serde(default)]
    pub scene: Option<String>,
    /// Explicit frame slots. Empty means the paginated grid fallback is used.
    #[serde(default)]
    pub frames: Vec<FrameSlot>,
}

/// A placement definition for a single artwork within a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSlot {
    pub id: FrameId,
    pub position: Vec3,
    /// Euler XYZ rotation in radians.
    pub rotation: Vec3,
    /// Width and height in scene units.
    pub size: Vec2,
    #[serde(default)]
    pub artwork: Option<ArtworkId>,
}

/// A described work that can occupy a frame slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub medium: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Room/frame numbers authored in the content store. Informational only;
    /// placement never reads it.
    #[serde(default)]
    pub frame_hint: Option<FrameHint>,
}

/// Authored one-based room and frame numbers for an artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHint {
    pub room: u32,
    pub frame: u32,
}

/// Denormalized snapshot shown in the detail overlay. Built at selection
/// time and discarded when the overlay closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkDetail {
    pub artwork: ArtworkId,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub medium: String,
    pub description: Option<String>,
    /// High-resolution image URL, or `None` when the artwork has no usable image.
    pub image_url: Option<String>,
}

impl ArtworkDetail {
    pub fn from_artwork(artwork: &Artwork, image_url: Option<String>) -> Self {
        Self {
            artwork: artwork.id.clone(),
            title: artwork.title.clone(),
            artist: artwork.artist.clone(),
            year: artwork.year,
            medium: artwork.medium.clone(),
            description: artwork.description.clone(),
            image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn artwork_lookup_by_id() {
        let exhibition = exhibition_with_artworks(5, 1);
        let found = exhibition.artwork(&ArtworkId::new("art-3")).unwrap();
        assert_eq!(found.title, "Work 3");
        assert!(exhibition.artwork(&ArtworkId::new("art-99")).is_none());
    }

    #[test]
    fn artwork_lookup_reaches_frame_only_artworks() {
        let mut exhibition = exhibition_with_artworks(2, 1);
        exhibition.frame_artworks.push(artwork(40));
        assert_eq!(exhibition.artwork(&ArtworkId::new("art-40")).unwrap().title, "Work 40");
        assert_eq!(exhibition.artworks.len(), 2);
    }

    #[test]
    fn room_lookup_out_of_range() {
        let exhibition = exhibition_with_artworks(0, 2);
        assert!(exhibition.room(RoomIndex(1)).is_some());
        assert!(exhibition.room(RoomIndex(2)).is_none());
    }

    #[test]
    fn detail_snapshot_copies_fields() {
        let mut art = artwork(7);
        art.description = Some("Layered pigment".into());
        let detail = ArtworkDetail::from_artwork(&art, Some("https://img/7-large".into()));
        assert_eq!(detail.artwork, art.id);
        assert_eq!(detail.title, "Work 7");
        assert_eq!(detail.year, art.year);
        assert_eq!(detail.description.as_deref(), Some("Layered pigment"));
        assert_eq!(detail.image_url.as_deref(), Some("https://img/7-large"));
    }

    #[test]
    fn deserialize_room_from_ron() {
        let input = r#"(
            name: "North Hall",
            frames: [
                (
                    id: ("north-1"),
                    position: (1.0, 1.6, -4.0),
                    rotation: (0.0, 0.0, 0.0),
                    size: (1.2, 0.9),
                    artwork: Some(("art-0")),
                ),
            ],
        )"#;
        let room: Room = ron::from_str(input).unwrap();
        assert_eq!(room.name, "North Hall");
        assert!(room.scene.is_none());
        assert_eq!(room.frames.len(), 1);
        assert_eq!(room.frames[0].size, Vec2::new(1.2, 0.9));
        assert_eq!(room.frames[0].artwork, Some(ArtworkId::new("art-0")));
    }
}
