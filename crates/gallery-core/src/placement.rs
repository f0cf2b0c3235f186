//! Frame placement: which artwork hangs in which slot of a room.
//!
//! # Strategies
//!
//! 1. **Explicit** -- a room that defines frame slots uses them verbatim.
//!    Each slot's bound artwork is looked up by id in the whole exhibition;
//!    an id that matches nothing leaves the slot empty.
//! 2. **Grid** -- a room without frame slots takes its page of the
//!    exhibition's flat artwork list. Room `i` receives the artworks at
//!    offsets `[i * page_size, min((i + 1) * page_size, total))`, laid out on
//!    the configured [`GridLayout`](crate::config::GridLayout).
//!
//! When a room defines slots *and* the exhibition has a flat list, the
//! explicit slots win; the flat list is ignored for that room.
//!
//! Slot ids are unique within a placement. A repeated authored id gets a
//! `#<n>` suffix so hover and clicks always reach the slot under the pointer.

use std::collections::HashSet;
use std::ops::Range;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::error::UnresolvedReference;
use crate::exhibition::{Artwork, Exhibition, FrameSlot};
use crate::id::{ArtworkId, FrameId, RoomIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    Explicit,
    Grid,
}

/// A resolved slot: where a frame hangs and what (if anything) it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlacement {
    pub frame: FrameId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: Vec2,
    /// Always an artwork present in the exhibition, or `None` for an empty slot.
    pub artwork: Option<ArtworkId>,
}

/// All slots of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlacement {
    pub room: RoomIndex,
    pub strategy: PlacementStrategy,
    pub slots: Vec<SlotPlacement>,
}

impl RoomPlacement {
    pub fn slot(&self, frame: &FrameId) -> Option<&SlotPlacement> {
        self.slots.iter().find(|s| &s.frame == frame)
    }

    /// Ids of the artworks shown in this room, in slot order.
    pub fn artworks(&self) -> impl Iterator<Item = &ArtworkId> {
        self.slots.iter().filter_map(|s| s.artwork.as_ref())
    }
}

/// Offsets of room `room`'s page within a list of `total` artworks.
///
/// Rooms past the end of the list get an empty range. A `page_size` of zero
/// is treated as one.
pub fn page_range(room: RoomIndex, page_size: usize, total: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = room.0.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Room `room`'s page of the flat artwork list.
pub fn fallback_page(artworks: &[Artwork], room: RoomIndex, page_size: usize) -> &[Artwork] {
    &artworks[page_range(room, page_size, artworks.len())]
}

/// Resolve a slot's bound artwork against the exhibition.
pub fn resolve_binding<'a>(
    exhibition: &'a Exhibition,
    room: RoomIndex,
    slot: &FrameSlot,
) -> Result<Option<&'a Artwork>, UnresolvedReference> {
    let Some(id) = slot.artwork.as_ref() else {
        return Ok(None);
    };
    exhibition
        .artwork(id)
        .map(Some)
        .ok_or_else(|| UnresolvedReference {
            room,
            frame: slot.id.clone(),
            artwork: id.clone(),
        })
}

/// Compute the slot layout for `room`.
pub fn place_room(exhibition: &Exhibition, config: &ViewerConfig, room: RoomIndex) -> RoomPlacement {
    match exhibition.room(room) {
        Some(r) if !r.frames.is_empty() => {
            let mut seen = HashSet::new();
            let slots = r
                .frames
                .iter()
                .map(|slot| {
                    let mut placed = explicit_slot(exhibition, room, slot);
                    placed.frame = unique_frame_id(&mut seen, placed.frame, room);
                    placed
                })
                .collect();
            RoomPlacement {
                room,
                strategy: PlacementStrategy::Explicit,
                slots,
            }
        }
        _ => grid_placement(exhibition, config, room),
    }
}

fn unique_frame_id(seen: &mut HashSet<FrameId>, frame: FrameId, room: RoomIndex) -> FrameId {
    if seen.insert(frame.clone()) {
        return frame;
    }
    let renamed = (2..)
        .map(|n| FrameId(format!("{frame}#{n}")))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| frame.clone());
    log::debug!("frame '{frame}' repeats in {room}; using '{renamed}'");
    seen.insert(renamed.clone());
    renamed
}

fn explicit_slot(exhibition: &Exhibition, room: RoomIndex, slot: &FrameSlot) -> SlotPlacement {
    let artwork = match resolve_binding(exhibition, room, slot) {
        Ok(found) => found.map(|a| a.id.clone()),
        Err(unresolved) => {
            log::debug!("{unresolved}; rendering empty slot");
            None
        }
    };
    SlotPlacement {
        frame: slot.id.clone(),
        position: slot.position,
        rotation: slot.rotation,
        size: slot.size,
        artwork,
    }
}

fn grid_placement(exhibition: &Exhibition, config: &ViewerConfig, room: RoomIndex) -> RoomPlacement {
    let grid = &config.grid;
    let slots = fallback_page(&exhibition.artworks, room, config.page_size)
        .iter()
        .enumerate()
        .map(|(k, art)| SlotPlacement {
            frame: FrameId(format!("grid-{}-{}", room.0, k)),
            position: grid.position(k),
            rotation: Vec3::ZERO,
            size: grid.frame_size,
            artwork: Some(art.id.clone()),
        })
        .collect();
    RoomPlacement {
        room,
        strategy: PlacementStrategy::Grid,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn ids(placement: &RoomPlacement) -> Vec<String> {
        placement.artworks().map(|id| id.0.clone()).collect()
    }

    #[test]
    fn page_range_slices_by_room() {
        assert_eq!(page_range(RoomIndex(0), 7, 21), 0..7);
        assert_eq!(page_range(RoomIndex(1), 7, 21), 7..14);
        assert_eq!(page_range(RoomIndex(2), 7, 21), 14..21);
        assert_eq!(page_range(RoomIndex(3), 7, 21), 21..21);
    }

    #[test]
    fn last_page_is_short() {
        assert_eq!(page_range(RoomIndex(1), 7, 10), 7..10);
        assert_eq!(page_range(RoomIndex(2), 7, 10), 10..10);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(page_range(RoomIndex(2), 0, 5), 2..3);
    }

    #[test]
    fn three_rooms_twenty_one_artworks() {
        let exhibition = exhibition_with_artworks(21, 3);
        let config = ViewerConfig::default();
        let expected: [Vec<String>; 3] = [
            (0..7).map(|i| format!("art-{i}")).collect(),
            (7..14).map(|i| format!("art-{i}")).collect(),
            (14..21).map(|i| format!("art-{i}")).collect(),
        ];
        for (room, want) in expected.iter().enumerate() {
            let placement = place_room(&exhibition, &config, RoomIndex(room));
            assert_eq!(placement.strategy, PlacementStrategy::Grid);
            assert_eq!(&ids(&placement), want);
        }
    }

    #[test]
    fn grid_slots_use_layout_and_unique_ids() {
        let exhibition = exhibition_with_artworks(9, 2);
        let config = ViewerConfig::default();
        let placement = place_room(&exhibition, &config, RoomIndex(1));
        assert_eq!(placement.slots.len(), 2);
        assert_eq!(placement.slots[0].frame, FrameId::new("grid-1-0"));
        assert_eq!(placement.slots[1].position, config.grid.position(1));
        assert_eq!(placement.slots[0].size, config.grid.frame_size);
    }

    #[test]
    fn explicit_slots_take_precedence() {
        let mut exhibition = exhibition_with_artworks(14, 2);
        exhibition.rooms[1].frames = vec![
            frame_slot("east-1", Some("art-2")),
            frame_slot("east-2", None),
        ];
        let placement = place_room(&exhibition, &ViewerConfig::default(), RoomIndex(1));
        assert_eq!(placement.strategy, PlacementStrategy::Explicit);
        assert_eq!(placement.slots.len(), 2);
        // art-2 belongs to room 0's page, but the explicit binding wins.
        assert_eq!(ids(&placement), vec!["art-2".to_string()]);
        assert_eq!(placement.slots[1].artwork, None);
    }

    #[test]
    fn explicit_slot_keeps_authored_transform() {
        let mut exhibition = exhibition_with_artworks(1, 1);
        let mut slot = frame_slot("north", Some("art-0"));
        slot.position = Vec3::new(1.5, 1.7, -3.9);
        slot.rotation = Vec3::new(0.0, 1.57, 0.0);
        slot.size = Vec2::new(0.8, 1.1);
        exhibition.rooms[0].frames = vec![slot.clone()];
        let placement = place_room(&exhibition, &ViewerConfig::default(), RoomIndex(0));
        let placed = placement.slot(&FrameId::new("north")).unwrap();
        assert_eq!(placed.position, slot.position);
        assert_eq!(placed.rotation, slot.rotation);
        assert_eq!(placed.size, slot.size);
    }

    #[test]
    fn repeated_frame_ids_are_made_unique() {
        let mut exhibition = exhibition_with_artworks(3, 1);
        exhibition.rooms[0].frames = vec![
            frame_slot("north", Some("art-0")),
            frame_slot("north", Some("art-2")),
            frame_slot("north#2", None),
        ];
        let placement = place_room(&exhibition, &ViewerConfig::default(), RoomIndex(0));
        let frames: Vec<_> = placement.slots.iter().map(|s| s.frame.0.as_str()).collect();
        assert_eq!(frames, ["north", "north#2", "north#2#2"]);
        assert_eq!(
            placement.slot(&FrameId::new("north#2")).unwrap().artwork,
            Some(ArtworkId::new("art-2"))
        );
    }

    #[test]
    fn frame_only_artworks_bind_but_never_page() {
        let mut exhibition = exhibition_with_artworks(7, 2);
        exhibition.frame_artworks.push(artwork(50));
        exhibition.rooms[0].frames = vec![frame_slot("f1", Some("art-50"))];
        let config = ViewerConfig::default();

        let explicit = place_room(&exhibition, &config, RoomIndex(0));
        assert_eq!(ids(&explicit), vec!["art-50".to_string()]);
        let grid = place_room(&exhibition, &config, RoomIndex(1));
        assert_eq!(grid.strategy, PlacementStrategy::Grid);
        assert!(grid.slots.is_empty());
    }

    #[test]
    fn unknown_reference_yields_empty_slot() {
        let mut exhibition = exhibition_with_artworks(3, 1);
        exhibition.rooms[0].frames = vec![frame_slot("f1", Some("does-not-exist"))];
        let placement = place_room(&exhibition, &ViewerConfig::default(), RoomIndex(0));
        assert_eq!(placement.slots.len(), 1);
        assert_eq!(placement.slots[0].artwork, None);

        let err = resolve_binding(&exhibition, RoomIndex(0), &exhibition.rooms[0].frames[0])
            .unwrap_err();
        assert_eq!(err.artwork, ArtworkId::new("does-not-exist"));
    }

    #[test]
    fn room_without_definition_uses_grid() {
        // No Room entries at all: every index falls back to the flat list.
        let exhibition = exhibition_with_artworks(10, 0);
        let placement = place_room(&exhibition, &ViewerConfig::default(), RoomIndex(1));
        assert_eq!(placement.strategy, PlacementStrategy::Grid);
        assert_eq!(ids(&placement).len(), 3);
    }
}
