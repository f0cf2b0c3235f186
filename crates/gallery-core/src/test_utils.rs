//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so other crates
//! in the workspace can build fixtures through the `test-utils` feature.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};

use crate::error::AssetLoadError;
use crate::exhibition::{Artwork, ArtworkDetail, DateRange, Exhibition, FrameSlot, Room};
use crate::id::{ArtworkId, FrameId, ImageRef};
use crate::image::{ImageLoader, ImageResolver, LoadedImage};
use crate::scene::{Aabb, SceneGeometry, SceneLoader};

// ===========================================================================
// Content constructors
// ===========================================================================

/// Artwork `i`: id `art-i`, title `Work i`, by `Artist i`.
pub fn artwork(i: usize) -> Artwork {
    Artwork {
        id: ArtworkId(format!("art-{i}")),
        title: format!("Work {i}"),
        artist: format!("Artist {i}"),
        year: 1900 + i as i32,
        medium: "Oil on canvas".to_string(),
        description: None,
        image: Some(ImageRef(format!("image-hash{i}-800x600-jpg"))),
        frame_hint: None,
    }
}

/// An exhibition with `artworks` artworks in one flat list and `rooms`
/// rooms that define no frames of their own.
pub fn exhibition_with_artworks(artworks: usize, rooms: usize) -> Exhibition {
    Exhibition {
        id: "exhibition-test".to_string(),
        title: "Test Exhibition".to_string(),
        slug: Some("test-exhibition".to_string()),
        description: None,
        dates: DateRange {
            start: "2026-01-01".to_string(),
            end: "2026-12-31".to_string(),
        },
        is_active: true,
        cover_image: None,
        artworks: (0..artworks).map(artwork).collect(),
        frame_artworks: Vec::new(),
        rooms: (1..=rooms)
            .map(|k| Room {
                name: format!("Room {k}"),
                ..Room::default()
            })
            .collect(),
    }
}

/// A frame slot at the origin, optionally bound to an artwork id.
pub fn frame_slot(id: &str, artwork: Option<&str>) -> FrameSlot {
    FrameSlot {
        id: FrameId::new(id),
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        size: Vec2::new(1.2, 1.2),
        artwork: artwork.map(ArtworkId::new),
    }
}

/// Detail snapshot of [`artwork`]`(n)`.
pub fn detail(n: usize) -> ArtworkDetail {
    ArtworkDetail::from_artwork(&artwork(n), Some(format!("https://img.test/{n}-large")))
}

/// Geometry of a unit cube resting on the floor.
pub fn unit_geometry() -> SceneGeometry {
    SceneGeometry {
        bounds: Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5)),
        mesh_count: 1,
    }
}

// ===========================================================================
// Resolvers and loaders
// ===========================================================================

/// Resolves every reference to `https://img.test/{ref}?w={w}&h={h}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizedResolver;

impl ImageResolver for SizedResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        Some(format!("https://img.test/{image}?w={width}&h={height}"))
    }
}

/// In-memory scene store. Unknown addresses fail with `Missing`.
#[derive(Debug, Clone, Default)]
pub struct StubSceneLoader {
    scenes: HashMap<String, SceneGeometry>,
}

impl StubSceneLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, address: &str, min: Vec3, max: Vec3) -> Self {
        self.scenes.insert(
            address.to_string(),
            SceneGeometry {
                bounds: Aabb::new(min, max),
                mesh_count: 1,
            },
        );
        self
    }

    pub fn with_unit(mut self, address: &str) -> Self {
        self.scenes.insert(address.to_string(), unit_geometry());
        self
    }
}

impl SceneLoader for StubSceneLoader {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError> {
        self.scenes
            .get(address)
            .copied()
            .ok_or_else(|| AssetLoadError::Missing {
                address: address.to_string(),
            })
    }
}

/// Succeeds for every URL except those listed as failing.
#[derive(Debug, Clone, Default)]
pub struct StubImageLoader {
    failing: HashSet<String>,
}

impl StubImageLoader {
    pub fn failing(urls: impl IntoIterator<Item = String>) -> Self {
        Self {
            failing: urls.into_iter().collect(),
        }
    }
}

impl ImageLoader for StubImageLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, AssetLoadError> {
        if self.failing.contains(url) {
            return Err(AssetLoadError::Missing {
                address: url.to_string(),
            });
        }
        Ok(LoadedImage {
            url: url.to_string(),
        })
    }
}
