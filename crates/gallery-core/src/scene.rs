//! Scene composition: resolving a room's 3D scene and normalizing it into
//! the shared room frame.
//!
//! Every room scene is shifted so that its horizontal centre sits on the
//! origin and its lowest point rests on the floor plane `y = 0`. The shift is
//! computed from the asset's raw bounding box, so composing the same asset
//! twice always yields the same placement.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::error::AssetLoadError;
use crate::exhibition::Exhibition;
use crate::id::RoomIndex;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A box containing nothing; the identity for [`Aabb::union`].
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Bounds of this box after an affine transform (all eight corners).
    pub fn transformed(&self, transform: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Aabb::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.extend(transform.transform_point3(corner));
        }
        out
    }
}

/// Raw geometry summary of a loaded scene asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneGeometry {
    pub bounds: Aabb,
    pub mesh_count: usize,
}

/// Translation that puts a scene's horizontal centre at the origin and its
/// floor at `y = 0`. Scenes without geometry are left in place.
pub fn normalization_offset(bounds: &Aabb) -> Vec3 {
    if bounds.is_empty() {
        return Vec3::ZERO;
    }
    let center = bounds.center();
    Vec3::new(-center.x, -bounds.min.y, -center.z)
}

/// A loaded, normalized room scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHandle {
    pub room: RoomIndex,
    pub address: String,
    /// Bounds of the raw asset, before normalization.
    pub bounds: Aabb,
    pub mesh_count: usize,
    /// Translation renderers apply to the scene root.
    pub offset: Vec3,
}

impl SceneHandle {
    pub fn compose(room: RoomIndex, address: impl Into<String>, geometry: SceneGeometry) -> Self {
        Self {
            room,
            address: address.into(),
            bounds: geometry.bounds,
            mesh_count: geometry.mesh_count,
            offset: normalization_offset(&geometry.bounds),
        }
    }

    /// Bounds after the normalization offset is applied.
    pub fn normalized_bounds(&self) -> Aabb {
        if self.bounds.is_empty() {
            return self.bounds;
        }
        self.bounds.translated(self.offset)
    }
}

/// Loads a scene asset and reports its geometry.
///
/// Implementations may block; the viewer never calls them directly, hosts
/// run them wherever loading belongs (worker thread, task pool, or inline in
/// headless tools).
pub trait SceneLoader {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError>;
}

impl<T: SceneLoader + ?Sized> SceneLoader for &T {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError> {
        (**self).load(address)
    }
}

impl<T: SceneLoader + ?Sized> SceneLoader for Box<T> {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError> {
        (**self).load(address)
    }
}

impl<T: SceneLoader + ?Sized> SceneLoader for std::sync::Arc<T> {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError> {
        (**self).load(address)
    }
}

/// Address of a room's scene: the room's own reference when it has one,
/// otherwise the index-based naming convention.
pub fn scene_address(exhibition: &Exhibition, config: &ViewerConfig, room: RoomIndex) -> String {
    exhibition
        .room(room)
        .and_then(|r| r.scene.clone())
        .unwrap_or_else(|| config.scene_address(room))
}

/// Load and normalize one room's scene.
pub fn load_room(
    loader: &impl SceneLoader,
    exhibition: &Exhibition,
    config: &ViewerConfig,
    room: RoomIndex,
) -> Result<SceneHandle, AssetLoadError> {
    let address = scene_address(exhibition, config, room);
    let geometry = loader.load(&address)?;
    Ok(SceneHandle::compose(room, address, geometry))
}
