//! Scene bounds from glTF 2.0 assets.
//!
//! Only the JSON part of an asset is read: every mesh primitive's POSITION
//! accessor carries `min`/`max`, which are transformed through the node
//! hierarchy of the default scene. Vertex buffers are never touched, so
//! bounds are cheap even for large scenes.
//!
//! Accepts binary GLB containers (`.glb`) and plain JSON (`.gltf`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gallery_core::error::AssetLoadError;
use gallery_core::scene::{Aabb, SceneGeometry, SceneLoader};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

// ===========================================================================
// glTF JSON subset
// ===========================================================================

#[derive(Debug, Default, Deserialize)]
struct GltfDoc {
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<GltfScene>,
    #[serde(default)]
    nodes: Vec<GltfNode>,
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    accessors: Vec<GltfAccessor>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfScene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfNode {
    #[serde(default)]
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    #[serde(default)]
    matrix: Option<[f32; 16]>,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

impl GltfNode {
    fn local_transform(&self) -> Mat4 {
        if let Some(matrix) = self.matrix {
            return Mat4::from_cols_array(&matrix);
        }
        Mat4::from_scale_rotation_translation(
            self.scale.map(Vec3::from_array).unwrap_or(Vec3::ONE),
            self.rotation.map(Quat::from_array).unwrap_or(Quat::IDENTITY),
            self.translation.map(Vec3::from_array).unwrap_or(Vec3::ZERO),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct GltfMesh {
    #[serde(default)]
    primitives: Vec<GltfPrimitive>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfPrimitive {
    #[serde(default)]
    attributes: HashMap<String, usize>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfAccessor {
    #[serde(default)]
    min: Option<Vec<f32>>,
    #[serde(default)]
    max: Option<Vec<f32>>,
}

impl GltfAccessor {
    fn bounds(&self) -> Option<Aabb> {
        let min = self.min.as_deref()?;
        let max = self.max.as_deref()?;
        if min.len() != 3 || max.len() != 3 {
            return None;
        }
        Some(Aabb::new(
            Vec3::new(min[0], min[1], min[2]),
            Vec3::new(max[0], max[1], max[2]),
        ))
    }
}

// ===========================================================================
// Parsing
// ===========================================================================

fn malformed(address: &str, detail: impl Into<String>) -> AssetLoadError {
    AssetLoadError::Malformed {
        address: address.to_string(),
        detail: detail.into(),
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let chunk = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Extract the JSON chunk of a GLB container.
pub fn glb_json_chunk<'a>(bytes: &'a [u8], address: &str) -> Result<&'a [u8], AssetLoadError> {
    if read_u32(bytes, 0) != Some(GLB_MAGIC) {
        return Err(malformed(address, "not a GLB container"));
    }
    let version = read_u32(bytes, 4).unwrap_or(0);
    if version != 2 {
        return Err(AssetLoadError::Unsupported {
            address: address.to_string(),
            detail: format!("GLB version {version}"),
        });
    }
    let chunk_len = read_u32(bytes, GLB_HEADER_LEN)
        .ok_or_else(|| malformed(address, "truncated chunk header"))? as usize;
    if read_u32(bytes, GLB_HEADER_LEN + 4) != Some(CHUNK_JSON) {
        return Err(malformed(address, "first chunk is not JSON"));
    }
    let start = GLB_HEADER_LEN + CHUNK_HEADER_LEN;
    bytes
        .get(start..start + chunk_len)
        .ok_or_else(|| malformed(address, "truncated JSON chunk"))
}

/// Scene geometry from glTF JSON bytes.
pub fn gltf_geometry(json: &[u8], address: &str) -> Result<SceneGeometry, AssetLoadError> {
    let doc: GltfDoc =
        serde_json::from_slice(json).map_err(|e| malformed(address, e.to_string()))?;

    let roots: Vec<usize> = match doc.scenes.get(doc.scene.unwrap_or(0)) {
        Some(scene) => scene.nodes.clone(),
        None => root_nodes(&doc),
    };
    check_single_parents(&doc, address)?;

    let mut bounds = Aabb::empty();
    let mut mesh_count = 0;
    // With at most one parent per node, a revisit can only come from a cycle
    // or a root listed twice; either way each node is walked once.
    let mut visited = vec![false; doc.nodes.len()];
    let mut stack: Vec<(usize, Mat4)> = roots.into_iter().map(|n| (n, Mat4::IDENTITY)).collect();

    while let Some((index, parent)) = stack.pop() {
        match visited.get_mut(index) {
            Some(true) => {
                return Err(malformed(address, format!("node {index} is reached twice")));
            }
            Some(seen) => *seen = true,
            None => return Err(malformed(address, format!("node {index} out of range"))),
        }
        let node = &doc.nodes[index];
        let world = parent * node.local_transform();

        if let Some(mesh_index) = node.mesh {
            let mesh = doc
                .meshes
                .get(mesh_index)
                .ok_or_else(|| malformed(address, format!("mesh {mesh_index} out of range")))?;
            mesh_count += 1;
            for primitive in &mesh.primitives {
                let Some(&accessor) = primitive.attributes.get("POSITION") else {
                    continue;
                };
                let local = doc
                    .accessors
                    .get(accessor)
                    .and_then(GltfAccessor::bounds)
                    .ok_or_else(|| {
                        malformed(address, format!("accessor {accessor} has no bounds"))
                    })?;
                bounds = bounds.union(local.transformed(&world));
            }
        }

        stack.extend(node.children.iter().map(|&c| (c, world)));
    }

    Ok(SceneGeometry { bounds, mesh_count })
}

/// A node hierarchy is a forest: no node may be the child of two parents.
fn check_single_parents(doc: &GltfDoc, address: &str) -> Result<(), AssetLoadError> {
    let mut has_parent = vec![false; doc.nodes.len()];
    for (parent, node) in doc.nodes.iter().enumerate() {
        for &child in &node.children {
            match has_parent.get_mut(child) {
                Some(true) => {
                    return Err(malformed(
                        address,
                        format!("node {child} has more than one parent (second is {parent})"),
                    ));
                }
                Some(flag) => *flag = true,
                None => return Err(malformed(address, format!("node {child} out of range"))),
            }
        }
    }
    Ok(())
}

/// Nodes that are nobody's child, for assets without a scene list.
fn root_nodes(doc: &GltfDoc) -> Vec<usize> {
    let mut is_child = vec![false; doc.nodes.len()];
    for node in &doc.nodes {
        for &child in &node.children {
            if let Some(flag) = is_child.get_mut(child) {
                *flag = true;
            }
        }
    }
    (0..doc.nodes.len()).filter(|&i| !is_child[i]).collect()
}

/// Scene geometry from file contents, by extension.
pub fn scene_geometry(bytes: &[u8], path: &Path, address: &str) -> Result<SceneGeometry, AssetLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("glb") => gltf_geometry(glb_json_chunk(bytes, address)?, address),
        Some("gltf") => gltf_geometry(bytes, address),
        _ => Err(AssetLoadError::Unsupported {
            address: address.to_string(),
            detail: "expected a .glb or .gltf scene".to_string(),
        }),
    }
}

// ===========================================================================
// Loader
// ===========================================================================

/// Reads scene assets from a directory.
#[derive(Debug, Clone)]
pub struct FsSceneLoader {
    root: PathBuf,
}

impl FsSceneLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SceneLoader for FsSceneLoader {
    fn load(&self, address: &str) -> Result<SceneGeometry, AssetLoadError> {
        if address.starts_with("http://") || address.starts_with("https://") {
            return Err(AssetLoadError::Unsupported {
                address: address.to_string(),
                detail: "remote scenes are not read from disk".to_string(),
            });
        }
        let path = self.root.join(address);
        let bytes = std::fs::read(&path).map_err(|e| AssetLoadError::from_io(address, &e))?;
        let geometry = scene_geometry(&bytes, &path, address)?;
        log::debug!(
            "read {address}: {} meshes, bounds {:?}",
            geometry.mesh_count,
            geometry.bounds
        );
        Ok(geometry)
    }
}
