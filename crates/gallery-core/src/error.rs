use crate::id::{ArtworkId, FrameId, RoomIndex};

/// A room scene or image asset could not be loaded.
///
/// Always recoverable: the affected room renders without a scene and the
/// affected slot renders a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetLoadError {
    /// Nothing exists at the asset address.
    #[error("asset '{address}' not found")]
    Missing { address: String },

    /// The asset exists but could not be parsed.
    #[error("asset '{address}' is malformed: {detail}")]
    Malformed { address: String, detail: String },

    /// The asset uses a container or version we cannot read.
    #[error("asset '{address}' has unsupported format: {detail}")]
    Unsupported { address: String, detail: String },

    /// Reading the asset failed for some other reason.
    #[error("failed to read asset '{address}': {detail}")]
    Io { address: String, detail: String },
}

impl AssetLoadError {
    /// The address of the asset that failed.
    pub fn address(&self) -> &str {
        match self {
            AssetLoadError::Missing { address }
            | AssetLoadError::Malformed { address, .. }
            | AssetLoadError::Unsupported { address, .. }
            | AssetLoadError::Io { address, .. } => address,
        }
    }

    /// Classify an I/O error, mapping `NotFound` to [`AssetLoadError::Missing`].
    pub fn from_io(address: impl Into<String>, err: &std::io::Error) -> Self {
        let address = address.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            AssetLoadError::Missing { address }
        } else {
            AssetLoadError::Io {
                address,
                detail: err.to_string(),
            }
        }
    }
}

/// A frame slot is bound to an artwork id that the exhibition does not contain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("frame '{frame}' in {room} references unknown artwork '{artwork}'")]
pub struct UnresolvedReference {
    pub room: RoomIndex,
    pub frame: FrameId,
    pub artwork: ArtworkId,
}
