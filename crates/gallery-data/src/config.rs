//! Viewer and image-source configuration files.
//!
//! Both files are optional. A content directory may contain
//! `viewer.{ron,json,toml}` (a [`ViewerConfig`]) and
//! `images.{ron,json,toml}` (an [`ImageSource`]); missing files fall back
//! to defaults.

use std::path::{Path, PathBuf};

use gallery_core::config::ViewerConfig;
use gallery_core::exhibition::Exhibition;
use gallery_core::image::ImageResolver;
use gallery_core::id::ImageRef;
use serde::{Deserialize, Serialize};

use crate::image_url::{CdnImageResolver, LocalImageResolver};
use crate::loader::{DataLoadError, load_exhibition, locate, read_content};

/// Where artwork images are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// The content store's image CDN.
    Cdn { project_id: String, dataset: String },
    /// Pre-rendered files under a directory, relative to the content dir.
    Local { root: PathBuf },
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Local {
            root: PathBuf::from("images"),
        }
    }
}

impl ImageSource {
    /// Build the resolver for this source. Relative local roots are taken
    /// relative to `content_dir`.
    pub fn resolver(&self, content_dir: &Path) -> SourceResolver {
        match self {
            ImageSource::Cdn {
                project_id,
                dataset,
            } => SourceResolver::Cdn(CdnImageResolver::new(project_id, dataset)),
            ImageSource::Local { root } => {
                SourceResolver::Local(LocalImageResolver::new(content_dir.join(root)))
            }
        }
    }
}

/// Resolver for whichever [`ImageSource`] is configured.
#[derive(Debug, Clone)]
pub enum SourceResolver {
    Cdn(CdnImageResolver),
    Local(LocalImageResolver),
}

impl ImageResolver for SourceResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        match self {
            SourceResolver::Cdn(r) => r.resolve(image, width, height),
            SourceResolver::Local(r) => r.resolve(image, width, height),
        }
    }
}

/// Load `viewer.*` from `dir`, or defaults if there is none.
pub fn load_viewer_config(dir: &Path) -> Result<ViewerConfig, DataLoadError> {
    match locate(dir, "viewer")? {
        Some(path) => {
            log::info!("viewer config from {}", path.display());
            read_content(&path)
        }
        None => {
            log::info!("no viewer config in {}, using defaults", dir.display());
            Ok(ViewerConfig::default())
        }
    }
}

/// Load `images.*` from `dir`, or the default local source.
pub fn load_image_source(dir: &Path) -> Result<ImageSource, DataLoadError> {
    match locate(dir, "images")? {
        Some(path) => read_content(&path),
        None => Ok(ImageSource::default()),
    }
}

/// Everything a session needs from a content directory.
#[derive(Debug, Clone)]
pub struct Gallery {
    pub dir: PathBuf,
    pub exhibition: Exhibition,
    pub config: ViewerConfig,
    pub images: ImageSource,
}

impl Gallery {
    pub fn resolver(&self) -> SourceResolver {
        self.images.resolver(&self.dir)
    }

    /// Filesystem path of a scene address, for addresses that are not URLs.
    pub fn scene_path(&self, address: &str) -> PathBuf {
        self.dir.join(address)
    }
}

/// Load the exhibition and both config files from `dir`.
pub fn load_gallery(dir: impl Into<PathBuf>) -> Result<Gallery, DataLoadError> {
    let dir = dir.into();
    let exhibition = load_exhibition(&dir)?;
    let config = load_viewer_config(&dir)?;
    let images = load_image_source(&dir)?;
    Ok(Gallery {
        dir,
        exhibition,
        config,
        images,
    })
}
