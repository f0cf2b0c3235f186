//! Image reference parsing and URL resolvers.
//!
//! Content-store image assets are referenced as `image-<hash>-<W>x<H>-<ext>`.

use std::path::PathBuf;

use gallery_core::error::AssetLoadError;
use gallery_core::id::ImageRef;
use gallery_core::image::{ImageLoader, ImageResolver, LoadedImage};

pub const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// The parts of an image asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImageRef<'a> {
    pub hash: &'a str,
    pub width: u32,
    pub height: u32,
    pub extension: &'a str,
}

/// Parse `image-<hash>-<W>x<H>-<ext>`. Returns `None` for anything else.
pub fn parse_image_ref(reference: &str) -> Option<ParsedImageRef<'_>> {
    let rest = reference.strip_prefix("image-")?;
    let mut parts = rest.rsplitn(3, '-');
    let extension = parts.next()?;
    let dimensions = parts.next()?;
    let hash = parts.next()?;
    let (w, h) = dimensions.split_once('x')?;
    if hash.is_empty() || extension.is_empty() {
        return None;
    }
    Some(ParsedImageRef {
        hash,
        width: w.parse().ok()?,
        height: h.parse().ok()?,
        extension,
    })
}

/// Resolves references against the content store's image CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnImageResolver {
    base: String,
    project_id: String,
    dataset: String,
}

impl CdnImageResolver {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            base: CDN_BASE.to_string(),
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Use a different CDN host, e.g. a local mirror.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

impl ImageResolver for CdnImageResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        let Some(parsed) = parse_image_ref(image.as_str()) else {
            log::debug!("cannot resolve image reference '{image}'");
            return None;
        };
        Some(format!(
            "{}/{}/{}/{}-{}x{}.{}?w={width}&h={height}",
            self.base,
            self.project_id,
            self.dataset,
            parsed.hash,
            parsed.width,
            parsed.height,
            parsed.extension,
        ))
    }
}

/// Resolves references to pre-rendered files laid out as
/// `<root>/<w>x<h>/<hash>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImageResolver {
    root: PathBuf,
}

impl LocalImageResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageResolver for LocalImageResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        let parsed = parse_image_ref(image.as_str())?;
        let path = self
            .root
            .join(format!("{width}x{height}"))
            .join(format!("{}.{}", parsed.hash, parsed.extension));
        Some(path.to_string_lossy().into_owned())
    }
}

/// Loads images from the local filesystem; the URL is a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, AssetLoadError> {
        let metadata = std::fs::metadata(url).map_err(|e| AssetLoadError::from_io(url, &e))?;
        if metadata.len() == 0 {
            return Err(AssetLoadError::Malformed {
                address: url.to_string(),
                detail: "empty file".to_string(),
            });
        }
        Ok(LoadedImage {
            url: url.to_string(),
        })
    }
}
