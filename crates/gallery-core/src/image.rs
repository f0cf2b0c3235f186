//! Artwork image variants and URL resolution.
//!
//! Each artwork has two independent image assets: a small texture for the
//! in-scene frame and a large image for the detail overlay. They share the
//! artwork id but live under different [`ImageKey`]s, so neither load ever
//! waits on the other.

use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::error::AssetLoadError;
use crate::exhibition::Artwork;
use crate::id::{ArtworkId, ImageRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageVariant {
    /// Low resolution, mapped onto the frame in the scene.
    Texture,
    /// High resolution, shown only in the detail overlay.
    Detail,
}

impl ImageVariant {
    /// Requested edge length in pixels.
    pub fn edge(self, config: &ViewerConfig) -> u32 {
        match self {
            ImageVariant::Texture => config.texture_size,
            ImageVariant::Detail => config.detail_size,
        }
    }
}

/// Cache key for one image variant of one artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageKey {
    pub artwork: ArtworkId,
    pub variant: ImageVariant,
}

impl ImageKey {
    pub fn texture(artwork: ArtworkId) -> Self {
        Self {
            artwork,
            variant: ImageVariant::Texture,
        }
    }

    pub fn detail(artwork: ArtworkId) -> Self {
        Self {
            artwork,
            variant: ImageVariant::Detail,
        }
    }
}

/// Maps an image asset reference and target size to a fetchable URL.
///
/// Returns `None` when the reference cannot be resolved; the slot then shows
/// a placeholder.
pub trait ImageResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String>;
}

impl<T: ImageResolver + ?Sized> ImageResolver for &T {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        (**self).resolve(image, width, height)
    }
}

impl<T: ImageResolver + ?Sized> ImageResolver for Box<T> {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        (**self).resolve(image, width, height)
    }
}

impl<T: ImageResolver + ?Sized> ImageResolver for std::sync::Arc<T> {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        (**self).resolve(image, width, height)
    }
}

/// An image the host has finished fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub url: String,
}

/// Fetches an image by URL. Used by headless hosts; renderers usually report
/// completions from their own asset pipeline instead.
pub trait ImageLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, AssetLoadError>;
}

impl<T: ImageLoader + ?Sized> ImageLoader for &T {
    fn load(&self, url: &str) -> Result<LoadedImage, AssetLoadError> {
        (**self).load(url)
    }
}

/// URL for one variant of an artwork's image, if it has a resolvable one.
pub fn image_url(
    resolver: &impl ImageResolver,
    artwork: &Artwork,
    variant: ImageVariant,
    config: &ViewerConfig,
) -> Option<String> {
    let image = artwork.image.as_ref()?;
    let edge = variant.edge(config);
    resolver.resolve(image, edge, edge)
}

/// What a frame shows for its image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageState {
    /// No image can be shown: no artwork, no asset, or the load failed.
    Placeholder,
    /// The URL is known and the fetch has not completed.
    Loading { url: String },
    Ready { url: String },
}

impl ImageState {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageState::Placeholder => None,
            ImageState::Loading { url } | ImageState::Ready { url } => Some(url),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ImageState::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn variants_request_distinct_sizes() {
        let resolver = SizedResolver;
        let config = ViewerConfig::default();
        let art = artwork(1);
        let small = image_url(&resolver, &art, ImageVariant::Texture, &config).unwrap();
        let large = image_url(&resolver, &art, ImageVariant::Detail, &config).unwrap();
        assert!(small.ends_with("w=512&h=512"));
        assert!(large.ends_with("w=1200&h=1200"));
        assert_ne!(small, large);
    }

    #[test]
    fn artwork_without_image_has_no_url() {
        let mut art = artwork(1);
        art.image = None;
        let url = image_url(&SizedResolver, &art, ImageVariant::Texture, &ViewerConfig::default());
        assert!(url.is_none());
    }

    #[test]
    fn keys_for_same_artwork_differ_by_variant() {
        let id = ArtworkId::new("a");
        assert_ne!(ImageKey::texture(id.clone()), ImageKey::detail(id));
    }

    #[test]
    fn image_state_url() {
        assert_eq!(ImageState::Placeholder.url(), None);
        let loading = ImageState::Loading { url: "u".into() };
        assert_eq!(loading.url(), Some("u"));
        assert!(!loading.is_ready());
        assert!(ImageState::Ready { url: "u".into() }.is_ready());
    }
}
