//! Gallery Data -- content, configuration and asset loading for the
//! walkthrough.
//!
//! Reads exhibition documents and viewer settings from RON, JSON or TOML
//! files, resolves artwork image references to URLs, reads scene bounds from
//! glTF/GLB files, and runs scene loads on a background worker.

pub mod config;
pub mod glb;
pub mod image_url;
pub mod loader;
pub mod schema;
pub mod worker;

pub use config::{Gallery, ImageSource, load_gallery, load_viewer_config};
pub use loader::{DataLoadError, load_exhibition};
