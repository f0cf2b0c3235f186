//! Gallery Core -- the headless model of a virtual exhibition walkthrough.
//!
//! This crate owns everything about a walkthrough that does not depend on a
//! renderer: the exhibition model, cyclic room navigation, scene
//! normalization, frame placement, hover and selection, the detail overlay,
//! and the write-once asset caches that tie them together.
//!
//! # Room Transition Pipeline
//!
//! Each call to [`viewer::Viewer::navigate`] moves to a new room in three
//! steps:
//!
//! 1. **Scene** -- Reuse the cached scene or queue a load request for it.
//! 2. **Placement** -- Compute the room's slots (explicit frames or the
//!    paginated grid) and queue texture loads for the artworks shown.
//! 3. **Hover** -- Drop any hover that belonged to the previous room.
//!
//! # Load Completion Pattern
//!
//! The core never performs I/O. Loads are queued and completed by the host:
//!
//! ```rust,ignore
//! for request in viewer.take_requests() {
//!     match request {
//!         LoadRequest::Scene { room, address } => {
//!             viewer.complete_scene(room, loader.load(&address));
//!         }
//!         LoadRequest::Image { key, url } => {
//!             viewer.complete_image(key, images.load(&url));
//!         }
//!     }
//! }
//! ```
//!
//! # Key Types
//!
//! - [`viewer::Viewer`] -- Session orchestrator and the only mutable state.
//! - [`exhibition::Exhibition`] -- Immutable, fully resolved content.
//! - [`navigation::Navigator`] -- Cyclic room cursor.
//! - [`placement::RoomPlacement`] -- Which artwork hangs where.
//! - [`scene::SceneHandle`] -- A loaded room scene plus its floor offset.
//! - [`cache::AssetCache`] -- Write-once cache shared by scenes and images.
//! - [`view::RoomView`] -- Everything a renderer needs for one frame.

pub mod cache;
pub mod config;
pub mod error;
pub mod exhibition;
pub mod id;
pub mod image;
pub mod interaction;
pub mod modal;
pub mod navigation;
pub mod placement;
pub mod scene;
pub mod view;
pub mod viewer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
