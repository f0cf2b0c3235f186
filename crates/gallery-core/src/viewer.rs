//! Viewer session: wires navigation, scene composition, placement, hover and
//! the detail overlay into one event-driven state machine.
//!
//! # Event model
//!
//! The viewer is single-threaded and never blocks. Inputs (navigation,
//! pointer, clicks, load completions) are applied one at a time. Whenever a
//! scene or image is needed and not yet cached, the viewer queues a
//! [`LoadRequest`]; the host drains the queue with [`Viewer::take_requests`],
//! performs the loads wherever it likes, and reports results back through
//! [`Viewer::complete_scene`] and [`Viewer::complete_image`].
//!
//! ```rust,ignore
//! let mut viewer = Viewer::new(exhibition, ViewerConfig::default(), resolver);
//! viewer.pump(&scene_loader, &image_loader);
//! viewer.next();
//! let view = viewer.view();
//! ```
//!
//! # Room transitions
//!
//! Every navigation runs, in order: scene resolution for the new room (cache
//! hit or load request), placement for that room (plus texture requests),
//! and clearing of any hover left over from the previous room.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::cache::{AssetCache, CacheEntry, Completion};
use crate::config::ViewerConfig;
use crate::error::AssetLoadError;
use crate::exhibition::{ArtworkDetail, Exhibition};
use crate::id::{FrameId, RoomIndex};
use crate::image::{
    ImageKey, ImageLoader, ImageResolver, ImageState, ImageVariant, LoadedImage, image_url,
};
use crate::interaction::{HoverState, PointerEvent, Selection, hover_label, select};
use crate::modal::{ModalAction, ModalClick, ModalState};
use crate::navigation::{NavAction, Navigator};
use crate::placement::{RoomPlacement, place_room};
use crate::scene::{SceneGeometry, SceneHandle, SceneLoader, scene_address};
use crate::view::{ModalView, RoomView, SceneView, SlotView};

/// An asset the host must load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Scene { room: RoomIndex, address: String },
    Image { key: ImageKey, url: String },
}

pub struct Viewer<R> {
    exhibition: Arc<Exhibition>,
    config: ViewerConfig,
    resolver: R,
    navigator: Navigator,
    placement: RoomPlacement,
    hover: HoverState,
    modal: ModalState,
    scenes: AssetCache<RoomIndex, SceneHandle>,
    images: AssetCache<ImageKey, LoadedImage>,
    requests: VecDeque<LoadRequest>,
}

impl<R: ImageResolver> Viewer<R> {
    /// Start a session on the first room. Queues the first room's scene and
    /// textures, then (if configured) every other room's scene.
    pub fn new(exhibition: Arc<Exhibition>, config: ViewerConfig, resolver: R) -> Self {
        let count = if exhibition.rooms.is_empty() {
            config.fallback_room_count
        } else {
            exhibition.rooms.len()
        };
        let room_count = NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN);
        let navigator = Navigator::new(room_count);
        let placement = place_room(&exhibition, &config, navigator.current());

        log::info!(
            "viewing '{}': {} rooms, {} artworks",
            exhibition.title,
            room_count,
            exhibition.artworks.len()
        );

        let mut viewer = Self {
            exhibition,
            config,
            resolver,
            navigator,
            placement,
            hover: HoverState::Idle,
            modal: ModalState::Closed,
            scenes: AssetCache::new(),
            images: AssetCache::new(),
            requests: VecDeque::new(),
        };
        viewer.enter_room(viewer.navigator.current());
        if viewer.config.preload_rooms {
            viewer.preload_all();
        }
        viewer
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn exhibition(&self) -> &Exhibition {
        &self.exhibition
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn current_room(&self) -> RoomIndex {
        self.navigator.current()
    }

    pub fn room_count(&self) -> usize {
        self.navigator.room_count()
    }

    pub fn placement(&self) -> &RoomPlacement {
        &self.placement
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn scene_entry(&self, room: RoomIndex) -> Option<&CacheEntry<SceneHandle>> {
        self.scenes.get(&room)
    }

    /// Number of scene and image loads still outstanding.
    pub fn pending_loads(&self) -> usize {
        self.scenes.pending_count() + self.images.pending_count()
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn navigate(&mut self, action: NavAction) -> RoomIndex {
        self.navigator = self.navigator.reduce(action);
        let room = self.navigator.current();
        self.enter_room(room);
        room
    }

    pub fn next(&mut self) -> RoomIndex {
        self.navigate(NavAction::Next)
    }

    pub fn prev(&mut self) -> RoomIndex {
        self.navigate(NavAction::Prev)
    }

    pub fn goto(&mut self, room: usize) -> RoomIndex {
        self.navigate(NavAction::Goto(room))
    }

    /// Queue scene loads for every room not yet requested, in index order.
    pub fn preload_all(&mut self) {
        for i in 0..self.room_count() {
            self.request_scene(RoomIndex(i));
        }
    }

    fn enter_room(&mut self, room: RoomIndex) {
        log::info!("entering {room}");
        self.request_scene(room);
        self.placement = place_room(&self.exhibition, &self.config, room);
        self.request_textures();
        self.hover = std::mem::take(&mut self.hover).reduce(PointerEvent::Clear);
    }

    fn request_scene(&mut self, room: RoomIndex) {
        if self.scenes.request(room) {
            let address = scene_address(&self.exhibition, &self.config, room);
            self.requests.push_back(LoadRequest::Scene { room, address });
        }
    }

    fn request_textures(&mut self) {
        for id in self.placement.artworks().cloned().collect::<Vec<_>>() {
            self.request_image(ImageKey::texture(id));
        }
    }

    fn request_image(&mut self, key: ImageKey) {
        let Some(url) = self.image_url(&key) else {
            return;
        };
        if self.images.request(key.clone()) {
            self.requests.push_back(LoadRequest::Image { key, url });
        }
    }

    fn image_url(&self, key: &ImageKey) -> Option<String> {
        let artwork = self.exhibition.artwork(&key.artwork)?;
        image_url(&self.resolver, artwork, key.variant, &self.config)
    }

    // -----------------------------------------------------------------------
    // Pointer and overlay
    // -----------------------------------------------------------------------

    /// Apply a pointer event. Entering a frame that is not part of the
    /// current room (a stale event from the previous room) is ignored.
    pub fn pointer(&mut self, event: PointerEvent) {
        if let PointerEvent::Enter(frame) = &event {
            if self.placement.slot(frame).is_none() {
                log::debug!("ignoring hover on frame '{frame}' outside the current room");
                return;
            }
        }
        self.hover = std::mem::take(&mut self.hover).reduce(event);
    }

    /// Click a frame. Opens (or replaces) the detail overlay when the frame
    /// holds an artwork; empty frames are a no-op.
    pub fn click(&mut self, frame: &FrameId) -> Option<Selection> {
        let selection = select(
            frame,
            &self.placement,
            &self.exhibition,
            &self.resolver,
            &self.config,
        )?;
        self.request_image(ImageKey::detail(selection.detail.artwork.clone()));
        self.open_detail(selection.detail.clone());
        Some(selection)
    }

    pub fn open_detail(&mut self, detail: ArtworkDetail) {
        self.modal = std::mem::take(&mut self.modal).reduce(ModalAction::Open(detail));
    }

    pub fn close_detail(&mut self) {
        self.modal = std::mem::take(&mut self.modal).reduce(ModalAction::Close);
    }

    pub fn modal_click(&mut self, target: ModalClick) {
        self.modal = std::mem::take(&mut self.modal).reduce(ModalAction::Click(target));
    }

    pub fn escape(&mut self) {
        self.modal = std::mem::take(&mut self.modal).reduce(ModalAction::Escape);
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Drain queued load requests.
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        self.requests.drain(..).collect()
    }

    /// Record a finished scene load. Returns `true` if the current view
    /// changed (the room is on screen and this was its first result).
    pub fn complete_scene(
        &mut self,
        room: RoomIndex,
        result: Result<SceneGeometry, AssetLoadError>,
    ) -> bool {
        let result = result.map(|geometry| {
            let address = scene_address(&self.exhibition, &self.config, room);
            SceneHandle::compose(room, address, geometry)
        });
        if let Err(err) = &result {
            log::warn!("{room} will render without a scene: {err}");
        }
        let stored = self.scenes.complete(room, result) == Completion::Stored;
        let visible = stored && room == self.current_room();
        if stored && !visible {
            log::debug!("{room} loaded in the background");
        }
        visible
    }

    /// Record a finished image load. Returns `true` if the current view
    /// shows this image.
    pub fn complete_image(
        &mut self,
        key: ImageKey,
        result: Result<LoadedImage, AssetLoadError>,
    ) -> bool {
        if let Err(err) = &result {
            log::warn!("image for '{}' falls back to a placeholder: {err}", key.artwork);
        }
        let stored = self.images.complete(key.clone(), result) == Completion::Stored;
        stored && self.is_shown(&key)
    }

    fn is_shown(&self, key: &ImageKey) -> bool {
        match key.variant {
            ImageVariant::Texture => {
                self.placement.artworks().any(|id| id == &key.artwork)
            }
            ImageVariant::Detail => self
                .modal
                .detail()
                .is_some_and(|d| d.artwork == key.artwork),
        }
    }

    /// Perform every queued load synchronously, including loads queued by
    /// earlier completions. Returns the number of loads performed.
    pub fn pump(&mut self, scenes: &impl SceneLoader, images: &impl ImageLoader) -> usize {
        let mut performed = 0;
        while let Some(request) = self.requests.pop_front() {
            match request {
                LoadRequest::Scene { room, address } => {
                    let result = scenes.load(&address);
                    self.complete_scene(room, result);
                }
                LoadRequest::Image { key, url } => {
                    let result = images.load(&url);
                    self.complete_image(key, result);
                }
            }
            performed += 1;
        }
        performed
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Render state of `key`'s image.
    pub fn image_state(&self, key: &ImageKey) -> ImageState {
        let Some(url) = self.image_url(key) else {
            return ImageState::Placeholder;
        };
        match self.images.get(key) {
            Some(CacheEntry::Ready(_)) => ImageState::Ready { url },
            Some(CacheEntry::Failed(_)) => ImageState::Placeholder,
            Some(CacheEntry::Pending) | None => ImageState::Loading { url },
        }
    }

    pub fn scene_view(&self, room: RoomIndex) -> SceneView {
        match self.scenes.get(&room) {
            Some(CacheEntry::Ready(handle)) => SceneView::Ready(Arc::clone(handle)),
            Some(CacheEntry::Failed(_)) => SceneView::Unavailable,
            Some(CacheEntry::Pending) | None => SceneView::Loading,
        }
    }

    /// Describe the current room for a renderer.
    pub fn view(&self) -> RoomView {
        let room = self.current_room();
        let hovered = self.hover.hovered();
        let slots = self
            .placement
            .slots
            .iter()
            .map(|slot| {
                let artwork = slot
                    .artwork
                    .as_ref()
                    .and_then(|id| self.exhibition.artwork(id));
                let texture = match &slot.artwork {
                    Some(id) => self.image_state(&ImageKey::texture(id.clone())),
                    None => ImageState::Placeholder,
                };
                SlotView {
                    frame: slot.frame.clone(),
                    position: slot.position,
                    rotation: slot.rotation,
                    size: slot.size,
                    artwork: slot.artwork.clone(),
                    title: artwork.map(|a| a.title.clone()),
                    texture,
                    hovered: hovered == Some(&slot.frame),
                }
            })
            .collect();

        let modal = self.modal.detail().map(|detail| ModalView {
            detail: detail.clone(),
            image: self.image_state(&ImageKey::detail(detail.artwork.clone())),
        });

        RoomView {
            room,
            room_count: self.room_count(),
            label: self.navigator.label(),
            room_name: self.exhibition.room(room).map(|r| r.name.clone()),
            scene: self.scene_view(room),
            slots,
            hover_label: hover_label(&self.hover, &self.placement, &self.exhibition, &self.config),
            modal,
        }
    }
}
