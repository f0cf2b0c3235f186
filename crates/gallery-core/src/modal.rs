//! The artwork detail overlay.
//!
//! At most one detail is ever shown. Opening replaces whatever is open;
//! closing is idempotent. Clicks are routed by target: the backdrop closes
//! the overlay, the content panel contains its clicks, and the close button
//! (inside the content panel) closes explicitly.

use serde::{Deserialize, Serialize};

use crate::exhibition::ArtworkDetail;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ArtworkDetail),
}

/// Where inside the overlay a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalClick {
    Backdrop,
    Content,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalAction {
    Open(ArtworkDetail),
    Close,
    Click(ModalClick),
    /// Keyboard dismissal.
    Escape,
}

impl ModalState {
    pub fn reduce(self, action: ModalAction) -> Self {
        match action {
            ModalAction::Open(detail) => ModalState::Open(detail),
            ModalAction::Close | ModalAction::Escape => ModalState::Closed,
            ModalAction::Click(target) => {
                if closes(target) {
                    ModalState::Closed
                } else {
                    self
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn detail(&self) -> Option<&ArtworkDetail> {
        match self {
            ModalState::Closed => None,
            ModalState::Open(detail) => Some(detail),
        }
    }
}

/// Whether a click on `target` dismisses the overlay. Content clicks are
/// contained and never reach the backdrop.
pub fn closes(target: ModalClick) -> bool {
    match target {
        ModalClick::Backdrop | ModalClick::CloseButton => true,
        ModalClick::Content => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn open(n: usize) -> ModalState {
        ModalState::Closed.reduce(ModalAction::Open(detail(n)))
    }

    #[test]
    fn open_from_closed() {
        let state = open(1);
        assert_eq!(state.detail().map(|d| d.title.as_str()), Some("Work 1"));
    }

    #[test]
    fn open_replaces_without_close() {
        let state = open(1).reduce(ModalAction::Open(detail(2)));
        assert_eq!(state, ModalState::Open(detail(2)));
    }

    #[test]
    fn close_is_idempotent() {
        assert_eq!(open(1).reduce(ModalAction::Close), ModalState::Closed);
        assert_eq!(
            ModalState::Closed.reduce(ModalAction::Close),
            ModalState::Closed
        );
    }

    #[test]
    fn backdrop_click_closes() {
        assert_eq!(
            open(3).reduce(ModalAction::Click(ModalClick::Backdrop)),
            ModalState::Closed
        );
    }

    #[test]
    fn content_click_is_contained() {
        let state = open(3).reduce(ModalAction::Click(ModalClick::Content));
        assert_eq!(state, ModalState::Open(detail(3)));
    }

    #[test]
    fn close_button_closes_despite_being_inside_content() {
        assert_eq!(
            open(3).reduce(ModalAction::Click(ModalClick::CloseButton)),
            ModalState::Closed
        );
    }

    #[test]
    fn escape_closes() {
        assert_eq!(open(3).reduce(ModalAction::Escape), ModalState::Closed);
    }

    #[test]
    fn clicks_on_closed_modal_stay_closed() {
        for target in [ModalClick::Backdrop, ModalClick::Content, ModalClick::CloseButton] {
            assert_eq!(
                ModalState::Closed.reduce(ModalAction::Click(target)),
                ModalState::Closed
            );
        }
    }
}
