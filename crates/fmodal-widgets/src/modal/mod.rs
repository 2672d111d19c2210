#![forbid(unsafe_code)]

//! Animated modal dialog: controller, configuration, layout, and render model.
//!
//! # Transition
//!
//! A modal fades and slides in when opened and out when closed:
//!
//! - **Mount first**: opening inserts the markup, then applies the visible
//!   state [`ENTER_DELAY`] later so the presentation layer animates it
//!   instead of snapping.
//! - **Unmount last**: closing removes the visible state at once and keeps
//!   the markup for the fade duration.
//! - **Scroll lock**: the page does not scroll while the modal is mounted.
//! - **Dismissal**: Escape, an overlay click, or the close button ask the
//!   owner to close through `on_close`.
//!
//! # Example
//!
//! ```
//! use fmodal_core::geometry::{Rect, Size};
//! use fmodal_widgets::modal::{ModalController, ModalHost, ModalPhase, ModalProps};
//! use std::time::Duration;
//!
//! let host = ModalHost::isolated();
//! let modal = ModalController::new(ModalProps::new().title("Saved"), || {}, host.clone());
//!
//! modal.set_requested_open(true);
//! assert_eq!(modal.phase(), ModalPhase::Entering);
//!
//! host.timers.advance(Duration::from_millis(10));
//! let layout = modal.layout(Rect::new(0, 0, 80, 24), Size::new(20, 3)).unwrap();
//! let view = modal.view("File written.").unwrap();
//! assert!(view.transition.visible);
//! assert!(layout.content.width <= view.max_width);
//! ```

mod controller;
mod layout;
mod props;
mod view;

pub use controller::{
    DismissReason, ENTER_DELAY, ModalController, ModalHost, ModalPhase, ModalState,
};
pub use layout::{ModalHit, ModalLayout, ModalMetrics};
#[cfg(feature = "config")]
pub use props::ConfigError;
pub use props::{
    DEFAULT_CLOSE_TEXT, DEFAULT_FADE_DURATION_MS, DEFAULT_MAX_WIDTH, DEFAULT_TITLE, ModalProps,
};
pub use view::{
    AriaAttributes, BACKDROP_COLOR, CLOSE_ARIA_LABEL, DIALOG_ROLE, Easing, ModalView, Rgba,
    TITLE_ID, Transition,
};
