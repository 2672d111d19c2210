#![forbid(unsafe_code)]

//! fademodal public facade.
//!
//! Re-exports the core, runtime and widget crates and provides a
//! [`prelude`] for the common types.

pub use fmodal_core;
pub use fmodal_runtime;
pub use fmodal_widgets;

#[cfg(feature = "logging")]
pub mod logging;

pub mod prelude {
    pub use fmodal_core::event::{Event, KeyCode, KeyEvent, MouseEvent};
    pub use fmodal_core::geometry::{Rect, Size};
    pub use fmodal_core::scroll::{Overflow, PageScroll};
    pub use fmodal_runtime::{KeyListeners, MonotonicClock, TimerQueue};
    pub use fmodal_widgets::modal::{
        DismissReason, ModalController, ModalHost, ModalLayout, ModalMetrics, ModalPhase,
        ModalProps, ModalView,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::time::Duration;

    #[test]
    fn prelude_drives_a_modal() {
        let host = ModalHost::isolated();
        let modal = ModalController::new(ModalProps::default(), || {}, host.clone());
        modal.set_requested_open(true);
        host.timers.advance(Duration::from_millis(10));
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(host.page.overflow(), Overflow::Hidden);
    }
}
