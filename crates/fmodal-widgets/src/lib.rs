#![forbid(unsafe_code)]

//! Widgets for fademodal.

pub mod modal;

pub use modal::{
    DismissReason, ModalController, ModalHost, ModalLayout, ModalPhase, ModalProps, ModalView,
};
