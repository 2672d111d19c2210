#![forbid(unsafe_code)]

//! Single-threaded runtime services for fademodal.
//!
//! - [`TimerQueue`]: virtual-time timers with RAII [`TimerHandle`]s.
//! - [`KeyListeners`]: the document-level key listener registry with RAII
//!   [`Subscription`]s.
//! - [`MonotonicClock`]: wall-clock source used to pump a [`TimerQueue`].
//!
//! Everything here is `!Send` by construction (`Rc<RefCell<..>>`): the modal
//! runs on the UI thread and callbacks are cooperative.

pub mod listener;
pub mod timer;

pub use listener::{KeyListeners, ListenerId, Subscription};
pub use timer::{MonotonicClock, TimerHandle, TimerId, TimerQueue};
