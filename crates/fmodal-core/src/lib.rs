#![forbid(unsafe_code)]

//! Core primitives for fademodal.
//!
//! This crate provides:
//! - [`geometry`]: [`Rect`] and [`Size`] in abstract layout units
//! - [`event`]: keyboard and mouse input delivered by the host
//! - [`scroll`]: the process-wide page scroll lock held while a modal is mounted

pub mod event;
pub mod geometry;
pub mod scroll;

pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use geometry::{Rect, Size};
pub use scroll::{Overflow, PageScroll, ScrollLockGuard};

/// Display width of a string in cells, counting wide graphemes as two.
pub fn text_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(text)
}
