#![forbid(unsafe_code)]

//! Declarative render output.
//!
//! A [`ModalView`] is everything the presentation layer needs to draw one
//! frame of a mounted modal: accessibility attributes, text, the caller's
//! body, and the transition target values. The presentation layer owns the
//! actual interpolation; `transition.duration` and `transition.easing` tell
//! it how.

use std::time::Duration;

/// ARIA role of the overlay element.
pub const DIALOG_ROLE: &str = "dialog";
/// Element id of the heading, referenced by `aria-labelledby`.
pub const TITLE_ID: &str = "modal-title";
/// Accessible label of the close control.
pub const CLOSE_ARIA_LABEL: &str = "Close modal";
/// Overlay tint: black at half opacity.
pub const BACKDROP_COLOR: Rgba = Rgba::new(0, 0, 0, 0.5);

/// A color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0.0, 1.0]`.
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `opacity`, clamped to `[0.0, 1.0]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Fixed accessibility attributes of the overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AriaAttributes {
    pub role: &'static str,
    pub modal: bool,
    pub labelledby: &'static str,
}

impl Default for AriaAttributes {
    fn default() -> Self {
        Self {
            role: DIALOG_ROLE,
            modal: true,
            labelledby: TITLE_ID,
        }
    }
}

/// Timing function of both transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// CSS `ease`.
    #[default]
    Ease,
}

/// Target values the presentation layer transitions toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Whether the visible state applies (the modal is animating in).
    pub visible: bool,
    pub duration: Duration,
    pub easing: Easing,
    pub overlay_opacity: f32,
    pub content_opacity: f32,
    /// Vertical offset of the content box; negative is up.
    pub content_offset_y: i32,
}

impl Transition {
    pub fn new(visible: bool, duration: Duration, slide_offset: u16) -> Self {
        let opacity = if visible { 1.0 } else { 0.0 };
        Self {
            visible,
            duration,
            easing: Easing::Ease,
            overlay_opacity: opacity,
            content_opacity: opacity,
            content_offset_y: if visible {
                0
            } else {
                -i32::from(slide_offset)
            },
        }
    }
}

/// One frame of a mounted modal.
#[derive(Debug)]
pub struct ModalView<'a, C: ?Sized> {
    pub aria: AriaAttributes,
    /// Heading text; `None` when the title is empty.
    pub title: Option<String>,
    pub title_id: &'static str,
    /// The caller's body.
    pub content: &'a C,
    pub class_name: String,
    pub close_text: String,
    pub close_aria_label: &'static str,
    /// Width cap of the content box.
    pub max_width: u16,
    pub width_percent: u16,
    pub backdrop: Rgba,
    pub transition: Transition,
}

impl<C: ?Sized> ModalView<'_, C> {
    /// Backdrop color at the current overlay opacity target.
    pub fn backdrop_fill(&self) -> Rgba {
        self.backdrop.with_opacity(self.transition.overlay_opacity)
    }
}
