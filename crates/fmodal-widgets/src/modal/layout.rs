#![forbid(unsafe_code)]

//! Modal box geometry and hit testing.
//!
//! The presentation layer measures the body it is about to draw and asks
//! for a [`ModalLayout`]. The layout places:
//! 1) the backdrop over the whole area,
//! 2) the content box, centered, `width_percent` of the area wide but never
//!    wider than the width cap,
//! 3) the title row (only when there is a title), the body, and the close
//!    button centered at the bottom of the box.
//!
//! While the modal is not animating in, the content box sits
//! `slide_offset` higher, which is where the slide-down transition starts.
//!
//! Invariants:
//! - Every rectangle is clamped within the given `area`.
//! - `close_button`, `title` and `body` lie within `content`.
//!
//! Failure modes:
//! - An empty `area` yields empty content and button rectangles; hit tests
//!   then only ever report nothing.

use fmodal_core::geometry::{Rect, Size};
use fmodal_core::text_width;

use crate::modal::ModalProps;

/// Which part of a modal a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalHit {
    /// The overlay itself, outside the content box.
    Backdrop,
    /// Anywhere inside the content box except the close button.
    Content,
    CloseButton,
}

/// Box-model measurements, in the host's layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalMetrics {
    /// Inset between the content box edge and its children.
    pub padding: u16,
    /// Rows taken by the heading, including its margins.
    pub title_height: u16,
    /// Space between the body and the close button.
    pub button_gap: u16,
    pub button_height: u16,
    /// Horizontal padding on each side of the close label.
    pub button_padding_x: u16,
    /// Units per display column of label text.
    pub char_width: u16,
    /// How far above its resting place the content box starts.
    pub slide_offset: u16,
    /// Fluid width of the content box relative to the area.
    pub width_percent: u16,
}

impl ModalMetrics {
    /// Terminal cells.
    pub const CELLS: Self = Self {
        padding: 1,
        title_height: 1,
        button_gap: 1,
        button_height: 1,
        button_padding_x: 2,
        char_width: 1,
        slide_offset: 1,
        width_percent: 90,
    };

    /// CSS pixels at a 16px base font.
    pub const PIXELS: Self = Self {
        padding: 20,
        title_height: 68,
        button_gap: 15,
        button_height: 35,
        button_padding_x: 16,
        char_width: 8,
        slide_offset: 20,
        width_percent: 90,
    };
}

impl Default for ModalMetrics {
    fn default() -> Self {
        Self::CELLS
    }
}

/// Resolved rectangles for one frame of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalLayout {
    pub backdrop: Rect,
    pub content: Rect,
    /// Empty when the title is omitted.
    pub title: Rect,
    pub body: Rect,
    pub close_button: Rect,
}

fn to_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl ModalLayout {
    /// Lay out a modal whose body measures `body` inside `area`.
    pub fn compute(
        area: Rect,
        props: &ModalProps,
        metrics: &ModalMetrics,
        body: Size,
        animating_in: bool,
    ) -> Self {
        let fluid = to_u16(u32::from(area.width) * u32::from(metrics.width_percent) / 100);
        let width = fluid.min(props.effective_max_width());

        let title_height = if props.title_text().is_some() {
            metrics.title_height
        } else {
            0
        };
        let height = to_u16(
            2 * u32::from(metrics.padding)
                + u32::from(title_height)
                + u32::from(body.height)
                + u32::from(metrics.button_gap)
                + u32::from(metrics.button_height),
        );

        let resting = area.centered(Size::new(width, height));
        let content = if animating_in {
            resting
        } else {
            resting.offset_y_within(-i32::from(metrics.slide_offset), area)
        };

        if content.is_empty() {
            let empty = Rect::new(content.x, content.y, 0, 0);
            return Self {
                backdrop: area,
                content: empty,
                title: empty,
                body: empty,
                close_button: empty,
            };
        }

        let inner_x = content.x.saturating_add(metrics.padding).min(content.right());
        let inner_width = content
            .width
            .saturating_sub(metrics.padding.saturating_mul(2));
        let inner_top = content.y.saturating_add(metrics.padding).min(content.bottom());

        let title = Rect::new(
            inner_x,
            inner_top,
            inner_width,
            title_height.min(content.bottom() - inner_top),
        );

        let body_top = title.bottom();
        let body_rect = Rect::new(
            inner_x,
            body_top,
            inner_width.min(body.width),
            body.height.min(content.bottom() - body_top),
        );

        let label = to_u16(
            text_width(&props.close_text) as u32 * u32::from(metrics.char_width)
                + 2 * u32::from(metrics.button_padding_x),
        );
        let button_width = label.min(content.width);
        let button_height = metrics.button_height.min(content.height);
        let button_y = content
            .bottom()
            .saturating_sub(metrics.padding.saturating_add(button_height))
            .max(content.y);
        let close_button = Rect::new(
            content.x.saturating_add((content.width - button_width) / 2),
            button_y,
            button_width,
            button_height,
        );

        Self {
            backdrop: area,
            content,
            title,
            body: body_rect,
            close_button,
        }
    }

    /// Topmost modal part under the point, if any.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ModalHit> {
        if self.close_button.contains(x, y) {
            Some(ModalHit::CloseButton)
        } else if self.content.contains(x, y) {
            Some(ModalHit::Content)
        } else if self.backdrop.contains(x, y) {
            Some(ModalHit::Backdrop)
        } else {
            None
        }
    }
}
