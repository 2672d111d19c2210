#![forbid(unsafe_code)]

//! Rectangles and sizes.
//!
//! Units are abstract: a terminal host treats them as cells, a pixel host as
//! CSS pixels. All arithmetic saturates so that layouts near `u16::MAX`
//! never wrap.

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Whether the point lies inside the rectangle.
    #[inline]
    pub const fn contains(self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Center `size` inside `self`, clamping it to fit.
    pub fn centered(self, size: Size) -> Rect {
        let width = size.width.min(self.width);
        let height = size.height.min(self.height);
        Rect::new(
            self.x.saturating_add((self.width - width) / 2),
            self.y.saturating_add((self.height - height) / 2),
            width,
            height,
        )
    }

    /// Move vertically by `dy`, keeping the rectangle inside `bounds`.
    pub fn offset_y_within(self, dy: i32, bounds: Rect) -> Rect {
        let min_y = bounds.y as i32;
        let max_y = (bounds.bottom() as i32 - self.height as i32).max(min_y);
        let y = (self.y as i32 + dy).clamp(min_y, max_y);
        Rect::new(self.x, y as u16, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 5);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 8));
        assert!(!Rect::new(0, 0, 0, 5).contains(0, 0));
    }

    #[test]
    fn centered_in_area() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(area.centered(Size::new(10, 4)), Rect::new(15, 8, 10, 4));
    }

    #[test]
    fn centered_clamps_oversized() {
        let area = Rect::new(5, 5, 8, 4);
        assert_eq!(area.centered(Size::new(30, 10)), area);
    }

    #[test]
    fn offset_clamps_to_bounds() {
        let bounds = Rect::new(0, 10, 40, 20);
        let r = Rect::new(5, 12, 10, 4);
        assert_eq!(r.offset_y_within(-5, bounds).y, 10);
        assert_eq!(r.offset_y_within(100, bounds).y, 26);
        assert_eq!(r.offset_y_within(1, bounds).y, 13);
    }

    proptest! {
        #[test]
        fn centered_stays_inside(
            x in 0u16..200, y in 0u16..200,
            w in 0u16..300, h in 0u16..300,
            sw in 0u16..400, sh in 0u16..400,
        ) {
            let area = Rect::new(x, y, w, h);
            let r = area.centered(Size::new(sw, sh));
            prop_assert!(r.x >= area.x);
            prop_assert!(r.y >= area.y);
            prop_assert!(r.right() <= area.right());
            prop_assert!(r.bottom() <= area.bottom());
        }
    }
}
