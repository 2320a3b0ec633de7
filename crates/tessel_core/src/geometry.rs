//! Rectangles in texel space.
//!
//! [`IRect`] describes integer regions of a texture (content areas, copy
//! sources). [`Rect`] describes float regions used for sampling constraints
//! and domains. Both are edge-based: `right`/`bottom` are exclusive.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Integer rectangle, edges in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IRect {
    #[inline]
    #[must_use]
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width as i32,
            bottom: y + height as i32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_wh(width: u32, height: u32) -> Self {
        Self::from_xywh(0, 0, width, height)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.left, self.top)
    }

    #[must_use]
    pub fn contains(&self, other: &IRect) -> bool {
        !other.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

/// Float rectangle, edges in texels (or normalized coords once divided).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    #[must_use]
    pub fn from_wh(width: f32, height: f32) -> Self {
        Self::from_ltrb(0.0, 0.0, width, height)
    }

    #[inline]
    #[must_use]
    pub fn from_iwh(width: u32, height: u32) -> Self {
        Self::from_wh(width as f32, height as f32)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Inclusive containment; an empty `other` is never contained.
    #[must_use]
    pub fn contains(&self, other: &Rect) -> bool {
        other.left < other.right
            && other.top < other.bottom
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    #[must_use]
    pub fn offset(&self, delta: Vec2) -> Rect {
        Rect::from_ltrb(
            self.left + delta.x,
            self.top + delta.y,
            self.right + delta.x,
            self.bottom + delta.y,
        )
    }

    #[must_use]
    pub fn scale(&self, sx: f32, sy: f32) -> Rect {
        Rect::from_ltrb(
            self.left * sx,
            self.top * sy,
            self.right * sx,
            self.bottom * sy,
        )
    }

    #[must_use]
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect::from_ltrb(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    /// The largest representable rectangle; sides are tightened individually.
    #[must_use]
    pub fn largest() -> Rect {
        Rect::from_ltrb(f32::MIN, f32::MIN, f32::MAX, f32::MAX)
    }
}

impl From<IRect> for Rect {
    fn from(r: IRect) -> Self {
        Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irect_dimensions() {
        let r = IRect::from_xywh(4, 8, 16, 32);
        assert_eq!(r.width(), 16);
        assert_eq!(r.height(), 32);
        assert_eq!(r.origin(), IVec2::new(4, 8));
        assert!(IRect::from_wh(64, 64).contains(&r));
        assert!(!r.contains(&IRect::from_wh(64, 64)));
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let bounds = Rect::from_iwh(10, 10);
        assert!(bounds.contains(&Rect::from_iwh(10, 10)));
        assert!(!bounds.contains(&Rect::from_ltrb(-0.5, 0.0, 10.0, 10.0)));
        assert!(!bounds.contains(&Rect::from_ltrb(2.0, 2.0, 2.0, 5.0)));
    }
}
