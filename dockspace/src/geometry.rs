//! Screen-space rectangles used by the layout pass

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in logical pixels.
///
/// `min` is the top-left corner, `max` the bottom-right one. Constructors
/// never produce a negative extent: a rectangle that would be inverted
/// collapses to zero size at `min`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Create a rectangle from its corners, clamping inverted extents to zero
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let min = sanitize(min);
        let max = sanitize(max).max(min);
        Self { min, max }
    }

    /// Create a rectangle from a position and a size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        let min = sanitize(min);
        Self::from_min_max(min, min + sanitize(size).max(Vec2::ZERO))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the rectangle has no drawable surface
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Half-open containment test (`min` inclusive, `max` exclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Grow (or shrink, with a negative amount) on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self::from_min_max(self.min - Vec2::splat(amount), self.max + Vec2::splat(amount))
    }

    /// Split off a strip of `height` from the top, returning `(top, rest)`
    pub fn split_top(&self, height: f32) -> (Rect, Rect) {
        let height = height.max(0.0).min(self.height().max(0.0));
        let cut = self.min.y + height;
        (
            Rect::from_min_max(self.min, Vec2::new(self.max.x, cut)),
            Rect::from_min_max(Vec2::new(self.min.x, cut), self.max),
        )
    }

    /// Move the rectangle by `offset`
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::from_min_max(self.min + offset, self.max + offset)
    }
}

/// Replace non-finite components with zero so they never reach the renderer
fn sanitize(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_rect_collapses() {
        let rect = Rect::from_min_max(Vec2::new(10.0, 10.0), Vec2::new(5.0, 20.0));
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 10.0);
        assert!(rect.is_empty());
    }

    #[test]
    fn test_negative_size_is_clamped() {
        let rect = Rect::from_min_size(Vec2::new(1.0, 2.0), Vec2::new(-4.0, 3.0));
        assert_eq!(rect.size(), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_nan_is_sanitized() {
        let rect = Rect::from_min_size(Vec2::new(f32::NAN, 0.0), Vec2::new(10.0, f32::INFINITY));
        assert_eq!(rect.min, Vec2::ZERO);
        assert_eq!(rect.size(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_split_top() {
        let rect = Rect::from_min_size(Vec2::ZERO, Vec2::new(100.0, 50.0));
        let (top, rest) = rect.split_top(20.0);
        assert_eq!(top.height(), 20.0);
        assert_eq!(rest.height(), 30.0);
        assert_eq!(rest.min.y, 20.0);

        // Strip taller than the rect eats all of it
        let (top, rest) = rect.split_top(80.0);
        assert_eq!(top.height(), 50.0);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::from_min_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(rect.contains(Vec2::ZERO));
        assert!(rect.contains(Vec2::new(9.9, 9.9)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
    }
}
