//! Geometric types for the logical canvas and screen coordinates

use serde::{Deserialize, Serialize};

/// Width of the logical canvas every schematic is authored in
pub const LOGICAL_WIDTH: f32 = 1100.0;
/// Height of the logical canvas every schematic is authored in
pub const LOGICAL_HEIGHT: f32 = 680.0;

/// A point in either screen or logical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Shortest distance to the segment `a`-`b`
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f32 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

/// Width and height of a viewport or canvas
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of the logical canvas
    pub const fn logical() -> Self {
        Self::new(LOGICAL_WIDTH, LOGICAL_HEIGHT)
    }

    /// Center point of an area of this size anchored at the origin
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned box in logical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Create a new bounding box from origin and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center of the box
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Grow the box by `pad` on every side
    pub fn inflate(&self, pad: f32) -> Bounds {
        Bounds::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Check if this box contains a point (edges inclusive)
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check if this box lies entirely within `other`
    pub fn is_within(&self, other: &Bounds) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert!(b.contains_point(Point::new(10.0, 20.0)));
        assert!(b.contains_point(Point::new(40.0, 60.0)));
        assert!(!b.contains_point(Point::new(40.1, 60.0)));
        assert!(!b.contains_point(Point::new(9.9, 30.0)));
    }

    #[test]
    fn test_inflate_keeps_center() {
        let b = Bounds::new(380.0, 110.0, 220.0, 400.0);
        let glow = b.inflate(4.0);
        assert_eq!(glow.center(), b.center());
        assert_eq!(glow.width, 228.0);
        assert!(b.is_within(&glow));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(60.0, 55.0);
        let b = Point::new(1040.0, 55.0);
        assert_eq!(Point::new(500.0, 58.0).distance_to_segment(a, b), 3.0);
        assert_eq!(Point::new(0.0, 55.0).distance_to_segment(a, b), 60.0);
        let origin = Point::default();
        assert_eq!(Point::new(3.0, 4.0).distance_to_segment(origin, origin), 5.0);
    }
}
