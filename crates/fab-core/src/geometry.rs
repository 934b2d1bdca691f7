#![forbid(unsafe_code)]

//! Screen-space geometry in `f32` points.
//!
//! Unlike cell-grid geometry, widget placement works in continuous
//! coordinates: paddings, safe-area insets, and animated offsets are all
//! fractional. Rects are origin + size, with `y` growing downward.

/// A 2D point (or offset) in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `other`, `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle: origin + size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` lies inside the rect (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow the rect by `dx`/`dy` on the trailing edges only.
    ///
    /// This is the friendly-tap inflation shape: the origin is unchanged,
    /// the size grows.
    #[must_use]
    pub fn extended(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x, self.y, self.width + dx, self.height + dy)
    }

    /// Move the rect by an offset, keeping its size.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Edge insets (safe area, label text padding).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    #[must_use]
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_lerp_endpoints() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, -10.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 0.0));
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(r.contains(r.center()));
        assert!(!r.contains(Point::new(30.1, 30.0)));
        assert!(!r.contains(Point::new(9.9, 20.0)));
    }

    #[test]
    fn rect_extended_keeps_origin() {
        let r = Rect::new(5.0, 6.0, 10.0, 10.0).extended(4.0, 2.0);
        assert_eq!(r, Rect::new(5.0, 6.0, 14.0, 12.0));
    }

    #[test]
    fn rect_translated() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translated(Point::new(-1.0, 2.0));
        assert_eq!(r, Rect::new(0.0, 4.0, 3.0, 4.0));
    }

    #[test]
    fn insets_sums() {
        let i = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(i.horizontal(), 6.0);
        assert_eq!(i.vertical(), 4.0);
    }
}
