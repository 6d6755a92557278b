//! Pure geometry: points, sizes, rectangles, coordinate transforms, and the
//! overlap math behind frame containment and connection endpoints.
//!
//! Nothing here holds state. Canvas space is the board's own coordinate
//! system; screen space is CSS pixels after pan and zoom are applied.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::CONTAINMENT_RATIO;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise offset by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Width and height of an entity in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square of edge `side`.
    #[must_use]
    pub fn square(side: f64) -> Self {
        Self { width: side, height: side }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    /// Whether both dimensions lie within `[min, max]` inclusive.
    #[must_use]
    pub fn within(self, min: Size, max: Size) -> bool {
        (min.width..=max.width).contains(&self.width) && (min.height..=max.height).contains(&self.height)
    }
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether `pt` lies inside or on the edge of this rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Area shared by `self` and `other`; zero when they are disjoint or only touch.
    #[must_use]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }
}

// =============================================================================
// TRANSFORMS
// =============================================================================

/// Convert a screen point to canvas space: `(screen - pan) / scale`.
#[must_use]
pub fn to_canvas_space(screen: Point, pan: Point, scale: f64) -> Point {
    Point { x: (screen.x - pan.x) / scale, y: (screen.y - pan.y) / scale }
}

/// Convert a canvas point to screen space: `canvas * scale + pan`.
#[must_use]
pub fn to_screen_space(canvas: Point, pan: Point, scale: f64) -> Point {
    Point { x: canvas.x * scale + pan.x, y: canvas.y * scale + pan.y }
}

/// New pan offset that keeps the canvas point under `pointer` fixed when the
/// scale changes from `scale` to `new_scale`.
#[must_use]
pub fn zoom_about(pointer: Point, pan: Point, scale: f64, new_scale: f64) -> Point {
    let anchor = to_canvas_space(pointer, pan, scale);
    Point { x: pointer.x - anchor.x * new_scale, y: pointer.y - anchor.y * new_scale }
}

// =============================================================================
// OVERLAP AND ENDPOINTS
// =============================================================================

/// Fraction of `a`'s area covered by `b`, in `[0, 1]`.
///
/// Asymmetric: a small note fully inside a large frame yields 1.0, while the
/// frame measured against the note yields much less.
#[must_use]
pub fn overlap_ratio(a: &Rect, b: &Rect) -> f64 {
    let area = a.area();
    if area <= 0.0 {
        return 0.0;
    }
    (a.intersection_area(b) / area).clamp(0.0, 1.0)
}

/// Whether a note rectangle counts as inside a frame rectangle.
#[must_use]
pub fn is_contained(note: &Rect, frame: &Rect) -> bool {
    overlap_ratio(note, frame) >= CONTAINMENT_RATIO
}

/// Line endpoints `[x1, y1, x2, y2]` joining the centers of `a` and `b`.
#[must_use]
pub fn connection_points(a: &Rect, b: &Rect) -> [f64; 4] {
    let ca = a.center();
    let cb = b.center();
    [ca.x, ca.y, cb.x, cb.y]
}

/// Shortest distance from `pt` to the segment from `a` to `b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (pt.x - a.x).hypot(pt.y - a.y);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj = Point { x: a.x + t * dx, y: a.y + t * dy };
    (pt.x - proj.x).hypot(pt.y - proj.y)
}
