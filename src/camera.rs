#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{GRID_MAX_OPACITY, GRID_MIN_STEP_PX, GRID_SIZE_PX};
use crate::geometry::{self, Point};

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

/// How the background grid should be drawn at the current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Spacing between grid lines in screen pixels.
    pub step: f64,
    /// Line opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Camera {
    /// Pan offset as a point.
    #[must_use]
    pub fn pan(&self) -> Point {
        Point { x: self.pan_x, y: self.pan_y }
    }

    /// Convert a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        geometry::to_canvas_space(screen, self.pan(), self.zoom)
    }

    /// Convert a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        geometry::to_screen_space(world, self.pan(), self.zoom)
    }

    /// Convert a screen-space distance (pixels) to canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Shift the view by a screen-space delta. Non-finite deltas are ignored.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom to `target` (clamped into `[min, max]`) while keeping the
    /// canvas point under `pointer` at the same screen position. A non-finite
    /// target or pointer leaves the camera unchanged.
    pub fn zoom_to(&mut self, pointer: Point, target: f64, min: f64, max: f64) {
        if !target.is_finite() || !pointer.is_finite() {
            return;
        }
        let new_zoom = target.clamp(min, max);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let pan = geometry::zoom_about(pointer, self.pan(), self.zoom, new_zoom);
        self.zoom = new_zoom;
        self.pan_x = pan.x;
        self.pan_y = pan.y;
    }

    /// Background grid style. Cells grow with zoom down to a minimum
    /// on-screen step; lines fade as the view zooms in.
    #[must_use]
    pub fn grid(&self) -> GridStyle {
        GridStyle {
            step: (GRID_SIZE_PX * self.zoom).max(GRID_MIN_STEP_PX),
            opacity: (0.8 / self.zoom).min(GRID_MAX_OPACITY),
        }
    }
}
