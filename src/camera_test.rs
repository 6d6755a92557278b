#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn identity_camera_maps_points_unchanged() {
    let cam = Camera::default();
    let p = Point::new(42.0, -17.5);
    assert_eq!(cam.screen_to_world(p), p);
    assert_eq!(cam.world_to_screen(p), p);
}

// --- Conversions ---

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    assert!(point_approx_eq(cam.screen_to_world(Point::new(300.0, 250.0)), Point::new(100.0, 100.0)));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
    let cam = Camera { pan_x: -33.0, pan_y: 71.5, zoom: 0.45 };
    let p = Point::new(812.0, -64.0);
    assert!(point_approx_eq(cam.screen_to_world(cam.world_to_screen(p)), p));
}

#[test]
fn screen_dist_scales_inverse_to_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    assert_eq!(cam.screen_dist_to_world(8.0), 2.0);
}

// --- Pan ---

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 2.5);
    assert_eq!(cam.pan(), Point::new(12.5, -2.5));
}

// --- Zoom ---

#[test]
fn zoom_to_keeps_pointer_world_point_fixed() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -10.0, zoom: 1.3 };
    let pointer = Point::new(500.0, 320.0);
    let before = cam.screen_to_world(pointer);
    cam.zoom_to(pointer, 1.3 * 1.1, 0.1, 3.0);
    assert!(approx_eq(cam.zoom, 1.43));
    assert!(point_approx_eq(cam.screen_to_world(pointer), before));
}

#[test]
fn zoom_to_clamps_to_max() {
    let mut cam = Camera::default();
    let pointer = Point::new(100.0, 100.0);
    let before = cam.screen_to_world(pointer);
    cam.zoom_to(pointer, 9.0, 0.1, 3.0);
    assert_eq!(cam.zoom, 3.0);
    assert!(point_approx_eq(cam.screen_to_world(pointer), before));
}

#[test]
fn zoom_to_clamps_to_min() {
    let mut cam = Camera::default();
    cam.zoom_to(Point::new(0.0, 0.0), 0.01, 0.1, 3.0);
    assert_eq!(cam.zoom, 0.1);
}

// --- Grid ---

#[test]
fn grid_at_unit_zoom() {
    let grid = Camera::default().grid();
    assert_eq!(grid.step, 20.0);
    assert_eq!(grid.opacity, 0.4);
}

#[test]
fn grid_step_has_a_floor_when_zoomed_out() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.2 };
    assert_eq!(cam.grid().step, 10.0);
    assert_eq!(cam.grid().opacity, 0.4);
}

#[test]
fn grid_fades_when_zoomed_in() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    let grid = cam.grid();
    assert_eq!(grid.step, 80.0);
    assert!(approx_eq(grid.opacity, 0.2));
}

#[test]
fn zoom_to_at_limit_leaves_pan_untouched() {
    let mut cam = Camera { pan_x: 12.345, pan_y: -6.789, zoom: 3.0 };
    cam.zoom_to(Point::new(400.0, 300.0), 3.3, 0.1, 3.0);
    assert_eq!(cam, Camera { pan_x: 12.345, pan_y: -6.789, zoom: 3.0 });
}

#[test]
fn zoom_to_ignores_non_finite_target_or_pointer() {
    let start = Camera { pan_x: 5.0, pan_y: -5.0, zoom: 1.5 };
    let mut cam = start;
    cam.zoom_to(Point::new(400.0, 300.0), f64::NAN, 0.1, 3.0);
    assert_eq!(cam, start);
    cam.zoom_to(Point::new(400.0, 300.0), f64::INFINITY, 0.1, 3.0);
    assert_eq!(cam, start);
    cam.zoom_to(Point::new(f64::NAN, 300.0), 2.0, 0.1, 3.0);
    assert_eq!(cam, start);
}

#[test]
fn pan_by_ignores_non_finite_delta() {
    let mut cam = Camera::default();
    cam.pan_by(f64::NAN, 10.0);
    cam.pan_by(10.0, f64::INFINITY);
    assert_eq!(cam, Camera::default());
}
