//! Camera Tests
//!
//! Tests for:
//! - Drag clamping against DragBounds
//! - CameraPan easing, completion and eye-target offset
//! - Viewport projection

use std::f32::consts::FRAC_PI_4;

use folio::math::{Mat4, Vec3};
use folio::utils::camera::{PAN_DURATION_MS, PAN_OFFSET, ease_in_out, lerp};
use folio::utils::{Camera, CameraPan, DragBounds};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn camera_at(x: f32, z: f32) -> Camera {
    Camera::new(
        Vec3::new(x, 1.0, z),
        Vec3::new(x, 0.0, z - 0.5),
        Mat4::perspective(FRAC_PI_4, 1.5, 0.1, 100.0),
    )
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn drag_inside_bounds_moves_eye_and_target() {
    let mut camera = camera_at(0.0, 0.0);
    camera.drag(0.2, -0.3, &DragBounds::default());

    assert!(approx(camera.eye.x, -0.2));
    assert!(approx(camera.target.x, -0.2));
    assert!(approx(camera.eye.z, -0.3));
    assert!(approx(camera.target.z, -0.8));
    assert!(approx(camera.eye.y, 1.0), "Height is never changed");
}

#[test]
fn drag_past_x_bound_is_ignored() {
    let bounds = DragBounds::default();
    let mut camera = camera_at(2.0, 0.0);

    // Moving further out along +x
    camera.drag(-0.1, 0.0, &bounds);
    assert!(approx(camera.eye.x, 2.0));

    // Moving back inside is allowed
    camera.drag(0.1, 0.0, &bounds);
    assert!(approx(camera.eye.x, 1.9));
}

#[test]
fn drag_past_z_bound_is_ignored() {
    let bounds = DragBounds::default();
    let mut camera = camera_at(0.0, -2.0);

    camera.drag(0.0, -0.1, &bounds);
    assert!(approx(camera.eye.z, -2.0));

    camera.drag(0.0, 0.1, &bounds);
    assert!(approx(camera.eye.z, -1.9));
}

#[test]
fn drag_axes_are_independent() {
    let bounds = DragBounds::default();
    let mut camera = camera_at(2.0, 0.0);

    camera.drag(-0.1, 0.2, &bounds);
    assert!(approx(camera.eye.x, 2.0), "x is out of bounds");
    assert!(approx(camera.eye.z, 0.2), "z is still applied");
}

// ============================================================================
// Easing
// ============================================================================

#[test]
fn ease_in_out_endpoints_and_midpoint() {
    assert!(approx(ease_in_out(0.0), 0.0));
    assert!(approx(ease_in_out(0.5), 0.5));
    assert!(approx(ease_in_out(1.0), 1.0));
    assert!(approx(ease_in_out(0.25), 0.125));
}

#[test]
fn ease_in_out_is_monotonic() {
    let mut previous = ease_in_out(0.0);
    for i in 1..=100 {
        let value = ease_in_out(i as f32 / 100.0);
        assert!(value >= previous);
        previous = value;
    }
}

#[test]
fn lerp_basics() {
    assert!(approx(lerp(2.0, 4.0, 0.0), 2.0));
    assert!(approx(lerp(2.0, 4.0, 0.5), 3.0));
    assert!(approx(lerp(2.0, 4.0, 1.0), 4.0));
}

// ============================================================================
// CameraPan
// ============================================================================

#[test]
fn pan_reaches_destination_with_offset() {
    let mut camera = camera_at(0.0, 0.0);
    let world = Mat4::from_translation(1.0, 0.0, -1.0);
    let mut pan = CameraPan::towards(&camera, &world, PAN_OFFSET, PAN_DURATION_MS);

    assert!(pan.advance(&mut camera, PAN_DURATION_MS / 2.0));
    assert!(approx(pan.progress(), 0.5));
    assert!(approx(camera.eye.x, 0.5 * (1.0 + PAN_OFFSET[0])));

    assert!(!pan.advance(&mut camera, PAN_DURATION_MS));
    assert!(pan.is_finished());
    assert!(approx(camera.eye.x, 1.0 + PAN_OFFSET[0]));
    assert!(approx(camera.eye.z, -1.0 + PAN_OFFSET[1]));
}

#[test]
fn pan_preserves_eye_target_offset() {
    let mut camera = camera_at(0.3, 0.1);
    let before = camera.target.sub(camera.eye);
    let world = Mat4::from_translation(-1.0, 0.0, 0.4);
    let mut pan = CameraPan::towards(&camera, &world, [0.0, 0.0], 300.0);

    while pan.advance(&mut camera, 16.0) {
        let offset = camera.target.sub(camera.eye);
        assert!(approx(offset.x, before.x));
        assert!(approx(offset.z, before.z));
    }
    assert!(approx(camera.eye.x, -1.0));
    assert!(approx(camera.eye.z, 0.4));
}

#[test]
fn finished_pan_does_not_move() {
    let mut camera = camera_at(0.0, 0.0);
    let world = Mat4::from_translation(1.0, 0.0, 1.0);
    let mut pan = CameraPan::towards(&camera, &world, [0.0, 0.0], 100.0);

    assert!(!pan.advance(&mut camera, 1000.0));
    camera.eye.x = 5.0;
    assert!(!pan.advance(&mut camera, 16.0));
    assert!(approx(camera.eye.x, 5.0));
}

#[test]
fn zero_delta_keeps_start() {
    let mut camera = camera_at(0.2, 0.2);
    let world = Mat4::from_translation(1.0, 0.0, 1.0);
    let mut pan = CameraPan::towards(&camera, &world, [0.0, 0.0], 100.0);

    assert!(pan.advance(&mut camera, 0.0));
    assert!(approx(camera.eye.x, 0.2));
    assert!(approx(camera.eye.z, 0.2));
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn view_projection_is_projection_times_view() {
    let camera = camera_at(0.4, -0.2);
    let expected = camera.projection.mul(&camera.view());
    assert!(camera.view_projection().abs_diff_eq(&expected, EPSILON));
}

#[test]
fn target_projects_to_viewport_center() {
    let camera = Camera::new(
        Vec3::new(0.0, 2.0, 2.0),
        Vec3::ZERO,
        Mat4::perspective(FRAC_PI_4, 1.0, 0.1, 100.0),
    );
    let [x, y] = camera.project_to_viewport(&Mat4::IDENTITY);
    assert!(approx(x, 0.5));
    assert!(approx(y, 0.5));
}

#[test]
fn right_of_target_projects_right_of_center() {
    let camera = Camera::new(
        Vec3::new(0.0, 0.0, 3.0),
        Vec3::ZERO,
        Mat4::perspective(FRAC_PI_4, 1.0, 0.1, 100.0),
    );
    let [x, y] = camera.project_to_viewport(&Mat4::from_translation(0.5, 0.5, 0.0));
    assert!(x > 0.5);
    assert!(y < 0.5, "Viewport y grows downwards");
}
