//! Linear Algebra Tests
//!
//! Tests for:
//! - Vec3 sub / normalize / dot / cross
//! - Mat4 identity, composition order and inverse fallback
//! - look_at degenerate input

use std::f32::consts::FRAC_PI_2;

use folio::math::{Mat4, Vec3};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn transform(m: &Mat4, p: Vec3) -> Vec3 {
    m.as_glam().transform_point3(p.into()).into()
}

fn sample() -> Mat4 {
    Mat4::IDENTITY
        .translate(1.0, -2.0, 3.5)
        .rotate(0.3, -1.1, 0.7)
        .scale(2.0, 0.5, 1.5)
}

// ============================================================================
// Vec3
// ============================================================================

#[test]
fn vec3_basic_ops() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 5.0, 6.0);

    assert_eq!(b.sub(a), Vec3::new(3.0, 3.0, 3.0));
    assert!(approx(a.dot(b), 32.0));
    assert_eq!(Vec3::new(1.0, 0.0, 0.0).cross(Vec3::Y), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn vec3_normalize_unit_length() {
    let n = Vec3::new(3.0, 0.0, 4.0).normalize();
    assert!(approx(n.length(), 1.0));
    assert!(approx(n.x, 0.6));
    assert!(approx(n.z, 0.8));
}

#[test]
fn vec3_normalize_zero_is_zero() {
    let n = Vec3::ZERO.normalize();
    assert_eq!(n, Vec3::ZERO);
    assert!(!n.x.is_nan());
}

// ============================================================================
// Mat4 composition
// ============================================================================

#[test]
fn default_is_identity() {
    assert_eq!(Mat4::default(), Mat4::IDENTITY);
}

#[test]
fn mul_identity_is_noop() {
    let m = sample();
    assert!(m.mul(&Mat4::IDENTITY).abs_diff_eq(&m, EPSILON));
    assert!(Mat4::IDENTITY.mul(&m).abs_diff_eq(&m, EPSILON));
}

#[test]
fn mul_is_not_commutative() {
    let t = Mat4::from_translation(1.0, 0.0, 0.0);
    let r = Mat4::IDENTITY.rotate_z(FRAC_PI_2);
    assert!(!t.mul(&r).abs_diff_eq(&r.mul(&t), EPSILON));
}

#[test]
fn chained_ops_right_multiply() {
    // Scale happens first, then translation.
    let m = Mat4::IDENTITY.translate(1.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
    let p = transform(&m, Vec3::new(1.0, 0.0, 0.0));
    assert!(approx(p.x, 3.0));

    let expected = Mat4::from_translation(1.0, 0.0, 0.0).mul(&Mat4::IDENTITY.scale(2.0, 2.0, 2.0));
    assert!(m.abs_diff_eq(&expected, EPSILON));
}

#[test]
fn rotations_are_undone_by_their_opposite() {
    let m = Mat4::IDENTITY
        .rotate_x(0.4)
        .rotate_x(-0.4)
        .rotate_y(1.2)
        .rotate_y(-1.2)
        .rotate_z(-2.0)
        .rotate_z(2.0);
    assert!(m.abs_diff_eq(&Mat4::IDENTITY, EPSILON));
}

#[test]
fn rotate_axis_matches_single_axis_rotation() {
    let a = Mat4::IDENTITY.rotate_axis(Vec3::new(0.0, 0.0, 1.0), 0.9);
    let b = Mat4::IDENTITY.rotate_z(-0.9);
    let c = Mat4::IDENTITY.rotate_z(0.9);
    assert!(a.abs_diff_eq(&b, EPSILON) || a.abs_diff_eq(&c, EPSILON));
    assert!(approx(a.determinant(), 1.0));
}

#[test]
fn offset_translation_moves_only_translation() {
    let mut m = Mat4::IDENTITY.rotate_y(0.5).scale(2.0, 2.0, 2.0);
    let before = m;
    m.offset_translation(1.0, 2.0, 3.0);

    assert_eq!(m.translation(), Vec3::new(1.0, 2.0, 3.0));
    for i in 0..12 {
        assert!(approx(m[i], before[i]));
    }
}

// ============================================================================
// Inverse / transpose
// ============================================================================

#[test]
fn inverse_times_original_is_identity() {
    let m = sample();
    assert!(m.inverse().mul(&m).abs_diff_eq(&Mat4::IDENTITY, 1e-4));
}

#[test]
fn inverse_of_singular_is_identity() {
    let mut cols = Mat4::IDENTITY.to_cols_array();
    // Zero row 1.
    for c in 0..4 {
        cols[c * 4 + 1] = 0.0;
    }
    let singular = Mat4::from_cols_array(&cols);
    let inv = singular.inverse();

    assert_eq!(inv, Mat4::IDENTITY);
    assert!(inv.to_cols_array().iter().all(|v| !v.is_nan()));
}

#[test]
fn transpose_swaps_rows_and_columns() {
    let m = Mat4::from_cols_array(&[
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
    ]);
    let t = m.transpose();
    assert!(approx(t[1], 5.0));
    assert!(approx(t[4], 2.0));
    assert!(approx(t[15], 16.0));
    assert_eq!(t.transpose(), m);
}

// ============================================================================
// Projection / view
// ============================================================================

#[test]
fn look_at_same_point_is_identity() {
    let eye = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(Mat4::look_at(eye, eye, Vec3::Y), Mat4::IDENTITY);

    let near = Vec3::new(1.0 + f32::EPSILON * 0.5, 2.0, 3.0);
    assert_eq!(Mat4::look_at(eye, near, Vec3::Y), Mat4::IDENTITY);
}

#[test]
fn look_at_moves_eye_to_origin() {
    let eye = Vec3::new(0.0, 1.5, 2.0);
    let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);
    let p = transform(&view, eye);
    assert!(approx(p.x, 0.0) && approx(p.y, 0.0) && approx(p.z, 0.0));

    let target = transform(&view, Vec3::ZERO);
    assert!(approx(target.length(), eye.length()));
}

#[test]
fn perspective_is_invertible() {
    let p = Mat4::perspective(FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0);
    assert!(p.determinant().abs() > f32::EPSILON);
    assert!(p.inverse().mul(&p).abs_diff_eq(&Mat4::IDENTITY, 1e-4));
}

#[test]
fn ortho_maps_box_to_clip_cube() {
    let o = Mat4::ortho(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0);
    let corner = transform(&o, Vec3::new(2.0, 1.0, -10.0));
    assert!(approx(corner.x, 1.0));
    assert!(approx(corner.y, 1.0));
    assert!(approx(corner.z, 1.0));
}
