use std::ops::{Index, IndexMut, Mul};

use super::Vec3;

/// Column-major 4x4 float matrix. `Default` is identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(glam::Mat4);

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self(glam::Mat4::IDENTITY);

    #[inline]
    #[must_use]
    pub fn from_cols_array(m: &[f32; 16]) -> Self {
        Self(glam::Mat4::from_cols_array(m))
    }

    #[inline]
    #[must_use]
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    #[inline]
    #[must_use]
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self(glam::Mat4::from_translation(glam::Vec3::new(x, y, z)))
    }

    // ========================================================================
    // Projection / view factories
    // ========================================================================

    /// OpenGL-style perspective projection (clip z in `[-1, 1]`).
    #[must_use]
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self(glam::Mat4::perspective_rh_gl(fov, aspect, near, far))
    }

    #[must_use]
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self(glam::Mat4::orthographic_rh_gl(
            left, right, bottom, top, near, far,
        ))
    }

    /// View matrix looking from `eye` at `target`.
    ///
    /// Returns identity when `eye` and `target` coincide on every axis,
    /// where the forward vector would be zero-length.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        if (eye.x - target.x).abs() < f32::EPSILON
            && (eye.y - target.y).abs() < f32::EPSILON
            && (eye.z - target.z).abs() < f32::EPSILON
        {
            return Self::IDENTITY;
        }

        let z = eye.sub(target).normalize();
        let x = z.cross(up).normalize();
        let y = x.cross(z).normalize();

        Self::from_cols_array(&[
            x.x,
            y.x,
            z.x,
            0.0,
            x.y,
            y.y,
            z.y,
            0.0,
            x.z,
            y.z,
            z.z,
            0.0,
            -x.dot(eye),
            -y.dot(eye),
            -z.dot(eye),
            1.0,
        ])
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// `self * other`: `other` is applied first.
    #[inline]
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    #[inline]
    #[must_use]
    pub fn translate(&self, x: f32, y: f32, z: f32) -> Self {
        self.mul(&Self::from_translation(x, y, z))
    }

    #[must_use]
    pub fn rotate_x(&self, theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        self.mul(&Self::from_cols_array(&[
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]))
    }

    #[must_use]
    pub fn rotate_y(&self, theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        self.mul(&Self::from_cols_array(&[
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]))
    }

    #[must_use]
    pub fn rotate_z(&self, theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        self.mul(&Self::from_cols_array(&[
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]))
    }

    /// Combined X/Y/Z euler rotation in a single multiply.
    #[must_use]
    pub fn rotate(&self, theta_x: f32, theta_y: f32, theta_z: f32) -> Self {
        let (sx, cx) = theta_x.sin_cos();
        let (sy, cy) = theta_y.sin_cos();
        let (sz, cz) = theta_z.sin_cos();
        self.mul(&Self::from_cols_array(&[
            cy * cz,
            sx * sy * cz - cx * sz,
            cx * sy * cz + sx * sz,
            0.0,
            cy * sz,
            sx * sy * sz + cx * cz,
            cx * sy * sz - sx * cz,
            0.0,
            -sy,
            sx * cy,
            cx * cy,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ]))
    }

    /// Rotation by `theta` around `axis` (expected unit length).
    #[must_use]
    pub fn rotate_axis(&self, axis: Vec3, theta: f32) -> Self {
        let Vec3 { x, y, z } = axis;
        let (s, c) = theta.sin_cos();
        let t = 1.0 - c;
        self.mul(&Self::from_cols_array(&[
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            0.0,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            0.0,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ]))
    }

    #[inline]
    #[must_use]
    pub fn scale(&self, x: f32, y: f32, z: f32) -> Self {
        self.mul(&Self(glam::Mat4::from_scale(glam::Vec3::new(x, y, z))))
    }

    // ========================================================================
    // Inversion
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn determinant(&self) -> f32 {
        self.0.determinant()
    }

    /// Inverse matrix, or identity when the determinant is below `f32::EPSILON`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.determinant().abs() < f32::EPSILON {
            return Self::IDENTITY;
        }
        Self(self.0.inverse())
    }

    #[inline]
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    // ========================================================================
    // Translation column
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate().into()
    }

    #[inline]
    pub fn set_translation(&mut self, t: Vec3) {
        self.0.w_axis.x = t.x;
        self.0.w_axis.y = t.y;
        self.0.w_axis.z = t.z;
    }

    /// Adds `(x, y, z)` to the translation column in place.
    #[inline]
    pub fn offset_translation(&mut self, x: f32, y: f32, z: f32) {
        self.0.w_axis.x += x;
        self.0.w_axis.y += y;
        self.0.w_axis.z += z;
    }

    #[inline]
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }

    #[inline]
    #[must_use]
    pub fn as_glam(&self) -> &glam::Mat4 {
        &self.0
    }
}

impl From<glam::Mat4> for Mat4 {
    #[inline]
    fn from(m: glam::Mat4) -> Self {
        Self(m)
    }
}

impl AsRef<[f32; 16]> for Mat4 {
    #[inline]
    fn as_ref(&self) -> &[f32; 16] {
        self.0.as_ref()
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &AsRef::<[f32; 16]>::as_ref(&self.0)[index]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut AsMut::<[f32; 16]>::as_mut(&mut self.0)[index]
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Mat4::mul(&self, &rhs)
    }
}
