use std::ops::{Add, Sub};

/// Three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        (glam::Vec3::from(self) - glam::Vec3::from(other)).into()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Self {
        glam::Vec3::from(self).normalize_or_zero().into()
    }

    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        glam::Vec3::from(self).dot(other.into())
    }

    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        glam::Vec3::from(self).cross(other.into()).into()
    }

    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        glam::Vec3::from(self).length()
    }

    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<glam::Vec3> for Vec3 {
    #[inline]
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for glam::Vec3 {
    #[inline]
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        (glam::Vec3::from(self) + glam::Vec3::from(rhs)).into()
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Vec3::sub(self, rhs)
    }
}
