//! Map camera and camera pans.
//!
//! The resume map is viewed from a fixed height: dragging slides eye and
//! target together over the x/z plane, and selecting a node eases the eye
//! towards it while keeping the eye-target offset.

use crate::math::{Mat4, Vec3};

/// Default duration of a [`CameraPan`] in milliseconds.
pub const PAN_DURATION_MS: f64 = 500.0;

/// Eye offset from a focused node's position on x/z.
pub const PAN_OFFSET: [f32; 2] = [0.125, -0.6589];

// ============================================================================
// Camera
// ============================================================================

/// Axis-aligned x/z region the camera eye may be dragged within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Default for DragBounds {
    fn default() -> Self {
        Self {
            x_min: -1.5,
            x_max: 1.5,
            z_min: -1.75,
            z_max: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, projection: Mat4) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            projection,
        }
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, self.up)
    }

    /// `projection * view`, the value bound to `u_vpm`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection.mul(&self.view())
    }

    /// Slides eye and target by a pointer drag.
    ///
    /// Movement on an axis is only applied while it brings the eye back
    /// towards the bounds or keeps it inside them.
    pub fn drag(&mut self, dx: f32, dz: f32, bounds: &DragBounds) {
        if (self.eye.x < bounds.x_max && dx <= 0.0) || (self.eye.x > bounds.x_min && dx >= 0.0) {
            self.eye.x -= dx;
            self.target.x -= dx;
        }
        if (self.eye.z > bounds.z_min && dz <= 0.0) || (self.eye.z < bounds.z_max && dz >= 0.0) {
            self.eye.z += dz;
            self.target.z += dz;
        }
    }

    /// Screen position of `world`'s origin in `[0, 1]²` (y down).
    #[must_use]
    pub fn project_to_viewport(&self, world: &Mat4) -> [f32; 2] {
        let m = self.view_projection().mul(world);
        [
            (m[12] / m[15]) * 0.5 + 0.5,
            (m[13] / m[15]) * -0.5 + 0.5,
        ]
    }
}

// ============================================================================
// CameraPan
// ============================================================================

/// An in-flight ease of the camera eye towards a destination on x/z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPan {
    from: [f32; 2],
    to: [f32; 2],
    progress: f32,
    duration_ms: f64,
}

impl CameraPan {
    /// Pan from the camera's current eye to `world`'s translation plus `offset`.
    #[must_use]
    pub fn towards(camera: &Camera, world: &Mat4, offset: [f32; 2], duration_ms: f64) -> Self {
        Self {
            from: [camera.eye.x, camera.eye.z],
            to: [world[12] + offset[0], world[14] + offset[1]],
            progress: 0.0,
            duration_ms: duration_ms.max(f64::EPSILON),
        }
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Moves the camera by `delta_ms` of wall time. Returns `false` once the
    /// pan has reached its destination.
    pub fn advance(&mut self, camera: &mut Camera, delta_ms: f64) -> bool {
        if self.is_finished() {
            return false;
        }
        self.progress = (self.progress + (delta_ms / self.duration_ms) as f32).min(1.0);
        let alpha = ease_in_out(self.progress);

        let offset_x = camera.target.x - camera.eye.x;
        let offset_z = camera.target.z - camera.eye.z;
        camera.eye.x = lerp(self.from[0], self.to[0], alpha);
        camera.eye.z = lerp(self.from[1], self.to[1], alpha);
        camera.target.x = camera.eye.x + offset_x;
        camera.target.z = camera.eye.z + offset_z;

        !self.is_finished()
    }
}

/// Quadratic ease-in-out on `[0, 1]`.
#[must_use]
pub fn ease_in_out(a: f32) -> f32 {
    if a < 0.5 {
        2.0 * a * a
    } else {
        1.0 - (-2.0 * a + 2.0).powi(2) / 2.0
    }
}

#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
