//! Linear Algebra
//!
//! Small column-major 3D math layer used by shapes, the camera and the
//! render loop. Both types wrap [`glam`] but keep the composition rules the
//! renderer depends on:
//!
//! - every transform method on [`Mat4`] right-multiplies (`self * op`), so a
//!   chain like `.rotate_x(a).scale(s)` scales first in world terms;
//! - degenerate inputs never produce NaN: [`Mat4::look_at`] and
//!   [`Mat4::inverse`] fall back to identity, [`Vec3::normalize`] to zero.

pub mod mat4;
pub mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
