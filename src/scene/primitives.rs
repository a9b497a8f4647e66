//! Leaf shape constructors with per-kind defaults.

use std::f32::consts::FRAC_PI_2;

use crate::math::{Mat4, Vec3};
use crate::resources::GeometryKind;

use super::shape::{Display, Shape, ShapeProps, ShapeType, Topology};

const ONE: [f32; 3] = [1.0, 1.0, 1.0];

fn translation(props: &ShapeProps) -> Mat4 {
    let [x, y, z] = props.pos;
    Mat4::from_translation(x, y, z)
}

impl Shape {
    /// Line-list floor grid. Defaults: id 0, fixed.
    #[must_use]
    pub fn grid(x_max: f32, y_max: f32, step: f32, props: &ShapeProps) -> Self {
        Self::new(
            GeometryKind::grid(x_max, y_max, step),
            Topology::Lines,
            props,
            (0, ShapeType::COLORED, Display::Fixed),
        )
    }

    /// Node sphere. Defaults: type `SPHERE`.
    #[must_use]
    pub fn sphere(props: &ShapeProps) -> Self {
        let [sx, sy, sz] = props.scale.unwrap_or(ONE);
        Self::new(
            GeometryKind::Sphere,
            Topology::Triangles,
            props,
            (-1, ShapeType::SPHERE, Display::Inherit),
        )
        .with_world(translation(props).scale(sx, sy, sz))
    }

    /// Root marker, tilted back by 0.25 rad. Default scale 0.075.
    #[must_use]
    pub fn root(props: &ShapeProps) -> Self {
        let [sx, sy, sz] = props.scale.unwrap_or([0.075; 3]);
        Self::new(
            GeometryKind::Root,
            Topology::Triangles,
            props,
            (-1, ShapeType::COLORED, Display::Inherit),
        )
        .with_world(translation(props).rotate_x(-0.25).scale(sx, sy, sz))
    }

    /// Flat disc. Defaults: id 0.
    #[must_use]
    pub fn circle(props: &ShapeProps) -> Self {
        let [sx, sy, sz] = props.scale.unwrap_or(ONE);
        Self::new(
            GeometryKind::Circle,
            Topology::TriangleStrip,
            props,
            (0, ShapeType::COLORED, Display::Inherit),
        )
        .with_world(translation(props).scale(sx, sy, sz))
    }

    /// Disc laid flat and widened by 0.15 on x/z. Defaults: type `SHADOW`.
    #[must_use]
    pub fn background(props: &ShapeProps) -> Self {
        let [sx, sy, sz] = props.scale.unwrap_or(ONE);
        Self::new(
            GeometryKind::Background,
            Topology::TriangleFan,
            props,
            (-1, ShapeType::SHADOW, Display::Inherit),
        )
        .with_world(
            translation(props)
                .rotate_x(-FRAC_PI_2)
                .scale(sx + 0.15, sy, sz + 0.15),
        )
    }

    /// Unit segment stretched from `start` to `end` with thickness `scale`.
    ///
    /// `props.pos` is ignored; the segment midpoint is the translation.
    #[must_use]
    pub fn line(start: [f32; 3], end: [f32; 3], scale: f32, props: &ShapeProps) -> Self {
        let delta = Vec3::new(end[0] - start[0], end[1] - start[1], end[2] - start[2]);
        let len = delta.length();
        let up = Vec3::Y;
        let dir = delta.normalize();
        let axis = up.cross(dir).normalize();
        let theta = up.dot(dir).clamp(-1.0, 1.0).acos();

        let world = Mat4::from_translation(
            delta.x / 2.0 + start[0],
            delta.y / 2.0 + start[1],
            delta.z / 2.0 + start[2],
        )
        .rotate_axis(axis, theta)
        .scale(scale, len * 0.5, scale);

        Self::new(
            GeometryKind::Line,
            Topology::Triangles,
            props,
            (-1, ShapeType::LINE, Display::Inherit),
        )
        .with_world(world)
    }

    /// Textured quad showing atlas layer `depth`. Defaults: `TEXTURED`, hidden.
    #[must_use]
    pub fn plane(depth: i32, props: &ShapeProps) -> Self {
        let [rx, ry, rz] = props.rotation.unwrap_or([0.0; 3]);
        let [sx, sy, sz] = props.scale.unwrap_or(ONE);
        let mut shape = Self::new(
            GeometryKind::Plane,
            Topology::Triangles,
            props,
            (-1, ShapeType::TEXTURED, Display::Hidden),
        )
        .with_world(translation(props).rotate(rx, ry, rz).scale(sx, sy, sz));
        shape.depth = depth;
        shape
    }

    /// Inline test triangle. Defaults: id 1, red, fixed.
    #[must_use]
    pub fn triangle(props: &ShapeProps) -> Self {
        let mut shape = Self::new(
            GeometryKind::Triangle,
            Topology::Triangles,
            props,
            (1, ShapeType::COLORED, Display::Fixed),
        );
        shape.color = props.color.unwrap_or([255.0, 0.0, 0.0]);
        shape.pick_color = props.pick_color.unwrap_or([255.0, 0.0, 1.0]);
        shape
    }
}
