//! Composite presets used by the resume map.
//!
//! Each preset creates its leaves and groups them under a detached
//! composite; register the result with [`Scene::add_root`] or nest it in a
//! larger composite.

use std::f32::consts::FRAC_PI_2;

use super::composite::CompositeProps;
use super::scene::{DrawableId, Scene};
use super::shape::{BLACK, Display, Shape, ShapeProps, ShapeType};

/// Highlight color of interactive nodes.
pub const PICK_ORANGE: [f32; 3] = [255.0, 141.0, 35.0];

/// Atlas slots bound by the textured presets.
pub const LOGO_ATLAS: usize = 0;
pub const TEXT_ATLAS: usize = 1;
pub const PROJECT_ATLAS: usize = 2;

fn shadow(display: Display, y: f32) -> ShapeProps {
    ShapeProps::new()
        .with_display(display)
        .with_type(ShapeType::SHADOW)
        .with_position(0.0, y, 0.0)
        .with_color(BLACK)
}

impl Scene {
    /// Tree root: marker, background disc and shadow. Default display fixed.
    pub fn root_node(&mut self, props: CompositeProps) -> DrawableId {
        let display = props.display.unwrap_or(Display::Fixed);
        let children = vec![
            self.create_shape(Shape::root(
                &ShapeProps::new()
                    .with_display(display)
                    .with_position(0.0, 0.025, 0.0)
                    .with_pick_color(PICK_ORANGE),
            )),
            self.create_shape(Shape::background(
                &ShapeProps::new()
                    .with_id(-1)
                    .with_type(ShapeType::BACKGROUND)
                    .with_position(0.0, 0.075, 0.0),
            )),
            self.create_shape(Shape::circle(&shadow(display, 0.015))),
        ];
        self.create_composite(
            CompositeProps {
                display: Some(display),
                ..props
            },
            children,
        )
    }

    /// Graph node: sphere and shadow. Leaves default to fixed display.
    pub fn node(&mut self, props: CompositeProps) -> DrawableId {
        let display = props.display.unwrap_or(Display::Fixed);
        let children = vec![
            self.create_shape(Shape::sphere(
                &ShapeProps::new()
                    .with_display(display)
                    .with_position(0.0, 0.06, 0.0)
                    .with_pick_color(PICK_ORANGE),
            )),
            self.create_shape(Shape::circle(&shadow(display, 0.015))),
        ];
        self.create_composite(
            CompositeProps {
                display: None,
                ..props
            },
            children,
        )
    }

    /// Hidden connector from `start` to `end` with a shadow line below it.
    pub fn edge(&mut self, start: [f32; 3], end: [f32; 3]) -> DrawableId {
        let children = vec![
            self.create_shape(Shape::line(
                start,
                end,
                0.0015,
                &ShapeProps::new()
                    .with_display(Display::Hidden)
                    .with_pick_color(PICK_ORANGE),
            )),
            self.create_shape(Shape::line(
                [start[0], 0.0125, start[2]],
                [end[0], 0.0125, end[2]],
                0.00125,
                &ShapeProps::new()
                    .with_display(Display::Hidden)
                    .with_type(ShapeType::SHADOW)
                    .with_color(BLACK),
            )),
        ];
        self.create_composite(
            CompositeProps::new().with_position(-start[0], 0.0, -start[2]),
            children,
        )
    }

    /// Company logo on atlas 0. `props.pos.y` lifts the plane, not the group.
    pub fn logo(&mut self, depth: i32, props: CompositeProps, scale: Option<[f32; 3]>) -> DrawableId {
        let display = props.display.unwrap_or(Display::Hidden);
        let [x, y, z] = props.pos;
        let [sx, sy, sz] = scale.unwrap_or([1.2, 1.0, 1.0]);
        let children = vec![
            self.create_shape(Shape::plane(
                depth,
                &ShapeProps::new()
                    .with_display(display)
                    .with_position(0.0, y, 0.0)
                    .with_rotation(-FRAC_PI_2, 0.0, 0.0)
                    .with_scale(sx, sy, sz),
            )),
            self.create_shape(Shape::circle(&shadow(display, 0.015))),
        ];
        self.create_composite(
            CompositeProps {
                id: Some(props.id.unwrap_or(0)),
                pos: [x, 0.0, z],
                display: Some(display),
                atlas: Some(LOGO_ATLAS),
            },
            children,
        )
    }

    /// Text card on atlas 1.
    pub fn text(
        &mut self,
        depth: i32,
        props: CompositeProps,
        scale: Option<[f32; 3]>,
        rotation: Option<[f32; 3]>,
    ) -> DrawableId {
        let display = props.display.unwrap_or(Display::Hidden);
        let [sx, sy, sz] = scale.unwrap_or([2.5, 1.0, 1.5]);
        let [rx, ry, rz] = rotation.unwrap_or([-FRAC_PI_2, 0.0, 0.0]);
        let children = vec![self.create_shape(Shape::plane(
            depth,
            &ShapeProps::new()
                .with_display(display)
                .with_rotation(rx, ry, rz)
                .with_scale(sx, sy, sz),
        ))];
        self.create_composite(
            CompositeProps {
                id: Some(props.id.unwrap_or(0)),
                pos: props.pos,
                display: None,
                atlas: Some(TEXT_ATLAS),
            },
            children,
        )
    }

    /// Project thumbnail with shadow on atlas 2.
    pub fn project(&mut self, depth: i32, props: CompositeProps, rotation: Option<[f32; 3]>) -> DrawableId {
        let [rx, ry, rz] = rotation.unwrap_or([-FRAC_PI_2, 0.0, 0.0]);
        let children = vec![
            self.create_shape(Shape::plane(
                depth,
                &ShapeProps::new()
                    .with_display(Display::Hidden)
                    .with_position(0.0, 0.1, 0.0)
                    .with_rotation(rx, ry, rz)
                    .with_scale(1.2, 1.0, 1.0),
            )),
            self.create_shape(Shape::circle(&shadow(Display::Hidden, 0.005))),
        ];
        self.create_composite(
            CompositeProps {
                id: Some(props.id.unwrap_or(0)),
                pos: props.pos,
                display: None,
                atlas: Some(PROJECT_ATLAS),
            },
            children,
        )
    }
}
