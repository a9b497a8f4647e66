//! Leaf drawables.
//!
//! A [`Shape`] is one geometry kind drawn with its own world matrix, colors
//! and pick id. Visibility is governed by [`Interaction`], which is shared
//! with composites.

use bitflags::bitflags;
use web_sys::WebGl2RenderingContext as Gl;

use crate::math::Mat4;
use crate::resources::{GeometryCounts, GeometryKind};

/// Default shape color.
pub const WHITE: [f32; 3] = [255.0, 255.0, 255.0];
pub const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

// ============================================================================
// ShapeType
// ============================================================================

bitflags! {
    /// Fragment-shader branch selector, bound as `u_type`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShapeType: u32 {
        const TEXTURED   = 0x1;
        const SPHERE     = 0x2;
        const LINE       = 0x4;
        const BACKGROUND = 0x8;
        const SHADOW     = 0x10;
        const TEXT       = Self::TEXTURED.bits() | Self::SPHERE.bits();
    }
}

impl ShapeType {
    /// Plain lit color.
    pub const COLORED: Self = Self::empty();
    pub const LOGO: Self = Self::TEXTURED;
}

impl Default for ShapeType {
    fn default() -> Self {
        Self::COLORED
    }
}

// ============================================================================
// Topology
// ============================================================================

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    Lines,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    #[must_use]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Lines => Gl::LINES,
            Self::Triangles => Gl::TRIANGLES,
            Self::TriangleStrip => Gl::TRIANGLE_STRIP,
            Self::TriangleFan => Gl::TRIANGLE_FAN,
        }
    }
}

// ============================================================================
// Display & Interaction
// ============================================================================

/// Policy deciding whether [`Interaction::hide`] may take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Always shown; `hide` is ignored.
    #[default]
    Inherit,
    /// Shown or hidden by application code only; `hide` is ignored.
    Fixed,
    /// Starts hidden; `hide` works.
    Hidden,
}

/// Visibility and pointer state of a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub display: Display,
    pub visible: bool,
    pub hovered: bool,
    pub focused: bool,
}

impl Interaction {
    #[must_use]
    pub fn new(display: Display) -> Self {
        Self {
            display,
            visible: display != Display::Hidden,
            hovered: false,
            focused: false,
        }
    }

    #[inline]
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides unless focused, hovered, or the display policy is not `Hidden`.
    pub fn hide(&mut self) {
        if self.focused || self.hovered || self.display != Display::Hidden {
            return;
        }
        self.visible = false;
    }

    #[inline]
    pub fn focus(&mut self) {
        self.focused = true;
        self.visible = true;
    }

    /// Clears pointer state. Leaves `visible` untouched.
    #[inline]
    pub fn blur(&mut self) {
        self.hovered = false;
        self.focused = false;
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(Display::default())
    }
}

// ============================================================================
// ShapeProps
// ============================================================================

/// Optional overrides for the shape constructors; `None` keeps the
/// constructor's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeProps {
    pub id: Option<i32>,
    pub shape_type: Option<ShapeType>,
    pub display: Option<Display>,
    pub pos: [f32; 3],
    pub rotation: Option<[f32; 3]>,
    pub scale: Option<[f32; 3]>,
    pub color: Option<[f32; 3]>,
    pub pick_color: Option<[f32; 3]>,
}

impl ShapeProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_type(mut self, shape_type: ShapeType) -> Self {
        self.shape_type = Some(shape_type);
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.pos = [x, y, z];
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Some([x, y, z]);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Some([x, y, z]);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_pick_color(mut self, color: [f32; 3]) -> Self {
        self.pick_color = Some(color);
        self
    }
}

// ============================================================================
// Shape
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Pick id; `-1` means unset.
    pub id: i32,
    pub kind: GeometryKind,
    pub shape_type: ShapeType,
    pub topology: Topology,
    pub world: Mat4,
    /// RGB in 0-255.
    pub color: [f32; 3],
    /// RGB in 0-255, used while the shape's id is picked.
    pub pick_color: [f32; 3],
    /// Texture-atlas layer.
    pub depth: i32,
    pub state: Interaction,
    /// Filled in once the geometry has been uploaded.
    pub counts: GeometryCounts,
}

impl Shape {
    /// Shape with a translation-only world matrix.
    ///
    /// `defaults` supplies the constructor-specific id, type and display used
    /// when `props` leaves them unset.
    #[must_use]
    pub fn new(
        kind: GeometryKind,
        topology: Topology,
        props: &ShapeProps,
        defaults: (i32, ShapeType, Display),
    ) -> Self {
        let (id, shape_type, display) = defaults;
        let [x, y, z] = props.pos;
        Self {
            id: props.id.unwrap_or(id),
            kind,
            shape_type: props.shape_type.unwrap_or(shape_type),
            topology,
            world: Mat4::from_translation(x, y, z),
            color: props.color.unwrap_or(WHITE),
            pick_color: props.pick_color.unwrap_or(WHITE),
            depth: 0,
            state: Interaction::new(props.display.unwrap_or(display)),
            counts: GeometryCounts::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_world(mut self, world: Mat4) -> Self {
        self.world = world;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }
}
