//! Uniform values supplied to the main program.
//!
//! A [`DrawInfo`] maps uniform names to one of three kinds of value:
//!
//! - [`DrawValue::Static`]: bound once per frame before drawing;
//! - [`DrawValue::Array`]: bound once per frame through the array path
//!   (`uniform1iv` / `uniform1fv`), e.g. the `u_picked` id list;
//! - [`DrawValue::PerShape`]: evaluated for every shape right before its
//!   draw call, which is how `u_model`, `u_id`, `u_color` and friends are
//!   supplied without special-casing them in the render loop.
//!
//! Names with no matching active uniform in the program are ignored.

use std::fmt;

use rustc_hash::FxHashMap;
use web_sys::WebGlTexture;

use crate::math::{Mat4, Vec3};
use crate::scene::Shape;

/// Fixed uniform names of the main program.
pub mod names {
    pub const VIEW_PROJECTION: &str = "u_vpm";
    pub const MODEL: &str = "u_model";
    pub const TYPE: &str = "u_type";
    pub const ID: &str = "u_id";
    pub const COLOR: &str = "u_color";
    pub const PICK_COLOR: &str = "u_pick_color";
    pub const LIGHT_DIR: &str = "u_light_dir";
    pub const PICKED: &str = "u_picked";
    pub const DEPTH: &str = "u_depth";
    pub const SAMPLER: &str = "u_sampler";
}

/// Length of the `u_picked` array in the main fragment shader.
pub const PICKED_LEN: usize = 5;

// ============================================================================
// Values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Mat4),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        Self::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v.to_array())
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(v: Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

pub type ShapeUniform = Box<dyn Fn(&Shape) -> UniformValue>;

pub enum DrawValue {
    Static(UniformValue),
    Array(UniformValue),
    PerShape(ShapeUniform),
}

impl fmt::Debug for DrawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Self::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Self::PerShape(_) => f.write_str("PerShape(..)"),
        }
    }
}

// ============================================================================
// DrawInfo
// ============================================================================

#[derive(Debug, Default)]
pub struct DrawInfo {
    entries: FxHashMap<String, DrawValue>,
    /// Loaded texture atlases, indexed by composite atlas slot. Filled in by
    /// the program once loading finishes.
    atlases: Vec<WebGlTexture>,
}

impl DrawInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-shape uniforms of the main shaders, `u_light_dir` and an
    /// empty `u_picked` list. `u_vpm` is left to the caller.
    #[must_use]
    pub fn with_shape_defaults(light_dir: Vec3) -> Self {
        Self::new()
            .with_per_shape(names::TYPE, |s| UniformValue::Int(s.shape_type.bits() as i32))
            .with_per_shape(names::ID, |s| UniformValue::Int(s.id))
            .with_per_shape(names::MODEL, |s| UniformValue::Mat4(s.world))
            .with_per_shape(names::COLOR, |s| UniformValue::Vec3(s.color))
            .with_per_shape(names::PICK_COLOR, |s| UniformValue::Vec3(s.pick_color))
            .with_per_shape(names::DEPTH, |s| UniformValue::Int(s.depth))
            .with_static(names::LIGHT_DIR, light_dir)
            .with_array(names::PICKED, vec![-1; PICKED_LEN])
    }

    #[must_use]
    pub fn with_static(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.set_static(name, value);
        self
    }

    #[must_use]
    pub fn with_array(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.entries
            .insert(name.to_owned(), DrawValue::Array(value.into()));
        self
    }

    #[must_use]
    pub fn with_per_shape<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Shape) -> UniformValue + 'static,
    {
        self.entries
            .insert(name.to_owned(), DrawValue::PerShape(Box::new(f)));
        self
    }

    /// Replaces (or adds) a static value, e.g. `u_vpm` after a camera move.
    pub fn set_static(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.entries
            .insert(name.to_owned(), DrawValue::Static(value.into()));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DrawValue> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<DrawValue> {
        self.entries.remove(name)
    }

    /// Mutable view of an integer array entry such as `u_picked`.
    pub fn ints_mut(&mut self, name: &str) -> Option<&mut Vec<i32>> {
        match self.entries.get_mut(name) {
            Some(
                DrawValue::Array(UniformValue::IntArray(v))
                | DrawValue::Static(UniformValue::IntArray(v)),
            ) => Some(v),
            _ => None,
        }
    }

    pub fn statics(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            DrawValue::Static(u) => Some((k.as_str(), u)),
            _ => None,
        })
    }

    pub fn arrays(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            DrawValue::Array(u) => Some((k.as_str(), u)),
            _ => None,
        })
    }

    pub fn per_shape(&self) -> impl Iterator<Item = (&str, &ShapeUniform)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            DrawValue::PerShape(f) => Some((k.as_str(), f)),
            _ => None,
        })
    }

    #[must_use]
    pub fn atlases(&self) -> &[WebGlTexture] {
        &self.atlases
    }

    pub fn set_atlases(&mut self, atlases: Vec<WebGlTexture>) {
        self.atlases = atlases;
    }
}
