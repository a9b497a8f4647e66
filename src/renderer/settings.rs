//! Program & Plugin Settings
//!
//! Plain configuration data consumed by [`Program::new`](super::Program::new)
//! and the built-in plugins. Every struct implements `Default` and
//! (de)serializes with `#[serde(default)]`, so a page can hand over a partial
//! JSON object and only override what it cares about.
//!
//! ```rust,ignore
//! use folio::renderer::ProgramOptions;
//!
//! let options: ProgramOptions = serde_json::from_str(r#"{ "frame_rate": 30 }"#)?;
//! assert_eq!(options.attributes.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use web_sys::WebGl2RenderingContext as Gl;

// ---------------------------------------------------------------------------
// Vertex attributes
// ---------------------------------------------------------------------------

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    #[default]
    Float,
    Int,
    UnsignedInt,
}

impl AttributeKind {
    #[must_use]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Float => Gl::FLOAT,
            Self::Int => Gl::INT,
            Self::UnsignedInt => Gl::UNSIGNED_INT,
        }
    }

    /// Integer attributes are bound with `vertexAttribIPointer`.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float)
    }
}

/// How one named attribute is laid out in the interleaved vertex buffer.
///
/// Offsets are not stored: they accumulate as `len * size` in the order the
/// layouts are declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeLayout {
    pub name: String,
    pub kind: AttributeKind,
    /// Component count (1-4).
    pub len: i32,
    /// Bytes between consecutive vertices.
    pub stride: i32,
    /// Bytes per component.
    pub size: i32,
}

impl Default for AttributeLayout {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: AttributeKind::Float,
            len: 1,
            stride: 0,
            size: 4,
        }
    }
}

impl AttributeLayout {
    #[must_use]
    pub fn float(name: &str, len: i32, stride: i32) -> Self {
        Self {
            name: name.to_owned(),
            len,
            stride,
            ..Default::default()
        }
    }
}

/// `a_position(3) a_uv(2) a_normal(3)`, 32-byte stride.
#[must_use]
pub fn default_attributes() -> Vec<AttributeLayout> {
    vec![
        AttributeLayout::float("a_position", 3, 32),
        AttributeLayout::float("a_uv", 2, 32),
        AttributeLayout::float("a_normal", 3, 32),
    ]
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// A texture atlas: one image tiled into `width × height` cells, `depth` layers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureAtlasDesc {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

/// Where each model-backed geometry kind is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub sphere: String,
    pub root: String,
    pub circle: String,
    pub line: String,
    pub plane: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            sphere: "/static/models/ico-sphere.bin".to_owned(),
            root: "/static/models/root.bin".to_owned(),
            circle: "/static/models/plane-circle.bin".to_owned(),
            line: "/static/models/line-segment.bin".to_owned(),
            plane: "/static/models/plane-square.bin".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProgramOptions
// ---------------------------------------------------------------------------

/// Construction-time options for [`Program`](super::Program).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramOptions {
    /// RGB in 0-255, alpha in 0-1.
    pub clear_color: [f32; 4],
    /// Upper bound on accepted frames per second.
    pub frame_rate: f64,
    pub attributes: Vec<AttributeLayout>,
    pub textures: Vec<TextureAtlasDesc>,
    pub assets: AssetPaths,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frame_rate: 60.0,
            attributes: default_attributes(),
            textures: Vec::new(),
            assets: AssetPaths::default(),
        }
    }
}

impl ProgramOptions {
    /// Clear color with RGB mapped to `[0, 1]`.
    #[must_use]
    pub fn clear_color_normalized(&self) -> [f32; 4] {
        let [r, g, b, a] = self.clear_color;
        [r / 255.0, g / 255.0, b / 255.0, a]
    }
}

// ---------------------------------------------------------------------------
// BloomSettings
// ---------------------------------------------------------------------------

/// Tuning for [`BloomPlugin`](super::plugins::BloomPlugin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Total blur passes, alternating horizontal and vertical.
    pub iterations: u32,
    /// Weight of the blurred threshold image in the final blend.
    pub strength: f32,
    /// Ping-pong target size relative to the main framebuffer.
    pub scale: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            iterations: 10,
            strength: 1.75,
            scale: 0.5,
        }
    }
}
