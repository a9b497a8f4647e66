//! Active attribute / uniform discovery on a linked program.

use rustc_hash::FxHashMap;
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlUniformLocation};

use crate::renderer::settings::{AttributeKind, AttributeLayout};

/// A vertex attribute that is both active in the program and described by
/// an [`AttributeLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub location: u32,
    /// Type reported by the program (e.g. `FLOAT_VEC3`).
    pub active_type: u32,
    pub kind: AttributeKind,
    pub len: i32,
    pub stride: i32,
    pub size: i32,
    /// Byte offset within a vertex.
    pub offset: i32,
}

/// Active attributes in layout declaration order.
pub type AttributeMap = Vec<AttributeInfo>;

#[derive(Debug, Clone)]
pub struct UniformInfo {
    pub location: WebGlUniformLocation,
    pub gl_type: u32,
    /// Array length (1 for scalars).
    pub size: i32,
}

pub type UniformMap = FxHashMap<String, UniformInfo>;

/// `"u_picked[0]"` → `"u_picked"`.
#[must_use]
pub fn base_name(name: &str) -> &str {
    name.split_once('[').map_or(name, |(base, _)| base)
}

fn active_count(gl: &Gl, program: &WebGlProgram, pname: u32) -> u32 {
    gl.get_program_parameter(program, pname)
        .as_f64()
        .map_or(0, |n| n as u32)
}

/// Resolves `layouts` against the program's active attributes.
///
/// Offsets accumulate by `len * size` over every layout in declaration
/// order, active or not. Layouts whose attribute is not active are dropped;
/// active attributes without a layout are logged and ignored.
#[must_use]
pub fn initialize_attributes(gl: &Gl, program: &WebGlProgram, layouts: &[AttributeLayout]) -> AttributeMap {
    let mut active: FxHashMap<String, u32> = FxHashMap::default();
    for index in 0..active_count(gl, program, Gl::ACTIVE_ATTRIBUTES) {
        if let Some(info) = gl.get_active_attrib(program, index) {
            active.insert(base_name(&info.name()).to_owned(), info.type_());
        }
    }

    let mut map = AttributeMap::with_capacity(layouts.len());
    let mut offset = 0;
    for layout in layouts {
        let layout_offset = offset;
        offset += layout.len * layout.size;

        let Some(&active_type) = active.get(&layout.name) else {
            log::debug!("Attribute {} is not active; skipped", layout.name);
            continue;
        };
        let location = gl.get_attrib_location(program, &layout.name);
        let Ok(location) = u32::try_from(location) else {
            continue;
        };
        map.push(AttributeInfo {
            name: layout.name.clone(),
            location,
            active_type,
            kind: layout.kind,
            len: layout.len,
            stride: layout.stride,
            size: layout.size,
            offset: layout_offset,
        });
    }

    for name in active.keys() {
        if !layouts.iter().any(|l| &l.name == name) {
            log::warn!("Active attribute {name} has no layout");
        }
    }

    map
}

/// All active uniforms keyed by base name.
#[must_use]
pub fn initialize_uniforms(gl: &Gl, program: &WebGlProgram) -> UniformMap {
    let mut map = UniformMap::default();
    for index in 0..active_count(gl, program, Gl::ACTIVE_UNIFORMS) {
        let Some(info) = gl.get_active_uniform(program, index) else {
            continue;
        };
        let name = base_name(&info.name()).to_owned();
        let Some(location) = gl.get_uniform_location(program, &name) else {
            continue;
        };
        map.insert(
            name,
            UniformInfo {
                location,
                gl_type: info.type_(),
                size: info.size(),
            },
        );
    }
    map
}
