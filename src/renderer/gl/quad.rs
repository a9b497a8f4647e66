//! Full-screen quad passes.

use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlVertexArrayObject};

use super::buffer::{create_static_buffer, create_vao};
use super::introspect::{UniformMap, initialize_attributes, initialize_uniforms};
use super::shader::create_program;
use super::uniform::set_uniform;
use crate::errors::Result;
use crate::renderer::draw_info::UniformValue;
use crate::renderer::settings::AttributeLayout;
use crate::renderer::shaders::QUAD_VERTEX;

/// Triangle-strip quad covering clip space: `x, y, u, v` per vertex.
pub const QUAD_VERTICES: [f32; 16] = [
    -1.0, 1.0, 0.0, 1.0, //
    -1.0, -1.0, 0.0, 0.0, //
    1.0, 1.0, 1.0, 1.0, //
    1.0, -1.0, 1.0, 0.0,
];

#[must_use]
pub fn quad_attributes() -> Vec<AttributeLayout> {
    vec![
        AttributeLayout::float("a_position", 2, 16),
        AttributeLayout::float("a_texcoord", 2, 16),
    ]
}

/// A program drawn over [`QUAD_VERTICES`] with a caller-chosen fragment
/// shader.
pub struct QuadPass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    uniforms: UniformMap,
}

impl QuadPass {
    pub fn new(gl: &Gl, fragment: &str) -> Result<Self> {
        let program = create_program(gl, QUAD_VERTEX, fragment)?;
        let attributes = initialize_attributes(gl, &program, &quad_attributes());
        let uniforms = initialize_uniforms(gl, &program);
        let buffer = create_static_buffer(
            gl,
            bytemuck::cast_slice(&QUAD_VERTICES),
            Gl::ARRAY_BUFFER,
            Gl::STATIC_DRAW,
        )?;
        let vao = create_vao(gl, &attributes, &buffer, None)?;
        Ok(Self { program, vao, uniforms })
    }

    /// Makes this the current program.
    pub fn bind(&self, gl: &Gl) {
        gl.use_program(Some(&self.program));
    }

    /// Sets a uniform on the bound program; unknown names are ignored.
    pub fn set(&self, gl: &Gl, name: &str, value: impl Into<UniformValue>) {
        if let Some(info) = self.uniforms.get(name) {
            set_uniform(gl, info, &value.into());
        }
    }

    /// Draws the quad into whatever framebuffer is bound.
    pub fn draw(&self, gl: &Gl) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
    }
}
