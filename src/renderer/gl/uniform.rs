use web_sys::WebGl2RenderingContext as Gl;

use super::introspect::UniformInfo;
use crate::renderer::draw_info::UniformValue;

/// Binds `value` to the uniform described by `info`.
///
/// The GL call is chosen from the uniform's declared type; a value of the
/// wrong shape is logged and skipped.
pub fn set_uniform(gl: &Gl, info: &UniformInfo, value: &UniformValue) {
    let loc = Some(&info.location);
    match (info.gl_type, value) {
        (
            Gl::INT | Gl::BOOL | Gl::SAMPLER_2D | Gl::SAMPLER_2D_ARRAY | Gl::INT_SAMPLER_2D | Gl::SAMPLER_3D,
            UniformValue::Int(v),
        ) => gl.uniform1i(loc, *v),
        (Gl::INT | Gl::BOOL | Gl::SAMPLER_2D | Gl::SAMPLER_2D_ARRAY, UniformValue::IntArray(v)) => {
            gl.uniform1iv_with_i32_array(loc, v);
        }
        (Gl::FLOAT, UniformValue::Float(v)) => gl.uniform1f(loc, *v),
        (Gl::FLOAT, UniformValue::FloatArray(v)) => gl.uniform1fv_with_f32_array(loc, v),
        (Gl::FLOAT_VEC2, UniformValue::Vec2(v)) => gl.uniform2fv_with_f32_array(loc, v),
        (Gl::FLOAT_VEC3, UniformValue::Vec3(v)) => gl.uniform3fv_with_f32_array(loc, v),
        (Gl::FLOAT_VEC4, UniformValue::Vec4(v)) => gl.uniform4fv_with_f32_array(loc, v),
        (Gl::FLOAT_MAT2, UniformValue::FloatArray(v)) if v.len() == 4 => {
            gl.uniform_matrix2fv_with_f32_array(loc, false, v);
        }
        (Gl::FLOAT_MAT3, UniformValue::FloatArray(v)) if v.len() == 9 => {
            gl.uniform_matrix3fv_with_f32_array(loc, false, v);
        }
        (Gl::FLOAT_MAT4, UniformValue::Mat4(m)) => {
            gl.uniform_matrix4fv_with_f32_array(loc, false, m.as_ref());
        }
        (gl_type, value) => {
            log::debug!("Uniform type 0x{gl_type:04x} does not accept {value:?}");
        }
    }
}
