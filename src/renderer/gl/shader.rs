use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader};

use crate::errors::{FolioError, Result};

/// Compiles one shader stage.
pub fn create_shader(gl: &Gl, stage: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(stage)
        .ok_or(FolioError::ResourceAllocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Ok(shader);
    }

    let message = gl.get_shader_info_log(&shader).unwrap_or_default();
    log::error!("Shader compile failed: {message}");
    gl.delete_shader(Some(&shader));
    Err(FolioError::ShaderCompile(message))
}

/// Compiles and links a vertex/fragment pair.
///
/// On failure everything created so far is detached and deleted.
pub fn create_program(gl: &Gl, vertex: &str, fragment: &str) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or(FolioError::ResourceAllocation("program"))?;

    let vs = match create_shader(gl, Gl::VERTEX_SHADER, vertex) {
        Ok(vs) => vs,
        Err(e) => {
            gl.delete_program(Some(&program));
            return Err(e);
        }
    };
    gl.attach_shader(&program, &vs);

    let fs = match create_shader(gl, Gl::FRAGMENT_SHADER, fragment) {
        Ok(fs) => fs,
        Err(e) => {
            gl.detach_shader(&program, &vs);
            gl.delete_shader(Some(&vs));
            gl.delete_program(Some(&program));
            return Err(e);
        }
    };
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Ok(program);
    }

    let message = gl.get_program_info_log(&program).unwrap_or_default();
    log::error!("Program link failed: {message}");
    gl.detach_shader(&program, &vs);
    gl.detach_shader(&program, &fs);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    gl.delete_program(Some(&program));
    Err(FolioError::ProgramLink(message))
}
