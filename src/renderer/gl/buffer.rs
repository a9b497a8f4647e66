//! Vertex/index buffers and vertex-array objects.

use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlVertexArrayObject};

use super::introspect::AttributeMap;
use crate::errors::{FolioError, Result};
use crate::resources::{GeometryCounts, GeometryData};

/// Uploads `data` into a new buffer bound to `target`.
pub fn create_static_buffer(gl: &Gl, data: &[u8], target: u32, usage: u32) -> Result<WebGlBuffer> {
    let Some(buffer) = gl.create_buffer() else {
        log::error!("createBuffer returned null");
        return Err(FolioError::ResourceAllocation("buffer"));
    };
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, data, usage);
    gl.bind_buffer(target, None);
    Ok(buffer)
}

/// Binds every attribute in `attributes` onto `vertices` at its layout
/// offset.
pub fn create_vao(
    gl: &Gl,
    attributes: &AttributeMap,
    vertices: &WebGlBuffer,
    indices: Option<&WebGlBuffer>,
) -> Result<WebGlVertexArrayObject> {
    let Some(vao) = gl.create_vertex_array() else {
        log::error!("createVertexArray returned null");
        return Err(FolioError::ResourceAllocation("vertex array"));
    };
    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(vertices));

    for attr in attributes {
        gl.enable_vertex_attrib_array(attr.location);
        if attr.kind.is_integer() {
            gl.vertex_attrib_i_pointer_with_i32(
                attr.location,
                attr.len,
                attr.kind.gl_enum(),
                attr.stride,
                attr.offset,
            );
        } else {
            gl.vertex_attrib_pointer_with_i32(
                attr.location,
                attr.len,
                attr.kind.gl_enum(),
                false,
                attr.stride,
                attr.offset,
            );
        }
    }

    if let Some(indices) = indices {
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(indices));
    }
    gl.bind_vertex_array(None);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);
    Ok(vao)
}

// ============================================================================
// Geometry buffers
// ============================================================================

/// An uploaded vertex/index buffer pair.
#[derive(Debug, Clone)]
pub struct GpuGeometry {
    pub vertices: WebGlBuffer,
    pub indices: WebGlBuffer,
    pub counts: GeometryCounts,
}

/// Uploads `data` as `STATIC_DRAW` vertex and index buffers.
pub fn upload_geometry(gl: &Gl, data: &GeometryData) -> Result<GpuGeometry> {
    let vertices = create_static_buffer(
        gl,
        bytemuck::cast_slice(&data.vertices),
        Gl::ARRAY_BUFFER,
        Gl::STATIC_DRAW,
    )?;
    let indices = create_static_buffer(
        gl,
        bytemuck::cast_slice(&data.indices),
        Gl::ELEMENT_ARRAY_BUFFER,
        Gl::STATIC_DRAW,
    )?;
    Ok(GpuGeometry {
        vertices,
        indices,
        counts: data.counts(),
    })
}

/// Copies an uploaded geometry back to the CPU.
pub fn read_back_geometry(gl: &Gl, geometry: &GpuGeometry) -> Result<GeometryData> {
    let float_count = geometry.counts.vertices * crate::resources::FLOATS_PER_VERTEX;
    let vertex_view = js_sys::Float32Array::new_with_length(float_count as u32);
    let index_view = js_sys::Uint16Array::new_with_length(geometry.counts.indices as u32);

    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&geometry.vertices));
    gl.get_buffer_sub_data_with_i32_and_array_buffer_view(Gl::ARRAY_BUFFER, 0, &vertex_view);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);

    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&geometry.indices));
    gl.get_buffer_sub_data_with_i32_and_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, 0, &index_view);
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);

    let error = gl.get_error();
    if error != Gl::NO_ERROR {
        log::error!("getBufferSubData failed: 0x{error:04x}");
        return Err(FolioError::GeometryDecode(format!(
            "buffer read-back failed with GL error 0x{error:04x}"
        )));
    }

    Ok(GeometryData {
        vertices: vertex_view.to_vec(),
        indices: index_view.to_vec(),
    })
}
