//! Thin WebGL2 helpers.
//!
//! Every function logs the failing call with `log::error!` and returns a
//! [`FolioError`](crate::errors::FolioError); none of them panic.

pub mod buffer;
pub mod framebuffer;
pub mod introspect;
pub mod quad;
pub mod shader;
pub mod texture;
pub mod uniform;

pub use buffer::{GpuGeometry, create_static_buffer, create_vao, read_back_geometry, upload_geometry};
pub use framebuffer::{
    FrameBufferObject, attach_depth_buffer, attach_texture_buffer, create_frame_buffer_object, draw_buffer_list,
    set_draw_buffers,
};
pub use introspect::{AttributeInfo, AttributeMap, UniformInfo, UniformMap, initialize_attributes, initialize_uniforms};
pub use quad::{QUAD_VERTICES, QuadPass};
pub use shader::{create_program, create_shader};
pub use texture::{atlas_cell_origin, create_texture_array_buffer, load_textures, mip_levels};
pub use uniform::set_uniform;
