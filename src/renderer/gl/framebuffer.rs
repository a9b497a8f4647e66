//! Off-screen render targets.
//!
//! A [`FrameBufferObject`] owns one framebuffer with an ordered list of
//! color-attachment textures. Attachment `n` is `COLOR_ATTACHMENT0 + n` and
//! fragment output `location = n`; indices never move once assigned, so
//! plugins can append attachments and keep referring to them by index.

use web_sys::{WebGl2RenderingContext as Gl, WebGlFramebuffer, WebGlRenderbuffer, WebGlTexture};

use crate::errors::{FolioError, Result};

#[derive(Debug, Clone)]
pub struct FrameBufferObject {
    pub buffer: WebGlFramebuffer,
    pub width: i32,
    pub height: i32,
    pub attachments: Vec<WebGlTexture>,
    pub depth: Option<WebGlRenderbuffer>,
}

impl FrameBufferObject {
    /// `COLOR_ATTACHMENT0 + n` for every attachment.
    #[must_use]
    pub fn color_attachments(&self) -> Vec<u32> {
        (0..self.attachments.len() as u32)
            .map(|n| Gl::COLOR_ATTACHMENT0 + n)
            .collect()
    }

    #[inline]
    pub fn bind(&self, gl: &Gl) {
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&self.buffer));
    }
}

/// Draw-buffer list that writes only to the attachments in `enabled`;
/// other slots up to `count` get `NONE`.
#[must_use]
pub fn draw_buffer_list(count: usize, enabled: &[usize]) -> Vec<u32> {
    (0..count)
        .map(|n| {
            if enabled.contains(&n) {
                Gl::COLOR_ATTACHMENT0 + n as u32
            } else {
                Gl::NONE
            }
        })
        .collect()
}

/// Declares `buffers` as the current draw buffers.
pub fn set_draw_buffers(gl: &Gl, buffers: &[u32]) {
    let list: js_sys::Array = buffers.iter().map(|&b| wasm_bindgen::JsValue::from(b)).collect();
    gl.draw_buffers(&list);
}

fn is_integer_format(internal_format: u32) -> bool {
    matches!(
        internal_format,
        Gl::R8I
            | Gl::R8UI
            | Gl::R16I
            | Gl::R16UI
            | Gl::R32I
            | Gl::R32UI
            | Gl::RG16I
            | Gl::RG32I
            | Gl::RGBA16I
            | Gl::RGBA32I
    )
}

/// Allocates a `width × height` texture of `internal_format` and attaches it
/// at slot `n`, replacing an existing attachment there or appending.
pub fn attach_texture_buffer(gl: &Gl, fbo: &mut FrameBufferObject, internal_format: u32, n: usize) -> Result<usize> {
    let Some(texture) = gl.create_texture() else {
        log::error!("createTexture returned null");
        return Err(FolioError::ResourceAllocation("texture"));
    };
    let filter = if is_integer_format(internal_format) { Gl::NEAREST } else { Gl::LINEAR };

    fbo.bind(gl);
    gl.active_texture(Gl::TEXTURE0 + n as u32);
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, filter as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, filter as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_storage_2d(Gl::TEXTURE_2D, 1, internal_format, fbo.width, fbo.height);
    gl.framebuffer_texture_2d(
        Gl::FRAMEBUFFER,
        Gl::COLOR_ATTACHMENT0 + n as u32,
        Gl::TEXTURE_2D,
        Some(&texture),
        0,
    );
    gl.bind_texture(Gl::TEXTURE_2D, None);
    gl.bind_framebuffer(Gl::FRAMEBUFFER, None);

    if n < fbo.attachments.len() {
        fbo.attachments[n] = texture;
        Ok(n)
    } else {
        fbo.attachments.push(texture);
        Ok(fbo.attachments.len() - 1)
    }
}

/// Attaches a `DEPTH_COMPONENT16` renderbuffer.
pub fn attach_depth_buffer(gl: &Gl, fbo: &mut FrameBufferObject) -> Result<()> {
    let Some(depth) = gl.create_renderbuffer() else {
        log::error!("createRenderbuffer returned null");
        return Err(FolioError::ResourceAllocation("renderbuffer"));
    };
    fbo.bind(gl);
    gl.bind_renderbuffer(Gl::RENDERBUFFER, Some(&depth));
    gl.renderbuffer_storage(Gl::RENDERBUFFER, Gl::DEPTH_COMPONENT16, fbo.width, fbo.height);
    gl.framebuffer_renderbuffer(Gl::FRAMEBUFFER, Gl::DEPTH_ATTACHMENT, Gl::RENDERBUFFER, Some(&depth));
    gl.bind_renderbuffer(Gl::RENDERBUFFER, None);
    gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    fbo.depth = Some(depth);
    Ok(())
}

/// Creates a framebuffer with one color attachment at slot `n` and,
/// if `with_depth`, a depth renderbuffer.
pub fn create_frame_buffer_object(
    gl: &Gl,
    width: i32,
    height: i32,
    internal_format: u32,
    n: usize,
    with_depth: bool,
) -> Result<FrameBufferObject> {
    let Some(buffer) = gl.create_framebuffer() else {
        log::error!("createFramebuffer returned null");
        return Err(FolioError::ResourceAllocation("framebuffer"));
    };
    let mut fbo = FrameBufferObject {
        buffer,
        width: width.max(1),
        height: height.max(1),
        attachments: Vec::new(),
        depth: None,
    };
    attach_texture_buffer(gl, &mut fbo, internal_format, n)?;
    if with_depth {
        attach_depth_buffer(gl, &mut fbo)?;
    }

    fbo.bind(gl);
    let status = gl.check_framebuffer_status(Gl::FRAMEBUFFER);
    gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    if status != Gl::FRAMEBUFFER_COMPLETE {
        log::error!("Framebuffer incomplete: 0x{status:04x}");
        return Err(FolioError::FramebufferIncomplete(status));
    }
    Ok(fbo)
}
