use web_sys::WebGl2RenderingContext;

use super::gl::FrameBufferObject;

/// Per-frame extension point of [`Program`](super::Program).
///
/// `before` runs after the main framebuffer is cleared and before the scene
/// is drawn; `after` runs once the scene pass is finished and the
/// framebuffer is unbound. Plugins run in registration order.
pub trait Plugin {
    fn before(&mut self, gl: &WebGl2RenderingContext, fbo: &FrameBufferObject);

    fn after(&mut self, gl: &WebGl2RenderingContext, fbo: &FrameBufferObject);
}
