//! Bloom post-process.
//!
//! The main fragment shader writes picked shapes' highlight color to a
//! threshold attachment. After the scene pass that attachment is blurred
//! with a separable Gaussian, ping-ponging horizontal and vertical passes
//! between two reduced-size targets, then added onto the scene color in a
//! third target which is finally copied back over attachment 0.

use web_sys::{WebGl2RenderingContext as Gl, WebGlTexture};

use crate::errors::Result;
use crate::renderer::Program;
use crate::renderer::gl::{FrameBufferObject, QuadPass, create_frame_buffer_object, draw_buffer_list, set_draw_buffers};
use crate::renderer::plugin::Plugin;
use crate::renderer::settings::BloomSettings;
use crate::renderer::shaders::{BLEND_FRAGMENT, QUAD_FRAGMENT, blur_fragment};

/// Output location of `f_threshold` in the main fragment shader.
pub const THRESHOLD_LOCATION: usize = 1;

/// Index of the blend target among the plugin's three targets.
const BLEND_TARGET: usize = 2;

// ============================================================================
// Blur schedule
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurSource {
    /// The threshold attachment of the main framebuffer.
    Threshold,
    /// One of the two ping-pong targets.
    Target(usize),
}

/// One blur pass: `u_mode` 0 is horizontal, 1 vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurStep {
    pub mode: i32,
    pub source: BlurSource,
    pub target: usize,
}

/// Passes for `iterations` blur steps. Step `i` blurs along axis `i % 2`
/// into target `i % 2`, reading the threshold attachment first and the
/// other target afterwards.
#[must_use]
pub fn blur_schedule(iterations: u32) -> Vec<BlurStep> {
    (0..iterations)
        .map(|i| {
            let mode = (i % 2) as usize;
            BlurStep {
                mode: mode as i32,
                source: if i == 0 {
                    BlurSource::Threshold
                } else {
                    BlurSource::Target(1 - mode)
                },
                target: mode,
            }
        })
        .collect()
}

/// Where the fully blurred image ends up.
#[must_use]
pub fn blur_output(iterations: u32) -> BlurSource {
    match iterations {
        0 => BlurSource::Threshold,
        n => BlurSource::Target(((n - 1) % 2) as usize),
    }
}

/// Size of the reduced targets for a `width × height` framebuffer.
#[must_use]
pub fn scaled_size(width: i32, height: i32, scale: f32) -> (i32, i32) {
    let scale = |v: i32| ((v as f32 * scale) as i32).max(1);
    (scale(width), scale(height))
}

// ============================================================================
// Plugin
// ============================================================================

pub struct BloomPlugin {
    n: usize,
    settings: BloomSettings,
    blur: QuadPass,
    blend: QuadPass,
    copy: QuadPass,
    targets: Vec<FrameBufferObject>,
}

impl BloomPlugin {
    /// Adds an `RGBA8` threshold attachment to `program`'s framebuffer and
    /// builds the blur, blend and copy passes.
    pub fn new(program: &Program, settings: BloomSettings) -> Result<Self> {
        let n = program.attach_color_buffer(Gl::RGBA8)?;
        if n != THRESHOLD_LOCATION {
            log::warn!("Threshold attachment landed at {n}, the main shader writes it to {THRESHOLD_LOCATION}");
        }

        let gl = program.gl();
        let blur = QuadPass::new(&gl, &blur_fragment())?;
        let blend = QuadPass::new(&gl, BLEND_FRAGMENT)?;
        let copy = QuadPass::new(&gl, QUAD_FRAGMENT)?;

        let fbo = program.framebuffer();
        let (width, height) = scaled_size(fbo.width, fbo.height, settings.scale);
        let targets = (0..3)
            .map(|_| create_frame_buffer_object(&gl, width, height, Gl::RGBA8, 0, false))
            .collect::<Result<Vec<_>>>()?;

        log::info!("Bloom on attachment {n}: {width}x{height}, {} passes", settings.iterations);
        Ok(Self {
            n,
            settings,
            blur,
            blend,
            copy,
            targets,
        })
    }

    #[must_use]
    pub fn attachment(&self) -> usize {
        self.n
    }

    fn source<'a>(&'a self, fbo: &'a FrameBufferObject, source: BlurSource) -> Option<&'a WebGlTexture> {
        match source {
            BlurSource::Threshold => fbo.attachments.get(self.n),
            BlurSource::Target(i) => self.targets.get(i).and_then(|t| t.attachments.first()),
        }
    }
}

impl Plugin for BloomPlugin {
    fn before(&mut self, gl: &Gl, fbo: &FrameBufferObject) {
        let black = [0.0; 4];

        fbo.bind(gl);
        set_draw_buffers(gl, &draw_buffer_list(fbo.attachments.len(), &[0, self.n]));
        gl.clear_bufferfv_with_f32_array(Gl::COLOR, self.n as i32, &black);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);

        for target in &self.targets {
            target.bind(gl);
            gl.clear_bufferfv_with_f32_array(Gl::COLOR, 0, &black);
            gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        }
    }

    fn after(&mut self, gl: &Gl, fbo: &FrameBufferObject) {
        // Quad passes ignore depth and write opaque color.
        gl.disable(Gl::DEPTH_TEST);
        gl.disable(Gl::BLEND);

        // Blur
        self.blur.bind(gl);
        gl.viewport(0, 0, self.targets[0].width, self.targets[0].height);
        self.blur.set(gl, "u_blur", 0);
        for step in blur_schedule(self.settings.iterations) {
            self.blur.set(gl, "u_mode", step.mode);
            self.targets[step.target].bind(gl);
            gl.active_texture(Gl::TEXTURE0);
            gl.bind_texture(Gl::TEXTURE_2D, self.source(fbo, step.source));
            self.blur.draw(gl);
            gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        }

        // Blend
        self.blend.bind(gl);
        self.targets[BLEND_TARGET].bind(gl);
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, fbo.attachments.first());
        self.blend.set(gl, "u_scene", 0);
        gl.active_texture(Gl::TEXTURE1);
        gl.bind_texture(Gl::TEXTURE_2D, self.source(fbo, blur_output(self.settings.iterations)));
        self.blend.set(gl, "u_blur", 1);
        self.blend.set(gl, "u_strength", self.settings.strength);
        self.blend.draw(gl);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);

        // Copy back over attachment 0
        self.copy.bind(gl);
        gl.viewport(0, 0, fbo.width, fbo.height);
        fbo.bind(gl);
        set_draw_buffers(gl, &[Gl::COLOR_ATTACHMENT0]);
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, self.targets[BLEND_TARGET].attachments.first());
        self.copy.set(gl, "tex", 0);
        self.copy.draw(gl);
        gl.bind_texture(Gl::TEXTURE_2D, None);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    }
}
