//! The render loop.
//!
//! A [`Program`] owns the WebGL2 context of one canvas, the main scene
//! program, the shared framebuffer every pass draws into, the plugin list
//! and the event bus. Construction starts nothing; [`Program::render`]
//! waits for every texture atlas and geometry upload, then drives one frame
//! per animation-frame callback:
//!
//! 1. frame-rate gate
//! 2. clear attachment 0 and depth
//! 3. [`Plugin::before`] for every plugin
//! 4. main program state (cull back faces, depth `LESS`, alpha blend)
//! 5. static uniforms, then array uniforms
//! 6. draw every root into all color attachments
//! 7. [`Plugin::after`] for every plugin
//! 8. blit attachment 0 to the canvas
//! 9. flush queued events, then `Done`
//!
//! Steps 1 to 8 hold the renderer state. It is released before step 9, so
//! handlers may register handlers, add plugins or attach buffers. The scene
//! and draw info are lent to handlers through [`EventContext`] for the
//! duration of the flush.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, try_join, try_join_all};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlProgram, WebGlTexture, WebGlVertexArrayObject};

use super::draw_info::{DrawInfo, UniformValue, names};
use super::events::{Event, EventBus, EventContext, EventKind, EventSender, FrameInfo, HandlerRegistry};
use super::frame::FrameClock;
use super::gl::{
    AttributeMap, FrameBufferObject, QuadPass, UniformMap, attach_texture_buffer, create_frame_buffer_object,
    create_program, create_vao, initialize_attributes, initialize_uniforms, load_textures, set_draw_buffers,
    set_uniform,
};
use super::loader::{GeometryLoader, Realized};
use super::plugin::Plugin;
use super::settings::ProgramOptions;
use super::shaders::QUAD_FRAGMENT;
use crate::errors::{FolioError, Result};
use crate::scene::{DrawCommand, DrawableId, Scene};

type TextureLoad = LocalBoxFuture<'static, Result<Vec<WebGlTexture>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct Program {
    cells: FrameCells,
    textures: Option<TextureLoad>,
    ready: Vec<LocalBoxFuture<'static, Result<()>>>,
    loader: Rc<GeometryLoader>,
    sender: EventSender,
    registry: HandlerRegistry,
}

/// Everything a frame touches, each behind its own cell.
#[derive(Clone)]
struct FrameCells {
    state: Rc<RefCell<ProgramState>>,
    scene: Rc<RefCell<Scene>>,
    draw_info: Rc<RefCell<DrawInfo>>,
    events: Rc<RefCell<EventBus>>,
}

struct ProgramState {
    gl: Gl,
    canvas: HtmlCanvasElement,
    main: WebGlProgram,
    attributes: AttributeMap,
    uniforms: UniformMap,
    quad: QuadPass,
    fbo: FrameBufferObject,
    clear_color: [f32; 4],
    /// Roots with their vertex arrays, in upload-completion order.
    draw_list: Vec<(WebGlVertexArrayObject, DrawableId)>,
    commands: Vec<DrawCommand>,
    plugins: Vec<Box<dyn Plugin>>,
    clock: FrameClock,
}

impl Program {
    /// Sets up the context, programs and framebuffer for `canvas`.
    ///
    /// Texture and geometry loads are queued but not started; they run when
    /// [`render`](Self::render) is called. Any GPU setup failure is logged
    /// and returned.
    pub fn new(
        canvas: HtmlCanvasElement,
        scene: Scene,
        vertex: &str,
        fragment: &str,
        options: ProgramOptions,
    ) -> Result<Self> {
        let gl: Gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| {
                log::error!("WebGL2 not supported");
                FolioError::ContextUnavailable
            })?
            .dyn_into()
            .map_err(|_| FolioError::ContextUnavailable)?;

        let textures = load_textures(gl.clone(), options.textures.clone()).boxed_local();

        let quad = QuadPass::new(&gl, QUAD_FRAGMENT)?;
        let main = create_program(&gl, vertex, fragment)?;
        let attributes = initialize_attributes(&gl, &main, &options.attributes);
        let uniforms = initialize_uniforms(&gl, &main);

        let width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);
        let fbo = create_frame_buffer_object(&gl, width, height, Gl::RGBA8, 0, true)?;
        gl.viewport(0, 0, width, height);

        let loader = Rc::new(GeometryLoader::new(gl.clone(), options.assets.clone()));
        let events = EventBus::new();
        let sender = events.sender();
        let registry = events.registry();
        let roots = scene.roots().to_vec();
        let plans: Vec<_> = roots
            .iter()
            .filter_map(|&root| scene.geometry_plan(root).map(|plan| (root, plan)))
            .collect();

        let state = Rc::new(RefCell::new(ProgramState {
            gl,
            canvas,
            main,
            attributes,
            uniforms,
            quad,
            fbo,
            clear_color: options.clear_color_normalized(),
            draw_list: Vec::with_capacity(roots.len()),
            commands: Vec::new(),
            plugins: Vec::new(),
            clock: FrameClock::new(options.frame_rate),
        }));
        let cells = FrameCells {
            state,
            scene: Rc::new(RefCell::new(scene)),
            draw_info: Rc::new(RefCell::new(DrawInfo::new())),
            events: Rc::new(RefCell::new(events)),
        };

        let ready: Vec<_> = plans
            .into_iter()
            .map(|(root, plan)| {
                let state = Rc::downgrade(&cells.state);
                let scene = Rc::downgrade(&cells.scene);
                loader
                    .realize(plan)
                    .map(move |realized| -> Result<()> {
                        if let Err(e) = install(&state, &scene, root, &realized?) {
                            log::error!("Skipping root {root:?}: {e}");
                        }
                        Ok(())
                    })
                    .boxed_local()
            })
            .collect();

        log::info!("Program ready: {} root(s) queued", ready.len());
        Ok(Self {
            cells,
            textures: Some(textures),
            ready,
            loader,
            sender,
            registry,
        })
    }

    /// Starts the frame loop once every load has finished.
    ///
    /// Only the first call has any effect. A root whose vertex array cannot
    /// be built is logged and left out of the draw list. A failed fetch,
    /// decode or upload of any geometry or texture atlas is logged and the
    /// loop never starts; nothing is retried.
    pub fn render(&mut self, draw_info: DrawInfo) {
        if !self.cells.state.borrow_mut().clock.start() {
            log::warn!("Program is already rendering");
            return;
        }
        *self.cells.draw_info.borrow_mut() = draw_info;

        let textures = self
            .textures
            .take()
            .unwrap_or_else(|| async { Ok(Vec::new()) }.boxed_local());
        let ready = std::mem::take(&mut self.ready);
        let cells = self.cells.clone();
        let sender = self.sender.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match try_join(textures, try_join_all(ready)).await {
                Ok((atlases, _)) => {
                    cells.draw_info.borrow_mut().set_atlases(atlases);
                    sender.fire(Event::Ready);
                    start_loop(cells);
                }
                Err(e) => log::error!("Loading failed, not rendering: {e}"),
            }
        });
    }

    /// Runs one frame at `time` (ms) outside the animation-frame loop.
    pub fn draw_frame(&self, time: f64) {
        self.cells.frame(time);
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// The handler joins at the start of the next flush. Safe to call from
    /// inside a running handler.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event, &mut EventContext<'_>) + 'static,
    {
        self.registry.on(kind, Box::new(handler));
    }

    /// Appends a plugin; plugins run in registration order.
    pub fn add_plugin(&self, plugin: impl Plugin + 'static) {
        self.cells.state.borrow_mut().plugins.push(Box::new(plugin));
    }

    #[must_use]
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Handle for registering handlers from inside other handlers.
    #[must_use]
    pub fn registry(&self) -> HandlerRegistry {
        self.registry.clone()
    }

    /// Queues `event` for the next flush.
    pub fn fire(&self, event: Event) {
        self.sender.fire(event);
    }

    /// Appends a full-size color attachment to the shared framebuffer and
    /// returns its index.
    pub fn attach_color_buffer(&self, internal_format: u32) -> Result<usize> {
        let mut state = self.cells.state.borrow_mut();
        let ProgramState { gl, fbo, .. } = &mut *state;
        let n = fbo.attachments.len();
        attach_texture_buffer(gl, fbo, internal_format, n)
    }

    #[must_use]
    pub fn framebuffer(&self) -> FrameBufferObject {
        self.cells.state.borrow().fbo.clone()
    }

    #[must_use]
    pub fn gl(&self) -> Gl {
        self.cells.state.borrow().gl.clone()
    }

    #[must_use]
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.cells.state.borrow().canvas.clone()
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.cells.state.borrow().clock.is_started()
    }

    /// Number of distinct geometries uploaded or pending.
    #[must_use]
    pub fn cached_geometries(&self) -> usize {
        self.loader.cached()
    }

    /// Runs `f` on the scene.
    ///
    /// Returns `None` while a flush has lent the scene to handlers; handlers
    /// reach it through [`EventContext::scene`] instead.
    pub fn with_scene<R>(&self, f: impl FnOnce(&Scene) -> R) -> Option<R> {
        match self.cells.scene.try_borrow() {
            Ok(scene) => Some(f(&*scene)),
            Err(_) => {
                log::warn!("Scene is lent to event handlers");
                None
            }
        }
    }

    /// Mutable counterpart of [`with_scene`](Self::with_scene).
    pub fn with_scene_mut<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> Option<R> {
        match self.cells.scene.try_borrow_mut() {
            Ok(mut scene) => Some(f(&mut *scene)),
            Err(_) => {
                log::warn!("Scene is lent to event handlers");
                None
            }
        }
    }

    /// Returns `None` while a flush has lent the draw info to handlers.
    pub fn with_draw_info_mut<R>(&self, f: impl FnOnce(&mut DrawInfo) -> R) -> Option<R> {
        match self.cells.draw_info.try_borrow_mut() {
            Ok(mut draw_info) => Some(f(&mut *draw_info)),
            Err(_) => {
                log::warn!("Draw info is lent to event handlers");
                None
            }
        }
    }

    /// Shared scene cell, read by DOM listeners between frames.
    pub(crate) fn scene_cell(&self) -> Rc<RefCell<Scene>> {
        Rc::clone(&self.cells.scene)
    }
}

/// Records counts and builds the vertex array for a finished upload.
fn install(
    state: &Weak<RefCell<ProgramState>>,
    scene: &Weak<RefCell<Scene>>,
    root: DrawableId,
    realized: &Realized,
) -> Result<()> {
    let (Some(state), Some(scene)) = (state.upgrade(), scene.upgrade()) else {
        return Ok(());
    };
    let mut state = state.borrow_mut();
    let vao = create_vao(
        &state.gl,
        &state.attributes,
        &realized.geometry.vertices,
        Some(&realized.geometry.indices),
    )?;
    let mut scene = scene.borrow_mut();
    for &(id, counts) in &realized.counts {
        scene.set_counts(id, counts);
    }
    state.draw_list.push((vao, root));
    Ok(())
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window; frame loop stopped");
        return;
    };
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {}", FolioError::from(e));
    }
}

fn start_loop(cells: FrameCells) {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);

    *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
        cells.frame(time);
        if let Some(cb) = next.borrow().as_ref() {
            request_frame(cb);
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        request_frame(cb);
    }
}

// ============================================================================
// Frame
// ============================================================================

impl FrameCells {
    fn frame(&self, time: f64) {
        let delta = {
            let (Ok(mut state), Ok(scene), Ok(draw_info)) = (
                self.state.try_borrow_mut(),
                self.scene.try_borrow(),
                self.draw_info.try_borrow(),
            ) else {
                log::warn!("Frame at {time} ms skipped: program is busy");
                return;
            };
            let Some(delta) = state.clock.tick(time) else {
                return;
            };
            state.draw(&scene, &draw_info);
            delta
        };

        let (Ok(mut events), Ok(mut scene), Ok(mut draw_info)) = (
            self.events.try_borrow_mut(),
            self.scene.try_borrow_mut(),
            self.draw_info.try_borrow_mut(),
        ) else {
            log::warn!("Events for frame at {time} ms dropped: already flushing");
            return;
        };
        let mut ctx = EventContext {
            scene: &mut scene,
            draw_info: &mut draw_info,
        };
        events.flush(&mut ctx, FrameInfo { time, delta });
    }
}

impl ProgramState {
    fn draw(&mut self, scene: &Scene, draw_info: &DrawInfo) {
        self.clear();

        for plugin in &mut self.plugins {
            plugin.before(&self.gl, &self.fbo);
        }

        self.use_main();
        self.bind_frame_uniforms(draw_info);
        self.draw_scene(scene, draw_info);

        for plugin in &mut self.plugins {
            plugin.after(&self.gl, &self.fbo);
        }

        self.blit();
    }

    fn clear(&self) {
        let gl = &self.gl;
        self.fbo.bind(gl);
        gl.clear_bufferfv_with_f32_array(Gl::COLOR, 0, &self.clear_color);
        gl.clear_bufferfi(Gl::DEPTH_STENCIL, 0, 1.0, 1);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    }

    fn use_main(&self) {
        let gl = &self.gl;
        gl.use_program(Some(&self.main));
        gl.enable(Gl::CULL_FACE);
        gl.enable(Gl::DEPTH_TEST);
        gl.depth_func(Gl::LESS);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        gl.depth_mask(true);
    }

    fn bind_frame_uniforms(&self, draw_info: &DrawInfo) {
        for (name, value) in draw_info.statics().chain(draw_info.arrays()) {
            if let Some(info) = self.uniforms.get(name) {
                set_uniform(&self.gl, info, value);
            }
        }
    }

    fn draw_scene(&mut self, scene: &Scene, draw_info: &DrawInfo) {
        let Self {
            gl,
            fbo,
            draw_list,
            commands,
            uniforms,
            ..
        } = self;

        gl.viewport(0, 0, fbo.width, fbo.height);
        fbo.bind(gl);
        for (n, texture) in fbo.attachments.iter().enumerate() {
            gl.active_texture(Gl::TEXTURE0 + n as u32);
            gl.bind_texture(Gl::TEXTURE_2D, Some(texture));
        }
        set_draw_buffers(gl, &fbo.color_attachments());

        for (vao, root) in draw_list.iter() {
            commands.clear();
            scene.collect_draws(*root, commands);
            gl.bind_vertex_array(Some(vao));
            for command in commands.iter() {
                match *command {
                    DrawCommand::BindAtlas(slot) => bind_atlas(gl, uniforms, draw_info, slot),
                    DrawCommand::Draw { shape, offset } => {
                        let Some(shape) = scene.shape(shape) else {
                            continue;
                        };
                        for (name, uniform) in draw_info.per_shape() {
                            if let Some(info) = uniforms.get(name) {
                                set_uniform(gl, info, &uniform(shape));
                            }
                        }
                        if shape.counts.indices == 0 {
                            continue;
                        }
                        gl.draw_elements_with_i32(
                            shape.topology.gl_enum(),
                            shape.counts.indices as i32,
                            Gl::UNSIGNED_SHORT,
                            (offset * size_of::<u16>()) as i32,
                        );
                    }
                }
            }
            gl.bind_vertex_array(None);
        }

        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    }

    fn blit(&self) {
        let gl = &self.gl;
        let width = i32::try_from(self.canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.canvas.height()).unwrap_or(i32::MAX);

        self.quad.bind(gl);
        gl.viewport(0, 0, width, height);
        gl.clear_bufferfv_with_f32_array(Gl::COLOR, 0, &self.clear_color);
        gl.clear_bufferfi(Gl::DEPTH_STENCIL, 0, 1.0, 1);
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, self.fbo.attachments.first());
        self.quad.set(gl, "tex", 0);
        self.quad.draw(gl);
    }
}

fn bind_atlas(gl: &Gl, uniforms: &UniformMap, draw_info: &DrawInfo, slot: usize) {
    let Some(texture) = draw_info.atlases().get(slot) else {
        log::debug!("Atlas {slot} is not loaded");
        return;
    };
    gl.active_texture(Gl::TEXTURE0);
    gl.bind_texture(Gl::TEXTURE_2D_ARRAY, Some(texture));
    if let Some(info) = uniforms.get(names::SAMPLER) {
        set_uniform(gl, info, &UniformValue::Int(0));
    }
}
