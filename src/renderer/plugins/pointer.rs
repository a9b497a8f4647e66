//! Pointer picking.
//!
//! The main fragment shader writes each shape's `u_id` to an integer color
//! attachment. On `pointerdown`/`pointermove`/`pointerup` the plugin reads
//! the id under the cursor back and queues a pointer event naming the shape
//! and the root it belongs to. Id `0` is empty space.
//!
//! Ids are resolved against the scene as it is when the DOM event arrives,
//! so ids changed after the plugin was created are picked up.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlFramebuffer};

use crate::errors::Result;
use crate::renderer::Program;
use crate::renderer::events::{Event, EventKind, EventSender, PickTarget, PointerEvent};
use crate::renderer::gl::{FrameBufferObject, draw_buffer_list, set_draw_buffers};
use crate::renderer::plugin::Plugin;
use crate::scene::{Drawable, Scene};

/// Output location of `f_id` in the main fragment shader.
pub const PICK_LOCATION: usize = 2;

const POINTER_EVENTS: [(&str, EventKind); 3] = [
    ("pointerdown", EventKind::PointerDown),
    ("pointermove", EventKind::PointerMove),
    ("pointerup", EventKind::PointerUp),
];

// ============================================================================
// Id lookup
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    /// Id `0`: nothing under the cursor.
    Background,
    Hit(PickTarget),
    /// An id no drawable owns (e.g. `-1`); no event is queued.
    Miss,
}

impl PickResult {
    /// The pointer event for this result, if one should be queued.
    #[must_use]
    pub fn into_pointer_event(self, id: i32, movement_x: f64, movement_y: f64) -> Option<PointerEvent> {
        let target = match self {
            Self::Background => None,
            Self::Hit(target) => Some(target),
            Self::Miss => return None,
        };
        Some(PointerEvent {
            id,
            target,
            movement_x,
            movement_y,
        })
    }
}

/// Pick id to drawable, built from the scene's roots.
///
/// A top-level shape maps to itself. For a composite root every leaf id
/// maps to that leaf with the root as its composite; the root's own id maps
/// to the root when no leaf carries it. When ids collide the earliest root
/// wins.
#[derive(Debug, Clone, Default)]
pub struct PickTable {
    targets: FxHashMap<i32, PickTarget>,
}

impl PickTable {
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let mut targets = FxHashMap::default();
        for &root in scene.roots() {
            match scene.get(root) {
                Some(Drawable::Shape(shape)) => {
                    targets.entry(shape.id).or_insert(PickTarget {
                        shape: root,
                        composite: root,
                    });
                }
                Some(Drawable::Composite(composite)) => {
                    for leaf in scene.leaves(root) {
                        if let Some(shape) = scene.shape(leaf) {
                            targets.entry(shape.id).or_insert(PickTarget {
                                shape: leaf,
                                composite: root,
                            });
                        }
                    }
                    targets.entry(composite.id).or_insert(PickTarget {
                        shape: root,
                        composite: root,
                    });
                }
                None => {}
            }
        }
        Self { targets }
    }

    #[must_use]
    pub fn resolve(&self, id: i32) -> PickResult {
        if id == 0 {
            return PickResult::Background;
        }
        self.targets
            .get(&id)
            .map_or(PickResult::Miss, |&target| PickResult::Hit(target))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Wraps `pointer` in the event variant for `kind`.
#[must_use]
pub fn pointer_event(kind: EventKind, pointer: PointerEvent) -> Option<Event> {
    match kind {
        EventKind::PointerDown => Some(Event::PointerDown(pointer)),
        EventKind::PointerMove => Some(Event::PointerMove(pointer)),
        EventKind::PointerUp => Some(Event::PointerUp(pointer)),
        EventKind::Ready | EventKind::Done => None,
    }
}

// ============================================================================
// Readback
// ============================================================================

/// Client-space bounding box of the canvas element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps a client position to a framebuffer pixel (origin bottom-left).
///
/// Returns `None` for an empty rect or a position outside it.
#[must_use]
pub fn client_to_pixel(client_x: f64, client_y: f64, rect: ClientRect, width: u32, height: u32) -> Option<(i32, i32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 || width == 0 || height == 0 {
        return None;
    }
    let u = (client_x - rect.left) / rect.width;
    let v = (client_y - rect.top) / rect.height;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    let x = (u * f64::from(width)).floor() as i32;
    let y = ((1.0 - v) * f64::from(height)).floor() as i32;
    Some((x.min(width as i32 - 1), y.min(height as i32 - 1)))
}

/// Reads the pick id at pixel `(x, y)` of attachment `n`.
pub fn read_pick_id(gl: &Gl, framebuffer: &WebGlFramebuffer, n: usize, x: i32, y: i32) -> Result<i32> {
    let pixel = js_sys::Int32Array::new_with_length(4);
    gl.bind_framebuffer(Gl::READ_FRAMEBUFFER, Some(framebuffer));
    gl.read_buffer(Gl::COLOR_ATTACHMENT0 + n as u32);
    let result = gl.read_pixels_with_opt_array_buffer_view(x, y, 1, 1, Gl::RGBA_INTEGER, Gl::INT, Some(&pixel));
    gl.bind_framebuffer(Gl::READ_FRAMEBUFFER, None);
    result?;
    Ok(pixel.get_index(0))
}

// ============================================================================
// Plugin
// ============================================================================

struct PickContext {
    gl: Gl,
    canvas: HtmlCanvasElement,
    framebuffer: WebGlFramebuffer,
    n: usize,
    scene: Rc<RefCell<Scene>>,
    sender: EventSender,
}

impl PickContext {
    fn handle(&self, kind: EventKind, e: &web_sys::PointerEvent) {
        let bounds = self.canvas.get_bounding_client_rect();
        let rect = ClientRect {
            left: bounds.left(),
            top: bounds.top(),
            width: bounds.width(),
            height: bounds.height(),
        };
        let Some((x, y)) = client_to_pixel(
            f64::from(e.client_x()),
            f64::from(e.client_y()),
            rect,
            self.canvas.width(),
            self.canvas.height(),
        ) else {
            return;
        };

        let id = match read_pick_id(&self.gl, &self.framebuffer, self.n, x, y) {
            Ok(id) => id,
            Err(err) => {
                log::debug!("Pick readback failed: {err}");
                return;
            }
        };

        let Ok(scene) = self.scene.try_borrow() else {
            log::debug!("Scene busy; pointer event dropped");
            return;
        };
        let pointer = PickTable::from_scene(&scene)
            .resolve(id)
            .into_pointer_event(id, f64::from(e.movement_x()), f64::from(e.movement_y()));
        if let Some(event) = pointer.and_then(|p| pointer_event(kind, p)) {
            self.sender.fire(event);
        }
    }
}

pub struct PointerPlugin {
    n: usize,
    _listeners: Vec<Closure<dyn FnMut(web_sys::PointerEvent)>>,
}

impl PointerPlugin {
    /// Adds an `R16I` pick attachment to `program`'s framebuffer and starts
    /// listening for pointer events on its canvas.
    pub fn new(program: &Program) -> Result<Self> {
        let n = program.attach_color_buffer(Gl::R16I)?;
        if n != PICK_LOCATION {
            log::warn!("Pick attachment landed at {n}, the main shader writes ids to {PICK_LOCATION}");
        }

        let canvas = program.canvas();
        let context = Rc::new(PickContext {
            gl: program.gl(),
            canvas: canvas.clone(),
            framebuffer: program.framebuffer().buffer,
            n,
            scene: program.scene_cell(),
            sender: program.sender(),
        });

        let mut listeners = Vec::with_capacity(POINTER_EVENTS.len());
        for (name, kind) in POINTER_EVENTS {
            let context = Rc::clone(&context);
            let listener = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |e: web_sys::PointerEvent| {
                context.handle(kind, &e);
            });
            canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            listeners.push(listener);
        }

        log::info!("Pointer picking on attachment {n}");
        Ok(Self {
            n,
            _listeners: listeners,
        })
    }

    #[must_use]
    pub fn attachment(&self) -> usize {
        self.n
    }
}

impl Plugin for PointerPlugin {
    fn before(&mut self, gl: &Gl, fbo: &FrameBufferObject) {
        fbo.bind(gl);
        set_draw_buffers(gl, &draw_buffer_list(fbo.attachments.len(), &[0, self.n]));
        gl.clear_bufferiv_with_i32_array(Gl::COLOR, self.n as i32, &[0, 0, 0, 0]);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
    }

    fn after(&mut self, _gl: &Gl, _fbo: &FrameBufferObject) {}
}
