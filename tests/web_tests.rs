//! Browser Tests
//!
//! Run with `wasm-pack test --headless --firefox`.
//!
//! Tests for:
//! - Program construction on a real WebGL2 context
//! - Plugin attachment order
//! - One frame through the full pass chain
//! - Handlers calling back into the program
//! - Bloom over a lit shape with a black threshold
//! - Ready and Done delivery across repeated render calls
//! - Geometry load failures
//! - Picking ids changed after the pointer plugin was created

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio::renderer::draw_info::names;
use folio::renderer::gl::introspect::base_name;
use folio::renderer::plugins::pointer::read_pick_id;
use folio::renderer::shaders::{MAIN_FRAGMENT, MAIN_VERTEX};
use folio::renderer::{
    AssetPaths, BloomPlugin, BloomSettings, DrawInfo, Event, EventKind, PickTarget, PointerEvent, PointerPlugin,
    Program, ProgramOptions,
};
use folio::scene::{Scene, Shape, ShapeProps};
use folio::utils::{display_size, fit_canvas_to_display};
use folio::{Mat4, Vec3};
use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{HtmlCanvasElement, PointerEventInit, WebGl2RenderingContext as Gl};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn program(scene: Scene) -> Program {
    program_with(scene, ProgramOptions::default())
}

fn program_with(scene: Scene, options: ProgramOptions) -> Program {
    Program::new(canvas(64, 32), scene, MAIN_VERTEX, MAIN_FRAGMENT, options).unwrap()
}

/// Straight-on light and an identity camera: a red triangle renders as
/// pure red around the canvas center.
fn lit() -> DrawInfo {
    DrawInfo::with_shape_defaults(Vec3::new(0.0, 1.0, 0.0)).with_static(names::VIEW_PROJECTION, Mat4::IDENTITY)
}

fn red_triangle() -> Scene {
    let mut scene = Scene::new();
    scene.add_shape(Shape::triangle(&ShapeProps::new()));
    scene
}

/// Resolves with the timestamps of the first `count` Done events.
fn done_times(program: &Program, count: usize) -> oneshot::Receiver<Vec<f64>> {
    let (tx, rx) = oneshot::channel();
    let mut tx = Some(tx);
    let mut times = Vec::new();
    program.on(EventKind::Done, move |event, _| {
        if let Event::Done(info) = event {
            times.push(info.time);
        }
        if times.len() == count {
            if let Some(tx) = tx.take() {
                let _ = tx.send(times.clone());
            }
        }
    });
    rx
}

fn read_rgba(gl: &Gl, program: &Program, x: i32, y: i32) -> [u8; 4] {
    let mut pixel = [0u8; 4];
    gl.bind_framebuffer(Gl::READ_FRAMEBUFFER, Some(&program.framebuffer().buffer));
    gl.read_buffer(Gl::COLOR_ATTACHMENT0);
    gl.read_pixels_with_opt_u8_array(x, y, 1, 1, Gl::RGBA, Gl::UNSIGNED_BYTE, Some(&mut pixel))
        .unwrap();
    gl.bind_framebuffer(Gl::READ_FRAMEBUFFER, None);
    pixel
}

#[wasm_bindgen_test]
fn builds_on_webgl2() {
    let program = program(Scene::new());
    let fbo = program.framebuffer();
    assert_eq!(fbo.attachments.len(), 1);
    assert_eq!((fbo.width, fbo.height), (64, 32));
    assert!(!program.is_rendering());
    assert_eq!(base_name("u_picked[0]"), "u_picked");
}

#[wasm_bindgen_test]
fn canvas_fits_display() {
    let canvas = canvas(10, 10);
    let ratio = web_sys::window().unwrap().device_pixel_ratio();
    fit_canvas_to_display(&canvas);
    let expected = display_size(canvas.client_width(), canvas.client_height(), ratio);
    assert_eq!((canvas.width(), canvas.height()), expected);
}

#[wasm_bindgen_test]
fn plugins_claim_their_locations() {
    let program = program(Scene::new());
    let bloom = BloomPlugin::new(&program, BloomSettings::default()).unwrap();
    let pointer = folio::renderer::PointerPlugin::new(&program).unwrap();

    assert_eq!(bloom.attachment(), 1);
    assert_eq!(pointer.attachment(), 2);
    assert_eq!(program.framebuffer().attachments.len(), 3);

    program.add_plugin(bloom);
    program.add_plugin(pointer);
}

#[wasm_bindgen_test]
fn empty_frame_clears_to_black_and_background() {
    let program = program(Scene::new());
    let bloom = BloomPlugin::new(&program, BloomSettings::default()).unwrap();
    let pointer = folio::renderer::PointerPlugin::new(&program).unwrap();
    program.add_plugin(bloom);
    program.add_plugin(pointer);

    program.draw_frame(100.0);

    let gl = program.gl();
    let [r, g, b, _] = read_rgba(&gl, &program, 32, 16);
    assert_eq!((r, g, b), (0, 0, 0));

    let id = read_pick_id(&gl, &program.framebuffer().buffer, 2, 32, 16).unwrap();
    assert_eq!(id, 0);
}

#[wasm_bindgen_test]
fn second_render_is_ignored() {
    let mut program = program(Scene::new());
    program.render(DrawInfo::new().with_static("u_light_dir", [0.0_f32, 1.0, 0.0]));
    assert!(program.is_rendering());

    program.render(DrawInfo::new());
    assert!(program.is_rendering());
    assert_eq!(
        program.with_draw_info_mut(|info| info.get("u_light_dir").is_some()),
        Some(true)
    );
}

// ============================================================================
// Event handlers
// ============================================================================

#[wasm_bindgen_test]
fn handlers_call_back_into_the_program() {
    let program = Rc::new(program(Scene::new()));
    let late_frames = Rc::new(Cell::new(0));
    let scene_lent = Rc::new(Cell::new(None));
    {
        let weak = Rc::downgrade(&program);
        let late_frames = Rc::clone(&late_frames);
        let scene_lent = Rc::clone(&scene_lent);
        program.on(EventKind::Ready, move |_, _| {
            let Some(program) = weak.upgrade() else { return };
            let late_frames = Rc::clone(&late_frames);
            program.on(EventKind::Done, move |_, _| late_frames.set(late_frames.get() + 1));
            let bloom = BloomPlugin::new(&program, BloomSettings::default()).unwrap();
            program.add_plugin(bloom);
            scene_lent.set(Some(program.with_scene_mut(|_| ()).is_none()));
        });
    }

    program.fire(Event::Ready);
    program.draw_frame(100.0);
    assert_eq!(late_frames.get(), 0);
    assert_eq!(scene_lent.get(), Some(true));
    assert_eq!(program.framebuffer().attachments.len(), 2);

    program.draw_frame(200.0);
    assert_eq!(late_frames.get(), 1);
    assert_eq!(program.with_scene(Scene::len), Some(0));
}

#[wasm_bindgen_test]
async fn render_twice_delivers_one_ready_and_one_done_per_frame() {
    let mut program = program(Scene::new());
    let readies = Rc::new(Cell::new(0));
    {
        let readies = Rc::clone(&readies);
        program.on(EventKind::Ready, move |_, _| readies.set(readies.get() + 1));
    }
    let frames = done_times(&program, 3);

    program.render(DrawInfo::new());
    program.render(DrawInfo::new());
    let times = frames.await.unwrap();

    assert_eq!(readies.get(), 1);
    assert_eq!(times.len(), 3);
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
}

// ============================================================================
// Rendered frames
// ============================================================================

async fn first_frame_center(program: &mut Program) -> [u8; 4] {
    let frames = done_times(program, 1);
    program.render(lit());
    frames.await.unwrap();
    read_rgba(&program.gl(), program, 32, 16)
}

#[wasm_bindgen_test]
async fn bloom_with_black_threshold_keeps_scene_color() {
    let mut plain = program(red_triangle());
    let scene_color = first_frame_center(&mut plain).await;
    assert_eq!(scene_color, [255, 0, 0, 255]);

    let mut bloomed = program(red_triangle());
    let bloom = BloomPlugin::new(&bloomed, BloomSettings::default()).unwrap();
    bloomed.add_plugin(bloom);
    let blended = first_frame_center(&mut bloomed).await;

    for (scene, out) in scene_color.iter().zip(&blended) {
        assert!(scene.abs_diff(*out) <= 1, "{scene_color:?} became {blended:?}");
    }
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn failed_geometry_load_never_starts_the_loop() {
    let mut scene = Scene::new();
    let sphere = scene.add_shape(Shape::sphere(&ShapeProps::new()));
    let triangle = scene.add_shape(Shape::triangle(&ShapeProps::new()));
    let options = ProgramOptions {
        assets: AssetPaths {
            sphere: "/missing/ico-sphere.bin".to_owned(),
            ..AssetPaths::default()
        },
        ..ProgramOptions::default()
    };
    let mut program = program_with(scene, options);
    let events = Rc::new(Cell::new(0));
    for kind in [EventKind::Ready, EventKind::Done] {
        let events = Rc::clone(&events);
        program.on(kind, move |_, _| events.set(events.get() + 1));
    }

    program.render(lit());
    sleep(300).await;

    assert!(program.is_rendering());
    assert_eq!(events.get(), 0);
    // The inline triangle still uploaded; only the sphere failed.
    let indices = |id| program.with_scene(|s| s.get(id).unwrap().counts().indices);
    assert_eq!(indices(triangle), Some(3));
    assert_eq!(indices(sphere), Some(0));
}

#[wasm_bindgen_test]
async fn pointer_resolves_ids_changed_after_setup() {
    let mut scene = Scene::new();
    let triangle = scene.add_shape(Shape::triangle(&ShapeProps::new()));
    let mut program = program(scene);
    let pointer = PointerPlugin::new(&program).unwrap();
    program.add_plugin(pointer);
    program
        .with_scene_mut(|scene| scene.shape_mut(triangle).unwrap().id = 7)
        .unwrap();

    let downs: Rc<RefCell<Vec<PointerEvent>>> = Rc::default();
    {
        let downs = Rc::clone(&downs);
        program.on(EventKind::PointerDown, move |event, _| {
            downs.borrow_mut().extend(event.pointer().copied());
        });
    }
    first_frame_center(&mut program).await;

    let canvas = program.canvas();
    let rect = canvas.get_bounding_client_rect();
    let init = PointerEventInit::new();
    init.set_client_x((rect.left() + rect.width() / 2.0) as i32);
    init.set_client_y((rect.top() + rect.height() / 2.0) as i32);
    let event = web_sys::PointerEvent::new_with_event_init_dict("pointerdown", &init).unwrap();
    canvas.dispatch_event(&event).unwrap();
    done_times(&program, 1).await.unwrap();

    assert_eq!(
        *downs.borrow(),
        vec![PointerEvent {
            id: 7,
            target: Some(PickTarget {
                shape: triangle,
                composite: triangle,
            }),
            movement_x: 0.0,
            movement_y: 0.0,
        }]
    );
}
