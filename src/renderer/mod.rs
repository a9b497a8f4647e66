//! Renderer Module
//!
//! The WebGL2 side of the engine:
//! - [`Program`]: context, main program, shared framebuffer and frame loop
//! - [`DrawInfo`]: static, array and per-shape uniform values
//! - [`Plugin`]: `before`/`after` hooks around the scene pass
//! - [`events`]: pointer/ready/done events flushed once per frame
//! - [`gl`]: shader, buffer, texture and framebuffer helpers
//!
//! ```rust,ignore
//! use folio::renderer::{BloomPlugin, DrawInfo, PointerPlugin, Program, ProgramOptions, shaders};
//!
//! let program = Program::new(canvas, scene, shaders::MAIN_VERTEX, shaders::MAIN_FRAGMENT, ProgramOptions::default())?;
//! program.add_plugin(BloomPlugin::new(&program, Default::default())?);
//! program.add_plugin(PointerPlugin::new(&program)?);
//! program.render(DrawInfo::with_shape_defaults(light_dir).with_static("u_vpm", camera.view_projection()));
//! ```

pub mod draw_info;
pub mod events;
pub mod frame;
pub mod gl;
pub mod loader;
pub mod plugin;
pub mod plugins;
pub mod program;
pub mod settings;
pub mod shaders;

pub use draw_info::{DrawInfo, DrawValue, UniformValue};
pub use events::{
    Event, EventBus, EventContext, EventKind, EventSender, FrameInfo, HandlerRegistry, PickTarget, PointerEvent,
};
pub use frame::FrameClock;
pub use loader::GeometryLoader;
pub use plugin::Plugin;
pub use plugins::{BloomPlugin, PointerPlugin};
pub use program::Program;
pub use settings::{AssetPaths, AttributeKind, AttributeLayout, BloomSettings, ProgramOptions, TextureAtlasDesc};
