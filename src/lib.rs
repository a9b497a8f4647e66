#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod errors;
pub mod math;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{FolioError, Result};
pub use math::{Mat4, Vec3};
pub use renderer::{
    BloomPlugin, DrawInfo, Event, EventKind, Plugin, PointerPlugin, Program, ProgramOptions,
};
pub use scene::{Composite, CompositeProps, Display, DrawableId, Scene, Shape, ShapeProps, ShapeType};
pub use utils::{Camera, CameraPan};
