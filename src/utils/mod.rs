//! Utility Module
//!
//! - [`Camera`] / [`CameraPan`]: map camera, drag panning and eased pans
//! - [`logging`]: logger installation for wasm32 and native targets
//! - [`fit_canvas_to_display`]: sizes a canvas backing store to its CSS box
//!
//! ```rust,ignore
//! use folio::utils::{logging, fit_canvas_to_display};
//!
//! logging::init(log::LevelFilter::Info);
//! fit_canvas_to_display(&canvas);
//! ```

pub mod camera;
pub mod logging;

pub use camera::{Camera, CameraPan, DragBounds};

use web_sys::HtmlCanvasElement;

/// Resizes `canvas` to its client size times `devicePixelRatio`.
pub fn fit_canvas_to_display(canvas: &HtmlCanvasElement) {
    let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let (width, height) = display_size(canvas.client_width(), canvas.client_height(), ratio);
    canvas.set_width(width);
    canvas.set_height(height);
}

/// Backing-store size for a CSS box of `client_width × client_height`.
#[must_use]
pub fn display_size(client_width: i32, client_height: i32, ratio: f64) -> (u32, u32) {
    let scale = |v: i32| (f64::from(v.max(0)) * ratio).round() as u32;
    (scale(client_width), scale(client_height))
}
