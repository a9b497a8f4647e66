//! Built-in [`Plugin`](super::Plugin)s.
//!
//! Both extend the shared framebuffer with one attachment whose index must
//! match the output location the main fragment shader writes to; register
//! [`BloomPlugin`] before [`PointerPlugin`].

pub mod bloom;
pub mod pointer;

pub use bloom::{BloomPlugin, BlurSource, BlurStep, blur_output, blur_schedule};
pub use pointer::{ClientRect, PickResult, PickTable, PointerPlugin, client_to_pixel};
