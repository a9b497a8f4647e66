//! Assets
//!
//! Network-side loading of geometry binaries and texture atlases. Decoding of
//! the geometry format lives in [`crate::resources::geometry`].

pub mod io;

pub use io::{ImagePixels, fetch_bytes, load_image};
