//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`FolioError`] covers all failure modes including:
//! - WebGL2 context and shader setup failures
//! - GPU resource allocation failures
//! - Asset fetching and decoding errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, FolioError>`.
//!
//! ```rust,ignore
//! use folio::errors::{FolioError, Result};
//!
//! fn upload() -> Result<()> {
//!     Ok(())
//! }
//! ```
//!
//! `FolioError` is `Clone`: a failed geometry upload is stored inside a shared
//! load future and every waiter observes the same error.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// The main error type for the Folio engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    // ========================================================================
    // GPU Setup Errors
    // ========================================================================
    /// The canvas could not provide a WebGL2 context.
    #[error("WebGL2 context unavailable")]
    ContextUnavailable,

    /// A shader stage failed to compile.
    #[error("Shader compile error: {0}")]
    ShaderCompile(String),

    /// A program failed to link.
    #[error("Program link error: {0}")]
    ProgramLink(String),

    /// The context returned no object for a create call.
    #[error("Failed to allocate {0}")]
    ResourceAllocation(&'static str),

    /// A framebuffer ended up in a non-complete state.
    #[error("Framebuffer incomplete: status 0x{0:04x}")]
    FramebufferIncomplete(u32),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// A network fetch failed or returned a non-success status.
    #[error("Failed to fetch {url}: {reason}")]
    AssetFetch {
        /// Requested URL
        url: String,
        /// Failure description
        reason: String,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// Geometry bytes did not match the packed vertex/index layout.
    #[error("Geometry decode error: {0}")]
    GeometryDecode(String),

    /// An image could not be decoded into pixels.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// No `window` or `document` (not running in a browser page).
    #[error("Browser window unavailable")]
    NoWindow,

    /// A browser API threw.
    #[error("JS error: {0}")]
    Js(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<JsValue> for FolioError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        FolioError::Js(message)
    }
}

/// Alias for `Result<T, FolioError>`.
pub type Result<T> = std::result::Result<T, FolioError>;
