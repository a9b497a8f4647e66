//! Browser asset I/O: `fetch` for binary models, `<img>` + 2D canvas for
//! texture atlas pixels.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Response};

use crate::errors::{FolioError, Result};

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

fn fetch_error(url: &str, reason: impl Into<String>) -> FolioError {
    FolioError::AssetFetch {
        url: url.to_owned(),
        reason: reason.into(),
    }
}

/// Fetches `url` and returns the response body.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let window = web_sys::window().ok_or(FolioError::NoWindow)?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(url, FolioError::from(e).to_string()))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| fetch_error(url, "fetch did not return a Response"))?;

    if !response.ok() {
        return Err(fetch_error(url, format!("HTTP {}", response.status())));
    }

    let buffer = JsFuture::from(response.array_buffer()?)
        .await
        .map_err(|e| fetch_error(url, FolioError::from(e).to_string()))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Loads `url` as an image and reads back its RGBA pixels.
pub async fn load_image(url: &str) -> Result<ImagePixels> {
    let window = web_sys::window().ok_or(FolioError::NoWindow)?;
    let document = window.document().ok_or(FolioError::NoWindow)?;

    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| fetch_error(url, FolioError::from(e).to_string()))?;

    let (width, height) = (image.natural_width(), image.natural_height());
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| FolioError::Js("created element is not a canvas".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(FolioError::ResourceAllocation("2d context"))?
        .dyn_into()
        .map_err(|_| FolioError::Js("2d context has an unexpected type".into()))?;
    context.draw_image_with_html_image_element(&image, 0.0, 0.0)?;

    let data = context
        .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
        .map_err(|e| FolioError::ImageDecode(format!("{url}: {}", FolioError::from(e))))?
        .data()
        .0;

    Ok(ImagePixels { width, height, data })
}
