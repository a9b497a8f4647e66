use web_sys::{WebGl2RenderingContext as Gl, WebGlTexture};

use crate::assets::io::{ImagePixels, load_image};
use crate::errors::{FolioError, Result};
use crate::renderer::settings::TextureAtlasDesc;

/// Mip levels for a `width × height` texture: `min(requested, full chain)`.
#[must_use]
pub fn mip_levels(requested: u32, width: u32, height: u32) -> i32 {
    let full = 32 - width.max(height).max(1).leading_zeros();
    requested.clamp(1, full) as i32
}

/// Cell `layer` of an atlas with `columns` cells per row, in pixels.
#[must_use]
pub fn atlas_cell_origin(layer: u32, columns: u32, cell_width: u32, cell_height: u32) -> (u32, u32) {
    let columns = columns.max(1);
    ((layer % columns) * cell_width, (layer / columns) * cell_height)
}

/// Builds a `TEXTURE_2D_ARRAY` from one atlas image.
///
/// The image is cut into `desc.width × desc.height` cells read row by row;
/// each cell becomes one of `desc.depth` layers. Cells are addressed with
/// the unpack skip/row-length parameters so no CPU-side cropping happens.
pub fn create_texture_array_buffer(gl: &Gl, image: &ImagePixels, desc: &TextureAtlasDesc) -> Result<WebGlTexture> {
    if desc.width == 0 || desc.height == 0 {
        return Err(FolioError::ImageDecode(format!(
            "atlas {} has an empty cell size",
            desc.url
        )));
    }
    let Some(texture) = gl.create_texture() else {
        log::error!("createTexture returned null");
        return Err(FolioError::ResourceAllocation("texture"));
    };

    let columns = image.width / desc.width;
    let levels = mip_levels(columns, desc.width, desc.height);

    gl.bind_texture(Gl::TEXTURE_2D_ARRAY, Some(&texture));
    gl.tex_storage_3d(
        Gl::TEXTURE_2D_ARRAY,
        levels,
        Gl::RGBA8,
        desc.width as i32,
        desc.height as i32,
        desc.depth as i32,
    );

    gl.pixel_storei(Gl::UNPACK_ROW_LENGTH, image.width as i32);
    gl.pixel_storei(Gl::UNPACK_IMAGE_HEIGHT, image.height as i32);
    gl.pixel_storei(Gl::UNPACK_PREMULTIPLY_ALPHA_WEBGL, 0);

    let mut result = Ok(());
    for layer in 0..desc.depth {
        let (x, y) = atlas_cell_origin(layer, columns, desc.width, desc.height);
        gl.pixel_storei(Gl::UNPACK_SKIP_PIXELS, x as i32);
        gl.pixel_storei(Gl::UNPACK_SKIP_ROWS, y as i32);
        result = gl
            .tex_sub_image_3d_with_opt_u8_array(
                Gl::TEXTURE_2D_ARRAY,
                0,
                0,
                0,
                layer as i32,
                desc.width as i32,
                desc.height as i32,
                1,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                Some(&image.data),
            )
            .map_err(FolioError::from);
        if result.is_err() {
            break;
        }
    }

    gl.pixel_storei(Gl::UNPACK_ROW_LENGTH, 0);
    gl.pixel_storei(Gl::UNPACK_IMAGE_HEIGHT, 0);
    gl.pixel_storei(Gl::UNPACK_SKIP_PIXELS, 0);
    gl.pixel_storei(Gl::UNPACK_SKIP_ROWS, 0);

    if let Err(e) = result {
        log::error!("Uploading atlas {} failed: {e}", desc.url);
        gl.bind_texture(Gl::TEXTURE_2D_ARRAY, None);
        gl.delete_texture(Some(&texture));
        return Err(e);
    }

    gl.tex_parameteri(Gl::TEXTURE_2D_ARRAY, Gl::TEXTURE_MIN_FILTER, Gl::NEAREST as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D_ARRAY, Gl::TEXTURE_MAG_FILTER, Gl::NEAREST as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D_ARRAY, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D_ARRAY, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.generate_mipmap(Gl::TEXTURE_2D_ARRAY);
    gl.bind_texture(Gl::TEXTURE_2D_ARRAY, None);

    Ok(texture)
}

/// Fetches and uploads every atlas, in order.
pub async fn load_textures(gl: Gl, descs: Vec<TextureAtlasDesc>) -> Result<Vec<WebGlTexture>> {
    let images = futures::future::try_join_all(descs.iter().map(|d| load_image(&d.url))).await?;
    let mut textures = Vec::with_capacity(descs.len());
    for (image, desc) in images.iter().zip(&descs) {
        textures.push(create_texture_array_buffer(&gl, image, desc)?);
    }
    log::info!("Loaded {} texture atlas(es)", textures.len());
    Ok(textures)
}
