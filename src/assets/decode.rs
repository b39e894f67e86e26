use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::core::Extent,
    foundation::error::{OverlayError, OverlayResult},
    overlay::spec::ImageSource,
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn extent(&self) -> Extent {
        Extent::new(i64::from(self.width), i64::from(self.height))
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> OverlayResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode the image bound to `overlay`, recording its pixel size and byte size.
///
/// A missing file or undecodable contents is a resource error for that overlay.
pub fn load_image_source(overlay: &str, path: &Path) -> OverlayResult<ImageSource> {
    if !path.is_file() {
        return Err(OverlayError::resource(overlay, path, "image not found"));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| OverlayError::resource(overlay, path, format!("read failed: {e}")))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| OverlayError::resource(overlay, path, format!("failed to load: {e}")))?;

    Ok(ImageSource {
        path: path.to_path_buf(),
        size: Extent::new(i64::from(img.width()), i64::from(img.height())),
        file_size: bytes.len() as u64,
    })
}

/// Read an image from disk into premultiplied RGBA8.
pub fn read_image(path: &Path) -> OverlayResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
