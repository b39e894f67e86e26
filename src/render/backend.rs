use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::{Anchor, Canvas},
        error::OverlayResult,
    },
    layout::{backdrop::BackdropRect, plan::LayoutPlan},
    overlay::spec::{BackdropSpec, FontSpec},
};

/// Transparent canvas-sized layer in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayLayer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl OverlayLayer {
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.width as usize * canvas.height as usize * 4],
        }
    }

    /// Premultiplied pixel at `(x, y)`, if inside the layer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite `image` over this layer with its top-left at `anchor`; off-canvas parts are
    /// clipped.
    pub fn stamp(&mut self, image: &PreparedImage, anchor: Anchor) {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        for sy in 0..i64::from(image.height) {
            let dy = anchor.y + sy;
            if !(0..h).contains(&dy) {
                continue;
            }
            for sx in 0..i64::from(image.width) {
                let dx = anchor.x + sx;
                if !(0..w).contains(&dx) {
                    continue;
                }
                let si = ((sy * i64::from(image.width) + sx) * 4) as usize;
                let di = ((dy * w + dx) * 4) as usize;
                let src = &image.rgba8_premul[si..si + 4];
                let inv = 255 - u16::from(src[3]);
                for c in 0..4 {
                    let d = u16::from(self.data[di + c]);
                    self.data[di + c] = (u16::from(src[c]) + (d * inv + 127) / 255).min(255) as u8;
                }
            }
        }
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

/// Drawing surface an overlay layer is produced on.
///
/// Calls arrive as `begin`, then any backdrop and text draws in that order, then `finish`.
pub trait DrawBackend {
    fn begin(&mut self, canvas: Canvas) -> OverlayResult<()>;

    fn fill_backdrop(&mut self, rect: BackdropRect, style: &BackdropSpec) -> OverlayResult<()>;

    /// Draw `text` with its layout box's top-left corner at `anchor`.
    fn draw_text(
        &mut self,
        overlay: &str,
        anchor: Anchor,
        text: &str,
        font: &FontSpec,
    ) -> OverlayResult<()>;

    fn finish(&mut self) -> OverlayResult<OverlayLayer>;
}

/// Draw a planned overlay: backdrop first, then text.
///
/// Returns `None` when the plan has nothing to draw.
pub fn render_layer(
    backend: &mut dyn DrawBackend,
    overlay: &str,
    plan: &LayoutPlan,
    backdrop: &BackdropSpec,
    font: Option<&FontSpec>,
) -> OverlayResult<Option<OverlayLayer>> {
    if !plan.needs_layer() {
        return Ok(None);
    }
    backend.begin(plan.canvas)?;
    if let Some(rect) = plan.backdrop {
        backend.fill_backdrop(rect, backdrop)?;
    }
    if let (Some(text), Some(font)) = (&plan.text, font) {
        backend.draw_text(overlay, text.anchor, &text.text, font)?;
    }
    backend.finish().map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
