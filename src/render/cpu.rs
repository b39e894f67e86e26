use std::{collections::HashMap, path::PathBuf};

use anyhow::anyhow;
use kurbo::Shape;

use crate::{
    foundation::{
        core::{Anchor, Canvas, Extent, Rect, RoundedRect, Rgba8},
        error::{OverlayError, OverlayResult},
    },
    layout::backdrop::BackdropRect,
    overlay::spec::{BackdropSpec, FontSpec},
    render::backend::{DrawBackend, OverlayLayer},
    text::metrics::{TextLayoutEngine, TextMeasure},
};

/// CPU rasterizer for overlay layers, built on `vello_cpu`.
///
/// Also measures text, so layout and drawing agree on glyph metrics.
pub struct CpuBackend {
    text: TextLayoutEngine,
    font_cache: HashMap<PathBuf, vello_cpu::peniko::FontData>,
    frame: Option<Frame>,
}

struct Frame {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            text: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
            frame: None,
        }
    }

    fn frame(&mut self) -> OverlayResult<&mut Frame> {
        self.frame
            .as_mut()
            .ok_or_else(|| anyhow!("draw call before begin").into())
    }
}

impl TextMeasure for CpuBackend {
    fn prepare_font(&mut self, overlay: &str, font: &FontSpec) -> OverlayResult<()> {
        self.text.prepare_font(overlay, font)
    }

    fn measure(&mut self, overlay: &str, text: &str, font: &FontSpec) -> OverlayResult<Extent> {
        self.text.measure(overlay, text, font)
    }
}

impl DrawBackend for CpuBackend {
    fn begin(&mut self, canvas: Canvas) -> OverlayResult<()> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| anyhow!("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| anyhow!("canvas height exceeds u16"))?;
        self.frame = Some(Frame {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        });
        Ok(())
    }

    fn fill_backdrop(&mut self, rect: BackdropRect, style: &BackdropSpec) -> OverlayResult<()> {
        let frame = self.frame()?;
        let ctx = &mut frame.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let radius = style.radius.filter(|r| *r > 0).map(|r| r as f64);
        if let Some(fill) = style.color {
            ctx.set_paint(paint(fill));
            ctx.fill_path(&backdrop_path(rect.to_rect(), radius));
        }

        if let Some(line) = style.line_color {
            let width = style.line_width.unwrap_or(1).max(1) as f64;
            // Outline stays inside the rectangle.
            let inset = rect.to_rect().inset(-width / 2.0);
            ctx.set_paint(paint(line));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.stroke_path(&backdrop_path(
                inset,
                radius.map(|r| (r - width / 2.0).max(0.0)),
            ));
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        overlay: &str,
        anchor: Anchor,
        text: &str,
        font: &FontSpec,
    ) -> OverlayResult<()> {
        let shaped = self.text.layout(overlay, text, font)?;
        let font_data = self
            .font_cache
            .entry(font.path.clone())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(shaped.font_bytes.as_ref().clone()),
                    0,
                )
            })
            .clone();

        let frame = self.frame()?;
        let ctx = &mut frame.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            anchor.x as f64,
            anchor.y as f64,
        )));
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OverlayResult<OverlayLayer> {
        let Some(mut frame) = self.frame.take() else {
            return Err(OverlayError::from(anyhow!("finish before begin")));
        };
        let mut pixmap = vello_cpu::Pixmap::new(frame.width, frame.height);
        frame.ctx.flush();
        frame.ctx.render_to_pixmap(&mut pixmap);
        Ok(OverlayLayer {
            width: u32::from(frame.width),
            height: u32::from(frame.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn backdrop_path(rect: Rect, radius: Option<f64>) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    match radius {
        Some(r) => {
            for el in RoundedRect::from_rect(rect, r).path_elements(0.1) {
                p.push(el);
            }
        }
        None => {
            for el in rect.path_elements(0.1) {
                p.push(el);
            }
        }
    }
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
