use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    foundation::{
        core::{Extent, Rgba8},
        error::{OverlayError, OverlayResult},
    },
    overlay::spec::FontSpec,
};

/// Brush attached to shaped text; the fill color of the glyph run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Pixel extent of a single line of text in a given font.
///
/// Implementations must be deterministic for identical inputs.
pub trait TextMeasure {
    /// Load `font` once so an unreadable font fails the overlay when it is built.
    fn prepare_font(&mut self, overlay: &str, font: &FontSpec) -> OverlayResult<()>;

    fn measure(&mut self, overlay: &str, text: &str, font: &FontSpec) -> OverlayResult<Extent>;
}

/// Text shaped with Parley, plus the font bytes needed to draw its glyphs.
pub struct ShapedText {
    pub layout: parley::Layout<TextBrush>,
    pub font_bytes: Arc<Vec<u8>>,
    pub extent: Extent,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("font_bytes_len", &self.font_bytes.len())
            .field("extent", &self.extent)
            .finish()
    }
}

struct LoadedFont {
    bytes: Arc<Vec<u8>>,
    family: String,
}

/// Stateful helper for shaping text from font files on disk.
///
/// Fonts are read and registered once per path.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    fonts: HashMap<PathBuf, LoadedFont>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// Shape `text` on a single unbroken line.
    pub fn layout(
        &mut self,
        overlay: &str,
        text: &str,
        font: &FontSpec,
    ) -> OverlayResult<ShapedText> {
        let (family, font_bytes) = self.load_font(overlay, &font.path)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            font.fill(),
        )));
        if let Some(style) = font.style {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::new(style.weight()),
            ));
            if style.is_italic() {
                builder.push_default(parley::style::StyleProperty::FontStyle(
                    parley::style::FontStyle::Italic,
                ));
            }
        }

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let extent = Extent::new(
            layout.width().ceil() as i64,
            layout.height().ceil() as i64,
        );
        Ok(ShapedText {
            layout,
            font_bytes,
            extent,
        })
    }

    fn load_font(&mut self, overlay: &str, path: &Path) -> OverlayResult<(String, Arc<Vec<u8>>)> {
        if let Some(f) = self.fonts.get(path) {
            return Ok((f.family.clone(), f.bytes.clone()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| OverlayError::resource(overlay, path, format!("read font: {e}")))?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| OverlayError::resource(overlay, path, "no font families in file"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| OverlayError::resource(overlay, path, "font family has no name"))?
            .to_string();
        tracing::debug!(path = %path.display(), family = %family, "registered font");

        let bytes = Arc::new(bytes);
        self.fonts.insert(
            path.to_path_buf(),
            LoadedFont {
                bytes: bytes.clone(),
                family: family.clone(),
            },
        );
        Ok((family, bytes))
    }
}

impl TextMeasure for TextLayoutEngine {
    fn prepare_font(&mut self, overlay: &str, font: &FontSpec) -> OverlayResult<()> {
        self.load_font(overlay, &font.path).map(|_| ())
    }

    fn measure(&mut self, overlay: &str, text: &str, font: &FontSpec) -> OverlayResult<Extent> {
        self.layout(overlay, text, font).map(|s| s.extent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
