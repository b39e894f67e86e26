use std::fmt::{self, Display, Write as _};

use crate::overlay::spec::{OverlaySpec, Stacking};

/// Canonical string of every visually relevant overlay attribute.
///
/// Two overlays with equal signatures draw identically given identical source images. Segments
/// are `key=value` pairs in a fixed order separated by `|`, which overlay names cannot contain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OverlaySignature(String);

impl OverlaySignature {
    pub fn of(spec: &OverlaySpec) -> Self {
        let mut w = SignatureWriter::new(&spec.name);

        if let Stacking::Group { key, weight } = &spec.stacking {
            w.field("group", key);
            w.field("weight", weight);
        }
        if let Some(p) = &spec.position {
            w.field("horizontal_align", p.horizontal_align.as_str());
            w.field("horizontal_offset", p.horizontal_offset);
            w.field("vertical_offset", p.vertical_offset);
            w.field("vertical_align", p.vertical_align.as_str());
        }
        if let Some(font) = spec.font() {
            w.field("font", font.path.display());
            w.field("font_size", font.size);
            if let Some(style) = font.style {
                w.field("font_weight", style.weight());
                w.field("font_italic", style.is_italic());
            }
        }
        let back = &spec.backdrop;
        if let Some(b) = back.fixed_box {
            w.field("back_width", b.width);
            w.field("back_height", b.height);
            w.field("back_align", back.align.as_str());
        }
        if let Some(addon) = spec.addon() {
            w.field("addon_position", addon.position.as_str());
            w.field("addon_offset", addon.offset);
        }

        w.opt("font_color", spec.font().and_then(|f| f.color));
        w.opt("back_color", back.color);
        w.opt("back_radius", back.radius);
        w.field("back_padding", back.padding);
        w.opt("back_line_color", back.line_color);
        w.opt("back_line_width", back.line_width);

        Self(w.finish())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a cached overlay built from `old` must be redrawn for `new`.
    pub fn compare(old: &OverlaySignature, new: &OverlaySignature) -> bool {
        old != new
    }
}

impl From<String> for OverlaySignature {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OverlaySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct SignatureWriter {
    out: String,
}

impl SignatureWriter {
    fn new(name: &str) -> Self {
        Self {
            out: name.to_owned(),
        }
    }

    fn field(&mut self, key: &str, value: impl Display) {
        // Writing to a String cannot fail.
        let _ = write!(self.out, "|{key}={value}");
    }

    fn opt(&mut self, key: &str, value: Option<impl Display>) {
        if let Some(v) = value {
            self.field(key, v);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
#[path = "../tests/unit/signature.rs"]
mod tests;
