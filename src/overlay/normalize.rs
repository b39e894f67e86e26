use std::path::{Path, PathBuf};

use crate::{
    assets::decode::load_image_source,
    config::model::{OverlayAttrs, OverlayEntry, RawOffset},
    foundation::{
        color::parse_color,
        core::{Extent, Rgba8},
        error::{OverlayError, OverlayResult},
    },
    layout::composite::check_supported,
    overlay::spec::{
        AddonPosition, AddonSpec, BackAlign, BackdropSpec, FontSpec, FontStyle, HorizontalAlign,
        Offset, OverlayKind, OverlaySpec, Position, RatingField, RatingFormat, Stacking,
        TextContent, VerticalAlign,
    },
};

/// Radius used when a `blur(N)` name cannot be parsed.
pub const DEFAULT_BLUR: u32 = 50;

/// Largest magnitude accepted for pixel-valued attributes (offsets, box sizes, padding).
pub const MAX_PIXELS: i64 = 100_000;

/// Where on-disk resources referenced by overlay definitions are looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Base directory relative `file` and `font` paths are resolved against.
    pub assets_root: PathBuf,
    /// Folder holding `<name>.png` for image overlays without a `file`.
    pub overlay_folder: PathBuf,
    /// Font used by text overlays that do not name one.
    pub default_font: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::with_root(".")
    }
}

impl BuildOptions {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            overlay_folder: root.join("overlays"),
            default_font: root.join("fonts").join("Roboto-Medium.ttf"),
            assets_root: root,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.assets_root.join(p)
        }
    }
}

/// Validate one overlay entry and build its [`OverlaySpec`].
///
/// `mapping_name` stands in as the overlay name in errors raised before the name is known.
/// Referenced images and fonts are checked on disk; image dimensions and byte sizes are read here.
pub fn build_spec(
    mapping_name: &str,
    entry: &OverlayEntry,
    opts: &BuildOptions,
) -> OverlayResult<OverlaySpec> {
    let named;
    let attrs = match entry {
        OverlayEntry::Attrs(attrs) => attrs.as_ref(),
        OverlayEntry::Name(name) => {
            tracing::warn!(
                mapping = mapping_name,
                name = %name,
                "no overlay attributes, using the value as the overlay name"
            );
            named = OverlayAttrs::named(name.clone());
            &named
        }
    };
    Builder {
        name: mapping_name.to_owned(),
        attrs,
        opts,
    }
    .build()
}

struct Builder<'a> {
    /// Overlay name used in errors.
    name: String,
    attrs: &'a OverlayAttrs,
    opts: &'a BuildOptions,
}

impl Builder<'_> {
    fn build(mut self) -> OverlayResult<OverlaySpec> {
        let name = match self.attrs.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_owned(),
            _ => {
                return Err(self.config_err("name", "overlay must have the name attribute"));
            }
        };
        self.name = name.clone();
        tracing::debug!(overlay = %name, "validating overlay");

        let stacking = self.stacking()?;
        let position = self.position()?;
        let backdrop = self.backdrop()?;

        let queued = matches!(stacking, Stacking::Queue { .. });
        if backdrop.is_drawn() && position.is_none() && !queued {
            return Err(self.config_err(
                "horizontal_offset",
                "horizontal_offset and vertical_offset are required when using a backdrop",
            ));
        }

        let is_blur = name.starts_with("blur");
        if !is_blur && non_empty(&self.attrs.file).is_none() {
            for (attr, value) in [
                ("git", &self.attrs.git),
                ("repo", &self.attrs.repo),
                ("url", &self.attrs.url),
            ] {
                if non_empty(value).is_some() {
                    return Err(self.config_err(
                        attr,
                        "remote overlay sources are not supported, download the image and use file",
                    ));
                }
            }
        }

        if name.contains('|') {
            return Err(self.config_err("name", "overlay name cannot contain '|'"));
        }

        let (name, kind) = if is_blur {
            let radius = parse_blur_radius(&name);
            (format!("blur({radius})"), OverlayKind::Blur { radius })
        } else if name.starts_with("text") {
            if position.is_none() && !queued {
                return Err(self.config_err(
                    "horizontal_offset",
                    "horizontal_offset and vertical_offset are required when using text",
                ));
            }
            self.text_kind(&name, &backdrop)?
        } else {
            let path = match non_empty(&self.attrs.file) {
                Some(file) => self.opts.resolve(file),
                None => self
                    .opts
                    .overlay_folder
                    .join(format!("{}.png", sanitize_file_name(&name))),
            };
            let source = load_image_source(&name, &path)?;
            (name, OverlayKind::Image { source })
        };

        Ok(OverlaySpec {
            name,
            kind,
            position,
            backdrop,
            stacking,
        })
    }

    fn stacking(&self) -> OverlayResult<Stacking> {
        let weight = match self.attrs.weight {
            Some(w) => Some(
                u32::try_from(w).map_err(|_| self.range_err("weight", w, "0 or greater"))?,
            ),
            None => None,
        };

        let group = self.attrs.group.as_deref();
        let queue = self.attrs.queue.as_deref();
        match (group, queue) {
            (Some(_), Some(_)) => Err(self.config_err(
                "queue",
                "overlay attribute's group and queue cannot be used together",
            )),
            (Some(key), None) => match weight {
                Some(weight) if !key.is_empty() => Ok(Stacking::Group {
                    key: key.to_owned(),
                    weight,
                }),
                _ => Err(self.config_err("group", "group requires the weight attribute")),
            },
            (None, Some(key)) => match weight {
                Some(weight) if !key.is_empty() => Ok(Stacking::Queue {
                    key: key.to_owned(),
                    weight,
                }),
                _ => Err(self.config_err("queue", "queue requires the weight attribute")),
            },
            (None, None) => Ok(Stacking::None),
        }
    }

    fn position(&self) -> OverlayResult<Option<Position>> {
        let horizontal_align = match self.attrs.horizontal_align.as_deref() {
            Some(v) => self.parse_option("horizontal_align", v, &HorizontalAlign::OPTIONS)?,
            None => HorizontalAlign::Left,
        };
        let vertical_align = match self.attrs.vertical_align.as_deref() {
            Some(v) => self.parse_option("vertical_align", v, &VerticalAlign::OPTIONS)?,
            None => VerticalAlign::Top,
        };

        let horizontal_offset = self.axis_offset(
            "horizontal_offset",
            self.attrs.horizontal_offset.as_ref(),
            horizontal_align == HorizontalAlign::Center,
        )?;
        let vertical_offset = self.axis_offset(
            "vertical_offset",
            self.attrs.vertical_offset.as_ref(),
            vertical_align == VerticalAlign::Center,
        )?;

        match (horizontal_offset, vertical_offset) {
            (Some(horizontal_offset), Some(vertical_offset)) => Ok(Some(Position {
                horizontal_align,
                horizontal_offset,
                vertical_align,
                vertical_offset,
            })),
            (None, None) => Ok(None),
            _ => Err(self.config_err(
                "horizontal_offset",
                "horizontal_offset and vertical_offset must be used together",
            )),
        }
    }

    fn axis_offset(
        &self,
        attr: &str,
        raw: Option<&RawOffset>,
        centered: bool,
    ) -> OverlayResult<Option<Offset>> {
        let Some(raw) = raw else {
            return Ok(centered.then_some(Offset::Absolute(0)));
        };
        let offset = parse_offset(raw)
            .ok_or_else(|| self.config_err(attr, format!("{raw} must be a number")))?;

        match offset {
            Offset::Absolute(px) if !centered && !(0..=MAX_PIXELS).contains(&px) => {
                Err(self.range_err(attr, raw, &format!("between 0 and {MAX_PIXELS}")))
            }
            Offset::Absolute(px) if centered && px.unsigned_abs() > MAX_PIXELS.unsigned_abs() => {
                let bounds = format!("between -{MAX_PIXELS} and {MAX_PIXELS}");
                Err(self.range_err(attr, raw, &bounds))
            }
            Offset::Percent(p) if !centered && !(0.0..=100.0).contains(&p) => {
                Err(self.range_err(attr, raw, "between 0% and 100%"))
            }
            Offset::Percent(p) if centered && !(-50.0..=50.0).contains(&p) => {
                Err(self.range_err(attr, raw, "between -50% and 50%"))
            }
            _ => Ok(Some(offset)),
        }
    }

    fn backdrop(&self) -> OverlayResult<BackdropSpec> {
        let a = self.attrs;
        let align = match a.back_align.as_deref() {
            Some(v) => self.parse_option("back_align", v, &BackAlign::OPTIONS)?,
            None => BackAlign::Center,
        };
        let width = self.non_negative("back_width", a.back_width)?;
        let height = self.non_negative("back_height", a.back_height)?;
        let fixed_box = match (width, height) {
            (Some(w), Some(h)) => Some(Extent::new(w, h)),
            (None, None) => None,
            _ => {
                return Err(self.config_err(
                    "back_width",
                    "back_width and back_height must be used together",
                ));
            }
        };
        if align != BackAlign::Center && fixed_box.is_none() {
            return Err(self.config_err(
                "back_align",
                "back_align only works when back_width and back_height are used",
            ));
        }

        Ok(BackdropSpec {
            color: self.color("back_color", &a.back_color)?,
            line_color: self.color("back_line_color", &a.back_line_color)?,
            line_width: self.non_negative("back_line_width", a.back_line_width)?,
            radius: self.non_negative("back_radius", a.back_radius)?,
            padding: self.non_negative("back_padding", a.back_padding)?.unwrap_or(0),
            align,
            fixed_box,
        })
    }

    fn text_kind(
        &self,
        name: &str,
        backdrop: &BackdropSpec,
    ) -> OverlayResult<(String, OverlayKind)> {
        let addon = match non_empty(&self.attrs.file) {
            Some(file) => Some(self.addon(&self.opts.resolve(file), backdrop.align)?),
            None => None,
        };

        let Some(inner) = parenthesized(name) else {
            return Err(self.config_err("name", "failed to parse text overlay name"));
        };
        let canonical = format!("text({inner})");
        let content = parse_text_content(inner);

        let size = match self.attrs.font_size {
            Some(s) => u32::try_from(s)
                .ok()
                .filter(|s| (1..=MAX_PIXELS).contains(&i64::from(*s)))
                .ok_or_else(|| {
                    self.range_err("font_size", s, &format!("between 1 and {MAX_PIXELS}"))
                })?,
            None => FontSpec::DEFAULT_SIZE,
        };
        let path = match non_empty(&self.attrs.font) {
            Some(font) => self.opts.resolve(font),
            None => self.opts.default_font.clone(),
        };
        if !path.is_file() {
            return Err(OverlayError::resource(&self.name, path, "font not found"));
        }
        let style = match non_empty(&self.attrs.font_style) {
            Some(v) => Some(self.parse_option("font_style", v, &FontStyle::OPTIONS)?),
            None => None,
        };

        let font = FontSpec {
            path,
            size,
            style,
            color: self.color("font_color", &self.attrs.font_color)?,
        };
        Ok((
            canonical,
            OverlayKind::Text {
                content,
                font,
                addon,
            },
        ))
    }

    fn addon(&self, path: &Path, back_align: BackAlign) -> OverlayResult<AddonSpec> {
        if !path.is_file() {
            return Err(OverlayError::resource(
                &self.name,
                path,
                "text overlay addon image not found",
            ));
        }
        let position = match self.attrs.addon_position.as_deref() {
            Some(v) => self.parse_option("addon_position", v, &AddonPosition::OPTIONS)?,
            None => AddonPosition::Left,
        };
        check_supported(position, back_align)
            .map_err(|reason| self.config_err("addon_position", reason))?;

        Ok(AddonSpec {
            source: load_image_source(&self.name, path)?,
            offset: self.pixels("addon_offset", self.attrs.addon_offset)?.unwrap_or(0),
            position,
        })
    }

    fn color(&self, attr: &str, value: &Option<String>) -> OverlayResult<Option<Rgba8>> {
        match non_empty(value) {
            Some(v) => parse_color(v)
                .map(Some)
                .map_err(|e| self.config_err(attr, format!("{v} invalid: {e}"))),
            None => Ok(None),
        }
    }

    fn non_negative(&self, attr: &str, value: Option<i64>) -> OverlayResult<Option<i64>> {
        match value {
            Some(v) if !(0..=MAX_PIXELS).contains(&v) => {
                Err(self.range_err(attr, v, &format!("between 0 and {MAX_PIXELS}")))
            }
            other => Ok(other),
        }
    }

    /// Signed pixel value, bounded in magnitude.
    fn pixels(&self, attr: &str, value: Option<i64>) -> OverlayResult<Option<i64>> {
        match value {
            Some(v) if v.unsigned_abs() > MAX_PIXELS.unsigned_abs() => Err(self.range_err(
                attr,
                v,
                &format!("between -{MAX_PIXELS} and {MAX_PIXELS}"),
            )),
            other => Ok(other),
        }
    }

    fn parse_option<T: Copy>(
        &self,
        attr: &str,
        value: &str,
        options: &[(&'static str, T)],
    ) -> OverlayResult<T> {
        let wanted = value.trim();
        options
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                let names: Vec<&str> = options.iter().map(|(k, _)| *k).collect();
                self.config_err(
                    attr,
                    format!("{value} is invalid, options: {}", names.join(", ")),
                )
            })
    }

    fn config_err(&self, attr: &str, reason: impl Into<String>) -> OverlayError {
        OverlayError::configuration(&self.name, attr, reason)
    }

    fn range_err(&self, attr: &str, value: impl ToString, bounds: &str) -> OverlayError {
        OverlayError::range(&self.name, attr, value, bounds)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Contents of the first `(...)` group of `name`.
fn parenthesized(name: &str) -> Option<&str> {
    let open = name.find('(')?;
    let rest = &name[open + 1..];
    let close = rest.find(')')?;
    let inner = &rest[..close];
    (!inner.is_empty()).then_some(inner)
}

/// Radius of a `blur(N)` name; anything unparsable or outside 1..=100 falls back to 50.
pub fn parse_blur_radius(name: &str) -> u32 {
    match parenthesized(name).and_then(|v| v.trim().parse::<u32>().ok()) {
        Some(r) if (1..=100).contains(&r) => r,
        _ => {
            tracing::warn!(
                overlay = name,
                "failed to parse blur overlay name, defaulting to blur({DEFAULT_BLUR})"
            );
            DEFAULT_BLUR
        }
    }
}

/// Decide whether `text(...)` content is a deferred rating or literal text.
pub fn parse_text_content(inner: &str) -> TextContent {
    const FIELDS: [RatingField; 3] = [RatingField::Audience, RatingField::Critic, RatingField::User];
    const FORMATS: [RatingFormat; 4] = [
        RatingFormat::Decimal,
        RatingFormat::TrimmedDecimal,
        RatingFormat::Percent,
        RatingFormat::Scaled,
    ];
    for field in FIELDS {
        if let Some(suffix) = inner.strip_prefix(field.as_str())
            && let Some(format) = FORMATS.into_iter().find(|f| f.suffix() == suffix)
        {
            return TextContent::Rating { field, format };
        }
    }
    TextContent::Literal(inner.to_owned())
}

/// Parse an offset as written. Strings ending in `%` are percentages; absolute values must be
/// whole numbers.
pub fn parse_offset(raw: &RawOffset) -> Option<Offset> {
    match raw {
        RawOffset::Int(v) => Some(Offset::Absolute(*v)),
        RawOffset::Float(v) => whole(*v).map(Offset::Absolute),
        RawOffset::Text(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(p) => p
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite())
                    .map(Offset::Percent),
                None => s
                    .parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
                    .map(Offset::Absolute),
            }
        }
    }
}

fn whole(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

/// Make an overlay name safe to use as a file stem.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim_end_matches(['.', ' ']).to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/normalize.rs"]
mod tests;
