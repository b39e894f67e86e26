use std::{fmt, path::PathBuf};

use crate::foundation::core::{Axis, Extent, Rgba8};

/// Horizontal alignment of an overlay on its canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Offset measured from the left edge.
    #[default]
    Left,
    /// Offset measured from the canvas center.
    Center,
    /// Offset measured from the right edge.
    Right,
}

/// Vertical alignment of an overlay on its canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Offset measured from the top edge.
    #[default]
    Top,
    /// Offset measured from the canvas center.
    Center,
    /// Offset measured from the bottom edge.
    Bottom,
}

/// Alignment collapsed onto a single axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisAlign {
    /// left / top
    Start,
    /// center
    Center,
    /// right / bottom
    End,
}

impl From<HorizontalAlign> for AxisAlign {
    fn from(value: HorizontalAlign) -> Self {
        match value {
            HorizontalAlign::Left => AxisAlign::Start,
            HorizontalAlign::Center => AxisAlign::Center,
            HorizontalAlign::Right => AxisAlign::End,
        }
    }
}

impl From<VerticalAlign> for AxisAlign {
    fn from(value: VerticalAlign) -> Self {
        match value {
            VerticalAlign::Top => AxisAlign::Start,
            VerticalAlign::Center => AxisAlign::Center,
            VerticalAlign::Bottom => AxisAlign::End,
        }
    }
}

impl HorizontalAlign {
    pub const OPTIONS: [(&'static str, HorizontalAlign); 3] = [
        ("left", HorizontalAlign::Left),
        ("center", HorizontalAlign::Center),
        ("right", HorizontalAlign::Right),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl VerticalAlign {
    pub const OPTIONS: [(&'static str, VerticalAlign); 3] = [
        ("top", VerticalAlign::Top),
        ("center", VerticalAlign::Center),
        ("bottom", VerticalAlign::Bottom),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

/// An offset along one axis, decided once during normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    /// Whole pixels.
    Absolute(i64),
    /// Percentage of the canvas extent on that axis.
    Percent(f64),
}

impl Offset {
    /// Pixel value of this offset on a canvas axis of `canvas_extent` pixels.
    pub fn to_pixels(self, canvas_extent: i64) -> i64 {
        match self {
            Offset::Absolute(px) => px,
            Offset::Percent(p) => (canvas_extent as f64 * 0.01 * p).round() as i64,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Absolute(px) => write!(f, "{px}"),
            Offset::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Declared placement of an overlay: both alignments plus both offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub horizontal_align: HorizontalAlign,
    pub horizontal_offset: Offset,
    pub vertical_align: VerticalAlign,
    pub vertical_offset: Offset,
}

/// Where content sits inside a fixed backdrop box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackAlign {
    Left,
    Right,
    Top,
    Bottom,
    #[default]
    Center,
}

impl BackAlign {
    pub const OPTIONS: [(&'static str, BackAlign); 5] = [
        ("left", BackAlign::Left),
        ("right", BackAlign::Right),
        ("center", BackAlign::Center),
        ("top", BackAlign::Top),
        ("bottom", BackAlign::Bottom),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Center => "center",
        }
    }

    /// Axis this alignment pins content on; `None` for center.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::Left | Self::Right => Some(Axis::Horizontal),
            Self::Top | Self::Bottom => Some(Axis::Vertical),
            Self::Center => None,
        }
    }
}

/// Optional panel drawn behind the overlay content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackdropSpec {
    pub color: Option<Rgba8>,
    pub line_color: Option<Rgba8>,
    pub line_width: Option<i64>,
    pub radius: Option<i64>,
    pub padding: i64,
    pub align: BackAlign,
    /// Fixed `(width, height)` box; content is sized-to-fit when absent.
    pub fixed_box: Option<Extent>,
}

impl BackdropSpec {
    /// A backdrop is only drawn when it has a fill or an outline color.
    pub fn is_drawn(&self) -> bool {
        self.color.is_some() || self.line_color.is_some()
    }
}

/// Side of the text an addon image is attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddonPosition {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl AddonPosition {
    pub const OPTIONS: [(&'static str, AddonPosition); 4] = [
        ("left", AddonPosition::Left),
        ("right", AddonPosition::Right),
        ("top", AddonPosition::Top),
        ("bottom", AddonPosition::Bottom),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }
}

/// A decoded source image: where it lives, how big it is, and its byte size on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pub path: PathBuf,
    pub size: Extent,
    /// Content-hash proxy used for cache staleness checks.
    pub file_size: u64,
}

/// Secondary image drawn next to text content.
#[derive(Clone, Debug, PartialEq)]
pub struct AddonSpec {
    pub source: ImageSource,
    pub offset: i64,
    pub position: AddonPosition,
}

/// Named font style applied through weight/slant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Thin,
    Light,
    Regular,
    Medium,
    SemiBold,
    Bold,
    Black,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const OPTIONS: [(&'static str, FontStyle); 9] = [
        ("thin", FontStyle::Thin),
        ("light", FontStyle::Light),
        ("regular", FontStyle::Regular),
        ("medium", FontStyle::Medium),
        ("semibold", FontStyle::SemiBold),
        ("bold", FontStyle::Bold),
        ("black", FontStyle::Black),
        ("italic", FontStyle::Italic),
        ("bold italic", FontStyle::BoldItalic),
    ];

    pub fn weight(self) -> f32 {
        match self {
            Self::Thin => 100.0,
            Self::Light => 300.0,
            Self::Regular | Self::Italic => 400.0,
            Self::Medium => 500.0,
            Self::SemiBold => 600.0,
            Self::Bold | Self::BoldItalic => 700.0,
            Self::Black => 900.0,
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: u32,
    pub style: Option<FontStyle>,
    pub color: Option<Rgba8>,
}

impl FontSpec {
    pub const DEFAULT_SIZE: u32 = 36;

    /// Fill color used when none was configured.
    pub fn fill(&self) -> Rgba8 {
        self.color.unwrap_or(Rgba8::WHITE)
    }
}

/// Rating attribute a deferred text overlay renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RatingField {
    Audience,
    Critic,
    User,
}

impl RatingField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audience => "audience_rating",
            Self::Critic => "critic_rating",
            Self::User => "user_rating",
        }
    }
}

/// How a 0..10 rating is turned into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RatingFormat {
    /// `7.5`
    Decimal,
    /// `8` for 8.0, `7.5` otherwise (suffix `0`).
    TrimmedDecimal,
    /// `75%` (suffix `%`).
    Percent,
    /// `75` (suffix `#`).
    Scaled,
}

impl RatingFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Decimal => "",
            Self::TrimmedDecimal => "0",
            Self::Percent => "%",
            Self::Scaled => "#",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextContent {
    /// Text known at configuration time.
    Literal(String),
    /// Text produced per item from a rating value.
    Rating {
        field: RatingField,
        format: RatingFormat,
    },
}

/// What an overlay draws, decided once when the overlay is built.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayKind {
    /// Blur the poster with the given radius (1..=100); no layout.
    Blur { radius: u32 },
    /// Render text, optionally with an addon image.
    Text {
        content: TextContent,
        font: FontSpec,
        addon: Option<AddonSpec>,
    },
    /// Stamp a source image.
    Image { source: ImageSource },
}

/// External stacking: overlays in a group compete by weight, overlays in a queue share
/// positions handed out by weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Stacking {
    #[default]
    None,
    Group { key: String, weight: u32 },
    Queue { key: String, weight: u32 },
}

/// Fully validated overlay definition.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySpec {
    /// Canonical name (`blur(50)`, `text(4K)`, or the image name).
    pub name: String,
    pub kind: OverlayKind,
    pub position: Option<Position>,
    pub backdrop: BackdropSpec,
    pub stacking: Stacking,
}

impl OverlaySpec {
    pub fn has_coordinates(&self) -> bool {
        self.position.is_some()
    }

    pub fn is_queued(&self) -> bool {
        matches!(self.stacking, Stacking::Queue { .. })
    }

    pub fn font(&self) -> Option<&FontSpec> {
        match &self.kind {
            OverlayKind::Text { font, .. } => Some(font),
            _ => None,
        }
    }

    pub fn addon(&self) -> Option<&AddonSpec> {
        match &self.kind {
            OverlayKind::Text { addon, .. } => addon.as_ref(),
            _ => None,
        }
    }
}
