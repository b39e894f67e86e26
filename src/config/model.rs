use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::foundation::error::{OverlayError, OverlayResult};

/// An overlay definition file: mapping names to definitions.
///
/// ```yaml
/// overlays:
///   4K:
///     overlay:
///       name: 4K
///       horizontal_align: left
///       horizontal_offset: 30
///       vertical_align: top
///       vertical_offset: 30
/// ```
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct OverlayFile {
    #[serde(default)]
    pub overlays: BTreeMap<String, OverlayDefinition>,
}

impl OverlayFile {
    /// Load a JSON (`.json`) or YAML (anything else) definition file.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay file '{}'", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        serde_json::from_str(s)
            .context("parse overlay file json")
            .map_err(OverlayError::from)
    }

    pub fn from_yaml_str(s: &str) -> OverlayResult<Self> {
        serde_yaml::from_str(s)
            .context("parse overlay file yaml")
            .map_err(OverlayError::from)
    }
}

/// One mapping: the overlay it stamps. Other mapping keys (builders, filters) belong to
/// collaborators and are ignored here.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct OverlayDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayEntry>,
}

/// An overlay attribute: either a bare name or a full attribute map.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OverlayEntry {
    Name(String),
    Attrs(Box<OverlayAttrs>),
}

/// Offset as written: `30`, `12.5`, `"30"` or `"12.5%"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawOffset {
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for RawOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawOffset::Int(v) => write!(f, "{v}"),
            RawOffset::Float(v) => write!(f, "{v}"),
            RawOffset::Text(v) => f.write_str(v),
        }
    }
}

/// Overlay attributes before validation. Every field is optional here; the builder decides
/// defaults and rejects bad combinations.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayAttrs {
    pub name: Option<String>,

    pub group: Option<String>,
    pub queue: Option<String>,
    pub weight: Option<i64>,

    pub horizontal_align: Option<String>,
    pub horizontal_offset: Option<RawOffset>,
    pub vertical_align: Option<String>,
    pub vertical_offset: Option<RawOffset>,

    pub back_color: Option<String>,
    pub back_radius: Option<i64>,
    pub back_line_width: Option<i64>,
    pub back_line_color: Option<String>,
    pub back_padding: Option<i64>,
    pub back_align: Option<String>,
    pub back_width: Option<i64>,
    pub back_height: Option<i64>,

    pub file: Option<String>,
    pub git: Option<String>,
    pub repo: Option<String>,
    pub url: Option<String>,

    pub addon_offset: Option<i64>,
    pub addon_position: Option<String>,

    pub font: Option<String>,
    pub font_size: Option<i64>,
    pub font_style: Option<String>,
    pub font_color: Option<String>,
}

impl OverlayAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
