use std::path::PathBuf;

/// Convenience result type used across the engine.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Error taxonomy for overlay construction and layout.
///
/// Every variant names the overlay it belongs to so a caller can point at the offending entry in
/// its configuration source. All of them are fatal to that overlay only.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Mutually exclusive or missing attribute combinations.
    #[error("configuration error: overlay '{overlay}' {attribute}: {reason}")]
    Configuration {
        /// Declared overlay name (or mapping name when the name is unknown).
        overlay: String,
        /// Offending attribute.
        attribute: String,
        /// Human readable explanation.
        reason: String,
    },

    /// A numeric attribute outside its permitted bounds.
    #[error("range error: overlay '{overlay}' {attribute}: {value} must be {bounds}")]
    Range {
        /// Declared overlay name.
        overlay: String,
        /// Offending attribute.
        attribute: String,
        /// Value as written in the configuration.
        value: String,
        /// Description of the accepted range.
        bounds: String,
    },

    /// A bound image or font that is missing or unreadable.
    #[error("resource error: overlay '{overlay}' {}: {reason}", path.display())]
    Resource {
        /// Declared overlay name.
        overlay: String,
        /// Path of the resource.
        path: PathBuf,
        /// Human readable explanation.
        reason: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Configuration`] value.
    pub fn configuration(
        overlay: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            overlay: overlay.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`OverlayError::Range`] value.
    pub fn range(
        overlay: impl Into<String>,
        attribute: impl Into<String>,
        value: impl ToString,
        bounds: impl Into<String>,
    ) -> Self {
        Self::Range {
            overlay: overlay.into(),
            attribute: attribute.into(),
            value: value.to_string(),
            bounds: bounds.into(),
        }
    }

    /// Build an [`OverlayError::Resource`] value.
    pub fn resource(
        overlay: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resource {
            overlay: overlay.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attribute name carried by configuration and range errors.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Configuration { attribute, .. } | Self::Range { attribute, .. } => {
                Some(attribute)
            }
            _ => None,
        }
    }

    /// Overlay name carried by every engine-originated error.
    pub fn overlay(&self) -> Option<&str> {
        match self {
            Self::Configuration { overlay, .. }
            | Self::Range { overlay, .. }
            | Self::Resource { overlay, .. } => Some(overlay),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
