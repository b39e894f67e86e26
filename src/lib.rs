//! Overlay layout engine for poster images.
//!
//! Overlay definitions (an image, text, or a backdrop panel behind either) are validated once
//! into an [`OverlaySpec`], then placed on the two fixed canvas templates:
//!
//! - Load definitions from an [`OverlayFile`]
//! - Build each one with an [`OverlayEngine`], which reserves a unique mapping name, computes the
//!   [`OverlaySignature`] and checks the bound source image for changes
//! - Read the resulting [`LayoutResult`] per [`CanvasTemplate`]: the anchor to stamp at, and a
//!   transparent layer with the backdrop and text already drawn
#![forbid(unsafe_code)]

pub mod assets;
pub mod cache;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod overlay;
pub mod pipeline;
pub mod render;
pub mod signature;
pub mod text;

pub use crate::cache::{ImageMap, MemoryImageMap};
pub use crate::config::model::{OverlayAttrs, OverlayDefinition, OverlayEntry, OverlayFile};
pub use crate::foundation::core::{Anchor, Canvas, CanvasTemplate, Extent, Rgba8};
pub use crate::foundation::error::{OverlayError, OverlayResult};
pub use crate::layout::plan::LayoutPlan;
pub use crate::overlay::normalize::BuildOptions;
pub use crate::overlay::registry::NameRegistry;
pub use crate::overlay::spec::{OverlayKind, OverlaySpec, Position};
pub use crate::pipeline::{BatchReport, LayoutResult, Overlay, OverlayEngine};
pub use crate::render::backend::{DrawBackend, OverlayLayer};
pub use crate::render::cpu::CpuBackend;
pub use crate::signature::OverlaySignature;
pub use crate::text::metrics::{TextLayoutEngine, TextMeasure};
