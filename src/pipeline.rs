use crate::{
    cache::{ImageMap, refresh_source},
    config::model::{OverlayEntry, OverlayFile},
    foundation::{
        core::{Anchor, CanvasTemplate},
        error::{OverlayError, OverlayResult},
    },
    layout::plan::{AddonContent, LayoutContent, LayoutPlan, plan_layout},
    overlay::{
        normalize::{BuildOptions, build_spec},
        registry::NameRegistry,
        spec::{OverlayKind, OverlaySpec, Position, TextContent},
    },
    render::backend::{DrawBackend, OverlayLayer, render_layer},
    signature::OverlaySignature,
    text::{metrics::TextMeasure, rating::render_text},
};

/// Table suffix image-map entries are stored under.
pub const DEFAULT_IMAGE_TABLE: &str = "overlays";

/// Placement of one overlay on one canvas template.
#[derive(Clone, Debug, serde::Serialize)]
pub struct LayoutResult {
    pub template: CanvasTemplate,
    /// Primary anchor: the addon anchor when an addon is present, else the content anchor.
    pub anchor: Anchor,
    pub text_anchor: Option<Anchor>,
    pub addon_anchor: Option<Anchor>,
    pub plan: LayoutPlan,
    /// Transparent layer with backdrop and text drawn, when there is anything to draw.
    #[serde(skip)]
    pub layer: Option<OverlayLayer>,
}

/// A built overlay: validated spec, signature, staleness, and its eager layouts.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub mapping_name: String,
    pub spec: OverlaySpec,
    pub signature: OverlaySignature,
    /// Whether the bound source image changed since it was last recorded.
    pub updated: bool,
    pub portrait: Option<LayoutResult>,
    pub landscape: Option<LayoutResult>,
}

impl Overlay {
    pub fn result(&self, template: CanvasTemplate) -> Option<&LayoutResult> {
        match template {
            CanvasTemplate::Portrait => self.portrait.as_ref(),
            CanvasTemplate::Landscape => self.landscape.as_ref(),
        }
    }

    /// Rating text is only laid out once a rating is supplied per item.
    pub fn is_deferred(&self) -> bool {
        matches!(
            &self.spec.kind,
            OverlayKind::Text {
                content: TextContent::Rating { .. },
                ..
            }
        )
    }
}

/// Outcome of loading a whole definition file; failures do not stop the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub overlays: Vec<Overlay>,
    pub errors: Vec<(String, OverlayError)>,
}

/// Builds overlays and lays them out with a drawing backend.
pub struct OverlayEngine<B> {
    backend: B,
    options: BuildOptions,
    table: String,
}

impl<B: DrawBackend + TextMeasure> OverlayEngine<B> {
    pub fn new(backend: B, options: BuildOptions) -> Self {
        Self {
            backend,
            options,
            table: DEFAULT_IMAGE_TABLE.to_owned(),
        }
    }

    /// Image-map table staleness values are recorded under, e.g. `<library>_overlays`.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Build one overlay definition.
    #[tracing::instrument(skip_all, fields(mapping = %mapping_name))]
    pub fn build(
        &mut self,
        mapping_name: &str,
        entry: &OverlayEntry,
        registry: &mut NameRegistry,
        images: &mut dyn ImageMap,
    ) -> OverlayResult<Overlay> {
        let mapping_name = registry.reserve(mapping_name);
        let spec = build_spec(&mapping_name, entry, &self.options)?;
        if let Some(font) = spec.font() {
            self.backend.prepare_font(&spec.name, font)?;
        }
        let signature = OverlaySignature::of(&spec);

        let updated = match &spec.kind {
            OverlayKind::Image { source } => {
                refresh_source(images, &mapping_name, &self.table, &mapping_name, source)
            }
            OverlayKind::Text {
                addon: Some(addon), ..
            } => refresh_source(images, &mapping_name, &self.table, &spec.name, &addon.source),
            _ => false,
        };

        let eager = match &spec.kind {
            OverlayKind::Image { .. } => spec.has_coordinates(),
            OverlayKind::Text { content, .. } => matches!(content, TextContent::Literal(_)),
            OverlayKind::Blur { .. } => false,
        };
        let (portrait, landscape) = if eager {
            (
                self.layout_spec(&spec, CanvasTemplate::Portrait, None, None)?,
                self.layout_spec(&spec, CanvasTemplate::Landscape, None, None)?,
            )
        } else {
            (None, None)
        };

        tracing::debug!(
            overlay = %spec.name,
            signature = %signature,
            updated,
            "overlay built"
        );
        Ok(Overlay {
            mapping_name,
            spec,
            signature,
            updated,
            portrait,
            landscape,
        })
    }

    /// Build every overlay of `file` in mapping-name order, collecting per-overlay failures.
    #[tracing::instrument(skip_all, fields(count = file.overlays.len()))]
    pub fn load_file(
        &mut self,
        file: &OverlayFile,
        registry: &mut NameRegistry,
        images: &mut dyn ImageMap,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (mapping_name, definition) in &file.overlays {
            let entry = definition
                .overlay
                .clone()
                .unwrap_or_else(|| OverlayEntry::Name(mapping_name.clone()));
            match self.build(mapping_name, &entry, registry, images) {
                Ok(overlay) => report.overlays.push(overlay),
                Err(e) => {
                    tracing::warn!(mapping = %mapping_name, error = %e, "overlay skipped");
                    report.errors.push((mapping_name.clone(), e));
                }
            }
        }
        report
    }

    /// Lay out `overlay` on `template` from its own position.
    ///
    /// Returns `None` for overlays with nothing to place (blur, or rating text without a rating).
    pub fn layout(
        &mut self,
        overlay: &Overlay,
        template: CanvasTemplate,
    ) -> OverlayResult<Option<LayoutResult>> {
        self.layout_spec(&overlay.spec, template, None, None)
    }

    /// Lay out rating text for one item.
    pub fn layout_rating(
        &mut self,
        overlay: &Overlay,
        template: CanvasTemplate,
        rating: f64,
    ) -> OverlayResult<Option<LayoutResult>> {
        self.layout_spec(&overlay.spec, template, Some(rating), None)
    }

    /// Lay out at coordinates handed out by a queue, instead of the overlay's own position.
    pub fn layout_at(
        &mut self,
        overlay: &Overlay,
        template: CanvasTemplate,
        position: &Position,
        rating: Option<f64>,
    ) -> OverlayResult<Option<LayoutResult>> {
        self.layout_spec(&overlay.spec, template, rating, Some(position))
    }

    #[tracing::instrument(skip_all, fields(overlay = %spec.name, template = %template))]
    fn layout_spec(
        &mut self,
        spec: &OverlaySpec,
        template: CanvasTemplate,
        rating: Option<f64>,
        position: Option<&Position>,
    ) -> OverlayResult<Option<LayoutResult>> {
        let content = match &spec.kind {
            OverlayKind::Blur { .. } => return Ok(None),
            OverlayKind::Image { source } => LayoutContent::Image(source.size),
            OverlayKind::Text {
                content,
                font,
                addon,
            } => {
                let Some(text) = render_text(content, rating) else {
                    return Ok(None);
                };
                let extent = self.backend.measure(&spec.name, &text, font)?;
                LayoutContent::Text {
                    text,
                    extent,
                    addon: addon.as_ref().map(|a| AddonContent {
                        extent: a.source.size,
                        offset: a.offset,
                        position: a.position,
                    }),
                }
            }
        };

        let plan = plan_layout(spec, template.canvas(), &content, position);
        let layer = render_layer(
            &mut self.backend,
            &spec.name,
            &plan,
            &spec.backdrop,
            spec.font(),
        )?;
        tracing::debug!(anchor = %plan.anchor, layered = layer.is_some(), "laid out");

        Ok(Some(LayoutResult {
            template,
            anchor: plan.anchor,
            text_anchor: plan.text.as_ref().map(|t| t.anchor),
            addon_anchor: plan.addon,
            plan,
            layer,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
