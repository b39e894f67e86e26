use crate::{
    foundation::core::{Anchor, Canvas, Extent},
    layout::{
        backdrop::{BackdropRect, backdrop_rect, box_extent, place_in_box},
        composite::{CompositeInput, composite_extent, split},
        resolver::resolve_anchor,
    },
    overlay::spec::{AddonPosition, OverlaySpec, Position},
};

/// Measured content handed to the planner.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutContent {
    /// A stamped image of the given pixel size.
    Image(Extent),
    /// Rendered text, optionally with an addon image beside it.
    Text {
        text: String,
        extent: Extent,
        addon: Option<AddonContent>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddonContent {
    pub extent: Extent,
    pub offset: i64,
    pub position: AddonPosition,
}

impl LayoutContent {
    /// Extent of everything placed: the image, the text, or text and addon combined.
    pub fn extent(&self) -> Extent {
        match self {
            LayoutContent::Image(e) => *e,
            LayoutContent::Text {
                extent,
                addon: None,
                ..
            } => *extent,
            LayoutContent::Text {
                extent,
                addon: Some(a),
                ..
            } => composite_extent(*extent, a.extent, a.offset, a.position),
        }
    }

    /// Extent of the element far-edge box alignments measure from.
    pub fn primary_extent(&self) -> Extent {
        match self {
            LayoutContent::Image(e) => *e,
            LayoutContent::Text { extent, .. } => *extent,
        }
    }
}

/// Text positioned on the canvas.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlacedText {
    pub text: String,
    pub anchor: Anchor,
    pub extent: Extent,
}

/// Everything needed to draw one overlay on one canvas. Pure arithmetic, no pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutPlan {
    pub canvas: Canvas,
    /// Resolved anchor of the whole box (fixed backdrop box or content).
    pub start: Anchor,
    /// Natural extent of the content.
    pub content: Extent,
    /// Backdrop rectangle, present only when the backdrop has a fill or an outline.
    pub backdrop: Option<BackdropRect>,
    pub text: Option<PlacedText>,
    pub addon: Option<Anchor>,
    /// Primary anchor reported to the caller: the addon when present, else the content.
    pub anchor: Anchor,
}

impl LayoutPlan {
    /// A transparent layer is only produced when there is a backdrop or text to draw.
    pub fn needs_layer(&self) -> bool {
        self.backdrop.is_some() || self.text.is_some()
    }
}

/// Lay out `content` for `spec` on `canvas`.
///
/// `position` overrides the overlay's own position, for coordinates handed out by a queue.
pub fn plan_layout(
    spec: &OverlaySpec,
    canvas: Canvas,
    content: &LayoutContent,
    position: Option<&Position>,
) -> LayoutPlan {
    let natural = content.extent();
    let backdrop = &spec.backdrop;
    let start = resolve_anchor(
        position.or(spec.position.as_ref()),
        canvas,
        box_extent(backdrop, natural),
    );

    // A bare image keeps the box start unless a backdrop is drawn around it.
    let places_in_box = backdrop.is_drawn() || matches!(content, LayoutContent::Text { .. });
    let main = match backdrop.fixed_box {
        Some(fixed) if places_in_box => place_in_box(
            start,
            fixed,
            backdrop.align,
            natural,
            content.primary_extent(),
        ),
        _ => start,
    };

    let backdrop_rect = backdrop
        .is_drawn()
        .then(|| backdrop_rect(start, natural, backdrop));

    let (text, addon, anchor) = match content {
        LayoutContent::Image(_) => (None, None, main),
        LayoutContent::Text {
            text,
            extent,
            addon: None,
        } => (
            Some(PlacedText {
                text: text.clone(),
                anchor: main,
                extent: *extent,
            }),
            None,
            main,
        ),
        LayoutContent::Text {
            text,
            extent,
            addon: Some(a),
        } => {
            let split = split(&CompositeInput {
                start,
                content: main,
                box_extent: box_extent(backdrop, natural),
                text: *extent,
                addon: a.extent,
                offset: a.offset,
                position: a.position,
                back_align: backdrop.align,
            });
            (
                Some(PlacedText {
                    text: text.clone(),
                    anchor: split.text,
                    extent: *extent,
                }),
                Some(split.addon),
                split.addon,
            )
        }
    };

    LayoutPlan {
        canvas,
        start,
        content: natural,
        backdrop: backdrop_rect,
        text,
        addon,
        anchor,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
