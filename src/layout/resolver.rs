use crate::{
    foundation::core::{Anchor, Canvas, Extent},
    overlay::spec::{AxisAlign, Offset, Position},
};

/// Resolve one axis of an anchor.
///
/// Percent offsets are taken against `canvas_extent`, never against the content. Center halves
/// truncate toward zero. Input is trusted: offsets were range-checked when the overlay was built,
/// so nothing is clamped here.
pub fn resolve(value: Offset, canvas_extent: i64, content_extent: i64, align: AxisAlign) -> i64 {
    let value = value.to_pixels(canvas_extent);
    match align {
        AxisAlign::End => canvas_extent - content_extent - value,
        AxisAlign::Center => canvas_extent / 2 - content_extent / 2 + value,
        AxisAlign::Start => value,
    }
}

/// Anchor of a `content` box on `canvas`.
///
/// Overlays without a position are stamped at the origin.
pub fn resolve_anchor(position: Option<&Position>, canvas: Canvas, content: Extent) -> Anchor {
    let Some(p) = position else {
        return Anchor::ORIGIN;
    };
    let canvas = canvas.extent();
    Anchor::new(
        resolve(
            p.horizontal_offset,
            canvas.width,
            content.width,
            p.horizontal_align.into(),
        ),
        resolve(
            p.vertical_offset,
            canvas.height,
            content.height,
            p.vertical_align.into(),
        ),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
