use crate::{
    foundation::core::{Anchor, Extent, Rect},
    overlay::spec::{BackAlign, BackdropSpec},
};

/// Pixel rectangle a backdrop is drawn into, corners inclusive of padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BackdropRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl BackdropRect {
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.x0 as f64,
            self.y0 as f64,
            self.x1 as f64,
            self.y1 as f64,
        )
    }

    pub fn width(self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(self) -> i64 {
        self.y1 - self.y0
    }
}

/// Box the backdrop covers before padding: the fixed box when set, else the content itself.
pub fn box_extent(backdrop: &BackdropSpec, content: Extent) -> Extent {
    backdrop.fixed_box.unwrap_or(content)
}

/// Backdrop rectangle for content anchored at `anchor`, grown by the padding on every side.
pub fn backdrop_rect(anchor: Anchor, content: Extent, backdrop: &BackdropSpec) -> BackdropRect {
    let b = box_extent(backdrop, content);
    let pad = backdrop.padding;
    BackdropRect {
        x0: anchor.x - pad,
        y0: anchor.y - pad,
        x1: anchor.x + b.width + pad,
        y1: anchor.y + b.height + pad,
    }
}

/// Position of content inside a fixed backdrop box anchored at `start`.
///
/// `content` is the full content extent (text and addon together); `primary` is the element the
/// far-edge alignments measure from (the text for text overlays, the image otherwise). Centering
/// halves round toward negative infinity.
pub fn place_in_box(
    start: Anchor,
    fixed_box: Extent,
    align: BackAlign,
    content: Extent,
    primary: Extent,
) -> Anchor {
    let center_x = start.x + (fixed_box.width - content.width).div_euclid(2);
    let center_y = start.y + (fixed_box.height - content.height).div_euclid(2);
    match align {
        BackAlign::Left => Anchor::new(start.x, center_y),
        BackAlign::Right => Anchor::new(start.x + fixed_box.width - primary.width, start.y),
        BackAlign::Top => Anchor::new(center_x, start.y),
        BackAlign::Bottom => Anchor::new(start.x, start.y + fixed_box.height - primary.height),
        BackAlign::Center => Anchor::new(center_x, center_y),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/backdrop.rs"]
mod tests;
