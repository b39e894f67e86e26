use crate::{
    foundation::core::{Anchor, Extent},
    overlay::spec::{AddonPosition, BackAlign},
};

/// Final positions of the two elements of a text + addon overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompositeAnchors {
    pub addon: Anchor,
    pub text: Anchor,
}

/// Inputs of the split, all resolved beforehand.
#[derive(Clone, Copy, Debug)]
pub struct CompositeInput {
    /// Anchor of the whole box as resolved on the canvas.
    pub start: Anchor,
    /// Content position after placement inside the backdrop box.
    pub content: Anchor,
    /// Box the content was placed into: the fixed backdrop box, or the combined extent.
    pub box_extent: Extent,
    pub text: Extent,
    pub addon: Extent,
    pub offset: i64,
    pub position: AddonPosition,
    pub back_align: BackAlign,
}

/// Combined extent of text and addon placed side by side (left/right) or stacked (top/bottom).
pub fn composite_extent(
    text: Extent,
    addon: Extent,
    offset: i64,
    position: AddonPosition,
) -> Extent {
    match position {
        AddonPosition::Left | AddonPosition::Right => Extent::new(
            text.width + addon.width + offset,
            text.height.max(addon.height),
        ),
        AddonPosition::Top | AddonPosition::Bottom => Extent::new(
            text.width.max(addon.width),
            text.height + addon.height + offset,
        ),
    }
}

/// Reject addon/backdrop alignments that pin different axes.
///
/// An addon beside the text only combines with a backdrop pinned left/right (or centered), and
/// an addon above/below only with one pinned top/bottom.
pub fn check_supported(position: AddonPosition, back_align: BackAlign) -> Result<(), String> {
    match back_align.axis() {
        Some(axis) if axis != position.axis() => Err(format!(
            "addon_position {} cannot be combined with back_align {}",
            position.as_str(),
            back_align.as_str()
        )),
        _ => Ok(()),
    }
}

/// Split the content position into addon and text anchors.
///
/// Along the addon's axis the two elements sit `offset` apart, unless the backdrop is pinned on
/// that axis, in which case positions are measured from the box edge. Across it the smaller
/// element is centered against the larger; fractional halves are truncated toward zero.
pub fn split(input: &CompositeInput) -> CompositeAnchors {
    let sx = input.start.x as f64;
    let sy = input.start.y as f64;
    let bw = input.box_extent.width as f64;
    let bh = input.box_extent.height as f64;
    let (tw, th) = (input.text.width as f64, input.text.height as f64);
    let (aw, ah) = (input.addon.width as f64, input.addon.height as f64);
    let off = input.offset as f64;

    let (mut tx, mut ty) = (input.content.x as f64, input.content.y as f64);
    let (mut ax, mut ay) = (tx, ty);

    match (input.position, input.back_align) {
        (AddonPosition::Left, BackAlign::Left) => tx = sx + off,
        (AddonPosition::Left, BackAlign::Right) => ax = sx + bw - off,
        (AddonPosition::Left, _) => tx = ax + aw + off,
        (AddonPosition::Right, BackAlign::Left) => ax = sx + off,
        (AddonPosition::Right, BackAlign::Right) => {
            ax = sx + bw - aw;
            tx = sx + bw - off;
        }
        (AddonPosition::Right, _) => ax = tx + tw + off,
        (AddonPosition::Top | AddonPosition::Bottom, _) => {
            center_cross(&mut tx, &mut ax, tw, aw);
        }
    }

    match (input.position, input.back_align) {
        (AddonPosition::Top, BackAlign::Top) => ty = sy + off,
        (AddonPosition::Top, BackAlign::Bottom) => ay = sy + bh - off,
        (AddonPosition::Top, _) => ty = ay + ah + off,
        (AddonPosition::Bottom, BackAlign::Top) => ay = sy + off,
        (AddonPosition::Bottom, BackAlign::Bottom) => {
            ay = sy + bh - ah;
            ty = sy + bh - off;
        }
        (AddonPosition::Bottom, _) => ay = ty + th + off,
        (AddonPosition::Left | AddonPosition::Right, _) => {
            center_cross(&mut ty, &mut ay, th, ah);
        }
    }

    CompositeAnchors {
        addon: Anchor::new(ax as i64, ay as i64),
        text: Anchor::new(tx as i64, ty as i64),
    }
}

fn center_cross(text_pos: &mut f64, addon_pos: &mut f64, text_len: f64, addon_len: f64) {
    if text_len < addon_len {
        *text_pos += (addon_len - text_len) / 2.0;
    } else if text_len > addon_len {
        *addon_pos += (text_len - addon_len) / 2.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/composite.rs"]
mod tests;
