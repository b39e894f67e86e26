use super::*;
use crate::{
    foundation::core::{CanvasTemplate, Rgba8},
    overlay::spec::{
        BackAlign, BackdropSpec, FontSpec, HorizontalAlign, Offset, OverlayKind, Stacking,
        TextContent, VerticalAlign,
    },
};

fn at(h: HorizontalAlign, x: i64, v: VerticalAlign, y: i64) -> Position {
    Position {
        horizontal_align: h,
        horizontal_offset: Offset::Absolute(x),
        vertical_align: v,
        vertical_offset: Offset::Absolute(y),
    }
}

fn text_spec(position: Option<Position>, backdrop: BackdropSpec) -> OverlaySpec {
    OverlaySpec {
        name: "text(4K)".to_string(),
        kind: OverlayKind::Text {
            content: TextContent::Literal("4K".to_string()),
            font: FontSpec {
                path: "fonts/Roboto-Medium.ttf".into(),
                size: FontSpec::DEFAULT_SIZE,
                style: None,
                color: None,
            },
            addon: None,
        },
        position,
        backdrop,
        stacking: Stacking::None,
    }
}

fn text(width: i64, height: i64) -> LayoutContent {
    LayoutContent::Text {
        text: "4K".to_string(),
        extent: Extent::new(width, height),
        addon: None,
    }
}

fn landscape() -> Canvas {
    CanvasTemplate::Landscape.canvas()
}

#[test]
fn image_in_bottom_right_corner_needs_no_layer() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Right, 20, VerticalAlign::Bottom, 20)),
        BackdropSpec::default(),
    );
    let plan = plan_layout(
        &spec,
        landscape(),
        &LayoutContent::Image(Extent::new(100, 50)),
        None,
    );
    assert_eq!(plan.anchor, Anchor::new(1800, 1010));
    assert!(plan.backdrop.is_none());
    assert!(plan.text.is_none());
    assert!(!plan.needs_layer());
}

#[test]
fn padded_backdrop_surrounds_text() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Left, 100, VerticalAlign::Top, 200)),
        BackdropSpec {
            color: Some(Rgba8::new(0, 0, 0, 153)),
            padding: 10,
            ..BackdropSpec::default()
        },
    );
    let plan = plan_layout(&spec, landscape(), &text(120, 30), None);
    assert_eq!(
        plan.backdrop,
        Some(BackdropRect {
            x0: 90,
            y0: 190,
            x1: 230,
            y1: 240
        })
    );
    let placed = plan.text.as_ref().map(|t| t.anchor);
    assert_eq!(placed, Some(Anchor::new(100, 200)));
    assert!(plan.needs_layer());
}

#[test]
fn undrawn_backdrop_still_sizes_the_box() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Right, 0, VerticalAlign::Bottom, 0)),
        BackdropSpec {
            fixed_box: Some(Extent::new(300, 100)),
            ..BackdropSpec::default()
        },
    );
    let plan = plan_layout(&spec, landscape(), &text(120, 30), None);
    assert!(plan.backdrop.is_none());
    assert_eq!(plan.start, Anchor::new(1620, 980));
    assert_eq!(plan.anchor, Anchor::new(1710, 1015));
}

#[test]
fn bare_image_stays_at_box_start_without_backdrop() {
    let undrawn = BackdropSpec {
        fixed_box: Some(Extent::new(300, 100)),
        ..BackdropSpec::default()
    };
    let image = LayoutContent::Image(Extent::new(100, 50));

    let spec = text_spec(
        Some(at(HorizontalAlign::Left, 0, VerticalAlign::Top, 0)),
        undrawn.clone(),
    );
    let plan = plan_layout(&spec, landscape(), &image, None);
    assert_eq!(plan.anchor, Anchor::ORIGIN);
    assert!(!plan.needs_layer());

    let spec = text_spec(
        Some(at(HorizontalAlign::Right, 0, VerticalAlign::Bottom, 0)),
        undrawn,
    );
    let plan = plan_layout(&spec, landscape(), &image, None);
    assert_eq!(plan.start, Anchor::new(1620, 980));
    assert_eq!(plan.anchor, Anchor::new(1620, 980));
}

#[test]
fn drawn_backdrop_centers_image_in_fixed_box() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Left, 0, VerticalAlign::Top, 0)),
        BackdropSpec {
            color: Some(Rgba8::new(0, 0, 0, 255)),
            fixed_box: Some(Extent::new(300, 100)),
            ..BackdropSpec::default()
        },
    );
    let plan = plan_layout(
        &spec,
        landscape(),
        &LayoutContent::Image(Extent::new(100, 50)),
        None,
    );
    assert_eq!(plan.anchor, Anchor::new(100, 25));
}

#[test]
fn text_centered_in_fixed_box() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Left, 0, VerticalAlign::Top, 0)),
        BackdropSpec {
            color: Some(Rgba8::new(0, 0, 0, 255)),
            fixed_box: Some(Extent::new(300, 100)),
            align: BackAlign::Center,
            ..BackdropSpec::default()
        },
    );
    let plan = plan_layout(&spec, landscape(), &text(120, 30), None);
    assert_eq!(plan.anchor, Anchor::new(90, 35));
    assert_eq!(plan.backdrop.map(BackdropRect::width), Some(300));
    assert_eq!(plan.backdrop.map(BackdropRect::height), Some(100));
}

#[test]
fn addon_splits_into_two_anchors() {
    let spec = text_spec(
        Some(at(HorizontalAlign::Left, 500, VerticalAlign::Top, 500)),
        BackdropSpec::default(),
    );
    let content = LayoutContent::Text {
        text: "8.9".to_string(),
        extent: Extent::new(120, 30),
        addon: Some(AddonContent {
            extent: Extent::new(40, 40),
            offset: 10,
            position: AddonPosition::Left,
        }),
    };
    assert_eq!(content.extent(), Extent::new(170, 40));

    let plan = plan_layout(&spec, landscape(), &content, None);
    assert_eq!(plan.anchor, Anchor::new(500, 500));
    assert_eq!(plan.addon, Some(Anchor::new(500, 500)));
    assert_eq!(
        plan.text.map(|t| (t.text, t.anchor)),
        Some(("8.9".to_string(), Anchor::new(550, 505)))
    );
}

#[test]
fn override_position_wins() {
    let spec = text_spec(None, BackdropSpec::default());
    let queued = at(HorizontalAlign::Center, 0, VerticalAlign::Center, 0);
    let plan = plan_layout(&spec, landscape(), &text(100, 40), Some(&queued));
    assert_eq!(plan.anchor, Anchor::new(910, 520));
}

#[test]
fn missing_position_stamps_at_origin() {
    let spec = text_spec(None, BackdropSpec::default());
    let plan = plan_layout(
        &spec,
        CanvasTemplate::Portrait.canvas(),
        &text(100, 40),
        None,
    );
    assert_eq!(plan.anchor, Anchor::ORIGIN);
}
