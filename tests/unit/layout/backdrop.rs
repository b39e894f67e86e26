use super::*;

fn fixed(w: i64, h: i64, align: BackAlign) -> BackdropSpec {
    BackdropSpec {
        fixed_box: Some(Extent::new(w, h)),
        align,
        ..BackdropSpec::default()
    }
}

#[test]
fn sized_to_content_with_padding() {
    let back = BackdropSpec {
        padding: 10,
        ..BackdropSpec::default()
    };
    let r = backdrop_rect(Anchor::new(100, 200), Extent::new(120, 30), &back);
    assert_eq!(
        r,
        BackdropRect {
            x0: 90,
            y0: 190,
            x1: 230,
            y1: 240
        }
    );
    assert_eq!(r.width(), 140);
    assert_eq!(r.height(), 50);
}

#[test]
fn fixed_box_overrides_content_extent() {
    let back = BackdropSpec {
        padding: 5,
        ..fixed(200, 100, BackAlign::Center)
    };
    let r = backdrop_rect(Anchor::new(0, 0), Extent::new(10, 10), &back);
    assert_eq!(r.to_rect(), Rect::new(-5.0, -5.0, 205.0, 105.0));
}

#[test]
fn center_align_ignores_content_size_for_the_box() {
    let start = Anchor::new(100, 100);
    for content in [Extent::new(20, 10), Extent::new(150, 90), Extent::new(200, 100)] {
        let at = place_in_box(start, Extent::new(200, 100), BackAlign::Center, content, content);
        assert_eq!(at.x + content.width / 2, 200);
        assert_eq!(at.y + content.height / 2, 150);
    }
}

#[test]
fn pinned_alignments() {
    let start = Anchor::new(10, 20);
    let b = Extent::new(200, 100);
    let content = Extent::new(80, 40);
    assert_eq!(
        place_in_box(start, b, BackAlign::Left, content, content),
        Anchor::new(10, 50)
    );
    assert_eq!(
        place_in_box(start, b, BackAlign::Right, content, content),
        Anchor::new(130, 20)
    );
    assert_eq!(
        place_in_box(start, b, BackAlign::Top, content, content),
        Anchor::new(70, 20)
    );
    assert_eq!(
        place_in_box(start, b, BackAlign::Bottom, content, content),
        Anchor::new(10, 80)
    );
}

#[test]
fn far_edge_uses_primary_extent() {
    let start = Anchor::new(0, 0);
    let b = Extent::new(300, 100);
    let combined = Extent::new(170, 40);
    let text = Extent::new(120, 30);
    assert_eq!(
        place_in_box(start, b, BackAlign::Right, combined, text),
        Anchor::new(180, 0)
    );
    assert_eq!(
        place_in_box(start, b, BackAlign::Bottom, combined, text),
        Anchor::new(0, 70)
    );
}

#[test]
fn oversized_content_centers_with_floor() {
    let at = place_in_box(
        Anchor::new(0, 0),
        Extent::new(10, 10),
        BackAlign::Center,
        Extent::new(13, 13),
        Extent::new(13, 13),
    );
    assert_eq!(at, Anchor::new(-2, -2));
}
