use std::io::Cursor;

use super::*;
use crate::{
    cache::MemoryImageMap,
    config::model::{OverlayAttrs, RawOffset},
    foundation::core::{Canvas, Extent},
    layout::backdrop::BackdropRect,
    overlay::spec::{BackdropSpec, FontSpec, HorizontalAlign, Offset, VerticalAlign},
};

/// Measures every string as the same box and records draw calls.
struct FixedMetrics {
    text: Extent,
    canvas: Option<Canvas>,
    calls: Vec<String>,
}

impl FixedMetrics {
    fn new(width: i64, height: i64) -> Self {
        Self {
            text: Extent::new(width, height),
            canvas: None,
            calls: Vec::new(),
        }
    }
}

impl TextMeasure for FixedMetrics {
    fn prepare_font(&mut self, _overlay: &str, font: &FontSpec) -> OverlayResult<()> {
        self.calls.push(format!("font {}", font.size));
        Ok(())
    }

    fn measure(&mut self, _overlay: &str, _text: &str, _font: &FontSpec) -> OverlayResult<Extent> {
        Ok(self.text)
    }
}

impl DrawBackend for FixedMetrics {
    fn begin(&mut self, canvas: Canvas) -> OverlayResult<()> {
        self.canvas = Some(canvas);
        Ok(())
    }

    fn fill_backdrop(&mut self, rect: BackdropRect, _style: &BackdropSpec) -> OverlayResult<()> {
        self.calls.push(format!("backdrop {}x{}", rect.width(), rect.height()));
        Ok(())
    }

    fn draw_text(
        &mut self,
        _overlay: &str,
        anchor: Anchor,
        text: &str,
        _font: &FontSpec,
    ) -> OverlayResult<()> {
        self.calls.push(format!("text {text} at {anchor}"));
        Ok(())
    }

    fn finish(&mut self) -> OverlayResult<OverlayLayer> {
        let canvas = self.canvas.take().unwrap_or(Canvas {
            width: 1,
            height: 1,
        });
        Ok(OverlayLayer::transparent(canvas))
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    engine: OverlayEngine<FixedMetrics>,
    registry: NameRegistry,
    images: MemoryImageMap,
}

fn write_png(path: &std::path::Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let opts = BuildOptions::with_root(dir.path());
    std::fs::create_dir_all(opts.default_font.parent().unwrap()).unwrap();
    std::fs::write(&opts.default_font, b"font").unwrap();
    std::fs::create_dir_all(&opts.overlay_folder).unwrap();
    write_png(&opts.overlay_folder.join("4K.png"), 100, 50);
    write_png(&dir.path().join("imdb.png"), 40, 40);
    Fixture {
        engine: OverlayEngine::new(FixedMetrics::new(120, 30), opts).with_table("movies_overlays"),
        dir,
        registry: NameRegistry::new(),
        images: MemoryImageMap::new(),
    }
}

impl Fixture {
    fn build(&mut self, mapping: &str, attrs: OverlayAttrs) -> OverlayResult<Overlay> {
        self.engine.build(
            mapping,
            &OverlayEntry::Attrs(Box::new(attrs)),
            &mut self.registry,
            &mut self.images,
        )
    }
}

fn at(h: &str, x: i64, v: &str, y: i64) -> OverlayAttrs {
    OverlayAttrs {
        horizontal_align: Some(h.to_string()),
        horizontal_offset: Some(RawOffset::Int(x)),
        vertical_align: Some(v.to_string()),
        vertical_offset: Some(RawOffset::Int(y)),
        ..OverlayAttrs::default()
    }
}

#[test]
fn positioned_image_is_laid_out_on_both_templates() {
    let mut fx = fixture();
    let overlay = fx
        .build(
            "4K",
            OverlayAttrs {
                name: Some("4K".to_string()),
                ..at("right", 20, "bottom", 20)
            },
        )
        .unwrap();

    let portrait = overlay.result(CanvasTemplate::Portrait).unwrap();
    let landscape = overlay.result(CanvasTemplate::Landscape).unwrap();
    assert_eq!(portrait.anchor, Anchor::new(880, 1430));
    assert_eq!(landscape.anchor, Anchor::new(1800, 1010));
    assert!(landscape.layer.is_none());
    assert!(overlay.updated);
}

#[test]
fn unpositioned_image_is_not_laid_out() {
    let mut fx = fixture();
    let overlay = fx.build("4K", OverlayAttrs::named("4K")).unwrap();
    assert!(overlay.portrait.is_none());
    let placed = fx.engine.layout(&overlay, CanvasTemplate::Portrait).unwrap();
    assert_eq!(placed.map(|r| r.anchor), Some(Anchor::ORIGIN));
}

#[test]
fn staleness_follows_recorded_file_size() {
    let mut fx = fixture();
    assert!(fx.build("4K", OverlayAttrs::named("4K")).unwrap().updated);

    // A new run over the same cache: same mapping name, unchanged file.
    fx.registry = NameRegistry::new();
    assert!(!fx.build("4K", OverlayAttrs::named("4K")).unwrap().updated);

    let busier = image::RgbaImage::from_fn(120, 60, |x, y| {
        image::Rgba([x as u8, y as u8, (x * y) as u8, 255])
    });
    busier
        .save(fx.engine.options().overlay_folder.join("4K.png"))
        .unwrap();
    fx.registry = NameRegistry::new();
    let overlay = fx.build("4K", OverlayAttrs::named("4K")).unwrap();
    assert!(overlay.updated);
    assert_eq!(
        fx.images.get("4K", "movies_overlays").map(|e| e.name.as_str()),
        Some("4K")
    );
}

#[test]
fn duplicate_mapping_names_get_suffixes() {
    let mut fx = fixture();
    let a = fx.build("4K", OverlayAttrs::named("4K")).unwrap();
    let b = fx.build("4K", OverlayAttrs::named("4K")).unwrap();
    assert_eq!(a.mapping_name, "4K");
    assert_eq!(b.mapping_name, "4K (1)");
}

#[test]
fn literal_text_with_backdrop_draws_a_layer() {
    let mut fx = fixture();
    let overlay = fx
        .build(
            "HDR",
            OverlayAttrs {
                name: Some("text(HDR)".to_string()),
                back_color: Some("#00000099".to_string()),
                back_padding: Some(10),
                ..at("left", 30, "top", 30)
            },
        )
        .unwrap();
    assert!(!overlay.updated);
    let result = overlay.result(CanvasTemplate::Portrait).unwrap();
    assert_eq!(result.anchor, Anchor::new(30, 30));
    assert!(result.layer.is_some());
    assert_eq!(
        fx.engine.backend_mut().calls,
        vec![
            "font 36",
            "backdrop 140x50",
            "text HDR at (30, 30)",
            "backdrop 140x50",
            "text HDR at (30, 30)"
        ]
    );
}

#[test]
fn addon_text_reports_split_anchors() {
    let mut fx = fixture();
    let overlay = fx
        .build(
            "IMDb",
            OverlayAttrs {
                name: Some("text(8.9)".to_string()),
                file: Some("imdb.png".to_string()),
                addon_offset: Some(10),
                ..at("left", 500, "top", 500)
            },
        )
        .unwrap();
    assert!(overlay.updated);
    let result = overlay.result(CanvasTemplate::Landscape).unwrap();
    assert_eq!(result.anchor, Anchor::new(500, 500));
    assert_eq!(result.addon_anchor, Some(Anchor::new(500, 500)));
    assert_eq!(result.text_anchor, Some(Anchor::new(550, 505)));
    assert_eq!(
        fx.images.get("IMDb", "movies_overlays").map(|e| e.name.as_str()),
        Some("text(8.9)")
    );
}

#[test]
fn rating_text_is_deferred_until_a_value_arrives() {
    let mut fx = fixture();
    let overlay = fx
        .build(
            "Rating",
            OverlayAttrs {
                name: Some("text(user_rating%)".to_string()),
                ..at("center", 0, "bottom", 40)
            },
        )
        .unwrap();
    assert!(overlay.is_deferred());
    assert!(overlay.portrait.is_none());
    assert!(
        fx.engine
            .layout(&overlay, CanvasTemplate::Portrait)
            .unwrap()
            .is_none()
    );

    let result = fx
        .engine
        .layout_rating(&overlay, CanvasTemplate::Portrait, 8.9)
        .unwrap()
        .unwrap();
    assert_eq!(result.plan.text.map(|t| t.text), Some("89%".to_string()));
    assert_eq!(result.anchor, Anchor::new(440, 1430));
}

#[test]
fn queued_overlay_takes_handed_out_position() {
    let mut fx = fixture();
    let overlay = fx
        .build(
            "Rating",
            OverlayAttrs {
                name: Some("text(critic_rating)".to_string()),
                queue: Some("right_side".to_string()),
                weight: Some(20),
                ..OverlayAttrs::default()
            },
        )
        .unwrap();
    let slot = Position {
        horizontal_align: HorizontalAlign::Right,
        horizontal_offset: Offset::Absolute(15),
        vertical_align: VerticalAlign::Top,
        vertical_offset: Offset::Percent(10.0),
    };
    let result = fx
        .engine
        .layout_at(&overlay, CanvasTemplate::Landscape, &slot, Some(7.0))
        .unwrap()
        .unwrap();
    assert_eq!(result.anchor, Anchor::new(1785, 108));
    assert_eq!(result.plan.text.map(|t| t.text), Some("7.0".to_string()));
}

#[test]
fn blur_has_no_layout() {
    let mut fx = fixture();
    let overlay = fx.build("Blur", OverlayAttrs::named("blur(20)")).unwrap();
    assert!(overlay.portrait.is_none() && overlay.landscape.is_none());
    assert!(
        fx.engine
            .layout(&overlay, CanvasTemplate::Portrait)
            .unwrap()
            .is_none()
    );
}

#[test]
fn batch_load_collects_failures() {
    let mut fx = fixture();
    let file = OverlayFile::from_yaml_str(
        r#"
overlays:
  4K:
    overlay: 4K
  Broken:
    overlay:
      name: 4K
      back_align: left
  Missing:
    overlay: HDR
  Blur:
    overlay:
      name: blur(5)
"#,
    )
    .unwrap();
    let report = fx
        .engine
        .load_file(&file, &mut fx.registry, &mut fx.images);
    let built: Vec<&str> = report
        .overlays
        .iter()
        .map(|o| o.mapping_name.as_str())
        .collect();
    assert_eq!(built, vec!["4K", "Blur"]);

    let failed: Vec<&str> = report.errors.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(failed, vec!["Broken", "Missing"]);
    assert!(matches!(
        report.errors[0].1,
        OverlayError::Configuration { .. }
    ));
    assert!(matches!(report.errors[1].1, OverlayError::Resource { .. }));
    assert!(fx.dir.path().exists());
}
