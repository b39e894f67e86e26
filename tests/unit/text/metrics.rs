use super::*;
use crate::overlay::spec::FontStyle;

const SYSTEM_FONTS: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

fn system_font() -> Option<PathBuf> {
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

fn font(path: PathBuf, size: u32) -> FontSpec {
    FontSpec {
        path,
        size,
        style: None,
        color: None,
    }
}

#[test]
fn measure_is_deterministic_and_grows_with_text() {
    let Some(path) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let f = font(path, 36);

    let short = engine.measure("text(A)", "8.9", &f).unwrap();
    let again = engine.measure("text(A)", "8.9", &f).unwrap();
    let long = engine.measure("text(A)", "8.9 / 10", &f).unwrap();

    assert_eq!(short, again);
    assert!(short.width > 0 && short.height > 0);
    assert!(long.width > short.width);
    assert_eq!(long.height, short.height);
}

#[test]
fn larger_size_measures_larger() {
    let Some(path) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let small = engine
        .measure("text(A)", "4K", &font(path.clone(), 20))
        .unwrap();
    let big = engine.measure("text(A)", "4K", &font(path, 80)).unwrap();
    assert!(big.width > small.width);
    assert!(big.height > small.height);
}

#[test]
fn styled_text_still_shapes() {
    let Some(path) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let styled = FontSpec {
        style: Some(FontStyle::BoldItalic),
        ..font(path, 36)
    };
    let shaped = engine.layout("text(A)", "HDR", &styled).unwrap();
    assert!(shaped.extent.width > 0);
    assert!(!shaped.font_bytes.is_empty());
}

#[test]
fn unreadable_or_invalid_fonts_are_resource_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = TextLayoutEngine::new();

    let missing = font(dir.path().join("missing.ttf"), 36);
    let err = engine.measure("text(A)", "x", &missing).unwrap_err();
    assert!(matches!(err, OverlayError::Resource { .. }));

    let junk = dir.path().join("junk.ttf");
    std::fs::write(&junk, b"definitely not a font").unwrap();
    let err = engine.measure("text(A)", "x", &font(junk.clone(), 36)).unwrap_err();
    assert!(matches!(err, OverlayError::Resource { .. }));
    assert_eq!(err.overlay(), Some("text(A)"));

    let err = engine.prepare_font("text(B)", &font(junk, 36)).unwrap_err();
    assert!(matches!(err, OverlayError::Resource { .. }));
    assert_eq!(err.overlay(), Some("text(B)"));
}

#[test]
fn prepared_font_is_reused_for_measurement() {
    let Some(path) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let spec = font(path, 36);
    engine.prepare_font("text(A)", &spec).unwrap();
    let extent = engine.measure("text(A)", "A", &spec).unwrap();
    assert!(extent.width > 0 && extent.height > 0);
}
