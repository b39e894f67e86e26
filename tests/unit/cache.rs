use super::*;
use crate::foundation::core::Extent;

fn source(file_size: u64) -> ImageSource {
    ImageSource {
        path: "overlays/4K.png".into(),
        size: Extent::new(100, 50),
        file_size,
    }
}

#[test]
fn staleness_rule() {
    assert!(is_stale(None, 10));
    assert!(is_stale(Some("9"), 10));
    assert!(!is_stale(Some("10"), 10));
}

#[test]
fn refresh_records_size_and_reports_changes() {
    let mut map = MemoryImageMap::new();
    let table = "movies_overlays";

    assert!(refresh_source(&mut map, "4K", table, "4K", &source(1200)));
    assert_eq!(map.query("4K", table), Some("1200".to_string()));

    assert!(!refresh_source(&mut map, "4K", table, "4K", &source(1200)));
    assert!(refresh_source(&mut map, "4K", table, "4K", &source(1300)));

    assert_eq!(map.query("4K", "shows_overlays"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn update_keeps_the_recorded_name() {
    let mut map = MemoryImageMap::new();
    map.update("Rating (1)", "t", "text(user_rating)", "77");
    let entry = map.get("Rating (1)", "t").unwrap();
    assert_eq!(entry.name, "text(user_rating)");
    assert_eq!(entry.value, "77");
}
