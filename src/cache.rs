use std::collections::BTreeMap;

use crate::overlay::spec::ImageSource;

/// Persistent store of "last seen" values for overlay source images, keyed by mapping name and
/// table.
pub trait ImageMap {
    fn query(&self, mapping_name: &str, table: &str) -> Option<String>;

    fn update(&mut self, mapping_name: &str, table: &str, name: &str, value: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageMapEntry {
    pub name: String,
    pub value: String,
}

/// In-memory [`ImageMap`] with deterministic iteration order.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageMap {
    entries: BTreeMap<(String, String), ImageMapEntry>,
}

impl MemoryImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mapping_name: &str, table: &str) -> Option<&ImageMapEntry> {
        self.entries
            .get(&(mapping_name.to_owned(), table.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageMap for MemoryImageMap {
    fn query(&self, mapping_name: &str, table: &str) -> Option<String> {
        self.get(mapping_name, table).map(|e| e.value.clone())
    }

    fn update(&mut self, mapping_name: &str, table: &str, name: &str, value: &str) {
        self.entries.insert(
            (mapping_name.to_owned(), table.to_owned()),
            ImageMapEntry {
                name: name.to_owned(),
                value: value.to_owned(),
            },
        );
    }
}

/// A source is stale when nothing was recorded for it or its byte size changed.
pub fn is_stale(previous: Option<&str>, file_size: u64) -> bool {
    previous.is_none_or(|p| p != file_size.to_string())
}

/// Compare `source` against the stored value, record its current size, and report whether it
/// changed.
pub fn refresh_source(
    map: &mut dyn ImageMap,
    mapping_name: &str,
    table: &str,
    name: &str,
    source: &ImageSource,
) -> bool {
    let previous = map.query(mapping_name, table);
    let updated = is_stale(previous.as_deref(), source.file_size);
    if updated {
        tracing::debug!(
            mapping = mapping_name,
            previous = ?previous,
            size = source.file_size,
            "overlay source changed"
        );
    }
    map.update(mapping_name, table, name, &source.file_size.to_string());
    updated
}

#[cfg(test)]
#[path = "../tests/unit/cache.rs"]
mod tests;
