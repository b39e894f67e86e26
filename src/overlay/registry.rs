use std::collections::HashSet;

/// Mapping names handed out during one processing run.
///
/// A requested name is returned unchanged the first time; later collisions get a ` (n)` suffix
/// with the smallest free `n >= 1`.
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, returning the unique mapping name actually assigned.
    pub fn reserve(&mut self, name: &str) -> String {
        if self.used.insert(name.to_owned()) {
            return name.to_owned();
        }

        let mut count = 1usize;
        loop {
            let candidate = format!("{name} ({count})");
            if self.used.insert(candidate.clone()) {
                tracing::debug!(requested = name, assigned = %candidate, "mapping name collision");
                return candidate;
            }
            count += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/registry.rs"]
mod tests;
