use crate::core::{ThemeCache, ThemeRecord};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Theme records keyed by name.
#[derive(Debug, Default)]
pub struct InMemoryThemeCache {
    records: RwLock<HashMap<String, ThemeRecord>>,
}

impl InMemoryThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_themes(themes: Vec<ThemeRecord>) -> Self {
        let cache = Self::new();
        for theme in themes {
            cache.insert(theme);
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active(&self) -> Option<ThemeRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|theme| theme.active)
            .cloned()
    }
}

impl ThemeCache for InMemoryThemeCache {
    /// Inserting an active theme deactivates the others.
    fn insert(&self, theme: ThemeRecord) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if theme.active {
            for other in records.values_mut() {
                other.active = false;
            }
        }
        records.insert(theme.name.clone(), theme);
    }

    fn peek(&self, name: &str) -> Option<ThemeRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn evict(&self, name: &str) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }
}
