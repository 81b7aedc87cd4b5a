// ── Store registry ──
//
// Owned by the application shell. Hands out scoped stores and guarantees
// that a slice name is mounted at most once.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::ScopedStore;
use crate::error::CoreError;
use crate::reducer::Reducer;

/// The set of mounted slice stores.
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: DashMap<String, ScopedStore>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a store under `name`. Fails if the name is taken.
    pub fn create(
        &self,
        name: impl Into<String>,
        reducer: impl Reducer + 'static,
    ) -> Result<ScopedStore, CoreError> {
        let name = name.into();
        match self.stores.entry(name) {
            Entry::Occupied(entry) => Err(CoreError::DuplicateSlice {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let store = ScopedStore::new(entry.key().clone(), reducer);
                debug!(slice = %entry.key(), "mounted store");
                entry.insert(store.clone());
                Ok(store)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ScopedStore> {
        self.stores.get(name).map(|s| s.value().clone())
    }

    /// Unmount `name`. Outstanding handles keep working but are no longer
    /// reachable through the registry.
    pub fn remove(&self, name: &str) -> Option<ScopedStore> {
        self.stores.remove(name).map(|(_, store)| store)
    }

    /// Mounted slice names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.stores.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reducer::TableReducer;

    #[test]
    fn duplicate_slices_are_refused() {
        let registry = StoreRegistry::new();
        registry.create("metric", TableReducer).unwrap();
        let err = registry.create("metric", TableReducer).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSlice { name } if name == "metric"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookups_return_the_mounted_handle() {
        let registry = StoreRegistry::new();
        let store = registry.create("munin", TableReducer).unwrap();
        store.dispatch(&crate::reducer::Action::ToggleAll);
        assert!(registry.get("munin").unwrap().state().collapsed);
        assert!(registry.get("connection").is_none());
    }

    #[test]
    fn removed_names_can_be_remounted() {
        let registry = StoreRegistry::new();
        registry.create("project", TableReducer).unwrap();
        registry.create("connection", TableReducer).unwrap();
        assert_eq!(registry.names(), ["connection", "project"]);

        registry.remove("project").unwrap();
        assert!(registry.create("project", TableReducer).is_ok());
    }
}
