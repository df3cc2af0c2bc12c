//! The favorites set, persisted as a JSON array of mission ids.
//!
//! Ids are kept in insertion order. The set is never reconciled against the
//! catalog: after the source data changes it may name missions that no
//! longer exist, and those ids still count toward [`Favorites::len`].

use tracing::{debug, info, warn};

use crate::mission::MissionId;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized favorites.
pub const FAVORITES_KEY: &str = "missionFavorites";

/// User-curated mission ids backed by a [`KeyValueStore`].
pub struct Favorites {
    ids: Vec<MissionId>,
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl Favorites {
    /// Load the set stored under `key`.
    ///
    /// A missing entry is an empty set. A malformed entry is logged and
    /// treated as empty; it is overwritten on the next change.
    pub fn load(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let ids = match store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<MissionId>>(&raw) {
                Ok(mut ids) => {
                    dedup_in_order(&mut ids);
                    ids
                }
                Err(e) => {
                    warn!("Ignoring malformed favorites under {key}: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {e}");
                Vec::new()
            }
        };
        debug!("Loaded {} favorites", ids.len());
        Self { ids, store, key }
    }

    /// Favorite ids in the order they were added.
    pub fn ids(&self) -> &[MissionId] {
        &self.ids
    }

    pub fn contains(&self, id: MissionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The backing store, for inspection.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Add the id if absent, remove it if present, then persist.
    ///
    /// Returns whether the id is a favorite afterwards. The in-memory set
    /// only changes once the write succeeds.
    pub fn toggle(&mut self, id: MissionId) -> Result<bool, String> {
        let mut ids = self.ids.clone();
        let now_favorite = match ids.iter().position(|&f| f == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };
        self.commit(ids)?;
        info!(mission_id = id, favorite = now_favorite, "Toggled favorite");
        Ok(now_favorite)
    }

    /// Remove the id if present. Persists only when the set changed.
    pub fn remove(&mut self, id: MissionId) -> Result<bool, String> {
        let Some(index) = self.ids.iter().position(|&f| f == id) else {
            return Ok(false);
        };
        let mut ids = self.ids.clone();
        ids.remove(index);
        self.commit(ids)?;
        info!(mission_id = id, "Removed favorite");
        Ok(true)
    }

    /// Write `ids` to the store, then adopt them.
    fn commit(&mut self, ids: Vec<MissionId>) -> Result<(), String> {
        let json = serde_json::to_string(&ids)
            .map_err(|e| format!("Failed to serialize favorites: {e}"))?;
        self.store
            .set(&self.key, &json)
            .map_err(|e| format!("Failed to write favorites: {e}"))?;
        self.ids = ids;
        Ok(())
    }
}

fn dedup_in_order(ids: &mut Vec<MissionId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn stored(favs: &Favorites) -> Option<String> {
        favs.store().get(FAVORITES_KEY).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes_and_persists() {
        let mut favs = Favorites::load(Box::new(MemoryStore::new()), FAVORITES_KEY);
        assert!(favs.is_empty());

        assert!(favs.toggle(1).unwrap());
        assert_eq!(favs.ids(), &[1]);
        assert_eq!(stored(&favs).as_deref(), Some("[1]"));

        assert!(!favs.toggle(1).unwrap());
        assert!(favs.ids().is_empty());
        assert_eq!(stored(&favs).as_deref(), Some("[]"));
    }

    #[test]
    fn double_toggle_restores_original_set() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "[4,2,9]").unwrap();
        let mut favs = Favorites::load(Box::new(store), FAVORITES_KEY);

        for id in [2, 5] {
            let before = favs.ids().to_vec();
            favs.toggle(id).unwrap();
            favs.toggle(id).unwrap();
            let mut after = favs.ids().to_vec();
            let mut expected = before.clone();
            after.sort_unstable();
            expected.sort_unstable();
            assert_eq!(after, expected);
        }
    }

    #[test]
    fn malformed_entry_loads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{oops").unwrap();
        let favs = Favorites::load(Box::new(store), FAVORITES_KEY);
        assert!(favs.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse_on_load() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "[3,1,3]").unwrap();
        let favs = Favorites::load(Box::new(store), FAVORITES_KEY);
        assert_eq!(favs.ids(), &[3, 1]);
    }

    #[test]
    fn remove_only_persists_on_change() {
        let mut favs = Favorites::load(Box::new(MemoryStore::new()), FAVORITES_KEY);
        assert!(!favs.remove(8).unwrap());
        assert_eq!(stored(&favs), None);

        favs.toggle(8).unwrap();
        assert!(favs.remove(8).unwrap());
        assert_eq!(stored(&favs).as_deref(), Some("[]"));
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, String> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), String> {
            Err("disk full".into())
        }
    }

    #[test]
    fn failed_write_leaves_set_unchanged() {
        let mut inner = MemoryStore::new();
        inner.set(FAVORITES_KEY, "[2]").unwrap();
        let mut favs = Favorites::load(Box::new(ReadOnlyStore(inner)), FAVORITES_KEY);

        let err = favs.toggle(1).unwrap_err();
        assert!(err.contains("disk full"));
        assert_eq!(favs.ids(), &[2]);

        assert!(favs.toggle(2).is_err());
        assert!(favs.remove(2).is_err());
        assert_eq!(favs.ids(), &[2]);
        assert_eq!(stored(&favs).as_deref(), Some("[2]"));
    }

    #[test]
    fn dangling_ids_are_kept() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "[999]").unwrap();
        let favs = Favorites::load(Box::new(store), FAVORITES_KEY);
        assert!(favs.contains(999));
        assert_eq!(favs.len(), 1);
    }
}
