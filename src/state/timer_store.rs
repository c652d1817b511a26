//! Ordered timer collection backed by a storage collaborator

use tracing::{debug, info, warn};

use super::timer_record::{StoredTimer, TimerId, TimerRecord};
use crate::services::Storage;

/// In-memory ordered collection of timers.
///
/// Saving always writes the whole collection; callers persist after every
/// mutation since there is no incremental log.
pub struct TimerStore {
    records: Vec<TimerRecord>,
    next_id: u64,
    storage: Box<dyn Storage>,
}

impl TimerStore {
    /// Load the persisted collection and assign fresh ids in order
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let stored = Self::load(&*storage);
        let records: Vec<TimerRecord> = stored
            .into_iter()
            .enumerate()
            .map(|(index, timer)| TimerRecord::restore(TimerId(index as u64 + 1), timer))
            .collect();

        info!("Loaded {} timers", records.len());
        Self {
            next_id: records.len() as u64 + 1,
            records,
            storage,
        }
    }

    /// Read the persisted collection. Missing or corrupt data yields an
    /// empty collection; entries that are not timer objects are skipped.
    pub fn load(storage: &dyn Storage) -> Vec<StoredTimer> {
        let data = match storage.load_collection() {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read timer collection, starting empty: {:#}", e);
                return Vec::new();
            }
        };

        if data.trim().is_empty() {
            return Vec::new();
        }

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored timer collection is corrupt, starting empty: {}", e);
                return Vec::new();
            }
        };

        // One unreadable entry must not cost the rest of the collection
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<StoredTimer>(entry) {
                Ok(timer) => Some(timer),
                Err(e) => {
                    warn!("Skipping unreadable stored timer at position {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Persist the whole collection. Failures are logged, not returned.
    pub fn save(&self) {
        let stored: Vec<StoredTimer> = self.records.iter().map(TimerRecord::to_stored).collect();
        let data = match serde_json::to_string_pretty(&stored) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize timer collection: {}", e);
                return;
            }
        };

        match self.storage.save_collection(&data) {
            Ok(()) => debug!("Persisted {} timers", stored.len()),
            Err(e) => warn!("Failed to persist timer collection: {:#}", e),
        }
    }

    /// Hand out the next unused id
    pub fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, record: TimerRecord) {
        self.records.push(record);
    }

    /// Remove a timer; unknown ids are ignored
    pub fn remove(&mut self, id: TimerId) -> Option<TimerRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut TimerRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[TimerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::MemoryStorage, state::RunState};

    fn store_with(data: &str) -> (TimerStore, MemoryStorage) {
        let storage = MemoryStorage::with_data(data);
        (TimerStore::open(Box::new(storage.clone())), storage)
    }

    #[test]
    fn empty_storage_opens_empty() {
        let store = TimerStore::open(Box::new(MemoryStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        for data in ["{not json", "42", "{\"name\":\"x\"}", "", "   "] {
            let (store, _) = store_with(data);
            assert!(store.is_empty(), "data {data:?} should load empty");
        }
    }

    #[test]
    fn load_accepts_plain_collection() {
        let (store, _) = store_with(
            r#"[{"name":"Tea","initialTime":180,"remainingTime":180},
                {"name":"Eggs","initialTime":420,"remainingTime":100}]"#,
        );

        let names: Vec<&str> = store.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Tea", "Eggs"]);
        assert_eq!(store.records()[1].run_state, RunState::Paused);
        assert_eq!(store.records()[0].id, TimerId(1));
        assert_eq!(store.records()[1].id, TimerId(2));
    }

    #[test]
    fn load_ignores_stale_interval_fields() {
        let (store, _) =
            store_with(r#"[{"name":"Old","initialTime":5,"remainingTime":3,"intervalId":17}]"#);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_clamps_negative_times_and_keeps_neighbours() {
        let (store, storage) = store_with(
            r#"[{"name":"Tea","initialTime":180,"remainingTime":120},
                {"name":"Zero","initialTime":0,"remainingTime":-1}]"#,
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].remaining_time, 120);
        assert_eq!(store.records()[1].remaining_time, 0);
        assert_eq!(store.records()[1].run_state, RunState::Idle);

        store.save();
        let saved: Vec<StoredTimer> = serde_json::from_str(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].name, "Tea");
    }

    #[test]
    fn load_skips_entries_that_are_not_timers() {
        let (store, _) = store_with(
            r#"[null, "junk", {"name":"Tea","initialTime":60,"remainingTime":60}, 12]"#,
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name(), "Tea");
        assert_eq!(store.records()[0].id, TimerId(1));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let (mut store, _) = store_with("[]");
        let first = store.allocate_id();
        store.add(TimerRecord::new(first, None, 10));
        store.remove(first);

        let second = store.allocate_id();
        assert_ne!(first, second);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let (mut store, _) = store_with(r#"[{"name":"Tea","initialTime":1,"remainingTime":1}]"#);
        assert!(store.remove(TimerId(99)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_writes_full_collection_in_order() {
        let (mut store, storage) = store_with("[]");
        for name in ["a", "b", "c"] {
            let id = store.allocate_id();
            store.add(TimerRecord::new(id, Some(name), 60));
        }
        store.remove(TimerId(2));
        store.save();

        let saved: Vec<StoredTimer> = serde_json::from_str(&storage.contents().unwrap()).unwrap();
        let names: Vec<&str> = saved.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
