//! JSON-file storage layer for saved chart collections.
//!
//! On-disk layout, one file per collection under the data directory:
//! - `saved-bar-charts.json`: JSON array of bar chart records
//! - `saved-pie-charts.json`: JSON array of pie chart records
//!
//! Each array is ordered most-recently-saved-first; every operation is a
//! full read-modify-write of one collection, which is fine because chart
//! counts are human-scale.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

use super::models::{ChartDraft, ChartKind, ChartRecord};

/// Persistence write failure, the only error the store surfaces.
///
/// Everything else degrades silently: a missing or unparsable collection
/// file reads as an empty collection, and deleting an unknown id is a
/// no-op.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write collection {key}: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize collection {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage service for saved chart records, partitioned by [`ChartKind`].
///
/// Each collection has its own lock; save and delete hold it across their
/// whole read-modify-write so overlapping calls cannot lose each other's
/// changes.
pub struct ChartStore {
    data_dir: PathBuf,
    locks: [Mutex<()>; 2],
}

impl ChartStore {
    /// Create a store rooted at the given data directory. The directory
    /// is created lazily on first write.
    pub fn new(data_dir: PathBuf) -> Self {
        ChartStore {
            data_dir,
            locks: [Mutex::new(()), Mutex::new(())],
        }
    }

    fn collection_path(&self, kind: ChartKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.storage_key()))
    }

    fn lock(&self, kind: ChartKind) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock means a panic mid-write elsewhere; the on-disk
        // state is still consistent (writes are rename-atomic), so keep going.
        self.locks[kind.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist a new record built from `draft`, assigning it a fresh id,
    /// and prepend it to its collection.
    ///
    /// Returns the stored record so callers can observe the generated id.
    pub fn save(&self, draft: ChartDraft) -> Result<ChartRecord, StoreError> {
        let _guard = self.lock(draft.kind);

        let mut records = self.read_collection(draft.kind);
        let record = ChartRecord {
            id: Uuid::new_v4().to_string(),
            kind: draft.kind,
            data: draft.data,
            timestamp: draft.timestamp,
        };

        // Most-recently-saved-first.
        records.insert(0, record.clone());
        self.write_collection(draft.kind, &records)?;

        Ok(record)
    }

    /// Load the full collection for `kind`, most-recent-first.
    ///
    /// Never fails: a missing file or corrupt JSON is treated as "no
    /// data" rather than an error.
    pub fn load(&self, kind: ChartKind) -> Vec<ChartRecord> {
        let _guard = self.lock(kind);
        self.read_collection(kind)
    }

    /// Remove the record with the given id from its collection and
    /// rewrite it. Deleting an id that is not present is a no-op.
    pub fn delete(&self, id: &str, kind: ChartKind) -> Result<(), StoreError> {
        let _guard = self.lock(kind);

        let mut records = self.read_collection(kind);
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            // Nothing matched; leave the file untouched.
            return Ok(());
        }

        self.write_collection(kind, &records)
    }

    fn read_collection(&self, kind: ChartKind) -> Vec<ChartRecord> {
        let path = self.collection_path(kind);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Write the full collection atomically: serialize to a temp file in
    /// the same directory, then rename over the target, so a failed write
    /// never leaves a partial list behind.
    fn write_collection(
        &self,
        kind: ChartKind,
        records: &[ChartRecord],
    ) -> Result<(), StoreError> {
        let key = kind.storage_key();
        let json = serde_json::to_string_pretty(records)
            .map_err(|source| StoreError::Serialize { key, source })?;

        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io { key, source })?;

        let path = self.collection_path(kind);
        let tmp_path = self.data_dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, json).map_err(|source| StoreError::Io { key, source })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io { key, source })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::DataPoint;
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    fn store() -> (TempDir, ChartStore) {
        let dir = TempDir::new().unwrap();
        let store = ChartStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn bar_draft(label: &str, value: f64) -> ChartDraft {
        ChartDraft::new(
            ChartKind::Bar,
            vec![DataPoint::new(label, value, "#3B82F6")],
            Utc::now(),
        )
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, store) = store();
        let draft = ChartDraft::new(
            ChartKind::Bar,
            vec![DataPoint::new("A", 10.0, "#fff")],
            ts("2024-01-01T00:00:00Z"),
        );

        let saved = store.save(draft.clone()).unwrap();
        assert!(!saved.id.is_empty());

        let loaded = store.load(ChartKind::Bar);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, saved.id);
        assert_eq!(loaded[0].data, draft.data);
        assert_eq!(loaded[0].timestamp, draft.timestamp);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let (_dir, store) = store();
        let a = store.save(bar_draft("A", 1.0)).unwrap();
        let b = store.save(bar_draft("B", 2.0)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_collections_are_isolated() {
        let (_dir, store) = store();
        store.save(bar_draft("A", 1.0)).unwrap();
        store
            .save(ChartDraft::new(
                ChartKind::Pie,
                vec![DataPoint::new("Slice", 50.0, "#10B981")],
                Utc::now(),
            ))
            .unwrap();

        let bars = store.load(ChartKind::Bar);
        let pies = store.load(ChartKind::Pie);
        assert_eq!(bars.len(), 1);
        assert_eq!(pies.len(), 1);
        assert_eq!(bars[0].kind, ChartKind::Bar);
        assert_eq!(pies[0].kind, ChartKind::Pie);
    }

    #[test]
    fn test_most_recent_record_comes_first() {
        let (_dir, store) = store();
        store
            .save(ChartDraft::new(
                ChartKind::Pie,
                vec![DataPoint::new("First", 30.0, "#fff")],
                ts("2024-01-01T00:00:00Z"),
            ))
            .unwrap();
        store
            .save(ChartDraft::new(
                ChartKind::Pie,
                vec![DataPoint::new("Second", 70.0, "#000")],
                ts("2024-01-02T00:00:00Z"),
            ))
            .unwrap();

        let loaded = store.load(ChartKind::Pie);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].data[0].label, "Second");
        assert_eq!(loaded[1].data[0].label, "First");
    }

    #[test]
    fn test_delete_removes_only_the_matching_record() {
        let (_dir, store) = store();
        let keep = store.save(bar_draft("Keep", 1.0)).unwrap();
        let doomed = store.save(bar_draft("Drop", 2.0)).unwrap();

        store.delete(&doomed.id, ChartKind::Bar).unwrap();

        let loaded = store.load(ChartKind::Bar);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, keep.id);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        let saved = store.save(bar_draft("A", 10.0)).unwrap();

        store.delete(&saved.id, ChartKind::Bar).unwrap();
        let after_first = store.load(ChartKind::Bar);

        // Second delete of the same id is a no-op, not an error.
        store.delete(&saved.id, ChartKind::Bar).unwrap();
        let after_second = store.load(ChartKind::Bar);

        assert_eq!(after_first, after_second);
        assert!(after_second.is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_a_noop() {
        let (_dir, store) = store();
        let saved = store.save(bar_draft("A", 10.0)).unwrap();

        store.delete("no-such-id", ChartKind::Bar).unwrap();

        let loaded = store.load(ChartKind::Bar);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, saved.id);
    }

    #[test]
    fn test_load_from_empty_store_returns_empty_list() {
        let (_dir, store) = store();
        assert!(store.load(ChartKind::Bar).is_empty());
        assert!(store.load(ChartKind::Pie).is_empty());
    }

    #[test]
    fn test_corrupt_collection_file_reads_as_empty() {
        let (dir, store) = store();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("saved-bar-charts.json"), "not valid json{").unwrap();

        assert!(store.load(ChartKind::Bar).is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_replaced_on_next_save() {
        let (dir, store) = store();
        fs::write(dir.path().join("saved-pie-charts.json"), "[{\"broken\":").unwrap();

        store
            .save(ChartDraft::new(
                ChartKind::Pie,
                vec![DataPoint::new("Fresh", 5.0, "#fff")],
                Utc::now(),
            ))
            .unwrap();

        let loaded = store.load(ChartKind::Pie);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].data[0].label, "Fresh");
    }

    #[test]
    fn test_on_disk_shape_matches_wire_format() {
        let (dir, store) = store();
        store
            .save(ChartDraft::new(
                ChartKind::Bar,
                vec![DataPoint::new("A", 10.0, "#fff")],
                ts("2024-01-01T00:00:00Z"),
            ))
            .unwrap();

        let raw = fs::read_to_string(dir.path().join("saved-bar-charts.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &json.as_array().unwrap()[0];
        assert_eq!(record["type"], "bar");
        assert_eq!(record["data"][0]["label"], "A");
        assert_eq!(record["data"][0]["value"], 10.0);
        assert_eq!(record["data"][0]["color"], "#fff");
        assert_eq!(record["timestamp"], "2024-01-01T00:00:00Z");
        assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn test_save_then_delete_scenario() {
        // Save one bar chart, confirm it loads, delete it, confirm empty.
        let (_dir, store) = store();
        let draft = ChartDraft::new(
            ChartKind::Bar,
            vec![DataPoint::new("A", 10.0, "#fff")],
            ts("2024-01-01T00:00:00Z"),
        );

        let saved = store.save(draft.clone()).unwrap();
        let loaded = store.load(ChartKind::Bar);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].data, draft.data);
        assert!(!loaded[0].id.is_empty());

        store.delete(&saved.id, ChartKind::Bar).unwrap();
        assert!(store.load(ChartKind::Bar).is_empty());
    }
}
