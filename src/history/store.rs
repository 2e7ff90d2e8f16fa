//! Recent history store
//!
//! A bounded, newest-first list of analysis outcomes that mirrors itself to
//! a `HistoryStorage` on every mutation and is rehydrated from it on open.

use chrono::Utc;
use std::collections::HashSet;

use crate::history::error::HistoryResult;
use crate::history::persist::HistoryStorage;
use crate::history::types::{AnalysisRecord, NewAnalysis};

/// Maximum number of records held at any time
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, persisted log of recent analyses
pub struct RecentHistoryStore {
    /// Newest first, never longer than `HISTORY_CAPACITY`
    records: Vec<AnalysisRecord>,
    storage: Box<dyn HistoryStorage>,
}

impl RecentHistoryStore {
    /// Open the store and rehydrate it from `storage`
    ///
    /// A missing blob yields an empty store. An unreadable or unparseable blob
    /// is logged and discarded rather than returned as an error.
    pub fn open(storage: impl HistoryStorage + 'static) -> Self {
        let records = rehydrate(&storage);
        tracing::debug!(records = records.len(), "History store opened");
        Self {
            records,
            storage: Box::new(storage),
        }
    }

    /// Record a new outcome at the head, evicting the oldest past capacity
    ///
    /// The in-memory list is updated before persisting, so a storage error
    /// leaves the record visible through `list()` for the rest of the session.
    pub fn add(&mut self, analysis: NewAnalysis) -> HistoryResult<()> {
        let record = AnalysisRecord {
            id: self.fresh_id(),
            text: analysis.text,
            sentiment: analysis.sentiment,
            source: analysis.source,
            timestamp: Utc::now(),
        };

        tracing::debug!(
            id = %record.id,
            sentiment = %record.sentiment,
            source = %record.source,
            "Recording analysis"
        );

        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// Drop every record and persist the empty list
    pub fn clear(&mut self) -> HistoryResult<()> {
        self.records.clear();
        tracing::info!("History cleared");
        self.persist()
    }

    /// Records, newest to oldest
    pub fn list(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialized form of the current list, as written to storage
    pub fn to_json(&self) -> HistoryResult<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    fn persist(&self) -> HistoryResult<()> {
        let blob = self.to_json()?;
        self.storage.write(&blob)?;
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Rebuild the record list from storage, falling back to empty on any failure
fn rehydrate(storage: &dyn HistoryStorage) -> Vec<AnalysisRecord> {
    let blob = match storage.read() {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read saved analyses, starting empty");
            return Vec::new();
        }
    };

    let parsed: Vec<AnalysisRecord> = match serde_json::from_str(&blob) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse saved analyses, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records: Vec<AnalysisRecord> = parsed
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();

    if records.len() > HISTORY_CAPACITY {
        tracing::warn!(
            found = records.len(),
            kept = HISTORY_CAPACITY,
            "Saved analyses exceed capacity, truncating"
        );
        records.truncate(HISTORY_CAPACITY);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::persist::{FileStorage, MemoryStorage, DEFAULT_STORAGE_KEY};
    use crate::history::types::{Sentiment, Source};
    use tempfile::tempdir;

    fn analysis(text: &str) -> NewAnalysis {
        NewAnalysis::new(text, Sentiment::Neutral, Source::Single)
    }

    #[test]
    fn test_len_tracks_min_of_capacity_and_calls() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());

        for i in 1..=15 {
            store.add(analysis(&format!("item {}", i))).unwrap();
            assert_eq!(store.len(), i.min(HISTORY_CAPACITY));
        }
    }

    #[test]
    fn test_newest_first() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());

        store
            .add(NewAnalysis::new("good", Sentiment::Positive, Source::Single))
            .unwrap();
        store
            .add(NewAnalysis::new("bad", Sentiment::Negative, Source::Batch))
            .unwrap();

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].text, "bad");
        assert_eq!(list[0].sentiment, Sentiment::Negative);
        assert_eq!(list[0].source, Source::Batch);
        assert_eq!(list[1].text, "good");
        assert_eq!(list[1].sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_eleventh_add_evicts_oldest() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());

        for i in 0..10 {
            store.add(analysis(&format!("item {}", i))).unwrap();
        }
        assert_eq!(store.list().last().unwrap().text, "item 0");

        store.add(analysis("item 10")).unwrap();

        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.list()[0].text, "item 10");
        assert_eq!(store.list().last().unwrap().text, "item 1");
        assert!(store.list().iter().all(|r| r.text != "item 0"));
    }

    #[test]
    fn test_twelve_adds_drop_two_oldest() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());

        for i in 0..12 {
            store.add(analysis(&format!("text-{}", i))).unwrap();
        }

        let texts: Vec<&str> = store.list().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts.len(), 10);
        assert!(!texts.contains(&"text-0"));
        assert!(!texts.contains(&"text-1"));
        assert_eq!(texts[0], "text-11");
        assert_eq!(texts[9], "text-2");
    }

    #[test]
    fn test_ids_unique() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());
        for _ in 0..10 {
            store.add(analysis("same text")).unwrap();
        }

        let ids: HashSet<&str> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_empty_text_accepted() {
        let mut store = RecentHistoryStore::open(MemoryStorage::new());
        store.add(analysis("")).unwrap();
        assert_eq!(store.list()[0].text, "");
    }

    #[test]
    fn test_every_add_is_persisted() {
        let storage = MemoryStorage::new();
        let mut store = RecentHistoryStore::open(storage.clone());

        store.add(analysis("first")).unwrap();
        let saved: Vec<AnalysisRecord> =
            serde_json::from_str(&storage.snapshot().unwrap()).unwrap();
        assert_eq!(saved, store.list());

        store.add(analysis("second")).unwrap();
        let saved: Vec<AnalysisRecord> =
            serde_json::from_str(&storage.snapshot().unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].text, "second");
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let storage = MemoryStorage::new();
        let mut store = RecentHistoryStore::open(storage.clone());

        store.add(analysis("one")).unwrap();
        store.add(analysis("two")).unwrap();
        store.clear().unwrap();

        assert!(store.list().is_empty());
        assert_eq!(storage.snapshot().as_deref(), Some("[]"));

        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(storage.snapshot().as_deref(), Some("[]"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let before: Vec<AnalysisRecord>;

        {
            let mut store = RecentHistoryStore::open(FileStorage::new(dir.path(), DEFAULT_STORAGE_KEY));
            store
                .add(NewAnalysis::new("loved it", Sentiment::Positive, Source::Reddit))
                .unwrap();
            store
                .add(NewAnalysis::new("meh", Sentiment::Neutral, Source::Twitter))
                .unwrap();
            store
                .add(NewAnalysis::new("off topic", Sentiment::Irrelevant, Source::Batch))
                .unwrap();
            before = store.list().to_vec();
        }

        let store = RecentHistoryStore::open(FileStorage::new(dir.path(), DEFAULT_STORAGE_KEY));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_malformed_blob_starts_empty() {
        let store = RecentHistoryStore::open(MemoryStorage::with_blob("this is not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_sentiment_in_blob_starts_empty() {
        let blob = r#"[{"id":"a","text":"x","sentiment":9,"source":"Single","timestamp":"2026-10-19T12:00:00Z"}]"#;
        let store = RecentHistoryStore::open(MemoryStorage::with_blob(blob));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rehydrate_parses_timestamps() {
        let blob = r#"[{"id":"a","text":"x","sentiment":1,"source":"Reddit","timestamp":"2026-10-19T12:00:00.250Z"}]"#;
        let store = RecentHistoryStore::open(MemoryStorage::with_blob(blob));

        let record = store.get("a").unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);
        assert_eq!(record.source, Source::Reddit);
        assert_eq!(record.timestamp.timestamp_millis(), 1_792_411_200_250);
    }

    #[test]
    fn test_rehydrate_truncates_oversized_blob() {
        let records: Vec<String> = (0..13)
            .map(|i| {
                format!(
                    r#"{{"id":"id-{i}","text":"t{i}","sentiment":0,"source":"Batch","timestamp":"2026-10-19T12:00:00Z"}}"#
                )
            })
            .collect();
        let blob = format!("[{}]", records.join(","));

        let store = RecentHistoryStore::open(MemoryStorage::with_blob(blob));
        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.list()[0].id, "id-0");
        assert_eq!(store.list()[9].id, "id-9");
    }

    #[test]
    fn test_rehydrate_drops_duplicate_ids() {
        let blob = r#"[
            {"id":"dup","text":"newer","sentiment":2,"source":"Single","timestamp":"2026-10-19T12:00:01Z"},
            {"id":"dup","text":"older","sentiment":0,"source":"Single","timestamp":"2026-10-19T12:00:00Z"}
        ]"#;
        let store = RecentHistoryStore::open(MemoryStorage::with_blob(blob));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].text, "newer");
    }

    #[test]
    fn test_rehydrated_store_keeps_fifo_eviction() {
        let storage = MemoryStorage::new();
        {
            let mut store = RecentHistoryStore::open(storage.clone());
            for i in 0..10 {
                store.add(analysis(&format!("old {}", i))).unwrap();
            }
        }

        let mut store = RecentHistoryStore::open(storage);
        store.add(analysis("fresh")).unwrap();

        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.list()[0].text, "fresh");
        assert!(store.list().iter().all(|r| r.text != "old 0"));
    }
}
