use anyhow::Result;
use tracing::{info, warn};

use crate::session::passage::PassageId;
use crate::session::result::SessionResult;
use crate::store::backend::{KvBackend, MemoryBackend};
use crate::store::schema::{PassageStats, ProgressRecord};

/// Key the whole progress document lives under.
pub const STORAGE_KEY: &str = "typing_stats";
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Durable session history with running aggregates.
///
/// Every mutation is a full read-modify-write of one document. There is no
/// locking: two processes saving at once resolve as last writer wins.
pub struct ProgressStore {
    backend: Box<dyn KvBackend + Send>,
}

impl ProgressStore {
    pub fn new(backend: Box<dyn KvBackend + Send>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::default()))
    }

    /// Current record, initializing an empty one if nothing is stored or
    /// the stored document cannot be read back.
    pub fn get_progress(&mut self) -> Result<ProgressRecord> {
        let stored = match self.backend.get(STORAGE_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "progress unreadable, resetting");
                None
            }
        };
        if let Some(content) = stored {
            match serde_json::from_str(&content) {
                Ok(record) => return Ok(record),
                Err(e) => warn!(error = %e, "progress document corrupted, resetting"),
            }
        }
        let record = ProgressRecord::default();
        self.write(&record)?;
        Ok(record)
    }

    pub fn save_result(&mut self, result: SessionResult) -> Result<ProgressRecord> {
        let mut record = self.get_progress()?;
        info!(
            passage = result.passage_id,
            wpm = result.wpm,
            accuracy = result.accuracy,
            score = result.score,
            "saving result"
        );
        record.apply(result);
        self.write(&record)?;
        Ok(record)
    }

    /// Most recent results first.
    pub fn recent_history(&mut self, limit: usize) -> Result<Vec<SessionResult>> {
        let mut history = self.get_progress()?.history;
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history.truncate(limit);
        Ok(history)
    }

    pub fn passage_stats(&mut self, id: PassageId) -> Result<Option<PassageStats>> {
        Ok(self.get_progress()?.per_passage_stats.remove(&id))
    }

    /// Drop everything and store a fresh empty record.
    pub fn clear_progress(&mut self) -> Result<()> {
        self.backend.remove(STORAGE_KEY)?;
        self.write(&ProgressRecord::default())?;
        info!("progress cleared");
        Ok(())
    }

    fn write(&mut self, record: &ProgressRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        self.backend.set(STORAGE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn result(passage_id: PassageId, wpm: u32, accuracy: f64, score: u32, ms: i64) -> SessionResult {
        SessionResult {
            passage_id,
            wpm,
            accuracy,
            score,
            timestamp: Utc.timestamp_millis_opt(ms).unwrap(),
        }
    }

    #[test]
    fn test_lazy_init() {
        let mut store = ProgressStore::in_memory();
        assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());
        assert!(store.backend.get(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_save_two_results() {
        let mut store = ProgressStore::in_memory();
        store.save_result(result(1, 40, 90.0, 70, 1_000)).unwrap();
        store.save_result(result(1, 60, 80.0, 75, 2_000)).unwrap();

        let record = store.get_progress().unwrap();
        assert_eq!(record.overall_stats.best_wpm, 60);
        assert_eq!(record.overall_stats.average_wpm, 50.0);
        assert_eq!(record.overall_stats.total_attempts, 2);
        assert_eq!(record.per_passage_stats[&1].attempts, 2);
    }

    #[test]
    fn test_recent_history_sorted_and_limited() {
        let mut store = ProgressStore::in_memory();
        store.save_result(result(1, 40, 90.0, 70, 3_000)).unwrap();
        store.save_result(result(2, 50, 90.0, 70, 1_000)).unwrap();
        store.save_result(result(3, 60, 90.0, 70, 2_000)).unwrap();

        let recent = store.recent_history(2).unwrap();
        let ids: Vec<_> = recent.iter().map(|r| r.passage_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.recent_history(DEFAULT_HISTORY_LIMIT).unwrap().len(), 3);
    }

    #[test]
    fn test_passage_stats_lookup() {
        let mut store = ProgressStore::in_memory();
        store.save_result(result(9, 40, 90.0, 70, 1_000)).unwrap();
        assert_eq!(store.passage_stats(9).unwrap().map(|s| s.attempts), Some(1));
        assert_eq!(store.passage_stats(10).unwrap(), None);
    }

    #[test]
    fn test_corrupted_document_resets() {
        let mut backend = MemoryBackend::default();
        backend.set(STORAGE_KEY, "{not json").unwrap();
        let mut store = ProgressStore::new(Box::new(backend));
        assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());
        // the reset record was written back
        let stored = store.backend.get(STORAGE_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<ProgressRecord>(&stored).is_ok());
    }

    #[test]
    fn test_clear_progress() {
        let mut store = ProgressStore::in_memory();
        store.save_result(result(1, 40, 90.0, 70, 1_000)).unwrap();
        store.clear_progress().unwrap();
        assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());
    }
}
