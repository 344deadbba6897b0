use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use keyline::session::SessionResult;
use keyline::store::progress::STORAGE_KEY;
use keyline::store::{JsonStore, KvBackend, ProgressRecord, ProgressStore};

fn result(passage_id: u64, wpm: u32, accuracy: f64, score: u32, ms: i64) -> SessionResult {
    SessionResult {
        passage_id,
        wpm,
        accuracy,
        score,
        timestamp: Utc.timestamp_millis_opt(ms).unwrap(),
    }
}

fn disk_store(dir: &TempDir) -> ProgressStore {
    let backend = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    ProgressStore::new(Box::new(backend))
}

#[test]
fn two_results_fold_into_aggregates() {
    let dir = TempDir::new().unwrap();
    let mut store = disk_store(&dir);
    store.save_result(result(1, 40, 90.0, 70, 1_000)).unwrap();
    store.save_result(result(1, 60, 80.0, 75, 2_000)).unwrap();

    let record = disk_store(&dir).get_progress().unwrap();
    assert_eq!(record.overall_stats.best_wpm, 60);
    assert_eq!(record.overall_stats.average_wpm, 50.0);
    assert_eq!(record.overall_stats.average_accuracy, 85.0);
    assert_eq!(record.overall_stats.total_attempts, 2);
    assert_eq!(record.per_passage_stats[&1].attempts, 2);
    assert_eq!(record.per_passage_stats[&1].best_score, 75);
    assert_eq!(record.last_session.map(|t| t.timestamp_millis()), Some(2_000));
}

#[test]
fn clear_returns_to_initial_shape() {
    let dir = TempDir::new().unwrap();
    let mut store = disk_store(&dir);
    let initial = store.get_progress().unwrap();
    assert_eq!(initial, ProgressRecord::default());

    for i in 0..5 {
        store.save_result(result(i, 30 + i as u32, 95.0, 60, i as i64)).unwrap();
    }
    store.clear_progress().unwrap();
    assert_eq!(store.get_progress().unwrap(), initial);
}

#[test]
fn recent_history_is_newest_first() {
    let mut store = ProgressStore::in_memory();
    for (i, ms) in [300, 100, 500, 200].into_iter().enumerate() {
        store.save_result(result(i as u64, 40, 100.0, 80, ms)).unwrap();
    }
    let recent: Vec<i64> = store
        .recent_history(3)
        .unwrap()
        .iter()
        .map(|r| r.timestamp.timestamp_millis())
        .collect();
    assert_eq!(recent, vec![500, 300, 200]);
}

#[test]
fn corrupted_document_is_reset() {
    let dir = TempDir::new().unwrap();
    let mut backend = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    backend.set(STORAGE_KEY, "{not json").unwrap();

    let mut store = disk_store(&dir);
    assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());

    let on_disk = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let parsed: ProgressRecord = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed, ProgressRecord::default());
}

#[test]
fn stored_document_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let mut store = disk_store(&dir);
    store.save_result(result(7, 42, 97.5, 81, 1_234)).unwrap();

    let on_disk = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(value["overallStats"]["bestWPM"], 42);
    assert_eq!(value["perPassageStats"]["7"]["attempts"], 1);
    assert_eq!(value["history"][0]["timestamp"], 1_234);
    assert_eq!(value["lastSession"], 1_234);
}
