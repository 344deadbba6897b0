use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::passage::PassageId;
use crate::session::result::SessionResult;

/// Best figures for one passage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassageStats {
    pub attempts: u32,
    #[serde(rename = "bestWPM")]
    pub best_wpm: u32,
    pub best_accuracy: f64,
    pub best_score: u32,
}

impl PassageStats {
    pub fn record(&mut self, result: &SessionResult) {
        self.attempts += 1;
        self.best_wpm = self.best_wpm.max(result.wpm);
        self.best_accuracy = self.best_accuracy.max(result.accuracy);
        self.best_score = self.best_score.max(result.score);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverallStats {
    pub total_attempts: u32,
    #[serde(rename = "bestWPM")]
    pub best_wpm: u32,
    #[serde(rename = "averageWPM")]
    pub average_wpm: f64,
    pub best_accuracy: f64,
    pub average_accuracy: f64,
    pub best_score: u32,
}

/// The whole persisted document. Only ever replaced wholesale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_session: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<SessionResult>,
    #[serde(default, alias = "paragraphStats")]
    pub per_passage_stats: BTreeMap<PassageId, PassageStats>,
    #[serde(default)]
    pub overall_stats: OverallStats,
}

impl ProgressRecord {
    /// Fold one result into the record.
    pub fn apply(&mut self, result: SessionResult) {
        self.per_passage_stats
            .entry(result.passage_id)
            .or_default()
            .record(&result);

        let overall = &mut self.overall_stats;
        overall.total_attempts += 1;
        overall.best_wpm = overall.best_wpm.max(result.wpm);
        overall.best_accuracy = overall.best_accuracy.max(result.accuracy);
        overall.best_score = overall.best_score.max(result.score);

        self.last_session = Some(result.timestamp);
        self.history.push(result);

        self.overall_stats.average_wpm = average(&self.history, |r| r.wpm as f64);
        self.overall_stats.average_accuracy = average(&self.history, |r| r.accuracy);
    }
}

/// Mean over the history, rounded to two decimals.
fn average(history: &[SessionResult], field: impl Fn(&SessionResult) -> f64) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let sum: f64 = history.iter().map(field).sum();
    (sum / history.len() as f64 * 100.0).round() / 100.0
}
