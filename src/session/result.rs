use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::metrics;
use crate::session::passage::PassageId;
use crate::session::typing::TypingSession;

/// Outcome of one finished session. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    #[serde(alias = "paragraphId")]
    pub passage_id: PassageId,
    pub wpm: u32,
    pub accuracy: f64,
    pub score: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SessionResult {
    pub fn from_session(session: &TypingSession, timestamp: DateTime<Utc>) -> Self {
        let wpm = session.wpm();
        let accuracy = session.accuracy();
        Self {
            passage_id: session.passage().id(),
            wpm,
            accuracy,
            score: metrics::score(wpm, accuracy),
            timestamp,
        }
    }

    pub fn speed_tier(&self) -> metrics::SpeedTier {
        metrics::SpeedTier::from_wpm(self.wpm)
    }
}
