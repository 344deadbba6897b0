use std::time::Instant;

use crate::error::MetricsError;

/// Characters per standardized word.
const CHARS_PER_WORD: f64 = 5.0;
pub const MAX_WPM: u32 = 250;

/// Speed that earns the full speed share of the score.
const TARGET_WPM: f64 = 70.0;
const SPEED_POINTS: f64 = 60.0;
const ACCURACY_POINTS: f64 = 40.0;

pub fn accuracy(correct: usize, total: usize) -> Result<f64, MetricsError> {
    if total == 0 {
        return Err(MetricsError::DivisionByZero);
    }
    Ok(correct as f64 / total as f64 * 100.0)
}

/// Accuracy with the empty-passage case pinned to 100%.
pub fn session_accuracy(correct: usize, total: usize) -> f64 {
    accuracy(correct, total).unwrap_or(100.0)
}

/// Gross WPM over the given span, rounded and clamped to `0..=MAX_WPM`.
///
/// Returns `None` when either end is missing (the session never started) or
/// when no time has elapsed.
pub fn wpm(typed_chars: usize, start: Option<Instant>, end: Option<Instant>) -> Option<u32> {
    let (start, end) = (start?, end?);
    let minutes = end.checked_duration_since(start)?.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return None;
    }
    let gross = (typed_chars as f64 / CHARS_PER_WORD / minutes).round();
    Some(gross.clamp(0.0, MAX_WPM as f64) as u32)
}

pub fn score(wpm: u32, accuracy_percent: f64) -> u32 {
    let speed = (wpm as f64 / TARGET_WPM * SPEED_POINTS).min(SPEED_POINTS);
    let precision = accuracy_percent / 100.0 * ACCURACY_POINTS;
    (speed + precision).round().max(0.0) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedTier {
    Slow,
    Steady,
    Good,
    Fast,
    Blazing,
}

impl SpeedTier {
    pub fn from_wpm(wpm: u32) -> Self {
        match wpm {
            0..30 => SpeedTier::Slow,
            30..40 => SpeedTier::Steady,
            40..60 => SpeedTier::Good,
            60..100 => SpeedTier::Fast,
            _ => SpeedTier::Blazing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedTier::Slow => "warming up",
            SpeedTier::Steady => "steady",
            SpeedTier::Good => "good",
            SpeedTier::Fast => "fast",
            SpeedTier::Blazing => "blazing",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_accuracy_half() {
        assert_eq!(accuracy(1, 2), Ok(50.0));
    }

    #[test]
    fn test_accuracy_zero_total_is_error() {
        assert_eq!(accuracy(0, 0), Err(MetricsError::DivisionByZero));
        assert_eq!(session_accuracy(0, 0), 100.0);
    }

    #[test]
    fn test_wpm_one_minute() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(60);
        // 200 chars / 5 = 40 words in one minute
        assert_eq!(wpm(200, Some(t0), Some(t1)), Some(40));
    }

    #[test]
    fn test_wpm_zero_elapsed_is_absent() {
        let t = Instant::now();
        assert_eq!(wpm(10, Some(t), Some(t)), None);
    }

    #[test]
    fn test_wpm_missing_timestamps() {
        let t = Instant::now();
        assert_eq!(wpm(10, None, Some(t)), None);
        assert_eq!(wpm(10, Some(t), None), None);
    }

    #[test]
    fn test_wpm_end_before_start_is_absent() {
        let t0 = Instant::now() + Duration::from_secs(5);
        let t1 = t0 - Duration::from_secs(1);
        assert_eq!(wpm(10, Some(t0), Some(t1)), None);
    }

    #[test]
    fn test_wpm_clamped() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(wpm(500, Some(t0), Some(t1)), Some(MAX_WPM));
    }

    #[test]
    fn test_score_caps_speed_share() {
        assert_eq!(score(70, 100.0), 100);
        assert_eq!(score(200, 100.0), 100);
        assert_eq!(score(0, 100.0), 40);
        assert_eq!(score(0, 0.0), 0);
    }

    #[test]
    fn test_score_rounds() {
        // 35/70*60 = 30, 50% accuracy = 20
        assert_eq!(score(35, 50.0), 50);
        // 40/70*60 = 34.29, 90% = 36 -> 70.29
        assert_eq!(score(40, 90.0), 70);
    }

    #[test]
    fn test_speed_tiers() {
        assert_eq!(SpeedTier::from_wpm(10), SpeedTier::Slow);
        assert_eq!(SpeedTier::from_wpm(30), SpeedTier::Steady);
        assert_eq!(SpeedTier::from_wpm(45), SpeedTier::Good);
        assert_eq!(SpeedTier::from_wpm(99), SpeedTier::Fast);
        assert_eq!(SpeedTier::from_wpm(100), SpeedTier::Blazing);
    }
}
