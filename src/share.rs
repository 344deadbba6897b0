//! Shareable result tokens.
//!
//! A token is `<base64 payload>.<hex checksum>`, where the payload is
//! `score|wpm|accuracy|timestamp_ms` and the checksum is the sum of the
//! payload's character codes. It travels as the fragment of a share URL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ShareError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedResult {
    pub score: u32,
    pub wpm: u32,
    pub accuracy: f64,
    /// Milliseconds since the epoch, when the token carries one.
    pub timestamp: Option<i64>,
}

pub fn encode(score: u32, wpm: u32, accuracy: f64, timestamp_ms: i64) -> String {
    let payload = format!("{score}|{wpm}|{accuracy:.2}|{timestamp_ms}");
    format!("{}.{}", STANDARD.encode(&payload), checksum(&payload))
}

pub fn decode(token: &str) -> Result<SharedResult, ShareError> {
    let (encoded, found) = token
        .trim()
        .rsplit_once('.')
        .ok_or(ShareError::MissingSeparator)?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ShareError::InvalidBase64(e.to_string()))?;
    let payload = String::from_utf8(bytes).map_err(|_| ShareError::InvalidUtf8)?;

    let expected = checksum(&payload);
    if expected != found {
        return Err(ShareError::ChecksumMismatch {
            expected,
            found: found.to_string(),
        });
    }

    let mut fields = payload.split('|');
    let score = parse_field(fields.next(), "score")?;
    let wpm = parse_field(fields.next(), "wpm")?;
    let accuracy: f64 = parse_field(fields.next(), "accuracy")?;
    if !accuracy.is_finite() {
        return Err(ShareError::InvalidField {
            field: "accuracy",
            value: accuracy.to_string(),
        });
    }
    let timestamp = fields.next().and_then(|ts| ts.parse().ok());

    Ok(SharedResult {
        score,
        wpm,
        accuracy,
        timestamp,
    })
}

pub fn share_url(base: &str, token: &str) -> String {
    format!("{}#{token}", base.trim_end_matches('#'))
}

/// The token part of a share URL. A bare token is returned as is.
pub fn token_from_url(url: &str) -> Option<&str> {
    let token = match url.split_once('#') {
        Some((_, fragment)) => fragment,
        None => url,
    };
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Sum of character codes, lowercase hex.
fn checksum(payload: &str) -> String {
    let sum: u64 = payload.chars().map(|c| c as u64).sum();
    format!("{sum:x}")
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &'static str,
) -> Result<T, ShareError> {
    let value = field.ok_or(ShareError::MissingField(name))?;
    value.trim().parse().map_err(|_| ShareError::InvalidField {
        field: name,
        value: value.to_string(),
    })
}
