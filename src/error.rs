use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    #[error("total cannot be zero")]
    DivisionByZero,
}

/// Failures while reading a shared-result token. None of these are fatal:
/// a link that fails to decode is simply not shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("token has no checksum separator")]
    MissingSeparator,

    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("checksum mismatch: token carries {found}, payload sums to {expected}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("payload is missing the {0} field")]
    MissingField(&'static str),

    #[error("payload field {field} is not a number: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("remote sources are unavailable in this build")]
    NetworkDisabled,

    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("text contains characters outside the keyboard set")]
    InvalidText,

    #[error("content source produced no text")]
    Empty,
}
