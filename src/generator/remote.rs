use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ContentError;
use crate::generator::PassageSource;

pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://api.api-ninjas.com/v1/quotes";
pub const DEFAULT_ENCYCLOPEDIA_ENDPOINT: &str =
    "https://en.wikipedia.org/api/rest_v1/page/random/summary";
pub const DEFAULT_GENERATOR_ENDPOINT: &str = "http://localhost:3000/generate-text";

/// Summaries with characters off the keyboard are skipped; give up after this many.
const ENCYCLOPEDIA_ATTEMPTS: usize = 5;

#[derive(Debug, Deserialize)]
struct Quote {
    quote: String,
    author: String,
}

#[derive(Debug, Deserialize)]
struct Summary {
    extract: String,
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

pub struct QuoteSource {
    endpoint: String,
    api_key: Option<String>,
}

impl QuoteSource {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key,
        }
    }
}

impl PassageSource for QuoteSource {
    fn fetch(&mut self) -> Result<String, ContentError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ContentError::MissingApiKey("quotes"))?;
        let body = http::get(&self.endpoint, &[("X-Api-Key", key)])?;
        parse_quote(&body)
    }
}

pub struct EncyclopediaSource {
    endpoint: String,
}

impl EncyclopediaSource {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl PassageSource for EncyclopediaSource {
    fn fetch(&mut self) -> Result<String, ContentError> {
        for attempt in 1..=ENCYCLOPEDIA_ATTEMPTS {
            let body = http::get(&self.endpoint, &[])?;
            match parse_summary(&body) {
                Ok(text) => return Ok(text),
                Err(ContentError::InvalidText) => {
                    debug!(attempt, "summary has off-keyboard characters, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        warn!("no usable summary after {ENCYCLOPEDIA_ATTEMPTS} attempts");
        Err(ContentError::InvalidText)
    }
}

pub struct GeneratedTextSource {
    endpoint: String,
}

impl GeneratedTextSource {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl PassageSource for GeneratedTextSource {
    fn fetch(&mut self) -> Result<String, ContentError> {
        let body = http::post_json(&self.endpoint, "{}")?;
        parse_generated(&body)
    }
}

pub fn parse_quote(body: &str) -> Result<String, ContentError> {
    let quotes: Vec<Quote> =
        serde_json::from_str(body).map_err(|e| ContentError::UnexpectedFormat(e.to_string()))?;
    let quote = quotes.into_iter().next().ok_or(ContentError::Empty)?;
    Ok(format!("{}\n- {}", quote.quote, quote.author))
}

pub fn parse_summary(body: &str) -> Result<String, ContentError> {
    let summary: Summary =
        serde_json::from_str(body).map_err(|e| ContentError::UnexpectedFormat(e.to_string()))?;
    if summary.extract.trim().is_empty() {
        return Err(ContentError::Empty);
    }
    if !is_keyboard_text(&summary.extract) {
        return Err(ContentError::InvalidText);
    }
    Ok(summary.extract)
}

pub fn parse_generated(body: &str) -> Result<String, ContentError> {
    let generated: Vec<Generated> =
        serde_json::from_str(body).map_err(|e| ContentError::UnexpectedFormat(e.to_string()))?;
    let text = generated
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(ContentError::Empty)?;
    Ok(polish_sentence(&text))
}

/// Capitalize the first letter and make sure the text ends a sentence.
pub fn polish_sentence(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

/// Only characters found on a standard US keyboard, plus whitespace.
pub fn is_keyboard_text(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || c.is_ascii_punctuation())
}

#[cfg(feature = "network")]
mod http {
    use std::time::Duration;

    use crate::error::ContentError;

    fn client() -> Result<reqwest::blocking::Client, ContentError> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ContentError::Network(e.to_string()))
    }

    fn read(response: reqwest::blocking::Response) -> Result<String, ContentError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Network(format!("HTTP {status}")));
        }
        response
            .text()
            .map_err(|e| ContentError::Network(e.to_string()))
    }

    pub fn get(url: &str, headers: &[(&str, &str)]) -> Result<String, ContentError> {
        let mut request = client()?.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .map_err(|e| ContentError::Network(e.to_string()))?;
        read(response)
    }

    pub fn post_json(url: &str, body: &str) -> Result<String, ContentError> {
        let response = client()?
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| ContentError::Network(e.to_string()))?;
        read(response)
    }
}

#[cfg(not(feature = "network"))]
mod http {
    use crate::error::ContentError;

    pub fn get(_url: &str, _headers: &[(&str, &str)]) -> Result<String, ContentError> {
        Err(ContentError::NetworkDisabled)
    }

    pub fn post_json(_url: &str, _body: &str) -> Result<String, ContentError> {
        Err(ContentError::NetworkDisabled)
    }
}
