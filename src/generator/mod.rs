pub mod paragraphs;
pub mod remote;
pub mod words;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ContentError;

#[derive(Embed)]
#[folder = "assets/content/"]
struct ContentAssets;

/// Where the next passage comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Random words from the bundled word list
    Array,
    /// A random paragraph from the bundled collection
    #[default]
    Json,
    /// A quote from the quotes API
    #[serde(alias = "ninja")]
    #[value(alias = "ninja")]
    Quote,
    /// A random encyclopedia summary
    #[serde(alias = "wikipedia")]
    #[value(alias = "wikipedia")]
    Encyclopedia,
    /// Text from a local generation server
    #[serde(alias = "ai")]
    #[value(alias = "ai")]
    Generated,
}

impl ContentSource {
    pub const ALL: [ContentSource; 5] = [
        ContentSource::Array,
        ContentSource::Json,
        ContentSource::Quote,
        ContentSource::Encyclopedia,
        ContentSource::Generated,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContentSource::Array => "random words",
            ContentSource::Json => "paragraph",
            ContentSource::Quote => "quote",
            ContentSource::Encyclopedia => "encyclopedia",
            ContentSource::Generated => "generated",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn is_remote(self) -> bool {
        matches!(
            self,
            ContentSource::Quote | ContentSource::Encyclopedia | ContentSource::Generated
        )
    }
}

/// Supplies raw passage text. Failures leave the caller's session untouched.
pub trait PassageSource {
    fn fetch(&mut self) -> Result<String, ContentError>;
}

/// The same text every time; backs `--file` and restarts.
pub struct FixedText(pub String);

impl PassageSource for FixedText {
    fn fetch(&mut self) -> Result<String, ContentError> {
        if self.0.trim().is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(self.0.clone())
    }
}

pub fn source_for(kind: ContentSource, config: &Config) -> Box<dyn PassageSource + Send> {
    match kind {
        ContentSource::Array => Box::new(words::WordList::load()),
        ContentSource::Json => Box::new(paragraphs::ParagraphSource::load()),
        ContentSource::Quote => Box::new(remote::QuoteSource::new(
            &config.quote_endpoint,
            config.quote_api_key.clone(),
        )),
        ContentSource::Encyclopedia => {
            Box::new(remote::EncyclopediaSource::new(&config.encyclopedia_endpoint))
        }
        ContentSource::Generated => {
            Box::new(remote::GeneratedTextSource::new(&config.generator_endpoint))
        }
    }
}

fn embedded_json<T: serde::de::DeserializeOwned + Default>(name: &str) -> T {
    ContentAssets::get(name)
        .and_then(|file| serde_json::from_slice(file.data.as_ref()).ok())
        .unwrap_or_default()
}
