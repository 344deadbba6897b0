use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ContentError;
use crate::generator::{PassageSource, embedded_json};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

pub struct ParagraphSource {
    paragraphs: Vec<Paragraph>,
    rng: SmallRng,
}

impl ParagraphSource {
    pub fn load() -> Self {
        Self::with_paragraphs(embedded_json("paragraphs.json"), SmallRng::from_entropy())
    }

    pub fn with_paragraphs(paragraphs: Vec<Paragraph>, rng: SmallRng) -> Self {
        Self { paragraphs, rng }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

impl PassageSource for ParagraphSource {
    fn fetch(&mut self) -> Result<String, ContentError> {
        self.paragraphs
            .choose(&mut self.rng)
            .map(|p| p.text.clone())
            .ok_or(ContentError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_paragraphs_load() {
        let source = ParagraphSource::load();
        assert!(source.len() >= 10);
    }

    #[test]
    fn test_fetch_returns_a_bundled_paragraph() {
        let mut source = ParagraphSource::with_paragraphs(
            vec![Paragraph {
                text: "only one".to_string(),
            }],
            SmallRng::seed_from_u64(3),
        );
        assert_eq!(source.fetch(), Ok("only one".to_string()));
    }

    #[test]
    fn test_empty_collection_fails() {
        let mut source = ParagraphSource::with_paragraphs(Vec::new(), SmallRng::seed_from_u64(3));
        assert!(source.is_empty());
        assert_eq!(source.fetch(), Err(ContentError::Empty));
    }
}
