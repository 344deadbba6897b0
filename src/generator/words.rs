use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::error::ContentError;
use crate::generator::{PassageSource, embedded_json};

const MAX_CHARS: usize = 150;
const MAX_REPEATS: usize = 2;

/// Random run of words from the bundled list.
pub struct WordList {
    words: Vec<String>,
    rng: SmallRng,
}

impl WordList {
    pub fn load() -> Self {
        let words: Vec<String> = embedded_json("words.json");
        Self::with_words(words, SmallRng::from_entropy())
    }

    pub fn with_words(words: Vec<String>, rng: SmallRng) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, rng }
    }

    /// Words joined by single spaces up to `MAX_CHARS`, none used more than
    /// `MAX_REPEATS` times.
    pub fn generate(&mut self) -> String {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut text = String::new();
        let budget = self.words.len() * MAX_REPEATS;

        for _ in 0..budget.max(1) * 4 {
            let Some(word) = self.words.choose(&mut self.rng) else {
                break;
            };
            let count = counts.entry(word.as_str()).or_default();
            if *count >= MAX_REPEATS {
                continue;
            }
            let extra = if text.is_empty() { 0 } else { 1 };
            if text.chars().count() + extra + word.chars().count() > MAX_CHARS {
                break;
            }
            *count += 1;
            if extra == 1 {
                text.push(' ');
            }
            text.push_str(word);
        }
        text
    }
}

impl PassageSource for WordList {
    fn fetch(&mut self) -> Result<String, ContentError> {
        let text = self.generate();
        if text.is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(text)
    }
}
