use std::ops::Range;

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::keyboard::display::LINE_BREAK;

/// Stable identity for a passage, keyed on its normalized text.
pub type PassageId = u64;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the UTF-8 bytes. Must not change between releases: ids are persisted.
pub fn passage_id(text: &str) -> PassageId {
    text.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub character: char,
    pub is_line_break: bool,
}

impl Target {
    fn char(character: char) -> Self {
        Self {
            character,
            is_line_break: false,
        }
    }

    fn line_break() -> Self {
        Self {
            character: LINE_BREAK,
            is_line_break: true,
        }
    }
}

/// A run of targets up to and including its trailing whitespace. A line
/// break is a word of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Word {
    targets: Vec<Target>,
}

impl Word {
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.targets.as_slice(), [t] if t.is_line_break)
    }
}

/// Word-major coordinates of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub word: usize,
    pub offset: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Passage {
    id: PassageId,
    words: Vec<Word>,
    /// Flat index of each word's first target.
    word_starts: Vec<usize>,
    total: usize,
}

impl Passage {
    /// Normalize raw text and split it into words.
    ///
    /// Text is composed to NFC, split into lines, and the smallest leading
    /// space count among non-blank lines is sliced off every line. Each line is
    /// tokenized so that a word keeps its trailing whitespace, and a line-break
    /// target is placed between consecutive lines. Text with no non-blank line
    /// yields an empty passage.
    pub fn build(raw: &str) -> Self {
        let composed = ComposingNormalizerBorrowed::new_nfc().normalize(raw);
        let lines: Vec<&str> = composed
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let Some(indent) = lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().take_while(|&c| c == ' ').count())
            .min()
        else {
            return Self::default();
        };

        let normalized: Vec<&str> = lines.iter().map(|line| strip_indent(line, indent)).collect();

        let mut words = Vec::new();
        for (line_idx, line) in normalized.iter().enumerate() {
            words.extend(split_words(line));
            if line_idx + 1 < normalized.len() {
                words.push(Word {
                    targets: vec![Target::line_break()],
                });
            }
        }

        let mut word_starts = Vec::with_capacity(words.len());
        let mut total = 0;
        for word in &words {
            word_starts.push(total);
            total += word.len();
        }

        Self {
            id: passage_id(&normalized.join("\n")),
            words,
            word_starts,
            total,
        }
    }

    pub fn id(&self) -> PassageId {
        self.id
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Total number of targets across all words.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.words.iter().flat_map(|w| w.targets.iter())
    }

    pub fn target(&self, index: usize) -> Option<&Target> {
        let pos = self.position_of(index)?;
        self.words[pos.word].targets.get(pos.offset)
    }

    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index >= self.total {
            return None;
        }
        // Last word starting at or before `index`; empty words never occur.
        let word = self.word_starts.partition_point(|&start| start <= index) - 1;
        Some(Position {
            word,
            offset: index - self.word_starts[word],
        })
    }

    pub fn index_of(&self, pos: Position) -> usize {
        self.word_starts[pos.word] + pos.offset
    }

    pub fn word_range(&self, word: usize) -> Range<usize> {
        let start = self.word_starts[word];
        start..start + self.words[word].len()
    }

    /// The target typed just before `pos`.
    ///
    /// Inside a word this is the previous character. At the first character of
    /// a word it is the last target of the preceding word, which may be a
    /// line-break word.
    pub fn previous_position(&self, pos: Position) -> Option<Position> {
        if pos.offset > 0 {
            return Some(Position {
                word: pos.word,
                offset: pos.offset - 1,
            });
        }
        self.words[..pos.word]
            .iter()
            .rposition(|w| !w.is_empty())
            .map(|word| Position {
                word,
                offset: self.words[word].len() - 1,
            })
    }

    /// The passage as typed text, line breaks as `\n`.
    pub fn text(&self) -> String {
        self.targets()
            .map(|t| if t.is_line_break { '\n' } else { t.character })
            .collect()
    }
}

/// Slice `n` leading characters; shorter (blank) lines become empty.
fn strip_indent(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((byte_idx, _)) => &line[byte_idx..],
        None => "",
    }
}

fn split_words(line: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Vec::new();
    for ch in line.chars() {
        current.push(Target::char(ch));
        if ch.is_whitespace() {
            words.push(Word {
                targets: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        words.push(Word { targets: current });
    }
    words
}
