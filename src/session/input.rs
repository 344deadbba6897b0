use std::time::Instant;

use tracing::{debug, info};

use crate::engine::metrics;
use crate::keyboard::model::{ENTER_CODE, KeycodeTable, SPACE_CODE};
use crate::session::passage::Target;
use crate::session::typing::{CharState, Completion, TypingSession};

/// A logical key as delivered by the shell, after layout translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Shift,
}

impl Key {
    /// Enter matches a line-break target and nothing else.
    pub fn matches(self, target: &Target) -> bool {
        match self {
            Key::Enter => target.is_line_break,
            Key::Char(ch) => !target.is_line_break && ch == target.character,
            Key::Shift => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    Finished,
    NotArmed,
    OutsideAlphabet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedStep {
    pub index: usize,
    pub expected: char,
    pub actual: Key,
    pub correct: bool,
    /// Set when this keystroke closed a word.
    pub word_wpm: Option<u32>,
    pub finished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Ignored(IgnoreReason),
    /// Shift went down; only the key hint changes.
    Modifier,
    Typed(TypedStep),
}

impl Step {
    pub fn is_error(&self) -> bool {
        matches!(self, Step::Typed(step) if !step.correct)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Step::Ignored(_))
    }
}

pub(super) fn process_keystroke(
    session: &mut TypingSession,
    table: &dyn KeycodeTable,
    code: &str,
    key: Key,
    now: Instant,
) -> Step {
    if session.is_finished() {
        return Step::Ignored(IgnoreReason::Finished);
    }
    if !session.armed {
        return Step::Ignored(IgnoreReason::NotArmed);
    }
    if !table.accepts(code) {
        return Step::Ignored(IgnoreReason::OutsideAlphabet);
    }
    if key == Key::Shift {
        session.shift_held = true;
        return Step::Modifier;
    }

    let index = session.cursor;
    let Some(&target) = session.passage.target(index) else {
        return Step::Ignored(IgnoreReason::Finished);
    };

    if session.started_at.is_none() {
        session.started_at = Some(now);
        session.current_word_started_at = Some(now);
        debug!(passage = session.passage.id(), "session started");
    }

    let correct = key.matches(&target);
    session.states[index] = CharState {
        typed: true,
        correct,
    };
    session.cursor += 1;
    session.current_word_typed_char_count += 1;
    session.shift_held = false;
    if !correct {
        debug!(index, expected = %target.character, actual = ?key, "mismatch");
    }

    let boundary = code == SPACE_CODE || code == ENTER_CODE;
    let finished = session.is_finished();
    let mut word_wpm = None;

    if boundary || finished {
        word_wpm = metrics::wpm(
            session.current_word_typed_char_count,
            session.current_word_started_at,
            Some(now),
        );
        let word = wpm_word_for(session, index);
        if let Some(slot) = session.word_wpm.get_mut(word) {
            *slot = word_wpm;
        }
        if word_wpm.is_some() {
            session.last_word_wpm = word_wpm;
        }
    }

    if finished {
        if let Some(started_at) = session.started_at.take() {
            session.completion = Some(Completion {
                started_at,
                finished_at: now,
            });
        }
        session.current_word_started_at = None;
        session.current_word_typed_char_count = 0;
        info!(
            passage = session.passage.id(),
            errors = session.error_count(),
            "session finished"
        );
    } else if boundary {
        session.current_word_started_at = Some(now);
        session.current_word_typed_char_count = 0;
    }

    Step::Typed(TypedStep {
        index,
        expected: target.character,
        actual: key,
        correct,
        word_wpm,
        finished,
    })
}

pub(super) fn process_backspace(session: &mut TypingSession) -> bool {
    if session.is_finished() || !session.armed {
        return false;
    }
    let Some(pos) = session.passage.position_of(session.cursor) else {
        return false;
    };
    let Some(prev) = session.passage.previous_position(pos) else {
        return false;
    };

    let index = session.passage.index_of(prev);
    session.states[index] = CharState::default();
    session.cursor = index;
    session.current_word_typed_char_count = session.current_word_typed_char_count.saturating_sub(1);

    let word = wpm_word_for(session, index);
    if let Some(slot) = session.word_wpm.get_mut(word) {
        *slot = None;
    }
    true
}

/// Word credited with the WPM of a word closed at `index`. A line break
/// closes the word before it.
fn wpm_word_for(session: &TypingSession, index: usize) -> usize {
    let passage = &session.passage;
    let Some(pos) = passage.position_of(index) else {
        return 0;
    };
    let words = passage.words();
    if !words[pos.word].is_line_break() {
        return pos.word;
    }
    words[..pos.word]
        .iter()
        .rposition(|w| !w.is_line_break())
        .unwrap_or(pos.word)
}
