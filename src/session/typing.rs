use std::time::Instant;

use crate::engine::metrics;
use crate::keyboard::model::KeycodeTable;
use crate::session::input::{self, Key, Step};
use crate::session::passage::Passage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Finished,
}

/// Stored per target. `correct` is meaningful only once `typed` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct CharState {
    pub typed: bool,
    pub correct: bool,
}

/// What the renderer sees for one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterState {
    pub typed: bool,
    pub correct: bool,
    pub is_current: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub typed_count: usize,
    pub total_count: usize,
    pub error_count: usize,
}

/// Start and end of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub started_at: Instant,
    pub finished_at: Instant,
}

/// One attempt at typing a passage.
///
/// The session owns the passage and every per-target state. Targets are
/// typed strictly left to right, so the cursor is always the first untyped
/// target and there is at most one current target.
#[derive(Clone, Debug)]
pub struct TypingSession {
    pub(super) passage: Passage,
    pub(super) states: Vec<CharState>,
    pub(super) cursor: usize,
    pub(super) armed: bool,
    pub(super) started_at: Option<Instant>,
    pub(super) current_word_started_at: Option<Instant>,
    pub(super) current_word_typed_char_count: usize,
    pub(super) word_wpm: Vec<Option<u32>>,
    pub(super) last_word_wpm: Option<u32>,
    pub(super) completion: Option<Completion>,
    pub(super) shift_held: bool,
}

impl TypingSession {
    pub fn new(passage: Passage) -> Self {
        Self {
            states: vec![CharState::default(); passage.len()],
            word_wpm: vec![None; passage.words().len()],
            passage,
            cursor: 0,
            armed: true,
            started_at: None,
            current_word_started_at: None,
            current_word_typed_char_count: 0,
            last_word_wpm: None,
            completion: None,
            shift_held: false,
        }
    }

    pub fn from_text(raw: &str) -> Self {
        Self::new(Passage::build(raw))
    }

    /// Drop all typing progress and start over on the same passage.
    pub fn restart(&mut self) {
        let passage = std::mem::take(&mut self.passage);
        *self = Self::new(passage);
    }

    pub fn handle_keystroke(&mut self, table: &dyn KeycodeTable, code: &str, key: Key) -> Step {
        input::process_keystroke(self, table, code, key, Instant::now())
    }

    pub fn handle_keystroke_at(
        &mut self,
        table: &dyn KeycodeTable,
        code: &str,
        key: Key,
        at: Instant,
    ) -> Step {
        input::process_keystroke(self, table, code, key, at)
    }

    /// Un-type the most recent target. Returns false when there is nothing to undo.
    pub fn handle_backspace(&mut self) -> bool {
        input::process_backspace(self)
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_finished() {
            SessionPhase::Finished
        } else if self.started_at.is_some() {
            SessionPhase::InProgress
        } else {
            SessionPhase::NotStarted
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.passage.len()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Index of the next expected target, if any.
    pub fn current_index(&self) -> Option<usize> {
        (!self.is_finished()).then_some(self.cursor)
    }

    pub fn character_state(&self, index: usize) -> Option<CharacterState> {
        let state = self.states.get(index)?;
        Some(CharacterState {
            typed: state.typed,
            correct: state.correct,
            is_current: index == self.cursor,
        })
    }

    pub fn character_states(&self) -> impl Iterator<Item = CharacterState> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| CharacterState {
                typed: state.typed,
                correct: state.correct,
                is_current: index == self.cursor,
            })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            typed_count: self.cursor,
            total_count: self.passage.len(),
            error_count: self.error_count(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.states.iter().filter(|s| s.typed && !s.correct).count()
    }

    pub fn correct_count(&self) -> usize {
        self.states.iter().filter(|s| s.typed && s.correct).count()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn word_wpm(&self, word: usize) -> Option<u32> {
        self.word_wpm.get(word).copied().flatten()
    }

    pub fn last_word_wpm(&self) -> Option<u32> {
        self.last_word_wpm
    }

    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    /// WPM so far, over every target typed since the first keystroke.
    pub fn live_wpm(&self, now: Instant) -> Option<u32> {
        match self.completion {
            Some(done) => self.final_wpm(done),
            None => metrics::wpm(self.cursor, self.started_at, Some(now)),
        }
    }

    pub fn live_accuracy(&self) -> f64 {
        metrics::session_accuracy(self.correct_count(), self.cursor)
    }

    fn final_wpm(&self, done: Completion) -> Option<u32> {
        metrics::wpm(
            self.passage.len(),
            Some(done.started_at),
            Some(done.finished_at),
        )
    }

    /// WPM over the whole passage; zero for a session that was never typed.
    pub fn wpm(&self) -> u32 {
        self.completion
            .and_then(|done| self.final_wpm(done))
            .unwrap_or(0)
    }

    /// Share of targets typed correctly; an empty passage counts as perfect.
    pub fn accuracy(&self) -> f64 {
        let total = self.passage.len();
        metrics::session_accuracy(total - self.error_count(), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = TypingSession::from_text("hello");
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(
            session.snapshot(),
            Snapshot {
                typed_count: 0,
                total_count: 5,
                error_count: 0
            }
        );
        assert!(session.is_armed());
    }

    #[test]
    fn test_exactly_one_current_target() {
        let session = TypingSession::from_text("ab cd");
        let current: Vec<_> = session.character_states().filter(|s| s.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(session.character_state(0).map(|s| s.is_current), Some(true));
    }

    #[test]
    fn test_empty_passage_is_finished() {
        let session = TypingSession::from_text("  \n ");
        assert!(session.is_finished());
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.current_index(), None);
        assert_eq!(session.accuracy(), 100.0);
        assert_eq!(session.wpm(), 0);
        assert_eq!(session.character_states().filter(|s| s.is_current).count(), 0);
    }

    #[test]
    fn test_accuracy_starts_at_100() {
        let session = TypingSession::from_text("test");
        assert_eq!(session.live_accuracy(), 100.0);
        assert_eq!(session.accuracy(), 100.0);
    }

    #[test]
    fn test_live_wpm_absent_before_start() {
        let session = TypingSession::from_text("test");
        assert_eq!(session.live_wpm(Instant::now()), None);
    }
}
