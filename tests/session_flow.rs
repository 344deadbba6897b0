use std::time::{Duration, Instant};

use keyline::keyboard::model::{ENTER_CODE, KeyboardModel};
use keyline::session::{Key, Passage, SessionPhase, SessionResult, Step, TypingSession};

fn press(session: &mut TypingSession, model: &KeyboardModel, ch: char, at: Instant) -> Step {
    if ch == '\n' {
        session.handle_keystroke_at(model, ENTER_CODE, Key::Enter, at)
    } else {
        session.handle_keystroke_at(model, model.input_code_for(ch), Key::Char(ch), at)
    }
}

fn type_all(session: &mut TypingSession, model: &KeyboardModel, text: &str) -> Vec<Step> {
    let start = Instant::now();
    text.chars()
        .enumerate()
        .map(|(i, ch)| press(session, model, ch, start + Duration::from_millis(150 * i as u64)))
        .collect()
}

#[test]
fn exact_typing_finishes_with_full_accuracy() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("cat dog");
    type_all(&mut session, &model, "cat dog");

    assert!(session.is_finished());
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert_eq!(session.snapshot().typed_count, 7);
    assert_eq!(session.accuracy(), 100.0);
    assert!(session.wpm() > 0);
}

#[test]
fn characters_off_the_layout_still_match() {
    let model = KeyboardModel::qwerty();
    for text in ["café", "don\u{2019}t"] {
        let mut session = TypingSession::from_text(text);
        let steps = type_all(&mut session, &model, text);

        assert!(steps.iter().all(|step| !step.is_error()), "{text:?}: {steps:?}");
        assert!(session.is_finished(), "{text:?} did not finish");
        assert_eq!(session.snapshot().typed_count, text.chars().count());
        assert_eq!(session.accuracy(), 100.0);
    }
}

#[test]
fn off_layout_character_can_still_be_wrong() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("café");
    let steps = type_all(&mut session, &model, "cafè");

    assert!(steps[3].is_error());
    assert!(session.is_finished());
    assert_eq!(session.error_count(), 1);
}

#[test]
fn wrong_last_character_halves_accuracy() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("hi");
    let steps = type_all(&mut session, &model, "hx");

    assert!(!steps[0].is_error());
    assert!(steps[1].is_error());
    assert!(session.is_finished());
    assert_eq!(session.error_count(), 1);
    assert_eq!(session.accuracy(), 50.0);
}

#[test]
fn backspace_restores_previous_state() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("hello there");
    type_all(&mut session, &model, "hel");
    let before: Vec<_> = session.character_states().collect();
    let snapshot = session.snapshot();

    press(&mut session, &model, 'x', Instant::now());
    assert!(session.handle_backspace());

    let after: Vec<_> = session.character_states().collect();
    assert_eq!(before, after);
    assert_eq!(snapshot, session.snapshot());
}

#[test]
fn multiline_passage_requires_enter() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("  ab\n  cd");
    assert_eq!(session.passage().text(), "ab\ncd");

    type_all(&mut session, &model, "ab");
    let step = press(&mut session, &model, ' ', Instant::now());
    assert!(step.is_error());
    session.handle_backspace();
    let step = press(&mut session, &model, '\n', Instant::now());
    assert!(!step.is_error());
}

#[test]
fn exactly_one_current_target_until_finished() {
    let model = KeyboardModel::qwerty();
    let text = "one two\nthree";
    let mut session = TypingSession::from_text(text);
    let passage_len = session.passage().len();
    let word_total: usize = session.passage().words().iter().map(|w| w.len()).sum();
    assert_eq!(word_total, passage_len);

    let start = Instant::now();
    for (i, ch) in text.chars().enumerate() {
        let current = session.character_states().filter(|s| s.is_current).count();
        assert_eq!(current, 1, "before keystroke {i}");
        press(&mut session, &model, ch, start + Duration::from_millis(100 * i as u64));
    }
    assert_eq!(session.character_states().filter(|s| s.is_current).count(), 0);
}

#[test]
fn empty_passage_is_finished_immediately() {
    let session = TypingSession::new(Passage::build("  \n "));
    assert!(session.is_finished());
    assert_eq!(session.accuracy(), 100.0);
    assert_eq!(session.wpm(), 0);

    let result = SessionResult::from_session(&session, chrono::Utc::now());
    assert_eq!(result.wpm, 0);
    assert_eq!(result.accuracy, 100.0);
}

#[test]
fn keys_after_finish_are_ignored() {
    let model = KeyboardModel::qwerty();
    let mut session = TypingSession::from_text("a");
    type_all(&mut session, &model, "a");
    assert!(press(&mut session, &model, 'b', Instant::now()).is_ignored());
    assert!(!session.handle_backspace());
}
