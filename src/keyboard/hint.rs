use crate::keyboard::finger::{FingerAssignment, Hand};
use crate::keyboard::model::{
    ENTER_CODE, KeyboardModel, KeycodeTable, SHIFT_LEFT_CODE, SHIFT_RIGHT_CODE, SPACE_CODE,
    UNKNOWN_CODE,
};
use crate::session::passage::Target;
use crate::session::typing::TypingSession;

/// Keys to light up on the keyboard diagram for the current position.
///
/// Rebuilt from scratch on every frame. Nothing is carried over between
/// keystrokes, so a hint can never drift from the session it describes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyHint {
    pub expected: Option<&'static str>,
    pub expected_shift: Option<&'static str>,
    pub finger: Option<FingerAssignment>,
    /// Keys of the remaining characters in the current word, with the
    /// 1-based positions at which each is needed.
    pub word_keys: Vec<(&'static str, Vec<usize>)>,
    pub word_shifts: Vec<&'static str>,
}

impl KeyHint {
    pub fn derive(session: &TypingSession, model: &KeyboardModel) -> Self {
        let Some(current) = session.current_index() else {
            return Self::default();
        };
        let passage = session.passage();
        let Some(target) = passage.target(current) else {
            return Self::default();
        };

        let mut hint = Self::default();
        let code = code_for_target(model, target);
        if code != UNKNOWN_CODE {
            hint.expected = Some(code);
            hint.finger = model.finger_for_code(code);
            hint.expected_shift = shift_for(model, target, code);
        }

        let upcoming = (current..passage.len())
            .filter_map(|i| passage.target(i))
            .map(|t| (t, code_for_target(model, t)))
            .take_while(|&(_, code)| code != SPACE_CODE && code != ENTER_CODE);

        for (order, (target, code)) in upcoming.enumerate() {
            if code == UNKNOWN_CODE {
                continue;
            }
            match hint.word_keys.iter_mut().find(|(c, _)| *c == code) {
                Some((_, orders)) => orders.push(order + 1),
                None => hint.word_keys.push((code, vec![order + 1])),
            }
            if let Some(shift) = shift_for(model, target, code)
                && !hint.word_shifts.contains(&shift)
            {
                hint.word_shifts.push(shift);
            }
        }
        hint
    }

    pub fn is_expected(&self, code: &str) -> bool {
        self.expected == Some(code) || self.expected_shift == Some(code)
    }

    pub fn is_highlighted(&self, code: &str) -> bool {
        self.word_keys.iter().any(|(c, _)| *c == code) || self.word_shifts.contains(&code)
    }

    pub fn orders_for(&self, code: &str) -> &[usize] {
        self.word_keys
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, orders)| orders.as_slice())
            .unwrap_or(&[])
    }
}

fn code_for_target(model: &KeyboardModel, target: &Target) -> &'static str {
    if target.is_line_break {
        ENTER_CODE
    } else {
        model.code_for(target.character)
    }
}

/// Shifted characters are typed with the shift key on the other hand.
fn shift_for(model: &KeyboardModel, target: &Target, code: &str) -> Option<&'static str> {
    if target.is_line_break || !model.requires_shift(target.character) {
        return None;
    }
    let hand = model.finger_for_code(code)?.hand;
    Some(match hand.opposite() {
        Hand::Left => SHIFT_LEFT_CODE,
        Hand::Right => SHIFT_RIGHT_CODE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::finger::Finger;
    use crate::session::input::Key;

    #[test]
    fn test_hint_for_fresh_session() {
        let model = KeyboardModel::qwerty();
        let session = TypingSession::from_text("dad sat");
        let hint = KeyHint::derive(&session, &model);
        assert_eq!(hint.expected, Some("KeyD"));
        assert_eq!(hint.expected_shift, None);
        assert_eq!(
            hint.finger,
            Some(FingerAssignment::new(Hand::Left, Finger::Middle))
        );
        assert_eq!(hint.orders_for("KeyD"), &[1, 3]);
        assert_eq!(hint.orders_for("KeyA"), &[2]);
        // stops at the space
        assert!(!hint.is_highlighted("KeyS"));
    }

    #[test]
    fn test_shift_on_opposite_hand() {
        let model = KeyboardModel::qwerty();
        let session = TypingSession::from_text("Aj");
        let hint = KeyHint::derive(&session, &model);
        assert_eq!(hint.expected_shift, Some(SHIFT_RIGHT_CODE));
        assert!(hint.is_expected(SHIFT_RIGHT_CODE));

        let session = TypingSession::from_text("J");
        let hint = KeyHint::derive(&session, &model);
        assert_eq!(hint.expected_shift, Some(SHIFT_LEFT_CODE));
    }

    #[test]
    fn test_line_break_expects_enter() {
        let model = KeyboardModel::qwerty();
        let mut session = TypingSession::from_text("a\nb");
        session.handle_keystroke(&model, "KeyA", Key::Char('a'));
        let hint = KeyHint::derive(&session, &model);
        assert_eq!(hint.expected, Some(ENTER_CODE));
        assert!(hint.word_keys.is_empty());
    }

    #[test]
    fn test_unknown_never_highlighted() {
        let model = KeyboardModel::qwerty();
        let session = TypingSession::from_text("\u{e9}t\u{e9}");
        let hint = KeyHint::derive(&session, &model);
        assert_eq!(hint.expected, None);
        assert_eq!(hint.finger, None);
        assert!(!hint.is_highlighted(UNKNOWN_CODE));
        assert_eq!(hint.orders_for("KeyT"), &[2]);
    }

    #[test]
    fn test_finished_session_has_no_hint() {
        let model = KeyboardModel::qwerty();
        let mut session = TypingSession::from_text("a");
        session.handle_keystroke(&model, "KeyA", Key::Char('a'));
        assert_eq!(KeyHint::derive(&session, &model), KeyHint::default());
    }
}
