use crate::keyboard::finger::{self, Finger, FingerAssignment, Hand};

/// Code for characters that have no key on the layout. Never highlighted.
pub const UNKNOWN_CODE: &str = "Unknown";
pub const SPACE_CODE: &str = "Space";
pub const ENTER_CODE: &str = "Enter";
pub const TAB_CODE: &str = "Tab";
pub const BACKSPACE_CODE: &str = "Backspace";
pub const SHIFT_LEFT_CODE: &str = "ShiftLeft";
pub const SHIFT_RIGHT_CODE: &str = "ShiftRight";
/// Code for a typed character the layout has no key for. Matched literally.
pub const TEXT_CODE: &str = "Text";

/// Keys outside the four character rows that still count as typing input.
const EXTRA_INPUT_CODES: &[&str] = &[
    SPACE_CODE,
    ENTER_CODE,
    TAB_CODE,
    SHIFT_LEFT_CODE,
    SHIFT_RIGHT_CODE,
    TEXT_CODE,
];

/// Physical key identifiers by position, independent of the printed layout.
const POSITION_CODES: [&[&str]; 4] = [
    &[
        "Backquote", "Digit1", "Digit2", "Digit3", "Digit4", "Digit5", "Digit6", "Digit7",
        "Digit8", "Digit9", "Digit0", "Minus", "Equal",
    ],
    &[
        "KeyQ", "KeyW", "KeyE", "KeyR", "KeyT", "KeyY", "KeyU", "KeyI", "KeyO", "KeyP",
        "BracketLeft", "BracketRight", "Backslash",
    ],
    &[
        "KeyA", "KeyS", "KeyD", "KeyF", "KeyG", "KeyH", "KeyJ", "KeyK", "KeyL", "Semicolon",
        "Quote",
    ],
    &[
        "KeyZ", "KeyX", "KeyC", "KeyV", "KeyB", "KeyN", "KeyM", "Comma", "Period", "Slash",
    ],
];

/// Maps characters to the physical keys that produce them.
///
/// The typing session only asks two questions of a table: which key a
/// character lives on, and whether an incoming key code belongs to the
/// input alphabet at all.
pub trait KeycodeTable {
    /// Physical key code for `ch`, or [`UNKNOWN_CODE`] when the layout has none.
    fn code_for(&self, ch: char) -> &'static str;

    fn accepts(&self, code: &str) -> bool;
}

#[derive(Clone, Debug)]
pub struct PhysicalKey {
    pub code: &'static str,
    pub base: char,
    pub shifted: char,
}

#[derive(Clone, Debug)]
pub struct KeyboardModel {
    pub name: &'static str,
    pub rows: Vec<Vec<PhysicalKey>>,
}

impl KeyboardModel {
    /// Build a layout from (base, shifted) character strings, one pair per row.
    fn from_rows(name: &'static str, rows: [(&str, &str); 4]) -> Self {
        let rows = rows
            .iter()
            .zip(POSITION_CODES.iter())
            .map(|((base, shifted), codes)| {
                codes
                    .iter()
                    .zip(base.chars().zip(shifted.chars()))
                    .map(|(&code, (base, shifted))| PhysicalKey {
                        code,
                        base,
                        shifted,
                    })
                    .collect()
            })
            .collect();
        Self { name, rows }
    }

    pub fn qwerty() -> Self {
        Self::from_rows(
            "qwerty",
            [
                ("`1234567890-=", "~!@#$%^&*()_+"),
                ("qwertyuiop[]\\", "QWERTYUIOP{}|"),
                ("asdfghjkl;'", "ASDFGHJKL:\""),
                ("zxcvbnm,./", "ZXCVBNM<>?"),
            ],
        )
    }

    pub fn dvorak() -> Self {
        Self::from_rows(
            "dvorak",
            [
                ("`1234567890[]", "~!@#$%^&*(){}"),
                ("',.pyfgcrl/=\\", "\"<>PYFGCRL?+|"),
                ("aoeuidhtns-", "AOEUIDHTNS_"),
                (";qjkxbmwvz", ":QJKXBMWVZ"),
            ],
        )
    }

    pub fn colemak() -> Self {
        Self::from_rows(
            "colemak",
            [
                ("`1234567890-=", "~!@#$%^&*()_+"),
                ("qwfpgjluy;[]\\", "QWFPGJLUY:{}|"),
                ("arstdhneio'", "ARSTDHNEIO\""),
                ("zxcvbkm,./", "ZXCVBKM<>?"),
            ],
        )
    }

    pub fn names() -> &'static [&'static str] {
        &["qwerty", "dvorak", "colemak"]
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dvorak" => Self::dvorak(),
            "colemak" => Self::colemak(),
            _ => Self::qwerty(),
        }
    }

    pub fn physical_key_for(&self, ch: char) -> Option<&PhysicalKey> {
        self.find_key_position(ch).map(|(r, c)| &self.rows[r][c])
    }

    fn find_key_position(&self, ch: char) -> Option<(usize, usize)> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, key) in row.iter().enumerate() {
                if key.base == ch || key.shifted == ch {
                    return Some((row_idx, col_idx));
                }
            }
        }
        None
    }

    fn find_code_position(&self, code: &str) -> Option<(usize, usize)> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            if let Some(col_idx) = row.iter().position(|key| key.code == code) {
                return Some((row_idx, col_idx));
            }
        }
        None
    }

    /// Code to report for a character that actually arrived from the keyboard.
    /// Characters off the layout still count as input, they just get no key.
    pub fn input_code_for(&self, ch: char) -> &'static str {
        match self.code_for(ch) {
            UNKNOWN_CODE => TEXT_CODE,
            code => code,
        }
    }

    /// Shifted face of the key whose unshifted face is `ch`.
    pub fn shifted_for(&self, ch: char) -> Option<char> {
        self.rows
            .iter()
            .flatten()
            .find(|key| key.base == ch)
            .map(|key| key.shifted)
    }

    /// True when `ch` is the shifted face of its key.
    pub fn requires_shift(&self, ch: char) -> bool {
        self.physical_key_for(ch)
            .is_some_and(|pk| pk.shifted == ch && pk.base != ch)
    }

    /// Finger for a physical key code. Space goes to the thumbs, the other
    /// extra keys to the pinky on their side.
    pub fn finger_for_code(&self, code: &str) -> Option<FingerAssignment> {
        match code {
            SPACE_CODE => Some(FingerAssignment::new(Hand::Right, Finger::Thumb)),
            ENTER_CODE | SHIFT_RIGHT_CODE => {
                Some(FingerAssignment::new(Hand::Right, Finger::Pinky))
            }
            TAB_CODE | SHIFT_LEFT_CODE => Some(FingerAssignment::new(Hand::Left, Finger::Pinky)),
            _ => self
                .find_code_position(code)
                .map(|(row, col)| finger::finger_for_position(row, col)),
        }
    }
}

impl Default for KeyboardModel {
    fn default() -> Self {
        Self::qwerty()
    }
}

impl KeycodeTable for KeyboardModel {
    fn code_for(&self, ch: char) -> &'static str {
        match ch {
            ' ' => SPACE_CODE,
            '\n' => ENTER_CODE,
            '\t' => TAB_CODE,
            _ => self
                .physical_key_for(ch)
                .map(|pk| pk.code)
                .unwrap_or(UNKNOWN_CODE),
        }
    }

    fn accepts(&self, code: &str) -> bool {
        EXTRA_INPUT_CODES.contains(&code) || self.find_code_position(code).is_some()
    }
}
