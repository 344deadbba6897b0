//! Display adapter for key codes and special targets.
//!
//! Line-break targets carry [`LINE_BREAK`] as their character; the renderer
//! and the key hint go through these helpers instead of matching raw codes.

use crate::keyboard::model::{
    BACKSPACE_CODE, ENTER_CODE, SHIFT_LEFT_CODE, SHIFT_RIGHT_CODE, SPACE_CODE, TAB_CODE,
};

/// Glyph shown for a line-break target; typed with Enter.
pub const LINE_BREAK: char = '\u{21b5}';

/// Human-readable name for a non-character key code.
/// Returns `""` for character keys, which display their own face.
pub fn code_display_name(code: &str) -> &'static str {
    match code {
        SPACE_CODE => "Space",
        ENTER_CODE => "Enter",
        TAB_CODE => "Tab",
        BACKSPACE_CODE => "Backspace",
        SHIFT_LEFT_CODE => "Left Shift",
        SHIFT_RIGHT_CODE => "Right Shift",
        _ => "",
    }
}

/// Short label for compact contexts such as the key hint strip.
pub fn code_short_label(code: &str) -> &'static str {
    match code {
        SPACE_CODE => "Spc",
        ENTER_CODE => "Ent",
        TAB_CODE => "Tab",
        BACKSPACE_CODE => "Bksp",
        SHIFT_LEFT_CODE | SHIFT_RIGHT_CODE => "Shft",
        _ => "",
    }
}

/// How a target character is drawn in the passage.
pub fn target_glyph(ch: char) -> char {
    match ch {
        '\t' => '\u{2192}', // →
        _ => ch,
    }
}
