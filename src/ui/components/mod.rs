pub mod keyboard_hint;
pub mod results;
pub mod stats_bar;
pub mod typing_area;
