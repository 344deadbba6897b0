pub mod display;
pub mod finger;
pub mod hint;
pub mod model;
