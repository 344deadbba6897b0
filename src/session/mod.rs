pub mod input;
pub mod passage;
pub mod result;
pub mod typing;

pub use input::{IgnoreReason, Key, Step, TypedStep};
pub use passage::{Passage, PassageId};
pub use result::SessionResult;
pub use typing::{CharacterState, SessionPhase, Snapshot, TypingSession};
