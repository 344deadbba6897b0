pub mod backend;
pub mod progress;
pub mod schema;

pub use backend::{JsonStore, KvBackend, MemoryBackend};
pub use progress::ProgressStore;
pub use schema::{OverallStats, PassageStats, ProgressRecord};
