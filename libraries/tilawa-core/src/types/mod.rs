//! Domain types for Tilawa

mod engine;
mod page;
mod reciter;
mod repeat;
pub mod surah;
mod track;
mod verse;

pub use engine::{EngineEvent, EngineState};
pub use page::{PageNumber, PAGE_COUNT};
pub use reciter::Reciter;
pub use repeat::{clamp_count, RepeatConfig, RepeatMode, MAX_REPEAT_COUNT, MIN_REPEAT_COUNT};
pub use track::LogicalTrack;
pub use verse::VerseRef;
