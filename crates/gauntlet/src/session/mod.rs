//! Session sequencing and scoring.

mod machine;
mod stats;

pub use machine::{Effect, Event, Game, Millis};
pub use stats::Stats;
