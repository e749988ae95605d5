//! Challenge generation and verification.
//!
//! Generators build immutable [`ChallengeSpec`](gauntlet_common::ChallengeSpec)s;
//! the verifier decides whether an attempt answers one.

mod generator;
mod verifier;

pub use generator::ChallengeGenerator;
pub use verifier::{SequenceProgress, SequenceStep, verify};
