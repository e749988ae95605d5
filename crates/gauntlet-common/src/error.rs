//! Common error types for the CAPTCHA Gauntlet.

use thiserror::Error;

use crate::types::{ChallengeKind, Screen};

/// Errors across Gauntlet components
///
/// A wrong answer is never an error; it is a normal, retryable outcome.
#[derive(Debug, Error)]
pub enum GauntletError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested more challenges than there are kinds, or none at all
    #[error("Cannot build a session of {requested} challenges from {available} kinds")]
    ChallengeCount { requested: usize, available: usize },

    /// A generator produced unusable data (always a bug)
    #[error("Degenerate {kind:?} challenge: {reason}")]
    DegenerateChallenge { kind: ChallengeKind, reason: String },

    /// Event does not apply to the current screen
    #[error("Cannot {event} while on the {screen:?} screen")]
    InvalidTransition { event: &'static str, screen: Screen },
}

impl GauntletError {
    /// Returns true if this error indicates a bug rather than bad input or environment
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::DegenerateChallenge { .. } | Self::InvalidTransition { .. }
        )
    }
}
