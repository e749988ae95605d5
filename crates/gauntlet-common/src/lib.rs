//! # Gauntlet Common
//!
//! Shared types, errors, and constants used across the CAPTCHA Gauntlet.
//!
//! ## Modules
//! - `types` - Challenge data (ChallengeKind, ChallengeSpec, Attempt, etc.)
//! - `error` - Common error types
//! - `constants` - Game tuning constants

pub mod constants;
pub mod error;
pub mod types;

pub use error::GauntletError;
pub use types::*;
