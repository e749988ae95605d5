//! Configuration management for the Gauntlet.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use gauntlet_common::constants::{
    DEFAULT_CHALLENGE_COUNT, DEFAULT_SHAKE_MS, DEFAULT_SUCCESS_OVERLAY_MS, DEFAULT_TICK_INTERVAL_MS,
};
use gauntlet_common::{ChallengeKind, GauntletError};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Play feedback tones
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,

    /// Challenges per session (1-4)
    #[serde(default = "default_challenge_count")]
    pub challenge_count: usize,

    /// Fixed RNG seed for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,

    /// Timer and effect durations
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Timer and transient-effect durations
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Clock refresh interval while playing
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Success overlay duration
    #[serde(default = "default_success_overlay")]
    pub success_overlay_ms: u64,

    /// Error shake duration
    #[serde(default = "default_shake")]
    pub shake_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            success_overlay_ms: default_success_overlay(),
            shake_ms: default_shake(),
        }
    }
}

// Default value functions
fn default_sound_enabled() -> bool { true }
fn default_challenge_count() -> usize { DEFAULT_CHALLENGE_COUNT }
fn default_tick_interval() -> u64 { DEFAULT_TICK_INTERVAL_MS }
fn default_success_overlay() -> u64 { DEFAULT_SUCCESS_OVERLAY_MS }
fn default_shake() -> u64 { DEFAULT_SHAKE_MS }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = Self::from_file(config_path)?;

        // Apply CLI overrides
        if args.mute {
            config.sound_enabled = false;
        }
        if let Some(count) = args.challenges {
            config.challenge_count = count;
        }
        if let Some(seed) = args.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(config_path: &str) -> Result<Self> {
        if !Path::new(config_path).exists() {
            // Use defaults if config file doesn't exist
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path))
            .build()
            .context("Failed to load config file")?;

        settings
            .try_deserialize()
            .context("Failed to parse config")
    }

    /// Reject settings the game cannot run with
    pub fn validate(&self) -> Result<(), GauntletError> {
        let available = ChallengeKind::ALL.len();
        if self.challenge_count == 0 || self.challenge_count > available {
            return Err(GauntletError::ChallengeCount {
                requested: self.challenge_count,
                available,
            });
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(GauntletError::Config(
                "timing.tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sound_enabled: default_sound_enabled(),
            challenge_count: default_challenge_count(),
            seed: None,
            timing: TimingConfig::default(),
        }
    }
}
