//! Application state and shared resources.

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

use crate::challenge::ChallengeGenerator;
use crate::config::AppConfig;
use crate::feedback::{Feedback, TerminalBell, ToneSink};

/// Everything the game loop needs besides the game itself
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Challenge generator
    pub generator: ChallengeGenerator,

    /// Randomness for generation and noise rendering
    pub rng: StdRng,

    /// Feedback cue dispatcher
    pub feedback: Feedback,
}

impl AppState {
    /// Create application state with the terminal bell as tone output
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(TerminalBell))
    }

    pub fn with_sink(config: AppConfig, sink: Arc<dyn ToneSink>) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => {
                tracing::info!(seed, "Using fixed seed");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        let generator = ChallengeGenerator::new(config.challenge_count);
        let feedback = Feedback::new(config.sound_enabled, sink);

        Ok(Self {
            config,
            generator,
            rng,
            feedback,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.timing.tick_interval_ms)
    }

    pub fn success_overlay(&self) -> Duration {
        Duration::from_millis(self.config.timing.success_overlay_ms)
    }

    pub fn shake(&self) -> Duration {
        Duration::from_millis(self.config.timing.shake_ms)
    }
}
