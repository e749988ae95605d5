//! # Gauntlet - Terminal CAPTCHA Challenge Game
//!
//! Play through a short run of CAPTCHA-style puzzles against the clock and
//! find out how human you really are.
//!
//! ## Flow
//! ```text
//! Start → Playing (challenge 1 … N) → Results
//!   ↑                                     │
//!   └──────────── play again ─────────────┘
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use gauntlet_common::GauntletError;
use gauntlet_common::constants::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_DIR};

mod challenge;
mod config;
mod feedback;
mod logging;
mod session;
mod state;
mod ticker;
mod ui;

use config::AppConfig;
use state::AppState;

/// Gauntlet - prove you are human, one puzzle at a time
#[derive(Parser, Debug)]
#[command(name = "gauntlet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "GAUNTLET_CONFIG")]
    config: String,

    /// Fixed RNG seed (overrides config)
    #[arg(long, env = "GAUNTLET_SEED")]
    seed: Option<u64>,

    /// Challenges per session, 1-4 (overrides config)
    #[arg(short = 'n', long, env = "GAUNTLET_CHALLENGES")]
    challenges: Option<usize>,

    /// Start with sound disabled
    #[arg(long, default_value = "false")]
    mute: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,

    /// Directory for log files (the terminal is taken by the game)
    #[arg(long, default_value = DEFAULT_LOG_DIR, env = "GAUNTLET_LOG_DIR")]
    log_dir: PathBuf,

    /// Print the last session's results as JSON on exit
    #[arg(long, default_value = "false")]
    json_results: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let _log_guard = logging::init_logging(&args.log_level, args.json_logs, &args.log_dir)?;

    info!("Starting Gauntlet v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!(
        challenges = config.challenge_count,
        sound = config.sound_enabled,
        "Configuration loaded"
    );

    let state = AppState::new(config)?;

    let stats = match ui::run(state).await {
        Ok(stats) => stats,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<GauntletError>() {
                if err.is_invariant_violation() {
                    tracing::error!(error = %err, "Game logic bug");
                }
            }
            return Err(e);
        }
    };

    if args.json_results {
        if let Some(stats) = stats {
            let json = serde_json::to_string_pretty(&stats).context("Failed to encode results")?;
            println!("{json}");
        }
    }

    info!("Gauntlet finished");
    Ok(())
}
