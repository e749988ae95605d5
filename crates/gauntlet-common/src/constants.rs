//! Shared constants for the CAPTCHA Gauntlet.

/// Challenges per session unless configured otherwise
pub const DEFAULT_CHALLENGE_COUNT: usize = 3;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/gauntlet.toml";

/// Default directory for log files
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Elapsed-time refresh interval while playing (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// How long the success overlay stays up before the next challenge (milliseconds)
pub const DEFAULT_SUCCESS_OVERLAY_MS: u64 = 800;

/// How long the error shake lasts (milliseconds)
pub const DEFAULT_SHAKE_MS: u64 = 500;

/// Text entry challenge parameters
pub mod text {
    /// No I, O, 0 or 1: too easy to confuse
    pub const ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    pub const LENGTH: usize = 6;
}

/// Image grid challenge parameters
pub mod grid {
    /// Total tiles on the board
    pub const TILE_COUNT: usize = 12;

    /// Tiles per rendered row
    pub const COLUMNS: usize = 4;

    /// Inclusive bounds on how many tiles show the category symbol
    pub const MIN_CORRECT: usize = 3;
    pub const MAX_CORRECT: usize = 4;

    /// A grid category: the symbol to find and the look-alikes around it
    #[derive(Debug, Clone, Copy)]
    pub struct Category {
        pub name: &'static str,
        pub symbol: &'static str,
        pub decoys: &'static [&'static str],
    }

    pub const CATEGORIES: &[Category] = &[
        Category {
            name: "bicycles",
            symbol: "🚲",
            decoys: &["🚗", "🚌", "🚕", "🚙", "✈️", "🚁", "⛵", "🚂"],
        },
        Category {
            name: "traffic lights",
            symbol: "🚦",
            decoys: &["🚏", "⛽", "🏪", "🏢", "🏠", "🌳", "💡", "📱"],
        },
        Category {
            name: "crosswalks",
            symbol: "🚶",
            decoys: &["🏃", "🚴", "🧍", "💃", "🕺", "🤸", "🧘", "🏋️"],
        },
        Category {
            name: "trees",
            symbol: "🌲",
            decoys: &["🌵", "🌴", "🌻", "🌹", "🌷", "🍄", "🌿", "🌾"],
        },
    ];
}

/// Ordered input challenge parameters
pub mod sequence {
    pub const LENGTH: usize = 5;
}

/// Slider challenge parameters
pub mod slider {
    /// Target is drawn from MIN_TARGET..MAX_TARGET (exclusive upper bound)
    pub const MIN_TARGET: u8 = 70;
    pub const MAX_TARGET: u8 = 80;

    pub const TOLERANCE: u8 = 5;

    /// Full travel of the slider
    pub const MAX_POSITION: u8 = 100;
}

/// Score formula weights
pub mod scoring {
    pub const BASE_SCORE: u32 = 500;
    pub const MAX_TIME_BONUS: u32 = 300;
    pub const TIME_PENALTY_PER_SEC: u32 = 5;
    pub const MAX_ACCURACY_BONUS: u32 = 200;
    pub const ACCURACY_PENALTY_PER_ERROR: u32 = 50;

    pub const HUMAN_PENALTY_PER_ERROR: i32 = 10;
    /// Finishing faster than this looks scripted
    pub const TOO_FAST_MS: u64 = 5_000;
    pub const TOO_FAST_PENALTY: i32 = 20;
}
