//! End-of-session scoring.
//!
//! Everything here is a pure function of a [`CompletedSession`]; computing
//! twice gives the same numbers.

use gauntlet_common::constants::scoring;
use serde::Serialize;

use super::machine::CompletedSession;

/// How fast the whole session went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedRating {
    LightningFast,
    Quick,
    Steady,
    Careful,
}

impl SpeedRating {
    pub fn from_total_ms(total_ms: u64) -> Self {
        match total_ms {
            0..15_000 => Self::LightningFast,
            15_000..30_000 => Self::Quick,
            30_000..60_000 => Self::Steady,
            _ => Self::Careful,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LightningFast => "Lightning Fast ⚡",
            Self::Quick => "Quick 🚀",
            Self::Steady => "Steady 🐢",
            Self::Careful => "Careful",
        }
    }
}

/// Entertainment-only reading of the human score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanVerdict {
    FullyHuman,
    MostlyHuman,
    Suspicious,
    BotLike,
}

impl HumanVerdict {
    /// Negative scores fall into the lowest tier
    pub fn from_score(score: i32) -> Self {
        match score {
            91.. => Self::FullyHuman,
            71..=90 => Self::MostlyHuman,
            51..=70 => Self::Suspicious,
            _ => Self::BotLike,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullyHuman => "🤖 Perfectly Human!",
            Self::MostlyHuman => "👤 Mostly Human",
            Self::Suspicious => "🤔 Suspiciously Fast...",
            Self::BotLike => "🚨 Bot-like Behavior Detected!",
        }
    }
}

/// Results screen numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_time_ms: u64,
    pub total_errors: u32,
    /// Percentage of submissions that were correct
    pub accuracy: f64,
    pub time_bonus: u32,
    pub accuracy_bonus: u32,
    pub final_score: u32,
    pub speed_rating: SpeedRating,
    /// At most 100; can go negative
    pub human_score: i32,
    pub verdict: HumanVerdict,
    pub avg_time_per_challenge_ms: f64,
    pub challenge_times_ms: Vec<u64>,
}

impl Stats {
    pub fn compute(session: &CompletedSession) -> Self {
        Self::from_totals(
            session.total_time_ms(),
            session.total_errors(),
            session.challenge_times_ms(),
        )
    }

    /// Score a session from its totals and per-challenge times
    pub fn from_totals(total_time_ms: u64, total_errors: u32, challenge_times_ms: Vec<u64>) -> Self {
        let challenges = challenge_times_ms.len() as u64;
        let errors = u64::from(total_errors);

        let time_penalty = (total_time_ms / 1000).saturating_mul(u64::from(scoring::TIME_PENALTY_PER_SEC));
        let time_bonus = u64::from(scoring::MAX_TIME_BONUS).saturating_sub(time_penalty) as u32;
        let accuracy_bonus = scoring::MAX_ACCURACY_BONUS
            .saturating_sub(total_errors.saturating_mul(scoring::ACCURACY_PENALTY_PER_ERROR));
        let final_score = scoring::BASE_SCORE + time_bonus + accuracy_bonus;

        let accuracy = if challenges + errors == 0 {
            100.0
        } else {
            challenges as f64 / (challenges + errors) as f64 * 100.0
        };

        let too_fast = if total_time_ms < scoring::TOO_FAST_MS {
            scoring::TOO_FAST_PENALTY
        } else {
            0
        };
        let human_score = 100i32
            .saturating_sub(
                i32::try_from(total_errors)
                    .unwrap_or(i32::MAX)
                    .saturating_mul(scoring::HUMAN_PENALTY_PER_ERROR),
            )
            .saturating_sub(too_fast)
            .min(100);

        let avg_time_per_challenge_ms = if challenges == 0 {
            0.0
        } else {
            total_time_ms as f64 / challenges as f64
        };

        Self {
            total_time_ms,
            total_errors,
            accuracy,
            time_bonus,
            accuracy_bonus,
            final_score,
            speed_rating: SpeedRating::from_total_ms(total_time_ms),
            human_score,
            verdict: HumanVerdict::from_score(human_score),
            avg_time_per_challenge_ms,
            challenge_times_ms,
        }
    }

    /// Accuracy with one decimal place, e.g. "60.0"
    pub fn accuracy_display(&self) -> String {
        format!("{:.1}", self.accuracy)
    }

    /// Width of a challenge's bar in the time breakdown, as a percentage.
    ///
    /// An average-length challenge fills half the bar.
    pub fn bar_percent(&self, index: usize) -> u8 {
        let Some(&time) = self.challenge_times_ms.get(index) else {
            return 0;
        };
        if self.avg_time_per_challenge_ms <= 0.0 {
            return 0;
        }
        (time as f64 / self.avg_time_per_challenge_ms * 50.0).clamp(0.0, 100.0) as u8
    }
}
