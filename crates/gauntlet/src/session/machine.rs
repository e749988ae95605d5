//! The game state machine.
//!
//! The whole game is one [`Game`] value. [`Game::apply`] is the only way to
//! change it: each event either transitions the game and returns the side
//! effects the caller should perform, or is rejected and leaves the game as
//! it was. Timestamps arrive inside events, so nothing here reads a clock.

use gauntlet_common::{Attempt, ChallengeSpec, GauntletError, Screen};

use crate::challenge;
use crate::feedback::FeedbackCue;

/// Milliseconds since the Unix epoch
pub type Millis = i64;

/// A challenge plus the bookkeeping gathered while it is played
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeRecord {
    pub spec: ChallengeSpec,
    /// Set when the challenge becomes active
    pub started_at: Option<Millis>,
    /// Set once, on the correct submission
    pub completed_at: Option<Millis>,
    /// Failed attempts so far
    pub error_count: u32,
}

impl ChallengeRecord {
    fn new(spec: ChallengeSpec) -> Self {
        Self {
            spec,
            started_at: None,
            completed_at: None,
            error_count: 0,
        }
    }

    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A session in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    records: Vec<ChallengeRecord>,
    current_index: usize,
    started_at: Millis,
}

impl Session {
    #[cfg(test)]
    pub fn records(&self) -> &[ChallengeRecord] {
        &self.records
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The active challenge
    pub fn current(&self) -> &ChallengeRecord {
        &self.records[self.current_index]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn started_at(&self) -> Millis {
        self.started_at
    }

    pub fn total_errors(&self) -> u32 {
        self.records.iter().map(|r| r.error_count).sum()
    }
}

/// A finished session; every record has a completion time
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    records: Vec<ChallengeRecord>,
    started_at: Millis,
    finished_at: Millis,
}

impl CompletedSession {
    #[cfg(test)]
    pub fn records(&self) -> &[ChallengeRecord] {
        &self.records
    }

    pub fn total_time_ms(&self) -> u64 {
        span(self.started_at, self.finished_at)
    }

    pub fn total_errors(&self) -> u32 {
        self.records.iter().map(|r| r.error_count).sum()
    }

    /// Time spent on each challenge, measured between consecutive completions
    /// (the first from session start)
    pub fn challenge_times_ms(&self) -> Vec<u64> {
        let mut previous = self.started_at;
        self.records
            .iter()
            .map(|record| {
                let completed = record.completed_at.unwrap_or(previous);
                let time = span(previous, completed);
                previous = completed;
                time
            })
            .collect()
    }
}

fn span(from: Millis, to: Millis) -> u64 {
    u64::try_from(to.saturating_sub(from)).unwrap_or(0)
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Event {
    /// Begin a session with freshly generated challenges
    StartGame {
        challenges: Vec<ChallengeSpec>,
        now: Millis,
    },
    /// The active challenge was answered correctly
    Solved { now: Millis },
    /// The active challenge was answered incorrectly
    Failed,
    /// Leave the results screen
    PlayAgain,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::StartGame { .. } => "start a game",
            Self::Solved { .. } => "solve a challenge",
            Self::Failed => "fail a challenge",
            Self::PlayAgain => "play again",
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Cue(FeedbackCue),
    /// Begin refreshing the elapsed-time display
    StartTicker,
    /// Stop refreshing the elapsed-time display
    StopTicker,
}

/// The whole game
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Game {
    #[default]
    Start,
    Playing(Session),
    Results(CompletedSession),
}

impl Game {
    pub fn screen(&self) -> Screen {
        match self {
            Self::Start => Screen::Start,
            Self::Playing(_) => Screen::Playing,
            Self::Results(_) => Screen::Results,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Playing(session) => Some(session),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn completed(&self) -> Option<&CompletedSession> {
        match self {
            Self::Results(completed) => Some(completed),
            _ => None,
        }
    }

    /// Time shown on the clock: live while playing, frozen on the results screen
    pub fn elapsed_ms(&self, now: Millis) -> Option<u64> {
        match self {
            Self::Start => None,
            Self::Playing(session) => Some(span(session.started_at, now)),
            Self::Results(completed) => Some(completed.total_time_ms()),
        }
    }

    /// Apply an event. On error the game is left untouched.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>, GauntletError> {
        let screen = self.screen();

        match (std::mem::take(self), event) {
            (Self::Start, Event::StartGame { challenges, now }) => {
                if challenges.is_empty() {
                    return Err(GauntletError::ChallengeCount {
                        requested: 0,
                        available: gauntlet_common::ChallengeKind::ALL.len(),
                    });
                }

                let mut records: Vec<ChallengeRecord> =
                    challenges.into_iter().map(ChallengeRecord::new).collect();
                records[0].started_at = Some(now);

                tracing::info!(challenges = records.len(), "Session started");

                *self = Self::Playing(Session {
                    records,
                    current_index: 0,
                    started_at: now,
                });
                Ok(vec![Effect::Cue(FeedbackCue::Click), Effect::StartTicker])
            }

            (Self::Playing(mut session), Event::Solved { now }) => {
                let index = session.current_index;
                let record = &mut session.records[index];
                record.completed_at = Some(now);

                tracing::debug!(
                    index,
                    kind = ?record.spec.kind,
                    errors = record.error_count,
                    took_ms = ?record.started_at.map(|started| span(started, now)),
                    "Challenge solved"
                );

                if index + 1 < session.records.len() {
                    session.current_index += 1;
                    session.records[index + 1].started_at = Some(now);
                    *self = Self::Playing(session);
                    return Ok(vec![Effect::Cue(FeedbackCue::Success)]);
                }

                tracing::info!(
                    total_ms = span(session.started_at, now),
                    errors = session.total_errors(),
                    "Session complete"
                );

                *self = Self::Results(CompletedSession {
                    records: session.records,
                    started_at: session.started_at,
                    finished_at: now,
                });
                Ok(vec![
                    Effect::Cue(FeedbackCue::Success),
                    Effect::Cue(FeedbackCue::Victory),
                    Effect::StopTicker,
                ])
            }

            (Self::Playing(mut session), Event::Failed) => {
                let index = session.current_index;
                session.records[index].error_count += 1;

                tracing::debug!(
                    index,
                    errors = session.records[index].error_count,
                    "Challenge failed"
                );

                *self = Self::Playing(session);
                Ok(vec![Effect::Cue(FeedbackCue::Error)])
            }

            (Self::Results(_), Event::PlayAgain) => {
                tracing::debug!("Session discarded");
                Ok(vec![Effect::Cue(FeedbackCue::Click)])
            }

            (game, event) => {
                *self = game;
                Err(GauntletError::InvalidTransition {
                    event: event.name(),
                    screen,
                })
            }
        }
    }

    /// Check an attempt against the active challenge and record the outcome
    pub fn submit(&mut self, attempt: &Attempt, now: Millis) -> Result<Vec<Effect>, GauntletError> {
        let correct = match self {
            Self::Playing(session) => challenge::verify(&session.current().spec, attempt),
            _ => {
                return Err(GauntletError::InvalidTransition {
                    event: "submit an answer",
                    screen: self.screen(),
                });
            }
        };

        if correct {
            self.apply(Event::Solved { now })
        } else {
            self.apply(Event::Failed)
        }
    }
}
