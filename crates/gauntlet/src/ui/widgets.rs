//! Per-challenge input widgets.
//!
//! A widget owns the input state of the active challenge and turns key
//! presses into an [`Attempt`]. Judging the attempt is left to the game;
//! the widget only hears back when it was wrong and clears itself.

use crossterm::event::{KeyCode, KeyEvent};
use gauntlet_common::constants::{grid, slider};
use gauntlet_common::{Attempt, ChallengeSpec, Direction, GridTile, RenderData};
use rand::Rng;
use std::collections::BTreeSet;

use super::render::DistortedText;
use crate::challenge::{SequenceProgress, SequenceStep};

/// Longest text the entry box accepts
const MAX_TEXT_INPUT: usize = 12;

/// What a key press did to the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetResponse {
    /// Not a key this widget uses
    Ignored,
    /// State changed; redraw
    Changed,
    /// State changed with an audible click
    Clicked,
    /// An answer to check
    Submitted(Attempt),
}

/// Input state for the active challenge
#[derive(Debug, Clone)]
pub enum Widget {
    Text(TextWidget),
    Grid(GridWidget),
    Sequence(SequenceWidget),
    Slider(SliderWidget),
}

impl Widget {
    /// Build the widget for a challenge from its render payload
    pub fn new(spec: &ChallengeSpec, rng: &mut impl Rng) -> Self {
        match &spec.render {
            RenderData::Text { text } => Self::Text(TextWidget {
                art: DistortedText::new(text, rng),
                input: String::new(),
            }),
            RenderData::Grid { tiles, .. } => Self::Grid(GridWidget {
                tiles: tiles.clone(),
                cursor: 0,
                selected: BTreeSet::new(),
            }),
            RenderData::Sequence { sequence } => Self::Sequence(SequenceWidget {
                progress: SequenceProgress::new(sequence.clone()),
            }),
            RenderData::Slider { target, tolerance } => Self::Slider(SliderWidget {
                target: *target,
                tolerance: *tolerance,
                position: 0,
            }),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> WidgetResponse {
        match self {
            Self::Text(w) => w.handle_key(key),
            Self::Grid(w) => w.handle_key(key),
            Self::Sequence(w) => w.handle_key(key),
            Self::Slider(w) => w.handle_key(key),
        }
    }

    /// The last submission was wrong: start over
    pub fn reject(&mut self) {
        match self {
            Self::Text(w) => w.input.clear(),
            Self::Grid(w) => w.selected.clear(),
            // Progress already reset itself at the mismatch
            Self::Sequence(_) => {}
            Self::Slider(w) => w.position = 0,
        }
    }

    /// One-line key help for the footer
    pub fn help(&self) -> &'static str {
        match self {
            Self::Text(_) => "type the characters · Enter verify",
            Self::Grid(_) => "arrows move · Space select · Enter verify",
            Self::Sequence(_) => "press the arrow keys in order",
            Self::Slider(_) => "←/→ slide · PgUp/PgDn jump · Enter verify",
        }
    }
}

/// Distorted text entry
#[derive(Debug, Clone)]
pub struct TextWidget {
    art: DistortedText,
    input: String,
}

impl TextWidget {
    pub fn art(&self) -> &DistortedText {
        &self.art
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn handle_key(&mut self, key: KeyEvent) -> WidgetResponse {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                if self.input.len() >= MAX_TEXT_INPUT {
                    return WidgetResponse::Ignored;
                }
                self.input.push(c);
                WidgetResponse::Changed
            }
            KeyCode::Backspace => {
                if self.input.pop().is_some() {
                    WidgetResponse::Changed
                } else {
                    WidgetResponse::Ignored
                }
            }
            KeyCode::Enter => WidgetResponse::Submitted(Attempt::Text(self.input.clone())),
            _ => WidgetResponse::Ignored,
        }
    }
}

/// Image grid selection
#[derive(Debug, Clone)]
pub struct GridWidget {
    tiles: Vec<GridTile>,
    cursor: usize,
    selected: BTreeSet<u8>,
}

impl GridWidget {
    pub fn tiles(&self) -> &[GridTile] {
        &self.tiles
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, tile: &GridTile) -> bool {
        self.selected.contains(&tile.id)
    }

    fn handle_key(&mut self, key: KeyEvent) -> WidgetResponse {
        let columns = grid::COLUMNS;
        let len = self.tiles.len();

        let moved = match key.code {
            KeyCode::Left if self.cursor % columns > 0 => Some(self.cursor - 1),
            KeyCode::Right if self.cursor % columns + 1 < columns && self.cursor + 1 < len => {
                Some(self.cursor + 1)
            }
            KeyCode::Up if self.cursor >= columns => Some(self.cursor - columns),
            KeyCode::Down if self.cursor + columns < len => Some(self.cursor + columns),
            _ => None,
        };
        if let Some(cursor) = moved {
            self.cursor = cursor;
            return WidgetResponse::Changed;
        }

        match key.code {
            KeyCode::Char(' ') => {
                let Some(tile) = self.tiles.get(self.cursor) else {
                    return WidgetResponse::Ignored;
                };
                if !self.selected.remove(&tile.id) {
                    self.selected.insert(tile.id);
                }
                WidgetResponse::Clicked
            }
            // Nothing to verify until something is picked
            KeyCode::Enter if self.selected.is_empty() => WidgetResponse::Ignored,
            KeyCode::Enter => WidgetResponse::Submitted(Attempt::Tiles(self.selected.clone())),
            _ => WidgetResponse::Ignored,
        }
    }
}

/// Arrow sequence, checked on every press
#[derive(Debug, Clone)]
pub struct SequenceWidget {
    progress: SequenceProgress,
}

impl SequenceWidget {
    pub fn expected(&self) -> &[Direction] {
        self.progress.expected()
    }

    pub fn entered(&self) -> &[Direction] {
        self.progress.entered()
    }

    fn handle_key(&mut self, key: KeyEvent) -> WidgetResponse {
        let dir = match key.code {
            KeyCode::Up => Direction::Up,
            KeyCode::Right => Direction::Right,
            KeyCode::Down => Direction::Down,
            KeyCode::Left => Direction::Left,
            _ => return WidgetResponse::Ignored,
        };

        let mut attempt = self.progress.entered().to_vec();
        attempt.push(dir);

        match self.progress.push(dir) {
            SequenceStep::Advanced(_) => WidgetResponse::Clicked,
            SequenceStep::Complete => WidgetResponse::Submitted(Attempt::Sequence(attempt)),
            // The wrong prefix goes up as-is so the miss is recorded at once
            SequenceStep::Mismatch { position } => {
                tracing::debug!(position, "Sequence mismatch");
                WidgetResponse::Submitted(Attempt::Sequence(attempt))
            }
        }
    }
}

/// Slider alignment
#[derive(Debug, Clone)]
pub struct SliderWidget {
    target: u8,
    tolerance: u8,
    position: u8,
}

impl SliderWidget {
    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    fn handle_key(&mut self, key: KeyEvent) -> WidgetResponse {
        let max = slider::MAX_POSITION;
        let next = match key.code {
            KeyCode::Left => self.position.saturating_sub(1),
            KeyCode::Right => self.position.saturating_add(1).min(max),
            KeyCode::PageDown => self.position.saturating_sub(10),
            KeyCode::PageUp => self.position.saturating_add(10).min(max),
            KeyCode::Home => 0,
            KeyCode::End => max,
            KeyCode::Enter => return WidgetResponse::Submitted(Attempt::Slider(self.position)),
            _ => return WidgetResponse::Ignored,
        };

        if next == self.position {
            return WidgetResponse::Ignored;
        }
        self.position = next;
        WidgetResponse::Changed
    }
}
