//! Core types shared across Gauntlet components.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The four challenge flavours a session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Read distorted characters and type them
    TextEntry,
    /// Pick every tile showing the category symbol
    ImageSelect,
    /// Repeat an arrow sequence click by click
    OrderedInput,
    /// Drag a piece onto its slot
    SliderAlign,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 4] = [
        Self::TextEntry,
        Self::ImageSelect,
        Self::OrderedInput,
        Self::SliderAlign,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TextEntry => "Distorted Text",
            Self::ImageSelect => "Image Grid",
            Self::OrderedInput => "Arrow Sequence",
            Self::SliderAlign => "Slider Puzzle",
        }
    }
}

/// Which top-level screen the game is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Start,
    Playing,
    Results,
}

/// One arrow of an ordered-input challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn symbol(&self) -> char {
        match self {
            Self::Up => '↑',
            Self::Right => '→',
            Self::Down => '↓',
            Self::Left => '←',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single cell of the image grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTile {
    /// Stable identifier, independent of display position
    pub id: u8,
    /// Symbol drawn in the cell
    pub symbol: String,
    /// Whether the cell shows the category symbol
    pub correct: bool,
}

/// What counts as a correct submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CorrectAnswer {
    /// Exact text, compared case-insensitively
    Text { text: String },
    /// Exact set of tile ids
    Tiles { ids: BTreeSet<u8> },
    /// Exact ordered sequence
    Sequence { sequence: Vec<Direction> },
    /// Any position within `tolerance` of `target`
    Target { target: u8, tolerance: u8 },
}

/// Presentation payload handed straight to the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderData {
    Text { text: String },
    Grid { category: String, tiles: Vec<GridTile> },
    Sequence { sequence: Vec<Direction> },
    Slider { target: u8, tolerance: u8 },
}

/// A fully generated challenge. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSpec {
    pub kind: ChallengeKind,
    /// Prompt shown above the widget
    pub question: String,
    pub answer: CorrectAnswer,
    pub render: RenderData,
}

/// A user's submission for one challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Attempt {
    Text(String),
    Tiles(BTreeSet<u8>),
    Sequence(Vec<Direction>),
    Slider(u8),
}

impl Attempt {
    /// The challenge kind this attempt can answer
    pub fn kind(&self) -> ChallengeKind {
        match self {
            Self::Text(_) => ChallengeKind::TextEntry,
            Self::Tiles(_) => ChallengeKind::ImageSelect,
            Self::Sequence(_) => ChallengeKind::OrderedInput,
            Self::Slider(_) => ChallengeKind::SliderAlign,
        }
    }
}
