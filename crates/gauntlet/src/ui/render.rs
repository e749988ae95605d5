//! Screen drawing.
//!
//! Each screen is redrawn from scratch with crossterm commands queued on a
//! writer and flushed once.

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use gauntlet_common::ChallengeKind;
use gauntlet_common::constants::grid;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::io::{self, Write};

use super::widgets::{GridWidget, SequenceWidget, SliderWidget, TextWidget, Widget};
use crate::session::Stats;

const NOISE: &[char] = &['.', ',', '`', '\'', ':', ';', '-', '*'];
const NOISE_DENSITY: f64 = 0.18;
const ART_ROWS: usize = 5;
const GLYPH_SPACING: usize = 4;

/// One cell of the distorted text art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Noise(char),
    Glyph(char),
}

/// Text scattered across a few rows and buried in noise
#[derive(Debug, Clone)]
pub struct DistortedText {
    rows: Vec<Vec<Cell>>,
}

impl DistortedText {
    pub fn new(text: &str, rng: &mut impl Rng) -> Self {
        let glyphs: Vec<char> = text.chars().collect();
        let width = glyphs.len() * GLYPH_SPACING + GLYPH_SPACING;
        let mut rows = vec![vec![Cell::Blank; width]; ART_ROWS];

        for row in rows.iter_mut() {
            for cell in row.iter_mut() {
                if rng.random_bool(NOISE_DENSITY) {
                    *cell = Cell::Noise(*NOISE.choose(rng).unwrap_or(&'.'));
                }
            }
        }

        // A wavy strike-through line
        let baseline = rng.random_range(1..ART_ROWS - 1) as f32;
        let phase: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        for x in 0..width {
            let y = (baseline + (x as f32 / 3.0 + phase).sin() * 1.5).round();
            let y = (y.max(0.0) as usize).min(ART_ROWS - 1);
            rows[y][x] = Cell::Noise('~');
        }

        // Glyphs jitter vertically and sideways, with clear space either side
        for (i, c) in glyphs.iter().enumerate() {
            let x = GLYPH_SPACING / 2 + i * GLYPH_SPACING + rng.random_range(0..=1);
            let y = rng.random_range(1..ART_ROWS - 1);
            rows[y][x - 1] = Cell::Blank;
            rows[y][x] = Cell::Glyph(*c);
            rows[y][x + 1] = Cell::Blank;
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The hidden text, read left to right
    #[cfg(test)]
    pub fn glyphs(&self) -> String {
        let width = self.rows.first().map_or(0, Vec::len);
        (0..width)
            .flat_map(|x| {
                self.rows.iter().filter_map(move |row| match row[x] {
                    Cell::Glyph(c) => Some(c),
                    _ => None,
                })
            })
            .collect()
    }
}

/// Format milliseconds as MM:SS
pub fn format_time(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn sound_label(sound_enabled: bool) -> &'static str {
    if sound_enabled { "on" } else { "off" }
}

pub fn draw_start(out: &mut impl Write, challenge_count: usize, sound_enabled: bool) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(2, 1),
        SetForegroundColor(Color::Green),
        SetAttribute(Attribute::Bold),
        Print("C A P T C H A   C H A L L E N G E"),
        SetAttribute(Attribute::Reset),
        ResetColor,
        MoveTo(2, 3),
        Print("Are You Human? Prove It."),
        MoveTo(4, 5),
        Print(format!("⚡ Solve {challenge_count} random CAPTCHA challenges")),
        MoveTo(4, 6),
        Print("⏱️ Complete as fast as you can"),
        MoveTo(4, 7),
        Print("🎯 Minimize errors for higher score"),
        MoveTo(2, 9),
        SetForegroundColor(Color::Cyan),
        Print("[Enter] START CHALLENGE"),
        ResetColor,
        MoveTo(2, 11),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("m: sound {} · q: quit", sound_label(sound_enabled))),
        ResetColor,
    )?;
    out.flush()
}

/// Everything the playing screen shows
pub struct PlayingView<'a> {
    pub index: usize,
    pub total: usize,
    pub kind: ChallengeKind,
    pub elapsed_ms: u64,
    pub question: &'a str,
    pub widget: &'a Widget,
    pub shaking: bool,
}

pub fn draw_playing(out: &mut impl Write, view: &PlayingView<'_>) -> io::Result<()> {
    // Shaking nudges the whole frame sideways
    let x: u16 = if view.shaking { 4 } else { 2 };

    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(x, 1),
        Print(format!(
            "Challenge {} of {} · {}",
            view.index + 1,
            view.total,
            view.kind.label()
        )),
        MoveTo(x + 40, 1),
        SetForegroundColor(Color::Yellow),
        Print(format_time(view.elapsed_ms)),
        ResetColor,
        MoveTo(x, 3),
        SetAttribute(Attribute::Bold),
        Print(view.question),
        SetAttribute(Attribute::Reset),
    )?;

    if view.shaking {
        queue!(
            out,
            MoveTo(x, 4),
            SetForegroundColor(Color::Red),
            Print("✗ Try again"),
            ResetColor
        )?;
    }

    let top = 6;
    match view.widget {
        Widget::Text(w) => draw_text(out, w, x, top)?,
        Widget::Grid(w) => draw_grid(out, w, x, top)?,
        Widget::Sequence(w) => draw_sequence(out, w, x, top)?,
        Widget::Slider(w) => draw_slider(out, w, x, top)?,
    }

    queue!(
        out,
        MoveTo(x, top + 10),
        SetForegroundColor(Color::DarkGrey),
        Print(view.widget.help()),
        Print(" · Esc quit"),
        ResetColor,
    )?;
    out.flush()
}

fn draw_text(out: &mut impl Write, w: &TextWidget, x: u16, top: u16) -> io::Result<()> {
    for (row_index, row) in w.art().rows().iter().enumerate() {
        queue!(out, MoveTo(x, top + row_index as u16))?;
        for cell in row {
            match cell {
                Cell::Blank => queue!(out, Print(' '))?,
                Cell::Noise(c) => queue!(out, SetForegroundColor(Color::DarkGrey), Print(c))?,
                Cell::Glyph(c) => queue!(
                    out,
                    SetForegroundColor(Color::Green),
                    SetAttribute(Attribute::Bold),
                    Print(c),
                    SetAttribute(Attribute::Reset)
                )?,
            }
        }
        queue!(out, ResetColor)?;
    }

    queue!(
        out,
        MoveTo(x, top + 7),
        Print("> "),
        Print(w.input()),
        Print("_"),
    )
}

fn draw_grid(out: &mut impl Write, w: &GridWidget, x: u16, top: u16) -> io::Result<()> {
    for (i, tile) in w.tiles().iter().enumerate() {
        let col = (i % grid::COLUMNS) as u16;
        let row = (i / grid::COLUMNS) as u16;
        let (open, close) = if i == w.cursor() { ('>', '<') } else { (' ', ' ') };

        queue!(out, MoveTo(x + col * 7, top + row * 2))?;
        if w.is_selected(tile) {
            queue!(out, SetBackgroundColor(Color::DarkGreen))?;
        }
        queue!(
            out,
            Print(open),
            Print(" "),
            Print(&tile.symbol),
            Print(" "),
            Print(close),
            ResetColor
        )?;
    }
    Ok(())
}

fn draw_sequence(out: &mut impl Write, w: &SequenceWidget, x: u16, top: u16) -> io::Result<()> {
    queue!(out, MoveTo(x, top))?;
    for (i, dir) in w.expected().iter().enumerate() {
        let color = if i < w.entered().len() { Color::Green } else { Color::White };
        queue!(
            out,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(dir.symbol()),
            Print("  "),
            SetAttribute(Attribute::Reset),
        )?;
    }
    queue!(
        out,
        ResetColor,
        MoveTo(x, top + 2),
        Print(format!("{} / {}", w.entered().len(), w.expected().len())),
    )
}

fn draw_slider(out: &mut impl Write, w: &SliderWidget, x: u16, top: u16) -> io::Result<()> {
    // Two slider units per column
    let slot = usize::from(w.target() / 2);
    let piece = usize::from(w.position() / 2);
    let track: String = (0..=50)
        .map(|i| match i {
            i if i == piece => '■',
            i if i == slot => '□',
            _ => '─',
        })
        .collect();

    queue!(
        out,
        MoveTo(x, top),
        Print(track),
        MoveTo(x, top + 2),
        Print(format!(
            "position {:>3} · slot within ±{}",
            w.position(),
            w.tolerance()
        )),
    )
}

/// Full-screen tick shown between challenges
pub fn draw_success(out: &mut impl Write) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(10, 6),
        SetForegroundColor(Color::Green),
        SetAttribute(Attribute::Bold),
        Print("✓  VERIFIED"),
        SetAttribute(Attribute::Reset),
        ResetColor,
    )?;
    out.flush()
}

fn bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn draw_results(out: &mut impl Write, stats: &Stats, sound_enabled: bool) -> io::Result<()> {
    let gauge = u8::try_from(stats.human_score.clamp(0, 100)).unwrap_or(0);

    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(2, 1),
        SetAttribute(Attribute::Bold),
        Print("RESULTS"),
        SetAttribute(Attribute::Reset),
        MoveTo(2, 3),
        Print(format!("⏱️  Total Time   {}", format_time(stats.total_time_ms))),
        MoveTo(2, 4),
        Print(format!("❌ Errors Made  {}", stats.total_errors)),
        MoveTo(2, 5),
        Print(format!("🎯 Accuracy     {}%", stats.accuracy_display())),
        MoveTo(2, 6),
        Print(format!("⭐ Score        {}", stats.final_score)),
        MoveTo(2, 8),
        Print(format!("Speed Rating: {}", stats.speed_rating.label())),
        MoveTo(2, 9),
        Print(format!("Humanity [{}] {}", bar(gauge, 20), stats.verdict.label())),
        MoveTo(2, 11),
        Print("Time per Challenge"),
    )?;

    for (i, time) in stats.challenge_times_ms.iter().enumerate() {
        queue!(
            out,
            MoveTo(4, 12 + i as u16),
            Print(format!(
                "Challenge {}  {} {}",
                i + 1,
                bar(stats.bar_percent(i), 30),
                format_time(*time)
            )),
        )?;
    }

    let footer = 13 + stats.challenge_times_ms.len() as u16;
    queue!(
        out,
        MoveTo(2, footer),
        SetForegroundColor(Color::Cyan),
        Print("[Enter] PLAY AGAIN"),
        ResetColor,
        MoveTo(2, footer + 1),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("m: sound {} · q: quit", sound_label(sound_enabled))),
        ResetColor,
    )?;
    out.flush()
}
