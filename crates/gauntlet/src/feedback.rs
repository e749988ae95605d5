//! Audio feedback cues.
//!
//! The state machine names a cue; [`Feedback`] turns it into a short melody
//! and plays it on a background task. Playback is fire-and-forget: a muted
//! dispatcher or a failing sink never touches game state.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Named feedback events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    /// Any button press
    Click,
    /// A challenge was solved
    Success,
    /// A wrong answer
    Error,
    /// The whole session was completed
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One note of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub waveform: Waveform,
    /// Delay from the start of the cue
    pub offset_ms: u64,
}

const fn tone(frequency_hz: f32, duration_ms: u64, waveform: Waveform, offset_ms: u64) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        waveform,
        offset_ms,
    }
}

const CLICK: &[Tone] = &[tone(800.0, 50, Waveform::Square, 0)];

// C5 then E5
const SUCCESS: &[Tone] = &[
    tone(523.25, 100, Waveform::Sine, 0),
    tone(659.25, 150, Waveform::Sine, 100),
];

const ERROR: &[Tone] = &[tone(200.0, 200, Waveform::Sawtooth, 0)];

// C5 D5 E5 G5
const VICTORY: &[Tone] = &[
    tone(523.25, 200, Waveform::Sine, 0),
    tone(587.33, 200, Waveform::Sine, 150),
    tone(659.25, 200, Waveform::Sine, 300),
    tone(783.99, 200, Waveform::Sine, 450),
];

impl FeedbackCue {
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Self::Click => CLICK,
            Self::Success => SUCCESS,
            Self::Error => ERROR,
            Self::Victory => VICTORY,
        }
    }
}

/// Something that can make a tone audible
pub trait ToneSink: Send + Sync + 'static {
    fn play(&self, tone: &Tone) -> std::io::Result<()>;
}

/// Rings the terminal bell once per tone.
///
/// Terminals cannot synthesize pitch, so only the rhythm survives.
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play(&self, tone: &Tone) -> std::io::Result<()> {
        tracing::trace!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration_ms,
            waveform = ?tone.waveform,
            "Bell"
        );
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// Cue dispatcher
#[derive(Clone)]
pub struct Feedback {
    sound_enabled: bool,
    sink: Arc<dyn ToneSink>,
}

impl Feedback {
    pub fn new(sound_enabled: bool, sink: Arc<dyn ToneSink>) -> Self {
        Self {
            sound_enabled,
            sink,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        tracing::debug!(enabled, "Sound toggled");
        self.sound_enabled = enabled;
    }

    /// Play a cue in the background. Returns `None` when sound is off.
    ///
    /// Must be called from within a tokio runtime.
    pub fn cue(&self, cue: FeedbackCue) -> Option<JoinHandle<()>> {
        if !self.sound_enabled {
            return None;
        }

        let sink = self.sink.clone();
        Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now();
            for tone in cue.tones() {
                tokio::time::sleep_until(start + Duration::from_millis(tone.offset_ms)).await;
                if let Err(e) = sink.play(tone) {
                    tracing::warn!(cue = ?cue, error = %e, "Tone playback failed");
                    break;
                }
            }
        }))
    }
}
