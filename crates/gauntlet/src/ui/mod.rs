//! Terminal front end.
//!
//! One event loop drives the whole game: key presses, clock ticks and the
//! expiry of transient effects all arrive here and are handled one at a time.

mod render;
mod widgets;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use gauntlet_common::{Attempt, Screen};
use std::io::{Stdout, stdout};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::feedback::FeedbackCue;
use crate::session::{Effect, Event, Game, Millis, Stats};
use crate::state::AppState;
use crate::ticker::Ticker;
use render::PlayingView;
use widgets::{Widget, WidgetResponse};

/// Wall-clock time for session timestamps
fn now_ms() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

/// Raw mode and the alternate screen, undone on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)
            .context("Failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive game
pub struct App {
    state: AppState,
    game: Game,
    /// Input state of the active challenge, with its index in the session
    widget: Option<(usize, Widget)>,
    ticker: Option<Ticker>,
    ticks: mpsc::UnboundedSender<u64>,
    elapsed_ms: u64,
    overlay_until: Option<Instant>,
    shake_until: Option<Instant>,
    /// Victory tune waits for the success overlay to clear
    victory_pending: bool,
    stats: Option<Stats>,
}

impl App {
    fn new(state: AppState, ticks: mpsc::UnboundedSender<u64>) -> Self {
        Self {
            state,
            game: Game::default(),
            widget: None,
            ticker: None,
            ticks,
            elapsed_ms: 0,
            overlay_until: None,
            shake_until: None,
            victory_pending: false,
            stats: None,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.overlay_until, self.shake_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn overlay_active(&self) -> bool {
        self.overlay_until.is_some()
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<Flow> {
        if key.kind != KeyEventKind::Press {
            return Ok(Flow::Continue);
        }
        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key.code == KeyCode::Esc {
            return Ok(Flow::Quit);
        }

        match self.game.screen() {
            Screen::Start => match key.code {
                KeyCode::Enter => self.start_game()?,
                KeyCode::Char('m') => self.toggle_sound(),
                KeyCode::Char('q') => return Ok(Flow::Quit),
                _ => {}
            },
            Screen::Playing => {
                if self.overlay_active() {
                    return Ok(Flow::Continue);
                }
                let response = match self.widget.as_mut() {
                    Some((_, widget)) => widget.handle_key(key),
                    None => WidgetResponse::Ignored,
                };
                match response {
                    WidgetResponse::Ignored | WidgetResponse::Changed => {}
                    WidgetResponse::Clicked => {
                        self.state.feedback.cue(FeedbackCue::Click);
                    }
                    WidgetResponse::Submitted(attempt) => self.submit(&attempt)?,
                }
            }
            Screen::Results => {
                if self.overlay_active() {
                    return Ok(Flow::Continue);
                }
                match key.code {
                    KeyCode::Enter => self.dispatch(Event::PlayAgain)?,
                    KeyCode::Char('m') => self.toggle_sound(),
                    KeyCode::Char('q') => return Ok(Flow::Quit),
                    _ => {}
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn toggle_sound(&mut self) {
        let enabled = !self.state.feedback.sound_enabled();
        self.state.feedback.set_sound_enabled(enabled);
    }

    fn start_game(&mut self) -> Result<()> {
        let challenges = self.state.generator.generate_session(&mut self.state.rng)?;
        self.dispatch(Event::StartGame {
            challenges,
            now: now_ms(),
        })
    }

    /// Check an answer; every submission clicks like a button press
    fn submit(&mut self, attempt: &Attempt) -> Result<()> {
        self.state.feedback.cue(FeedbackCue::Click);
        let effects = self.game.submit(attempt, now_ms())?;
        self.perform(effects);
        Ok(())
    }

    /// Feed an event to the game and carry out the effects it asks for
    fn dispatch(&mut self, event: Event) -> Result<()> {
        let effects = self.game.apply(event)?;
        self.perform(effects);
        Ok(())
    }

    fn perform(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Cue(FeedbackCue::Victory) => self.victory_pending = true,
                Effect::Cue(cue) => {
                    match cue {
                        FeedbackCue::Success => {
                            self.overlay_until = Some(Instant::now() + self.state.success_overlay());
                        }
                        FeedbackCue::Error => {
                            self.shake_until = Some(Instant::now() + self.state.shake());
                            if let Some((_, widget)) = self.widget.as_mut() {
                                widget.reject();
                            }
                        }
                        _ => {}
                    }
                    self.state.feedback.cue(cue);
                }
                Effect::StartTicker => {
                    self.ticker = Some(Ticker::spawn(self.state.tick_interval(), self.ticks.clone()));
                }
                Effect::StopTicker => {
                    if let Some(mut ticker) = self.ticker.take() {
                        ticker.cancel();
                    }
                }
            }
        }

        self.sync_with_game();
    }

    /// Rebuild derived view state after a transition
    fn sync_with_game(&mut self) {
        match &self.game {
            Game::Start => {
                self.widget = None;
                self.stats = None;
                self.elapsed_ms = 0;
                self.ticker = None;
                self.overlay_until = None;
                self.shake_until = None;
                self.victory_pending = false;
            }
            Game::Playing(session) => {
                let index = session.current_index();
                if self.widget.as_ref().map(|(i, _)| *i) != Some(index) {
                    let widget = Widget::new(&session.current().spec, &mut self.state.rng);
                    self.widget = Some((index, widget));
                    self.shake_until = None;
                }
                self.elapsed_ms = self.game.elapsed_ms(now_ms()).unwrap_or(0);
            }
            Game::Results(completed) => {
                if self.stats.is_none() {
                    let stats = Stats::compute(completed);
                    tracing::info!(
                        score = stats.final_score,
                        human_score = stats.human_score,
                        "Session scored"
                    );
                    self.stats = Some(stats);
                }
                self.widget = None;
                self.shake_until = None;
                self.elapsed_ms = completed.total_time_ms();
            }
        }
    }

    fn on_tick(&mut self) {
        // Ticks queued before a cancel can still be in the channel
        if self.game.screen() == Screen::Playing {
            self.elapsed_ms = self.game.elapsed_ms(now_ms()).unwrap_or(0);
        }
    }

    fn on_deadline(&mut self) {
        let now = Instant::now();
        if self.overlay_until.is_some_and(|t| t <= now) {
            self.overlay_until = None;
            if std::mem::take(&mut self.victory_pending) {
                self.state.feedback.cue(FeedbackCue::Victory);
            }
        }
        if self.shake_until.is_some_and(|t| t <= now) {
            self.shake_until = None;
        }
    }

    fn draw(&self, out: &mut Stdout) -> std::io::Result<()> {
        if self.overlay_active() {
            return render::draw_success(out);
        }

        match &self.game {
            Game::Start => render::draw_start(
                out,
                self.state.config.challenge_count,
                self.state.feedback.sound_enabled(),
            ),
            Game::Playing(session) => {
                let Some((_, widget)) = &self.widget else {
                    return Ok(());
                };
                render::draw_playing(
                    out,
                    &PlayingView {
                        index: session.current_index(),
                        total: session.len(),
                        kind: session.current().spec.kind,
                        elapsed_ms: self.elapsed_ms,
                        question: &session.current().spec.question,
                        widget,
                        shaking: self.shake_until.is_some(),
                    },
                )
            }
            Game::Results(_) => match &self.stats {
                Some(stats) => render::draw_results(out, stats, self.state.feedback.sound_enabled()),
                None => Ok(()),
            },
        }
    }
}

/// Run the game until the player quits.
///
/// Returns the stats of the last completed session, if any.
pub async fn run(state: AppState) -> Result<Option<Stats>> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut app = App::new(state, tick_tx);
    let mut last_stats = None;

    let _guard = TerminalGuard::enter()?;
    let mut out = stdout();
    let mut events = EventStream::new();

    app.draw(&mut out).context("Failed to draw")?;

    loop {
        let deadline = app.next_deadline();

        let flow = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) => app.on_key(key)?,
                Some(Ok(_)) => Flow::Continue,
                Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                None => Flow::Quit,
            },
            Some(_) = tick_rx.recv() => {
                app.on_tick();
                Flow::Continue
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                app.on_deadline();
                Flow::Continue
            }
        };

        if app.stats.is_some() {
            last_stats.clone_from(&app.stats);
        }
        if flow == Flow::Quit {
            break;
        }

        app.draw(&mut out).context("Failed to draw")?;
    }

    tracing::debug!("Game loop finished");
    Ok(last_stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::feedback::{Tone, ToneSink};
    use std::sync::Arc;

    struct Silent;

    impl ToneSink for Silent {
        fn play(&self, _tone: &Tone) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn app() -> App {
        let config = AppConfig {
            seed: Some(5),
            ..AppConfig::default()
        };
        let state = AppState::with_sink(config, Arc::new(Silent)).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(state, tx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_enter_starts_session() {
        let mut app = app();
        assert_eq!(app.on_key(press(KeyCode::Enter)).unwrap(), Flow::Continue);
        assert_eq!(app.game.screen(), Screen::Playing);
        assert!(app.ticker.is_some());
        assert!(matches!(app.widget, Some((0, _))));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app();
        assert_eq!(app.on_key(press(KeyCode::Char('q'))).unwrap(), Flow::Quit);
        assert_eq!(app.on_key(press(KeyCode::Esc)).unwrap(), Flow::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c).unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn test_sound_toggle() {
        let mut app = app();
        assert!(app.state.feedback.sound_enabled());
        app.on_key(press(KeyCode::Char('m'))).unwrap();
        assert!(!app.state.feedback.sound_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_reaches_results() {
        let mut app = app();
        app.on_key(press(KeyCode::Enter)).unwrap();

        for _ in 0..3 {
            app.dispatch(Event::Solved { now: now_ms() }).unwrap();
            assert!(app.overlay_active());
            // Keys are ignored under the overlay
            app.on_key(press(KeyCode::Enter)).unwrap();
            tokio::time::advance(app.state.success_overlay()).await;
            app.on_deadline();
        }

        assert_eq!(app.game.screen(), Screen::Results);
        assert!(app.stats.is_some());
        assert!(app.ticker.is_none());
        assert!(!app.victory_pending);

        app.on_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.game.screen(), Screen::Start);
        assert!(app.stats.is_none());
    }

    fn answer_for(spec: &gauntlet_common::ChallengeSpec) -> Attempt {
        use gauntlet_common::CorrectAnswer;
        match &spec.answer {
            CorrectAnswer::Text { text } => Attempt::Text(text.to_lowercase()),
            CorrectAnswer::Tiles { ids } => Attempt::Tiles(ids.clone()),
            CorrectAnswer::Sequence { sequence } => Attempt::Sequence(sequence.clone()),
            CorrectAnswer::Target { target, .. } => Attempt::Slider(*target),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_submission_is_judged_by_game() {
        let mut app = app();
        app.on_key(press(KeyCode::Enter)).unwrap();

        // Empty text answers no challenge kind
        app.submit(&Attempt::Text(String::new())).unwrap();

        let Game::Playing(session) = &app.game else {
            panic!("left the playing screen");
        };
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current().error_count, 1);
        assert!(app.shake_until.is_some());
        assert!(!app.overlay_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_submission_advances() {
        let mut app = app();
        app.on_key(press(KeyCode::Enter)).unwrap();

        let attempt = match &app.game {
            Game::Playing(session) => answer_for(&session.current().spec),
            _ => panic!("not playing"),
        };
        app.submit(&attempt).unwrap();

        assert!(app.overlay_active());
        assert!(app.shake_until.is_none());
        assert!(matches!(app.widget, Some((1, _))));
    }

    #[derive(Default)]
    struct Recording {
        played: std::sync::Mutex<Vec<f32>>,
    }

    impl ToneSink for Recording {
        fn play(&self, tone: &Tone) -> std::io::Result<()> {
            self.played.lock().unwrap().push(tone.frequency_hz);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_submission_clicks() {
        let sink = Arc::new(Recording::default());
        let config = AppConfig {
            seed: Some(5),
            ..AppConfig::default()
        };
        let state = AppState::with_sink(config, sink.clone()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(state, tx);

        app.on_key(press(KeyCode::Enter)).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        sink.played.lock().unwrap().clear();

        app.submit(&Attempt::Text(String::new())).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let click = FeedbackCue::Click.tones()[0].frequency_hz;
        let error = FeedbackCue::Error.tones()[0].frequency_hz;
        let played = sink.played.lock().unwrap();
        assert_eq!(played.len(), 2);
        assert!(played.contains(&click));
        assert!(played.contains(&error));
    }

    #[tokio::test]
    async fn test_submit_outside_play_is_rejected() {
        let mut app = app();
        assert!(app.submit(&Attempt::Slider(75)).is_err());
        assert_eq!(app.game.screen(), Screen::Start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shakes_then_settles() {
        let mut app = app();
        app.on_key(press(KeyCode::Enter)).unwrap();
        app.dispatch(Event::Failed).unwrap();
        assert!(app.shake_until.is_some());
        assert_eq!(app.next_deadline(), app.shake_until);

        tokio::time::advance(app.state.shake()).await;
        app.on_deadline();
        assert!(app.shake_until.is_none());
        let Game::Playing(session) = &app.game else {
            panic!("left the playing screen");
        };
        assert_eq!(session.current().error_count, 1);
    }
}
