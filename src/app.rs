use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};

use crate::input::InputState;
use crate::scores::HighScoreFile;
use crate::sim::GameSession;

/// A stalled terminal must not teleport everything across the field.
const MAX_FRAME_SECS: f32 = 0.1;
const FPS_WINDOW: usize = 60;

pub struct App {
    pub should_quit: bool,
    pub session: GameSession<HighScoreFile>,
    input: InputState,
    started: Instant,
    last_tick: Instant,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
    frames: u64,
}

impl App {
    pub fn new(session: GameSession<HighScoreFile>, release_events: bool) -> Self {
        let now = Instant::now();
        Self {
            should_quit: false,
            session,
            input: InputState::new(release_events),
            started: now,
            last_tick: now,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
            frames: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames simulated since launch.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn on_tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        let frame_secs = now
            .saturating_duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_SECS);
        self.last_tick = now;
        let now_ms = now.saturating_duration_since(self.started).as_millis() as u64;

        let frame = self.input.take_frame(now, frame_secs, now_ms);
        self.session.tick(&frame);
        self.frames += 1;
        self.record_frame(now);
    }

    // Average over the last FPS_WINDOW frames.
    fn record_frame(&mut self, now: Instant) {
        let time = now.saturating_duration_since(self.started).as_secs_f64();
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        {
            self.should_quit = true;
            return;
        }

        self.input.on_key(key, Instant::now());
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        self.input.on_mouse(mouse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        std::fs::write(&path, "0").unwrap();
        let store = HighScoreFile::load(&path).unwrap();
        let session = GameSession::new(store, StdRng::seed_from_u64(5));
        (dir, App::new(session, false))
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let (_dir, mut app) = app();
            app.on_key(key);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_enter_starts_game_on_next_tick() {
        let (_dir, mut app) = app();
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.session.phase(), GamePhase::Title);
        app.on_tick();
        assert_eq!(app.session.phase(), GamePhase::Playing);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_long_stall_is_clamped_to_max_frame() {
        let (_dir, mut app) = app();
        let start = app.started;
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app.tick_at(start + Duration::from_millis(16));
        assert_eq!(app.session.phase(), GamePhase::Playing);

        // First playing frame runs on the fixed initial step.
        app.tick_at(start + Duration::from_millis(32));
        assert_eq!(app.session.simulation_step(), crate::sim::INITIAL_STEP);

        app.tick_at(start + Duration::from_millis(2_032));
        assert_eq!(app.session.simulation_step(), MAX_FRAME_SECS);
    }

    #[test]
    fn test_space_does_not_restart_after_game_over() {
        let (_dir, mut app) = app();
        app.session.start();
        app.session.lose_last_life();
        assert_eq!(app.session.phase(), GamePhase::GameOver);
        app.on_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        app.on_tick();
        assert_eq!(app.session.phase(), GamePhase::GameOver);

        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app.on_tick();
        assert_eq!(app.session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_fps_from_steady_frames() {
        let (_dir, mut app) = app();
        let start = app.started;
        for i in 1..=120 {
            app.tick_at(start + Duration::from_millis(20 * i));
        }
        assert_eq!(app.fps(), 50);
        assert_eq!(app.frames(), 120);
    }
}
