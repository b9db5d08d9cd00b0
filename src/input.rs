use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use crate::sim::FrameInput;

/// Without release events, a single press counts as held this long; long
/// enough to bridge the terminal's delay before auto-repeat starts.
const FIRST_PRESS_HOLD: Duration = Duration::from_millis(500);
/// Once auto-repeat is flowing, a key is released when repeats stop.
const REPEAT_HOLD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Thrust,
    Left,
    Right,
}

impl Control {
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::Thrust),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct KeyHold {
    last_seen: Option<Instant>,
    repeating: bool,
}

impl KeyHold {
    fn press(&mut self, now: Instant, release_events: bool) {
        if !release_events {
            self.repeating = self.is_held(now, false);
        }
        self.last_seen = Some(now);
    }

    fn release(&mut self) {
        self.last_seen = None;
        self.repeating = false;
    }

    fn is_held(&self, now: Instant, release_events: bool) -> bool {
        match self.last_seen {
            None => false,
            Some(_) if release_events => true,
            Some(at) => {
                let window = if self.repeating { REPEAT_HOLD } else { FIRST_PRESS_HOLD };
                now.saturating_duration_since(at) <= window
            }
        }
    }
}

/// Turns the terminal's key stream into per-frame held state and edge events.
#[derive(Debug, Default)]
pub struct InputState {
    /// True when the terminal reports key releases.
    release_events: bool,
    thrust: KeyHold,
    left: KeyHold,
    right: KeyHold,
    fire: bool,
    start: bool,
}

impl InputState {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            ..Default::default()
        }
    }

    fn hold_mut(&mut self, control: Control) -> &mut KeyHold {
        match control {
            Control::Thrust => &mut self.thrust,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        let release_events = self.release_events;
        if let Some(control) = Control::from_key(key.code) {
            let hold = self.hold_mut(control);
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => hold.press(now, release_events),
                KeyEventKind::Release => hold.release(),
            }
            return;
        }

        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            // Space only fires; restart needs Enter or a click
            KeyCode::Char(' ') => self.fire = true,
            KeyCode::Enter => self.start = true,
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(_) = mouse.kind {
            self.start = true;
        }
    }

    /// Snapshot for one frame. Edge events are consumed.
    pub fn take_frame(&mut self, now: Instant, frame_secs: f32, now_ms: u64) -> FrameInput {
        let release_events = self.release_events;
        FrameInput {
            thrust: self.thrust.is_held(now, release_events),
            turn_left: self.left.is_held(now, release_events),
            turn_right: self.right.is_held(now, release_events),
            fire: std::mem::take(&mut self.fire),
            start: std::mem::take(&mut self.start),
            frame_secs,
            now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_release_events_give_exact_hold() {
        let t0 = Instant::now();
        let mut input = InputState::new(true);
        input.on_key(press(KeyCode::Up), t0);
        let later = t0 + Duration::from_secs(5);
        assert!(input.take_frame(later, 0.016, 0).thrust);
        input.on_key(release(KeyCode::Up), later);
        assert!(!input.take_frame(later, 0.016, 0).thrust);
    }

    #[test]
    fn test_single_press_holds_for_first_window() {
        let t0 = Instant::now();
        let mut input = InputState::new(false);
        input.on_key(press(KeyCode::Char('a')), t0);
        assert!(input.take_frame(t0 + Duration::from_millis(400), 0.016, 0).turn_left);
        assert!(!input.take_frame(t0 + Duration::from_millis(600), 0.016, 0).turn_left);
    }

    #[test]
    fn test_auto_repeat_releases_quickly() {
        let t0 = Instant::now();
        let mut input = InputState::new(false);
        input.on_key(press(KeyCode::Right), t0);
        let t1 = t0 + Duration::from_millis(300);
        input.on_key(press(KeyCode::Right), t1);
        assert!(input.take_frame(t1 + Duration::from_millis(50), 0.016, 0).turn_right);
        assert!(!input.take_frame(t1 + Duration::from_millis(150), 0.016, 0).turn_right);
    }

    #[test]
    fn test_fire_is_consumed_once() {
        let t0 = Instant::now();
        let mut input = InputState::new(false);
        input.on_key(press(KeyCode::Char(' ')), t0);
        let frame = input.take_frame(t0, 0.016, 10);
        assert!(frame.fire);
        assert!(!frame.start, "space must not restart a game");
        assert_eq!(frame.now_ms, 10);
        assert!(!input.take_frame(t0, 0.016, 20).fire);
    }

    #[test]
    fn test_enter_and_click_start() {
        let t0 = Instant::now();
        let mut input = InputState::new(false);
        input.on_key(press(KeyCode::Enter), t0);
        assert!(input.take_frame(t0, 0.0, 0).start);

        input.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        let frame = input.take_frame(t0, 0.0, 0);
        assert!(frame.start);
        assert!(!frame.fire);
    }
}
