//! Terminal input through crossterm.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};

use super::{InputMode, InputSnapshot, InputSource, KeyCode, MouseButton, MouseButtons};
use crate::geometry::{Point, Size};

/// Folds crossterm events into snapshots, one cell per unit.
///
/// Most terminals report key presses but not releases. Unless
/// [`with_release_events`](Self::with_release_events) is set, a pressed key
/// stays down for exactly one snapshot.
#[derive(Debug, Default)]
pub struct CrosstermInput {
    state: InputSnapshot,
    pending_release: Vec<KeyCode>,
    reports_release: bool,
    resized: Option<Size>,
    mode: InputMode,
}

impl CrosstermInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// The terminal sends key release events (keyboard enhancement enabled).
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.reports_release = enabled;
        self
    }

    /// The last terminal size reported since the previous call.
    pub fn take_resize(&mut self) -> Option<Size> {
        self.resized.take()
    }

    /// Start a new frame: drop one-frame keys and the wheel accumulator.
    pub fn begin_frame(&mut self) {
        for key in self.pending_release.drain(..) {
            self.state.keys.remove(&key);
        }
        self.state.wheel = 0;
    }

    /// Fold a single terminal event into the current state.
    pub fn apply_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                self.state.modifiers = key.modifiers;
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        self.state.keys.insert(key.code);
                        if !self.reports_release {
                            self.pending_release.push(key.code);
                        }
                    }
                    KeyEventKind::Release => {
                        self.state.keys.remove(&key.code);
                    }
                }
            }
            Event::Mouse(mouse) => {
                self.state.pointer = Point::new(mouse.column as i32, mouse.row as i32);
                self.state.modifiers = mouse.modifiers;
                match mouse.kind {
                    MouseEventKind::Down(button) | MouseEventKind::Drag(button) => {
                        self.state.buttons.insert(convert_button(button).flag());
                    }
                    MouseEventKind::Up(button) => {
                        self.state.buttons.remove(convert_button(button).flag());
                    }
                    MouseEventKind::ScrollUp => self.state.wheel += 1,
                    MouseEventKind::ScrollDown => self.state.wheel -= 1,
                    MouseEventKind::Moved
                    | MouseEventKind::ScrollLeft
                    | MouseEventKind::ScrollRight => {}
                }
            }
            Event::Resize(width, height) => {
                self.resized = Some(Size::new(width as i32, height as i32));
            }
            Event::FocusLost => {
                self.state.buttons = MouseButtons::empty();
                self.state.keys.clear();
            }
            _ => {}
        }
    }

    /// The state accumulated so far.
    pub fn current(&self) -> &InputSnapshot {
        &self.state
    }
}

fn convert_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
    }
}

impl InputSource for CrosstermInput {
    fn snapshot(&mut self) -> InputSnapshot {
        self.begin_frame();
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(event) => self.apply_event(event),
                    Err(e) => {
                        log::warn!("failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    log::warn!("failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
        self.state.clone()
    }

    fn mode(&self) -> InputMode {
        self.mode
    }

    fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, KeyModifiers, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_press_without_release_lasts_one_frame() {
        let mut input = CrosstermInput::new();
        input.begin_frame();
        input.apply_event(key(KeyCode::Char('a'), KeyEventKind::Press));
        assert!(input.current().is_key_down(KeyCode::Char('a')));

        input.begin_frame();
        assert!(!input.current().is_key_down(KeyCode::Char('a')));
    }

    #[test]
    fn test_release_events_keep_key_held() {
        let mut input = CrosstermInput::new().with_release_events(true);
        input.apply_event(key(KeyCode::Tab, KeyEventKind::Press));
        input.begin_frame();
        assert!(input.current().is_key_down(KeyCode::Tab));
        input.apply_event(key(KeyCode::Tab, KeyEventKind::Release));
        assert!(!input.current().is_key_down(KeyCode::Tab));
    }

    #[test]
    fn test_mouse_buttons_and_wheel() {
        let mut input = CrosstermInput::new();
        input.apply_event(mouse(
            MouseEventKind::Down(event::MouseButton::Left),
            4,
            2,
        ));
        input.apply_event(mouse(MouseEventKind::ScrollUp, 4, 2));
        input.apply_event(mouse(MouseEventKind::ScrollUp, 4, 2));
        let state = input.current();
        assert_eq!(state.pointer, Point::new(4, 2));
        assert!(state.is_down(MouseButton::Left));
        assert_eq!(state.wheel, 2);

        input.begin_frame();
        input.apply_event(mouse(MouseEventKind::Up(event::MouseButton::Left), 5, 2));
        assert!(!input.current().is_down(MouseButton::Left));
        assert_eq!(input.current().wheel, 0);
    }

    #[test]
    fn test_resize_is_taken_once() {
        let mut input = CrosstermInput::new();
        input.apply_event(Event::Resize(80, 24));
        assert_eq!(input.take_resize(), Some(Size::new(80, 24)));
        assert_eq!(input.take_resize(), None);
    }
}
