//! Raw input snapshots.
//!
//! Input reaches the tree as a per-frame [`InputSnapshot`]: where the pointer
//! is, which buttons and keys are down, and how far the wheel moved since the
//! last frame. The [`InputDispatcher`](crate::dispatcher::InputDispatcher)
//! diffs consecutive snapshots into events.

mod terminal;

pub use crossterm::event::{KeyCode, KeyModifiers};
pub use terminal::CrosstermInput;

use std::collections::HashSet;

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Set of mouse buttons currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT = 0b001;
        const RIGHT = 0b010;
        const MIDDLE = 0b100;
    }
}

/// A single mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    pub fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
        }
    }
}

/// Who owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// The pointer is captured by the host (e.g. a first-person camera); the
    /// tree receives keys only.
    Captured,
    /// The pointer is free and drives the tree.
    #[default]
    Free,
}

/// Input state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub pointer: Point,
    pub buttons: MouseButtons,
    /// Wheel notches since the previous snapshot; positive scrolls up.
    pub wheel: i32,
    pub keys: HashSet<KeyCode>,
    pub modifiers: KeyModifiers,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            pointer: Point::ZERO,
            buttons: MouseButtons::empty(),
            wheel: 0,
            keys: HashSet::new(),
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl InputSnapshot {
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(button.flag())
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }
}

/// A per-frame provider of input snapshots.
pub trait InputSource {
    fn snapshot(&mut self) -> InputSnapshot;

    fn mode(&self) -> InputMode {
        InputMode::Free
    }

    fn set_mode(&mut self, _mode: InputMode) {}
}
