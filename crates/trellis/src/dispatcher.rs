//! Turning per-frame input snapshots into tree events.
//!
//! The dispatcher compares each snapshot with the previous one. Keys that
//! went down fire KeyDown then KeyPress; held keys repeat KeyPress after
//! [`key_repeat_delay`](crate::config::ScreenConfig::key_repeat_delay) and
//! then every
//! [`key_repeat_interval`](crate::config::ScreenConfig::key_repeat_interval);
//! released keys fire KeyUp. Pointer movement, buttons and the wheel follow,
//! unless the host has captured the pointer.

use std::collections::HashMap;
use std::time::Duration;

use crate::events::KeyEventArgs;
use crate::input::{InputMode, InputSnapshot, KeyCode, KeyModifiers, MouseButton};
use crate::tree::UiTree;

/// Root-owned input state carried between frames.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    previous: InputSnapshot,
    /// Time left until the next repeat of each held key.
    repeats: HashMap<KeyCode, Duration>,
    /// Whether StartDrag was already offered for the current left press.
    drag_offered: bool,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot seen by the previous [`dispatch`](Self::dispatch).
    pub fn previous(&self) -> &InputSnapshot {
        &self.previous
    }

    /// Dispatch the difference between `snapshot` and the previous one.
    /// `elapsed` is the time since the previous call.
    pub fn dispatch(&mut self, tree: &mut UiTree, snapshot: &InputSnapshot, mode: InputMode, elapsed: Duration) {
        self.dispatch_keys(tree, snapshot, elapsed);
        if mode == InputMode::Free {
            self.dispatch_pointer(tree, snapshot);
        }
        self.previous = snapshot.clone();
    }

    fn dispatch_keys(&mut self, tree: &mut UiTree, snapshot: &InputSnapshot, elapsed: Duration) {
        let modifiers = snapshot.modifiers;

        let released: Vec<KeyCode> = self
            .previous
            .keys
            .iter()
            .filter(|key| !snapshot.keys.contains(key))
            .copied()
            .collect();
        for key in released {
            self.repeats.remove(&key);
            tree.dispatch_key_up(&mut KeyEventArgs::new(key, modifiers));
        }

        let delay = tree.config().key_repeat_delay;
        let interval = tree.config().key_repeat_interval;
        for key in snapshot.keys.iter().copied() {
            if !self.previous.keys.contains(&key) {
                tree.dispatch_key_down(&mut KeyEventArgs::new(key, modifiers));
                Self::press(tree, key, modifiers, false);
                self.repeats.insert(key, delay);
                continue;
            }
            let Some(remaining) = self.repeats.get_mut(&key) else {
                continue;
            };
            let mut budget = elapsed;
            while budget >= *remaining {
                budget -= *remaining;
                *remaining = interval;
                Self::press(tree, key, modifiers, true);
                if interval.is_zero() {
                    break;
                }
            }
            *remaining -= budget;
        }
    }

    /// Fire KeyPress. An unhandled Tab moves focus through the tree.
    fn press(tree: &mut UiTree, key: KeyCode, modifiers: KeyModifiers, repeat: bool) {
        let mut args = KeyEventArgs::new(key, modifiers);
        args.repeat = repeat;
        if tree.dispatch_key_press(&mut args) {
            return;
        }
        let forward = match key {
            KeyCode::Tab => !modifiers.contains(KeyModifiers::SHIFT),
            KeyCode::BackTab => false,
            _ => return,
        };
        if !tree.move_focus(forward) && tree.config().wrap_tab_navigation {
            log::trace!("tab navigation wrapped");
            tree.focus_first(forward);
        }
    }

    fn dispatch_pointer(&mut self, tree: &mut UiTree, snapshot: &InputSnapshot) {
        let pointer = snapshot.pointer;
        let buttons = snapshot.buttons;
        let modifiers = snapshot.modifiers;

        if pointer != self.previous.pointer {
            let left_held = self.previous.is_down(MouseButton::Left) && snapshot.is_down(MouseButton::Left);
            if left_held && !self.drag_offered && !tree.dragging() && tree.captured().is_none() {
                self.drag_offered = true;
                tree.begin_drag(self.previous.pointer);
            }
            tree.dispatch_mouse_move(pointer, buttons, modifiers);
        }

        for button in MouseButton::ALL {
            let was_down = self.previous.is_down(button);
            let is_down = snapshot.is_down(button);
            if is_down && !was_down {
                if button == MouseButton::Left {
                    self.drag_offered = false;
                }
                tree.dispatch_mouse_down(pointer, button, buttons, modifiers);
            } else if was_down && !is_down {
                if button == MouseButton::Left && tree.dragging() {
                    tree.end_drag(pointer);
                }
                tree.dispatch_mouse_up(pointer, button, buttons, modifiers);
            }
        }

        if snapshot.wheel != 0 {
            tree.dispatch_mouse_wheel(pointer, snapshot.wheel, buttons, modifiers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::control::ControlId;
    use crate::events::EventHandlers;
    use crate::geometry::Size;
    use crate::input::InputSource;
    use crate::testing::ManualInput;
    use crate::tree::TreeOptions;
    use crate::widgets::Button;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record_keys(tree: &mut UiTree, id: ControlId, log: &Log) {
        let node = tree.get_mut(id).unwrap();
        let entries: [(&str, &mut EventHandlers<KeyEventArgs>); 3] = [
            ("down", &mut node.events.key_down),
            ("press", &mut node.events.key_press),
            ("up", &mut node.events.key_up),
        ];
        for (name, handlers) in entries {
            let log = log.clone();
            handlers.add(move |_, _, args| {
                let suffix = if args.repeat { " repeat" } else { "" };
                log.borrow_mut().push(format!("{} {:?}{}", name, args.key, suffix));
            });
        }
    }

    fn run(dispatcher: &mut InputDispatcher, tree: &mut UiTree, input: &mut ManualInput, ms: u64) {
        let snapshot = input.snapshot();
        dispatcher.dispatch(tree, &snapshot, input.mode(), Duration::from_millis(ms));
    }

    #[test]
    fn test_key_repeat_schedule() {
        let options = TreeOptions::default().with_config(
            ScreenConfig::default().with_key_repeat(Duration::from_millis(500), Duration::from_millis(50)),
        );
        let mut tree = UiTree::with_options(Size::new(20, 5), options).unwrap();
        let root = tree.root();
        let log: Log = Rc::default();
        record_keys(&mut tree, root, &log);

        let mut dispatcher = InputDispatcher::new();
        let mut input = ManualInput::new();
        input.key_down(KeyCode::Char('a'));
        run(&mut dispatcher, &mut tree, &mut input, 16);
        assert_eq!(*log.borrow(), vec!["down Char('a')", "press Char('a')"]);

        run(&mut dispatcher, &mut tree, &mut input, 400);
        assert_eq!(log.borrow().len(), 2);
        // 520 ms held: the first repeat is due.
        run(&mut dispatcher, &mut tree, &mut input, 120);
        assert_eq!(log.borrow().len(), 3);
        // Two more intervals.
        run(&mut dispatcher, &mut tree, &mut input, 100);
        assert_eq!(log.borrow().len(), 5);
        assert_eq!(log.borrow()[4], "press Char('a') repeat");

        input.key_up(KeyCode::Char('a'));
        run(&mut dispatcher, &mut tree, &mut input, 1000);
        assert_eq!(log.borrow().last().map(String::as_str), Some("up Char('a')"));
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn test_unhandled_tab_cycles_focus_and_wraps() {
        let mut tree = UiTree::new(Size::new(20, 5));
        let root = tree.root();
        let a = Button::create(&mut tree, root, "a").unwrap();
        let b = Button::create(&mut tree, root, "b").unwrap();
        let mut dispatcher = InputDispatcher::new();
        let mut input = ManualInput::new();

        let mut tap = |tree: &mut UiTree, key: KeyCode, modifiers: KeyModifiers| {
            input.set_modifiers(modifiers).key_down(key);
            run(&mut dispatcher, tree, &mut input, 16);
            input.key_up(key).set_modifiers(KeyModifiers::NONE);
            run(&mut dispatcher, tree, &mut input, 16);
        };

        tap(&mut tree, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(tree.focused(), Some(a));
        tap(&mut tree, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(tree.focused(), Some(b));
        tap(&mut tree, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(tree.focused(), Some(a));
        tap(&mut tree, KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(tree.focused(), Some(b));
        tap(&mut tree, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(tree.focused(), Some(a));
    }

    #[test]
    fn test_tab_without_wrap_stops_at_end() {
        let options = TreeOptions::default()
            .with_config(ScreenConfig::default().with_wrap_tab_navigation(false));
        let mut tree = UiTree::with_options(Size::new(20, 5), options).unwrap();
        let root = tree.root();
        let a = Button::create(&mut tree, root, "a").unwrap();
        tree.focus(a);
        let mut dispatcher = InputDispatcher::new();
        let mut input = ManualInput::new();
        input.key_down(KeyCode::Tab);
        run(&mut dispatcher, &mut tree, &mut input, 16);
        assert_eq!(tree.focused(), Some(a));
    }

    #[test]
    fn test_captured_mode_ignores_pointer() {
        let mut tree = UiTree::new(Size::new(20, 5));
        let root = tree.root();
        let button = Button::create(&mut tree, root, "ok").unwrap();
        tree.perform_layout();
        let clicks = Rc::new(RefCell::new(0));
        let c = clicks.clone();
        Button::on_executed(&mut tree, button, move |_, _, _| *c.borrow_mut() += 1).unwrap();

        let mut dispatcher = InputDispatcher::new();
        let mut input = ManualInput::new();
        input.set_mode(InputMode::Captured);
        input.move_to(1, 0).press(MouseButton::Left);
        run(&mut dispatcher, &mut tree, &mut input, 16);
        input.release(MouseButton::Left);
        run(&mut dispatcher, &mut tree, &mut input, 16);
        assert_eq!(*clicks.borrow(), 0);

        input.set_mode(InputMode::Free);
        input.press(MouseButton::Left);
        run(&mut dispatcher, &mut tree, &mut input, 16);
        input.release(MouseButton::Left);
        run(&mut dispatcher, &mut tree, &mut input, 16);
        assert_eq!(*clicks.borrow(), 1);
    }
}
