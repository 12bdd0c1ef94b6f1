//! Event arguments and handler lists.
//!
//! Every routed event carries two flags:
//!
//! - `handled`: set by a control that consumed the event. Ancestors skip their
//!   local handling once it is set.
//! - `bubbled`: set by the tree when a descendant already received the event,
//!   so an ancestor can tell it is seeing the event second-hand.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::control::ControlId;
use crate::geometry::{Point, Size};
use crate::input::{KeyCode, KeyModifiers, MouseButton, MouseButtons};
use crate::render::Brush;
use crate::tree::UiTree;

/// A handler for events of argument type `A`.
pub type Handler<A> = Rc<dyn Fn(&mut UiTree, ControlId, &mut A)>;

/// An ordered list of handlers.
///
/// Cloning is cheap and is how the tree invokes a list while it is itself
/// mutably borrowed: handlers added during invocation run from the next event.
pub struct EventHandlers<A> {
    handlers: Vec<Handler<A>>,
}

impl<A> Default for EventHandlers<A> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<A> Clone for EventHandlers<A> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<A> fmt::Debug for EventHandlers<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

impl<A> EventHandlers<A> {
    pub fn add(&mut self, handler: impl Fn(&mut UiTree, ControlId, &mut A) + 'static) {
        self.handlers.push(Rc::new(handler));
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler in registration order.
    pub fn invoke(&self, tree: &mut UiTree, sender: ControlId, args: &mut A) {
        for handler in &self.handlers {
            handler(tree, sender, args);
        }
    }
}

/// Pointer arguments. `position` is local to the receiving control's box.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEventArgs {
    pub position: Point,
    pub screen_position: Point,
    pub buttons: MouseButtons,
    /// The button that changed, for down/up/click.
    pub button: Option<MouseButton>,
    /// Wheel notches, positive scrolls up.
    pub wheel_delta: i32,
    pub modifiers: KeyModifiers,
    pub handled: bool,
    pub bubbled: bool,
    pub(crate) focus_taken: bool,
}

impl MouseEventArgs {
    pub fn new(screen_position: Point, buttons: MouseButtons) -> Self {
        Self {
            position: screen_position,
            screen_position,
            buttons,
            button: None,
            wheel_delta: 0,
            modifiers: KeyModifiers::NONE,
            handled: false,
            bubbled: false,
            focus_taken: false,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_wheel(mut self, delta: i32) -> Self {
        self.wheel_delta = delta;
        self
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keyboard arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEventArgs {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    /// True for KeyPress events produced by auto-repeat.
    pub repeat: bool,
    pub handled: bool,
    pub bubbled: bool,
}

impl KeyEventArgs {
    pub fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers,
            repeat: false,
            handled: false,
            bubbled: false,
        }
    }

    pub fn has_modifier(&self, modifier: KeyModifiers) -> bool {
        self.modifiers.contains(modifier)
    }
}

/// Payload carried by a drag operation.
pub type DragContent = Rc<dyn Any>;

/// Drag-and-drop arguments.
///
/// A control that accepts `StartDrag` sets `handled` and fills in `content`
/// and optionally an icon; the tree records it as `source`.
#[derive(Clone)]
pub struct DragEventArgs {
    pub position: Point,
    pub screen_position: Point,
    pub content: Option<DragContent>,
    pub icon: Option<Rc<dyn Brush>>,
    pub icon_size: Size,
    pub source: Option<ControlId>,
    pub handled: bool,
    pub bubbled: bool,
}

impl fmt::Debug for DragEventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEventArgs")
            .field("position", &self.position)
            .field("screen_position", &self.screen_position)
            .field("has_content", &self.content.is_some())
            .field("has_icon", &self.icon.is_some())
            .field("icon_size", &self.icon_size)
            .field("source", &self.source)
            .field("handled", &self.handled)
            .field("bubbled", &self.bubbled)
            .finish()
    }
}

impl DragEventArgs {
    pub fn new(screen_position: Point) -> Self {
        Self {
            position: screen_position,
            screen_position,
            content: None,
            icon: None,
            icon_size: Size::ZERO,
            source: None,
            handled: false,
            bubbled: false,
        }
    }

    /// Downcast the payload.
    pub fn content_as<T: 'static>(&self) -> Option<&T> {
        self.content.as_ref()?.downcast_ref::<T>()
    }
}

/// Arguments routed by position through the tree.
pub(crate) trait PointerArgs {
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn handled(&self) -> bool;
    fn set_handled(&mut self);
    fn set_bubbled(&mut self);
}

impl PointerArgs for MouseEventArgs {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn handled(&self) -> bool {
        self.handled
    }

    fn set_handled(&mut self) {
        self.handled = true;
    }

    fn set_bubbled(&mut self) {
        self.bubbled = true;
    }
}

impl PointerArgs for DragEventArgs {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn handled(&self) -> bool {
        self.handled
    }

    fn set_handled(&mut self) {
        self.handled = true;
    }

    fn set_bubbled(&mut self) {
        self.bubbled = true;
    }
}

/// Old and new value of a numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChangedArgs {
    pub old_value: i32,
    pub new_value: i32,
}

/// Old and new selected index of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChangedArgs {
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
}

/// The public event lists every control carries.
#[derive(Debug, Default, Clone)]
pub struct ControlEvents {
    pub mouse_enter: EventHandlers<MouseEventArgs>,
    pub mouse_leave: EventHandlers<MouseEventArgs>,
    pub mouse_down: EventHandlers<MouseEventArgs>,
    pub mouse_up: EventHandlers<MouseEventArgs>,
    pub mouse_move: EventHandlers<MouseEventArgs>,
    pub mouse_wheel: EventHandlers<MouseEventArgs>,
    pub mouse_click: EventHandlers<MouseEventArgs>,
    pub left_mouse_click: EventHandlers<MouseEventArgs>,
    pub right_mouse_click: EventHandlers<MouseEventArgs>,
    pub key_down: EventHandlers<KeyEventArgs>,
    pub key_up: EventHandlers<KeyEventArgs>,
    pub key_press: EventHandlers<KeyEventArgs>,
    pub got_focus: EventHandlers<()>,
    pub lost_focus: EventHandlers<()>,
    pub start_drag: EventHandlers<DragEventArgs>,
    pub drop_enter: EventHandlers<DragEventArgs>,
    pub drop_leave: EventHandlers<DragEventArgs>,
    pub drop_move: EventHandlers<DragEventArgs>,
    pub end_drop: EventHandlers<DragEventArgs>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_clone_shares_handlers() {
        let mut handlers: EventHandlers<u32> = EventHandlers::default();
        let counter = Rc::new(Cell::new(0));
        let c = counter.clone();
        handlers.add(move |_, _, value| c.set(c.get() + *value));

        let copy = handlers.clone();
        handlers.add(|_, _, _| {});
        assert_eq!(copy.len(), 1);
        assert_eq!(handlers.len(), 2);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_drag_content_downcast() {
        let mut args = DragEventArgs::new(Point::new(1, 1));
        assert!(args.content_as::<String>().is_none());
        args.content = Some(Rc::new("X".to_string()));
        assert_eq!(args.content_as::<String>().map(String::as_str), Some("X"));
        assert!(args.content_as::<u32>().is_none());
    }
}
