//! Routing input through the tree.
//!
//! Pointer events travel down by position. At each control the front-most
//! child under the pointer gets the first chance; the control's own hook and
//! handlers run afterwards, and only if nothing below set `handled`. Keys
//! travel down the focus path the same way.
//!
//! A control rejects a pointer event when it is invisible or the pointer is
//! outside its box. A disabled control claims the event and swallows it.

use smallvec::SmallVec;

use crate::control::{ControlId, FocusState, HoverState};
use crate::events::{DragEventArgs, KeyEventArgs, MouseEventArgs, PointerArgs};
use crate::geometry::{Point, Rectangle};
use crate::input::{KeyModifiers, MouseButton, MouseButtons};
use crate::tree::UiTree;

type Hits = SmallVec<[(ControlId, HoverState); 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MouseEvent {
    Enter,
    Leave,
    Down,
    Up,
    Move,
    Wheel,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyEvent {
    Down,
    Up,
    Press,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragEvent {
    Start,
    Enter,
    Leave,
    Move,
    End,
}

impl UiTree {
    /// Route `args` into `id`. `args.position()` is local to `id`'s box.
    /// Returns whether `id` or a descendant claimed the event.
    fn route<A: PointerArgs>(
        &mut self,
        id: ControlId,
        args: &mut A,
        hits: &mut Hits,
        local: &mut dyn FnMut(&mut UiTree, ControlId, &mut A),
    ) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let position = args.position();
        if !node.visible || !Rectangle::from_size(node.actual_size).contains(position) {
            return false;
        }
        if !node.enabled {
            hits.push((id, HoverState::Active));
            args.set_handled();
            return true;
        }

        let origin = node.client_origin();
        let client = Rectangle::from_parts(origin, node.client_size());
        let hit_test_visible = node.hit_test_visible;
        let children = if client.contains(position) {
            node.children.z_descending()
        } else {
            SmallVec::new()
        };

        let mut child_claimed = false;
        for child in children {
            let Some(child_position) = self.nodes.get(child).map(|c| c.actual_position) else {
                continue;
            };
            args.set_position(position - origin - child_position);
            let claimed = self.route(child, args, hits, local);
            args.set_position(position);
            if claimed {
                child_claimed = true;
                break;
            }
        }

        if child_claimed {
            args.set_bubbled();
        }
        if !hit_test_visible {
            if child_claimed {
                hits.push((id, HoverState::Passive));
            }
            return child_claimed;
        }

        hits.push((
            id,
            if child_claimed {
                HoverState::Passive
            } else {
                HoverState::Active
            },
        ));
        if !args.handled() {
            local(self, id, args);
        }
        true
    }

    pub(crate) fn fire_mouse(&mut self, id: ControlId, event: MouseEvent, args: &mut MouseEventArgs) {
        self.with_behavior(id, |behavior, tree| match event {
            MouseEvent::Enter => behavior.on_mouse_enter(tree, id, args),
            MouseEvent::Leave => behavior.on_mouse_leave(tree, id, args),
            MouseEvent::Down => behavior.on_mouse_down(tree, id, args),
            MouseEvent::Up => behavior.on_mouse_up(tree, id, args),
            MouseEvent::Move => behavior.on_mouse_move(tree, id, args),
            MouseEvent::Wheel => behavior.on_mouse_wheel(tree, id, args),
            MouseEvent::Click => behavior.on_mouse_click(tree, id, args),
        });
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let events = &node.events;
        let handlers = match event {
            MouseEvent::Enter => events.mouse_enter.clone(),
            MouseEvent::Leave => events.mouse_leave.clone(),
            MouseEvent::Down => events.mouse_down.clone(),
            MouseEvent::Up => events.mouse_up.clone(),
            MouseEvent::Move => events.mouse_move.clone(),
            MouseEvent::Wheel => events.mouse_wheel.clone(),
            MouseEvent::Click => events.mouse_click.clone(),
        };
        handlers.invoke(self, id, args);
    }

    pub(crate) fn fire_key(&mut self, id: ControlId, event: KeyEvent, args: &mut KeyEventArgs) {
        self.with_behavior(id, |behavior, tree| match event {
            KeyEvent::Down => behavior.on_key_down(tree, id, args),
            KeyEvent::Up => behavior.on_key_up(tree, id, args),
            KeyEvent::Press => behavior.on_key_press(tree, id, args),
        });
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let handlers = match event {
            KeyEvent::Down => node.events.key_down.clone(),
            KeyEvent::Up => node.events.key_up.clone(),
            KeyEvent::Press => node.events.key_press.clone(),
        };
        handlers.invoke(self, id, args);
    }

    pub(crate) fn fire_drag(&mut self, id: ControlId, event: DragEvent, args: &mut DragEventArgs) {
        self.with_behavior(id, |behavior, tree| match event {
            DragEvent::Start => behavior.on_start_drag(tree, id, args),
            DragEvent::Enter => behavior.on_drop_enter(tree, id, args),
            DragEvent::Leave => behavior.on_drop_leave(tree, id, args),
            DragEvent::Move => behavior.on_drop_move(tree, id, args),
            DragEvent::End => behavior.on_end_drop(tree, id, args),
        });
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let handlers = match event {
            DragEvent::Start => node.events.start_drag.clone(),
            DragEvent::Enter => node.events.drop_enter.clone(),
            DragEvent::Leave => node.events.drop_leave.clone(),
            DragEvent::Move => node.events.drop_move.clone(),
            DragEvent::End => node.events.end_drop.clone(),
        };
        handlers.invoke(self, id, args);
    }

    fn mouse_args_for(&self, id: ControlId, template: &MouseEventArgs) -> MouseEventArgs {
        let mut args = template.clone();
        args.position = template.screen_position - self.screen_position(id);
        args.handled = false;
        args.bubbled = false;
        args
    }

    /// Bring hover states in line with the controls just hit, firing
    /// enter/leave (or drop enter/leave while dragging) on every crossing.
    fn apply_hover(&mut self, hits: &Hits, screen: Point, buttons: MouseButtons, modifiers: KeyModifiers) {
        let template = MouseEventArgs::new(screen, buttons).with_modifiers(modifiers);
        let dragging = self.drag.clone();

        let left: Vec<ControlId> = self
            .nodes
            .iter()
            .filter(|(id, node)| {
                node.hovered != HoverState::None && !hits.iter().any(|(hit, _)| hit == id)
            })
            .map(|(id, _)| id)
            .collect();
        for id in left {
            if let Some(node) = self.nodes.get_mut(id) {
                node.hovered = HoverState::None;
                node.pressed = false;
                node.drawing_invalid = true;
            }
            match &dragging {
                Some(drag) => {
                    let mut args = drag.clone();
                    args.position = screen - self.screen_position(id);
                    args.handled = false;
                    self.fire_drag(id, DragEvent::Leave, &mut args);
                }
                None => {
                    let mut args = self.mouse_args_for(id, &template);
                    self.fire_mouse(id, MouseEvent::Leave, &mut args);
                }
            }
        }

        // Hits are recorded deepest first; enter from the root down.
        for (id, state) in hits.iter().rev() {
            let Some(node) = self.nodes.get_mut(*id) else {
                continue;
            };
            let entered = node.hovered == HoverState::None;
            if node.hovered != *state {
                node.hovered = *state;
                node.drawing_invalid = true;
            }
            if !entered {
                continue;
            }
            let hover_sound = node.hover_sound;
            match &dragging {
                Some(drag) => {
                    let mut args = drag.clone();
                    args.position = screen - self.screen_position(*id);
                    args.handled = false;
                    self.fire_drag(*id, DragEvent::Enter, &mut args);
                }
                None => {
                    if let Some(sound) = hover_sound {
                        self.services().audio.play(sound);
                    }
                    let mut args = self.mouse_args_for(*id, &template);
                    self.fire_mouse(*id, MouseEvent::Enter, &mut args);
                }
            }
        }
    }

    /// Pointer moved to `screen`.
    pub fn dispatch_mouse_move(&mut self, screen: Point, buttons: MouseButtons, modifiers: KeyModifiers) {
        self.pointer = screen;
        let mut args = MouseEventArgs::new(screen, buttons).with_modifiers(modifiers);

        if let Some(captured) = self.captured {
            args.position = screen - self.screen_position(captured);
            self.fire_mouse(captured, MouseEvent::Move, &mut args);
            return;
        }

        if let Some(drag) = self.drag.clone() {
            let mut drag_args = drag;
            drag_args.position = screen;
            drag_args.screen_position = screen;
            drag_args.handled = false;
            drag_args.bubbled = false;
            let mut hits = Hits::new();
            self.route(self.root, &mut drag_args, &mut hits, &mut |tree, id, args| {
                tree.fire_drag(id, DragEvent::Move, args);
            });
            self.apply_hover(&hits, screen, buttons, modifiers);
            return;
        }

        let mut hits = Hits::new();
        self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
            tree.fire_mouse(id, MouseEvent::Move, args);
        });
        self.apply_hover(&hits, screen, buttons, modifiers);
    }

    /// `button` went down at `screen`. Returns whether anything claimed it.
    pub fn dispatch_mouse_down(
        &mut self,
        screen: Point,
        button: MouseButton,
        buttons: MouseButtons,
        modifiers: KeyModifiers,
    ) -> bool {
        self.pointer = screen;
        let mut args = MouseEventArgs::new(screen, buttons)
            .with_button(button)
            .with_modifiers(modifiers);
        let mut hits = Hits::new();
        let claimed = self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
            if let Some(node) = tree.nodes.get_mut(id) {
                node.pressed = true;
                node.drawing_invalid = true;
            }
            if !args.focus_taken && tree.nodes.get(id).is_some_and(|n| n.can_focus) {
                tree.focus(id);
                args.focus_taken = true;
            }
            tree.fire_mouse(id, MouseEvent::Down, args);
        });
        log::trace!("mouse down {:?} at {:?}, claimed: {}", button, screen, claimed);
        claimed
    }

    /// `button` was released at `screen`. A control that saw the press and
    /// sees the release gets a click.
    pub fn dispatch_mouse_up(
        &mut self,
        screen: Point,
        button: MouseButton,
        buttons: MouseButtons,
        modifiers: KeyModifiers,
    ) -> bool {
        self.pointer = screen;
        let mut args = MouseEventArgs::new(screen, buttons)
            .with_button(button)
            .with_modifiers(modifiers);

        let claimed = if let Some(captured) = self.captured {
            args.position = screen - self.screen_position(captured);
            self.fire_mouse(captured, MouseEvent::Up, &mut args);
            true
        } else {
            let mut hits = Hits::new();
            self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
                tree.fire_mouse(id, MouseEvent::Up, args);
                if tree.nodes.get(id).is_some_and(|n| n.pressed) {
                    tree.click(id, args);
                }
            })
        };

        for (_, node) in self.nodes.iter_mut() {
            if node.pressed {
                node.pressed = false;
                node.drawing_invalid = true;
            }
        }
        claimed
    }

    fn click(&mut self, id: ControlId, args: &mut MouseEventArgs) {
        if let Some(sound) = self.nodes.get(id).and_then(|n| n.click_sound) {
            self.services().audio.play(sound);
        }
        self.fire_mouse(id, MouseEvent::Click, args);
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let handlers = match args.button {
            Some(MouseButton::Left) => node.events.left_mouse_click.clone(),
            Some(MouseButton::Right) => node.events.right_mouse_click.clone(),
            _ => return,
        };
        handlers.invoke(self, id, args);
    }

    /// The wheel moved `delta` notches (positive up) over `screen`.
    pub fn dispatch_mouse_wheel(
        &mut self,
        screen: Point,
        delta: i32,
        buttons: MouseButtons,
        modifiers: KeyModifiers,
    ) -> bool {
        let mut args = MouseEventArgs::new(screen, buttons)
            .with_wheel(delta)
            .with_modifiers(modifiers);
        let mut hits = Hits::new();
        self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
            tree.fire_mouse(id, MouseEvent::Wheel, args);
        })
    }

    /// Route a key event down the focus path. Returns whether it was handled.
    pub(crate) fn dispatch_key(&mut self, event: KeyEvent, args: &mut KeyEventArgs) -> bool {
        self.route_key(self.root, event, args);
        args.handled
    }

    fn route_key(&mut self, id: ControlId, event: KeyEvent, args: &mut KeyEventArgs) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible || !node.enabled {
            return;
        }
        let next = node
            .children
            .items()
            .iter()
            .copied()
            .find(|child| {
                self.nodes
                    .get(*child)
                    .is_some_and(|c| c.focused != FocusState::None)
            });
        if let Some(child) = next {
            self.route_key(child, event, args);
            args.bubbled = true;
        }
        if !args.handled {
            self.fire_key(id, event, args);
        }
    }

    pub fn dispatch_key_down(&mut self, args: &mut KeyEventArgs) -> bool {
        self.dispatch_key(KeyEvent::Down, args)
    }

    pub fn dispatch_key_up(&mut self, args: &mut KeyEventArgs) -> bool {
        self.dispatch_key(KeyEvent::Up, args)
    }

    pub fn dispatch_key_press(&mut self, args: &mut KeyEventArgs) -> bool {
        self.dispatch_key(KeyEvent::Press, args)
    }

    /// Offer StartDrag at `screen`. The first control that sets `handled`
    /// becomes the source. Returns whether a drag started.
    pub fn begin_drag(&mut self, screen: Point) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let mut args = DragEventArgs::new(screen);
        let mut hits = Hits::new();
        self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
            tree.fire_drag(id, DragEvent::Start, args);
            if args.handled && args.source.is_none() {
                args.source = Some(id);
            }
        });
        if !args.handled || args.source.is_none() {
            return false;
        }

        log::debug!("drag started by {:?}", args.source);
        args.position = screen;
        args.handled = false;
        args.bubbled = false;
        self.drag = Some(args.clone());
        for (_, node) in self.nodes.iter_mut() {
            node.pressed = false;
        }

        // Controls under the pointer switch from mouse hover to drop hover.
        let chain = self.hover_chain();
        let template = MouseEventArgs::new(screen, MouseButtons::LEFT);
        for id in chain.iter().rev() {
            let mut leave = self.mouse_args_for(*id, &template);
            self.fire_mouse(*id, MouseEvent::Leave, &mut leave);
        }
        for id in chain {
            let mut enter = args.clone();
            enter.position = screen - self.screen_position(id);
            self.fire_drag(id, DragEvent::Enter, &mut enter);
        }
        true
    }

    /// Offer EndDrop at `screen`, then end the drag.
    pub fn end_drag(&mut self, screen: Point) -> bool {
        let Some(mut args) = self.drag.clone() else {
            return false;
        };
        args.position = screen;
        args.screen_position = screen;
        let mut hits = Hits::new();
        self.route(self.root, &mut args, &mut hits, &mut |tree, id, args| {
            tree.fire_drag(id, DragEvent::End, args);
        });
        log::debug!("drag ended at {:?}, handled: {}", screen, args.handled);
        let handled = args.handled;
        if let Some(drag) = self.drag.take() {
            self.leave_drop_hover(&drag, screen);
        }
        handled
    }

    /// Controls still drop-hovered when a drag ends or is cancelled get
    /// DropLeave, then MouseEnter as plain hover resumes.
    pub(crate) fn leave_drop_hover(&mut self, drag: &DragEventArgs, screen: Point) {
        let chain = self.hover_chain();
        for id in chain.iter().rev() {
            let mut leave = drag.clone();
            leave.position = screen - self.screen_position(*id);
            leave.screen_position = screen;
            leave.handled = false;
            leave.bubbled = false;
            self.fire_drag(*id, DragEvent::Leave, &mut leave);
        }
        let template = MouseEventArgs::new(screen, MouseButtons::empty());
        for id in chain {
            let mut enter = self.mouse_args_for(id, &template);
            self.fire_mouse(id, MouseEvent::Enter, &mut enter);
        }
    }

    /// Hovered controls, outermost first.
    fn hover_chain(&self) -> Vec<ControlId> {
        let mut chain: Vec<ControlId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.hovered != HoverState::None)
            .map(|(id, _)| id)
            .collect();
        chain.sort_by_key(|id| self.root_path(*id).len());
        chain
    }
}
