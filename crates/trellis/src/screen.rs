//! The frame loop and screen navigation.
//!
//! A [`ScreenManager`] owns one [`UiTree`] and everything that drives it.
//! Screens are direct children of the root; exactly one of them is shown at a
//! time, apart from the moment a fade hands over from one to the next.
//!
//! Each call to [`frame`](ScreenManager::frame) runs these phases in order:
//!
//! 1. invoked closures from other threads,
//! 2. input dispatch,
//! 3. layout, if anything was invalidated,
//! 4. transitions, then every control's `update`,
//! 5. drawing.

use std::time::Duration;

use crate::control::ControlId;
use crate::dispatcher::InputDispatcher;
use crate::error::{Result, TrellisError};
use crate::geometry::Size;
use crate::input::InputSource;
use crate::invoke::{InvokeQueue, Invoker};
use crate::render::DrawBatch;
use crate::transition::{Easing, Transition, TransitionSet};
use crate::tree::{TreeOptions, UiTree};

pub struct ScreenManager<I: InputSource> {
    tree: UiTree,
    input: I,
    dispatcher: InputDispatcher,
    invoke: InvokeQueue,
    transitions: TransitionSet,
    screens: Vec<ControlId>,
    history: Vec<ControlId>,
    current: Option<ControlId>,
}

impl<I: InputSource> ScreenManager<I> {
    pub fn new(viewport: Size, options: TreeOptions, input: I) -> Result<Self> {
        Ok(Self {
            tree: UiTree::with_options(viewport, options)?,
            input,
            dispatcher: InputDispatcher::new(),
            invoke: InvokeQueue::new(),
            transitions: TransitionSet::new(),
            screens: Vec::new(),
            history: Vec::new(),
            current: None,
        })
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// A handle for running closures on the frame thread.
    pub fn invoker(&self) -> Invoker {
        self.invoke.invoker()
    }

    pub fn transitions(&self) -> &TransitionSet {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut TransitionSet {
        &mut self.transitions
    }

    /// Start a transition on the managed tree.
    pub fn start_transition(&mut self, transition: Transition) {
        self.transitions.start(&mut self.tree, transition);
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.tree.set_viewport(viewport);
    }

    /// Attach a detached control to the root as a hidden screen.
    pub fn add_screen(&mut self, screen: ControlId) -> Result<()> {
        let root = self.tree.root();
        self.tree.add_child(root, screen)?;
        self.tree.node_mut(screen)?.set_visible(false);
        self.screens.push(screen);
        Ok(())
    }

    pub fn screens(&self) -> &[ControlId] {
        &self.screens
    }

    pub fn current(&self) -> Option<ControlId> {
        self.current
    }

    /// Screens to return to, oldest first.
    pub fn history(&self) -> &[ControlId] {
        &self.history
    }

    /// Show `screen`, remembering the current one for
    /// [`navigate_back`](Self::navigate_back). With `fade`, the outgoing
    /// screen fades out while the new one fades in.
    pub fn navigate_to(&mut self, screen: ControlId, fade: Option<Duration>) -> Result<()> {
        if !self.screens.contains(&screen) {
            return Err(TrellisError::InvalidArgument(format!(
                "{:?} is not a registered screen",
                screen
            )));
        }
        if self.current == Some(screen) {
            return Ok(());
        }
        if let Some(current) = self.current {
            self.history.push(current);
        }
        self.show(screen, fade)
    }

    /// Return to the previous screen. Returns false when the history is empty.
    pub fn navigate_back(&mut self, fade: Option<Duration>) -> Result<bool> {
        let Some(previous) = self.history.pop() else {
            return Ok(false);
        };
        self.show(previous, fade)?;
        Ok(true)
    }

    fn show(&mut self, screen: ControlId, fade: Option<Duration>) -> Result<()> {
        log::debug!("navigating {:?} -> {:?}", self.current, screen);
        let outgoing = self.current.replace(screen);

        if let Some(focused) = self.tree.focused() {
            if outgoing.is_some_and(|old| self.tree.is_ancestor_or_self(old, focused)) {
                self.tree.clear_focus();
            }
        }

        self.tree.bring_to_front(screen)?;
        self.tree.node_mut(screen)?.set_visible(true);
        self.transitions.cancel(screen);

        match fade {
            Some(duration) => {
                if let Some(old) = outgoing {
                    // Hit testing goes to the incoming screen during the fade.
                    self.tree.node_mut(old)?.set_hit_test_visible(false);
                    let fade_out = Transition::fade(old, 1.0, 0.0, duration)
                        .with_easing(Easing::CubicInOut)
                        .on_complete(move |tree| {
                            if let Some(node) = tree.get_mut(old) {
                                node.set_visible(false).set_alpha(1.0).set_hit_test_visible(true);
                            }
                        });
                    self.transitions.start(&mut self.tree, fade_out);
                }
                let fade_in = Transition::fade(screen, 0.0, 1.0, duration).with_easing(Easing::CubicInOut);
                self.transitions.start(&mut self.tree, fade_in);
            }
            None => {
                if let Some(old) = outgoing {
                    self.transitions.cancel(old);
                    self.tree.node_mut(old)?.set_visible(false).set_alpha(1.0);
                }
                self.tree.node_mut(screen)?.set_alpha(1.0);
            }
        }
        Ok(())
    }

    /// Run one frame. `elapsed` is the time since the previous frame.
    pub fn frame(&mut self, elapsed: Duration, batch: &mut dyn DrawBatch) {
        self.invoke.drain(&mut self.tree);

        let snapshot = self.input.snapshot();
        let mode = self.input.mode();
        self.dispatcher.dispatch(&mut self.tree, &snapshot, mode, elapsed);

        if self.tree.has_invalid_dimensions() {
            self.tree.perform_layout();
        }

        self.transitions.update(&mut self.tree, elapsed);
        self.tree.update(elapsed);

        self.tree.draw(batch);
        self.tree.mark_drawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::geometry::Point;
    use crate::input::MouseButton;
    use crate::testing::{ManualInput, RecordingBatch};
    use crate::widgets::Button;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manager() -> (ScreenManager<ManualInput>, ControlId, ControlId) {
        let mut manager =
            ScreenManager::new(Size::new(20, 5), TreeOptions::default(), ManualInput::new()).unwrap();
        let first = manager.tree_mut().create(Panel).unwrap();
        let second = manager.tree_mut().create(Panel).unwrap();
        manager.add_screen(first).unwrap();
        manager.add_screen(second).unwrap();
        (manager, first, second)
    }

    fn visible(manager: &ScreenManager<ManualInput>, id: ControlId) -> bool {
        manager.tree().get(id).unwrap().is_visible()
    }

    #[test]
    fn test_navigation_history() {
        let (mut manager, first, second) = manager();
        assert!(!visible(&manager, first));

        manager.navigate_to(first, None).unwrap();
        manager.navigate_to(second, None).unwrap();
        assert_eq!(manager.current(), Some(second));
        assert_eq!(manager.history(), &[first]);
        assert!(visible(&manager, second));
        assert!(!visible(&manager, first));

        assert!(manager.navigate_back(None).unwrap());
        assert_eq!(manager.current(), Some(first));
        assert!(visible(&manager, first));
        assert!(!manager.navigate_back(None).unwrap());

        let stranger = manager.tree_mut().create(Panel).unwrap();
        assert!(matches!(
            manager.navigate_to(stranger, None),
            Err(TrellisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fade_hands_over_between_screens() {
        let (mut manager, first, second) = manager();
        let mut batch = RecordingBatch::new();
        manager.navigate_to(first, None).unwrap();
        manager.navigate_to(second, Some(Duration::from_millis(200))).unwrap();
        assert_eq!(manager.tree().get(second).unwrap().alpha(), 0.0);
        assert!(visible(&manager, first));

        manager.frame(Duration::from_millis(100), &mut batch);
        assert_eq!(manager.tree().get(second).unwrap().alpha(), 0.5);
        assert_eq!(manager.tree().get(first).unwrap().alpha(), 0.5);

        manager.frame(Duration::from_millis(100), &mut batch);
        assert!(!visible(&manager, first));
        assert_eq!(manager.tree().get(first).unwrap().alpha(), 1.0);
        assert_eq!(manager.tree().get(second).unwrap().alpha(), 1.0);
        assert!(manager.transitions().is_empty());
    }

    #[test]
    fn test_frame_runs_invoke_input_and_layout() {
        let (mut manager, first, _) = manager();
        manager.navigate_to(first, None).unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let c = clicks.clone();
        manager
            .invoker()
            .post(move |tree| {
                let button = Button::create(tree, first, "go").unwrap();
                Button::on_executed(tree, button, move |_, _, _| {
                    c.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            })
            .unwrap();

        let mut batch = RecordingBatch::new();
        manager.frame(Duration::from_millis(16), &mut batch);
        assert!(batch.texts().contains(&"go"));

        manager.input_mut().move_to(1, 1).press(MouseButton::Left);
        manager.frame(Duration::from_millis(16), &mut batch);
        manager.input_mut().release(MouseButton::Left);
        manager.frame(Duration::from_millis(16), &mut batch);

        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert!(!manager.tree().needs_redraw());
        assert_eq!(manager.tree().pointer(), Point::new(1, 1));
    }
}
