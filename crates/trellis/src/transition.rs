//! Time-boxed property animations.
//!
//! A [`TransitionSet`] holds at most one running transition per control and
//! kind. Starting a fade on a control that is already fading replaces the
//! running fade; a slide on the same control keeps running alongside.

use std::mem::{Discriminant, discriminant};
use std::time::Duration;

use crate::control::ControlId;
use crate::geometry::Point;
use crate::tree::UiTree;

/// Progress curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    CubicInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// The animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
    /// Control alpha.
    Fade { from: f32, to: f32 },
    /// Translation part of the control's local transform.
    Slide { from: Point, to: Point },
}

impl TransitionKind {
    fn apply(&self, tree: &mut UiTree, target: ControlId, progress: f32) {
        let Some(node) = tree.get_mut(target) else {
            return;
        };
        match *self {
            TransitionKind::Fade { from, to } => {
                node.set_alpha(from + (to - from) * progress);
            }
            TransitionKind::Slide { from, to } => {
                let lerp = |a: i32, b: i32| a + ((b - a) as f32 * progress).round() as i32;
                let at = Point::new(lerp(from.x, to.x), lerp(from.y, to.y));
                let transform = node.transform().with_translation(at);
                node.set_transform(transform);
            }
        }
    }
}

type Completion = Box<dyn FnOnce(&mut UiTree)>;

/// One running animation.
pub struct Transition {
    target: ControlId,
    kind: TransitionKind,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    on_complete: Option<Completion>,
}

impl Transition {
    pub fn new(target: ControlId, kind: TransitionKind, duration: Duration) -> Self {
        Self {
            target,
            kind,
            duration,
            easing: Easing::Linear,
            elapsed: Duration::ZERO,
            on_complete: None,
        }
    }

    pub fn fade(target: ControlId, from: f32, to: f32, duration: Duration) -> Self {
        Self::new(target, TransitionKind::Fade { from, to }, duration)
    }

    pub fn slide(target: ControlId, from: Point, to: Point, duration: Duration) -> Self {
        Self::new(target, TransitionKind::Slide { from, to }, duration)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Run `f` once the transition reaches its end value. Replaced
    /// transitions never complete.
    pub fn on_complete(mut self, f: impl FnOnce(&mut UiTree) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn target(&self) -> ControlId {
        self.target
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let linear = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(linear)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn key(&self) -> (ControlId, Discriminant<TransitionKind>) {
        (self.target, discriminant(&self.kind))
    }
}

/// The running transitions of one tree.
#[derive(Default)]
pub struct TransitionSet {
    active: Vec<Transition>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether any transition targets `id`.
    pub fn is_animating(&self, id: ControlId) -> bool {
        self.active.iter().any(|t| t.target == id)
    }

    /// Start `transition`, replacing a running one of the same kind on the
    /// same control. The start value is applied immediately.
    pub fn start(&mut self, tree: &mut UiTree, transition: Transition) {
        let key = transition.key();
        if let Some(position) = self.active.iter().position(|t| t.key() == key) {
            log::debug!("replacing {:?} transition on {:?}", transition.kind, transition.target);
            self.active.remove(position);
        }
        transition.kind.apply(tree, transition.target, transition.progress());
        self.active.push(transition);
    }

    /// Drop every transition on `id` without completing it.
    pub fn cancel(&mut self, id: ControlId) {
        self.active.retain(|t| t.target != id);
    }

    /// Advance all transitions by `elapsed`, applying their values.
    /// Finished transitions are removed and their completions run in start
    /// order. Transitions whose control left the tree are dropped.
    pub fn update(&mut self, tree: &mut UiTree, elapsed: Duration) {
        self.active.retain(|t| tree.contains(t.target));
        let mut completions = Vec::new();
        let mut index = 0;
        while index < self.active.len() {
            let transition = &mut self.active[index];
            transition.elapsed = (transition.elapsed + elapsed).min(transition.duration);
            transition.kind.apply(tree, transition.target, transition.progress());
            if transition.is_finished() {
                let finished = self.active.remove(index);
                completions.extend(finished.on_complete);
            } else {
                index += 1;
            }
        }
        for completion in completions {
            completion(tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::geometry::Size;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tree_with_panel() -> (UiTree, ControlId) {
        let mut tree = UiTree::new(Size::new(10, 10));
        let root = tree.root();
        let panel = tree.create_child(root, Panel).unwrap();
        (tree, panel)
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(0.5), 0.5);
        }
        assert!(Easing::CubicInOut.apply(0.25) < 0.25);
        assert!(Easing::CubicInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn test_fade_interpolates_and_completes() {
        let (mut tree, panel) = tree_with_panel();
        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        let mut set = TransitionSet::new();
        set.start(
            &mut tree,
            Transition::fade(panel, 0.0, 1.0, Duration::from_millis(200)).on_complete(move |_| d.set(true)),
        );
        assert_eq!(tree.get(panel).unwrap().alpha(), 0.0);

        set.update(&mut tree, Duration::from_millis(100));
        assert_eq!(tree.get(panel).unwrap().alpha(), 0.5);
        assert!(!done.get());

        set.update(&mut tree, Duration::from_millis(150));
        assert_eq!(tree.get(panel).unwrap().alpha(), 1.0);
        assert!(done.get());
        assert!(set.is_empty());
    }

    #[test]
    fn test_one_transition_per_control_and_kind() {
        let (mut tree, panel) = tree_with_panel();
        let mut set = TransitionSet::new();
        let second = Duration::from_secs(1);
        set.start(&mut tree, Transition::fade(panel, 0.0, 1.0, second));
        set.start(&mut tree, Transition::slide(panel, Point::new(10, 0), Point::ZERO, second));
        assert_eq!(set.len(), 2);

        set.start(&mut tree, Transition::fade(panel, 1.0, 0.0, second));
        assert_eq!(set.len(), 2);
        assert_eq!(tree.get(panel).unwrap().alpha(), 1.0);

        set.update(&mut tree, Duration::from_millis(500));
        assert_eq!(tree.get(panel).unwrap().alpha(), 0.5);
        assert_eq!(
            tree.get(panel).unwrap().transform().translation_part(),
            Point::new(5, 0)
        );
    }

    #[test]
    fn test_removed_control_drops_transition() {
        let (mut tree, panel) = tree_with_panel();
        let mut set = TransitionSet::new();
        set.start(&mut tree, Transition::fade(panel, 0.0, 1.0, Duration::from_secs(1)));
        assert!(set.is_animating(panel));
        let root = tree.root();
        tree.remove_child(root, panel).unwrap();
        set.update(&mut tree, Duration::from_millis(10));
        assert!(set.is_empty());
    }
}
