//! Path-derived state: root paths, absolute visibility and alpha, focus and
//! tab navigation.

use smallvec::SmallVec;

use super::{ControlId, FocusState};
use crate::geometry::Matrix;
use crate::tree::UiTree;

/// A root path, root first.
pub type RootPath = SmallVec<[ControlId; 16]>;

impl UiTree {
    /// The controls from the root down to `id`, inclusive. Recomputed on
    /// every call.
    pub fn root_path(&self, id: ControlId) -> RootPath {
        let mut path = RootPath::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(cid) else {
                break;
            };
            path.push(cid);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Visible itself and along the whole root path.
    pub fn is_absolutely_visible(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
            && self
                .root_path(id)
                .iter()
                .all(|cid| self.nodes.get(*cid).is_some_and(|n| n.visible))
    }

    /// Enabled itself and along the whole root path.
    pub fn is_absolutely_enabled(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
            && self
                .root_path(id)
                .iter()
                .all(|cid| self.nodes.get(*cid).is_some_and(|n| n.enabled))
    }

    /// Product of the alphas along the root path.
    pub fn absolute_alpha(&self, id: ControlId) -> f32 {
        self.root_path(id)
            .iter()
            .filter_map(|cid| self.nodes.get(*cid))
            .map(|node| node.alpha)
            .product()
    }

    /// Local transforms composed from the root down.
    pub fn absolute_transform(&self, id: ControlId) -> Matrix {
        self.root_path(id)
            .iter()
            .filter_map(|cid| self.nodes.get(*cid))
            .fold(Matrix::IDENTITY, |acc, node| node.transform.multiply(&acc))
    }

    /// Top-left of the control's box in screen coordinates.
    pub fn screen_position(&self, id: ControlId) -> crate::geometry::Point {
        let mut position = crate::geometry::Point::ZERO;
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(cid) else {
                break;
            };
            position = position + node.actual_position;
            if let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
                position = position + parent.client_origin();
            }
            current = node.parent;
        }
        position
    }

    /// The control holding keyboard focus.
    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// Whether `id` may take focus right now.
    pub fn can_take_focus(&self, id: ControlId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.can_focus)
            && self.is_absolutely_visible(id)
            && self.is_absolutely_enabled(id)
    }

    /// Give `id` keyboard focus. Returns false, changing nothing, if the
    /// control cannot take focus.
    pub fn focus(&mut self, id: ControlId) -> bool {
        if !self.can_take_focus(id) {
            log::trace!("focus request for {:?} rejected", id);
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }

        let previous = self.focused.take();
        self.clear_focus_states();
        let path = self.root_path(id);
        for cid in &path {
            if let Some(node) = self.nodes.get_mut(*cid) {
                node.focused = if *cid == id {
                    FocusState::Active
                } else {
                    FocusState::Passive
                };
                node.drawing_invalid = true;
            }
        }
        self.focused = Some(id);
        log::debug!("focus {:?} -> {:?}", previous, id);

        if let Some(previous) = previous {
            self.fire_lost_focus(previous);
        }
        self.with_behavior(id, |behavior, tree| behavior.on_got_focus(tree, id));
        if let Some(node) = self.nodes.get(id) {
            let handlers = node.events.got_focus.clone();
            self.notify(id, handlers, ());
        }
        true
    }

    /// Drop keyboard focus entirely.
    pub fn clear_focus(&mut self) {
        let Some(previous) = self.focused.take() else {
            return;
        };
        self.clear_focus_states();
        log::debug!("focus cleared from {:?}", previous);
        self.fire_lost_focus(previous);
    }

    fn clear_focus_states(&mut self) {
        for (_, node) in self.nodes.iter_mut() {
            if node.focused != FocusState::None {
                node.focused = FocusState::None;
                node.drawing_invalid = true;
            }
        }
    }

    fn fire_lost_focus(&mut self, id: ControlId) {
        self.with_behavior(id, |behavior, tree| behavior.on_lost_focus(tree, id));
        if let Some(node) = self.nodes.get(id) {
            let handlers = node.events.lost_focus.clone();
            self.notify(id, handlers, ());
        }
    }

    /// Whether `id` is a tab stop that may take focus now.
    pub fn is_tab_eligible(&self, id: ControlId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.tab_stop) && self.can_take_focus(id)
    }

    /// Visible, enabled controls in depth-first tab order.
    fn tab_sequence(&self) -> Vec<ControlId> {
        let mut sequence = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible || !node.enabled {
                continue;
            }
            sequence.push(id);
            stack.extend(node.children.items().iter().rev().copied());
        }
        sequence
    }

    /// Focus the next (or previous) tab stop after the focused control.
    /// Fails at the end of the sequence; callers decide whether to wrap.
    pub fn move_focus(&mut self, forward: bool) -> bool {
        let mut sequence = self.tab_sequence();
        if !forward {
            sequence.reverse();
        }
        let start = match self.focused {
            Some(focused) => match sequence.iter().position(|id| *id == focused) {
                Some(index) => index + 1,
                None => 0,
            },
            None => 0,
        };
        let target = sequence[start.min(sequence.len())..]
            .iter()
            .copied()
            .find(|id| self.is_tab_eligible(*id));
        match target {
            Some(id) => self.focus(id),
            None => false,
        }
    }

    /// Focus the first (or last) tab stop in the tree.
    pub fn focus_first(&mut self, forward: bool) -> bool {
        let mut sequence = self.tab_sequence();
        if !forward {
            sequence.reverse();
        }
        match sequence.into_iter().find(|id| self.is_tab_eligible(*id)) {
            Some(id) => self.focus(id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::geometry::{Point, Size};
    use crate::widgets::Button;

    fn tree_with_buttons(n: usize) -> (UiTree, Vec<ControlId>) {
        let mut tree = UiTree::new(Size::new(80, 24));
        let root = tree.root();
        let buttons = (0..n)
            .map(|i| Button::create(&mut tree, root, &format!("b{}", i)).unwrap())
            .collect();
        (tree, buttons)
    }

    #[test]
    fn test_focus_sets_active_and_passive() {
        let (mut tree, buttons) = tree_with_buttons(2);
        assert!(tree.focus(buttons[1]));
        assert_eq!(tree.get(buttons[1]).unwrap().focus_state(), FocusState::Active);
        assert_eq!(tree.get(buttons[0]).unwrap().focus_state(), FocusState::None);
        assert_eq!(tree.get(tree.root()).unwrap().focus_state(), FocusState::Passive);
    }

    #[test]
    fn test_focus_rejects_disabled_and_invisible() {
        let (mut tree, buttons) = tree_with_buttons(3);
        assert!(tree.focus(buttons[0]));
        tree.get_mut(buttons[1]).unwrap().set_enabled(false);
        tree.get_mut(buttons[2]).unwrap().set_visible(false);
        assert!(!tree.focus(buttons[1]));
        assert!(!tree.focus(buttons[2]));
        assert_eq!(tree.focused(), Some(buttons[0]));
    }

    #[test]
    fn test_move_focus_skips_ineligible_and_stops_at_end() {
        let (mut tree, buttons) = tree_with_buttons(3);
        tree.get_mut(buttons[1]).unwrap().set_tab_stop(false);
        assert!(tree.move_focus(true));
        assert_eq!(tree.focused(), Some(buttons[0]));
        assert!(tree.move_focus(true));
        assert_eq!(tree.focused(), Some(buttons[2]));
        assert!(!tree.move_focus(true));
        assert_eq!(tree.focused(), Some(buttons[2]));
        assert!(tree.move_focus(false));
        assert_eq!(tree.focused(), Some(buttons[0]));
    }

    #[test]
    fn test_tab_order_drives_navigation() {
        let (mut tree, buttons) = tree_with_buttons(3);
        tree.set_tab_order(buttons[2], 1).unwrap();
        assert!(tree.move_focus(true));
        assert_eq!(tree.focused(), Some(buttons[2]));
    }

    #[test]
    fn test_disabled_ancestor_blocks_focus() {
        let mut tree = UiTree::new(Size::new(80, 24));
        let root = tree.root();
        let panel = tree.create_child(root, Panel).unwrap();
        let button = Button::create(&mut tree, panel, "ok").unwrap();
        tree.get_mut(panel).unwrap().set_enabled(false);
        assert!(!tree.is_absolutely_enabled(button));
        assert!(!tree.focus(button));
    }

    #[test]
    fn test_absolute_alpha_and_transform() {
        let mut tree = UiTree::new(Size::new(80, 24));
        let root = tree.root();
        let panel = tree.create_child(root, Panel).unwrap();
        let inner = tree.create_child(panel, Panel).unwrap();
        tree.get_mut(panel)
            .unwrap()
            .set_alpha(0.5)
            .set_transform(Matrix::translation(3.0, 0.0));
        tree.get_mut(inner)
            .unwrap()
            .set_alpha(0.5)
            .set_transform(Matrix::translation(0.0, 2.0));
        assert!((tree.absolute_alpha(inner) - 0.25).abs() < 1e-6);
        assert_eq!(
            tree.absolute_transform(inner).translation_part(),
            Point::new(3, 2)
        );
        assert_eq!(tree.root_path(inner).as_slice(), &[root, panel, inner]);
    }
}
