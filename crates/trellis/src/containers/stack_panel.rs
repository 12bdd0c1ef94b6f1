//! Stack panel: children placed one after another along an axis.

use crate::control::{ControlBehavior, ControlId, Orientation};
use crate::geometry::{Rectangle, Size};
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

/// Stacks visible children along `orientation` with `control_spacing`
/// between neighbours. There is no wrapping; children past the end are
/// clipped by the parent.
#[derive(Debug, Clone, Default)]
pub struct StackPanel {
    pub orientation: Orientation,
    pub control_spacing: i32,
}

impl StackPanel {
    pub const TAG: TypeTag = TypeTag("StackPanel");

    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            control_spacing: 0,
        }
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.control_spacing = spacing.max(0);
        self
    }

    /// Available size for each child: unbounded along the stack axis.
    fn child_budget(&self, client: Size) -> Size {
        match self.orientation {
            Orientation::Horizontal => Size::new(i32::MAX, client.height),
            Orientation::Vertical => Size::new(client.width, i32::MAX),
        }
    }

    fn visible_children(tree: &UiTree, id: ControlId) -> Vec<ControlId> {
        tree.children(id)
            .iter()
            .copied()
            .filter(|child| tree.get(*child).is_some_and(|c| c.is_visible()))
            .collect()
    }
}

impl ControlBehavior for StackPanel {
    behavior_identity!(StackPanel::TAG);

    fn measure_override(&self, tree: &UiTree, id: ControlId, max_client: Size) -> Size {
        let budget = self.child_budget(max_client);
        let children = Self::visible_children(tree, id);
        let spacing = self.control_spacing * (children.len() as i32 - 1).max(0);

        let mut along = spacing;
        let mut across = 0;
        for child in children {
            let size = tree.expected_size(child, budget);
            match self.orientation {
                Orientation::Horizontal => {
                    along = along.saturating_add(size.width);
                    across = across.max(size.height);
                }
                Orientation::Vertical => {
                    along = along.saturating_add(size.height);
                    across = across.max(size.width);
                }
            }
        }
        match self.orientation {
            Orientation::Horizontal => Size::new(along, across),
            Orientation::Vertical => Size::new(across, along),
        }
    }

    fn arrange_override(&mut self, tree: &mut UiTree, id: ControlId, client: Size) {
        let budget = self.child_budget(client);
        let mut cursor = 0;
        for child in tree.children(id).to_vec() {
            let visible = tree.get(child).is_some_and(|c| c.is_visible());
            if !visible {
                tree.set_actual_size(child, Size::ZERO);
                continue;
            }
            let desired = tree.expected_size(child, budget);
            let slot = match self.orientation {
                Orientation::Horizontal => {
                    Rectangle::new(cursor, 0, desired.width, client.height)
                }
                Orientation::Vertical => Rectangle::new(0, cursor, client.width, desired.height),
            };
            tree.arrange_in(child, slot);
            let extent = match self.orientation {
                Orientation::Horizontal => slot.width,
                Orientation::Vertical => slot.height,
            };
            cursor += extent + self.control_spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::control::{HorizontalAlignment, VerticalAlignment};
    use crate::geometry::Border;

    fn stack(tree: &mut UiTree, orientation: Orientation, spacing: i32) -> ControlId {
        let root = tree.root();
        let panel = tree
            .create_child(root, StackPanel::new(orientation).with_spacing(spacing))
            .unwrap();
        tree.get_mut(panel)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Left)
            .set_vertical_alignment(VerticalAlignment::Top);
        panel
    }

    fn add_sized(tree: &mut UiTree, parent: ControlId, width: i32, height: i32) -> ControlId {
        let child = tree.create_child(parent, Panel).unwrap();
        tree.get_mut(child).unwrap().set_size(width, height);
        child
    }

    #[test]
    fn test_vertical_sum_with_spacing() {
        let mut tree = UiTree::new(Size::new(80, 40));
        let panel = stack(&mut tree, Orientation::Vertical, 2);
        let children: Vec<ControlId> = (0..4).map(|_| add_sized(&mut tree, panel, 5, 3)).collect();
        tree.get_mut(panel).unwrap().set_padding(Border::all(1));
        tree.perform_layout();

        // 4*3 + 3*2 plus padding on both ends.
        assert_eq!(tree.get(panel).unwrap().actual_size(), Size::new(7, 20));
        let ys: Vec<i32> = children
            .iter()
            .map(|c| tree.get(*c).unwrap().actual_position().y)
            .collect();
        assert_eq!(ys, vec![0, 5, 10, 15]);
    }

    #[test]
    fn test_horizontal_cross_axis_is_max() {
        let mut tree = UiTree::new(Size::new(80, 40));
        let panel = stack(&mut tree, Orientation::Horizontal, 1);
        add_sized(&mut tree, panel, 4, 2);
        add_sized(&mut tree, panel, 6, 5);
        tree.perform_layout();
        assert_eq!(tree.get(panel).unwrap().actual_size(), Size::new(11, 5));
    }

    #[test]
    fn test_invisible_children_take_no_space() {
        let mut tree = UiTree::new(Size::new(80, 40));
        let panel = stack(&mut tree, Orientation::Vertical, 3);
        add_sized(&mut tree, panel, 2, 2);
        let hidden = add_sized(&mut tree, panel, 2, 2);
        let last = add_sized(&mut tree, panel, 2, 2);
        tree.get_mut(hidden).unwrap().set_visible(false);
        tree.perform_layout();

        assert_eq!(tree.get(panel).unwrap().actual_size(), Size::new(2, 7));
        assert_eq!(tree.get(last).unwrap().actual_position().y, 5);
        assert_eq!(tree.get(hidden).unwrap().actual_size(), Size::ZERO);
    }

    #[test]
    fn test_cross_axis_alignment_is_per_child() {
        let mut tree = UiTree::new(Size::new(20, 40));
        let root = tree.root();
        let panel = tree
            .create_child(root, StackPanel::new(Orientation::Vertical))
            .unwrap();
        let centered = add_sized(&mut tree, panel, 4, 1);
        let stretched = tree.create_child(panel, Panel).unwrap();
        tree.get_mut(stretched).unwrap().set_height(Some(1));
        tree.get_mut(centered)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Center);
        tree.perform_layout();

        assert_eq!(tree.get(centered).unwrap().actual_rect(), Rectangle::new(8, 0, 4, 1));
        assert_eq!(tree.get(stretched).unwrap().actual_rect(), Rectangle::new(0, 1, 20, 1));
    }
}
