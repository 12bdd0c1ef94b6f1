//! The two-pass layout protocol.
//!
//! Measure ([`UiTree::expected_size`]) asks how big a control wants to be for
//! a given available size and never mutates anything. Arrange
//! ([`UiTree::set_actual_size`]) measures, fixes the control's own size and
//! position inside its slot, then hands the client area to its children.

use super::{ControlId, HorizontalAlignment, LayoutProps, VerticalAlignment};
use crate::geometry::{Point, Rectangle, Size};
use crate::tree::UiTree;

/// Minimum and maximum client size per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClientBounds {
    pub min: Size,
    pub max: Size,
}

fn axis_bounds(
    explicit: Option<i32>,
    min: Option<i32>,
    max: Option<i32>,
    content: i32,
    available: i32,
) -> (i32, i32) {
    let lo = min.unwrap_or(0).max(0);
    let hi = max.unwrap_or(i32::MAX).max(lo);
    let max_client = explicit.unwrap_or(available).clamp(lo, hi);
    let min_client = explicit.unwrap_or(content).clamp(lo, hi).min(max_client);
    (min_client, max_client)
}

impl ClientBounds {
    /// Bounds for a control with `layout` offered `available` (borders included).
    pub(crate) fn compute(layout: &LayoutProps, available: Size, content: Size) -> Self {
        let client_available = available.saturating_sub(layout.borders().size());
        let (min_w, max_w) = axis_bounds(
            layout.width,
            layout.min_width,
            layout.max_width,
            content.width,
            client_available.width,
        );
        let (min_h, max_h) = axis_bounds(
            layout.height,
            layout.min_height,
            layout.max_height,
            content.height,
            client_available.height,
        );
        Self {
            min: Size::new(min_w, min_h),
            max: Size::new(max_w, max_h),
        }
    }
}

fn place(stretch: bool, alignment_offset: impl Fn(i32, i32) -> i32, desired: i32, container: i32, lo: i32, hi: i32) -> (i32, i32) {
    let unbounded = container == i32::MAX;
    let actual = if stretch && !unbounded {
        container
    } else {
        container.min(desired)
    };
    let actual = actual.clamp(lo, hi);
    let position = if unbounded {
        0
    } else {
        alignment_offset(container, actual)
    };
    (actual, position)
}

impl UiTree {
    /// Measure pass: the size `id` wants when offered `available`, including
    /// margin and padding. Zero for invisible controls.
    pub fn expected_size(&self, id: ControlId, available: Size) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        if !node.visible {
            return Size::ZERO;
        }

        let bounds = self.client_bounds(id, available);
        let children = match &node.behavior {
            Some(behavior) => behavior.measure_override(self, id, bounds.max),
            None => measure_children(self, id, bounds.max),
        };
        bounds
            .min
            .max(children)
            .min(bounds.max)
            .saturating_add(node.layout.borders().size())
    }

    pub(crate) fn client_bounds(&self, id: ControlId, available: Size) -> ClientBounds {
        let Some(node) = self.nodes.get(id) else {
            return ClientBounds {
                min: Size::ZERO,
                max: Size::ZERO,
            };
        };
        let content = match &node.behavior {
            Some(behavior) => behavior.min_content_size(self, id),
            None => Size::ZERO,
        };
        ClientBounds::compute(&node.layout, available, content)
    }

    /// Arrange pass: size and place `id` inside a slot of `available` size
    /// at the parent's client origin, then arrange its children.
    pub fn set_actual_size(&mut self, id: ControlId, available: Size) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible {
            self.collapse(id);
            return;
        }

        let desired = self.expected_size(id, available);
        self.set_dimension(id, desired, available);

        let client = match self.nodes.get(id) {
            Some(node) => node.client_size(),
            None => return,
        };
        let arranged = self.with_behavior(id, |behavior, tree| {
            behavior.arrange_override(tree, id, client);
        });
        if arranged.is_none() {
            arrange_children(self, id, client);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.dimensions_invalid = false;
        }
    }

    /// Arrange `id` into `slot`, given in the parent's client coordinates.
    pub fn arrange_in(&mut self, id: ControlId, slot: Rectangle) {
        self.set_actual_size(id, slot.size());
        if let Some(node) = self.nodes.get_mut(id) {
            node.actual_position = node.actual_position + slot.location();
        }
    }

    /// Fix the actual size and position of `id` for a desired size inside a
    /// container, honoring alignment and the min/max bounds.
    pub fn set_dimension(&mut self, id: ControlId, desired: Size, container: Size) {
        let bounds = self.client_bounds(id, container);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let borders = node.layout.borders().size();
        let lo = bounds.min.saturating_add(borders);
        let hi = bounds.max.saturating_add(borders);

        let horizontal = node.layout.horizontal_alignment;
        let (width, x) = place(
            horizontal == HorizontalAlignment::Stretch,
            |container, actual| match horizontal {
                HorizontalAlignment::Left | HorizontalAlignment::Stretch => 0,
                HorizontalAlignment::Center => (container - actual) / 2,
                HorizontalAlignment::Right => container - actual,
            },
            desired.width,
            container.width,
            lo.width,
            hi.width,
        );

        let vertical = node.layout.vertical_alignment;
        let (height, y) = place(
            vertical == VerticalAlignment::Stretch,
            |container, actual| match vertical {
                VerticalAlignment::Top | VerticalAlignment::Stretch => 0,
                VerticalAlignment::Center => (container - actual) / 2,
                VerticalAlignment::Bottom => container - actual,
            },
            desired.height,
            container.height,
            lo.height,
            hi.height,
        );

        let size = Size::new(width, height);
        if node.actual_size != size {
            node.drawing_invalid = true;
        }
        node.actual_size = size;
        node.actual_position = Point::new(x, y);
    }

    /// Zero the size of an invisible subtree and mark it arranged.
    fn collapse(&mut self, id: ControlId) {
        let children = match self.nodes.get_mut(id) {
            Some(node) => {
                node.actual_size = Size::ZERO;
                node.dimensions_invalid = false;
                node.children.items().to_vec()
            }
            None => return,
        };
        for child in children {
            self.collapse(child);
        }
    }

    /// Run measure and arrange on the root with the viewport size.
    pub fn perform_layout(&mut self) {
        let viewport = self.viewport;
        log::trace!("layout pass at {:?}", viewport);
        self.set_actual_size(self.root, viewport);
    }

    /// Whether any control in the tree needs re-measuring. Walks the whole
    /// tree on every call.
    pub fn has_invalid_dimensions(&self) -> bool {
        self.subtree_has_invalid_dimensions(self.root)
    }

    /// Whether `id` or any descendant needs re-measuring.
    pub fn subtree_has_invalid_dimensions(&self, id: ControlId) -> bool {
        match self.nodes.get(id) {
            Some(node) => {
                node.dimensions_invalid
                    || node
                        .children
                        .items()
                        .iter()
                        .any(|child| self.subtree_has_invalid_dimensions(*child))
            }
            None => false,
        }
    }

    /// Flag `id` for re-measure.
    pub fn invalidate_dimensions(&mut self, id: ControlId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.invalidate_dimensions();
        }
        self.invalidate_drawing(id);
    }

    /// Flag `id` and its ancestors for redraw.
    pub fn invalidate_drawing(&mut self, id: ControlId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.nodes.get_mut(cid) {
                Some(node) => {
                    node.drawing_invalid = true;
                    current = node.parent;
                }
                None => break,
            }
        }
    }
}

/// Default measure: componentwise maximum of the children.
pub(crate) fn measure_children(tree: &UiTree, id: ControlId, max_client: Size) -> Size {
    tree.children(id)
        .iter()
        .fold(Size::ZERO, |acc, child| {
            acc.max(tree.expected_size(*child, max_client))
        })
}

/// Default arrange: every child gets the whole client area.
pub(crate) fn arrange_children(tree: &mut UiTree, id: ControlId, client: Size) {
    for child in tree.children(id).to_vec() {
        tree.arrange_in(child, Rectangle::from_size(client));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Border;

    #[test]
    fn test_axis_bounds_explicit_wins() {
        assert_eq!(axis_bounds(Some(40), None, None, 100, 10), (40, 40));
        assert_eq!(axis_bounds(Some(40), Some(50), None, 0, 10), (50, 50));
        assert_eq!(axis_bounds(Some(40), None, Some(30), 0, 10), (30, 30));
    }

    #[test]
    fn test_axis_bounds_content_capped_by_available() {
        assert_eq!(axis_bounds(None, None, None, 100, 60), (60, 60));
        assert_eq!(axis_bounds(None, None, None, 20, 60), (20, 60));
        assert_eq!(axis_bounds(None, Some(80), None, 20, 60), (80, 80));
    }

    #[test]
    fn test_client_bounds_subtracts_borders() {
        let layout = LayoutProps {
            margin: Border::all(2),
            padding: Border::new(1, 0, 1, 0),
            ..LayoutProps::default()
        };
        let bounds = ClientBounds::compute(&layout, Size::new(100, 50), Size::new(10, 5));
        assert_eq!(bounds.min, Size::new(10, 5));
        assert_eq!(bounds.max, Size::new(94, 46));
    }

    #[test]
    fn test_client_bounds_unbounded() {
        let layout = LayoutProps {
            margin: Border::all(2),
            ..LayoutProps::default()
        };
        let bounds = ClientBounds::compute(&layout, Size::UNBOUNDED, Size::new(10, 5));
        assert_eq!(bounds.max, Size::UNBOUNDED);
    }
}
