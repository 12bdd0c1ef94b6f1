//! Canvas: children at explicit offsets.

use std::collections::HashMap;

use crate::control::{ControlBehavior, ControlId};
use crate::error::{Result, TrellisError};
use crate::geometry::{Point, Rectangle, Size};
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

/// Places every child at its own offset from the client origin, sized to
/// its expected size. Children without an offset sit at the origin.
#[derive(Debug, Clone, Default)]
pub struct CanvasControl {
    offsets: HashMap<ControlId, Point>,
}

impl CanvasControl {
    pub const TAG: TypeTag = TypeTag("CanvasControl");

    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self, child: ControlId) -> Point {
        self.offsets.get(&child).copied().unwrap_or(Point::ZERO)
    }

    /// Add `child` to `canvas` at `offset`.
    pub fn add_control(
        tree: &mut UiTree,
        canvas: ControlId,
        child: ControlId,
        offset: Point,
    ) -> Result<()> {
        if tree.behavior::<CanvasControl>(canvas).is_none() {
            return Err(TrellisError::InvalidArgument(format!(
                "{:?} is not a canvas",
                canvas
            )));
        }
        tree.add_child(canvas, child)?;
        Self::set_offset(tree, canvas, child, offset)
    }

    /// Move an existing child.
    pub fn set_offset(
        tree: &mut UiTree,
        canvas: ControlId,
        child: ControlId,
        offset: Point,
    ) -> Result<()> {
        if tree.get(child).and_then(|c| c.parent()) != Some(canvas) {
            return Err(TrellisError::InvalidArgument(format!(
                "{:?} is not a child of {:?}",
                child, canvas
            )));
        }
        let behavior = tree.behavior_mut::<CanvasControl>(canvas).ok_or_else(|| {
            TrellisError::InvalidArgument(format!("{:?} is not a canvas", canvas))
        })?;
        behavior.offsets.insert(child, offset);
        tree.invalidate_dimensions(canvas);
        Ok(())
    }
}

impl ControlBehavior for CanvasControl {
    behavior_identity!(CanvasControl::TAG);

    fn measure_override(&self, tree: &UiTree, id: ControlId, _max_client: Size) -> Size {
        tree.children(id)
            .iter()
            .map(|child| {
                let offset = self.offset(*child);
                let size = tree.expected_size(*child, Size::UNBOUNDED);
                Size::new(
                    offset.x.saturating_add(size.width),
                    offset.y.saturating_add(size.height),
                )
            })
            .fold(Size::ZERO, Size::max)
    }

    fn arrange_override(&mut self, tree: &mut UiTree, id: ControlId, _client: Size) {
        self.offsets.retain(|child, _| tree.children(id).contains(child));
        for child in tree.children(id).to_vec() {
            let size = tree.expected_size(child, Size::UNBOUNDED);
            tree.arrange_in(child, Rectangle::from_parts(self.offset(child), size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::control::{HorizontalAlignment, VerticalAlignment};

    #[test]
    fn test_canvas_extent_and_placement() {
        let mut tree = UiTree::new(Size::new(50, 50));
        let root = tree.root();
        let canvas = tree.create_child(root, CanvasControl::new()).unwrap();
        tree.get_mut(canvas)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Left)
            .set_vertical_alignment(VerticalAlignment::Top);

        let a = tree.create(Panel).unwrap();
        tree.get_mut(a).unwrap().set_size(4, 4);
        CanvasControl::add_control(&mut tree, canvas, a, Point::new(10, 2)).unwrap();
        let b = tree.create(Panel).unwrap();
        tree.get_mut(b).unwrap().set_size(3, 9);
        CanvasControl::add_control(&mut tree, canvas, b, Point::new(1, 5)).unwrap();
        tree.perform_layout();

        assert_eq!(tree.get(canvas).unwrap().actual_size(), Size::new(14, 14));
        assert_eq!(tree.get(a).unwrap().actual_rect(), Rectangle::new(10, 2, 4, 4));
        assert_eq!(tree.get(b).unwrap().actual_rect(), Rectangle::new(1, 5, 3, 9));

        CanvasControl::set_offset(&mut tree, canvas, b, Point::new(0, 0)).unwrap();
        assert!(tree.has_invalid_dimensions());
        tree.perform_layout();
        assert_eq!(tree.get(canvas).unwrap().actual_size(), Size::new(14, 9));
    }

    #[test]
    fn test_removed_child_offset_is_dropped() {
        let mut tree = UiTree::new(Size::new(50, 50));
        let root = tree.root();
        let canvas = tree.create_child(root, CanvasControl::new()).unwrap();
        let a = tree.create(Panel).unwrap();
        CanvasControl::add_control(&mut tree, canvas, a, Point::new(3, 3)).unwrap();
        tree.perform_layout();

        tree.remove_child(canvas, a).unwrap();
        tree.perform_layout();
        assert!(tree.behavior::<CanvasControl>(canvas).unwrap().offsets.is_empty());
    }

    #[test]
    fn test_set_offset_requires_child() {
        let mut tree = UiTree::new(Size::new(50, 50));
        let root = tree.root();
        let canvas = tree.create_child(root, CanvasControl::new()).unwrap();
        let stranger = tree.create(Panel).unwrap();
        assert!(matches!(
            CanvasControl::set_offset(&mut tree, canvas, stranger, Point::ZERO),
            Err(TrellisError::InvalidArgument(_))
        ));
    }
}
