//! Splitter: two slots along an axis divided by a draggable band.

use crate::control::{ControlBehavior, ControlId, Orientation};
use crate::error::{Result, TrellisError};
use crate::events::{KeyEventArgs, MouseEventArgs};
use crate::geometry::{Rectangle, Size};
use crate::input::{KeyCode, MouseButton};
use crate::render::{Brush, DrawBatch, SolidBrush};
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

#[derive(Debug, Clone)]
pub struct Splitter {
    orientation: Orientation,
    slot1: Option<ControlId>,
    slot2: Option<ControlId>,
    splitter_width: i32,
    requested_position: i32,
    actual_position: i32,
    /// Pointer offset into the band while dragging.
    grab: Option<i32>,
}

/// Which side of the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitterSlot {
    First,
    Second,
}

impl Splitter {
    pub const TAG: TypeTag = TypeTag("Splitter");

    /// `Horizontal` puts the slots side by side, `Vertical` stacks them.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            slot1: None,
            slot2: None,
            splitter_width: 1,
            requested_position: 0,
            actual_position: 0,
            grab: None,
        }
    }

    pub fn with_splitter_width(mut self, width: i32) -> Self {
        self.splitter_width = width.max(0);
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.requested_position = position;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn splitter_width(&self) -> i32 {
        self.splitter_width
    }

    pub fn requested_position(&self) -> i32 {
        self.requested_position
    }

    /// Start of the band after clamping, as of the last arrange.
    pub fn actual_position(&self) -> i32 {
        self.actual_position
    }

    pub fn slot(&self, slot: SplitterSlot) -> Option<ControlId> {
        match slot {
            SplitterSlot::First => self.slot1,
            SplitterSlot::Second => self.slot2,
        }
    }

    /// Put `control` into `slot`, removing whatever was there.
    pub fn set_slot(
        tree: &mut UiTree,
        splitter: ControlId,
        slot: SplitterSlot,
        control: ControlId,
    ) -> Result<()> {
        let previous = tree
            .behavior::<Splitter>(splitter)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a splitter", splitter)))?
            .slot(slot);
        tree.add_child(splitter, control)?;
        if let Some(previous) = previous {
            tree.remove_child(splitter, previous)?;
        }
        if let Some(behavior) = tree.behavior_mut::<Splitter>(splitter) {
            match slot {
                SplitterSlot::First => behavior.slot1 = Some(control),
                SplitterSlot::Second => behavior.slot2 = Some(control),
            }
        }
        tree.invalidate_dimensions(splitter);
        Ok(())
    }

    /// Request a band position. The arranged position may differ.
    pub fn set_position(tree: &mut UiTree, splitter: ControlId, position: i32) -> Result<()> {
        let behavior = tree
            .behavior_mut::<Splitter>(splitter)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a splitter", splitter)))?;
        behavior.requested_position = position;
        tree.invalidate_dimensions(splitter);
        Ok(())
    }

    fn along(&self, size: Size) -> i32 {
        match self.orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    fn across(&self, size: Size) -> i32 {
        match self.orientation {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    fn compose(&self, along: i32, across: i32) -> Size {
        match self.orientation {
            Orientation::Horizontal => Size::new(along, across),
            Orientation::Vertical => Size::new(across, along),
        }
    }

    /// A slot's min and max extent along the split axis.
    fn slot_limits(&self, tree: &UiTree, slot: Option<ControlId>) -> (Option<i32>, Option<i32>) {
        let Some(layout) = slot.and_then(|id| tree.get(id)).map(|node| *node.layout()) else {
            return (None, None);
        };
        let borders = self.along(layout.margin.size()) + self.along(layout.padding.size());
        let (min, max) = match self.orientation {
            Orientation::Horizontal => (layout.min_width, layout.max_width),
            Orientation::Vertical => (layout.min_height, layout.max_height),
        };
        (min.map(|m| m + borders), max.map(|m| m + borders))
    }

    /// Clamp `requested` for a split axis of length `extent`: first to the
    /// first slot's limits, then to the second slot's (which win), then into
    /// the axis itself.
    fn clamp_position(&self, tree: &UiTree, requested: i32, extent: i32) -> i32 {
        let mut position = requested;
        let (min1, max1) = self.slot_limits(tree, self.slot1);
        if let Some(min) = min1 {
            position = position.max(min);
        }
        if let Some(max) = max1 {
            position = position.min(max);
        }
        let (min2, max2) = self.slot_limits(tree, self.slot2);
        let end = extent - self.splitter_width;
        if let Some(min) = min2 {
            position = position.min(end - min);
        }
        if let Some(max) = max2 {
            position = position.max(end - max);
        }
        position.clamp(0, end.max(0))
    }

    fn band(&self, client: Rectangle) -> Rectangle {
        match self.orientation {
            Orientation::Horizontal => Rectangle::new(
                client.x + self.actual_position,
                client.y,
                self.splitter_width,
                client.height,
            ),
            Orientation::Vertical => Rectangle::new(
                client.x,
                client.y + self.actual_position,
                client.width,
                self.splitter_width,
            ),
        }
    }

    fn pointer_along(&self, tree: &UiTree, id: ControlId, args: &MouseEventArgs) -> Option<i32> {
        let local = args.position - tree.get(id)?.client_origin();
        Some(match self.orientation {
            Orientation::Horizontal => local.x,
            Orientation::Vertical => local.y,
        })
    }

    fn move_to(&mut self, tree: &mut UiTree, id: ControlId, requested: i32) {
        let extent = tree
            .get(id)
            .map(|node| self.along(node.client_size()))
            .unwrap_or(0);
        self.requested_position = self.clamp_position(tree, requested, extent);
        if self.requested_position != self.actual_position {
            tree.invalidate_dimensions(id);
        }
    }
}

impl ControlBehavior for Splitter {
    behavior_identity!(Splitter::TAG);

    fn default_can_focus(&self) -> bool {
        true
    }

    fn measure_override(&self, tree: &UiTree, _id: ControlId, max_client: Size) -> Size {
        let first = self
            .slot1
            .map(|slot| tree.expected_size(slot, max_client))
            .unwrap_or(Size::ZERO);
        let second = self
            .slot2
            .map(|slot| tree.expected_size(slot, max_client))
            .unwrap_or(Size::ZERO);
        let along = self
            .along(first)
            .saturating_add(self.splitter_width)
            .saturating_add(self.along(second));
        let across = self.across(first).max(self.across(second));
        self.compose(along, across)
    }

    fn arrange_override(&mut self, tree: &mut UiTree, _id: ControlId, client: Size) {
        let extent = self.along(client);
        let cross = self.across(client);
        self.actual_position = self.clamp_position(tree, self.requested_position, extent);

        let second_start = self.actual_position + self.splitter_width;
        let slots = [
            (self.slot1, 0, self.actual_position),
            (self.slot2, second_start, (extent - second_start).max(0)),
        ];
        for (slot, start, length) in slots {
            let Some(slot) = slot else {
                continue;
            };
            let area = match self.orientation {
                Orientation::Horizontal => Rectangle::new(start, 0, length, cross),
                Orientation::Vertical => Rectangle::new(0, start, cross, length),
            };
            tree.arrange_in(slot, area);
        }
    }

    fn draw(
        &self,
        tree: &UiTree,
        id: ControlId,
        batch: &mut dyn DrawBatch,
        client: Rectangle,
        alpha: f32,
    ) {
        if let Some(color) = tree.get(id).and_then(|node| node.foreground()) {
            SolidBrush::new(color).draw(batch, self.band(client), alpha);
        }
    }

    fn on_mouse_down(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if args.button != Some(MouseButton::Left) {
            return;
        }
        let Some(pointer) = self.pointer_along(tree, id, args) else {
            return;
        };
        let start = self.actual_position;
        if pointer >= start && pointer < start + self.splitter_width {
            self.grab = Some(pointer - start);
            tree.capture_pointer(id);
            args.handled = true;
        }
    }

    fn on_mouse_move(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        let Some(grab) = self.grab else {
            return;
        };
        if let Some(pointer) = self.pointer_along(tree, id, args) {
            self.move_to(tree, id, pointer - grab);
            args.handled = true;
        }
    }

    fn on_mouse_up(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if self.grab.take().is_some() {
            tree.release_pointer(id);
            args.handled = true;
        }
    }

    fn on_key_press(&mut self, tree: &mut UiTree, id: ControlId, args: &mut KeyEventArgs) {
        let step = tree.config().splitter_keyboard_step;
        let delta = match (self.orientation, args.key) {
            (Orientation::Horizontal, KeyCode::Left) | (Orientation::Vertical, KeyCode::Up) => -step,
            (Orientation::Horizontal, KeyCode::Right) | (Orientation::Vertical, KeyCode::Down) => {
                step
            }
            _ => return,
        };
        self.move_to(tree, id, self.actual_position + delta);
        args.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::geometry::Point;
    use crate::input::{KeyModifiers, MouseButtons};

    fn split_tree(position: i32) -> (UiTree, ControlId, ControlId, ControlId) {
        let mut tree = UiTree::new(Size::new(50, 10));
        let root = tree.root();
        let splitter = tree
            .create_child(
                root,
                Splitter::new(Orientation::Horizontal)
                    .with_splitter_width(2)
                    .with_position(position),
            )
            .unwrap();
        let first = tree.create(Panel).unwrap();
        let second = tree.create(Panel).unwrap();
        Splitter::set_slot(&mut tree, splitter, SplitterSlot::First, first).unwrap();
        Splitter::set_slot(&mut tree, splitter, SplitterSlot::Second, second).unwrap();
        tree.perform_layout();
        (tree, splitter, first, second)
    }

    fn actual(tree: &UiTree, splitter: ControlId) -> i32 {
        tree.behavior::<Splitter>(splitter).unwrap().actual_position()
    }

    #[test]
    fn test_slots_fill_both_sides() {
        let (tree, splitter, first, second) = split_tree(20);
        assert_eq!(actual(&tree, splitter), 20);
        assert_eq!(tree.get(first).unwrap().actual_rect(), Rectangle::new(0, 0, 20, 10));
        assert_eq!(tree.get(second).unwrap().actual_rect(), Rectangle::new(22, 0, 28, 10));
    }

    #[test]
    fn test_second_slot_limits_win() {
        let (mut tree, splitter, first, second) = split_tree(45);
        tree.get_mut(first).unwrap().set_min_width(Some(40));
        tree.get_mut(second).unwrap().set_min_width(Some(15));
        tree.perform_layout();
        // 50 - 2 - 15 = 33, even though the first slot wants 40.
        assert_eq!(actual(&tree, splitter), 33);

        Splitter::set_position(&mut tree, splitter, 500).unwrap();
        tree.get_mut(second).unwrap().set_min_width(None);
        tree.perform_layout();
        assert_eq!(actual(&tree, splitter), 48);
    }

    #[test]
    fn test_drag_band_with_capture() {
        let (mut tree, splitter, _, _) = split_tree(20);
        let left = MouseButton::Left;
        let none = KeyModifiers::NONE;

        tree.dispatch_mouse_down(Point::new(5, 3), left, MouseButtons::LEFT, none);
        assert_eq!(tree.captured(), None);
        tree.dispatch_mouse_up(Point::new(5, 3), left, MouseButtons::empty(), none);

        tree.dispatch_mouse_down(Point::new(21, 3), left, MouseButtons::LEFT, none);
        assert_eq!(tree.captured(), Some(splitter));
        tree.dispatch_mouse_move(Point::new(31, 3), MouseButtons::LEFT, none);
        tree.perform_layout();
        assert_eq!(actual(&tree, splitter), 30);
        tree.dispatch_mouse_up(Point::new(31, 3), left, MouseButtons::empty(), none);
        assert_eq!(tree.captured(), None);
    }

    #[test]
    fn test_arrow_keys_move_band() {
        let (mut tree, splitter, _, _) = split_tree(20);
        assert!(tree.focus(splitter));
        let mut args = KeyEventArgs::new(KeyCode::Left, KeyModifiers::NONE);
        assert!(tree.dispatch_key_press(&mut args));
        tree.perform_layout();
        assert_eq!(actual(&tree, splitter), 15);

        let mut args = KeyEventArgs::new(KeyCode::Up, KeyModifiers::NONE);
        assert!(!tree.dispatch_key_press(&mut args));
    }
}
