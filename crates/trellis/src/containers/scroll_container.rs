//! Scroll container: a viewport over one content control, with a slider
//! per axis as scrollbar.
//!
//! Arrange measures the content (unbounded along every axis that may
//! scroll), decides which bars are visible, then places the content at
//! minus the scroll offset. The bars are synced silently; dragging a bar
//! fires its `value_changed`, which scrolls the container.

use crate::control::{ControlBehavior, ControlId, Orientation};
use crate::error::{Result, TrellisError};
use crate::events::MouseEventArgs;
use crate::geometry::{Point, Rectangle, Size};
use crate::scroll::ScrollState;
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;
use crate::widgets::Slider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBarVisibility {
    /// Visible while there is something to scroll.
    #[default]
    Auto,
    Always,
    Never,
}

pub struct ScrollContainer {
    content: Option<ControlId>,
    horizontal_bar: Option<ControlId>,
    vertical_bar: Option<ControlId>,
    /// Whether content may be wider than the viewport.
    pub horizontal_scrollbar_enabled: bool,
    /// Whether content may be taller than the viewport.
    pub vertical_scrollbar_enabled: bool,
    pub horizontal_visibility: ScrollBarVisibility,
    pub vertical_visibility: ScrollBarVisibility,
    scroll: ScrollState,
}

impl ScrollContainer {
    pub const TAG: TypeTag = TypeTag("ScrollContainer");

    fn new() -> Self {
        Self {
            content: None,
            horizontal_bar: None,
            vertical_bar: None,
            horizontal_scrollbar_enabled: false,
            vertical_scrollbar_enabled: true,
            horizontal_visibility: ScrollBarVisibility::Auto,
            vertical_visibility: ScrollBarVisibility::Auto,
            scroll: ScrollState::default(),
        }
    }

    /// Create a detached scroll container with its two scrollbars.
    pub fn create(tree: &mut UiTree) -> Result<ControlId> {
        let id = tree.create(ScrollContainer::new())?;
        let horizontal = Self::create_bar(tree, id, Orientation::Horizontal)?;
        let vertical = Self::create_bar(tree, id, Orientation::Vertical)?;
        if let Some(container) = tree.behavior_mut::<ScrollContainer>(id) {
            container.horizontal_bar = Some(horizontal);
            container.vertical_bar = Some(vertical);
        }
        Ok(id)
    }

    /// Create a scroll container and append it to `parent`.
    pub fn create_child(tree: &mut UiTree, parent: ControlId) -> Result<ControlId> {
        let id = Self::create(tree)?;
        tree.add_child(parent, id)?;
        Ok(id)
    }

    fn create_bar(tree: &mut UiTree, container: ControlId, orientation: Orientation) -> Result<ControlId> {
        let bar = Slider::create(tree, container, orientation)?;
        tree.node_mut(bar)?
            .set_can_focus(false)
            .set_tab_stop(false)
            .set_visible(false);
        if let Some(slider) = tree.behavior_mut::<Slider>(bar) {
            slider.value_changed.add(move |tree, _, args| {
                let (x, y) = match orientation {
                    Orientation::Horizontal => (Some(args.new_value), None),
                    Orientation::Vertical => (None, Some(args.new_value)),
                };
                let _ = ScrollContainer::scroll_to(tree, container, x, y);
            });
        }
        Ok(bar)
    }

    fn with_container<R>(
        tree: &mut UiTree,
        id: ControlId,
        f: impl FnOnce(&mut ScrollContainer, &mut UiTree) -> R,
    ) -> Result<R> {
        tree.with_behavior_as::<ScrollContainer, R>(id, f).ok_or_else(|| {
            TrellisError::InvalidArgument(format!("{:?} is not a scroll container", id))
        })
    }

    /// Replace the content control. The previous content is removed from
    /// the tree.
    pub fn set_content(tree: &mut UiTree, id: ControlId, content: ControlId) -> Result<()> {
        let previous = tree
            .behavior::<ScrollContainer>(id)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a scroll container", id)))?
            .content;
        tree.add_child(id, content)?;
        tree.send_to_back(content)?;
        if let Some(previous) = previous {
            tree.remove_child(id, previous)?;
        }
        if let Some(container) = tree.behavior_mut::<ScrollContainer>(id) {
            container.content = Some(content);
            container.scroll.scroll_to(Some(0), Some(0));
        }
        tree.invalidate_dimensions(id);
        Ok(())
    }

    pub fn content(&self) -> Option<ControlId> {
        self.content
    }

    pub fn horizontal_bar(&self) -> Option<ControlId> {
        self.horizontal_bar
    }

    pub fn vertical_bar(&self) -> Option<ControlId> {
        self.vertical_bar
    }

    /// Natural size of the content as of the last arrange.
    pub fn virtual_size(&self) -> Size {
        self.scroll.virtual_size()
    }

    /// The visible part of the client area as of the last arrange.
    pub fn actual_client_size(&self) -> Size {
        self.scroll.viewport()
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll.offset()
    }

    pub fn horizontal_scroll_position(&self) -> i32 {
        self.scroll.offset().x
    }

    pub fn vertical_scroll_position(&self) -> i32 {
        self.scroll.offset().y
    }

    /// Scroll to an absolute position, clamped to the scrollable range.
    /// Returns whether the offset changed.
    pub fn scroll_to(tree: &mut UiTree, id: ControlId, x: Option<i32>, y: Option<i32>) -> Result<bool> {
        Self::with_container(tree, id, |container, tree| {
            let changed = container.scroll.scroll_to(x, y);
            if changed {
                container.scrolled(tree, id);
            }
            changed
        })
    }

    pub fn scroll_by(tree: &mut UiTree, id: ControlId, dx: i32, dy: i32) -> Result<bool> {
        Self::with_container(tree, id, |container, tree| {
            let changed = container.scroll.scroll_by(dx, dy);
            if changed {
                container.scrolled(tree, id);
            }
            changed
        })
    }

    /// Scroll the least amount that brings `descendant`'s box into view.
    /// When it does not fit, its top-left edge wins. Uses the last arranged
    /// geometry. Returns whether the offset changed.
    pub fn ensure_visible(tree: &mut UiTree, id: ControlId, descendant: ControlId) -> Result<bool> {
        let content = tree
            .behavior::<ScrollContainer>(id)
            .and_then(|container| container.content)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} has no content", id)))?;
        if content == descendant || !tree.is_ancestor_or_self(content, descendant) {
            return Err(TrellisError::InvalidArgument(format!(
                "{:?} is not inside the content of {:?}",
                descendant, id
            )));
        }
        let position = tree.screen_position(descendant) - tree.screen_position(content);
        let size = tree.node(descendant)?.actual_size();
        Self::with_container(tree, id, |container, tree| {
            let changed = container.reveal(Rectangle::from_parts(position, size));
            if changed {
                container.scrolled(tree, id);
            }
            changed
        })
    }

    /// Adjust the offset so `area` (in content coordinates) is in view.
    fn reveal(&mut self, area: Rectangle) -> bool {
        let viewport = self.scroll.viewport();
        let mut offset = self.scroll.offset();
        if area.right() > offset.x + viewport.width {
            offset.x = area.right() - viewport.width;
        }
        if area.x < offset.x {
            offset.x = area.x;
        }
        if area.bottom() > offset.y + viewport.height {
            offset.y = area.bottom() - viewport.height;
        }
        if area.y < offset.y {
            offset.y = area.y;
        }
        self.scroll.scroll_to(Some(offset.x), Some(offset.y))
    }

    fn scrolled(&mut self, tree: &mut UiTree, id: ControlId) {
        log::trace!("scroll container {:?} at {:?}", id, self.scroll.offset());
        self.sync_bars(tree);
        tree.invalidate_dimensions(id);
    }

    fn sync_bars(&self, tree: &mut UiTree) {
        let min_knob = tree.config().min_knob_size;
        let viewport = self.scroll.viewport();
        let virtual_size = self.scroll.virtual_size();
        let offset = self.scroll.offset();
        let axes = [
            (
                self.horizontal_bar,
                viewport.width,
                virtual_size.width,
                self.scroll.max_scroll_x(),
                offset.x,
            ),
            (
                self.vertical_bar,
                viewport.height,
                virtual_size.height,
                self.scroll.max_scroll_y(),
                offset.y,
            ),
        ];
        for (bar, view, virtual_extent, max, value) in axes {
            let Some(slider) = bar.and_then(|bar| tree.behavior_mut::<Slider>(bar)) else {
                continue;
            };
            let knob = if virtual_extent > 0 {
                ((view as i64 * view as i64) / virtual_extent as i64) as i32
            } else {
                view
            };
            slider.sync(0, max, value, knob.max(min_knob));
        }
    }

    fn content_budget(&self, viewport: Size) -> Size {
        Size::new(
            if self.horizontal_scrollbar_enabled {
                i32::MAX
            } else {
                viewport.width
            },
            if self.vertical_scrollbar_enabled {
                i32::MAX
            } else {
                viewport.height
            },
        )
    }

    fn measure_content(&self, tree: &UiTree, viewport: Size) -> Size {
        match self.content {
            Some(content) => tree.expected_size(content, self.content_budget(viewport)),
            None => Size::ZERO,
        }
    }

    fn bar_visible(enabled: bool, visibility: ScrollBarVisibility, overflow: bool) -> bool {
        enabled
            && match visibility {
                ScrollBarVisibility::Auto => overflow,
                ScrollBarVisibility::Always => true,
                ScrollBarVisibility::Never => false,
            }
    }
}

impl ControlBehavior for ScrollContainer {
    behavior_identity!(ScrollContainer::TAG);

    fn measure_override(&self, tree: &UiTree, _id: ControlId, max_client: Size) -> Size {
        self.measure_content(tree, max_client)
    }

    fn arrange_override(&mut self, tree: &mut UiTree, _id: ControlId, client: Size) {
        let thickness = tree.config().scrollbar_thickness;

        // Two passes: a horizontal bar can make a vertical one necessary and
        // the other way round.
        let mut virtual_size = self.measure_content(tree, client);
        let mut v_visible = Self::bar_visible(
            self.vertical_scrollbar_enabled,
            self.vertical_visibility,
            virtual_size.height > client.height,
        );
        let mut h_visible = false;
        let mut viewport = client;
        for _ in 0..2 {
            viewport.width = (client.width - if v_visible { thickness } else { 0 }).max(0);
            virtual_size = self.measure_content(tree, viewport);
            h_visible = Self::bar_visible(
                self.horizontal_scrollbar_enabled,
                self.horizontal_visibility,
                virtual_size.width > viewport.width,
            );
            viewport.height = (client.height - if h_visible { thickness } else { 0 }).max(0);
            let needs_vertical = Self::bar_visible(
                self.vertical_scrollbar_enabled,
                self.vertical_visibility,
                virtual_size.height > viewport.height,
            );
            if needs_vertical == v_visible {
                break;
            }
            v_visible = needs_vertical;
        }

        self.scroll.set_viewport(viewport);
        self.scroll.set_virtual_size(virtual_size);
        let offset = self.scroll.offset();

        if let Some(content) = self.content {
            let area = Rectangle::new(
                -offset.x,
                -offset.y,
                virtual_size.width.max(viewport.width),
                virtual_size.height.max(viewport.height),
            );
            tree.arrange_in(content, area);
        }

        let bars = [
            (
                self.horizontal_bar,
                h_visible,
                Rectangle::new(0, viewport.height, viewport.width, thickness),
            ),
            (
                self.vertical_bar,
                v_visible,
                Rectangle::new(viewport.width, 0, thickness, viewport.height),
            ),
        ];
        for (bar, visible, slot) in bars {
            let Some(bar) = bar else {
                continue;
            };
            if let Some(node) = tree.get_mut(bar) {
                node.set_visible(visible);
            }
            tree.arrange_in(bar, slot);
        }
        self.sync_bars(tree);
    }

    fn on_mouse_wheel(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        let step = tree.config().wheel_scroll_step;
        let distance = -args.wheel_delta * step;
        let changed = if self.scroll.can_scroll_y() {
            self.scroll.scroll_by(0, distance)
        } else if self.scroll.can_scroll_x() {
            self.scroll.scroll_by(distance, 0)
        } else {
            return;
        };
        if changed {
            self.scrolled(tree, id);
        }
        args.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::containers::Panel;
    use crate::input::{KeyModifiers, MouseButtons};
    use crate::tree::TreeOptions;

    fn scroll_tree(content_height: i32) -> (UiTree, ControlId, ControlId) {
        let options = TreeOptions::default().with_config(
            ScreenConfig::default()
                .with_scrollbar_thickness(1)
                .with_min_knob_size(1)
                .with_wheel_scroll_step(3),
        );
        let mut tree = UiTree::with_options(Size::new(20, 10), options).unwrap();
        let root = tree.root();
        let container = ScrollContainer::create_child(&mut tree, root).unwrap();
        let content = tree.create(Panel).unwrap();
        tree.get_mut(content).unwrap().set_height(Some(content_height));
        ScrollContainer::set_content(&mut tree, container, content).unwrap();
        tree.perform_layout();
        (tree, container, content)
    }

    fn container(tree: &UiTree, id: ControlId) -> &ScrollContainer {
        tree.behavior::<ScrollContainer>(id).unwrap()
    }

    #[test]
    fn test_bar_appears_only_on_overflow() {
        let (tree, id, content) = scroll_tree(8);
        let c = container(&tree, id);
        assert_eq!(c.actual_client_size(), Size::new(20, 10));
        assert!(!tree.get(c.vertical_bar().unwrap()).unwrap().is_visible());
        assert_eq!(tree.get(content).unwrap().actual_size(), Size::new(20, 8));

        let (tree, id, content) = scroll_tree(30);
        let c = container(&tree, id);
        assert_eq!(c.virtual_size(), Size::new(0, 30));
        assert_eq!(c.actual_client_size(), Size::new(19, 10));
        let bar = tree.get(c.vertical_bar().unwrap()).unwrap();
        assert!(bar.is_visible());
        assert_eq!(bar.actual_rect(), Rectangle::new(19, 0, 1, 10));
        assert_eq!(tree.get(content).unwrap().actual_size(), Size::new(19, 30));
    }

    #[test]
    fn test_scroll_position_is_clamped() {
        let (mut tree, id, content) = scroll_tree(30);
        assert!(ScrollContainer::scroll_to(&mut tree, id, None, Some(100)).unwrap());
        assert_eq!(container(&tree, id).vertical_scroll_position(), 20);
        tree.perform_layout();
        assert_eq!(tree.get(content).unwrap().actual_position(), Point::new(0, -20));

        assert!(ScrollContainer::scroll_by(&mut tree, id, 0, -50).unwrap());
        assert_eq!(container(&tree, id).vertical_scroll_position(), 0);

        // Shrinking the content re-clamps on the next arrange.
        ScrollContainer::scroll_to(&mut tree, id, None, Some(20)).unwrap();
        tree.get_mut(content).unwrap().set_height(Some(15));
        tree.perform_layout();
        assert_eq!(container(&tree, id).vertical_scroll_position(), 5);
    }

    #[test]
    fn test_bar_tracks_offset_and_drives_scroll() {
        let (mut tree, id, _) = scroll_tree(30);
        let bar = container(&tree, id).vertical_bar().unwrap();
        {
            let slider = tree.behavior::<Slider>(bar).unwrap();
            assert_eq!((slider.minimum(), slider.maximum()), (0, 20));
            // 10 * 10 / 30
            assert_eq!(slider.knob_size(), 3);
        }

        ScrollContainer::scroll_to(&mut tree, id, None, Some(7)).unwrap();
        assert_eq!(tree.behavior::<Slider>(bar).unwrap().value(), 7);

        Slider::set_value(&mut tree, bar, 12).unwrap();
        assert_eq!(container(&tree, id).vertical_scroll_position(), 12);
    }

    #[test]
    fn test_wheel_scrolls_by_step() {
        let (mut tree, id, _) = scroll_tree(30);
        tree.dispatch_mouse_wheel(Point::new(5, 5), -2, MouseButtons::empty(), KeyModifiers::NONE);
        assert_eq!(container(&tree, id).vertical_scroll_position(), 6);
        tree.dispatch_mouse_wheel(Point::new(5, 5), 1, MouseButtons::empty(), KeyModifiers::NONE);
        assert_eq!(container(&tree, id).vertical_scroll_position(), 3);
    }

    #[test]
    fn test_ensure_visible_minimal_delta() {
        let options = TreeOptions::default()
            .with_config(ScreenConfig::default().with_scrollbar_thickness(1));
        let mut tree = UiTree::with_options(Size::new(20, 10), options).unwrap();
        let root = tree.root();
        let container = ScrollContainer::create_child(&mut tree, root).unwrap();
        let stack = tree
            .create(crate::containers::StackPanel::new(Orientation::Vertical))
            .unwrap();
        ScrollContainer::set_content(&mut tree, container, stack).unwrap();
        let rows: Vec<ControlId> = (0..10)
            .map(|_| {
                let row = tree.create_child(stack, Panel).unwrap();
                tree.get_mut(row).unwrap().set_height(Some(3));
                row
            })
            .collect();
        tree.perform_layout();

        // Row 4 spans 12..15; the viewport must end at 15.
        assert!(ScrollContainer::ensure_visible(&mut tree, container, rows[4]).unwrap());
        assert_eq!(container_offset(&tree, container), 5);
        tree.perform_layout();
        assert!(!ScrollContainer::ensure_visible(&mut tree, container, rows[4]).unwrap());

        // Scrolling back up aligns the top edge.
        assert!(ScrollContainer::ensure_visible(&mut tree, container, rows[1]).unwrap());
        assert_eq!(container_offset(&tree, container), 3);
    }

    fn container_offset(tree: &UiTree, id: ControlId) -> i32 {
        container(tree, id).vertical_scroll_position()
    }
}
