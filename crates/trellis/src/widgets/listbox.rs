//! List of text items with a single selection.
//!
//! A listbox is a scroll container whose content is a vertical stack of
//! labels. Selecting an item brings it into view on the next arrange.

use crate::containers::{ScrollContainer, StackPanel};
use crate::control::{Backgrounds, ControlBehavior, ControlId, Orientation, arrange_children};
use crate::error::{Result, TrellisError};
use crate::events::{EventHandlers, KeyEventArgs, SelectionChangedArgs};
use crate::geometry::Size;
use crate::input::KeyCode;
use crate::skin_registry::{TypeTag, backgrounds_from_style};
use crate::tree::UiTree;
use crate::widgets::Label;

#[derive(Clone, Default)]
pub struct Listbox {
    scroller: Option<ControlId>,
    stack: Option<ControlId>,
    items: Vec<ControlId>,
    selected: Option<usize>,
    reveal_pending: bool,
    item_brushes: Option<Backgrounds>,
    selected_brushes: Option<Backgrounds>,
    pub selection_changed: EventHandlers<SelectionChangedArgs>,
}

impl Listbox {
    pub const TAG: TypeTag = TypeTag("Listbox");
    pub const ITEM_STYLE: &'static str = "ListboxItem";
    pub const SELECTED_ITEM_STYLE: &'static str = "ListboxItemSelected";

    /// Create an empty listbox and append it to `parent`.
    pub fn create(tree: &mut UiTree, parent: ControlId) -> Result<ControlId> {
        let id = tree.create_child(parent, Listbox::default())?;
        let scroller = ScrollContainer::create_child(tree, id)?;
        let stack = tree.create(StackPanel::new(Orientation::Vertical))?;
        ScrollContainer::set_content(tree, scroller, stack)?;
        if let Some(listbox) = tree.behavior_mut::<Listbox>(id) {
            listbox.scroller = Some(scroller);
            listbox.stack = Some(stack);
        }
        Ok(id)
    }

    pub fn items(&self) -> &[ControlId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scroller(&self) -> Option<ControlId> {
        self.scroller
    }

    fn with_listbox<R>(
        tree: &mut UiTree,
        id: ControlId,
        f: impl FnOnce(&mut Listbox, &mut UiTree) -> R,
    ) -> Result<R> {
        tree.with_behavior_as::<Listbox, R>(id, f)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a listbox", id)))
    }

    /// Append an item labelled `text`. Returns the item's label.
    pub fn add_item(tree: &mut UiTree, id: ControlId, text: &str) -> Result<ControlId> {
        let stack = tree
            .behavior::<Listbox>(id)
            .and_then(|listbox| listbox.stack)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a listbox", id)))?;
        let item = Label::create(tree, stack, text)?;
        tree.node_mut(item)?
            .events
            .mouse_down
            .add(move |tree, sender, _| {
                let index = tree.children(stack).iter().position(|child| *child == sender);
                if let Err(err) = Listbox::select(tree, id, index) {
                    log::warn!("listbox item selection failed: {}", err);
                }
            });
        Self::with_listbox(tree, id, |listbox, tree| {
            listbox.items.push(item);
            listbox.paint_item(tree, listbox.items.len() - 1);
        })?;
        Ok(item)
    }

    /// Select the item at `index`, or clear the selection with `None`.
    /// Returns whether the selection changed.
    pub fn select(tree: &mut UiTree, id: ControlId, index: Option<usize>) -> Result<bool> {
        Self::with_listbox(tree, id, |listbox, tree| listbox.change_selection(tree, id, index))?
    }

    fn change_selection(&mut self, tree: &mut UiTree, id: ControlId, index: Option<usize>) -> Result<bool> {
        if let Some(index) = index {
            if index >= self.items.len() {
                return Err(TrellisError::InvalidArgument(format!(
                    "item {} out of range for {} items",
                    index,
                    self.items.len()
                )));
            }
        }
        if index == self.selected {
            return Ok(false);
        }
        let old_index = std::mem::replace(&mut self.selected, index);
        for changed in [old_index, index].into_iter().flatten() {
            self.paint_item(tree, changed);
        }
        if index.is_some() {
            self.reveal_pending = true;
            tree.invalidate_dimensions(id);
        }
        log::debug!("listbox {:?} selection {:?} -> {:?}", id, old_index, index);
        tree.notify(
            id,
            self.selection_changed.clone(),
            SelectionChangedArgs {
                old_index,
                new_index: index,
            },
        );
        Ok(true)
    }

    /// Give item `index` the brushes for its selection state. Items keep
    /// their own skin when neither item style exists.
    fn paint_item(&self, tree: &mut UiTree, index: usize) {
        if self.item_brushes.is_none() && self.selected_brushes.is_none() {
            return;
        }
        let brushes = if self.selected == Some(index) {
            &self.selected_brushes
        } else {
            &self.item_brushes
        };
        let brushes = brushes.clone().unwrap_or_default();
        if let Some(node) = self.items.get(index).and_then(|item| tree.get_mut(*item)) {
            node.set_backgrounds(brushes);
        }
    }

    fn step(&self, key: &KeyCode) -> Option<usize> {
        let last = self.items.len().checked_sub(1)?;
        match (key, self.selected) {
            (KeyCode::Up, Some(index)) => Some(index.saturating_sub(1)),
            (KeyCode::Down, Some(index)) => Some((index + 1).min(last)),
            (KeyCode::Up | KeyCode::Down, None) | (KeyCode::Home, _) => Some(0),
            (KeyCode::End, _) => Some(last),
            _ => None,
        }
    }
}

impl ControlBehavior for Listbox {
    behavior_identity!(Listbox::TAG);

    fn default_can_focus(&self) -> bool {
        true
    }

    fn apply_skin(&mut self, tree: &mut UiTree, id: ControlId) -> Result<()> {
        tree.apply_base_skin(id)?;
        let skin = tree.skin.clone();
        if let Some(style) = skin.style(Self::ITEM_STYLE) {
            self.item_brushes = Some(backgrounds_from_style(style, tree.assets.as_ref())?);
        }
        if let Some(style) = skin.style(Self::SELECTED_ITEM_STYLE) {
            self.selected_brushes = Some(backgrounds_from_style(style, tree.assets.as_ref())?);
        }
        Ok(())
    }

    fn arrange_override(&mut self, tree: &mut UiTree, id: ControlId, client: Size) {
        arrange_children(tree, id, client);
        if !std::mem::take(&mut self.reveal_pending) {
            return;
        }
        let (Some(scroller), Some(item)) = (
            self.scroller,
            self.selected.and_then(|index| self.items.get(index).copied()),
        ) else {
            return;
        };
        match ScrollContainer::ensure_visible(tree, scroller, item) {
            Ok(true) => arrange_children(tree, id, client),
            Ok(false) => {}
            Err(err) => log::warn!("listbox {:?} could not reveal {:?}: {}", id, item, err),
        }
    }

    fn on_key_press(&mut self, tree: &mut UiTree, id: ControlId, args: &mut KeyEventArgs) {
        let Some(index) = self.step(&args.key) else {
            return;
        };
        if let Err(err) = self.change_selection(tree, id, Some(index)) {
            log::warn!("listbox {:?} key selection failed: {}", id, err);
        }
        args.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::control::{HorizontalAlignment, VerticalAlignment};
    use crate::geometry::Point;
    use crate::input::{KeyModifiers, MouseButton, MouseButtons};
    use crate::tree::TreeOptions;
    use skin::Skin;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn listbox_tree(skin: Skin) -> (UiTree, ControlId) {
        let options = TreeOptions::default()
            .with_skin(skin)
            .with_config(ScreenConfig::default().with_scrollbar_thickness(1).with_min_knob_size(1));
        let mut tree = UiTree::with_options(Size::new(30, 10), options).unwrap();
        let root = tree.root();
        let listbox = Listbox::create(&mut tree, root).unwrap();
        tree.get_mut(listbox)
            .unwrap()
            .set_size(20, 4)
            .set_horizontal_alignment(HorizontalAlignment::Left)
            .set_vertical_alignment(VerticalAlignment::Top);
        for i in 0..7 {
            Listbox::add_item(&mut tree, listbox, &format!("item {}", i)).unwrap();
        }
        tree.perform_layout();
        (tree, listbox)
    }

    fn listbox(tree: &UiTree, id: ControlId) -> &Listbox {
        tree.behavior::<Listbox>(id).unwrap()
    }

    #[test]
    fn test_selecting_last_item_scrolls_it_into_view() {
        let (mut tree, id) = listbox_tree(Skin::default());
        let scroller = listbox(&tree, id).scroller().unwrap();
        let last = listbox(&tree, id).items()[6];

        assert!(Listbox::select(&mut tree, id, Some(6)).unwrap());
        assert!(tree.has_invalid_dimensions());
        tree.perform_layout();

        let container = tree.behavior::<ScrollContainer>(scroller).unwrap();
        let viewport = container.actual_client_size();
        assert_eq!(viewport, Size::new(19, 4));
        assert_eq!(container.vertical_scroll_position(), 3);

        let top = tree.screen_position(last).y - tree.screen_position(scroller).y;
        let height = tree.get(last).unwrap().actual_size().height;
        assert!(top >= 0);
        assert!(top + height <= viewport.height);

        Listbox::select(&mut tree, id, Some(0)).unwrap();
        tree.perform_layout();
        let container = tree.behavior::<ScrollContainer>(scroller).unwrap();
        assert_eq!(container.vertical_scroll_position(), 0);
    }

    #[test]
    fn test_keyboard_selection() {
        let (mut tree, id) = listbox_tree(Skin::default());
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        tree.behavior_mut::<Listbox>(id)
            .unwrap()
            .selection_changed
            .add(move |_, _, args| e.borrow_mut().push(args.new_index));
        tree.focus(id);

        let mut press = |tree: &mut UiTree, key| {
            let mut args = KeyEventArgs::new(key, KeyModifiers::NONE);
            tree.dispatch_key_press(&mut args)
        };
        press(&mut tree, KeyCode::Down);
        press(&mut tree, KeyCode::Down);
        assert_eq!(listbox(&tree, id).selected(), Some(1));
        press(&mut tree, KeyCode::End);
        press(&mut tree, KeyCode::End);
        press(&mut tree, KeyCode::Up);
        assert_eq!(listbox(&tree, id).selected(), Some(5));
        assert!(press(&mut tree, KeyCode::Home));
        assert!(!press(&mut tree, KeyCode::Enter));
        assert_eq!(*events.borrow(), vec![Some(0), Some(1), Some(6), Some(5), Some(0)]);
    }

    #[test]
    fn test_click_selects_and_focuses() {
        let (mut tree, id) = listbox_tree(Skin::default());
        tree.dispatch_mouse_down(
            Point::new(1, 2),
            MouseButton::Left,
            MouseButtons::LEFT,
            KeyModifiers::NONE,
        );
        assert_eq!(listbox(&tree, id).selected(), Some(2));
        assert_eq!(tree.focused(), Some(id));
    }

    #[test]
    fn test_selected_item_gets_selected_brushes() {
        let skin = Skin::parse("ListboxItemSelected { background: #ff0000; }").unwrap();
        let (mut tree, id) = listbox_tree(skin);
        let items = listbox(&tree, id).items().to_vec();
        let has_background = |tree: &UiTree, item| tree.get(item).unwrap().backgrounds().normal.is_some();

        Listbox::select(&mut tree, id, Some(1)).unwrap();
        assert!(has_background(&tree, items[1]));
        assert!(!has_background(&tree, items[0]));

        Listbox::select(&mut tree, id, Some(3)).unwrap();
        assert!(!has_background(&tree, items[1]));
        assert!(has_background(&tree, items[3]));
    }

    #[test]
    fn test_select_out_of_range() {
        let (mut tree, id) = listbox_tree(Skin::default());
        assert!(matches!(
            Listbox::select(&mut tree, id, Some(7)),
            Err(TrellisError::InvalidArgument(_))
        ));
        assert!(!Listbox::select(&mut tree, id, None).unwrap());
    }
}
