//! Ordered child collections.
//!
//! A [`ControlCollection`] keeps its members in insertion order, which is
//! also tab order. Every member carries a z value; the ascending-z view is
//! derived from those values and re-sorted only when something changed.

use std::cell::{Cell, RefCell};

use smallvec::SmallVec;

use crate::control::ControlId;
use crate::error::{Result, TrellisError};
use crate::events::DragEventArgs;
use crate::tree::UiTree;

/// A copied view of a collection, front-most last or first depending on the
/// accessor.
pub type ZView = SmallVec<[ControlId; 8]>;

#[derive(Debug, Default)]
pub struct ControlCollection {
    items: Vec<ControlId>,
    z_values: Vec<i32>,
    z_sorted: RefCell<Vec<ControlId>>,
    z_dirty: Cell<bool>,
}

impl ControlCollection {
    /// Members in tab order.
    pub fn items(&self) -> &[ControlId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.items.contains(&id)
    }

    fn position(&self, id: ControlId) -> Option<usize> {
        self.items.iter().position(|item| *item == id)
    }

    /// Insert at `index` in tab order. The new member goes on top in z.
    pub(crate) fn insert(&mut self, index: usize, id: ControlId) {
        debug_assert!(!self.contains(id));
        let index = index.min(self.items.len());
        let top = self.z_values.iter().copied().max().unwrap_or(0) + 1;
        self.items.insert(index, id);
        self.z_values.insert(index, top);
        self.resequence_z();
    }

    pub(crate) fn push(&mut self, id: ControlId) {
        self.insert(self.items.len(), id);
    }

    pub(crate) fn remove(&mut self, id: ControlId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                self.z_values.remove(index);
                self.resequence_z();
                true
            }
            None => false,
        }
    }

    /// 1-based tab index of `id`.
    pub fn tab_index(&self, id: ControlId) -> Option<i32> {
        self.position(id).map(|index| index as i32 + 1)
    }

    /// Move `id` so its 1-based tab index becomes `tab_order`.
    pub(crate) fn set_tab_order(&mut self, id: ControlId, tab_order: i32) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = (tab_order.max(1) as usize - 1).min(self.items.len() - 1);
        let z = self.z_values.remove(from);
        self.items.remove(from);
        self.items.insert(to, id);
        self.z_values.insert(to, z);
        self.z_dirty.set(true);
        true
    }

    pub fn z_index(&self, id: ControlId) -> Option<i32> {
        self.refresh();
        self.position(id).map(|index| self.z_values[index])
    }

    /// Request a z value for `id`. Ties keep tab order; values are then
    /// re-sequenced to 1..N.
    pub(crate) fn set_z_order(&mut self, id: ControlId, z: i32) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.z_values[index] = z;
        self.resequence_z();
        true
    }

    pub(crate) fn bring_to_front(&mut self, id: ControlId) -> bool {
        let top = self.z_values.iter().copied().max().unwrap_or(0) + 1;
        self.set_z_order(id, top)
    }

    pub(crate) fn send_to_back(&mut self, id: ControlId) -> bool {
        let bottom = self.z_values.iter().copied().min().unwrap_or(0) - 1;
        self.set_z_order(id, bottom)
    }

    fn resequence_z(&mut self) {
        self.z_dirty.set(true);
        self.refresh();
    }

    /// Re-sort the z view if it is stale.
    fn refresh(&self) {
        if !self.z_dirty.get() {
            return;
        }
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|index| (self.z_values[*index], *index));
        let mut sorted = self.z_sorted.borrow_mut();
        sorted.clear();
        sorted.extend(order.iter().map(|index| self.items[*index]));
        self.z_dirty.set(false);
    }

    /// Members from back to front, the paint order.
    pub fn z_ascending(&self) -> ZView {
        self.refresh();
        self.z_sorted.borrow().iter().copied().collect()
    }

    /// Members from front to back, the hit-test order.
    pub fn z_descending(&self) -> ZView {
        self.refresh();
        self.z_sorted.borrow().iter().rev().copied().collect()
    }
}

impl ControlCollection {
    // `z_values` stay compact: after every structural change they are 1..N
    // in z order. This keeps `z_index` meaningful to callers.
    fn compact(&mut self) {
        self.refresh();
        let sorted = self.z_sorted.borrow().clone();
        for (rank, id) in sorted.iter().enumerate() {
            if let Some(index) = self.position(*id) {
                self.z_values[index] = rank as i32 + 1;
            }
        }
    }
}

impl UiTree {
    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at tab position `index` among `parent`'s children.
    pub fn insert_child(&mut self, parent: ControlId, index: usize, child: ControlId) -> Result<()> {
        self.node(parent)?;
        let node = self.node(child)?;
        if node.parent.is_some() || child == self.root {
            return Err(TrellisError::InvalidOperation(format!(
                "control {:?} already has a parent",
                child
            )));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TrellisError::InvalidOperation(format!(
                "control {:?} cannot be added below itself",
                child
            )));
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(index, child);
        }
        self.sync_orders(parent);
        self.invalidate_dimensions(parent);
        log::debug!("added {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Remove `child` from `parent` and drop its whole subtree.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        if !self.node(parent)?.children.contains(child) {
            return Err(TrellisError::InvalidArgument(format!(
                "control {:?} is not a child of {:?}",
                child, parent
            )));
        }
        let cancelled = self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.remove(child);
        }
        self.sync_orders(parent);
        self.invalidate_dimensions(parent);

        let mut doomed = vec![child];
        let mut index = 0;
        while index < doomed.len() {
            if let Some(node) = self.nodes.get(doomed[index]) {
                doomed.extend_from_slice(node.children.items());
            }
            index += 1;
        }
        for id in doomed {
            self.nodes.remove(id);
        }
        log::debug!("removed {:?} from {:?}", child, parent);
        if let Some(drag) = cancelled {
            let pointer = self.pointer;
            self.leave_drop_hover(&drag, pointer);
        }
        Ok(())
    }

    /// Clear tree-level references into the subtree rooted at `id`.
    /// Returns the drag it cancelled, if any.
    fn detach(&mut self, id: ControlId) -> Option<DragEventArgs> {
        if let Some(focused) = self.focused {
            if self.is_ancestor_or_self(id, focused) {
                self.clear_focus();
            }
        }
        if let Some(captured) = self.captured {
            if self.is_ancestor_or_self(id, captured) {
                self.captured = None;
            }
        }
        let drag_source = self.drag.as_ref().and_then(|drag| drag.source);
        if let Some(source) = drag_source {
            if self.is_ancestor_or_self(id, source) {
                log::debug!("drag source {:?} removed, cancelling drag", source);
                return self.drag.take();
            }
        }
        None
    }

    /// Children of `id` in tab order. Empty for unknown ids.
    pub fn children(&self, id: ControlId) -> &[ControlId] {
        match self.nodes.get(id) {
            Some(node) => node.children.items(),
            None => &[],
        }
    }

    /// Move `child` to 1-based tab position `tab_order` among its siblings.
    pub fn set_tab_order(&mut self, child: ControlId, tab_order: i32) -> Result<()> {
        let parent = self.parent_of(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.set_tab_order(child, tab_order);
        }
        self.sync_orders(parent);
        Ok(())
    }

    /// Request a z value for `child`. Values are re-sequenced to 1..N.
    pub fn set_z_order(&mut self, child: ControlId, z: i32) -> Result<()> {
        let parent = self.parent_of(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.set_z_order(child, z);
        }
        self.sync_orders(parent);
        self.invalidate_drawing(parent);
        Ok(())
    }

    pub fn bring_to_front(&mut self, child: ControlId) -> Result<()> {
        let parent = self.parent_of(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.bring_to_front(child);
        }
        self.sync_orders(parent);
        self.invalidate_drawing(parent);
        Ok(())
    }

    pub fn send_to_back(&mut self, child: ControlId) -> Result<()> {
        let parent = self.parent_of(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.send_to_back(child);
        }
        self.sync_orders(parent);
        self.invalidate_drawing(parent);
        Ok(())
    }

    fn parent_of(&self, child: ControlId) -> Result<ControlId> {
        self.node(child)?.parent.ok_or_else(|| {
            TrellisError::InvalidOperation(format!("control {:?} has no parent", child))
        })
    }

    /// Copy tab and z indices from `parent`'s collection onto its children.
    fn sync_orders(&mut self, parent: ControlId) {
        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        node.children.compact();
        let orders: Vec<(ControlId, i32, i32)> = node
            .children
            .items()
            .iter()
            .map(|id| {
                (
                    *id,
                    node.children.tab_index(*id).unwrap_or(0),
                    node.children.z_index(*id).unwrap_or(0),
                )
            })
            .collect();
        for (id, tab, z) in orders {
            if let Some(child) = self.nodes.get_mut(id) {
                child.tab_order = tab;
                child.z_order = z;
            }
        }
    }
}
