//! Painting the tree into a [`DrawBatch`].

use super::DrawBatch;
use crate::control::ControlId;
use crate::geometry::{Matrix, Point, Rectangle};
use crate::tree::UiTree;

impl UiTree {
    /// Paint the whole tree, then the drag icon if a drag carries one.
    ///
    /// Each control paints its background (the box minus margin), its border,
    /// its own content and then its children back to front, clipped to its
    /// client area. Invisible controls and their subtrees are skipped.
    pub fn draw(&self, batch: &mut dyn DrawBatch) {
        let clip = Rectangle::from_size(self.viewport);
        batch.push_clip(clip);
        self.draw_control(self.root, batch, Point::ZERO, Matrix::IDENTITY, 1.0, clip);
        batch.pop_clip();

        if let Some(drag) = &self.drag {
            if let Some(icon) = &drag.icon {
                icon.draw(batch, Rectangle::from_parts(self.pointer, drag.icon_size), 1.0);
            }
        }
    }

    fn draw_control(
        &self,
        id: ControlId,
        batch: &mut dyn DrawBatch,
        origin: Point,
        parent_transform: Matrix,
        parent_alpha: f32,
        clip: Rectangle,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }

        let transform = node.transform.multiply(&parent_transform);
        let alpha = parent_alpha * node.alpha;
        let bounds = Rectangle::from_parts(origin, node.actual_size);
        let background = transform.transform_rect(bounds.deflate(node.layout.margin));
        let client_origin = origin + node.client_origin();
        let client = Rectangle::from_parts(client_origin, node.client_size());
        let screen_client = transform.transform_rect(client);

        if let Some(brush) = node.current_background() {
            brush.draw(batch, background, alpha);
        }
        if let Some(border) = &node.border {
            border.draw(batch, background, alpha);
        }
        if let Some(behavior) = &node.behavior {
            behavior.draw(self, id, batch, screen_client, alpha);
        }

        if node.children.is_empty() {
            return;
        }
        let child_clip = clip.intersection(&screen_client);
        if child_clip.is_empty() {
            return;
        }
        batch.push_clip(child_clip);
        for child in node.children.z_ascending() {
            let Some(position) = self.nodes.get(child).map(|c| c.actual_position) else {
                continue;
            };
            self.draw_control(
                child,
                batch,
                client_origin + position,
                transform,
                alpha,
                child_clip,
            );
        }
        batch.pop_clip();
    }

    /// Clear every drawing flag after a frame was painted.
    pub fn mark_drawn(&mut self) {
        for (_, node) in self.nodes.iter_mut() {
            node.drawing_invalid = false;
        }
    }

    /// Whether anything changed visually since the last [`mark_drawn`](Self::mark_drawn).
    pub fn needs_redraw(&self) -> bool {
        self.nodes.values().any(|node| node.drawing_invalid)
    }
}
