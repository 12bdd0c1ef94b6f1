//! Leaf controls.

mod button;
mod label;
mod listbox;
mod slider;
mod text_box;

pub use button::Button;
pub use label::Label;
pub use listbox::Listbox;
pub use slider::Slider;
pub use text_box::TextBox;

use skin::RgbaColor;

use crate::control::ControlId;
use crate::geometry::{Point, Size};
use crate::render::DrawBatch;
use crate::tree::UiTree;

/// Extent of `text` in the font of `id`.
pub(crate) fn measure_text(tree: &UiTree, id: ControlId, text: &str) -> Size {
    let font = tree.get(id).and_then(|node| node.font());
    tree.services().fonts.measure_string(font, text)
}

/// Draw `text` in the font and foreground color of `id`.
pub(crate) fn draw_text(
    tree: &UiTree,
    id: ControlId,
    batch: &mut dyn DrawBatch,
    text: &str,
    position: Point,
    alpha: f32,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let color = node
        .foreground()
        .unwrap_or(RgbaColor::white())
        .multiply_alpha(alpha);
    if text.is_empty() || color.is_transparent() {
        return;
    }
    batch.draw_text(node.font(), text, position, color);
}
