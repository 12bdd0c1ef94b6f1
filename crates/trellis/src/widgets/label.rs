//! Label: a line (or lines) of text.

use crate::control::{ControlBehavior, ControlId};
use crate::error::{Result, TrellisError};
use crate::geometry::{Rectangle, Size};
use crate::render::DrawBatch;
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
}

impl Label {
    pub const TAG: TypeTag = TypeTag("Label");

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Create a label and append it to `parent`.
    pub fn create(tree: &mut UiTree, parent: ControlId, text: &str) -> Result<ControlId> {
        tree.create_child(parent, Label::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(tree: &mut UiTree, id: ControlId, text: &str) -> Result<()> {
        let label = tree
            .behavior_mut::<Label>(id)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a label", id)))?;
        if label.text != text {
            label.text = text.to_string();
            tree.invalidate_dimensions(id);
        }
        Ok(())
    }
}

impl ControlBehavior for Label {
    behavior_identity!(Label::TAG);

    fn min_content_size(&self, tree: &UiTree, id: ControlId) -> Size {
        super::measure_text(tree, id, &self.text)
    }

    fn draw(
        &self,
        tree: &UiTree,
        id: ControlId,
        batch: &mut dyn DrawBatch,
        client: Rectangle,
        alpha: f32,
    ) {
        super::draw_text(tree, id, batch, &self.text, client.location(), alpha);
    }
}
