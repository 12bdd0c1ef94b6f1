//! Button: text that executes on click or Enter/Space.

use crate::control::{ControlBehavior, ControlId};
use crate::error::{Result, TrellisError};
use crate::events::{EventHandlers, KeyEventArgs, MouseEventArgs};
use crate::geometry::{Point, Rectangle, Size};
use crate::input::{KeyCode, MouseButton};
use crate::render::DrawBatch;
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

#[derive(Debug, Clone, Default)]
pub struct Button {
    text: String,
    pub executed: EventHandlers<()>,
}

impl Button {
    pub const TAG: TypeTag = TypeTag("Button");

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            executed: EventHandlers::default(),
        }
    }

    /// Create a button and append it to `parent`.
    pub fn create(tree: &mut UiTree, parent: ControlId, text: &str) -> Result<ControlId> {
        tree.create_child(parent, Button::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(tree: &mut UiTree, id: ControlId, text: &str) -> Result<()> {
        let button = tree
            .behavior_mut::<Button>(id)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a button", id)))?;
        button.text = text.to_string();
        tree.invalidate_dimensions(id);
        Ok(())
    }

    /// Subscribe to `executed` from outside the button's own hooks.
    pub fn on_executed(
        tree: &mut UiTree,
        id: ControlId,
        handler: impl Fn(&mut UiTree, ControlId, &mut ()) + 'static,
    ) -> Result<()> {
        tree.behavior_mut::<Button>(id)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a button", id)))?
            .executed
            .add(handler);
        Ok(())
    }

    fn execute(&self, tree: &mut UiTree, id: ControlId) {
        log::debug!("button {:?} executed", id);
        tree.notify(id, self.executed.clone(), ());
    }
}

impl ControlBehavior for Button {
    behavior_identity!(Button::TAG);

    fn default_can_focus(&self) -> bool {
        true
    }

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
        let extent = super::measure_text(tree, id, &self.text);
        let position = Point::new(
            client.x + (client.width - extent.width).max(0) / 2,
            client.y + (client.height - extent.height).max(0) / 2,
        );
        super::draw_text(tree, id, batch, &self.text, position, alpha);
    }

    fn on_mouse_click(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if args.button == Some(MouseButton::Left) {
            self.execute(tree, id);
            args.handled = true;
        }
    }

    fn on_key_press(&mut self, tree: &mut UiTree, id: ControlId, args: &mut KeyEventArgs) {
        if matches!(args.key, KeyCode::Enter | KeyCode::Char(' ')) {
            self.execute(tree, id);
            args.handled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{HorizontalAlignment, VerticalAlignment};
    use crate::input::{KeyModifiers, MouseButtons};
    use crate::services::{Services, SoundId};
    use crate::testing::{RecordingAudio, RecordingBatch};
    use crate::tree::TreeOptions;
    use std::cell::Cell;
    use std::rc::Rc;

    fn button_tree() -> (UiTree, ControlId, Rc<Cell<u32>>, RecordingAudio) {
        let audio = RecordingAudio::new();
        let options =
            TreeOptions::default().with_services(Services::default().with_audio(audio.clone()));
        let mut tree = UiTree::with_options(Size::new(20, 5), options).unwrap();
        let root = tree.root();
        let button = Button::create(&mut tree, root, "OK").unwrap();
        tree.get_mut(button)
            .unwrap()
            .set_size(6, 1)
            .set_horizontal_alignment(HorizontalAlignment::Left)
            .set_vertical_alignment(VerticalAlignment::Top)
            .set_click_sound(Some(SoundId(7)));
        tree.perform_layout();

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        Button::on_executed(&mut tree, button, move |_, _, _| c.set(c.get() + 1)).unwrap();
        (tree, button, count, audio)
    }

    #[test]
    fn test_click_executes_and_plays_sound() {
        let (mut tree, button, count, audio) = button_tree();
        let left = MouseButton::Left;
        tree.dispatch_mouse_down(Point::new(2, 0), left, MouseButtons::LEFT, KeyModifiers::NONE);
        assert_eq!(tree.focused(), Some(button));
        tree.dispatch_mouse_up(Point::new(3, 0), left, MouseButtons::empty(), KeyModifiers::NONE);
        assert_eq!(count.get(), 1);
        assert_eq!(audio.played(), vec![SoundId(7)]);
    }

    #[test]
    fn test_enter_and_space_execute_when_focused() {
        let (mut tree, button, count, _) = button_tree();
        let mut args = KeyEventArgs::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!tree.dispatch_key_press(&mut args));
        assert_eq!(count.get(), 0);

        tree.focus(button);
        for key in [KeyCode::Enter, KeyCode::Char(' ')] {
            let mut args = KeyEventArgs::new(key, KeyModifiers::NONE);
            assert!(tree.dispatch_key_press(&mut args));
        }
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_disabled_button_swallows_click() {
        let (mut tree, button, count, _) = button_tree();
        tree.get_mut(button).unwrap().set_enabled(false);
        let left = MouseButton::Left;
        assert!(tree.dispatch_mouse_down(Point::new(2, 0), left, MouseButtons::LEFT, KeyModifiers::NONE));
        tree.dispatch_mouse_up(Point::new(2, 0), left, MouseButtons::empty(), KeyModifiers::NONE);
        assert_eq!(count.get(), 0);
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn test_text_centered() {
        let (tree, _, _, _) = button_tree();
        let mut batch = RecordingBatch::new();
        tree.draw(&mut batch);
        insta::assert_snapshot!(batch.transcript(), @r###"
        clip 0,0 20x5
          clip 0,0 20x5
            text "OK" at 2,0 #ffffff
          unclip
        unclip
        "###);
    }
}
