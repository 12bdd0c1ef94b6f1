//! Single-line text input.
//!
//! The caret and the selection anchor are grapheme indices, so combining
//! sequences and emoji move and delete as one unit.

use std::time::Duration;

use skin::RgbaColor;

use crate::control::{ControlBehavior, ControlId, FocusState};
use crate::error::{Result, TrellisError};
use crate::events::{EventHandlers, KeyEventArgs, MouseEventArgs};
use crate::geometry::{Point, Rectangle, Size};
use crate::grapheme::{grapheme_byte_index, grapheme_byte_range, grapheme_count, grapheme_prefix};
use crate::input::{KeyCode, KeyModifiers, MouseButton};
use crate::render::DrawBatch;
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

const CARET_BLINK: Duration = Duration::from_millis(500);
const SELECTION_COLOR: RgbaColor = RgbaColor::rgba(64, 96, 160, 0.6);

#[derive(Debug, Clone, Default)]
pub struct TextBox {
    text: String,
    caret: usize,
    anchor: Option<usize>,
    caret_visible: bool,
    blink: Duration,
    /// Longest text accepted, in graphemes.
    pub max_length: Option<usize>,
    pub text_changed: EventHandlers<String>,
}

impl TextBox {
    pub const TAG: TypeTag = TypeTag("TextBox");

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.caret = grapheme_count(&self.text);
        self
    }

    /// Create an empty text box and append it to `parent`.
    pub fn create(tree: &mut UiTree, parent: ControlId) -> Result<ControlId> {
        tree.create_child(parent, TextBox::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in graphemes.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selected grapheme range, start first.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some((anchor.min(self.caret), anchor.max(self.caret)))
    }

    pub fn selected_text(&self) -> Option<&str> {
        let (start, end) = self.selection()?;
        let (from, to) = grapheme_byte_range(&self.text, start, end);
        Some(&self.text[from..to])
    }

    /// Replace the text, moving the caret to the end. Fires `text_changed`.
    pub fn set_text(tree: &mut UiTree, id: ControlId, text: &str) -> Result<()> {
        tree.with_behavior_as::<TextBox, _>(id, |text_box, tree| {
            text_box.text = text.to_string();
            text_box.caret = grapheme_count(text);
            text_box.anchor = None;
            text_box.changed(tree, id);
        })
        .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a text box", id)))
    }

    fn changed(&self, tree: &mut UiTree, id: ControlId) {
        tree.invalidate_dimensions(id);
        tree.notify(id, self.text_changed.clone(), self.text.clone());
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let (from, to) = grapheme_byte_range(&self.text, start, end);
        self.text.replace_range(from..to, "");
        self.caret = start;
        self.anchor = None;
        true
    }

    fn insert(&mut self, inserted: &str) -> bool {
        let deleted = self.delete_selection();
        let mut inserted = inserted;
        if let Some(max) = self.max_length {
            let room = max.saturating_sub(grapheme_count(&self.text));
            inserted = grapheme_prefix(inserted, room);
        }
        if inserted.is_empty() {
            return deleted;
        }
        let at = grapheme_byte_index(&self.text, self.caret);
        self.text.insert_str(at, inserted);
        self.caret += grapheme_count(inserted);
        true
    }

    fn remove_range(&mut self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        let (from, to) = grapheme_byte_range(&self.text, start, end);
        self.text.replace_range(from..to, "");
        self.caret = start;
        true
    }

    /// Move the caret, extending the selection when `extend` is set.
    fn move_caret(&mut self, target: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.caret);
        } else {
            self.anchor = None;
        }
        self.caret = target.min(grapheme_count(&self.text));
    }

    fn copy(&self, tree: &mut UiTree) -> bool {
        let Some(selected) = self.selected_text().map(str::to_string) else {
            return false;
        };
        match tree.services_mut().clipboard.as_mut() {
            Some(clipboard) => {
                clipboard.set_text(selected);
                true
            }
            None => false,
        }
    }

    fn paste(&mut self, tree: &mut UiTree) -> bool {
        let text = tree
            .services()
            .clipboard
            .as_ref()
            .and_then(|clipboard| clipboard.get_text());
        match text {
            Some(text) => {
                let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.insert(&line)
            }
            None => false,
        }
    }

    /// Horizontal offset of the caret position `index` from the client edge.
    fn caret_x(&self, tree: &UiTree, id: ControlId, index: usize) -> i32 {
        super::measure_text(tree, id, grapheme_prefix(&self.text, index)).width
    }

    /// Grapheme index closest to `x` in client coordinates.
    fn index_at(&self, tree: &UiTree, id: ControlId, x: i32) -> usize {
        (0..=grapheme_count(&self.text))
            .min_by_key(|index| (self.caret_x(tree, id, *index) - x).abs())
            .unwrap_or(0)
    }

    fn restart_blink(&mut self, tree: &mut UiTree, id: ControlId) {
        self.caret_visible = true;
        self.blink = Duration::ZERO;
        tree.invalidate_drawing(id);
    }
}

impl ControlBehavior for TextBox {
    behavior_identity!(TextBox::TAG);

    fn default_can_focus(&self) -> bool {
        true
    }

    fn min_content_size(&self, tree: &UiTree, id: ControlId) -> Size {
        let probe = if self.text.is_empty() { " " } else { self.text.as_str() };
        let extent = super::measure_text(tree, id, probe);
        // Room for the caret after the last grapheme.
        Size::new(extent.width + 1, extent.height)
    }

    fn update(&mut self, tree: &mut UiTree, id: ControlId, elapsed: Duration) {
        let focused = tree
            .get(id)
            .is_some_and(|node| node.focus_state() == FocusState::Active);
        if !focused {
            if self.caret_visible {
                self.caret_visible = false;
                tree.invalidate_drawing(id);
            }
            return;
        }
        self.blink += elapsed;
        while self.blink >= CARET_BLINK {
            self.blink -= CARET_BLINK;
            self.caret_visible = !self.caret_visible;
            tree.invalidate_drawing(id);
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
        let line_height = super::measure_text(tree, id, " ").height.max(1);
        if let Some((start, end)) = self.selection() {
            let from = self.caret_x(tree, id, start);
            let to = self.caret_x(tree, id, end);
            batch.fill_rect(
                Rectangle::new(client.x + from, client.y, to - from, line_height),
                SELECTION_COLOR.multiply_alpha(alpha),
            );
        }
        super::draw_text(tree, id, batch, &self.text, client.location(), alpha);

        let focused = tree
            .get(id)
            .is_some_and(|node| node.focus_state() == FocusState::Active);
        if focused && self.caret_visible {
            let color = tree
                .get(id)
                .and_then(|node| node.foreground())
                .unwrap_or(RgbaColor::white())
                .multiply_alpha(alpha);
            let x = self.caret_x(tree, id, self.caret);
            batch.fill_rect(
                Rectangle::from_parts(
                    Point::new(client.x + x, client.y),
                    Size::new(1, line_height),
                ),
                color,
            );
        }
    }

    fn on_got_focus(&mut self, tree: &mut UiTree, id: ControlId) {
        self.restart_blink(tree, id);
    }

    fn on_lost_focus(&mut self, tree: &mut UiTree, id: ControlId) {
        self.caret_visible = false;
        tree.invalidate_drawing(id);
    }

    fn on_mouse_down(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if args.button != Some(MouseButton::Left) {
            return;
        }
        let Some(origin) = tree.get(id).map(|node| node.client_origin()) else {
            return;
        };
        let index = self.index_at(tree, id, args.position.x - origin.x);
        let extend = args.modifiers.contains(KeyModifiers::SHIFT);
        self.move_caret(index, extend);
        self.restart_blink(tree, id);
        args.handled = true;
    }

    fn on_key_press(&mut self, tree: &mut UiTree, id: ControlId, args: &mut KeyEventArgs) {
        let control = args.has_modifier(KeyModifiers::CONTROL);
        let shift = args.has_modifier(KeyModifiers::SHIFT);
        let length = grapheme_count(&self.text);

        let edited = match args.key {
            KeyCode::Char('a') | KeyCode::Char('A') if control => {
                self.anchor = Some(0);
                self.caret = length;
                false
            }
            KeyCode::Char('c') | KeyCode::Char('C') if control => {
                self.copy(tree);
                false
            }
            KeyCode::Char('x') | KeyCode::Char('X') if control => {
                self.copy(tree) && self.delete_selection()
            }
            KeyCode::Char('v') | KeyCode::Char('V') if control => self.paste(tree),
            KeyCode::Char(_) if control => return,
            KeyCode::Char(c) => {
                let mut buffer = [0u8; 4];
                self.insert(c.encode_utf8(&mut buffer))
            }
            KeyCode::Backspace => {
                self.delete_selection() || self.remove_range(self.caret.saturating_sub(1), self.caret)
            }
            KeyCode::Delete => {
                self.delete_selection() || self.remove_range(self.caret, (self.caret + 1).min(length))
            }
            KeyCode::Left => {
                match self.selection() {
                    Some((start, _)) if !shift => self.move_caret(start, false),
                    _ => self.move_caret(self.caret.saturating_sub(1), shift),
                }
                false
            }
            KeyCode::Right => {
                match self.selection() {
                    Some((_, end)) if !shift => self.move_caret(end, false),
                    _ => self.move_caret(self.caret + 1, shift),
                }
                false
            }
            KeyCode::Home => {
                self.move_caret(0, shift);
                false
            }
            KeyCode::End => {
                self.move_caret(length, shift);
                false
            }
            _ => return,
        };

        if edited {
            self.changed(tree, id);
        }
        self.restart_blink(tree, id);
        args.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{HorizontalAlignment, VerticalAlignment};
    use crate::services::Services;
    use crate::testing::{MemoryClipboard, RecordingBatch};
    use crate::tree::TreeOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        tree: UiTree,
        id: ControlId,
        clipboard: MemoryClipboard,
        changes: Rc<RefCell<Vec<String>>>,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let clipboard = MemoryClipboard::new();
            let options = TreeOptions::default()
                .with_services(Services::default().with_clipboard(clipboard.clone()));
            let mut tree = UiTree::with_options(Size::new(30, 3), options).unwrap();
            let root = tree.root();
            let id = tree.create_child(root, TextBox::new().with_text(text)).unwrap();
            tree.get_mut(id)
                .unwrap()
                .set_horizontal_alignment(HorizontalAlignment::Left)
                .set_vertical_alignment(VerticalAlignment::Top);
            tree.perform_layout();
            tree.focus(id);

            let changes = Rc::new(RefCell::new(Vec::new()));
            let c = changes.clone();
            tree.behavior_mut::<TextBox>(id)
                .unwrap()
                .text_changed
                .add(move |_, _, text| c.borrow_mut().push(text.clone()));
            Self {
                tree,
                id,
                clipboard,
                changes,
            }
        }

        fn press(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
            let mut args = KeyEventArgs::new(key, modifiers);
            self.tree.dispatch_key_press(&mut args)
        }

        fn type_str(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c), KeyModifiers::NONE);
            }
        }

        fn text_box(&self) -> &TextBox {
            self.tree.behavior::<TextBox>(self.id).unwrap()
        }
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut f = Fixture::new("");
        f.type_str("helo");
        f.press(KeyCode::Left, KeyModifiers::NONE);
        f.type_str("l");
        assert_eq!(f.text_box().text(), "hello");
        assert_eq!(f.text_box().caret(), 4);

        f.press(KeyCode::Backspace, KeyModifiers::NONE);
        f.press(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(f.text_box().text(), "hel");
        f.press(KeyCode::Home, KeyModifiers::NONE);
        f.press(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(f.text_box().text(), "hel");
        assert_eq!(f.changes.borrow().last().map(String::as_str), Some("hel"));
        assert_eq!(f.changes.borrow().len(), 7);
    }

    #[test]
    fn test_caret_moves_by_grapheme() {
        let mut f = Fixture::new("ae\u{301}b");
        f.press(KeyCode::Left, KeyModifiers::NONE);
        f.press(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(f.text_box().text(), "ab");
        assert_eq!(f.text_box().caret(), 1);
    }

    #[test]
    fn test_shift_selection_and_replace() {
        let mut f = Fixture::new("hello world");
        f.press(KeyCode::Home, KeyModifiers::NONE);
        for _ in 0..5 {
            f.press(KeyCode::Right, KeyModifiers::SHIFT);
        }
        assert_eq!(f.text_box().selected_text(), Some("hello"));
        f.type_str("bye");
        assert_eq!(f.text_box().text(), "bye world");
        assert_eq!(f.text_box().selection(), None);
    }

    #[test]
    fn test_clipboard_copy_cut_paste() {
        let mut f = Fixture::new("abc");
        let ctrl = KeyModifiers::CONTROL;
        f.press(KeyCode::Char('a'), ctrl);
        f.press(KeyCode::Char('c'), ctrl);
        assert_eq!(f.clipboard.contents().as_deref(), Some("abc"));

        f.press(KeyCode::Char('x'), ctrl);
        assert_eq!(f.text_box().text(), "");
        f.press(KeyCode::Char('v'), ctrl);
        f.press(KeyCode::Char('v'), ctrl);
        assert_eq!(f.text_box().text(), "abcabc");
    }

    #[test]
    fn test_max_length() {
        let mut f = Fixture::new("");
        f.tree.behavior_mut::<TextBox>(f.id).unwrap().max_length = Some(3);
        f.type_str("abcdef");
        assert_eq!(f.text_box().text(), "abc");
    }

    #[test]
    fn test_caret_blinks_while_focused() {
        let mut f = Fixture::new("ab");
        let caret_drawn = |tree: &UiTree| {
            let mut batch = RecordingBatch::new();
            tree.draw(&mut batch);
            batch.transcript().contains("fill 2,0 1x1")
        };
        assert!(caret_drawn(&f.tree));

        let id = f.id;
        f.tree.with_behavior(id, |behavior, tree| {
            behavior.update(tree, id, Duration::from_millis(600))
        });
        assert!(!caret_drawn(&f.tree));

        f.tree.clear_focus();
        f.tree.with_behavior(id, |behavior, tree| {
            behavior.update(tree, id, Duration::from_millis(500))
        });
        assert!(!caret_drawn(&f.tree));
    }
}
