//! Test utilities for driving a tree without a renderer or a terminal.
//!
//! - [`RecordingBatch`] records draw commands and renders them as a text
//!   transcript suitable for snapshot tests.
//! - [`FixedFontMetrics`], [`MemoryClipboard`] and [`RecordingAudio`] stand in
//!   for host services. The clipboard and audio recorders share their state
//!   with clones, so a test can keep a handle after moving one into
//!   [`Services`](crate::services::Services).
//! - [`ManualInput`] builds input snapshots by hand.
//!
//! # Example
//! ```ignore
//! let mut batch = RecordingBatch::new();
//! tree.draw(&mut batch);
//! insta::assert_snapshot!(batch.transcript(), @"...");
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::rc::Rc;

use skin::RgbaColor;

use crate::geometry::{Point, Rectangle, Size};
use crate::input::{InputMode, InputSnapshot, InputSource, KeyCode, KeyModifiers, MouseButton};
use crate::render::{DrawBatch, FontId, TextureId};
use crate::services::{AudioSink, Clipboard, FontMetrics, SoundId};

// =============================================================================
// Draw recording
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        area: Rectangle,
        color: RgbaColor,
    },
    Texture {
        texture: TextureId,
        source: Rectangle,
        dest: Rectangle,
        alpha: f32,
    },
    Text {
        font: Option<FontId>,
        text: String,
        position: Point,
        color: RgbaColor,
    },
    PushClip(Rectangle),
    PopClip,
}

/// A [`DrawBatch`] that remembers everything it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingBatch {
    commands: Vec<DrawCommand>,
    next_texture: u32,
    created: usize,
    released: Vec<TextureId>,
    live: HashSet<TextureId>,
}

impl RecordingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of textures created so far.
    pub fn created_textures(&self) -> usize {
        self.created
    }

    /// Textures released so far, in order.
    pub fn released_textures(&self) -> Vec<TextureId> {
        self.released.clone()
    }

    /// Textures created and not yet released.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// One line per command, clip nesting shown by indentation.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for command in &self.commands {
            if matches!(command, DrawCommand::PopClip) {
                depth = depth.saturating_sub(1);
            }
            let indent = "  ".repeat(depth);
            let line = match command {
                DrawCommand::FillRect { area, color } => {
                    format!("fill {} {}", rect(area), color.to_hex())
                }
                DrawCommand::Texture {
                    texture,
                    source,
                    dest,
                    alpha,
                } => format!(
                    "texture #{} {} -> {} a={:.2}",
                    texture.0,
                    rect(source),
                    rect(dest),
                    alpha
                ),
                DrawCommand::Text {
                    text,
                    position,
                    color,
                    ..
                } => format!(
                    "text {:?} at {},{} {}",
                    text,
                    position.x,
                    position.y,
                    color.to_hex()
                ),
                DrawCommand::PushClip(area) => format!("clip {}", rect(area)),
                DrawCommand::PopClip => "unclip".to_string(),
            };
            let _ = writeln!(out, "{}{}", indent, line);
            if matches!(command, DrawCommand::PushClip(_)) {
                depth += 1;
            }
        }
        out
    }
}

fn rect(area: &Rectangle) -> String {
    format!("{},{} {}x{}", area.x, area.y, area.width, area.height)
}

impl DrawBatch for RecordingBatch {
    fn fill_rect(&mut self, area: Rectangle, color: RgbaColor) {
        self.commands.push(DrawCommand::FillRect { area, color });
    }

    fn draw_texture(&mut self, texture: TextureId, source: Rectangle, dest: Rectangle, alpha: f32) {
        self.commands.push(DrawCommand::Texture {
            texture,
            source,
            dest,
            alpha,
        });
    }

    fn draw_text(&mut self, font: Option<FontId>, text: &str, position: Point, color: RgbaColor) {
        self.commands.push(DrawCommand::Text {
            font,
            text: text.to_string(),
            position,
            color,
        });
    }

    fn push_clip(&mut self, area: Rectangle) {
        self.commands.push(DrawCommand::PushClip(area));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }

    fn create_texture(&mut self, _size: Size, _pixels: &[RgbaColor]) -> TextureId {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.created += 1;
        self.live.insert(id);
        id
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.live.remove(&texture);
        self.released.push(texture);
    }
}

// =============================================================================
// Services
// =============================================================================

/// Every grapheme is `char_width` wide and every line `line_height` tall.
#[derive(Debug, Clone, Copy)]
pub struct FixedFontMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl FixedFontMetrics {
    pub fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl FontMetrics for FixedFontMetrics {
    fn measure_string(&self, _font: Option<FontId>, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines
            .iter()
            .map(|line| crate::grapheme::grapheme_count(line) as i32)
            .max()
            .unwrap_or(0);
        Size::new(
            widest * self.char_width,
            lines.len() as i32 * self.line_height,
        )
    }
}

/// An in-memory clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    fn set_text(&mut self, text: String) {
        *self.contents.borrow_mut() = Some(text);
    }

    fn clear(&mut self) {
        *self.contents.borrow_mut() = None;
    }
}

/// Records every sound played. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Rc<RefCell<Vec<SoundId>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundId> {
        self.played.borrow().clone()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&self, sound: SoundId) {
        self.played.borrow_mut().push(sound);
    }
}

// =============================================================================
// Input
// =============================================================================

/// An [`InputSource`] whose state is set by hand. Wheel movement is consumed
/// by the next snapshot; everything else persists until changed.
#[derive(Debug, Clone, Default)]
pub struct ManualInput {
    state: InputSnapshot,
    mode: InputMode,
}

impl ManualInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> &mut Self {
        self.state.pointer = Point::new(x, y);
        self
    }

    pub fn press(&mut self, button: MouseButton) -> &mut Self {
        self.state.buttons.insert(button.flag());
        self
    }

    pub fn release(&mut self, button: MouseButton) -> &mut Self {
        self.state.buttons.remove(button.flag());
        self
    }

    pub fn scroll(&mut self, notches: i32) -> &mut Self {
        self.state.wheel += notches;
        self
    }

    pub fn key_down(&mut self, key: KeyCode) -> &mut Self {
        self.state.keys.insert(key);
        self
    }

    pub fn key_up(&mut self, key: KeyCode) -> &mut Self {
        self.state.keys.remove(&key);
        self
    }

    pub fn set_modifiers(&mut self, modifiers: KeyModifiers) -> &mut Self {
        self.state.modifiers = modifiers;
        self
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.state
    }
}

impl InputSource for ManualInput {
    fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = self.state.clone();
        self.state.wheel = 0;
        snapshot
    }

    fn mode(&self) -> InputMode {
        self.mode
    }

    fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_indents_clips() {
        let mut batch = RecordingBatch::new();
        batch.push_clip(Rectangle::new(0, 0, 4, 2));
        batch.fill_rect(Rectangle::new(1, 0, 2, 1), RgbaColor::rgb(255, 0, 0));
        batch.draw_text(None, "hi", Point::new(1, 1), RgbaColor::white());
        batch.pop_clip();
        insta::assert_snapshot!(batch.transcript(), @r###"
        clip 0,0 4x2
          fill 1,0 2x1 #ff0000
          text "hi" at 1,1 #ffffff
        unclip
        "###);
    }

    #[test]
    fn test_fixed_metrics() {
        let metrics = FixedFontMetrics::new(2, 3);
        assert_eq!(metrics.measure_string(None, "abc"), Size::new(6, 3));
        assert_eq!(metrics.measure_string(None, "a\nbcd"), Size::new(6, 6));
    }

    #[test]
    fn test_manual_input_wheel_is_consumed() {
        let mut input = ManualInput::new();
        input.move_to(3, 4).scroll(2).press(MouseButton::Left);
        let first = input.snapshot();
        let second = input.snapshot();
        assert_eq!(first.wheel, 2);
        assert_eq!(second.wheel, 0);
        assert!(second.is_down(MouseButton::Left));
        assert_eq!(second.pointer, Point::new(3, 4));
    }
}
