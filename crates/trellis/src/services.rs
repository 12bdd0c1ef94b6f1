//! Host capabilities the control tree consumes.
//!
//! The tree never loads files, plays audio or touches the system clipboard
//! itself. The host hands these in once, through [`Services`], and controls
//! reach them via [`UiTree::services`](crate::tree::UiTree::services).

use crate::geometry::Size;
use crate::grapheme::display_width;
use crate::render::{FontId, Texture};

/// Text measurement.
pub trait FontMetrics {
    /// Extent of `text` drawn in `font` (the default font when `None`).
    fn measure_string(&self, font: Option<FontId>, text: &str) -> Size;
}

/// Measures text in terminal cells: one cell per column of display width and
/// one row per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellFontMetrics;

impl FontMetrics for CellFontMetrics {
    fn measure_string(&self, _font: Option<FontId>, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let mut width = 0;
        let mut height = 0;
        for line in text.split('\n') {
            width = width.max(display_width(line) as i32);
            height += 1;
        }
        Size::new(width, height)
    }
}

/// Opaque handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Fire-and-forget audio playback.
pub trait AudioSink {
    fn play(&self, sound: SoundId);
}

/// Audio sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, _sound: SoundId) {}
}

/// Plain-text clipboard used by text input controls.
pub trait Clipboard {
    fn get_text(&self) -> Option<String>;
    fn set_text(&mut self, text: String);
    fn clear(&mut self);
}

/// Resolves the asset names a skin refers to.
///
/// Returning `None` makes skin application fail with
/// [`SkinError::MissingAsset`](skin::SkinError::MissingAsset).
pub trait AssetLoader {
    fn font(&self, name: &str) -> Option<FontId>;
    fn texture(&self, name: &str) -> Option<Texture>;
    fn sound(&self, name: &str) -> Option<SoundId>;
}

/// Loader that knows no assets. Suitable for skins built only from colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn font(&self, _name: &str) -> Option<FontId> {
        None
    }

    fn texture(&self, _name: &str) -> Option<Texture> {
        None
    }

    fn sound(&self, _name: &str) -> Option<SoundId> {
        None
    }
}

/// The capability set owned by a [`UiTree`](crate::tree::UiTree).
pub struct Services {
    pub fonts: Box<dyn FontMetrics>,
    pub audio: Box<dyn AudioSink>,
    pub clipboard: Option<Box<dyn Clipboard>>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            fonts: Box::new(CellFontMetrics),
            audio: Box::new(SilentAudio),
            clipboard: None,
        }
    }
}

impl Services {
    pub fn with_fonts(mut self, fonts: impl FontMetrics + 'static) -> Self {
        self.fonts = Box::new(fonts);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_metrics_multiline() {
        let metrics = CellFontMetrics;
        assert_eq!(metrics.measure_string(None, ""), Size::ZERO);
        assert_eq!(metrics.measure_string(None, "hello"), Size::new(5, 1));
        assert_eq!(metrics.measure_string(None, "ab\nlonger\n"), Size::new(6, 3));
    }

    #[test]
    fn test_cell_metrics_wide_glyphs() {
        assert_eq!(CellFontMetrics.measure_string(None, "日本"), Size::new(4, 1));
    }
}
