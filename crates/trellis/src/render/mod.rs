//! Rendering contracts.
//!
//! Controls never talk to a GPU. They record into a [`DrawBatch`] supplied by
//! the host each frame, and paint backgrounds through [`Brush`] strategies.

mod brush;
mod draw;

pub use brush::{Brush, BorderBrush, NineSliceBrush, SolidBrush, TextureBrush};

use skin::RgbaColor;

use crate::geometry::{Point, Rectangle, Size};

/// Opaque handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture handle with its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    pub id: TextureId,
    pub size: Size,
}

/// Opaque handle to a loaded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// The renderer's per-frame command sink.
///
/// Clip rectangles arrive already intersected with the enclosing clip, so an
/// implementation only needs to apply the top of its stack.
pub trait DrawBatch {
    fn fill_rect(&mut self, area: Rectangle, color: RgbaColor);

    /// Draw the `source` region of `texture` stretched over `dest`.
    fn draw_texture(&mut self, texture: TextureId, source: Rectangle, dest: Rectangle, alpha: f32);

    fn draw_text(&mut self, font: Option<FontId>, text: &str, position: Point, color: RgbaColor);

    fn push_clip(&mut self, area: Rectangle);

    fn pop_clip(&mut self);

    /// Upload a row-major pixel buffer of `size.width * size.height` entries.
    fn create_texture(&mut self, size: Size, pixels: &[RgbaColor]) -> TextureId;

    fn release_texture(&mut self, texture: TextureId);
}
