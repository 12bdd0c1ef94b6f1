//! Background brushes.

use std::cell::RefCell;

use skin::{LineStyle, RgbaColor};

use super::{DrawBatch, Texture, TextureId};
use crate::geometry::{Border, Rectangle, Size};

/// Paints an area. Brushes are shared between controls and hold no per-draw
/// state, apart from caches of derived textures.
pub trait Brush {
    fn draw(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBrush {
    pub color: RgbaColor,
}

impl SolidBrush {
    pub fn new(color: RgbaColor) -> Self {
        Self { color }
    }
}

impl Brush for SolidBrush {
    fn draw(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32) {
        let color = self.color.multiply_alpha(alpha);
        if area.is_empty() || color.is_transparent() {
            return;
        }
        batch.fill_rect(area, color);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BorderKey {
    size: Size,
    width: i32,
    style: LineStyle,
}

/// An outline drawn from a texture the brush builds itself.
///
/// The texture is created on first draw and rebuilt when the area size,
/// line width or line style changes. The previous texture is released first.
#[derive(Debug)]
pub struct BorderBrush {
    color: RgbaColor,
    width: i32,
    style: LineStyle,
    // Interior mutability since draw takes &self.
    cache: RefCell<Option<(BorderKey, TextureId)>>,
}

impl BorderBrush {
    pub fn new(color: RgbaColor, width: i32, style: LineStyle) -> Self {
        Self {
            color,
            width: width.max(1),
            style,
            cache: RefCell::new(None),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(1);
    }

    pub fn set_style(&mut self, style: LineStyle) {
        self.style = style;
    }

    /// Texture currently cached, if any.
    pub fn cached_texture(&self) -> Option<TextureId> {
        self.cache.borrow().map(|(_, id)| id)
    }

    /// Release the cached texture, e.g. before dropping the brush.
    pub fn release(&self, batch: &mut dyn DrawBatch) {
        if let Some((_, id)) = self.cache.borrow_mut().take() {
            batch.release_texture(id);
        }
    }

    fn texture_for(&self, batch: &mut dyn DrawBatch, size: Size) -> TextureId {
        let key = BorderKey {
            size,
            width: self.width,
            style: self.style,
        };
        let mut cache = self.cache.borrow_mut();
        if let Some((cached_key, id)) = *cache {
            if cached_key == key {
                return id;
            }
            batch.release_texture(id);
        }

        let pixels = border_pixels(size, self.width, self.style, self.color);
        let id = batch.create_texture(size, &pixels);
        log::trace!("built border texture {:?} for {:?}", id, key);
        *cache = Some((key, id));
        id
    }
}

/// Largest texture side a border brush builds.
const MAX_TEXTURE_SIDE: i32 = 4096;

impl BorderBrush {
    /// Solid edges as four fills, for areas too large for a texture.
    fn draw_edges(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32) {
        let color = self.color.multiply_alpha(alpha);
        if color.is_transparent() {
            return;
        }
        let line = self.width.min(area.width).min(area.height);
        let inner = area.height - 2 * line;
        let edges = [
            Rectangle::new(area.x, area.y, area.width, line),
            Rectangle::new(area.x, area.y + area.height - line, area.width, line),
            Rectangle::new(area.x, area.y + line, line, inner),
            Rectangle::new(area.x + area.width - line, area.y + line, line, inner),
        ];
        for edge in edges {
            if !edge.is_empty() {
                batch.fill_rect(edge, color);
            }
        }
    }
}

impl Brush for BorderBrush {
    fn draw(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32) {
        if area.is_empty() || alpha <= 0.0 {
            return;
        }
        if area.width > MAX_TEXTURE_SIDE || area.height > MAX_TEXTURE_SIDE {
            self.draw_edges(batch, area, alpha);
            return;
        }
        let id = self.texture_for(batch, area.size());
        batch.draw_texture(id, Rectangle::from_size(area.size()), area, alpha);
    }
}

/// Whether the `index`-th pixel along an edge is inked for a line style.
fn inked(style: LineStyle, index: i32, width: i32) -> bool {
    match style {
        LineStyle::Solid => true,
        LineStyle::Dashed => (index / (width * 3)) % 2 == 0,
        LineStyle::Dotted => (index / width) % 2 == 0,
    }
}

fn border_pixels(size: Size, width: i32, style: LineStyle, color: RgbaColor) -> Vec<RgbaColor> {
    let (width_px, height_px) = (size.width.max(0) as usize, size.height.max(0) as usize);
    let mut pixels = vec![RgbaColor::transparent(); width_px * height_px];
    for y in 0..size.height {
        for x in 0..size.width {
            let horizontal_edge = y < width || y >= size.height - width;
            let vertical_edge = x < width || x >= size.width - width;
            let on = (horizontal_edge && inked(style, x, width))
                || (vertical_edge && inked(style, y, width));
            if on {
                pixels[y as usize * width_px + x as usize] = color;
            }
        }
    }
    pixels
}

/// A texture stretched over the whole area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBrush {
    pub texture: Texture,
}

impl TextureBrush {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }
}

impl Brush for TextureBrush {
    fn draw(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32) {
        if area.is_empty() || alpha <= 0.0 {
            return;
        }
        batch.draw_texture(
            self.texture.id,
            Rectangle::from_size(self.texture.size),
            area,
            alpha,
        );
    }
}

/// A texture split into a 3×3 grid: corners keep their size, edges stretch
/// along one axis and the center stretches along both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NineSliceBrush {
    pub texture: Texture,
    pub insets: Border,
}

impl NineSliceBrush {
    pub fn new(texture: Texture, insets: Border) -> Self {
        Self { texture, insets }
    }
}

/// Split `[0, total)` into three spans: `[0, a)`, `[a, total - b)`, `[total - b, total)`.
fn spans(total: i32, a: i32, b: i32) -> [(i32, i32); 3] {
    let a = a.min(total).max(0);
    let b = b.min(total - a).max(0);
    [(0, a), (a, total - a - b), (total - b, b)]
}

impl Brush for NineSliceBrush {
    fn draw(&self, batch: &mut dyn DrawBatch, area: Rectangle, alpha: f32) {
        if area.is_empty() || alpha <= 0.0 {
            return;
        }
        let tex = self.texture.size;
        let src_cols = spans(tex.width, self.insets.left, self.insets.right);
        let src_rows = spans(tex.height, self.insets.top, self.insets.bottom);
        let dst_cols = spans(area.width, self.insets.left, self.insets.right);
        let dst_rows = spans(area.height, self.insets.top, self.insets.bottom);

        for (row, (src_y, src_h)) in src_rows.iter().enumerate() {
            let (dst_y, dst_h) = dst_rows[row];
            for (col, (src_x, src_w)) in src_cols.iter().enumerate() {
                let (dst_x, dst_w) = dst_cols[col];
                let source = Rectangle::new(*src_x, *src_y, *src_w, *src_h);
                let dest = Rectangle::new(area.x + dst_x, area.y + dst_y, dst_w, dst_h);
                batch.draw_texture(self.texture.id, source, dest, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCommand, RecordingBatch};

    #[test]
    fn test_solid_brush_applies_alpha() {
        let mut batch = RecordingBatch::new();
        SolidBrush::new(RgbaColor::rgba(10, 20, 30, 0.8)).draw(
            &mut batch,
            Rectangle::new(1, 2, 3, 4),
            0.5,
        );
        match &batch.commands()[0] {
            DrawCommand::FillRect { area, color } => {
                assert_eq!(*area, Rectangle::new(1, 2, 3, 4));
                assert!((color.a - 0.4).abs() < 1e-6);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_solid_brush_skips_invisible() {
        let mut batch = RecordingBatch::new();
        SolidBrush::new(RgbaColor::white()).draw(&mut batch, Rectangle::new(0, 0, 3, 3), 0.0);
        SolidBrush::new(RgbaColor::white()).draw(&mut batch, Rectangle::new(0, 0, 0, 3), 1.0);
        assert!(batch.commands().is_empty());
    }

    #[test]
    fn test_border_brush_caches_and_rebuilds() {
        let mut batch = RecordingBatch::new();
        let mut brush = BorderBrush::new(RgbaColor::white(), 1, LineStyle::Solid);
        let area = Rectangle::new(0, 0, 4, 3);

        brush.draw(&mut batch, area, 1.0);
        brush.draw(&mut batch, area, 1.0);
        assert_eq!(batch.created_textures(), 1);
        let first = brush.cached_texture().unwrap();

        brush.set_style(LineStyle::Dotted);
        brush.draw(&mut batch, area, 1.0);
        assert_eq!(batch.created_textures(), 2);
        assert_eq!(batch.released_textures(), vec![first]);
        assert_ne!(brush.cached_texture(), Some(first));

        brush.release(&mut batch);
        assert_eq!(brush.cached_texture(), None);
        assert_eq!(batch.live_textures(), 0);
    }

    #[test]
    fn test_oversized_border_falls_back_to_fills() {
        let mut batch = RecordingBatch::new();
        let brush = BorderBrush::new(RgbaColor::white(), 2, LineStyle::Dashed);
        brush.draw(&mut batch, Rectangle::new(0, 0, 60_000, 50_000), 1.0);

        assert_eq!(batch.created_textures(), 0);
        assert_eq!(brush.cached_texture(), None);
        let fills: Vec<Rectangle> = batch
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { area, .. } => Some(*area),
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                Rectangle::new(0, 0, 60_000, 2),
                Rectangle::new(0, 49_998, 60_000, 2),
                Rectangle::new(0, 2, 2, 49_996),
                Rectangle::new(59_998, 2, 2, 49_996),
            ]
        );
    }

    #[test]
    fn test_border_pixels_leave_interior_clear() {
        let pixels = border_pixels(Size::new(4, 4), 1, LineStyle::Solid, RgbaColor::white());
        let inked: Vec<bool> = pixels.iter().map(|p| !p.is_transparent()).collect();
        assert!(inked[0] && inked[3] && inked[12] && inked[15]);
        assert!(!inked[5] && !inked[6] && !inked[9] && !inked[10]);
    }

    #[test]
    fn test_nine_slice_draws_nine_pieces() {
        let mut batch = RecordingBatch::new();
        let texture = Texture {
            id: TextureId(7),
            size: Size::new(12, 12),
        };
        NineSliceBrush::new(texture, Border::all(4)).draw(
            &mut batch,
            Rectangle::new(10, 10, 40, 20),
            1.0,
        );
        let draws: Vec<(Rectangle, Rectangle)> = batch
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture { source, dest, .. } => Some((*source, *dest)),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 9);
        // Top-left corner keeps its size, center stretches.
        assert_eq!(draws[0], (Rectangle::new(0, 0, 4, 4), Rectangle::new(10, 10, 4, 4)));
        assert_eq!(draws[4], (Rectangle::new(4, 4, 4, 4), Rectangle::new(14, 14, 32, 12)));
        assert_eq!(draws[8].1, Rectangle::new(46, 26, 4, 4));
    }
}
