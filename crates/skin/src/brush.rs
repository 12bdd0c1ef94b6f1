//! Brush specifications: what a skin asks a control to paint with.
//!
//! These are plain descriptions. The renderer-side brushes that own derived
//! textures live in the `trellis` crate and are built from these specs.

use crate::color::RgbaColor;
use crate::error::AssetKind;

/// Line pattern used by border brushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }
}

/// A brush as declared in a skin sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum BrushSpec {
    /// Fill with a single color.
    Solid(RgbaColor),
    /// Outline of `width` units in `color`.
    Border {
        color: RgbaColor,
        width: i32,
        style: LineStyle,
    },
    /// A named texture stretched over the area.
    Texture { name: String },
    /// A named texture split into nine slices with equal `inset` on each side.
    NineSlice { name: String, inset: i32 },
}

impl BrushSpec {
    /// The texture asset this brush depends on, if any.
    pub fn texture_name(&self) -> Option<&str> {
        match self {
            BrushSpec::Texture { name } | BrushSpec::NineSlice { name, .. } => Some(name),
            BrushSpec::Solid(_) | BrushSpec::Border { .. } => None,
        }
    }

    pub(crate) fn asset(&self) -> Option<(AssetKind, &str)> {
        self.texture_name().map(|name| (AssetKind::Texture, name))
    }
}

/// Spacing on four sides, as used by `padding` and `margin` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    pub const fn all(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub const fn vertical_horizontal(vertical: i32, horizontal: i32) -> Self {
        Self {
            left: horizontal,
            top: vertical,
            right: horizontal,
            bottom: vertical,
        }
    }
}
