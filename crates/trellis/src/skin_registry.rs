//! Applying skins to controls.
//!
//! Every control is skinned once, right after creation, through
//! [`ControlBehavior::apply_skin`](crate::control::ControlBehavior::apply_skin).
//! The base step resolves the control's [`SkinStyle`] into brushes, insets,
//! colors and sounds. Hosts can add per-type steps with
//! [`UiTree::register_skin`]; they run after the base step.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use skin::{AssetKind, BrushSpec, SkinError, SkinStyle};

use crate::control::{Backgrounds, ControlId};
use crate::error::Result;
use crate::geometry::Border;
use crate::render::{BorderBrush, Brush, FontId, NineSliceBrush, SolidBrush, TextureBrush};
use crate::services::{AssetLoader, SoundId};
use crate::tree::UiTree;

/// Name of a control type, as used for skin lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(pub &'static str);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A per-type skin step.
pub type SkinFn = fn(&mut UiTree, ControlId) -> Result<()>;

#[derive(Debug, Default, Clone)]
pub struct SkinRegistry {
    steps: HashMap<TypeTag, SkinFn>,
}

impl SkinRegistry {
    pub fn register(&mut self, tag: TypeTag, step: SkinFn) -> Option<SkinFn> {
        self.steps.insert(tag, step)
    }

    pub fn get(&self, tag: TypeTag) -> Option<SkinFn> {
        self.steps.get(&tag).copied()
    }
}

/// Build a brush from its skin description.
pub fn brush_from_spec(spec: &BrushSpec, assets: &dyn AssetLoader) -> Result<Rc<dyn Brush>> {
    let brush: Rc<dyn Brush> = match spec {
        BrushSpec::Solid(color) => Rc::new(SolidBrush::new(*color)),
        BrushSpec::Border {
            color,
            width,
            style,
        } => Rc::new(BorderBrush::new(*color, *width, *style)),
        BrushSpec::Texture { name } => Rc::new(TextureBrush::new(texture(assets, name)?)),
        BrushSpec::NineSlice { name, inset } => Rc::new(NineSliceBrush::new(
            texture(assets, name)?,
            Border::all(*inset),
        )),
    };
    Ok(brush)
}

fn missing(kind: AssetKind, name: &str) -> SkinError {
    SkinError::MissingAsset {
        kind,
        name: name.to_string(),
    }
}

fn texture(assets: &dyn AssetLoader, name: &str) -> Result<crate::render::Texture> {
    Ok(assets
        .texture(name)
        .ok_or_else(|| missing(AssetKind::Texture, name))?)
}

pub(crate) fn font(assets: &dyn AssetLoader, name: &str) -> Result<FontId> {
    Ok(assets
        .font(name)
        .ok_or_else(|| missing(AssetKind::Font, name))?)
}

pub(crate) fn sound(assets: &dyn AssetLoader, name: &str) -> Result<SoundId> {
    Ok(assets
        .sound(name)
        .ok_or_else(|| missing(AssetKind::Sound, name))?)
}

fn optional_brush(
    spec: Option<&BrushSpec>,
    assets: &dyn AssetLoader,
) -> Result<Option<Rc<dyn Brush>>> {
    spec.map(|spec| brush_from_spec(spec, assets)).transpose()
}

/// Resolved brushes for a style's four background states.
pub fn backgrounds_from_style(style: &SkinStyle, assets: &dyn AssetLoader) -> Result<Backgrounds> {
    Ok(Backgrounds {
        normal: optional_brush(style.background.as_ref(), assets)?,
        hover: optional_brush(style.hover_background.as_ref(), assets)?,
        pressed: optional_brush(style.pressed_background.as_ref(), assets)?,
        disabled: optional_brush(style.disabled_background.as_ref(), assets)?,
    })
}

impl UiTree {
    /// Register a skin step for every control of type `tag` created from now on.
    pub fn register_skin(&mut self, tag: TypeTag, step: SkinFn) {
        if self.skin_registry.register(tag, step).is_some() {
            log::debug!("replaced skin step for {}", tag);
        }
    }

    /// The base skin step: apply the style named by the control's style tag
    /// (or type name), then any registered step for its type.
    pub fn apply_base_skin(&mut self, id: ControlId) -> Result<()> {
        let node = self.node(id)?;
        let tag = node.type_tag();
        let style_name = node.style_name().to_string();

        if let Some(style) = self.skin.clone().style(&style_name) {
            self.apply_style(id, style)?;
        } else {
            log::trace!("no skin style for {}", style_name);
        }

        if let Some(step) = self.skin_registry.get(tag) {
            step(self, id)?;
        }
        Ok(())
    }

    /// Resolve `style` and apply it to `id`.
    pub fn apply_style(&mut self, id: ControlId, style: &SkinStyle) -> Result<()> {
        let assets = self.assets.as_ref();
        let backgrounds = backgrounds_from_style(style, assets)?;
        let border = optional_brush(style.border.as_ref(), assets)?;
        let font = style
            .font
            .as_deref()
            .map(|name| font(assets, name))
            .transpose()?;
        let click_sound = style
            .click_sound
            .as_deref()
            .map(|name| sound(assets, name))
            .transpose()?;
        let hover_sound = style
            .hover_sound
            .as_deref()
            .map(|name| sound(assets, name))
            .transpose()?;

        let node = self.node_mut(id)?;
        node.set_backgrounds(backgrounds);
        if border.is_some() {
            node.set_border_brush(border);
        }
        if let Some(padding) = style.padding {
            node.set_padding(padding.into());
        }
        if let Some(margin) = style.margin {
            node.set_margin(margin.into());
        }
        if let Some(color) = style.color {
            node.set_foreground(Some(color));
        }
        if font.is_some() {
            node.set_font(font);
        }
        if let Some(alpha) = style.alpha {
            node.set_alpha(alpha);
        }
        if click_sound.is_some() {
            node.set_click_sound(click_sound);
        }
        if hover_sound.is_some() {
            node.set_hover_sound(hover_sound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Panel;
    use crate::error::TrellisError;
    use crate::geometry::Size;
    use crate::services::NoAssets;
    use crate::tree::TreeOptions;
    use skin::{RgbaColor, Skin};

    #[test]
    fn test_missing_texture_is_an_error() {
        let spec = BrushSpec::Texture {
            name: "panel".to_string(),
        };
        let err = brush_from_spec(&spec, &NoAssets).err();
        assert!(matches!(
            err,
            Some(TrellisError::Skin(SkinError::MissingAsset {
                kind: AssetKind::Texture,
                ..
            }))
        ));
    }

    #[test]
    fn test_base_skin_applies_style() {
        let skin = Skin::parse(
            "Panel { background: #102030; padding: 2; color: #ffffff; }\n\
             Panel:hover { background: #203040; }",
        )
        .unwrap();
        let mut tree =
            UiTree::with_options(Size::new(20, 10), TreeOptions::default().with_skin(skin))
                .unwrap();
        let panel = tree.create(Panel).unwrap();
        let node = tree.get(panel).unwrap();
        assert_eq!(node.layout().padding, Border::all(2));
        assert_eq!(node.foreground(), Some(RgbaColor::white()));
        assert!(node.backgrounds().normal.is_some());
        assert!(node.backgrounds().hover.is_some());
        assert!(node.backgrounds().pressed.is_none());
    }

    #[test]
    fn test_create_fails_on_missing_asset() {
        let skin = Skin::parse("Panel { font: \"title\"; }").unwrap();
        let result = UiTree::with_options(Size::new(20, 10), TreeOptions::default().with_skin(skin));
        assert!(matches!(result, Err(TrellisError::Skin(_))));
    }

    #[test]
    fn test_registered_step_runs_after_style() {
        let mut tree = UiTree::new(Size::new(20, 10));
        tree.register_skin(Panel::TAG, |tree, id| {
            tree.node_mut(id)?.set_alpha(0.5);
            Ok(())
        });
        let panel = tree.create(Panel).unwrap();
        assert_eq!(tree.get(panel).map(|n| n.alpha()), Some(0.5));
    }
}
