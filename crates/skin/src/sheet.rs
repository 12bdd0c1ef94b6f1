//! Interpreting parsed rules into per-type styles.
//!
//! Rules for the same type merge in source order: a later declaration of a
//! property replaces an earlier one. Rules with a state selector may only set
//! `background`, which becomes the background for that visual state.

use std::collections::HashMap;
use std::path::Path;

use crate::brush::{BrushSpec, Insets, LineStyle};
use crate::color::RgbaColor;
use crate::error::{AssetKind, SkinError};
use crate::parser::{Declaration, Value, parse_rules};
use crate::states::VisualStates;

/// Everything a skin says about one control type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinStyle {
    pub background: Option<BrushSpec>,
    pub hover_background: Option<BrushSpec>,
    pub pressed_background: Option<BrushSpec>,
    pub disabled_background: Option<BrushSpec>,
    /// Drawn on top of the background in every state.
    pub border: Option<BrushSpec>,
    pub padding: Option<Insets>,
    pub margin: Option<Insets>,
    pub color: Option<RgbaColor>,
    pub font: Option<String>,
    pub alpha: Option<f32>,
    pub click_sound: Option<String>,
    pub hover_sound: Option<String>,
}

impl SkinStyle {
    /// Background for a state, following the disabled > pressed > hover
    /// precedence and falling back to the plain background.
    pub fn background_for(&self, states: VisualStates) -> Option<&BrushSpec> {
        let dominant = states.dominant();
        let stateful = if dominant == VisualStates::DISABLED {
            self.disabled_background.as_ref()
        } else if dominant == VisualStates::PRESSED {
            self.pressed_background.as_ref()
        } else if dominant == VisualStates::HOVER {
            self.hover_background.as_ref()
        } else {
            None
        };
        stateful.or(self.background.as_ref())
    }

    fn background_slot(&mut self, state: VisualStates) -> &mut Option<BrushSpec> {
        match state.dominant() {
            s if s == VisualStates::DISABLED => &mut self.disabled_background,
            s if s == VisualStates::PRESSED => &mut self.pressed_background,
            s if s == VisualStates::HOVER => &mut self.hover_background,
            _ => &mut self.background,
        }
    }

    fn assets(&self) -> impl Iterator<Item = (AssetKind, &str)> {
        let brushes = [
            &self.background,
            &self.hover_background,
            &self.pressed_background,
            &self.disabled_background,
            &self.border,
        ];
        brushes
            .into_iter()
            .filter_map(|b| b.as_ref().and_then(BrushSpec::asset))
            .chain(self.font.as_deref().map(|f| (AssetKind::Font, f)))
            .chain(self.click_sound.as_deref().map(|s| (AssetKind::Sound, s)))
            .chain(self.hover_sound.as_deref().map(|s| (AssetKind::Sound, s)))
    }
}

/// A parsed skin: styles keyed by control type name.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    styles: HashMap<String, SkinStyle>,
}

impl Skin {
    /// Parse a skin sheet.
    pub fn parse(source: &str) -> Result<Self, SkinError> {
        let mut skin = Skin::default();

        for rule in parse_rules(source)? {
            for selector in &rule.selectors {
                let rule_name = match selector.state.name() {
                    Some(state) => format!("{}:{}", selector.type_name, state),
                    None => selector.type_name.clone(),
                };
                let style = skin.styles.entry(selector.type_name.clone()).or_default();
                for declaration in &rule.declarations {
                    apply_declaration(style, selector.state, &rule_name, declaration)?;
                }
            }
        }

        Ok(skin)
    }

    /// Read and parse a skin sheet file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SkinError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn style(&self, type_name: &str) -> Option<&SkinStyle> {
        self.styles.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Every named asset the skin refers to, sorted and deduplicated.
    pub fn referenced_assets(&self) -> Vec<(AssetKind, String)> {
        let mut assets: Vec<(AssetKind, String)> = self
            .styles
            .values()
            .flat_map(|style| style.assets())
            .map(|(kind, name)| (kind, name.to_string()))
            .collect();
        assets.sort();
        assets.dedup();
        assets
    }
}

fn apply_declaration(
    style: &mut SkinStyle,
    state: VisualStates,
    rule_name: &str,
    declaration: &Declaration,
) -> Result<(), SkinError> {
    let property = declaration.property.as_str();
    let values = declaration.values.as_slice();

    if !state.is_empty() && property != "background" {
        return Err(SkinError::UnknownProperty {
            rule: rule_name.to_string(),
            property: property.to_string(),
        });
    }

    match property {
        "background" => *style.background_slot(state) = Some(single_brush(property, values)?),
        "border" => style.border = Some(single_brush(property, values)?),
        "padding" => style.padding = Some(insets(property, values)?),
        "margin" => style.margin = Some(insets(property, values)?),
        "color" => style.color = Some(single_color(property, values)?),
        "font" => style.font = Some(single_name(property, values)?),
        "alpha" => {
            let alpha = single_number(property, values)?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid(property, values));
            }
            style.alpha = Some(alpha as f32);
        }
        "click-sound" => style.click_sound = Some(single_name(property, values)?),
        "hover-sound" => style.hover_sound = Some(single_name(property, values)?),
        _ => {
            return Err(SkinError::UnknownProperty {
                rule: rule_name.to_string(),
                property: property.to_string(),
            });
        }
    }

    Ok(())
}

fn invalid(property: &str, values: &[Value]) -> SkinError {
    SkinError::InvalidValue {
        property: property.to_string(),
        value: format!("{:?}", values),
    }
}

fn single<'a>(property: &str, values: &'a [Value]) -> Result<&'a Value, SkinError> {
    match values {
        [value] => Ok(value),
        _ => Err(invalid(property, values)),
    }
}

fn value_color(value: &Value) -> Option<RgbaColor> {
    match value {
        Value::Color(color) => Some(*color),
        Value::Ident(name) => RgbaColor::parse(name).ok(),
        _ => None,
    }
}

fn value_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) if n.fract() == 0.0 => Some(*n as i32),
        _ => None,
    }
}

fn value_name(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) | Value::Ident(s) => Some(s.clone()),
        _ => None,
    }
}

fn single_color(property: &str, values: &[Value]) -> Result<RgbaColor, SkinError> {
    value_color(single(property, values)?).ok_or_else(|| invalid(property, values))
}

fn single_number(property: &str, values: &[Value]) -> Result<f64, SkinError> {
    match single(property, values)? {
        Value::Number(n) => Ok(*n),
        _ => Err(invalid(property, values)),
    }
}

fn single_name(property: &str, values: &[Value]) -> Result<String, SkinError> {
    value_name(single(property, values)?).ok_or_else(|| invalid(property, values))
}

/// CSS shorthand: 1 value for all sides, 2 for vertical/horizontal,
/// 4 for top, right, bottom, left.
fn insets(property: &str, values: &[Value]) -> Result<Insets, SkinError> {
    let ints: Option<Vec<i32>> = values.iter().map(value_int).collect();
    match ints.as_deref() {
        Some([all]) => Ok(Insets::all(*all)),
        Some([v, h]) => Ok(Insets::vertical_horizontal(*v, *h)),
        Some([top, right, bottom, left]) => Ok(Insets {
            left: *left,
            top: *top,
            right: *right,
            bottom: *bottom,
        }),
        _ => Err(invalid(property, values)),
    }
}

fn single_brush(property: &str, values: &[Value]) -> Result<BrushSpec, SkinError> {
    let value = single(property, values)?;
    if let Some(color) = value_color(value) {
        return Ok(BrushSpec::Solid(color));
    }

    let Value::Call { name, args } = value else {
        return Err(invalid(property, values));
    };

    let brush = match (name.as_str(), args.as_slice()) {
        ("solid", [color]) => value_color(color).map(BrushSpec::Solid),
        ("border", [color, width]) => value_color(color)
            .zip(value_int(width))
            .map(|(color, width)| BrushSpec::Border {
                color,
                width,
                style: LineStyle::Solid,
            }),
        ("border", [color, width, Value::Ident(line)]) => value_color(color)
            .zip(value_int(width))
            .zip(LineStyle::from_name(line))
            .map(|((color, width), style)| BrushSpec::Border {
                color,
                width,
                style,
            }),
        ("texture", [texture]) => value_name(texture).map(|name| BrushSpec::Texture { name }),
        ("nine-slice", [texture, inset]) => value_name(texture)
            .zip(value_int(inset))
            .map(|(name, inset)| BrushSpec::NineSlice { name, inset }),
        _ => None,
    };

    match brush {
        Some(BrushSpec::Border { width, .. }) if width <= 0 => Err(invalid(property, values)),
        Some(brush) => Ok(brush),
        None => Err(invalid(property, values)),
    }
}
