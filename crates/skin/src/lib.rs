//! # skin - skin sheets for trellis controls
//!
//! A skin describes how each control type looks: background brushes for each
//! visual state, an optional border, box spacing, text color, font, alpha and
//! interaction sounds. Skins are written in a small CSS-like sheet format and
//! parsed with [`Skin::parse`].
//!
//! ```rust
//! use skin::{BrushSpec, RgbaColor, Skin, VisualStates};
//!
//! let skin = Skin::parse(r#"
//!     Button {
//!         background: #202830;
//!         padding: 1 2;
//!         font: "ui";
//!     }
//!     Button:hover { background: solid(#303a46); }
//! "#).expect("valid skin");
//!
//! let button = skin.style("Button").unwrap();
//! assert_eq!(
//!     button.background_for(VisualStates::HOVER),
//!     Some(&BrushSpec::Solid(RgbaColor::rgb(0x30, 0x3a, 0x46)))
//! );
//! ```
//!
//! ## Properties
//!
//! | Property | Values |
//! |----------|--------|
//! | `background` | color, `solid(c)`, `border(c, w[, style])`, `texture("n")`, `nine-slice("n", inset)` |
//! | `border` | same as `background`, drawn on top |
//! | `padding`, `margin` | 1, 2 or 4 integers |
//! | `color` | color |
//! | `font` | asset name |
//! | `alpha` | number in `0..=1` |
//! | `click-sound`, `hover-sound` | asset name |
//!
//! States `hover`, `pressed` (or `active`) and `disabled` may only set
//! `background`.
//!
//! ## Modules
//!
//! - [`parser`]: raw rule parsing
//! - [`sheet`]: typed per-type styles
//! - [`color`], [`brush`], [`states`]: value types
//! - [`error`]: [`SkinError`]

pub mod brush;
pub mod color;
pub mod error;
pub mod parser;
pub mod sheet;
pub mod states;

pub use brush::{BrushSpec, Insets, LineStyle};
pub use color::{ColorParseError, RgbaColor};
pub use error::{AssetKind, SkinError};
pub use sheet::{Skin, SkinStyle};
pub use states::VisualStates;
