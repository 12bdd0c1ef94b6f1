//! Error types for skin sheet parsing and asset resolution.

use thiserror::Error;

/// Errors that can occur while parsing or resolving a skin.
///
/// A skin that references an asset the loader cannot provide is unusable:
/// there is no degraded fallback, the error is surfaced at construction.
#[derive(Error, Debug)]
pub enum SkinError {
    /// Invalid skin sheet syntax.
    #[error("skin syntax error: {0}")]
    InvalidSyntax(String),

    /// A declaration named a property the skin format does not know.
    #[error("unknown skin property `{property}` in rule `{rule}`")]
    UnknownProperty { rule: String, property: String },

    /// A declaration value could not be interpreted for its property.
    #[error("invalid value for `{property}`: {value}")]
    InvalidValue { property: String, value: String },

    /// A named font, texture or sound could not be resolved.
    #[error("missing {kind} asset `{name}`")]
    MissingAsset { kind: AssetKind, name: String },

    /// An I/O error occurred while reading a skin sheet file.
    #[error("I/O error reading skin sheet")]
    Io(#[from] std::io::Error),
}

/// The kind of asset a skin refers to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    Font,
    Texture,
    Sound,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::Font => "font",
            AssetKind::Texture => "texture",
            AssetKind::Sound => "sound",
        };
        f.write_str(name)
    }
}
