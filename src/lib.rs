//! trellis-rs: a retained-mode control toolkit.
//!
//! This crate re-exports the control tree from [`trellis`] and the skin
//! sheet support from [`skin`]. Most hosts only need the [`prelude`].

pub use skin;
pub use trellis;

pub use trellis::{Result, ScreenManager, TreeOptions, TrellisError, UiTree, init_logger, log};

/// The types a typical host touches while building screens.
pub mod prelude {
    pub use skin::{RgbaColor, Skin};
    pub use trellis::config::ScreenConfig;
    pub use trellis::containers::{
        CanvasControl, Grid, Panel, ResizeMode, ScrollContainer, Splitter, StackPanel, TrackDefinition,
    };
    pub use trellis::control::{ControlBehavior, ControlId, HorizontalAlignment, Orientation, VerticalAlignment};
    pub use trellis::geometry::{Border, Point, Rectangle, Size};
    pub use trellis::input::{CrosstermInput, InputSource, KeyCode, KeyModifiers};
    pub use trellis::render::{Brush, DrawBatch, SolidBrush};
    pub use trellis::widgets::{Button, Label, Listbox, Slider, TextBox};
    pub use trellis::{Result, ScreenManager, TreeOptions, TrellisError, UiTree};
}
