//! # trellis - a retained-mode control tree
//!
//! trellis keeps a tree of controls (panels, grids, stack panels, scroll
//! containers, splitters and a handful of leaf widgets), lays them out with a
//! two-pass measure/arrange protocol, routes pointer and keyboard input to
//! them and paints them through a host-supplied [`DrawBatch`].
//!
//! The host supplies the rest: a [`DrawBatch`] for drawing, an
//! [`InputSource`] producing per-frame snapshots, and optionally fonts, audio,
//! a clipboard and a skin sheet.
//!
//! ```
//! use trellis::containers::StackPanel;
//! use trellis::control::Orientation;
//! use trellis::geometry::Size;
//! use trellis::testing::{ManualInput, RecordingBatch};
//! use trellis::widgets::{Button, Label};
//! use trellis::{ScreenManager, TreeOptions};
//! use std::time::Duration;
//!
//! let mut manager = ScreenManager::new(Size::new(40, 10), TreeOptions::default(), ManualInput::new())?;
//! let tree = manager.tree_mut();
//! let screen = tree.create(StackPanel::new(Orientation::Vertical))?;
//! Label::create(tree, screen, "Ready?")?;
//! Button::create(tree, screen, "Start")?;
//! manager.add_screen(screen)?;
//! manager.navigate_to(screen, None)?;
//!
//! let mut batch = RecordingBatch::new();
//! manager.frame(Duration::from_millis(16), &mut batch);
//! assert_eq!(batch.texts(), vec!["Ready?", "Start"]);
//! # Ok::<(), trellis::error::TrellisError>(())
//! ```

#[macro_use]
mod macros;

pub mod collection;
pub mod config;
pub mod containers;
pub mod control;
mod dispatch;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod geometry;
mod grapheme;
pub mod input;
pub mod invoke;
mod log_init;
pub mod render;
pub mod screen;
pub mod scroll;
pub mod services;
pub mod skin_registry;
pub mod testing;
pub mod transition;
pub mod tree;
pub mod widgets;

pub use config::ScreenConfig;
pub use control::{Control, ControlBehavior, ControlId};
pub use error::{Result, TrellisError};
pub use input::InputSource;
pub use invoke::Invoker;
pub use log_init::init_logger;
pub use render::DrawBatch;
pub use screen::ScreenManager;
pub use tree::{TreeOptions, UiTree};

// Re-export the log crate so hosts can use trellis::log::info!, etc.
pub use log;
pub use skin;
