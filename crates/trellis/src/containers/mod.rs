//! Layout containers.
//!
//! Each container is a [`ControlBehavior`](crate::control::ControlBehavior)
//! that overrides measure and arrange. A [`Panel`] keeps the defaults: every
//! child gets the whole client area.

mod canvas_control;
mod grid;
mod panel;
mod scroll_container;
mod splitter;
mod stack_panel;

pub use canvas_control::CanvasControl;
pub use grid::{CellSlot, Grid, ResizeMode, TrackDefinition};
pub use panel::Panel;
pub use scroll_container::{ScrollBarVisibility, ScrollContainer};
pub use splitter::{Splitter, SplitterSlot};
pub use stack_panel::StackPanel;
