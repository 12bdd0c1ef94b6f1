//! Frame-level configuration for a [`ScreenManager`](crate::screen::ScreenManager).

use std::time::Duration;

/// Tunables for input handling and built-in controls.
///
/// ```
/// use std::time::Duration;
/// use trellis::ScreenConfig;
///
/// let config = ScreenConfig::default()
///     .with_key_repeat(Duration::from_millis(300), Duration::from_millis(30))
///     .with_wrap_tab_navigation(false);
/// assert_eq!(config.min_knob_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    /// Delay between the first KeyPress and the first repeat.
    pub key_repeat_delay: Duration,
    /// Interval between repeated KeyPress events while a key is held.
    pub key_repeat_interval: Duration,
    /// Distance a scroll container moves per wheel notch.
    pub wheel_scroll_step: i32,
    /// Smallest scrollbar knob length.
    pub min_knob_size: i32,
    /// Cross extent of scroll container scrollbars.
    pub scrollbar_thickness: i32,
    /// Restart tab navigation from the other end when it runs out.
    pub wrap_tab_navigation: bool,
    /// Distance a focused splitter moves per arrow key.
    pub splitter_keyboard_step: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            key_repeat_delay: Duration::from_millis(500),
            key_repeat_interval: Duration::from_millis(50),
            wheel_scroll_step: 16,
            min_knob_size: 20,
            scrollbar_thickness: 16,
            wrap_tab_navigation: true,
            splitter_keyboard_step: 5,
        }
    }
}

impl ScreenConfig {
    pub fn with_key_repeat(mut self, delay: Duration, interval: Duration) -> Self {
        self.key_repeat_delay = delay;
        self.key_repeat_interval = interval;
        self
    }

    pub fn with_wheel_scroll_step(mut self, step: i32) -> Self {
        self.wheel_scroll_step = step;
        self
    }

    pub fn with_min_knob_size(mut self, size: i32) -> Self {
        self.min_knob_size = size;
        self
    }

    pub fn with_scrollbar_thickness(mut self, thickness: i32) -> Self {
        self.scrollbar_thickness = thickness;
        self
    }

    pub fn with_wrap_tab_navigation(mut self, wrap: bool) -> Self {
        self.wrap_tab_navigation = wrap;
        self
    }

    pub fn with_splitter_keyboard_step(mut self, step: i32) -> Self {
        self.splitter_keyboard_step = step;
        self
    }
}
