//! Scroll position bookkeeping for scroll containers.

use crate::geometry::{Point, Size};

/// Scroll offset of a viewport over a larger virtual area.
///
/// The offset is always clamped to `[0, max(0, virtual - viewport)]` on each
/// axis; every mutator re-applies the clamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollState {
    offset: Point,
    virtual_size: Size,
    viewport: Size,
}

impl ScrollState {
    pub fn new(virtual_size: Size, viewport: Size) -> Self {
        Self {
            offset: Point::ZERO,
            virtual_size,
            viewport,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn virtual_size(&self) -> Size {
        self.virtual_size
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Maximum horizontal scroll offset.
    pub fn max_scroll_x(&self) -> i32 {
        (self.virtual_size.width - self.viewport.width).max(0)
    }

    /// Maximum vertical scroll offset.
    pub fn max_scroll_y(&self) -> i32 {
        (self.virtual_size.height - self.viewport.height).max(0)
    }

    /// Whether horizontal scrolling is possible.
    pub fn can_scroll_x(&self) -> bool {
        self.max_scroll_x() > 0
    }

    /// Whether vertical scrolling is possible.
    pub fn can_scroll_y(&self) -> bool {
        self.max_scroll_y() > 0
    }

    /// Scroll by a relative amount. Returns true if the offset changed.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        let target = Point::new(
            self.offset.x.saturating_add(dx),
            self.offset.y.saturating_add(dy),
        );
        self.scroll_to(Some(target.x), Some(target.y))
    }

    /// Scroll to an absolute position (clamped). Returns true if the offset changed.
    pub fn scroll_to(&mut self, x: Option<i32>, y: Option<i32>) -> bool {
        let before = self.offset;
        if let Some(x) = x {
            self.offset.x = x.clamp(0, self.max_scroll_x());
        }
        if let Some(y) = y {
            self.offset.y = y.clamp(0, self.max_scroll_y());
        }
        before != self.offset
    }

    /// Update viewport dimensions.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.clamp();
    }

    /// Update virtual content dimensions.
    pub fn set_virtual_size(&mut self, virtual_size: Size) {
        self.virtual_size = virtual_size;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.offset.x = self.offset.x.clamp(0, self.max_scroll_x());
        self.offset.y = self.offset.y.clamp(0, self.max_scroll_y());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_to_range() {
        let mut state = ScrollState::new(Size::new(100, 300), Size::new(100, 100));
        assert!(!state.can_scroll_x());
        assert!(state.can_scroll_y());

        assert!(state.scroll_by(0, 500));
        assert_eq!(state.offset(), Point::new(0, 200));
        assert!(state.scroll_by(0, -1000));
        assert_eq!(state.offset(), Point::new(0, 0));
        assert!(!state.scroll_by(50, 0));
    }

    #[test]
    fn test_shrinking_virtual_size_reclamps() {
        let mut state = ScrollState::new(Size::new(100, 300), Size::new(100, 100));
        state.scroll_to(None, Some(150));
        state.set_virtual_size(Size::new(100, 180));
        assert_eq!(state.offset().y, 80);
        state.set_viewport(Size::new(100, 200));
        assert_eq!(state.offset().y, 0);
    }
}
