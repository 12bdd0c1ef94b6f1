//! Slider: a value in a range, picked with a draggable knob.
//!
//! Scroll containers use two sliders as their scrollbars.

use skin::RgbaColor;

use crate::control::{Backgrounds, ControlBehavior, ControlId, HoverState, Orientation};
use crate::error::{Result, TrellisError};
use crate::events::{EventHandlers, KeyEventArgs, MouseEventArgs, ValueChangedArgs};
use crate::geometry::{Rectangle, Size};
use crate::input::{KeyCode, MouseButton};
use crate::render::{Brush, DrawBatch, SolidBrush};
use crate::skin_registry::{TypeTag, backgrounds_from_style};
use crate::tree::UiTree;

pub struct Slider {
    orientation: Orientation,
    minimum: i32,
    maximum: i32,
    value: i32,
    knob_size: i32,
    /// Step for arrow keys.
    pub small_change: i32,
    /// Step for PageUp/PageDown and clicks beside the knob.
    pub large_change: i32,
    knob: Backgrounds,
    /// Pointer offset into the knob while dragging.
    grab: Option<i32>,
    pub value_changed: EventHandlers<ValueChangedArgs>,
}

impl Slider {
    pub const TAG: TypeTag = TypeTag("Slider");
    /// Skin style the knob brushes are read from.
    pub const KNOB_STYLE: &'static str = "SliderKnob";

    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            minimum: 0,
            maximum: 100,
            value: 0,
            knob_size: 1,
            small_change: 1,
            large_change: 10,
            knob: Backgrounds::default(),
            grab: None,
            value_changed: EventHandlers::default(),
        }
    }

    /// Create a slider and append it to `parent`.
    pub fn create(tree: &mut UiTree, parent: ControlId, orientation: Orientation) -> Result<ControlId> {
        tree.create_child(parent, Slider::new(orientation))
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn knob_size(&self) -> i32 {
        self.knob_size
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    fn with_slider<R>(
        tree: &mut UiTree,
        id: ControlId,
        f: impl FnOnce(&mut Slider, &mut UiTree) -> R,
    ) -> Result<R> {
        tree.with_behavior_as::<Slider, R>(id, f)
            .ok_or_else(|| TrellisError::InvalidArgument(format!("{:?} is not a slider", id)))
    }

    /// Set the value (clamped to the range). Fires `value_changed` when it
    /// changes; returns whether it did.
    pub fn set_value(tree: &mut UiTree, id: ControlId, value: i32) -> Result<bool> {
        Self::with_slider(tree, id, |slider, tree| slider.change_value(tree, id, value, true))
    }

    /// Set the range. The value is clamped into it, silently.
    pub fn set_range(tree: &mut UiTree, id: ControlId, minimum: i32, maximum: i32) -> Result<()> {
        if minimum > maximum {
            return Err(TrellisError::InvalidArgument(format!(
                "slider range {}..{} is inverted",
                minimum, maximum
            )));
        }
        Self::with_slider(tree, id, |slider, tree| {
            slider.minimum = minimum;
            slider.maximum = maximum;
            slider.value = slider.value.clamp(minimum, maximum);
            tree.invalidate_drawing(id);
        })
    }

    pub fn set_knob_size(tree: &mut UiTree, id: ControlId, size: i32) -> Result<()> {
        Self::with_slider(tree, id, |slider, tree| {
            slider.knob_size = size.max(1);
            tree.invalidate_dimensions(id);
        })
    }

    /// Update range, value and knob without firing `value_changed`.
    pub(crate) fn sync(&mut self, minimum: i32, maximum: i32, value: i32, knob_size: i32) {
        self.minimum = minimum;
        self.maximum = maximum.max(minimum);
        self.value = value.clamp(self.minimum, self.maximum);
        self.knob_size = knob_size.max(1);
    }

    fn change_value(&mut self, tree: &mut UiTree, id: ControlId, value: i32, notify: bool) -> bool {
        let value = value.clamp(self.minimum, self.maximum);
        if value == self.value {
            return false;
        }
        let old_value = self.value;
        self.value = value;
        tree.invalidate_drawing(id);
        if notify {
            log::trace!("slider {:?}: {} -> {}", id, old_value, value);
            tree.notify(
                id,
                self.value_changed.clone(),
                ValueChangedArgs {
                    old_value,
                    new_value: value,
                },
            );
        }
        true
    }

    fn along(&self, size: Size) -> i32 {
        match self.orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    fn knob_extent(&self, track: i32) -> i32 {
        self.knob_size.clamp(0, track.max(0))
    }

    /// Offset of the knob from the start of the track.
    fn knob_start(&self, track: i32) -> i32 {
        let range = self.maximum as i64 - self.minimum as i64;
        let free = (track - self.knob_extent(track)) as i64;
        if range <= 0 || free <= 0 {
            return 0;
        }
        ((self.value as i64 - self.minimum as i64) * free / range) as i32
    }

    /// Value whose knob starts at `start`, rounded to the nearest.
    fn value_at(&self, start: i32, track: i32) -> i32 {
        let range = self.maximum as i64 - self.minimum as i64;
        let free = (track - self.knob_extent(track)) as i64;
        if range <= 0 || free <= 0 {
            return self.minimum;
        }
        let start = (start as i64).clamp(0, free);
        (self.minimum as i64 + (start * range + free / 2) / free) as i32
    }

    /// The knob inside a client rectangle.
    pub fn knob_rect(&self, client: Rectangle) -> Rectangle {
        let track = self.along(client.size());
        let extent = self.knob_extent(track);
        let start = self.knob_start(track);
        match self.orientation {
            Orientation::Horizontal => {
                Rectangle::new(client.x + start, client.y, extent, client.height)
            }
            Orientation::Vertical => Rectangle::new(client.x, client.y + start, client.width, extent),
        }
    }

    /// Track length and pointer position along it, in client coordinates.
    fn track_and_pointer(&self, tree: &UiTree, id: ControlId, args: &MouseEventArgs) -> Option<(i32, i32)> {
        let node = tree.get(id)?;
        let local = args.position - node.client_origin();
        let pointer = match self.orientation {
            Orientation::Horizontal => local.x,
            Orientation::Vertical => local.y,
        };
        Some((self.along(node.client_size()), pointer))
    }
}

impl ControlBehavior for Slider {
    behavior_identity!(Slider::TAG);

    fn default_can_focus(&self) -> bool {
        true
    }

    fn min_content_size(&self, _tree: &UiTree, _id: ControlId) -> Size {
        match self.orientation {
            Orientation::Horizontal => Size::new(self.knob_size, 1),
            Orientation::Vertical => Size::new(1, self.knob_size),
        }
    }

    fn apply_skin(&mut self, tree: &mut UiTree, id: ControlId) -> Result<()> {
        tree.apply_base_skin(id)?;
        let skin = tree.skin.clone();
        if let Some(style) = skin.style(Self::KNOB_STYLE) {
            self.knob = backgrounds_from_style(style, tree.assets.as_ref())?;
        }
        Ok(())
    }

    fn draw(
        &self,
        tree: &UiTree,
        id: ControlId,
        batch: &mut dyn DrawBatch,
        client: Rectangle,
        alpha: f32,
    ) {
        let Some(node) = tree.get(id) else {
            return;
        };
        let knob = self.knob_rect(client);
        let brush = if self.grab.is_some() {
            self.knob.pressed.as_ref()
        } else if node.hover_state() != HoverState::None {
            self.knob.hover.as_ref()
        } else {
            None
        }
        .or(self.knob.normal.as_ref());
        match brush {
            Some(brush) => brush.draw(batch, knob, alpha),
            None => {
                let color = node.foreground().unwrap_or(RgbaColor::rgb(128, 128, 128));
                SolidBrush::new(color).draw(batch, knob, alpha);
            }
        }
    }

    fn on_mouse_down(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if args.button != Some(MouseButton::Left) {
            return;
        }
        let Some((track, pointer)) = self.track_and_pointer(tree, id, args) else {
            return;
        };
        let start = self.knob_start(track);
        let extent = self.knob_extent(track);
        if pointer >= start && pointer < start + extent {
            self.grab = Some(pointer - start);
            tree.capture_pointer(id);
        } else if pointer < start {
            self.change_value(tree, id, self.value.saturating_sub(self.large_change), true);
        } else {
            self.change_value(tree, id, self.value.saturating_add(self.large_change), true);
        }
        args.handled = true;
    }

    fn on_mouse_move(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        let Some(grab) = self.grab else {
            return;
        };
        let Some((track, pointer)) = self.track_and_pointer(tree, id, args) else {
            return;
        };
        let value = self.value_at(pointer - grab, track);
        self.change_value(tree, id, value, true);
        args.handled = true;
    }

    fn on_mouse_up(&mut self, tree: &mut UiTree, id: ControlId, args: &mut MouseEventArgs) {
        if self.grab.take().is_some() {
            tree.release_pointer(id);
            tree.invalidate_drawing(id);
            args.handled = true;
        }
    }

    fn on_key_press(&mut self, tree: &mut UiTree, id: ControlId, args: &mut KeyEventArgs) {
        let target = match args.key {
            KeyCode::Left | KeyCode::Up => self.value.saturating_sub(self.small_change),
            KeyCode::Right | KeyCode::Down => self.value.saturating_add(self.small_change),
            KeyCode::PageUp => self.value.saturating_sub(self.large_change),
            KeyCode::PageDown => self.value.saturating_add(self.large_change),
            KeyCode::Home => self.minimum,
            KeyCode::End => self.maximum,
            _ => return,
        };
        self.change_value(tree, id, target, true);
        args.handled = true;
    }
}
