//! Controls: the nodes of the visual tree.
//!
//! A [`Control`] holds everything the tree itself needs to know about a node:
//! layout attributes and results, interaction state, presentation and its
//! children. What makes a control a button or a grid lives in its
//! [`ControlBehavior`], stored alongside.
//!
//! ## Box model
//!
//! ```text
//! +---------------- actual_size ----------------+
//! | margin                                      |
//! |   +------------- background -------------+  |
//! |   | padding                              |  |
//! |   |   +---------- client -----------+    |  |
//! |   |   | children, content           |    |  |
//! ```
//!
//! `actual_size` includes margin and padding. `actual_position` is relative to
//! the parent's client origin.

mod layout;
mod state;

use std::any::Any;
use std::rc::Rc;
use std::time::Duration;

use skin::RgbaColor;
use slotmap::new_key_type;

use crate::collection::ControlCollection;
use crate::error::Result;
use crate::events::{ControlEvents, DragEventArgs, KeyEventArgs, MouseEventArgs};
use crate::geometry::{Border, Matrix, Point, Rectangle, Size};
use crate::render::{Brush, DrawBatch, FontId};
use crate::services::SoundId;
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

new_key_type! {
    /// Arena key of a control inside a [`UiTree`].
    pub struct ControlId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
    #[default]
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    #[default]
    Stretch,
}

/// Pointer relation of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoverState {
    #[default]
    None,
    /// A descendant is under the pointer.
    Passive,
    /// The control itself is the front-most thing under the pointer.
    Active,
}

/// Keyboard focus relation of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusState {
    #[default]
    None,
    /// A descendant has focus.
    Passive,
    /// The control has focus.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Size constraints and placement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutProps {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub margin: Border,
    pub padding: Border,
}

impl LayoutProps {
    /// Margin plus padding.
    pub fn borders(&self) -> Border {
        self.margin + self.padding
    }
}

/// Background brushes per visual state.
#[derive(Clone, Default)]
pub struct Backgrounds {
    pub normal: Option<Rc<dyn Brush>>,
    pub hover: Option<Rc<dyn Brush>>,
    pub pressed: Option<Rc<dyn Brush>>,
    pub disabled: Option<Rc<dyn Brush>>,
}

/// A node of the visual tree.
pub struct Control {
    pub(crate) tag: TypeTag,
    pub(crate) style_name: Option<String>,
    pub(crate) layout: LayoutProps,
    pub(crate) actual_position: Point,
    pub(crate) actual_size: Size,
    pub(crate) dimensions_invalid: bool,
    pub(crate) drawing_invalid: bool,
    pub(crate) parent: Option<ControlId>,
    pub(crate) children: ControlCollection,
    pub(crate) backgrounds: Backgrounds,
    pub(crate) border: Option<Rc<dyn Brush>>,
    pub(crate) foreground: Option<RgbaColor>,
    pub(crate) font: Option<FontId>,
    pub(crate) alpha: f32,
    pub(crate) transform: Matrix,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) hit_test_visible: bool,
    pub(crate) hovered: HoverState,
    pub(crate) pressed: bool,
    pub(crate) focused: FocusState,
    pub(crate) can_focus: bool,
    pub(crate) tab_stop: bool,
    pub(crate) tab_order: i32,
    pub(crate) z_order: i32,
    pub(crate) click_sound: Option<SoundId>,
    pub(crate) hover_sound: Option<SoundId>,
    pub(crate) behavior: Option<Box<dyn ControlBehavior>>,
    pub events: ControlEvents,
}

impl Control {
    pub(crate) fn new(behavior: Box<dyn ControlBehavior>, style_name: Option<String>) -> Self {
        let can_focus = behavior.default_can_focus();
        Self {
            tag: behavior.type_tag(),
            style_name,
            layout: LayoutProps::default(),
            actual_position: Point::ZERO,
            actual_size: Size::ZERO,
            dimensions_invalid: true,
            drawing_invalid: true,
            parent: None,
            children: ControlCollection::default(),
            backgrounds: Backgrounds::default(),
            border: None,
            foreground: None,
            font: None,
            alpha: 1.0,
            transform: Matrix::IDENTITY,
            enabled: true,
            visible: true,
            hit_test_visible: true,
            hovered: HoverState::None,
            pressed: false,
            focused: FocusState::None,
            can_focus,
            tab_stop: can_focus,
            tab_order: 0,
            z_order: 0,
            click_sound: None,
            hover_sound: None,
            behavior: Some(behavior),
            events: ControlEvents::default(),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Name looked up in the skin: the explicit style tag, else the type name.
    pub fn style_name(&self) -> &str {
        self.style_name.as_deref().unwrap_or(self.tag.0)
    }

    pub fn layout(&self) -> &LayoutProps {
        &self.layout
    }

    pub fn actual_position(&self) -> Point {
        self.actual_position
    }

    pub fn actual_size(&self) -> Size {
        self.actual_size
    }

    /// The arranged box in parent client coordinates.
    pub fn actual_rect(&self) -> Rectangle {
        Rectangle::from_parts(self.actual_position, self.actual_size)
    }

    /// Offset of the client area inside the control's own box.
    pub fn client_origin(&self) -> Point {
        self.layout.borders().top_left()
    }

    pub fn client_size(&self) -> Size {
        self.actual_size.saturating_sub(self.layout.borders().size())
    }

    pub fn dimensions_invalid(&self) -> bool {
        self.dimensions_invalid
    }

    pub fn drawing_invalid(&self) -> bool {
        self.drawing_invalid
    }

    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        self.children.items()
    }

    pub fn foreground(&self) -> Option<RgbaColor> {
        self.foreground
    }

    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn transform(&self) -> Matrix {
        self.transform
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hit_test_visible(&self) -> bool {
        self.hit_test_visible
    }

    pub fn hover_state(&self) -> HoverState {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn focus_state(&self) -> FocusState {
        self.focused
    }

    pub fn can_focus(&self) -> bool {
        self.can_focus
    }

    pub fn tab_stop(&self) -> bool {
        self.tab_stop
    }

    pub fn tab_order(&self) -> i32 {
        self.tab_order
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn backgrounds(&self) -> &Backgrounds {
        &self.backgrounds
    }

    /// Background for the current state: disabled > pressed > hover > normal.
    pub fn current_background(&self) -> Option<&Rc<dyn Brush>> {
        let stateful = if !self.enabled {
            self.backgrounds.disabled.as_ref()
        } else if self.pressed {
            self.backgrounds.pressed.as_ref()
        } else if self.hovered != HoverState::None {
            self.backgrounds.hover.as_ref()
        } else {
            None
        };
        stateful.or(self.backgrounds.normal.as_ref())
    }

    /// Flag this control for re-measure; the next frame re-runs layout.
    pub fn invalidate_dimensions(&mut self) {
        self.dimensions_invalid = true;
        self.drawing_invalid = true;
    }

    pub fn invalidate_drawing(&mut self) {
        self.drawing_invalid = true;
    }

    // Layout mutators. Each returns `&mut Self` for chaining.

    pub fn set_width(&mut self, width: Option<i32>) -> &mut Self {
        self.layout.width = width;
        self.invalidate_dimensions();
        self
    }

    pub fn set_height(&mut self, height: Option<i32>) -> &mut Self {
        self.layout.height = height;
        self.invalidate_dimensions();
        self
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> &mut Self {
        self.set_width(Some(width)).set_height(Some(height))
    }

    pub fn set_min_width(&mut self, value: Option<i32>) -> &mut Self {
        self.layout.min_width = value;
        self.invalidate_dimensions();
        self
    }

    pub fn set_min_height(&mut self, value: Option<i32>) -> &mut Self {
        self.layout.min_height = value;
        self.invalidate_dimensions();
        self
    }

    pub fn set_max_width(&mut self, value: Option<i32>) -> &mut Self {
        self.layout.max_width = value;
        self.invalidate_dimensions();
        self
    }

    pub fn set_max_height(&mut self, value: Option<i32>) -> &mut Self {
        self.layout.max_height = value;
        self.invalidate_dimensions();
        self
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) -> &mut Self {
        self.layout.horizontal_alignment = alignment;
        self.invalidate_dimensions();
        self
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) -> &mut Self {
        self.layout.vertical_alignment = alignment;
        self.invalidate_dimensions();
        self
    }

    pub fn set_margin(&mut self, margin: Border) -> &mut Self {
        self.layout.margin = margin;
        self.invalidate_dimensions();
        self
    }

    pub fn set_padding(&mut self, padding: Border) -> &mut Self {
        self.layout.padding = padding;
        self.invalidate_dimensions();
        self
    }

    // Presentation mutators.

    pub fn set_background(&mut self, brush: Option<Rc<dyn Brush>>) -> &mut Self {
        self.backgrounds.normal = brush;
        self.invalidate_drawing();
        self
    }

    pub fn set_backgrounds(&mut self, backgrounds: Backgrounds) -> &mut Self {
        self.backgrounds = backgrounds;
        self.invalidate_drawing();
        self
    }

    pub fn set_border_brush(&mut self, brush: Option<Rc<dyn Brush>>) -> &mut Self {
        self.border = brush;
        self.invalidate_drawing();
        self
    }

    pub fn set_foreground(&mut self, color: Option<RgbaColor>) -> &mut Self {
        self.foreground = color;
        self.invalidate_drawing();
        self
    }

    pub fn set_font(&mut self, font: Option<FontId>) -> &mut Self {
        self.font = font;
        self.invalidate_dimensions();
        self
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.invalidate_drawing();
        self
    }

    /// Drawing-only transform; layout and hit-testing ignore it.
    pub fn set_transform(&mut self, transform: Matrix) -> &mut Self {
        self.transform = transform;
        self.invalidate_drawing();
        self
    }

    // Interaction mutators.

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        if self.visible != visible {
            self.visible = visible;
            self.invalidate_dimensions();
        }
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        if self.enabled != enabled {
            self.enabled = enabled;
            if !enabled {
                self.pressed = false;
            }
            self.invalidate_drawing();
        }
        self
    }

    pub fn set_hit_test_visible(&mut self, value: bool) -> &mut Self {
        self.hit_test_visible = value;
        self
    }

    pub fn set_can_focus(&mut self, value: bool) -> &mut Self {
        self.can_focus = value;
        self
    }

    pub fn set_tab_stop(&mut self, value: bool) -> &mut Self {
        self.tab_stop = value;
        self
    }

    pub fn set_click_sound(&mut self, sound: Option<SoundId>) -> &mut Self {
        self.click_sound = sound;
        self
    }

    pub fn set_hover_sound(&mut self, sound: Option<SoundId>) -> &mut Self {
        self.hover_sound = sound;
        self
    }
}

/// What makes a control a particular kind of control.
///
/// Every method has a default, so a plain container only implements the
/// identity methods. Hooks run with the behavior temporarily taken out of the
/// tree: inside a hook, `tree.behavior::<Self>(id)` is `None` and `self` is
/// the way to reach the control's own state.
pub trait ControlBehavior: Any {
    fn type_tag(&self) -> TypeTag;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Initial `can_focus` (and `tab_stop`) of new controls.
    fn default_can_focus(&self) -> bool {
        false
    }

    /// Client size the control needs for its own content, e.g. text extent.
    fn min_content_size(&self, _tree: &UiTree, _id: ControlId) -> Size {
        Size::ZERO
    }

    /// Measure children against the maximum client size and return the
    /// client size they need. The default is the componentwise maximum.
    fn measure_override(&self, tree: &UiTree, id: ControlId, max_client: Size) -> Size {
        layout::measure_children(tree, id, max_client)
    }

    /// Arrange children inside the client area. The default gives every
    /// child the whole client area and lets its alignment place it.
    fn arrange_override(&mut self, tree: &mut UiTree, id: ControlId, client: Size) {
        layout::arrange_children(tree, id, client);
    }

    /// Configure the control from the skin. Overrides should call
    /// [`UiTree::apply_base_skin`] first.
    fn apply_skin(&mut self, tree: &mut UiTree, id: ControlId) -> Result<()> {
        tree.apply_base_skin(id)
    }

    /// Per-frame update.
    fn update(&mut self, _tree: &mut UiTree, _id: ControlId, _elapsed: Duration) {}

    /// Draw content above the background and below the children. `client`
    /// is in screen coordinates.
    fn draw(
        &self,
        _tree: &UiTree,
        _id: ControlId,
        _batch: &mut dyn DrawBatch,
        _client: Rectangle,
        _alpha: f32,
    ) {
    }

    fn on_mouse_enter(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_leave(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_down(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_up(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_move(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_wheel(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}
    fn on_mouse_click(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut MouseEventArgs) {}

    fn on_key_down(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut KeyEventArgs) {}
    fn on_key_up(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut KeyEventArgs) {}
    fn on_key_press(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut KeyEventArgs) {}

    fn on_got_focus(&mut self, _tree: &mut UiTree, _id: ControlId) {}
    fn on_lost_focus(&mut self, _tree: &mut UiTree, _id: ControlId) {}

    fn on_start_drag(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut DragEventArgs) {}
    fn on_drop_enter(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut DragEventArgs) {}
    fn on_drop_leave(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut DragEventArgs) {}
    fn on_drop_move(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut DragEventArgs) {}
    fn on_end_drop(&mut self, _tree: &mut UiTree, _id: ControlId, _args: &mut DragEventArgs) {}
}

pub(crate) use layout::{arrange_children, measure_children};
