use crate::control::ControlBehavior;
use crate::skin_registry::TypeTag;

/// A plain container. The tree's root and every screen are panels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel;

impl Panel {
    pub const TAG: TypeTag = TypeTag("Panel");
}

impl ControlBehavior for Panel {
    behavior_identity!(Panel::TAG);
}
