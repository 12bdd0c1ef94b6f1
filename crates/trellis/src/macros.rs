//! Macros for control behavior implementation.

/// Generates the identity methods of a
/// [`ControlBehavior`](crate::control::ControlBehavior) implementation:
/// `type_tag`, `as_any` and `as_any_mut`.
///
/// # Usage
///
/// ```ignore
/// impl ControlBehavior for Gauge {
///     behavior_identity!(Gauge::TAG);
///
///     fn min_content_size(&self, _tree: &UiTree, _id: ControlId) -> Size {
///         Size::new(40, 4)
///     }
/// }
/// ```
#[macro_export]
macro_rules! behavior_identity {
    ($tag:expr) => {
        fn type_tag(&self) -> $crate::skin_registry::TypeTag {
            $tag
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}
