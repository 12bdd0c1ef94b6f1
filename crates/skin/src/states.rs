//! Visual states a skin rule can target.

use bitflags::bitflags;

bitflags! {
    /// Interaction states matched by `Type:state` skin rules.
    ///
    /// A control resolves its background from these in a fixed precedence:
    /// disabled, then pressed, then hover, then the plain rule.
    ///
    /// ```
    /// use skin::VisualStates;
    ///
    /// let states = VisualStates::HOVER | VisualStates::PRESSED;
    /// assert_eq!(states.dominant(), VisualStates::PRESSED);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VisualStates: u8 {
        const HOVER = 0b0001;
        const PRESSED = 0b0010;
        const DISABLED = 0b0100;
    }
}

impl VisualStates {
    /// Parse a pseudo-state name as written after `:` in a rule.
    pub fn from_state_name(name: &str) -> Option<Self> {
        match name {
            "hover" => Some(Self::HOVER),
            "pressed" | "active" => Some(Self::PRESSED),
            "disabled" => Some(Self::DISABLED),
            _ => None,
        }
    }

    /// Name as written in a rule selector, for single-flag values.
    pub fn name(self) -> Option<&'static str> {
        match self {
            s if s == Self::HOVER => Some("hover"),
            s if s == Self::PRESSED => Some("pressed"),
            s if s == Self::DISABLED => Some("disabled"),
            _ => None,
        }
    }

    /// The single state that decides which background is drawn.
    pub fn dominant(self) -> Self {
        if self.contains(Self::DISABLED) {
            Self::DISABLED
        } else if self.contains(Self::PRESSED) {
            Self::PRESSED
        } else if self.contains(Self::HOVER) {
            Self::HOVER
        } else {
            Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_precedence() {
        let all = VisualStates::all();
        assert_eq!(all.dominant(), VisualStates::DISABLED);
        assert_eq!(
            (VisualStates::HOVER | VisualStates::PRESSED).dominant(),
            VisualStates::PRESSED
        );
        assert_eq!(VisualStates::empty().dominant(), VisualStates::empty());
    }

    #[test]
    fn test_from_state_name() {
        assert_eq!(VisualStates::from_state_name("active"), Some(VisualStates::PRESSED));
        assert_eq!(VisualStates::from_state_name("visited"), None);
        assert_eq!(VisualStates::from_state_name("focus"), None);
        assert_eq!(VisualStates::DISABLED.name(), Some("disabled"));
    }
}
