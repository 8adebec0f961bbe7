//! Panel state machine
//!
//! `Closed --toggle--> Open`, `Open --toggle/close/escape--> Closed`.
//! Close and Escape leave a closed panel closed.

/// Visibility of the expandable panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// User actions that move the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Toggle,
    Close,
    Escape,
}

impl PanelState {
    /// Next state after `action`
    pub fn apply(self, action: PanelAction) -> Self {
        match (self, action) {
            (PanelState::Closed, PanelAction::Toggle) => PanelState::Open,
            (PanelState::Open, _) => PanelState::Closed,
            (PanelState::Closed, PanelAction::Close | PanelAction::Escape) => PanelState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == PanelState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_closed() {
        assert_eq!(PanelState::default(), PanelState::Closed);
        assert!(!PanelState::default().is_open());
    }

    #[test]
    fn test_toggle_cycles() {
        let open = PanelState::Closed.apply(PanelAction::Toggle);
        assert_eq!(open, PanelState::Open);
        let closed = open.apply(PanelAction::Toggle);
        assert_eq!(closed, PanelState::Closed);
        assert_eq!(closed.apply(PanelAction::Toggle), PanelState::Open);
    }

    #[test]
    fn test_close_and_escape_force_closed() {
        for action in [PanelAction::Close, PanelAction::Escape] {
            assert_eq!(PanelState::Open.apply(action), PanelState::Closed);
            assert_eq!(PanelState::Closed.apply(action), PanelState::Closed);
        }
    }
}
