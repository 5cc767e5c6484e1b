//! Attach state definition
//!
//! The bridge moves forward through the states exactly once per bound
//! lifetime. Events that do not apply to the current state leave it
//! unchanged.

use super::events::AttachEvent;

/// Attach progress of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachState {
    /// Probed, not yet part of a pipeline
    #[default]
    Unattached,
    /// Downstream bridge attached; no connector (yet)
    DownstreamAttached,
    /// Connector initialized and registered
    ConnectorReady,
    /// Connector attached to the encoder
    Attached,
    /// Attach failed; the bridge must be rebuilt
    AttachFailed,
}

impl AttachState {
    /// Check if attach may start from this state
    pub fn can_attach(&self) -> bool {
        matches!(self, AttachState::Unattached)
    }

    /// Check if attach completed, with or without a connector
    pub fn is_attached(&self) -> bool {
        matches!(self, AttachState::DownstreamAttached | AttachState::Attached)
    }

    /// Check if this is the failure state
    pub fn is_failed(&self) -> bool {
        matches!(self, AttachState::AttachFailed)
    }

    /// Check if a connector is exposed in this state
    pub fn has_connector(&self) -> bool {
        matches!(self, AttachState::Attached)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: AttachEvent) -> Self {
        use AttachState::*;

        match (self, event) {
            (Unattached, AttachEvent::DownstreamAttached) => DownstreamAttached,
            (Unattached, AttachEvent::Failed) => AttachFailed,

            (DownstreamAttached, AttachEvent::ConnectorInitialized) => ConnectorReady,
            (DownstreamAttached, AttachEvent::Failed) => AttachFailed,

            (ConnectorReady, AttachEvent::EncoderAttached) => Attached,
            (ConnectorReady, AttachEvent::Failed) => AttachFailed,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_attach_flow() {
        let state = AttachState::Unattached;
        assert!(state.can_attach());

        let state = state.transition(AttachEvent::DownstreamAttached);
        assert_eq!(state, AttachState::DownstreamAttached);
        assert!(state.is_attached());
        assert!(!state.has_connector());

        let state = state.transition(AttachEvent::ConnectorInitialized);
        assert_eq!(state, AttachState::ConnectorReady);
        assert!(!state.is_attached());

        let state = state.transition(AttachEvent::EncoderAttached);
        assert_eq!(state, AttachState::Attached);
        assert!(state.is_attached());
        assert!(state.has_connector());
    }

    #[test]
    fn test_failure_from_any_step() {
        let states = [
            AttachState::Unattached,
            AttachState::DownstreamAttached,
            AttachState::ConnectorReady,
        ];

        for state in states {
            let next = state.transition(AttachEvent::Failed);
            assert!(next.is_failed());
        }
    }

    #[test]
    fn test_failed_is_terminal() {
        let events = [
            AttachEvent::DownstreamAttached,
            AttachEvent::ConnectorInitialized,
            AttachEvent::EncoderAttached,
            AttachEvent::Failed,
        ];

        for event in events {
            let next = AttachState::AttachFailed.transition(event);
            assert_eq!(next, AttachState::AttachFailed);
        }
        assert!(!AttachState::AttachFailed.can_attach());
    }

    #[test]
    fn test_no_skipping_steps() {
        // Connector cannot appear before the downstream attach
        let state = AttachState::Unattached.transition(AttachEvent::ConnectorInitialized);
        assert_eq!(state, AttachState::Unattached);

        let state = AttachState::Unattached.transition(AttachEvent::EncoderAttached);
        assert_eq!(state, AttachState::Unattached);
    }

    #[test]
    fn test_attached_ignores_events() {
        let state = AttachState::Attached.transition(AttachEvent::Failed);
        assert_eq!(state, AttachState::Attached);
        assert!(!state.can_attach());
    }
}
