//! Connection lifecycle owned by a wallet session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Ready,
    Paused,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Ready => "ready",
            ConnectionState::Paused => "paused",
        }
    }

    /// disconnected → connecting → connected → ready ⇄ paused; anything may drop to disconnected.
    pub fn can_transition(&self, to: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, to),
            (_, Disconnected)
                | (Disconnected, Connecting)
                | (Paused, Connecting)
                | (Connecting, Connected)
                | (Connected, Ready)
                | (Ready, Paused)
                | (Paused, Ready)
        )
    }

    /// True while requests may be submitted.
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Ready)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Lifecycle events raised by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Authorized,
    Disconnected,
    Ready,
    Paused,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 4] =
        [LifecycleEvent::Authorized, LifecycleEvent::Disconnected, LifecycleEvent::Ready, LifecycleEvent::Paused];

    pub fn as_str(&self) -> &'static str {
        use crate::core::methods::session_events as names;
        match self {
            LifecycleEvent::Authorized => names::AUTHORIZED,
            LifecycleEvent::Disconnected => names::DISCONNECTED,
            LifecycleEvent::Ready => names::READY,
            LifecycleEvent::Paused => names::PAUSED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Disconnected.can_transition(Connecting));
        assert!(Connecting.can_transition(Connected));
        assert!(Connected.can_transition(Ready));
        assert!(Ready.can_transition(Paused));
        assert!(Paused.can_transition(Ready));
    }

    #[test]
    fn rejects_skips() {
        assert!(!Disconnected.can_transition(Ready));
        assert!(!Disconnected.can_transition(Paused));
        assert!(!Connecting.can_transition(Paused));
        assert!(!Ready.can_transition(Connecting));
    }

    #[test]
    fn any_state_can_disconnect() {
        for s in [Disconnected, Connecting, Connected, Ready, Paused] {
            assert!(s.can_transition(Disconnected), "{s}");
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Ready).unwrap(), "\"ready\"");
        assert_eq!(serde_json::to_string(&LifecycleEvent::Authorized).unwrap(), "\"authorized\"");
    }
}
