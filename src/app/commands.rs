//! Inbound actuation requests.
//!
//! These represent actions requested by the outside world (HTTP routes,
//! the remote notifier) that the actuation worker carries out.

use core::fmt;

/// Why a pulse was requested.
///
/// The tag is informational: every variant drives the identical physical
/// sequence.  The hardware toggles on a pulse and has no direction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    Open,
    Close,
    RemoteTrigger,
}

impl GateAction {
    /// Message returned to the HTTP caller on success.
    pub const fn status_message(self) -> &'static str {
        match self {
            Self::Open => "gate opened",
            Self::Close => "gate closed",
            Self::RemoteTrigger => "gate triggered",
        }
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
            Self::RemoteTrigger => write!(f, "remote-trigger"),
        }
    }
}

/// Transient, unpersisted request for one actuation pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationRequest {
    pub action: GateAction,
}

impl ActuationRequest {
    pub const fn new(action: GateAction) -> Self {
        Self { action }
    }
}
