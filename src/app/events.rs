//! Outbound application events.
//!
//! Domain components emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them, e.g. log to serial.

use super::commands::GateAction;
use crate::error::{ActuationError, NetworkError};

/// Which of the two mutually exclusive services runs this boot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Provisioning,
    Operational,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot selected a mode from the stored credentials.
    ModeSelected(ModeKind),

    /// A station join attempt failed; the bootstrapper will retry.
    JoinRetry { attempt: u32 },

    /// Station join succeeded after `attempts` tries.
    Joined { attempts: u32 },

    /// A credential triple was persisted.  Carries the masked key.
    Provisioned { ssid: String, key_hint: String },

    /// An actuation pulse began.
    ActuationStarted(GateAction),

    /// An actuation pulse finished and both lines are released.
    ActuationCompleted(GateAction),

    /// An actuation request could not be carried out.
    ActuationFailed { action: GateAction, error: ActuationError },

    /// The remote endpoint answered 200 and a pulse was requested.
    RemoteTrigger,

    /// The remote endpoint answered with a status other than 200.
    RemoteIgnored { status: u16 },

    /// The remote poll never got a response.
    RemotePollFailed(NetworkError),
}
