//! Unified error taxonomy for the gate controller.
//!
//! Every request-path failure funnels into [`GateError`], which knows its
//! HTTP status and JSON error body.  All variants are `Copy` so they pass
//! through the dispatch layer without allocation.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// Bearer credential missing or wrong.
    Authentication,
    /// Provisioning fields missing or unparseable.  Nothing was written.
    Validation(&'static str),
    /// The device is already provisioned.
    Conflict,
    /// No route matched an authenticated request.
    NotFound,
    /// The durable store rejected a write.  The store was rolled back.
    Storage(StorageError),
    /// The relay could not be pulsed.
    Actuation(ActuationError),
}

impl GateError {
    /// HTTP status for this error.
    pub const fn status(self) -> u16 {
        match self {
            Self::Authentication => 401,
            Self::Validation(_) => 400,
            Self::Conflict => 403,
            Self::NotFound => 404,
            Self::Storage(_) => 500,
            Self::Actuation(e) => e.status(),
        }
    }

    /// Client-facing message placed in the `{"error": ...}` body.
    pub const fn public_message(self) -> &'static str {
        match self {
            Self::Authentication => "Unauthorized",
            Self::Validation(reason) => reason,
            Self::Conflict => "Device already configured",
            Self::NotFound => "Not found",
            Self::Storage(_) => "Storage failure",
            Self::Actuation(e) => e.public_message(),
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication failed"),
            Self::Validation(reason) => write!(f, "validation: {reason}"),
            Self::Conflict => write!(f, "conflict: already provisioned"),
            Self::NotFound => write!(f, "not found"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Actuation(e) => write!(f, "actuation: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Network errors (outbound poll)
// ---------------------------------------------------------------------------

/// Failure of one outbound poll.  The notifier logs and counts it; it is
/// never converted into a [`GateError`] or an HTTP response.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The request could not be built (bad URL, header too long).
    InvalidRequest,
    /// Connection or DNS failure.
    Unreachable,
    /// The connection broke while sending or receiving.
    Io,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid request"),
            Self::Unreachable => write!(f, "endpoint unreachable"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationError {
    /// Another pulse is already queued.
    Busy,
    /// Completion was not observed within the requester's timeout.
    Timeout,
    /// A relay line could not be configured.  Both lines were released.
    LineFault,
    /// The actuation worker is not running.
    WorkerGone,
}

impl ActuationError {
    pub const fn status(self) -> u16 {
        match self {
            Self::Busy => 503,
            Self::Timeout => 504,
            Self::LineFault | Self::WorkerGone => 500,
        }
    }

    pub const fn public_message(self) -> &'static str {
        match self {
            Self::Busy => "Actuator busy",
            Self::Timeout => "Actuation timed out",
            Self::LineFault | Self::WorkerGone => "Actuation failed",
        }
    }
}

impl fmt::Display for ActuationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "actuator busy"),
            Self::Timeout => write!(f, "completion timed out"),
            Self::LineFault => write!(f, "relay line fault"),
            Self::WorkerGone => write!(f, "actuation worker not running"),
        }
    }
}

impl From<ActuationError> for GateError {
    fn from(e: ActuationError) -> Self {
        Self::Actuation(e)
    }
}

impl From<StorageError> for GateError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
