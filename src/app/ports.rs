//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Bootstrapper / services (domain)
//! ```
//!
//! Driven adapters (relay lines, storage, network, outbound HTTP, event
//! sinks) implement these traits.  The domain consumes them via generics,
//! so nothing above this line touches hardware directly.
//!
//! ## Security notes
//!
//! - **StoragePort** implementations hold the network secret and API key;
//!   on ESP32 the namespace lives on the encrypted NVS partition.
//! - All port errors are typed; callers must handle every variant explicitly.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One of the two relay terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayLine {
    A,
    B,
}

impl RelayLine {
    pub const BOTH: [RelayLine; 2] = [RelayLine::A, RelayLine::B];
}

/// Electrical mode of a relay control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Configured as an output and driven to the asserted level.
    Driven,
    /// Configured as an input, high impedance, no current drawn.
    Released,
}

/// Write-side port for the two relay control lines.
pub trait RelayPort {
    /// Configure `line` as an output at the asserted level.
    fn drive(&mut self, line: RelayLine) -> Result<(), LineError>;

    /// Reconfigure `line` as a high-impedance input.
    fn release(&mut self, line: RelayLine) -> Result<(), LineError>;
}

/// A GPIO reconfiguration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineError {
    pub line: RelayLine,
    /// Platform return code (ESP-IDF `esp_err_t`), 0 in simulation.
    pub code: i32,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay line {:?} reconfigure failed (rc={})", self.line, self.code)
    }
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Durable string-keyed store.
///
/// Keys are namespaced to prevent collisions between subsystems.  A single
/// `put` is atomic on power loss; multi-key atomicity is the caller's job.
pub trait StoragePort {
    /// Read a value.  `Ok(None)` when the key was never written.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value and commit it.
    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Storage partition is full.
    Full,
    /// Stored value is not valid UTF-8 or exceeds the read buffer.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "storage full"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → WiFi stack)
// ───────────────────────────────────────────────────────────────

/// Blocking network-stack operations used during boot.
pub trait NetworkPort {
    /// Bring up the isolated provisioning access point.
    fn start_access_point(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;

    /// One station-mode join attempt; returns once associated with an IP, or fails.
    fn join(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AccessPointFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be at most 64 bytes)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AccessPointFailed => write!(f, "access point start failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Outbound HTTP port (driven adapter: domain → remote endpoint)
// ───────────────────────────────────────────────────────────────

/// Single-shot outbound request.  No retries at this layer.
pub trait HttpClientPort {
    /// POST `body` as JSON with `Authorization: Bearer <token>`.
    /// Returns the response status code.
    fn post_json(
        &mut self,
        url: &str,
        bearer: &str,
        body: &str,
    ) -> Result<u16, crate::error::NetworkError>;
}

// ───────────────────────────────────────────────────────────────
// System port (entropy + restart)
// ───────────────────────────────────────────────────────────────

/// Hardware entropy source, read once per provisioning attempt.
pub trait EntropyPort {
    fn entropy_u64(&mut self) -> u64;
}

/// Device restart.  Used only to leave provisioning mode.
pub trait RestartPort {
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
