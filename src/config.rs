//! Device configuration parameters
//!
//! All tunable timing and endpoint parameters for the gate controller.
//! Values are fixed at build time; the endpoint and secrets can be
//! overridden through `GATE_*` environment variables when compiling.

use serde::{Deserialize, Serialize};

/// Remote poll endpoint. Empty disables the remote notifier.
const DEFAULT_REMOTE_URL: &str = match option_env!("GATE_REMOTE_URL") {
    Some(url) => url,
    None => "",
};

/// Bearer token presented to the remote endpoint.
const DEFAULT_REMOTE_TOKEN: &str = match option_env!("GATE_REMOTE_TOKEN") {
    Some(token) => token,
    None => "",
};

/// Provisioning access-point passphrase. Empty = open network.
const DEFAULT_AP_PASSWORD: &str = match option_env!("GATE_AP_PASSWORD") {
    Some(pw) => pw,
    None => "",
};

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    // --- Actuation ---
    /// How long both relay lines are held asserted (milliseconds)
    pub pulse_duration_ms: u32,
    /// Extra time a requester waits beyond the pulse before giving up (milliseconds)
    pub completion_margin_ms: u32,

    // --- Provisioning ---
    /// Delay between answering a successful provisioning request and restarting (milliseconds)
    pub restart_grace_ms: u32,
    /// Passphrase for the provisioning access point (empty = open)
    pub ap_password: String,

    // --- Network ---
    /// Fixed interval between station join attempts (milliseconds)
    pub join_poll_interval_ms: u32,
    /// HTTP listen port for both surfaces
    pub http_port: u16,

    // --- Remote notifier ---
    /// Endpoint polled once per main-loop iteration (plain `http://` only,
    /// the client carries no certificate bundle)
    pub remote_url: String,
    /// Bearer token sent with every poll
    pub remote_token: String,
    /// Fixed JSON body of every poll
    pub remote_payload: String,
    /// Main-loop iteration interval (milliseconds)
    pub loop_interval_ms: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            // Actuation
            pulse_duration_ms: 3_000,
            completion_margin_ms: 2_000,

            // Provisioning
            restart_grace_ms: 3_000,
            ap_password: DEFAULT_AP_PASSWORD.into(),

            // Network
            join_poll_interval_ms: 500,
            http_port: 80,

            // Remote notifier
            remote_url: DEFAULT_REMOTE_URL.into(),
            remote_token: DEFAULT_REMOTE_TOKEN.into(),
            remote_payload: r#"{"event":"poll"}"#.into(),
            loop_interval_ms: 5_000,
        }
    }
}

impl GateConfig {
    /// Upper bound a requester waits for one actuation to complete.
    pub fn completion_timeout_ms(&self) -> u32 {
        self.pulse_duration_ms.saturating_add(self.completion_margin_ms)
    }

    /// Whether the remote notifier should run at all.
    pub fn remote_enabled(&self) -> bool {
        !self.remote_url.is_empty()
    }

    /// Range-check every field. The defaults always pass.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(500..=10_000).contains(&self.pulse_duration_ms) {
            return Err("pulse_duration_ms must be 500–10000");
        }
        if !(100..=10_000).contains(&self.completion_margin_ms) {
            return Err("completion_margin_ms must be 100–10000");
        }
        if !(500..=30_000).contains(&self.restart_grace_ms) {
            return Err("restart_grace_ms must be 500–30000");
        }
        if !self.ap_password.is_empty() && !(8..=63).contains(&self.ap_password.len()) {
            return Err("ap_password must be empty or 8–63 bytes");
        }
        if !(100..=60_000).contains(&self.join_poll_interval_ms) {
            return Err("join_poll_interval_ms must be 100–60000");
        }
        if self.http_port == 0 {
            return Err("http_port must be non-zero");
        }
        if self.remote_enabled() && !self.remote_url.starts_with("http://") {
            return Err("remote_url must be an http:// URL");
        }
        if serde_json::from_str::<serde_json::Value>(&self.remote_payload).is_err() {
            return Err("remote_payload must be valid JSON");
        }
        if !(100..=3_600_000).contains(&self.loop_interval_ms) {
            return Err("loop_interval_ms must be 100–3600000");
        }
        Ok(())
    }
}
