//! Outbound HTTP client for the remote notifier.
//!
//! Implements [`HttpClientPort`] with one fresh connection per poll, so a
//! broken connection never carries over to the next iteration.  Plain HTTP
//! only: no certificate bundle is attached, and `GateConfig::validate`
//! refuses `https://` endpoints.
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` wrapped in the
//!   `embedded_svc` blocking client.
//! - **all other targets**: returns a scripted status (default 204).

use log::debug;

use crate::app::ports::HttpClientPort;
use crate::error::NetworkError;

#[cfg(target_os = "espidf")]
use embedded_svc::http::client::Client;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
#[cfg(target_os = "espidf")]
use esp_idf_svc::io::Write;

/// Per-request timeout.  Keeps a dead endpoint from stalling the main loop.
const REQUEST_TIMEOUT_MS: u64 = 4_000;

pub struct RemoteClient {
    #[cfg(not(target_os = "espidf"))]
    sim_status: Result<u16, NetworkError>,
}

impl RemoteClient {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim_status: Ok(204),
        }
    }

    /// Simulation: the outcome every following poll returns.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_status(&mut self, status: Result<u16, NetworkError>) {
        self.sim_status = status;
    }
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientPort for RemoteClient {
    #[cfg(target_os = "espidf")]
    fn post_json(&mut self, url: &str, bearer: &str, body: &str) -> Result<u16, NetworkError> {
        let conn = EspHttpConnection::new(&Configuration {
            timeout: Some(core::time::Duration::from_millis(REQUEST_TIMEOUT_MS)),
            ..Default::default()
        })
        .map_err(|_| NetworkError::Unreachable)?;
        let mut client = Client::wrap(conn);

        let auth = format!("Bearer {bearer}");
        let len = body.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", len.as_str()),
            ("Authorization", auth.as_str()),
        ];

        let mut req = client
            .post(url, &headers)
            .map_err(|_| NetworkError::InvalidRequest)?;
        req.write_all(body.as_bytes()).map_err(|_| NetworkError::Io)?;
        req.flush().map_err(|_| NetworkError::Io)?;
        let resp = req.submit().map_err(|_| NetworkError::Unreachable)?;

        let status = resp.status();
        debug!("RemoteClient: POST {} -> {}", url, status);
        Ok(status)
    }

    #[cfg(not(target_os = "espidf"))]
    fn post_json(&mut self, url: &str, _bearer: &str, _body: &str) -> Result<u16, NetworkError> {
        debug!(
            "RemoteClient(sim): POST {} -> {:?} (timeout {} ms)",
            url, self.sim_status, REQUEST_TIMEOUT_MS
        );
        self.sim_status
    }
}
