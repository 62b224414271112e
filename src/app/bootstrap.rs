//! Boot-time mode selection.
//!
//! ```text
//!   ConfigStore::load ──▶ select_mode ──┬─▶ Provisioning: start AP, portal surface
//!                                       └─▶ Operational:  join (retry forever), API surface + main loop
//! ```
//!
//! The two modes are mutually exclusive for the whole boot cycle.  The only
//! way from Provisioning to Operational is the restart that follows a
//! successful provisioning request.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::events::{AppEvent, ModeKind};
use super::ports::{ConnectivityError, EventSink, NetworkPort};
use crate::credentials::DeviceCredentials;

/// The service this boot cycle runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Provisioning,
    Operational(DeviceCredentials),
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Provisioning => ModeKind::Provisioning,
            Self::Operational(_) => ModeKind::Operational,
        }
    }
}

/// Pick the mode for a loaded triple.
pub fn select_mode(creds: DeviceCredentials) -> Mode {
    if creds.is_unprovisioned() {
        Mode::Provisioning
    } else {
        Mode::Operational(creds)
    }
}

/// Access-point parameters for provisioning mode.
#[derive(Debug, Clone, Copy)]
pub struct AccessPoint<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

/// Drives the network side of boot for whichever mode was selected.
pub struct Bootstrapper<N: NetworkPort, D: DelayNs> {
    network: N,
    delay: D,
    join_interval_ms: u32,
}

impl<N: NetworkPort, D: DelayNs> Bootstrapper<N, D> {
    pub fn new(network: N, delay: D, join_interval_ms: u32) -> Self {
        Self {
            network,
            delay,
            join_interval_ms,
        }
    }

    /// Select the mode and bring the network up for it.
    ///
    /// Operational mode blocks until the join succeeds; there is no
    /// timeout and no fallback to provisioning.  Provisioning mode fails
    /// only if the access point cannot be started.
    pub fn boot(
        &mut self,
        creds: DeviceCredentials,
        ap: AccessPoint<'_>,
        sink: &mut impl EventSink,
    ) -> Result<Mode, ConnectivityError> {
        let mode = select_mode(creds);
        sink.emit(&AppEvent::ModeSelected(mode.kind()));

        match &mode {
            Mode::Provisioning => {
                info!("Boot: no stored credentials, opening access point '{}'", ap.ssid);
                self.network.start_access_point(ap.ssid, ap.password)?;
            }
            Mode::Operational(creds) => {
                info!("Boot: joining '{}'", creds.network_name);
                self.join_with_retry(creds, sink);
            }
        }
        Ok(mode)
    }

    /// Join the stored network, retrying at a fixed interval until it
    /// succeeds.  Returns the number of attempts taken.
    pub fn join_with_retry(&mut self, creds: &DeviceCredentials, sink: &mut impl EventSink) -> u32 {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match self.network.join(&creds.network_name, &creds.network_secret) {
                Ok(()) => {
                    sink.emit(&AppEvent::Joined { attempts: attempt });
                    return attempt;
                }
                Err(e) => {
                    if attempt == 1 {
                        warn!("Boot: join failed ({}), retrying every {} ms", e, self.join_interval_ms);
                    }
                    sink.emit(&AppEvent::JoinRetry { attempt });
                    self.delay.delay_ms(self.join_interval_ms);
                }
            }
        }
    }

    /// Hand the network adapter back; on ESP-IDF dropping it stops WiFi.
    pub fn into_network(self) -> N {
        self.network
    }
}
