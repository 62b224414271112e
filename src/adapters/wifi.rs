//! WiFi adapter.
//!
//! Implements [`NetworkPort`]: one blocking station join per call, or the
//! provisioning access point.  Retry policy lives in the bootstrapper, not
//! here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` from `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub that records what was asked of it.

use log::{info, warn};

use crate::app::ports::{ConnectivityError, NetworkPort};
use crate::credentials::{validate_password, validate_ssid};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

/// Access-point passphrases shorter than this are rejected by WPA2.
const MIN_AP_PASSWORD_LEN: usize = 8;

/// What the radio is currently set up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiRole {
    Idle,
    AccessPoint,
    Station,
}

pub struct WifiAdapter {
    role: WifiRole,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: every join attempt, in order.
    #[cfg(not(target_os = "espidf"))]
    sim_joins: Vec<String>,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> anyhow::Result<Self> {
        let wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;
        Ok(Self {
            role: WifiRole::Idle,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            role: WifiRole::Idle,
            sim_joins: Vec::new(),
        }
    }

    pub fn role(&self) -> WifiRole {
        self.role
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_joins(&self) -> &[String] {
        &self.sim_joins
    }

    fn auth_method_for(password: &str) -> AuthKind {
        if password.is_empty() {
            AuthKind::Open
        } else {
            AuthKind::Wpa2
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start_ap(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        let cfg = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: password.try_into().map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method: Self::auth_method_for(password).into(),
            channel: 1,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&cfg)
            .and_then(|()| self.wifi.start())
            .and_then(|()| self.wifi.wait_netif_up())
            .map_err(|e| {
                warn!("WiFi: access point start failed ({})", e);
                ConnectivityError::AccessPointFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_ap(&mut self, ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): access point '{}' up", ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        if self.role != WifiRole::Station {
            let cfg = Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
                password: password.try_into().map_err(|_| ConnectivityError::InvalidPassword)?,
                auth_method: Self::auth_method_for(password).into(),
                ..Default::default()
            });
            self.wifi
                .set_configuration(&cfg)
                .and_then(|()| self.wifi.start())
                .map_err(|e| {
                    warn!("WiFi: station start failed ({})", e);
                    ConnectivityError::ConnectionFailed
                })?;
            self.role = WifiRole::Station;
        }

        match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Leave the driver ready for the next attempt.
                let _ = self.wifi.disconnect();
                warn!("WiFi: join failed ({})", e);
                Err(ConnectivityError::ConnectionFailed)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        self.sim_joins.push(ssid.to_owned());
        info!("WiFi(sim): joined '{}'", ssid);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform-neutral auth selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    Open,
    Wpa2,
}

#[cfg(target_os = "espidf")]
impl From<AuthKind> for AuthMethod {
    fn from(kind: AuthKind) -> Self {
        match kind {
            AuthKind::Open => AuthMethod::None,
            AuthKind::Wpa2 => AuthMethod::WPA2Personal,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkPort
// ───────────────────────────────────────────────────────────────

impl NetworkPort for WifiAdapter {
    fn start_access_point(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        if !password.is_empty() && password.len() < MIN_AP_PASSWORD_LEN {
            return Err(ConnectivityError::InvalidPassword);
        }
        validate_password(password)?;

        let auth = Self::auth_method_for(password);
        info!("WiFi: starting access point '{}' ({:?})", ssid, auth);
        self.platform_start_ap(ssid, password)?;
        self.role = WifiRole::AccessPoint;
        Ok(())
    }

    fn join(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.platform_join(ssid, password)?;
        self.role = WifiRole::Station;
        info!("WiFi: connected to '{}'", ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
