//! Device credential triple and its durable store.
//!
//! The triple (network name, network secret, API key) lives in the `gate`
//! namespace as three string entries.  The store is either empty or fully
//! configured; [`ConfigStore::provision`] writes the API key last and
//! rolls back on any failure, so a reader never observes a partial triple.

use log::{info, warn};

use crate::app::ports::{ConnectivityError, StorageError, StoragePort};
use crate::error::GateError;

pub const NAMESPACE: &str = "gate";
pub const KEY_SSID: &str = "ssid";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_API_KEY: &str = "apikey";

/// The persisted triple.  Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCredentials {
    pub network_name: String,
    pub network_secret: String,
    pub api_key: String,
}

impl DeviceCredentials {
    /// `true` when boot must enter provisioning mode.
    pub fn is_unprovisioned(&self) -> bool {
        self.network_name.is_empty() || self.api_key.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.network_name.is_empty() && self.network_secret.is_empty() && self.api_key.is_empty()
    }
}

/// Longest SSID the 802.11 beacon can carry.
pub const MAX_SSID_LEN: usize = 32;
/// WPA2 passphrase upper bound (64 = raw hex PSK).
pub const MAX_PASSWORD_LEN: usize = 64;

/// Bytes `0x20..=0x7E`, space through tilde.
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > MAX_SSID_LEN || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// A network name/secret pair taken from a provisioning request.
///
/// Only constructed through [`NetworkCredentials::from_fields`], so holding
/// one means both fields were present and well-formed.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkCredentials {
    ssid: String,
    password: String,
}

impl NetworkCredentials {
    /// Validate raw request fields.  Empty counts as missing.
    pub fn from_fields(ssid: Option<String>, password: Option<String>) -> Result<Self, GateError> {
        let (Some(ssid), Some(password)) = (
            ssid.filter(|s| !s.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(GateError::Validation("ssid and password are required"));
        };
        validate_ssid(&ssid)
            .map_err(|_| GateError::Validation("ssid must be 1-32 printable ASCII characters"))?;
        validate_password(&password)
            .map_err(|_| GateError::Validation("password must be at most 64 bytes"))?;
        Ok(Self { ssid, password })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Complete the triple with a freshly issued key.
    pub fn with_api_key(self, api_key: &str) -> DeviceCredentials {
        DeviceCredentials {
            network_name: self.ssid,
            network_secret: self.password,
            api_key: api_key.into(),
        }
    }
}

// The password never reaches logs.
impl core::fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Durable store for [`DeviceCredentials`], generic over the storage backend.
pub struct ConfigStore<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the triple.  Missing keys read as empty strings.
    pub fn load(&self) -> Result<DeviceCredentials, StorageError> {
        let read = |key| {
            self.storage
                .get(NAMESPACE, key)
                .map(Option::unwrap_or_default)
        };
        let creds = DeviceCredentials {
            network_name: read(KEY_SSID)?,
            network_secret: read(KEY_PASSWORD)?,
            api_key: read(KEY_API_KEY)?,
        };
        info!(
            "ConfigStore: loaded (ssid={}, apikey={})",
            if creds.network_name.is_empty() { "<unset>" } else { creds.network_name.as_str() },
            if creds.api_key.is_empty() { "<unset>" } else { "<set>" },
        );
        Ok(creds)
    }

    /// Whether a complete triple is stored right now.
    ///
    /// Storage errors read as "not provisioned"; the caller is about to
    /// attempt a write which will surface the same error.
    pub fn is_provisioned(&self) -> bool {
        self.load().is_ok_and(|c| !c.is_unprovisioned())
    }

    /// Persist a full triple.  On any write failure the already-written
    /// entries are deleted and the error is returned.
    pub fn provision(&mut self, creds: &DeviceCredentials) -> Result<(), StorageError> {
        let entries = [
            (KEY_SSID, creds.network_name.as_str()),
            (KEY_PASSWORD, creds.network_secret.as_str()),
            (KEY_API_KEY, creds.api_key.as_str()),
        ];
        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.storage.put(NAMESPACE, key, value) {
                warn!("ConfigStore: write of '{}' failed ({}), rolling back", key, e);
                self.rollback(&entries[..written]);
                return Err(e);
            }
        }
        info!("ConfigStore: credentials persisted (ssid={})", creds.network_name);
        Ok(())
    }

    fn rollback(&mut self, written: &[(&str, &str)]) {
        // API key first, so a crash mid-rollback still reads as unprovisioned.
        for (key, _) in written.iter().rev() {
            if let Err(e) = self.storage.delete(NAMESPACE, key) {
                warn!("ConfigStore: rollback of '{}' failed ({})", key, e);
            }
        }
    }

    /// Hand the backend back, e.g. to simulate a restart.
    pub fn into_inner(self) -> S {
        self.storage
    }
}
