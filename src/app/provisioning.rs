//! Provisioning service: validated credentials in, API key out.
//!
//! Used only in provisioning mode.  Each successful call issues a fresh
//! key and persists the full triple; the caller is responsible for the
//! restart that moves the device into operational mode.

use log::{info, warn};

use super::events::AppEvent;
use super::ports::{EventSink, StoragePort};
use crate::credentials::{ConfigStore, NetworkCredentials};
use crate::error::GateError;
use crate::keygen::{ApiKey, ApiKeyGenerator};

pub struct ProvisioningService<S: StoragePort, E: EventSink> {
    store: ConfigStore<S>,
    keygen: ApiKeyGenerator,
    sink: E,
}

impl<S: StoragePort, E: EventSink> ProvisioningService<S, E> {
    pub fn new(store: ConfigStore<S>, keygen: ApiKeyGenerator, sink: E) -> Self {
        Self { store, keygen, sink }
    }

    /// Issue a key and persist the triple, overwriting whatever is stored.
    ///
    /// The form route calls this directly; the JSON route checks
    /// [`ConfigStore::is_provisioned`] first.
    pub fn provision(&mut self, creds: NetworkCredentials) -> Result<ApiKey, GateError> {
        let key = self.keygen.generate();
        let ssid = creds.ssid().to_owned();
        let triple = creds.with_api_key(key.as_str());

        if let Err(e) = self.store.provision(&triple) {
            warn!("Provisioning: persist failed ({}), store rolled back", e);
            return Err(GateError::Storage(e));
        }

        info!("Provisioning: key {} issued for '{}'", key.hint(), ssid);
        self.sink.emit(&AppEvent::Provisioned {
            ssid,
            key_hint: key.hint(),
        });
        Ok(key)
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Hand the store back, e.g. to simulate a restart in tests.
    pub fn into_store(self) -> ConfigStore<S> {
        self.store
    }
}
