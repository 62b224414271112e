//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] with string entries.  Each `put` / `delete`
//! is followed by `nvs_commit()`, which ESP-IDF makes atomic per call;
//! multi-key atomicity is handled one layer up in `ConfigStore`.
//!
//! # Security
//!
//! On ESP32 the `gate` namespace lives on the encrypted NVS partition when
//! `CONFIG_NVS_ENCRYPTION` is set; the calls below are unchanged either
//! way.  The host backend is a plain in-memory map (dev/test only).

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{StorageError, StoragePort};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// NVS limits namespace and key names to 15 bytes plus the terminator.
#[cfg(target_os = "espidf")]
const NVS_NAME_BUF: usize = 16;

/// Upper bound on a stored value, terminator included.
#[cfg(target_os = "espidf")]
const MAX_VALUE_LEN: usize = 128;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, String>,
}

impl NvsAdapter {
    /// Initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the partition is erased
    /// and re-initialised, which reads back as an unprovisioned device.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t {
                warn!("NVS: erasing and re-initialising flash partition");
                // SAFETY: as above.
                if unsafe { nvs_flash_erase() } != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError);
                }
                // SAFETY: as above.
                if unsafe { nvs_flash_init() } != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(StorageError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Null-terminated copy of a namespace or key name.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; NVS_NAME_BUF] {
        let mut buf = [0u8; NVS_NAME_BUF];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NVS_NAME_BUF - 1);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open `namespace`, run `f` with the handle, close it again.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns = Self::c_name(namespace);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: `ns` is null-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is not used after this.
        unsafe { nvs_close(handle) };
        result
    }

    #[cfg(target_os = "espidf")]
    fn map_err(ret: esp_err_t) -> StorageError {
        if ret == ESP_ERR_NVS_NOT_ENOUGH_SPACE as esp_err_t {
            StorageError::Full
        } else if ret == ESP_ERR_NVS_INVALID_LENGTH as esp_err_t {
            StorageError::Corrupted
        } else {
            StorageError::IoError
        }
    }
}

impl StoragePort for NvsAdapter {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            Ok(self.store.get(&Self::composite_key(namespace, key)).cloned())
        }

        #[cfg(target_os = "espidf")]
        {
            let key_c = Self::c_name(key);
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let mut buf = [0u8; MAX_VALUE_LEN];
                let mut size = buf.len();
                // SAFETY: `size` holds the buffer capacity; NVS writes at most that.
                let ret = unsafe {
                    nvs_get_str(handle, key_c.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                // `size` counts the terminator.
                Ok(buf[..size.saturating_sub(1)].to_vec())
            });
            match result {
                Ok(bytes) => String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| StorageError::Corrupted),
                // A namespace that was never written cannot be opened read-only.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => Ok(None),
                Err(e) => {
                    warn!("NvsAdapter: read of '{}' failed (rc={})", key, e);
                    Err(Self::map_err(e))
                }
            }
        }
    }

    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .insert(Self::composite_key(namespace, key), value.to_owned());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            if value.len() >= MAX_VALUE_LEN || value.as_bytes().contains(&0) {
                return Err(StorageError::Corrupted);
            }
            let key_c = Self::c_name(key);
            let mut value_c = value.as_bytes().to_vec();
            value_c.push(0);
            Self::with_nvs_handle(namespace, true, |handle| {
                // SAFETY: both strings are null-terminated and outlive the call.
                let ret = unsafe { nvs_set_str(handle, key_c.as_ptr().cast(), value_c.as_ptr().cast()) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                // SAFETY: handle is open read-write.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(|e| {
                warn!("NvsAdapter: write of '{}' failed (rc={})", key, e);
                Self::map_err(e)
            })
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.remove(&Self::composite_key(namespace, key));
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key_c = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                // SAFETY: key is null-terminated; handle is open read-write.
                let ret = unsafe { nvs_erase_key(handle, key_c.as_ptr().cast()) };
                if ret != ESP_OK as esp_err_t && ret != ESP_ERR_NVS_NOT_FOUND as esp_err_t {
                    return Err(ret);
                }
                // SAFETY: as above.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(Self::map_err)
        }
    }
}
