//! System services: hardware entropy and device restart.

use core::time::Duration;

use log::info;

use crate::app::ports::{EntropyPort, RestartPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct EspSystem;

impl EspSystem {
    pub fn new() -> Self {
        Self
    }

    /// Sleep for `grace`, then restart.  Used for the post-provisioning
    /// restart so the response reaches the client first.
    pub fn restart_after(&mut self, grace: Duration) {
        info!("System: restarting in {:?}", grace);
        std::thread::sleep(grace);
        self.restart();
    }
}

/// ESP-IDF: 64 bits from the hardware RNG.  With the radio on, this is a
/// true random source.
#[cfg(target_os = "espidf")]
impl EntropyPort for EspSystem {
    fn entropy_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        // SAFETY: esp_fill_random writes exactly `buf.len()` bytes into a
        // buffer we own.
        unsafe {
            esp_idf_sys::esp_fill_random(buf.as_mut_ptr().cast(), buf.len());
        }
        u64::from_le_bytes(buf)
    }
}

/// Simulation: `RandomState` keys are randomised per process.
#[cfg(not(target_os = "espidf"))]
impl EntropyPort for EspSystem {
    fn entropy_u64(&mut self) -> u64 {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        RandomState::new().build_hasher().finish()
    }
}

#[cfg(target_os = "espidf")]
impl RestartPort for EspSystem {
    fn restart(&mut self) {
        // SAFETY: esp_restart never returns; no Rust state needs unwinding.
        unsafe { esp_idf_sys::esp_restart() };
    }
}

#[cfg(not(target_os = "espidf"))]
impl RestartPort for EspSystem {
    fn restart(&mut self) {
        info!("System(sim): restart requested");
    }
}
