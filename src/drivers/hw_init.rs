//! One-shot GPIO reconfiguration for the relay lines.
//!
//! The relay lines switch between two electrical modes at runtime, so
//! unlike a typical init module these helpers are also called on every
//! pulse.  Each call reprograms the pin with a full `gpio_config_t` using
//! raw ESP-IDF sys calls.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// A GPIO reconfiguration was rejected by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed { pin: i32, rc: i32 },
    GpioLevelFailed { pin: i32, rc: i32 },
}

impl HwInitError {
    /// Raw platform return code.
    pub const fn code(self) -> i32 {
        match self {
            Self::GpioConfigFailed { rc, .. } | Self::GpioLevelFailed { rc, .. } => rc,
        }
    }
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed { pin, rc } => write!(f, "GPIO{} config failed (rc={})", pin, rc),
            Self::GpioLevelFailed { pin, rc } => write!(f, "GPIO{} set level failed (rc={})", pin, rc),
        }
    }
}

// ── Boot ──────────────────────────────────────────────────────

/// Put both relay lines into the high-impedance state.
///
/// Called from `main()` before any service starts, so a reset in the middle
/// of a pulse never leaves the coil energised.
pub fn release_relay_lines() -> Result<(), HwInitError> {
    gpio_release(pins::RELAY_A_GPIO)?;
    gpio_release(pins::RELAY_B_GPIO)?;
    info!(
        "hw_init: relay lines released (GPIO{}, GPIO{})",
        pins::RELAY_A_GPIO,
        pins::RELAY_B_GPIO
    );
    Ok(())
}

// ── Driven output ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_drive_output(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config copies the struct; the pin number comes from
    // `pins` and is a valid output-capable GPIO on this board.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed { pin, rc: ret });
    }
    // SAFETY: pin was configured as an output just above.
    let ret = unsafe { gpio_set_level(pin, pins::RELAY_ASSERTED_LEVEL) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioLevelFailed { pin, rc: ret });
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_drive_output(pin: i32) -> Result<(), HwInitError> {
    log::debug!("hw_init(sim): GPIO{} driven", pin);
    Ok(())
}

// ── High-impedance input ──────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_release(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: see gpio_drive_output.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed { pin, rc: ret });
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_release(pin: i32) -> Result<(), HwInitError> {
    log::debug!("hw_init(sim): GPIO{} released", pin);
    Ok(())
}
