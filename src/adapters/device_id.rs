//! Device identity derived from the ESP32 factory MAC address.
//!
//! The last three MAC bytes name the provisioning access point
//! (`gate-xxyyzz`) and tag the boot banner (`GK-XXYYZZ`).  Both are stable
//! across reboots because the MAC is burned into eFuse.

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the six bytes the call writes.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: a fixed fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Short ID for logs: `GK-XXYYZZ`.
pub fn device_id(mac: &MacAddress) -> heapless::String<16> {
    let mut id = heapless::String::new();
    let _ = write!(id, "GK-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

/// Provisioning access-point SSID: `gate-xxyyzz`.
pub fn access_point_ssid(mac: &MacAddress) -> heapless::String<32> {
    let mut name = heapless::String::new();
    let _ = write!(name, "gate-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}
