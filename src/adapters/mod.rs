//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements           | Connects to                 |
//! |----------------|----------------------|-----------------------------|
//! | `device_id`    | -                    | eFuse MAC                   |
//! | `http_client`  | HttpClientPort       | ESP-IDF HTTP client         |
//! | `log_sink`     | EventSink            | Serial log output           |
//! | `nvs`          | StoragePort          | NVS / in-memory store       |
//! | `system`       | EntropyPort          | Hardware RNG                |
//! |                | RestartPort          | `esp_restart`               |
//! | `wifi`         | NetworkPort          | ESP-IDF WiFi STA / AP       |
//!
//! The relay itself is driven from `drivers::relay`, which implements
//! `RelayPort` directly.

pub mod device_id;
pub mod http_client;
pub mod log_sink;
pub mod nvs;
pub mod system;
pub mod wifi;
