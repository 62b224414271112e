//! Gate relay controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, with simulation stubs on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod keygen;
pub mod pins;

pub mod adapters;
pub mod drivers;
mod esp_link_shims;
