//! Relay driver, hardware initialisation, and platform helpers.

pub mod delay;
pub mod hw_init;
pub mod relay;
pub mod task_pin;
