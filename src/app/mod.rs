//! Application layer: hexagonal core with port-based I/O.
//!
//! The bootstrapper picks a [`Mode`](bootstrap::Mode) from the stored
//! credentials; the provisioning service, actuation worker and remote
//! notifier run behind the port traits in [`ports`].

pub mod actuation;
pub mod bootstrap;
pub mod commands;
pub mod events;
pub mod notifier;
pub mod ports;
pub mod provisioning;
