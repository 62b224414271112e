//! HTTP surfaces.
//!
//! | Module     | Role                                              |
//! |------------|---------------------------------------------------|
//! | `request`  | Transport-neutral request / response / follow-up  |
//! | `auth`     | Bearer-token gate                                 |
//! | `form`     | Credential extraction (form fields, JSON)         |
//! | `routes`   | Route tables for both surfaces                    |
//! | `pages`    | Static HTML and the OpenAPI document              |
//! | `server`   | ESP-IDF HTTP server binding (target only)         |

pub mod auth;
pub mod form;
pub mod pages;
pub mod request;
pub mod routes;
#[cfg(target_os = "espidf")]
pub mod server;

pub use request::{Dispatch, FollowUp, Method, Request, Response};
pub use routes::{Dispatcher, OperationalApi, ProvisioningPortal};
