//! Route tables for the two HTTP surfaces.
//!
//! ```text
//!   Mode::Provisioning ──▶ ProvisioningPortal   GET /, POST /save, POST /config
//!   Mode::Operational  ──▶ OperationalApi       GET /open, /close (bearer), /docs, /swagger.json
//! ```
//!
//! Exactly one surface exists per boot.  Each owns a static route table;
//! the shared [`dispatch_table`] does the matching, the bearer check and
//! the not-found fallback.

use core::time::Duration;
use std::sync::{Mutex, PoisonError};

use log::info;
use serde_json::json;

use super::auth::AuthGate;
use super::form;
use super::pages;
use super::request::{Dispatch, FollowUp, Method, Request, Response};
use crate::app::actuation::Actuator;
use crate::app::commands::{ActuationRequest, GateAction};
use crate::app::ports::{EventSink, StoragePort};
use crate::app::provisioning::ProvisioningService;
use crate::error::GateError;

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
}

pub struct Route<T> {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
    pub handler: fn(&T, &Request) -> Dispatch,
}

/// Something the server adapter can hand requests to.
pub trait Dispatcher {
    fn dispatch(&self, req: &Request) -> Dispatch;
}

/// Match `req` against `routes`.
///
/// With a gate present, bearer routes and unmatched paths both require a
/// valid credential, so an unauthenticated caller cannot probe which paths
/// exist.  Without a gate every route is public.
pub fn dispatch_table<T>(target: &T, routes: &[Route<T>], gate: Option<&AuthGate>, req: &Request) -> Dispatch {
    let route = routes
        .iter()
        .find(|r| r.method == req.method && r.path == req.path);

    let needs_auth = route.is_none_or(|r| r.access == Access::Bearer);
    if needs_auth {
        if let Some(gate) = gate {
            if let Err(e) = gate.check(req) {
                return e.into();
            }
        }
    }

    match route {
        Some(r) => (r.handler)(target, req),
        None => GateError::NotFound.into(),
    }
}

// ───────────────────────────────────────────────────────────────
// Provisioning surface
// ───────────────────────────────────────────────────────────────

pub struct ProvisioningPortal<S: StoragePort, E: EventSink> {
    service: Mutex<ProvisioningService<S, E>>,
    restart_grace: Duration,
}

impl<S: StoragePort, E: EventSink> ProvisioningPortal<S, E> {
    pub fn new(service: ProvisioningService<S, E>, restart_grace: Duration) -> Self {
        Self {
            service: Mutex::new(service),
            restart_grace,
        }
    }

    fn routes() -> [Route<Self>; 3] {
        [
            Route { method: Method::Get, path: "/", access: Access::Public, handler: Self::index },
            Route { method: Method::Post, path: "/save", access: Access::Public, handler: Self::save },
            Route { method: Method::Post, path: "/config", access: Access::Public, handler: Self::config },
        ]
    }

    fn index(&self, _req: &Request) -> Dispatch {
        Response::html(200, pages::PORTAL_HTML).into()
    }

    /// Form submit.  Overwrites whatever is stored.
    fn save(&self, req: &Request) -> Dispatch {
        let issued = form::form_credentials(req).and_then(|creds| self.lock().provision(creds));
        match issued {
            Ok(key) => Dispatch::from(Response::html(200, pages::key_page(key.as_str())))
                .then(self.restart()),
            Err(e) => Response::html(e.status(), pages::error_page(e.public_message())).into(),
        }
    }

    /// Programmatic submit.  Refuses a configured device before looking at
    /// the body.
    fn config(&self, req: &Request) -> Dispatch {
        let mut service = self.lock();
        if service.store().is_provisioned() {
            return GateError::Conflict.into();
        }
        match form::any_credentials(req).and_then(|creds| service.provision(creds)) {
            Ok(key) => Dispatch::from(Response::json(200, &json!({ "apikey": key.as_str() })))
                .then(self.restart()),
            Err(e) => e.into(),
        }
    }

    fn restart(&self) -> FollowUp {
        info!("Portal: restart scheduled in {:?}", self.restart_grace);
        FollowUp::Restart { after: self.restart_grace }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProvisioningService<S, E>> {
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the service back out (tests simulate a restart with this).
    pub fn into_service(self) -> ProvisioningService<S, E> {
        self.service.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: StoragePort, E: EventSink> Dispatcher for ProvisioningPortal<S, E> {
    fn dispatch(&self, req: &Request) -> Dispatch {
        dispatch_table(self, &Self::routes(), None, req)
    }
}

// ───────────────────────────────────────────────────────────────
// Operational surface
// ───────────────────────────────────────────────────────────────

pub struct OperationalApi<A: Actuator> {
    gate: AuthGate,
    actuator: A,
}

impl<A: Actuator> OperationalApi<A> {
    pub fn new(gate: AuthGate, actuator: A) -> Self {
        Self { gate, actuator }
    }

    fn routes() -> [Route<Self>; 4] {
        [
            Route { method: Method::Get, path: "/open", access: Access::Bearer, handler: Self::open },
            Route { method: Method::Get, path: "/close", access: Access::Bearer, handler: Self::close },
            Route { method: Method::Get, path: "/docs", access: Access::Public, handler: Self::docs },
            Route { method: Method::Get, path: "/swagger.json", access: Access::Public, handler: Self::swagger },
        ]
    }

    fn open(&self, _req: &Request) -> Dispatch {
        self.pulse(GateAction::Open)
    }

    fn close(&self, _req: &Request) -> Dispatch {
        self.pulse(GateAction::Close)
    }

    fn docs(&self, _req: &Request) -> Dispatch {
        Response::html(200, pages::DOCS_HTML).into()
    }

    fn swagger(&self, _req: &Request) -> Dispatch {
        Response::json_str(200, pages::SWAGGER_JSON).into()
    }

    fn pulse(&self, action: GateAction) -> Dispatch {
        match self.actuator.actuate(ActuationRequest::new(action)) {
            Ok(()) => Response::json(200, &json!({ "status": action.status_message() })).into(),
            Err(e) => GateError::Actuation(e).into(),
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}

impl<A: Actuator> Dispatcher for OperationalApi<A> {
    fn dispatch(&self, req: &Request) -> Dispatch {
        dispatch_table(self, &Self::routes(), Some(&self.gate), req)
    }
}
