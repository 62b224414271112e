//! ESP-IDF HTTP server binding.
//!
//! Registers one wildcard handler per method and forwards every request to
//! a [`Dispatcher`].  Only the two headers the surfaces read are copied
//! out of the platform request.  Follow-up work runs on a fresh thread
//! once the handler has returned and the response is flushed.

use std::sync::Arc;

use anyhow::Context;
use esp_idf_svc::http::Method as EspMethod;
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request as EspRequest};
use esp_idf_svc::io::{Read, Write};
use log::{info, warn};

use super::form::MAX_BODY_LEN;
use super::request::{FollowUp, Method, Request};
use super::routes::Dispatcher;

const FORWARDED_HEADERS: [&str; 2] = ["Authorization", "Content-Type"];

/// Start listening on `port`.  The returned server must be kept alive.
pub fn start<D, F>(port: u16, surface: Arc<D>, on_follow_up: F) -> anyhow::Result<EspHttpServer<'static>>
where
    D: Dispatcher + Send + Sync + 'static,
    F: Fn(FollowUp) + Clone + Send + Sync + 'static,
{
    let mut server = EspHttpServer::new(&Configuration {
        http_port: port,
        uri_match_wildcard: true,
        ..Default::default()
    })
    .context("HTTP server start")?;

    for (esp_method, method) in [(EspMethod::Get, Method::Get), (EspMethod::Post, Method::Post)] {
        let surface = surface.clone();
        let on_follow_up = on_follow_up.clone();
        server.fn_handler::<anyhow::Error, _>("/*", esp_method, move |req| {
            handle(req, method, surface.as_ref(), &on_follow_up)
        })?;
    }

    info!("HTTP: listening on port {}", port);
    Ok(server)
}

fn handle<D: Dispatcher>(
    mut esp_req: EspRequest<&mut EspHttpConnection<'_>>,
    method: Method,
    surface: &D,
    on_follow_up: &impl Fn(FollowUp),
) -> anyhow::Result<()> {
    let mut req = Request::new(method, esp_req.uri());
    for name in FORWARDED_HEADERS {
        if let Some(value) = esp_req.header(name) {
            req = req.with_header(name, value);
        }
    }
    req.body = read_body(&mut esp_req)?;

    let dispatch = surface.dispatch(&req);
    let resp = &dispatch.response;
    info!("HTTP: {} {} -> {}", method, req.path, resp.status);

    let mut headers: Vec<(&str, &str)> = vec![("Content-Type", resp.content_type)];
    headers.extend(resp.headers.iter().map(|(n, v)| (*n, v.as_str())));

    let mut out = esp_req.into_response(resp.status, None, &headers)?;
    out.write_all(resp.body.as_bytes())?;
    out.flush()?;
    drop(out);

    if let Some(follow_up) = dispatch.follow_up {
        on_follow_up(follow_up);
    }
    Ok(())
}

/// Read at most one byte past the limit so oversize bodies are detectable.
fn read_body(esp_req: &mut EspRequest<&mut EspHttpConnection<'_>>) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 256];
    while body.len() <= MAX_BODY_LEN {
        let n = esp_req.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    if body.len() > MAX_BODY_LEN {
        warn!("HTTP: body truncated at {} bytes", body.len());
    }
    Ok(body)
}
