//! Transport-neutral request/response types.
//!
//! The server adapter copies what it needs out of the platform request
//! into a [`Request`], hands it to a surface, and writes the returned
//! [`Dispatch`] back.  Everything between those two points is plain data,
//! so both surfaces are tested on the host without a socket.

use core::fmt;
use core::time::Duration;

use serde_json::{Value, json};

use super::auth::CHALLENGE;
use crate::error::GateError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: String,
    headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// `uri` may carry a query string; it is split off into [`Request::query`].
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self {
            method,
            path: path.to_owned(),
            query: query.to_owned(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::Get, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::Post, uri)
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header lookup, case-insensitive on the name.  First match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type without parameters, lower-cased.
    pub fn media_type(&self) -> Option<String> {
        self.header("Content-Type")
            .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Response {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            headers: Vec::new(),
            body: value.to_string(),
        }
    }

    /// A pre-rendered JSON document.
    pub fn json_str(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            headers: Vec::new(),
            body: body.to_owned(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_HTML,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// `{"error": "..."}` with the error's status.  Authentication failures
    /// also carry the bearer challenge.
    pub fn error(err: GateError) -> Self {
        let mut resp = Self::json(err.status(), &json!({ "error": err.public_message() }));
        if err == GateError::Authentication {
            resp.headers.push(("WWW-Authenticate", CHALLENGE.to_owned()));
        }
        resp
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON (tests and diagnostics).
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Work the server adapter performs after the response is on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Restart { after: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub response: Response,
    pub follow_up: Option<FollowUp>,
}

impl Dispatch {
    #[must_use]
    pub fn then(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }
}

impl From<Response> for Dispatch {
    fn from(response: Response) -> Self {
        Self {
            response,
            follow_up: None,
        }
    }
}

impl From<GateError> for Dispatch {
    fn from(err: GateError) -> Self {
        Response::error(err).into()
    }
}
