//! Credential extraction from provisioning requests.
//!
//! Two body shapes are accepted:
//!
//! - form fields (`ssid`, `password`) from the query string and an
//!   urlencoded body; a body field overrides the same query field
//! - a JSON object `{"ssid": "...", "password": "..."}`, parsed with
//!   `serde_json`; only the two named string members are read, and a
//!   query-string field fills in a member the object leaves out
//!
//! Whatever the shape, the result goes through
//! [`NetworkCredentials::from_fields`], so a missing, empty, non-string or
//! garbled field always ends as a validation error and never reaches the
//! store.

use serde_json::Value;
use url::form_urlencoded;

use super::request::{CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, Request};
use crate::credentials::NetworkCredentials;
use crate::error::GateError;

pub const FIELD_SSID: &str = "ssid";
pub const FIELD_PASSWORD: &str = "password";

/// Bodies above this size are refused before parsing.
pub const MAX_BODY_LEN: usize = 1024;

/// Raw, unvalidated field pair.
pub type RawFields = (Option<String>, Option<String>);

/// Collect `ssid` / `password` from the query string, then the body.
pub fn form_fields(req: &Request) -> RawFields {
    let mut fields = query_fields(req);
    merge_urlencoded(&mut fields, req.body.as_slice());
    fields
}

/// Form fields carried in the query string alone.
pub fn query_fields(req: &Request) -> RawFields {
    let mut fields: RawFields = (None, None);
    merge_urlencoded(&mut fields, req.query.as_bytes());
    fields
}

fn merge_urlencoded(fields: &mut RawFields, source: &[u8]) {
    for (name, value) in form_urlencoded::parse(source) {
        match name.as_ref() {
            FIELD_SSID => fields.0 = Some(value.into_owned()),
            FIELD_PASSWORD => fields.1 = Some(value.into_owned()),
            _ => {}
        }
    }
}

/// Parse a JSON object body.  Arrays, scalars and non-string members are
/// validation errors; other members are ignored.
pub fn json_fields(body: &[u8]) -> Result<RawFields, GateError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| GateError::Validation("request body is not valid JSON"))?;
    let Some(object) = value.as_object() else {
        return Err(GateError::Validation("request body must be a JSON object"));
    };
    let member = |name: &str| match object.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(GateError::Validation("ssid and password must be strings")),
    };
    Ok((member(FIELD_SSID)?, member(FIELD_PASSWORD)?))
}

/// JSON when declared so, or when undeclared and the body looks like an object.
pub fn is_json(req: &Request) -> bool {
    match req.media_type().as_deref() {
        Some(CONTENT_TYPE_JSON) => true,
        Some(CONTENT_TYPE_FORM) => false,
        _ => req.body.trim_ascii_start().first() == Some(&b'{'),
    }
}

/// Credentials from form fields only.
pub fn form_credentials(req: &Request) -> Result<NetworkCredentials, GateError> {
    check_size(req)?;
    let (ssid, password) = form_fields(req);
    NetworkCredentials::from_fields(ssid, password)
}

/// Credentials from a JSON body or form fields, whichever the request carries.
///
/// A JSON request with an empty body, or an object missing a member, takes
/// the missing field from the query string.
pub fn any_credentials(req: &Request) -> Result<NetworkCredentials, GateError> {
    check_size(req)?;
    let (ssid, password) = if !is_json(req) {
        form_fields(req)
    } else if req.body.trim_ascii().is_empty() {
        query_fields(req)
    } else {
        let (ssid, password) = json_fields(&req.body)?;
        let (query_ssid, query_password) = query_fields(req);
        (ssid.or(query_ssid), password.or(query_password))
    };
    NetworkCredentials::from_fields(ssid, password)
}

fn check_size(req: &Request) -> Result<(), GateError> {
    if req.body.len() > MAX_BODY_LEN {
        return Err(GateError::Validation("request body too large"));
    }
    Ok(())
}
