//! Provisioning surface end to end: request in, store contents out.

use std::time::Duration;

use gatekeeper::app::events::AppEvent;
use gatekeeper::app::provisioning::ProvisioningService;
use gatekeeper::credentials::{ConfigStore, DeviceCredentials, KEY_API_KEY, KEY_PASSWORD, KEY_SSID, NAMESPACE};
use gatekeeper::http::request::{CONTENT_TYPE_FORM, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON};
use gatekeeper::http::{Dispatcher, FollowUp, ProvisioningPortal, Request};
use gatekeeper::keygen::{ApiKey, ApiKeyGenerator};

use crate::mock_hw::{FixedEntropy, MockStorage, RecordingSink};

const GRACE: Duration = Duration::from_millis(3_000);

fn portal(backend: &MockStorage) -> (ProvisioningPortal<MockStorage, RecordingSink>, RecordingSink) {
    let sink = RecordingSink::default();
    let keygen = ApiKeyGenerator::from_entropy(&mut FixedEntropy(0x5EED));
    let service = ProvisioningService::new(ConfigStore::new(backend.clone()), keygen, sink.clone());
    (ProvisioningPortal::new(service, GRACE), sink)
}

fn form(path: &str, body: &str) -> Request {
    Request::post(path)
        .with_header("Content-Type", CONTENT_TYPE_FORM)
        .with_body(body)
}

fn json(body: &str) -> Request {
    Request::post("/config")
        .with_header("Content-Type", CONTENT_TYPE_JSON)
        .with_body(body)
}

/// What a fresh boot would read.
fn reload(backend: &MockStorage) -> DeviceCredentials {
    ConfigStore::new(backend.clone()).load().unwrap()
}

#[test]
fn root_serves_the_form() {
    let (p, _) = portal(&MockStorage::new());
    let d = p.dispatch(&Request::get("/"));
    assert_eq!(d.response.status, 200);
    assert_eq!(d.response.content_type, CONTENT_TYPE_HTML);
    assert!(d.response.body.contains("<form"));
    assert!(d.follow_up.is_none());
}

#[test]
fn form_submit_persists_exact_triple_and_schedules_restart() {
    let backend = MockStorage::new();
    let (p, sink) = portal(&backend);

    let d = p.dispatch(&form("/save", "ssid=net&password=pw"));
    assert_eq!(d.response.status, 200);
    assert_eq!(d.follow_up, Some(FollowUp::Restart { after: GRACE }));

    let stored = reload(&backend);
    assert_eq!(stored.network_name, "net");
    assert_eq!(stored.network_secret, "pw");
    assert!(ApiKey::parse(&stored.api_key).is_some(), "key {:?}", stored.api_key);
    assert!(d.response.body.contains(&stored.api_key));

    let events = sink.snapshot();
    assert!(matches!(
        &events[..],
        [AppEvent::Provisioned { ssid, key_hint }] if ssid == "net" && key_hint.ends_with(&stored.api_key[12..])
    ));
}

#[test]
fn config_json_returns_key_and_round_trips_across_restart() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);

    let d = p.dispatch(&json(r#"{"ssid":"net","password":"pw"}"#));
    assert_eq!(d.response.status, 200);
    assert_eq!(d.response.content_type, CONTENT_TYPE_JSON);
    assert!(matches!(d.follow_up, Some(FollowUp::Restart { .. })));

    let body = d.response.body_json().unwrap();
    let key = body["apikey"].as_str().unwrap().to_owned();
    assert_eq!(key.len(), 16);

    drop(p);
    let after_restart = reload(&backend);
    assert_eq!(
        after_restart,
        DeviceCredentials {
            network_name: "net".into(),
            network_secret: "pw".into(),
            api_key: key,
        }
    );
}

#[test]
fn config_accepts_form_fields_too() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    let d = p.dispatch(&form("/config", "ssid=net&password=pw"));
    assert_eq!(d.response.status, 200);
    assert!(d.response.body_json().unwrap()["apikey"].is_string());
}

#[test]
fn config_on_provisioned_device_is_a_conflict_and_changes_nothing() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    assert_eq!(p.dispatch(&json(r#"{"ssid":"net","password":"pw"}"#)).response.status, 200);
    let before = reload(&backend);

    for req in [
        json(r#"{"ssid":"other","password":"secret"}"#),
        json("garbage"),
        form("/config", "ssid=other&password=secret"),
    ] {
        let d = p.dispatch(&req);
        assert_eq!(d.response.status, 403);
        assert_eq!(d.response.body, r#"{"error":"Device already configured"}"#);
        assert!(d.follow_up.is_none(), "no restart on conflict");
    }
    assert_eq!(reload(&backend), before);
}

#[test]
fn save_has_no_conflict_check() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    p.dispatch(&form("/save", "ssid=first&password=pw"));
    let first_key = reload(&backend).api_key;

    let d = p.dispatch(&form("/save", "ssid=second&password=pw2"));
    assert_eq!(d.response.status, 200);
    let stored = reload(&backend);
    assert_eq!(stored.network_name, "second");
    assert_ne!(stored.api_key, first_key, "fresh key per provisioning");
}

#[test]
fn one_field_never_writes_anything() {
    let backend = MockStorage::new();
    let (p, sink) = portal(&backend);

    for req in [
        form("/save", "ssid=net"),
        form("/save", "password=pw"),
        form("/save", "ssid=&password=pw"),
        form("/config", "ssid=net"),
        json(r#"{"password":"pw"}"#),
        json(r#"{"ssid":"net","password":""}"#),
    ] {
        let d = p.dispatch(&req);
        assert_eq!(d.response.status, 400, "{} {:?}", req.path, String::from_utf8_lossy(&req.body));
        assert!(d.follow_up.is_none());
        assert_eq!(backend.len(), 0, "partial write");
    }
    assert!(sink.snapshot().is_empty());
}

#[test]
fn garbled_json_is_a_validation_error() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    for body in [
        r#"{"ssid":"net","password":"pw""#,
        r#"{"ssid":["net"],"password":"pw"}"#,
        r#"{"wifi":{"ssid":"net","password":"pw"}}"#,
        "{",
    ] {
        let d = p.dispatch(&json(body));
        assert_eq!(d.response.status, 400, "{body}");
        assert!(d.response.body_json().unwrap()["error"].is_string());
    }
    assert_eq!(backend.len(), 0);
}

#[test]
fn array_or_scalar_json_body_is_rejected() {
    let backend = MockStorage::new();
    let (p, sink) = portal(&backend);
    for body in [r#"["net","pw"]"#, r#""net""#, "42", "null"] {
        let d = p.dispatch(&json(body));
        assert_eq!(d.response.status, 400, "{body}");
        assert!(d.follow_up.is_none());
    }
    assert_eq!(backend.len(), 0);
    assert!(sink.snapshot().is_empty());
}

#[test]
fn config_json_takes_missing_fields_from_query() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    let req = Request::post("/config?ssid=net&password=pw")
        .with_header("Content-Type", CONTENT_TYPE_JSON);

    let d = p.dispatch(&req);
    assert_eq!(d.response.status, 200);
    let stored = reload(&backend);
    assert_eq!((stored.network_name.as_str(), stored.network_secret.as_str()), ("net", "pw"));
}

#[test]
fn storage_failure_leaves_store_empty() {
    let backend = MockStorage::new();
    backend.fail_writes_to(KEY_API_KEY);
    let (p, _) = portal(&backend);

    let d = p.dispatch(&json(r#"{"ssid":"net","password":"pw"}"#));
    assert_eq!(d.response.status, 500);
    assert!(d.follow_up.is_none());
    assert!(backend.raw(NAMESPACE, KEY_SSID).is_none());
    assert!(backend.raw(NAMESPACE, KEY_PASSWORD).is_none());
    assert!(reload(&backend).is_empty());
}

#[test]
fn unknown_paths_are_not_found() {
    let (p, _) = portal(&MockStorage::new());
    for req in [Request::get("/open"), Request::get("/save"), Request::post("/")] {
        let d = p.dispatch(&req);
        assert_eq!(d.response.status, 404);
        assert_eq!(d.response.body, r#"{"error":"Not found"}"#);
    }
}

#[test]
fn into_service_hands_back_the_same_store() {
    let backend = MockStorage::new();
    let (p, _) = portal(&backend);
    p.dispatch(&form("/save", "ssid=net&password=pw"));
    let store = p.into_service().into_store();
    assert!(store.is_provisioned());
}
