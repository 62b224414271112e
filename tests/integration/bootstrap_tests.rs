//! Boot mode selection against mock network and storage.

use gatekeeper::app::bootstrap::{AccessPoint, Bootstrapper, Mode};
use gatekeeper::app::events::{AppEvent, ModeKind};
use gatekeeper::credentials::{ConfigStore, DeviceCredentials};

use crate::mock_hw::{MockDelay, MockNetwork, MockStorage, NetCall, RecordingSink};

const AP: AccessPoint<'static> = AccessPoint {
    ssid: "gate-efcafe",
    password: "",
};

fn triple(ssid: &str, secret: &str, key: &str) -> DeviceCredentials {
    DeviceCredentials {
        network_name: ssid.into(),
        network_secret: secret.into(),
        api_key: key.into(),
    }
}

fn boot(creds: DeviceCredentials, network: MockNetwork) -> (Mode, MockNetwork, MockDelay, RecordingSink) {
    let delay = MockDelay::default();
    let mut sink = RecordingSink::default();
    let mut b = Bootstrapper::new(network, delay.clone(), 500);
    let mode = b.boot(creds, AP, &mut sink).unwrap();
    (mode, b.into_network(), delay, sink)
}

#[test]
fn incomplete_triples_open_the_access_point_only() {
    for creds in [
        DeviceCredentials::default(),
        triple("", "pw", "0123456789ABCDEF"),
        triple("net", "pw", ""),
    ] {
        let (mode, net, _, sink) = boot(creds, MockNetwork::default());
        assert_eq!(mode, Mode::Provisioning);
        assert_eq!(net.joins(), 0, "operational join attempted");
        assert_eq!(
            net.calls,
            vec![NetCall::AccessPoint {
                ssid: "gate-efcafe".into(),
                password: String::new()
            }]
        );
        assert_eq!(sink.snapshot()[0], AppEvent::ModeSelected(ModeKind::Provisioning));
    }
}

#[test]
fn full_triple_joins_and_never_opens_access_point() {
    let creds = triple("net", "pw", "0123456789ABCDEF");
    let (mode, net, _, _) = boot(creds.clone(), MockNetwork::default());
    assert_eq!(mode, Mode::Operational(creds));
    assert_eq!(net.access_points(), 0);
    assert_eq!(
        net.calls,
        vec![NetCall::Join {
            ssid: "net".into(),
            password: "pw".into()
        }]
    );
}

#[test]
fn join_retries_at_fixed_interval_until_success() {
    let creds = triple("net", "pw", "0123456789ABCDEF");
    let (mode, net, delay, sink) = boot(creds, MockNetwork::failing(25));
    assert!(matches!(mode, Mode::Operational(_)));
    assert_eq!(net.joins(), 26);
    assert_eq!(net.access_points(), 0, "no fallback to provisioning");
    // 25 failures, 500 ms each, no growth.
    assert_eq!(delay.total_ms(), 25 * 500);

    let events = sink.snapshot();
    assert_eq!(events.last(), Some(&AppEvent::Joined { attempts: 26 }));
    let retries = events
        .iter()
        .filter(|e| matches!(e, AppEvent::JoinRetry { .. }))
        .count();
    assert_eq!(retries, 25);
}

#[test]
fn mode_follows_what_the_store_holds() {
    let backend = MockStorage::new();
    let mut store = ConfigStore::new(backend.clone());
    let (mode, _, _, _) = boot(store.load().unwrap(), MockNetwork::default());
    assert_eq!(mode, Mode::Provisioning);

    store.provision(&triple("net", "pw", "0123456789ABCDEF")).unwrap();

    // Fresh store over the same backend: a restart.
    let reloaded = ConfigStore::new(backend).load().unwrap();
    let (mode, net, _, _) = boot(reloaded, MockNetwork::default());
    assert_eq!(mode.kind(), ModeKind::Operational);
    assert_eq!(net.joins(), 1);
}
