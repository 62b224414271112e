//! Remote notifier against a real actuation worker.

use std::time::Duration;

use gatekeeper::app::commands::GateAction;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::notifier::{NotifierStats, PollOutcome, RemoteNotifier};
use gatekeeper::config::GateConfig;
use gatekeeper::error::{ActuationError, NetworkError};

use crate::mock_hw::{FixedActuator, MockDelay, RecordingSink, ScriptedClient, spawn_worker};

const URL: &str = "http://remote.example/gate/poll";
const TOKEN: &str = "remote-token";
const PAYLOAD: &str = r#"{"event":"poll","device":"GK-CAFE01"}"#;

fn notifier() -> RemoteNotifier {
    RemoteNotifier::new(URL, TOKEN, PAYLOAD)
}

#[test]
fn status_200_pulses_exactly_once() {
    let rig = spawn_worker(3_000, Duration::from_secs(2), MockDelay::default());
    let mut client = ScriptedClient::with([Ok(200)]);
    let mut sink = RecordingSink::default();
    let mut n = notifier();

    let out = n.poll_once(&mut client, &rig.handle, &mut sink);
    assert_eq!(out, PollOutcome::Triggered);
    assert_eq!(rig.relay.pulses(), 1);
    assert!(rig.relay.all_released());
    assert_eq!(rig.delay.total_ms(), 3_000);
    assert_eq!(sink.snapshot(), vec![AppEvent::RemoteTrigger]);
    assert_eq!(
        rig.sink.snapshot(),
        vec![
            AppEvent::ActuationStarted(GateAction::RemoteTrigger),
            AppEvent::ActuationCompleted(GateAction::RemoteTrigger)
        ]
    );
}

#[test]
fn poll_carries_bearer_and_payload() {
    let mut client = ScriptedClient::with([Ok(204)]);
    let act = FixedActuator::returning(Ok(()));
    notifier().poll_once(&mut client, &act, &mut RecordingSink::default());
    assert_eq!(client.sent, vec![(URL.to_owned(), TOKEN.to_owned(), PAYLOAD.to_owned())]);
}

#[test]
fn other_statuses_and_failures_never_pulse() {
    let rig = spawn_worker(3_000, Duration::from_secs(2), MockDelay::default());
    let mut client = ScriptedClient::with([
        Ok(204),
        Ok(201),
        Ok(401),
        Ok(500),
        Err(NetworkError::Unreachable),
        Err(NetworkError::Io),
    ]);
    let mut sink = RecordingSink::default();
    let mut n = notifier();

    let outcomes: Vec<_> = (0..6).map(|_| n.poll_once(&mut client, &rig.handle, &mut sink)).collect();
    assert_eq!(
        outcomes,
        vec![
            PollOutcome::Ignored(204),
            PollOutcome::Ignored(201),
            PollOutcome::Ignored(401),
            PollOutcome::Ignored(500),
            PollOutcome::Failed(NetworkError::Unreachable),
            PollOutcome::Failed(NetworkError::Io),
        ]
    );
    assert!(rig.relay.history().is_empty());
    assert_eq!(
        n.stats(),
        NotifierStats {
            polls: 6,
            triggers: 0,
            ignored: 4,
            failures: 2
        }
    );
    assert!(sink.snapshot().contains(&AppEvent::RemotePollFailed(NetworkError::Io)));
}

#[test]
fn each_poll_stands_alone() {
    // Failure is not retried within the poll; the next 200 still triggers.
    let rig = spawn_worker(100, Duration::from_secs(2), MockDelay::default());
    let mut client = ScriptedClient::with([Err(NetworkError::Unreachable), Ok(200), Ok(200)]);
    let mut sink = RecordingSink::default();
    let mut n = notifier();

    for _ in 0..3 {
        n.poll_once(&mut client, &rig.handle, &mut sink);
    }
    assert_eq!(client.sent.len(), 3);
    assert_eq!(rig.relay.pulses(), 2);
    assert_eq!(n.stats().triggers, 2);
}

#[test]
fn busy_actuator_is_reported_not_retried() {
    let act = FixedActuator::returning(Err(ActuationError::Busy));
    let mut client = ScriptedClient::with([Ok(200)]);
    let out = notifier().poll_once(&mut client, &act, &mut RecordingSink::default());
    assert_eq!(out, PollOutcome::TriggerFailed(ActuationError::Busy));
    assert_eq!(act.call_count(), 1);
}

#[test]
fn disabled_by_empty_url_in_config() {
    let config = GateConfig {
        remote_url: String::new(),
        ..GateConfig::default()
    };
    let mut n = RemoteNotifier::from_config(&config);
    let mut client = ScriptedClient::with([Ok(200)]);
    let act = FixedActuator::returning(Ok(()));

    assert_eq!(n.poll_once(&mut client, &act, &mut RecordingSink::default()), PollOutcome::Disabled);
    assert!(client.sent.is_empty());
    assert_eq!(act.call_count(), 0);
}
