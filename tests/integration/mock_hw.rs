//! Mock adapters for integration tests.
//!
//! Every mock records what was asked of it behind an `Arc<Mutex<..>>`, so
//! a test can hand the mock to a worker thread or a surface and still
//! inspect the history afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use gatekeeper::app::actuation::{self, ActuationController, ActuationHandle, Actuator};
use gatekeeper::app::commands::ActuationRequest;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::ports::{
    ConnectivityError, EntropyPort, EventSink, HttpClientPort, LineError, LineMode, NetworkPort,
    RelayLine, RelayPort, StorageError, StoragePort,
};
use gatekeeper::error::{ActuationError, NetworkError};

// ── Storage ───────────────────────────────────────────────────

/// In-memory store.  Clones share the same map, which is how tests model
/// a restart: build a fresh `ConfigStore` over a clone.
#[derive(Clone, Default)]
pub struct MockStorage {
    map: Arc<Mutex<HashMap<String, String>>>,
    fail_on_key: Arc<Mutex<Option<&'static str>>>,
}

#[allow(dead_code)]
impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&self, key: &'static str) {
        *self.fail_on_key.lock().unwrap() = Some(key);
    }

    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    pub fn raw(&self, namespace: &str, key: &str) -> Option<String> {
        self.map.lock().unwrap().get(&format!("{namespace}::{key}")).cloned()
    }
}

impl StoragePort for MockStorage {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(namespace, key))
    }

    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_on_key.lock().unwrap() == Some(key) {
            return Err(StorageError::Full);
        }
        self.map
            .lock()
            .unwrap()
            .insert(format!("{namespace}::{key}"), value.to_owned());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.map.lock().unwrap().remove(&format!("{namespace}::{key}"));
        Ok(())
    }
}

// ── Network ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetCall {
    AccessPoint { ssid: String, password: String },
    Join { ssid: String, password: String },
}

#[derive(Default)]
pub struct MockNetwork {
    pub calls: Vec<NetCall>,
    /// Number of join attempts that fail before one succeeds.
    pub failing_joins: u32,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn failing(failing_joins: u32) -> Self {
        Self {
            failing_joins,
            ..Default::default()
        }
    }

    pub fn joins(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, NetCall::Join { .. })).count()
    }

    pub fn access_points(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, NetCall::AccessPoint { .. }))
            .count()
    }
}

impl NetworkPort for MockNetwork {
    fn start_access_point(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        self.calls.push(NetCall::AccessPoint {
            ssid: ssid.into(),
            password: password.into(),
        });
        Ok(())
    }

    fn join(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        self.calls.push(NetCall::Join {
            ssid: ssid.into(),
            password: password.into(),
        });
        if self.failing_joins > 0 {
            self.failing_joins -= 1;
            return Err(ConnectivityError::ConnectionFailed);
        }
        Ok(())
    }
}

// ── Relay ─────────────────────────────────────────────────────

/// Records every line transition.
#[derive(Clone, Default)]
pub struct MockRelay {
    pub log: Arc<Mutex<Vec<(RelayLine, LineMode)>>>,
}

#[allow(dead_code)]
impl MockRelay {
    pub fn history(&self) -> Vec<(RelayLine, LineMode)> {
        self.log.lock().unwrap().clone()
    }

    /// Complete drive-both / release-both sequences seen so far.
    pub fn pulses(&self) -> usize {
        let log = self.history();
        log.chunks(4)
            .filter(|c| {
                *c == [
                    (RelayLine::A, LineMode::Driven),
                    (RelayLine::B, LineMode::Driven),
                    (RelayLine::A, LineMode::Released),
                    (RelayLine::B, LineMode::Released),
                ]
            })
            .count()
    }

    pub fn all_released(&self) -> bool {
        let log = self.history();
        RelayLine::BOTH.iter().all(|line| {
            log.iter()
                .rev()
                .find(|(l, _)| l == line)
                .is_none_or(|(_, m)| *m == LineMode::Released)
        })
    }
}

impl RelayPort for MockRelay {
    fn drive(&mut self, line: RelayLine) -> Result<(), LineError> {
        self.log.lock().unwrap().push((line, LineMode::Driven));
        Ok(())
    }

    fn release(&mut self, line: RelayLine) -> Result<(), LineError> {
        self.log.lock().unwrap().push((line, LineMode::Released));
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Adds up requested delay.  With `real` set it also sleeps, for tests
/// that need a pulse to take wall-clock time.
#[derive(Clone, Default)]
pub struct MockDelay {
    pub total_ms: Arc<AtomicU64>,
    pub real: bool,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn real() -> Self {
        Self {
            real: true,
            ..Default::default()
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms.load(Ordering::SeqCst)
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms.fetch_add(u64::from(ms), Ordering::SeqCst);
        if self.real {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn snapshot(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── Outbound HTTP ─────────────────────────────────────────────

#[derive(Default)]
pub struct ScriptedClient {
    pub replies: VecDeque<Result<u16, NetworkError>>,
    pub sent: Vec<(String, String, String)>,
}

#[allow(dead_code)]
impl ScriptedClient {
    pub fn with(replies: impl IntoIterator<Item = Result<u16, NetworkError>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            sent: Vec::new(),
        }
    }
}

impl HttpClientPort for ScriptedClient {
    fn post_json(&mut self, url: &str, bearer: &str, body: &str) -> Result<u16, NetworkError> {
        self.sent.push((url.into(), bearer.into(), body.into()));
        self.replies.pop_front().unwrap_or(Err(NetworkError::Unreachable))
    }
}

// ── Actuator stand-in ─────────────────────────────────────────

/// Returns a fixed result and counts calls, no worker thread.
pub struct FixedActuator {
    pub result: Result<(), ActuationError>,
    pub calls: Mutex<Vec<ActuationRequest>>,
}

#[allow(dead_code)]
impl FixedActuator {
    pub fn returning(result: Result<(), ActuationError>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Actuator for FixedActuator {
    fn actuate(&self, request: ActuationRequest) -> Result<(), ActuationError> {
        self.calls.lock().unwrap().push(request);
        self.result
    }
}

// ── Entropy ───────────────────────────────────────────────────

pub struct FixedEntropy(pub u64);

impl EntropyPort for FixedEntropy {
    fn entropy_u64(&mut self) -> u64 {
        self.0
    }
}

// ── Worker harness ────────────────────────────────────────────

pub struct WorkerRig {
    pub handle: ActuationHandle,
    pub relay: MockRelay,
    pub delay: MockDelay,
    pub sink: RecordingSink,
}

/// Spawn a real actuation worker over mock hardware.
#[allow(dead_code)]
pub fn spawn_worker(pulse_ms: u32, timeout: Duration, delay: MockDelay) -> WorkerRig {
    let relay = MockRelay::default();
    let sink = RecordingSink::default();
    let controller = ActuationController::new(relay.clone(), delay.clone(), pulse_ms);
    let handle = actuation::spawn_worker(controller, sink.clone(), timeout).expect("spawn worker");
    WorkerRig {
        handle,
        relay,
        delay,
        sink,
    }
}
