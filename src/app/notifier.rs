//! Remote notifier: one outbound poll per main-loop iteration.
//!
//! A response status of exactly 200 triggers a pulse regardless of the
//! response body.  Anything else is counted and dropped.  There is no
//! retry or backoff; every iteration stands alone.

use log::{debug, info, warn};

use super::actuation::Actuator;
use super::commands::{ActuationRequest, GateAction};
use super::events::AppEvent;
use super::ports::{EventSink, HttpClientPort};
use crate::config::GateConfig;
use crate::error::{ActuationError, NetworkError};

/// Status code the remote endpoint uses to request a pulse.
pub const TRIGGER_STATUS: u16 = 200;

/// What one poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No endpoint configured; nothing was sent.
    Disabled,
    /// 200 received and the pulse completed.
    Triggered,
    /// 200 received but the actuator refused or failed.
    TriggerFailed(ActuationError),
    /// Any other status.
    Ignored(u16),
    /// No response at all.
    Failed(NetworkError),
}

/// Running totals since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifierStats {
    pub polls: u32,
    pub triggers: u32,
    pub ignored: u32,
    pub failures: u32,
}

pub struct RemoteNotifier {
    url: String,
    token: String,
    payload: String,
    stats: NotifierStats,
}

impl RemoteNotifier {
    pub fn new(url: impl Into<String>, token: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            payload: payload.into(),
            stats: NotifierStats::default(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            config.remote_url.as_str(),
            config.remote_token.as_str(),
            config.remote_payload.as_str(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn stats(&self) -> NotifierStats {
        self.stats
    }

    /// Send one poll and act on the answer.
    pub fn poll_once<C, A, E>(&mut self, client: &mut C, actuator: &A, sink: &mut E) -> PollOutcome
    where
        C: HttpClientPort,
        A: Actuator,
        E: EventSink,
    {
        if !self.is_enabled() {
            return PollOutcome::Disabled;
        }

        self.stats.polls = self.stats.polls.wrapping_add(1);
        match client.post_json(&self.url, &self.token, &self.payload) {
            Ok(TRIGGER_STATUS) => {
                self.stats.triggers = self.stats.triggers.wrapping_add(1);
                info!("Notifier: remote trigger received");
                sink.emit(&AppEvent::RemoteTrigger);
                match actuator.actuate(ActuationRequest::new(GateAction::RemoteTrigger)) {
                    Ok(()) => PollOutcome::Triggered,
                    Err(e) => {
                        warn!("Notifier: trigger not carried out ({})", e);
                        PollOutcome::TriggerFailed(e)
                    }
                }
            }
            Ok(status) => {
                self.stats.ignored = self.stats.ignored.wrapping_add(1);
                debug!("Notifier: status {} ignored", status);
                sink.emit(&AppEvent::RemoteIgnored { status });
                PollOutcome::Ignored(status)
            }
            Err(e) => {
                self.stats.failures = self.stats.failures.wrapping_add(1);
                warn!("Notifier: poll failed ({})", e);
                sink.emit(&AppEvent::RemotePollFailed(e));
                PollOutcome::Failed(e)
            }
        }
    }
}
