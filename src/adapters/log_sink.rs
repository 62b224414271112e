//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  One tagged line per event.
//! Keys only ever appear as their masked hint.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ModeSelected(mode) => {
                info!("MODE  | {:?}", mode);
            }
            AppEvent::JoinRetry { attempt } => {
                // Unbounded retries; keep the console readable.
                if *attempt <= 3 || attempt % 20 == 0 {
                    warn!("MODE  | join attempt {} failed, retrying", attempt);
                }
            }
            AppEvent::Joined { attempts } => {
                info!("MODE  | joined after {} attempt(s)", attempts);
            }
            AppEvent::Provisioned { ssid, key_hint } => {
                info!("MODE  | provisioned ssid='{}' key={}", ssid, key_hint);
            }
            AppEvent::ActuationStarted(action) => {
                info!("GATE  | {} pulse started", action);
            }
            AppEvent::ActuationCompleted(action) => {
                info!("GATE  | {} pulse done, lines released", action);
            }
            AppEvent::ActuationFailed { action, error } => {
                warn!("GATE  | {} pulse failed: {}", action, error);
            }
            AppEvent::RemoteTrigger => {
                info!("POLL  | 200, triggering");
            }
            AppEvent::RemoteIgnored { status } => {
                info!("POLL  | {} ignored", status);
            }
            AppEvent::RemotePollFailed(e) => {
                warn!("POLL  | failed: {}", e);
            }
        }
    }
}
