//! Actuation controller and its worker thread.
//!
//! [`ActuationController::pulse`] is the only code that moves the relay:
//! drive both lines, hold for the pulse duration, release both lines to
//! high impedance.  The release step always runs, even after a drive
//! fault, so the coil never stays energised.
//!
//! The controller is owned by a dedicated worker thread.  Requesters hold
//! an [`ActuationHandle`] and submit through a bounded queue, then wait for
//! completion under an explicit timeout:
//!
//! ```text
//!  HTTP handler ─┐                      ┌──────────────────────────┐
//!                ├─▶ JobQueue (depth 1) ─▶│ worker: pulse() ─▶ Signal │─▶ requester
//!  Notifier ─────┘                      └──────────────────────────┘
//! ```
//!
//! Only one request is accepted at a time; a second requester gets
//! [`ActuationError::Busy`] instead of queueing a pulse it may never see.

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embedded_hal::delay::DelayNs;
use futures_lite::future;
use log::{error, info, warn};

use super::commands::{ActuationRequest, GateAction};
use super::events::AppEvent;
use super::ports::{EventSink, LineError, RelayLine, RelayPort};
use crate::drivers::task_pin::{self, Core};
use crate::error::ActuationError;

/// Pending jobs behind the one in flight.
const QUEUE_DEPTH: usize = 1;

const WORKER_PRIORITY: u8 = 10;
const WORKER_STACK_KB: usize = 4;

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct ActuationController<R: RelayPort, D: DelayNs> {
    relay: R,
    delay: D,
    pulse_ms: u32,
}

impl<R: RelayPort, D: DelayNs> ActuationController<R, D> {
    pub fn new(relay: R, delay: D, pulse_ms: u32) -> Self {
        Self { relay, delay, pulse_ms }
    }

    /// Run one full pulse.  Blocks for the pulse duration; not cancellable.
    pub fn pulse(&mut self, request: ActuationRequest) -> Result<(), ActuationError> {
        info!("Actuator: {} pulse ({} ms)", request.action, self.pulse_ms);

        let mut fault: Option<LineError> = None;
        for line in RelayLine::BOTH {
            if let Err(e) = self.relay.drive(line) {
                fault = Some(e);
                break;
            }
        }

        if fault.is_none() {
            self.delay.delay_ms(self.pulse_ms);
        }

        if let Err(e) = self.release_lines() {
            fault.get_or_insert(e);
        }

        match fault {
            Some(e) => {
                error!("Actuator: {} pulse aborted: {}", request.action, e);
                Err(ActuationError::LineFault)
            }
            None => Ok(()),
        }
    }

    /// Release every line, reporting the first failure.
    fn release_lines(&mut self) -> Result<(), LineError> {
        let mut first = Ok(());
        for line in RelayLine::BOTH {
            if let Err(e) = self.relay.release(line) {
                if first.is_ok() {
                    first = Err(e);
                }
            }
        }
        first
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }
}

// ───────────────────────────────────────────────────────────────
// Worker + handle
// ───────────────────────────────────────────────────────────────

type Completion = Signal<CriticalSectionRawMutex, Result<(), ActuationError>>;

struct ActuationJob {
    request: ActuationRequest,
    done: Arc<Completion>,
}

type JobQueue = Channel<CriticalSectionRawMutex, ActuationJob, QUEUE_DEPTH>;

/// Anything that can carry out one actuation request to completion.
///
/// Implemented by [`ActuationHandle`]; the HTTP surface and the notifier
/// are generic over it so they can be exercised without a worker thread.
pub trait Actuator {
    fn actuate(&self, request: ActuationRequest) -> Result<(), ActuationError>;
}

/// Cloneable submitter for the actuation worker.
#[derive(Clone)]
pub struct ActuationHandle {
    queue: Arc<JobQueue>,
    busy: Arc<AtomicBool>,
    alive: Arc<AtomicBool>,
    timeout: Duration,
}

impl ActuationHandle {
    /// Whether a pulse is currently accepted or running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Actuator for ActuationHandle {
    /// Submit `request` and wait for the pulse to finish.
    fn actuate(&self, request: ActuationRequest) -> Result<(), ActuationError> {
        if !self.alive.load(Ordering::Acquire) {
            return Err(ActuationError::WorkerGone);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Actuator: {} rejected, pulse in progress", request.action);
            return Err(ActuationError::Busy);
        }

        let done = Arc::new(Completion::new());
        let job = ActuationJob {
            request,
            done: done.clone(),
        };
        if self.queue.try_send(job).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(ActuationError::Busy);
        }

        let timeout = self.timeout;
        let outcome = future::block_on(future::or(
            async { Some(done.wait().await) },
            async {
                async_io_mini::Timer::after(timeout).await;
                None
            },
        ));

        outcome.unwrap_or_else(|| {
            warn!("Actuator: {} completion not seen within {:?}", request.action, timeout);
            Err(ActuationError::Timeout)
        })
    }
}

/// Clears `alive` if the worker thread unwinds.
struct AliveGuard(Arc<AtomicBool>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Move `controller` onto its own thread and return the submit handle.
///
/// Fails only if the thread cannot be created.
pub fn spawn_worker<R, D, E>(
    controller: ActuationController<R, D>,
    sink: E,
    timeout: Duration,
) -> std::io::Result<ActuationHandle>
where
    R: RelayPort + Send + 'static,
    D: DelayNs + Send + 'static,
    E: EventSink + Send + 'static,
{
    let handle = ActuationHandle {
        queue: Arc::new(JobQueue::new()),
        busy: Arc::new(AtomicBool::new(false)),
        alive: Arc::new(AtomicBool::new(true)),
        timeout,
    };

    let queue = handle.queue.clone();
    let busy = handle.busy.clone();
    let guard = AliveGuard(handle.alive.clone());
    task_pin::spawn_on_core(
        Core::App,
        WORKER_PRIORITY,
        WORKER_STACK_KB,
        "actuator\0",
        move || {
            let _guard = guard;
            run_worker(controller, sink, &queue, &busy);
        },
    )?;

    Ok(handle)
}

fn run_worker<R: RelayPort, D: DelayNs, E: EventSink>(
    mut controller: ActuationController<R, D>,
    mut sink: E,
    queue: &JobQueue,
    busy: &AtomicBool,
) {
    info!("Actuator: worker running");
    future::block_on(async {
        loop {
            let job = queue.receive().await;
            let action: GateAction = job.request.action;

            sink.emit(&AppEvent::ActuationStarted(action));
            let result = controller.pulse(job.request);
            match result {
                Ok(()) => sink.emit(&AppEvent::ActuationCompleted(action)),
                Err(error) => sink.emit(&AppEvent::ActuationFailed { action, error }),
            }

            busy.store(false, Ordering::Release);
            job.done.signal(result);
        }
    });
}
