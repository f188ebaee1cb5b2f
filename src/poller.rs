//! Repeating status and log pollers.
//!
//! Each poller is one thread waiting on its control channel with the poll
//! interval as timeout: a timeout is a tick, a control message forces a poll
//! or rebinds the poller. Requests of one poller therefore never overlap.
//! Every poll carries a sequence number so the UI can drop stale results,
//! and a cancellation token that voids the result if the binding changed
//! while the request was in flight.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::api::Backend;
use crate::shutdown::ShutdownSignal;
use crate::tui::TuiMessage;

/// Default status poll interval.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Default log poll interval.
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(3);

/// Control messages accepted by a poller thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollControl {
    /// Poll immediately, then resume the regular interval.
    RefreshNow,
    /// Bind the poller to a project (log poller only). Polls immediately.
    Bind(Option<String>),
}

/// Cancellation token for one poll cycle.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a running poller.
pub struct PollerHandle {
    control: Sender<PollControl>,
    current: Arc<Mutex<CancelToken>>,
    join: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// A handle with no thread behind it. The receiver sees every control
    /// message sent through the handle.
    pub fn detached() -> (Self, Receiver<PollControl>) {
        let (control, rx) = mpsc::channel();
        let handle = Self {
            control,
            current: Arc::new(Mutex::new(CancelToken::new())),
            join: None,
        };
        (handle, rx)
    }

    /// Force an immediate poll. Returns false if the poller is gone.
    pub fn refresh_now(&self) -> bool {
        self.control.send(PollControl::RefreshNow).is_ok()
    }

    /// Rebind the poller, voiding any in-flight request of the old binding.
    pub fn bind(&self, project_id: Option<String>) -> bool {
        {
            let mut current = lock(&self.current);
            current.cancel();
            *current = CancelToken::new();
        }
        self.control.send(PollControl::Bind(project_id)).is_ok()
    }

    /// Cancel the in-flight cycle, close the control channel and wait for
    /// the thread to exit.
    pub fn stop(self) {
        lock(&self.current).cancel();
        let Self { control, join, .. } = self;
        drop(control);
        if let Some(join) = join {
            let _ = join.join();
        }
    }
}

fn lock(slot: &Mutex<CancelToken>) -> std::sync::MutexGuard<'_, CancelToken> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

enum Wake {
    Tick,
    Control(PollControl),
    Closed,
}

fn wait(rx: &Receiver<PollControl>, deadline: Instant) -> Wake {
    let timeout = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(timeout) {
        Ok(control) => Wake::Control(control),
        Err(RecvTimeoutError::Timeout) => Wake::Tick,
        Err(RecvTimeoutError::Disconnected) => Wake::Closed,
    }
}

/// Spawn the status poller. It polls once right away, then every `interval`.
pub fn spawn_status_poller(
    backend: Arc<dyn Backend>,
    interval: Duration,
    tx: Sender<TuiMessage>,
    shutdown: ShutdownSignal,
) -> io::Result<PollerHandle> {
    let (control, control_rx) = mpsc::channel();
    let current = Arc::new(Mutex::new(CancelToken::new()));
    let slot = Arc::clone(&current);

    let join = thread::Builder::new()
        .name("status-poller".to_string())
        .spawn(move || {
            let mut seq: u64 = 0;
            let mut deadline = Instant::now();
            loop {
                match wait(&control_rx, deadline) {
                    Wake::Closed => break,
                    Wake::Control(PollControl::Bind(_)) => continue,
                    Wake::Control(PollControl::RefreshNow) | Wake::Tick => {}
                }
                if shutdown.is_shutdown() {
                    break;
                }

                seq += 1;
                let token = lock(&slot).clone();
                let result = backend.list_projects();
                deadline = Instant::now() + interval;

                if token.is_cancelled() || shutdown.is_shutdown() {
                    break;
                }
                if tx.send(TuiMessage::Projects { seq, result }).is_err() {
                    break;
                }
            }
            tracing::debug!(event = "client.poller.status_stopped");
        })?;

    Ok(PollerHandle {
        control,
        current,
        join: Some(join),
    })
}

/// Spawn the log poller, optionally pre-bound to a project.
///
/// While unbound it stays idle. Binding polls immediately, then every
/// `interval`. Failed fetches are dropped.
pub fn spawn_log_poller(
    backend: Arc<dyn Backend>,
    interval: Duration,
    initial: Option<String>,
    tx: Sender<TuiMessage>,
    shutdown: ShutdownSignal,
) -> io::Result<PollerHandle> {
    let (control, control_rx) = mpsc::channel();
    let current = Arc::new(Mutex::new(CancelToken::new()));
    let slot = Arc::clone(&current);

    let join = thread::Builder::new()
        .name("log-poller".to_string())
        .spawn(move || {
            let mut bound = initial;
            let mut seq: u64 = 0;
            let mut deadline = Instant::now();
            loop {
                match wait(&control_rx, deadline) {
                    Wake::Closed => break,
                    Wake::Control(PollControl::Bind(project_id)) => {
                        tracing::debug!(
                            event = "client.poller.logs_bound",
                            project_id = ?project_id
                        );
                        bound = project_id;
                    }
                    Wake::Control(PollControl::RefreshNow) | Wake::Tick => {}
                }
                if shutdown.is_shutdown() {
                    break;
                }
                let Some(project_id) = bound.clone() else {
                    deadline = Instant::now() + interval;
                    continue;
                };

                seq += 1;
                let token = lock(&slot).clone();
                let result = backend.project_logs(&project_id);
                deadline = Instant::now() + interval;

                if shutdown.is_shutdown() {
                    break;
                }
                if token.is_cancelled() {
                    tracing::debug!(event = "client.logs.cancelled", project_id = %project_id, seq);
                    continue;
                }
                match result {
                    Ok(lines) => {
                        let message = TuiMessage::Logs {
                            seq,
                            project_id,
                            lines,
                        };
                        if tx.send(message).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(
                            event = "client.logs.fetch_failed",
                            project_id = %project_id,
                            error = %e
                        );
                    }
                }
            }
            tracing::debug!(event = "client.poller.logs_stopped");
        })?;

    Ok(PollerHandle {
        control,
        current,
        join: Some(join),
    })
}
