use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::Config;
use crate::rpc::MethodRegistry;

/// Lifecycle phases of a worker run, published over a watch channel so
/// supervisors and tests can observe transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Draining,
    Terminated,
}

/// One entry on the result channel.
#[derive(Debug, PartialEq, Eq)]
pub enum DrainEntry {
    /// A fully serialized response line, ready to write.
    Line(String),
    /// Sentinel telling the drain to stop. Entries enqueued behind the
    /// sentinel are never drained.
    Shutdown,
}

/// Shared context for one worker run: the producer side of the result
/// channel, the method registry, the shutdown flag, and the phase
/// publisher. Execution units hold an `Arc` of this; there is no
/// process-global state.
pub struct WorkerState {
    pub config: Config,
    pub registry: Arc<MethodRegistry>,
    results: mpsc::UnboundedSender<DrainEntry>,
    shutdown_sent: AtomicBool,
    phase: watch::Sender<Phase>,
}

impl WorkerState {
    pub fn new(
        config: Config,
        registry: Arc<MethodRegistry>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<DrainEntry>) {
        let (results, results_rx) = mpsc::unbounded_channel();
        let (phase, _) = watch::channel(Phase::Uninitialized);

        let state = Arc::new(Self {
            config,
            registry,
            results,
            shutdown_sent: AtomicBool::new(false),
            phase,
        });

        (state, results_rx)
    }

    /// Queues one serialized response line for the drain. A failed send
    /// means the drain has already stopped; the result is dropped, which
    /// only happens to units racing past shutdown.
    pub fn push_result(&self, line: String) {
        if self.results.send(DrainEntry::Line(line)).is_err() {
            debug!("result dropped, drain already stopped");
        }
    }

    /// Queues the shutdown sentinel. Idempotent: only the first call
    /// enqueues it; a repeated signal or a signal that lands during the
    /// drain is a no-op. Returns whether this call enqueued the sentinel.
    pub fn request_shutdown(&self) -> bool {
        if self.shutdown_sent.swap(true, Ordering::SeqCst) {
            debug!("shutdown already requested");
            return false;
        }

        let _ = self.results.send(DrainEntry::Shutdown);
        true
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_sent.load(Ordering::SeqCst)
    }

    pub fn set_phase(&self, phase: Phase) {
        self.phase.send_replace(phase);
    }

    /// Subscribes to phase transitions.
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }
}
