use std::future::Future;
use std::sync::Arc;

use tokio::io::{stdin, stdout, AsyncBufRead, AsyncWrite, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::rpc::MethodRegistry;
use crate::state::{DrainEntry, Phase, WorkerState};

mod dispatcher;
mod drain;

pub use dispatcher::Dispatcher;
pub use drain::Drain;

/// Supervises one worker run.
///
/// Starts the output drain before intake begins, races the dispatcher
/// against a shutdown future, then enqueues the shutdown sentinel exactly
/// once and waits for the drain to finish. See [`Phase`] for the
/// lifecycle this walks through.
pub struct Worker {
    state: Arc<WorkerState>,
    results_rx: mpsc::UnboundedReceiver<DrainEntry>,
}

impl Worker {
    pub fn new(config: Config, registry: Arc<MethodRegistry>) -> Self {
        let (state, results_rx) = WorkerState::new(config, registry);
        Self { state, results_rx }
    }

    /// Shared context handle, mainly useful for observing phases.
    pub fn state(&self) -> Arc<WorkerState> {
        Arc::clone(&self.state)
    }

    /// Runs the worker over stdin/stdout until end of input or a
    /// termination signal.
    pub async fn serve(self) -> Result<()> {
        self.run(BufReader::new(stdin()), stdout(), shutdown_signal())
            .await
    }

    /// Runs the worker over arbitrary streams. The shutdown future can be
    /// anything, which keeps integration tests in control of signal
    /// delivery.
    pub async fn run<R, W, S>(self, input: R, output: W, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let Self { state, results_rx } = self;

        // The drain must be consuming before the first line is accepted.
        let drain_handle = tokio::spawn(Drain::new(results_rx, output).run());
        state.set_phase(Phase::Running);
        info!("worker {} running", state.config.plugin.name);

        let dispatcher = Dispatcher::new(input, Arc::clone(&state));

        let outcome = tokio::select! {
            result = dispatcher.run() => {
                match &result {
                    Ok(()) => info!("input closed, shutting down"),
                    Err(e) => error!("dispatch failed: {}", e),
                }
                result.map_err(WorkerError::from)
            }
            () = shutdown => {
                info!("termination signal received, shutting down");
                Ok(())
            }
        };

        state.set_phase(Phase::Draining);
        state.request_shutdown();

        match drain_handle.await {
            Ok(Ok(written)) => info!("drain finished, {} lines written", written),
            Ok(Err(e)) => error!("drain failed: {}", e),
            Err(e) => error!("drain task panicked: {}", e),
        }

        state.set_phase(Phase::Terminated);

        outcome
    }
}

/// Resolves when the process receives SIGINT or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C signal");
        },
        _ = terminate => {
            info!("received terminate signal");
        },
    }
}
