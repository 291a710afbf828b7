use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::task::TaskTracker;
use tracing::{debug, error};

use crate::error::DispatchError;
use crate::protocol::Request;
use crate::state::WorkerState;

/// Reads request lines and fans each one out to its own task.
///
/// The read loop never waits on a spawned task, so a slow call cannot hold
/// up intake of the next line. Concurrency is unbounded by design: one
/// task per accepted line, with no pool or queue in front.
pub struct Dispatcher<R> {
    input: R,
    state: Arc<WorkerState>,
    units: TaskTracker,
}

impl<R: AsyncBufRead + Unpin> Dispatcher<R> {
    pub fn new(input: R, state: Arc<WorkerState>) -> Self {
        Self {
            input,
            state,
            units: TaskTracker::new(),
        }
    }

    /// Runs until end of input, then waits for the in-flight units so
    /// every accepted request has queued its result before the caller
    /// starts draining. Returns `Err` on a read or envelope decode
    /// failure; the caller is responsible for draining before exit, and
    /// units still in flight on that path keep running detached.
    pub async fn run(mut self) -> Result<(), DispatchError> {
        let mut line = String::new();

        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .await
                .map_err(DispatchError::Read)?;

            if read == 0 {
                debug!("end of input, waiting for in-flight requests");
                self.units.close();
                self.units.wait().await;
                return Ok(());
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: Request = serde_json::from_str(trimmed).map_err(|e| {
                error!("malformed request envelope: {}", e);
                DispatchError::Decode(e)
            })?;

            let state = Arc::clone(&self.state);
            self.units.spawn(async move {
                let response = state.registry.dispatch(request).await;
                match serde_json::to_string(&response) {
                    Ok(json) => state.push_result(json),
                    Err(e) => {
                        // Response envelopes are plain data; this only
                        // fires if a method returns an unrepresentable
                        // payload. The unit still produces its one line.
                        error!("failed to serialize response: {}", e);
                        state.push_result(
                            r#"{"id":null,"error":{"code":-32603,"message":"internal error"}}"#
                                .to_string(),
                        );
                    }
                }
            });
        }
    }
}
