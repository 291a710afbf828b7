use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::error::Result;
use crate::state::DrainEntry;

/// The single consumer of the result channel.
///
/// Writes one terminated line per entry and flushes after every line, so
/// a downstream reader sees each result as soon as it exists and never
/// sees two results interleaved within one line.
pub struct Drain<W> {
    entries: UnboundedReceiver<DrainEntry>,
    output: W,
}

impl<W: AsyncWrite + Unpin> Drain<W> {
    pub fn new(entries: UnboundedReceiver<DrainEntry>, output: W) -> Self {
        Self { entries, output }
    }

    /// Runs until the shutdown sentinel is observed. Returns the number
    /// of result lines written.
    pub async fn run(mut self) -> Result<u64> {
        let mut written = 0u64;

        while let Some(entry) = self.entries.recv().await {
            match entry {
                DrainEntry::Line(line) => {
                    self.output.write_all(line.as_bytes()).await?;
                    self.output.write_all(b"\n").await?;
                    self.output.flush().await?;
                    written += 1;
                    debug!("response line {} flushed", written);
                }
                DrainEntry::Shutdown => {
                    info!("output drain stopping after {} lines", written);
                    break;
                }
            }
        }

        Ok(written)
    }
}
