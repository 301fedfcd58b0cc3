//! FileSink - appends resolved lines to the process-wide output file

use std::path::Path;

use bytes::Bytes;
use contracts::{ContractError, LineSpec, LogSink};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Sink that appends lines (plus a trailing newline) to one open file
///
/// The handle is created once at startup and shared by all workers. This
/// sink is load-bearing: a write failure is fatal for the whole process.
#[derive(Debug)]
pub struct FileSink {
    name: String,
    file: Mutex<File>,
}

impl FileSink {
    /// Create the output file and wrap it in a sink
    ///
    /// Truncates any existing file at `path`, matching a fresh generator run.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let file = File::create(path)
            .await
            .map_err(|e| ContractError::sink_fatal("file", format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "output file created");

        Ok(Self {
            name: "file".to_string(),
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "file_sink_send", skip(self, payload, _spec), fields(sink = %self.name))]
    async fn send(&self, payload: &Bytes, _spec: &LineSpec) -> Result<(), ContractError> {
        let mut file = self.file.lock().await;

        let write = async {
            file.write_all(payload).await?;
            file.write_all(b"\n").await?;
            file.flush().await
        };

        write
            .await
            .map_err(|e| ContractError::sink_fatal(&self.name, e.to_string()))
    }
}
