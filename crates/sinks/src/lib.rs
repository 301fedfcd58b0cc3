//! # Sinks
//!
//! Sink adapter implementations.
//!
//! Contains HttpSink, SocketSink, and FileSink, plus the [`SinkSet`] router
//! that delivery workers hand resolved payloads to.

mod file;
mod http;
mod socket;

pub use self::file::FileSink;
pub use self::http::HttpSink;
pub use self::socket::SocketSink;

use bytes::Bytes;
use contracts::{ContractError, GeneratorConfig, LineSpec, LogSink, SinkKind};

/// All sink adapters for one generator process
///
/// Built once at startup; shared read-only by the delivery workers. The
/// file sink only exists when the configuration names an output path.
pub struct SinkSet {
    http: HttpSink,
    socket: SocketSink,
    file: Option<FileSink>,
}

impl SinkSet {
    /// Build the sink set from the global configuration
    pub async fn from_config(config: &GeneratorConfig) -> Result<Self, ContractError> {
        let file = match &config.file_output_path {
            Some(path) => Some(FileSink::create(path).await?),
            None => None,
        };

        Ok(Self {
            http: HttpSink::new(),
            socket: SocketSink::new(),
            file,
        })
    }

    /// Route one resolved payload to the adapter matching the spec
    pub async fn deliver(&self, payload: &Bytes, spec: &LineSpec) -> Result<(), ContractError> {
        match spec.route.kind() {
            SinkKind::Http => self.http.send(payload, spec).await,
            SinkKind::Syslog => self.socket.send(payload, spec).await,
            SinkKind::File => match &self.file {
                Some(file) => file.send(payload, spec).await,
                None => Err(ContractError::sink_fatal(
                    "file",
                    "file route configured but no output path was set",
                )),
            },
        }
    }
}
