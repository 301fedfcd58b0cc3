//! LogSink trait - delivery worker output interface
//!
//! Defines the abstract interface for sink adapters.

use bytes::Bytes;

use crate::{ContractError, LineSpec};

/// Log delivery trait
///
/// All sink adapters must implement this trait. Adapters receive a fully
/// resolved payload and must not mutate the spec.
#[trait_variant::make(LogSink: Send)]
pub trait LocalLogSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one resolved log line
    ///
    /// # Errors
    /// Returns a send error (should include context); `SinkFatal` means the
    /// process cannot usefully continue.
    async fn send(&self, payload: &Bytes, spec: &LineSpec) -> Result<(), ContractError>;
}
