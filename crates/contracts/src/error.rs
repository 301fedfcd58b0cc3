//! Layered error definitions
//!
//! Categorized by source: config / schedule / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Schedule Errors =====
    /// Start time parse error
    #[error("invalid start time '{value}': {message}")]
    StartTime { value: String, message: String },

    // ===== Sink Errors =====
    /// Sink send error
    #[error("sink '{sink_name}' send error: {message}")]
    SinkSend { sink_name: String, message: String },

    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    /// Fatal sink error, the process cannot usefully continue
    #[error("sink '{sink_name}' fatal error: {message}")]
    SinkFatal { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create start time parse error
    pub fn start_time(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StartTime {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create sink send error
    pub fn sink_send(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkSend {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink connection error
    pub fn sink_connection(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkConnection {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create fatal sink error
    pub fn sink_fatal(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkFatal {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SinkFatal { .. })
    }
}
