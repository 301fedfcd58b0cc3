//! LineSpec - the normalized configuration for one recurring log line
//!
//! Produced once by the config loader; the scheduler never mutates it, only
//! its bucket placement changes between ticks.

use serde::{Deserialize, Serialize};

/// Output kind for a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Http,
    Syslog,
    File,
}

impl SinkKind {
    /// Stable name for logging/metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Syslog => "syslog",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport protocol for the syslog-style socket sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketProto {
    Tcp,
    Udp,
}

/// One HTTP header attached to posted lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub header: String,
    pub value: String,
}

/// Sink-specific destination fields of a line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkRoute {
    /// POST to an HTTP endpoint with the configured header list
    Http {
        url: String,
        #[serde(default)]
        headers: Vec<HttpHeader>,
    },
    /// Write to a tcp/udp socket, fire-and-forget
    Syslog { proto: SocketProto, addr: String },
    /// Append to the single process-wide output file
    File,
}

impl SinkRoute {
    /// Which sink adapter serves this route
    pub fn kind(&self) -> SinkKind {
        match self {
            Self::Http { .. } => SinkKind::Http,
            Self::Syslog { .. } => SinkKind::Syslog,
            Self::File => SinkKind::File,
        }
    }
}

/// One simulated log line's full configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSpec {
    /// Template text, may contain `$[...]` tokens
    pub text: String,

    /// Delivery destination
    pub route: SinkRoute,

    /// Mean firing interval in seconds, always > 0 after validation
    pub interval_secs: u64,

    /// Interval standard deviation in seconds (may be zero)
    #[serde(default)]
    pub interval_std_dev: f64,

    /// Timestamp rendering format: `epoch`, `epochmilli`, `epochnano`,
    /// or a strftime pattern
    pub timestamp_format: String,

    /// Optional wall-clock start time, `HH:MM:SS`
    #[serde(default)]
    pub start_time: Option<String>,
}

impl LineSpec {
    /// Mean interval in milliseconds
    pub fn interval_millis(&self) -> u64 {
        self.interval_secs * 1000
    }

    /// Interval standard deviation in milliseconds
    pub fn std_dev_millis(&self) -> f64 {
        self.interval_std_dev * 1000.0
    }
}
