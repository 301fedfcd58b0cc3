//! GeneratorConfig - Config Loader input
//!
//! Describes the complete generator setup: global output defaults, data
//! files with templated line entries, and replay files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{HttpHeader, SinkKind, SocketProto};

/// Complete global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Default output kind for lines that do not set one
    pub output: SinkKind,

    /// Default HTTP endpoint
    #[serde(default)]
    pub http_loc: Option<String>,

    /// Default syslog transport protocol
    #[serde(default)]
    pub syslog_proto: Option<SocketProto>,

    /// Default syslog address, `host:port`
    #[serde(default)]
    pub syslog_addr: Option<String>,

    /// Output file path, required when the file sink is in play
    #[serde(default)]
    pub file_output_path: Option<PathBuf>,

    /// Data files with templated line entries
    #[serde(default)]
    pub data_files: Vec<DataFileRef>,

    /// Replay files turned into recurring lines
    #[serde(default)]
    pub replay_files: Vec<ReplayFileConfig>,
}

/// Reference to a data file on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFileRef {
    pub path: PathBuf,
}

/// Replay file configuration
///
/// Every line of the file matching `timestamp_regex` becomes a recurring
/// line whose matched timestamp is replaced by the `$[time||stamp]` token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFileConfig {
    pub path: PathBuf,

    /// Regex with named groups `hour`, `minute`, `second`
    pub timestamp_regex: String,

    /// Timestamp rendering format for the replayed lines
    pub timestamp_format: String,

    /// Repeat interval in seconds, must be non-zero
    pub repeat_interval_secs: u64,

    /// Headers attached when replayed lines go out over HTTP
    #[serde(default)]
    pub headers: Vec<HttpHeader>,
}

/// A parsed data file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub lines: Vec<LineEntry>,
}

/// One raw, not-yet-normalized line entry from a data file
///
/// Optional fields fall back to the global defaults during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineEntry {
    /// Template text, may contain `$[...]` tokens
    #[serde(default)]
    pub text: String,

    /// Per-line output kind override
    #[serde(default)]
    pub output: Option<SinkKind>,

    /// Per-line HTTP endpoint override
    #[serde(default)]
    pub http_loc: Option<String>,

    /// Per-line syslog protocol override
    #[serde(default)]
    pub syslog_proto: Option<SocketProto>,

    /// Per-line syslog address override
    #[serde(default)]
    pub syslog_addr: Option<String>,

    /// Mean firing interval in seconds
    #[serde(default)]
    pub interval_secs: u64,

    /// Interval standard deviation in seconds
    #[serde(default)]
    pub interval_std_dev: f64,

    /// Timestamp rendering format
    #[serde(default)]
    pub timestamp_format: Option<String>,

    /// HTTP headers for this line
    #[serde(default)]
    pub headers: Vec<HttpHeader>,

    /// Optional wall-clock start time, `HH:MM:SS`
    #[serde(default)]
    pub start_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_minimal_json() {
        let json = r#"{
            "output": "http",
            "http_loc": "https://collector.example.com/v1/receive",
            "data_files": [{ "path": "data/lines.json" }]
        }"#;

        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output, SinkKind::Http);
        assert_eq!(config.data_files.len(), 1);
        assert!(config.replay_files.is_empty());
    }

    #[test]
    fn test_line_entry_defaults() {
        let entry: LineEntry = serde_json::from_str(r#"{ "text": "hello" }"#).unwrap();
        assert_eq!(entry.interval_secs, 0);
        assert!(entry.timestamp_format.is_none());
        assert!(entry.headers.is_empty());
    }
}
