//! Configuration parsing
//!
//! Supports TOML (primary) and JSON formats.

use contracts::{ContractError, GeneratorConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" | "conf" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<GeneratorConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<GeneratorConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration content in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<GeneratorConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkKind, SocketProto};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
output = "syslog"
syslog_proto = "udp"
syslog_addr = "127.0.0.1:514"

[[data_files]]
path = "data/lines.toml"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.output, SinkKind::Syslog);
        assert_eq!(config.syslog_proto, Some(SocketProto::Udp));
        assert_eq!(config.data_files.len(), 1);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "output": "http",
            "http_loc": "https://collector.example.com/receive",
            "data_files": [{ "path": "data/lines.json" }],
            "replay_files": [{
                "path": "data/app.log",
                "timestamp_regex": "(?P<hour>\\d{2}):(?P<minute>\\d{2}):(?P<second>\\d{2})",
                "timestamp_format": "%H:%M:%S",
                "repeat_interval_secs": 60
            }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        assert_eq!(result.unwrap().replay_files.len(), 1);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = parse_toml("invalid toml [[[");
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ContractError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_extension("conf"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
