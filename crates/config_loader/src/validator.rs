//! Configuration validation
//!
//! Rules:
//! - at least one data or replay file
//! - http output needs an `http(s)://` default location
//! - syslog output needs a protocol and a `host:port` address
//! - file output needs a non-empty output path
//! - data file paths non-empty
//! - replay files need a compiling regex, a timestamp format, a non-zero
//!   repeat interval, and complete header pairs

use std::sync::LazyLock;

use contracts::{ContractError, GeneratorConfig, SinkKind};
use regex::Regex;

static HTTP_LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.*").expect("http location regex is valid"));

static SOCKET_ADDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?:\d+$").expect("socket address regex is valid"));

/// Validate a GeneratorConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &GeneratorConfig) -> Result<(), ContractError> {
    validate_inputs_present(config)?;
    validate_output_defaults(config)?;
    validate_data_files(config)?;
    validate_replay_files(config)?;
    Ok(())
}

fn validate_inputs_present(config: &GeneratorConfig) -> Result<(), ContractError> {
    if config.data_files.is_empty() && config.replay_files.is_empty() {
        return Err(ContractError::config_validation(
            "data_files / replay_files",
            "configuration has no input files",
        ));
    }
    Ok(())
}

fn validate_output_defaults(config: &GeneratorConfig) -> Result<(), ContractError> {
    match config.output {
        SinkKind::Http => {
            let loc = config.http_loc.as_deref().unwrap_or_default();
            if !HTTP_LOC_RE.is_match(loc) {
                return Err(ContractError::config_validation(
                    "http_loc",
                    format!("'{loc}' does not start with http:// or https://"),
                ));
            }
        }
        SinkKind::Syslog => {
            if config.syslog_proto.is_none() {
                return Err(ContractError::config_validation(
                    "syslog_proto",
                    "syslog output requires a protocol (tcp or udp)",
                ));
            }
            let addr = config.syslog_addr.as_deref().unwrap_or_default();
            if !SOCKET_ADDR_RE.is_match(addr) {
                return Err(ContractError::config_validation(
                    "syslog_addr",
                    format!("'{addr}' is not of the form host:port"),
                ));
            }
        }
        SinkKind::File => {
            let missing = config
                .file_output_path
                .as_ref()
                .is_none_or(|p| p.as_os_str().is_empty());
            if missing {
                return Err(ContractError::config_validation(
                    "file_output_path",
                    "file output requires a non-empty output path",
                ));
            }
        }
    }
    Ok(())
}

fn validate_data_files(config: &GeneratorConfig) -> Result<(), ContractError> {
    for (idx, data_file) in config.data_files.iter().enumerate() {
        if data_file.path.as_os_str().is_empty() {
            return Err(ContractError::config_validation(
                format!("data_files[{idx}].path"),
                "path cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_replay_files(config: &GeneratorConfig) -> Result<(), ContractError> {
    for (idx, replay) in config.replay_files.iter().enumerate() {
        if replay.path.as_os_str().is_empty() {
            return Err(ContractError::config_validation(
                format!("replay_files[{idx}].path"),
                "path cannot be empty",
            ));
        }

        if let Err(e) = Regex::new(&replay.timestamp_regex) {
            return Err(ContractError::config_validation(
                format!("replay_files[{idx}].timestamp_regex"),
                format!("invalid regex: {e}"),
            ));
        }

        if replay.timestamp_format.is_empty() {
            return Err(ContractError::config_validation(
                format!("replay_files[{idx}].timestamp_format"),
                "timestamp format cannot be empty",
            ));
        }

        if replay.repeat_interval_secs == 0 {
            return Err(ContractError::config_validation(
                format!("replay_files[{idx}].repeat_interval_secs"),
                "repeat interval must be non-zero",
            ));
        }

        for header in &replay.headers {
            if header.header.is_empty() || header.value.is_empty() {
                return Err(ContractError::config_validation(
                    format!("replay_files[{idx}].headers"),
                    "both header and value must be non-empty",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DataFileRef, HttpHeader, ReplayFileConfig, SocketProto};
    use std::path::PathBuf;

    fn minimal_config() -> GeneratorConfig {
        GeneratorConfig {
            output: SinkKind::Http,
            http_loc: Some("https://collector.example.com/receive".into()),
            syslog_proto: None,
            syslog_addr: None,
            file_output_path: None,
            data_files: vec![DataFileRef {
                path: PathBuf::from("data/lines.json"),
            }],
            replay_files: vec![],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_no_input_files() {
        let mut config = minimal_config();
        config.data_files.clear();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("no input files"), "got: {err}");
    }

    #[test]
    fn test_http_location_requires_scheme() {
        let mut config = minimal_config();
        config.http_loc = Some("collector.example.com".into());
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("http://"), "got: {err}");
    }

    #[test]
    fn test_syslog_requires_proto_and_addr() {
        let mut config = minimal_config();
        config.output = SinkKind::Syslog;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("protocol"), "got: {err}");

        config.syslog_proto = Some(SocketProto::Tcp);
        config.syslog_addr = Some("no-port".into());
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("host:port"), "got: {err}");

        config.syslog_addr = Some("127.0.0.1:514".into());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = minimal_config();
        config.output = SinkKind::File;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("output path"), "got: {err}");
    }

    #[test]
    fn test_replay_file_rules() {
        let mut config = minimal_config();
        config.replay_files.push(ReplayFileConfig {
            path: PathBuf::from("data/app.log"),
            timestamp_regex: "(unbalanced".into(),
            timestamp_format: "%H:%M:%S".into(),
            repeat_interval_secs: 60,
            headers: vec![],
        });
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("invalid regex"), "got: {err}");

        config.replay_files[0].timestamp_regex = r"(?P<hour>\d+)".into();
        config.replay_files[0].repeat_interval_secs = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("non-zero"), "got: {err}");

        config.replay_files[0].repeat_interval_secs = 60;
        config.replay_files[0].headers.push(HttpHeader {
            header: "X-Name".into(),
            value: String::new(),
        });
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("non-empty"), "got: {err}");
    }
}
