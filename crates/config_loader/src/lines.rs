//! Data file and replay file ingestion
//!
//! Turns raw [`LineEntry`] records and replay log files into normalized
//! [`LineSpec`]s. Invalid entries are skipped with a warning instead of
//! failing the whole load.

use std::path::Path;

use contracts::{
    ContractError, DataFile, GeneratorConfig, LineEntry, LineSpec, ReplayFileConfig, SinkKind,
    SinkRoute,
};
use regex::{NoExpand, Regex};
use tracing::warn;

use crate::parser::ConfigFormat;

/// Token a matched replay timestamp is rewritten to
const STAMP_TOKEN: &str = "$[time||stamp]";

/// Load every configured data and replay file into a flat spec list
pub fn load_lines(config: &GeneratorConfig) -> Result<Vec<LineSpec>, ContractError> {
    let mut specs = Vec::new();

    for data_file in &config.data_files {
        let parsed = load_data_file(&data_file.path)?;
        for (idx, entry) in parsed.lines.iter().enumerate() {
            match normalize_entry(entry, config) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    warn!(
                        file = %data_file.path.display(),
                        line = idx,
                        error = %e,
                        "Skipping invalid line entry"
                    );
                }
            }
        }
    }

    for replay in &config.replay_files {
        specs.extend(load_replay_file(replay, config)?);
    }

    Ok(specs)
}

/// Parse one data file, choosing the format by extension
fn load_data_file(path: &Path) -> Result<DataFile, ContractError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = ConfigFormat::from_extension(ext).ok_or_else(|| {
        ContractError::config_parse(format!(
            "unsupported data file extension '{ext}' for {}",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path)?;
    match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| ContractError::ConfigParse {
            message: format!("TOML parse error in {}: {e}", path.display()),
            source: Some(Box::new(e)),
        }),
        ConfigFormat::Json => {
            serde_json::from_str(&content).map_err(|e| ContractError::ConfigParse {
                message: format!("JSON parse error in {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })
        }
    }
}

/// Normalize one raw entry against the global defaults
fn normalize_entry(entry: &LineEntry, config: &GeneratorConfig) -> Result<LineSpec, ContractError> {
    if entry.text.is_empty() {
        return Err(ContractError::config_validation("text", "text is empty"));
    }
    if entry.interval_secs == 0 {
        return Err(ContractError::config_validation(
            "interval_secs",
            "interval must be non-zero",
        ));
    }
    if entry
        .headers
        .iter()
        .any(|h| h.header.is_empty() || h.value.is_empty())
    {
        return Err(ContractError::config_validation(
            "headers",
            "both header and value must be non-empty",
        ));
    }

    let output = entry.output.unwrap_or(config.output);
    let route = build_route(
        output,
        entry.http_loc.as_deref().or(config.http_loc.as_deref()),
        entry.headers.clone(),
        entry.syslog_proto.or(config.syslog_proto),
        entry.syslog_addr.as_deref().or(config.syslog_addr.as_deref()),
    )?;

    let timestamp_format = entry
        .timestamp_format
        .clone()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ContractError::config_validation("timestamp_format", "format is missing"))?;

    Ok(LineSpec {
        text: entry.text.clone(),
        route,
        interval_secs: entry.interval_secs,
        interval_std_dev: entry.interval_std_dev,
        timestamp_format,
        start_time: entry.start_time.clone(),
    })
}

fn build_route(
    output: SinkKind,
    http_loc: Option<&str>,
    headers: Vec<contracts::HttpHeader>,
    syslog_proto: Option<contracts::SocketProto>,
    syslog_addr: Option<&str>,
) -> Result<SinkRoute, ContractError> {
    match output {
        SinkKind::Http => {
            let url = http_loc.filter(|u| !u.is_empty()).ok_or_else(|| {
                ContractError::config_validation("http_loc", "no HTTP endpoint for http output")
            })?;
            Ok(SinkRoute::Http {
                url: url.to_string(),
                headers,
            })
        }
        SinkKind::Syslog => {
            let proto = syslog_proto.ok_or_else(|| {
                ContractError::config_validation("syslog_proto", "no protocol for syslog output")
            })?;
            let addr = syslog_addr.filter(|a| !a.is_empty()).ok_or_else(|| {
                ContractError::config_validation("syslog_addr", "no address for syslog output")
            })?;
            Ok(SinkRoute::Syslog {
                proto,
                addr: addr.to_string(),
            })
        }
        SinkKind::File => Ok(SinkRoute::File),
    }
}

/// Turn a replay log file into recurring line specs
///
/// Each line matching the timestamp regex is rewritten so the matched
/// timestamp becomes the `$[time||stamp]` token, and the captured
/// `hour`/`minute`/`second` groups fix its daily start time. Non-matching
/// lines are skipped.
fn load_replay_file(
    replay: &ReplayFileConfig,
    config: &GeneratorConfig,
) -> Result<Vec<LineSpec>, ContractError> {
    let re = Regex::new(&replay.timestamp_regex).map_err(|e| {
        ContractError::config_validation(
            "timestamp_regex",
            format!("invalid regex for {}: {e}", replay.path.display()),
        )
    })?;

    let content = std::fs::read_to_string(&replay.path)?;
    let route = build_route(
        config.output,
        config.http_loc.as_deref(),
        replay.headers.clone(),
        config.syslog_proto,
        config.syslog_addr.as_deref(),
    )?;

    let mut specs = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        let Some(start_time) = capture_start_time(&re, line) else {
            warn!(
                file = %replay.path.display(),
                line = idx,
                "Replay line does not match the timestamp regex, skipping"
            );
            continue;
        };

        let text = re.replace_all(line, NoExpand(STAMP_TOKEN)).into_owned();
        specs.push(LineSpec {
            text,
            route: route.clone(),
            interval_secs: replay.repeat_interval_secs,
            interval_std_dev: 0.0,
            timestamp_format: replay.timestamp_format.clone(),
            start_time: Some(start_time),
        });
    }

    Ok(specs)
}

/// Extract `HH:MM:SS` from the named capture groups, if all three match
fn capture_start_time(re: &Regex, line: &str) -> Option<String> {
    let caps = re.captures(line)?;
    let hour = caps.name("hour")?.as_str();
    let minute = caps.name("minute")?.as_str();
    let second = caps.name("second")?.as_str();
    Some(format!("{hour}:{minute}:{second}"))
}
