//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{GeneratorConfig, LineSpec, SinkRoute};

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    output: OutputInfo,
    data_files: Vec<String>,
    replay_files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    lines: Vec<LineInfo>,
}

#[derive(Serialize)]
struct OutputInfo {
    default_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_loc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_output_path: Option<String>,
}

#[derive(Serialize)]
struct LineInfo {
    text: String,
    sink: String,
    interval_secs: u64,
    interval_std_dev: f64,
    timestamp_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let specs = if args.lines {
        config_loader::load_lines(&config).context("Failed to load line definitions")?
    } else {
        Vec::new()
    };

    if args.json {
        let info = build_config_info(&config, &specs);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config, &specs, args);
    }

    Ok(())
}

fn build_config_info(config: &GeneratorConfig, specs: &[LineSpec]) -> ConfigInfo {
    let lines = specs
        .iter()
        .map(|s| LineInfo {
            text: s.text.clone(),
            sink: s.route.kind().to_string(),
            interval_secs: s.interval_secs,
            interval_std_dev: s.interval_std_dev,
            timestamp_format: s.timestamp_format.clone(),
            start_time: s.start_time.clone(),
        })
        .collect();

    ConfigInfo {
        output: OutputInfo {
            default_kind: config.output.to_string(),
            http_loc: config.http_loc.clone(),
            syslog_addr: config.syslog_addr.clone(),
            file_output_path: config
                .file_output_path
                .as_ref()
                .map(|p| p.display().to_string()),
        },
        data_files: config
            .data_files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect(),
        replay_files: config
            .replay_files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect(),
        lines,
    }
}

fn print_config_info(config: &GeneratorConfig, specs: &[LineSpec], args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  loggen Configuration                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📤 Output");
    println!("   ├─ Default: {}", config.output);
    match &config.http_loc {
        Some(loc) => println!("   ├─ HTTP endpoint: {}", loc),
        None => println!("   ├─ HTTP endpoint: (unset)"),
    }
    match (&config.syslog_proto, &config.syslog_addr) {
        (Some(proto), Some(addr)) => println!("   ├─ Syslog: {:?} {}", proto, addr),
        _ => println!("   ├─ Syslog: (unset)"),
    }
    match &config.file_output_path {
        Some(path) => println!("   └─ Output file: {}", path.display()),
        None => println!("   └─ Output file: (unset)"),
    }

    println!("\n📄 Data files ({})", config.data_files.len());
    for (i, data_file) in config.data_files.iter().enumerate() {
        let prefix = if i == config.data_files.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!("   {} {}", prefix, data_file.path.display());
    }

    if !config.replay_files.is_empty() {
        println!("\n🔁 Replay files ({})", config.replay_files.len());
        for (i, replay) in config.replay_files.iter().enumerate() {
            let prefix = if i == config.replay_files.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!(
                "   {} {} (every {}s, format '{}')",
                prefix,
                replay.path.display(),
                replay.repeat_interval_secs,
                replay.timestamp_format
            );
        }
    }

    if args.lines && !specs.is_empty() {
        println!("\n📝 Lines ({})", specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let prefix = if i == specs.len() - 1 { "└─" } else { "├─" };
            let destination = match &spec.route {
                SinkRoute::Http { url, .. } => format!("http {}", url),
                SinkRoute::Syslog { proto, addr } => format!("{:?} {}", proto, addr),
                SinkRoute::File => "file".to_string(),
            };
            println!(
                "   {} every {}s (±{}s) -> {}: {}",
                prefix, spec.interval_secs, spec.interval_std_dev, destination, spec.text
            );
        }
    }

    println!();
}
