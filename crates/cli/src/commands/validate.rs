//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::GeneratorConfig;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    output: String,
    data_file_count: usize,
    replay_file_count: usize,
    line_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    let config = match config_loader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            };
        }
    };

    // Referenced files may not exist yet where the config is authored;
    // report them as warnings rather than failing validation.
    let mut warnings = collect_missing_files(&config);

    let line_count = if warnings.is_empty() {
        match config_loader::load_lines(&config) {
            Ok(specs) => specs.len(),
            Err(e) => {
                return ValidationResult {
                    valid: false,
                    config_path,
                    error: Some(e.to_string()),
                    warnings: None,
                    summary: None,
                };
            }
        }
    } else {
        0
    };

    if warnings.is_empty() && line_count == 0 {
        warnings.push("No usable line definitions - the generator would emit nothing".to_string());
    }

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            output: config.output.to_string(),
            data_file_count: config.data_files.len(),
            replay_file_count: config.replay_files.len(),
            line_count,
        }),
    }
}

/// Referenced data and replay files that do not exist on disk
fn collect_missing_files(config: &GeneratorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for data_file in &config.data_files {
        if !data_file.path.exists() {
            warnings.push(format!("Data file not found: {}", data_file.path.display()));
        }
    }
    for replay in &config.replay_files {
        if !replay.path.exists() {
            warnings.push(format!("Replay file not found: {}", replay.path.display()));
        }
    }

    warnings
}


fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Output: {}", summary.output);
            println!("  Data files: {}", summary.data_file_count);
            println!("  Replay files: {}", summary.replay_file_count);
            println!("  Lines: {}", summary.line_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
