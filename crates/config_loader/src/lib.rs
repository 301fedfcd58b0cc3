//! # Config Loader
//!
//! Loads the generator configuration, validates it, and turns the referenced
//! data and replay files into normalized [`contracts::LineSpec`]s ready for
//! scheduling.
//!
//! Flow: parse -> validate -> load lines.

mod lines;
mod parser;
mod validator;

pub use lines::load_lines;
pub use parser::{parse, parse_json, parse_toml, ConfigFormat};
pub use validator::validate;

use std::path::Path;

use contracts::{ContractError, GeneratorConfig};
use tracing::info;

/// Load and validate the configuration at `path`
///
/// The format is inferred from the file extension.
pub fn load_from_path(path: &Path) -> Result<GeneratorConfig, ContractError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = ConfigFormat::from_extension(ext).ok_or_else(|| {
        ContractError::config_parse(format!(
            "unsupported config extension '{ext}' for {}",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path)?;
    let config = load_from_str(&content, format)?;
    info!(
        path = %path.display(),
        data_files = config.data_files.len(),
        replay_files = config.replay_files.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Parse and validate configuration content in the given format
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<GeneratorConfig, ContractError> {
    let config = parse(content, format)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_path_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
output = "file"
file_output_path = "/tmp/out.log"

[[data_files]]
path = "data/lines.toml"
"#
        )
        .unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.output, contracts::SinkKind::File);
    }

    #[test]
    fn test_load_from_str_rejects_invalid() {
        // parses but fails validation: http output without an endpoint
        let content = r#"{ "output": "http", "data_files": [{ "path": "x.json" }] }"#;
        let err = load_from_str(content, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(load_from_path(file.path()).is_err());
    }
}
