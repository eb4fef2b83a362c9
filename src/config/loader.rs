//! Configuration discovery and loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::SentryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Name of the config file looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    NotFound(Vec<PathBuf>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::NotFound(searched) => {
                write!(f, "No config file found (searched: ")?;
                for (i, path) in searched.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", path.display())?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Default locations, in lookup order.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Ok(home) = std::env::var("HOME") {
        paths.push(Path::new(&home).join(".config/url-sentry").join(CONFIG_FILE_NAME));
    }
    paths.push(Path::new("/etc/url-sentry").join(CONFIG_FILE_NAME));
    paths
}

/// Pick the config file: the explicit path if given, else the first existing candidate.
pub fn find_config(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ConfigError::NotFound(vec![path.to_path_buf()]))
        };
    }

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound(candidates.to_vec()))
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<SentryConfig, ConfigError> {
    let mut config: SentryConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    normalize(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Strip stray whitespace from values handed verbatim to the mail transport.
fn normalize(config: &mut SentryConfig) {
    config.smtp.server = config.smtp.server.trim().to_string();
    config.smtp.from = config.smtp.from.trim().to_string();
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SentryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    parse_config(&content)
}
