//! `doctor_droid.json`
//!
//! ```json
//! { "rules_path": "knowledge/doctor_droid.pl",
//!   "http": { "host": "0.0.0.0", "port": 8000, "cors_origins": [] } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rule source (required). Relative paths resolve against the config
    /// file's directory.
    pub rules_path: String,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Directory of the loaded config file
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.rules_path.trim().is_empty() {
            return Err(CliError::config_error("rules_path must not be empty"));
        }
        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }
        Ok(())
    }

    /// Rule source path, resolved against the config file's directory
    pub fn rules_path(&self) -> PathBuf {
        let rules = Path::new(&self.rules_path);
        if rules.is_absolute() {
            rules.to_path_buf()
        } else {
            self.base_dir.join(rules)
        }
    }
}
