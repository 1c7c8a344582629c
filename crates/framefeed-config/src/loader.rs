//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist. Parse errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    ///
    /// Comment lines are passed through untouched.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env".to_string(),
            message: e.to_string(),
        })?;

        let mut lines = Vec::new();
        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            let mut expanded = line.to_string();
            for cap in re.captures_iter(line) {
                let var_name = &cap[1];
                let var_value = std::env::var(var_name)
                    .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
                expanded = expanded.replace(&cap[0], &var_value);
            }
            lines.push(expanded);
        }

        Ok(lines.join("\n"))
    }

    /// Expand shell-style paths (e.g., `~/.framefeed`).
    pub fn expand_path(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
    }
}
