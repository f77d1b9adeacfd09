use crate::collision::DEFAULT_MAX_SUFFIX_ATTEMPTS;
use crate::planner::RunOptions;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub log_level: String,
    pub max_suffix_attempts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_suffix_attempts: DEFAULT_MAX_SUFFIX_ATTEMPTS,
        }
    }
}

impl AppConfig {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            max_suffix_attempts: self.max_suffix_attempts,
        }
    }
}

/// `config.toml` inside the OS configuration directory.
pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "jangolabs", "media-renamer")
        .context("could not resolve the OS configuration directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Loads `config.toml` from the OS configuration directory, falling back to
/// defaults when it does not exist.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("could not parse config file: {}", path.display()))?;
    if config.max_suffix_attempts == 0 {
        bail!(
            "max_suffix_attempts must be at least 1 in config file: {}",
            path.display()
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = load_config_from(&temp.path().join("config.toml")).expect("load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.run_options(), RunOptions::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "max_suffix_attempts = 50\n").expect("write config");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.max_suffix_attempts, 50);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.run_options().max_suffix_attempts, 50);
    }

    #[test]
    fn zero_suffix_attempts_are_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "max_suffix_attempts = 0\n").expect("write config");

        let err = load_config_from(&path).expect_err("zero attempts must fail");
        let message = err.to_string();
        assert!(message.contains("max_suffix_attempts must be at least 1"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "template = \"{year}\"\n").expect("write config");

        let err = load_config_from(&path).expect_err("unknown key must fail");
        assert!(err.to_string().contains("could not parse config file"));
    }
}
