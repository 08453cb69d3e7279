//! Configuration loading
//!
//! TOML-backed configuration with a discovery hierarchy and a flat
//! section/key store. Values in the `base` section act as fallbacks for
//! every other section.

use anyhow::{anyhow, Context, Result};
use log::debug;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use toml::Value;

/// Configuration storage - section name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Default live-scan count at which dispatch falls back to inline scans.
pub const DEFAULT_CONCURRENCY_THRESHOLD: usize = 1000;

/// Environment variable naming an explicit configuration file.
const CONFIG_ENV_VAR: &str = "LSTATS_CONFIG";

/// Resolved scan pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Throttle threshold for the dispatcher
    pub concurrency_threshold: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency_threshold: DEFAULT_CONCURRENCY_THRESHOLD,
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
}

impl ConfigManager {
    /// Create a ConfigManager from an in-memory Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self { config }
    }

    /// Load configuration using the discovery hierarchy.
    ///
    /// The first existing candidate wins; no candidate at all yields an
    /// empty configuration rather than an error.
    pub fn load() -> Result<Self> {
        for path in discover_config_files() {
            if path.exists() {
                debug!("loading configuration from {}", path.display());
                return Self::load_from_file(path);
            }
        }
        debug!("no configuration file found, using empty configuration");
        Ok(Self {
            config: Configuration::new(),
        })
    }

    /// Load configuration from an explicit file path.
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = parse_toml_config(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(Self { config })
    }

    /// Get a value, falling back to the `base` section.
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }
        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Get an integer value with type conversion
    pub fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>> {
        match self.get_value(section, key) {
            Some(value) => value
                .parse::<usize>()
                .map(Some)
                .map_err(|_| anyhow!("invalid integer value for {}.{}: {}", section, key, value)),
            None => Ok(None),
        }
    }

    /// Get a log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get a path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Resolve scan settings from the `[scanner]` section.
    pub fn scan_settings(&self) -> Result<ScanSettings> {
        let mut settings = ScanSettings::default();
        if let Some(threshold) = self.get_usize("scanner", "concurrency-threshold")? {
            if threshold == 0 {
                return Err(anyhow!("scanner.concurrency-threshold must be at least 1"));
            }
            settings.concurrency_threshold = threshold;
        }
        Ok(settings)
    }
}

/// Candidate configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("lstats").join("config.toml"));
    }

    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".lstats.toml"));
    }

    paths.push(PathBuf::from("./.lstats.toml"));

    debug!("config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content into the flat section/key store
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse().context("failed to parse TOML content")?;

    let mut config = Configuration::new();
    if let Value::Table(sections) = toml_value {
        for (section, value) in sections {
            if let Value::Table(keys) = value {
                let entry = config.entry(section).or_default();
                for (key, value) in keys {
                    if let Some(value) = value_to_string(&value) {
                        entry.insert(key, value);
                    }
                }
            }
        }
    }
    Ok(config)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_parse_toml_config_sections() {
        let config = parse_toml_config(
            r#"
            [scanner]
            concurrency-threshold = 200

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.get("scanner").and_then(|s| s.get("concurrency-threshold")),
            Some(&"200".to_string())
        );
        assert_eq!(
            config.get("logging").and_then(|s| s.get("level")),
            Some(&"debug".to_string())
        );
    }

    #[test]
    fn test_base_section_fallback() {
        let manager = ConfigManager::from_config(parse_toml_config(
            r#"
            [base]
            level = "warn"

            [logging]
            format = "text"
            "#,
        )
        .unwrap());

        assert_eq!(
            manager.get_log_level("logging", "level").unwrap(),
            Some(LevelFilter::Warn)
        );
        assert_eq!(
            manager.get_value("logging", "format"),
            Some(&"text".to_string())
        );
    }

    #[test]
    fn test_scan_settings_default_and_override() {
        let empty = ConfigManager::from_config(Configuration::new());
        assert_eq!(
            empty.scan_settings().unwrap(),
            ScanSettings {
                concurrency_threshold: DEFAULT_CONCURRENCY_THRESHOLD
            }
        );

        let manager = ConfigManager::from_config(
            parse_toml_config("[scanner]\nconcurrency-threshold = 8\n").unwrap(),
        );
        assert_eq!(manager.scan_settings().unwrap().concurrency_threshold, 8);
    }

    #[test]
    fn test_scan_settings_rejects_zero_threshold() {
        let manager = ConfigManager::from_config(
            parse_toml_config("[scanner]\nconcurrency-threshold = 0\n").unwrap(),
        );
        assert!(manager.scan_settings().is_err());
    }

    #[test]
    fn test_invalid_integer_value() {
        let manager = ConfigManager::from_config(
            parse_toml_config("[scanner]\nconcurrency-threshold = \"lots\"\n").unwrap(),
        );
        assert!(manager.get_usize("scanner", "concurrency-threshold").is_err());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = ConfigManager::load_from_file(PathBuf::from("/does/not/exist.toml"));
        assert!(result.is_err());
    }
}
