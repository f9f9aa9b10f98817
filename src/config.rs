use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::diagram::{ColorConfig, NoteParser, Rgb};
use crate::graph::{ExportToggles, GraphResolver};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notegraph: NotegraphConfig,
    pub colors: ColorsConfig,
    pub export: ExportToggles,
}

/// Notegraph-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotegraphConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NotegraphConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Reference text colors, as Scapple writes them ("r g b", each 0.0-1.0)
#[derive(Debug, Clone, Deserialize)]
pub struct ColorsConfig {
    pub major_character: String,
    pub minor_character: String,
    pub location: String,
    pub item: String,
    pub tolerance: f64,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Template written by `notegraph init-config`.
    pub const SAMPLE: &'static str = r#"[notegraph]
log_level = "info"

# Text colors that mark characters, locations and items in the diagram.
[colors]
major_character = "0.0 0.0 1.0"
minor_character = "0.0 0.5 1.0"
location = "1.0 0.0 0.0"
item = "0.0 0.5 0.0"
tolerance = 0.1

# Which note roles become outline entities.
[export]
scenes = true
characters = true
locations = true
items = true
"#;

    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in NOTEGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("NOTEGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let colors = &self.colors;
        for (name, value) in [
            ("major_character", &colors.major_character),
            ("minor_character", &colors.minor_character),
            ("location", &colors.location),
            ("item", &colors.item),
        ] {
            if Rgb::try_parse(value).is_none() {
                anyhow::bail!(
                    "colors.{} must be three space-separated finite numbers, got {:?}",
                    name,
                    value
                );
            }
        }

        if !colors.tolerance.is_finite() || colors.tolerance < 0.0 {
            anyhow::bail!("colors.tolerance must be a non-negative number");
        }

        Ok(())
    }

    /// Reference colors for note classification
    pub fn color_config(&self) -> ColorConfig {
        ColorConfig {
            major_character: Rgb::parse(&self.colors.major_character),
            minor_character: Rgb::parse(&self.colors.minor_character),
            location: Rgb::parse(&self.colors.location),
            item: Rgb::parse(&self.colors.item),
            tolerance: self.colors.tolerance,
        }
    }

    pub fn note_parser(&self) -> NoteParser {
        NoteParser::new(self.color_config())
    }

    pub fn resolver(&self) -> GraphResolver {
        GraphResolver::new(self.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("NOTEGRAPH_CONFIG").ok();
        std::env::set_var("NOTEGRAPH_CONFIG", config_path);
        f();
        std::env::remove_var("NOTEGRAPH_CONFIG");
        if let Some(val) = original {
            std::env::set_var("NOTEGRAPH_CONFIG", val);
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = Config::from_toml_str(Config::SAMPLE).unwrap();
        assert_eq!(config.notegraph.log_level, "info");
        assert_eq!(config.colors.tolerance, 0.1);
        assert_eq!(config.export, ExportToggles::all());
        assert_eq!(config.color_config().location, Rgb::parse("1.0 0.0 0.0"));
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, Config::SAMPLE.replace("items = true", "items = false")).unwrap();

        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert!(!config.export.items);
            assert!(config.export.scenes);
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(std::path::Path::new("nonexistent.toml"), || {
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("nonexistent.toml"));
        });
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let without_export = Config::SAMPLE.split("[export]").next().unwrap();
        assert!(Config::from_toml_str(without_export).is_err());
    }

    #[test]
    fn test_log_level_defaults() {
        let without_header = Config::SAMPLE.replace("[notegraph]\nlog_level = \"info\"\n", "");
        let config = Config::from_toml_str(&without_header).unwrap();
        assert_eq!(config.notegraph.log_level, "info");
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let text = Config::SAMPLE.replace("location = \"1.0 0.0 0.0\"", "location = \"red\"");
        let err = Config::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("colors.location"));
    }

    #[test]
    fn test_non_finite_color_is_rejected() {
        let text = Config::SAMPLE.replace("location = \"1.0 0.0 0.0\"", "location = \"nan 0 0\"");
        let err = Config::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("colors.location"));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let text = Config::SAMPLE.replace("tolerance = 0.1", "tolerance = -0.5");
        assert!(Config::from_toml_str(&text).is_err());
    }
}
