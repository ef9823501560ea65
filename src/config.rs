use crate::error::{AssetSplitError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub units: UnitsConfig,
    pub output: OutputConfig,
}

/// File names inside a single game directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub document: String,
    pub backup_suffix: String,
    pub stylesheet: String,
    pub script: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UnitsConfig {
    /// Units to process, in order. Empty means every sub-directory.
    pub names: Vec<String>,
    pub skip_hidden: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub preserve_backup_mtime: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            document: "index.html".to_string(),
            backup_suffix: ".backup".to_string(),
            stylesheet: "css/style.css".to_string(),
            script: "js/game.js".to_string(),
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            skip_hidden: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preserve_backup_mtime: true,
        }
    }
}

impl LayoutConfig {
    pub fn backup_name(&self) -> String {
        format!("{}{}", self.document, self.backup_suffix)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AssetSplitError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AssetSplitError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| AssetSplitError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["assetsplit.toml", ".assetsplit.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref units) = cli_args.units {
            self.units.names = units
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| AssetSplitError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| AssetSplitError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;

        if layout.backup_suffix.is_empty() {
            return Err(AssetSplitError::Config {
                message: "Backup suffix must not be empty".to_string(),
            });
        }

        for (field, value) in [
            ("document", &layout.document),
            ("stylesheet", &layout.stylesheet),
            ("script", &layout.script),
        ] {
            validate_relative_path(field, value)?;
        }

        if layout.stylesheet == layout.script
            || layout.stylesheet == layout.document
            || layout.script == layout.document
        {
            return Err(AssetSplitError::Config {
                message: "Document, stylesheet and script must be distinct files".to_string(),
            });
        }

        for name in &self.units.names {
            if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
                return Err(AssetSplitError::Config {
                    message: format!("Unit name must be a plain directory name: {}", name),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

fn validate_relative_path(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssetSplitError::Config {
            message: format!("layout.{} must not be empty", field),
        });
    }

    let path = Path::new(value);
    if path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(AssetSplitError::Config {
            message: format!(
                "layout.{} must be a relative path inside the game directory: {}",
                field, value
            ),
        });
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub units: Option<Vec<String>>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, units: Option<Vec<String>>) -> Self {
        self.units = units;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.document, "index.html");
        assert_eq!(config.layout.backup_name(), "index.html.backup");
        assert_eq!(config.layout.stylesheet, "css/style.css");
        assert_eq!(config.layout.script, "js/game.js");
        assert!(config.units.names.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.layout.stylesheet = "../shared/style.css".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.script = config.layout.stylesheet.clone();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.units.names = vec!["snake/../..".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.backup_suffix.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.units.names = vec!["snake-game".to_string(), "pacman".to_string()];
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.units.names, config.units.names);
        assert_eq!(loaded_config.layout.script, config.layout.script);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[units]\nnames = [\"pacman\"]\n").unwrap();
        assert_eq!(config.units.names, vec!["pacman"]);
        assert!(config.units.skip_hidden);
        assert_eq!(config.layout.script, "js/game.js");
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here/assetsplit.toml");
        assert!(matches!(result, Err(AssetSplitError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_units(Some(vec![
                " pacman ".to_string(),
                "".to_string(),
                "breakout".to_string(),
            ]));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.units.names, vec!["pacman", "breakout"]);

        config.merge_with_cli_args(&CliOverrides::new());
        assert_eq!(config.units.names, vec!["pacman", "breakout"]);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[layout]"));
        assert!(sample.contains("[units]"));
        assert!(sample.contains("[output]"));
    }
}
