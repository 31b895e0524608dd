//! Configuration management for rowfn
//!
//! Settings come from a config file (TOML or YAML), then environment
//! variables, then command-line flags, each layer overriding the last.

use rowfn_shared::constants::CONFIG_FILE_NAMES;
use rowfn_shared::error::config_error;
use rowfn_shared::Result;

use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the rowfn tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where dictionaries are loaded from
    pub dictionaries: DictionaryConfig,
    /// Where the execution unit is loaded from
    pub plan: PlanConfig,
    /// Resolution behavior
    pub resolve: ResolveConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
}

/// Dictionary source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// JSON document mapping dictionary ids to their strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Plan source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// JSON document holding the execution unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Resolution configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Require an explicit arity for every resolution
    pub strict_arity: bool,
}

/// Debug and diagnostic configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Verbosity level
    pub verbosity: u8,
}

impl Config {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Load configuration from the first config file found and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file(None) {
            log::debug!("loading config from {}", config_path.display());
            config.merge_file(&config_path)?;
        }

        config.merge_env()?;

        Ok(config)
    }

    /// Find configuration file in standard locations
    pub fn find_config_file(current_dir: Option<&Path>) -> Option<PathBuf> {
        let current_dir = current_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut search_dirs = vec![current_dir];
        if let Some(config_dir) = dirs::config_dir() {
            search_dirs.push(config_dir.join("rowfn"));
        }
        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home.join(".config").join("rowfn"));
            search_dirs.push(home);
        }

        first_config_in(&search_dirs)
    }

    /// Merge configuration from file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {e}")))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "toml" => toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid TOML config: {e}")))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid YAML config: {e}")))?,
            _ => return Err(config_error("Unsupported config file format")),
        };
        self.merge(file_config);

        Ok(())
    }

    fn merge_env(&mut self) -> Result<()> {
        self.merge_env_with_reader(|key| std::env::var(key).ok())
    }

    /// Merge configuration from environment variables with custom reader
    pub(crate) fn merge_env_with_reader<F>(&mut self, env_reader: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env_reader("ROWFN_DICTIONARIES") {
            self.dictionaries.path = Some(PathBuf::from(val));
        }

        if let Some(val) = env_reader("ROWFN_PLAN") {
            self.plan.path = Some(PathBuf::from(val));
        }

        if let Some(val) = env_reader("ROWFN_STRICT_ARITY") {
            self.resolve.strict_arity = val != "0" && val.to_lowercase() != "false";
        }

        if let Some(val) = env_reader("ROWFN_VERBOSITY") {
            self.debug.verbosity = val
                .parse()
                .unwrap_or_else(|_| DebugConfig::default().verbosity);
        }

        Ok(())
    }

    /// Merge another config into this one
    fn merge(&mut self, other: Config) {
        if other.dictionaries.path.is_some() {
            self.dictionaries.path = other.dictionaries.path;
        }
        if other.plan.path.is_some() {
            self.plan.path = other.plan.path;
        }
        if other.resolve.strict_arity {
            self.resolve.strict_arity = other.resolve.strict_arity;
        }
        if other.debug.verbosity != DebugConfig::default().verbosity {
            self.debug.verbosity = other.debug.verbosity;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {e}")))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {e}")))?,
            _ => return Err(config_error("Unsupported config file format")),
        };

        fs::write(path, content)
            .map_err(|e| config_error(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

fn first_config_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Some(path.canonicalize().unwrap_or(path));
            }
        }
    }
    None
}

/// Create a default config file template
pub fn create_default_config_file(path: &Path) -> Result<()> {
    Config::default().save(path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.debug.verbosity > 3 {
        return Err(config_error("Verbosity must be between 0 and 3"));
    }

    if let Some(path) = &config.dictionaries.path {
        if path.as_os_str().is_empty() {
            return Err(config_error("Dictionary path must not be empty"));
        }
        if !path.exists() {
            log::warn!("dictionary file does not exist: {}", path.display());
        }
    }

    if let Some(path) = &config.plan.path {
        if path.as_os_str().is_empty() {
            return Err(config_error("Plan path must not be empty"));
        }
        if !path.exists() {
            log::warn!("plan file does not exist: {}", path.display());
        }
    }

    Ok(())
}
