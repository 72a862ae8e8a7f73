//! User configuration management
//!
//! This module handles reading and writing the modforge user configuration.
//! Configuration is stored in TOML format at `~/.modforge/config.toml`.
//!
//! # Examples
//!
//! ```no_run
//! use modforge::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::load()?;
//! println!("Auto-install dependencies: {}", config.resolver.auto_install_dependencies);
//!
//! config.set("resolver.conflict_policy", "symmetric")?;
//! config.save()?;
//! # Ok(())
//! # }
//! ```

use crate::manager::{ConflictPolicy, DependencyPolicy};
use crate::manifest::Target;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration file (`~/.modforge/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where plugin manifests are discovered
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Dependency resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Integration rule settings
    #[serde(default)]
    pub rules: RulesConfig,

    /// Defaults for new projects
    #[serde(default)]
    pub project: ProjectDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directories scanned for plugin manifest files (`~` is expanded)
    #[serde(default = "default_catalog_dirs")]
    pub dirs: Vec<String>,
}

fn default_catalog_dirs() -> Vec<String> {
    vec!["~/.modforge/plugins".to_string()]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dirs: default_catalog_dirs(),
        }
    }
}

/// Dependency resolver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Install missing dependencies automatically (false = fail instead)
    #[serde(default = "default_auto_install")]
    pub auto_install_dependencies: bool,

    /// `declared` or `symmetric`
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

fn default_auto_install() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            auto_install_dependencies: default_auto_install(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn dependency_policy(&self) -> DependencyPolicy {
        if self.auto_install_dependencies {
            DependencyPolicy::AutoInstall
        } else {
            DependencyPolicy::Strict
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Use the built-in rule table when no rule file is configured
    #[serde(default = "default_use_default_rules")]
    pub use_default_rules: bool,

    /// TOML rule file replacing the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_use_default_rules() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            use_default_rules: default_use_default_rules(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDefaults {
    #[serde(default = "default_target")]
    pub default_target: Target,

    /// `toml` or `json`
    #[serde(default = "default_config_format")]
    pub config_format: String,
}

fn default_target() -> Target {
    Target::Nextjs
}

fn default_config_format() -> String {
    "toml".to_string()
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            default_target: default_target(),
            config_format: default_config_format(),
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses MODFORGE_CONFIG_DIR if set, otherwise ~/.modforge/config.toml
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var("MODFORGE_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".modforge").join("config.toml"))
    }

    /// Load config from file, or use defaults if it doesn't exist
    ///
    /// Environment variable overrides:
    /// - `MODFORGE_CATALOG_DIR`: Prepended to `catalog.dirs`
    /// - `MODFORGE_CONFIG_DIR`: Overrides the config directory location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        };

        if let Ok(dir) = std::env::var("MODFORGE_CATALOG_DIR") {
            if !dir.is_empty() {
                config.catalog.dirs.insert(0, dir);
            }
        }

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Catalog directories with `~` expanded
    pub fn catalog_dirs(&self) -> Vec<PathBuf> {
        self.catalog
            .dirs
            .iter()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).to_string()))
            .collect()
    }

    /// Rule file path with `~` expanded
    pub fn rules_file(&self) -> Option<PathBuf> {
        self.rules
            .file
            .as_ref()
            .map(|file| PathBuf::from(shellexpand::tilde(file).to_string()))
    }

    /// Set a configuration value by dotted key (e.g. `resolver.conflict_policy`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "catalog.dirs" => {
                self.catalog.dirs = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "resolver.auto_install_dependencies" => {
                self.resolver.auto_install_dependencies = parse_bool(key, value)?;
            }
            "resolver.conflict_policy" => {
                self.resolver.conflict_policy = match value {
                    "declared" => ConflictPolicy::Declared,
                    "symmetric" => ConflictPolicy::Symmetric,
                    _ => {
                        return Err(Error::Other(format!(
                            "Invalid value for {}: '{}' (expected 'declared' or 'symmetric')",
                            key, value
                        )))
                    }
                };
            }
            "rules.use_default_rules" => {
                self.rules.use_default_rules = parse_bool(key, value)?;
            }
            "rules.file" => {
                self.rules.file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "project.default_target" => {
                self.project.default_target = value.parse()?;
            }
            "project.config_format" => {
                if value != "toml" && value != "json" {
                    return Err(Error::Other(format!(
                        "Invalid value for {}: '{}' (expected 'toml' or 'json')",
                        key, value
                    )));
                }
                self.project.config_format = value.to_string();
            }
            _ => {
                return Err(Error::Other(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::Other(format!(
            "Invalid value for {}: '{}' (expected true or false)",
            key, value
        ))),
    }
}
