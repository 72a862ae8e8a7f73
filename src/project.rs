//! Project configuration model
//!
//! A [`ProjectConfig`] describes one project: its chosen target framework, the
//! plugins installed into it (each with an enabled flag and opaque options),
//! and cosmetic settings. It is persisted at the project root as
//! `modforge.toml` or `modforge.json`; the file format is handled by a
//! [`ConfigCodec`], so other formats can be plugged in.
//!
//! # Examples
//!
//! ```no_run
//! use modforge::{ProjectConfig, Target};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ProjectConfig::new("my-app", Target::Nextjs);
//! config.save(".")?;
//!
//! let loaded = ProjectConfig::load(".")?;
//! assert_eq!(loaded.project_name, "my-app");
//! # Ok(())
//! # }
//! ```

use crate::manifest::{is_valid_plugin_name, Target};
use crate::schema::Options;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// TOML project configuration filename
pub const CONFIG_FILE_TOML: &str = "modforge.toml";

/// JSON project configuration filename
pub const CONFIG_FILE_JSON: &str = "modforge.json";

/// An installed plugin entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Disabled entries are treated exactly like absent ones
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

fn default_enabled() -> bool {
    true
}

impl ModuleEntry {
    pub fn enabled(options: Options) -> Self {
        Self {
            enabled: true,
            options,
        }
    }
}

/// Formatting preferences for generated code (irrelevant to resolution)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_typescript")]
    pub typescript: bool,

    /// Source directory for generated files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Import alias for the source directory (e.g. "@/")
    #[serde(default = "default_import_alias")]
    pub import_alias: String,

    #[serde(default = "default_package_manager")]
    pub package_manager: String,
}

fn default_typescript() -> bool {
    true
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_import_alias() -> String {
    "@/".to_string()
}

fn default_package_manager() -> String {
    "npm".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            typescript: default_typescript(),
            src_dir: default_src_dir(),
            import_alias: default_import_alias(),
            package_manager: default_package_manager(),
        }
    }
}

/// Configuration of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_name: String,

    /// Chosen host framework
    pub target: Target,

    /// Plugin name -> entry
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleEntry>,

    #[serde(default)]
    pub settings: Settings,
}

impl ProjectConfig {
    pub fn new(project_name: impl Into<String>, target: Target) -> Self {
        Self {
            project_name: project_name.into(),
            target,
            modules: BTreeMap::new(),
            settings: Settings::default(),
        }
    }

    /// Check if a plugin has an entry with `enabled = true`
    pub fn is_enabled(&self, name: &str) -> bool {
        self.modules.get(name).is_some_and(|m| m.enabled)
    }

    /// Names of enabled plugins, sorted
    pub fn enabled_modules(&self) -> Vec<String> {
        self.modules
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn options(&self, name: &str) -> Option<&Options> {
        self.modules
            .get(name)
            .filter(|m| m.enabled)
            .map(|m| &m.options)
    }

    /// Schema checks on the configuration shape
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.project_name.trim().is_empty() {
            problems.push("project_name must not be empty".to_string());
        }
        for name in self.modules.keys() {
            if !is_valid_plugin_name(name) {
                problems.push(format!(
                    "module '{}' is not a valid plugin name (expected 'category-slug')",
                    name
                ));
            }
        }
        if self.settings.src_dir.trim().is_empty() {
            problems.push("settings.src_dir must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigInvalid(problems))
        }
    }

    /// Locate the configuration file in `dir` (TOML preferred over JSON)
    pub fn find<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        let dir = dir.as_ref();
        [CONFIG_FILE_TOML, CONFIG_FILE_JSON]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Check if a configuration file exists in `dir`
    pub fn exists<P: AsRef<Path>>(dir: P) -> bool {
        Self::find(dir).is_some()
    }

    /// Load and validate the configuration from `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = Self::find(&dir).ok_or_else(|| {
            Error::Other(format!(
                "{} not found. Run 'modforge init' first.",
                CONFIG_FILE_TOML
            ))
        })?;
        Self::load_from(path)
    }

    /// Load and validate a configuration file, picking the codec by extension
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = codec_for_path(path).decode(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the existing configuration file in `dir`, or `modforge.toml`
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let path = Self::find(dir).unwrap_or_else(|| dir.join(CONFIG_FILE_TOML));
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to a specific file, picking the codec by extension
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = codec_for_path(path).encode(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Converts a [`ProjectConfig`] to and from its persisted text form
pub trait ConfigCodec {
    fn encode(&self, config: &ProjectConfig) -> Result<String>;

    fn decode(&self, content: &str) -> Result<ProjectConfig>;
}

/// `modforge.toml`
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl ConfigCodec for TomlCodec {
    fn encode(&self, config: &ProjectConfig) -> Result<String> {
        // TOML has no null; an absent key reads back the same way
        let mut config = config.clone();
        for entry in config.modules.values_mut() {
            entry.options.retain(|_, value| !value.is_null());
            entry.options.values_mut().for_each(strip_nulls);
        }
        Ok(toml::to_string_pretty(&config)?)
    }

    fn decode(&self, content: &str) -> Result<ProjectConfig> {
        Ok(toml::from_str(content)?)
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        Value::Object(map) => {
            map.retain(|_, item| !item.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

/// `modforge.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ConfigCodec for JsonCodec {
    fn encode(&self, config: &ProjectConfig) -> Result<String> {
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');
        Ok(content)
    }

    fn decode(&self, content: &str) -> Result<ProjectConfig> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Pick a codec from a file extension (`.json` -> JSON, anything else -> TOML)
pub fn codec_for_path(path: &Path) -> Box<dyn ConfigCodec> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Box::new(JsonCodec),
        _ => Box::new(TomlCodec),
    }
}
