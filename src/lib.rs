//! modforge - assemble projects from composable feature plugins
//!
//! A project is built from an open set of optional plugins (auth, database,
//! API layers, payments, ...) that may depend on, conflict with, or wire up to
//! each other. modforge keeps a project's plugin set consistent:
//!
//! - Transitive dependency installation, dependencies first, with cycle detection
//! - Conflict checks with a configurable one-sided or symmetric policy
//! - Target framework compatibility checks
//! - Removal blocked while other plugins depend on the plugin
//! - Auto-integration rules that report which cross-plugin wiring applies
//!
//! # Examples
//!
//! ```no_run
//! use modforge::{Catalog, Manager, Options, ProjectConfig, RuleEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog = Catalog::new();
//! catalog.load_dir("plugins")?;
//!
//! let config = ProjectConfig::load(".")?;
//! let existing = config.enabled_modules();
//!
//! let mut manager = Manager::new(&catalog, config);
//! let deps = manager.add("auth-clerk", Options::new())?;
//! println!("Installed {} dependencies", deps.len());
//!
//! let engine = RuleEngine::with_default_rules();
//! for m in engine.rules_for_new_plugin("auth-clerk", &existing) {
//!     println!("{}: {} + {}", m.rule.id, m.plugins.0, m.plugins.1);
//! }
//!
//! manager.into_config().save(".")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`manifest`] - Plugin manifests, categories and targets
//! - [`schema`] - Plugin option schemas
//! - [`catalog`] - In-memory plugin catalog
//! - [`project`] - Project configuration model and persistence
//! - [`manager`] - Dependency and conflict resolution
//! - [`rules`] - Auto-integration rule engine
//! - [`integration`] - Integration planning for the code generator
//! - [`config`] - User configuration management
//! - [`error`] - Error types and result handling

pub mod catalog;
pub mod config;
pub mod error;
pub mod integration;
pub mod manager;
pub mod manifest;
pub mod project;
pub mod rules;
pub mod schema;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use integration::{applicable_integrations, ApplicableIntegration, IntegrationPlan};
pub use manager::{ConflictPolicy, DependencyPolicy, Manager, Validation};
pub use manifest::{
    is_valid_plugin_name, Category, GeneratedFile, IntegrationSpec, IntegrationType,
    PluginManifest, Target,
};
pub use project::{
    ConfigCodec, JsonCodec, ModuleEntry, ProjectConfig, Settings, TomlCodec, CONFIG_FILE_JSON,
    CONFIG_FILE_TOML,
};
pub use rules::{default_rules, matches_pattern, IntegrationRule, Pattern, RuleEngine, RuleMatch};
pub use schema::{prepare_options, DeclaredSchema, OptionField, OptionKind, OptionSchema, Options};
