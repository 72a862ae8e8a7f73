//! Plugin manifests
//!
//! A [`PluginManifest`] describes one optional feature module: the targets it
//! can be installed into, the plugins it needs, the plugins it cannot live
//! alongside, and the integrations it generates when paired with another
//! plugin. Manifests are immutable once registered in a [`Catalog`](crate::Catalog).
//!
//! Manifests are usually authored as TOML files:
//!
//! ```toml
//! name = "auth-clerk"
//! category = "auth"
//! description = "Authentication with Clerk"
//! supported_targets = ["nextjs", "nuxt"]
//! dependencies = []
//! conflicts = ["auth-nextauth"]
//!
//! [[integrations]]
//! target = "api-trpc"
//! kind = "middleware"
//! files = [{ path = "server/auth-context.ts", template = "clerk-trpc-context" }]
//!
//! [[options]]
//! key = "signInUrl"
//! kind = "string"
//! default = "/sign-in"
//! ```
//!
//! # Examples
//!
//! ```
//! use modforge::{Category, PluginManifest, Target};
//!
//! let manifest = PluginManifest::new("auth-clerk", Category::Auth, vec![Target::Nextjs])
//!     .with_conflict("auth-nextauth");
//!
//! assert!(manifest.supports(Target::Nextjs));
//! assert!(!manifest.supports(Target::Nuxt));
//! ```

use crate::schema::{DeclaredSchema, OptionSchema, Options};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Plugin names are lowercase `category-slug` identifiers
const PLUGIN_NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)+$";

/// Check whether a string is a well-formed plugin name (e.g. `auth-clerk`)
pub fn is_valid_plugin_name(name: &str) -> bool {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE
        .get_or_init(|| Regex::new(PLUGIN_NAME_PATTERN).expect("plugin name pattern compiles"))
        .is_match(name)
}

/// Plugin category, used for wildcard integration patterns and documentation grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Auth,
    Database,
    Api,
    Caching,
    Payments,
    Email,
    Storage,
    Analytics,
    Monitoring,
    Testing,
    Ui,
    Deployment,
    Jobs,
    Realtime,
    Search,
    Security,
    I18n,
    Cms,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Auth,
        Category::Database,
        Category::Api,
        Category::Caching,
        Category::Payments,
        Category::Email,
        Category::Storage,
        Category::Analytics,
        Category::Monitoring,
        Category::Testing,
        Category::Ui,
        Category::Deployment,
        Category::Jobs,
        Category::Realtime,
        Category::Search,
        Category::Security,
        Category::I18n,
        Category::Cms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Auth => "auth",
            Category::Database => "database",
            Category::Api => "api",
            Category::Caching => "caching",
            Category::Payments => "payments",
            Category::Email => "email",
            Category::Storage => "storage",
            Category::Analytics => "analytics",
            Category::Monitoring => "monitoring",
            Category::Testing => "testing",
            Category::Ui => "ui",
            Category::Deployment => "deployment",
            Category::Jobs => "jobs",
            Category::Realtime => "realtime",
            Category::Search => "search",
            Category::Security => "security",
            Category::I18n => "i18n",
            Category::Cms => "cms",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::Other(format!("Unknown category '{}'", s)))
    }
}

/// Host framework a project is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Nextjs,
    Nuxt,
    Sveltekit,
    Remix,
    Astro,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Nextjs,
        Target::Nuxt,
        Target::Sveltekit,
        Target::Remix,
        Target::Astro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Nextjs => "nextjs",
            Target::Nuxt => "nuxt",
            Target::Sveltekit => "sveltekit",
            Target::Remix => "remix",
            Target::Astro => "astro",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                Error::Other(format!(
                    "Unknown target '{}' (expected one of: {})",
                    s,
                    Target::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// Kind of cross-plugin wiring an integration generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    Middleware,
    Provider,
    Adapter,
    Config,
    Route,
    Hook,
    Schema,
}

/// A file the code generator emits for an integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Output path relative to the project root
    pub path: String,

    /// Template identifier resolved by the code generator
    pub template: String,
}

/// Integration declared by a plugin towards another plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSpec {
    /// Name of the plugin this integration pairs with
    pub target: String,

    pub kind: IntegrationType,

    #[serde(default)]
    pub files: Vec<GeneratedFile>,
}

/// Static description of a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique identifier (`category-slug`, e.g. `auth-clerk`)
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub category: Category,

    /// Targets this plugin can be installed into (never empty for a valid manifest)
    pub supported_targets: Vec<Target>,

    /// Plugins that must be enabled with this one
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Plugins that must not be enabled alongside this one
    #[serde(default)]
    pub conflicts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integrations: Vec<IntegrationSpec>,

    /// npm packages added by the plugin (informational)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, String>,

    /// Environment variables the plugin expects (informational)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,

    /// Option fields declared in the manifest file
    #[serde(default, rename = "options", skip_serializing_if = "DeclaredSchema::is_empty")]
    pub declared_options: DeclaredSchema,

    /// Programmatic option schema, takes precedence over `declared_options`
    #[serde(skip)]
    pub config_schema: Option<Arc<dyn OptionSchema>>,
}

impl PluginManifest {
    /// Create a manifest with no dependencies, conflicts or integrations
    pub fn new(name: impl Into<String>, category: Category, supported_targets: Vec<Target>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            category,
            supported_targets,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            integrations: Vec::new(),
            packages: BTreeMap::new(),
            env_vars: Vec::new(),
            declared_options: DeclaredSchema::default(),
            config_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn with_conflict(mut self, name: impl Into<String>) -> Self {
        self.conflicts.push(name.into());
        self
    }

    pub fn with_integration(mut self, integration: IntegrationSpec) -> Self {
        self.integrations.push(integration);
        self
    }

    pub fn with_schema(mut self, schema: Arc<dyn OptionSchema>) -> Self {
        self.config_schema = Some(schema);
        self
    }

    /// Check if this plugin can be installed into `target`
    pub fn supports(&self, target: Target) -> bool {
        self.supported_targets.contains(&target)
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    pub fn declares_conflict(&self, name: &str) -> bool {
        self.conflicts.iter().any(|c| c == name)
    }

    /// The option schema for this plugin, if it has one
    pub fn schema(&self) -> Option<&dyn OptionSchema> {
        match &self.config_schema {
            Some(schema) => Some(schema.as_ref()),
            None if !self.declared_options.is_empty() => Some(&self.declared_options),
            None => None,
        }
    }

    /// Default option values provided by the schema (empty without a schema)
    pub fn default_options(&self) -> Options {
        self.schema().map(|s| s.defaults()).unwrap_or_default()
    }

    /// Integrations this plugin declares towards `other`
    pub fn integrations_with<'a, 'b>(
        &'a self,
        other: &'b str,
    ) -> impl Iterator<Item = &'a IntegrationSpec> + 'b
    where
        'a: 'b,
    {
        self.integrations.iter().filter(move |i| i.target == other)
    }

    /// Structural checks on a single manifest
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !is_valid_plugin_name(&self.name) {
            problems.push(format!(
                "name '{}' must be lowercase 'category-slug' (e.g. auth-clerk)",
                self.name
            ));
        }
        if self.supported_targets.is_empty() {
            problems.push("supported_targets must not be empty".to_string());
        }
        if self.depends_on(&self.name) {
            problems.push("plugin cannot depend on itself".to_string());
        }
        if self.declares_conflict(&self.name) {
            problems.push("plugin cannot conflict with itself".to_string());
        }
        for dep in &self.dependencies {
            if self.declares_conflict(dep) {
                problems.push(format!("'{}' is listed as both dependency and conflict", dep));
            }
        }
        for integration in &self.integrations {
            if integration.target == self.name {
                problems.push("integration cannot target the plugin itself".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidManifest(format!(
                "{}: {}",
                self.name,
                problems.join("; ")
            )))
        }
    }

    /// Parse and validate a manifest from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: PluginManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::TomlDe(inner) => {
                Error::InvalidManifest(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }
}
