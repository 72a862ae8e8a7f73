use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Plugin '{0}' is already installed")]
    AlreadyInstalled(String),

    #[error("Plugin '{0}' is not installed")]
    NotInstalled(String),

    #[error("Plugin '{plugin}' does not support target '{target}' (supported: {})", .supported.join(", "))]
    TargetNotSupported {
        plugin: String,
        target: String,
        supported: Vec<String>,
    },

    #[error("Plugin '{plugin}' conflicts with installed plugin(s): {}", .conflicts.join(", "))]
    Conflict {
        plugin: String,
        conflicts: Vec<String>,
    },

    #[error("Plugin '{plugin}' is missing dependencies: {}", .missing.join(", "))]
    DependencyMissing { plugin: String, missing: Vec<String> },

    #[error("Plugin '{plugin}' is required by: {}", .dependents.join(", "))]
    HasDependents {
        plugin: String,
        dependents: Vec<String>,
    },

    #[error("Circular dependency detected: {}", .cycle.join(" → "))]
    DependencyCycle { cycle: Vec<String> },

    #[error("Invalid project configuration:\n  {}", .0.join("\n  "))]
    ConfigInvalid(Vec<String>),

    #[error("Invalid options for '{plugin}':\n  {}", .problems.join("\n  "))]
    InvalidOptions {
        plugin: String,
        problems: Vec<String>,
    },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid integration rules:\n  {}", .0.join("\n  "))]
    InvalidRule(Vec<String>),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Names carried by the error (conflicting, missing or dependent plugins)
    pub fn offending_names(&self) -> &[String] {
        match self {
            Error::Conflict { conflicts, .. } => conflicts,
            Error::DependencyMissing { missing, .. } => missing,
            Error::HasDependents { dependents, .. } => dependents,
            Error::DependencyCycle { cycle } => cycle,
            _ => &[],
        }
    }
}
