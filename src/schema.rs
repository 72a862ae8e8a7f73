//! Plugin option schemas
//!
//! Plugin options are opaque records to the resolver. A plugin may attach a
//! schema that knows how to validate those records and provide defaults;
//! anything implementing [`OptionSchema`] can play that role.

use crate::manifest::PluginManifest;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Plugin options as stored in the project configuration
pub type Options = serde_json::Map<String, Value>;

/// A value that can validate an options record and produce defaults
pub trait OptionSchema: fmt::Debug + Send + Sync {
    /// Return every problem found in `options` (empty when valid)
    fn validate(&self, options: &Options) -> Vec<String>;

    /// Default values for options the user did not provide
    fn defaults(&self) -> Options;
}

/// JSON type expected for an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Bool,
    Number,
    Array,
    Object,
}

impl OptionKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            OptionKind::String => value.is_string(),
            OptionKind::Bool => value.is_boolean(),
            OptionKind::Number => value.is_number(),
            OptionKind::Array => value.is_array(),
            OptionKind::Object => value.is_object(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            OptionKind::String => "string",
            OptionKind::Bool => "bool",
            OptionKind::Number => "number",
            OptionKind::Array => "array",
            OptionKind::Object => "object",
        }
    }
}

/// One option declared in a manifest's `[[options]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionField {
    pub key: String,

    pub kind: OptionKind,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Allowed values (any value of the right kind when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Schema built from option fields declared in a manifest file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclaredSchema {
    pub fields: Vec<OptionField>,
}

impl DeclaredSchema {
    pub fn new(fields: Vec<OptionField>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, key: &str) -> Option<&OptionField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

impl OptionSchema for DeclaredSchema {
    fn validate(&self, options: &Options) -> Vec<String> {
        let mut problems = Vec::new();

        for field in &self.fields {
            match options.get(&field.key) {
                None if field.required => {
                    problems.push(format!("missing required option '{}'", field.key));
                }
                None => {}
                Some(value) => {
                    if !field.kind.accepts(value) {
                        problems.push(format!(
                            "option '{}' must be a {}, got {}",
                            field.key,
                            field.kind.name(),
                            value
                        ));
                    } else if !field.choices.is_empty() && !field.choices.contains(value) {
                        let allowed: Vec<String> =
                            field.choices.iter().map(|c| c.to_string()).collect();
                        problems.push(format!(
                            "option '{}' must be one of {}, got {}",
                            field.key,
                            allowed.join(", "),
                            value
                        ));
                    }
                }
            }
        }

        for key in options.keys() {
            if self.field(key).is_none() {
                problems.push(format!("unknown option '{}'", key));
            }
        }

        problems
    }

    fn defaults(&self) -> Options {
        self.fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.key.clone(), d)))
            .collect()
    }
}

/// Merge schema defaults under user-supplied options and validate the result
///
/// Plugins without a schema get their options back unchanged.
pub fn prepare_options(manifest: &PluginManifest, options: Options) -> Result<Options> {
    let Some(schema) = manifest.schema() else {
        return Ok(options);
    };

    let mut merged = schema.defaults();
    merged.extend(options);

    let problems = schema.validate(&merged);
    if !problems.is_empty() {
        return Err(Error::InvalidOptions {
            plugin: manifest.name.clone(),
            problems,
        });
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Category, Target};
    use serde_json::json;
    use std::sync::Arc;

    fn field(key: &str, kind: OptionKind) -> OptionField {
        OptionField {
            key: key.to_string(),
            kind,
            required: false,
            default: None,
            choices: Vec::new(),
            description: None,
        }
    }

    fn options(value: Value) -> Options {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_declared_schema_defaults() {
        let mut provider = field("provider", OptionKind::String);
        provider.default = Some(json!("postgresql"));
        let schema = DeclaredSchema::new(vec![provider, field("url", OptionKind::String)]);

        let defaults = schema.defaults();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults["provider"], json!("postgresql"));
    }

    #[test]
    fn test_declared_schema_reports_all_problems() {
        let mut required = field("publishableKey", OptionKind::String);
        required.required = true;
        let mut mode = field("mode", OptionKind::String);
        mode.choices = vec![json!("jwt"), json!("session")];
        let schema = DeclaredSchema::new(vec![
            required,
            mode,
            field("debug", OptionKind::Bool),
        ]);

        let problems = schema.validate(&options(json!({
            "mode": "cookie",
            "debug": "yes",
            "extra": 1
        })));

        assert_eq!(problems.len(), 4);
        assert!(problems[0].contains("publishableKey"));
        assert!(problems[1].contains("must be one of"));
        assert!(problems[2].contains("must be a bool"));
        assert!(problems[3].contains("unknown option 'extra'"));
    }

    #[test]
    fn test_prepare_options_merges_defaults() {
        let mut provider = field("provider", OptionKind::String);
        provider.default = Some(json!("postgresql"));
        let manifest = PluginManifest::new("db-prisma", Category::Database, vec![Target::Nextjs])
            .with_schema(Arc::new(DeclaredSchema::new(vec![
                provider,
                field("url", OptionKind::String),
            ])));

        let prepared =
            prepare_options(&manifest, options(json!({ "url": "postgres://localhost" }))).unwrap();
        assert_eq!(prepared["provider"], json!("postgresql"));
        assert_eq!(prepared["url"], json!("postgres://localhost"));

        let overridden = prepare_options(&manifest, options(json!({ "provider": "mysql" }))).unwrap();
        assert_eq!(overridden["provider"], json!("mysql"));
    }

    #[test]
    fn test_prepare_options_rejects_invalid() {
        let manifest = PluginManifest::new("db-prisma", Category::Database, vec![Target::Nextjs])
            .with_schema(Arc::new(DeclaredSchema::new(vec![field(
                "port",
                OptionKind::Number,
            )])));

        let err = prepare_options(&manifest, options(json!({ "port": "5432" }))).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { ref plugin, .. } if plugin == "db-prisma"));
    }

    #[test]
    fn test_prepare_options_without_schema_is_passthrough() {
        let manifest = PluginManifest::new("db-prisma", Category::Database, vec![Target::Nextjs]);
        let input = options(json!({ "anything": [1, 2, 3] }));
        assert_eq!(prepare_options(&manifest, input.clone()).unwrap(), input);
    }
}
