//! Integration planning
//!
//! Combines the two sources of cross-plugin wiring for the code generator:
//! rule-engine matches, and `integrations` entries declared in manifests
//! whose counterpart plugin is installed. Rendering the generated files is
//! the generator's job; this module only decides what applies.

use crate::catalog::Catalog;
use crate::manifest::IntegrationSpec;
use crate::rules::{RuleEngine, RuleMatch};

/// A manifest integration whose counterpart is installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicableIntegration<'a> {
    /// Plugin that declares the integration
    pub source: String,

    pub spec: &'a IntegrationSpec,
}

/// Everything that lights up when one plugin is added
#[derive(Debug, Clone)]
pub struct IntegrationPlan<'a> {
    pub plugin: String,

    /// Rule matches involving `plugin`, highest priority first
    pub rules: Vec<RuleMatch<'a>>,

    /// Declared integrations between `plugin` and installed plugins, both directions
    pub integrations: Vec<ApplicableIntegration<'a>>,
}

impl<'a> IntegrationPlan<'a> {
    /// Plan for `new_plugin` joining the already-installed `existing` plugins
    pub fn for_new_plugin(
        catalog: &'a Catalog,
        engine: &'a RuleEngine,
        new_plugin: &str,
        existing: &[String],
    ) -> Self {
        let rules = engine.rules_for_new_plugin(new_plugin, existing);

        let mut integrations = Vec::new();
        if let Some(manifest) = catalog.get(new_plugin) {
            for spec in &manifest.integrations {
                if existing.iter().any(|name| *name == spec.target) {
                    integrations.push(ApplicableIntegration {
                        source: manifest.name.clone(),
                        spec,
                    });
                }
            }
        }
        for name in existing.iter().filter(|name| name.as_str() != new_plugin) {
            if let Some(manifest) = catalog.get(name) {
                for spec in manifest.integrations_with(new_plugin) {
                    integrations.push(ApplicableIntegration {
                        source: manifest.name.clone(),
                        spec,
                    });
                }
            }
        }

        Self {
            plugin: new_plugin.to_string(),
            rules,
            integrations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.integrations.is_empty()
    }
}

/// Every declared integration among the installed plugins
pub fn applicable_integrations<'a>(
    catalog: &'a Catalog,
    installed: &[String],
) -> Vec<ApplicableIntegration<'a>> {
    let mut applicable = Vec::new();
    for name in installed {
        let Some(manifest) = catalog.get(name) else {
            continue;
        };
        for spec in &manifest.integrations {
            if spec.target != *name && installed.contains(&spec.target) {
                applicable.push(ApplicableIntegration {
                    source: manifest.name.clone(),
                    spec,
                });
            }
        }
    }
    applicable
}
