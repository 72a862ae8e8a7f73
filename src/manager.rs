//! Dependency and conflict resolution
//!
//! The [`Manager`] binds a [`Catalog`] to one [`ProjectConfig`] and exposes
//! `add`/`remove` operations that keep the configuration consistent:
//!
//! 1. every enabled plugin exists in the catalog
//! 2. no enabled plugin conflicts with another enabled plugin
//! 3. every dependency of an enabled plugin is enabled
//! 4. the project target is supported by every enabled plugin
//! 5. a plugin cannot be removed while an enabled plugin depends on it
//!
//! Every check runs before any mutation, so a failed call leaves the
//! configuration exactly as it was. The `validate_*` and query methods are
//! built on the same assessment as the mutating operations.
//!
//! # Examples
//!
//! ```
//! use modforge::{Catalog, Category, Manager, Options, PluginManifest, ProjectConfig, Target};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::from_manifests(vec![
//!     PluginManifest::new("db-prisma", Category::Database, vec![Target::Nextjs]),
//!     PluginManifest::new("api-trpc", Category::Api, vec![Target::Nextjs]).with_dependency("db-prisma"),
//! ]);
//!
//! let mut manager = Manager::new(&catalog, ProjectConfig::new("my-app", Target::Nextjs));
//! let installed_deps = manager.add("api-trpc", Options::new())?;
//!
//! assert_eq!(installed_deps, vec!["db-prisma".to_string()]);
//! assert!(manager.is_installed("db-prisma"));
//! assert!(manager.remove("db-prisma").is_err());
//! # Ok(())
//! # }
//! ```

use crate::catalog::Catalog;
use crate::manifest::PluginManifest;
use crate::project::{ModuleEntry, ProjectConfig};
use crate::schema::Options;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// How `add` treats dependencies that are not installed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyPolicy {
    /// Install missing dependencies transitively, dependencies first
    #[default]
    AutoInstall,
    /// Fail with `DependencyMissing` listing the missing dependencies
    Strict,
}

/// Which side of a conflict declaration blocks installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Only the plugin that declares the conflict is blocked
    #[default]
    Declared,
    /// A declaration on either side blocks both install orders
    Symmetric,
}

/// Result of a side-effect-free validation
#[derive(Debug)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<Error>,
}

impl Validation {
    fn from_errors(errors: Vec<Error>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Everything `add` needs to know before touching the configuration
struct AddAssessment {
    errors: Vec<Error>,
    /// Dependencies to install first, in install order
    plan: Vec<String>,
}

/// Resolver owning one project configuration
#[derive(Debug)]
pub struct Manager<'a> {
    catalog: &'a Catalog,
    config: ProjectConfig,
    dependency_policy: DependencyPolicy,
    conflict_policy: ConflictPolicy,
}

impl<'a> Manager<'a> {
    pub fn new(catalog: &'a Catalog, config: ProjectConfig) -> Self {
        Self {
            catalog,
            config,
            dependency_policy: DependencyPolicy::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    pub fn with_dependency_policy(mut self, policy: DependencyPolicy) -> Self {
        self.dependency_policy = policy;
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn dependency_policy(&self) -> DependencyPolicy {
        self.dependency_policy
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Give back the configuration for persisting
    pub fn into_config(self) -> ProjectConfig {
        self.config
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.config.is_enabled(name)
    }

    /// Enabled plugin names, sorted
    pub fn installed(&self) -> Vec<String> {
        self.config.enabled_modules()
    }

    /// Installed plugins that `manifest` would conflict with
    pub fn check_conflicts(&self, manifest: &PluginManifest) -> Vec<String> {
        self.conflicts_among(manifest, &self.installed())
    }

    /// Declared dependencies of `manifest` that are not installed
    pub fn get_missing_dependencies(&self, manifest: &PluginManifest) -> Vec<String> {
        manifest
            .dependencies
            .iter()
            .filter(|dep| !self.is_installed(dep))
            .cloned()
            .collect()
    }

    /// Installed plugins that declare `name` as a dependency
    pub fn get_dependents(&self, name: &str) -> Vec<String> {
        self.installed()
            .into_iter()
            .filter(|installed| installed != name)
            .filter(|installed| {
                self.catalog
                    .get(installed)
                    .is_some_and(|m| m.depends_on(name))
            })
            .collect()
    }

    /// Check whether `add(name)` would succeed, without changing anything
    pub fn validate_add(&self, name: &str) -> Validation {
        Validation::from_errors(self.assess_add(name).errors)
    }

    /// Check whether `remove(name)` would succeed, without changing anything
    pub fn validate_remove(&self, name: &str) -> Validation {
        Validation::from_errors(self.assess_remove(name))
    }

    /// Install a plugin
    ///
    /// Returns the dependencies installed along the way, in install order
    /// (always empty under [`DependencyPolicy::Strict`]). Auto-installed
    /// dependencies receive their schema defaults as options.
    pub fn add(&mut self, name: &str, options: Options) -> Result<Vec<String>> {
        let AddAssessment { errors, plan } = self.assess_add(name);
        if let Some(err) = errors.into_iter().next() {
            return Err(err);
        }

        let catalog = self.catalog;
        for dep in &plan {
            let defaults = catalog
                .get(dep)
                .map(PluginManifest::default_options)
                .unwrap_or_default();
            self.config
                .modules
                .insert(dep.clone(), ModuleEntry::enabled(defaults));
            debug!("Auto-installed dependency {} for {}", dep, name);
        }
        self.config
            .modules
            .insert(name.to_string(), ModuleEntry::enabled(options));

        info!("Installed {} ({} dependencies)", name, plan.len());
        Ok(plan)
    }

    /// Uninstall a plugin, deleting its entry entirely
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if let Some(err) = self.assess_remove(name).into_iter().next() {
            return Err(err);
        }

        self.config.modules.remove(name);
        info!("Removed {}", name);
        Ok(())
    }

    /// Transitive dependencies of `name` in install order (dependencies first)
    pub fn dependency_tree(&self, name: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(name.to_string());
        self.collect_dependencies(name, &mut visited, &mut order);
        order
    }

    /// Re-check invariants over the current configuration
    ///
    /// Useful for configurations edited by hand; the mutating operations
    /// never produce a configuration that fails these checks. Conflicts are
    /// judged by the manager's [`ConflictPolicy`]: under `Declared` a one-sided
    /// declaration is reachable by installing the declaring plugin first.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let installed = self.installed();

        for name in &installed {
            let Some(manifest) = self.catalog.get(name) else {
                problems.push(format!("{} is not in the plugin catalog", name));
                continue;
            };

            if !manifest.supports(self.config.target) {
                problems.push(format!(
                    "{} does not support target '{}'",
                    name, self.config.target
                ));
            }
            for dep in self.get_missing_dependencies(manifest) {
                problems.push(format!("{} requires {} which is not installed", name, dep));
            }
            // Each pair is reported once, from its lexically smaller member
            for other in installed.iter().filter(|other| other.as_str() > name.as_str()) {
                if self.pair_unreachable(manifest, other) {
                    problems.push(format!("{} conflicts with {}", name, other));
                }
            }
        }

        problems
    }

    /// True if no install order under the current policy enables both plugins
    fn pair_unreachable(&self, manifest: &PluginManifest, other: &str) -> bool {
        let forward = manifest.declares_conflict(other);
        let backward = self
            .catalog
            .get(other)
            .is_some_and(|m| m.declares_conflict(&manifest.name));

        match self.conflict_policy {
            ConflictPolicy::Declared => forward && backward,
            ConflictPolicy::Symmetric => forward || backward,
        }
    }

    fn assess_add(&self, name: &str) -> AddAssessment {
        let mut errors = Vec::new();
        let mut plan = Vec::new();

        let Some(manifest) = self.catalog.get(name) else {
            errors.push(Error::PluginNotFound(name.to_string()));
            return AddAssessment { errors, plan };
        };

        if self.is_installed(name) {
            errors.push(Error::AlreadyInstalled(name.to_string()));
        }

        if let Some(err) = self.target_error(manifest) {
            errors.push(err);
        }

        let conflicts = self.check_conflicts(manifest);
        if !conflicts.is_empty() {
            errors.push(Error::Conflict {
                plugin: name.to_string(),
                conflicts,
            });
        }

        match self.dependency_policy {
            DependencyPolicy::Strict => {
                let missing = self.get_missing_dependencies(manifest);
                if !missing.is_empty() {
                    errors.push(Error::DependencyMissing {
                        plugin: name.to_string(),
                        missing,
                    });
                }
            }
            DependencyPolicy::AutoInstall => match self.plan_dependencies(manifest) {
                Ok(planned) => plan = planned,
                Err(err) => errors.push(err),
            },
        }

        AddAssessment { errors, plan }
    }

    fn assess_remove(&self, name: &str) -> Vec<Error> {
        if !self.catalog.contains(name) {
            return vec![Error::PluginNotFound(name.to_string())];
        }
        if !self.is_installed(name) {
            return vec![Error::NotInstalled(name.to_string())];
        }

        let dependents = self.get_dependents(name);
        if dependents.is_empty() {
            Vec::new()
        } else {
            vec![Error::HasDependents {
                plugin: name.to_string(),
                dependents,
            }]
        }
    }

    /// Depth-first install plan for the missing dependencies of `root`
    fn plan_dependencies(&self, root: &PluginManifest) -> Result<Vec<String>> {
        let mut planned = Vec::new();
        let mut stack = vec![root.name.clone()];
        self.plan_into(root, &mut planned, &mut stack)?;

        let clashes = self.conflicts_among(root, &planned);
        if !clashes.is_empty() {
            return Err(Error::Conflict {
                plugin: root.name.clone(),
                conflicts: clashes,
            });
        }

        debug!("Planned dependencies for {}: {:?}", root.name, planned);
        Ok(planned)
    }

    fn plan_into(
        &self,
        manifest: &PluginManifest,
        planned: &mut Vec<String>,
        stack: &mut Vec<String>,
    ) -> Result<()> {
        for dep in &manifest.dependencies {
            if self.is_installed(dep) || planned.contains(dep) {
                continue;
            }

            if let Some(pos) = stack.iter().position(|n| n == dep) {
                let mut cycle = stack[pos..].to_vec();
                cycle.push(dep.clone());
                return Err(Error::DependencyCycle { cycle });
            }

            let dep_manifest = self
                .catalog
                .get(dep)
                .ok_or_else(|| Error::PluginNotFound(dep.clone()))?;

            if let Some(err) = self.target_error(dep_manifest) {
                return Err(err);
            }

            let mut pending = self.installed();
            pending.extend(planned.iter().cloned());
            pending.extend(stack.iter().cloned());
            let conflicts = self.conflicts_among(dep_manifest, &pending);
            if !conflicts.is_empty() {
                return Err(Error::Conflict {
                    plugin: dep.clone(),
                    conflicts,
                });
            }

            stack.push(dep.clone());
            self.plan_into(dep_manifest, planned, stack)?;
            stack.pop();

            planned.push(dep.clone());
        }

        Ok(())
    }

    fn target_error(&self, manifest: &PluginManifest) -> Option<Error> {
        if manifest.supports(self.config.target) {
            return None;
        }
        Some(Error::TargetNotSupported {
            plugin: manifest.name.clone(),
            target: self.config.target.to_string(),
            supported: manifest
                .supported_targets
                .iter()
                .map(|t| t.to_string())
                .collect(),
        })
    }

    /// Names in `others` that conflict with `manifest` under the current policy
    fn conflicts_among(&self, manifest: &PluginManifest, others: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for other in others {
            if *other == manifest.name || found.contains(other) {
                continue;
            }
            if self.pair_conflicts(manifest, other) {
                found.push(other.clone());
            }
        }
        found
    }

    fn pair_conflicts(&self, manifest: &PluginManifest, other: &str) -> bool {
        if manifest.declares_conflict(other) {
            return true;
        }
        self.conflict_policy == ConflictPolicy::Symmetric
            && self
                .catalog
                .get(other)
                .is_some_and(|m| m.declares_conflict(&manifest.name))
    }

    fn collect_dependencies(&self, name: &str, visited: &mut HashSet<String>, order: &mut Vec<String>) {
        let Some(manifest) = self.catalog.get(name) else {
            return;
        };
        for dep in &manifest.dependencies {
            if visited.insert(dep.clone()) {
                self.collect_dependencies(dep, visited, order);
                order.push(dep.clone());
            }
        }
    }
}
