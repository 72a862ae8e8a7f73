//! Plugin catalog
//!
//! The [`Catalog`] is an in-memory lookup of plugin manifests keyed by name.
//! It is constructed explicitly and passed by reference to the
//! [`Manager`](crate::Manager) and the integration planner; there is no
//! process-wide instance.
//!
//! # Examples
//!
//! ```
//! use modforge::{Catalog, Category, PluginManifest, Target};
//!
//! let mut catalog = Catalog::new();
//! catalog.register(PluginManifest::new("db-prisma", Category::Database, vec![Target::Nextjs]));
//! catalog.register(PluginManifest::new("auth-clerk", Category::Auth, vec![Target::Nextjs]));
//!
//! assert_eq!(catalog.count(), 2);
//! assert_eq!(catalog.by_category(Category::Auth).len(), 1);
//! assert!(catalog.get("api-trpc").is_none());
//! ```

use crate::manifest::{Category, PluginManifest};
use crate::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// Maximum number of "did you mean" suggestions
const MAX_SUGGESTIONS: usize = 5;

/// In-memory plugin manifest store
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plugins: HashMap<String, PluginManifest>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of manifests (later entries win on duplicate names)
    pub fn from_manifests<I: IntoIterator<Item = PluginManifest>>(manifests: I) -> Self {
        let mut catalog = Self::new();
        for manifest in manifests {
            catalog.register(manifest);
        }
        catalog
    }

    /// Insert or overwrite a manifest by name
    pub fn register(&mut self, manifest: PluginManifest) {
        if self.plugins.contains_key(&manifest.name) {
            debug!("Replacing catalog entry for {}", manifest.name);
        }
        self.plugins.insert(manifest.name.clone(), manifest);
    }

    /// Remove a manifest, returning whether it was present
    pub fn unregister(&mut self, name: &str) -> bool {
        self.plugins.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&PluginManifest> {
        self.plugins.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// All manifests in a category (order is not meaningful)
    pub fn by_category(&self, category: Category) -> Vec<&PluginManifest> {
        self.plugins
            .values()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Categories with at least one registered plugin
    pub fn categories(&self) -> BTreeSet<Category> {
        self.plugins.values().map(|m| m.category).collect()
    }

    pub fn count(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugin names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginManifest> {
        self.plugins.values()
    }

    /// Register every `*.toml` manifest found under `dir`
    ///
    /// Returns the number of manifests loaded. A missing directory loads nothing.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.exists() {
            warn!("Catalog directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in walkdir::WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|s| s.to_str()) != Some("toml")
            {
                continue;
            }

            let manifest = PluginManifest::load(path)?;
            debug!("Loaded plugin {} from {}", manifest.name, path.display());
            self.register(manifest);
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Find registered names similar to `query` for "did you mean" hints
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let mut similar: Vec<String> = self
            .plugins
            .keys()
            .filter(|name| {
                name.contains(query) || query.contains(name.as_str()) || levenshtein(query, name) <= 3
            })
            .cloned()
            .collect();

        similar.sort();
        similar.truncate(MAX_SUGGESTIONS);
        similar
    }

    /// Report dependencies, conflicts and integrations that name unknown plugins
    pub fn validate_references(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for name in self.names() {
            let Some(manifest) = self.get(name) else {
                continue;
            };
            for dep in &manifest.dependencies {
                if !self.contains(dep) {
                    problems.push(format!("{} depends on unknown plugin '{}'", name, dep));
                }
            }
            for conflict in &manifest.conflicts {
                if !self.contains(conflict) {
                    problems.push(format!("{} conflicts with unknown plugin '{}'", name, conflict));
                }
            }
            for integration in &manifest.integrations {
                if !self.contains(&integration.target) {
                    problems.push(format!(
                        "{} integrates with unknown plugin '{}'",
                        name, integration.target
                    ));
                }
            }
        }

        problems
    }
}

/// Calculate Levenshtein distance between two strings
fn levenshtein(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, val) in matrix[0].iter_mut().enumerate() {
        *val = j;
    }

    for (i, c1) in s1.chars().enumerate() {
        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(matrix[i][j + 1] + 1, matrix[i + 1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }

    matrix[len1][len2]
}
