//! Auto-integration rules
//!
//! An [`IntegrationRule`] pairs two plugin patterns. When one installed plugin
//! matches each side, the rule's action becomes applicable (for example,
//! wiring an auth plugin's session into an API plugin's request context).
//!
//! A pattern is either an exact plugin name (`auth-clerk`) or a category
//! wildcard (`auth-*`), which matches any plugin whose name starts with
//! `auth-`. No other wildcard forms exist.
//!
//! # Examples
//!
//! ```
//! use modforge::{IntegrationRule, RuleEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RuleEngine::new(vec![
//!     IntegrationRule::new("auth-api-middleware", "auth-*", "api-*", "inject-auth-middleware")
//!         .with_priority(100),
//! ])?;
//!
//! let installed = vec!["auth-clerk".to_string()];
//! assert!(engine.find_matching_rules(&installed).is_empty());
//!
//! let matches = engine.rules_for_new_plugin("api-trpc", &installed);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].plugins, ("auth-clerk".to_string(), "api-trpc".to_string()));
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A parsed rule pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches one plugin by name
    Exact(String),
    /// `<category>-*`: matches any plugin named `<category>-...`
    Category(String),
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("-*") {
            Some(category) if !category.is_empty() => Pattern::Category(category.to_string()),
            _ => Pattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, plugin_name: &str) -> bool {
        match self {
            Pattern::Exact(name) => plugin_name == name,
            Pattern::Category(category) => plugin_name
                .strip_prefix(category.as_str())
                .is_some_and(|rest| rest.starts_with('-')),
        }
    }
}

/// Check a plugin name against a pattern string
pub fn matches_pattern(plugin_name: &str, pattern: &str) -> bool {
    Pattern::parse(pattern).matches(plugin_name)
}

/// A declarative two-plugin integration rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRule {
    pub id: String,

    /// Stored ordered, but applicability is unordered
    pub patterns: (String, String),

    /// Identifier of the generator action to run
    #[serde(default)]
    pub action: String,

    /// Higher runs first
    #[serde(default)]
    pub priority: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IntegrationRule {
    pub fn new(
        id: impl Into<String>,
        pattern_a: impl Into<String>,
        pattern_b: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            patterns: (pattern_a.into(), pattern_b.into()),
            action: action.into(),
            priority: 0,
            description: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True if the pair `(x, y)` satisfies the rule in either order
    pub fn applies(&self, x: &str, y: &str) -> bool {
        let (a, b) = (&self.patterns.0, &self.patterns.1);
        (matches_pattern(x, a) && matches_pattern(y, b))
            || (matches_pattern(x, b) && matches_pattern(y, a))
    }
}

/// A rule satisfied by two distinct installed plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'r> {
    pub rule: &'r IntegrationRule,

    /// `(plugin matching pattern A, plugin matching pattern B)`
    pub plugins: (String, String),
}

impl RuleMatch<'_> {
    pub fn involves(&self, name: &str) -> bool {
        self.plugins.0 == name || self.plugins.1 == name
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<IntegrationRule>,
}

/// A validated, fixed table of integration rules
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<IntegrationRule>,
}

impl RuleEngine {
    /// Build an engine, rejecting malformed rule tables
    pub fn new(rules: Vec<IntegrationRule>) -> Result<Self> {
        let problems = Self::validate_rules(&rules);
        if !problems.is_empty() {
            return Err(Error::InvalidRule(problems));
        }
        Ok(Self { rules })
    }

    /// Engine with the built-in rule table
    pub fn with_default_rules() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Load a rule table from a TOML file with `[[rules]]` entries
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: RuleFile = toml::from_str(&content)?;
        Self::new(file.rules)
    }

    pub fn rules(&self) -> &[IntegrationRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&IntegrationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Every problem in a rule table (empty when well-formed)
    pub fn validate_rules(rules: &[IntegrationRule]) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for (index, rule) in rules.iter().enumerate() {
            let label = if rule.id.trim().is_empty() {
                problems.push(format!("rule #{} has an empty id", index + 1));
                format!("#{}", index + 1)
            } else {
                if !seen.insert(rule.id.as_str()) {
                    problems.push(format!("duplicate rule id '{}'", rule.id));
                }
                rule.id.clone()
            };

            if rule.patterns.0.trim().is_empty() || rule.patterns.1.trim().is_empty() {
                problems.push(format!("rule {} has an empty pattern", label));
            }
            if rule.action.trim().is_empty() {
                problems.push(format!("rule {} has no action", label));
            }
        }

        problems
    }

    /// All rules satisfied by pairs of distinct installed plugins
    ///
    /// Sorted by priority, highest first; equal priorities keep rule-table
    /// order, then installed-list order.
    pub fn find_matching_rules(&self, installed: &[String]) -> Vec<RuleMatch<'_>> {
        let mut matches = Vec::new();

        for rule in &self.rules {
            let side_a = Pattern::parse(&rule.patterns.0);
            let side_b = Pattern::parse(&rule.patterns.1);

            for a in installed.iter().filter(|name| side_a.matches(name)) {
                for b in installed.iter().filter(|name| side_b.matches(name)) {
                    if a != b {
                        matches.push(RuleMatch {
                            rule,
                            plugins: (a.clone(), b.clone()),
                        });
                    }
                }
            }
        }

        // stable: ties keep encounter order
        matches.sort_by_key(|m| Reverse(m.rule.priority));
        debug!(
            "{} integration rule matches for {} installed plugins",
            matches.len(),
            installed.len()
        );
        matches
    }

    /// Matches that become true when `new_plugin` joins `existing`
    pub fn rules_for_new_plugin(&self, new_plugin: &str, existing: &[String]) -> Vec<RuleMatch<'_>> {
        let mut all: Vec<String> = existing.to_vec();
        if !all.iter().any(|name| name == new_plugin) {
            all.push(new_plugin.to_string());
        }

        self.find_matching_rules(&all)
            .into_iter()
            .filter(|m| m.involves(new_plugin))
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Built-in integration rules
pub fn default_rules() -> Vec<IntegrationRule> {
    vec![
        IntegrationRule::new("auth-api-middleware", "auth-*", "api-*", "inject-auth-middleware")
            .with_priority(100)
            .with_description("Expose the authenticated session to API handlers"),
        IntegrationRule::new("auth-db-adapter", "auth-*", "db-*", "generate-auth-adapter")
            .with_priority(90)
            .with_description("Persist users and sessions through the database plugin"),
        IntegrationRule::new("payments-db-schema", "payments-*", "db-*", "generate-billing-schema")
            .with_priority(80)
            .with_description("Add customer and subscription tables"),
        IntegrationRule::new("payments-auth-customer", "payments-*", "auth-*", "link-customer-to-user")
            .with_priority(70)
            .with_description("Create a billing customer when a user signs up"),
        IntegrationRule::new("db-api-context", "db-*", "api-*", "inject-db-context")
            .with_priority(60)
            .with_description("Provide the database client in the API context"),
        IntegrationRule::new("jobs-db-queue", "jobs-*", "db-*", "generate-job-store")
            .with_priority(50)
            .with_description("Store background job state in the database"),
        IntegrationRule::new("cache-api-layer", "cache-*", "api-*", "wrap-api-cache")
            .with_priority(40)
            .with_description("Cache API responses"),
        IntegrationRule::new("email-auth-templates", "email-*", "auth-*", "generate-auth-emails")
            .with_priority(30)
            .with_description("Send verification and password reset emails"),
        IntegrationRule::new("storage-auth-uploads", "storage-*", "auth-*", "protect-uploads")
            .with_priority(20)
            .with_description("Scope uploads to the signed-in user"),
        IntegrationRule::new("monitoring-api-tracing", "monitoring-*", "api-*", "instrument-api")
            .with_priority(10)
            .with_description("Trace API calls"),
        IntegrationRule::new("analytics-auth-identify", "analytics-*", "auth-*", "identify-user")
            .with_description("Identify signed-in users in analytics"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(Pattern::parse("auth-*"), Pattern::Category("auth".to_string()));
        assert_eq!(Pattern::parse("auth-clerk"), Pattern::Exact("auth-clerk".to_string()));
        assert_eq!(Pattern::parse("-*"), Pattern::Exact("-*".to_string()));
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("auth-clerk", "auth-*"));
        assert!(!matches_pattern("auth-clerk", "db-*"));
        assert!(matches_pattern("auth-clerk", "auth-clerk"));
        assert!(!matches_pattern("auth-clerk", "auth-clerkx"));
        assert!(!matches_pattern("authx-clerk", "auth-*"));
        assert!(!matches_pattern("auth", "auth-*"));
    }

    #[test]
    fn test_rule_applies_is_unordered() {
        let rule = IntegrationRule::new("r", "auth-*", "api-*", "act");
        assert!(rule.applies("auth-clerk", "api-trpc"));
        assert!(rule.applies("api-trpc", "auth-clerk"));
        assert!(!rule.applies("auth-clerk", "auth-lucia"));
    }

    #[test]
    fn test_single_plugin_cannot_match_both_sides() {
        let engine =
            RuleEngine::new(vec![IntegrationRule::new("r", "auth-*", "auth-*", "act")]).unwrap();
        assert!(engine.find_matching_rules(&names(&["auth-clerk"])).is_empty());

        let matches = engine.find_matching_rules(&names(&["auth-clerk", "auth-lucia"]));
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_validate_rules() {
        let rules = vec![
            IntegrationRule::new("dup", "auth-*", "api-*", "a"),
            IntegrationRule::new("dup", "auth-*", "", "b"),
            IntegrationRule::new("", "auth-*", "db-*", " "),
        ];
        let problems = RuleEngine::validate_rules(&rules);
        assert_eq!(
            problems,
            vec![
                "duplicate rule id 'dup'".to_string(),
                "rule dup has an empty pattern".to_string(),
                "rule #3 has an empty id".to_string(),
                "rule #3 has no action".to_string(),
            ]
        );
        assert!(matches!(RuleEngine::new(rules), Err(Error::InvalidRule(_))));
    }

    #[test]
    fn test_default_rules_are_well_formed() {
        assert!(RuleEngine::validate_rules(&default_rules()).is_empty());
        assert!(RuleEngine::default().get("auth-api-middleware").is_some());
    }

    #[test]
    fn test_load_rule_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        fs::write(
            &path,
            r#"
[[rules]]
id = "auth-api-middleware"
patterns = ["auth-*", "api-*"]
action = "inject-auth-middleware"
priority = 100

[[rules]]
id = "clerk-stripe"
patterns = ["auth-clerk", "payments-stripe"]
action = "sync-clerk-customers"
"#,
        )
        .unwrap();

        let engine = RuleEngine::load(&path).unwrap();
        assert_eq!(engine.rules().len(), 2);
        assert_eq!(engine.rules()[1].priority, 0);
    }

    #[test]
    fn test_load_rejects_missing_action() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        fs::write(
            &path,
            "[[rules]]\nid = \"x\"\npatterns = [\"auth-*\", \"api-*\"]\n",
        )
        .unwrap();

        assert!(matches!(RuleEngine::load(&path), Err(Error::InvalidRule(_))));
    }
}
