//! Check command - diagnose project problems
//!
//! Checks:
//! - Project configuration validity
//! - Plugin catalog references
//! - Integration rule table
//! - Installed plugin consistency (catalog, target, dependencies, conflicts)

use super::{load_catalog, load_rules, manager_for};
use anyhow::{bail, Result};
use modforge::{Config, ProjectConfig, RuleEngine};
use std::env;

/// Status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning => "⚠",
            CheckStatus::Error => "✗",
        }
    }
}

struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    details: Vec<String>,
}

impl CheckResult {
    fn from_problems(name: &'static str, problems: Vec<String>, severity: CheckStatus) -> Self {
        let status = if problems.is_empty() {
            CheckStatus::Ok
        } else {
            severity
        };
        Self {
            name,
            status,
            details: problems,
        }
    }

    fn print(&self) {
        println!("  {} {}", self.status.symbol(), self.name);
        for line in &self.details {
            println!("      {}", line);
        }
    }
}

pub fn run() -> Result<()> {
    let current_dir = env::current_dir()?;

    println!("Checking project...");
    println!();

    let project = match ProjectConfig::load(&current_dir) {
        Ok(project) => project,
        Err(e) => {
            CheckResult::from_problems("Project configuration", vec![e.to_string()], CheckStatus::Error)
                .print();
            println!();
            bail!("Project configuration is invalid");
        }
    };

    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let rules = load_rules(&config)?;
    let manager = manager_for(&catalog, project, &config);

    let results = vec![
        CheckResult::from_problems("Project configuration", Vec::new(), CheckStatus::Error),
        CheckResult::from_problems(
            "Plugin catalog references",
            catalog.validate_references(),
            CheckStatus::Warning,
        ),
        CheckResult::from_problems(
            "Integration rules",
            RuleEngine::validate_rules(rules.rules()),
            CheckStatus::Error,
        ),
        CheckResult::from_problems("Installed plugins", manager.verify(), CheckStatus::Error),
    ];

    for result in &results {
        result.print();
    }
    println!();

    let errors = results
        .iter()
        .filter(|r| r.status == CheckStatus::Error)
        .count();
    let warnings = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        bail!("{} check(s) failed", errors);
    }

    if warnings > 0 {
        println!("✓ No errors ({} warning{})", warnings, if warnings == 1 { "" } else { "s" });
    } else {
        println!("✓ All checks passed");
    }

    Ok(())
}
