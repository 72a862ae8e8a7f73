use super::{load_catalog, load_project, load_rules};
use anyhow::Result;
use modforge::{applicable_integrations, Config, IntegrationPlan};
use std::env;

pub fn run(plugin: Option<String>) -> Result<()> {
    let current_dir = env::current_dir()?;

    let Some(project) = load_project(&current_dir)? else {
        return Ok(());
    };
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let rules = load_rules(&config)?;
    let installed = project.enabled_modules();

    match plugin {
        Some(name) => {
            let others: Vec<String> = installed.into_iter().filter(|n| *n != name).collect();
            let plan = IntegrationPlan::for_new_plugin(&catalog, &rules, &name, &others);

            if plan.is_empty() {
                println!("No integrations involve {}", name);
                return Ok(());
            }

            println!("Integrations involving {}:", name);
            for m in &plan.rules {
                println!(
                    "  [{:>4}] {} ({} + {}) → {}",
                    m.rule.priority, m.rule.id, m.plugins.0, m.plugins.1, m.rule.action
                );
            }
            for integration in &plan.integrations {
                println!(
                    "  {} → {} ({:?})",
                    integration.source, integration.spec.target, integration.spec.kind
                );
            }
        }
        None => {
            let matches = rules.find_matching_rules(&installed);
            let declared = applicable_integrations(&catalog, &installed);

            if matches.is_empty() && declared.is_empty() {
                println!("No integrations apply to the installed plugins.");
                return Ok(());
            }

            if !matches.is_empty() {
                println!("Rules:");
                for m in &matches {
                    println!(
                        "  [{:>4}] {} ({} + {}) → {}",
                        m.rule.priority, m.rule.id, m.plugins.0, m.plugins.1, m.rule.action
                    );
                }
                println!();
            }

            if !declared.is_empty() {
                println!("Plugin integrations:");
                for integration in &declared {
                    println!(
                        "  {} → {} ({:?})",
                        integration.source, integration.spec.target, integration.spec.kind
                    );
                    for file in &integration.spec.files {
                        println!("      {}", file.path);
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}
