//! End-to-end tests driving the modforge binary against an isolated project


use predicates::prelude::*;
use test_utils::{MockPlugin, TestProject};

fn standard_plugins() -> Vec<MockPlugin> {
    vec![
        MockPlugin::new("db-prisma"),
        MockPlugin::new("api-trpc").with_dependency("db-prisma"),
        MockPlugin::new("auth-clerk"),
        MockPlugin::new("auth-nextauth").with_conflict("auth-clerk"),
    ]
}

fn initialized_project() -> TestProject {
    let project = TestProject::with_plugins(&standard_plugins());
    project.cmd().arg("init").assert().success();
    project
}

#[test]
fn test_init_creates_project_config() {
    let project = TestProject::new();

    project
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created modforge.toml"));

    let config = project.load_config();
    assert_eq!(config.project_name, "my-app");
    assert_eq!(config.target.to_string(), "nextjs");
    assert!(config.modules.is_empty());
}

#[test]
fn test_init_json_and_target() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["init", "--json", "--target", "nuxt", "--name", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created modforge.json"));

    assert!(project.path().join("modforge.json").exists());
    let config = project.load_config();
    assert_eq!(config.project_name, "shop");
    assert_eq!(config.target.to_string(), "nuxt");
}

#[test]
fn test_init_rejects_unknown_target() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["init", "--target", "rails"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    assert!(!project.config_file().exists());
}

#[test]
fn test_add_installs_dependencies() {
    let project = initialized_project();

    project
        .cmd()
        .args(["add", "api-trpc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ db-prisma"))
        .stdout(predicate::str::contains("Added api-trpc"));

    let config = project.load_config();
    assert!(config.is_enabled("api-trpc"));
    assert!(config.is_enabled("db-prisma"));
}

#[test]
fn test_add_strict_reports_missing_dependency() {
    let project = initialized_project();

    project
        .cmd()
        .args(["add", "api-trpc", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("modforge add db-prisma"))
        .stderr(predicate::str::contains("missing dependencies: db-prisma"));

    assert!(project.load_config().modules.is_empty());
}

#[test]
fn test_add_dry_run_writes_nothing() {
    let project = initialized_project();
    let before = project.read_config();

    project
        .cmd()
        .args(["add", "api-trpc", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] No changes written"));

    assert_eq!(project.read_config(), before);
}

#[test]
fn test_add_unknown_plugin_suggests_names() {
    let project = initialized_project();

    project
        .cmd()
        .args(["add", "auth-clerc"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Did you mean"))
        .stdout(predicate::str::contains("auth-clerk"))
        .stderr(predicate::str::contains("Plugin not found: auth-clerc"));
}

#[test]
fn test_add_conflicting_plugin_fails() {
    let project = initialized_project();
    project.cmd().args(["add", "auth-clerk"]).assert().success();
    let before = project.read_config();

    project
        .cmd()
        .args(["add", "auth-nextauth"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("modforge remove auth-clerk"));

    assert_eq!(project.read_config(), before);
}

#[test]
fn test_symmetric_conflict_policy_from_config() {
    let project = initialized_project();
    project
        .cmd()
        .args(["config", "set", "resolver.conflict_policy", "symmetric"])
        .assert()
        .success();

    project.cmd().args(["add", "auth-nextauth"]).assert().success();
    project
        .cmd()
        .args(["add", "auth-clerk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicts with installed plugin(s): auth-nextauth"));
}

#[test]
fn test_add_with_options() {
    let project = initialized_project();

    project
        .cmd()
        .args(["add", "db-prisma", "-o", "provider=sqlite", "-o", "pool=5"])
        .assert()
        .success();

    let config = project.load_config();
    let options = config.options("db-prisma").unwrap();
    assert_eq!(options["provider"], serde_json::json!("sqlite"));
    assert_eq!(options["pool"], serde_json::json!(5));
}

#[test]
fn test_remove_blocked_by_dependents() {
    let project = initialized_project();
    project.cmd().args(["add", "api-trpc"]).assert().success();

    project
        .cmd()
        .args(["remove", "db-prisma"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("db-prisma is required by:"))
        .stdout(predicate::str::contains("- api-trpc"));

    project.cmd().args(["remove", "api-trpc"]).assert().success();
    project.cmd().args(["remove", "db-prisma"]).assert().success();
    assert!(project.load_config().modules.is_empty());
}

#[test]
fn test_remove_not_installed() {
    let project = initialized_project();

    project
        .cmd()
        .args(["remove", "auth-clerk"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not installed"));
}

#[test]
fn test_list_shows_installed_plugins() {
    let project = initialized_project();

    project
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plugins installed"));

    project.cmd().args(["add", "api-trpc"]).assert().success();

    project
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("api-trpc [api]"))
        .stdout(predicate::str::contains("db-prisma [database]"))
        .stdout(predicate::str::contains("Total: 2 plugins enabled"));
}

#[test]
fn test_commands_without_project() {
    let project = TestProject::with_plugins(&standard_plugins());

    project
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run 'modforge init' first"));
}

#[test]
fn test_catalog_marks_installed_plugins() {
    let project = initialized_project();
    project.cmd().args(["add", "auth-clerk"]).assert().success();

    project
        .cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ auth-clerk"))
        .stdout(predicate::str::contains("conflicts: auth-clerk"))
        .stdout(predicate::str::contains("Total: 4 plugins"));

    project
        .cmd()
        .args(["catalog", "--category", "database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db-prisma"))
        .stdout(predicate::str::contains("auth-clerk").not());
}

#[test]
fn test_why_lists_dependents() {
    let project = initialized_project();
    project.cmd().args(["add", "api-trpc"]).assert().success();

    project
        .cmd()
        .args(["why", "db-prisma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api-trpc"));
}

#[test]
fn test_add_reports_integration_rules() {
    let project = initialized_project();
    project.cmd().args(["add", "auth-clerk"]).assert().success();

    project
        .cmd()
        .args(["add", "api-trpc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auth-api-middleware"));
}

#[test]
fn test_check_passes_and_fails() {
    let project = initialized_project();
    project.cmd().args(["add", "api-trpc"]).assert().success();

    project
        .cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));

    // hand-edit the project into an inconsistent state
    let mut config = project.load_config();
    let entry = config.modules.remove("db-prisma").unwrap();
    config.modules.insert("db-missing".to_string(), entry);
    config.save_to(project.config_file()).unwrap();

    project
        .cmd()
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("db-missing is not in the plugin catalog"));
}

#[test]
fn test_completions() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modforge"));
}

#[test]
fn test_check_accepts_one_sided_conflict_installed_in_allowed_order() {
    let project = initialized_project();
    project.cmd().args(["add", "auth-nextauth"]).assert().success();
    project.cmd().args(["add", "auth-clerk"]).assert().success();

    project
        .cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_add_rejects_null_option() {
    let project = initialized_project();
    let before = project.read_config();

    project
        .cmd()
        .args(["add", "db-prisma", "-o", "url=null"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("url=null"));

    assert_eq!(project.read_config(), before);
}
