//! Tests for loading the plugin catalog from manifest directories


use modforge::{prepare_options, Catalog, Category, Error, Manager, Options, Target};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use test_utils::{nextjs_project, MockPlugin};

const PRISMA_MANIFEST: &str = r#"
name = "db-prisma"
display_name = "Prisma"
description = "Type-safe ORM"
category = "database"
supported_targets = ["nextjs", "nuxt", "sveltekit"]
env_vars = ["DATABASE_URL"]

[packages]
"@prisma/client" = "^5.0.0"

[[options]]
key = "provider"
kind = "string"
default = "postgresql"
choices = ["postgresql", "mysql", "sqlite"]

[[options]]
key = "url"
kind = "string"
"#;

#[test]
fn test_load_dir_reads_nested_manifests() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("auth");
    fs::create_dir_all(&nested).unwrap();

    fs::write(temp.path().join("db-prisma.toml"), PRISMA_MANIFEST).unwrap();
    fs::write(
        nested.join("auth-clerk.toml"),
        MockPlugin::new("auth-clerk").with_dependency("db-prisma").toml_content(),
    )
    .unwrap();
    fs::write(temp.path().join("README.md"), "# not a manifest").unwrap();

    let mut catalog = Catalog::new();
    let loaded = catalog.load_dir(temp.path()).unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(catalog.names(), vec!["auth-clerk", "db-prisma"]);

    let prisma = catalog.get("db-prisma").unwrap();
    assert_eq!(prisma.category, Category::Database);
    assert!(prisma.supports(Target::Sveltekit));
    assert_eq!(prisma.packages["@prisma/client"], "^5.0.0");
    assert!(catalog.validate_references().is_empty());
}

#[test]
fn test_load_dir_missing_directory_loads_nothing() {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::new();
    assert_eq!(catalog.load_dir(temp.path().join("missing")).unwrap(), 0);
    assert!(catalog.is_empty());
}

#[test]
fn test_load_dir_rejects_invalid_manifest() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("broken.toml"),
        "name = \"db-prisma\"\ncategory = \"database\"\nsupported_targets = []\n",
    )
    .unwrap();

    let mut catalog = Catalog::new();
    let err = catalog.load_dir(temp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidManifest(_)));
}

#[test]
fn test_load_dir_rejects_unparsable_manifest() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.toml"), "name = [").unwrap();

    let mut catalog = Catalog::new();
    let err = catalog.load_dir(temp.path()).unwrap_err();
    match err {
        Error::InvalidManifest(message) => assert!(message.contains("broken.toml")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_later_directory_overrides_earlier() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("db-prisma.toml"), PRISMA_MANIFEST).unwrap();
    fs::write(
        second.path().join("db-prisma.toml"),
        MockPlugin::new("db-prisma").toml_content(),
    )
    .unwrap();

    let mut catalog = Catalog::new();
    catalog.load_dir(first.path()).unwrap();
    catalog.load_dir(second.path()).unwrap();

    assert_eq!(catalog.count(), 1);
    assert!(catalog.get("db-prisma").unwrap().description.is_none());
}

#[test]
fn test_declared_options_drive_defaults_and_validation() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("db-prisma.toml"), PRISMA_MANIFEST).unwrap();
    fs::write(
        temp.path().join("api-trpc.toml"),
        MockPlugin::new("api-trpc").with_dependency("db-prisma").toml_content(),
    )
    .unwrap();

    let mut catalog = Catalog::new();
    catalog.load_dir(temp.path()).unwrap();
    let prisma = catalog.get("db-prisma").unwrap();

    let prepared = prepare_options(prisma, Options::new()).unwrap();
    assert_eq!(prepared.get("provider"), Some(&json!("postgresql")));

    let bad = json!({ "provider": "oracle" }).as_object().cloned().unwrap();
    assert!(matches!(
        prepare_options(prisma, bad),
        Err(Error::InvalidOptions { .. })
    ));

    // auto-installed dependencies receive their defaults
    let mut manager = Manager::new(&catalog, nextjs_project());
    manager.add("api-trpc", Options::new()).unwrap();
    assert_eq!(
        manager.config().options("db-prisma").and_then(|o| o.get("provider")),
        Some(&json!("postgresql"))
    );
}

#[test]
fn test_suggest_for_typo() {
    let catalog = test_utils::catalog_of(&[
        MockPlugin::new("auth-clerk"),
        MockPlugin::new("db-prisma"),
    ]);
    assert_eq!(catalog.suggest("auth-clerc"), vec!["auth-clerk".to_string()]);
    assert!(catalog.suggest("payments-stripe").is_empty());
}

#[test]
fn test_validate_references_reports_unknown_names() {
    let catalog = test_utils::catalog_of(&[MockPlugin::new("api-trpc")
        .with_dependency("db-prisma")
        .with_conflict("api-rest")]);

    assert_eq!(
        catalog.validate_references(),
        vec![
            "api-trpc depends on unknown plugin 'db-prisma'".to_string(),
            "api-trpc conflicts with unknown plugin 'api-rest'".to_string(),
        ]
    );
}
