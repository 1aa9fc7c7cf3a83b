use crate::devkit;
use composer_devkit::test_utils::TestWorkspaceBuilder;
use predicates::prelude::*;
use serde_json::json;
use std::fs;

#[test]
fn test_post_update_is_noop_outside_dev_mode() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_dotfiles_manifest(&[".editorconfig"])
        .with_template(".editorconfig", "root = true\n")
        .build()
        .unwrap();

    for value in [None, Some("0"), Some("")] {
        let mut cmd = devkit(&ws);
        if let Some(value) = value {
            cmd.env("COMPOSER_DEV_MODE", value);
        }
        cmd.arg("post-update-cmd")
            .arg("--dotfiles-dir")
            .arg(&ws.templates_dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("nothing to do"));
    }

    assert!(!ws.project_path(".editorconfig").exists());
}

#[test]
fn test_post_update_quiet_noop_prints_nothing() {
    let ws = TestWorkspaceBuilder::new().unwrap().build().unwrap();

    devkit(&ws)
        .args(["--quiet", "post-update-cmd"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlink_step_links_closest_local_checkout() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_project_path("a/b/project")
        .with_namespace_value(
            "post_update_cmd_handler",
            json!({"symlink_local_packages": {"vendor": ["acme/base", "acme/absent"]}}),
        )
        .with_workspace_dir("a/acme/base")
        .build()
        .unwrap();
    let installed = ws.install_package("vendor", "acme/base").unwrap();
    let checkout = ws.root.join("a").join("acme").join("base");

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .args(["post-update-cmd", "symlink"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vendor/acme/base ->"))
        .stdout(predicate::str::contains("vendor/acme/absent (not installed)"));

    assert!(fs::symlink_metadata(&installed).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::canonicalize(fs::read_link(&installed).unwrap()).unwrap(),
        fs::canonicalize(&checkout).unwrap()
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_step_leaves_package_without_checkout() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_project_path("a/b/project")
        .with_namespace_value(
            "post_update_cmd_handler",
            json!({"symlink_local_packages": {"vendor": ["acme/base"]}}),
        )
        .build()
        .unwrap();
    let installed = ws.install_package("vendor", "acme/base").unwrap();

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .args(["post-update-cmd", "symlink"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no local checkout"));

    assert!(!fs::symlink_metadata(&installed).unwrap().file_type().is_symlink());
    assert!(installed.join("installed.txt").is_file());
}

#[test]
fn test_update_step_syncs_dotfiles_and_merges_package_json() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_dotfiles_manifest(&[".editorconfig", ".github/workflows/ci.yml", "package.json"])
        .with_template(".editorconfig", "root = true\n")
        .with_template(".github/workflows/ci.yml", "on: push\n")
        .with_template(".unlisted", "ignored\n")
        .with_template(
            "package.json",
            &json!({
                "name": "@clevercanyon/skeleton",
                "devDependencies": {"vite": "^4.0.0", "acme/widget": "^1.0.0", "@acme/widget": "^1.0.0"},
                "config": {"clevercanyon": {"brand": {"color": "blue"}}}
            })
            .to_string(),
        )
        .with_project_file(
            "package.json",
            &json!({
                "name": "@acme/widget",
                "version": "1.2.3",
                "devDependencies": {"zod": "^3.0.0"},
                "config": {"clevercanyon": {"brand": {"name": "Widget"}}}
            })
            .to_string(),
        )
        .build()
        .unwrap();

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .env("DEVKIT_DOTFILES_DIR", &ws.templates_dir)
        .args(["post-update-cmd", "update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package.json (merged)"))
        .stdout(predicate::str::contains("Synced 3 dotfile(s)"));

    assert_eq!(ws.read_project_file(".editorconfig").unwrap(), "root = true\n");
    assert_eq!(ws.read_project_file(".github/workflows/ci.yml").unwrap(), "on: push\n");
    assert!(!ws.project_path(".unlisted").exists());

    let package = ws.read_project_json("package.json").unwrap();
    assert_eq!(package["name"], "@acme/widget");
    assert_eq!(package["version"], "1.2.3");
    assert_eq!(package["devDependencies"], json!({"vite": "^4.0.0", "zod": "^3.0.0"}));
    assert_eq!(
        package["config"]["clevercanyon"],
        json!({"brand": {"name": "Widget", "color": "blue"}})
    );
}

#[test]
fn test_missing_templates_dir_fails_with_error() {
    let ws = TestWorkspaceBuilder::new().unwrap().build().unwrap();

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .args(["post-update-cmd", "update"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_missing_brand_slug_fails_with_project_error() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_composer(json!({"name": "acme/widget"}))
        .build()
        .unwrap();

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .arg("post-update-cmd")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("brand.data.slug"));
}

#[test]
fn test_cyclic_extends_reported() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_namespace_value("@extends-packages", json!(["acme/a"]))
        .with_project_file(
            "vendor/acme/a/composer.json",
            &json!({"name": "acme/a", "extra": {"clevercanyon": {"@extends-packages": ["acme/b"]}}})
                .to_string(),
        )
        .with_project_file(
            "vendor/acme/b/composer.json",
            &json!({"name": "acme/b", "extra": {"clevercanyon": {"@extends-packages": ["acme/a"]}}})
                .to_string(),
        )
        .build()
        .unwrap();

    devkit(&ws)
        .env("COMPOSER_DEV_MODE", "1")
        .args(["post-update-cmd", "symlink"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("acme/a -> acme/b -> acme/a"));
}
