use composer_devkit::config::{ConfigCache, default_dev_dir};
use composer_devkit::project::Project;
use composer_devkit::test_utils::{TestWorkspaceBuilder, init_test_logging};
use serde_json::json;
use serial_test::serial;

/// Sets `DEVKIT_DEV_JSON_DIR` for the duration of a test.
struct DevDirGuard {
    previous: Option<std::ffi::OsString>,
}

impl DevDirGuard {
    fn set(dir: &std::path::Path) -> Self {
        let previous = std::env::var_os("DEVKIT_DEV_JSON_DIR");
        // SAFETY: tests touching this variable are serialized
        unsafe { std::env::set_var("DEVKIT_DEV_JSON_DIR", dir) };
        Self { previous }
    }
}

impl Drop for DevDirGuard {
    fn drop(&mut self) {
        // SAFETY: see `DevDirGuard::set`
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var("DEVKIT_DEV_JSON_DIR", value),
                None => std::env::remove_var("DEVKIT_DEV_JSON_DIR"),
            }
        }
    }
}

#[test]
#[serial]
fn test_default_dev_dir_follows_env() {
    let ws = TestWorkspaceBuilder::new().unwrap().build().unwrap();
    let _guard = DevDirGuard::set(&ws.home_dir);

    assert_eq!(default_dev_dir().unwrap(), ws.home_dir);
}

#[test]
#[serial]
fn test_project_reads_dev_json_namespace() {
    init_test_logging(None);
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_dev_json(json!({
            "clevercanyon": {"github": {"user": "${DEVKIT_TEST_UNSET_VAR}", "org": "acme"}},
            "other": {"ignored": true}
        }))
        .build()
        .unwrap();
    let _guard = DevDirGuard::set(&ws.home_dir);

    let mut cache = ConfigCache::new();
    let project = Project::load(&ws.project_dir, &mut cache).unwrap();

    assert_eq!(
        *project.dev_json(),
        json!({"github": {"user": "${DEVKIT_TEST_UNSET_VAR}", "org": "acme"}})
    );
}

#[test]
#[serial]
fn test_project_shares_cached_documents() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_namespace_value("@extends-packages", json!(["acme/base"]))
        .with_namespace_value("site", json!({"url": "https://${PROJECT_NAME}.test"}))
        .with_project_file(
            "vendor/acme/base/composer.json",
            &json!({
                "name": "acme/base",
                "extra": {"clevercanyon": {"site": {"url": "https://base.test", "lang": "en"}}}
            })
            .to_string(),
        )
        .build()
        .unwrap();
    let _guard = DevDirGuard::set(&ws.home_dir);

    let mut cache = ConfigCache::new();
    let first = Project::load(&ws.project_dir, &mut cache).unwrap();
    let second = Project::load(&ws.project_dir, &mut cache).unwrap();

    assert!(std::ptr::eq(first.json(), second.json()));
    assert_eq!(
        first.config_value("site"),
        Some(&json!({"url": "https://acme/widget.test", "lang": "en"}))
    );
}
