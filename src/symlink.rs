//! Local-package symlinking.
//!
//! A project can declare, under
//! `extra.clevercanyon.post_update_cmd_handler.symlink_local_packages`, which of
//! its installed dependencies should be replaced by local checkouts:
//!
//! ```json
//! { "vendor": ["acme/base"], "node_modules": ["@acme/ui"] }
//! ```
//!
//! For each entry that is installed, the ancestors of the project directory are
//! searched (closest first, up to [`SYMLINK_SEARCH_DEPTH`] levels) for a
//! directory at `<ancestor>/<package name>`. The first hit replaces the
//! installed copy with a symlink to it.

use crate::constants::{SYMLINK_LOCAL_PACKAGES_PATH, SYMLINK_SEARCH_DEPTH};
use crate::core::DevkitError;
use crate::package_name::PackagesDir;
use crate::project::Project;
use crate::utils::fs::remove_path;
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One declared `(packages dir, package name)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub packages_dir: PackagesDir,
    pub name: String,
}

/// A package whose installed copy was replaced by a symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedPackage {
    pub request: LinkRequest,
    /// `<project>/<packages dir>/<name>`, now a symlink
    pub installed: PathBuf,
    /// The local checkout the symlink points at
    pub target: PathBuf,
    /// How many levels above the project directory the checkout was found
    pub depth: usize,
}

/// Why a declared package was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing installed at the package path
    NotInstalled,
    /// No local checkout within the search depth
    NoLocalCheckout,
}

/// Outcome of [`run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymlinkReport {
    pub linked: Vec<LinkedPackage>,
    pub skipped: Vec<(LinkRequest, SkipReason)>,
}

impl SymlinkReport {
    /// `true` when no packages were declared at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linked.is_empty() && self.skipped.is_empty()
    }
}

/// Read and validate the declared symlink mapping of `project`.
///
/// Returns an empty list when the mapping is absent or `null`.
pub fn link_requests(project: &Project) -> Result<Vec<LinkRequest>> {
    let mapping = match project.config_value(SYMLINK_LOCAL_PACKAGES_PATH) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(mapping)) => mapping,
        Some(_) => {
            return Err(mapping_error(
                project,
                "must be an object keyed by `vendor` or `node_modules`",
            ));
        }
    };

    let mut requests = Vec::new();
    for (key, names) in mapping {
        let packages_dir: PackagesDir = key.parse().map_err(|_| {
            mapping_error(
                project,
                &format!("unknown packages directory `{key}`, expected `vendor` or `node_modules`"),
            )
        })?;

        let Value::Array(names) = names else {
            return Err(mapping_error(project, &format!("`{key}` must be an array of package names")));
        };

        for name in names {
            let name = match name {
                Value::String(name) => name,
                other => {
                    return Err(mapping_error(
                        project,
                        &format!("`{key}` entries must be strings, found {other}"),
                    ));
                }
            };
            packages_dir.ecosystem().validate(name).map_err(|e| mapping_error(project, &e.to_string()))?;

            requests.push(LinkRequest {
                packages_dir,
                name: name.clone(),
            });
        }
    }

    Ok(requests)
}

fn mapping_error(project: &Project, detail: &str) -> anyhow::Error {
    DevkitError::ConfigError {
        message: format!(
            "Unexpected `{SYMLINK_LOCAL_PACKAGES_PATH}` in {}: {detail}",
            project.file().display()
        ),
    }
    .into()
}

/// Closest ancestor of `project_dir` (1 = parent) holding a `name` directory.
pub fn find_local_checkout(project_dir: &Path, name: &str) -> Option<(usize, PathBuf)> {
    project_dir
        .ancestors()
        .skip(1)
        .take(SYMLINK_SEARCH_DEPTH)
        .enumerate()
        .find_map(|(index, ancestor)| {
            let candidate = ancestor.join(name);
            candidate.is_dir().then(|| (index + 1, candidate))
        })
}

/// Replace installed copies of the declared packages with local checkouts.
///
/// Stops at the first deletion or link failure; links created before it are kept.
pub fn run(project: &Project) -> Result<SymlinkReport> {
    let mut report = SymlinkReport::default();

    for request in link_requests(project)? {
        let installed = project.dir().join(request.packages_dir.as_str()).join(&request.name);

        // symlink_metadata so a dangling link still counts as installed
        if std::fs::symlink_metadata(&installed).is_err() {
            debug!("{} is not installed, skipping", request.name);
            report.skipped.push((request, SkipReason::NotInstalled));
            continue;
        }

        let Some((depth, target)) = find_local_checkout(project.dir(), &request.name) else {
            debug!("No local checkout of {} found, skipping", request.name);
            report.skipped.push((request, SkipReason::NoLocalCheckout));
            continue;
        };

        remove_path(&installed).map_err(|e| DevkitError::SymlinkFailed {
            path: installed.display().to_string(),
            reason: format!("unable to delete installed copy: {e}"),
        })?;
        symlink_dir(&target, &installed).map_err(|e| DevkitError::SymlinkFailed {
            path: installed.display().to_string(),
            reason: format!("unable to link to {}: {e}", target.display()),
        })?;

        info!("Linked {} -> {}", installed.display(), target.display());
        report.linked.push(LinkedPackage {
            request,
            installed,
            target,
            depth,
        });
    }

    Ok(report)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigCache;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    /// `<workspace>/a/b/project` with the given symlink mapping
    fn project_with_mapping(workspace: &Path, mapping: Value) -> Project {
        let dir = workspace.join("a").join("b").join("project");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("composer.json"),
            json!({
                "name": "acme/widget",
                "extra": {"clevercanyon": {
                    "brand": {"data": {"slug": "acme"}},
                    "post_update_cmd_handler": {"symlink_local_packages": mapping}
                }}
            })
            .to_string(),
        )
        .unwrap();

        let home = workspace.join("home");
        fs::create_dir_all(&home).unwrap();
        let mut cache = ConfigCache::new();
        Project::load_with_dev_dir(&dir, Some(&home), &mut cache).unwrap()
    }

    #[test]
    fn test_link_requests_validation() {
        let workspace = TempDir::new().unwrap();

        let project = project_with_mapping(workspace.path(), Value::Null);
        assert!(link_requests(&project).unwrap().is_empty());

        let project = project_with_mapping(
            workspace.path(),
            json!({"vendor": ["acme/base"], "node_modules": ["@acme/ui", "lodash"]}),
        );
        let requests = link_requests(&project).unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].packages_dir, PackagesDir::Vendor);
        assert_eq!(requests[2].name, "lodash");

        for bad in [
            json!(["acme/base"]),
            json!({"bower_components": ["x"]}),
            json!({"vendor": "acme/base"}),
            json!({"vendor": [1]}),
            json!({"vendor": ["lodash"]}),
            json!({"node_modules": ["acme/base"]}),
        ] {
            let project = project_with_mapping(workspace.path(), bad.clone());
            let error = link_requests(&project).unwrap_err();
            assert!(
                matches!(error.downcast_ref::<DevkitError>(), Some(DevkitError::ConfigError { .. })),
                "{bad} should be a config error"
            );
        }
    }

    #[test]
    fn test_find_local_checkout_prefers_closest() {
        let workspace = TempDir::new().unwrap();
        let project_dir = workspace.path().join("a").join("b").join("project");
        fs::create_dir_all(&project_dir).unwrap();

        assert_eq!(find_local_checkout(&project_dir, "acme/base"), None);

        let far = workspace.path().join("a").join("acme").join("base");
        fs::create_dir_all(&far).unwrap();
        assert_eq!(find_local_checkout(&project_dir, "acme/base"), Some((2, far)));

        let near = workspace.path().join("a").join("b").join("acme").join("base");
        fs::create_dir_all(&near).unwrap();
        assert_eq!(find_local_checkout(&project_dir, "acme/base"), Some((1, near)));
    }

    #[test]
    fn test_find_local_checkout_ignores_files() {
        let workspace = TempDir::new().unwrap();
        let project_dir = workspace.path().join("a").join("project");
        fs::create_dir_all(workspace.path().join("a").join("acme")).unwrap();
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(workspace.path().join("a").join("acme").join("base"), "not a dir").unwrap();

        assert_eq!(find_local_checkout(&project_dir, "acme/base"), None);
    }

    #[test]
    fn test_find_local_checkout_depth_limit() {
        let workspace = TempDir::new().unwrap();
        let mut project_dir = workspace.path().to_path_buf();
        for level in 0..11 {
            project_dir.push(format!("l{level}"));
        }
        fs::create_dir_all(&project_dir).unwrap();

        // workspace is 11 levels above the project
        fs::create_dir_all(workspace.path().join("acme").join("base")).unwrap();
        assert_eq!(find_local_checkout(&project_dir, "acme/base"), None);

        // l0 is exactly 10 levels above
        let at_limit = workspace.path().join("l0").join("acme").join("base");
        fs::create_dir_all(&at_limit).unwrap();
        assert_eq!(find_local_checkout(&project_dir, "acme/base"), Some((10, at_limit)));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_links_two_levels_up() {
        crate::test_utils::init_test_logging(None);
        let workspace = TempDir::new().unwrap();
        let project = project_with_mapping(workspace.path(), json!({"vendor": ["acme/base"]}));

        let installed = project.dir().join("vendor").join("acme").join("base");
        fs::create_dir_all(&installed).unwrap();
        fs::write(installed.join("composer.json"), "{}").unwrap();

        let checkout = workspace.path().join("a").join("acme").join("base");
        fs::create_dir_all(&checkout).unwrap();

        let report = run(&project).unwrap();

        assert_eq!(report.linked.len(), 1);
        assert_eq!(report.linked[0].depth, 2);
        assert!(fs::symlink_metadata(&installed).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&installed).unwrap(), checkout);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_skips_missing_and_unmatched() {
        let workspace = TempDir::new().unwrap();
        let project = project_with_mapping(
            workspace.path(),
            json!({"vendor": ["acme/missing", "acme/lonely"]}),
        );
        fs::create_dir_all(project.dir().join("vendor").join("acme").join("lonely")).unwrap();
        // A checkout exists for the missing package, but it isn't installed
        fs::create_dir_all(workspace.path().join("a").join("acme").join("missing")).unwrap();

        let report = run(&project).unwrap();

        assert!(report.linked.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].1, SkipReason::NotInstalled);
        assert_eq!(report.skipped[1].1, SkipReason::NoLocalCheckout);
        assert!(project.dir().join("vendor/acme/lonely").is_dir());
        assert!(!project.dir().join("vendor/acme/missing").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_repairs_dangling_symlink_and_is_idempotent() {
        let workspace = TempDir::new().unwrap();
        let project = project_with_mapping(workspace.path(), json!({"node_modules": ["@acme/ui"]}));

        let installed = project.dir().join("node_modules").join("@acme").join("ui");
        fs::create_dir_all(installed.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(workspace.path().join("gone"), &installed).unwrap();

        let checkout = workspace.path().join("a").join("b").join("@acme").join("ui");
        fs::create_dir_all(&checkout).unwrap();

        run(&project).unwrap();
        assert_eq!(fs::read_link(&installed).unwrap(), checkout);

        let report = run(&project).unwrap();
        assert_eq!(report.linked.len(), 1);
        assert_eq!(fs::read_link(&installed).unwrap(), checkout);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_aborts_on_failed_delete_and_keeps_earlier_links() {
        use std::os::unix::fs::PermissionsExt;

        let workspace = TempDir::new().unwrap();
        let project = project_with_mapping(
            workspace.path(),
            json!({"vendor": ["acme/base", "other/locked"]}),
        );

        let first = project.dir().join("vendor").join("acme").join("base");
        let second = project.dir().join("vendor").join("other").join("locked");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::create_dir_all(workspace.path().join("a").join("acme").join("base")).unwrap();
        fs::create_dir_all(workspace.path().join("a").join("other").join("locked")).unwrap();

        let locked_parent = second.parent().unwrap().to_path_buf();
        fs::set_permissions(&locked_parent, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores mode bits, so only assert when the check is meaningful
        let enforced = fs::File::create(locked_parent.join(".write-check")).is_err();
        let result = run(&project);
        fs::set_permissions(&locked_parent, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            let error = result.unwrap_err();
            match error.chain().find_map(|e| e.downcast_ref::<DevkitError>()) {
                Some(DevkitError::SymlinkFailed {
                    path,
                    ..
                }) => assert!(path.ends_with("locked")),
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(fs::symlink_metadata(&first).unwrap().file_type().is_symlink());
        }
    }
}
