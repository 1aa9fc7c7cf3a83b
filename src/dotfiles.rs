//! Dotfile template synchronization.
//!
//! Templates live in a directory carrying a `.dotfiles.json` manifest:
//!
//! ```json
//! { "manifest": [".editorconfig", ".github/workflows/ci.yml", "package.json"] }
//! ```
//!
//! Every file under the templates directory whose `/`-separated sub-path is
//! listed is copied into the project at the same sub-path, overwriting what is
//! there. `package.json` is the exception: when the project already has one, the
//! template's `devDependencies` and `config.clevercanyon` are merged into it.

use crate::config::deep_merge;
use crate::constants::{CONFIG_NAMESPACE, DOTFILES_MANIFEST_FILE, PACKAGE_JSON_FILE};
use crate::core::{DevkitError, FileOperation, FileOps, FileResultExt};
use crate::project::Project;
use crate::utils::fs::{ensure_parent_dir, safe_write, to_forward_slashes};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Contents of `.dotfiles.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DotfilesManifest {
    /// Sub-paths (relative to the templates directory, `/`-separated) to sync
    pub manifest: Vec<String>,
}

impl DotfilesManifest {
    /// Read `<templates_dir>/.dotfiles.json`.
    pub fn load(templates_dir: &Path) -> Result<Self> {
        let file = templates_dir.join(DOTFILES_MANIFEST_FILE);
        FileOps::ensure_readable(&file, "reading the dotfiles manifest", "dotfiles")?;

        let text = std::fs::read_to_string(&file).with_file_context(
            FileOperation::Read,
            &file,
            "reading the dotfiles manifest",
            "dotfiles",
        )?;
        serde_json::from_str(&text).map_err(|e| {
            DevkitError::ConfigParseError {
                file: file.display().to_string(),
                reason: format!("expected an object with a `manifest` array: {e}"),
            }
            .into()
        })
    }
}

/// What [`run`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Sub-paths copied over verbatim
    pub copied: Vec<String>,
    /// Sub-paths merged into an existing file
    pub merged: Vec<String>,
    /// Manifest entries with no matching template file
    pub missing: Vec<String>,
}

/// Sync the manifest-listed templates from `templates_dir` into `project`.
pub fn run(project: &Project, templates_dir: &Path) -> Result<SyncReport> {
    if std::fs::read_dir(templates_dir).is_err() {
        return Err(DevkitError::FileSystemError {
            operation: format!(
                "reading dotfiles templates directory {}",
                templates_dir.display()
            ),
            path: templates_dir.display().to_string(),
        }
        .into());
    }

    let manifest = DotfilesManifest::load(templates_dir)?;
    let wanted: HashSet<&str> = manifest.manifest.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut report = SyncReport::default();

    let walker = WalkDir::new(templates_dir).min_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.with_context(|| {
            format!("Failed to walk dotfiles templates in {}", templates_dir.display())
        })?;
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(templates_dir).with_context(|| {
            format!("{} is outside {}", entry.path().display(), templates_dir.display())
        })?;
        let subpath = to_forward_slashes(relative);
        if !wanted.contains(subpath.as_str()) {
            continue;
        }
        seen.insert(subpath.clone());

        let from = entry.path();
        let to = project.dir().join(relative);

        FileOps::ensure_readable(from, "reading dotfile template", "dotfiles")?;
        if to.is_file() {
            FileOps::ensure_readable(&to, "updating existing dotfile", "dotfiles")?;
            FileOps::ensure_writable(&to, "updating existing dotfile", "dotfiles")?;
        }

        if subpath == PACKAGE_JSON_FILE && to.is_file() {
            merge_package_json(from, &to, project.name())?;
            info!("Merged {}", to.display());
            report.merged.push(subpath);
        } else {
            ensure_parent_dir(&to)?;
            std::fs::copy(from, &to).with_file_context(
                FileOperation::Copy,
                &to,
                format!("installing dotfile from {}", from.display()),
                "dotfiles",
            )?;
            debug!("Copied {}", to.display());
            report.copied.push(subpath);
        }
    }

    for entry in &manifest.manifest {
        if !seen.contains(entry) {
            warn!("Dotfiles manifest lists {entry}, but no such template exists");
            report.missing.push(entry.clone());
        }
    }

    Ok(report)
}

/// Merge the template `package.json` at `from` into the project's at `to`.
fn merge_package_json(from: &Path, to: &Path, project_name: &str) -> Result<()> {
    let source = read_json_object(from)?;
    let mut destination = read_json_object(to)?;

    let source_deps = object_field(&source, "devDependencies", from)?;
    let source_config = namespace_config(&source, from)?;

    let mut deps = object_field(&destination, "devDependencies", to)?;
    let destination_config = namespace_config(&destination, to)?;

    // A package never depends on itself
    let scoped_name = format!("@{project_name}");
    for (package, version) in source_deps {
        if package == project_name || package == scoped_name {
            debug!("Not adding self-dependency {package} to {}", to.display());
            continue;
        }
        deps.insert(package, version);
    }
    let mut sorted: Vec<(String, Value)> = deps.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    destination.insert("devDependencies".to_string(), Value::Object(sorted.into_iter().collect()));

    let merged_config = deep_merge(Value::Object(destination_config), Value::Object(source_config));
    let mut config = object_field(&destination, "config", to)?;
    config.insert(CONFIG_NAMESPACE.to_string(), merged_config);
    destination.insert("config".to_string(), Value::Object(config));

    let mut text = serde_json::to_string_pretty(&Value::Object(destination))?;
    text.push('\n');
    safe_write(to, &text)
}

fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "merging package.json",
        "dotfiles",
    )?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DevkitError::ConfigParseError {
            file: path.display().to_string(),
            reason: "top-level JSON value must be an object".to_string(),
        }
        .into()),
        Err(e) => Err(DevkitError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()),
    }
}

/// Clone of the object at `key`; absent or `null` reads as empty.
fn object_field(map: &Map<String, Value>, key: &str, file: &Path) -> Result<Map<String, Value>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(object)) => Ok(object.clone()),
        Some(_) => Err(DevkitError::ConfigError {
            message: format!("Unexpected `{key}` in {}: must be an object", file.display()),
        }
        .into()),
    }
}

fn namespace_config(map: &Map<String, Value>, file: &Path) -> Result<Map<String, Value>> {
    let config = object_field(map, "config", file)?;
    object_field(&config, CONFIG_NAMESPACE, file)
        .with_context(|| format!("Unexpected `config.{CONFIG_NAMESPACE}` in {}", file.display()))
}
