//! Test workspace builder for simplified test setup
//!
//! Lays out a temporary workspace shaped like a developer's checkout tree:
//!
//! ```text
//! <root>/
//!   home/                 .dev.json lives here
//!   templates/            dotfile templates and .dotfiles.json
//!   <project path>/       composer.json, vendor/, node_modules/
//! ```
//!
//! Local package checkouts are placed relative to `<root>` with
//! [`TestWorkspaceBuilder::with_workspace_dir`].

use anyhow::Result;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{COMPOSER_FILE, DEV_FILE, DOTFILES_MANIFEST_FILE};

/// A builder for creating test workspaces with a fluent API
pub struct TestWorkspaceBuilder {
    temp_dir: TempDir,
    project_path: PathBuf,
    composer: Value,
    dev: Option<Value>,
    dotfiles_manifest: Option<Vec<String>>,
    files: Vec<(PathBuf, String)>,
    dirs: Vec<PathBuf>,
}

impl TestWorkspaceBuilder {
    /// Create a builder for a project named `acme/widget` with brand slug `acme-widget`
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            project_path: PathBuf::from("project"),
            composer: json!({
                "name": "acme/widget",
                "extra": {"clevercanyon": {"brand": {"data": {"slug": "acme-widget"}}}}
            }),
            dev: None,
            dotfiles_manifest: None,
            files: Vec::new(),
            dirs: Vec::new(),
        })
    }

    /// Place the project at `path` relative to the workspace root
    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = path.into();
        self
    }

    /// Replace the project's `composer.json`
    pub fn with_composer(mut self, composer: Value) -> Self {
        self.composer = composer;
        self
    }

    /// Set `extra.clevercanyon.<key>` in the project's `composer.json`
    pub fn with_namespace_value(mut self, key: &str, value: Value) -> Self {
        if let Some(ns) = self
            .composer
            .pointer_mut("/extra/clevercanyon")
            .and_then(Value::as_object_mut)
        {
            ns.insert(key.to_string(), value);
        }
        self
    }

    /// Write `home/.dev.json`
    pub fn with_dev_json(mut self, dev: Value) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Write `templates/.dotfiles.json` with the given manifest entries
    pub fn with_dotfiles_manifest(mut self, entries: &[&str]) -> Self {
        self.dotfiles_manifest = Some(entries.iter().map(|e| (*e).to_string()).collect());
        self
    }

    /// Add a file relative to the project directory
    pub fn with_project_file(mut self, path: &str, content: impl Into<String>) -> Self {
        let path = self.project_path.join(path);
        self.files.push((path, content.into()));
        self
    }

    /// Add a dotfile template relative to the templates directory
    pub fn with_template(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files.push((Path::new("templates").join(path), content.into()));
        self
    }

    /// Add an (empty) directory relative to the workspace root
    pub fn with_workspace_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Build the test workspace
    pub fn build(self) -> Result<TestWorkspace> {
        let root = self.temp_dir.path().to_path_buf();
        let project_dir = root.join(&self.project_path);
        let home_dir = root.join("home");
        let templates_dir = root.join("templates");

        for dir in [&project_dir, &home_dir, &templates_dir] {
            std::fs::create_dir_all(dir)?;
        }
        for dir in &self.dirs {
            std::fs::create_dir_all(root.join(dir))?;
        }

        std::fs::write(
            project_dir.join(COMPOSER_FILE),
            serde_json::to_string_pretty(&self.composer)?,
        )?;

        if let Some(dev) = &self.dev {
            std::fs::write(home_dir.join(DEV_FILE), serde_json::to_string_pretty(dev)?)?;
        }

        if let Some(entries) = &self.dotfiles_manifest {
            std::fs::write(
                templates_dir.join(DOTFILES_MANIFEST_FILE),
                serde_json::to_string_pretty(&json!({ "manifest": entries }))?,
            )?;
        }

        for (path, content) in &self.files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full_path, content)?;
        }

        Ok(TestWorkspace {
            _temp_dir: self.temp_dir,
            root,
            project_dir,
            home_dir,
            templates_dir,
        })
    }
}

/// A built test workspace
pub struct TestWorkspace {
    _temp_dir: TempDir, // Keep temp dir alive
    pub root: PathBuf,
    pub project_dir: PathBuf,
    pub home_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl TestWorkspace {
    /// Path of `path` relative to the project directory
    pub fn project_path(&self, path: &str) -> PathBuf {
        self.project_dir.join(path)
    }

    /// Read a file relative to the project directory
    pub fn read_project_file(&self, path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.project_path(path))?)
    }

    /// Read and parse a JSON file relative to the project directory
    pub fn read_project_json(&self, path: &str) -> Result<Value> {
        Ok(serde_json::from_str(&self.read_project_file(path)?)?)
    }

    /// Create an installed package directory under the project (e.g. `vendor/acme/base`)
    pub fn install_package(&self, packages_dir: &str, name: &str) -> Result<PathBuf> {
        let dir = self.project_dir.join(packages_dir).join(name);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("installed.txt"), "installed copy")?;
        Ok(dir)
    }
}
