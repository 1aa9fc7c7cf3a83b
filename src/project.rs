//! Project descriptor for a Composer package checkout.
//!
//! A [`Project`] is built once per invocation from `<dir>/composer.json` and the
//! developer's `.dev.json`, both narrowed to [`CONFIG_NAMESPACE`]. It validates
//! the project's identity up front so later steps can rely on `name` and
//! `brand_slug` being present.

use crate::config::{ConfigCache, ConfigLoader, lookup, lookup_str};
use crate::constants::{BRAND_SLUG_PATH, COMPOSER_FILE, CONFIG_NAMESPACE};
use crate::core::DevkitError;
use crate::package_name::Ecosystem;
use crate::utils::fs::absolutize;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// A validated project directory and its resolved configuration.
#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
    file: PathBuf,
    json: Rc<Value>,
    dev_json: Rc<Value>,
    name: String,
    brand_slug: String,
    brand_var: String,
}

impl Project {
    /// Load the project at `dir`, reading `.dev.json` from its default location.
    pub fn load(dir: &Path, cache: &mut ConfigCache) -> Result<Self> {
        Self::load_with_dev_dir(dir, None, cache)
    }

    /// Load the project at `dir`, reading `.dev.json` from `dev_dir` when given.
    ///
    /// # Errors
    ///
    /// - `composer.json` is missing
    /// - `name` is missing or not a valid Composer package name
    /// - `extra.clevercanyon.brand.data.slug` is missing or empty
    /// - either config file is malformed or its extends chain cannot be resolved
    pub fn load_with_dev_dir(
        dir: &Path,
        dev_dir: Option<&Path>,
        cache: &mut ConfigCache,
    ) -> Result<Self> {
        let dir = absolutize(dir)?;
        let file = dir.join(COMPOSER_FILE);

        if !file.is_file() {
            return Err(DevkitError::ProjectError {
                message: format!("missing {}", file.display()),
            }
            .into());
        }

        let mut loader = ConfigLoader::new(cache);
        let dev_json = loader
            .dev(dev_dir, Some(CONFIG_NAMESPACE))
            .context("Failed to load developer config")?;
        let json = loader
            .composer(&dir, Some(CONFIG_NAMESPACE))
            .with_context(|| format!("Failed to load project config for {}", dir.display()))?;

        let name = match json.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => {
                return Err(DevkitError::ProjectError {
                    message: format!("`name` is missing from {}", file.display()),
                }
                .into());
            }
        };
        Ecosystem::Composer.validate(&name).context("Invalid project name")?;

        let brand_slug = json
            .get("extra")
            .and_then(|extra| lookup_str(extra, BRAND_SLUG_PATH))
            .unwrap_or_default()
            .to_string();
        if brand_slug.is_empty() {
            return Err(DevkitError::ProjectError {
                message: format!(
                    "`extra.{CONFIG_NAMESPACE}.{BRAND_SLUG_PATH}` is missing from {}",
                    file.display()
                ),
            }
            .into());
        }
        let brand_var = brand_slug.replace('-', "_");

        debug!("Loaded project {name} ({brand_slug}) from {}", dir.display());

        Ok(Self {
            dir,
            file,
            json,
            dev_json,
            name,
            brand_slug,
            brand_var,
        })
    }

    /// Absolute, normalized project directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the project's `composer.json`.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The whole resolved `composer.json`, with `extra` narrowed to the namespace.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Resolved namespace subtree (`extra` of [`json`](Self::json)).
    pub fn config(&self) -> &Value {
        // The loader always stores an object under `extra`
        &self.json["extra"]
    }

    /// Namespace subtree of the developer's `.dev.json`.
    pub fn dev_json(&self) -> &Value {
        &self.dev_json
    }

    /// Composer package name, e.g. `acme/widget`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand_slug(&self) -> &str {
        &self.brand_slug
    }

    /// Brand slug with `-` replaced by `_`, safe for identifiers.
    pub fn brand_var(&self) -> &str {
        &self.brand_var
    }

    /// Dotted-path lookup into the resolved namespace subtree.
    pub fn config_value(&self, path: &str) -> Option<&Value> {
        lookup(self.config(), path)
    }

    /// `true` if `<dir>/<subpath>` is a directory.
    pub fn has_dir(&self, subpath: impl AsRef<Path>) -> bool {
        self.path_within(subpath.as_ref()).is_dir()
    }

    /// `true` if `<dir>/<subpath>` is a file.
    pub fn has_file(&self, subpath: impl AsRef<Path>) -> bool {
        self.path_within(subpath.as_ref()).is_file()
    }

    /// `<dir>/<subpath>`, with any root or prefix of `subpath` dropped so an
    /// absolute subpath still resolves under the project directory.
    fn path_within(&self, subpath: &Path) -> PathBuf {
        let relative: PathBuf = subpath
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        self.dir.join(relative)
    }
}
