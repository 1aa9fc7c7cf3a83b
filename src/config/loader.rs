//! Directory-based loading of `composer.json` and `.dev.json`.
//!
//! The composer loader optionally narrows the document to one namespace under
//! `extra`, pulling in the same namespace from every package listed in that
//! namespace's `@extends-packages` directive. Extended packages are always read
//! from the top-level project's `vendor/` directory, including transitive ones.
//!
//! Merge order for a namespace subtree is: extended packages in listed order,
//! then the declaring document's own subtree on top.

use super::cache::{ConfigCache, DocumentKind};
use super::merge::{interpolate, merge_layers};
use crate::constants::{
    COMPOSER_FILE, DEV_FILE, DEV_JSON_DIR_ENV, EXTENDS_PACKAGES_KEY, PROJECT_DIR_VAR,
    PROJECT_NAME_VAR, VENDOR_DIR,
};
use crate::core::DevkitError;
use crate::package_name::Ecosystem;
use crate::utils::fs::absolutize;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Outcome of reading one config file from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFile {
    /// No file at the path
    Absent,
    /// The file exists but could not be read, decoded, or is not a JSON object
    Malformed {
        /// Why reading or decoding failed
        reason: String,
    },
    /// A JSON object
    Document(Map<String, Value>),
}

impl ConfigFile {
    /// Read and decode `path`.
    pub fn read(path: &Path) -> Self {
        if !path.is_file() {
            return Self::Absent;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                return Self::Malformed {
                    reason: format!("unable to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Self::Document(map),
            Ok(other) => Self::Malformed {
                reason: format!(
                    "top-level JSON value must be an object, found {}",
                    json_type_name(&other)
                ),
            },
            Err(e) => Self::Malformed {
                reason: format!("unable to decode JSON: {e}"),
            },
        }
    }

    /// Collapse into a document, `None` for [`ConfigFile::Absent`].
    pub fn into_document(self, path: &Path) -> Result<Option<Map<String, Value>>, DevkitError> {
        match self {
            Self::Absent => Ok(None),
            Self::Malformed {
                reason,
            } => Err(DevkitError::ConfigParseError {
                file: path.display().to_string(),
                reason,
            }),
            Self::Document(map) => Ok(Some(map)),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Take the object stored at `key`, leaving a placeholder in the same position.
///
/// Anything that is not an object (including a missing key) comes back empty.
fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.get_mut(key).map(Value::take) {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    }
}

/// One package on the active `@extends-packages` resolution chain.
#[derive(Debug, Clone)]
struct ChainLink {
    dir: PathBuf,
    label: String,
}

/// Loads config documents through a borrowed [`ConfigCache`].
///
/// # Examples
///
/// ```rust,no_run
/// use composer_devkit::config::{ConfigCache, ConfigLoader};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut cache = ConfigCache::new();
/// let mut loader = ConfigLoader::new(&mut cache);
///
/// let composer = loader.composer(Path::new("."), Some("clevercanyon"))?;
/// println!("{}", composer["extra"]);
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader<'c> {
    cache: &'c mut ConfigCache,
}

impl<'c> ConfigLoader<'c> {
    /// Create a loader over `cache`.
    pub fn new(cache: &'c mut ConfigCache) -> Self {
        Self {
            cache,
        }
    }

    /// Load `<dir>/composer.json`.
    ///
    /// With a `namespace`, `extra` is replaced by the resolved, interpolated
    /// `extra.<namespace>` subtree. Without one, the document is returned with
    /// `extra` guaranteed to be an object. A missing file yields `{}`.
    pub fn composer(&mut self, dir: &Path, namespace: Option<&str>) -> Result<Rc<Value>> {
        let dir = absolutize(dir)?;

        if let Some(document) = self.cache.get(DocumentKind::Composer, &dir, namespace) {
            debug!("Using cached {} for {}", COMPOSER_FILE, dir.display());
            return Ok(document);
        }

        let document = self.load_composer(&dir, namespace)?;
        Ok(self.cache.insert(DocumentKind::Composer, &dir, namespace, document))
    }

    /// Load `<dir>/.dev.json`.
    ///
    /// `dir` defaults to `$DEVKIT_DEV_JSON_DIR`, then the home directory. With a
    /// `namespace`, the document becomes that top-level subtree (coerced to an
    /// object) with `${VAR}` placeholders resolved from the environment.
    pub fn dev(&mut self, dir: Option<&Path>, namespace: Option<&str>) -> Result<Rc<Value>> {
        let dir = match dir {
            Some(dir) => absolutize(dir)?,
            None => default_dev_dir()?,
        };

        if let Some(document) = self.cache.get(DocumentKind::Dev, &dir, namespace) {
            debug!("Using cached {} for {}", DEV_FILE, dir.display());
            return Ok(document);
        }

        let file = dir.join(DEV_FILE);
        debug!("Loading {}", file.display());

        let document = match ConfigFile::read(&file).into_document(&file)? {
            None => Value::Object(Map::new()),
            Some(mut document) => match namespace {
                Some(namespace) => {
                    let mut subtree = Value::Object(take_object(&mut document, namespace));
                    interpolate(&mut subtree, &HashMap::new());
                    subtree
                }
                None => Value::Object(document),
            },
        };

        Ok(self.cache.insert(DocumentKind::Dev, &dir, namespace, document))
    }

    fn load_composer(&mut self, dir: &Path, namespace: Option<&str>) -> Result<Value> {
        let file = dir.join(COMPOSER_FILE);
        debug!("Loading {}", file.display());

        let Some(mut document) = ConfigFile::read(&file).into_document(&file)? else {
            debug!("No {} in {}", COMPOSER_FILE, dir.display());
            return Ok(Value::Object(Map::new()));
        };

        let mut extra = take_object(&mut document, "extra");

        let Some(namespace) = namespace else {
            document.insert("extra".to_string(), Value::Object(extra));
            return Ok(Value::Object(document));
        };

        let project_name =
            document.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
        let own = take_object(&mut extra, namespace);

        let mut chain = vec![ChainLink {
            dir: dir.to_path_buf(),
            label: if project_name.is_empty() {
                dir.display().to_string()
            } else {
                project_name.clone()
            },
        }];
        let mut resolved = self
            .resolve_extends(dir, &file, own, namespace, &mut chain)
            .with_context(|| format!("Failed to resolve `{namespace}` config in {}", file.display()))?;

        let vars = HashMap::from([
            (PROJECT_DIR_VAR.to_string(), dir.display().to_string()),
            (PROJECT_NAME_VAR.to_string(), project_name),
        ]);
        interpolate(&mut resolved, &vars);

        document.insert("extra".to_string(), resolved);
        Ok(Value::Object(document))
    }

    /// Resolve the `@extends-packages` directive of `subtree`, declared in `file`.
    ///
    /// Returns the merged subtree with the directive removed.
    fn resolve_extends(
        &mut self,
        root_dir: &Path,
        file: &Path,
        mut subtree: Map<String, Value>,
        namespace: &str,
        chain: &mut Vec<ChainLink>,
    ) -> Result<Value> {
        let Some(directive) = subtree.shift_remove(EXTENDS_PACKAGES_KEY) else {
            return Ok(Value::Object(subtree));
        };

        let Value::Array(entries) = directive else {
            return Err(DevkitError::ConfigError {
                message: format!(
                    "Unexpected `{EXTENDS_PACKAGES_KEY}` directive in {}: must be an array",
                    file.display()
                ),
            }
            .into());
        };

        let mut layers = Vec::with_capacity(entries.len() + 1);

        for entry in entries {
            let package_name = match entry {
                Value::String(package_name) => package_name,
                other => {
                    return Err(DevkitError::InvalidPackageName {
                        name: other.to_string(),
                        reason: format!(
                            "`{EXTENDS_PACKAGES_KEY}` entries in {} must be strings",
                            file.display()
                        ),
                    }
                    .into());
                }
            };

            Ecosystem::Composer.validate(&package_name).with_context(|| {
                format!("Unexpected `{EXTENDS_PACKAGES_KEY}` entry in {}", file.display())
            })?;

            let package_dir = root_dir.join(VENDOR_DIR).join(&package_name);
            let package_file = package_dir.join(COMPOSER_FILE);

            if !package_file.is_file() {
                return Err(DevkitError::MissingExtendsPackage {
                    package: package_name,
                    file: package_file.display().to_string(),
                }
                .into());
            }

            if chain.iter().any(|link| link.dir == package_dir) {
                let mut labels: Vec<&str> = chain.iter().map(|link| link.label.as_str()).collect();
                labels.push(&package_name);
                return Err(DevkitError::CircularDependency {
                    chain: labels.join(" -> "),
                }
                .into());
            }

            let resolved = match self.cache.get_package(root_dir, &package_dir, namespace) {
                Some(resolved) => resolved,
                None => {
                    debug!("Extending `{namespace}` config with {package_name}");
                    chain.push(ChainLink {
                        dir: package_dir.clone(),
                        label: package_name.clone(),
                    });
                    let result = self.load_package(root_dir, &package_file, namespace, chain);
                    chain.pop();
                    self.cache.insert_package(root_dir, &package_dir, namespace, result?)
                }
            };

            layers.push(Value::clone(&resolved));
        }

        layers.push(Value::Object(subtree));
        Ok(merge_layers(layers))
    }

    /// Resolved (not interpolated) namespace subtree of one extended package.
    fn load_package(
        &mut self,
        root_dir: &Path,
        package_file: &Path,
        namespace: &str,
        chain: &mut Vec<ChainLink>,
    ) -> Result<Value> {
        let Some(mut document) = ConfigFile::read(package_file).into_document(package_file)? else {
            return Err(DevkitError::MissingExtendsPackage {
                package: chain.last().map(|link| link.label.clone()).unwrap_or_default(),
                file: package_file.display().to_string(),
            }
            .into());
        };
        let mut extra = take_object(&mut document, "extra");
        let own = take_object(&mut extra, namespace);

        self.resolve_extends(root_dir, package_file, own, namespace, chain)
    }
}

/// Directory holding `.dev.json` when none is given explicitly.
pub fn default_dev_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DEV_JSON_DIR_ENV).filter(|v| !v.is_empty()) {
        return absolutize(Path::new(&dir));
    }

    dirs::home_dir().ok_or_else(|| {
        DevkitError::ConfigError {
            message: format!(
                "Could not determine the home directory for {DEV_FILE}; set {DEV_JSON_DIR_ENV}"
            ),
        }
        .into()
    })
}
