//! Per-invocation memo of loaded config documents.
//!
//! A [`ConfigCache`] is created by the caller (normally once per CLI run) and
//! handed to [`ConfigLoader`](super::ConfigLoader) by `&mut`. Nothing is ever
//! invalidated: files are assumed not to change while devkit runs.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Which loader produced a cached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `composer.json`
    Composer,
    /// `.dev.json`
    Dev,
}

type DocumentKey = (PathBuf, Option<String>);
type PackageKey = (PathBuf, PathBuf, String);

/// Loaded documents keyed by normalized directory and namespace.
///
/// Values are shared through [`Rc`], so two loads of the same `(dir, namespace)`
/// return pointer-equal documents.
#[derive(Debug, Default)]
pub struct ConfigCache {
    composer: HashMap<DocumentKey, Rc<Value>>,
    dev: HashMap<DocumentKey, Rc<Value>>,
    /// Resolved namespace subtrees of `@extends-packages` participants, keyed by
    /// `(root_dir, package_dir, namespace)`.
    packages: HashMap<PackageKey, Rc<Value>>,
}

impl ConfigCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self, kind: DocumentKind) -> &HashMap<DocumentKey, Rc<Value>> {
        match kind {
            DocumentKind::Composer => &self.composer,
            DocumentKind::Dev => &self.dev,
        }
    }

    pub(crate) fn get(
        &self,
        kind: DocumentKind,
        dir: &Path,
        namespace: Option<&str>,
    ) -> Option<Rc<Value>> {
        self.documents(kind).get(&(dir.to_path_buf(), namespace.map(str::to_string))).cloned()
    }

    pub(crate) fn insert(
        &mut self,
        kind: DocumentKind,
        dir: &Path,
        namespace: Option<&str>,
        document: Value,
    ) -> Rc<Value> {
        let document = Rc::new(document);
        let map = match kind {
            DocumentKind::Composer => &mut self.composer,
            DocumentKind::Dev => &mut self.dev,
        };
        map.insert((dir.to_path_buf(), namespace.map(str::to_string)), Rc::clone(&document));
        document
    }

    pub(crate) fn get_package(
        &self,
        root_dir: &Path,
        package_dir: &Path,
        namespace: &str,
    ) -> Option<Rc<Value>> {
        self.packages
            .get(&(root_dir.to_path_buf(), package_dir.to_path_buf(), namespace.to_string()))
            .cloned()
    }

    pub(crate) fn insert_package(
        &mut self,
        root_dir: &Path,
        package_dir: &Path,
        namespace: &str,
        subtree: Value,
    ) -> Rc<Value> {
        let subtree = Rc::new(subtree);
        self.packages.insert(
            (root_dir.to_path_buf(), package_dir.to_path_buf(), namespace.to_string()),
            Rc::clone(&subtree),
        );
        subtree
    }

    /// Number of cached top-level documents of `kind`.
    #[must_use]
    pub fn len(&self, kind: DocumentKind) -> usize {
        self.documents(kind).len()
    }

    /// Number of memoized `@extends-packages` participants.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}
