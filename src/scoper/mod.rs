//! PHP-Scoper exclude-list generation
//!
//! PHP-Scoper prefixes every symbol in a build unless told otherwise. The
//! WordPress and WooCommerce globals must keep their names, so they are read
//! from the php-stubs packages and written into a generated `.scoper.php`:
//!
//! ```text
//! stub files ──parse──▶ ExcludeList ──dedupe + natural sort──▶ render ──▶ .scoper.php
//! ```
//!
//! - [`parser`] - tree-sitter walk collecting constants, classes and functions
//! - [`natural`] - natural ordering for the generated lists
//! - [`render`] - `tera` rendering of the PHP file

pub mod natural;
pub mod parser;
pub mod render;

pub use natural::{natural_cmp, natural_sort};
pub use parser::parse_stub;
pub use render::render;

use crate::core::{FileOperation, FileResultExt};
use crate::utils::fs::safe_write;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Symbol names PHP-Scoper must leave unprefixed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExcludeList {
    /// `const` and `define()` names
    pub constants: Vec<String>,
    /// Classes, interfaces and traits
    pub classes: Vec<String>,
    pub functions: Vec<String>,
}

impl ExcludeList {
    /// Append everything in `other`.
    pub fn extend(&mut self, other: ExcludeList) {
        self.constants.extend(other.constants);
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);
    }

    /// Drop duplicates and sort each list naturally.
    pub fn normalize(&mut self) {
        for names in [&mut self.constants, &mut self.classes, &mut self.functions] {
            let mut seen = HashSet::new();
            names.retain(|name| seen.insert(name.clone()));
            natural_sort(names);
        }
    }

    /// Total number of names across all three lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constants.len() + self.classes.len() + self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse every stub in `paths` (in order) into one normalized list.
pub fn generate<P: AsRef<Path>>(paths: &[P]) -> Result<ExcludeList> {
    let mut list = ExcludeList::default();

    for path in paths {
        let path = path.as_ref();
        info!("Parsing {}", path.display());

        let source = std::fs::read_to_string(path).with_file_context(
            FileOperation::Read,
            path,
            "collecting symbols from stub file",
            "scoper",
        )?;
        let names = parse_stub(&source, &path.display().to_string())?;
        list.extend(names);
    }

    list.normalize();
    Ok(list)
}

/// Regenerate the scoper config at `output` from `paths`.
pub fn update_config_file<P: AsRef<Path>>(paths: &[P], output: &Path) -> Result<ExcludeList> {
    let list = generate(paths)?;
    let contents = render(&list)?;

    safe_write(output, &contents)
        .with_context(|| format!("Failed to update PHP-Scoper config file {}", output.display()))?;
    info!(
        "Wrote {} ({} constants, {} classes, {} functions)",
        output.display(),
        list.constants.len(),
        list.classes.len(),
        list.functions.len()
    );

    Ok(list)
}
