//! Package identity validation for the Composer and npm ecosystems.
//!
//! Composer names are always `vendor/name`. npm names are `name` or
//! `@scope/name`. Both are lowercase and limited to
//! [`PACKAGE_NAME_MAX_BYTES`] bytes.

use crate::constants::{NODE_MODULES_DIR, PACKAGE_NAME_MAX_BYTES, VENDOR_DIR};
use crate::core::DevkitError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const COMPOSER_PATTERN: &str =
    r"^([a-z0-9](?:[_.-]?[a-z0-9]+)*)/([a-z0-9](?:(?:[_.]?|-{0,2})[a-z0-9]+)*)$";
const NPM_PATTERN: &str =
    r"^(?:(@[a-z0-9](?:[_.-]?[a-z0-9]+)*)/)?([a-z0-9](?:(?:[_.]?|-{0,2})[a-z0-9]+)*)$";

/// Package ecosystem a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    /// Composer (`vendor/`)
    Composer,
    /// npm (`node_modules/`)
    Npm,
}

impl Ecosystem {
    fn pattern(self) -> &'static Regex {
        static COMPOSER: OnceLock<Regex> = OnceLock::new();
        static NPM: OnceLock<Regex> = OnceLock::new();
        match self {
            Self::Composer => COMPOSER
                .get_or_init(|| Regex::new(COMPOSER_PATTERN).expect("composer pattern is valid")),
            Self::Npm => NPM.get_or_init(|| Regex::new(NPM_PATTERN).expect("npm pattern is valid")),
        }
    }

    /// Check `name` against this ecosystem's pattern and the byte limit.
    pub fn validate(self, name: &str) -> Result<(), DevkitError> {
        if name.is_empty() {
            return Err(DevkitError::InvalidPackageName {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        if name.len() > PACKAGE_NAME_MAX_BYTES {
            return Err(DevkitError::InvalidPackageName {
                name: name.to_string(),
                reason: format!(
                    "name is {} bytes, the limit is {PACKAGE_NAME_MAX_BYTES}",
                    name.len()
                ),
            });
        }
        if !self.pattern().is_match(name) {
            return Err(DevkitError::InvalidPackageName {
                name: name.to_string(),
                reason: format!("does not match the {self} naming pattern `{}`", self.pattern()),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composer => write!(f, "Composer"),
            Self::Npm => write!(f, "npm"),
        }
    }
}

/// One of the two fixed dependency install directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackagesDir {
    /// `vendor`
    Vendor,
    /// `node_modules`
    NodeModules,
}

impl PackagesDir {
    /// Directory name relative to the project root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vendor => VENDOR_DIR,
            Self::NodeModules => NODE_MODULES_DIR,
        }
    }

    /// Ecosystem whose names live in this directory.
    #[must_use]
    pub const fn ecosystem(self) -> Ecosystem {
        match self {
            Self::Vendor => Ecosystem::Composer,
            Self::NodeModules => Ecosystem::Npm,
        }
    }
}

impl FromStr for PackagesDir {
    type Err = DevkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VENDOR_DIR => Ok(Self::Vendor),
            NODE_MODULES_DIR => Ok(Self::NodeModules),
            other => Err(DevkitError::ConfigError {
                message: format!(
                    "Unknown packages directory `{other}`, expected `{VENDOR_DIR}` or `{NODE_MODULES_DIR}`"
                ),
            }),
        }
    }
}

impl fmt::Display for PackagesDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_names_accepted() {
        for name in [
            "acme/widget",
            "acme/base",
            "clevercanyon/utilities-dev",
            "a1/b2",
            "my.vendor/pkg_name",
            "vendor/double--dash",
            "php-stubs/wordpress-stubs",
        ] {
            assert!(Ecosystem::Composer.validate(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_composer_names_rejected() {
        for name in [
            "",
            "widget",
            "Acme/Widget",
            "acme/widget/extra",
            "-acme/widget",
            "acme/widget-",
            "acme/triple---dash",
            "@acme/widget",
            "acme /widget",
        ] {
            assert!(Ecosystem::Composer.validate(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_npm_names() {
        for name in ["lodash", "@acme/widget", "@clevercanyon/utilities", "a.b_c"] {
            assert!(Ecosystem::Npm.validate(name).is_ok(), "{name} should be valid");
        }
        for name in ["", "Lodash", "acme/widget", "@acme", "@/widget", "@acme/widget/x"] {
            assert!(Ecosystem::Npm.validate(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_byte_limit_applies_to_both_ecosystems() {
        let at_limit = format!("acme/{}", "a".repeat(PACKAGE_NAME_MAX_BYTES - 5));
        assert_eq!(at_limit.len(), PACKAGE_NAME_MAX_BYTES);
        assert!(Ecosystem::Composer.validate(&at_limit).is_ok());

        let over = format!("acme/{}", "a".repeat(PACKAGE_NAME_MAX_BYTES - 4));
        let err = Ecosystem::Composer.validate(&over).unwrap_err();
        assert!(matches!(err, DevkitError::InvalidPackageName { .. }));
        assert!(err.to_string().contains("limit"));

        let npm_over = "a".repeat(PACKAGE_NAME_MAX_BYTES + 1);
        assert!(Ecosystem::Npm.validate(&npm_over).is_err());
        assert!(Ecosystem::Npm.validate(&"a".repeat(PACKAGE_NAME_MAX_BYTES)).is_ok());
    }

    #[test]
    fn test_packages_dir_from_str() {
        assert_eq!("vendor".parse::<PackagesDir>().unwrap(), PackagesDir::Vendor);
        assert_eq!("node_modules".parse::<PackagesDir>().unwrap(), PackagesDir::NodeModules);
        assert_eq!(PackagesDir::Vendor.ecosystem(), Ecosystem::Composer);
        assert_eq!(PackagesDir::NodeModules.ecosystem(), Ecosystem::Npm);

        let err = "bower_components".parse::<PackagesDir>().unwrap_err();
        assert!(matches!(err, DevkitError::ConfigError { .. }));
    }
}
