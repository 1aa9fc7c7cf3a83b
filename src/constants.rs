//! Global constants used throughout the devkit codebase.
//!
//! File names, config paths and environment variable names live here so the
//! loader, the project descriptor and the CLI agree on them.

/// Namespace under `extra` in `composer.json` (and top-level in `~/.dev.json`)
/// that devkit reads its configuration from.
pub const CONFIG_NAMESPACE: &str = "clevercanyon";

/// Project config file name.
pub const COMPOSER_FILE: &str = "composer.json";

/// Personal dev config file name, looked up in the home directory.
pub const DEV_FILE: &str = ".dev.json";

/// Reserved key holding the list of packages a namespace extends.
pub const EXTENDS_PACKAGES_KEY: &str = "@extends-packages";

/// Composer install directory for packages; also where extended packages live.
pub const VENDOR_DIR: &str = "vendor";

/// npm install directory for packages.
pub const NODE_MODULES_DIR: &str = "node_modules";

/// Maximum package name length in bytes.
///
/// npm documents 214. Composer documents no limit, so the same value is used.
pub const PACKAGE_NAME_MAX_BYTES: usize = 214;

/// Dotted path (inside the resolved namespace) of the project's brand slug.
pub const BRAND_SLUG_PATH: &str = "brand.data.slug";

/// Dotted path (inside the resolved namespace) of the local symlink mapping.
pub const SYMLINK_LOCAL_PACKAGES_PATH: &str = "post_update_cmd_handler.symlink_local_packages";

/// How many ancestor directories are searched for a local package checkout.
pub const SYMLINK_SEARCH_DEPTH: usize = 10;

/// Manifest listing which dotfile templates are synced.
pub const DOTFILES_MANIFEST_FILE: &str = ".dotfiles.json";

/// Dotfile sub-path that is merged instead of overwritten.
pub const PACKAGE_JSON_FILE: &str = "package.json";

/// Default dotfiles templates directory, relative to the project directory.
pub const DEFAULT_DOTFILES_SUBDIR: &str = "vendor/clevercanyon/utilities-dev/src/libraries/dotfiles";

/// Overrides the directory holding `.dev.json` (defaults to the home directory).
pub const DEV_JSON_DIR_ENV: &str = "DEVKIT_DEV_JSON_DIR";

/// Overrides the dotfiles templates directory.
pub const DOTFILES_DIR_ENV: &str = "DEVKIT_DOTFILES_DIR";

/// Set by Composer when running with dev dependencies.
pub const COMPOSER_DEV_MODE_ENV: &str = "COMPOSER_DEV_MODE";

/// Synthetic interpolation variable holding the project directory.
pub const PROJECT_DIR_VAR: &str = "PROJECT_DIR";

/// Synthetic interpolation variable holding the project package name.
pub const PROJECT_NAME_VAR: &str = "PROJECT_NAME";

/// Stub files parsed by `scoper-config` when none are given, relative to the
/// working directory.
pub const DEFAULT_SCOPER_STUBS: [&str; 3] = [
    "vendor/php-stubs/wordpress-globals/wordpress-globals.php",
    "vendor/php-stubs/wordpress-stubs/wordpress-stubs.php",
    "vendor/php-stubs/woocommerce-stubs/woocommerce-stubs.php",
];

/// Where `scoper-config` writes the generated config when no output is given.
pub const DEFAULT_SCOPER_OUTPUT: &str = "src/libraries/dotfiles/.scoper.php";
