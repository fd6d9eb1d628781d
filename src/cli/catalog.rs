//! Catalog resolution for the server and the `lookup` subcommand
//!
//! Resolution order (first match wins):
//! 1. Explicit `--catalog <PATH>` / `DOCS_CATALOG`
//! 2. `{config_dir}/docs-lookup/catalog.json`
//! 3. Built-in catalog compiled into the binary
//!
//! Cross-platform config directory resolution:
//! - Linux: ~/.config/docs-lookup/
//! - macOS: ~/Library/Application Support/docs-lookup/
//! - Windows: %APPDATA%\docs-lookup\

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "docs-lookup";

/// Catalog file name inside [`CONFIG_DIR_NAME`]
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Location of the user-level catalog file, if the platform has a config dir
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CATALOG_FILE_NAME))
}

/// Resolve the catalog used for this process
pub fn resolve_catalog(explicit: Option<&Path>) -> Result<Catalog> {
    resolve_catalog_from(explicit, default_catalog_path().as_deref())
}

/// Resolution with the user-level path injected
pub fn resolve_catalog_from(explicit: Option<&Path>, user_path: Option<&Path>) -> Result<Catalog> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Catalog file not found: {}", path.display());
        }
        log::info!("Loading catalog from {}", path.display());
        return Catalog::from_file(path);
    }

    if let Some(path) = user_path.filter(|path| path.exists()) {
        log::info!("Loading catalog from {}", path.display());
        return Catalog::from_file(path);
    }

    log::debug!("Using built-in catalog");
    Ok(Catalog::builtin())
}
