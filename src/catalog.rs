//! Library catalog: supported library identifiers and the site each one is
//! searched on.
//!
//! The catalog is built once at startup and handed to
//! [`DocLookup`](crate::lookup::DocLookup) by value. Nothing mutates it after
//! construction.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Entries compiled into the binary
pub const BUILTIN_LIBRARIES: &[(&str, &str)] = &[
    ("flutter", "docs.flutter.dev"),
    ("stackoverflow", "stackoverflow.com"),
];

/// On-disk catalog format
///
/// ```json
/// {
///   "libraries": {
///     "flutter": "docs.flutter.dev",
///     "stackoverflow": "stackoverflow.com"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub libraries: BTreeMap<String, String>,
}

/// Immutable mapping from library identifier to site domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    /// Catalog with the built-in entries
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_LIBRARIES
                .iter()
                .map(|(library, domain)| (library.to_string(), domain.to_string()))
                .collect(),
        }
    }

    /// Build a catalog from arbitrary entries, validating each one
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (library, domain) in entries {
            let library = library.into().trim().to_string();
            let domain = domain.into().trim().to_string();
            validate_entry(&library, &domain)?;
            map.insert(library, domain);
        }

        if map.is_empty() {
            bail!("Catalog must contain at least one library");
        }

        Ok(Self { entries: map })
    }

    /// Parse a catalog from its JSON file representation
    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(content).context("Failed to parse catalog JSON")?;
        Self::from_entries(file.libraries)
    }

    /// Load a catalog file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Invalid catalog file: {}", path.display()))
    }

    /// Site domain for `library`, if catalogued
    pub fn domain(&self, library: &str) -> Option<&str> {
        self.entries.get(library).map(String::as_str)
    }

    pub fn contains(&self, library: &str) -> bool {
        self.entries.contains_key(library)
    }

    /// Library identifiers in sorted order
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(library, domain)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(library, domain)| (library.as_str(), domain.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_entry(library: &str, domain: &str) -> Result<()> {
    if library.is_empty() {
        bail!("Catalog library identifiers must not be empty");
    }
    if domain.is_empty() {
        bail!("Catalog entry '{library}' has an empty domain");
    }
    if domain.contains("://") {
        bail!("Catalog entry '{library}' must be a bare domain, not a URL: {domain}");
    }
    if domain.chars().any(char::is_whitespace) {
        bail!("Catalog entry '{library}' has whitespace in its domain: {domain}");
    }
    Ok(())
}
