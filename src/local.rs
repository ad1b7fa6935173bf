//! Resolving the installed version from distribution metadata on disk
//!
//! The module is located on the search path the same way an import would
//! find it, then the sibling `<module>-*` directories (`.dist-info` or
//! `.egg-info`) are scanned for a `Version:` field.

use crate::error::{Result, VersionInfoError};
use crate::types::UNKNOWN;
use glob::{glob, Pattern};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Metadata file names, in the order they are tried
pub const METADATA_FILES: [&str; 2] = ["METADATA", "PKG-INFO"];

fn version_field() -> &'static Regex {
    static VERSION_FIELD: OnceLock<Regex> = OnceLock::new();
    VERSION_FIELD.get_or_init(|| {
        Regex::new(r"(?m)^Version: (\S+)\r?$").expect("version field pattern is valid")
    })
}

/// Extract the `Version:` field from metadata text
pub fn parse_version_field(contents: &str) -> Option<&str> {
    version_field()
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Locates an installed module and reads its distribution version
#[derive(Debug, Clone)]
pub struct LocalResolver {
    module: String,
    search_paths: Vec<PathBuf>,
}

impl LocalResolver {
    pub fn new<S: Into<String>>(module: S, search_paths: Vec<PathBuf>) -> Self {
        Self {
            module: module.into(),
            search_paths,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Find the module on the search path, first entry wins.
    ///
    /// Returns the package directory or the `.py` file of a plain module.
    pub fn locate_module(&self) -> Result<PathBuf> {
        for dir in &self.search_paths {
            let package_dir = dir.join(&self.module);
            if package_dir.join("__init__.py").is_file() {
                debug!("Found package {} in {}", self.module, dir.display());
                return Ok(package_dir);
            }

            let module_file = dir.join(format!("{}.py", self.module));
            if module_file.is_file() {
                debug!("Found module {} in {}", self.module, dir.display());
                return Ok(module_file);
            }
        }

        Err(VersionInfoError::PackageNotInstalled {
            module: self.module.clone(),
            searched: self.search_paths.len(),
        })
    }

    /// Resolve the installed version.
    ///
    /// Fails only when the module cannot be located or a candidate file
    /// cannot be read; missing metadata yields `"unknown"`.
    pub fn resolve(&self) -> Result<String> {
        let location = self.locate_module()?;

        for candidate in metadata_candidates(&location)? {
            let bytes = fs::read(&candidate).map_err(|source| VersionInfoError::MetadataError {
                path: candidate.display().to_string(),
                source,
            })?;
            let contents = String::from_utf8_lossy(&bytes);

            if let Some(version) = parse_version_field(&contents) {
                info!(
                    "Installed {} version {} (from {})",
                    self.module,
                    version,
                    candidate.display()
                );
                return Ok(version.to_string());
            }
            debug!("No Version field in {}", candidate.display());
        }

        debug!("No distribution metadata found for {}", self.module);
        Ok(UNKNOWN.to_string())
    }
}

/// Metadata files next to a located module, `METADATA` group first.
///
/// Each group is sorted by path so the result does not depend on directory
/// iteration order.
pub fn metadata_candidates(location: &Path) -> Result<Vec<PathBuf>> {
    // `neovim/` and `neovim.py` both pair with `neovim-*` siblings
    let stem = location.with_extension("");
    let prefix = Pattern::escape(&stem.to_string_lossy());

    let mut candidates = Vec::new();
    for file_name in METADATA_FILES {
        let pattern = format!("{}-*/{}", prefix, file_name);
        let paths = glob(&pattern)
            .map_err(|e| VersionInfoError::validation(format!("bad metadata pattern: {}", e)))?;

        let mut group: Vec<PathBuf> = paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!("Skipping unreadable metadata candidate: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        group.sort();
        candidates.extend(group);
    }

    Ok(candidates)
}
