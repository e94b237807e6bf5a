// src/recipe/kitchen/config.rs

//! Configuration and result types for the Kitchen

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Configuration for the Kitchen
///
/// Can be loaded from a TOML file; any field left out keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KitchenConfig {
    /// Where sources are cloned
    pub source_dir: PathBuf,
    /// Where the build system runs
    pub build_dir: PathBuf,
    /// Where packaged artifacts are written (cleared on every package run)
    pub package_dir: PathBuf,
    /// Number of parallel compile jobs
    pub jobs: u32,
    /// Reuse an existing checkout instead of failing
    pub reuse_source: bool,
    /// Git executable
    pub git: String,
    /// CMake executable
    pub cmake: String,
    /// Setting overrides applied before command-line ones (`key=value`)
    pub settings: Vec<String>,
    /// Dependency roots resolved by the host, by requirement name
    pub deps: BTreeMap<String, PathBuf>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

impl KitchenConfig {
    /// Standard `source/`, `build/`, `package/` layout under `root`
    pub fn in_dir(root: &Path) -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            source_dir: root.join("source"),
            build_dir: root.join("build"),
            package_dir: root.join("package"),
            jobs,
            reuse_source: false,
            git: "git".to_string(),
            cmake: "cmake".to_string(),
            settings: Vec::new(),
            deps: BTreeMap::new(),
        }
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Per-user config file location (`<config dir>/kitchen/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kitchen").join("config.toml"))
    }

    /// Look up a resolved dependency root, ignoring case
    pub fn dep_root(&self, name: &str) -> Option<&Path> {
        self.deps
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_path())
    }

    /// Reject layouts where clearing the package dir would destroy
    /// sources or build output
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }

        let package = resolve(&self.package_dir)?;
        for (label, dir) in [("source", &self.source_dir), ("build", &self.build_dir)] {
            let other = resolve(dir)?;
            if package.starts_with(&other) || other.starts_with(&package) {
                return Err(Error::Config(format!(
                    "package dir {} overlaps the {} dir {}",
                    self.package_dir.display(),
                    label,
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

/// Absolute path with `.` and `..` folded away and symlinks resolved in
/// the part that already exists
fn resolve(path: &Path) -> Result<PathBuf> {
    let mut lexical = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing
        .canonicalize()
        .unwrap_or_else(|_| existing.to_path_buf());
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Result of the source step
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    /// The checkout directory
    pub checkout: PathBuf,
    /// Commit that was checked out, if git reported one
    pub commit: Option<String>,
    /// False when an existing checkout was reused
    pub cloned: bool,
    pub log: String,
}

/// Result of the build step
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub build_dir: PathBuf,
    /// Command lines that were run, in order
    pub commands: Vec<String>,
    pub log: String,
    pub warnings: Vec<String>,
}

/// Result of the package step
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub package_dir: PathBuf,
    pub package_id: String,
    /// Packaged files relative to the package dir, sorted
    pub files: Vec<PathBuf>,
    /// Path of the written manifest
    pub manifest: PathBuf,
}

/// Result of cooking a recipe end to end
#[derive(Debug)]
pub struct CookResult {
    pub package_dir: PathBuf,
    pub package_id: String,
    pub files: Vec<PathBuf>,
    pub source_commit: Option<String>,
    /// Combined source and build log
    pub log: String,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_config_default() {
        let config = KitchenConfig::default();
        assert!(config.jobs > 0);
        assert!(!config.reuse_source);
        assert_eq!(config.git, "git");
        assert_eq!(config.cmake, "cmake");
        assert!(config.package_dir.ends_with("package"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
jobs = 3
settings = ["build_type=Debug"]

[deps]
Boost = "/opt/boost"
"#,
        )
        .unwrap();

        let config = KitchenConfig::load(&path).unwrap();
        assert_eq!(config.jobs, 3);
        assert_eq!(config.settings, ["build_type=Debug"]);
        assert_eq!(config.git, "git");
        assert_eq!(config.dep_root("boost"), Some(Path::new("/opt/boost")));
        assert_eq!(config.dep_root("zlib"), None);
    }

    #[test]
    fn test_load_invalid_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "jobs = \"many\"").unwrap();
        assert!(matches!(KitchenConfig::load(&path), Err(Error::Config(_))));
        assert!(KitchenConfig::load(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_validate_overlapping_dirs() {
        let mut config = KitchenConfig::in_dir(Path::new("/work"));
        config.package_dir = PathBuf::from("/work/build/pkg");
        assert!(config.validate().is_err());

        let mut config = KitchenConfig::in_dir(Path::new("/work"));
        config.package_dir = PathBuf::from("/work");
        assert!(config.validate().is_err());

        let mut config = KitchenConfig::in_dir(Path::new("/work"));
        config.package_dir = PathBuf::from("/work/sibling/..");
        assert!(config.validate().is_err());

        let mut config = KitchenConfig::in_dir(Path::new("/work"));
        config.package_dir = PathBuf::from("/work/build/../out/./pkg");
        assert!(config.validate().is_ok());

        let mut config = KitchenConfig::in_dir(Path::new("/work"));
        config.jobs = 0;
        assert!(config.validate().is_err());
    }
}
