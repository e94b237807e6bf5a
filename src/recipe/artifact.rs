// src/recipe/artifact.rs

//! Artifact patterns: which build outputs end up in the package
//!
//! Each rule pairs a glob with a destination category (`include`, `lib`,
//! `bin`, ...). The glob is matched against a file's path relative to the
//! rule's `src` directory, and `*` crosses directory separators, so `*.h`
//! picks up headers at any depth.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Which tree a rule searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The build output directory
    #[default]
    Build,
    /// The fetched source directory
    Source,
}

/// One packaging rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPattern {
    /// Glob matched against paths relative to `src`
    pub pattern: String,

    /// Destination category directory inside the package
    pub dst: String,

    /// Directory to search, relative to the origin tree (empty = its root)
    #[serde(default)]
    pub src: String,

    /// Keep the path below `src`; when false, files land directly in `dst`
    #[serde(default = "default_keep_path")]
    pub keep_path: bool,

    #[serde(default)]
    pub from: Origin,
}

fn default_keep_path() -> bool {
    true
}

/// A file selected for copying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    /// Absolute or origin-relative path of the matched file
    pub source: PathBuf,
    /// Destination relative to the package directory
    pub destination: PathBuf,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

impl ArtifactPattern {
    pub fn new(pattern: &str, dst: &str, src: &str, keep_path: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            dst: dst.to_string(),
            src: src.to_string(),
            keep_path,
            from: Origin::Build,
        }
    }

    /// Compile the glob, reporting bad patterns as parse errors
    pub fn compile(&self) -> Result<Pattern> {
        if self.pattern.is_empty() {
            return Err(Error::ParseError("Artifact pattern cannot be empty".to_string()));
        }
        Pattern::new(&self.pattern).map_err(|e| {
            Error::ParseError(format!("Invalid artifact pattern '{}': {}", self.pattern, e))
        })
    }

    /// Check that `dst` and `src` stay inside their trees
    pub fn check_paths(&self) -> Result<()> {
        if self.dst.is_empty() || !is_contained(&self.dst) {
            return Err(Error::ParseError(format!(
                "Artifact destination '{}' must be a non-empty relative path",
                self.dst
            )));
        }
        if !self.src.is_empty() && !is_contained(&self.src) {
            return Err(Error::ParseError(format!(
                "Artifact source '{}' must be a relative path",
                self.src
            )));
        }
        Ok(())
    }

    /// Enumerate matching files below `root`, sorted by path
    ///
    /// A missing `src` directory is the same as no matches.
    pub fn collect(&self, root: &Path) -> Result<Vec<PlannedCopy>> {
        let pattern = self.compile()?;
        let base = if self.src.is_empty() {
            root.to_path_buf()
        } else {
            root.join(&self.src)
        };

        if !base.is_dir() {
            debug!("Skipping {}: {} does not exist", self.pattern, base.display());
            return Ok(Vec::new());
        }

        let mut copies = Vec::new();
        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::PackageFailed(format!("Failed to scan {}: {}", base.display(), e))
            })?;

            // Symlinked libraries (libfoo.so -> libfoo.so.1) count as files
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }

            let relative = match entry.path().strip_prefix(&base) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let candidate = relative.to_string_lossy().replace('\\', "/");
            if !pattern.matches_with(&candidate, MATCH_OPTIONS) {
                continue;
            }

            let destination = if self.keep_path {
                Path::new(&self.dst).join(relative)
            } else {
                Path::new(&self.dst).join(entry.file_name())
            };

            copies.push(PlannedCopy {
                source: entry.path().to_path_buf(),
                destination,
            });
        }

        Ok(copies)
    }
}

/// Whether `path` is relative and never climbs out with `..`
pub(crate) fn is_contained(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// The built-in rule table: headers, static libs, import libs, DLLs and
/// shared objects
pub fn default_rules() -> Vec<ArtifactPattern> {
    vec![
        ArtifactPattern::new("*.h", "include", "include", true),
        ArtifactPattern::new("*.a", "lib", "src", false),
        ArtifactPattern::new("*.lib", "lib", "src", false),
        ArtifactPattern::new("*.dll", "bin", "src", false),
        ArtifactPattern::new("*.so*", "lib", "src", false),
        ArtifactPattern::new("*.dylib*", "lib", "src", false),
    ]
}
