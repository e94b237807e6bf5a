// src/recipe/kitchen/manifest.rs

//! Package manifest written next to the packaged artifacts
//!
//! `manifest.toml` identifies what was built and from which source, and
//! carries a SHA-256 per packaged file. It contains no timestamps, so two
//! package runs over the same build output produce identical manifests.

use super::source::SourceStamp;
use crate::error::{Error, Result};
use crate::hash::{hash_bytes, hash_file};
use crate::recipe::format::Recipe;
use crate::settings::BuildSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest file name inside the package dir
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Identify a binary package by the inputs it was built with
///
/// Only the settings the recipe declares contribute, so changing an
/// undeclared setting keeps the same id.
pub fn package_id(recipe: &Recipe, settings: &BuildSettings) -> String {
    let mut data = String::new();
    for (key, value) in settings.restricted_to(&recipe.build.settings) {
        data.push_str(&format!("setting:{}={}\n", key, value));
    }

    let mut requires: Vec<String> = recipe.requires.iter().map(|r| r.to_string()).collect();
    requires.sort();
    for req in requires {
        data.push_str(&format!("requires:{}\n", req));
    }

    let mut id = hash_bytes(data.as_bytes());
    id.truncate(40);
    id
}

/// Contents of `manifest.toml`
///
/// Field order matters for TOML output: plain values before tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub requires: Vec<String>,
    pub package: ManifestPackage,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    pub source: ManifestSource,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPackage {
    pub name: String,
    pub version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Commit the build actually used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// One packaged file, path relative to the package dir with `/` separators
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
}

impl PackageManifest {
    /// Describe the files already copied into `package_dir`
    pub fn build(
        recipe: &Recipe,
        settings: &BuildSettings,
        stamp: Option<&SourceStamp>,
        package_dir: &Path,
        files: &[PathBuf],
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(files.len());
        for rel in files {
            let sha256 = hash_file(&package_dir.join(rel)).map_err(|e| {
                Error::PackageFailed(format!("cannot hash {}: {}", rel.display(), e))
            })?;
            entries.push(ManifestFile {
                path: manifest_path(rel),
                sha256,
            });
        }
        entries.sort();

        Ok(Self {
            requires: recipe.requires.iter().map(|r| r.to_string()).collect(),
            package: ManifestPackage {
                name: recipe.package.name.clone(),
                version: recipe.package.version.clone(),
                id: package_id(recipe, settings),
                license: recipe.package.license.clone(),
            },
            settings: settings
                .restricted_to(&recipe.build.settings)
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            source: ManifestSource {
                url: recipe.source.git.clone(),
                rev: stamp
                    .and_then(|s| s.rev.clone())
                    .or_else(|| recipe.source.rev.clone()),
                commit: stamp.and_then(|s| s.commit.clone()),
            },
            files: entries,
        })
    }

    /// Write to `<package_dir>/manifest.toml`
    pub fn write(&self, package_dir: &Path) -> Result<PathBuf> {
        let path = package_dir.join(MANIFEST_FILE);
        let content = toml::to_string(self)
            .map_err(|e| Error::PackageFailed(format!("cannot encode manifest: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| Error::PackageFailed(format!("cannot write {}: {}", path.display(), e)))?;
        debug!("Wrote manifest {}", path.display());
        Ok(path)
    }

    /// Read the manifest from a package dir
    pub fn read(package_dir: &Path) -> Result<Self> {
        let path = package_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::ParseError(format!("Invalid {}: {}", path.display(), e)))
    }

    /// Re-hash every listed file; returns the paths that are missing or changed
    pub fn verify(&self, package_dir: &Path) -> Result<Vec<String>> {
        let mut bad = Vec::new();
        for file in &self.files {
            let path = package_dir.join(&file.path);
            if !path.is_file() {
                bad.push(file.path.clone());
                continue;
            }
            if hash_file(&path)? != file.sha256 {
                bad.push(file.path.clone());
            }
        }
        Ok(bad)
    }
}

fn manifest_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
