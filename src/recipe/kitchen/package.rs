// src/recipe/kitchen/package.rs

//! Package step: copy build outputs into the package layout

use super::config::PackageOutcome;
use super::manifest::PackageManifest;
use super::source::SourceStamp;
use super::Kitchen;
use crate::error::{Error, Result};
use crate::recipe::artifact::Origin;
use crate::recipe::format::Recipe;
use crate::recipe::parser::validate_recipe;
use crate::settings::BuildSettings;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl Kitchen {
    /// Package hook: copy every rule's matches into the package dir
    ///
    /// The package dir is emptied first, so running this twice over the
    /// same build output gives the same tree.
    pub fn package(&self, recipe: &Recipe, settings: &BuildSettings) -> Result<PackageOutcome> {
        validate_recipe(recipe)?;
        self.config.validate()?;
        let package_dir = self.config.package_dir.clone();

        if package_dir.exists() {
            debug!("Clearing {}", package_dir.display());
            fs::remove_dir_all(&package_dir).map_err(|e| {
                Error::PackageFailed(format!("cannot clear {}: {}", package_dir.display(), e))
            })?;
        }
        fs::create_dir_all(&package_dir).map_err(|e| {
            Error::PackageFailed(format!("cannot create {}: {}", package_dir.display(), e))
        })?;

        // destination -> source; a later rule overwrites an earlier match
        let mut copied: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

        for rule in &recipe.artifacts {
            let root = match rule.from {
                Origin::Build => &self.config.build_dir,
                Origin::Source => &self.config.source_dir,
            };
            let copies = rule.collect(root)?;
            debug!("{} -> {}: {} matches", rule.pattern, rule.dst, copies.len());

            for copy in copies {
                let target = package_dir.join(&copy.destination);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        Error::PackageFailed(format!("cannot create {}: {}", parent.display(), e))
                    })?;
                }
                fs::copy(&copy.source, &target).map_err(|e| {
                    Error::PackageFailed(format!(
                        "cannot copy {} to {}: {}",
                        copy.source.display(),
                        target.display(),
                        e
                    ))
                })?;

                if let Some(previous) = copied.insert(copy.destination.clone(), copy.source.clone())
                    && previous != copy.source
                {
                    warn!(
                        "{} overwritten by {}",
                        copy.destination.display(),
                        copy.source.display()
                    );
                }
            }
        }

        let files: Vec<PathBuf> = copied.into_keys().collect();
        if files.is_empty() {
            warn!("No artifacts matched for {}", recipe.reference());
        }

        let stamp = SourceStamp::read(&self.config.source_dir)?;
        let manifest = PackageManifest::build(recipe, settings, stamp.as_ref(), &package_dir, &files)?;
        let manifest_path = manifest.write(&package_dir)?;

        info!(
            "Packaged {} files into {}",
            files.len(),
            package_dir.display()
        );

        Ok(PackageOutcome {
            package_dir,
            package_id: manifest.package.id,
            files,
            manifest: manifest_path,
        })
    }
}
