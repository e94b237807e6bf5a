// src/recipe/kitchen/source.rs

//! Source step: clone the upstream repository

use super::config::SourceOutcome;
use super::runner::{BuildStep, Phase};
use super::{Kitchen, StepLog};
use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::parser::validate_recipe;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the file recording what the source step fetched
pub const SOURCE_STAMP: &str = "kitchen-source.toml";

/// What the source step checked out, kept for the package manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub url: String,
    pub checkout: String,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
}

impl SourceStamp {
    /// Read the stamp from a source dir, if the source step left one
    pub fn read(source_dir: &Path) -> Result<Option<Self>> {
        let path = source_dir.join(SOURCE_STAMP);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| Error::ParseError(format!("Invalid {}: {}", path.display(), e)))
    }

    fn write(&self, source_dir: &Path) -> Result<()> {
        let content = toml::to_string(self)
            .map_err(|e| Error::ParseError(format!("Failed to encode source stamp: {}", e)))?;
        fs::write(source_dir.join(SOURCE_STAMP), content)?;
        Ok(())
    }
}

impl Kitchen {
    /// Source hook: clone the declared repository into the source dir
    ///
    /// Makes a single attempt. An existing checkout is an error unless
    /// `reuse_source` is set. The recipe and directory layout are checked
    /// before anything is cloned.
    pub fn source(&self, recipe: &Recipe) -> Result<SourceOutcome> {
        validate_recipe(recipe)?;
        self.config.validate()?;

        let reference = recipe.reference();
        let fail = |msg: String| Error::SourceFetchFailed(reference.clone(), msg);

        let source_dir = &self.config.source_dir;
        let checkout_name = recipe.checkout_dir();
        let checkout: PathBuf = source_dir.join(&checkout_name);
        let mut log = StepLog::default();

        fs::create_dir_all(source_dir)
            .map_err(|e| fail(format!("cannot create {}: {}", source_dir.display(), e)))?;

        let cloned = if checkout.exists() {
            if !self.config.reuse_source {
                return Err(fail(format!(
                    "destination {} already exists",
                    checkout.display()
                )));
            }
            if !checkout.join(".git").exists() {
                return Err(fail(format!(
                    "{} exists but is not a git checkout",
                    checkout.display()
                )));
            }
            info!("Reusing existing checkout at {}", checkout.display());
            log.line(&format!("Reusing checkout: {}", checkout.display()));
            false
        } else {
            self.runner.check_tool(&self.config.git)?;
            info!("Cloning {}", recipe.source.git);
            let step = BuildStep::new(Phase::Source, &self.config.git, source_dir)
                .arg("clone")
                .arg(&recipe.source.git)
                .arg(&checkout_name);
            self.execute(&reference, &step, &mut log)?;
            true
        };

        match &recipe.source.rev {
            Some(rev) => {
                info!("Checking out {}", rev);
                let step = BuildStep::new(Phase::Source, &self.config.git, &checkout)
                    .args(["checkout", "--quiet"])
                    .arg(rev);
                self.execute(&reference, &step, &mut log)?;
            }
            None => warn!(
                "{} is not pinned to a revision; building the default branch",
                recipe.source.git
            ),
        }

        let head = BuildStep::new(Phase::Source, &self.config.git, &checkout)
            .args(["rev-parse", "HEAD"]);
        let output = self.execute(&reference, &head, &mut log)?;
        let commit = Some(output.stdout.trim().to_string()).filter(|c| !c.is_empty());

        SourceStamp {
            url: recipe.source.git.clone(),
            checkout: checkout_name,
            rev: recipe.source.rev.clone(),
            commit: commit.clone(),
        }
        .write(source_dir)
        .map_err(|e| fail(format!("cannot record source stamp: {}", e)))?;

        Ok(SourceOutcome {
            checkout,
            commit,
            cloned,
            log: log.into_string(),
        })
    }
}
