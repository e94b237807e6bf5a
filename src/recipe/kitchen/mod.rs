// src/recipe/kitchen/mod.rs

//! Kitchen: the driver that turns a recipe into a package directory
//!
//! Cooking runs three steps in order, each usable on its own:
//! - **source**: clone the upstream repository into the source dir
//! - **build**: configure with CMake and compile in the build dir
//! - **package**: copy matching artifacts into the package dir
//!
//! External tools are invoked through a [`ToolRunner`], so the pipeline can
//! be driven without git or cmake installed.

mod build;
mod buildinfo;
mod config;
pub mod manifest;
mod package;
pub mod runner;
mod source;

pub use buildinfo::{BUILDINFO_FILE, ResolvedDep};
pub use config::{BuildOutcome, CookResult, KitchenConfig, PackageOutcome, SourceOutcome};
pub use manifest::{MANIFEST_FILE, PackageManifest, package_id};
pub use runner::{BuildStep, Phase, ShellRunner, StepOutput, ToolRunner};
pub use source::{SOURCE_STAMP, SourceStamp};

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::settings::BuildSettings;
use std::sync::Arc;
use tracing::{debug, info};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    runner: Arc<dyn ToolRunner>,
}

impl Kitchen {
    /// Create a Kitchen that runs real subprocesses
    pub fn new(config: KitchenConfig) -> Self {
        Self::with_runner(config, Arc::new(ShellRunner))
    }

    /// Create a Kitchen with a custom tool runner
    pub fn with_runner(config: KitchenConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Cook a recipe: source, build, then package
    ///
    /// Stops at the first failing step; later steps do not run.
    pub fn cook(&self, recipe: &Recipe, settings: &BuildSettings) -> Result<CookResult> {
        info!("Cooking {} ({})", recipe.reference(), settings);

        info!("Fetching sources...");
        let source = self.source(recipe)?;

        info!("Building...");
        let build = self.build(recipe, settings)?;

        info!("Packaging...");
        let package = self.package(recipe, settings)?;

        info!(
            "Cooked {} into {} ({} files)",
            recipe.reference(),
            package.package_dir.display(),
            package.files.len()
        );

        Ok(CookResult {
            package_dir: package.package_dir,
            package_id: package.package_id,
            files: package.files,
            source_commit: source.commit,
            log: source.log + &build.log,
            warnings: build.warnings,
        })
    }

    /// Run one step and map failures onto the phase's error
    fn execute(&self, reference: &str, step: &BuildStep, log: &mut StepLog) -> Result<StepOutput> {
        debug!("Running: {} (in {})", step, step.cwd.display());
        log.line(&format!("$ {}", step));

        let output = self
            .runner
            .run(step)
            .map_err(|e| phase_error(reference, step.phase, format!("{}: {}", step.program, e)))?;
        log.output(step.phase, &output);

        if !output.success() {
            let code = output
                .status
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let mut message = format!("`{}` exited with {}", step, code);
            let stderr = output.stderr.trim();
            if !stderr.is_empty() {
                message.push_str(": ");
                message.push_str(stderr);
            }
            return Err(phase_error(reference, step.phase, message));
        }

        Ok(output)
    }
}

fn phase_error(reference: &str, phase: Phase, message: String) -> Error {
    match phase {
        Phase::Source => Error::SourceFetchFailed(reference.to_string(), message),
        Phase::Configure => Error::ConfigureFailed(message),
        Phase::Build | Phase::Compile => Error::build_failed(phase.name(), message),
    }
}

/// Accumulates command lines and their output for the cook log
#[derive(Debug, Default)]
pub(crate) struct StepLog {
    text: String,
}

impl StepLog {
    pub(crate) fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn output(&mut self, phase: Phase, output: &StepOutput) {
        if output.stdout.is_empty() && output.stderr.is_empty() {
            return;
        }
        self.line(&format!("=== {} ===", phase));
        for stream in [&output.stdout, &output.stderr] {
            if !stream.is_empty() {
                self.text.push_str(stream);
                if !stream.ends_with('\n') {
                    self.text.push('\n');
                }
            }
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.text
    }
}
