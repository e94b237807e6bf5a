// src/recipe/kitchen/build.rs

//! Build step: configure with CMake, build, then run the parallel compile

use super::buildinfo::{self, ResolvedDep};
use super::config::BuildOutcome;
use super::runner::{BuildStep, Phase};
use super::{Kitchen, StepLog};
use crate::error::{Error, Result};
use crate::recipe::cmake::CMakeCommand;
use crate::recipe::format::Recipe;
use crate::recipe::parser::validate_recipe;
use crate::settings::BuildSettings;
use std::fs;
use tracing::info;

impl Kitchen {
    /// Assemble the build steps without running them
    ///
    /// Fails with a configuration error when the settings cannot be
    /// translated for the build tool.
    pub fn plan_build(&self, recipe: &Recipe, settings: &BuildSettings) -> Result<Vec<BuildStep>> {
        let (deps, _) = self.resolved_deps(recipe);
        self.build_steps(recipe, settings, &deps)
    }

    /// Build hook: run the configure, build, and compile commands
    ///
    /// Expects the source step to have populated the source dir. Stops at
    /// the first command that exits unsuccessfully.
    pub fn build(&self, recipe: &Recipe, settings: &BuildSettings) -> Result<BuildOutcome> {
        validate_recipe(recipe)?;
        self.config.validate()?;

        let configure_dir = self.config.source_dir.join(recipe.configure_subdir());
        if !configure_dir.is_dir() {
            return Err(Error::ConfigureFailed(format!(
                "source directory {} does not exist; run the source step first",
                configure_dir.display()
            )));
        }

        info!("Building {} ({})", recipe.reference(), settings);
        let (deps, warnings) = self.resolved_deps(recipe);
        let steps = self.build_steps(recipe, settings, &deps)?;
        for step in &steps {
            self.runner.check_tool(&step.program)?;
        }

        let build_dir = self.config.build_dir.clone();
        fs::create_dir_all(&build_dir).map_err(|e| {
            Error::ConfigureFailed(format!("cannot create {}: {}", build_dir.display(), e))
        })?;

        let info_path = buildinfo::write(&build_dir, recipe, &deps)?;
        info!("Wrote {}", info_path.display());

        let reference = recipe.reference();
        let mut log = StepLog::default();
        let mut commands = Vec::with_capacity(steps.len());

        for step in &steps {
            info!("Running {} phase", step.phase);
            self.execute(&reference, step, &mut log)?;
            commands.push(step.to_string());
        }

        Ok(BuildOutcome {
            build_dir,
            commands,
            log: log.into_string(),
            warnings,
        })
    }

    fn build_steps(
        &self,
        recipe: &Recipe,
        settings: &BuildSettings,
        deps: &[ResolvedDep],
    ) -> Result<Vec<BuildStep>> {
        let cmake = CMakeCommand::new(settings)?;
        let build_dir = &self.config.build_dir;
        // cmake runs from the build dir, so the source path must not be relative
        let configure_dir =
            std::path::absolute(self.config.source_dir.join(recipe.configure_subdir()))?;

        let mut definitions = recipe.build.definitions.clone();
        if !deps.is_empty() {
            let prefix_path: Vec<String> = deps
                .iter()
                .map(|d| d.root.to_string_lossy().replace('\\', "/"))
                .collect();
            definitions
                .entry("CMAKE_PREFIX_PATH".to_string())
                .or_insert_with(|| prefix_path.join(";"));
        }

        let mut steps = vec![
            BuildStep::new(Phase::Configure, &self.config.cmake, build_dir)
                .args(cmake.configure_args(&configure_dir, &definitions)),
            BuildStep::new(Phase::Build, &self.config.cmake, build_dir).args(cmake.build_args()),
        ];

        if recipe.build.parallel {
            steps.push(
                BuildStep::new(Phase::Compile, &recipe.build.compile_tool, build_dir)
                    .arg(format!("-j{}", self.config.jobs)),
            );
        }

        Ok(steps)
    }

    fn resolved_deps(&self, recipe: &Recipe) -> (Vec<ResolvedDep>, Vec<String>) {
        buildinfo::resolve_deps(recipe, |name| {
            self.config.dep_root(name).map(|p| p.to_path_buf())
        })
    }
}
