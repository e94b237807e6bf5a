// src/commands/mod.rs
//! Command handlers for the kitchen CLI

mod cook;
mod info;
mod verify;

pub use cook::{cmd_build, cmd_cook, cmd_package, cmd_source};
pub use info::cmd_info;
pub use verify::cmd_verify;

use crate::cli::RunArgs;
use anyhow::{Context, Result, bail};
use kitchen::{BuildSettings, Kitchen, KitchenConfig, Recipe, parse_recipe_file, validate_recipe};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a command needs to run a step
pub struct Session {
    pub recipe: Recipe,
    pub settings: BuildSettings,
    pub kitchen: Kitchen,
    /// Recipe validation warnings
    pub warnings: Vec<String>,
}

impl Session {
    /// Load config and recipe, then apply command-line overrides
    pub fn open(config_path: Option<&Path>, recipe_path: &Path, args: &RunArgs) -> Result<Self> {
        let mut config = load_config(config_path)?;
        apply_run_args(&mut config, args)?;

        let recipe = parse_recipe_file(recipe_path)
            .with_context(|| format!("Failed to parse recipe: {}", recipe_path.display()))?;
        let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;

        let settings = BuildSettings::detect()
            .with_overrides(config.settings.iter().chain(&args.settings))
            .with_context(|| "Invalid build settings")?;

        Ok(Self {
            recipe,
            settings,
            kitchen: Kitchen::new(config),
            warnings,
        })
    }

    pub fn print_warnings(&self) {
        for warning in &self.warnings {
            println!("Warning: {}", warning);
        }
    }
}

/// Load the explicit config file, or the per-user one when it exists
pub fn load_config(path: Option<&Path>) -> Result<KitchenConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match KitchenConfig::default_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No config file, using defaults");
                return Ok(KitchenConfig::default());
            }
        },
    };

    debug!("Loading config from {}", path.display());
    KitchenConfig::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Command-line flags win over config file values
pub fn apply_run_args(config: &mut KitchenConfig, args: &RunArgs) -> Result<()> {
    if let Some(dir) = &args.source_dir {
        config.source_dir = dir.clone();
    }
    if let Some(dir) = &args.build_dir {
        config.build_dir = dir.clone();
    }
    if let Some(dir) = &args.package_dir {
        config.package_dir = dir.clone();
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if args.reuse_source {
        config.reuse_source = true;
    }
    for dep in &args.deps {
        let (name, path) = parse_dep(dep)?;
        config.deps.insert(name, path);
    }
    Ok(())
}

fn parse_dep(value: &str) -> Result<(String, PathBuf)> {
    match value.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => bail!("Invalid --dep '{}': expected NAME=PATH", value),
    }
}
