// src/commands/cook.rs

//! Cook command and the single-step commands

use super::Session;
use crate::cli::RunArgs;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Cook a package from a recipe
///
/// With `validate_only` the recipe and settings are checked and nothing runs.
pub fn cmd_cook(
    config_path: Option<&Path>,
    recipe_path: &Path,
    args: &RunArgs,
    validate_only: bool,
) -> Result<()> {
    println!("Reading recipe: {}", recipe_path.display());
    let session = Session::open(config_path, recipe_path, args)?;
    let recipe = &session.recipe;

    println!("Recipe: {}", recipe.reference());
    session.print_warnings();

    if validate_only {
        println!("Recipe validation passed");
        if session.warnings.is_empty() {
            println!("[OK] No issues found");
        } else {
            println!("[OK] {} warning(s)", session.warnings.len());
        }
        return Ok(());
    }

    let config = session.kitchen.config();
    println!("Settings: {}", session.settings);
    println!("Cooking with {} parallel jobs...", config.jobs);

    let result = session
        .kitchen
        .cook(recipe, &session.settings)
        .with_context(|| format!("Failed to cook {}", recipe.reference()))?;

    println!("\n[COMPLETE] Cooked: {}", result.package_dir.display());
    println!("Package id: {}", result.package_id);
    if let Some(commit) = &result.source_commit {
        println!("Source commit: {}", commit);
    }
    println!("{} file(s):", result.files.len());
    for file in &result.files {
        println!("  - {}", file.display());
    }

    if !result.warnings.is_empty() {
        println!("\nBuild warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "Successfully cooked {} to {}",
        recipe.reference(),
        result.package_dir.display()
    );

    Ok(())
}

/// Run only the source step
pub fn cmd_source(config_path: Option<&Path>, recipe_path: &Path, args: &RunArgs) -> Result<()> {
    let session = Session::open(config_path, recipe_path, args)?;
    session.print_warnings();

    let outcome = session
        .kitchen
        .source(&session.recipe)
        .with_context(|| format!("Failed to fetch sources for {}", session.recipe.reference()))?;

    if outcome.cloned {
        println!("Cloned into {}", outcome.checkout.display());
    } else {
        println!("Reused {}", outcome.checkout.display());
    }
    if let Some(commit) = &outcome.commit {
        println!("Commit: {}", commit);
    }
    Ok(())
}

/// Run only the build step
pub fn cmd_build(config_path: Option<&Path>, recipe_path: &Path, args: &RunArgs) -> Result<()> {
    let session = Session::open(config_path, recipe_path, args)?;
    session.print_warnings();

    let outcome = session
        .kitchen
        .build(&session.recipe, &session.settings)
        .with_context(|| format!("Failed to build {}", session.recipe.reference()))?;

    println!("Built in {}", outcome.build_dir.display());
    for command in &outcome.commands {
        println!("  $ {}", command);
    }
    for warning in &outcome.warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}

/// Run only the package step
pub fn cmd_package(config_path: Option<&Path>, recipe_path: &Path, args: &RunArgs) -> Result<()> {
    let session = Session::open(config_path, recipe_path, args)?;

    let outcome = session
        .kitchen
        .package(&session.recipe, &session.settings)
        .with_context(|| format!("Failed to package {}", session.recipe.reference()))?;

    println!(
        "Packaged {} file(s) into {}",
        outcome.files.len(),
        outcome.package_dir.display()
    );
    for file in &outcome.files {
        println!("  - {}", file.display());
    }
    println!("Manifest: {}", outcome.manifest.display());
    println!("Package id: {}", outcome.package_id);
    Ok(())
}
