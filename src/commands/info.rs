// src/commands/info.rs

//! Info command - show what cooking a recipe would do

use super::Session;
use crate::cli::RunArgs;
use anyhow::{Context, Result};
use kitchen::recipe::{Origin, package_id};
use serde_json::json;
use std::path::Path;

pub fn cmd_info(
    config_path: Option<&Path>,
    recipe_path: &Path,
    args: &RunArgs,
    as_json: bool,
) -> Result<()> {
    let session = Session::open(config_path, recipe_path, args)?;
    let recipe = &session.recipe;
    let config = session.kitchen.config();

    let id = package_id(recipe, &session.settings);
    let steps = session
        .kitchen
        .plan_build(recipe, &session.settings)
        .with_context(|| format!("Cannot plan build for {}", recipe.reference()))?;
    let commands: Vec<String> = steps.iter().map(|s| s.to_string()).collect();

    if as_json {
        let settings: serde_json::Map<String, serde_json::Value> = session
            .settings
            .values()
            .into_iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        let requires: Vec<_> = recipe
            .requires
            .iter()
            .map(|r| {
                json!({
                    "reference": r.to_string(),
                    "root": config.dep_root(&r.name).map(|p| p.display().to_string()),
                })
            })
            .collect();

        let output = json!({
            "name": recipe.package.name,
            "version": recipe.package.version,
            "license": recipe.package.license,
            "url": recipe.package.url,
            "source": {
                "git": recipe.source.git,
                "rev": recipe.source.rev,
                "checkout": recipe.checkout_dir(),
            },
            "requires": requires,
            "settings": settings,
            "declared_settings": recipe.build.settings,
            "package_id": id,
            "commands": commands,
            "artifacts": recipe.artifacts,
            "warnings": session.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Package: {}", recipe.reference());
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    if let Some(license) = &recipe.package.license {
        println!("License: {}", license);
    }
    if let Some(url) = &recipe.package.url {
        println!("URL: {}", url);
    }
    match &recipe.source.rev {
        Some(rev) => println!("Source: {} ({})", recipe.source.git, rev),
        None => println!("Source: {} (unpinned)", recipe.source.git),
    }

    if !recipe.requires.is_empty() {
        println!("Requires:");
        for req in &recipe.requires {
            match config.dep_root(&req.name) {
                Some(root) => println!("  {} -> {}", req, root.display()),
                None => println!("  {} (unresolved)", req),
            }
        }
    }

    println!("Settings: {}", session.settings);
    println!("Package id: {}", id);

    println!("Build commands (in {}):", config.build_dir.display());
    for command in &commands {
        println!("  $ {}", command);
    }

    println!("Artifacts:");
    for rule in &recipe.artifacts {
        let src = if rule.src.is_empty() { "." } else { rule.src.as_str() };
        println!(
            "  {} from {}/{} -> {}{}",
            rule.pattern,
            match rule.from {
                Origin::Build => "build",
                Origin::Source => "source",
            },
            src,
            rule.dst,
            if rule.keep_path { "" } else { " (flattened)" }
        );
    }

    session.print_warnings();
    Ok(())
}
