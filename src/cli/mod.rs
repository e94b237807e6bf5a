// src/cli/mod.rs
//! CLI definitions for the kitchen recipe runner
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `cook` - Fetch, build, and package a recipe
//! - `source` / `build` / `package` - Run a single step
//! - `info` - Show what a cook would do without running anything
//! - `verify` - Check a package dir against its manifest

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(author = "Kitchen Contributors")]
#[command(version)]
#[command(about = "Fetch, build, and package C/C++ libraries from recipes", long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/kitchen/config.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that runs (or plans) a step
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Override a build setting (os, compiler, compiler.version, build_type, arch)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Root directory of an already-built requirement
    #[arg(long = "dep", value_name = "NAME=PATH")]
    pub deps: Vec<String>,

    /// Directory sources are cloned into
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Directory the build runs in
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Directory packaged artifacts are written to
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Number of parallel compile jobs
    #[arg(short, long)]
    pub jobs: Option<u32>,

    /// Reuse an existing checkout instead of failing
    #[arg(long)]
    pub reuse_source: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch sources, build, and package a recipe
    Cook {
        /// Path to the recipe file
        recipe: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Only validate the recipe, don't cook
        #[arg(long)]
        validate_only: bool,
    },

    /// Clone the recipe's sources
    Source {
        /// Path to the recipe file
        recipe: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Configure and compile previously fetched sources
    Build {
        /// Path to the recipe file
        recipe: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Copy build outputs into the package directory
    Package {
        /// Path to the recipe file
        recipe: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show the recipe, effective settings, package id, and build commands
    Info {
        /// Path to the recipe file
        recipe: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check packaged files against manifest.toml
    Verify {
        /// Package directory containing manifest.toml
        package_dir: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
