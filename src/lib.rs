// src/lib.rs

//! Kitchen: a package recipe runner
//!
//! Fetches a recipe's upstream sources with git, drives a CMake build
//! configured from build settings, and copies the resulting headers and
//! libraries into a package directory with a hashed manifest.
//!
//! # Architecture
//!
//! - Recipes: TOML descriptors parsed into [`Recipe`]
//! - Settings: os / compiler / build type / arch, translated to CMake flags
//! - Kitchen: source, build, and package hooks, plus `cook` for all three
//! - Subprocesses go through [`ToolRunner`] so hosts can substitute it

mod error;
pub mod hash;
pub mod recipe;
pub mod settings;

pub use error::{Error, Result};
pub use recipe::{
    ArtifactPattern, CookResult, Kitchen, KitchenConfig, PackageManifest, Recipe, Requirement,
    ShellRunner, ToolRunner, parse_recipe, parse_recipe_file, validate_recipe,
};
pub use settings::{Arch, BuildSettings, BuildType, Compiler, Os};
