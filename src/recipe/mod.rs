// src/recipe/mod.rs

//! Recipe system for building packages from source
//!
//! A recipe names an upstream git repository, the requirements the host
//! must resolve, the settings the binary depends on, and the rules that
//! pick build outputs for the package.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Cook**: Fetch, build, and package a recipe
//! - **Kitchen**: The driver that runs the steps
//!
//! # Example Recipe
//!
//! ```toml
//! requires = ["Boost/1.60.0@lasote/stable"]
//!
//! [package]
//! name = "Fruit"
//! version = "2.0.4"
//! license = "Apache-2.0"
//!
//! [source]
//! git = "https://github.com/javierjeronimo/fruit.git"
//! rev = "v2.0.4"
//!
//! [build]
//! settings = ["os", "compiler", "build_type", "arch"]
//! definitions = { FRUIT_USES_BOOST = "True" }
//! ```
//!
//! Without an `[[artifacts]]` table the built-in rules package headers
//! under `include/` and libraries under `lib/` and `bin/`.

pub mod artifact;
pub mod cmake;
mod format;
mod kitchen;
pub mod parser;
pub mod requirement;

pub use artifact::{ArtifactPattern, Origin, PlannedCopy, default_rules};
pub use format::{BuildSection, Generator, PackageSection, Recipe, SourceSection};
pub use kitchen::manifest::{ManifestFile, ManifestPackage, ManifestSource};
pub use kitchen::{
    BUILDINFO_FILE, BuildOutcome, BuildStep, CookResult, Kitchen, KitchenConfig, MANIFEST_FILE,
    PackageManifest, PackageOutcome, Phase, ResolvedDep, SOURCE_STAMP, ShellRunner,
    SourceOutcome, SourceStamp, StepOutput, ToolRunner, package_id,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use requirement::Requirement;
