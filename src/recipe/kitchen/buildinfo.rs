// src/recipe/kitchen/buildinfo.rs

//! CMake generator output: `kitchenbuildinfo.cmake`
//!
//! Exposes the dependency roots the host resolved so a project can
//! `include()` the file and call `kitchen_basic_setup()`.

use crate::error::Result;
use crate::recipe::format::Recipe;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name written into the build directory
pub const BUILDINFO_FILE: &str = "kitchenbuildinfo.cmake";

/// A requirement paired with the root directory the host resolved for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDep {
    pub cmake_name: String,
    pub reference: String,
    pub root: PathBuf,
}

/// Match declared requirements against host-provided roots
///
/// Returns the resolved deps and a warning per unresolved requirement.
pub fn resolve_deps(
    recipe: &Recipe,
    lookup: impl Fn(&str) -> Option<PathBuf>,
) -> (Vec<ResolvedDep>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut warnings = Vec::new();

    for req in &recipe.requires {
        match lookup(&req.name) {
            Some(root) => resolved.push(ResolvedDep {
                cmake_name: req.cmake_name(),
                reference: req.to_string(),
                root,
            }),
            None => {
                warn!("No root provided for requirement {}", req);
                warnings.push(format!("Requirement {} was not resolved by the host", req));
            }
        }
    }

    (resolved, warnings)
}

/// Render the generator file
pub fn render(recipe: &Recipe, deps: &[ResolvedDep]) -> String {
    let mut out = format!("# Generated by kitchen for {}\n", recipe.reference());
    out.push_str(&format!("set(KITCHEN_PACKAGE_NAME \"{}\")\n", recipe.package.name));
    out.push_str(&format!(
        "set(KITCHEN_PACKAGE_VERSION \"{}\")\n",
        recipe.package.version
    ));

    let names: Vec<&str> = deps.iter().map(|d| d.cmake_name.as_str()).collect();
    out.push_str(&format!("set(KITCHEN_DEPENDENCIES {})\n", names.join(" ")));

    for dep in deps {
        let name = &dep.cmake_name;
        let root = cmake_path(&dep.root);
        out.push_str(&format!("\n# {}\n", dep.reference));
        out.push_str(&format!("set(KITCHEN_{}_ROOT \"{}\")\n", name, root));
        out.push_str(&format!("set(KITCHEN_INCLUDE_DIRS_{} \"{}/include\")\n", name, root));
        out.push_str(&format!("set(KITCHEN_LIB_DIRS_{} \"{}/lib\")\n", name, root));
        out.push_str(&format!("set(KITCHEN_BIN_DIRS_{} \"{}/bin\")\n", name, root));
        out.push_str(&format!(
            "list(APPEND KITCHEN_INCLUDE_DIRS ${{KITCHEN_INCLUDE_DIRS_{}}})\n",
            name
        ));
        out.push_str(&format!(
            "list(APPEND KITCHEN_LIB_DIRS ${{KITCHEN_LIB_DIRS_{}}})\n",
            name
        ));
    }

    out.push_str(
        "\nmacro(kitchen_basic_setup)\n    include_directories(${KITCHEN_INCLUDE_DIRS})\n    link_directories(${KITCHEN_LIB_DIRS})\nendmacro()\n",
    );
    out
}

/// Write the generator file into `build_dir`
pub fn write(build_dir: &Path, recipe: &Recipe, deps: &[ResolvedDep]) -> Result<PathBuf> {
    let path = build_dir.join(BUILDINFO_FILE);
    fs::write(&path, render(recipe, deps))?;
    Ok(path)
}

fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
