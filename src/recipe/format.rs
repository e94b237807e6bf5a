// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe where a package's source lives,
//! how to build it, and which build outputs belong in the package.

use crate::recipe::artifact::{default_rules, ArtifactPattern};
use crate::recipe::requirement::Requirement;
use crate::settings::SETTING_NAMES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A complete recipe for building a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Upstream packages the host must resolve before the build step
    ///
    /// Format: `["Boost/1.60.0@lasote/stable"]`
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// Package metadata
    pub package: PackageSection,

    /// Where the source lives
    pub source: SourceSection,

    /// Build instructions
    #[serde(default)]
    pub build: BuildSection,

    /// Packaging rules; the built-in table is used when omitted
    #[serde(default = "default_rules")]
    pub artifacts: Vec<ArtifactPattern>,
}

impl Recipe {
    /// `name/version`
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package.name, self.package.version)
    }

    /// Directory name the source is cloned into
    ///
    /// Defaults to the last segment of the git URL without `.git`.
    pub fn checkout_dir(&self) -> String {
        if let Some(dir) = &self.source.dir {
            return dir.clone();
        }

        let trimmed = self.source.git.trim_end_matches('/');
        let last = trimmed
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(trimmed);
        let name = last.strip_suffix(".git").unwrap_or(last);

        if name.is_empty() {
            self.package.name.clone()
        } else {
            name.to_string()
        }
    }

    /// Directory (relative to the source root) CMake is pointed at
    pub fn configure_subdir(&self) -> PathBuf {
        match &self.build.source_subdir {
            Some(subdir) => PathBuf::from(subdir),
            None => PathBuf::from(self.checkout_dir()),
        }
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// License identifier or pointer to the license text
    #[serde(default)]
    pub license: Option<String>,

    /// Project homepage
    #[serde(default)]
    pub url: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,
}

/// Source section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Git URL to clone
    pub git: String,

    /// Checkout directory name (defaults to the repository name)
    #[serde(default)]
    pub dir: Option<String>,

    /// Commit, tag, or branch to check out after cloning
    ///
    /// Without it the build uses whatever the default branch points to.
    #[serde(default)]
    pub rev: Option<String>,
}

/// Build-system generators the runner knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    #[default]
    Cmake,
}

/// Build instructions section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub generator: Generator,

    /// Settings the package depends on; others are ignored for its id
    pub settings: Vec<String>,

    /// Directory under the source root to configure (default: checkout dir)
    pub source_subdir: Option<String>,

    /// Extra `-D` definitions passed to the configure step
    pub definitions: BTreeMap<String, String>,

    /// Run the parallel compile command after `cmake --build`
    pub parallel: bool,

    /// Program used for the parallel compile command
    pub compile_tool: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            generator: Generator::Cmake,
            settings: SETTING_NAMES.iter().map(|s| s.to_string()).collect(),
            source_subdir: None,
            definitions: BTreeMap::new(),
            parallel: true,
            compile_tool: "make".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_with_git(git: &str) -> Recipe {
        Recipe {
            requires: Vec::new(),
            package: PackageSection {
                name: "Fruit".to_string(),
                version: "2.0.4".to_string(),
                license: None,
                url: None,
                description: None,
            },
            source: SourceSection {
                git: git.to_string(),
                dir: None,
                rev: None,
            },
            build: BuildSection::default(),
            artifacts: default_rules(),
        }
    }

    #[test]
    fn test_checkout_dir_from_url() {
        assert_eq!(
            recipe_with_git("https://github.com/javierjeronimo/fruit.git").checkout_dir(),
            "fruit"
        );
        assert_eq!(recipe_with_git("https://example.com/repos/lib/").checkout_dir(), "lib");
        assert_eq!(recipe_with_git("git@github.com:org/widget.git").checkout_dir(), "widget");
        assert_eq!(recipe_with_git("").checkout_dir(), "Fruit");
    }

    #[test]
    fn test_checkout_dir_override() {
        let mut recipe = recipe_with_git("https://example.com/fruit.git");
        recipe.source.dir = Some("upstream".to_string());
        assert_eq!(recipe.checkout_dir(), "upstream");
        assert_eq!(recipe.configure_subdir(), PathBuf::from("upstream"));

        recipe.build.source_subdir = Some("upstream/cmake".to_string());
        assert_eq!(recipe.configure_subdir(), PathBuf::from("upstream/cmake"));
    }

    #[test]
    fn test_reference() {
        assert_eq!(recipe_with_git("x").reference(), "Fruit/2.0.4");
    }

    #[test]
    fn test_build_section_defaults() {
        let build = BuildSection::default();
        assert_eq!(build.settings, ["os", "compiler", "build_type", "arch"]);
        assert!(build.parallel);
        assert_eq!(build.compile_tool, "make");
    }
}
