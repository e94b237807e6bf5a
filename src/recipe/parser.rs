// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::artifact::is_contained;
use crate::recipe::format::Recipe;
use crate::settings::SETTING_NAMES;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ParseError(format!("Failed to read recipe file {}: {}", path.display(), e))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for things that work but deserve attention.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }
    if recipe.source.git.trim().is_empty() {
        return Err(Error::ParseError("Recipe source git URL cannot be empty".to_string()));
    }

    let checkout = recipe.checkout_dir();
    if checkout.contains(['/', '\\']) || checkout == ".." || checkout == "." {
        return Err(Error::ParseError(format!(
            "Invalid checkout directory name: {}",
            checkout
        )));
    }

    if let Some(subdir) = &recipe.build.source_subdir
        && (subdir.is_empty() || !is_contained(subdir))
    {
        return Err(Error::ParseError(format!(
            "source_subdir '{}' must be a relative path inside the source dir",
            subdir
        )));
    }

    for setting in &recipe.build.settings {
        if !SETTING_NAMES.contains(&setting.as_str()) {
            return Err(Error::ParseError(format!(
                "Unknown setting '{}' (expected one of: {})",
                setting,
                SETTING_NAMES.join(", ")
            )));
        }
    }

    if recipe.build.parallel && recipe.build.compile_tool.trim().is_empty() {
        return Err(Error::ParseError("compile_tool cannot be empty".to_string()));
    }

    for rule in &recipe.artifacts {
        rule.compile()?;
        rule.check_paths()?;
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.url.is_none() {
        warnings.push("Missing package url".to_string());
    }
    if recipe.source.rev.is_none() {
        warnings.push(format!(
            "Source {} is not pinned to a rev; builds are not reproducible",
            recipe.source.git
        ));
    }
    if recipe.artifacts.is_empty() {
        warnings.push("No artifact rules; the package will be empty".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::artifact::Origin;

    const FRUIT: &str = r#"
requires = ["Boost/1.60.0@lasote/stable"]

[package]
name = "Fruit"
version = "2.0.4"
url = "https://github.com/javierjeronimo/fruit"
license = "see https://github.com/javierjeronimo/fruit/blob/master/COPYING"

[source]
git = "https://github.com/javierjeronimo/fruit.git"
rev = "v2.0.4"

[build]
generator = "cmake"
settings = ["os", "compiler", "build_type", "arch"]
"#;

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = parse_recipe(FRUIT).unwrap();
        assert_eq!(recipe.package.name, "Fruit");
        assert_eq!(recipe.requires.len(), 1);
        assert_eq!(recipe.requires[0].channel.as_deref(), Some("stable"));
        assert_eq!(recipe.checkout_dir(), "fruit");
        // Default packaging table applies
        assert_eq!(recipe.artifacts.len(), 6);
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_minimal_recipe() {
        let content = r#"
[package]
name = "tiny"
version = "0.1"

[source]
git = "https://example.com/tiny.git"
"#;
        let recipe = parse_recipe(content).unwrap();
        assert!(recipe.build.parallel);
        assert_eq!(recipe.build.settings.len(), 4);

        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("license")));
        assert!(warnings.iter().any(|w| w.contains("url")));
        assert!(warnings.iter().any(|w| w.contains("not pinned")));
    }

    #[test]
    fn test_parse_custom_artifacts() {
        let content = r#"
[package]
name = "Fruit"
version = "2.0.4"

[source]
git = "https://github.com/javierjeronimo/fruit.git"

[[artifacts]]
pattern = "*.h"
dst = "include"
src = "fruit/include"
from = "source"

[[artifacts]]
pattern = "*.a"
dst = "lib"
keep_path = false
"#;
        let recipe = parse_recipe(content).unwrap();
        assert_eq!(recipe.artifacts.len(), 2);
        assert_eq!(recipe.artifacts[0].from, Origin::Source);
        assert!(recipe.artifacts[0].keep_path);
        assert_eq!(recipe.artifacts[1].src, "");
        assert!(!recipe.artifacts[1].keep_path);
    }

    #[test]
    fn test_bundled_fruit_recipe() {
        let recipe = parse_recipe(include_str!("../../recipes/fruit.toml")).unwrap();
        assert_eq!(recipe.reference(), "Fruit/2.0.4");
        assert_eq!(recipe.artifacts.len(), 6);
        assert_eq!(recipe.artifacts[0].from, Origin::Source);
        assert_eq!(recipe.build.definitions["FRUIT_USES_BOOST"], "True");
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_recipe() {
        assert!(parse_recipe("this is not valid toml at all {}").is_err());
    }

    #[test]
    fn test_parse_unknown_generator() {
        let content = r#"
[package]
name = "x"
version = "1"

[source]
git = "https://example.com/x.git"

[build]
generator = "autotools"
"#;
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_parse_bad_requirement() {
        let content = r#"
requires = ["Boost"]

[package]
name = "x"
version = "1"

[source]
git = "https://example.com/x.git"
"#;
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let mut recipe = parse_recipe(FRUIT).unwrap();
        recipe.package.name.clear();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_unknown_setting() {
        let mut recipe = parse_recipe(FRUIT).unwrap();
        recipe.build.settings.push("libcxx".to_string());
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_escaping_artifact() {
        let mut recipe = parse_recipe(FRUIT).unwrap();
        recipe.artifacts[0].dst = "../outside".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_checkout_dir() {
        let mut recipe = parse_recipe(FRUIT).unwrap();
        recipe.source.dir = Some("../escape".to_string());
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_escaping_source_subdir() {
        let mut recipe = parse_recipe(FRUIT).unwrap();
        recipe.build.source_subdir = Some("../../etc".to_string());
        assert!(validate_recipe(&recipe).is_err());

        recipe.build.source_subdir = Some("fruit/cmake".to_string());
        assert!(validate_recipe(&recipe).is_ok());
    }
}
