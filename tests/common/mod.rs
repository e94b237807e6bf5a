// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use kitchen::recipe::{BuildStep, Phase, StepOutput};
use kitchen::{BuildSettings, Error, Kitchen, KitchenConfig, Recipe, ToolRunner, parse_recipe};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// What `git rev-parse HEAD` reports
pub const COMMIT: &str = "4f1c2b9d0e8a7c6b5a4f3e2d1c0b9a8f7e6d5c4b";

/// A recipe in the shape of the Fruit package, using the built-in rules
pub const FRUIT: &str = r#"
requires = ["Boost/1.60.0@lasote/stable"]

[package]
name = "Fruit"
version = "2.0.4"
license = "Apache-2.0"
url = "https://github.com/javierjeronimo/fruit"

[source]
git = "https://github.com/javierjeronimo/fruit.git"
rev = "v2.0.4"

[build]
settings = ["os", "compiler", "build_type", "arch"]
"#;

pub fn fruit() -> Recipe {
    parse_recipe(FRUIT).unwrap()
}

pub fn linux_release() -> BuildSettings {
    BuildSettings::detect()
        .with_overrides(["os=Linux", "compiler=gcc", "build_type=Release", "arch=x86_64"])
        .unwrap()
}

/// Write `content` to `root/rel`, creating parent directories
pub fn touch(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Stands in for git, cmake, and make
///
/// Records every step. `git clone` creates a checkout with a CMakeLists.txt,
/// and the compile step writes the configured outputs into the build dir.
pub struct FakeRunner {
    pub calls: Mutex<Vec<BuildStep>>,
    fail: Option<Phase>,
    missing: Option<String>,
    outputs: Vec<(String, String)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: None,
            missing: None,
            outputs: vec![
                ("src/libfoo.a".to_string(), "archive".to_string()),
                ("include/foo.h".to_string(), "#pragma once\n".to_string()),
            ],
        }
    }

    /// Every step of `phase` exits with status 1
    pub fn failing(mut self, phase: Phase) -> Self {
        self.fail = Some(phase);
        self
    }

    /// `check_tool` reports `program` as not installed
    pub fn without_tool(mut self, program: &str) -> Self {
        self.missing = Some(program.to_string());
        self
    }

    /// Files the compile step writes, relative to the build dir
    pub fn producing(mut self, outputs: &[(&str, &str)]) -> Self {
        self.outputs = outputs
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        self
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.calls.lock().unwrap().iter().map(|s| s.phase).collect()
    }

    pub fn steps(&self) -> Vec<BuildStep> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, step: &BuildStep) -> io::Result<StepOutput> {
        self.calls.lock().unwrap().push(step.clone());

        if self.fail == Some(step.phase) {
            return Ok(StepOutput::failed(1, format!("{} failed", step.program)));
        }

        match (step.phase, step.args.first().map(String::as_str)) {
            (Phase::Source, Some("clone")) => {
                let checkout = step.cwd.join(&step.args[2]);
                fs::create_dir_all(checkout.join(".git"))?;
                fs::write(checkout.join("CMakeLists.txt"), "project(fake)\n")?;
                Ok(StepOutput::ok(format!("Cloning into '{}'...", step.args[2])))
            }
            (Phase::Source, Some("rev-parse")) => Ok(StepOutput::ok(format!("{}\n", COMMIT))),
            (Phase::Compile, _) => {
                for (rel, content) in &self.outputs {
                    let path = step.cwd.join(rel);
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(path, content)?;
                }
                Ok(StepOutput::ok("[100%] Built target foo"))
            }
            _ => Ok(StepOutput::ok("")),
        }
    }

    fn check_tool(&self, program: &str) -> kitchen::Result<()> {
        match &self.missing {
            Some(missing) if missing == program => Err(Error::ToolNotFound(program.to_string())),
            _ => Ok(()),
        }
    }
}

/// A kitchen working inside `tmp` with the standard layout
pub fn kitchen_in(tmp: &TempDir, runner: Arc<FakeRunner>) -> Kitchen {
    kitchen_with(config_in(tmp), runner)
}

pub fn config_in(tmp: &TempDir) -> KitchenConfig {
    let mut config = KitchenConfig::in_dir(tmp.path());
    config.jobs = 2;
    config
}

pub fn kitchen_with(config: KitchenConfig, runner: Arc<FakeRunner>) -> Kitchen {
    Kitchen::with_runner(config, runner)
}
