// src/recipe/kitchen/runner.rs

//! Subprocess execution for build steps
//!
//! Every external tool the Kitchen drives (git, cmake, make) goes through
//! the [`ToolRunner`] trait so hosts and tests can substitute their own
//! execution strategy.

use crate::error::{Error, Result};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Pipeline phase a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Cloning and checking out sources
    Source,
    /// Generating the build system
    Configure,
    /// `cmake --build`
    Build,
    /// Parallel compile driver (`make -jN`)
    Compile,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Compile => "compile",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub phase: Phase,
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the subprocess
    pub cwd: PathBuf,
}

impl BuildStep {
    pub fn new(phase: Phase, program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            phase,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Renders the step as a shell-style command line (for logs only)
impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '"') {
        return word.to_string();
    }
    format!("\"{}\"", word.replace('"', "\\\""))
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    /// A successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Executes build steps
pub trait ToolRunner: Send + Sync {
    /// Run a step to completion
    ///
    /// An `Err` means the process could not be started; a non-zero exit is
    /// reported through [`StepOutput::status`].
    fn run(&self, step: &BuildStep) -> io::Result<StepOutput>;

    /// Check that a program is available before relying on it
    fn check_tool(&self, _program: &str) -> Result<()> {
        Ok(())
    }
}

/// Runs steps as real subprocesses, blocking until each exits
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ToolRunner for ShellRunner {
    fn run(&self, step: &BuildStep) -> io::Result<StepOutput> {
        let output = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&step.cwd)
            .output()?;

        Ok(StepOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn check_tool(&self, program: &str) -> Result<()> {
        which::which(program)
            .map(|_| ())
            .map_err(|_| Error::ToolNotFound(program.to_string()))
    }
}
