// src/error.rs

//! Error types for recipe parsing and cooking
//!
//! Every failure is fatal for the run that hit it. The variants follow the
//! order of the pipeline so a caller can tell which step stopped the run.

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing, validating, or cooking a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Cloning or checking out the upstream source failed
    #[error("Source fetch failed for {0}: {1}")]
    SourceFetchFailed(String, String),

    /// The build system could not be configured
    #[error("Build configuration failed: {0}")]
    ConfigureFailed(String),

    /// A build or compile subprocess exited unsuccessfully
    #[error("{phase} phase failed: {message}")]
    BuildFailed { phase: String, message: String },

    /// Copying artifacts into the package directory failed
    #[error("Packaging failed: {0}")]
    PackageFailed(String),

    /// Recipe or configuration file could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A build setting was unknown or had an unsupported value
    #[error("Invalid setting: {0}")]
    InvalidSettings(String),

    /// Directory layout or other runner configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An external tool is not installed
    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a failed build subprocess
    pub fn build_failed(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BuildFailed {
            phase: phase.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_failed_display() {
        let err = Error::build_failed("compile", "exit code 2");
        assert_eq!(err.to_string(), "compile phase failed: exit code 2");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
