// src/settings.rs

//! Build settings supplied by the host
//!
//! A run is parameterized by four settings: operating system, compiler,
//! build type and architecture. They default to the host and can be
//! overridden one `key=value` assignment at a time.

use crate::error::{Error, Result};
use std::fmt;

/// Names of the top-level settings, in canonical order
pub const SETTING_NAMES: &[&str] = &["os", "compiler", "build_type", "arch"];

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    FreeBsd,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Macos => "Macos",
            Self::FreeBsd => "FreeBSD",
        }
    }

    /// Value for `CMAKE_SYSTEM_NAME`
    pub fn cmake_system_name(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Macos => "Darwin",
            Self::FreeBsd => "FreeBSD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "windows" | "win" => Some(Self::Windows),
            "macos" | "darwin" | "osx" => Some(Self::Macos),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }

    /// The OS this binary was compiled for
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            "freebsd" => Self::FreeBsd,
            _ => Self::Linux,
        }
    }
}

/// Compiler family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    /// Microsoft Visual C++ (Visual Studio)
    Msvc,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gcc" | "g++" => Some(Self::Gcc),
            "clang" => Some(Self::Clang),
            "apple-clang" | "apple_clang" | "appleclang" => Some(Self::AppleClang),
            "msvc" | "visual studio" | "visual_studio" | "vs" => Some(Self::Msvc),
            _ => None,
        }
    }

    /// The usual compiler for an OS
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Self::Msvc,
            Os::Macos => Self::AppleClang,
            Os::FreeBsd => Self::Clang,
            Os::Linux => Self::Gcc,
        }
    }

    /// Whether the compiler accepts GCC-style `-m32`/`-m64` flags
    pub fn is_gcc_like(&self) -> bool {
        matches!(self, Self::Gcc | Self::Clang | Self::AppleClang)
    }
}

/// CMake build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "release" => Some(Self::Release),
            "relwithdebinfo" => Some(Self::RelWithDebInfo),
            "minsizerel" => Some(Self::MinSizeRel),
            _ => None,
        }
    }
}

/// Target CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv7 => "armv7",
            Self::Armv8 => "armv8",
        }
    }

    /// Value for `CMAKE_SYSTEM_PROCESSOR`
    pub fn cmake_processor(&self) -> &'static str {
        match self {
            Self::X86 => "i686",
            Self::X86_64 => "x86_64",
            Self::Armv7 => "armv7",
            Self::Armv8 => "aarch64",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x86" | "i386" | "i686" => Some(Self::X86),
            "x86_64" | "amd64" | "x64" => Some(Self::X86_64),
            "armv7" | "arm" => Some(Self::Armv7),
            "armv8" | "aarch64" | "arm64" => Some(Self::Armv8),
            _ => None,
        }
    }

    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "arm" => Self::Armv7,
            "aarch64" => Self::Armv8,
            _ => Self::X86_64,
        }
    }
}

/// The (OS, compiler, build type, arch) tuple for one run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildSettings {
    pub os: Os,
    pub compiler: Compiler,
    /// Compiler version, e.g. `9` for gcc or `17` for Visual Studio 2022
    pub compiler_version: Option<String>,
    pub build_type: BuildType,
    pub arch: Arch,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::detect()
    }
}

impl BuildSettings {
    /// Settings describing the host, building in Release mode
    pub fn detect() -> Self {
        let os = Os::host();
        Self {
            os,
            compiler: Compiler::default_for(os),
            compiler_version: None,
            build_type: BuildType::default(),
            arch: Arch::host(),
        }
    }

    /// Apply one `key=value` override
    ///
    /// Accepted keys: `os`, `compiler`, `compiler.version`, `build_type`, `arch`.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| {
                Error::InvalidSettings(format!("expected key=value, got '{}'", assignment))
            })?;

        if value.is_empty() {
            return Err(Error::InvalidSettings(format!("empty value for '{}'", key)));
        }

        let unknown = |kind: &str| Error::InvalidSettings(format!("unknown {} '{}'", kind, value));

        match key {
            "os" => self.os = Os::parse(value).ok_or_else(|| unknown("os"))?,
            "compiler" => self.compiler = Compiler::parse(value).ok_or_else(|| unknown("compiler"))?,
            "compiler.version" => self.compiler_version = Some(value.to_string()),
            "build_type" => {
                self.build_type = BuildType::parse(value).ok_or_else(|| unknown("build_type"))?
            }
            "arch" => self.arch = Arch::parse(value).ok_or_else(|| unknown("arch"))?,
            _ => return Err(Error::InvalidSettings(format!("unknown setting '{}'", key))),
        }

        Ok(())
    }

    /// Apply a list of overrides in order
    pub fn with_overrides<I, S>(mut self, assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            self.apply(assignment.as_ref())?;
        }
        Ok(self)
    }

    /// All settings as ordered `(key, value)` pairs
    pub fn values(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("os", self.os.as_str().to_string()),
            ("compiler", self.compiler.as_str().to_string()),
        ];
        if let Some(version) = &self.compiler_version {
            values.push(("compiler.version", version.clone()));
        }
        values.push(("build_type", self.build_type.as_str().to_string()));
        values.push(("arch", self.arch.as_str().to_string()));
        values
    }

    /// Only the settings a recipe declares itself sensitive to
    ///
    /// Sub-settings such as `compiler.version` follow their parent.
    pub fn restricted_to(&self, declared: &[String]) -> Vec<(&'static str, String)> {
        self.values()
            .into_iter()
            .filter(|(key, _)| {
                let top = key.split('.').next().unwrap_or(*key);
                declared.iter().any(|d| d == top)
            })
            .collect()
    }

    /// Whether these settings target a different OS than `host`
    pub fn is_cross_from(&self, host: &BuildSettings) -> bool {
        self.os != host.os
    }
}

impl fmt::Display for BuildSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
