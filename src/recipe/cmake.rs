// src/recipe/cmake.rs

//! Translation of build settings into CMake command lines
//!
//! Picks a generator for the (OS, compiler) pair and turns the remaining
//! settings into `-D` definitions. Multi-config generators (Visual Studio)
//! take the build type at build time via `--config` instead of
//! `CMAKE_BUILD_TYPE`.

use crate::error::{Error, Result};
use crate::settings::{Arch, BuildSettings, Compiler, Os};
use std::collections::BTreeMap;
use std::path::Path;

/// Visual Studio version -> (generator name, uses `-A` for the platform)
const VISUAL_STUDIO: &[(&str, &str, bool)] = &[
    ("12", "Visual Studio 12 2013", false),
    ("14", "Visual Studio 14 2015", false),
    ("15", "Visual Studio 15 2017", false),
    ("16", "Visual Studio 16 2019", true),
    ("17", "Visual Studio 17 2022", true),
];

/// A configured CMake invocation for one set of build settings
#[derive(Debug, Clone)]
pub struct CMakeCommand {
    settings: BuildSettings,
    generator: String,
    /// Platform passed with `-A` (newer Visual Studio generators)
    platform: Option<&'static str>,
    cross: bool,
}

impl CMakeCommand {
    /// Build a command for the given settings on the current host
    pub fn new(settings: &BuildSettings) -> Result<Self> {
        Self::with_host(settings, &BuildSettings::detect())
    }

    /// Build a command as if running on `host`
    pub fn with_host(settings: &BuildSettings, host: &BuildSettings) -> Result<Self> {
        let (generator, platform) = select_generator(settings)?;
        Ok(Self {
            settings: settings.clone(),
            generator,
            platform,
            cross: settings.is_cross_from(host),
        })
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Whether the generator picks the configuration at build time
    pub fn is_multi_config(&self) -> bool {
        self.generator.starts_with("Visual Studio")
    }

    /// Arguments for the configure step, run from the build directory
    pub fn configure_args(
        &self,
        source_dir: &Path,
        definitions: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let s = &self.settings;
        let mut args = vec![
            source_dir.to_string_lossy().to_string(),
            "-G".to_string(),
            self.generator.clone(),
        ];

        if let Some(platform) = self.platform {
            args.push("-A".to_string());
            args.push(platform.to_string());
        }

        if !self.is_multi_config() {
            args.push(define("CMAKE_BUILD_TYPE", s.build_type.as_str()));
        }

        args.push(define("KITCHEN_EXPORTED", "1"));
        args.push(define("KITCHEN_COMPILER", s.compiler.as_str()));
        if let Some(version) = &s.compiler_version {
            args.push(define("KITCHEN_COMPILER_VERSION", version));
        }

        if let Some(flag) = self.bitness_flag() {
            args.push(define("CMAKE_C_FLAGS", flag));
            args.push(define("CMAKE_CXX_FLAGS", flag));
            args.push(define("CMAKE_SHARED_LINKER_FLAGS", flag));
        }

        if self.cross {
            args.push(define("CMAKE_SYSTEM_NAME", s.os.cmake_system_name()));
            args.push(define("CMAKE_SYSTEM_PROCESSOR", s.arch.cmake_processor()));
        }

        for (key, value) in definitions {
            args.push(define(key, value));
        }

        args.push("-Wno-dev".to_string());
        args
    }

    /// Arguments for `cmake --build`
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["--build".to_string(), ".".to_string()];
        if self.is_multi_config() {
            args.push("--config".to_string());
            args.push(self.settings.build_type.as_str().to_string());
        }
        args
    }

    fn bitness_flag(&self) -> Option<&'static str> {
        if !self.settings.compiler.is_gcc_like() {
            return None;
        }
        match self.settings.arch {
            Arch::X86 => Some("-m32"),
            Arch::X86_64 => Some("-m64"),
            Arch::Armv7 | Arch::Armv8 => None,
        }
    }
}

fn define(key: &str, value: &str) -> String {
    format!("-D{}={}", key, value)
}

fn select_generator(settings: &BuildSettings) -> Result<(String, Option<&'static str>)> {
    match (settings.os, settings.compiler) {
        (Os::Windows, Compiler::Msvc) => visual_studio_generator(settings),
        (_, Compiler::Msvc) => Err(Error::ConfigureFailed(format!(
            "compiler msvc is only available for os=Windows (got os={})",
            settings.os.as_str()
        ))),
        (os, Compiler::AppleClang) if os != Os::Macos => Err(Error::ConfigureFailed(format!(
            "compiler apple-clang is only available for os=Macos (got os={})",
            os.as_str()
        ))),
        (Os::Windows, Compiler::Gcc) => Ok(("MinGW Makefiles".to_string(), None)),
        _ => Ok(("Unix Makefiles".to_string(), None)),
    }
}

fn visual_studio_generator(settings: &BuildSettings) -> Result<(String, Option<&'static str>)> {
    let version = settings.compiler_version.as_deref().ok_or_else(|| {
        Error::ConfigureFailed("compiler.version is required for compiler=msvc".to_string())
    })?;

    // Accept "16" as well as "16.4"
    let major = version.split('.').next().unwrap_or(version);
    let (_, name, uses_platform) = VISUAL_STUDIO
        .iter()
        .find(|(v, _, _)| *v == major)
        .ok_or_else(|| {
            Error::ConfigureFailed(format!("unsupported Visual Studio version '{}'", version))
        })?;

    if *uses_platform {
        let platform = match settings.arch {
            Arch::X86 => "Win32",
            Arch::X86_64 => "x64",
            Arch::Armv7 => "ARM",
            Arch::Armv8 => "ARM64",
        };
        return Ok((name.to_string(), Some(platform)));
    }

    let generator = match settings.arch {
        Arch::X86 => name.to_string(),
        Arch::X86_64 => format!("{} Win64", name),
        Arch::Armv7 => format!("{} ARM", name),
        Arch::Armv8 => {
            return Err(Error::ConfigureFailed(format!(
                "{} cannot target armv8",
                name
            )));
        }
    };
    Ok((generator, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BuildType;

    fn settings(os: Os, compiler: Compiler, arch: Arch) -> BuildSettings {
        BuildSettings {
            os,
            compiler,
            compiler_version: None,
            build_type: BuildType::Release,
            arch,
        }
    }

    fn linux_host() -> BuildSettings {
        settings(Os::Linux, Compiler::Gcc, Arch::X86_64)
    }

    #[test]
    fn test_unix_makefiles() {
        let s = linux_host();
        let cmd = CMakeCommand::with_host(&s, &linux_host()).unwrap();
        assert_eq!(cmd.generator(), "Unix Makefiles");
        assert!(!cmd.is_multi_config());

        let args = cmd.configure_args(Path::new("/src/fruit"), &BTreeMap::new());
        assert_eq!(
            args,
            [
                "/src/fruit",
                "-G",
                "Unix Makefiles",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DKITCHEN_EXPORTED=1",
                "-DKITCHEN_COMPILER=gcc",
                "-DCMAKE_C_FLAGS=-m64",
                "-DCMAKE_CXX_FLAGS=-m64",
                "-DCMAKE_SHARED_LINKER_FLAGS=-m64",
                "-Wno-dev",
            ]
        );
        assert_eq!(cmd.build_args(), ["--build", "."]);
    }

    #[test]
    fn test_x86_and_definitions() {
        let mut s = settings(Os::Linux, Compiler::Clang, Arch::X86);
        s.compiler_version = Some("15".to_string());
        s.build_type = BuildType::Debug;
        let cmd = CMakeCommand::with_host(&s, &linux_host()).unwrap();

        let mut defs = BTreeMap::new();
        defs.insert("FRUIT_USES_BOOST".to_string(), "ON".to_string());
        defs.insert("BUILD_SHARED_LIBS".to_string(), "OFF".to_string());
        let args = cmd.configure_args(Path::new("src"), &defs);

        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Debug".to_string()));
        assert!(args.contains(&"-DKITCHEN_COMPILER_VERSION=15".to_string()));
        assert!(args.contains(&"-DCMAKE_CXX_FLAGS=-m32".to_string()));
        // definitions come out sorted, before -Wno-dev
        let n = args.len();
        assert_eq!(args[n - 3], "-DBUILD_SHARED_LIBS=OFF");
        assert_eq!(args[n - 2], "-DFRUIT_USES_BOOST=ON");
        assert_eq!(args[n - 1], "-Wno-dev");
    }

    #[test]
    fn test_visual_studio_legacy_generator() {
        let mut s = settings(Os::Windows, Compiler::Msvc, Arch::X86_64);
        s.compiler_version = Some("14".to_string());
        let cmd = CMakeCommand::with_host(&s, &s).unwrap();
        assert_eq!(cmd.generator(), "Visual Studio 14 2015 Win64");
        assert!(cmd.is_multi_config());

        let args = cmd.configure_args(Path::new("src"), &BTreeMap::new());
        assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_BUILD_TYPE")));
        assert!(!args.iter().any(|a| a.contains("-m64")));
        assert_eq!(cmd.build_args(), ["--build", ".", "--config", "Release"]);
    }

    #[test]
    fn test_visual_studio_platform_flag() {
        let mut s = settings(Os::Windows, Compiler::Msvc, Arch::X86);
        s.compiler_version = Some("17.8".to_string());
        let cmd = CMakeCommand::with_host(&s, &s).unwrap();
        assert_eq!(cmd.generator(), "Visual Studio 17 2022");
        let args = cmd.configure_args(Path::new("src"), &BTreeMap::new());
        assert_eq!(&args[3..5], ["-A", "Win32"]);
    }

    #[test]
    fn test_msvc_requires_version() {
        let s = settings(Os::Windows, Compiler::Msvc, Arch::X86_64);
        assert!(matches!(
            CMakeCommand::with_host(&s, &s),
            Err(Error::ConfigureFailed(_))
        ));
    }

    #[test]
    fn test_mismatched_compiler() {
        let s = settings(Os::Linux, Compiler::Msvc, Arch::X86_64);
        assert!(CMakeCommand::with_host(&s, &linux_host()).is_err());
        let s = settings(Os::Linux, Compiler::AppleClang, Arch::X86_64);
        assert!(CMakeCommand::with_host(&s, &linux_host()).is_err());
    }

    #[test]
    fn test_mingw() {
        let s = settings(Os::Windows, Compiler::Gcc, Arch::X86_64);
        let cmd = CMakeCommand::with_host(&s, &s).unwrap();
        assert_eq!(cmd.generator(), "MinGW Makefiles");
        assert!(!cmd.is_multi_config());
    }

    #[test]
    fn test_cross_definitions() {
        let s = settings(Os::Windows, Compiler::Gcc, Arch::X86_64);
        let cmd = CMakeCommand::with_host(&s, &linux_host()).unwrap();
        let args = cmd.configure_args(Path::new("src"), &BTreeMap::new());
        assert!(args.contains(&"-DCMAKE_SYSTEM_NAME=Windows".to_string()));
        assert!(args.contains(&"-DCMAKE_SYSTEM_PROCESSOR=x86_64".to_string()));
    }
}
