// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe").required(true).help("Path to the recipe file")
}

/// Options shared by the commands that run a step
fn run_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help("Override a build setting (os, compiler, compiler.version, build_type, arch)"),
    )
    .arg(
        Arg::new("dep")
            .long("dep")
            .value_name("NAME=PATH")
            .action(ArgAction::Append)
            .help("Root directory of an already-built requirement"),
    )
    .arg(Arg::new("source_dir").long("source-dir").help("Directory sources are cloned into"))
    .arg(Arg::new("build_dir").long("build-dir").help("Directory the build runs in"))
    .arg(
        Arg::new("package_dir")
            .long("package-dir")
            .help("Directory packaged artifacts are written to"),
    )
    .arg(Arg::new("jobs").short('j').long("jobs").help("Number of parallel compile jobs"))
    .arg(
        Arg::new("reuse_source")
            .long("reuse-source")
            .action(ArgAction::SetTrue)
            .help("Reuse an existing checkout instead of failing"),
    )
}

fn build_cli() -> Command {
    Command::new("kitchen")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Kitchen Contributors")
        .about("Fetch, build, and package C/C++ libraries from recipes")
        .arg(Arg::new("config").long("config").value_name("FILE").help("Configuration file"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            run_args(
                Command::new("cook")
                    .about("Fetch sources, build, and package a recipe")
                    .arg(recipe_arg()),
            )
            .arg(
                Arg::new("validate_only")
                    .long("validate-only")
                    .action(ArgAction::SetTrue)
                    .help("Only validate the recipe, don't cook"),
            ),
        )
        .subcommand(run_args(
            Command::new("source").about("Clone the recipe's sources").arg(recipe_arg()),
        ))
        .subcommand(run_args(
            Command::new("build")
                .about("Configure and compile previously fetched sources")
                .arg(recipe_arg()),
        ))
        .subcommand(run_args(
            Command::new("package")
                .about("Copy build outputs into the package directory")
                .arg(recipe_arg()),
        ))
        .subcommand(
            run_args(
                Command::new("info")
                    .about("Show the recipe, effective settings, package id, and build commands")
                    .arg(recipe_arg()),
            )
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue).help("Print as JSON")),
        )
        .subcommand(
            Command::new("verify")
                .about("Check packaged files against manifest.toml")
                .arg(Arg::new("package_dir").required(true).help("Package directory")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("kitchen.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
