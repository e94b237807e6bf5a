// src/commands/verify.rs

//! Verify command - check a package dir against its manifest

use anyhow::{Context, Result, bail};
use kitchen::PackageManifest;
use std::path::Path;

pub fn cmd_verify(package_dir: &Path) -> Result<()> {
    let manifest = PackageManifest::read(package_dir)
        .with_context(|| format!("Failed to read manifest in {}", package_dir.display()))?;

    let bad = manifest
        .verify(package_dir)
        .with_context(|| format!("Failed to verify {}", package_dir.display()))?;

    if !bad.is_empty() {
        for path in &bad {
            println!("[FAILED] {}", path);
        }
        bail!(
            "{} of {} file(s) missing or modified",
            bad.len(),
            manifest.files.len()
        );
    }

    println!(
        "[OK] {}/{} ({}): {} file(s) verified",
        manifest.package.name,
        manifest.package.version,
        manifest.package.id,
        manifest.files.len()
    );
    Ok(())
}
