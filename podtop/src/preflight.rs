//! Pre-flight checks for podtop
//!
//! Validates system requirements before attempting to load an
//! instrumentation program. Provides clear, actionable error messages when
//! requirements aren't met.

#![allow(unsafe_code)] // geteuid() requires unsafe

use anyhow::{bail, Context, Result};
use object::{Object, ObjectSection};
use std::path::Path;

/// Minimum kernel version with BTF-described global data support
const MIN_KERNEL_VERSION: (u32, u32) = (5, 2);

/// Run all pre-flight checks before loading `object_path`
pub fn run_preflight_checks(object_path: &Path) -> Result<()> {
    check_privileges()?;
    check_kernel_version()?;
    check_object_file(object_path)?;
    Ok(())
}

/// Check if running with sufficient privileges to load programs
fn check_privileges() -> Result<()> {
    if unsafe { libc::geteuid() } == 0 {
        return Ok(());
    }

    bail!(
        "Permission denied: podtop requires root privileges to load eBPF programs.\n\n\
         Run with: sudo podtop params --load ..."
    );
}

/// Check if the kernel version is sufficient for global data maps
fn check_kernel_version() -> Result<()> {
    let version_str = std::fs::read_to_string("/proc/version")
        .context("Failed to read kernel version from /proc/version")?;

    // "Linux version 6.1.0-arch1-1 ..."
    let release = version_str.split_whitespace().nth(2).unwrap_or("unknown");

    let Some((major, minor)) = parse_kernel_release(release) else {
        // Can't parse, assume it's fine
        return Ok(());
    };

    if (major, minor) < MIN_KERNEL_VERSION {
        bail!(
            "Kernel version {major}.{minor} is too old.\n\n\
             podtop requires Linux {}.{} or newer for eBPF global variables.\n\
             Current kernel: {release}",
            MIN_KERNEL_VERSION.0,
            MIN_KERNEL_VERSION.1,
        );
    }

    Ok(())
}

fn parse_kernel_release(release: &str) -> Option<(u32, u32)> {
    let mut parts = release.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts.next()?.chars().take_while(char::is_ascii_digit).collect();
    Some((major, minor.parse().ok()?))
}

/// Check that the object exists and carries BTF describing its variables
pub fn check_object_file(object_path: &Path) -> Result<()> {
    if !object_path.exists() {
        bail!(
            "Object not found: {}\n\n\
             Make sure the path is correct and the file exists.",
            object_path.display()
        );
    }
    if !object_path.is_file() {
        bail!("Not a file: {}", object_path.display());
    }

    let data = std::fs::read(object_path)
        .with_context(|| format!("Failed to read object: {}", object_path.display()))?;
    let obj = object::File::parse(&*data)
        .with_context(|| format!("Not an object file: {}", object_path.display()))?;

    if !obj.section_by_name(".BTF").is_some_and(|s| s.size() > 0) {
        bail!(
            "No BTF in {}\n\n\
             Parameters are discovered from BTF. Rebuild the program with debug info (-g).",
            object_path.display()
        );
    }

    Ok(())
}
