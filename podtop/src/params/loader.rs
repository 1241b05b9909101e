//! Loading an instrumentation program with its parameter values applied.
//!
//! Parameters live in the program's read-only globals (`.rodata`). Values
//! must be written before the maps are created, so they are handed to the
//! loader rather than patched afterwards.

use aya::{Ebpf, EbpfLoader};
use aya_log::EbpfLogger;
use log::{debug, info};
use std::path::Path;

use super::registry::ResolvedParam;
use crate::domain::LoadError;

/// Load the object at `path`, setting one global per resolved parameter.
///
/// Every value must name an existing global; a missing one fails the load.
///
/// # Errors
/// Returns an error if the object cannot be loaded or a global is missing
pub fn load_with_params(path: &Path, params: &[ResolvedParam]) -> Result<Ebpf, LoadError> {
    let images: Vec<(&str, Vec<u8>)> =
        params.iter().map(|p| (p.var_name.as_str(), p.value.to_bytes())).collect();

    let mut loader = EbpfLoader::new();
    for (name, bytes) in &images {
        debug!("setting global {name} ({} bytes)", bytes.len());
        loader.set_global(name, bytes.as_slice(), true);
    }

    let mut bpf = loader.load_file(path)?;
    info!("✓ Loaded {} with {} parameter(s)", path.display(), params.len());
    init_ebpf_logger(&mut bpf);
    Ok(bpf)
}

/// Initialize eBPF logger
///
/// Programs built without `aya-log` have no log map; that is not an error.
pub fn init_ebpf_logger(bpf: &mut Ebpf) {
    if let Err(e) = EbpfLogger::init(bpf) {
        debug!("eBPF logger not initialized: {e}");
    }
}
