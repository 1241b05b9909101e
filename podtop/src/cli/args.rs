//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{ConfigError, NodeName};
use crate::top::{OutputMode, DEFAULT_MAX_ROWS, TCP_DEFAULT_SORT};

/// Node name used for a bare `-` source
pub const LOCAL_NODE: &str = "local";

#[derive(Parser)]
#[command(
    name = "podtop",
    about = "Gadget parameters and per-node top reports",
    after_help = "\
EXAMPLES:
    podtop params ./tcptop.bpf.o --metadata gadget.yaml      List parameters
    sudo podtop params ./tcptop.bpf.o --set pid=42 --load    Load with a value
    podtop tcp --source node-a=a.jsonl --source node-b=b.jsonl
    gadget-stream | podtop tcp --source -                    Read stdin"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the parameters an instrumentation program declares
    Params(ParamsArgs),
    /// Top TCP connections by traffic across nodes
    Tcp(TcpArgs),
}

#[derive(clap::Args)]
pub struct ParamsArgs {
    /// Compiled instrumentation program (eBPF object with BTF)
    #[arg(value_name = "OBJECT")]
    pub object: PathBuf,

    /// Gadget metadata YAML
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Parameter value, by key (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Load the program into the kernel with the resolved values
    #[arg(long)]
    pub load: bool,
}

#[derive(clap::Args)]
pub struct TcpArgs {
    /// Stats stream for a node as NODE=PATH, or `-` for stdin (repeatable)
    #[arg(long = "source", value_name = "NODE=PATH", required = true)]
    pub sources: Vec<String>,

    /// Sort keys, `-` prefix for descending
    #[arg(long, default_value = TCP_DEFAULT_SORT)]
    pub sort_by: String,

    /// Maximum rows per interval
    #[arg(short, long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Columns as name[:width], negative width left-aligns
    #[arg(long)]
    pub columns: Option<String>,

    /// Seconds between reports
    #[arg(long, default_value = "1")]
    pub interval: u64,

    /// Stop after N seconds (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub duration: u64,

    /// Don't print a header before each report
    #[arg(long)]
    pub no_header: bool,

    /// Output format: columns or json
    #[arg(short, long, default_value = "columns")]
    pub output: OutputMode,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse a `NODE=PATH` source. A bare `-` is stdin for the local node.
///
/// # Errors
/// Returns `BadSource` when the node or path is empty
pub fn parse_source(raw: &str) -> Result<(NodeName, PathBuf), ConfigError> {
    if raw == "-" {
        return Ok((NodeName::from(LOCAL_NODE), PathBuf::from("-")));
    }
    match raw.split_once('=') {
        Some((node, path)) if !node.is_empty() && !path.is_empty() => {
            Ok((NodeName::from(node), PathBuf::from(path)))
        }
        _ => Err(ConfigError::BadSource(raw.to_string())),
    }
}

/// Collect `KEY=VALUE` overrides; a later key replaces an earlier one.
///
/// # Errors
/// Returns the offending entry if it has no `=` or an empty key
pub fn parse_overrides(raw: &[String]) -> Result<HashMap<String, String>, String> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(entry.clone()),
        })
        .collect()
}
