//! # podtop - Gadget Runtime Core
//!
//! podtop is the user-space half of a kernel-instrumentation observability
//! tool. It does two jobs:
//!
//! 1. Turn the BTF type information of a compiled instrumentation program
//!    into typed, user-configurable parameters.
//! 2. Merge periodic per-node metric snapshots into one sorted,
//!    fixed-width report on a fixed cadence.
//!
//! ## Architecture Overview
//!
//! ```text
//!  load time                                 run time
//! ┌──────────────────────────┐           ┌──────────────────────────────┐
//! │ instrumentation object   │           │ node streams (JSON lines)    │
//! │   .BTF section           │           │  node-a  node-b  node-c ...  │
//! └────────────┬─────────────┘           └──────────────┬───────────────┘
//!              ▼                                        ▼ ingest
//! ┌──────────────────────────┐           ┌──────────────────────────────┐
//! │ btf: BtfCatalogue        │           │ top::StatsCollector          │
//! │   VAR name → descriptor  │           │   node → latest batch        │
//! └────────────┬─────────────┘           └──────────────┬───────────────┘
//!              ▼                                        ▼ flush (interval)
//! ┌──────────────────────────┐           ┌──────────────────────────────┐
//! │ params: TypeHint +       │◀─ YAML    │ top::Reporter                │
//! │   ParamRegistry          │  metadata │   flatten → sort → truncate  │
//! └────────────┬─────────────┘           │   → render columns           │
//!              ▼                         └──────────────┬───────────────┘
//! ┌──────────────────────────┐                          ▼
//! │ aya: globals set, load   │                    report sink
//! └──────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`btf`]: parse the BTF blob and resolve variables to type descriptors
//! - [`params`]: type hints, gadget metadata, the parameter registry, value
//!   parsing and loading a program with values applied
//! - [`top`]: the stats collector, sorting, column rendering and the tokio
//!   runner that drives flush cycles
//! - [`cli`]: command-line argument parsing
//! - [`preflight`]: privilege, kernel and object checks before loading
//! - [`domain`]: core types (`NodeName`, `TypeId`) and error enums
//!
//! ## Typical Usage
//!
//! ```bash
//! # List the parameters a program declares
//! podtop params ./tcptop.bpf.o --metadata gadget.yaml
//!
//! # Load it with a value applied
//! sudo podtop params ./tcptop.bpf.o --metadata gadget.yaml --set pid=42 --load
//!
//! # Merge per-node TCP stats into one report
//! podtop tcp --source node-a=a.jsonl --source node-b=b.jsonl --sort-by -sent,pid
//! ```
//!
//! ## Key Concepts
//!
//! - **BTF**: BPF Type Format, the compact type encoding carried in `.BTF`
//! - **Marker variable**: a `gadget_param_<name>` VAR declaring `<name>` tunable
//! - **Envelope**: `{"error": ..., "stats": [...]}`, one per node per interval
//! - **Flush cycle**: one drain, sort, truncate and render of accumulated stats

pub mod btf;
pub mod cli;
pub mod domain;
pub mod params;
pub mod preflight;
pub mod top;
