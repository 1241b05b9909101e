//! # podtop - Main Entry Point
//!
//! Two subcommands:
//! - **params** (`podtop params OBJECT`): list a program's parameters, resolve
//!   values and optionally load it with them applied
//! - **tcp** (`podtop tcp --source NODE=PATH ...`): merge per-node TCP stats
//!   into one periodic report

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use podtop::btf::BtfCatalogue;
use podtop::cli::{parse_overrides, parse_source, Args, Command, ParamsArgs, TcpArgs};
use podtop::domain::ConfigError;
use podtop::params::{load_with_params, param_table, value_lines, GadgetMetadata, ParamRegistry};
use podtop::preflight::run_preflight_checks;
use podtop::top::{self, ColumnSet, ExitReason, NodeSource, ReportConfig, Reporter, StatsCollector};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_USAGE;
    }
    let msg = err.to_string().to_lowercase();
    if msg.contains("permission denied") || msg.contains("requires root") {
        EXIT_NOPERM
    } else if msg.contains("invalid --set") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Params(params) => run_params(&params),
        Command::Tcp(tcp) => run_tcp(tcp).await,
    }
}

fn run_params(args: &ParamsArgs) -> Result<()> {
    let catalogue = BtfCatalogue::from_object_file(&args.object)
        .with_context(|| format!("Failed to read BTF from {}", args.object.display()))?;

    let metadata = match &args.metadata {
        Some(path) => GadgetMetadata::from_file(path)
            .with_context(|| format!("Failed to read metadata {}", path.display()))?,
        None => GadgetMetadata::default(),
    };

    let mut registry = ParamRegistry::new(catalogue, metadata);
    let markers = registry.discover()?;
    info!("{markers} parameter marker(s) in {}", args.object.display());

    for line in param_table(&registry) {
        println!("{line}");
    }

    let overrides = parse_overrides(&args.set)
        .map_err(|entry| anyhow::anyhow!("Invalid --set {entry:?}, expected KEY=VALUE"))?;
    let values = registry.resolve_values(&overrides)?;
    if !values.is_empty() {
        println!();
        for line in value_lines(&values) {
            println!("{line}");
        }
    }

    if args.load {
        run_preflight_checks(&args.object)?;
        let _bpf = load_with_params(&args.object, &values)
            .with_context(|| format!("Failed to load {}", args.object.display()))?;
        println!("loaded: {}", args.object.display());
    }

    Ok(())
}

async fn run_tcp(args: TcpArgs) -> Result<()> {
    let config =
        ReportConfig::from_specs(&ColumnSet::tcp(), &args.sort_by, args.max_rows, args.columns.as_deref())?
            .with_header(!args.no_header)
            .with_output(args.output);

    let mut sources = Vec::with_capacity(args.sources.len());
    for raw in &args.sources {
        let (node, path) = parse_source(raw)?;
        let source = NodeSource::open(node, &path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        sources.push(source);
    }

    let interval = Duration::from_secs(args.interval.max(1));
    let duration_limit = (args.duration > 0).then(|| Duration::from_secs(args.duration));

    // Stop on Ctrl+C or when the duration limit is reached
    let shutdown = async move {
        let limit = async {
            match duration_limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => ExitReason::Interrupted,
            () = limit => ExitReason::DurationElapsed,
        }
    };

    let mut reporter = Reporter::new(Arc::new(StatsCollector::new()), config, std::io::stdout());
    let started = Instant::now();
    let summary = top::run(&mut reporter, sources, interval, shutdown)
        .await
        .context("Failed to write report")?;

    if !args.quiet {
        eprintln!(
            "\n{}: {:.1}s, {} reports, {} lines (decode errors: {}, node errors: {})",
            summary.exit_reason,
            started.elapsed().as_secs_f64(),
            summary.cycles,
            summary.lines,
            summary.decode_errors,
            summary.node_errors,
        );
    }

    Ok(())
}
