//! Peripheral driver: CLI parsing, CSV script loading, interactive
//! prompt, and statistics printing (spec.md §6) around the B-tree and
//! Linear Hashing engines.

mod engine;
mod interactive;
mod stats;

use std::fs::{File, OpenOptions};
use std::process::ExitCode;

use btree_index::BTree;
use clap::Parser;
use hash_index::LinearHash;
use index_core::error::IndexError;
use index_core::loader::load_script;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::engine::{AnyEngine, IndexKind};

/// A disk-page-budgeted secondary index over integer-tuple records
/// (spec.md §6 "CLI surface").
#[derive(Parser)]
#[command(name = "index-cli", about = "B-tree / Linear Hashing secondary index driver")]
struct Cli {
    /// Index type: btree|b (B-tree) or linear|l (Linear Hashing).
    #[arg(short = 't', long = "type")]
    index_type: String,

    /// CSV script to load; omit to start the interactive prompt.
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Page size in bytes, minimum 256.
    #[arg(short = 'p', long = "page-size", default_value_t = 512)]
    page_size: usize,

    /// Enable debug-level diagnostics.
    #[arg(short = 'D', long = "debug")]
    debug: bool,

    /// Hash only: initial bucket count (power of two).
    #[arg(short = 'b', long = "buckets", default_value_t = 4)]
    buckets: usize,

    /// Hash only: load-factor utilization threshold, in (0, 1].
    #[arg(short = 'u', long = "utilization", default_value_t = 0.8)]
    utilization: f64,

    /// B-tree only: print every record with a key in [LO, HI] after loading.
    #[arg(long = "range", num_args = 2, value_names = ["LO", "HI"])]
    range: Option<Vec<i64>>,

    /// Print statistics after loading (or after the interactive session ends).
    #[arg(short = 's', long = "stats")]
    stats: bool,
}

fn init_diagnostics(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open("index-cli.log")
        .expect("failed to open diagnostics log file");

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn build_engine(cli: &Cli) -> Result<AnyEngine, IndexError> {
    let kind = IndexKind::parse(&cli.index_type)?;
    if cli.range.is_some() && kind == IndexKind::Hash {
        return Err(IndexError::Usage("--range is only valid for the B-tree engine".into()));
    }
    match kind {
        IndexKind::Tree => Ok(AnyEngine::Tree(BTree::new(cli.page_size)?)),
        IndexKind::Hash => Ok(AnyEngine::Hash(LinearHash::new(cli.page_size, cli.buckets, cli.utilization)?)),
    }
}

fn run(cli: Cli) -> Result<i32, IndexError> {
    let mut engine = build_engine(&cli)?;

    let exit_code = match &cli.file {
        Some(path) => {
            let file = File::open(path)?;
            let report = load_script(&mut engine, file)?;
            info!(
                inserted = report.inserted,
                duplicates = report.duplicates,
                removed = report.removed,
                not_found = report.not_found,
                skipped = report.skipped,
                "script load complete"
            );
            for (key, found) in &report.searches {
                if found.is_empty() {
                    println!("? {key} -> (no match)");
                } else {
                    for record in found {
                        println!("? {key} -> {:?}", record.elements());
                    }
                }
            }
            interactive::EXIT_CLEAN
        }
        None => interactive::run(&mut engine),
    };

    if let Some(range) = &cli.range {
        if let Some(found) = engine.range_search(range[0], range[1]) {
            for record in found {
                println!("range -> {:?}", record.elements());
            }
        }
    }

    if cli.stats {
        stats::print(&engine.statistics());
    }

    Ok(exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_diagnostics(cli.debug);

    match run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
