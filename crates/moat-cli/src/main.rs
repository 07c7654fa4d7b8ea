//! moat-cli: score a company's moat from its annual financial history.
//!
//! For each symbol, loads the most recent JSON snapshot under
//! `<data-root>/<SYMBOL>/01-data`, scores revenue / diluted EPS / equity /
//! free-cash-flow growth over ten years, and writes the report to
//! `<data-root>/<SYMBOL>/04-moat/<date>.json`.
//!
//! Usage:
//!   moat-cli --data-root ./stocks AAPL MSFT
//!   MOAT_DATA_ROOT=./stocks moat-cli AAPL

use moat_analysis::MoatAnalysisEngine;
use snapshot_store::SnapshotStore;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moat_cli=info,snapshot_store=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut data_root = std::env::var("MOAT_DATA_ROOT").ok();
    let mut symbols: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--data-root" {
            match iter.next() {
                Some(path) => data_root = Some(path.clone()),
                None => usage("--data-root needs a path"),
            }
        } else if arg.starts_with("--") {
            usage(&format!("unknown option {arg}"));
        } else {
            symbols.push(arg.clone());
        }
    }

    let Some(data_root) = data_root else {
        usage("no data root given (--data-root or MOAT_DATA_ROOT)");
    };
    if symbols.is_empty() {
        usage("no symbols given");
    }

    let store = SnapshotStore::new(&data_root);
    let engine = MoatAnalysisEngine::new();

    let total = symbols.len();
    tracing::info!("moat-cli: {} symbols, data root {}", total, data_root);

    // Symbols are evaluated strictly one after another; a failure is
    // logged and counted, never silently dropped.
    let mut failed = 0usize;
    for (i, symbol) in symbols.iter().enumerate() {
        match evaluate_symbol(&store, &engine, symbol) {
            Ok(path) => {
                tracing::info!("[{}/{}] {} => {}", i + 1, total, symbol, path.display());
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("[{}/{}] {} failed: {}", i + 1, total, symbol, e);
            }
        }
    }

    tracing::info!("Done! {} symbols evaluated ({} failed)", total, failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Read the latest snapshot, score it, persist the dated report.
fn evaluate_symbol(
    store: &SnapshotStore,
    engine: &MoatAnalysisEngine,
    symbol: &str,
) -> anyhow::Result<PathBuf> {
    let history = store.history(symbol)?;
    let report = engine.analyze(symbol, &history)?;
    let path = store.persist_report(&report)?;
    Ok(path)
}

fn usage(problem: &str) -> ! {
    eprintln!("moat-cli: {problem}");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  moat-cli [--data-root PATH] SYMBOL [SYMBOL ...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-root PATH   Stock data root (default: $MOAT_DATA_ROOT)");
    std::process::exit(1);
}
