//! Query Replay Benchmark
//!
//! Loads a catalog export, builds the full engine, replays a fixed set of
//! labeled queries through the router, and writes the ordered result names
//! per test case for offline scoring.
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/bench_queries catalog.json cases.json results.json
//! ```
//!
//! ## Inputs
//!
//! `catalog.json` - a JSON array of medicine records (`id`, `name`, and
//! optional catalog fields). Malformed records are skipped and counted,
//! never fatal.
//!
//! `cases.json` - a JSON array of test cases:
//!
//! ```json
//! [
//!   {"id": "1", "type": "prefix",   "query": "Para"},
//!   {"id": "2", "type": "fuzzy",    "query": "Paracetmol"},
//!   {"id": "3", "type": "fulltext", "query": "500mg tablet"}
//! ]
//! ```
//!
//! Every case runs with `limit = 10, offset = 0`.
//!
//! ## Output
//!
//! `results.json` - one JSON object mapping test id to the ordered list of
//! matched record names:
//!
//! ```json
//! {"1": ["Paracetamol 500mg", "Paracetamol 650mg"], "2": ["..."]}
//! ```
//!
//! The shape is fixed; external scorers diff it directly.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::process;
use std::time::Instant;

use medigram_core::{Catalog, SearchEngine};
use medigram_types::SearchMode;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Page size mandated by the benchmark contract.
const BENCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct BenchCase {
    id: String,
    #[serde(rename = "type")]
    mode: SearchMode,
    query: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: bench_queries <catalog.json> <cases.json> <out.json>");
        process::exit(1);
    }

    println!("Loading catalog...");
    let catalog_json = fs::read_to_string(&args[1])?;
    let mut catalog = Catalog::new();
    let report = catalog.ingest_json(&catalog_json)?;
    println!("Ingest      : {report}");

    let start = Instant::now();
    let engine = SearchEngine::build(catalog);
    let build_secs = start.elapsed().as_secs_f64();
    println!("Build       : {:.3} s ({})", build_secs, engine.stats());

    let cases: Vec<BenchCase> = serde_json::from_str(&fs::read_to_string(&args[2])?)?;
    println!("Cases       : {}\n", cases.len());

    let mut results: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut rejected = 0usize;

    let start = Instant::now();
    for case in &cases {
        let names = match engine.search(case.mode, &case.query, Some(BENCH_LIMIT), 0) {
            Ok(hits) => hits.into_iter().map(|hit| hit.name).collect(),
            Err(err) => {
                eprintln!("case {}: {err}", case.id);
                rejected += 1;
                Vec::new()
            }
        };
        results.insert(case.id.clone(), names);
    }
    let elapsed = start.elapsed();

    fs::write(&args[3], serde_json::to_string_pretty(&results)?)?;

    let secs = elapsed.as_secs_f64();
    println!("--------------------------------");
    println!("Queries     : {}", cases.len());
    println!("Rejected    : {rejected}");
    println!("Elapsed     : {secs:.3} s");
    if secs > 0.0 {
        println!("Queries/sec : {:.0}", cases.len() as f64 / secs);
    }
    println!("--------------------------------");
    println!("Results written to {}", args[3]);

    Ok(())
}
