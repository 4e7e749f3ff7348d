//! CLI entry point: wires the TSV/JSON loaders to the propagation core
//! and the results writer, and times each phase. The only file this
//! crate ships that knows about file paths and argv -- per spec.md §1,
//! everything downstream of loading takes already-parsed records.

use std::time::Instant;

use clap::Parser;
use log::info;

use bgp_route_extrapolator::config::RunConfig;
use bgp_route_extrapolator::graph::Graph;
use bgp_route_extrapolator::io::{results, tsv};

/// Offline BGP route-propagation simulator.
#[derive(Debug, Parser)]
#[command(name = "extrapolate", about = "Extrapolate per-AS local RIBs from an AS relationship graph and observed announcements")]
struct Args {
    /// JSON run-configuration file. When given, `--relationships`,
    /// `--announcements`, and `--results` are ignored in favor of the
    /// paths it contains.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Relationships TSV (spec §6), used when `--config` is not given.
    #[arg(long)]
    relationships: Option<std::path::PathBuf>,

    /// Announcements TSV (spec §6), used when `--config` is not given.
    #[arg(long)]
    announcements: Option<std::path::PathBuf>,

    /// Results TSV to write, used when `--config` is not given.
    #[arg(long)]
    results: Option<std::path::PathBuf>,

    /// Elide stub ASes from the RIB matrix (spec §4.2, §4.3).
    #[arg(long)]
    stub_elision: bool,
}

fn main() -> bgp_route_extrapolator::error::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(path) = args.relationships {
        config.relationships_path = path;
    }
    if let Some(path) = args.announcements {
        config.announcements_path = path;
    }
    if let Some(path) = args.results {
        config.results_path = path;
    }
    if args.stub_elision {
        config.stub_elision = true;
    }

    let run_start = Instant::now();

    let load_start = Instant::now();
    let topology_records = tsv::load_topology(&config.relationships_path)?;
    let announcement_records = tsv::load_announcements(&config.announcements_path)?;
    info!(
        "loaded {} relationship rows and {} announcement rows in {:.3}s",
        topology_records.len(),
        announcement_records.len(),
        load_start.elapsed().as_secs_f64()
    );

    let n_prefix = announcement_records
        .iter()
        .map(|r| r.prefix_block_id)
        .max()
        .map(|max_id| max_id as usize + 1)
        .unwrap_or(0);

    let build_start = Instant::now();
    let mut graph = Graph::build(topology_records, n_prefix, config.stub_elision)?;
    info!(
        "built topology store ({} ASes, {n_prefix} prefix blocks) in {:.3}s",
        graph.topology().n_as(),
        build_start.elapsed().as_secs_f64()
    );

    let seed_start = Instant::now();
    graph.seed(announcement_records, config.seeding, config.propagation.rng_seed);
    info!("seeding complete in {:.3}s", seed_start.elapsed().as_secs_f64());

    let propagate_start = Instant::now();
    graph.propagate(config.propagation);
    info!(
        "propagation complete in {:.3}s",
        propagate_start.elapsed().as_secs_f64()
    );

    let write_start = Instant::now();
    let mut rows_written = 0usize;
    let mut result_rows = Vec::new();
    let mut traces = Vec::new();

    for as_id in 0..graph.topology().n_as() as u32 {
        let asn = graph.topology().id_to_asn(as_id);
        for block_id in 0..n_prefix as u32 {
            if graph.rib().get(as_id, block_id).is_empty() {
                continue;
            }
            match graph.traceback(asn, block_id) {
                Ok(trace) => traces.push((graph.rib().get(as_id, block_id).static_index, trace)),
                Err(err) => {
                    log::warn!("traceback failed for AS {asn} block {block_id}: {err}");
                }
            }
        }
    }

    for (static_index, trace) in &traces {
        result_rows.push(results::ResultRow {
            static_data: graph.static_pool().get(*static_index),
            trace,
        });
        rows_written += 1;
    }

    results::write(&config.results_path, &result_rows)?;
    info!(
        "wrote {rows_written} result rows in {:.3}s",
        write_start.elapsed().as_secs_f64()
    );

    info!("total run time {:.3}s", run_start.elapsed().as_secs_f64());
    Ok(())
}
