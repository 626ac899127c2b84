//! navingest — Overpass ways (+ incident feeds) → persisted edge table.
//!
//! ```text
//! navingest --ways overpass.json --incidents tomtom.json --out segments.csv
//! ```

mod pipeline;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{info, warn};

use rn_graph::{Incident, RoadGraphBuilder, apply_incident_at};
use rn_io::{parse_tomtom_incidents, read_incidents_csv, read_overpass, write_segments_csv};

use pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Overpass `[out:json]` response.
    #[arg(long)]
    ways: PathBuf,

    /// TomTom Incident Details response.
    #[arg(long)]
    incidents: Option<PathBuf>,

    /// Pre-classified `lat,lon,kind` incidents.
    #[arg(long)]
    incidents_csv: Option<PathBuf>,

    /// TOML pipeline configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge table to write.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    // ── Ways → graph ─────────────────────────────────────────────────────
    let t0 = Instant::now();
    let file = File::open(&args.ways).with_context(|| format!("opening {}", args.ways.display()))?;
    let ways = read_overpass(BufReader::new(file))?;

    let mut builder = RoadGraphBuilder::with_config(config.graph.clone())?.ingested_at(Utc::now());
    for way in &ways {
        builder.add_way(way);
    }
    if builder.skipped_ways() > 0 {
        warn!("{} way(s) had too few usable coordinates", builder.skipped_ways());
    }
    let mut graph = builder.build();
    println!(
        "Graph: {} nodes, {} segments from {} ways ({:.2?})",
        graph.node_count(),
        graph.edge_count(),
        ways.len(),
        t0.elapsed()
    );

    // ── Incidents ────────────────────────────────────────────────────────
    let mut incidents: Vec<Incident> = Vec::new();
    if let Some(path) = &args.incidents {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        incidents.extend(parse_tomtom_incidents(&text, &config.classifier)?);
    }
    if let Some(path) = &args.incidents_csv {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        incidents.extend(read_incidents_csv(BufReader::new(file))?);
    }

    let (mut touched, mut changed) = (0, 0);
    for incident in &incidents {
        if let Some(report) = apply_incident_at(&mut graph, *incident, &config.incidents) {
            touched += report.edges_touched;
            changed += report.edges_changed;
        }
    }
    if !incidents.is_empty() {
        info!("{} incident(s): {touched} segment flag(s) set, {changed} newly blocked", incidents.len());
    }
    let blocked = graph.edges().iter().filter(|s| s.is_blocked()).count();
    println!("Incidents: {} applied, {blocked} segment(s) blocked", incidents.len());

    // ── Output ───────────────────────────────────────────────────────────
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_segments_csv(&graph, &args.out)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
