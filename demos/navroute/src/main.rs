//! navroute — best path between two node keys over a persisted edge table.
//!
//! ```text
//! navroute 12.971600_77.594612 12.975000_77.601000
//! navroute --cost length --heuristic-scale 0.9 --segments out.csv SRC GOAL
//! ```
//!
//! Blocked segments are impassable.  Unknown or malformed keys print the
//! "no path" result instead of failing.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use rn_core::{DEFAULT_KEY_PRECISION, GraphConfig};
use rn_graph::{
    AStarRouter, BlockedAsInfinite, CompositeCost, CostFunction, GreatCircleHeuristic,
    LengthCost, Router,
};
use rn_io::read_segments_csv;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Edge table written by `navingest`.
    #[arg(long, default_value = "datalink_output/segments_features.csv")]
    segments: PathBuf,

    /// Segment weight.
    #[arg(long, value_enum, default_value_t = CostKind::Composite)]
    cost: CostKind,

    /// Great-circle heuristic weight per metre; 0 runs plain Dijkstra.
    /// Values above 1 can return suboptimal paths.
    #[arg(long, default_value_t = 0.0)]
    heuristic_scale: f64,

    /// Fractional digits of the node keys in the table.
    #[arg(long, default_value_t = DEFAULT_KEY_PRECISION)]
    precision: u32,

    /// Source node key, `lat_lon`.
    source: String,

    /// Goal node key, `lat_lon`.
    goal: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CostKind {
    /// Length scaled by congestion, risk and speed, plus a toll surcharge.
    Composite,
    /// Metres.
    Length,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GraphConfig { key_precision: args.precision, ..GraphConfig::default() };
    let t0 = Instant::now();
    let graph = read_segments_csv(&args.segments, &config)
        .with_context(|| format!("loading {}", args.segments.display()))?;
    info!(
        "{} nodes, {} segments loaded in {:.2?}",
        graph.node_count(),
        graph.edge_count(),
        t0.elapsed()
    );

    let router = match args.cost {
        CostKind::Composite => boxed_router(CompositeCost::default(), args.heuristic_scale),
        CostKind::Length => boxed_router(LengthCost, args.heuristic_scale),
    };

    let t0 = Instant::now();
    let route = router.route_keys(&graph, &args.source, &args.goal)?;
    info!("search finished in {:.2?}", t0.elapsed());

    match route {
        Some(route) => {
            println!("Best path: {:?}", route.node_keys(&graph));
            println!("Total cost: {}", route.total_cost);
        }
        None => {
            println!("Best path: no path");
            println!("Total cost: 0");
        }
    }
    Ok(())
}

fn boxed_router<C: CostFunction + 'static>(cost: C, heuristic_scale: f64) -> Box<dyn Router> {
    let base = AStarRouter::new(BlockedAsInfinite(cost));
    if heuristic_scale > 0.0 {
        Box::new(base.with_heuristic(GreatCircleHeuristic { cost_per_meter: heuristic_scale }))
    } else {
        Box::new(base)
    }
}
