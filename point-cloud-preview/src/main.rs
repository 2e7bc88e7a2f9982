/// Samples a classified LAS/LAZ point cloud the way the 3D chart would
/// render it and reports the per-class result.
mod las_dataset;
mod preview_chart;
mod report;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use point_cloud_sampling::{CancelToken, ChartNode, PointDataset, RefreshOutcome};
use tracing_subscriber::EnvFilter;

use las_dataset::LasDataset;
use preview_chart::{PreviewFactory, PreviewSurface};
use report::SamplingReport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <input.las|input.laz> [seed]", args[0]);
        std::process::exit(1);
    }
    let input_path = PathBuf::from(&args[1]);
    let seed = match args.get(2) {
        Some(raw) => Some(raw.parse::<u64>()?),
        None => None,
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    println!("Loading {}", input_path.display());
    let mut dataset = LasDataset::open(&input_path)?;
    let total_points = dataset.total_count();
    println!("  Points: {}", total_points);
    println!("  Classes: {}", dataset.known_classes().len());

    let factory = Arc::new(PreviewFactory);
    let surface = PreviewSurface::new();

    let mut node = ChartNode::new(seed);
    node.activate(Some(factory), Some(Box::new(surface.clone())))?;

    if node.refresh(&mut dataset, &cancel)? == RefreshOutcome::Aborted {
        println!("Refresh aborted before completion; nothing sampled.");
        return Ok(());
    }

    let report = SamplingReport::from_node(&input_path, total_points, &node);
    report.print_summary();
    println!(
        "  Chart holds {} buffers, {} points",
        surface.live_count(),
        surface.live_points()
    );

    let report_path = input_path
        .parent()
        .unwrap_or(Path::new("."))
        .join("sampling_manifest.json");
    fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    println!("Saved {}", report_path.display());

    Ok(())
}
