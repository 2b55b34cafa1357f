//! The batch metrics driver: one JSON report per structure plus a combined
//! CSV summary.

use crate::cli::RunArgs;
use crate::config::load_metrics_config;
use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use proteval::engine::report::CompositeMetricsReport;
use proteval::workflows::metrics::run_metrics;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SUMMARY_FILE: &str = "metrics_summary.csv";

const SUMMARY_HEADERS: [&str; 15] = [
    "design_name",
    "composition",
    "torsion_angles",
    "hydrophobic_fitness",
    "isoelectric_point",
    "mass",
    "num_of_residues",
    "charge",
    "mean_packing_density",
    "budeff_total",
    "evoef2_total",
    "dfire2_total",
    "rosetta_total_score",
    "aggrescan3d_total_value",
    "aggrescan3d_avg_value",
];

pub fn run(args: RunArgs) -> Result<()> {
    let config = load_metrics_config(&args.config, args.timeout)?;
    let inputs = discover_inputs(&args.input)?;
    if inputs.is_empty() {
        return Err(CliError::Argument(format!(
            "no .pdb files found under '{}'",
            args.input.display()
        )));
    }
    fs::create_dir_all(&args.output)?;
    info!(structures = inputs.len(), "Starting batch run.");

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut reports = Vec::new();
    for path in &inputs {
        let name = design_name(path);
        progress.set_message(name.clone());

        let pdb = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping unreadable input file.");
                progress.inc(1);
                continue;
            }
        };
        match run_metrics(&name, &pdb, &config) {
            Ok(report) => {
                let json_path = args.output.join(format!("{name}.json"));
                fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
                reports.push(report);
            }
            Err(err) => {
                warn!(design = %name, error = %err, "Structure could not be analysed.");
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    write_summary(&args.output.join(SUMMARY_FILE), &reports)?;
    info!(
        analysed = reports.len(),
        skipped = inputs.len() - reports.len(),
        "Batch run finished."
    );
    Ok(())
}

/// A single file is taken as-is; a directory is scanned (non-recursively)
/// for `*.pdb` files in name order.
fn discover_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn design_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn write_summary(path: &Path, reports: &[CompositeMetricsReport]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_HEADERS)?;
    for report in reports {
        writer.write_record(summary_row(report))?;
    }
    writer.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn summary_row(report: &CompositeMetricsReport) -> Vec<String> {
    vec![
        report.id.clone(),
        report.composition_string(),
        report.torsion_angles_string(),
        optional(report.hydrophobic_fitness),
        report.isoelectric_point.to_string(),
        report.mass.to_string(),
        report.num_of_residues.to_string(),
        report.charge.to_string(),
        report.mean_packing_density.to_string(),
        optional(report.budeff_results.total_energy),
        optional(report.evoef2_results.total),
        optional(report.dfire2_results.total),
        optional(report.rosetta_results.total_score),
        optional(report.aggrescan3d_results.total_value),
        optional(report.aggrescan3d_results.avg_value),
    ]
}
