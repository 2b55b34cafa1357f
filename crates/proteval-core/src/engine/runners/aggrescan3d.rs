//! Aggrescan3D aggregation-propensity prediction.
//!
//! Invokes `python2 <script> <input>`; the tool writes its results under an
//! `output/` directory relative to its working directory: a JSON summary at
//! `output/tmp/folded_stats` (`max_value` / `avg_value` / `min_value`) and a
//! per-residue table at `output/A3D.csv` with columns
//! `protein,chain,residue,residue_name,score`. Per-residue columns are
//! flattened into `;`-joined list strings; score strings are round-tripped
//! through the numeric parser so the stored representation is canonical.
//! A summary or table missing any schema field is version drift and aborts
//! with a panic.

use crate::core::utils::parse::{clean_float_string, parse_float};
use crate::engine::config::MetricsConfig;
use crate::engine::process::{ProcessOutput, ScratchDir, run_with_timeout};
use crate::engine::report::Aggrescan3dResult;
use serde_json::Value;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

const STATS_FILE: &str = "output/tmp/folded_stats";
const TABLE_FILE: &str = "output/A3D.csv";

/// Runs Aggrescan3D on the given PDB text. Execution failures degrade to an
/// all-`None` record.
pub fn run(pdb: &str, config: &MetricsConfig) -> Aggrescan3dResult {
    match try_run(pdb, config) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "Aggregation-propensity computation could not be launched.");
            Aggrescan3dResult::failed(String::new(), err.to_string(), None)
        }
    }
}

fn try_run(pdb: &str, config: &MetricsConfig) -> io::Result<Aggrescan3dResult> {
    let scratch = ScratchDir::create()?;
    let input = scratch.write_input("input.pdb", pdb)?;

    let mut command = Command::new(&config.python_binary);
    command.arg(&config.aggrescan3d_script).arg(&input);
    let output = run_with_timeout(&mut command, scratch.path(), config.max_run_time)?;

    if !output.success() {
        debug!(return_code = ?output.return_code, timed_out = output.timed_out, "Aggregation run failed.");
        return Ok(Aggrescan3dResult::failed(
            output.stdout,
            output.stderr,
            output.return_code,
        ));
    }
    Ok(parse_output_files(scratch.path(), &output))
}

/// Parses the summary JSON and per-residue CSV. Panics on schema drift.
fn parse_output_files(scratch: &Path, output: &ProcessOutput) -> Aggrescan3dResult {
    let table_path = scratch.join(TABLE_FILE);
    let stats_text = match std::fs::read_to_string(scratch.join(STATS_FILE)) {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "Summary statistics file was not produced.");
            return Aggrescan3dResult::failed(
                output.stdout.clone(),
                output.stderr.clone(),
                output.return_code,
            );
        }
    };

    let stats: Option<Value> = serde_json::from_str(&stats_text).ok();
    let stat = |key: &str| {
        stats
            .as_ref()
            .and_then(|value| value.get(key))
            .and_then(Value::as_f64)
    };

    let result = match parse_residue_table(&table_path) {
        // A table with no scored residues is a degenerate tool run, not a
        // schema change.
        Ok(table) if table.total.is_none() => {
            debug!("Per-residue table contained no scored residues; treating the run as failed.");
            return Aggrescan3dResult::failed(
                output.stdout.clone(),
                output.stderr.clone(),
                output.return_code,
            );
        }
        Ok(table) => Aggrescan3dResult {
            log_info: output.stdout.clone(),
            error_info: output.stderr.clone(),
            return_code: output.return_code,
            total_value: table.total,
            protein_list: Some(table.proteins),
            chain_list: Some(table.chains),
            residue_number_list: Some(table.numbers),
            residue_name_list: Some(table.names),
            residue_score_list: Some(table.scores),
            max_value: stat("max_value"),
            avg_value: stat("avg_value"),
            min_value: stat("min_value"),
        },
        Err(err) => {
            debug!(error = %err, "Per-residue table could not be read.");
            return Aggrescan3dResult::failed(
                output.stdout.clone(),
                output.stderr.clone(),
                output.return_code,
            );
        }
    };

    let present = result
        .schema_fields_present()
        .iter()
        .filter(|present| **present)
        .count();
    assert_eq!(
        present,
        result.schema_fields_present().len(),
        "aggregation output schema drift: {present} of {} schema fields present",
        result.schema_fields_present().len()
    );
    result
}

struct ResidueTable {
    proteins: String,
    chains: String,
    numbers: String,
    names: String,
    scores: String,
    total: Option<f64>,
}

fn parse_residue_table(path: &Path) -> Result<ResidueTable, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut proteins = Vec::new();
    let mut chains = Vec::new();
    let mut numbers = Vec::new();
    let mut names = Vec::new();
    let mut scores = Vec::new();
    let mut total = 0.0;
    let mut any_score = false;

    for record in reader.records() {
        let record = record?;
        proteins.push(record.get(0).unwrap_or_default().to_string());
        chains.push(record.get(1).unwrap_or_default().to_string());
        numbers.push(record.get(2).unwrap_or_default().to_string());
        names.push(record.get(3).unwrap_or_default().to_string());

        let raw_score = record.get(4).unwrap_or_default();
        if let Some(score) = parse_float(raw_score) {
            total += score;
            any_score = true;
        }
        scores.push(clean_float_string(raw_score).unwrap_or_else(|| raw_score.to_string()));
    }

    Ok(ResidueTable {
        proteins: proteins.join(";"),
        chains: chains.join(";"),
        numbers: numbers.join(";"),
        names: names.join(";"),
        scores: scores.join(";"),
        total: any_score.then_some(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Per-residue table shaped like real tool output.
    fn mock_table() -> &'static str {
        "protein,chain,residue,residue_name,score\n\
         folded,A,1,D,-2.1353\n\
         folded,A,2,K,0.0\n\
         folded,A,3,L,-0.5537\n"
    }

    fn mock_stats() -> &'static str {
        "{\"max_value\": 0.0, \"avg_value\": -0.8963, \"min_value\": -2.1353}"
    }

    fn clean_output() -> ProcessOutput {
        ProcessOutput {
            stdout: String::new(),
            stderr: String::new(),
            return_code: Some(0),
            timed_out: false,
            elapsed: Duration::from_secs(2),
        }
    }

    fn write_outputs(scratch: &Path, stats: &str, table: &str) {
        std::fs::create_dir_all(scratch.join("output/tmp")).unwrap();
        std::fs::write(scratch.join(STATS_FILE), stats).unwrap();
        std::fs::write(scratch.join(TABLE_FILE), table).unwrap();
    }

    #[test]
    fn parses_summary_and_residue_table() {
        let scratch = tempfile::tempdir().unwrap();
        write_outputs(scratch.path(), mock_stats(), mock_table());
        let result = parse_output_files(scratch.path(), &clean_output());

        assert_eq!(result.avg_value, Some(-0.8963));
        assert_eq!(result.min_value, Some(-2.1353));
        assert_eq!(result.chain_list.as_deref(), Some("A;A;A"));
        assert_eq!(result.residue_number_list.as_deref(), Some("1;2;3"));
        // Score strings are canonicalized ("0.0" becomes "0").
        assert_eq!(
            result.residue_score_list.as_deref(),
            Some("-2.1353;0;-0.5537")
        );
        assert!((result.total_value.unwrap() - -2.689).abs() < 1e-9);
    }

    #[test]
    fn missing_output_files_degrade_to_failure() {
        let scratch = tempfile::tempdir().unwrap();
        let result = parse_output_files(scratch.path(), &clean_output());
        assert!(result.total_value.is_none());
        assert!(result.schema_fields_present().iter().all(|p| !p));
    }

    #[test]
    fn header_only_residue_table_degrades_to_failure() {
        let scratch = tempfile::tempdir().unwrap();
        write_outputs(
            scratch.path(),
            mock_stats(),
            "protein,chain,residue,residue_name,score\n",
        );
        let result = parse_output_files(scratch.path(), &clean_output());
        assert!(result.total_value.is_none());
        assert!(result.schema_fields_present().iter().all(|p| !p));
    }

    #[test]
    #[should_panic(expected = "schema drift")]
    fn summary_missing_a_statistic_is_fatal_schema_drift() {
        let scratch = tempfile::tempdir().unwrap();
        write_outputs(
            scratch.path(),
            "{\"max_value\": 0.0, \"min_value\": -2.1353}",
            mock_table(),
        );
        parse_output_files(scratch.path(), &clean_output());
    }
}
