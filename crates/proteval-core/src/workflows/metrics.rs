//! The metrics-aggregation workflow.

use crate::core::io::pdb::parse_pdb;
use crate::core::validate::disallowed_monomers;
use crate::engine::config::MetricsConfig;
use crate::engine::error::EngineError;
use crate::engine::report::CompositeMetricsReport;
use crate::engine::runners::{aggrescan3d, budeff, dfire2, evoef2, rosetta};
use crate::engine::sequence;
use tracing::{info, instrument, warn};

/// Computes the full set of quality metrics for one structure.
///
/// The pipeline: parse and validate the input, relabel residues so
/// positional identifiers are unambiguous, run the in-process sequence and
/// composition analyses, serialize the relabelled structure once, then fan
/// out to the five energy functions. Each external tool is isolated: its
/// execution failure yields an all-`None` result record and never aborts the
/// other tools. Only unusable input (no coordinate records, malformed
/// coordinates) or an invalid configuration aborts the whole run.
#[instrument(skip_all, fields(id = %id))]
pub fn run_metrics(
    id: &str,
    pdb_string: &str,
    config: &MetricsConfig,
) -> Result<CompositeMetricsReport, EngineError> {
    let structure = parse_pdb(pdb_string, id)?;
    info!(
        chains = structure.chains.len(),
        "Parsed structure; starting metrics computation."
    );

    let disallowed = disallowed_monomers(&structure);
    if !disallowed.is_empty() {
        warn!(
            monomers = ?disallowed,
            "Structure contains non-canonical monomers; energy-function results may degrade."
        );
    }

    let structure = structure.relabelled();
    let analysis = sequence::analyse(&structure);
    info!(
        residues = analysis.num_of_residues,
        "Sequence analysis complete."
    );

    // One serialization feeds every external tool.
    let pdb_text = structure.to_pdb();

    let budeff_results = budeff::run(&structure);
    let evoef2_results = evoef2::run(&pdb_text, config);
    let dfire2_results = dfire2::run(&pdb_text, config);
    let rosetta_results = rosetta::run(&pdb_text, config);
    let aggrescan3d_results = aggrescan3d::run(&pdb_text, config);
    info!("All energy functions finished.");

    Ok(CompositeMetricsReport {
        id: structure.id.clone(),
        sequence_info: analysis.sequence_info,
        composition: analysis.composition,
        torsion_angles: analysis.torsion_angles,
        hydrophobic_fitness: analysis.hydrophobic_fitness,
        isoelectric_point: analysis.isoelectric_point,
        mass: analysis.mass,
        num_of_residues: analysis.num_of_residues,
        charge: analysis.charge,
        mean_packing_density: analysis.mean_packing_density,
        budeff_results,
        evoef2_results,
        dfire2_results,
        rosetta_results,
        aggrescan3d_results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::MetricsConfigBuilder;
    use std::path::PathBuf;
    use std::time::Duration;

    const SMALL_PDB: &str = "\
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  C   ALA A   1      10.729   6.768  -4.123  1.00  0.00           C
ATOM      4  O   ALA A   1       9.580   6.342  -3.935  1.00  0.00           O
ATOM      5  N   GLY A   2      11.255   7.823  -3.506  1.00  0.00           N
ATOM      6  CA  GLY A   2      10.469   8.609  -2.540  1.00  0.00           C
ATOM      7  C   GLY A   2      11.090   9.934  -2.120  1.00  0.00           C
ATOM      8  O   GLY A   2      12.250  10.188  -2.450  1.00  0.00           O
ATOM      9  N   LEU A   3      10.320  10.780  -1.420  1.00  0.00           N
ATOM     10  CA  LEU A   3      10.790  12.090  -0.960  1.00  0.00           C
ATOM     11  C   LEU A   3       9.680  12.870  -0.260  1.00  0.00           C
ATOM     12  O   LEU A   3       8.520  12.450  -0.230  1.00  0.00           O
END
";

    fn unreachable_tools_config() -> crate::engine::config::MetricsConfig {
        MetricsConfigBuilder::new()
            .evoef2_binary(PathBuf::from("/nonexistent/EvoEF2"))
            .dfire2_dir(PathBuf::from("/nonexistent/dfire2"))
            .rosetta_binary(PathBuf::from("/nonexistent/score_jd2"))
            .aggrescan3d_script(PathBuf::from("/nonexistent/a3d.py"))
            .max_run_time(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn unusable_input_aborts_the_run() {
        let config = unreachable_tools_config();
        assert!(run_metrics("empty", "HEADER ONLY\nEND\n", &config).is_err());
    }

    #[test]
    fn tool_failures_never_abort_the_in_process_metrics() {
        let config = unreachable_tools_config();
        let report = run_metrics("small", SMALL_PDB, &config).unwrap();

        assert_eq!(report.num_of_residues, 3);
        assert_eq!(report.sequence_info[&'A'].sequence, "AGL");
        assert!(report.mass > 0.0);
        assert!(report.budeff_results.total_energy.is_some());

        // Every external tool degraded to a full-schema failure record.
        assert!(report.evoef2_results.total.is_none());
        assert!(report.dfire2_results.total.is_none());
        assert!(report.rosetta_results.total_score.is_none());
        assert!(report.aggrescan3d_results.total_value.is_none());
    }

    #[test]
    fn identical_input_produces_equal_reports() {
        let config = unreachable_tools_config();
        let first = run_metrics("small", SMALL_PDB, &config).unwrap();
        let second = run_metrics("small", SMALL_PDB, &config).unwrap();
        assert_eq!(first, second);
    }
}
