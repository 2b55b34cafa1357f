//! End-to-end runner tests against mock tool scripts.

mod common;

use common::{SMALL_PDB, mock_config, write_script};
use proteval::engine::config::MetricsConfigBuilder;
use proteval::engine::runners::{aggrescan3d, dfire2, evoef2, rosetta};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn evoef2_runner_parses_the_stability_table() {
    let tools = tempfile::tempdir().unwrap();
    let config = mock_config(tools.path());

    let result = evoef2::run(SMALL_PDB, &config);
    assert_eq!(result.total, Some(-463.9));
    assert_eq!(result.time_spent, Some(0.52));
    assert_eq!(result.return_code, Some(0));
    assert!((result.ref_total().unwrap() - -402.4).abs() < 1e-9);
    assert!((result.intra_r_total().unwrap() - -12.0).abs() < 1e-9);
    assert!((result.inter_s_total().unwrap() - -22.5).abs() < 1e-9);
    assert!((result.inter_d_total().unwrap() - -22.5).abs() < 1e-9);

    // The whole-structure total equals the sum of the component groups.
    let components = result.ref_total().unwrap()
        + result.intra_r_total().unwrap()
        + result.aapropensity.unwrap()
        + result.ramachandran.unwrap()
        + result.dunbrack.unwrap()
        + result.inter_s_total().unwrap()
        + result.inter_d_total().unwrap();
    assert!((result.total.unwrap() - components).abs() < 0.1);
}

#[test]
fn evoef2_runner_times_out_and_degrades() {
    let tools = tempfile::tempdir().unwrap();
    let mut config = mock_config(tools.path());
    config.evoef2_binary = write_script(tools.path(), "slow_evoef2", "echo started\nsleep 30");
    config.max_run_time = Duration::from_millis(200);

    let result = evoef2::run(SMALL_PDB, &config);
    assert_eq!(result.total, None);
    assert_eq!(result.return_code, None);
    // Partial output captured before the kill survives.
    assert!(result.log_info.contains("started"));
}

#[test]
fn evoef2_runner_degrades_on_nonzero_exit() {
    let tools = tempfile::tempdir().unwrap();
    let mut config = mock_config(tools.path());
    config.evoef2_binary = write_script(tools.path(), "broken_evoef2", "echo boom >&2\nexit 2");

    let result = evoef2::run(SMALL_PDB, &config);
    assert_eq!(result.total, None);
    assert_eq!(result.return_code, Some(2));
    assert!(result.error_info.contains("boom"));
}

#[test]
fn dfire2_runner_extracts_the_energy() {
    let tools = tempfile::tempdir().unwrap();
    let config = mock_config(tools.path());

    let result = dfire2::run(SMALL_PDB, &config);
    assert_eq!(result.total, Some(-161.6));
    assert_eq!(result.return_code, Some(0));
    // The tool echoes the input path before the energy.
    assert!(result.log_info.contains("input.pdb"));
}

#[test]
fn rosetta_runner_reads_the_score_file_from_its_scratch_directory() {
    let tools = tempfile::tempdir().unwrap();
    let config = mock_config(tools.path());

    let result = rosetta::run(SMALL_PDB, &config);
    assert_eq!(result.total_score, Some(-211.377));
    assert_eq!(result.ref_energy, Some(-1.0));
    assert_eq!(result.return_code, Some(0));
}

#[test]
fn aggrescan3d_runner_parses_summary_and_residue_table() {
    let tools = tempfile::tempdir().unwrap();
    let config = mock_config(tools.path());

    let result = aggrescan3d::run(SMALL_PDB, &config);
    assert_eq!(result.avg_value, Some(-0.8597));
    assert_eq!(result.max_value, Some(0.0));
    assert_eq!(result.min_value, Some(-2.1353));
    assert!((result.total_value.unwrap() - -90.2641).abs() < 1e-9);
    assert_eq!(result.chain_list.as_deref(), Some("A;A;A"));
    assert_eq!(result.residue_name_list.as_deref(), Some("A;G;L"));
    // Score strings are canonicalized through the numeric parser.
    assert_eq!(result.residue_score_list.as_deref(), Some("-90;-0.2641;0"));
}

#[test]
fn missing_binaries_degrade_to_failure_records() {
    let config = MetricsConfigBuilder::new()
        .evoef2_binary(PathBuf::from("/nonexistent/EvoEF2"))
        .dfire2_dir(PathBuf::from("/nonexistent/dfire2"))
        .rosetta_binary(PathBuf::from("/nonexistent/score_jd2"))
        .aggrescan3d_script(PathBuf::from("/nonexistent/a3d.py"))
        .python_binary(PathBuf::from("/nonexistent/python2"))
        .max_run_time(Duration::from_secs(1))
        .build()
        .unwrap();

    assert_eq!(evoef2::run(SMALL_PDB, &config).total, None);
    assert_eq!(dfire2::run(SMALL_PDB, &config).total, None);
    assert_eq!(rosetta::run(SMALL_PDB, &config).total_score, None);
    assert_eq!(aggrescan3d::run(SMALL_PDB, &config).total_value, None);
}
