//! Rosetta all-atom scoring.
//!
//! Invokes the scoring binary with `-scorefile_format json`; the score lands
//! in `score.sc` inside the scratch directory as one JSON object per line.
//! The object carries a `decoy` metadata key plus exactly
//! [`ROSETTA_SCHEMA_SIZE`] numeric score components; anything else is
//! version drift and aborts with a panic.

use crate::engine::config::MetricsConfig;
use crate::engine::process::{ProcessOutput, ScratchDir, run_with_timeout};
use crate::engine::report::{ROSETTA_SCHEMA_SIZE, RosettaResult};
use serde_json::Value;
use std::io;
use std::process::Command;
use tracing::{debug, warn};

const SCORE_FILE: &str = "score.sc";

/// Runs the Rosetta score function on the given PDB text. Execution failures
/// degrade to an all-`None` record.
pub fn run(pdb: &str, config: &MetricsConfig) -> RosettaResult {
    match try_run(pdb, config) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "All-atom scoring could not be launched.");
            RosettaResult::failed(String::new(), err.to_string(), None)
        }
    }
}

fn try_run(pdb: &str, config: &MetricsConfig) -> io::Result<RosettaResult> {
    let scratch = ScratchDir::create()?;
    let input = scratch.write_input("input.pdb", pdb)?;

    let mut command = Command::new(&config.rosetta_binary);
    command
        .arg("-in:file:s")
        .arg(&input)
        .arg("-ignore_unrecognized_res")
        .arg("-scorefile_format")
        .arg("json");
    let output = run_with_timeout(&mut command, scratch.path(), config.max_run_time)?;

    if !output.success() {
        debug!(return_code = ?output.return_code, timed_out = output.timed_out, "Scoring run failed.");
        return Ok(RosettaResult::failed(
            output.stdout,
            output.stderr,
            output.return_code,
        ));
    }

    let score_text = match std::fs::read_to_string(scratch.path().join(SCORE_FILE)) {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "Score file was not produced.");
            return Ok(RosettaResult::failed(
                output.stdout,
                output.stderr,
                output.return_code,
            ));
        }
    };
    Ok(parse_score_file(&score_text, &output))
}

/// Parses the JSON score record. Panics on schema drift.
fn parse_score_file(score_text: &str, output: &ProcessOutput) -> RosettaResult {
    let record = score_text
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| serde_json::from_str::<Value>(line).ok());
    let Some(Value::Object(mut object)) = record else {
        return RosettaResult::failed(
            output.stdout.clone(),
            format!("unparseable score file: {score_text}"),
            output.return_code,
        );
    };

    // `decoy` names the input file, not a score component.
    object.remove("decoy");
    let field = |key: &str| object.get(key).and_then(Value::as_f64);

    let result = RosettaResult {
        log_info: output.stdout.clone(),
        error_info: output.stderr.clone(),
        return_code: output.return_code,
        dslf_fa13: field("dslf_fa13"),
        fa_atr: field("fa_atr"),
        fa_dun: field("fa_dun"),
        fa_elec: field("fa_elec"),
        fa_intra_rep: field("fa_intra_rep"),
        fa_intra_sol_xover4: field("fa_intra_sol_xover4"),
        fa_rep: field("fa_rep"),
        fa_sol: field("fa_sol"),
        hbond_bb_sc: field("hbond_bb_sc"),
        hbond_lr_bb: field("hbond_lr_bb"),
        hbond_sc: field("hbond_sc"),
        hbond_sr_bb: field("hbond_sr_bb"),
        linear_chainbreak: field("linear_chainbreak"),
        lk_ball_wtd: field("lk_ball_wtd"),
        omega: field("omega"),
        overlap_chainbreak: field("overlap_chainbreak"),
        p_aa_pp: field("p_aa_pp"),
        pro_close: field("pro_close"),
        rama_prepro: field("rama_prepro"),
        ref_energy: field("ref"),
        score: field("score"),
        time: field("time"),
        total_score: field("total_score"),
        yhh_planarity: field("yhh_planarity"),
    };

    let parsed = result
        .numeric_fields()
        .iter()
        .filter(|value| value.is_some())
        .count();
    assert_eq!(
        parsed, ROSETTA_SCHEMA_SIZE,
        "score file schema drift: expected {ROSETTA_SCHEMA_SIZE} numeric fields, parsed {parsed}"
    );
    assert_eq!(
        object.len(),
        ROSETTA_SCHEMA_SIZE,
        "score file schema drift: unexpected extra score components"
    );
    result
}
