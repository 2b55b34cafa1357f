//! DFIRE2 pairwise-potential evaluation.
//!
//! Invokes `<dir>/calene <dir>/dfire_pair.lib <input>`; stdout is a single
//! `<file> <energy>` line.

use crate::core::utils::parse::parse_float;
use crate::engine::config::MetricsConfig;
use crate::engine::process::{ScratchDir, run_with_timeout};
use crate::engine::report::Dfire2Result;
use std::io;
use std::process::Command;
use tracing::{debug, warn};

/// Runs DFIRE2 on the given PDB text. Execution failures degrade to an
/// all-`None` record.
pub fn run(pdb: &str, config: &MetricsConfig) -> Dfire2Result {
    match try_run(pdb, config) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "Pairwise-potential computation could not be launched.");
            Dfire2Result::failed(String::new(), err.to_string(), None)
        }
    }
}

fn try_run(pdb: &str, config: &MetricsConfig) -> io::Result<Dfire2Result> {
    let scratch = ScratchDir::create()?;
    let input = scratch.write_input("input.pdb", pdb)?;

    let mut command = Command::new(config.dfire2_dir.join("calene"));
    command
        .arg(config.dfire2_dir.join("dfire_pair.lib"))
        .arg(&input);
    let output = run_with_timeout(&mut command, scratch.path(), config.max_run_time)?;

    if !output.success() {
        debug!(return_code = ?output.return_code, timed_out = output.timed_out, "Pairwise-potential run failed.");
        return Ok(Dfire2Result::failed(
            output.stdout,
            output.stderr,
            output.return_code,
        ));
    }

    // Last whitespace-separated token of the output line is the energy.
    let total = output
        .stdout
        .split_whitespace()
        .last()
        .and_then(parse_float);
    if total.is_none() {
        debug!(stdout = %output.stdout, "Could not extract an energy from the tool output.");
        return Ok(Dfire2Result::failed(
            output.stdout,
            output.stderr,
            output.return_code,
        ));
    }
    Ok(Dfire2Result {
        log_info: output.stdout,
        error_info: output.stderr,
        return_code: output.return_code,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_record_has_no_total() {
        let result = Dfire2Result::failed("".into(), "missing library".into(), Some(2));
        assert_eq!(result.total, None);
        assert_eq!(result.error_info, "missing library");
    }

    #[test]
    fn energy_is_the_last_token() {
        let total = "/tmp/scratch/input.pdb -161.6\n"
            .split_whitespace()
            .last()
            .and_then(parse_float);
        assert_eq!(total, Some(-161.6));
    }
}
