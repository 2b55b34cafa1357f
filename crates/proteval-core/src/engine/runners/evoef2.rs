//! EvoEF2 stability computation.
//!
//! Invokes `<binary> --command=ComputeStability --pdb=<input>` in a scratch
//! directory and parses the labeled `key = value` stability table from
//! stdout. The table carries exactly [`EVOEF2_SCHEMA_SIZE`] numeric fields
//! (including the trailing `Time spent:` line); any deviation from that
//! schema is version drift and aborts with a panic rather than being
//! absorbed.

use crate::core::utils::parse::parse_float;
use crate::engine::config::MetricsConfig;
use crate::engine::process::{ProcessOutput, ScratchDir, run_with_timeout};
use crate::engine::report::{
    EVOEF2_SCHEMA_SIZE, Evoef2Result, InterEnergies, IntraEnergies, ReferenceEnergies,
};
use std::collections::BTreeMap;
use std::io;
use std::process::Command;
use tracing::{debug, warn};

/// Runs EvoEF2 on the given PDB text. Execution failures (spawn errors,
/// non-zero exit, timeout) degrade to an all-`None` record.
pub fn run(pdb: &str, config: &MetricsConfig) -> Evoef2Result {
    match try_run(pdb, config) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "Stability computation could not be launched.");
            Evoef2Result::failed(String::new(), err.to_string(), None)
        }
    }
}

fn try_run(pdb: &str, config: &MetricsConfig) -> io::Result<Evoef2Result> {
    let scratch = ScratchDir::create()?;
    let input = scratch.write_input("input.pdb", pdb)?;

    let mut command = Command::new(&config.evoef2_binary);
    command
        .arg("--command=ComputeStability")
        .arg(format!("--pdb={}", input.display()));
    let output = run_with_timeout(&mut command, scratch.path(), config.max_run_time)?;

    if !output.success() {
        debug!(return_code = ?output.return_code, timed_out = output.timed_out, "Stability run failed.");
        return Ok(Evoef2Result::failed(
            output.stdout,
            output.stderr,
            output.return_code,
        ));
    }
    Ok(parse_stability_table(&output))
}

/// Parses the stability table. Panics on schema drift.
fn parse_stability_table(output: &ProcessOutput) -> Evoef2Result {
    let mut values: BTreeMap<String, f64> = BTreeMap::new();
    let mut time_spent = None;

    for line in output.stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Time spent:") {
            time_spent = rest.split_whitespace().next().and_then(parse_float);
            continue;
        }
        if line.is_empty() || line.starts_with('-') || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if let Some(number) = parse_float(value) {
                values.insert(key.trim().to_string(), number);
            }
        }
    }

    let field = |key: &str| values.get(key).copied();
    let result = Evoef2Result {
        log_info: output.stdout.clone(),
        error_info: output.stderr.clone(),
        return_code: output.return_code,
        reference: ReferenceEnergies {
            ala: field("reference_ALA"),
            cys: field("reference_CYS"),
            asp: field("reference_ASP"),
            glu: field("reference_GLU"),
            phe: field("reference_PHE"),
            gly: field("reference_GLY"),
            his: field("reference_HIS"),
            ile: field("reference_ILE"),
            lys: field("reference_LYS"),
            leu: field("reference_LEU"),
            met: field("reference_MET"),
            asn: field("reference_ASN"),
            pro: field("reference_PRO"),
            gln: field("reference_GLN"),
            arg: field("reference_ARG"),
            ser: field("reference_SER"),
            thr: field("reference_THR"),
            val: field("reference_VAL"),
            trp: field("reference_TRP"),
            tyr: field("reference_TYR"),
        },
        intra_r: IntraEnergies {
            vdwatt: field("intraR_vdwatt"),
            vdwrep: field("intraR_vdwrep"),
            electr: field("intraR_electr"),
            deslv_p: field("intraR_deslvP"),
            deslv_h: field("intraR_deslvH"),
            hbscbb_dis: field("intraR_hbscbb_dis"),
            hbscbb_the: field("intraR_hbscbb_the"),
            hbscbb_phi: field("intraR_hbscbb_phi"),
        },
        aapropensity: field("aapropensity"),
        ramachandran: field("ramachandran"),
        dunbrack: field("dunbrack"),
        inter_s: inter_group(&values, "interS"),
        inter_d: inter_group(&values, "interD"),
        total: field("Total"),
        time_spent,
    };

    let parsed = result
        .numeric_fields()
        .iter()
        .filter(|value| value.is_some())
        .count();
    assert_eq!(
        parsed, EVOEF2_SCHEMA_SIZE,
        "stability table schema drift: expected {EVOEF2_SCHEMA_SIZE} numeric fields, parsed {parsed}"
    );
    assert_eq!(
        values.len(),
        EVOEF2_SCHEMA_SIZE - 1,
        "stability table schema drift: unexpected extra fields in output"
    );
    result
}

fn inter_group(values: &BTreeMap<String, f64>, prefix: &str) -> InterEnergies {
    let field = |suffix: &str| values.get(&format!("{prefix}_{suffix}")).copied();
    InterEnergies {
        vdwatt: field("vdwatt"),
        vdwrep: field("vdwrep"),
        electr: field("electr"),
        deslv_p: field("deslvP"),
        deslv_h: field("deslvH"),
        ssbond: field("ssbond"),
        hbbbbb_dis: field("hbbbbb_dis"),
        hbbbbb_the: field("hbbbbb_the"),
        hbbbbb_phi: field("hbbbbb_phi"),
        hbscbb_dis: field("hbscbb_dis"),
        hbscbb_the: field("hbscbb_the"),
        hbscbb_phi: field("hbscbb_phi"),
        hbscsc_dis: field("hbscsc_dis"),
        hbscsc_the: field("hbscsc_the"),
        hbscsc_phi: field("hbscsc_phi"),
    }
}
