//! Mock external tools for integration tests.
//!
//! Each helper writes a small shell script that reproduces the output shape
//! of the real tool, so the runners can be exercised end to end without the
//! scientific binaries installed.

use proteval::engine::config::{MetricsConfig, MetricsConfigBuilder};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SMALL_PDB: &str = "\
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

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
    path
}

/// A stability table shaped like real EvoEF2 output. Every component term is
/// `-1.5` except `reference_ALA` (`-373.9`), so the 61 components sum exactly
/// to the whole-structure total of `-463.9`.
pub fn stability_table() -> String {
    let reference = [
        "ALA", "CYS", "ASP", "GLU", "PHE", "GLY", "HIS", "ILE", "LYS", "LEU", "MET", "ASN",
        "PRO", "GLN", "ARG", "SER", "THR", "VAL", "TRP", "TYR",
    ];
    let intra = [
        "vdwatt", "vdwrep", "electr", "deslvP", "deslvH", "hbscbb_dis", "hbscbb_the",
        "hbscbb_phi",
    ];
    let inter = [
        "vdwatt",
        "vdwrep",
        "electr",
        "deslvP",
        "deslvH",
        "ssbond",
        "hbbbbb_dis",
        "hbbbbb_the",
        "hbbbbb_phi",
        "hbscbb_dis",
        "hbscbb_the",
        "hbscbb_phi",
        "hbscsc_dis",
        "hbscsc_the",
        "hbscsc_phi",
    ];

    let mut text = String::from("Structure energy details:\n");
    let mut push = |key: String, value: f64| {
        text.push_str(&format!("{key:<22} = {value:>14.2}\n"));
    };
    for code in reference {
        let value = if code == "ALA" { -373.9 } else { -1.5 };
        push(format!("reference_{code}"), value);
    }
    for term in intra {
        push(format!("intraR_{term}"), -1.5);
    }
    for term in ["aapropensity", "ramachandran", "dunbrack"] {
        push(term.to_string(), -1.5);
    }
    for prefix in ["interS", "interD"] {
        for term in inter {
            push(format!("{prefix}_{term}"), -1.5);
        }
    }
    text.push_str(&"-".repeat(52));
    text.push_str(&format!("\n{:<22} = {:>14.2}\n", "Total", -463.9));
    text.push_str("Time spent: 0.52 seconds\n");
    text
}

/// A `score.sc` record shaped like real output of the all-atom score
/// function: every component is `-1.0`, `total_score` is `-211.377`.
pub fn score_record() -> String {
    let keys = [
        "dslf_fa13",
        "fa_atr",
        "fa_dun",
        "fa_elec",
        "fa_intra_rep",
        "fa_intra_sol_xover4",
        "fa_rep",
        "fa_sol",
        "hbond_bb_sc",
        "hbond_lr_bb",
        "hbond_sc",
        "hbond_sr_bb",
        "linear_chainbreak",
        "lk_ball_wtd",
        "omega",
        "overlap_chainbreak",
        "p_aa_pp",
        "pro_close",
        "rama_prepro",
        "ref",
        "score",
        "time",
        "total_score",
        "yhh_planarity",
    ];
    let mut object = serde_json::Map::new();
    object.insert("decoy".to_string(), serde_json::Value::from("input_0001"));
    for key in keys {
        let value = if key == "total_score" { -211.377 } else { -1.0 };
        object.insert(key.to_string(), serde_json::Value::from(value));
    }
    serde_json::Value::Object(object).to_string()
}

pub const FOLDED_STATS: &str =
    "{\"max_value\": 0.0, \"avg_value\": -0.8597, \"min_value\": -2.1353}";

pub const RESIDUE_TABLE: &str = "\
protein,chain,residue,residue_name,score
folded,A,1,A,-90.0
folded,A,2,G,-0.2641
folded,A,3,L,0.0
";

/// Installs mock versions of all four external tools under `tools` and
/// returns a configuration pointing at them.
pub fn mock_config(tools: &Path) -> MetricsConfig {
    fs::write(tools.join("stability_table.txt"), stability_table()).unwrap();
    let evoef2 = write_script(
        tools,
        "EvoEF2",
        &format!("cat \"{}\"", tools.join("stability_table.txt").display()),
    );

    let dfire2_dir = tools.join("dfire2");
    fs::create_dir_all(&dfire2_dir).unwrap();
    fs::write(dfire2_dir.join("dfire_pair.lib"), "").unwrap();
    write_script(&dfire2_dir, "calene", "echo \"$2 -161.6\"");

    fs::write(tools.join("score_record.json"), score_record()).unwrap();
    let rosetta = write_script(
        tools,
        "score_jd2",
        &format!("cp \"{}\" score.sc", tools.join("score_record.json").display()),
    );

    fs::write(tools.join("folded_stats.json"), FOLDED_STATS).unwrap();
    fs::write(tools.join("A3D.csv"), RESIDUE_TABLE).unwrap();
    let aggrescan = write_script(
        tools,
        "a3d.sh",
        &format!(
            "mkdir -p output/tmp\ncp \"{}\" output/tmp/folded_stats\ncp \"{}\" output/A3D.csv",
            tools.join("folded_stats.json").display(),
            tools.join("A3D.csv").display()
        ),
    );

    MetricsConfigBuilder::new()
        .evoef2_binary(evoef2)
        .dfire2_dir(dfire2_dir)
        .rosetta_binary(rosetta)
        .aggrescan3d_script(aggrescan)
        .python_binary(PathBuf::from("sh"))
        .max_run_time(Duration::from_secs(10))
        .build()
        .unwrap()
}
