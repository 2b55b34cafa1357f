//! Data contracts for the metrics pipeline: one fixed-schema result record
//! per energy function, plus the composite report that bundles them.
//!
//! Every run of a tool (success or failure) produces a result record with
//! exactly the tool's fixed set of named numeric fields, using `None` for
//! unavailable values rather than omitting fields. Equality for the
//! EvoEF2/Rosetta/Aggrescan3D records ignores volatile fields (elapsed time,
//! raw log/error text, return code) so that two runs on identical input are
//! considered equal regardless of timing noise.

use serde::Serialize;
use std::collections::BTreeMap;

/// Numeric fields in the EvoEF2 stability table: 20 reference terms, 8
/// intra-residue terms, 3 whole-structure propensity terms, 15 + 15
/// inter-residue terms, plus `total` and `time_spent`.
pub const EVOEF2_SCHEMA_SIZE: usize = 63;
/// DFIRE2 reports a single pairwise-potential total.
pub const DFIRE2_SCHEMA_SIZE: usize = 1;
/// Rosetta `score.sc` carries 24 named score components.
pub const ROSETTA_SCHEMA_SIZE: usize = 24;
/// Aggrescan3D yields 5 per-residue list columns and 4 summary statistics.
pub const AGGRESCAN3D_SCHEMA_SIZE: usize = 9;
/// BudeFF yields a total plus its three component terms.
pub const BUDEFF_SCHEMA_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// BudeFF
// ---------------------------------------------------------------------------

/// In-process BUDE-style all-atom energy. No subprocess, so no log or
/// return-code fields.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct BudeFFResult {
    pub total_energy: Option<f64>,
    pub steric: Option<f64>,
    pub desolvation: Option<f64>,
    pub charge: Option<f64>,
}

// ---------------------------------------------------------------------------
// EvoEF2
// ---------------------------------------------------------------------------

/// Per-residue-type reference energies (the unfolded-state baseline).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ReferenceEnergies {
    #[serde(rename = "reference_ALA")]
    pub ala: Option<f64>,
    #[serde(rename = "reference_CYS")]
    pub cys: Option<f64>,
    #[serde(rename = "reference_ASP")]
    pub asp: Option<f64>,
    #[serde(rename = "reference_GLU")]
    pub glu: Option<f64>,
    #[serde(rename = "reference_PHE")]
    pub phe: Option<f64>,
    #[serde(rename = "reference_GLY")]
    pub gly: Option<f64>,
    #[serde(rename = "reference_HIS")]
    pub his: Option<f64>,
    #[serde(rename = "reference_ILE")]
    pub ile: Option<f64>,
    #[serde(rename = "reference_LYS")]
    pub lys: Option<f64>,
    #[serde(rename = "reference_LEU")]
    pub leu: Option<f64>,
    #[serde(rename = "reference_MET")]
    pub met: Option<f64>,
    #[serde(rename = "reference_ASN")]
    pub asn: Option<f64>,
    #[serde(rename = "reference_PRO")]
    pub pro: Option<f64>,
    #[serde(rename = "reference_GLN")]
    pub gln: Option<f64>,
    #[serde(rename = "reference_ARG")]
    pub arg: Option<f64>,
    #[serde(rename = "reference_SER")]
    pub ser: Option<f64>,
    #[serde(rename = "reference_THR")]
    pub thr: Option<f64>,
    #[serde(rename = "reference_VAL")]
    pub val: Option<f64>,
    #[serde(rename = "reference_TRP")]
    pub trp: Option<f64>,
    #[serde(rename = "reference_TYR")]
    pub tyr: Option<f64>,
}

impl ReferenceEnergies {
    pub fn values(&self) -> [Option<f64>; 20] {
        [
            self.ala, self.cys, self.asp, self.glu, self.phe, self.gly, self.his, self.ile,
            self.lys, self.leu, self.met, self.asn, self.pro, self.gln, self.arg, self.ser,
            self.thr, self.val, self.trp, self.tyr,
        ]
    }
}

/// Intra-residue energy terms (`intraR_*` group).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct IntraEnergies {
    pub vdwatt: Option<f64>,
    pub vdwrep: Option<f64>,
    pub electr: Option<f64>,
    #[serde(rename = "deslvP")]
    pub deslv_p: Option<f64>,
    #[serde(rename = "deslvH")]
    pub deslv_h: Option<f64>,
    pub hbscbb_dis: Option<f64>,
    pub hbscbb_the: Option<f64>,
    pub hbscbb_phi: Option<f64>,
}

impl IntraEnergies {
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            self.vdwatt,
            self.vdwrep,
            self.electr,
            self.deslv_p,
            self.deslv_h,
            self.hbscbb_dis,
            self.hbscbb_the,
            self.hbscbb_phi,
        ]
    }
}

/// Inter-residue energy terms, used for both the same-chain (`interS_*`) and
/// different-chain (`interD_*`) groups.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct InterEnergies {
    pub vdwatt: Option<f64>,
    pub vdwrep: Option<f64>,
    pub electr: Option<f64>,
    #[serde(rename = "deslvP")]
    pub deslv_p: Option<f64>,
    #[serde(rename = "deslvH")]
    pub deslv_h: Option<f64>,
    pub ssbond: Option<f64>,
    pub hbbbbb_dis: Option<f64>,
    pub hbbbbb_the: Option<f64>,
    pub hbbbbb_phi: Option<f64>,
    pub hbscbb_dis: Option<f64>,
    pub hbscbb_the: Option<f64>,
    pub hbscbb_phi: Option<f64>,
    pub hbscsc_dis: Option<f64>,
    pub hbscsc_the: Option<f64>,
    pub hbscsc_phi: Option<f64>,
}

impl InterEnergies {
    pub fn values(&self) -> [Option<f64>; 15] {
        [
            self.vdwatt,
            self.vdwrep,
            self.electr,
            self.deslv_p,
            self.deslv_h,
            self.ssbond,
            self.hbbbbb_dis,
            self.hbbbbb_the,
            self.hbbbbb_phi,
            self.hbscbb_dis,
            self.hbscbb_the,
            self.hbscbb_phi,
            self.hbscsc_dis,
            self.hbscsc_the,
            self.hbscsc_phi,
        ]
    }
}

/// EvoEF2 stability-computation result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Evoef2Result {
    pub log_info: String,
    pub error_info: String,
    pub return_code: Option<i32>,
    pub reference: ReferenceEnergies,
    #[serde(rename = "intraR")]
    pub intra_r: IntraEnergies,
    pub aapropensity: Option<f64>,
    pub ramachandran: Option<f64>,
    pub dunbrack: Option<f64>,
    #[serde(rename = "interS")]
    pub inter_s: InterEnergies,
    #[serde(rename = "interD")]
    pub inter_d: InterEnergies,
    pub total: Option<f64>,
    pub time_spent: Option<f64>,
}

/// Sums the present values of a group; `None` when the whole group is absent.
fn group_total(values: &[Option<f64>]) -> Option<f64> {
    if values.iter().all(Option::is_none) {
        None
    } else {
        Some(values.iter().flatten().sum())
    }
}

impl Evoef2Result {
    /// Sum of the 20 per-residue-type reference energies.
    pub fn ref_total(&self) -> Option<f64> {
        group_total(&self.reference.values())
    }

    /// Sum of the intra-residue terms.
    pub fn intra_r_total(&self) -> Option<f64> {
        group_total(&self.intra_r.values())
    }

    /// Sum of the same-chain inter-residue terms.
    pub fn inter_s_total(&self) -> Option<f64> {
        group_total(&self.inter_s.values())
    }

    /// Sum of the different-chain inter-residue terms.
    pub fn inter_d_total(&self) -> Option<f64> {
        group_total(&self.inter_d.values())
    }

    /// All numeric fields in schema order. Drives the field-count invariant
    /// and the tabular export.
    pub fn numeric_fields(&self) -> Vec<Option<f64>> {
        let mut fields = Vec::with_capacity(EVOEF2_SCHEMA_SIZE);
        fields.extend(self.reference.values());
        fields.extend(self.intra_r.values());
        fields.push(self.aapropensity);
        fields.push(self.ramachandran);
        fields.push(self.dunbrack);
        fields.extend(self.inter_s.values());
        fields.extend(self.inter_d.values());
        fields.push(self.total);
        fields.push(self.time_spent);
        debug_assert_eq!(fields.len(), EVOEF2_SCHEMA_SIZE);
        fields
    }

    /// An all-`None` record preserving whatever log/error text was captured.
    pub fn failed(log_info: String, error_info: String, return_code: Option<i32>) -> Self {
        Self {
            log_info,
            error_info,
            return_code,
            ..Self::default()
        }
    }
}

// Volatile fields (log/error text, return code, elapsed time) are excluded:
// two runs on identical input compare equal regardless of timing noise.
impl PartialEq for Evoef2Result {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
            && self.intra_r == other.intra_r
            && self.aapropensity == other.aapropensity
            && self.ramachandran == other.ramachandran
            && self.dunbrack == other.dunbrack
            && self.inter_s == other.inter_s
            && self.inter_d == other.inter_d
            && self.total == other.total
    }
}

// ---------------------------------------------------------------------------
// DFIRE2
// ---------------------------------------------------------------------------

/// DFIRE2 pairwise-potential result: a single total.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Dfire2Result {
    pub log_info: String,
    pub error_info: String,
    pub return_code: Option<i32>,
    pub total: Option<f64>,
}

impl Dfire2Result {
    pub fn failed(log_info: String, error_info: String, return_code: Option<i32>) -> Self {
        Self {
            log_info,
            error_info,
            return_code,
            total: None,
        }
    }
}

// The log echoes the per-run scratch path, so it is volatile like the other
// process-noise fields.
impl PartialEq for Dfire2Result {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
    }
}

// ---------------------------------------------------------------------------
// Rosetta
// ---------------------------------------------------------------------------

/// Rosetta all-atom score-function result (`ref2015` components).
#[derive(Debug, Clone, Serialize, Default)]
pub struct RosettaResult {
    pub log_info: String,
    pub error_info: String,
    pub return_code: Option<i32>,
    pub dslf_fa13: Option<f64>,
    pub fa_atr: Option<f64>,
    pub fa_dun: Option<f64>,
    pub fa_elec: Option<f64>,
    pub fa_intra_rep: Option<f64>,
    pub fa_intra_sol_xover4: Option<f64>,
    pub fa_rep: Option<f64>,
    pub fa_sol: Option<f64>,
    pub hbond_bb_sc: Option<f64>,
    pub hbond_lr_bb: Option<f64>,
    pub hbond_sc: Option<f64>,
    pub hbond_sr_bb: Option<f64>,
    pub linear_chainbreak: Option<f64>,
    pub lk_ball_wtd: Option<f64>,
    pub omega: Option<f64>,
    pub overlap_chainbreak: Option<f64>,
    pub p_aa_pp: Option<f64>,
    pub pro_close: Option<f64>,
    pub rama_prepro: Option<f64>,
    #[serde(rename = "ref")]
    pub ref_energy: Option<f64>,
    pub score: Option<f64>,
    pub time: Option<f64>,
    pub total_score: Option<f64>,
    pub yhh_planarity: Option<f64>,
}

impl RosettaResult {
    /// All numeric fields in schema order.
    pub fn numeric_fields(&self) -> Vec<Option<f64>> {
        let fields = vec![
            self.dslf_fa13,
            self.fa_atr,
            self.fa_dun,
            self.fa_elec,
            self.fa_intra_rep,
            self.fa_intra_sol_xover4,
            self.fa_rep,
            self.fa_sol,
            self.hbond_bb_sc,
            self.hbond_lr_bb,
            self.hbond_sc,
            self.hbond_sr_bb,
            self.linear_chainbreak,
            self.lk_ball_wtd,
            self.omega,
            self.overlap_chainbreak,
            self.p_aa_pp,
            self.pro_close,
            self.rama_prepro,
            self.ref_energy,
            self.score,
            self.time,
            self.total_score,
            self.yhh_planarity,
        ];
        debug_assert_eq!(fields.len(), ROSETTA_SCHEMA_SIZE);
        fields
    }

    pub fn failed(log_info: String, error_info: String, return_code: Option<i32>) -> Self {
        Self {
            log_info,
            error_info,
            return_code,
            ..Self::default()
        }
    }
}

// `time` is wall-clock noise; log/error text and return code are volatile.
impl PartialEq for RosettaResult {
    fn eq(&self, other: &Self) -> bool {
        self.dslf_fa13 == other.dslf_fa13
            && self.fa_atr == other.fa_atr
            && self.fa_dun == other.fa_dun
            && self.fa_elec == other.fa_elec
            && self.fa_intra_rep == other.fa_intra_rep
            && self.fa_intra_sol_xover4 == other.fa_intra_sol_xover4
            && self.fa_rep == other.fa_rep
            && self.fa_sol == other.fa_sol
            && self.hbond_bb_sc == other.hbond_bb_sc
            && self.hbond_lr_bb == other.hbond_lr_bb
            && self.hbond_sc == other.hbond_sc
            && self.hbond_sr_bb == other.hbond_sr_bb
            && self.linear_chainbreak == other.linear_chainbreak
            && self.lk_ball_wtd == other.lk_ball_wtd
            && self.omega == other.omega
            && self.overlap_chainbreak == other.overlap_chainbreak
            && self.p_aa_pp == other.p_aa_pp
            && self.pro_close == other.pro_close
            && self.rama_prepro == other.rama_prepro
            && self.ref_energy == other.ref_energy
            && self.score == other.score
            && self.total_score == other.total_score
            && self.yhh_planarity == other.yhh_planarity
    }
}

// ---------------------------------------------------------------------------
// Aggrescan3D
// ---------------------------------------------------------------------------

/// Aggrescan3D aggregation-propensity result: four summary statistics plus
/// five `;`-joined per-residue list columns from the CSV table.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Aggrescan3dResult {
    pub log_info: String,
    pub error_info: String,
    pub return_code: Option<i32>,
    pub protein_list: Option<String>,
    pub chain_list: Option<String>,
    pub residue_number_list: Option<String>,
    pub residue_name_list: Option<String>,
    pub residue_score_list: Option<String>,
    pub max_value: Option<f64>,
    pub avg_value: Option<f64>,
    pub min_value: Option<f64>,
    pub total_value: Option<f64>,
}

impl Aggrescan3dResult {
    pub fn failed(log_info: String, error_info: String, return_code: Option<i32>) -> Self {
        Self {
            log_info,
            error_info,
            return_code,
            ..Self::default()
        }
    }

    /// The 9 schema fields (5 list columns + 4 summary statistics), as
    /// present/absent flags for the field-count invariant.
    pub fn schema_fields_present(&self) -> [bool; AGGRESCAN3D_SCHEMA_SIZE] {
        [
            self.protein_list.is_some(),
            self.chain_list.is_some(),
            self.residue_number_list.is_some(),
            self.residue_name_list.is_some(),
            self.residue_score_list.is_some(),
            self.max_value.is_some(),
            self.avg_value.is_some(),
            self.min_value.is_some(),
            self.total_value.is_some(),
        ]
    }
}

impl PartialEq for Aggrescan3dResult {
    fn eq(&self, other: &Self) -> bool {
        self.protein_list == other.protein_list
            && self.chain_list == other.chain_list
            && self.residue_number_list == other.residue_number_list
            && self.residue_name_list == other.residue_name_list
            && self.residue_score_list == other.residue_score_list
            && self.max_value == other.max_value
            && self.avg_value == other.avg_value
            && self.min_value == other.min_value
            && self.total_value == other.total_value
    }
}

// ---------------------------------------------------------------------------
// Composite report
// ---------------------------------------------------------------------------

/// Per-chain sequence and secondary-structure assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChainInfo {
    pub sequence: String,
    /// Per-residue secondary-structure codes; empty when assignment failed.
    pub dssp_assignment: String,
}

/// The unified bundle of all computed metrics for one structure.
///
/// Created once per pipeline invocation and immutable after construction;
/// individual metrics may be `None`/empty to signal "could not be computed
/// for this input", distinguished from total pipeline failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeMetricsReport {
    pub id: String,
    /// Keyed by chain identifier.
    pub sequence_info: BTreeMap<char, ChainInfo>,
    /// Amino-acid composition as fractions of total residue count, keyed by
    /// one-letter code (`X` for unknown). Sums to ~1.0.
    pub composition: BTreeMap<char, f64>,
    /// (omega, phi, psi) in degrees, keyed by positional residue identifier.
    pub torsion_angles: BTreeMap<String, (f64, f64, f64)>,
    pub hydrophobic_fitness: Option<f64>,
    pub isoelectric_point: f64,
    pub mass: f64,
    pub num_of_residues: usize,
    pub charge: f64,
    pub mean_packing_density: f64,
    #[serde(rename = "budeFF_results")]
    pub budeff_results: BudeFFResult,
    #[serde(rename = "evoEF2_results")]
    pub evoef2_results: Evoef2Result,
    #[serde(rename = "dfire2_results")]
    pub dfire2_results: Dfire2Result,
    pub rosetta_results: RosettaResult,
    pub aggrescan3d_results: Aggrescan3dResult,
}

impl CompositeMetricsReport {
    /// Compact `K:0.10;L:0.05;...` encoding of the composition map, used by
    /// the tabular export.
    pub fn composition_string(&self) -> String {
        self.composition
            .iter()
            .map(|(code, fraction)| format!("{}:{:.2}", code, fraction))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Compact `A12(179,-63,-45)...` encoding of the torsion-angle map.
    pub fn torsion_angles_string(&self) -> String {
        self.torsion_angles
            .iter()
            .map(|(id, (omega, phi, psi))| {
                format!("{}({:.0},{:.0},{:.0})", id, omega, phi, psi)
            })
            .collect()
    }
}
