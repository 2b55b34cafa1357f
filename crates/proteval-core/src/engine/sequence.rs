//! In-process sequence and composition analysis.
//!
//! Everything in this module is derived directly from the in-memory
//! structure, never via subprocess. The secondary-structure and
//! torsion-angle computations are insulated individually: a failure in one
//! never blocks the other scalar metrics.

use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::dihedral_points;
use crate::engine::report::ChainInfo;
use nalgebra::Point3;
use phf::{Map, phf_map};
use std::collections::BTreeMap;
use tracing::debug;

/// Neighbor-count radius (Angstroms) for packing density and burial, the
/// value used by the reference packing-density tagger.
const PACKING_RADIUS: f64 = 7.35;

/// Average residue masses of the free amino acids; one peptide-bond water is
/// subtracted per bond when summing a chain.
static RESIDUE_MASS: Map<char, f64> = phf_map! {
    'A' => 89.09, 'C' => 121.16, 'D' => 133.10, 'E' => 147.13, 'F' => 165.19,
    'G' => 75.03, 'H' => 155.16, 'I' => 131.17, 'K' => 146.19, 'L' => 131.17,
    'M' => 149.21, 'N' => 132.12, 'P' => 115.13, 'Q' => 146.15, 'R' => 174.20,
    'S' => 105.09, 'T' => 119.12, 'V' => 117.15, 'W' => 204.23, 'Y' => 181.19,
};

const WATER_MASS: f64 = 18.015;

// EMBOSS pKa set.
const PKA_NTERM: f64 = 9.69;
const PKA_CTERM: f64 = 2.34;
const PKA_ASP: f64 = 3.65;
const PKA_GLU: f64 = 4.25;
const PKA_CYS: f64 = 8.18;
const PKA_TYR: f64 = 10.07;
const PKA_HIS: f64 = 6.00;
const PKA_LYS: f64 = 10.53;
const PKA_ARG: f64 = 12.48;

const HYDROPHOBIC_CODES: &[char] = &['C', 'F', 'I', 'L', 'M', 'V', 'W', 'Y'];

const BACKBONE_ATOMS: &[&str] = &["N", "CA", "C", "O", "OXT"];

/// All composition-derived metrics for one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMetrics {
    pub sequence_info: BTreeMap<char, ChainInfo>,
    pub composition: BTreeMap<char, f64>,
    pub torsion_angles: BTreeMap<String, (f64, f64, f64)>,
    pub hydrophobic_fitness: Option<f64>,
    pub isoelectric_point: f64,
    pub mass: f64,
    pub num_of_residues: usize,
    pub charge: f64,
    pub mean_packing_density: f64,
}

/// Computes every in-process metric for the given structure.
pub fn analyse(structure: &Structure) -> SequenceMetrics {
    let mut sequence_info = BTreeMap::new();
    for chain in structure.chains.iter().filter(|c| c.is_polypeptide()) {
        let dssp_assignment = assign_secondary_structure(chain).unwrap_or_else(|| {
            debug!(chain = %chain.id, "Secondary-structure assignment failed; substituting empty string.");
            String::new()
        });
        sequence_info.insert(
            chain.id,
            ChainInfo {
                sequence: chain.sequence(),
                dssp_assignment,
            },
        );
    }

    let full_sequence = structure.full_sequence();
    let known: String = full_sequence.chars().filter(|&c| c != 'X').collect();

    SequenceMetrics {
        sequence_info,
        composition: composition(&full_sequence),
        torsion_angles: torsion_angles(structure),
        hydrophobic_fitness: hydrophobic_fitness(structure),
        isoelectric_point: isoelectric_point(&known),
        mass: molecular_weight(&known),
        num_of_residues: full_sequence.chars().count(),
        charge: net_charge(&known, 7.0),
        mean_packing_density: mean_packing_density(structure),
    }
}

/// Amino-acid composition as fractions of total residue count, keyed by
/// one-letter code (`X` for unknown). Fractions sum to ~1.0.
pub fn composition(sequence: &str) -> BTreeMap<char, f64> {
    let total = sequence.chars().count();
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for code in sequence.chars() {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(code, count)| (code, count as f64 / total.max(1) as f64))
        .collect()
}

/// Net charge at a given pH via Henderson-Hasselbalch.
pub fn net_charge(sequence: &str, ph: f64) -> f64 {
    let mut charge = 0.0;
    charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_NTERM));
    charge -= 1.0 / (1.0 + 10_f64.powf(PKA_CTERM - ph));

    for code in sequence.chars() {
        match code {
            'D' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_ASP - ph)),
            'E' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_GLU - ph)),
            'C' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_CYS - ph)),
            'Y' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_TYR - ph)),
            'H' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_HIS)),
            'K' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_LYS)),
            'R' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_ARG)),
            _ => {}
        }
    }
    charge
}

/// Isoelectric point via bisection on the Henderson-Hasselbalch charge
/// equation with EMBOSS pKa values.
pub fn isoelectric_point(sequence: &str) -> f64 {
    let mut lo = 0.0_f64;
    let mut hi = 14.0_f64;
    for _ in 0..100 {
        let mid = (lo + hi) / 2.0;
        let charge = net_charge(sequence, mid);
        if charge.abs() < 0.001 {
            return mid;
        }
        if charge > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// Average molecular weight of the (poly)peptide in Daltons.
pub fn molecular_weight(sequence: &str) -> f64 {
    let n = sequence.chars().count();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = sequence
        .chars()
        .filter_map(|code| RESIDUE_MASS.get(&code))
        .sum();
    sum - (n as f64 - 1.0) * WATER_MASS
}

fn backbone(residue: &Residue) -> Option<(Point3<f64>, Point3<f64>, Point3<f64>)> {
    Some((
        residue.atom("N")?.position,
        residue.atom("CA")?.position,
        residue.atom("C")?.position,
    ))
}

/// Backbone torsion-angle triples (omega, phi, psi) in degrees, keyed by
/// positional residue identifier.
///
/// Only residues with a fully-defined triple are included; terminal residues
/// and residues with missing backbone atoms are skipped silently.
pub fn torsion_angles(structure: &Structure) -> BTreeMap<String, (f64, f64, f64)> {
    let mut angles = BTreeMap::new();
    for chain in &structure.chains {
        let residues: Vec<&Residue> = chain.polymer_residues().collect();
        for i in 1..residues.len().saturating_sub(1) {
            let Some((_, ca_prev, c_prev)) = backbone(residues[i - 1]) else {
                continue;
            };
            let Some((n_i, ca_i, c_i)) = backbone(residues[i]) else {
                continue;
            };
            let Some((n_next, _, _)) = backbone(residues[i + 1]) else {
                continue;
            };

            let omega = dihedral_points(&ca_prev, &c_prev, &n_i, &ca_i);
            let phi = dihedral_points(&c_prev, &n_i, &ca_i, &c_i);
            let psi = dihedral_points(&n_i, &ca_i, &c_i, &n_next);
            angles.insert(residues[i].id_string(chain.id), (omega, phi, psi));
        }
    }
    angles
}

/// Simplified distance-based secondary-structure assignment over the polymer
/// residues of one chain (one code per residue: H/E/T/C).
///
/// Helix: three consecutive O(i)->N(i+4) contacts under 3.5 A; sheet:
/// reciprocal O/N bridges between residues more than four apart; turn:
/// O(i)->N(i+3) contact. Returns `None` when the chain has no polymer
/// residues.
pub fn assign_secondary_structure(chain: &Chain) -> Option<String> {
    let residues: Vec<&Residue> = chain.polymer_residues().collect();
    let n = residues.len();
    if n == 0 {
        return None;
    }

    let hbond_cutoff = 3.5;
    let backbone_no: Vec<Option<(Point3<f64>, Point3<f64>)>> = residues
        .iter()
        .map(|r| Some((r.atom("N")?.position, r.atom("O")?.position)))
        .collect();

    let mut codes = vec!['C'; n];

    let mut helix_hbond = vec![false; n];
    for i in 0..n.saturating_sub(4) {
        if let (Some((_, o_i)), Some((n_i4, _))) = (&backbone_no[i], &backbone_no[i + 4]) {
            helix_hbond[i] = (o_i - n_i4).norm() < hbond_cutoff;
        }
    }
    for i in 0..n.saturating_sub(6) {
        if helix_hbond[i] && helix_hbond[i + 1] && helix_hbond[i + 2] {
            for code in codes.iter_mut().take((i + 5).min(n - 1) + 1).skip(i) {
                *code = 'H';
            }
        }
    }

    for i in 0..n {
        for j in (i + 5)..n {
            if let (Some((n_i, o_i)), Some((n_j, o_j))) = (&backbone_no[i], &backbone_no[j]) {
                if (o_i - n_j).norm() < hbond_cutoff && (o_j - n_i).norm() < hbond_cutoff {
                    if codes[i] == 'C' {
                        codes[i] = 'E';
                    }
                    if codes[j] == 'C' {
                        codes[j] = 'E';
                    }
                }
            }
        }
    }

    for i in 0..n.saturating_sub(3) {
        if let (Some((_, o_i)), Some((n_i3, _))) = (&backbone_no[i], &backbone_no[i + 3]) {
            if (o_i - n_i3).norm() < hbond_cutoff {
                for code in codes.iter_mut().take((i + 3).min(n - 1) + 1).skip(i) {
                    if *code == 'C' {
                        *code = 'T';
                    }
                }
            }
        }
    }

    Some(codes.into_iter().collect())
}

/// Mean packing density: the average neighbor count within
/// [`PACKING_RADIUS`] over all non-hydrogen atoms.
pub fn mean_packing_density(structure: &Structure) -> f64 {
    let heavy: Vec<Point3<f64>> = structure
        .atoms()
        .filter(|a| !a.is_hydrogen())
        .map(|a| a.position)
        .collect();
    if heavy.is_empty() {
        return 0.0;
    }

    let mut total = 0_usize;
    for (i, a) in heavy.iter().enumerate() {
        for (j, b) in heavy.iter().enumerate() {
            if i != j && (a - b).norm() < PACKING_RADIUS {
                total += 1;
            }
        }
    }
    total as f64 / heavy.len() as f64
}

/// Hydrophobic fitness: the negated mean burial (heavy-atom neighbor count
/// within [`PACKING_RADIUS`] of the side-chain centroid) over hydrophobic
/// residues. More negative means a better-buried hydrophobic core.
///
/// Returns `None` for degenerate structures with no hydrophobic residues
/// (the division-by-zero condition) or when no hydrophobic residue carries
/// usable side-chain coordinates (the missing-data condition).
pub fn hydrophobic_fitness(structure: &Structure) -> Option<f64> {
    let heavy: Vec<Point3<f64>> = structure
        .atoms()
        .filter(|a| !a.is_hydrogen())
        .map(|a| a.position)
        .collect();

    let mut hydrophobic_seen = false;
    let mut centers = Vec::new();
    for (_, residue) in structure.residues() {
        let Some(code) = residue.one_letter() else {
            continue;
        };
        if !HYDROPHOBIC_CODES.contains(&code) {
            continue;
        }
        hydrophobic_seen = true;
        if let Some(center) = side_chain_centroid(residue) {
            centers.push(center);
        }
    }

    if !hydrophobic_seen || centers.is_empty() {
        return None;
    }

    let total_burial: usize = centers
        .iter()
        .map(|center| {
            heavy
                .iter()
                .filter(|p| (*p - center).norm() < PACKING_RADIUS)
                .count()
        })
        .sum();
    Some(-(total_burial as f64) / centers.len() as f64)
}

fn side_chain_centroid(residue: &Residue) -> Option<Point3<f64>> {
    let side_chain: Vec<Point3<f64>> = residue
        .atoms
        .iter()
        .filter(|a| !a.is_hydrogen() && !BACKBONE_ATOMS.contains(&a.name.as_str()))
        .map(|a| a.position)
        .collect();
    let points = if side_chain.is_empty() {
        vec![residue.atom("CA")?.position]
    } else {
        side_chain
    };
    let sum = points
        .iter()
        .fold(Point3::origin(), |acc, p| acc + p.coords);
    Some(sum / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    fn residue_at(name: &str, number: isize, offset: f64) -> Residue {
        let mut residue = Residue::new(name, number, None);
        residue
            .atoms
            .push(Atom::new(1, "N", "N", Point3::new(offset, 0.0, 0.0)));
        residue
            .atoms
            .push(Atom::new(2, "CA", "C", Point3::new(offset + 1.0, 0.5, 0.0)));
        residue
            .atoms
            .push(Atom::new(3, "C", "C", Point3::new(offset + 2.0, 0.0, 0.0)));
        residue
            .atoms
            .push(Atom::new(4, "O", "O", Point3::new(offset + 2.2, -1.0, 0.5)));
        residue
    }

    fn toy_structure(names: &[&str]) -> Structure {
        let mut chain = Chain::new('A');
        for (i, name) in names.iter().enumerate() {
            chain
                .residues
                .push(residue_at(name, i as isize + 1, i as f64 * 3.0));
        }
        Structure {
            id: "toy".to_string(),
            chains: vec![chain],
        }
    }

    #[test]
    fn composition_fractions_sum_to_one() {
        let fractions = composition("AAGGXW");
        let sum: f64 = fractions.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((fractions[&'A'] - 2.0 / 6.0).abs() < 1e-9);
        assert!((fractions[&'X'] - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn isoelectric_point_tracks_charge() {
        assert!(isoelectric_point("DDDDD") < 4.0);
        assert!(isoelectric_point("KKKKK") > 10.0);
        let neutral = isoelectric_point("GGGGG");
        assert!(neutral > 5.0 && neutral < 7.0);
    }

    #[test]
    fn molecular_weight_subtracts_peptide_bond_water() {
        assert!((molecular_weight("G") - 75.03).abs() < 1e-9);
        assert!((molecular_weight("GG") - (2.0 * 75.03 - WATER_MASS)).abs() < 1e-9);
        assert_eq!(molecular_weight(""), 0.0);
    }

    #[test]
    fn net_charge_is_negative_for_acidic_sequences() {
        assert!(net_charge("DDDDDD", 7.0) < -4.0);
        assert!(net_charge("KKKKKK", 7.0) > 4.0);
    }

    #[test]
    fn torsion_angles_cover_interior_residues_only() {
        let structure = toy_structure(&["ALA", "GLY", "LEU", "VAL"]);
        let angles = torsion_angles(&structure);
        assert_eq!(angles.len(), 2);
        assert!(angles.contains_key("A2"));
        assert!(angles.contains_key("A3"));
    }

    #[test]
    fn torsion_angles_skip_residues_with_missing_backbone() {
        let mut structure = toy_structure(&["ALA", "GLY", "LEU", "VAL"]);
        structure.chains[0].residues[1]
            .atoms
            .retain(|a| a.name != "CA");
        let angles = torsion_angles(&structure);
        assert!(!angles.contains_key("A2"));
    }

    #[test]
    fn secondary_structure_has_one_code_per_residue() {
        let structure = toy_structure(&["ALA", "GLY", "LEU", "VAL", "ALA"]);
        let assignment = assign_secondary_structure(&structure.chains[0]).unwrap();
        assert_eq!(assignment.len(), 5);
        assert!(assignment.chars().all(|c| "HETC".contains(c)));
    }

    #[test]
    fn secondary_structure_fails_on_empty_chain() {
        assert_eq!(assign_secondary_structure(&Chain::new('A')), None);
    }

    #[test]
    fn packing_density_counts_close_neighbors() {
        let structure = toy_structure(&["ALA", "GLY"]);
        // All eight heavy atoms lie within the packing radius of each other.
        assert!((mean_packing_density(&structure) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn hydrophobic_fitness_is_none_without_hydrophobic_residues() {
        let structure = toy_structure(&["GLY", "GLY", "GLY"]);
        assert_eq!(hydrophobic_fitness(&structure), None);
    }

    #[test]
    fn hydrophobic_fitness_is_negative_when_defined() {
        let structure = toy_structure(&["LEU", "VAL", "ILE"]);
        let fitness = hydrophobic_fitness(&structure).unwrap();
        assert!(fitness < 0.0);
    }

    #[test]
    fn analyse_merges_all_metrics() {
        let structure = toy_structure(&["ALA", "GLY", "LEU", "VAL"]);
        let metrics = analyse(&structure);
        assert_eq!(metrics.num_of_residues, 4);
        assert_eq!(metrics.sequence_info[&'A'].sequence, "AGLV");
        assert_eq!(metrics.sequence_info[&'A'].dssp_assignment.len(), 4);
        let total: f64 = metrics.composition.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(metrics.mass > 0.0);
        assert!(metrics.mean_packing_density > 0.0);
    }
}
