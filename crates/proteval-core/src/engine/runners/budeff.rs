//! In-process BUDE-style all-atom energy.
//!
//! Three soft pairwise terms summed over non-bonded heavy-atom pairs: a
//! steric term (quadratic clash penalty inside the contact distance, shallow
//! attractive well beyond it), a desolvation term rewarding buried
//! hydrophobic contacts, and a distance-ramped Coulomb term over formal
//! side-chain charges.

use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::engine::report::BudeFFResult;
use nalgebra::Point3;
use tracing::debug;

/// Pairwise interactions vanish beyond this separation (Angstroms).
const PAIR_CUTOFF: f64 = 8.0;
/// Separation below which the steric term turns repulsive.
const CONTACT_DISTANCE: f64 = 4.0;
const STERIC_REPULSION: f64 = 25.0;
const STERIC_WELL_DEPTH: f64 = 0.12;
const DESOLVATION_STRENGTH: f64 = 0.30;
/// Coulomb constant in kcal*A/(mol*e^2), used with a distance-dependent
/// dielectric of 4r.
const COULOMB_CONSTANT: f64 = 332.0637;

struct PairAtom {
    chain: usize,
    residue: isize,
    position: Point3<f64>,
    charge: f64,
    hydrophobic: bool,
}

/// Formal side-chain and terminal charges at neutral pH.
fn formal_charge(residue_name: &str, atom: &Atom) -> f64 {
    match (residue_name, atom.name.as_str()) {
        ("ASP", "OD1") | ("ASP", "OD2") | ("GLU", "OE1") | ("GLU", "OE2") => -0.5,
        ("ARG", "NH1") | ("ARG", "NH2") => 0.5,
        ("LYS", "NZ") => 1.0,
        ("HIS", "ND1") | ("HIS", "NE2") => 0.25,
        (_, "OXT") => -1.0,
        _ => 0.0,
    }
}

fn is_hydrophobic(atom: &Atom) -> bool {
    matches!(atom.element.as_str(), "C" | "S")
}

fn steric_pair(distance: f64) -> f64 {
    if distance >= PAIR_CUTOFF {
        0.0
    } else if distance < CONTACT_DISTANCE {
        let overlap = 1.0 - distance / CONTACT_DISTANCE;
        STERIC_REPULSION * overlap * overlap - STERIC_WELL_DEPTH
    } else {
        // Linear well from full depth at contact to zero at the cutoff.
        let fraction = (PAIR_CUTOFF - distance) / (PAIR_CUTOFF - CONTACT_DISTANCE);
        -STERIC_WELL_DEPTH * fraction
    }
}

fn desolvation_pair(distance: f64) -> f64 {
    if distance >= PAIR_CUTOFF {
        0.0
    } else {
        -DESOLVATION_STRENGTH * (1.0 - distance / PAIR_CUTOFF)
    }
}

fn charge_pair(q1: f64, q2: f64, distance: f64) -> f64 {
    if distance >= PAIR_CUTOFF || q1 == 0.0 || q2 == 0.0 {
        return 0.0;
    }
    let ramp = 1.0 - distance / PAIR_CUTOFF;
    COULOMB_CONSTANT * q1 * q2 / (4.0 * distance * distance) * ramp
}

/// Computes the BUDE-style energy over all non-bonded heavy-atom pairs.
///
/// Pairs within one residue, and pairs between sequence-adjacent residues of
/// the same chain, are excluded as covalently coupled.
pub fn run(structure: &Structure) -> BudeFFResult {
    let mut atoms = Vec::new();
    for (chain_index, chain) in structure.chains.iter().enumerate() {
        for residue in &chain.residues {
            if residue.is_water() {
                continue;
            }
            for atom in residue.atoms.iter().filter(|a| !a.is_hydrogen()) {
                atoms.push(PairAtom {
                    chain: chain_index,
                    residue: residue.number,
                    position: atom.position,
                    charge: formal_charge(&residue.name, atom),
                    hydrophobic: is_hydrophobic(atom),
                });
            }
        }
    }

    let mut steric = 0.0;
    let mut desolvation = 0.0;
    let mut charge = 0.0;
    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            let (a, b) = (&atoms[i], &atoms[j]);
            if a.chain == b.chain && (a.residue - b.residue).abs() <= 1 {
                continue;
            }
            let distance = (a.position - b.position).norm();
            if distance >= PAIR_CUTOFF {
                continue;
            }
            steric += steric_pair(distance);
            if a.hydrophobic && b.hydrophobic {
                desolvation += desolvation_pair(distance);
            }
            charge += charge_pair(a.charge, b.charge, distance);
        }
    }

    debug!(
        atoms = atoms.len(),
        steric, desolvation, charge, "Evaluated all-atom pairwise energy."
    );
    BudeFFResult {
        total_energy: Some(steric + desolvation + charge),
        steric: Some(steric),
        desolvation: Some(desolvation),
        charge: Some(charge),
    }
}
