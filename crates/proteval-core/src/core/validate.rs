//! Pre-flight structural validation.

use crate::core::models::structure::Structure;
use phf::{Set, phf_set};
use std::collections::BTreeSet;

/// Monomer codes the pipeline understands natively: the 20 canonical amino
/// acids plus water.
static ALLOWED_MONOMERS: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "HOH", "WAT",
};

/// Returns the set of residue codes present in the structure that fall
/// outside the allow-list of the 20 canonical amino acids plus water.
///
/// Callers use this as a pre-flight check; the metrics pipeline itself
/// degrades gracefully on unusual residues and does not require a clean
/// result to proceed.
pub fn disallowed_monomers(structure: &Structure) -> BTreeSet<String> {
    structure
        .residues()
        .filter(|(_, residue)| !ALLOWED_MONOMERS.contains(residue.name.as_str()))
        .map(|(_, residue)| residue.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::Chain;
    use crate::core::models::residue::Residue;

    fn structure_with(names: &[&str]) -> Structure {
        let mut chain = Chain::new('A');
        for (i, name) in names.iter().enumerate() {
            chain.residues.push(Residue::new(name, i as isize + 1, None));
        }
        Structure {
            id: "test".to_string(),
            chains: vec![chain],
        }
    }

    #[test]
    fn canonical_residues_and_water_are_allowed() {
        let structure = structure_with(&["ALA", "GLY", "TRP", "HOH"]);
        assert!(disallowed_monomers(&structure).is_empty());
    }

    #[test]
    fn reports_exactly_the_offending_codes() {
        let structure = structure_with(&["ALA", "MSE", "GLY", "MSE"]);
        let disallowed = disallowed_monomers(&structure);
        assert_eq!(disallowed.len(), 1);
        assert!(disallowed.contains("MSE"));
    }
}
