use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;

/// An immutable view of a parsed structure: an ordered sequence of chains,
/// each an ordered sequence of residues with 3D coordinates.
///
/// Created once per pipeline invocation by the PDB reader and read-only
/// thereafter; every metric is derived from this view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    /// Identifier carried through from the source (file stem or HEADER id).
    pub id: String,
    pub chains: Vec<Chain>,
}

impl Structure {
    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(|c| c.residues.is_empty())
    }

    /// All residues across all chains, paired with their chain identifier.
    pub fn residues(&self) -> impl Iterator<Item = (char, &Residue)> {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter().map(move |r| (c.id, r)))
    }

    /// All atoms across all chains.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter())
            .flat_map(|r| r.atoms.iter())
    }

    /// Concatenated one-letter sequence over all polypeptide chains.
    pub fn full_sequence(&self) -> String {
        self.chains
            .iter()
            .filter(|c| c.is_polypeptide())
            .map(|c| c.sequence())
            .collect()
    }

    /// A copy with insertion-code ambiguity removed: residues are renumbered
    /// sequentially from 1 within each chain and insertion codes are dropped,
    /// so positional residue identifiers are unambiguous.
    pub fn relabelled(&self) -> Structure {
        let chains = self
            .chains
            .iter()
            .map(|chain| {
                let residues = chain
                    .residues
                    .iter()
                    .enumerate()
                    .map(|(i, residue)| {
                        let mut relabelled = residue.clone();
                        relabelled.number = i as isize + 1;
                        relabelled.insertion_code = None;
                        relabelled
                    })
                    .collect();
                Chain {
                    id: chain.id,
                    residues,
                }
            })
            .collect();
        Structure {
            id: self.id.clone(),
            chains,
        }
    }

    /// Serializes the structure back to PDB-format text.
    pub fn to_pdb(&self) -> String {
        crate::core::io::pdb::write_pdb(self)
    }
}
