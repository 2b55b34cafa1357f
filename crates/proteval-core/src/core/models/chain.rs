use super::residue::Residue;

/// An ordered sequence of residues sharing a chain identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    /// One-letter sequence over the polymer residues of this chain.
    ///
    /// Canonical amino acids map to their one-letter code; non-canonical
    /// polymer residues map to `'X'`. Waters and other hetero groups are
    /// excluded.
    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .filter(|r| !r.is_water() && !r.is_hetero)
            .map(|r| r.one_letter().unwrap_or('X'))
            .collect()
    }

    /// A chain is treated as a polypeptide if any residue carries a CA atom.
    pub fn is_polypeptide(&self) -> bool {
        self.residues.iter().any(|r| r.atom("CA").is_some())
    }

    /// Polymer residues in order (waters and hetero groups excluded).
    pub fn polymer_residues(&self) -> impl Iterator<Item = &Residue> {
        self.residues
            .iter()
            .filter(|r| !r.is_water() && !r.is_hetero)
    }
}
