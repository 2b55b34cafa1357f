use super::atom::Atom;
use phf::{Map, phf_map};

/// Three-letter to one-letter codes for the 20 canonical amino acids.
static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
};

/// One residue (amino acid, water, or other hetero group) within a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Three-letter monomer code from the source file (e.g., "ALA", "HOH").
    pub name: String,
    /// Residue sequence number from the source file.
    pub number: isize,
    /// Insertion code, if the source file carries one.
    pub insertion_code: Option<char>,
    /// Whether the residue came from a HETATM record.
    pub is_hetero: bool,
    pub atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(name: &str, number: isize, insertion_code: Option<char>) -> Self {
        Self {
            name: name.to_string(),
            number,
            insertion_code,
            is_hetero: false,
            atoms: Vec::new(),
        }
    }

    /// One-letter code for canonical amino acids, `None` otherwise.
    pub fn one_letter(&self) -> Option<char> {
        THREE_TO_ONE.get(self.name.as_str()).copied()
    }

    pub fn is_amino_acid(&self) -> bool {
        THREE_TO_ONE.contains_key(self.name.as_str())
    }

    pub fn is_water(&self) -> bool {
        matches!(self.name.as_str(), "HOH" | "WAT")
    }

    /// First atom with the given name, if present.
    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// Positional identifier used to key per-residue metrics, e.g. `"A12"`
    /// or `"A12B"` when an insertion code is present.
    pub fn id_string(&self, chain_id: char) -> String {
        match self.insertion_code {
            Some(code) => format!("{}{}{}", chain_id, self.number, code),
            None => format!("{}{}", chain_id, self.number),
        }
    }
}
