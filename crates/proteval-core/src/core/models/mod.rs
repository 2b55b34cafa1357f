pub mod atom;
pub mod chain;
pub mod residue;
pub mod structure;
