//! Minimal fixed-column PDB reader and writer.
//!
//! The reader accepts ATOM/HETATM records of the first model only, keeps the
//! primary alternate location, and treats TER records as chain breaks. It is
//! deliberately lenient: unrelated record types are skipped, and the only
//! fatal conditions are malformed coordinate fields and input with no
//! coordinate records at all.

use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("No PDB format data found in input")]
    NoAtomRecords,

    #[error("Malformed {field} field on line {line}: '{text}'")]
    MalformedField {
        field: &'static str,
        line: usize,
        text: String,
    },
}

/// Parses PDB-format text into a [`Structure`].
pub fn parse_pdb(input: &str, id: &str) -> Result<Structure, PdbError> {
    let mut structure = Structure {
        id: id.to_string(),
        chains: Vec::new(),
    };

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let record = field(line, 0, 6);
        match record.as_str() {
            "ATOM" | "HETATM" => {
                parse_atom_record(line, line_number, record == "HETATM", &mut structure)?
            }
            // First model only: biological-unit files repeat coordinates per model.
            "ENDMDL" => break,
            _ => {}
        }
    }

    if structure.is_empty() {
        return Err(PdbError::NoAtomRecords);
    }
    Ok(structure)
}

fn parse_atom_record(
    line: &str,
    line_number: usize,
    is_hetero: bool,
    structure: &mut Structure,
) -> Result<(), PdbError> {
    // Keep only the primary alternate location.
    let alt_loc = char_at(line, 16);
    if !matches!(alt_loc, ' ' | 'A') {
        return Ok(());
    }

    let serial = field(line, 6, 11).parse::<i32>().unwrap_or(0);
    let name = field(line, 12, 16);
    let res_name = field(line, 17, 20);
    let chain_id = char_at(line, 21);
    let res_number = parse_numeric_field(line, 22, 26, "residue number", line_number)? as isize;
    let insertion_code = match char_at(line, 26) {
        ' ' => None,
        code => Some(code),
    };

    let x = parse_numeric_field(line, 30, 38, "x coordinate", line_number)?;
    let y = parse_numeric_field(line, 38, 46, "y coordinate", line_number)?;
    let z = parse_numeric_field(line, 46, 54, "z coordinate", line_number)?;

    let mut atom = Atom::new(serial, &name, &element_of(line, &name), Point3::new(x, y, z));
    atom.occupancy = field(line, 54, 60).parse().unwrap_or(1.0);
    atom.temp_factor = field(line, 60, 66).parse().unwrap_or(0.0);

    let index = match structure.chains.iter().position(|c| c.id == chain_id) {
        Some(index) => index,
        None => {
            structure.chains.push(Chain::new(chain_id));
            structure.chains.len() - 1
        }
    };
    let chain = &mut structure.chains[index];

    let needs_new_residue = match chain.residues.last() {
        Some(last) => {
            last.number != res_number
                || last.insertion_code != insertion_code
                || last.name != res_name
        }
        None => true,
    };
    if needs_new_residue {
        let mut residue = Residue::new(&res_name, res_number, insertion_code);
        residue.is_hetero = is_hetero && res_name != "HOH" && res_name != "WAT";
        chain.residues.push(residue);
    }
    if let Some(residue) = chain.residues.last_mut() {
        residue.atoms.push(atom);
    }
    Ok(())
}

/// Serializes a structure to PDB-format text (ATOM/HETATM + TER + END).
pub fn write_pdb(structure: &Structure) -> String {
    let mut out = String::new();
    let mut serial = 0_i32;

    for chain in &structure.chains {
        for residue in &chain.residues {
            let record = if residue.is_hetero || residue.is_water() {
                "HETATM"
            } else {
                "ATOM"
            };
            for atom in &residue.atoms {
                serial += 1;
                out.push_str(&format!(
                    "{:<6}{:>5} {:<4}{}{:<3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}\n",
                    record,
                    serial,
                    pad_atom_name(&atom.name),
                    ' ',
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.occupancy,
                    atom.temp_factor,
                    atom.element,
                ));
            }
        }
        serial += 1;
        if let Some(last) = chain
            .residues
            .iter()
            .rev()
            .find(|r| !r.is_water() && !r.is_hetero)
        {
            out.push_str(&format!(
                "{:<6}{:>5}      {:<3} {}{:>4}{}\n",
                "TER",
                serial,
                last.name,
                chain.id,
                last.number,
                last.insertion_code.unwrap_or(' '),
            ));
        }
    }
    out.push_str("END\n");
    out
}

// PDB atom names occupy columns 13-16 with element-dependent justification:
// one- and two-letter carbon/nitrogen/oxygen names start in column 14.
fn pad_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        name.to_string()
    } else {
        format!(" {:<3}", name)
    }
}

fn field(line: &str, start: usize, end: usize) -> String {
    line.get(start..end.min(line.len()))
        .unwrap_or("")
        .trim()
        .to_string()
}

fn char_at(line: &str, index: usize) -> char {
    line.chars().nth(index).unwrap_or(' ')
}

fn element_of(line: &str, atom_name: &str) -> String {
    let from_columns = field(line, 76, 78);
    if !from_columns.is_empty() {
        return from_columns.to_uppercase();
    }
    // Fall back to the first alphabetic character of the atom name.
    atom_name
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

fn parse_numeric_field(
    line: &str,
    start: usize,
    end: usize,
    name: &'static str,
    line_number: usize,
) -> Result<f64, PdbError> {
    let text = field(line, start, end);
    text.parse::<f64>().map_err(|_| PdbError::MalformedField {
        field: name,
        line: line_number,
        text,
    })
}
