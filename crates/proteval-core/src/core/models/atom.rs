use nalgebra::Point3;

/// A single atom record from a coordinate file.
///
/// The model is read-only once parsed: the pipeline never mutates atoms, it
/// only derives metrics from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: i32,
    /// The atom name (e.g., "CA", "N", "OXT").
    pub name: String,
    /// Element symbol (e.g., "C", "N", "FE"). Upper-case, trimmed.
    pub element: String,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy from the source file.
    pub occupancy: f64,
    /// Isotropic temperature factor from the source file.
    pub temp_factor: f64,
}

impl Atom {
    pub fn new(serial: i32, name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
        }
    }

    /// Hydrogen (and deuterium) atoms are excluded from packing-density and
    /// pairwise-energy sums.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }

    pub fn distance_to(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }
}
