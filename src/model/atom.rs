//! Source atom representation as delivered by structure readers.
//!
//! Each atom keeps the identifiers the source file gave it (name and serial number), its
//! element symbol and Cartesian position, and any connectivity hints declared by `CONECT`
//! records. Atoms live inside residues; bond inference works on a flattened copy of them
//! (see [`AtomTable`](super::table::AtomTable)).

use super::types::{Point, is_hydrogen, normalize_element};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with its source serial number and optional declared bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in the source file (e.g., `CA`).
    pub name: SmolStr,
    /// Upper-cased element symbol (e.g., `C`, `FE`).
    pub element: SmolStr,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
    /// Serial number assigned by the source file; not guaranteed dense or unique.
    pub serial: i32,
    /// Serial numbers this atom is declared bonded to. Empty when no hint exists.
    pub connectivity: Vec<i32>,
}

impl Atom {
    /// Creates a new atom without connectivity hints.
    ///
    /// The element symbol is normalized to upper case so that later comparisons, such as
    /// the hydrogen check in the spatial search, do not depend on the casing in the file.
    ///
    /// # Arguments
    ///
    /// * `name` - Atom label such as `"CA"` or `"OXT"`.
    /// * `element` - Element symbol in any case.
    /// * `pos` - Position in ångströms.
    /// * `serial` - Serial number from the source file.
    pub fn new(name: &str, element: &str, pos: Point, serial: i32) -> Self {
        Self {
            name: SmolStr::new(name),
            element: SmolStr::new(normalize_element(element)),
            pos,
            serial,
            connectivity: Vec::new(),
        }
    }

    /// Attaches declared bond partners, replacing any previous hint.
    pub fn with_connectivity(mut self, serials: impl IntoIterator<Item = i32>) -> Self {
        self.connectivity = serials.into_iter().collect();
        self
    }

    /// Whether the atom carries a non-empty connectivity hint.
    pub fn has_connectivity(&self) -> bool {
        !self.connectivity.is_empty()
    }

    pub fn is_hydrogen(&self) -> bool {
        is_hydrogen(&self.element)
    }

    /// Computes the Euclidean distance to another atom in ångströms.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ serial: {}, name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.serial, self.name, self.element, self.pos.x, self.pos.y, self.pos.z
        )
    }
}
