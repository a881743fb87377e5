//! Flat, index-addressed view of a structure's atoms.
//!
//! Bond inference never walks the model/chain/residue tree directly. Instead the tree is
//! flattened once into an [`AtomTable`] whose positions are the atom indices used by every
//! [`Bond`](super::graph::Bond). The table owns copies of the atom data so that the graph
//! returned to callers carries no borrow of the parsed structure.

use super::structure::Structure;
use super::types::{Point, is_hydrogen};
use crate::ops::Error;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Atom record addressed by its position in an [`AtomTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedAtom {
    /// Zero-based index assigned by flattening order.
    pub index: usize,
    /// Cartesian coordinates in ångströms.
    pub pos: Point,
    /// Upper-cased element symbol.
    pub element: SmolStr,
    /// Serial number from the source file.
    pub serial: i32,
    /// Declared bond partners by serial number; empty when the source had none.
    pub connectivity: Vec<i32>,
}

impl IndexedAtom {
    pub fn is_hydrogen(&self) -> bool {
        is_hydrogen(&self.element)
    }
}

/// Ordered atoms of one structure plus the `serial → index` lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTable {
    atoms: Vec<IndexedAtom>,
    serial_index: HashMap<i32, usize>,
}

impl AtomTable {
    /// Flattens `structure` in model → chain → residue → atom order.
    ///
    /// When a serial number occurs more than once (typically one copy per model), the first
    /// occurrence owns the serial in the lookup table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStructure`] when the structure contains no atoms.
    pub fn from_structure(structure: &Structure) -> Result<Self, Error> {
        let atoms: Vec<IndexedAtom> = structure
            .iter_atoms()
            .enumerate()
            .map(|(index, atom)| IndexedAtom {
                index,
                pos: atom.pos,
                element: atom.element.clone(),
                serial: atom.serial,
                connectivity: atom.connectivity.clone(),
            })
            .collect();

        if atoms.is_empty() {
            return Err(Error::EmptyStructure);
        }

        let mut serial_index = HashMap::with_capacity(atoms.len());
        for atom in &atoms {
            serial_index.entry(atom.serial).or_insert(atom.index);
        }

        log::debug!(
            "Flattened {} atoms ({} distinct serial numbers)",
            atoms.len(),
            serial_index.len()
        );

        Ok(Self {
            atoms,
            serial_index,
        })
    }

    /// Resolves a source serial number to an atom index.
    pub fn index_of_serial(&self, serial: i32) -> Option<usize> {
        self.serial_index.get(&serial).copied()
    }

    pub fn get(&self, index: usize) -> Option<&IndexedAtom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[IndexedAtom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexedAtom> {
        self.atoms.iter()
    }

    /// Positions as plain `[x, y, z]` triples, index-aligned with [`AtomTable::elements`].
    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| [a.pos.x, a.pos.y, a.pos.z])
            .collect()
    }

    /// Element symbols, index-aligned with [`AtomTable::coordinates`].
    pub fn elements(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.element.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::chain::Chain;
    use crate::model::residue::Residue;
    use crate::model::structure::Model;

    fn structure_from(models: &[Vec<(&str, &str, i32)>]) -> Structure {
        let mut structure = Structure::new();
        for (m, atoms) in models.iter().enumerate() {
            let mut model = Model::new(m as i32 + 1);
            let mut chain = Chain::new("A");
            let mut residue = Residue::new(1, None, "LIG", true);
            for (i, (name, element, serial)) in atoms.iter().enumerate() {
                residue.add_atom(Atom::new(
                    name,
                    element,
                    Point::new(i as f64, m as f64, 0.0),
                    *serial,
                ));
            }
            chain.add_residue(residue);
            model.add_chain(chain);
            structure.add_model(model);
        }
        structure
    }

    #[test]
    fn from_structure_assigns_indices_in_traversal_order() {
        let structure = structure_from(&[vec![("C1", "C", 10), ("O1", "O", 11), ("H1", "H", 12)]]);
        let table = AtomTable::from_structure(&structure).unwrap();

        assert_eq!(table.len(), 3);
        for (i, atom) in table.iter().enumerate() {
            assert_eq!(atom.index, i);
        }
        assert_eq!(table.elements(), vec!["C", "O", "H"]);
        assert_eq!(table.coordinates()[1], [1.0, 0.0, 0.0]);
        assert!(table.get(2).unwrap().is_hydrogen());
    }

    #[test]
    fn from_structure_maps_serials_to_indices() {
        let structure = structure_from(&[vec![("C1", "C", 100), ("C2", "C", 7)]]);
        let table = AtomTable::from_structure(&structure).unwrap();

        assert_eq!(table.index_of_serial(100), Some(0));
        assert_eq!(table.index_of_serial(7), Some(1));
        assert_eq!(table.index_of_serial(8), None);
    }

    #[test]
    fn from_structure_keeps_first_occurrence_of_repeated_serials() {
        let structure = structure_from(&[
            vec![("C1", "C", 1), ("C2", "C", 2)],
            vec![("C1", "C", 1), ("C2", "C", 2)],
        ]);
        let table = AtomTable::from_structure(&structure).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.index_of_serial(1), Some(0));
        assert_eq!(table.index_of_serial(2), Some(1));
    }

    #[test]
    fn from_structure_fails_on_empty_structure() {
        let err = AtomTable::from_structure(&Structure::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyStructure));

        let mut structure = Structure::new();
        let mut model = Model::new(1);
        model.add_chain(Chain::new("A"));
        structure.add_model(model);
        assert!(matches!(
            AtomTable::from_structure(&structure),
            Err(Error::EmptyStructure)
        ));
    }

    #[test]
    fn from_structure_copies_connectivity_hints() {
        let mut structure = structure_from(&[vec![("C1", "C", 1), ("O1", "O", 2)]]);
        for model in structure.iter_models_mut() {
            for chain in model.iter_chains_mut() {
                for residue in chain.iter_residues_mut() {
                    for atom in residue.iter_atoms_mut().filter(|a| a.name == "C1") {
                        atom.connectivity = vec![2];
                    }
                }
            }
        }
        let table = AtomTable::from_structure(&structure).unwrap();

        assert_eq!(table.get(0).unwrap().connectivity, vec![2]);
        assert!(table.get(1).unwrap().connectivity.is_empty());
    }
}
