//! Bond graph produced by a structure load.
//!
//! The graph pairs an [`AtomTable`] with canonicalized atom-to-atom bonds and records which
//! inference branch produced them. Accessors expose the index-aligned `coordinates`,
//! `elements`, and `bonds` arrays consumed by renderers, along with neighbor queries and a
//! small geometric summary.

use super::table::AtomTable;
use super::types::Point;
use crate::utils::parallel::ParallelSliceMut;
use std::fmt;

/// Undirected bond connecting two atoms of the same [`AtomTable`].
///
/// Bonds store canonical atom indices (ascending order) so equality, hashing, and sorting
/// remain stable regardless of the order in which the connection was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    /// Index of the first atom (always the lesser index).
    pub a1_idx: usize,
    /// Index of the second atom (strictly greater than `a1_idx`).
    pub a2_idx: usize,
}

impl Bond {
    /// Creates a bond with canonical endpoint ordering.
    ///
    /// # Arguments
    ///
    /// * `idx1` - Index of one bonded atom.
    /// * `idx2` - Index of the partner atom.
    ///
    /// # Returns
    ///
    /// `Some(Bond)` with `a1_idx < a2_idx`, or `None` for a self-pair.
    pub fn new(idx1: usize, idx2: usize) -> Option<Self> {
        match idx1.cmp(&idx2) {
            std::cmp::Ordering::Less => Some(Self {
                a1_idx: idx1,
                a2_idx: idx2,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                a1_idx: idx2,
                a2_idx: idx1,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns the endpoint opposite to `atom_idx`, if the bond touches it.
    pub fn partner(&self, atom_idx: usize) -> Option<usize> {
        if self.a1_idx == atom_idx {
            Some(self.a2_idx)
        } else if self.a2_idx == atom_idx {
            Some(self.a1_idx)
        } else {
            None
        }
    }

    pub fn as_pair(&self) -> (usize, usize) {
        (self.a1_idx, self.a2_idx)
    }
}

/// Sorts and deduplicates bonds in place so the list has set semantics.
pub(crate) fn canonicalize(bonds: &mut Vec<Bond>) {
    bonds.par_sort_unstable();
    bonds.dedup();
}

/// Inference branch that produced a graph's bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondSource {
    /// Declared connectivity (`CONECT` records) was present and used as-is.
    Connectivity,
    /// Distance search plus peptide-backbone stitching.
    Geometry,
}

impl fmt::Display for BondSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondSource::Connectivity => write!(f, "connectivity records"),
            BondSource::Geometry => write!(f, "geometry"),
        }
    }
}

/// Atom table plus the deduplicated bonds inferred for it.
#[derive(Debug, Clone, PartialEq)]
pub struct BondGraph {
    table: AtomTable,
    bonds: Vec<Bond>,
    source: BondSource,
}

impl BondGraph {
    /// Builds a graph, canonicalizing the bond list.
    ///
    /// Indices are assumed to reference atoms of `table`; a debug assert validates this in
    /// development builds.
    pub fn new(table: AtomTable, mut bonds: Vec<Bond>, source: BondSource) -> Self {
        debug_assert!(
            bonds.iter().all(|b| b.a2_idx < table.len()),
            "Bond index out of bounds"
        );
        canonicalize(&mut bonds);
        Self {
            table,
            bonds,
            source,
        }
    }

    pub fn table(&self) -> &AtomTable {
        &self.table
    }

    /// Bonds in ascending `(a1_idx, a2_idx)` order, each pair appearing once.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn source(&self) -> BondSource {
        self.source
    }

    pub fn atom_count(&self) -> usize {
        self.table.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.table.coordinates()
    }

    pub fn elements(&self) -> Vec<&str> {
        self.table.elements()
    }

    /// Bonds as plain index pairs into [`BondGraph::coordinates`] and [`BondGraph::elements`].
    pub fn bond_pairs(&self) -> Vec<(usize, usize)> {
        self.bonds.iter().map(Bond::as_pair).collect()
    }

    /// Iterates over all bonds incident to `atom_idx`.
    pub fn bonds_of(&self, atom_idx: usize) -> impl Iterator<Item = &Bond> {
        self.bonds
            .iter()
            .filter(move |b| b.a1_idx == atom_idx || b.a2_idx == atom_idx)
    }

    /// Indices of the atoms bonded to `atom_idx`.
    pub fn neighbors_of(&self, atom_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds_of(atom_idx)
            .filter_map(move |b| b.partner(atom_idx))
    }

    /// Axis-aligned bounding box `(min, max)` of all atom positions.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut atoms = self.table.iter();
        let first = atoms.next()?.pos;
        Some(atoms.fold((first, first), |(lo, hi), atom| {
            (lo.inf(&atom.pos), hi.sup(&atom.pos))
        }))
    }

    /// Mean atom position.
    pub fn geometric_center(&self) -> Point {
        if self.table.is_empty() {
            return Point::origin();
        }
        let sum = self
            .table
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, atom| acc + atom.pos.coords);
        Point::from(sum / self.table.len() as f64)
    }

    /// Decomposes the graph into `(coordinates, elements, bonds)` owned arrays.
    pub fn into_parts(self) -> (Vec<[f64; 3]>, Vec<String>, Vec<(usize, usize)>) {
        let coordinates = self.table.coordinates();
        let elements = self
            .table
            .iter()
            .map(|atom| atom.element.to_string())
            .collect();
        let bonds = self.bond_pairs();
        (coordinates, elements, bonds)
    }
}

impl fmt::Display for BondGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BondGraph {{ atoms: {}, bonds: {}, source: {} }}",
            self.atom_count(),
            self.bond_count(),
            self.source
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::chain::Chain;
    use crate::model::residue::Residue;
    use crate::model::structure::{Model, Structure};

    fn table_with(positions: &[(f64, f64, f64)]) -> AtomTable {
        let mut residue = Residue::new(1, None, "LIG", true);
        for (i, (x, y, z)) in positions.iter().enumerate() {
            residue.add_atom(Atom::new(
                &format!("C{i}"),
                "C",
                Point::new(*x, *y, *z),
                i as i32 + 1,
            ));
        }
        let mut chain = Chain::new("A");
        chain.add_residue(residue);
        let mut model = Model::new(1);
        model.add_chain(chain);
        let mut structure = Structure::new();
        structure.add_model(model);
        AtomTable::from_structure(&structure).unwrap()
    }

    fn bond(i: usize, j: usize) -> Bond {
        Bond::new(i, j).unwrap()
    }

    #[test]
    fn bond_new_canonicalizes_endpoint_order() {
        let b = bond(5, 2);

        assert_eq!(b.a1_idx, 2);
        assert_eq!(b.a2_idx, 5);
        assert_eq!(bond(2, 5), b);
    }

    #[test]
    fn bond_new_rejects_self_pairs() {
        assert!(Bond::new(3, 3).is_none());
    }

    #[test]
    fn bond_partner_returns_opposite_endpoint() {
        let b = bond(1, 4);

        assert_eq!(b.partner(1), Some(4));
        assert_eq!(b.partner(4), Some(1));
        assert_eq!(b.partner(2), None);
    }

    #[test]
    fn graph_new_sorts_and_deduplicates_bonds() {
        let table = table_with(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let graph = BondGraph::new(
            table,
            vec![bond(2, 1), bond(0, 1), bond(1, 2), bond(1, 0)],
            BondSource::Geometry,
        );

        assert_eq!(graph.bond_pairs(), vec![(0, 1), (1, 2)]);
        assert_eq!(graph.bond_count(), 2);
        assert_eq!(graph.source(), BondSource::Geometry);
    }

    #[test]
    fn graph_neighbors_of_lists_all_partners() {
        let table = table_with(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let graph = BondGraph::new(table, vec![bond(0, 1), bond(1, 2)], BondSource::Geometry);

        let mut neighbors: Vec<_> = graph.neighbors_of(1).collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 2]);
        assert_eq!(graph.bonds_of(0).count(), 1);
    }

    #[test]
    fn graph_bounds_and_center_cover_all_atoms() {
        let table = table_with(&[(-1.0, 2.0, 0.0), (3.0, -2.0, 4.0)]);
        let graph = BondGraph::new(table, Vec::new(), BondSource::Geometry);

        let (lo, hi) = graph.bounds().unwrap();
        assert_eq!(lo, Point::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Point::new(3.0, 2.0, 4.0));

        let center = graph.geometric_center();
        assert!((center.x - 1.0).abs() < 1e-10);
        assert!((center.y - 0.0).abs() < 1e-10);
        assert!((center.z - 2.0).abs() < 1e-10);
    }

    #[test]
    fn graph_into_parts_is_index_aligned() {
        let table = table_with(&[(0.0, 0.0, 0.0), (1.5, 0.0, 0.0)]);
        let graph = BondGraph::new(table, vec![bond(1, 0)], BondSource::Connectivity);

        let (coords, elements, bonds) = graph.into_parts();
        assert_eq!(coords, vec![[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]]);
        assert_eq!(elements, vec!["C".to_string(), "C".to_string()]);
        assert_eq!(bonds, vec![(0, 1)]);
    }

    #[test]
    fn graph_display_reports_counts_and_source() {
        let table = table_with(&[(0.0, 0.0, 0.0), (1.5, 0.0, 0.0)]);
        let graph = BondGraph::new(table, vec![bond(0, 1)], BondSource::Connectivity);

        assert_eq!(
            format!("{}", graph),
            "BondGraph { atoms: 2, bonds: 1, source: connectivity records }"
        );
    }
}
