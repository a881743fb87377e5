//! Backbone stitching between consecutive residues of a chain.
//!
//! Peptide bonds are added by name, `C` of one residue to `N` of the next, without any
//! distance check. This recovers the backbone when a chain break in coordinates or a long
//! C–N separation would defeat the distance search.

use std::ptr;

use crate::model::{chain::Chain, graph::Bond, residue::Residue, structure::Structure};

/// Collects `C(i)–N(i+1)` bonds for every pair of consecutive residues in each chain.
///
/// Indices are computed from the same traversal order as
/// [`AtomTable::from_structure`](crate::AtomTable::from_structure). Residues
/// missing either backbone atom are skipped. Chains are told apart by position in the
/// structure, so repeated model numbers or chain labels never join separate chains.
pub fn stitch_peptide_bonds(structure: &Structure) -> Vec<Bond> {
    let mut bonds = Vec::new();
    let mut previous: Option<(&Chain, &Residue, usize)> = None;

    for (_, chain, residue, offset) in structure.iter_residues_with_offsets() {
        if let Some((prev_chain, prev, prev_offset)) = previous {
            if ptr::eq(prev_chain, chain) {
                let c = prev.atom_position("C").map(|i| prev_offset + i);
                let n = residue.atom_position("N").map(|i| offset + i);
                if let Some(bond) = c.zip(n).and_then(|(c, n)| Bond::new(c, n)) {
                    bonds.push(bond);
                }
            }
        }
        previous = Some((chain, residue, offset));
    }

    log::debug!("Stitched {} peptide bonds", bonds.len());

    bonds
}
