//! Distance-based bond detection over a uniform spatial grid.
//!
//! Two atoms are bonded when their separation is at most [`BondConfig::max_bond_length`].
//! With [`BondConfig::exclude_hydrogen_pairs`] set, hydrogens are not used as search
//! sources and hydrogen–hydrogen pairs are rejected, while bonds from heavy atoms to
//! hydrogens are still found from the heavy-atom side.

use crate::model::{
    graph::{Bond, canonicalize},
    grid::Grid,
    table::AtomTable,
};
use crate::ops::config::BondConfig;
use crate::utils::parallel::*;

/// Finds every atom pair within the configured cutoff.
///
/// # Arguments
///
/// * `table` - Flattened atoms to search.
/// * `config` - Cutoff and hydrogen handling; assumed to have passed
///   [`BondConfig::validate`].
///
/// # Returns
///
/// Canonical bonds sorted by `(a1_idx, a2_idx)` without duplicates.
pub fn detect_bonds(table: &AtomTable, config: &BondConfig) -> Vec<Bond> {
    if table.is_empty() {
        return Vec::new();
    }

    let cutoff = config.max_bond_length;
    let exclude_h = config.exclude_hydrogen_pairs;
    let atoms = table.atoms();

    let grid = Grid::new(atoms.iter().map(|a| (a.pos, a.index)), cutoff);

    let mut bonds: Vec<Bond> = atoms
        .par_iter()
        .filter(|source| !(exclude_h && source.is_hydrogen()))
        .flat_map_iter(|source| {
            grid.within(&source.pos, cutoff)
                .filter_map(move |&target| Bond::new(source.index, target))
        })
        .collect();

    canonicalize(&mut bonds);

    log::debug!(
        "Distance search (cutoff {:.3} Å, cell {:.3} Å) found {} bonds among {} atoms",
        cutoff,
        grid.cell_size(),
        bonds.len(),
        atoms.len()
    );

    bonds
}
