//! Bonds declared by the source file through `CONECT` records.

use crate::model::{
    graph::{Bond, canonicalize},
    table::AtomTable,
};

/// Resolves every atom's declared partner serials into canonical index bonds.
///
/// Serials that match no atom in `table` are dropped, as are references that resolve to the
/// declaring atom itself. The result is sorted and free of duplicates; it is empty when the
/// structure declares no resolvable connectivity.
pub fn extract_connectivity(table: &AtomTable) -> Vec<Bond> {
    let mut bonds: Vec<Bond> = table
        .iter()
        .flat_map(|atom| {
            atom.connectivity
                .iter()
                .filter_map(|&serial| table.index_of_serial(serial))
                .filter_map(move |partner| Bond::new(atom.index, partner))
        })
        .collect();

    canonicalize(&mut bonds);

    let dangling: usize = table
        .iter()
        .flat_map(|atom| atom.connectivity.iter())
        .filter(|&&serial| table.index_of_serial(serial).is_none())
        .count();
    if dangling > 0 {
        log::debug!("Ignored {} connectivity references to unknown serials", dangling);
    }

    bonds
}
