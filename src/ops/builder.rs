//! Bond graph construction for a parsed [`Structure`].
//!
//! The builder flattens the structure into an [`AtomTable`] and chooses one of two
//! branches. When the file declares connectivity that resolves to at least one bond, those
//! bonds are returned as the complete answer. Otherwise bonds are inferred from interatomic
//! distances and completed with name-based peptide backbone bonds.

use crate::model::{
    graph::{BondGraph, BondSource},
    structure::Structure,
    table::AtomTable,
};
use crate::ops::{
    config::BondConfig, connectivity::extract_connectivity, error::Error,
    peptide::stitch_peptide_bonds, spatial::detect_bonds,
};

/// Builder responsible for creating [`BondGraph`] objects from a [`Structure`].
///
/// Settings can be taken wholesale from a [`BondConfig`] or tweaked through the
/// builder-style setters before running [`BondGraphBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct BondGraphBuilder {
    config: BondConfig,
}

impl BondGraphBuilder {
    /// Creates a builder using the default 1.8 Å cutoff with hydrogen pairs excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn with_config(config: BondConfig) -> Self {
        Self { config }
    }

    /// Configures the inclusive distance cutoff for geometric bonds.
    ///
    /// # Arguments
    ///
    /// * `cutoff` - Maximum distance in Ångström between two bonded atoms.
    pub fn max_bond_length(mut self, cutoff: f64) -> Self {
        self.config.max_bond_length = cutoff;
        self
    }

    /// Controls whether two hydrogens may ever be bonded geometrically.
    pub fn exclude_hydrogen_pairs(mut self, exclude: bool) -> Self {
        self.config.exclude_hydrogen_pairs = exclude;
        self
    }

    pub fn config(&self) -> &BondConfig {
        &self.config
    }

    /// Builds the bond graph for `structure`.
    ///
    /// # Arguments
    ///
    /// * `structure` - Parsed structure; it is only read.
    ///
    /// # Returns
    ///
    /// A [`BondGraph`] whose [`BondSource`] records which branch produced the bonds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unusable cutoff and
    /// [`Error::EmptyStructure`] when the structure holds no atoms.
    pub fn build(&self, structure: &Structure) -> Result<BondGraph, Error> {
        self.config.validate()?;

        let table = AtomTable::from_structure(structure)?;

        let declared = extract_connectivity(&table);
        if !declared.is_empty() {
            log::info!(
                "Using {} declared bonds from connectivity records for {} atoms",
                declared.len(),
                table.len()
            );
            return Ok(BondGraph::new(table, declared, BondSource::Connectivity));
        }

        let mut bonds = detect_bonds(&table, &self.config);
        let geometric = bonds.len();
        bonds.extend(stitch_peptide_bonds(structure));

        let graph = BondGraph::new(table, bonds, BondSource::Geometry);

        log::info!(
            "Inferred {} bonds from geometry for {} atoms ({} added by backbone stitching)",
            graph.bond_count(),
            graph.atom_count(),
            graph.bond_count() - geometric
        );

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_pdb_structure;
    use std::io::Cursor;

    fn parse(pdb: &str) -> Structure {
        read_pdb_structure(Cursor::new(pdb.as_bytes())).expect("PDB should parse")
    }

    fn build(pdb: &str) -> BondGraph {
        BondGraphBuilder::new()
            .build(&parse(pdb))
            .expect("graph should build")
    }

    const DIPEPTIDE: &str = "\
        ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 10.00           N\n\
        ATOM      2  CA  GLY A   1       1.458   0.000   0.000  1.00 10.00           C\n\
        ATOM      3  C   GLY A   1       2.009   1.420   0.000  1.00 10.00           C\n\
        ATOM      4  O   GLY A   1       1.251   2.390   0.000  1.00 10.00           O\n\
        ATOM      5  N   GLY A   2       3.332   1.536   0.000  1.00 10.00           N\n\
        ATOM      6  CA  GLY A   2       3.988   2.839   0.000  1.00 10.00           C\n\
        ATOM      7  C   GLY A   2       5.504   2.693   0.000  1.00 10.00           C\n\
        ATOM      8  O   GLY A   2       6.030   1.580   0.000  1.00 10.00           O\n";

    #[test]
    fn build_uses_declared_connectivity_exclusively() {
        const PDB_DATA: &str = "\
            HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    2  C2  LIG A   1       1.500   0.000   0.000  1.00 10.00           C\n\
            HETATM    3  C3  LIG A   1       3.000   0.000   0.000  1.00 10.00           C\n\
            CONECT    1    2\n\
            CONECT    2    1\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Connectivity);
        assert_eq!(graph.bond_pairs(), vec![(0, 1)]);
        assert_eq!(graph.atom_count(), 3);
    }

    #[test]
    fn build_ignores_distance_for_declared_bonds() {
        const PDB_DATA: &str = "\
            HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    2  C2  LIG A   1      25.000   0.000   0.000  1.00 10.00           C\n\
            CONECT    1    2\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Connectivity);
        assert_eq!(graph.bond_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn build_infers_water_geometry_without_hydrogen_pair() {
        const PDB_DATA: &str = "\
            HETATM    1  O   HOH W   1       0.000   0.000   0.000  1.00 10.00           O\n\
            HETATM    2  H1  HOH W   1       0.960   0.000   0.000  1.00 10.00           H\n\
            HETATM    3  H2  HOH W   1      -0.240   0.930   0.000  1.00 10.00           H\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Geometry);
        assert_eq!(graph.bond_pairs(), vec![(0, 1), (0, 2)]);
        assert_eq!(graph.elements(), vec!["O", "H", "H"]);
    }

    #[test]
    fn build_bonds_methyl_hydrogens_with_default_settings() {
        const PDB_DATA: &str = "\
            HETATM    1  H1  MET A   1      -1.090   0.000   0.000  1.00 10.00           H\n\
            HETATM    2  C1  MET A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    3  H2  MET A   1       0.360   1.030   0.000  1.00 10.00           H\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Geometry);
        assert_eq!(graph.bond_pairs(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn build_adds_peptide_bond_even_when_far_apart() {
        const PDB_DATA: &str = "\
            ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 10.00           N\n\
            ATOM      2  CA  GLY A   1       1.458   0.000   0.000  1.00 10.00           C\n\
            ATOM      3  C   GLY A   1       2.009   1.420   0.000  1.00 10.00           C\n\
            ATOM      4  N   GLY A   2      22.000   1.500   0.000  1.00 10.00           N\n\
            ATOM      5  CA  GLY A   2      23.450   1.500   0.000  1.00 10.00           C\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Geometry);
        assert_eq!(graph.bond_pairs(), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn build_does_not_duplicate_peptide_bond_found_by_distance() {
        let graph = build(DIPEPTIDE);

        let pairs = graph.bond_pairs();
        assert_eq!(pairs.iter().filter(|&&p| p == (2, 4)).count(), 1);
        assert_eq!(
            pairs,
            vec![(0, 1), (1, 2), (2, 3), (2, 4), (4, 5), (5, 6), (6, 7)]
        );
    }

    #[test]
    fn build_falls_back_to_geometry_when_conect_serials_dangle() {
        const PDB_DATA: &str = "\
            HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    2  C2  LIG A   1       1.500   0.000   0.000  1.00 10.00           C\n\
            CONECT    1   99\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.source(), BondSource::Geometry);
        assert_eq!(graph.bond_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn build_fails_on_structure_without_atoms() {
        let err = BondGraphBuilder::new().build(&Structure::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyStructure));
    }

    #[test]
    fn build_rejects_invalid_cutoff() {
        let structure = parse(DIPEPTIDE);

        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = BondGraphBuilder::new()
                .max_bond_length(cutoff)
                .build(&structure)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }));
        }
    }

    #[test]
    fn build_respects_custom_cutoff_and_hydrogen_switch() {
        const PDB_DATA: &str = "\
            HETATM    1  H1  H2  A   1       0.000   0.000   0.000  1.00 10.00           H\n\
            HETATM    2  H2  H2  A   1       0.740   0.000   0.000  1.00 10.00           H\n\
            HETATM    3  C1  LIG A   2       5.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    4  C2  LIG A   2       7.100   0.000   0.000  1.00 10.00           C\n";
        let structure = parse(PDB_DATA);

        let default = BondGraphBuilder::new().build(&structure).unwrap();
        assert!(default.bond_pairs().is_empty());

        let relaxed = BondGraphBuilder::new()
            .max_bond_length(2.2)
            .exclude_hydrogen_pairs(false)
            .build(&structure)
            .unwrap();
        assert_eq!(relaxed.bond_pairs(), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn build_outputs_are_index_aligned_and_deterministic() {
        let structure = parse(DIPEPTIDE);
        let builder = BondGraphBuilder::with_config(BondConfig::default());

        let first = builder.build(&structure).unwrap();
        let second = builder.build(&structure).unwrap();
        assert_eq!(first, second);

        let (coords, elements, bonds) = first.into_parts();
        assert_eq!(coords.len(), 8);
        assert_eq!(elements.len(), 8);
        assert!((coords[4][0] - 3.332).abs() < 1e-6);
        assert_eq!(elements[4], "N");
        assert!(bonds.iter().all(|&(i, j)| i < j && j < coords.len()));
    }

    #[test]
    fn build_on_multi_model_file_searches_all_models_together() {
        const PDB_DATA: &str = "\
            MODEL        1\n\
            HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    2  O1  LIG A   1       1.200   0.000   0.000  1.00 10.00           O\n\
            ENDMDL\n\
            MODEL        2\n\
            HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
            HETATM    2  O1  LIG A   1       1.250   0.000   0.000  1.00 10.00           O\n\
            ENDMDL\n";

        let graph = build(PDB_DATA);

        assert_eq!(graph.atom_count(), 4);
        assert_eq!(graph.table().index_of_serial(1), Some(0));
        assert_eq!(
            graph.bond_pairs(),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn build_never_stitches_across_models_sharing_a_number() {
        const PDB_DATA: &str = "\
            MODEL        1\n\
            ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 10.00           N\n\
            ATOM      2  C   GLY A   1       1.330   0.000   0.000  1.00 10.00           C\n\
            ENDMDL\n\
            MODEL        1\n\
            ATOM      1  N   GLY A   1      40.000   0.000   0.000  1.00 10.00           N\n\
            ATOM      2  C   GLY A   1      41.330   0.000   0.000  1.00 10.00           C\n\
            ENDMDL\n";

        let structure = parse(PDB_DATA);
        assert_eq!(structure.model_count(), 2);

        let graph = BondGraphBuilder::new()
            .build(&structure)
            .expect("graph should build");
        assert_eq!(graph.bond_pairs(), vec![(0, 1), (2, 3)]);
    }
}
