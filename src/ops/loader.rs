//! Per-session structure loading.
//!
//! A [`StructureLoader`] owns the parsed structure of its most recent load attempt and the
//! bond graph of its most recent successful load. Loaders share no state with each other, so
//! several views can load different files side by side.

use crate::io;
use crate::model::{graph::BondGraph, structure::Structure};
use crate::ops::{builder::BondGraphBuilder, config::BondConfig, error::Error};
use std::io::BufRead;
use std::path::Path;

/// Loads PDB sources and keeps the latest successfully built [`BondGraph`].
#[derive(Debug, Default)]
pub struct StructureLoader {
    builder: BondGraphBuilder,
    structure: Option<Structure>,
    current: Option<BondGraph>,
}

impl StructureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BondConfig) -> Self {
        Self {
            builder: BondGraphBuilder::with_config(config),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BondConfig {
        self.builder.config()
    }

    /// Reads and processes the PDB file at `path`.
    ///
    /// The structure cache is dropped before reading. The current graph is replaced only
    /// when the whole load succeeds; after a failure [`StructureLoader::current`] still
    /// returns the previous result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] when the file is missing or malformed,
    /// [`Error::EmptyStructure`] when it holds no atoms, and [`Error::InvalidConfig`] for an
    /// unusable configuration.
    pub fn load_path(&mut self, path: &Path) -> Result<&BondGraph, Error> {
        log::info!("Loading structure from {}", path.display());
        self.structure = None;
        let structure = io::read_pdb_file(path)?;
        self.finish_load(structure)
    }

    /// Same as [`StructureLoader::load_path`] for an in-memory or streamed source.
    ///
    /// # Errors
    ///
    /// See [`StructureLoader::load_path`].
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<&BondGraph, Error> {
        self.structure = None;
        let structure = io::read_pdb_structure(reader)?;
        self.finish_load(structure)
    }

    fn finish_load(&mut self, structure: Structure) -> Result<&BondGraph, Error> {
        let graph = self.builder.build(&structure);
        self.structure = Some(structure);
        Ok(self.current.insert(graph?))
    }

    /// Graph of the most recent successful load.
    pub fn current(&self) -> Option<&BondGraph> {
        self.current.as_ref()
    }

    /// Structure parsed by the most recent load attempt, if parsing succeeded.
    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    /// Forgets both the cached structure and the current graph.
    pub fn clear(&mut self) {
        self.structure = None;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::BondSource;
    use std::io::Cursor;

    const WATER: &str = "\
        HETATM    1  O   HOH W   1       0.000   0.000   0.000  1.00 10.00           O\n\
        HETATM    2  H1  HOH W   1       0.960   0.000   0.000  1.00 10.00           H\n\
        HETATM    3  H2  HOH W   1      -0.240   0.930   0.000  1.00 10.00           H\n";

    const LIGAND: &str = "\
        HETATM   10  C1  LIG A   1       0.000   0.000   0.000  1.00 10.00           C\n\
        HETATM   11  O1  LIG A   1       9.000   0.000   0.000  1.00 10.00           O\n\
        CONECT   10   11\n";

    fn load(loader: &mut StructureLoader, pdb: &str) -> Result<BondGraph, Error> {
        loader
            .load_reader(Cursor::new(pdb.as_bytes()))
            .map(|graph| graph.clone())
    }

    #[test]
    fn load_reader_sets_current_graph_and_structure() {
        let mut loader = StructureLoader::new();
        let graph = load(&mut loader, WATER).unwrap();

        assert_eq!(graph.bond_pairs(), vec![(0, 1), (0, 2)]);
        assert_eq!(loader.current(), Some(&graph));
        assert_eq!(loader.structure().unwrap().atom_count(), 3);
    }

    #[test]
    fn load_replaces_previous_result_entirely() {
        let mut loader = StructureLoader::new();
        load(&mut loader, WATER).unwrap();
        let second = load(&mut loader, LIGAND).unwrap();

        assert_eq!(second.source(), BondSource::Connectivity);
        assert_eq!(second.atom_count(), 2);
        assert_eq!(second.bond_pairs(), vec![(0, 1)]);
        assert_eq!(loader.current().unwrap().atom_count(), 2);
    }

    #[test]
    fn failed_parse_keeps_previous_graph_and_drops_structure() {
        let mut loader = StructureLoader::new();
        let first = load(&mut loader, WATER).unwrap();

        let err = load(&mut loader, "ATOM      1  N   GLY A   1       bad\n").unwrap_err();

        assert!(matches!(err, Error::SourceUnreadable(_)));
        assert_eq!(loader.current(), Some(&first));
        assert!(loader.structure().is_none());
    }

    #[test]
    fn empty_source_is_an_error_not_an_empty_graph() {
        let mut loader = StructureLoader::new();
        load(&mut loader, WATER).unwrap();

        let err = load(&mut loader, "HEADER    NOTHING HERE\nEND\n").unwrap_err();

        assert!(matches!(err, Error::EmptyStructure));
        assert_eq!(loader.current().unwrap().atom_count(), 3);
        assert!(loader.structure().unwrap().is_empty());
    }

    #[test]
    fn load_path_reports_missing_file() {
        let mut loader = StructureLoader::new();
        let err = loader
            .load_path(Path::new("/no/such/structure.pdb"))
            .unwrap_err();

        assert!(matches!(err, Error::SourceUnreadable(_)));
        assert!(loader.current().is_none());
    }

    #[test]
    fn loaders_are_independent() {
        let mut a = StructureLoader::new();
        let mut b = StructureLoader::with_config(BondConfig {
            exclude_hydrogen_pairs: false,
            ..BondConfig::default()
        });

        load(&mut a, WATER).unwrap();
        load(&mut b, LIGAND).unwrap();

        assert_eq!(a.current().unwrap().atom_count(), 3);
        assert_eq!(b.current().unwrap().atom_count(), 2);
        assert!(!b.config().exclude_hydrogen_pairs);

        a.clear();
        assert!(a.current().is_none());
        assert!(a.structure().is_none());
        assert!(b.current().is_some());
    }

    #[test]
    fn written_bonds_reload_through_connectivity_branch() {
        let mut loader = StructureLoader::new();
        let inferred = load(&mut loader, WATER).unwrap();
        assert_eq!(inferred.source(), BondSource::Geometry);

        let mut buffer = Vec::new();
        io::write_pdb_bonds(&mut buffer, loader.structure().unwrap(), &inferred).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let reloaded = load(&mut loader, &text).unwrap();
        assert_eq!(reloaded.source(), BondSource::Connectivity);
        assert_eq!(reloaded.bond_pairs(), inferred.bond_pairs());
        assert_eq!(reloaded.coordinates(), inferred.coordinates());
    }
}
