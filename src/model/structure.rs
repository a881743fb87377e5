//! Hierarchical container for parsed macromolecular data.
//!
//! A [`Structure`] owns one or more [`Model`]s (NMR ensembles carry several; crystal
//! structures carry one), each holding chains of residues of atoms. The tree is read-only
//! input for bond inference, which flattens it into an atom table in the traversal order
//! exposed by [`Structure::iter_atoms`].

use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use std::fmt;

/// One ensemble member, delimited by `MODEL`/`ENDMDL` records in PDB files.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Model serial number; files without `MODEL` records use `1`.
    pub id: i32,
    chains: Vec<Chain>,
}

impl Model {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            chains: Vec::new(),
        }
    }

    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}' to model {}",
            chain.id,
            self.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::residue_count).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(Chain::atom_count).sum()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    pub fn iter_chains_mut(&mut self) -> std::slice::IterMut<'_, Chain> {
        self.chains.iter_mut()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains.iter().flat_map(|c| c.iter_atoms())
    }
}

/// Parsed structure: an ordered list of models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    models: Vec<Model>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn chain_count(&self) -> usize {
        self.models.iter().map(Model::chain_count).sum()
    }

    pub fn residue_count(&self) -> usize {
        self.models.iter().map(Model::residue_count).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.models.iter().map(Model::atom_count).sum()
    }

    /// Returns `true` when the structure holds no atoms at all.
    pub fn is_empty(&self) -> bool {
        self.atom_count() == 0
    }

    pub fn iter_models(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    pub fn iter_models_mut(&mut self) -> std::slice::IterMut<'_, Model> {
        self.models.iter_mut()
    }

    /// Iterates atoms in flattening order: models, chains, residues, atoms.
    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.models.iter().flat_map(|m| m.iter_atoms())
    }

    /// Iterates every residue together with the flattened index of its first atom.
    ///
    /// Offsets follow the same traversal as [`Structure::iter_atoms`], so
    /// `offset + residue.atom_position(name)` is the atom's index in an atom table built
    /// from this structure.
    pub fn iter_residues_with_offsets(
        &self,
    ) -> impl Iterator<Item = (&Model, &Chain, &Residue, usize)> {
        let mut offset = 0;
        self.models.iter().flat_map(move |model| {
            model.iter_chains().flat_map(move |chain| {
                chain.iter_residues().map(move |residue| (model, chain, residue))
            })
        })
        .map(move |(model, chain, residue)| {
            let start = offset;
            offset += residue.atom_count();
            (model, chain, residue, start)
        })
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ models: {}, chains: {}, residues: {}, atoms: {} }}",
            self.model_count(),
            self.chain_count(),
            self.residue_count(),
            self.atom_count()
        )
    }
}
