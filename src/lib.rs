//! # BondForge
//!
//! **BondForge** loads macromolecular structures from PDB files and infers the covalent bond
//! graph a molecular viewer needs to draw sticks between atoms. Results come back as
//! index-aligned `coordinates`, `elements`, and `bonds` arrays that renderers can consume
//! without knowing anything about the file format.
//!
//! ## Features
//!
//! - **Ensemble-aware PDB reader** – Fixed-column `ATOM`/`HETATM` parsing with `MODEL` splitting, alternate-location filtering, element inference, hybrid-36 serials, and `CONECT` connectivity hints.
//! - **Connectivity first** – When the file declares bonds, those are used verbatim and no geometry is consulted.
//! - **Grid-accelerated distance search** – Otherwise every atom pair within a configurable cutoff (1.8 Å by default) is bonded, hydrogen pairs excluded, using a uniform spatial grid instead of an all-pairs scan.
//! - **Backbone stitching** – Consecutive residues are joined `C(i)–N(i+1)` by atom name so chains stay connected across stretched or broken geometry.
//! - **Session loaders** – `StructureLoader` keeps the last good graph per instance and never shares state between views.
//!
//! ## Example
//!
//! ```
//! use bond_forge::{BondGraphBuilder, io::read_pdb_structure};
//! use std::io::Cursor;
//!
//! let pdb = "\
//! HETATM    1  O   HOH W   1       0.000   0.000   0.000  1.00 10.00           O
//! HETATM    2  H1  HOH W   1       0.960   0.000   0.000  1.00 10.00           H
//! HETATM    3  H2  HOH W   1      -0.240   0.930   0.000  1.00 10.00           H
//! ";
//! let structure = read_pdb_structure(Cursor::new(pdb.as_bytes())).unwrap();
//! let graph = BondGraphBuilder::new().build(&structure).unwrap();
//!
//! assert_eq!(graph.bond_pairs(), vec![(0, 1), (0, 2)]);
//! ```

mod model;
mod utils;

pub mod io;
pub mod ops;

pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::graph::{Bond, BondGraph, BondSource};
pub use model::residue::Residue;
pub use model::structure::{Model, Structure};
pub use model::table::{AtomTable, IndexedAtom};
pub use model::types::Point;

pub use ops::{BondConfig, BondGraphBuilder, StructureLoader};
