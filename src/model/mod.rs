//! Core data structures for parsed structures and the bond graphs inferred from them.
//!
//! The hierarchical types (`Structure`, `Model`, `Chain`, `Residue`, `Atom`) are produced by
//! readers and consumed read-only by bond inference. The flat types (`AtomTable`, `Bond`,
//! `BondGraph`) are what a load hands back to callers. `grid` provides the spatial index
//! used by the distance search.

pub mod atom;
pub mod chain;
pub mod graph;
pub mod grid;
pub mod residue;
pub mod structure;
pub mod table;
pub mod types;
