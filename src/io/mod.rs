//! Reading and writing PDB files.
//!
//! The reader produces the [`Structure`](crate::Structure) hierarchy consumed by bond
//! inference; the writer serializes a structure together with its inferred bonds as
//! `CONECT` records.

mod error;
mod pdb;

pub use pdb::reader::{read as read_pdb_structure, read_file as read_pdb_file};
pub use pdb::writer::write_bonds as write_pdb_bonds;

pub use error::Error;
