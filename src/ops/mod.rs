//! Bond inference over parsed structures.
//!
//! [`BondGraphBuilder`] turns a [`Structure`](crate::Structure) into a
//! [`BondGraph`](crate::BondGraph), preferring declared connectivity and otherwise combining a
//! grid-accelerated distance search with peptide backbone stitching. [`StructureLoader`]
//! wraps parsing and building into a per-session load with a retained last good result.

mod builder;
mod config;
mod connectivity;
mod error;
mod loader;
mod peptide;
mod spatial;

pub use builder::BondGraphBuilder;

pub use config::{BondConfig, DEFAULT_MAX_BOND_LENGTH};

pub use connectivity::extract_connectivity;

pub use spatial::detect_bonds;

pub use peptide::stitch_peptide_bonds;

pub use loader::StructureLoader;

pub use error::Error;
