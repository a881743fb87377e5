use anyhow::Result;
use clap::Args;

use bond_forge::{BondSource, StructureLoader};

use crate::commands::{IoParameters, loaded, run_with_spinner, save_output};

/// Writes the structure back out with explicit CONECT records.
#[derive(Debug, Default, Args)]
pub struct ConnectArgs {
    /// Fail instead of writing when no bonds were found.
    #[arg(long = "require-bonds")]
    pub require_bonds: bool,
}

/// Serializes the current graph so downstream tools can reuse the inferred bonds.
pub fn run(loader: &StructureLoader, args: &ConnectArgs, params: &IoParameters) -> Result<()> {
    let (_, graph) = loaded(loader)?;

    if args.require_bonds && graph.bond_count() == 0 {
        anyhow::bail!("No bonds were found among {} atoms", graph.atom_count());
    }
    if graph.source() == BondSource::Connectivity {
        log::info!("Input already declared its bonds; writing them unchanged");
    }

    run_with_spinner("Writing CONECT records", || save_output(loader, params))
}
