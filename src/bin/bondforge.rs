use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;

use commands::{BondParameters, IoParameters};
use commands::{connect, info};

#[derive(Parser, Debug)]
#[command(
    name = "bondforge",
    about = "A command-line tool that loads PDB structures and infers their covalent bond graph.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input PDB file path. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    /// TOML file with bond inference settings.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Maximum bond length (Å) for distance-based inference.
    #[arg(long, value_name = "ANGSTROM", global = true)]
    cutoff: Option<f64>,
    /// Allow hydrogen–hydrogen bonds during distance-based inference.
    #[arg(long = "allow-hh", global = true)]
    allow_hh: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the structure and its bonds without modifying the data stream.
    Info(info::InfoArgs),
    /// Write the structure with CONECT records for every inferred bond.
    Connect(connect::ConnectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };
    let bond_params = BondParameters {
        config: cli.config.clone(),
        cutoff: cli.cutoff,
        allow_hh: cli.allow_hh,
    };

    match cli.command {
        Command::Connect(args) => {
            commands::ensure_noninteractive_stdout("connect", &io_params)?;
            let loader = commands::load_input(&io_params, &bond_params)?;
            connect::run(&loader, &args, &io_params)?;
        }
        Command::Info(args) => {
            let loader = commands::load_input(&io_params, &bond_params)?;
            info::run(&loader, &args)?;
            if !commands::interactive_stdout_requested(&io_params) {
                commands::save_output(&loader, &io_params)?;
            }
        }
    }

    Ok(())
}
