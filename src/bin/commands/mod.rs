use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use bond_forge::io::write_pdb_bonds;
use bond_forge::{BondConfig, BondGraph, Structure, StructureLoader};

pub mod connect;
pub mod info;

/// Aggregated IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Bond inference overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct BondParameters {
    pub config: Option<PathBuf>,
    pub cutoff: Option<f64>,
    pub allow_hh: bool,
}

/// Initializes `env_logger`; `RUST_LOG` still takes precedence over `-v`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Merges the optional TOML file with command-line overrides.
pub fn resolve_config(params: &BondParameters) -> Result<BondConfig> {
    let mut config = match &params.config {
        Some(path) => BondConfig::from_path(path)
            .with_context(|| format!("Failed to load bond settings from {}", path.display()))?,
        None => BondConfig::default(),
    };

    if let Some(cutoff) = params.cutoff {
        config.max_bond_length = cutoff;
    }
    if params.allow_hh {
        config.exclude_hydrogen_pairs = false;
    }

    config.validate().context("Invalid bond settings")?;
    Ok(config)
}

/// Loads the configured input and builds its bond graph.
pub fn load_input(io: &IoParameters, bonds: &BondParameters) -> Result<StructureLoader> {
    let config = resolve_config(bonds)?;
    let mut loader = StructureLoader::with_config(config);

    if let Some(path) = &io.input {
        run_with_spinner("Inferring bonds", || {
            loader
                .load_path(path)
                .map(|_| ())
                .with_context(|| format!("Failed to load structure from {}", path.display()))
        })?;
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe a PDB file into bondforge."
            );
        }
        run_with_spinner("Inferring bonds", || {
            loader
                .load_reader(BufReader::new(stdin.lock()))
                .map(|_| ())
                .context("Failed to load structure from stdin")
        })?;
    }

    Ok(loader)
}

/// Returns the structure and graph of a successful load.
pub fn loaded(loader: &StructureLoader) -> Result<(&Structure, &BondGraph)> {
    let structure = loader
        .structure()
        .ok_or_else(|| anyhow!("No structure has been loaded"))?;
    let graph = loader
        .current()
        .ok_or_else(|| anyhow!("No bond graph has been built"))?;
    Ok((structure, graph))
}

/// Writes the loaded structure and its bonds to the configured destination.
pub fn save_output(loader: &StructureLoader, params: &IoParameters) -> Result<()> {
    let (structure, graph) = loaded(loader)?;
    write_bonds(structure, graph, params.output.as_deref())
}

fn write_bonds(structure: &Structure, graph: &BondGraph, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_pdb_bonds(&mut writer, structure, graph)
                .with_context(|| format!("Failed to write PDB output to {}", path.display()))?;
            writer.flush().context("Failed to flush output writer")?
        }
        None => {
            let stdout = stdio::stdout();
            let handle = stdout.lock();
            let mut writer = BufWriter::new(handle);
            write_pdb_bonds(&mut writer, structure, graph)
                .context("Failed to write PDB output to stdout")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &IoParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}

/// Ensures commands do not dump structured output directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if interactive_stdout_requested(params) {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}
