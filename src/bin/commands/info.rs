use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use bond_forge::{BondGraph, Structure, StructureLoader};

use crate::commands::{loaded, run_with_spinner};

/// Report-only command that inspects a structure and mirrors the input stream.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

/// Computes and prints structure and bond statistics.
pub fn run(loader: &StructureLoader, _args: &InfoArgs) -> Result<()> {
    let (structure, graph) = loaded(loader)?;

    let (chain_reports, composition) = run_with_spinner("Analyzing structure", || {
        Ok((collect_chain_reports(structure, graph), element_composition(graph)))
    })?;

    print_tables(structure, graph, &chain_reports, &composition)?;
    Ok(())
}

fn collect_chain_reports(structure: &Structure, graph: &BondGraph) -> Vec<ChainReport> {
    let mut reports = Vec::new();
    let mut offset = 0;

    for model in structure.iter_models() {
        for chain in model.iter_chains() {
            let atoms = chain.atom_count();
            let range = offset..offset + atoms;
            let bonds = graph
                .bonds()
                .iter()
                .filter(|b| range.contains(&b.a1_idx) || range.contains(&b.a2_idx))
                .count();

            reports.push(ChainReport {
                model: model.id,
                id: chain.id.trim().to_string(),
                residues: chain.residue_count(),
                atoms,
                bonds,
            });
            offset += atoms;
        }
    }

    reports
}

fn element_composition(graph: &BondGraph) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for element in graph.elements() {
        *counts.entry(element.to_string()).or_insert(0) += 1;
    }
    counts
}

fn print_tables(
    structure: &Structure,
    graph: &BondGraph,
    reports: &[ChainReport],
    composition: &BTreeMap<String, usize>,
) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "BondForge Structure Report")?;
    writeln!(&mut stderr)?;

    let mut chain_table = Table::new();
    print_boxed_label(&mut stderr, "Chain Breakdown")?;
    chain_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    chain_table.set_titles(row!["Model", "Chain", "Residues", "Atoms", "Bonds"]);
    for report in reports {
        chain_table.add_row(row![
            report.model,
            report.id,
            report.residues,
            report.atoms,
            report.bonds
        ]);
    }
    chain_table
        .print(&mut stderr)
        .context("Failed to render chain summary")?;
    writeln!(&mut stderr)?;

    let mut element_table = Table::new();
    print_boxed_label(&mut stderr, "Element Composition")?;
    element_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    element_table.set_titles(row!["Element", "Atoms"]);
    for (element, count) in composition {
        element_table.add_row(row![element, count]);
    }
    element_table
        .print(&mut stderr)
        .context("Failed to render element composition")?;
    writeln!(&mut stderr)?;

    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Structure Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Models", structure.model_count()]);
    summary_table.add_row(row!["Chains", structure.chain_count()]);
    summary_table.add_row(row!["Residues", structure.residue_count()]);
    summary_table.add_row(row!["Atoms", graph.atom_count()]);
    summary_table.add_row(row!["Bonds", graph.bond_count()]);
    summary_table.add_row(row!["Bond Source", graph.source()]);

    if let Some((lo, hi)) = graph.bounds() {
        summary_table.add_row(row![
            "Bounding Box (Å)",
            format!(
                "({:.2}, {:.2}, {:.2}) – ({:.2}, {:.2}, {:.2})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )
        ]);
        let extent = hi - lo;
        summary_table.add_row(row![
            "Extent (Å)",
            format!("{:.2} × {:.2} × {:.2}", extent.x, extent.y, extent.z)
        ]);
    }
    let center = graph.geometric_center();
    summary_table.add_row(row![
        "Geometric Center (Å)",
        format!("({:.2}, {:.2}, {:.2})", center.x, center.y, center.z)
    ]);

    summary_table
        .print(&mut stderr)
        .context("Failed to render structure summary")?;

    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

#[derive(Debug)]
struct ChainReport {
    model: i32,
    id: String,
    residues: usize,
    atoms: usize,
    bonds: usize,
}
