use crate::io::error::Error;
use crate::model::{
    atom::Atom, graph::BondGraph, residue::Residue, structure::Structure,
};
use std::collections::BTreeMap;
use std::io::Write;

/// Writes `structure` as PDB text followed by `CONECT` records for every bond of `graph`.
///
/// Atom records keep the serial numbers read from the source file. `MODEL`/`ENDMDL` blocks
/// are only emitted for ensembles with more than one model.
///
/// # Errors
///
/// Returns [`Error::InconsistentData`] when `graph` was not built from `structure`, or
/// [`Error::Io`] when the writer fails.
pub fn write_bonds<W: Write>(writer: W, structure: &Structure, graph: &BondGraph) -> Result<(), Error> {
    check_alignment(structure, graph)?;

    let mut ctx = WriterContext::new(writer);

    ctx.write_models(structure)?;

    ctx.write_connects(graph)?;

    ctx.write_end()?;

    Ok(())
}

fn check_alignment(structure: &Structure, graph: &BondGraph) -> Result<(), Error> {
    let table = graph.table();
    if table.len() != structure.atom_count() {
        return Err(Error::inconsistent_data(
            "PDB",
            None,
            format!(
                "graph holds {} atoms but the structure has {}",
                table.len(),
                structure.atom_count()
            ),
        ));
    }

    for (idx, (atom, indexed)) in structure.iter_atoms().zip(table.iter()).enumerate() {
        if atom.serial != indexed.serial {
            return Err(Error::inconsistent_data(
                "PDB",
                None,
                format!(
                    "atom index {} has serial {} in the structure but {} in the graph",
                    idx, atom.serial, indexed.serial
                ),
            ));
        }
    }

    Ok(())
}

struct WriterContext<W> {
    writer: W,
}

impl<W: Write> WriterContext<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) -> Result<(), Error> {
        self.writer
            .write_fmt(line)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| Error::from_io(e, None))
    }

    fn write_models(&mut self, structure: &Structure) -> Result<(), Error> {
        let ensemble = structure.model_count() > 1;

        for model in structure.iter_models() {
            if ensemble {
                self.emit(format_args!("MODEL     {:>4}", model.id))?;
            }

            for chain in model.iter_chains() {
                let mut last: Option<(&Residue, i32)> = None;
                for residue in chain.iter_residues() {
                    for atom in residue.iter_atoms() {
                        self.write_atom_record(atom, residue, &chain.id)?;
                        last = Some((residue, atom.serial));
                    }
                }

                if let Some((residue, serial)) = last {
                    self.write_ter_record(serial.saturating_add(1), residue, &chain.id)?;
                }
            }

            if ensemble {
                self.emit(format_args!("ENDMDL"))?;
            }
        }
        Ok(())
    }

    fn write_atom_record(&mut self, atom: &Atom, residue: &Residue, chain_id: &str) -> Result<(), Error> {
        let record_type = if residue.is_hetero { "HETATM" } else { "ATOM  " };
        let serial = encode_field(atom.serial, 5)?;
        let res_seq = encode_field(residue.id, 4)?;

        self.emit(format_args!(
            "{:6}{:>5} {:4}{:1}{:3} {:1}{:>4}{:1}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}",
            record_type,
            serial,
            format_atom_name(atom),
            ' ',
            truncate(&residue.name, 3),
            chain_id.chars().next().unwrap_or(' '),
            res_seq,
            residue.insertion_code.unwrap_or(' '),
            atom.pos.x,
            atom.pos.y,
            atom.pos.z,
            1.00,
            0.00,
            truncate(&atom.element, 2)
        ))
    }

    fn write_ter_record(&mut self, serial: i32, residue: &Residue, chain_id: &str) -> Result<(), Error> {
        let serial = encode_field(serial, 5)?;
        let res_seq = encode_field(residue.id, 4)?;

        self.emit(format_args!(
            "TER   {:>5}      {:3} {:1}{:>4}{:1}",
            serial,
            truncate(&residue.name, 3),
            chain_id.chars().next().unwrap_or(' '),
            res_seq,
            residue.insertion_code.unwrap_or(' ')
        ))
    }

    fn write_connects(&mut self, graph: &BondGraph) -> Result<(), Error> {
        let table = graph.table();
        let serial_of = |idx: usize| {
            table.get(idx).map(|a| a.serial).ok_or_else(|| {
                Error::inconsistent_data(
                    "PDB",
                    None,
                    format!("bond references atom index {} that was not written", idx),
                )
            })
        };

        let mut adjacency: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
        for bond in graph.bonds() {
            let s1 = serial_of(bond.a1_idx)?;
            let s2 = serial_of(bond.a2_idx)?;

            adjacency.entry(s1).or_default().push(s2);
            adjacency.entry(s2).or_default().push(s1);
        }

        for (source, mut targets) in adjacency {
            targets.sort_unstable();
            targets.dedup();

            let source = encode_field(source, 5)?;
            for chunk in targets.chunks(4) {
                let mut line = format!("CONECT{:>5}", source);
                for &target in chunk {
                    line.push_str(&format!("{:>5}", encode_field(target, 5)?));
                }
                self.emit(format_args!("{line}"))?;
            }
        }

        Ok(())
    }

    fn write_end(&mut self) -> Result<(), Error> {
        self.emit(format_args!("END"))
    }
}

/// Places one- to three-character names in columns 14‑16 and names that start with a
/// two-letter element symbol (or fill all four columns) from column 13.
fn format_atom_name(atom: &Atom) -> String {
    let name = atom.name.as_str();
    let starts_with_long_element = atom.element.len() == 2
        && name.len() >= 2
        && name[..2].eq_ignore_ascii_case(atom.element.as_str());

    if name.len() >= 4 {
        truncate(name, 4).to_string()
    } else if starts_with_long_element {
        format!("{:<4}", name)
    } else {
        format!(" {:<3}", name)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn encode_field(value: i32, width: u32) -> Result<String, Error> {
    encode_hybrid36(value, width).ok_or_else(|| {
        Error::inconsistent_data(
            "PDB",
            None,
            format!("value {} does not fit a {}-column field", value, width),
        )
    })
}

/// Encodes an integer for a fixed-width PDB field, switching to hybrid-36 once the decimal
/// range of the field is exhausted.
fn encode_hybrid36(value: i32, width: u32) -> Option<String> {
    let value = i64::from(value);
    let decimal_limit = 10i64.pow(width);
    let negative_limit = -(10i64.pow(width - 1));

    if value > negative_limit && value < decimal_limit {
        return Some(value.to_string());
    }
    if value < 0 {
        return None;
    }

    let block = 36i64.pow(width - 1);
    let mut rest = value - decimal_limit;
    if rest < 26 * block {
        return Some(to_base36(rest + 10 * block, true));
    }
    rest -= 26 * block;
    if rest < 26 * block {
        return Some(to_base36(rest + 10 * block, false));
    }
    None
}

fn to_base36(mut value: i64, upper: bool) -> String {
    const UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const LOWER: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let digits = if upper { UPPER } else { LOWER };

    let mut out = Vec::new();
    while value > 0 {
        out.push(digits[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
