//! PDB structure reader producing the model/chain/residue/atom hierarchy.
//!
//! The parser ingests fixed-column `ATOM`/`HETATM` records, splits ensembles on
//! `MODEL`/`ENDMDL`, filters alternate locations by occupancy, and attaches `CONECT`
//! declarations to the atoms of the first model as connectivity hints. Chains and residues
//! keep the order in which they first appear in the file.

use crate::io::error::Error;
use crate::model::{
    atom::Atom,
    chain::Chain,
    residue::Residue,
    structure::{Model, Structure},
    types::{Point, is_known_element, normalize_element},
};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Symbol used when no element can be determined for an atom.
const UNKNOWN_ELEMENT: &str = "X";

/// Residue identity within a chain: sequence number plus insertion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ResKey {
    /// Residue sequence number parsed from columns 23‑26.
    res_seq: i32,
    /// Insertion code used to disambiguate residues sharing the same `res_seq`.
    i_code: Option<char>,
}

/// Temporary residue buffer that holds atoms prior to building the final tree.
struct TempResidue {
    /// Residue name as it appeared in the source file.
    raw_name: String,
    /// Indicates if the residue was described via an `HETATM` entry.
    is_hetatm: bool,
    /// Atoms in file order, each with the occupancy used for altloc filtering.
    atoms: Vec<(f64, Atom)>,
}

#[derive(Default)]
struct TempChain {
    residue_order: Vec<ResKey>,
    residues: HashMap<ResKey, TempResidue>,
}

struct TempModel {
    id: i32,
    chain_order: Vec<String>,
    chains: HashMap<String, TempChain>,
}

impl TempModel {
    fn new(id: i32) -> Self {
        Self {
            id,
            chain_order: Vec::new(),
            chains: HashMap::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Fields of one `ATOM`/`HETATM` record.
struct AtomRecord {
    atom: Atom,
    occupancy: f64,
    res_name: String,
    chain_id: String,
    key: ResKey,
}

/// Parses a PDB stream into a [`Structure`].
///
/// # Arguments
///
/// * `reader` - Any buffered reader that yields PDB lines.
///
/// # Returns
///
/// A populated [`Structure`]. A stream without atom records yields a structure with no
/// models; rejecting it is left to the caller.
///
/// # Errors
///
/// Returns [`Error`] when encountering malformed numeric fields, truncated atom records, or
/// IO failures from the underlying reader.
///
/// # Examples
///
/// ```
/// use bond_forge::io::read_pdb_structure;
/// use std::io::Cursor;
///
/// let pdb = "\
/// ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 20.00           N\n\
/// END\n";
/// let structure = read_pdb_structure(Cursor::new(pdb.as_bytes())).unwrap();
/// assert_eq!(structure.model_count(), 1);
/// assert_eq!(structure.atom_count(), 1);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    read_with_path(reader, None)
}

/// Opens and parses a PDB file from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be opened or read, and the same parse errors
/// as [`read`], annotated with `path`.
pub fn read_file(path: &Path) -> Result<Structure, Error> {
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    read_with_path(BufReader::new(file), Some(path))
}

fn read_with_path<R: BufRead>(reader: R, path: Option<&Path>) -> Result<Structure, Error> {
    let path_buf = || path.map(Path::to_path_buf);

    let mut finished: Vec<TempModel> = Vec::new();
    let mut current: Option<TempModel> = None;
    let mut conect: HashMap<i32, Vec<i32>> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, path_buf()))?;

        if line.starts_with("MODEL") {
            if let Some(model) = current.take() {
                finished.push(model);
            }
            let id = decode_hybrid36(column(&line, 10, 14), 4)
                .unwrap_or(finished.len() as i32 + 1);
            current = Some(TempModel::new(id));
        } else if line.starts_with("ENDMDL") {
            if let Some(model) = current.take() {
                finished.push(model);
            }
        } else if line.starts_with("ATOM  ") || line.starts_with("HETATM") {
            let is_hetatm = line.starts_with("HETATM");
            let record = parse_atom_record(&line, line_num, path)?;
            let model =
                current.get_or_insert_with(|| TempModel::new(finished.len() as i32 + 1));
            insert_atom(model, record, is_hetatm);
        } else if line.starts_with("CONECT") {
            let (source, targets) = parse_conect_record(&line, line_num, path)?;
            let entry = conect.entry(source).or_default();
            for target in targets {
                if !entry.contains(&target) {
                    entry.push(target);
                }
            }
        }
    }

    if let Some(model) = current.take() {
        finished.push(model);
    }

    let mut structure = Structure::new();
    for temp in finished.into_iter().filter(|m| !m.is_empty()) {
        structure.add_model(build_model(temp));
    }

    attach_connectivity(&mut structure, &conect);

    log::debug!("Parsed {}", structure);

    Ok(structure)
}

/// Returns the byte range `start..end` of `line`, clipped to its length.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Parses an `ATOM`/`HETATM` line.
///
/// # Errors
///
/// [`Error::Parse`] if the record is shorter than the coordinate columns or a numeric field
/// is malformed.
fn parse_atom_record(line: &str, line_num: usize, path: Option<&Path>) -> Result<AtomRecord, Error> {
    let fail = |details: &str| Error::parse("PDB", path.map(Path::to_path_buf), line_num, details);

    if line.len() < 54 || !line.is_char_boundary(54) {
        return Err(fail("Atom record too short"));
    }

    let serial =
        decode_hybrid36(column(line, 6, 11), 5).ok_or_else(|| fail("Invalid atom serial number"))?;
    let name_field = column(line, 12, 16);
    let atom_name = name_field.trim();
    let res_name = column(line, 17, 20).trim().to_string();
    let chain_id = column(line, 21, 22).chars().next().unwrap_or(' ').to_string();
    let res_seq = decode_hybrid36(column(line, 22, 26), 4)
        .ok_or_else(|| fail("Invalid residue sequence number"))?;
    let i_code = column(line, 26, 27)
        .chars()
        .next()
        .filter(|c| !c.is_whitespace());

    let coordinate = |start: usize, end: usize, axis: &str| -> Result<f64, Error> {
        column(line, start, end)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| fail(&format!("Invalid {axis} coordinate")))
    };
    let pos = Point::new(
        coordinate(30, 38, "X")?,
        coordinate(38, 46, "Y")?,
        coordinate(46, 54, "Z")?,
    );

    let occupancy = column(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0);

    let element_field = column(line, 76, 78).trim();
    let element = if element_field.is_empty() {
        infer_element_from_name(name_field)
    } else {
        normalize_element(element_field)
    };

    Ok(AtomRecord {
        atom: Atom::new(atom_name, &element, pos, serial),
        occupancy,
        res_name,
        chain_id,
        key: ResKey { res_seq, i_code },
    })
}

/// Buffers a parsed atom, keeping the highest-occupancy copy of each atom name.
fn insert_atom(model: &mut TempModel, record: AtomRecord, is_hetatm: bool) {
    let AtomRecord {
        atom,
        occupancy,
        res_name,
        chain_id,
        key,
    } = record;

    if !model.chains.contains_key(&chain_id) {
        model.chain_order.push(chain_id.clone());
    }
    let chain = model.chains.entry(chain_id).or_default();

    if !chain.residues.contains_key(&key) {
        chain.residue_order.push(key);
    }
    let residue = chain.residues.entry(key).or_insert_with(|| TempResidue {
        raw_name: res_name,
        is_hetatm,
        atoms: Vec::new(),
    });

    match residue.atoms.iter_mut().find(|(_, a)| a.name == atom.name) {
        Some(slot) => {
            if occupancy > slot.0 {
                *slot = (occupancy, atom);
            }
        }
        None => residue.atoms.push((occupancy, atom)),
    }
}

/// Parses a `CONECT` record into its source serial and bonded target serials.
///
/// Only the four covalent-partner columns are read; blank fields are skipped.
fn parse_conect_record(
    line: &str,
    line_num: usize,
    path: Option<&Path>,
) -> Result<(i32, Vec<i32>), Error> {
    let fail = |details: &str| Error::parse("PDB", path.map(Path::to_path_buf), line_num, details);

    let source = decode_hybrid36(column(line, 6, 11), 5)
        .ok_or_else(|| fail("Invalid CONECT source serial"))?;

    let mut targets = Vec::with_capacity(4);
    for start in [11, 16, 21, 26] {
        let field = column(line, start, start + 5);
        if field.trim().is_empty() {
            continue;
        }
        let target =
            decode_hybrid36(field, 5).ok_or_else(|| fail("Invalid CONECT target serial"))?;
        targets.push(target);
    }

    Ok((source, targets))
}

fn build_model(temp: TempModel) -> Model {
    let TempModel {
        id,
        chain_order,
        mut chains,
    } = temp;

    let mut model = Model::new(id);
    for chain_id in chain_order {
        let Some(temp_chain) = chains.remove(&chain_id) else {
            continue;
        };
        let TempChain {
            residue_order,
            mut residues,
        } = temp_chain;

        let mut chain = Chain::new(&chain_id);
        for key in residue_order {
            if let Some(temp_res) = residues.remove(&key) {
                let mut residue =
                    Residue::new(key.res_seq, key.i_code, &temp_res.raw_name, temp_res.is_hetatm);
                for (_, atom) in temp_res.atoms {
                    residue.add_atom(atom);
                }
                chain.add_residue(residue);
            }
        }
        model.add_chain(chain);
    }
    model
}

/// Attaches `CONECT` partners to the matching atoms of the first model.
fn attach_connectivity(structure: &mut Structure, conect: &HashMap<i32, Vec<i32>>) {
    if conect.is_empty() {
        return;
    }

    let mut matched: HashSet<i32> = HashSet::new();
    if let Some(model) = structure.iter_models_mut().next() {
        for chain in model.iter_chains_mut() {
            for residue in chain.iter_residues_mut() {
                for atom in residue.iter_atoms_mut() {
                    if let Some(targets) = conect.get(&atom.serial) {
                        atom.connectivity = targets.clone();
                        matched.insert(atom.serial);
                    }
                }
            }
        }
    }

    if matched.len() < conect.len() {
        log::warn!(
            "{} CONECT source serials did not match any atom of the first model",
            conect.len() - matched.len()
        );
    }
}

/// Decodes a fixed-width PDB integer field, including hybrid-36 encoded values.
///
/// Plain decimal fields parse directly. Fields beginning with a letter are hybrid-36:
/// upper-case digits continue after the largest decimal value of the field width, and
/// lower-case digits continue after the upper-case range.
fn decode_hybrid36(field: &str, width: u32) -> Option<i32> {
    let s = field.trim();
    let first = s.chars().next()?;

    if first.is_ascii_digit() || first == '-' {
        return s.parse().ok();
    }

    if s.len() != width as usize {
        return None;
    }

    let upper = first.is_ascii_uppercase();
    let valid = s.chars().all(|c| {
        c.is_ascii_digit()
            || (upper && c.is_ascii_uppercase())
            || (!upper && c.is_ascii_lowercase())
    });
    if !valid {
        return None;
    }

    let value = i64::from_str_radix(s, 36).ok()?;
    let block = 36i64.pow(width - 1);
    let mut decoded = value - 10 * block + 10i64.pow(width);
    if !upper {
        decoded += 26 * block;
    }
    i32::try_from(decoded).ok()
}

/// Infers an element symbol from an atom-name field when columns 77‑78 are blank.
///
/// A two-letter symbol is only accepted when the name starts in column 13, which the PDB
/// format reserves for two-letter elements (`FE  `, `CL  `); otherwise the first letter is
/// used (`" CA "` is carbon, not calcium). Falls back to `X`.
fn infer_element_from_name(field: &str) -> String {
    let letters: Vec<(usize, char)> = field
        .char_indices()
        .filter(|(_, ch)| ch.is_ascii_alphabetic())
        .collect();

    let Some(&(first_idx, first_char)) = letters.first() else {
        return UNKNOWN_ELEMENT.to_string();
    };

    if let Some(&(second_idx, second_char)) = letters.get(1) {
        let starts_in_col_13 = first_idx == 0;
        let contiguous = second_idx == first_idx + 1;
        if starts_in_col_13 && contiguous {
            let pair: String = [first_char, second_char].iter().collect();
            if is_known_element(&pair) && !is_hydrogen_name(field) {
                return normalize_element(&pair);
            }
        }
    }

    let single = first_char.to_string();
    if is_known_element(&single) {
        return normalize_element(&single);
    }

    UNKNOWN_ELEMENT.to_string()
}

/// Hydrogen names such as `HG1 ` or `HD21` start in column 13 when they have four
/// characters; those must not be read as mercury or other two-letter elements.
fn is_hydrogen_name(field: &str) -> bool {
    field.len() == 4
        && field.starts_with('H')
        && field[1..].chars().any(|c| c.is_ascii_digit())
}
