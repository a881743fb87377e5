use super::atom::Atom;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub is_hetero: bool,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(id: i32, insertion_code: Option<char>, name: &str, is_hetero: bool) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            is_hetero,
            atoms: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// Position of the named atom within this residue's atom list.
    pub fn atom_position(&self, name: &str) -> Option<usize> {
        self.atoms.iter().position(|a| a.name == name)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, Atom> {
        self.atoms.iter_mut()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Residue {{ id: {}{}, name: \"{}\", atoms: {} }}",
            self.id,
            self.insertion_code.map(String::from).unwrap_or_default(),
            self.name,
            self.atom_count()
        )
    }
}
