//! SMILES reader.
//!
//! Produces the undirected [`Mol`] consumed by the ring analysis. Bond orders
//! are kept as written (aromatic bonds stay aromatic) and implicit hydrogens
//! are derived from default valences; no aromaticity perception or
//! kekulization is performed.

mod builder;
pub mod error;
mod tokenizer;

use tracing::trace;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
pub use error::SmilesError;

pub fn parse_smiles(s: &str) -> Result<Mol<Atom, Bond>, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    let mol = builder::build_mol(&tokens)?;
    trace!(
        smiles = trimmed,
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        "parsed SMILES"
    );
    Ok(mol)
}
