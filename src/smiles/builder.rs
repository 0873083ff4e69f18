use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};

struct OpenRing {
    atom: NodeIndex,
    bond: Option<BondToken>,
}

/// Assembles a molecule from a token stream in a single left-to-right pass.
pub fn build_mol(tokens: &[Token]) -> Result<Mol<Atom, Bond>, SmilesError> {
    let mut mol = Mol::new();
    let mut aromatic: Vec<bool> = Vec::new();
    let mut implicit_h: Vec<bool> = Vec::new();
    let mut branches: Vec<(NodeIndex, usize)> = Vec::new();
    let mut open_rings: HashMap<u16, OpenRing> = HashMap::new();
    let mut current: Option<NodeIndex> = None;
    let mut pending_bond: Option<(BondToken, usize)> = None;

    for token in tokens {
        match token {
            Token::Atom(atom_tok) => {
                let idx = mol.add_atom(atom_from_token(atom_tok));
                aromatic.push(atom_tok.is_aromatic);
                implicit_h.push(!atom_tok.is_bracket);
                if let Some(prev) = current {
                    let bond = pending_bond.take().map(|(b, _)| b);
                    let order = resolve_order(bond, aromatic[prev.index()], atom_tok.is_aromatic);
                    mol.add_bond(prev, idx, Bond { order });
                } else if let Some((_, pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos });
                }
                current = Some(idx);
            }
            Token::Bond(bond, pos) => {
                if pending_bond.is_some() || current.is_none() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                pending_bond = Some((*bond, *pos));
            }
            Token::RingClosure { digit, pos } => {
                let cur = current.ok_or(SmilesError::DanglingRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let bond = pending_bond.take().map(|(b, _)| b);
                match open_rings.remove(digit) {
                    Some(open) => {
                        let bond = match (bond, open.bond) {
                            (Some(a), Some(b)) if a != b => {
                                return Err(SmilesError::RingBondConflict { digit: *digit });
                            }
                            (a, b) => a.or(b),
                        };
                        if open.atom == cur || mol.bond_between(open.atom, cur).is_some() {
                            return Err(SmilesError::InvalidRingBond {
                                digit: *digit,
                                pos: *pos,
                            });
                        }
                        let order =
                            resolve_order(bond, aromatic[open.atom.index()], aromatic[cur.index()]);
                        mol.add_bond(open.atom, cur, Bond { order });
                    }
                    None => {
                        open_rings.insert(*digit, OpenRing { atom: cur, bond });
                    }
                }
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                branches.push((cur, *pos));
            }
            Token::CloseParen(pos) => {
                if let Some((_, bond_pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                let (atom, _) = branches
                    .pop()
                    .ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                current = Some(atom);
            }
            Token::Dot(_) => {
                if let Some((_, bond_pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                current = None;
            }
        }
    }

    if let Some((_, pos)) = pending_bond {
        return Err(SmilesError::DanglingBond { pos });
    }
    if let Some(&(_, pos)) = branches.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some(&digit) = open_rings.keys().min() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    assign_implicit_hydrogens(&mut mol, &implicit_h);
    Ok(mol)
}

fn atom_from_token(tok: &AtomToken) -> Atom {
    Atom {
        atomic_num: tok.element.map(|e| e.atomic_num()).unwrap_or(0),
        formal_charge: tok.charge,
        isotope: tok.isotope,
        hydrogen_count: tok.hcount.unwrap_or(0),
        is_aromatic: tok.is_aromatic,
    }
}

fn resolve_order(bond: Option<BondToken>, from_aromatic: bool, to_aromatic: bool) -> BondOrder {
    match bond {
        Some(BondToken::Double) => BondOrder::Double,
        Some(BondToken::Triple) => BondOrder::Triple,
        Some(BondToken::Aromatic) => BondOrder::Aromatic,
        Some(BondToken::Single | BondToken::Up | BondToken::Down) => BondOrder::Single,
        None if from_aromatic && to_aromatic => BondOrder::Aromatic,
        None => BondOrder::Single,
    }
}

/// Fills in hydrogen counts for organic-subset atoms written without brackets.
fn assign_implicit_hydrogens(mol: &mut Mol<Atom, Bond>, implicit: &[bool]) {
    for (i, &needs_h) in implicit.iter().enumerate() {
        if !needs_h {
            continue;
        }
        let idx = NodeIndex::new(i);
        let bond_sum: u8 = mol
            .bonds_of(idx)
            .map(|e| mol.bond(e).order.multiplicity())
            .fold(0u8, u8::saturating_add);
        let atom = mol.atom(idx);
        let valences = atom
            .element()
            .map(|e| e.default_valences())
            .unwrap_or(&[]);
        let Some(&target) = valences.iter().find(|&&v| v >= bond_sum) else {
            continue;
        };
        let mut h = target - bond_sum;
        if atom.is_aromatic && h > 0 {
            h -= 1;
        }
        mol.atom_mut(idx).hydrogen_count = h;
    }
}
