use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;

use crate::depict::{DepictionGenerator, Highlight};
use crate::*;

#[test]
fn mol_add_atoms_and_bonds() {
    let mut mol = Mol::<Atom, Bond>::new();
    let c = mol.add_atom(Atom {
        atomic_num: 6,
        ..Atom::default()
    });
    let o = mol.add_atom(Atom {
        atomic_num: 8,
        ..Atom::default()
    });
    let bond_idx = mol.add_bond(
        c,
        o,
        Bond {
            order: BondOrder::Double,
        },
    );

    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
    assert_eq!(mol.atom(c).atomic_num, 6);
    assert_eq!(mol.bond(bond_idx).order, BondOrder::Double);
    assert_eq!(mol.bond_between(c, o), Some(bond_idx));
}

#[test]
fn mol_title_round_trip() {
    let mut mol = parse_smiles("C1CC1").unwrap();
    assert_eq!(mol.title(), None);
    mol.set_title("cyclopropane");
    assert_eq!(mol.title(), Some("cyclopropane"));
}

#[test]
fn atom_trait_impls() {
    let atom = Atom {
        atomic_num: 7,
        formal_charge: 1,
        hydrogen_count: 4,
        ..Atom::default()
    };
    assert_eq!(HasAtomicNum::atomic_num(&atom), 7);
    assert_eq!(HasFormalCharge::formal_charge(&atom), 1);
    assert_eq!(HasLabel::label(&atom), "NH4+");
    assert_eq!(
        HasBondOrder::bond_order(&Bond {
            order: BondOrder::Triple
        }),
        BondOrder::Triple
    );
}

#[test]
fn analysis_ignores_atom_payloads() {
    // Same skeleton, different elements: the graph alone decides.
    let carbons = parse_smiles("C1CC2CC1CC2").unwrap();
    let hetero = parse_smiles("N1CO2CS1CC2").unwrap();
    let config = BridgeConfig::default();
    let a = analyze(&carbons, &config).unwrap();
    let b = analyze(&hetero, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn smiles_through_depiction() {
    let mut mol = parse_smiles("C1CC2CCC1CC2").unwrap();
    mol.set_title("bicyclooctane");
    let result = analyze(&mol, &BridgeConfig::default()).unwrap();
    let (ring, bridging) = result.first().unwrap();
    let expected: BTreeSet<_> = [2, 5].into_iter().map(NodeIndex::new).collect();
    assert_eq!(bridging, &expected);

    let highlight = Highlight::from_ring(&mol, ring, bridging);
    let svg = DepictionGenerator::new()
        .with_fill_to_fit()
        .depict(&mol, &highlight);
    assert!(svg.to_svg().contains(">bicyclooctane<"));
}

#[test]
fn error_conversions() {
    let err: BridgeError = parse_smiles("C1CC").unwrap_err().into();
    assert_eq!(err.to_string(), "SMILES parse failed: unclosed ring 1");
    assert!(matches!(
        BridgeConfig::new(5, 4, 8),
        Err(BridgeError::InvalidConfiguration { .. })
    ));
}
