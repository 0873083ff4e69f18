//! Ring (elementary cycle) perception.
//!
//! The bridging analysis needs *every* elementary cycle of the graph, not a
//! minimal basis: a macrocycle's bridges are only visible from the smaller
//! rings they cut across. [`AllRingsFinder`] enumerates them exhaustively,
//! optionally bounded by ring size and ring count.

use std::cmp::Ordering;

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;
use tracing::debug;

use crate::mol::Mol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// Enumeration was abandoned after producing more rings than allowed.
    #[error("ring enumeration exceeded the limit of {limit} rings")]
    TooManyRings { limit: usize },
}

/// An elementary cycle, stored as its vertices in traversal order.
///
/// The vertex list is normalised: it starts at the smallest [`NodeIndex`] and
/// runs in the direction whose second vertex is the smaller of the two
/// neighbours. Two `Ring`s describing the same cycle therefore compare equal.
/// Rings order by size first, then by vertex list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
}

impl Ring {
    pub fn new(atoms: Vec<NodeIndex>) -> Self {
        Self {
            atoms: normalize_ring(&atoms),
        }
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    /// Consecutive vertex pairs around the cycle, including the closing pair.
    pub fn atom_pairs(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        let len = self.atoms.len();
        (0..len).map(move |i| (self.atoms[i], self.atoms[(i + 1) % len]))
    }

    /// Graph edges that make up this ring.
    pub fn bonds<A, B>(&self, mol: &Mol<A, B>) -> Vec<EdgeIndex> {
        self.atom_pairs()
            .filter_map(|(a, b)| mol.bond_between(a, b))
            .collect()
    }
}

impl PartialOrd for Ring {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ring {
    fn cmp(&self, other: &Self) -> Ordering {
        self.atoms
            .len()
            .cmp(&other.atoms.len())
            .then_with(|| self.atoms.cmp(&other.atoms))
    }
}

/// The rings of one molecule, sorted by size then vertex list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingSet {
    rings: Vec<Ring>,
}

impl RingSet {
    pub fn new(mut rings: Vec<Ring>) -> Self {
        rings.sort();
        rings.dedup();
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ring> {
        self.rings.iter()
    }

    /// Rings whose size lies in `[min, max]`.
    pub fn with_size_in(&self, min: usize, max: usize) -> impl Iterator<Item = &Ring> + '_ {
        self.rings
            .iter()
            .filter(move |r| (min..=max).contains(&r.len()))
    }

    /// Number of independent cycles: `E - V + C`.
    pub fn cyclomatic_number<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}

impl<'a> IntoIterator for &'a RingSet {
    type Item = &'a Ring;
    type IntoIter = std::slice::Iter<'a, Ring>;

    fn into_iter(self) -> Self::IntoIter {
        self.rings.iter()
    }
}

/// Source of candidate rings for the bridging analysis.
pub trait RingFinder {
    fn find_all_rings<A, B>(&self, mol: &Mol<A, B>) -> Result<RingSet, RingError>;
}

/// Exhaustive elementary-cycle enumeration.
///
/// Every cycle is found exactly once by rooting it at its smallest vertex and
/// only extending paths through larger vertices. The number of cycles grows
/// combinatorially with fused ring systems, so callers analysing large
/// polycycles should set [`with_max_rings`](Self::with_max_rings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllRingsFinder {
    max_ring_size: Option<usize>,
    max_rings: Option<usize>,
}

impl AllRingsFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip cycles with more than `size` vertices.
    pub fn with_max_ring_size(mut self, size: usize) -> Self {
        self.max_ring_size = Some(size);
        self
    }

    /// Fail with [`RingError::TooManyRings`] once more than `limit` rings are found.
    pub fn with_max_rings(mut self, limit: usize) -> Self {
        self.max_rings = Some(limit);
        self
    }
}

impl RingFinder for AllRingsFinder {
    fn find_all_rings<A, B>(&self, mol: &Mol<A, B>) -> Result<RingSet, RingError> {
        if RingSet::cyclomatic_number(mol) == 0 {
            return Ok(RingSet::default());
        }

        let mut search = CycleSearch {
            mol,
            max_len: self.max_ring_size.unwrap_or(usize::MAX),
            max_rings: self.max_rings,
            on_path: vec![false; mol.atom_count()],
            path: Vec::new(),
            found: Vec::new(),
        };
        for root in mol.atoms() {
            search.path.push(root);
            search.on_path[root.index()] = true;
            let result = search.extend(root);
            search.on_path[root.index()] = false;
            search.path.pop();
            result?;
        }

        let rings = RingSet::new(search.found.into_iter().map(Ring::new).collect());
        debug!(rings = rings.len(), "enumerated elementary cycles");
        Ok(rings)
    }
}

struct CycleSearch<'m, A, B> {
    mol: &'m Mol<A, B>,
    max_len: usize,
    max_rings: Option<usize>,
    on_path: Vec<bool>,
    path: Vec<NodeIndex>,
    found: Vec<Vec<NodeIndex>>,
}

impl<A, B> CycleSearch<'_, A, B> {
    /// Extends the current path (rooted at `path[0]`, the smallest vertex of
    /// any cycle it can close) from `tail`.
    fn extend(&mut self, tail: NodeIndex) -> Result<(), RingError> {
        let root = self.path[0];
        let neighbors: Vec<NodeIndex> = self.mol.neighbors(tail).collect();
        for next in neighbors {
            if next == root {
                // Each cycle is reached once per direction; keep the one
                // whose second vertex is smaller than its last.
                if self.path.len() >= 3 && self.path[1] < tail {
                    self.found.push(self.path.clone());
                    if let Some(limit) = self.max_rings {
                        if self.found.len() > limit {
                            return Err(RingError::TooManyRings { limit });
                        }
                    }
                }
                continue;
            }
            if next < root || self.on_path[next.index()] || self.path.len() >= self.max_len {
                continue;
            }
            self.on_path[next.index()] = true;
            self.path.push(next);
            let result = self.extend(next);
            self.path.pop();
            self.on_path[next.index()] = false;
            result?;
        }
        Ok(())
    }
}

fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();

    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::from_edges;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn sizes(rings: &RingSet) -> Vec<usize> {
        rings.iter().map(Ring::len).collect()
    }

    fn all_rings(smiles: &str) -> RingSet {
        let mol = parse_smiles(smiles).unwrap();
        AllRingsFinder::new().find_all_rings(&mol).unwrap()
    }

    #[test]
    fn cyclopropane() {
        assert_eq!(sizes(&all_rings("C1CC1")), vec![3]);
    }

    #[test]
    fn cyclohexane() {
        let rings = all_rings("C1CCCCC1");
        assert_eq!(sizes(&rings), vec![6]);
        assert_eq!(rings.rings()[0].atoms(), &[n(0), n(1), n(2), n(3), n(4), n(5)]);
    }

    #[test]
    fn acyclic() {
        assert!(all_rings("CCCC").is_empty());
    }

    #[test]
    fn naphthalene_includes_envelope() {
        assert_eq!(sizes(&all_rings("c1ccc2ccccc2c1")), vec![6, 6, 10]);
    }

    #[test]
    fn norbornane() {
        assert_eq!(sizes(&all_rings("C1CC2CC1CC2")), vec![5, 5, 6]);
    }

    #[test]
    fn spiro_rings_stay_separate() {
        assert_eq!(sizes(&all_rings("C1CCC2(CC1)CCCC2")), vec![5, 6]);
    }

    #[test]
    fn cubane_has_all_faces() {
        let mol = parse_smiles("C12C3C4C1C1C2C3C41").unwrap();
        assert_eq!(RingSet::cyclomatic_number(&mol), 5);
        let rings = AllRingsFinder::new().find_all_rings(&mol).unwrap();
        let four = rings.iter().filter(|r| r.len() == 4).count();
        assert_eq!(four, 6, "all 6 cube faces should be present");
    }

    #[test]
    fn complete_graph_k4() {
        let mol = from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let rings = AllRingsFinder::new().find_all_rings(&mol).unwrap();
        // four triangles and three 4-cycles
        assert_eq!(sizes(&rings), vec![3, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn max_ring_size_prunes() {
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let rings = AllRingsFinder::new()
            .with_max_ring_size(8)
            .find_all_rings(&mol)
            .unwrap();
        assert_eq!(sizes(&rings), vec![6, 6]);
    }

    #[test]
    fn max_rings_limit() {
        let mol = from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let err = AllRingsFinder::new()
            .with_max_rings(5)
            .find_all_rings(&mol)
            .unwrap_err();
        assert_eq!(err, RingError::TooManyRings { limit: 5 });
        assert!(AllRingsFinder::new().with_max_rings(7).find_all_rings(&mol).is_ok());
    }

    #[test]
    fn normalization_is_direction_independent() {
        let a = Ring::new(vec![n(3), n(1), n(2)]);
        let b = Ring::new(vec![n(2), n(1), n(3)]);
        assert_eq!(a, b);
        assert_eq!(a.atoms(), &[n(1), n(2), n(3)]);
    }

    #[test]
    fn ring_ordering_by_size_first() {
        let big = Ring::new(vec![n(0), n(1), n(2), n(3)]);
        let small = Ring::new(vec![n(5), n(6), n(7)]);
        assert!(small < big);
    }

    #[test]
    fn ring_bonds_close_the_cycle() {
        let mol = parse_smiles("C1CCC1").unwrap();
        let rings = AllRingsFinder::new().find_all_rings(&mol).unwrap();
        assert_eq!(rings.rings()[0].bonds(&mol).len(), 4);
    }

    #[test]
    fn size_window() {
        let rings = all_rings("c1ccc2ccccc2c1");
        assert_eq!(rings.with_size_in(3, 8).count(), 2);
        assert_eq!(rings.with_size_in(10, 10).count(), 1);
    }
}
