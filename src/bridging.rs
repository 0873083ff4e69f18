//! Maximally bridging ring detection.
//!
//! A ring vertex is *bridging* when a short simple path leaves the ring at
//! that vertex and comes back at another vertex of the same ring without
//! touching the ring in between. Each size-eligible ring is classified
//! independently, and only the rings with the largest number of bridging
//! vertices are kept.
//!
//! # Examples
//!
//! ```
//! use bridgecrab::{analyze, parse_smiles, BridgeConfig};
//!
//! // bicyclo[2.2.2]octane: three six-membered rings sharing two bridgeheads
//! let mol = parse_smiles("C1CC2CCC1CC2").unwrap();
//! let result = analyze(&mol, &BridgeConfig::default()).unwrap();
//! assert_eq!(result.len(), 3);
//! assert_eq!(result.max_bridging(), Some(2));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::mol::Mol;
use crate::paths::{PathEnumerator, SimplePaths};
use crate::rings::{AllRingsFinder, Ring, RingFinder, RingSet};

/// Rings retained by the selector, each with its bridging vertices.
///
/// Iteration runs in [`Ring`] order (size, then vertex list), so
/// [`first`](Self::first) is a deterministic pick for depiction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgingResult {
    rings: BTreeMap<Ring, BTreeSet<NodeIndex>>,
}

impl BridgingResult {
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ring, &BTreeSet<NodeIndex>)> + '_ {
        self.rings.iter()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.rings.keys()
    }

    pub fn first(&self) -> Option<(&Ring, &BTreeSet<NodeIndex>)> {
        self.rings.iter().next()
    }

    pub fn get(&self, ring: &Ring) -> Option<&BTreeSet<NodeIndex>> {
        self.rings.get(ring)
    }

    /// The shared bridging count of every retained ring.
    pub fn max_bridging(&self) -> Option<usize> {
        self.rings.values().next().map(BTreeSet::len)
    }

    pub fn into_map(self) -> BTreeMap<Ring, BTreeSet<NodeIndex>> {
        self.rings
    }
}

impl<'a> IntoIterator for &'a BridgingResult {
    type Item = (&'a Ring, &'a BTreeSet<NodeIndex>);
    type IntoIter = std::collections::btree_map::Iter<'a, Ring, BTreeSet<NodeIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rings.iter()
    }
}

/// Whether `path` bridges `vi` and `vj` across `ring`.
///
/// The path must have between 3 and `bridge_length_max` vertices, contain
/// both endpoints, and share no other vertex with the ring.
pub fn is_admissible(
    path: &[NodeIndex],
    vi: NodeIndex,
    vj: NodeIndex,
    ring: &Ring,
    bridge_length_max: usize,
) -> bool {
    admissible(path, vi, vj, bridge_length_max, |v| ring.contains(v))
}

fn admissible(
    path: &[NodeIndex],
    vi: NodeIndex,
    vj: NodeIndex,
    bridge_length_max: usize,
    in_ring: impl Fn(NodeIndex) -> bool,
) -> bool {
    if path.len() < 3 || path.len() > bridge_length_max {
        return false;
    }
    if !path.contains(&vi) || !path.contains(&vj) {
        return false;
    }
    path.iter().all(|&v| v == vi || v == vj || !in_ring(v))
}

/// Returns the vertices of `ring` that end an admissible bridging path.
///
/// Every unordered pair of ring vertices is checked; a pair whose endpoints
/// are both already bridging is skipped since it cannot change the result.
pub fn classify<A, B, P: PathEnumerator>(
    mol: &Mol<A, B>,
    ring: &Ring,
    bridge_length_max: usize,
    paths: &P,
) -> Result<BTreeSet<NodeIndex>> {
    let mut in_ring = vec![false; mol.atom_count()];
    for &atom in ring.atoms() {
        in_ring[atom.index()] = true;
    }

    let atoms = ring.atoms();
    let mut bridging = BTreeSet::new();
    for (i, &vi) in atoms.iter().enumerate() {
        for &vj in &atoms[i + 1..] {
            if bridging.contains(&vi) && bridging.contains(&vj) {
                continue;
            }
            let candidates = paths.simple_paths(mol, vi, vj, Some(bridge_length_max))?;
            let bridged = candidates
                .iter()
                .any(|p| admissible(p, vi, vj, bridge_length_max, |v| in_ring[v.index()]));
            if bridged {
                trace!(from = vi.index(), to = vj.index(), "bridging pair");
                bridging.insert(vi);
                bridging.insert(vj);
            }
        }
    }
    Ok(bridging)
}

/// Classifies every ring whose size lies in the configured window and keeps
/// those with the most bridging vertices.
///
/// When no ring has a bridge the maximum is 0 and every eligible ring is
/// kept. No eligible ring at all gives an empty result.
pub fn select<A, B, P>(
    mol: &Mol<A, B>,
    rings: &RingSet,
    config: &BridgeConfig,
    paths: &P,
) -> Result<BridgingResult>
where
    A: Sync,
    B: Sync,
    P: PathEnumerator,
{
    let eligible: Vec<&Ring> = rings
        .with_size_in(config.min_ring_size(), config.max_ring_size())
        .collect();
    debug!(
        rings = rings.len(),
        eligible = eligible.len(),
        parallel = config.parallel(),
        "classifying rings"
    );

    let classify_one = |ring: &Ring| {
        classify(mol, ring, config.bridge_length_max(), paths).map(|bridging| {
            trace!(size = ring.len(), bridging = bridging.len(), "classified ring");
            (ring.clone(), bridging)
        })
    };
    let tallies: Vec<(Ring, BTreeSet<NodeIndex>)> = if config.parallel() {
        eligible
            .par_iter()
            .map(|&ring| classify_one(ring))
            .collect::<std::result::Result<_, _>>()?
    } else {
        eligible
            .iter()
            .map(|&ring| classify_one(ring))
            .collect::<std::result::Result<_, _>>()?
    };

    let Some(max) = tallies.iter().map(|(_, bridging)| bridging.len()).max() else {
        return Ok(BridgingResult::default());
    };
    let rings: BTreeMap<Ring, BTreeSet<NodeIndex>> = tallies
        .into_iter()
        .filter(|(_, bridging)| bridging.len() == max)
        .collect();
    info!(retained = rings.len(), max_bridging = max, "selected maximally bridging rings");
    Ok(BridgingResult { rings })
}

/// Stateful front end: configure once, set a molecule, analyse.
///
/// The ring finder and path enumerator default to [`AllRingsFinder`] and
/// [`SimplePaths`], bounded by the configuration's caps.
pub struct MaximallyBridgingRings<'m, A, B, R = AllRingsFinder, P = SimplePaths> {
    config: BridgeConfig,
    mol: Option<&'m Mol<A, B>>,
    ring_finder: R,
    paths: P,
}

impl<'m, A, B> MaximallyBridgingRings<'m, A, B> {
    pub fn new(config: BridgeConfig) -> Self {
        let mut ring_finder = AllRingsFinder::new().with_max_ring_size(config.max_ring_size());
        if let Some(limit) = config.max_rings() {
            ring_finder = ring_finder.with_max_rings(limit);
        }
        let mut paths = SimplePaths::new();
        if let Some(limit) = config.max_paths() {
            paths = paths.with_max_paths(limit);
        }
        Self {
            config,
            mol: None,
            ring_finder,
            paths,
        }
    }
}

impl<'m, A, B, R, P> MaximallyBridgingRings<'m, A, B, R, P>
where
    A: Sync,
    B: Sync,
    R: RingFinder,
    P: PathEnumerator,
{
    pub fn with_ring_finder<R2: RingFinder>(self, ring_finder: R2) -> MaximallyBridgingRings<'m, A, B, R2, P> {
        MaximallyBridgingRings {
            config: self.config,
            mol: self.mol,
            ring_finder,
            paths: self.paths,
        }
    }

    pub fn with_path_enumerator<P2: PathEnumerator>(self, paths: P2) -> MaximallyBridgingRings<'m, A, B, R, P2> {
        MaximallyBridgingRings {
            config: self.config,
            mol: self.mol,
            ring_finder: self.ring_finder,
            paths,
        }
    }

    pub fn with_mol(mut self, mol: &'m Mol<A, B>) -> Self {
        self.mol = Some(mol);
        self
    }

    pub fn set_mol(&mut self, mol: &'m Mol<A, B>) {
        self.mol = Some(mol);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Runs ring perception and selection on the current molecule.
    ///
    /// # Errors
    /// [`BridgeError::InvalidState`] if no molecule was set; ring and path
    /// enumeration failures are passed through.
    pub fn analyze(&self) -> Result<BridgingResult> {
        let mol = self.mol.ok_or(BridgeError::InvalidState)?;
        let rings = self.ring_finder.find_all_rings(mol)?;
        select(mol, &rings, &self.config, &self.paths)
    }
}

/// One-shot analysis with the default collaborators.
pub fn analyze<A: Sync, B: Sync>(mol: &Mol<A, B>, config: &BridgeConfig) -> Result<BridgingResult> {
    MaximallyBridgingRings::new(*config).with_mol(mol).analyze()
}
