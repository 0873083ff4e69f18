//! 2D coordinates for depiction.
//!
//! Atoms are seeded on a circle and relaxed with a force-directed
//! simulation (charge repulsion, spring bonds). The result is centred on the
//! origin and scaled so the mean bond length is 1.0. No randomness is used:
//! the same molecule always gets the same coordinates.

use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::mol::Mol;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

const SEED_SPACING: f64 = 40.0;
const TIME_STEP: f32 = 0.016;

#[derive(Debug, Clone, Copy)]
pub struct ForceLayout {
    iterations: usize,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self { iterations: 600 }
    }
}

impl ForceLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// One point per atom, indexed like the molecule's atoms.
    pub fn coordinates<A, B>(&self, mol: &Mol<A, B>) -> Vec<Point> {
        let mut seed = circle_seed(mol.atom_count());
        if mol.atom_count() < 2 {
            normalize(mol, &mut seed);
            return seed;
        }

        let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        });
        let nodes: Vec<_> = seed
            .iter()
            .enumerate()
            .map(|(i, p)| {
                graph.add_node(NodeData {
                    x: p.x as f32,
                    y: p.y as f32,
                    mass: 10.0,
                    is_anchor: false,
                    user_data: i,
                })
            })
            .collect();
        for (a, b) in bond_pairs(mol) {
            graph.add_edge(nodes[a.index()], nodes[b.index()], EdgeData::default());
        }
        for _ in 0..self.iterations {
            graph.update(TIME_STEP);
        }

        let mut points = seed.clone();
        graph.visit_nodes(|node| {
            points[node.data.user_data] = Point {
                x: node.x() as f64,
                y: node.y() as f64,
            };
        });
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            trace!("force layout diverged, keeping circle seed");
            points = seed;
        }
        normalize(mol, &mut points);
        points
    }
}

/// Coordinates from the default [`ForceLayout`].
pub fn generate_coordinates<A, B>(mol: &Mol<A, B>) -> Vec<Point> {
    ForceLayout::default().coordinates(mol)
}

fn bond_pairs<A, B>(mol: &Mol<A, B>) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
    mol.bonds().filter_map(|e| mol.bond_endpoints(e))
}

fn circle_seed(n: usize) -> Vec<Point> {
    let radius = SEED_SPACING * n as f64 / (2.0 * PI);
    (0..n)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / n as f64;
            Point {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            }
        })
        .collect()
}

fn normalize<A, B>(mol: &Mol<A, B>, points: &mut [Point]) {
    if points.is_empty() {
        return;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let lengths: Vec<f64> = bond_pairs(mol)
        .map(|(a, b)| points[a.index()].distance(&points[b.index()]))
        .collect();
    let mean = if lengths.is_empty() {
        SEED_SPACING
    } else {
        lengths.iter().sum::<f64>() / lengths.len() as f64
    };
    let scale = if mean > f64::EPSILON { 1.0 / mean } else { 1.0 };

    for p in points.iter_mut() {
        p.x = (p.x - cx) * scale;
        p.y = (p.y - cy) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn one_point_per_atom() {
        let mol = parse_smiles("c1ccccc1CC(=O)O").unwrap();
        let points = generate_coordinates(&mol);
        assert_eq!(points.len(), mol.atom_count());
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn mean_bond_length_is_unit() {
        let mol = parse_smiles("C1CC2CCC1CC2").unwrap();
        let points = generate_coordinates(&mol);
        let total: f64 = bond_pairs(&mol)
            .map(|(a, b)| points[a.index()].distance(&points[b.index()]))
            .sum();
        let mean = total / mol.bond_count() as f64;
        assert!((mean - 1.0).abs() < 1e-9, "mean bond length {}", mean);
    }

    #[test]
    fn centred_on_origin() {
        let mol = parse_smiles("CCCCO").unwrap();
        let points = generate_coordinates(&mol);
        let cx: f64 = points.iter().map(|p| p.x).sum();
        let cy: f64 = points.iter().map(|p| p.y).sum();
        assert!(cx.abs() < 1e-9 && cy.abs() < 1e-9);
    }

    #[test]
    fn deterministic() {
        let mol = parse_smiles("C1CC2CC1CC2").unwrap();
        assert_eq!(generate_coordinates(&mol), generate_coordinates(&mol));
    }

    #[test]
    fn single_atom_at_origin() {
        let mol = parse_smiles("[Na+]").unwrap();
        assert_eq!(generate_coordinates(&mol), vec![Point { x: 0.0, y: 0.0 }]);
    }

    #[test]
    fn empty_molecule() {
        let mol: Mol<(), ()> = Mol::new();
        assert!(generate_coordinates(&mol).is_empty());
    }
}
