//! SVG depiction of a molecule with a highlighted ring.
//!
//! Ring bonds are stroked in the bond highlight colour and bridging atoms
//! get a filled halo in the atom highlight colour. Plain neutral carbons are
//! drawn as bare vertices; every other atom shows its label.
//!
//! ```
//! use bridgecrab::depict::{DepictionGenerator, Highlight};
//! use bridgecrab::parse_smiles;
//!
//! let mol = parse_smiles("C1CCNCC1").unwrap();
//! let svg = DepictionGenerator::new()
//!     .with_title("piperidine")
//!     .depict(&mol, &Highlight::default())
//!     .to_svg()
//!     .to_string();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains(">piperidine<"));
//! ```

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::bond::BondOrder;
use crate::error::{BridgeError, Result};
use crate::layout::{generate_coordinates, Point};
use crate::mol::Mol;
use crate::rings::Ring;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasLabel};

pub const RED: &str = "#FF0000";
pub const PINK: &str = "#FFAFAF";

/// Pixels per unit bond length at zoom 1.0.
const BOND_LENGTH_PX: f64 = 30.0;
const MARGIN_PX: f64 = 10.0;

/// Bonds and atoms to emphasise in a depiction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    bonds: BTreeSet<EdgeIndex>,
    atoms: BTreeSet<NodeIndex>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bonds(mut self, bonds: impl IntoIterator<Item = EdgeIndex>) -> Self {
        self.bonds.extend(bonds);
        self
    }

    pub fn with_atoms(mut self, atoms: impl IntoIterator<Item = NodeIndex>) -> Self {
        self.atoms.extend(atoms);
        self
    }

    /// The bonds of `ring` and the `bridging` atoms.
    pub fn from_ring<A, B>(mol: &Mol<A, B>, ring: &Ring, bridging: &BTreeSet<NodeIndex>) -> Self {
        Self::new()
            .with_bonds(ring.bonds(mol))
            .with_atoms(bridging.iter().copied())
    }

    pub fn bonds(&self) -> &BTreeSet<EdgeIndex> {
        &self.bonds
    }

    pub fn atoms(&self) -> &BTreeSet<NodeIndex> {
        &self.atoms
    }
}

/// A rendered SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Depiction {
    svg: String,
    width: f64,
    height: f64,
}

impl Depiction {
    pub fn to_svg(&self) -> &str {
        &self.svg
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.svg).map_err(|source| BridgeError::Io {
            source,
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DepictionGenerator {
    title: Option<String>,
    zoom: f64,
    title_scale: f64,
    size: Option<(f64, f64)>,
    fill_to_fit: bool,
    bond_color: String,
    atom_color: String,
}

impl Default for DepictionGenerator {
    fn default() -> Self {
        Self {
            title: None,
            zoom: 2.0,
            title_scale: 1.2,
            size: None,
            fill_to_fit: false,
            bond_color: RED.to_string(),
            atom_color: PINK.to_string(),
        }
    }
}

impl DepictionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caption drawn under the molecule. Defaults to the molecule's title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Caption font size relative to atom labels.
    pub fn with_title_scale(mut self, scale: f64) -> Self {
        self.title_scale = scale;
        self
    }

    /// Fixed canvas size in pixels. Without it the canvas wraps the drawing.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Scale the drawing to fill a fixed-size canvas.
    pub fn with_fill_to_fit(mut self) -> Self {
        self.fill_to_fit = true;
        self
    }

    pub fn with_highlight_colors(mut self, bond: impl Into<String>, atom: impl Into<String>) -> Self {
        self.bond_color = bond.into();
        self.atom_color = atom.into();
        self
    }

    pub fn depict<A, B>(&self, mol: &Mol<A, B>, highlight: &Highlight) -> Depiction
    where
        A: HasLabel + HasAtomicNum + HasFormalCharge,
        B: HasBondOrder,
    {
        let coords = generate_coordinates(mol);
        let (min, max) = bounds(&coords);
        let span_x = max.x - min.x;
        let span_y = max.y - min.y;

        let title = self.title.as_deref().or(mol.title());
        let base_scale = BOND_LENGTH_PX * self.zoom;
        let title_height = |scale: f64| match title {
            Some(_) => label_font(scale) * self.title_scale * 2.0,
            None => 0.0,
        };

        let (scale, width, height) = match self.size {
            Some((w, h)) if self.fill_to_fit => {
                let avail_w = (w - 2.0 * MARGIN_PX).max(1.0);
                let avail_h = (h - 2.0 * MARGIN_PX - title_height(base_scale)).max(1.0);
                let fit = match (span_x > 0.0, span_y > 0.0) {
                    (true, true) => (avail_w / span_x).min(avail_h / span_y),
                    (true, false) => avail_w / span_x,
                    (false, true) => avail_h / span_y,
                    (false, false) => base_scale,
                };
                (fit, w, h)
            }
            Some((w, h)) => (base_scale, w, h),
            None => {
                let pad = label_font(base_scale) + MARGIN_PX;
                (
                    base_scale,
                    span_x * base_scale + 2.0 * pad,
                    span_y * base_scale + 2.0 * pad + title_height(base_scale),
                )
            }
        };

        // Centre the drawing in the area above the title.
        let draw_height = height - title_height(scale);
        let offset_x = width / 2.0 - (min.x + span_x / 2.0) * scale;
        let offset_y = draw_height / 2.0 + (min.y + span_y / 2.0) * scale;
        let to_px = |p: &Point| Point {
            x: offset_x + p.x * scale,
            y: offset_y - p.y * scale,
        };
        let px: Vec<Point> = coords.iter().map(to_px).collect();

        let labels: Vec<Option<String>> = mol
            .atoms()
            .map(|a| {
                let atom = mol.atom(a);
                let label = atom.label();
                let plain_carbon = atom.atomic_num() == 6
                    && atom.formal_charge() == 0
                    && label.starts_with('C')
                    && mol.degree(a) > 0;
                (!plain_carbon).then_some(label)
            })
            .collect();

        let font = label_font(scale);
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.2}" height="{:.2}" viewBox="0 0 {:.2} {:.2}">"#,
            width, height, width, height
        );
        svg.push_str(r##"<rect width="100%" height="100%" fill="#FFFFFF"/>"##);
        svg.push('\n');

        for &a in highlight.atoms() {
            if let Some(p) = px.get(a.index()) {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                    p.x,
                    p.y,
                    scale * 0.3,
                    self.atom_color
                );
            }
        }

        let stroke = (scale * 0.05).max(1.0);
        for e in mol.bonds() {
            let Some((a, b)) = mol.bond_endpoints(e) else {
                continue;
            };
            let (color, width) = if highlight.bonds().contains(&e) {
                (self.bond_color.as_str(), stroke * 2.0)
            } else {
                ("#000000", stroke)
            };
            let (p, q) = trim_for_labels(
                px[a.index()],
                px[b.index()],
                labels[a.index()].is_some(),
                labels[b.index()].is_some(),
                font * 0.6,
            );
            let gap = scale * 0.15;
            match mol.bond(e).bond_order() {
                BondOrder::Single => line(&mut svg, p, q, 0.0, color, width, false),
                BondOrder::Double => {
                    line(&mut svg, p, q, gap / 2.0, color, width, false);
                    line(&mut svg, p, q, -gap / 2.0, color, width, false);
                }
                BondOrder::Triple => {
                    line(&mut svg, p, q, 0.0, color, width, false);
                    line(&mut svg, p, q, gap, color, width, false);
                    line(&mut svg, p, q, -gap, color, width, false);
                }
                BondOrder::Aromatic => {
                    line(&mut svg, p, q, 0.0, color, width, false);
                    line(&mut svg, p, q, gap, color, width, true);
                }
            }
        }

        for (i, label) in labels.iter().enumerate() {
            if let Some(label) = label {
                let p = px[i];
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.2}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
                    p.x,
                    p.y,
                    font,
                    label_color(mol.atom(NodeIndex::new(i)).atomic_num()),
                    xml_escape(label)
                );
            }
        }

        if let Some(title) = title {
            let title_font = font * self.title_scale;
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.2}" text-anchor="middle">{}</text>"#,
                width / 2.0,
                height - title_font * 0.5 - MARGIN_PX / 2.0,
                title_font,
                xml_escape(title)
            );
        }
        svg.push_str("</svg>\n");

        Depiction { svg, width, height }
    }
}

fn label_font(scale: f64) -> f64 {
    scale * 0.4
}

fn bounds(points: &[Point]) -> (Point, Point) {
    if points.is_empty() {
        return (Point { x: 0.0, y: 0.0 }, Point { x: 0.0, y: 0.0 });
    }
    let mut min = Point {
        x: f64::INFINITY,
        y: f64::INFINITY,
    };
    let mut max = Point {
        x: f64::NEG_INFINITY,
        y: f64::NEG_INFINITY,
    };
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

/// Pulls bond ends back from labelled atoms so strokes don't cross the text.
fn trim_for_labels(p: Point, q: Point, p_label: bool, q_label: bool, radius: f64) -> (Point, Point) {
    let len = p.distance(&q);
    if len <= 2.0 * radius {
        return (p, q);
    }
    let (ux, uy) = ((q.x - p.x) / len, (q.y - p.y) / len);
    let p = if p_label {
        Point {
            x: p.x + ux * radius,
            y: p.y + uy * radius,
        }
    } else {
        p
    };
    let q = if q_label {
        Point {
            x: q.x - ux * radius,
            y: q.y - uy * radius,
        }
    } else {
        q
    };
    (p, q)
}

fn line(svg: &mut String, p: Point, q: Point, offset: f64, color: &str, width: f64, dashed: bool) {
    let len = p.distance(&q);
    let (nx, ny) = if len > 0.0 {
        (-(q.y - p.y) / len, (q.x - p.x) / len)
    } else {
        (0.0, 0.0)
    };
    let dash = if dashed {
        format!(r#" stroke-dasharray="{:.2},{:.2}""#, width * 2.0, width * 2.0)
    } else {
        String::new()
    };
    let _ = writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"{}/>"#,
        p.x + nx * offset,
        p.y + ny * offset,
        q.x + nx * offset,
        q.y + ny * offset,
        color,
        width,
        dash
    );
}

fn label_color(atomic_num: u8) -> &'static str {
    match atomic_num {
        7 => "#3050F8",
        8 => "#FF0D0D",
        9 | 17 => "#1FF01F",
        15 => "#FF8000",
        16 => "#C6A000",
        35 => "#A62929",
        53 => "#940094",
        _ => "#000000",
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
