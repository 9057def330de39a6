//! Triangulation of the loaded half-diamond

use serde::Serialize;

use crate::error::{DowelError, DowelResult};
use crate::geometry::{DiamondGeometry, Point2, StationLayout};

/// Triangles below this area (mm²) are treated as degenerate
pub const MIN_ELEMENT_AREA: f64 = 1e-9;

/// Node and connectivity data for the FE path.
///
/// Nodes are exactly [`DiamondGeometry::mesh_points`]. Each strip between two
/// stations is split into quads and each quad into two triangles; the last
/// strip fans into the tip node. Every triangle is counter-clockwise.
#[derive(Debug, Clone, Serialize)]
pub struct HalfDiamondMesh {
    pub nodes: Vec<Point2>,
    pub triangles: Vec<[usize; 3]>,
    #[serde(skip)]
    layout: StationLayout,
}

impl HalfDiamondMesh {
    pub fn generate(geometry: &DiamondGeometry, divisions: usize) -> DowelResult<Self> {
        let layout = StationLayout::new(divisions);
        let nodes = geometry.mesh_points(divisions);
        let per = layout.per_station();
        let mut triangles = Vec::with_capacity(2 * layout.stations * (per - 1));

        for i in 0..layout.stations {
            for j in 0..per - 1 {
                let a = layout.index(i, j);
                let d = layout.index(i, j + 1);
                if i + 1 < layout.stations {
                    let b = layout.index(i + 1, j);
                    let c = layout.index(i + 1, j + 1);
                    triangles.push([a, b, c]);
                    triangles.push([a, c, d]);
                } else {
                    triangles.push([a, layout.tip_index(), d]);
                }
            }
        }

        // Orient counter-clockwise and reject slivers
        for tri in triangles.iter_mut() {
            let area = signed_area(&nodes[tri[0]], &nodes[tri[1]], &nodes[tri[2]]);
            if area.abs() < MIN_ELEMENT_AREA {
                return Err(DowelError::IllConditionedMesh(format!(
                    "triangle {:?} has area {area:e} mm²",
                    tri
                )));
            }
            if area < 0.0 {
                tri.swap(1, 2);
            }
        }

        log::debug!(
            "Generated half-diamond mesh: {} nodes, {} triangles",
            nodes.len(),
            triangles.len()
        );

        Ok(Self {
            nodes,
            triangles,
            layout,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn tip_node(&self) -> usize {
        self.layout.tip_index()
    }

    /// Nodes on the loaded edge (x = 0), bottom to top
    pub fn base_nodes(&self) -> Vec<usize> {
        (0..self.layout.per_station())
            .map(|j| self.layout.index(0, j))
            .collect()
    }

    /// Corner coordinates of triangle `e`
    pub fn element_points(&self, e: usize) -> [Point2; 3] {
        let [a, b, c] = self.triangles[e];
        [self.nodes[a], self.nodes[b], self.nodes[c]]
    }

    /// Total meshed area; equals `d²` for an exact triangulation
    pub fn total_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|e| {
                let [a, b, c] = self.element_points(e);
                signed_area(&a, &b, &c)
            })
            .sum()
    }
}

/// Signed area of triangle abc; positive when counter-clockwise
pub fn signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_covers_half_diamond() {
        let g = DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap();
        for divisions in [1, 2, 5, 12] {
            let mesh = HalfDiamondMesh::generate(&g, divisions).unwrap();
            assert_relative_eq!(mesh.total_area(), g.half_area(), max_relative = 1e-9);
        }
    }

    #[test]
    fn test_triangles_are_ccw() {
        let g = DiamondGeometry::from_mm(100.0, 6.35, 3.0).unwrap();
        let mesh = HalfDiamondMesh::generate(&g, 8).unwrap();
        for e in 0..mesh.element_count() {
            let [a, b, c] = mesh.element_points(e);
            assert!(signed_area(&a, &b, &c) > 0.0);
        }
        assert_eq!(mesh.base_nodes().len(), 9);
        assert!(mesh.base_nodes().iter().all(|&n| mesh.nodes[n].x == 0.0));
    }
}
