use crate::float_types::{EPSILON, Real};
use crate::mesh::Csg;
use hashbrown::HashMap;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct QuantizedPoint(i64, i64, i64);

impl QuantizedPoint {
    pub(crate) fn new(p: &Point3<Real>) -> Self {
        QuantizedPoint(quantize(p.x), quantize(p.y), quantize(p.z))
    }
}

/// Snap a coordinate onto the `EPSILON` grid.
pub(crate) fn quantize(value: Real) -> i64 {
    (value / EPSILON).round() as i64
}

impl Csg {
    /// Checks whether the fan-triangulated shell is closed
    ///
    /// ### Returns
    /// `true` if every undirected edge is used exactly twice, each time in opposite
    /// directions (consistent winding), and there is at least one polygon.
    ///
    /// ### Notes:
    /// - Positions are snapped to the `EPSILON` grid before comparison.
    /// - Boolean results usually contain T-junctions where one face was split and its
    ///   neighbour was not; such shells are watertight but fail this edge test.
    pub fn is_closed(&self) -> bool {
        if self.polygons.is_empty() {
            return false;
        }

        // Counts (forward, backward) uses of each undirected edge
        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), (u32, u32)> =
            HashMap::new();

        for tri in self.polygons.iter().flat_map(|p| p.triangulate()) {
            for (i0, i1) in [(0, 1), (1, 2), (2, 0)] {
                let p0 = QuantizedPoint::new(&tri[i0].pos);
                let p1 = QuantizedPoint::new(&tri[i1].pos);
                if p0 == p1 {
                    continue;
                }

                // Order them so (p0, p1) and (p1, p0) become the same key
                if p0 < p1 {
                    edge_counts.entry((p0, p1)).or_default().0 += 1;
                } else {
                    edge_counts.entry((p1, p0)).or_default().1 += 1;
                }
            }
        }

        edge_counts.values().all(|&counts| counts == (1, 1))
    }
}
