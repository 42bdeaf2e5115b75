//! Traits defining BSP tree operations and splitting-plane selection

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps {
    /// Invert all polygons in the BSP tree, turning it into the tree of the complement solid
    fn invert(&self, node: &mut Node);

    /// Remove the parts of `polygons` that lie inside the solid represented by `node`
    fn clip_polygons(&self, node: &Node, polygons: &[Polygon]) -> Vec<Polygon>;

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    fn clip_to(&self, node: &mut Node, other: &Node);

    /// Build (or extend) a BSP tree from the given polygons
    fn build(&self, node: &mut Node, polygons: &[Polygon]);

    /// Return all polygons in this BSP tree
    fn all_polygons(&self, node: &Node) -> Vec<Polygon>;
}

/// Trait for picking the splitting plane of a node that has none yet
pub trait SplittingPlaneStrategy {
    /// Pick a splitting plane from a non-empty set of polygons
    fn pick_splitting_plane(&self, polygons: &[Polygon]) -> Plane;
}

/// Use the plane of the first incoming polygon.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl SplittingPlaneStrategy for FirstPolygonStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon]) -> Plane {
        polygons[0].plane.clone()
    }
}

/// Score candidate planes by how many polygons they would cut and how evenly they
/// divide the rest; lower is better.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    /// Number of leading polygons tried as candidates
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl SplittingPlaneStrategy for BalancedSplittingStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon]) -> Plane {
        let mut best_plane = &polygons[0].plane;
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size.max(1)) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly) {
                    COPLANAR => (0, 0, 0),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0i64, 0i64, 0i64), |acc, x| {
                    (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2)
                });

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = plane;
            }
        }

        best_plane.clone()
    }
}

/// Resource guard for tree construction.
///
/// Splitting can multiply polygon counts on near-coplanar or heavily interpenetrating input.
/// When a node sits at `max_depth`, or the tree already stores `max_polygons`, incoming
/// polygons are kept at that node without further splitting. The result is still a valid
/// polygon set but boolean results near the truncated region may be inexact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspLimits {
    pub max_depth: usize,
    pub max_polygons: usize,
}

impl Default for BspLimits {
    fn default() -> Self {
        Self {
            max_depth: 4096,
            max_polygons: 1_000_000,
        }
    }
}

impl BspLimits {
    /// No effective limit.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_polygons: usize::MAX,
        }
    }
}
