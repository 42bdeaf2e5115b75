//! `Csg` struct: a solid as a flat polygon list, with boolean operations built on BSP trees

use crate::aabb::Aabb;
use crate::float_types::Real;
use nalgebra::Matrix4;
use crate::mesh::{
    bsp::{BspLimits, BspOps, Node, SerialBspOps},
    polygon::Polygon,
    transform::Transform,
};
use log::debug;

pub mod bsp;
pub mod conversion;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod transform;
pub mod vertex;
pub mod vertex_data;

/// A closed solid described by its boundary polygons in world space.
///
/// Boolean operations build two BSP trees from scratch, let them clip each other and read
/// the surviving polygons back. Trees never outlive the call, so independent `Csg` values
/// can be combined from different threads without any locking.
///
/// Polygon counts can grow quickly on near-coplanar or heavily interpenetrating inputs,
/// since every split can double a polygon. This is inherent to plane-splitting BSP; the
/// [`BspLimits`] stored on the solid bound how far tree construction goes.
#[derive(Clone, Debug)]
pub struct Csg {
    /// Boundary polygons, not yet partitioned
    pub polygons: Vec<Polygon>,

    /// Transform metadata; booleans never consult it
    pub transform: Transform,

    /// Frame `transform` is expressed in, i.e. the host parent's world matrix.
    /// Identity unless the solid was imported from a parented mesh.
    pub parent_matrix: Matrix4<Real>,

    /// Resource guard applied when this solid is the left operand of a boolean
    pub limits: BspLimits,
}

impl Default for Csg {
    fn default() -> Self {
        Csg {
            polygons: Vec::new(),
            transform: Transform::identity(),
            parent_matrix: Matrix4::identity(),
            limits: BspLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

impl Csg {
    /// Returns a new empty Csg
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a Csg from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        Csg {
            polygons: polygons.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_limits(mut self, limits: BspLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub const fn parent_matrix(&self) -> &Matrix4<Real> {
        &self.parent_matrix
    }

    pub fn set_parent_matrix(&mut self, parent_matrix: Matrix4<Real>) {
        self.parent_matrix = parent_matrix;
    }

    /// Local-to-world matrix the polygons were baked with: `parent_matrix * transform`.
    pub fn world_matrix(&self) -> Matrix4<Real> {
        self.parent_matrix * self.transform.matrix()
    }

    /// Copy `other`'s transform metadata (never its geometry) onto `self`.
    ///
    /// Booleans work in world space and keep the left operand's transform; use this to
    /// choose a different one for the result.
    pub fn copy_transform_attributes(&mut self, other: &Csg) -> &mut Self {
        self.transform = other.transform;
        self.parent_matrix = other.parent_matrix;
        self
    }

    fn bsp_ops(&self) -> SerialBspOps {
        SerialBspOps::new().with_limits(self.limits)
    }

    fn boolean_polygons(&self, other: &Csg, op: BooleanOp) -> Vec<Polygon> {
        // A tree without planes cannot stand for "everything", so the inverted-empty
        // cases are answered directly.
        match (op, self.polygons.is_empty(), other.polygons.is_empty()) {
            (BooleanOp::Union, true, _) => return other.polygons.clone(),
            (BooleanOp::Union, _, true) | (BooleanOp::Subtract, _, true) => {
                return self.polygons.clone();
            },
            (BooleanOp::Subtract, true, _) | (BooleanOp::Intersect, true, _) => return Vec::new(),
            (BooleanOp::Intersect, _, true) => return Vec::new(),
            _ => {},
        }

        let ops = self.bsp_ops();
        let mut a = Node::new();
        let mut b = Node::new();
        ops.build(&mut a, &self.polygons);
        ops.build(&mut b, &other.polygons);

        match op {
            BooleanOp::Union => {
                ops.clip_to(&mut a, &b);
                ops.clip_to(&mut b, &a);
                ops.invert(&mut b);
                ops.clip_to(&mut b, &a);
                ops.invert(&mut b);
                ops.build(&mut a, &ops.all_polygons(&b));
            },
            BooleanOp::Subtract => {
                ops.invert(&mut a);
                ops.clip_to(&mut a, &b);
                ops.clip_to(&mut b, &a);
                ops.invert(&mut b);
                ops.clip_to(&mut b, &a);
                ops.invert(&mut b);
                ops.build(&mut a, &ops.all_polygons(&b));
                ops.invert(&mut a);
            },
            BooleanOp::Intersect => {
                ops.invert(&mut a);
                ops.clip_to(&mut b, &a);
                ops.invert(&mut b);
                ops.clip_to(&mut a, &b);
                ops.clip_to(&mut b, &a);
                ops.build(&mut a, &ops.all_polygons(&b));
                ops.invert(&mut a);
            },
        }

        let polygons = ops.all_polygons(&a);
        debug!(
            "{:?}: {} + {} polygons -> {} polygons (tree depth {})",
            op,
            self.polygons.len(),
            other.polygons.len(),
            polygons.len(),
            a.depth()
        );
        polygons
    }

    fn with_polygons(&self, polygons: Vec<Polygon>) -> Csg {
        Csg {
            polygons,
            transform: self.transform,
            parent_matrix: self.parent_matrix,
            limits: self.limits,
        }
    }

    /// Return a new Csg representing union of the two solids.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union(&self, other: &Csg) -> Csg {
        self.with_polygons(self.boolean_polygons(other, BooleanOp::Union))
    }

    pub fn union_in_place(&mut self, other: &Csg) {
        self.polygons = self.boolean_polygons(other, BooleanOp::Union);
    }

    /// Return a new Csg representing the space in `self` but not in `other`.
    ///
    /// ```text
    /// let c = a.subtract(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn subtract(&self, other: &Csg) -> Csg {
        self.with_polygons(self.boolean_polygons(other, BooleanOp::Subtract))
    }

    pub fn subtract_in_place(&mut self, other: &Csg) {
        self.polygons = self.boolean_polygons(other, BooleanOp::Subtract);
    }

    /// Return a new Csg representing the space in both solids.
    ///
    /// ```text
    /// let c = a.intersect(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersect(&self, other: &Csg) -> Csg {
        self.with_polygons(self.boolean_polygons(other, BooleanOp::Intersect))
    }

    pub fn intersect_in_place(&mut self, other: &Csg) {
        self.polygons = self.boolean_polygons(other, BooleanOp::Intersect);
    }

    /// Space in exactly one of the two solids: `(a - b) ∪ (b - a)`.
    pub fn xor(&self, other: &Csg) -> Csg {
        let a_sub_b = self.subtract(other);
        let b_sub_a = other.subtract(self);
        a_sub_b.union(&b_sub_a)
    }

    /// Invert this solid (flip inside vs. outside). No tree is needed: every polygon flips.
    pub fn inverse(&self) -> Csg {
        self.with_polygons(self.polygons.iter().map(Polygon::flipped).collect())
    }

    pub fn inverse_in_place(&mut self) {
        self.polygons.iter_mut().for_each(Polygon::flip);
    }

    /// Enclosed volume by the divergence theorem over the fan triangles.
    ///
    /// Only meaningful for closed, consistently wound shells. T-junctions left by splitting
    /// do not affect the result.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(Polygon::triangulate)
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Total area of all polygons.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Bounding box of every vertex, or `None` when there are no polygons.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.polygons
                .iter()
                .flat_map(|p| p.vertices.iter().map(|v| &v.pos)),
        )
    }
}
