//! Convex planar polygons and the per-polygon payload carried through splitting.

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Vector3;
use std::sync::Arc;

/// Per-polygon payload propagated unchanged through cloning, splitting and flipping.
///
/// `mesh_id` and `sub_mesh_id` record where a face came from; `material_index` is what
/// [`Csg::build_mesh_geometry`](crate::Csg::build_mesh_geometry) groups sub-meshes by.
/// `extension` is an opaque caller tag that is shared, not copied, between fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SharedData {
    pub mesh_id: u32,
    pub sub_mesh_id: u32,
    pub material_index: u32,
    pub extension: Option<Arc<str>>,
}

impl SharedData {
    /// Payload carrying only a material index.
    pub fn material(material_index: u32) -> Self {
        SharedData {
            material_index,
            ..Default::default()
        }
    }
}

/// A convex, coplanar loop of vertices with consistent winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    pub shared: SharedData,
}

impl Polygon {
    /// Build a polygon from vertices and an already known supporting plane.
    ///
    /// Used for split fragments, which keep their parent's plane instead of re-deriving one
    /// from possibly tiny sub-loops.
    pub const fn new(vertices: Vec<Vertex>, plane: Plane, shared: SharedData) -> Self {
        Polygon {
            vertices,
            plane,
            shared,
        }
    }

    /// Build a polygon deriving its plane from the first three vertices.
    ///
    /// Returns `None` for fewer than three vertices or a collinear leading triple.
    pub fn from_vertices(vertices: Vec<Vertex>, shared: SharedData) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_vertices(&vertices)?;
        Some(Polygon::new(vertices, plane, shared))
    }

    /// Reverse winding order, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Return a flipped copy of this polygon.
    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Iterate over the closed loop of edges `(v[i], v[i+1])`.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan triangulation: `(v0, v[i], v[i+1])` for `i in 1..n-1`.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let Some((first, rest)) = self.vertices.split_first() else {
            return Vec::new();
        };
        rest.windows(2)
            .map(|pair| [*first, pair[0], pair[1]])
            .collect()
    }

    /// Vector area (half the sum of fan-triangle cross products).
    pub fn area_vector(&self) -> Vector3<Real> {
        self.triangulate()
            .iter()
            .fold(Vector3::zeros(), |acc, [a, b, c]| {
                acc + (b.pos - a.pos).cross(&(c.pos - a.pos))
            })
            * 0.5
    }

    /// Surface area of the polygon.
    pub fn area(&self) -> Real {
        self.area_vector().norm()
    }
}
