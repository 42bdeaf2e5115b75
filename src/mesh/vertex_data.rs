//! Indexed triangle buffers exchanged with the host mesh system.

use crate::errors::CsgError;
use crate::float_types::Real;
use crate::mesh::transform::Transform;
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

/// An indexed triangle list: per-vertex attribute buffers plus three indices per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexData {
    pub positions: Vec<Point3<Real>>,
    pub normals: Vec<Vector3<Real>>,
    pub uvs: Option<Vec<Vector2<Real>>>,
    pub colors: Option<Vec<Vector4<Real>>>,
    pub indices: Vec<u32>,
}

impl VertexData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check buffer lengths, index ranges and coordinate finiteness.
    pub fn validate(&self) -> Result<(), CsgError> {
        let expected = self.positions.len();

        let check_len = |attribute: &'static str, found: usize| {
            if found == expected {
                Ok(())
            } else {
                Err(CsgError::MismatchedAttribute {
                    attribute,
                    expected,
                    found,
                })
            }
        };
        check_len("normals", self.normals.len())?;
        if let Some(uvs) = &self.uvs {
            check_len("uvs", uvs.len())?;
        }
        if let Some(colors) = &self.colors {
            check_len("colors", colors.len())?;
        }

        if self.indices.len() % 3 != 0 {
            return Err(CsgError::IncompleteTriangle(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= expected) {
            return Err(CsgError::IndexOutOfRange {
                index,
                vertex_count: expected,
            });
        }

        if let Some(p) = self
            .positions
            .iter()
            .find(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(CsgError::InvalidCoordinate(*p));
        }

        Ok(())
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

/// A contiguous run of the index buffer drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    pub material_index: u32,
    pub index_start: usize,
    pub index_count: usize,
}

impl SubMesh {
    /// Whether the index at `position` in the index buffer belongs to this sub-mesh.
    pub const fn contains(&self, position: usize) -> bool {
        position >= self.index_start && position < self.index_start + self.index_count
    }
}

/// Vertex data together with its material partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub vertex_data: VertexData,
    pub sub_meshes: Vec<SubMesh>,
}

/// What a host mesh must expose to be turned into a [`Csg`](crate::Csg).
pub trait HostMesh {
    /// Geometry in the mesh's local space.
    fn geometry(&self) -> MeshGeometry;

    /// Local-to-world matrix, including any parent transforms.
    fn world_matrix(&self) -> Matrix4<Real>;

    /// The mesh's own translation / rotation / scaling.
    fn local_transform(&self) -> Transform;
}

/// Host-side constructor for renderable meshes.
pub trait MeshFactory {
    type Mesh;

    /// Create a mesh from local-space geometry placed with `transform`.
    fn create_mesh(&mut self, geometry: MeshGeometry, transform: &Transform) -> Self::Mesh;
}
