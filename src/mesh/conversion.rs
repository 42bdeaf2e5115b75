//! Conversion between [`Csg`] polygons and indexed triangle data

use crate::errors::CsgError;
use crate::float_types::{EPSILON, Real};
use crate::mesh::Csg;
use crate::mesh::manifold::quantize;
use crate::mesh::polygon::{Polygon, SharedData};
use crate::mesh::transform::Transform;
use crate::mesh::vertex::Vertex;
use crate::mesh::vertex_data::{HostMesh, MeshFactory, MeshGeometry, SubMesh, VertexData};
use hashbrown::HashMap;
use log::debug;
use nalgebra::{Matrix3, Matrix4, Vector2, Vector4};
use std::sync::atomic::{AtomicU32, Ordering};

/// Source of the `mesh_id` stamped on polygons imported with [`Csg::from_mesh`].
static NEXT_MESH_ID: AtomicU32 = AtomicU32::new(0);

/// Affine map applied to vertices on their way in or out.
struct VertexMapping {
    points: Matrix4<Real>,
    normals: Matrix3<Real>,
    /// The map mirrors space, so triangle winding must be reversed
    mirrors: bool,
}

impl VertexMapping {
    /// Points go through `matrix`, normals through its inverse transpose.
    fn new(matrix: Matrix4<Real>) -> Result<Self, CsgError> {
        let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normals = linear
            .try_inverse()
            .ok_or(CsgError::NonInvertibleTransform)?
            .transpose();
        Ok(VertexMapping {
            points: matrix,
            normals,
            mirrors: linear.determinant() < 0.0,
        })
    }

    fn apply(&self, vertex: &Vertex) -> Vertex {
        let normal = self.normals * vertex.normal;
        let len = normal.norm();
        Vertex {
            pos: self.points.transform_point(&vertex.pos),
            normal: if len > EPSILON { normal / len } else { normal },
            ..*vertex
        }
    }
}

/// Turn validated triangle data into polygons, skipping degenerate faces.
fn polygons_from_triangles(
    data: &VertexData,
    sub_meshes: &[SubMesh],
    mapping: Option<&VertexMapping>,
    mesh_id: u32,
) -> Result<Vec<Polygon>, CsgError> {
    data.validate()?;

    let vertex_at = |i: usize| {
        let mut vertex = Vertex::new(data.positions[i], data.normals[i]);
        vertex.uv = data.uvs.as_ref().map(|uvs| uvs[i]);
        vertex.color = data.colors.as_ref().map(|colors| colors[i]);
        match mapping {
            Some(mapping) => mapping.apply(&vertex),
            None => vertex,
        }
    };

    let mut skipped = 0usize;
    let mut polygons = Vec::with_capacity(data.triangle_count());
    for (face, tri) in data.triangles().enumerate() {
        let (sub_mesh_id, material_index) = sub_meshes
            .iter()
            .enumerate()
            .find(|(_, sub)| sub.contains(face * 3))
            .map_or((0, 0), |(i, sub)| (i as u32, sub.material_index));

        let mut vertices = tri.map(vertex_at).to_vec();
        if mapping.is_some_and(|m| m.mirrors) {
            vertices.reverse();
        }

        let shared = SharedData {
            mesh_id,
            sub_mesh_id,
            material_index,
            extension: None,
        };
        match Polygon::from_vertices(vertices, shared) {
            Some(polygon) => polygons.push(polygon),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("skipped {skipped} degenerate triangles out of {}", data.triangle_count());
    }
    Ok(polygons)
}

/// Accumulates fan triangles into vertex data, merging identical vertices.
struct VertexDataBuilder<'a> {
    data: VertexData,
    lookup: HashMap<[i64; 12], u32>,
    mapping: Option<&'a VertexMapping>,
}

impl<'a> VertexDataBuilder<'a> {
    fn new(polygons: &[Polygon], mapping: Option<&'a VertexMapping>) -> Self {
        let vertices = || polygons.iter().flat_map(|p| p.vertices.iter());
        let has_uv = vertices().any(|v| v.uv.is_some());
        let has_color = vertices().any(|v| v.color.is_some());

        VertexDataBuilder {
            data: VertexData {
                uvs: has_uv.then(Vec::new),
                colors: has_color.then(Vec::new),
                ..Default::default()
            },
            lookup: HashMap::new(),
            mapping,
        }
    }

    fn key(vertex: &Vertex) -> [i64; 12] {
        const ABSENT: i64 = i64::MIN;
        let mut key = [ABSENT; 12];
        for (slot, c) in key[0..3].iter_mut().zip(vertex.pos.iter()) {
            *slot = quantize(*c);
        }
        for (slot, c) in key[3..6].iter_mut().zip(vertex.normal.iter()) {
            *slot = quantize(*c);
        }
        if let Some(uv) = vertex.uv {
            for (slot, c) in key[6..8].iter_mut().zip(uv.iter()) {
                *slot = quantize(*c);
            }
        }
        if let Some(color) = vertex.color {
            for (slot, c) in key[8..12].iter_mut().zip(color.iter()) {
                *slot = quantize(*c);
            }
        }
        key
    }

    fn push_vertex(&mut self, vertex: &Vertex) -> u32 {
        let vertex = match self.mapping {
            Some(mapping) => mapping.apply(vertex),
            None => *vertex,
        };

        let data = &mut self.data;
        *self.lookup.entry(Self::key(&vertex)).or_insert_with(|| {
            data.positions.push(vertex.pos);
            data.normals.push(vertex.normal);
            if let Some(uvs) = data.uvs.as_mut() {
                uvs.push(vertex.uv.unwrap_or_else(Vector2::zeros));
            }
            if let Some(colors) = data.colors.as_mut() {
                colors.push(vertex.color.unwrap_or_else(|| Vector4::new(1.0, 1.0, 1.0, 1.0)));
            }
            (data.positions.len() - 1) as u32
        })
    }

    fn push_polygon(&mut self, polygon: &Polygon) {
        let mirrors = self.mapping.is_some_and(|m| m.mirrors);
        for [a, b, c] in polygon.triangulate() {
            let (a, b, c) = if mirrors { (a, c, b) } else { (a, b, c) };
            let ia = self.push_vertex(&a);
            let ib = self.push_vertex(&b);
            let ic = self.push_vertex(&c);
            self.data.indices.extend([ia, ib, ic]);
        }
    }
}

impl Csg {
    /// Build a solid from world-space triangle data, one polygon per triangle.
    ///
    /// Collinear or zero-area triangles are skipped; malformed buffers are an error.
    pub fn from_vertex_data(data: &VertexData) -> Result<Csg, CsgError> {
        let polygons = polygons_from_triangles(data, &[], None, 0)?;
        Ok(Csg::from_polygons(&polygons))
    }

    /// Build a solid from a host mesh, baking its world matrix into the vertices.
    ///
    /// With `absolute` the stored transform is the identity, so the geometry is final as is.
    /// Otherwise the mesh's local transform is kept, the rest of its world matrix becomes
    /// the parent matrix, and [`build_mesh_geometry`](Csg::build_mesh_geometry) maps
    /// results back into the mesh's local space.
    pub fn from_mesh<M: HostMesh + ?Sized>(mesh: &M, absolute: bool) -> Result<Csg, CsgError> {
        let geometry = mesh.geometry();
        let world = mesh.world_matrix();
        let mapping = VertexMapping::new(world)?;
        let mesh_id = NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed);

        let polygons = polygons_from_triangles(
            &geometry.vertex_data,
            &geometry.sub_meshes,
            Some(&mapping),
            mesh_id,
        )?;

        let (transform, parent_matrix) = if absolute {
            (Transform::identity(), Matrix4::identity())
        } else {
            let local = mesh.local_transform();
            let local_inverse = local
                .matrix()
                .try_inverse()
                .ok_or(CsgError::NonInvertibleTransform)?;
            (local, world * local_inverse)
        };

        Ok(Csg {
            polygons,
            transform,
            parent_matrix,
            ..Default::default()
        })
    }

    /// Fan-triangulate every polygon into world-space vertex data.
    pub fn to_vertex_data(&self) -> VertexData {
        self.to_vertex_data_with(|_| {}, |_, _| {})
    }

    /// Like [`to_vertex_data`](Csg::to_vertex_data), calling `before` ahead of each polygon
    /// and `after` once its triangles have been appended.
    pub fn to_vertex_data_with<B, A>(&self, mut before: B, mut after: A) -> VertexData
    where
        B: FnMut(&Polygon),
        A: FnMut(&Polygon, &VertexData),
    {
        let mut builder = VertexDataBuilder::new(&self.polygons, None);
        for polygon in &self.polygons {
            before(polygon);
            builder.push_polygon(polygon);
            after(polygon, &builder.data);
        }
        builder.data
    }

    /// Local-space geometry ready for a renderer.
    ///
    /// Vertices are mapped through the inverse of [`world_matrix`](Csg::world_matrix), so
    /// placing the result with the stored transform under the same parent reproduces the
    /// world-space solid. With `keep_sub_meshes`, polygons are grouped by material (then by
    /// source mesh) and one [`SubMesh`] is emitted per material; otherwise a single
    /// sub-mesh with material 0 covers everything.
    pub fn build_mesh_geometry(&self, keep_sub_meshes: bool) -> Result<MeshGeometry, CsgError> {
        let world = self.world_matrix();
        let mapping = if world == Matrix4::identity() {
            None
        } else {
            let inverse = world
                .try_inverse()
                .ok_or(CsgError::NonInvertibleTransform)?;
            Some(VertexMapping::new(inverse)?)
        };

        let mut order: Vec<&Polygon> = self.polygons.iter().collect();
        if keep_sub_meshes {
            order.sort_by_key(|p| {
                (p.shared.material_index, p.shared.mesh_id, p.shared.sub_mesh_id)
            });
        }

        let mut builder = VertexDataBuilder::new(&self.polygons, mapping.as_ref());
        let mut sub_meshes: Vec<SubMesh> = Vec::new();
        for polygon in order {
            let start = builder.data.indices.len();
            builder.push_polygon(polygon);
            let count = builder.data.indices.len() - start;
            if count == 0 {
                continue;
            }

            let material_index = if keep_sub_meshes {
                polygon.shared.material_index
            } else {
                0
            };
            match sub_meshes.last_mut() {
                Some(last) if last.material_index == material_index => {
                    last.index_count += count
                },
                _ => sub_meshes.push(SubMesh {
                    material_index,
                    index_start: start,
                    index_count: count,
                }),
            }
        }

        Ok(MeshGeometry {
            vertex_data: builder.data,
            sub_meshes,
        })
    }

    /// Hand [`build_mesh_geometry`](Csg::build_mesh_geometry) to the host, placed with the
    /// stored transform.
    pub fn to_mesh<F: MeshFactory>(
        &self,
        factory: &mut F,
        keep_sub_meshes: bool,
    ) -> Result<F::Mesh, CsgError> {
        let geometry = self.build_mesh_geometry(keep_sub_meshes)?;
        Ok(factory.create_mesh(geometry, &self.transform))
    }
}
