//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use bspcsg::{Csg, Polygon, SharedData, Vertex, VertexData, float_types::Real};
use nalgebra::{Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices; the normal is derived from
/// the winding.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let positions: Vec<Point3<Real>> =
        points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect();
    let normal = (positions[1] - positions[0])
        .cross(&(positions[2] - positions[0]))
        .normalize();
    let vertices = positions.into_iter().map(|p| Vertex::new(p, normal)).collect();
    Polygon::from_vertices(vertices, SharedData::default()).expect("non-degenerate polygon")
}

/// Axis-aligned box as 12 outward-wound triangles with per-face normals (24 vertices).
pub fn cuboid_data(min: [Real; 3], max: [Real; 3]) -> VertexData {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;

    // Each face: outward normal and its corners counter-clockwise seen from outside
    let faces: [(Vector3<Real>, [[Real; 3]; 4]); 6] = [
        (-Vector3::x(), [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
        (Vector3::x(), [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
        (-Vector3::y(), [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
        (Vector3::y(), [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
        (-Vector3::z(), [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
        (Vector3::z(), [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
    ];

    let mut data = VertexData::default();
    for (normal, corners) in faces {
        let base = data.positions.len() as u32;
        for [x, y, z] in corners {
            data.positions.push(Point3::new(x, y, z));
            data.normals.push(normal);
        }
        data.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

/// Axis-aligned box solid.
pub fn cuboid(min: [Real; 3], max: [Real; 3]) -> Csg {
    Csg::from_vertex_data(&cuboid_data(min, max)).expect("valid box data")
}

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`.
pub fn bounding_box(csg: &Csg) -> [Real; 6] {
    let aabb = csg.bounding_box().expect("non-empty solid");
    [
        aabb.mins.x,
        aabb.mins.y,
        aabb.mins.z,
        aabb.maxs.x,
        aabb.maxs.y,
        aabb.maxs.z,
    ]
}

/// Every vertex lies within `eps` of the closed box `[min, max]`.
pub fn within_box(csg: &Csg, min: [Real; 3], max: [Real; 3], eps: Real) -> bool {
    csg.polygons.iter().flat_map(|p| p.vertices.iter()).all(|v| {
        (0..3).all(|i| v.pos[i] >= min[i] - eps && v.pos[i] <= max[i] + eps)
    })
}
