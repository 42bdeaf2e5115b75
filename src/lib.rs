//! **Constructive Solid Geometry (CSG)** on triangle meshes, built around Boolean
//! operations (*union*, *subtract*, *intersect*, *xor*) on polygon sets partitioned by
//! [BSP](mesh::bsp) trees.
//!
//! A [`Csg`] is a flat list of convex polygons in world space plus transform metadata.
//! Import one from host vertex data, combine solids, then export fan-triangulated vertex
//! data again:
//!
//! ```
//! use bspcsg::{Csg, Vertex, Polygon, SharedData};
//! use nalgebra::{Point3, Vector3};
//!
//! let tri = Polygon::from_vertices(
//!     vec![
//!         Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
//!         Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
//!         Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
//!     ],
//!     SharedData::default(),
//! )
//! .unwrap();
//! let csg = Csg::from_polygons(&[tri]);
//! let data = csg.to_vertex_data();
//! assert_eq!(data.triangle_count(), 1);
//! ```
//!
//! The crate logs through the [`log`] facade: tree truncation under [`BspLimits`] is a
//! `warn!`, boolean summaries and skipped degenerate input are `debug!`.

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod errors;
pub mod float_types;
pub mod mesh;

pub use aabb::Aabb;
pub use errors::CsgError;
pub use mesh::Csg;
pub use mesh::bsp::{BalancedSplittingStrategy, BspLimits, FirstPolygonStrategy, Node};
pub use mesh::plane::Plane;
pub use mesh::polygon::{Polygon, SharedData};
pub use mesh::transform::Transform;
pub use mesh::vertex::Vertex;
pub use mesh::vertex_data::{HostMesh, MeshFactory, MeshGeometry, SubMesh, VertexData};
