//! Errors raised at the mesh boundary

use crate::float_types::Real;
use nalgebra::Point3;

/// Everything that can go wrong while turning host mesh data into polygons, or polygons back
/// into host mesh data.
///
/// The boolean machinery itself never fails; it only ever produces a (possibly empty) polygon set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// A per-vertex attribute buffer does not match the position buffer
    #[error("(MismatchedAttribute) {attribute} has {found} entries, expected {expected}")]
    MismatchedAttribute {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    /// An index points past the end of the vertex buffers
    #[error("(IndexOutOfRange) index {index} is out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// The index buffer length is not a multiple of three
    #[error("(IncompleteTriangle) index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    /// A coordinate is NaN or infinite
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite component")]
    InvalidCoordinate(Point3<Real>),
    /// The stored transform cannot be inverted to map geometry back into local space
    #[error("(NonInvertibleTransform) the transform matrix is singular")]
    NonInvertibleTransform,
}
