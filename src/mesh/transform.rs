//! The single transform record a [`Csg`](crate::Csg) carries as metadata.
//!
//! Booleans work purely on world-space polygons; the transform only tells
//! [`Csg::build_mesh_geometry`](crate::Csg::build_mesh_geometry) which local space to map the
//! result back into. Matrix and Euler views are derived on demand, never stored.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Translation · Rotation · Scaling, applied to points as `T * R * S * p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<Real>,
    pub rotation: UnitQuaternion<Real>,
    pub scaling: Vector3<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scaling: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn new(
        translation: Vector3<Real>,
        rotation: UnitQuaternion<Real>,
        scaling: Vector3<Real>,
    ) -> Self {
        Transform {
            translation,
            rotation,
            scaling,
        }
    }

    /// Build from Euler angles in radians (roll about X, pitch about Y, yaw about Z).
    pub fn from_euler(
        translation: Vector3<Real>,
        roll: Real,
        pitch: Real,
        yaw: Real,
        scaling: Vector3<Real>,
    ) -> Self {
        Self::new(
            translation,
            UnitQuaternion::from_euler_angles(roll, pitch, yaw),
            scaling,
        )
    }

    /// Decompose an affine matrix into translation, rotation and scaling.
    ///
    /// Shear is not representable and is discarded. A negative determinant is folded into
    /// the X scale. Returns `None` when the linear part is singular.
    pub fn from_matrix(matrix: &Matrix4<Real>) -> Option<Self> {
        let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();

        let mut scaling = Vector3::new(
            linear.column(0).norm(),
            linear.column(1).norm(),
            linear.column(2).norm(),
        );
        if scaling.iter().any(|s| *s < EPSILON) {
            return None;
        }
        if linear.determinant() < 0.0 {
            scaling.x = -scaling.x;
        }

        let mut rotation = linear;
        for (i, s) in scaling.iter().enumerate() {
            let mut column = rotation.column_mut(i);
            column /= *s;
        }
        let rotation = UnitQuaternion::from_rotation_matrix(
            &Rotation3::from_matrix_unchecked(rotation),
        );

        Some(Transform {
            translation,
            rotation,
            scaling,
        })
    }

    /// The 4×4 homogeneous matrix `T * R * S`.
    pub fn matrix(&self) -> Matrix4<Real> {
        Translation3::from(self.translation).to_homogeneous()
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scaling)
    }

    /// Rotation as `(roll, pitch, yaw)` in radians.
    pub fn rotation_euler(&self) -> (Real, Real, Real) {
        self.rotation.euler_angles()
    }

    pub fn is_identity(&self) -> bool {
        self.translation.norm() < EPSILON
            && self.rotation.angle() < EPSILON
            && (self.scaling - Vector3::new(1.0, 1.0, 1.0)).norm() < EPSILON
    }
}
