//! Oriented planes used both as polygon supports and as BSP splitting planes.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Plane classification bit flags. A polygon's class is the OR of its vertices' classes,
// so FRONT | BACK == SPANNING.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in 3D space defined by a unit normal and an offset,
/// such that `normal · p == w` for every point `p` on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and an offset.
    /// The normal is normalized, the offset is kept as given.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Create a plane through three points, oriented by the right-hand rule `(b-a) × (c-a)`.
    ///
    /// Returns `None` when the points are (nearly) collinear. Callers building planes from
    /// mesh faces should skip such faces rather than abort.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let cross = (b - a).cross(&(c - a));
        let len = cross.norm();
        if len < EPSILON {
            return None;
        }

        let normal = cross / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Plane through the first three vertices of a loop, if they are not collinear.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        match vertices {
            [a, b, c, ..] => Self::from_points(&a.pos, &b.pos, &c.pos),
            _ => None,
        }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane in place (reverse normal and offset).
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane.
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point: [`COPLANAR`] within `EPSILON`, otherwise [`FRONT`] or [`BACK`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t.abs() < EPSILON {
            COPLANAR
        } else if t > 0.0 {
            FRONT
        } else {
            BACK
        }
    }

    /// Classify a vertex by its position.
    pub fn classify(&self, vertex: &Vertex) -> i8 {
        self.orient_point(&vertex.pos)
    }

    /// Classify a polygon: the OR of all its vertex classes.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.classify(v))
    }

    /// Split `polygon` by this plane, pushing the results into the four buckets.
    ///
    /// * coplanar polygons go to `coplanar_front` when they face the same way as this plane,
    ///   to `coplanar_back` otherwise,
    /// * polygons entirely on one side go unchanged to `front` or `back`,
    /// * spanning polygons are cut along the plane; each side with at least three vertices
    ///   becomes a new polygon carrying the original plane and shared data.
    pub fn split_polygon_into(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let types: Vec<i8> = polygon.vertices.iter().map(|v| self.classify(v)).collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(n + 1);
                let mut split_back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    // j is the vertex following i, wrapping around to close the loop
                    let j = (i + 1) % n;
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    // On-plane vertices belong to both halves
                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        // Both endpoints are farther than EPSILON on opposite sides, so denom
                        // cannot vanish; the guard only protects against non-finite input.
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t);
                            split_front.push(vertex_new);
                            split_back.push(vertex_new);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::new(
                        split_front,
                        polygon.plane.clone(),
                        polygon.shared.clone(),
                    ));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::new(
                        split_back,
                        polygon.plane.clone(),
                        polygon.shared.clone(),
                    ));
                }
            },
        }
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        self.split_polygon_into(
            polygon,
            &mut coplanar_front,
            &mut coplanar_back,
            &mut front,
            &mut back,
        );
        (coplanar_front, coplanar_back, front, back)
    }
}
