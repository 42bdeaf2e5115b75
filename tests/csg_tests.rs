mod support;

use bspcsg::{BspLimits, Csg, Transform, float_types::Real};
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::support::{approx_eq, bounding_box, cuboid, within_box};

const VOLUME_EPS: Real = 1e-6;

// --------------------------------------------------------
//   Boolean scenarios on axis-aligned boxes
// --------------------------------------------------------

#[test]
fn union_of_overlapping_boxes() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    let union = a.union(&b);
    assert!(approx_eq(union.volume(), 15.0, VOLUME_EPS), "volume {}", union.volume());
    let bb = bounding_box(&union);
    for (got, want) in bb.iter().zip([0.0, 0.0, 0.0, 3.0, 3.0, 3.0]) {
        assert!(approx_eq(*got, want, 1e-9));
    }
}

#[test]
fn subtract_contained_box_leaves_cavity() {
    let outer = cuboid([0.0, 0.0, 0.0], [3.0, 3.0, 3.0]);
    let inner = cuboid([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);

    let result = outer.subtract(&inner);
    assert!(approx_eq(result.volume(), 26.0, VOLUME_EPS), "volume {}", result.volume());
    assert!(within_box(&result, [0.0; 3], [3.0; 3], 1e-9));
    assert!(approx_eq(bounding_box(&result)[3], 3.0, 1e-9));

    // The cavity keeps its 12 triangles, now facing into the hole
    let center = Point3::new(1.5, 1.5, 1.5);
    let cavity: Vec<_> = result
        .polygons
        .iter()
        .filter(|p| {
            p.vertices
                .iter()
                .all(|v| (0..3).all(|i| v.pos[i] >= 1.0 - 1e-9 && v.pos[i] <= 2.0 + 1e-9))
        })
        .collect();
    assert_eq!(cavity.len(), 12);
    for poly in &cavity {
        let to_center = center - poly.vertices[0].pos;
        assert!(poly.plane.normal().dot(&to_center) > 0.0);
    }

    // The rest is the outer shell: the cavity's planes split its faces into fragments,
    // but together they still cover each face of the box exactly once, facing out.
    let shell: Vec<_> = result
        .polygons
        .iter()
        .filter(|p| !cavity.iter().any(|c| std::ptr::eq(*c, *p)))
        .collect();
    assert!(shell.len() >= 12, "{} shell fragments", shell.len());
    let mut face_area = [[0.0 as Real; 2]; 3];
    for poly in &shell {
        let normal = poly.plane.normal();
        let axis = (0..3)
            .find(|&i| approx_eq(normal[i].abs(), 1.0, 1e-9))
            .expect("shell fragment is axis-aligned");
        let side = usize::from(normal[axis] > 0.0);
        let offset = 3.0 * side as Real;
        assert!(poly.vertices.iter().all(|v| approx_eq(v.pos[axis], offset, 1e-9)));
        face_area[axis][side] += poly.area();
    }
    for area in face_area.iter().flatten() {
        assert!(approx_eq(*area, 9.0, 1e-9), "face area {area}");
    }
}

#[test]
fn intersect_of_disjoint_boxes_is_empty() {
    let a = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let b = cuboid([5.0, 5.0, 5.0], [6.0, 6.0, 6.0]);

    let result = a.intersect(&b);
    assert!(result.is_empty());
    assert!(result.bounding_box().is_none());
}

#[test]
fn intersect_of_overlapping_boxes() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    let result = a.intersect(&b);
    assert!(approx_eq(result.volume(), 1.0, VOLUME_EPS));
    assert!(within_box(&result, [1.0; 3], [2.0; 3], 1e-9));
}

#[test]
fn inclusion_exclusion() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 3.0, 1.0]);
    let b = cuboid([1.0, 1.0, -1.0], [4.0, 2.0, 0.5]);

    let union = a.union(&b).volume();
    let intersection = a.intersect(&b).volume();
    // |A| = 6, |B| = 4.5, |A ∩ B| = 1 * 1 * 0.5
    assert!(approx_eq(intersection, 0.5, VOLUME_EPS));
    assert!(approx_eq(union, 6.0 + 4.5 - intersection, VOLUME_EPS));
}

#[test]
fn subtract_partial_overlap() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    let result = a.subtract(&b);
    assert!(approx_eq(result.volume(), 7.0, VOLUME_EPS));
    assert!(within_box(&result, [0.0; 3], [2.0; 3], 1e-9));
}

// --------------------------------------------------------
//   Algebraic laws
// --------------------------------------------------------

#[test]
fn union_with_itself_is_idempotent() {
    let a = cuboid([-1.0, 0.0, 2.0], [1.0, 1.5, 3.0]);
    let union = a.union(&a);
    assert!(approx_eq(union.volume(), a.volume(), VOLUME_EPS));
    assert!(approx_eq(union.surface_area(), a.surface_area(), VOLUME_EPS));
}

#[test]
fn subtract_from_itself_is_empty() {
    let a = cuboid([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
    let result = a.subtract(&a);
    assert!(approx_eq(result.volume(), 0.0, VOLUME_EPS));
}

#[test]
fn double_inverse_restores_polygons() {
    let a = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let inverted = a.inverse();
    assert!(approx_eq(inverted.volume(), -1.0, VOLUME_EPS));
    assert_eq!(inverted.inverse().polygons, a.polygons);

    let mut in_place = a.clone();
    in_place.inverse_in_place();
    assert_eq!(in_place.polygons, inverted.polygons);
}

#[test]
fn xor_volumes() {
    let outer = cuboid([0.0, 0.0, 0.0], [3.0, 3.0, 3.0]);
    let inner = cuboid([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
    assert!(approx_eq(outer.xor(&inner).volume(), 26.0, VOLUME_EPS));

    let far = cuboid([5.0, 0.0, 0.0], [6.0, 1.0, 1.0]);
    assert!(approx_eq(outer.xor(&far).volume(), 28.0, VOLUME_EPS));

    assert!(approx_eq(outer.xor(&outer).volume(), 0.0, VOLUME_EPS));
}

#[test]
fn empty_operands() {
    let a = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let empty = Csg::new();

    assert_eq!(a.union(&empty).polygons, a.polygons);
    assert_eq!(empty.union(&a).polygons, a.polygons);
    assert_eq!(a.subtract(&empty).polygons, a.polygons);
    assert!(empty.subtract(&a).is_empty());
    assert!(a.intersect(&empty).is_empty());
    assert!(empty.intersect(&a).is_empty());
}

#[test]
fn in_place_variants_match() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    let mut u = a.clone();
    u.union_in_place(&b);
    assert_eq!(u.polygons, a.union(&b).polygons);

    let mut s = a.clone();
    s.subtract_in_place(&b);
    assert_eq!(s.polygons, a.subtract(&b).polygons);

    let mut i = a.clone();
    i.intersect_in_place(&b);
    assert_eq!(i.polygons, a.intersect(&b).polygons);
}

#[test]
fn operands_are_left_untouched() {
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
    let (a_before, b_before) = (a.polygons.clone(), b.polygons.clone());

    let _ = a.union(&b);
    let _ = a.subtract(&b);
    let _ = a.intersect(&b);
    assert_eq!(a.polygons, a_before);
    assert_eq!(b.polygons, b_before);
}

// --------------------------------------------------------
//   Metadata and limits
// --------------------------------------------------------

#[test]
fn results_carry_left_transform() {
    let moved = Transform::new(
        Vector3::new(4.0, 0.0, 0.0),
        UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5),
        Vector3::new(1.0, 1.0, 1.0),
    );
    let mut a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    a.set_transform(moved);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    assert_eq!(*a.union(&b).transform(), moved);
    assert_eq!(*a.inverse().transform(), moved);
    assert!(b.union(&a).transform().is_identity());

    let mut result = b.subtract(&a);
    let volume = result.volume();
    result.copy_transform_attributes(&a);
    assert_eq!(result.transform, moved);
    assert!(approx_eq(result.volume(), volume, 1e-12));
}

#[test]
fn tight_limits_still_produce_output() {
    let limits = BspLimits {
        max_depth: 2,
        max_polygons: 8,
    };
    let a = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]).with_limits(limits);
    let b = cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);

    let result = a.union(&b);
    assert!(!result.is_empty());
    assert_eq!(result.limits, limits);
}

#[test]
fn surface_area_and_closedness_of_box() {
    let a = cuboid([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
    assert!(approx_eq(a.surface_area(), 2.0 * (2.0 + 3.0 + 6.0), 1e-9));
    assert!(a.is_closed());
    assert!(!Csg::new().is_closed());

    let mut open = a.clone();
    open.polygons.pop();
    assert!(!open.is_closed());
}
