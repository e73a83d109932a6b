//! Property-based tests for orientation solving and slicing.
//!
//! Run with: cargo test -p tilt-slicer -- proptest

use proptest::prelude::*;
use tilt_math::{Point3, Transform, Vec3};
use tilt_mesh::{MeshObject, TriangleMesh};
use tilt_slicer::{
    generate_layer_heights, plan_toolpaths, slice_layers, solve_orientation, Plane, SliceSettings,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Normals long enough to be usable.
fn arb_normal() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_map(|[x, y, z]| Vec3::new(x, y, z))
        .prop_filter("normal too short", |n| n.norm() >= 0.2)
}

/// An axis-aligned box with positive extents.
fn arb_block() -> impl Strategy<Value = TriangleMesh> {
    (arb_point(), prop::array::uniform3(0.5..20.0f64)).prop_map(|(min, [dx, dy, dz])| {
        TriangleMesh::cuboid(min, Point3::new(min.x + dx, min.y + dy, min.z + dz))
    })
}

// =============================================================================
// Orientation
// =============================================================================

proptest! {
    #[test]
    fn proptest_vertical_normals(scale in 0.1..100.0f64) {
        let up = solve_orientation(&Plane::new(Point3::origin(), Vec3::new(0.0, 0.0, scale))).unwrap();
        prop_assert_eq!(up.angles.a_deg, 0.0);
        prop_assert_eq!(up.angles.c_deg, 0.0);

        let down = solve_orientation(&Plane::new(Point3::origin(), Vec3::new(0.0, 0.0, -scale))).unwrap();
        prop_assert_eq!(down.angles.a_deg, 180.0);
        prop_assert_eq!(down.angles.c_deg, 0.0);
    }

    #[test]
    fn proptest_angle_ranges(normal in arb_normal()) {
        let o = solve_orientation(&Plane::new(Point3::origin(), normal)).unwrap();
        prop_assert!((0.0..=180.0).contains(&o.angles.a_deg));
        prop_assert!(o.angles.c_deg > -180.0 - 1e-9 && o.angles.c_deg <= 180.0);
    }

    #[test]
    fn proptest_round_trip(center in arb_point(), normal in arb_normal(), p in arb_point()) {
        let o = solve_orientation(&Plane::new(center, normal)).unwrap();
        let back = o.slice_to_world.apply_point(&o.world_to_slice.apply_point(&p));
        prop_assert!((back - p).norm() < 1e-8, "{:?} -> {:?}", p, back);
    }

    #[test]
    fn proptest_plane_becomes_floor(center in arb_point(), normal in arb_normal()) {
        let o = solve_orientation(&Plane::new(center, normal)).unwrap();
        let up = o.world_to_slice.apply_vec(&normal.normalize());
        prop_assert!((up - Vec3::z()).norm() < 1e-8);
        let origin = o.world_to_slice.apply_point(&center);
        prop_assert!(origin.coords.norm() < 1e-8);
    }
}

// =============================================================================
// Slicing
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_layer_heights_monotonic(
        z_min in -50.0..50.0f64,
        span in 2.0..50.0f64,
        layer_height in 0.05..2.0f64,
    ) {
        let heights = generate_layer_heights(z_min, z_min + span, layer_height);
        prop_assert!(!heights.is_empty());
        prop_assert!(heights.windows(2).all(|w| w[1] > w[0]));
        prop_assert!(heights.iter().all(|&z| z > z_min && z < z_min + span));
    }

    #[test]
    fn proptest_slicing_is_repeatable(
        mesh in arb_block(),
        center in arb_point(),
        normal in arb_normal(),
        layer_height in 0.3..2.0f64,
    ) {
        let o = solve_orientation(&Plane::new(center, normal)).unwrap();
        let first = slice_layers(&mesh, &o.world_to_slice, layer_height);
        let second = slice_layers(&mesh, &o.world_to_slice, layer_height);

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.z, b.z);
            prop_assert_eq!(a.paths.len(), b.paths.len());
            for (pa, pb) in a.paths.iter().zip(&b.paths) {
                prop_assert_eq!(pa.len(), pb.len());
            }
        }
    }

    #[test]
    fn proptest_block_layers_are_closed(mesh in arb_block(), layer_height in 0.1..1.0f64) {
        let layers = slice_layers(&mesh, &Transform::identity(), layer_height);
        prop_assert!(!layers.is_empty());
        for layer in &layers {
            prop_assert_eq!(layer.paths.len(), 1);
            prop_assert!(layer.paths[0].closed);
            prop_assert!(!layer.paths[0].truncated);
        }
    }

    #[test]
    fn proptest_wcs_indices_are_consecutive(
        mesh in arb_block(),
        normals in prop::collection::vec(arb_normal(), 1..5),
        start in 1u32..200,
    ) {
        let object = MeshObject::new("block", mesh);
        let center = object.mesh.bounds().map(|(min, max)| midpoint(min, max)).unwrap();
        let planes: Vec<Plane> = normals.into_iter().map(|n| Plane::new(center, n)).collect();
        let settings = SliceSettings { layer_height: 0.5, start_wcs_index: start };

        let plan = plan_toolpaths(&object, &planes, &settings).unwrap();
        for (i, setup) in plan.setups.iter().enumerate() {
            prop_assert_eq!(setup.wcs_index, start + i as u32);
        }
    }
}

fn midpoint(a: Point3, b: Point3) -> Point3 {
    Point3::from((a.coords + b.coords) / 2.0)
}
