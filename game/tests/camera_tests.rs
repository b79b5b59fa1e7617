use std::f32::consts::{FRAC_PI_2, PI, TAU};

use snake3d::camera::{
    CameraOrbit, DEFAULT_RADIUS, MAX_RADIUS, MIN_RADIUS, MoveIntent, ViewQuadrant,
};
use snake3d::grid::Direction;

fn assert_approx_eq(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "expected {b}, got {a}");
}

#[test]
fn azimuth_wraps_past_full_turn() {
    let mut orbit = CameraOrbit::new(FRAC_PI_2, TAU - 0.001, DEFAULT_RADIUS);
    orbit.rotate(0.01, 0.0);
    assert_approx_eq(orbit.azimuth(), 0.009);
}

#[test]
fn azimuth_wraps_below_zero() {
    let mut orbit = CameraOrbit::new(FRAC_PI_2, 0.005, DEFAULT_RADIUS);
    orbit.rotate(-0.01, 0.0);
    assert_approx_eq(orbit.azimuth(), TAU - 0.005);
}

#[test]
fn drag_moves_azimuth_against_cursor_delta() {
    let mut orbit = CameraOrbit::new(FRAC_PI_2, 1.0, DEFAULT_RADIUS);
    // Cursor moved 10px right: previous minus current is -10.
    orbit.drag(-10.0, 0.0, 0.01);
    assert_approx_eq(orbit.azimuth(), 1.1);

    orbit.drag(0.0, 20.0, 0.01);
    assert_approx_eq(orbit.polar(), FRAC_PI_2 + 0.2);
}

#[test]
fn zoom_is_proportional_and_clamped() {
    let mut orbit = CameraOrbit::default();
    orbit.zoom(1.0, 0.1);
    assert_approx_eq(orbit.radius(), 13.5);

    for _ in 0..200 {
        orbit.zoom(5.0, 0.1);
    }
    assert_approx_eq(orbit.radius(), MIN_RADIUS);

    for _ in 0..200 {
        orbit.zoom(-5.0, 0.1);
    }
    assert_approx_eq(orbit.radius(), MAX_RADIUS);
}

#[test]
fn quadrant_boundaries() {
    assert_eq!(ViewQuadrant::from_azimuth(0.0), ViewQuadrant::FromPosX);
    assert_eq!(ViewQuadrant::from_azimuth(FRAC_PI_2), ViewQuadrant::FromPosZ);
    assert_eq!(ViewQuadrant::from_azimuth(PI), ViewQuadrant::FromNegX);
    assert_eq!(ViewQuadrant::from_azimuth(3.0 * FRAC_PI_2), ViewQuadrant::FromNegZ);
    assert_eq!(ViewQuadrant::from_azimuth(TAU - 0.1), ViewQuadrant::FromPosX);
}

#[test]
fn forward_points_away_from_the_eye() {
    for azimuth in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
        let orbit = CameraOrbit::new(FRAC_PI_2, azimuth, DEFAULT_RADIUS);
        let eye = orbit.eye();
        let forward = orbit.quadrant().remap(MoveIntent::Forward).to_vec();
        let dot = eye.x * forward.x as f32 + eye.z * forward.z as f32;
        assert!(dot < 0.0, "forward {forward:?} faces the eye at azimuth {azimuth}");
    }
}

#[test]
fn remap_table_from_pos_z() {
    let q = ViewQuadrant::FromPosZ;
    assert_eq!(q.remap(MoveIntent::Forward), Direction::NegZ);
    assert_eq!(q.remap(MoveIntent::Backward), Direction::PosZ);
    assert_eq!(q.remap(MoveIntent::Left), Direction::NegX);
    assert_eq!(q.remap(MoveIntent::Right), Direction::PosX);
}

#[test]
fn left_and_right_are_opposite_in_every_quadrant() {
    for q in [
        ViewQuadrant::FromPosX,
        ViewQuadrant::FromPosZ,
        ViewQuadrant::FromNegX,
        ViewQuadrant::FromNegZ,
    ] {
        assert!(q.remap(MoveIntent::Left).is_opposite(q.remap(MoveIntent::Right)));
        assert!(q.remap(MoveIntent::Forward).is_opposite(q.remap(MoveIntent::Backward)));
        assert_eq!(q.remap(MoveIntent::Up), Direction::PosY);
        assert_eq!(q.remap(MoveIntent::Down), Direction::NegY);
    }
}
