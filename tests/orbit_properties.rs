//! Orbit properties end to end.
//!
//! Run with: cargo test --test orbit_properties

use std::f64::consts::{PI, TAU};

use orrery::prelude::*;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn body(a: f64, ecc: f64, p: f64, modified_p: f64) -> Body {
    Body::new("Probe", a, ecc, p, modified_p, 0.0)
}

// ============================================================================
// POSITION
// ============================================================================

#[test]
fn unit_circle_starts_on_x_axis() {
    let pos = position(&body(1.0, 0.0, 1.0, 1.0), 0.0, false);
    assert!((pos.x - 1.0).abs() < EPS);
    assert!(pos.y.abs() < EPS);
    assert_eq!(pos.z, None);
}

#[test]
fn half_eccentric_orbit_at_aphelion_side() {
    let pos = position(&body(1.0, 0.5, 1.0, 1.0), PI, false);
    assert!((pos.x + 0.5).abs() < EPS, "x = {}", pos.x);
    assert!(pos.y.abs() < EPS, "y = {}", pos.y);
}

#[test]
fn every_planet_orbit_is_closed_and_finite() {
    let registry = BodyRegistry::solar_system();
    for planet in registry.all() {
        for want_3d in [false, true] {
            let path = orbit_path(planet, want_3d);
            assert!(path.iter().all(Position::is_finite), "{}", planet.name);
            let first = path[0];
            let wrap = position(planet, TAU, want_3d);
            assert!((first.x - wrap.x).abs() < 1e-9);
            assert!((first.y - wrap.y).abs() < 1e-9);
        }
    }
}

proptest! {
    #[test]
    fn circular_orbit_is_a_circle(a in 0.1f64..50.0, theta in -10.0f64..10.0) {
        let pos = position(&body(a, 0.0, 1.0, 1.0), theta, false);
        prop_assert!((pos.x - a * theta.cos()).abs() < 1e-9);
        prop_assert!((pos.y - a * theta.sin()).abs() < 1e-9);
    }

    #[test]
    fn position_repeats_every_turn(
        a in 0.1f64..50.0,
        ecc in 0.0f64..0.95,
        theta in -10.0f64..10.0,
        want_3d in proptest::bool::ANY,
    ) {
        let b = body(a, ecc, 1.0, 1.0);
        let here = position(&b, theta, want_3d);
        let later = position(&b, theta + TAU, want_3d);
        let scale = a / (1.0 - ecc);
        prop_assert!((here.x - later.x).abs() < 1e-9 * scale);
        prop_assert!((here.y - later.y).abs() < 1e-9 * scale);
    }
}

// ============================================================================
// KEPLER SOLVER
// ============================================================================

#[test]
fn one_period_sweeps_a_full_turn() {
    for ecc in [0.0, 0.1, 0.21, 0.5, 0.8] {
        let angles = angles_for_times(&[2.5], 2.5, ecc, 0.0).ok().unwrap();
        assert!((angles[0] - TAU).abs() < 2e-3, "ecc={ecc}: {}", angles[0]);
    }
}

#[test]
fn circular_solver_matches_uniform_motion() {
    let times = linspace(0.5, 30.0, 60);
    let angles = angles_for_times(&times, 11.861, 0.0, 0.0).ok().unwrap();
    for (t, theta) in times.iter().zip(&angles) {
        assert!((theta - uniform_angle(*t, 11.861)).abs() < 2e-3, "t={t}");
    }
}

#[test]
fn solver_rejects_open_orbits() {
    assert!(matches!(
        angles_for_times(&[1.0], 1.0, 1.0, 0.0),
        Err(OrreryError::InvalidEccentricity { .. })
    ));
}

#[test]
fn pluto_angle_vs_time_spans_800_years() {
    let registry = BodyRegistry::solar_system();
    let pluto = registry.get("pluto").ok().unwrap();
    let series = angle_vs_time(pluto).ok().unwrap();

    assert_eq!(series.times.len(), 800);
    assert_eq!(series.circular.len(), 800);
    assert_eq!(series.eccentric.len(), 800);
    assert!((series.times[0] - 1.0).abs() < EPS);
    assert!((series.times[799] - 800.0).abs() < EPS);

    // Both series agree after each whole period.
    let idx = series
        .times
        .iter()
        .position(|t| *t >= pluto.p)
        .unwrap_or(series.times.len() - 1);
    assert!((series.circular[idx] - series.eccentric[idx]).abs() < 0.05);
}

// ============================================================================
// SAMPLING ROUTINES
// ============================================================================

#[test]
fn unit_body_satisfies_third_law() {
    let points = kepler_correlation(&[body(1.0, 0.0, 1.0, 1.0)]);
    assert_eq!(points.len(), 1);
    assert!((points[0].a_three_halves - points[0].period).abs() < EPS);
}

#[test]
fn planets_follow_third_law() {
    let registry = BodyRegistry::solar_system();
    for point in kepler_correlation(registry.all()) {
        let ratio = point.period / point.a_three_halves;
        assert!((ratio - 1.0).abs() < 0.02, "{}: {ratio}", point.name);
    }
}

#[test]
fn relative_orbit_of_center_is_origin() {
    let registry = BodyRegistry::solar_system();
    let earth = registry.get("Earth").ok().unwrap();
    for want_3d in [false, true] {
        for pos in relative_orbit(earth, earth, want_3d) {
            assert!(pos.x.abs() < EPS && pos.y.abs() < EPS);
            assert!(pos.z.unwrap_or(0.0).abs() < EPS);
        }
    }
}

#[test]
fn spirograph_needs_two_bodies() {
    let registry = BodyRegistry::solar_system();
    let bodies = registry.resolve(&["Venus", "Earth", "Mars"]).ok().unwrap();
    assert!(matches!(
        spirograph(&bodies),
        Err(OrreryError::BodyCount { expected: 2, actual: 3, .. })
    ));
    assert!(spirograph(&bodies[..2]).is_ok());
}

// ============================================================================
// ANIMATION
// ============================================================================

#[test]
fn unit_pace_body_takes_fifteen_frames() {
    let b = body(1.0, 0.02, 1.0, 1.0);
    assert_eq!(total_frames(std::slice::from_ref(&b), FRAMES_PER_REVOLUTION), 15);
    assert!(frame_angle(&b, 15, FRAMES_PER_REVOLUTION).abs() < EPS);
    assert!((frame_angle(&b, 5, FRAMES_PER_REVOLUTION) - TAU / 3.0).abs() < EPS);
}

#[test]
fn animation_length_follows_last_body() {
    let registry = BodyRegistry::solar_system();
    let pair: Vec<Body> = registry
        .resolve(&["Mercury", "Mars"])
        .ok()
        .unwrap()
        .into_iter()
        .cloned()
        .collect();
    let mut driver = AnimationDriver::new(pair, false);

    // Mars: 15 × 1.881 = 28.2 frames, rounded up.
    assert_eq!(driver.total_frames(), 29);
    let frames = driver.frames();
    assert_eq!(frames.len(), 29);
    assert!(frames.iter().all(|markers| markers.len() == 2));
}
