//! Coordinate and angle series for each visualization.
//!
//! Every routine here is a pure sampling loop; drawing is left to
//! [`crate::render`].

use std::f64::consts::PI;

use serde::Serialize;

use super::body::Body;
use super::kepler::{angles_for_times, linspace, uniform_angle};
use super::position::{position, Position};
use crate::error::{OrreryError, OrreryResult};

/// Samples per orbit path.
pub const ORBIT_SAMPLES: usize = 1000;

/// Angle step between orbit path samples.
pub const ORBIT_STEP: f64 = 0.002 * PI;

/// Number of spirograph segments; also the divisor of the time step used by
/// the relative orbits.
pub const SPIROGRAPH_STEPS: usize = 1234;

/// Revolutions of the slower body covered by a spirograph.
pub const SPIROGRAPH_REVOLUTIONS: f64 = 10.0;

/// Samples per relative orbit.
pub const RELATIVE_SAMPLES: usize = 1000;

/// Length (and last time, in years) of the angle-vs-time grid.
pub const ANGLE_TIME_SAMPLES: usize = 800;

/// Closed orbit path of one body: [`ORBIT_SAMPLES`] points from `θ = 0`.
#[must_use]
pub fn orbit_path(body: &Body, want_3d: bool) -> Vec<Position> {
    (0..ORBIT_SAMPLES)
        .map(|i| position(body, i as f64 * ORBIT_STEP, want_3d))
        .collect()
}

/// One point of the third-law correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeplerPoint {
    pub name: String,
    /// `a^{3/2}` (AU^{3/2}).
    pub a_three_halves: f64,
    /// Period (years).
    pub period: f64,
}

/// `(a^{3/2}, p)` for each body, in input order.
#[must_use]
pub fn kepler_correlation(bodies: &[Body]) -> Vec<KeplerPoint> {
    bodies
        .iter()
        .map(|b| KeplerPoint {
            name: b.name.clone(),
            a_three_halves: b.a.powf(1.5),
            period: b.p,
        })
        .collect()
}

/// Circular reference and eccentric angle series on a shared time grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleVsTime {
    /// Times (years).
    pub times: Vec<f64>,
    /// Angles with `ecc = 0`.
    pub circular: Vec<f64>,
    /// Angles with the body's eccentricity.
    pub eccentric: Vec<f64>,
}

/// Angle against time for `body` over years `1..=800`.
///
/// # Errors
///
/// Propagates solver errors (eccentricity outside `[0, 1)`).
pub fn angle_vs_time(body: &Body) -> OrreryResult<AngleVsTime> {
    let times = linspace(1.0, ANGLE_TIME_SAMPLES as f64, ANGLE_TIME_SAMPLES);
    let circular = angles_for_times(&times, body.p, 0.0, 0.0)?;
    let eccentric = angles_for_times(&times, body.p, body.ecc, 0.0)?;
    Ok(AngleVsTime {
        times,
        circular,
        eccentric,
    })
}

/// A line between two simultaneous positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}

/// Spirograph of exactly two bodies.
///
/// Time advances from 0 in [`SPIROGRAPH_STEPS`] equal steps covering
/// [`SPIROGRAPH_REVOLUTIONS`] periods of the slower body; each step joins the
/// two bodies' planar positions.
///
/// # Errors
///
/// Returns [`OrreryError::BodyCount`] unless exactly two bodies are given.
pub fn spirograph(bodies: &[&Body]) -> OrreryResult<Vec<Segment>> {
    let [first, second] = bodies else {
        return Err(OrreryError::BodyCount {
            task: "spirograph",
            expected: 2,
            actual: bodies.len(),
        });
    };

    let tmax = first.p.max(second.p);
    let dt = SPIROGRAPH_REVOLUTIONS * tmax / SPIROGRAPH_STEPS as f64;

    Ok((0..SPIROGRAPH_STEPS)
        .map(|i| {
            let t = i as f64 * dt;
            Segment {
                from: position(first, uniform_angle(t, first.p), false),
                to: position(second, uniform_angle(t, second.p), false),
            }
        })
        .collect())
}

/// Path of `body` as seen from `center`.
///
/// Both bodies move uniformly in angle from `θ = 0`; each sample is the
/// difference of their simultaneous positions. The step is scaled by the
/// slower of the two periods.
#[must_use]
pub fn relative_orbit(center: &Body, body: &Body, want_3d: bool) -> Vec<Position> {
    let tmax = center.p.max(body.p);
    let dt = SPIROGRAPH_REVOLUTIONS * tmax / SPIROGRAPH_STEPS as f64;

    (0..RELATIVE_SAMPLES)
        .map(|i| {
            let t = i as f64 * dt;
            let origin = position(center, uniform_angle(t, center.p), want_3d);
            let moved = position(body, uniform_angle(t, body.p), want_3d);
            moved - origin
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;
    use crate::orbit::body::BodyRegistry;

    fn registry() -> BodyRegistry {
        BodyRegistry::solar_system()
    }

    #[test]
    fn test_orbit_path_length_and_start() {
        let earth = Body::new("Earth", 1.0, 0.0, 1.0, 1.0, 0.0);
        let path = orbit_path(&earth, false);
        assert_eq!(path.len(), ORBIT_SAMPLES);
        assert!((path[0].x - 1.0).abs() < 1e-12);
        // Last sample sits one step short of a full turn.
        let last_theta = (ORBIT_SAMPLES - 1) as f64 * ORBIT_STEP;
        assert!((last_theta - (TAU - ORBIT_STEP)).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_path_3d_has_z() {
        let registry = registry();
        let pluto = registry.get("pluto").ok();
        let path = pluto.map(|p| orbit_path(p, true)).unwrap_or_default();
        assert!(path.iter().all(Position::is_3d));
        assert!(path.iter().any(|p| p.z.unwrap_or(0.0).abs() > 1.0));
    }

    #[test]
    fn test_kepler_correlation_unit_body() {
        let points = kepler_correlation(&[Body::new("Earth", 1.0, 0.0, 1.0, 1.0, 0.0)]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].a_three_halves, points[0].period);
    }

    #[test]
    fn test_kepler_correlation_follows_third_law() {
        let registry = registry();
        for point in kepler_correlation(registry.all()) {
            let ratio = point.period / point.a_three_halves;
            assert!((ratio - 1.0).abs() < 0.01, "{}: ratio {ratio}", point.name);
        }
    }

    #[test]
    fn test_angle_vs_time_shapes() {
        let registry = registry();
        let series = registry.get("pluto").ok().map(angle_vs_time);
        let Some(Ok(series)) = series else {
            panic!("angle vs time failed");
        };
        assert_eq!(series.times.len(), ANGLE_TIME_SAMPLES);
        assert_eq!(series.circular.len(), ANGLE_TIME_SAMPLES);
        assert_eq!(series.eccentric.len(), ANGLE_TIME_SAMPLES);
        assert!((series.times[0] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angle_vs_time_circular_is_uniform() {
        let body = Body::new("Slow", 10.0, 0.3, 250.0, 1.0, 0.0);
        let Ok(series) = angle_vs_time(&body) else {
            panic!("angle vs time failed");
        };
        for (t, theta) in series.times.iter().zip(&series.circular) {
            assert!((theta - uniform_angle(*t, 250.0)).abs() < 2e-3);
        }
    }

    #[test]
    fn test_angle_vs_time_period_dividing_the_grid() {
        // 800 years is exactly four periods.
        let body = Body::new("Custom", 1.0, 0.1, 200.0, 1.0, 0.0);
        let series = angle_vs_time(&body).ok().unwrap();
        let last = series.eccentric[ANGLE_TIME_SAMPLES - 1];
        assert!((last - 4.0 * TAU).abs() < 1e-2, "{last}");
    }

    #[test]
    fn test_spirograph_segment_count() {
        let registry = registry();
        let bodies = registry.resolve(&["venus", "earth"]).unwrap_or_default();
        let segments = spirograph(&bodies).unwrap_or_default();
        assert_eq!(segments.len(), SPIROGRAPH_STEPS);
    }

    #[test]
    fn test_spirograph_count_independent_of_periods() {
        let registry = registry();
        let bodies = registry.resolve(&["mercury", "neptune"]).unwrap_or_default();
        assert_eq!(spirograph(&bodies).map(|s| s.len()).ok(), Some(SPIROGRAPH_STEPS));
    }

    #[test]
    fn test_spirograph_starts_at_theta_zero() {
        let registry = registry();
        let bodies = registry.resolve(&["earth", "mars"]).unwrap_or_default();
        let segments = spirograph(&bodies).unwrap_or_default();
        assert_eq!(segments[0].from, position(bodies[0], 0.0, false));
        assert_eq!(segments[0].to, position(bodies[1], 0.0, false));
        assert_eq!(segments[0].from.z, None);
    }

    #[test]
    fn test_spirograph_rejects_wrong_count() {
        let registry = registry();
        let bodies = registry.resolve(&["earth"]).unwrap_or_default();
        assert!(matches!(
            spirograph(&bodies),
            Err(OrreryError::BodyCount { expected: 2, actual: 1, .. })
        ));

        let bodies = registry.resolve(&["earth", "mars", "venus"]).unwrap_or_default();
        assert!(matches!(
            spirograph(&bodies),
            Err(OrreryError::BodyCount { actual: 3, .. })
        ));
    }

    #[test]
    fn test_relative_orbit_of_self_is_zero() {
        let registry = registry();
        let Ok(earth) = registry.get("earth") else {
            panic!("earth missing");
        };
        for want_3d in [false, true] {
            let path = relative_orbit(earth, earth, want_3d);
            assert_eq!(path.len(), RELATIVE_SAMPLES);
            assert!(path.iter().all(|p| p.to_array() == [0.0, 0.0, 0.0]));
        }
    }

    #[test]
    fn test_relative_orbit_first_sample() {
        let registry = registry();
        let (Ok(earth), Ok(mars)) = (registry.get("earth"), registry.get("mars")) else {
            panic!("bodies missing");
        };
        let path = relative_orbit(earth, mars, false);
        let expected = position(mars, 0.0, false) - position(earth, 0.0, false);
        assert_eq!(path[0], expected);
    }
}
