//! Frame-by-frame marker positions for orbit animations.
//!
//! Each body completes one revolution every `frames_per_revolution ×
//! modified_p` frames, so pacing follows `modified_p` rather than the real
//! period. The total length is pinned to the *last* body in the input
//! list, not to a common multiple of all cycles.

use std::f64::consts::TAU;

use super::body::Body;
use super::position::{position, Position};

/// Frames per revolution of a body with `modified_p = 1`.
pub const FRAMES_PER_REVOLUTION: f64 = 15.0;

/// Frames one revolution of `body` takes. Not necessarily an integer.
#[must_use]
pub fn frames_per_orbit(body: &Body, frames_per_revolution: f64) -> f64 {
    frames_per_revolution * body.modified_p
}

/// Polar angle of `body` at frame `frame`.
#[must_use]
pub fn frame_angle(body: &Body, frame: usize, frames_per_revolution: f64) -> f64 {
    let num_frames = frames_per_orbit(body, frames_per_revolution);
    TAU * ((frame as f64 % num_frames) / num_frames)
}

/// Total frame count: one revolution of the last body, rounded up.
#[must_use]
pub fn total_frames(bodies: &[Body], frames_per_revolution: f64) -> usize {
    bodies.last().map_or(0, |last| {
        frames_per_orbit(last, frames_per_revolution).ceil() as usize
    })
}

/// One animated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Position,
}

/// Advances one marker per body across frames.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    bodies: Vec<Body>,
    want_3d: bool,
    frames_per_revolution: f64,
    markers: Vec<Marker>,
}

impl AnimationDriver {
    /// Create a driver with markers seeded at the origin.
    #[must_use]
    pub fn new(bodies: Vec<Body>, want_3d: bool) -> Self {
        Self::with_pacing(bodies, want_3d, FRAMES_PER_REVOLUTION)
    }

    /// Create a driver with a custom revolution pace.
    #[must_use]
    pub fn with_pacing(bodies: Vec<Body>, want_3d: bool, frames_per_revolution: f64) -> Self {
        let markers = vec![
            Marker {
                position: Position::origin(want_3d),
            };
            bodies.len()
        ];
        Self {
            bodies,
            want_3d,
            frames_per_revolution,
            markers,
        }
    }

    /// Bodies being animated, in input order.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Whether markers carry a `z` component.
    #[must_use]
    pub const fn is_3d(&self) -> bool {
        self.want_3d
    }

    /// Number of frames in the animation.
    #[must_use]
    pub fn total_frames(&self) -> usize {
        total_frames(&self.bodies, self.frames_per_revolution)
    }

    /// Reset every marker to the origin.
    pub fn init(&mut self) -> &[Marker] {
        for marker in &mut self.markers {
            marker.position = Position::origin(self.want_3d);
        }
        &self.markers
    }

    /// Move every marker to its position at `frame`.
    pub fn advance(&mut self, frame: usize) -> &[Marker] {
        for (marker, body) in self.markers.iter_mut().zip(&self.bodies) {
            let theta = frame_angle(body, frame, self.frames_per_revolution);
            marker.position = position(body, theta, self.want_3d);
        }
        &self.markers
    }

    /// Current marker positions.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Marker positions for every frame, in order.
    pub fn frames(&mut self) -> Vec<Vec<Position>> {
        self.init();
        (0..self.total_frames())
            .map(|frame| self.advance(frame).iter().map(|m| m.position).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::body::BodyRegistry;

    fn unit_body() -> Body {
        Body::new("Earth", 1.0, 0.0, 1.0, 1.0, 0.0)
    }

    #[test]
    fn test_unit_body_frames() {
        let earth = unit_body();
        assert!((frames_per_orbit(&earth, FRAMES_PER_REVOLUTION) - 15.0).abs() < f64::EPSILON);
        assert_eq!(total_frames(&[earth], FRAMES_PER_REVOLUTION), 15);
    }

    #[test]
    fn test_frame_angle_wraps() {
        let earth = unit_body();
        assert!(frame_angle(&earth, 15, FRAMES_PER_REVOLUTION).abs() < f64::EPSILON);
        assert!(frame_angle(&earth, 30, FRAMES_PER_REVOLUTION).abs() < f64::EPSILON);
        let quarter = frame_angle(&earth, 15 + 15 / 3, FRAMES_PER_REVOLUTION);
        assert!((quarter - TAU / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_frames_round_up() {
        let mercury = Body::new("Mercury", 0.387, 0.21, 0.241, 0.241, 7.0);
        // 15 × 0.241 = 3.615 frames per revolution.
        assert_eq!(total_frames(&[mercury], FRAMES_PER_REVOLUTION), 4);
    }

    #[test]
    fn test_total_frames_pinned_to_last_body() {
        let registry = BodyRegistry::solar_system();
        let mut bodies = vec![
            registry.get("neptune").cloned().unwrap_or_else(|_| unit_body()),
            unit_body(),
        ];
        assert_eq!(total_frames(&bodies, FRAMES_PER_REVOLUTION), 15);

        bodies.reverse();
        assert_eq!(
            total_frames(&bodies, FRAMES_PER_REVOLUTION),
            (15.0f64 * 14.025).ceil() as usize
        );
    }

    #[test]
    fn test_total_frames_empty() {
        assert_eq!(total_frames(&[], FRAMES_PER_REVOLUTION), 0);
    }

    #[test]
    fn test_driver_seeds_markers_at_origin() {
        let driver = AnimationDriver::new(vec![unit_body(), unit_body()], true);
        assert_eq!(driver.markers().len(), 2);
        assert!(driver
            .markers()
            .iter()
            .all(|m| m.position == Position::origin(true)));
    }

    #[test]
    fn test_driver_advance_moves_markers() {
        let mut driver = AnimationDriver::new(vec![unit_body()], false);
        let markers = driver.advance(0);
        assert!((markers[0].position.x - 1.0).abs() < 1e-12);

        let markers = driver.advance(15 / 3);
        let theta = TAU / 3.0;
        assert!((markers[0].position.x - theta.cos()).abs() < 1e-12);
        assert!((markers[0].position.y - theta.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_driver_init_resets() {
        let mut driver = AnimationDriver::new(vec![unit_body()], false);
        driver.advance(3);
        driver.init();
        assert_eq!(driver.markers()[0].position, Position::origin(false));
    }

    #[test]
    fn test_driver_frames() {
        let mut driver = AnimationDriver::new(vec![unit_body(), unit_body()], true);
        let frames = driver.frames();
        assert_eq!(frames.len(), 15);
        assert!(frames.iter().all(|f| f.len() == 2 && f.iter().all(Position::is_3d)));
    }

    #[test]
    fn test_custom_pacing() {
        let driver = AnimationDriver::with_pacing(vec![unit_body()], false, 30.0);
        assert_eq!(driver.total_frames(), 30);
    }
}
