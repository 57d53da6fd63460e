//! Cartesian position of a body on its conic orbit.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Position in AU. `z` is only present for 3D evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Position {
    /// Planar position.
    #[must_use]
    pub const fn new_2d(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Spatial position.
    #[must_use]
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// The system origin, with a `z` component when `want_3d`.
    #[must_use]
    pub const fn origin(want_3d: bool) -> Self {
        if want_3d {
            Self::new_3d(0.0, 0.0, 0.0)
        } else {
            Self::new_2d(0.0, 0.0)
        }
    }

    /// Whether this position carries a `z` component.
    #[must_use]
    pub const fn is_3d(&self) -> bool {
        self.z.is_some()
    }

    /// Coordinates as a triple, with `z = 0` for planar positions.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z.unwrap_or(0.0)]
    }

    /// Distance from the origin.
    #[must_use]
    pub fn radius(&self) -> f64 {
        let [x, y, z] = self.to_array();
        (x * x + y * y + z * z).sqrt()
    }

    /// Check if all coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

impl Sub for Position {
    type Output = Self;

    /// `z` survives only when both operands carry one.
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z.zip(other.z).map(|(a, b)| a - b),
        }
    }
}

/// Orbital radius at polar angle `theta` for the conic `r = a(1-e²)/(1-e·cos θ)`.
#[must_use]
pub fn radius(body: &Body, theta: f64) -> f64 {
    body.a * (1.0 - body.ecc * body.ecc) / (1.0 - body.ecc * theta.cos())
}

/// Position of `body` at polar angle `theta` (radians).
///
/// In 3D the inclination tilts only the x-extent: `x' = x·cos β` and
/// `z = x·sin β`, both from the untilted `x`. This is not a rotation of the
/// orbital plane.
#[must_use]
pub fn position(body: &Body, theta: f64, want_3d: bool) -> Position {
    let r = radius(body, theta);
    let x = r * theta.cos();
    let y = r * theta.sin();

    if want_3d {
        let beta = body.beta_radians();
        Position::new_3d(x * beta.cos(), y, x * beta.sin())
    } else {
        Position::new_2d(x, y)
    }
}
