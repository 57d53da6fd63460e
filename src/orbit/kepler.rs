//! Kepler time-angle solver.
//!
//! Converts a time grid into the polar angles an eccentric orbit reaches at
//! those times. The time elapsed since `theta0` is
//!
//! ```text
//! t(θ) = P (1-e²)^{3/2} / 2π · ∫ (1 - e cos φ)^-2 dφ
//! ```
//!
//! tabulated on a uniform angle grid with Simpson weights and inverted by
//! cubic interpolation.
//!
//! The grid can be long (≈ 6283 points per revolution) so it is generated
//! lazily and consumed through a four-point window; only the output series
//! is held in memory.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use crate::error::{OrreryError, OrreryResult};

/// Angle step of the quadrature grid (radians).
pub const DTHETA: f64 = 1.0 / 1000.0;

/// Points tabulated past the last whole revolution, so the final requested
/// time always sits inside the table.
const TAIL_KNOTS: usize = 4;

/// Upper bound on the revolutions one call may tabulate.
pub const MAX_REVOLUTIONS: f64 = 100_000.0;

/// Tabulated `(t, θ)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Knot {
    t: f64,
    theta: f64,
}

/// Lazily generated cumulative-time table `tt(θ)`.
///
/// Weights follow the composite Simpson pattern `1, 4, 2, 4, …, 4, 1`; the
/// running sum is emitted after every point, so intermediate entries carry
/// the weight of the point just added. The length is always odd so the
/// pattern closes on `4, 1`.
#[derive(Debug, Clone)]
struct TimeTable {
    theta0: f64,
    len: usize,
    next: usize,
    ecc: f64,
    scale: f64,
    sum: f64,
}

impl TimeTable {
    fn new(period: f64, ecc: f64, theta0: f64, revolutions: f64) -> Self {
        let span = TAU * revolutions + DTHETA;
        let len = (span / DTHETA).ceil() as usize + TAIL_KNOTS;
        let len = len | 1;
        let scale = period * (1.0 - ecc * ecc).powf(1.5) / TAU * DTHETA / 3.0;
        Self {
            theta0,
            len,
            next: 0,
            ecc,
            scale,
            sum: 0.0,
        }
    }

    fn weight(&self, k: usize) -> f64 {
        if k == 0 || k + 1 == self.len {
            1.0
        } else if k % 2 == 1 {
            4.0
        } else {
            2.0
        }
    }
}

impl Iterator for TimeTable {
    type Item = Knot;

    fn next(&mut self) -> Option<Knot> {
        if self.next >= self.len {
            return None;
        }
        let k = self.next;
        let theta = self.theta0 + k as f64 * DTHETA;
        let f = (1.0 - self.ecc * theta.cos()).powi(-2);
        self.sum += self.weight(k) * f;
        self.next += 1;
        Some(Knot {
            t: self.scale * self.sum,
            theta,
        })
    }
}

/// Four-point Lagrange cubic through `knots`, evaluated at `t`.
fn cubic(knots: &[Knot; 4], t: f64) -> f64 {
    let mut acc = 0.0;
    for (i, ki) in knots.iter().enumerate() {
        let mut basis = 1.0;
        for (j, kj) in knots.iter().enumerate() {
            if i != j {
                basis *= (t - kj.t) / (ki.t - kj.t);
            }
        }
        acc += basis * ki.theta;
    }
    acc
}

fn check_inputs(times: &[f64], period: f64, ecc: f64) -> OrreryResult<()> {
    if !(0.0..1.0).contains(&ecc) {
        return Err(OrreryError::InvalidEccentricity { ecc });
    }
    if !(period.is_finite() && period > 0.0) {
        return Err(OrreryError::invalid_times(format!(
            "period must be positive, got {period}"
        )));
    }
    let Some(&last) = times.last() else {
        return Err(OrreryError::invalid_times("no times given"));
    };
    if let Some(bad) = times.iter().find(|t| !t.is_finite()) {
        return Err(OrreryError::invalid_times(format!(
            "times must be finite, got {bad}"
        )));
    }
    if last <= 0.0 {
        return Err(OrreryError::invalid_times(format!(
            "last time must be positive, got {last}"
        )));
    }
    if times.windows(2).any(|w| w[1] < w[0]) {
        return Err(OrreryError::invalid_times("times must be sorted ascending"));
    }
    Ok(())
}

/// Polar angles reached at each of `times` on an orbit of the given period
/// and eccentricity, starting from `theta0` at `t = 0`.
///
/// The output is aligned 1:1 with `times`. For `ecc = 0` the angle is
/// linear in time.
///
/// # Errors
///
/// - [`OrreryError::InvalidEccentricity`] if `ecc` is outside `[0, 1)`
/// - [`OrreryError::InvalidTimes`] if `times` is empty, unsorted, holds a
///   non-finite value or ends at a non-positive time, if `period` is not
///   positive, or if the grid spans more than [`MAX_REVOLUTIONS`] periods
/// - [`OrreryError::TimeOutOfRange`] if a time precedes the first
///   tabulated time (the first knot already carries one quadrature step)
pub fn angles_for_times(
    times: &[f64],
    period: f64,
    ecc: f64,
    theta0: f64,
) -> OrreryResult<Vec<f64>> {
    check_inputs(times, period, ecc)?;

    let last = times[times.len() - 1];
    let revolutions = (last / period).ceil().max(1.0);
    if !revolutions.is_finite() || revolutions > MAX_REVOLUTIONS {
        return Err(OrreryError::invalid_times(format!(
            "{last} years spans more than {MAX_REVOLUTIONS} periods of {period} years"
        )));
    }
    let mut table = TimeTable::new(period, ecc, theta0, revolutions);

    let mut window: VecDeque<Knot> = VecDeque::with_capacity(4);
    let mut angles = Vec::with_capacity(times.len());

    for &t in times {
        // Slide until t sits below the third knot, so that knots 1 and 2
        // bracket it whenever the table allows.
        while window.len() < 4 || window[2].t <= t {
            let Some(knot) = table.next() else { break };
            if window.len() == 4 {
                window.pop_front();
            }
            window.push_back(knot);
        }

        if window.len() < 4 {
            return Err(OrreryError::invalid_times("time table has fewer than 4 knots"));
        }
        let knots = [window[0], window[1], window[2], window[3]];
        if t < knots[0].t || t > knots[3].t {
            return Err(OrreryError::TimeOutOfRange {
                time: t,
                min: knots[0].t,
                max: knots[3].t,
            });
        }
        angles.push(cubic(&knots, t));
    }

    Ok(angles)
}

/// Uniform angular motion: the angle a circular orbit reaches at `t`.
#[must_use]
pub fn uniform_angle(t: f64, period: f64) -> f64 {
    TAU * t / period
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
