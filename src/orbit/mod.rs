//! Orbit computation engine.
//!
//! - [`body`]: the planet registry
//! - [`position`]: Cartesian position on a conic orbit
//! - [`kepler`]: time → polar angle via Simpson quadrature
//! - [`series`]: sampling loops for each visualization
//! - [`animation`]: per-frame marker positions
//!
//! # Example
//!
//! ```rust
//! use orrery::orbit::prelude::*;
//!
//! let registry = BodyRegistry::solar_system();
//! let earth = registry.get("earth").expect("earth is built in");
//! let pos = position(earth, 0.0, false);
//! assert!(pos.x > 0.0);
//! ```

pub mod animation;
pub mod body;
pub mod kepler;
pub mod position;
pub mod series;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::animation::{
        frame_angle, frames_per_orbit, total_frames, AnimationDriver, Marker,
        FRAMES_PER_REVOLUTION,
    };
    pub use super::body::{Body, BodyRegistry, Zone};
    pub use super::kepler::{angles_for_times, uniform_angle, linspace, DTHETA};
    pub use super::position::{position, radius, Position};
    pub use super::series::{
        angle_vs_time, kepler_correlation, orbit_path, relative_orbit, spirograph, AngleVsTime,
        KeplerPoint, Segment,
    };
}
