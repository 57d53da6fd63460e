//! # orrery
//!
//! Planetary orbit visualizations for the nine classical planets.
//!
//! - Conic orbit positions in 2D and with a simple inclination tilt in 3D
//! - A Kepler time-to-angle solver using Simpson quadrature
//! - Static figures as SVG and orbit animations as GIF
//! - A render cache and a small web front end
//!
//! ## Example
//!
//! ```rust
//! use orrery::prelude::*;
//!
//! let orrery = Orrery::with_parts(
//!     BodyRegistry::solar_system(),
//!     RenderCache::in_memory(),
//!     GifRenderer::new(),
//!     OrreryConfig::default(),
//! )?;
//!
//! let svg = orrery.orbits(&OrbitRequest {
//!     bodies: vec!["Earth".into(), "Mars".into()],
//!     three_d: false,
//! })?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), orrery::OrreryError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,
    clippy::many_single_char_names,
)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod orbit;
pub mod render;
pub mod tasks;
#[cfg(feature = "web")]
pub mod web;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cache::{CacheStore, FlagFileStore, MemoryStore, RenderCache};
    pub use crate::config::{OrreryConfig, OrreryConfigBuilder};
    pub use crate::error::{OrreryError, OrreryResult};
    pub use crate::orbit::prelude::*;
    pub use crate::render::gif::GifRenderer;
    pub use crate::render::{AnimationRenderer, AnimationScene, Figure};
    pub use crate::tasks::{
        AnimationRequest, OrbitRequest, Orrery, RelativeOrbitRequest, SpirographRequest,
    };
}

/// Re-export for public API
pub use error::{OrreryError, OrreryResult};
