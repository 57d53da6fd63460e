//! Task layer: resolve a typed request, compute series, render.
//!
//! Each task is an independent pipeline. Static figures come back as SVG
//! text; animations come back as base64 GIF text and go through the render
//! cache first.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{animation_filename, encode_base64, RenderCache};
use crate::config::OrreryConfig;
use crate::error::{OrreryError, OrreryResult};
use crate::orbit::animation::AnimationDriver;
use crate::orbit::body::{Body, BodyRegistry};
use crate::orbit::position::Position;
use crate::orbit::series::{
    angle_vs_time, kepler_correlation, orbit_path, relative_orbit, spirograph,
};
use crate::render::gif::GifRenderer;
use crate::render::svg::to_svg;
use crate::render::{
    cycle_color, AnimationRenderer, AnimationScene, Aspect, Color, Figure, Series, Style,
    MARKER_PALETTE,
};

/// Split a comma-separated list of names, dropping blanks.
#[must_use]
pub fn parse_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn require_bodies<'r>(
    registry: &'r BodyRegistry,
    names: &[String],
    task: &'static str,
) -> OrreryResult<Vec<&'r Body>> {
    if names.is_empty() {
        return Err(OrreryError::EmptySelection(task));
    }
    registry.resolve(names)
}

/// Static orbit plot request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitRequest {
    pub bodies: Vec<String>,
    #[serde(default)]
    pub three_d: bool,
}

impl OrbitRequest {
    /// Resolve the selection against `registry`.
    ///
    /// # Errors
    ///
    /// Empty selection or unknown body.
    pub fn resolve<'r>(&self, registry: &'r BodyRegistry) -> OrreryResult<Vec<&'r Body>> {
        require_bodies(registry, &self.bodies, "orbit plot")
    }
}

/// Orbit animation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub bodies: Vec<String>,
    #[serde(default)]
    pub three_d: bool,
}

impl AnimationRequest {
    /// Resolve the selection against `registry`.
    ///
    /// # Errors
    ///
    /// Empty selection or unknown body.
    pub fn resolve<'r>(&self, registry: &'r BodyRegistry) -> OrreryResult<Vec<&'r Body>> {
        require_bodies(registry, &self.bodies, "animation")
    }
}

/// Spirograph request; needs exactly two bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpirographRequest {
    pub bodies: Vec<String>,
}

impl SpirographRequest {
    /// Resolve the pair against `registry`.
    ///
    /// # Errors
    ///
    /// Wrong number of bodies or unknown body.
    pub fn resolve<'r>(&self, registry: &'r BodyRegistry) -> OrreryResult<[&'r Body; 2]> {
        let [first, second] = self.bodies.as_slice() else {
            return Err(OrreryError::BodyCount {
                task: "spirograph",
                expected: 2,
                actual: self.bodies.len(),
            });
        };
        Ok([registry.get(first)?, registry.get(second)?])
    }
}

/// Relative orbit request: other bodies as seen from `center`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeOrbitRequest {
    pub center: String,
    pub bodies: Vec<String>,
    #[serde(default)]
    pub three_d: bool,
}

impl Default for RelativeOrbitRequest {
    fn default() -> Self {
        Self {
            center: "Earth".to_string(),
            bodies: Vec::new(),
            three_d: false,
        }
    }
}

impl RelativeOrbitRequest {
    /// Resolve center and bodies against `registry`.
    ///
    /// # Errors
    ///
    /// Empty selection or unknown body.
    pub fn resolve<'r>(
        &self,
        registry: &'r BodyRegistry,
    ) -> OrreryResult<(&'r Body, Vec<&'r Body>)> {
        let center = registry.get(&self.center)?;
        let bodies = require_bodies(registry, &self.bodies, "relative orbit")?;
        Ok((center, bodies))
    }
}

/// Marker radius for primary and animated bodies, in pixels.
const MARKER_RADIUS: f64 = 6.0;

/// Task entry points over one registry, cache and animation back end.
pub struct Orrery {
    registry: BodyRegistry,
    cache: RenderCache,
    renderer: Box<dyn AnimationRenderer>,
    config: OrreryConfig,
}

impl std::fmt::Debug for Orrery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orrery")
            .field("bodies", &self.registry.len())
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orrery {
    /// Build from configuration: registry from `bodies_path` or built in,
    /// flag-file cache in `cache.dir`, GIF animations.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, the bodies file
    /// cannot be loaded, or the cache directory cannot be created.
    pub fn from_config(config: OrreryConfig) -> OrreryResult<Self> {
        config.check()?;
        let registry = config.registry()?;
        let cache = RenderCache::on_disk(config.cache.dir.clone());
        Self::with_parts(registry, cache, GifRenderer::new(), config)
    }

    /// Assemble from explicit parts. Registers the cache.
    ///
    /// # Errors
    ///
    /// Returns error if the cache cannot be registered.
    pub fn with_parts(
        registry: BodyRegistry,
        cache: RenderCache,
        renderer: impl AnimationRenderer + 'static,
        config: OrreryConfig,
    ) -> OrreryResult<Self> {
        cache.register()?;
        Ok(Self {
            registry,
            cache,
            renderer: Box::new(renderer),
            config,
        })
    }

    #[must_use]
    pub const fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &OrreryConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &RenderCache {
        &self.cache
    }

    fn figure(&self, title: &str, three_d: bool) -> Figure {
        Figure::new(title, three_d).with_size(self.config.render.width, self.config.render.height)
    }

    /// Kepler's third law: `a^{3/2}` against period for every registry body.
    #[must_use]
    pub fn kepler_law(&self) -> String {
        debug!(bodies = self.registry.len(), "Kepler correlation");

        let points: Vec<[f64; 3]> = kepler_correlation(self.registry.all())
            .iter()
            .map(|p| [p.a_three_halves, p.period, 0.0])
            .collect();

        let mut figure = self
            .figure("Kepler's Third Law", false)
            .with_labels("(a/AU)^(3/2)", "T/Yr")
            .with_aspect(Aspect::Auto);
        figure.push(Series {
            label: Some("Kepler's Third Law".to_string()),
            points,
            style: Style::LineMarkers {
                color: Color::RED,
                width: 1.5,
                radius: 4.0,
            },
        });

        to_svg(&figure)
    }

    /// Static orbit paths with the primary at the origin.
    ///
    /// # Errors
    ///
    /// Empty selection or unknown body.
    pub fn orbits(&self, request: &OrbitRequest) -> OrreryResult<String> {
        debug!(bodies = ?request.bodies, three_d = request.three_d, "Orbit plot");
        let bodies = request.resolve(&self.registry)?;
        let title = if request.three_d { "3D Planet Orbits" } else { "2D Planet Orbits" };

        let mut figure = orbit_figure(self.figure(title, request.three_d), &bodies, request.three_d);
        push_primary(&mut figure, "Sun", Color::YELLOW);
        Ok(to_svg(&figure))
    }

    /// Animation bytes for a request, served from the cache when possible.
    ///
    /// # Errors
    ///
    /// Empty selection, unknown body, cache or encoder failure.
    pub fn animation_bytes(&self, request: &AnimationRequest) -> OrreryResult<Vec<u8>> {
        debug!(bodies = ?request.bodies, three_d = request.three_d, "Animation");
        let bodies = request.resolve(&self.registry)?;
        let names: Vec<&str> = bodies.iter().map(|b| b.name.as_str()).collect();
        let key = animation_filename(&names, request.three_d);

        self.cache.get_or_render(&key, || {
            let scene = self.animation_scene(&bodies, request.three_d);
            info!(key = %key, frames = scene.frames.len(), "Rendering animation");
            self.renderer.render(&scene)
        })
    }

    /// Base64 animation text for a request.
    ///
    /// # Errors
    ///
    /// See [`Orrery::animation_bytes`].
    pub fn animate(&self, request: &AnimationRequest) -> OrreryResult<String> {
        self.animation_bytes(request).map(|bytes| encode_base64(&bytes))
    }

    fn animation_scene(&self, bodies: &[&Body], three_d: bool) -> AnimationScene {
        let title = if three_d { "3D Planet Orbits" } else { "2D Planet Orbits" };
        let size = self.config.animation.size;
        let mut background = orbit_figure(Figure::new(title, three_d).with_size(size, size), bodies, three_d);
        background.legend = false;
        push_primary(&mut background, "Sun", Color::YELLOW);

        let owned: Vec<Body> = bodies.iter().map(|b| (*b).clone()).collect();
        let mut driver = AnimationDriver::with_pacing(
            owned,
            three_d,
            self.config.animation.frames_per_revolution,
        );
        let frames = driver
            .frames()
            .iter()
            .map(|markers| markers.iter().map(Position::to_array).collect())
            .collect();

        AnimationScene {
            background,
            frames,
            marker_colors: (0..bodies.len())
                .map(|i| MARKER_PALETTE[i % MARKER_PALETTE.len()])
                .collect(),
            marker_radius: MARKER_RADIUS,
            fps: self.config.animation.fps,
        }
    }

    /// Circular and eccentric polar angle over 800 years for one body.
    ///
    /// # Errors
    ///
    /// Unknown body or solver failure.
    pub fn angle_vs_time(&self, body: &str) -> OrreryResult<String> {
        debug!(body, "Angle vs time");
        let body = self.registry.get(body)?;
        let series = angle_vs_time(body)?;

        let to_points = |angles: &[f64]| -> Vec<[f64; 3]> {
            series
                .times
                .iter()
                .zip(angles)
                .map(|(t, theta)| [*t, *theta, 0.0])
                .collect()
        };

        let mut figure = self
            .figure("Angle vs Time", false)
            .with_labels("time/years", "orbit polar angle/rad")
            .with_aspect(Aspect::Auto);
        figure.push(Series::line(Some("Circular"), to_points(series.circular.as_slice()), cycle_color(0)));
        figure.push(Series::line(Some("Eccentric"), to_points(series.eccentric.as_slice()), cycle_color(1)));
        Ok(to_svg(&figure))
    }

    /// Spirograph of two bodies over their orbit paths.
    ///
    /// # Errors
    ///
    /// Wrong number of bodies or unknown body.
    pub fn spirograph(&self, request: &SpirographRequest) -> OrreryResult<String> {
        debug!(bodies = ?request.bodies, "Spirograph");
        let pair = request.resolve(&self.registry)?;
        let segments = spirograph(&pair)?;

        let mut figure = self.figure("Spirograph", false).with_labels("x/AU", "y/AU");
        let ink = Color::new(0, 0, 0, 160);
        for segment in &segments {
            figure.push(Series::segment(segment.from.to_array(), segment.to.to_array(), ink, 0.5));
        }
        let figure = orbit_figure(figure, &pair, false);
        Ok(to_svg(&figure))
    }

    /// Paths of other bodies as seen from a center body.
    ///
    /// # Errors
    ///
    /// Empty selection or unknown body.
    pub fn relative_orbits(&self, request: &RelativeOrbitRequest) -> OrreryResult<String> {
        debug!(center = %request.center, bodies = ?request.bodies, three_d = request.three_d, "Relative orbits");
        let (center, bodies) = request.resolve(&self.registry)?;

        let mut figure = self
            .figure("Plot Imaginary Orbit", request.three_d)
            .with_labels("x/AU", "y/AU");
        if request.three_d {
            figure = figure.with_z_label("z/AU");
        }
        push_primary(&mut figure, &center.name, cycle_color(0));
        for (i, body) in bodies.iter().enumerate() {
            let points = relative_orbit(center, body, request.three_d)
                .iter()
                .map(Position::to_array)
                .collect();
            figure.push(Series::line(Some(body.name.as_str()), points, cycle_color(i + 1)));
        }
        Ok(to_svg(&figure))
    }
}

fn orbit_figure(figure: Figure, bodies: &[&Body], three_d: bool) -> Figure {
    let mut figure = figure.with_labels("x/AU", "y/AU");
    if three_d {
        figure = figure.with_z_label("z/AU");
    }
    for (i, body) in bodies.iter().enumerate() {
        let points = orbit_path(body, three_d)
            .iter()
            .map(Position::to_array)
            .collect();
        figure.push(Series::line(Some(body.name.as_str()), points, cycle_color(i)));
    }
    figure
}

fn push_primary(figure: &mut Figure, label: &str, color: Color) {
    figure.push(Series::marker(Some(label), [0.0, 0.0, 0.0], color, MARKER_RADIUS));
}
