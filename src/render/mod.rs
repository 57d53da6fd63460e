//! Platform-agnostic plotting for orbit figures.
//!
//! A [`Figure`] holds labelled data series in world units. Laying it out
//! produces screen-space [`RenderCommand`]s, which the back ends turn into
//! output: [`svg`] for static figures and [`gif`] for animations.

pub mod gif;
pub mod raster;
pub mod svg;

use serde::{Deserialize, Serialize};

use crate::error::OrreryResult;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const GRID: Self = Self::rgb(220, 220, 220);
    pub const AXIS: Self = Self::rgb(90, 90, 90);

    pub const ROYAL_BLUE: Self = Self::rgb(65, 105, 225);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const MEDIUM_PURPLE: Self = Self::rgb(147, 112, 219);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const SUN: Self = Self::rgb(255, 204, 0);
    pub const TAB_BLUE: Self = Self::rgb(31, 119, 180);
}

/// Marker colors for animated bodies, by input position.
pub const MARKER_PALETTE: [Color; 9] = [
    Color::ROYAL_BLUE,
    Color::ORANGE,
    Color::GREEN,
    Color::RED,
    Color::MEDIUM_PURPLE,
    Color::BLUE,
    Color::ORANGE,
    Color::GREEN,
    Color::YELLOW,
];

/// Line colors cycled across static series.
pub const LINE_CYCLE: [Color; 6] = [
    Color::TAB_BLUE,
    Color::rgb(255, 127, 14),
    Color::rgb(44, 160, 44),
    Color::rgb(214, 39, 40),
    Color::rgb(148, 103, 189),
    Color::rgb(140, 86, 75),
];

/// Color for the `index`-th series.
#[must_use]
pub const fn cycle_color(index: usize) -> Color {
    LINE_CYCLE[index % LINE_CYCLE.len()]
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Style {
    /// Connected polyline.
    Line { color: Color, width: f64 },
    /// Unconnected dots.
    Markers { color: Color, radius: f64 },
    /// Polyline with a dot on every point.
    LineMarkers { color: Color, width: f64, radius: f64 },
}

impl Style {
    /// Primary color of the style.
    #[must_use]
    pub const fn color(&self) -> Color {
        match *self {
            Self::Line { color, .. }
            | Self::Markers { color, .. }
            | Self::LineMarkers { color, .. } => color,
        }
    }
}

/// Ordered points (world units) with a label and a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<[f64; 3]>,
    pub style: Style,
}

impl Series {
    /// Solid line of width 1.5.
    #[must_use]
    pub fn line(label: Option<&str>, points: Vec<[f64; 3]>, color: Color) -> Self {
        Self {
            label: label.map(str::to_string),
            points,
            style: Style::Line { color, width: 1.5 },
        }
    }

    /// A single dot.
    #[must_use]
    pub fn marker(label: Option<&str>, point: [f64; 3], color: Color, radius: f64) -> Self {
        Self {
            label: label.map(str::to_string),
            points: vec![point],
            style: Style::Markers { color, radius },
        }
    }

    /// Unlabelled line between two points.
    #[must_use]
    pub fn segment(from: [f64; 3], to: [f64; 3], color: Color, width: f64) -> Self {
        Self {
            label: None,
            points: vec![from, to],
            style: Style::Line { color, width },
        }
    }
}

/// Mapping from world coordinates to the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Drop `z`.
    Planar,
    /// Orthographic view from the given azimuth and elevation (radians).
    Oblique { azimuth: f64, elevation: f64 },
}

impl Projection {
    /// Default 3D view: azimuth -60°, elevation 30°.
    #[must_use]
    pub fn oblique() -> Self {
        Self::Oblique {
            azimuth: (-60f64).to_radians(),
            elevation: 30f64.to_radians(),
        }
    }

    /// Project a world point onto the drawing plane.
    #[must_use]
    pub fn project(&self, [x, y, z]: [f64; 3]) -> (f64, f64) {
        match *self {
            Self::Planar => (x, y),
            Self::Oblique { azimuth, elevation } => {
                let (sa, ca) = azimuth.sin_cos();
                let (se, ce) = elevation.sin_cos();
                let u = -x * sa + y * ca;
                let v = -x * se * ca - y * se * sa + z * ce;
                (u, v)
            }
        }
    }

    /// Whether this is a 3D view.
    #[must_use]
    pub const fn is_3d(&self) -> bool {
        matches!(self, Self::Oblique { .. })
    }
}

/// Whether both axes share one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspect {
    Equal,
    Auto,
}

/// Camera over the plot area. Screen `y` grows downwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom_x: f64,
    pub zoom_y: f64,
    /// Plot area in pixels.
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom_x: 1.0,
            zoom_y: 1.0,
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Camera {
    /// Convert world coordinates to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let sx = self.left + self.width / 2.0 + (x - self.center_x) * self.zoom_x;
        let sy = self.top + self.height / 2.0 - (y - self.center_y) * self.zoom_y;
        (sx, sy)
    }

    /// Convert screen coordinates to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        let x = (sx - self.left - self.width / 2.0) / self.zoom_x + self.center_x;
        let y = (self.top + self.height / 2.0 - sy) / self.zoom_y + self.center_y;
        (x, y)
    }

    /// Adjust zoom to fit given bounds, leaving a 5% border.
    pub fn fit_bounds(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64, aspect: Aspect) {
        self.center_x = (min_x + max_x) / 2.0;
        self.center_y = (min_y + max_y) / 2.0;

        let width_span = max_x - min_x;
        let height_span = max_y - min_y;

        let zoom_x = if width_span > 0.0 { self.width / width_span * 0.9 } else { 1.0 };
        let zoom_y = if height_span > 0.0 { self.height / height_span * 0.9 } else { 1.0 };

        match aspect {
            Aspect::Equal => {
                let zoom = zoom_x.min(zoom_y);
                self.zoom_x = zoom;
                self.zoom_y = zoom;
            }
            Aspect::Auto => {
                self.zoom_x = zoom_x;
                self.zoom_y = zoom_y;
            }
        }
    }

    /// Visible world range `(min_x, max_x, min_y, max_y)`.
    #[must_use]
    pub fn visible(&self) -> (f64, f64, f64, f64) {
        let (x0, y1) = self.screen_to_world(self.left, self.top);
        let (x1, y0) = self.screen_to_world(self.left + self.width, self.top + self.height);
        (x0, x1, y0, y1)
    }
}

/// Projection plus camera: everything needed to place a world point.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub projection: Projection,
    pub camera: Camera,
}

impl Viewport {
    /// World point to screen pixel.
    #[must_use]
    pub fn to_screen(&self, point: [f64; 3]) -> (f64, f64) {
        let (u, v) = self.projection.project(point);
        self.camera.world_to_screen(u, v)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Platform-agnostic render command in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill the whole canvas.
    Clear { color: Color },

    /// Draw a circle.
    DrawCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
        filled: bool,
    },

    /// Draw a line.
    DrawLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },

    /// Draw a polyline.
    DrawPath {
        points: Vec<(f64, f64)>,
        color: Color,
        width: f64,
    },

    /// Draw text.
    DrawText {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        size: f64,
        anchor: Anchor,
    },
}

/// Margins around the plot area (left, right, top, bottom) in pixels.
const MARGINS: (f64, f64, f64, f64) = (70.0, 20.0, 50.0, 60.0);

/// A complete figure: axes, labels and data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub projection: Projection,
    pub aspect: Aspect,
    pub x_label: String,
    pub y_label: String,
    pub z_label: Option<String>,
    pub grid: bool,
    pub legend: bool,
    pub series: Vec<Series>,
}

impl Figure {
    /// Empty 800×800 figure with a grid and a legend.
    #[must_use]
    pub fn new(title: impl Into<String>, three_d: bool) -> Self {
        Self {
            title: title.into(),
            width: 800,
            height: 800,
            projection: if three_d { Projection::oblique() } else { Projection::Planar },
            aspect: Aspect::Equal,
            x_label: String::new(),
            y_label: String::new(),
            z_label: None,
            grid: true,
            legend: true,
            series: Vec::new(),
        }
    }

    /// Set the canvas size in pixels.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the x and y axis labels.
    #[must_use]
    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    /// Set the z axis label (3D only).
    #[must_use]
    pub fn with_z_label(mut self, z: impl Into<String>) -> Self {
        self.z_label = Some(z.into());
        self
    }

    /// Set the aspect handling.
    #[must_use]
    pub const fn with_aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = aspect;
        self
    }

    /// Append a series.
    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    /// Whether the figure uses a 3D projection.
    #[must_use]
    pub const fn is_3d(&self) -> bool {
        self.projection.is_3d()
    }

    /// Fit the camera to the figure's data plus `extra` points.
    #[must_use]
    pub fn viewport_with(&self, extra: &[[f64; 3]]) -> Viewport {
        let (left, right, top, bottom) = MARGINS;
        let mut camera = Camera {
            left,
            top,
            width: f64::from(self.width) - left - right,
            height: f64::from(self.height) - top - bottom,
            ..Camera::default()
        };

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        let points = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .chain(extra.iter());
        for point in points {
            let (u, v) = self.projection.project(*point);
            if u.is_finite() && v.is_finite() {
                min_x = min_x.min(u);
                max_x = max_x.max(u);
                min_y = min_y.min(v);
                max_y = max_y.max(v);
            }
        }
        if min_x > max_x {
            (min_x, max_x, min_y, max_y) = (-1.0, 1.0, -1.0, 1.0);
        }
        if max_x - min_x <= f64::EPSILON {
            min_x -= 1.0;
            max_x += 1.0;
        }
        if max_y - min_y <= f64::EPSILON {
            min_y -= 1.0;
            max_y += 1.0;
        }

        camera.fit_bounds(min_x, max_x, min_y, max_y, self.aspect);
        Viewport {
            projection: self.projection,
            camera,
        }
    }

    /// Fit the camera to the figure's data.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport_with(&[])
    }

    /// Lay the figure out as screen-space commands.
    #[must_use]
    pub fn render_commands(&self) -> Vec<RenderCommand> {
        self.render_commands_in(&self.viewport())
    }

    /// Lay the figure out in a given viewport.
    #[must_use]
    pub fn render_commands_in(&self, viewport: &Viewport) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::Clear { color: Color::WHITE }];

        if self.is_3d() {
            self.push_3d_axes(viewport, &mut commands);
        } else {
            self.push_2d_axes(&viewport.camera, &mut commands);
        }

        for series in &self.series {
            push_series(series, viewport, &mut commands);
        }

        if self.legend {
            self.push_legend(&viewport.camera, &mut commands);
        }

        commands.push(RenderCommand::DrawText {
            x: f64::from(self.width) / 2.0,
            y: 30.0,
            text: self.title.clone(),
            color: Color::BLACK,
            size: 18.0,
            anchor: Anchor::Middle,
        });

        commands
    }

    fn push_2d_axes(&self, camera: &Camera, commands: &mut Vec<RenderCommand>) {
        let (x0, x1, y0, y1) = camera.visible();
        let (left, top) = (camera.left, camera.top);
        let (right, bottom) = (left + camera.width, top + camera.height);

        let x_step = nice_step(x1 - x0);
        let mut tick = (x0 / x_step).ceil() * x_step;
        while tick <= x1 {
            let (sx, _) = camera.world_to_screen(tick, 0.0);
            if self.grid {
                commands.push(line(sx, top, sx, bottom, Color::GRID, 1.0));
            }
            commands.push(line(sx, bottom, sx, bottom + 5.0, Color::AXIS, 1.0));
            commands.push(text(sx, bottom + 18.0, format_tick(tick, x_step), 11.0, Anchor::Middle));
            tick += x_step;
        }

        let y_step = nice_step(y1 - y0);
        let mut tick = (y0 / y_step).ceil() * y_step;
        while tick <= y1 {
            let (_, sy) = camera.world_to_screen(0.0, tick);
            if self.grid {
                commands.push(line(left, sy, right, sy, Color::GRID, 1.0));
            }
            commands.push(line(left - 5.0, sy, left, sy, Color::AXIS, 1.0));
            commands.push(text(left - 8.0, sy + 4.0, format_tick(tick, y_step), 11.0, Anchor::End));
            tick += y_step;
        }

        for (xa, ya, xb, yb) in [
            (left, top, right, top),
            (right, top, right, bottom),
            (right, bottom, left, bottom),
            (left, bottom, left, top),
        ] {
            commands.push(line(xa, ya, xb, yb, Color::AXIS, 1.0));
        }

        commands.push(text(
            left + camera.width / 2.0,
            bottom + 40.0,
            self.x_label.clone(),
            13.0,
            Anchor::Middle,
        ));
        commands.push(text(15.0, top - 10.0, self.y_label.clone(), 13.0, Anchor::Start));
    }

    fn push_3d_axes(&self, viewport: &Viewport, commands: &mut Vec<RenderCommand>) {
        let mut lo = [0.0f64; 3];
        let mut hi = [0.0f64; 3];
        for point in self.series.iter().flat_map(|s| s.points.iter()) {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(point[axis]);
                hi[axis] = hi[axis].max(point[axis]);
            }
        }

        let labels = [
            self.x_label.as_str(),
            self.y_label.as_str(),
            self.z_label.as_deref().unwrap_or(""),
        ];
        for axis in 0..3 {
            let mut from = [0.0; 3];
            let mut to = [0.0; 3];
            from[axis] = lo[axis];
            to[axis] = hi[axis];
            if (to[axis] - from[axis]).abs() <= f64::EPSILON {
                continue;
            }
            let (x1, y1) = viewport.to_screen(from);
            let (x2, y2) = viewport.to_screen(to);
            commands.push(line(x1, y1, x2, y2, Color::AXIS, 1.0));
            commands.push(text(x2 + 4.0, y2 - 4.0, labels[axis].to_string(), 12.0, Anchor::Start));
        }
    }

    fn push_legend(&self, camera: &Camera, commands: &mut Vec<RenderCommand>) {
        let right = camera.left + camera.width;
        let mut y = camera.top + 18.0;
        for series in &self.series {
            let Some(label) = &series.label else { continue };
            let color = series.style.color();
            let x = right - 130.0;
            match series.style {
                Style::Markers { radius, .. } => commands.push(RenderCommand::DrawCircle {
                    x: x + 10.0,
                    y,
                    radius: radius.min(6.0),
                    color,
                    filled: true,
                }),
                Style::Line { width, .. } | Style::LineMarkers { width, .. } => {
                    commands.push(line(x, y, x + 20.0, y, color, width.max(2.0)));
                }
            }
            commands.push(text(x + 28.0, y + 4.0, label.clone(), 12.0, Anchor::Start));
            y += 18.0;
        }
    }
}

fn push_series(series: &Series, viewport: &Viewport, commands: &mut Vec<RenderCommand>) {
    let screen: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| viewport.to_screen(*p))
        .collect();

    match series.style {
        Style::Line { color, width } => {
            commands.push(RenderCommand::DrawPath {
                points: screen,
                color,
                width,
            });
        }
        Style::Markers { color, radius } => {
            commands.extend(screen.iter().map(|&(x, y)| RenderCommand::DrawCircle {
                x,
                y,
                radius,
                color,
                filled: true,
            }));
        }
        Style::LineMarkers {
            color,
            width,
            radius,
        } => {
            commands.extend(screen.iter().map(|&(x, y)| RenderCommand::DrawCircle {
                x,
                y,
                radius,
                color,
                filled: true,
            }));
            commands.push(RenderCommand::DrawPath {
                points: screen,
                color,
                width,
            });
        }
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) -> RenderCommand {
    RenderCommand::DrawLine {
        x1,
        y1,
        x2,
        y2,
        color,
        width,
    }
}

fn text(x: f64, y: f64, text: String, size: f64, anchor: Anchor) -> RenderCommand {
    RenderCommand::DrawText {
        x,
        y,
        text,
        color: Color::BLACK,
        size,
        anchor,
    }
}

/// Tick spacing of 1, 2 or 5 × 10ⁿ giving roughly six ticks over `span`.
#[must_use]
pub fn nice_step(span: f64) -> f64 {
    if !(span.is_finite() && span > 0.0) {
        return 1.0;
    }
    let raw = span / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Tick label with as many decimals as the step needs.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    // Avoid "-0".
    let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

/// Encodes an animation of moving markers over a static figure.
pub trait AnimationRenderer: Send + Sync {
    /// Render every frame of `scene` and return the encoded artifact.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails.
    fn render(&self, scene: &AnimationScene) -> OrreryResult<Vec<u8>>;
}

/// Static background plus per-frame marker positions.
#[derive(Debug, Clone)]
pub struct AnimationScene {
    /// Drawn under every frame.
    pub background: Figure,
    /// `frames[i][j]` is marker `j` at frame `i`.
    pub frames: Vec<Vec<[f64; 3]>>,
    /// One color per marker.
    pub marker_colors: Vec<Color>,
    /// Marker radius in pixels.
    pub marker_radius: f64,
    /// Playback rate.
    pub fps: u16,
}

impl AnimationScene {
    /// Viewport covering the background and every marker position.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let extra: Vec<[f64; 3]> = self.frames.iter().flatten().copied().collect();
        self.background.viewport_with(&extra)
    }
}
