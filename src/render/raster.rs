//! Indexed-color raster canvas.
//!
//! Executes [`RenderCommand`]s into a palette-indexed pixel buffer suitable
//! for GIF frames. Text commands are skipped; raster output carries no font.

use super::{Color, RenderCommand};

/// Largest palette a GIF frame can hold.
pub const MAX_PALETTE: usize = 256;

/// Palette-indexed pixel buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    palette: Vec<Color>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    #[must_use]
    pub fn new(width: u16, height: u16, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; usize::from(width) * usize::from(height)],
            palette: vec![background],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Palette indices, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette as packed `rgb` triples.
    #[must_use]
    pub fn palette_rgb(&self) -> Vec<u8> {
        self.palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// Number of palette entries in use.
    #[must_use]
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Color of the pixel at `(x, y)`, if inside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.palette.get(usize::from(self.pixels[idx])).copied()
    }

    /// Palette index for `color`, adding it when there is room and falling
    /// back to the nearest existing entry otherwise.
    fn index_of(&mut self, color: Color) -> u8 {
        let opaque = Color::rgb(color.r, color.g, color.b);
        if let Some(i) = self.palette.iter().position(|c| *c == opaque) {
            return i as u8;
        }
        if self.palette.len() < MAX_PALETTE {
            self.palette.push(opaque);
            return (self.palette.len() - 1) as u8;
        }
        let distance = |c: &Color| {
            let dr = i32::from(c.r) - i32::from(opaque.r);
            let dg = i32::from(c.g) - i32::from(opaque.g);
            let db = i32::from(c.b) - i32::from(opaque.b);
            dr * dr + dg * dg + db * db
        };
        self.palette
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| distance(c))
            .map_or(0, |(i, _)| i as u8)
    }

    fn put(&mut self, x: i64, y: i64, index: u8) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = y as usize * usize::from(self.width) + x as usize;
        self.pixels[idx] = index;
    }

    fn stamp(&mut self, x: i64, y: i64, half: i64, index: u8) {
        for dy in -half..=half {
            for dx in -half..=half {
                self.put(x + dx, y + dy, index);
            }
        }
    }

    /// Fill the whole canvas.
    pub fn clear(&mut self, color: Color) {
        let index = self.index_of(color);
        self.pixels.fill(index);
    }

    /// Bresenham line with a square pen of roughly `width` pixels.
    pub fn draw_line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), color: Color, width: f64) {
        if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
            return;
        }
        let index = self.index_of(color);
        let half = ((width - 1.0) / 2.0).round().max(0.0) as i64;

        let (mut x, mut y) = (x1.round() as i64, y1.round() as i64);
        let (xe, ye) = (x2.round() as i64, y2.round() as i64);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x, y, half, index);
            if x == xe && y == ye {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled or outlined circle.
    pub fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color, filled: bool) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
            return;
        }
        let index = self.index_of(color);
        let r = radius.max(0.5);
        let reach = r.ceil() as i64;
        let (ox, oy) = (cx.round() as i64, cy.round() as i64);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let inside = if filled { d <= r } else { (d - r).abs() <= 0.5 };
                if inside {
                    self.put(ox + dx, oy + dy, index);
                }
            }
        }
    }

    /// Execute one render command.
    pub fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::Clear { color } => self.clear(*color),
            RenderCommand::DrawLine {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => self.draw_line((*x1, *y1), (*x2, *y2), *color, *width),
            RenderCommand::DrawPath {
                points,
                color,
                width,
            } => {
                for pair in points.windows(2) {
                    self.draw_line(pair[0], pair[1], *color, *width);
                }
            }
            RenderCommand::DrawCircle {
                x,
                y,
                radius,
                color,
                filled,
            } => self.draw_circle(*x, *y, *radius, *color, *filled),
            RenderCommand::DrawText { .. } => {}
        }
    }

    /// Execute a sequence of render commands.
    pub fn apply_all(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}
