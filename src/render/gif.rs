//! Animated GIF output.

use std::borrow::Cow;

use ::gif::{Encoder, Frame, Repeat};
use tracing::debug;

use super::raster::Canvas;
use super::{AnimationRenderer, AnimationScene, Color, RenderCommand};
use crate::error::{OrreryError, OrreryResult};

/// Encodes an [`AnimationScene`] as a looping GIF.
#[derive(Debug, Clone, Default)]
pub struct GifRenderer;

impl GifRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Frame delay in hundredths of a second.
    #[must_use]
    pub fn frame_delay(fps: u16) -> u16 {
        (100.0 / f64::from(fps.max(1))).round() as u16
    }
}

impl AnimationRenderer for GifRenderer {
    fn render(&self, scene: &AnimationScene) -> OrreryResult<Vec<u8>> {
        let width = u16::try_from(scene.background.width)
            .map_err(|_| OrreryError::render("figure too wide for GIF"))?;
        let height = u16::try_from(scene.background.height)
            .map_err(|_| OrreryError::render("figure too tall for GIF"))?;
        if scene.fps == 0 {
            return Err(OrreryError::render("fps must be at least 1"));
        }

        let viewport = scene.viewport();
        let mut base = Canvas::new(width, height, Color::WHITE);
        base.apply_all(&scene.background.render_commands_in(&viewport));

        let delay = Self::frame_delay(scene.fps);
        let mut bytes = Vec::new();
        {
            let mut encoder = Encoder::new(&mut bytes, width, height, &[])?;
            encoder.set_repeat(Repeat::Infinite)?;

            let empty = [Vec::new()];
            let frames: &[Vec<[f64; 3]>] = if scene.frames.is_empty() {
                &empty
            } else {
                &scene.frames
            };

            for markers in frames {
                let mut canvas = base.clone();
                for (j, point) in markers.iter().enumerate() {
                    let (x, y) = viewport.to_screen(*point);
                    let color = scene
                        .marker_colors
                        .get(j)
                        .copied()
                        .unwrap_or(Color::BLACK);
                    canvas.apply(&RenderCommand::DrawCircle {
                        x,
                        y,
                        radius: scene.marker_radius,
                        color,
                        filled: true,
                    });
                }

                let frame = Frame {
                    width,
                    height,
                    delay,
                    palette: Some(canvas.palette_rgb()),
                    buffer: Cow::Borrowed(canvas.pixels()),
                    ..Frame::default()
                };
                encoder.write_frame(&frame)?;
            }
        }

        debug!(frames = scene.frames.len(), bytes = bytes.len(), "Encoded GIF");
        Ok(bytes)
    }
}
