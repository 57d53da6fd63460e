//! SVG output for static figures.

use std::fmt::Write as FmtWrite;

use super::{Anchor, Color, Figure, RenderCommand};

/// Render a figure as a standalone SVG document.
#[must_use]
pub fn to_svg(figure: &Figure) -> String {
    commands_to_svg(&figure.render_commands(), figure.width, figure.height)
}

/// Serialize render commands into an SVG document of the given size.
#[must_use]
pub fn commands_to_svg(commands: &[RenderCommand], width: u32, height: u32) -> String {
    let mut svg = String::with_capacity(64 * commands.len() + 256);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );

    for command in commands {
        match command {
            RenderCommand::Clear { color } => {
                let _ = writeln!(
                    svg,
                    r#"<rect width="100%" height="100%" fill="{}"/>"#,
                    color.to_hex()
                );
            }
            RenderCommand::DrawLine {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                let _ = writeln!(
                    svg,
                    r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{width}"{}/>"#,
                    color.to_hex(),
                    opacity("stroke", *color)
                );
            }
            RenderCommand::DrawPath {
                points,
                color,
                width,
            } => {
                if points.is_empty() {
                    continue;
                }
                svg.push_str(r#"<polyline points=""#);
                for (i, (x, y)) in points.iter().enumerate() {
                    if i > 0 {
                        svg.push(' ');
                    }
                    let _ = write!(svg, "{x:.2},{y:.2}");
                }
                let _ = writeln!(
                    svg,
                    r#"" fill="none" stroke="{}" stroke-width="{width}" stroke-linejoin="round"{}/>"#,
                    color.to_hex(),
                    opacity("stroke", *color)
                );
            }
            RenderCommand::DrawCircle {
                x,
                y,
                radius,
                color,
                filled,
            } => {
                let paint = if *filled {
                    format!(r#"fill="{}"{}"#, color.to_hex(), opacity("fill", *color))
                } else {
                    format!(r#"fill="none" stroke="{}""#, color.to_hex())
                };
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{x:.2}" cy="{y:.2}" r="{radius}" {paint}/>"#
                );
            }
            RenderCommand::DrawText {
                x,
                y,
                text,
                color,
                size,
                anchor,
            } => {
                if text.is_empty() {
                    continue;
                }
                let anchor = match anchor {
                    Anchor::Start => "start",
                    Anchor::Middle => "middle",
                    Anchor::End => "end",
                };
                let _ = writeln!(
                    svg,
                    r#"<text x="{x:.2}" y="{y:.2}" font-size="{size}" fill="{}" text-anchor="{anchor}">{}</text>"#,
                    color.to_hex(),
                    escape(text)
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn opacity(attr: &str, color: Color) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" {attr}-opacity="{:.3}""#, f64::from(color.a) / 255.0)
    }
}

/// Escape text for XML content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Series;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_svg_document_shape() {
        let mut fig = Figure::new("Kepler's Third Law", false).with_size(400, 300);
        fig.push(Series::line(
            Some("fit"),
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            Color::BLACK,
        ));
        let svg = to_svg(&fig);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="400""#));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("Kepler&#39;s Third Law"));
    }

    #[test]
    fn test_translucent_colors_emit_opacity() {
        let commands = vec![RenderCommand::DrawLine {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            color: Color::new(0, 0, 0, 51),
            width: 1.0,
        }];
        let svg = commands_to_svg(&commands, 10, 10);
        assert!(svg.contains(r#"stroke-opacity="0.200""#));
    }

    #[test]
    fn test_empty_path_skipped() {
        let commands = vec![RenderCommand::DrawPath {
            points: Vec::new(),
            color: Color::BLACK,
            width: 1.0,
        }];
        assert!(!commands_to_svg(&commands, 10, 10).contains("polyline"));
    }
}
