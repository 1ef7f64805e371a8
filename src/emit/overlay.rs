//! Overlay draw commands and the sinks that consume them.

use serde::{Deserialize, Serialize};

use super::OverlaySink;
use crate::classify::SymbolKind;
use crate::geometry::{Point, Rect};

#[cfg(feature = "rendering")]
use crate::error::{Error, Result};
#[cfg(feature = "rendering")]
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// RGBA color, components in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Overlay colors for each symbol kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindColors {
    /// Color for weld boxes (RGBA)
    pub weld: Rgba,
    /// Color for angle readings (RGBA)
    pub angle: Rgba,
    /// Color for plain boxed text (RGBA)
    pub plain: Rgba,
    /// Color for rejected boxed text (RGBA)
    pub rejected: Rgba,
    /// Opacity of the rectangle fill; zero disables filling
    pub fill_alpha: f32,
}

impl Default for KindColors {
    fn default() -> Self {
        Self {
            weld: [0.0, 1.0, 0.0, 1.0],     // Green
            angle: [0.0, 0.0, 1.0, 1.0],    // Blue
            plain: [0.5, 0.5, 0.5, 1.0],    // Gray
            rejected: [1.0, 0.0, 0.0, 1.0], // Red
            fill_alpha: 0.15,
        }
    }
}

impl KindColors {
    /// Outline color for `kind`.
    pub fn stroke(&self, kind: SymbolKind) -> Rgba {
        match kind {
            SymbolKind::Weld => self.weld,
            SymbolKind::Angle => self.angle,
            SymbolKind::Plain => self.plain,
            SymbolKind::Rejected => self.rejected,
        }
    }

    /// Translucent fill for `kind`, if filling is enabled.
    pub fn fill(&self, kind: SymbolKind) -> Option<Rgba> {
        if self.fill_alpha <= 0.0 {
            return None;
        }
        let [r, g, b, _] = self.stroke(kind);
        Some([r, g, b, self.fill_alpha])
    }
}

/// One overlay drawing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Rectangle outline with optional fill
    Rect {
        /// Rectangle to draw
        rect: Rect,
        /// Outline color
        stroke: Rgba,
        /// Fill color
        fill: Option<Rgba>,
    },
    /// Filled dot
    CenterMarker {
        /// Dot center
        center: Point,
        /// Dot radius
        radius: f64,
        /// Dot color
        color: Rgba,
    },
    /// Text placed with its baseline starting at `anchor`
    Label {
        /// Text to show
        text: String,
        /// Baseline start
        anchor: Point,
        /// Text color
        color: Rgba,
    },
}

/// Collects draw commands for a caller-side renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandList {
    /// Commands in emission order
    pub commands: Vec<DrawCommand>,
}

impl OverlaySink for CommandList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Writes draw commands as an SVG document in page coordinates.
#[derive(Debug, Clone)]
pub struct SvgOverlay {
    width: f64,
    height: f64,
    line_width: f32,
    font_size: f32,
    body: String,
}

impl SvgOverlay {
    /// Start an overlay covering a `width` × `height` page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            line_width: 1.0,
            font_size: 10.0,
            body: String::new(),
        }
    }

    /// Set the outline width.
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// The complete SVG document.
    pub fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">{}</svg>"#,
            self.width, self.height, self.width, self.height, self.body
        )
    }
}

impl OverlaySink for SvgOverlay {
    fn draw(&mut self, command: DrawCommand) {
        let element = match command {
            DrawCommand::Rect { rect, stroke, fill } => {
                let fill = fill.map_or_else(|| "none".to_string(), |c| color_to_svg(&c));
                format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    fill,
                    color_to_svg(&stroke),
                    self.line_width
                )
            },
            DrawCommand::CenterMarker {
                center,
                radius,
                color,
            } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                center.x,
                center.y,
                radius,
                color_to_svg(&color)
            ),
            DrawCommand::Label {
                text,
                anchor,
                color,
            } => format!(
                r#"<text x="{}" y="{}" font-size="{}" fill="{}">{}</text>"#,
                anchor.x,
                anchor.y,
                self.font_size,
                color_to_svg(&color),
                escape_xml(&text)
            ),
        };
        self.body.push_str(&element);
    }
}

/// Convert RGBA color to SVG rgba() format.
fn color_to_svg(color: &Rgba) -> String {
    format!(
        "rgba({},{},{},{})",
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
        color[3]
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Paints draw commands onto a page image.
///
/// Labels are drawn as a filled tab sized to the text (6 px per character,
/// 8 px tall, sitting on the anchor); no text is rasterized. Callers that
/// need readable labels use [`SvgOverlay`] or draw glyphs themselves.
#[cfg(feature = "rendering")]
#[cfg_attr(docsrs, doc(cfg(feature = "rendering")))]
pub struct PixmapOverlay {
    pixmap: Pixmap,
    line_width: f32,
    transform: Transform,
}

#[cfg(feature = "rendering")]
impl PixmapOverlay {
    /// A blank white canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("invalid canvas size {}x{}", width, height)))?;
        pixmap.fill(Color::WHITE);
        Ok(Self::from_pixmap(pixmap))
    }

    /// Draw over an existing page image.
    pub fn from_image(image: &image::DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        let size = tiny_skia::IntSize::from_wh(width, height)
            .ok_or_else(|| Error::Render(format!("invalid image size {}x{}", width, height)))?;
        // Pixmaps hold premultiplied alpha
        let mut data = rgba.into_raw();
        for px in data.chunks_exact_mut(4) {
            let alpha = u16::from(px[3]);
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * alpha + 127) / 255) as u8;
            }
        }
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| Error::Render("Failed to create pixmap".to_string()))?;
        Ok(Self::from_pixmap(pixmap))
    }

    fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            line_width: 2.0,
            transform: Transform::identity(),
        }
    }

    /// Map page coordinates to pixels by a uniform scale (e.g. dpi / 72).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform = Transform::from_scale(scale, scale);
        self
    }

    /// Set the outline width in pixels.
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// The painted canvas.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode the canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))
    }

    /// Encode the canvas as PNG and write it to `path`.
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }

    fn paint(color: &Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(
            Color::from_rgba(color[0], color[1], color[2], color[3]).unwrap_or(Color::BLACK),
        );
        paint.anti_alias = true;
        paint
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &Rgba) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32)
        {
            let path = PathBuilder::from_rect(rect);
            self.pixmap
                .fill_path(&path, &Self::paint(color), FillRule::Winding, self.transform, None);
        }
    }
}

#[cfg(feature = "rendering")]
impl OverlaySink for PixmapOverlay {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Rect { rect, stroke, fill } => {
                if let Some(fill) = fill {
                    self.fill_rect(rect.x, rect.y, rect.width, rect.height, &fill);
                }
                let Some(bounds) = tiny_skia::Rect::from_xywh(
                    rect.x as f32,
                    rect.y as f32,
                    rect.width as f32,
                    rect.height as f32,
                ) else {
                    log::trace!("skipping degenerate overlay rect {:?}", rect);
                    return;
                };
                let outline = Stroke {
                    width: self.line_width,
                    ..Stroke::default()
                };
                let path = PathBuilder::from_rect(bounds);
                self.pixmap
                    .stroke_path(&path, &Self::paint(&stroke), &outline, self.transform, None);
            },
            DrawCommand::CenterMarker {
                center,
                radius,
                color,
            } => {
                if let Some(path) =
                    PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
                {
                    self.pixmap.fill_path(
                        &path,
                        &Self::paint(&color),
                        FillRule::Winding,
                        self.transform,
                        None,
                    );
                }
            },
            DrawCommand::Label {
                text,
                anchor,
                color,
            } => {
                let width = 6.0 * text.chars().count() as f64;
                self.fill_rect(anchor.x, anchor.y - 8.0, width, 8.0, &color);
            },
        }
    }
}
