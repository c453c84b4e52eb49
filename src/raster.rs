//! Pixel rendering for the on-screen gauge.
//!
//! [`build_scene`] maps the 40x40 drawing space onto a frame and records a
//! list of [`DrawCommand`]s; [`Scene::render`] rasterizes them into an RGBA
//! buffer with simple coverage anti-aliasing.

use rusttype::{point, Font, PositionedGlyph, Scale};
use std::f64::consts::PI;

use crate::config::{Color, Theme};
use crate::dims::*;
use crate::geometry::{LabelAnchor, GAP_DASH_OFFSET};
use crate::Gauge;

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl From<LabelAnchor> for TextAlign {
    fn from(anchor: LabelAnchor) -> Self {
        match anchor {
            LabelAnchor::Left => TextAlign::Start,
            LabelAnchor::Top => TextAlign::Middle,
            LabelAnchor::Right => TextAlign::End,
        }
    }
}

/// Drawing primitives in pixel coordinates.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Clear(Color),
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    /// Stroked circle. An empty `dash` strokes the whole ring.
    Ring {
        cx: f64,
        cy: f64,
        radius: f64,
        width: f64,
        dash: Vec<f64>,
        offset: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        tapered: bool,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        align: TextAlign,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_disc(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Ring {
                    cx,
                    cy,
                    radius,
                    width,
                    dash,
                    offset,
                    color,
                } => draw_ring(canvas, *cx, *cy, *radius, *width, dash, *offset, *color),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    tapered,
                    color,
                } => draw_line(canvas, *x0, *y0, *x1, *y1, *thickness, *tapered, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    size,
                    align,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, *size, *align, *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let idx = self.index(x, y)?;
        Some(Color::new(
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
        ))
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        let idx = (y * self.width + x) * 4;
        (x < self.width && y < self.height && idx + 4 <= self.frame.len()).then_some(idx)
    }

    /// Alpha-blends `color` over the pixel; out-of-bounds writes are dropped.
    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(idx) = self.index(x as usize, y as usize) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (channel, &s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (s as f32 * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Pixel bounds of a box, padded by one pixel and clipped to the canvas.
    fn clip(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> (i64, i64, i64, i64) {
        (
            (x0.floor() as i64 - 1).max(0),
            (y0.floor() as i64 - 1).max(0),
            (x1.ceil() as i64 + 1).min(self.width as i64 - 1),
            (y1.ceil() as i64 + 1).min(self.height as i64 - 1),
        )
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

/// Maps the 40x40 drawing space onto a `width` x `height` frame, centred.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    scale: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Viewport {
    fn new(width: usize, height: usize) -> Self {
        let scale = width.min(height) as f64 / VIEW_SIZE;
        Self {
            scale,
            origin_x: (width as f64 - VIEW_SIZE * scale) / 2.0,
            origin_y: (height as f64 - VIEW_SIZE * scale) / 2.0,
        }
    }

    fn x(&self, x: f64) -> f64 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f64) -> f64 {
        self.origin_y + y * self.scale
    }

    fn len(&self, length: f64) -> f64 {
        length * self.scale
    }
}

/// Records the gauge back to front, in the same order as the SVG output.
pub fn build_scene(gauge: &Gauge, theme: &Theme, width: usize, height: usize) -> Scene {
    let view = Viewport::new(width, height);
    let (cx, cy) = (view.x(CENTER), view.y(CENTER));
    let ring = |dash: &[f64], offset: f64, color: Color| DrawCommand::Ring {
        cx,
        cy,
        radius: view.len(RING_RADIUS),
        width: view.len(RING_WIDTH),
        dash: dash.iter().map(|d| view.len(*d)).collect(),
        offset: view.len(offset),
        color,
    };

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(theme.background));
    scene.add_command(DrawCommand::Ring {
        cx,
        cy,
        radius: view.len(BOUNDARY_RADIUS),
        width: view.len(BOUNDARY_WIDTH),
        dash: Vec::new(),
        offset: 0.0,
        color: theme.boundary,
    });
    scene.add_command(DrawCommand::Disc {
        cx,
        cy,
        radius: view.len(RING_RADIUS),
        color: theme.hole,
    });
    scene.add_command(ring(&[], 0.0, theme.ring));

    for segment in gauge.segments() {
        scene.add_command(ring(
            &segment.dash.dash_array(),
            segment.dash.offset,
            theme.segment_color(&segment.kind),
        ));
    }

    let ticks = gauge.major_ticks();
    if !ticks.is_empty() {
        scene.add_command(ring(&ticks.dash_array(), ticks.offset(), theme.ticks));
    }
    scene.add_command(ring(&BASE_DASH, GAP_DASH_OFFSET, theme.base));

    if !gauge.label().is_empty() {
        scene.add_command(DrawCommand::Text {
            x: cx,
            y: view.y(CAPTION_Y),
            text: gauge.label().to_string(),
            size: view.len(CAPTION_SIZE),
            align: TextAlign::Middle,
            color: theme.text,
        });
    }

    for label in gauge.value_labels() {
        scene.add_command(DrawCommand::Text {
            x: view.x(CENTER + label.x),
            y: view.y(CENTER + label.y),
            text: label.value.to_string(),
            size: view.len(VALUE_LABEL_SIZE),
            align: label.anchor.into(),
            color: theme.text,
        });
    }

    for tick in gauge.minor_ticks() {
        scene.add_command(DrawCommand::Line {
            x0: view.x(CENTER + tick.x1),
            y0: view.y(CENTER + tick.y1),
            x1: view.x(CENTER + tick.x2),
            y1: view.y(CENTER + tick.y2),
            thickness: view.len(MINOR_TICK_WIDTH),
            tapered: false,
            color: theme.ticks,
        });
    }

    // The needle points up at rest and rotates clockwise.
    let heading = (gauge.needle_angle() - 90.0).to_radians();
    let length = view.len(CENTER - NEEDLE_TIP_Y);
    scene.add_command(DrawCommand::Line {
        x0: cx,
        y0: cy,
        x1: cx + heading.cos() * length,
        y1: cy + heading.sin() * length,
        thickness: view.len(NEEDLE_WIDTH),
        tapered: true,
        color: theme.needle,
    });
    scene.add_command(DrawCommand::Disc {
        cx,
        cy,
        radius: view.len(CENTRE_RADIUS),
        color: theme.centre_fill,
    });
    scene.add_command(DrawCommand::Ring {
        cx,
        cy,
        radius: view.len(CENTRE_RADIUS),
        width: view.len(CENTRE_STROKE_WIDTH),
        dash: Vec::new(),
        offset: 0.0,
        color: theme.centre_stroke,
    });

    scene
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Whether the dash pattern draws at `position` along the stroke.
///
/// Follows SVG stroke dashing: an odd-length pattern repeats twice per period
/// and `offset` is the distance into the pattern at the start of the stroke.
pub(crate) fn dash_covers(dash: &[f64], offset: f64, position: f64) -> bool {
    if dash.is_empty() {
        return true;
    }
    let repeats = if dash.len() % 2 == 1 { 2 } else { 1 };
    let period: f64 = dash.iter().sum::<f64>() * repeats as f64;
    if period <= 0.0 {
        return false;
    }
    let mut p = (position + offset).rem_euclid(period);
    for (i, &len) in dash.iter().cycle().take(dash.len() * repeats).enumerate() {
        if p < len {
            return i % 2 == 0;
        }
        p -= len;
    }
    false
}

fn draw_disc(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let (x0, y0, x1, y1) = canvas.clip(cx - radius, cy - radius, cx + radius, cy + radius);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dist = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy);
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_ring(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    width: f64,
    dash: &[f64],
    offset: f64,
    color: Color,
) {
    let inner = radius - width / 2.0;
    let outer = radius + width / 2.0;
    let (x0, y0, x1, y1) = canvas.clip(cx - outer, cy - outer, cx + outer, cy + outer);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let dist = dx.hypot(dy);
            let aa = (outer + 0.5 - dist).clamp(0.0, 1.0) * (dist - inner + 0.5).clamp(0.0, 1.0);
            if aa <= 0.0 {
                continue;
            }
            // Circles stroke clockwise from three o'clock.
            let angle = dy.atan2(dx).rem_euclid(2.0 * PI);
            if dash_covers(dash, offset, angle * radius) {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_line(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f64,
    tapered: bool,
    color: Color,
) {
    let pad = thickness.ceil();
    let (bx0, by0, bx1, by1) = canvas.clip(
        x0.min(x1) - pad,
        y0.min(y1) - pad,
        x0.max(x1) + pad,
        y0.max(y1) + pad,
    );
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    for y in by0..=by1 {
        for x in bx0..=bx1 {
            let px = x as f64 + 0.5 - x0;
            let py = y as f64 + 0.5 - y0;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = (px - t * dx).hypot(py - t * dy);
            let local_thickness = if tapered {
                thickness * (1.0 - t * 0.95)
            } else {
                thickness
            };
            let aa = (1.0 - (dist - local_thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

/// Draws `text` vertically centred on `y`, aligned on `x` per `align`.
fn draw_text(
    canvas: &mut Canvas,
    x: f64,
    y: f64,
    text: &str,
    font: &Font,
    size: f64,
    align: TextAlign,
    color: Color,
) {
    let scale = Scale::uniform(size as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let width_px = (max_x - min_x) as f64;
    let height_px = (max_y - min_y) as f64;
    let left = match align {
        TextAlign::Start => x,
        TextAlign::Middle => x - width_px / 2.0,
        TextAlign::End => x - width_px,
    }
    .round() as i64;
    let top = (y - height_px / 2.0).round() as i64;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = left + (gx as i32 + bb.min.x - min_x) as i64;
                let py = top + (gy as i32 + bb.min.y - min_y) as i64;
                canvas.blend(px, py, color, v);
            });
        }
    }
}
