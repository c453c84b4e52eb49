//! Circular gauge: a 270 degree ring with colored segments, major and minor
//! ticks, value labels and a needle.
//!
//! [`GaugeGeometry`] holds all of the angle and arc math. [`Gauge`] runs it
//! once over a [`GaugeConfig`] and keeps the result together with the current
//! needle value, the only state that changes afterwards. The [`svg`] and
//! [`raster`] modules turn a gauge into SVG markup or pixels.
//!
//! ```
//! use gauge::{Gauge, GaugeConfig, Segment};
//!
//! let config = GaugeConfig::builder()
//!     .value(50.0)
//!     .major_ticks(vec![25.0, 50.0, 75.0])
//!     .segments(vec![Segment::new(75.0, 100.0, "danger")])
//!     .label("Load")
//!     .build();
//! let mut gauge = Gauge::new(config).unwrap();
//! assert_eq!(gauge.needle_angle(), 0.0);
//!
//! gauge.set_value(1000.0);
//! assert_eq!(gauge.value(), 100.0);
//! assert_eq!(gauge.needle_angle(), 135.0);
//! ```

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod dims;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod svg;

pub use config::{Color, DisplayConfig, GaugeConfig, Segment, Theme};
pub use error::GaugeError;
pub use geometry::{
    DashPattern, GaugeGeometry, LabelAnchor, MinorTick, Range, SegmentDash, ValueLabel,
};

// External crate imports
use log::{debug, info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use raster::Canvas;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for type-safe gauge updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeCommand {
    SetValue(f64),
}

/// One colored ring layer, drawn in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLayer {
    pub kind: String,
    pub dash: SegmentDash,
}

/// A laid-out gauge and its current needle value.
#[derive(Debug, Clone)]
pub struct Gauge {
    geometry: GaugeGeometry,
    label: String,
    major_ticks: DashPattern,
    value_labels: Vec<ValueLabel>,
    minor_ticks: Vec<MinorTick>,
    segments: Vec<SegmentLayer>,
    value: f64,
    needle_angle: f64,
}

impl Gauge {
    /// Lays out every tick, label and segment. The first input outside the
    /// range (or out of order) aborts construction.
    pub fn new(config: GaugeConfig) -> Result<Self, GaugeError> {
        let geometry = GaugeGeometry::new(Range::new(config.min, config.max)?);

        let value_labels = geometry.layout_value_labels(&config.values)?;
        let major_ticks = geometry.layout_major_ticks(&config.major_ticks)?;
        let minor_ticks = geometry.layout_minor_ticks(&config.minor_ticks)?;
        let segments = config
            .segments
            .iter()
            .map(|segment| {
                Ok(SegmentLayer {
                    kind: segment.kind.clone(),
                    dash: geometry.segment_dash(segment.start, segment.end)?,
                })
            })
            .collect::<Result<Vec<_>, GaugeError>>()?;

        let value = geometry.range().clamp(config.value.unwrap_or(config.min));
        debug!(
            "gauge {}..{}: {} labels, {} minor ticks, {} segments, value {}",
            config.min,
            config.max,
            value_labels.len(),
            minor_ticks.len(),
            segments.len(),
            value
        );

        Ok(Self {
            geometry,
            label: config.label,
            major_ticks,
            value_labels,
            minor_ticks,
            segments,
            value,
            needle_angle: geometry.needle_angle(value),
        })
    }

    pub fn geometry(&self) -> &GaugeGeometry {
        &self.geometry
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn major_ticks(&self) -> &DashPattern {
        &self.major_ticks
    }

    pub fn value_labels(&self) -> &[ValueLabel] {
        &self.value_labels
    }

    pub fn minor_ticks(&self) -> &[MinorTick] {
        &self.minor_ticks
    }

    pub fn segments(&self) -> &[SegmentLayer] {
        &self.segments
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Needle rotation in degrees, clockwise from twelve o'clock.
    pub fn needle_angle(&self) -> f64 {
        self.needle_angle
    }

    /// Moves the needle. Out-of-range values are clamped, never rejected.
    pub fn set_value(&mut self, value: f64) {
        self.value = self.geometry.range().clamp(value);
        self.needle_angle = self.geometry.needle_angle(self.value);
    }

    pub fn apply(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::SetValue(value) => self.set_value(value),
        }
    }

    pub fn to_svg(&self, theme: &Theme) -> String {
        svg::render(self, theme)
    }

    pub fn show(&mut self, display: &DisplayConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(display, None)
    }

    pub fn show_with_commands(
        &mut self,
        display: &DisplayConfig,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(display, Some(receiver))
    }

    fn run_window(
        &mut self,
        display: &DisplayConfig,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let font = load_font(display.font_data.as_deref());

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&display.title)
            .with_inner_size(LogicalSize::new(
                display.window_width as f64,
                display.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = frame_interval(display.max_framerate);
        let mut last_frame = Instant::now();
        info!("opened gauge window {}x{}", fb_width, fb_height);

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                self.apply(command);
                            }
                        }

                        let scene = raster::build_scene(self, &display.theme, fb_width, fb_height);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        scene.render(&mut canvas, font.as_ref());
                        if let Err(err) = pixels.render() {
                            warn!("failed to present frame: {err}");
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

const FALLBACK_FRAMERATE: f64 = 60.0;

/// Redraw interval for a framerate cap; unusable caps fall back to 60 fps.
fn frame_interval(max_framerate: f64) -> Duration {
    if max_framerate > 0.0 {
        if let Ok(interval) = Duration::try_from_secs_f64(1.0 / max_framerate) {
            return interval;
        }
    }
    warn!("invalid max framerate {max_framerate}; using {FALLBACK_FRAMERATE}");
    Duration::from_secs_f64(1.0 / FALLBACK_FRAMERATE)
}

fn load_font(data: Option<&[u8]>) -> Option<Font<'static>> {
    let Some(data) = data else {
        warn!("no font configured; value labels and caption will not be drawn");
        return None;
    };
    let font = Font::try_from_vec(data.to_vec());
    if font.is_none() {
        warn!("font data could not be parsed; value labels and caption will not be drawn");
    }
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> GaugeConfig {
        GaugeConfig::builder()
            .value(50.0)
            .values(vec![0.0, 50.0, 100.0])
            .major_ticks(vec![25.0, 50.0, 75.0])
            .minor_ticks(vec![10.0, 20.0, 30.0])
            .segments(vec![
                Segment::new(0.0, 25.0, "danger"),
                Segment::new(60.0, 80.0, "warn"),
            ])
            .label("Speed")
            .build()
    }

    #[test]
    fn new_lays_out_everything() {
        let gauge = Gauge::new(sample_config()).unwrap();
        assert_eq!(gauge.value(), 50.0);
        assert_eq!(gauge.needle_angle(), 0.0);
        assert_eq!(gauge.value_labels().len(), 3);
        assert_eq!(gauge.minor_ticks().len(), 3);
        assert_eq!(gauge.major_ticks().entries().len(), 7);
        assert_eq!(gauge.segments().len(), 2);
        assert_eq!(gauge.segments()[0].kind, "danger");
        assert_eq!(gauge.label(), "Speed");
    }

    #[test]
    fn initial_value_defaults_to_min_and_is_clamped() {
        let gauge = Gauge::new(GaugeConfig::builder().min(10.0).max(20.0).build()).unwrap();
        assert_eq!(gauge.value(), 10.0);
        assert_eq!(gauge.needle_angle(), -135.0);

        let gauge = Gauge::new(GaugeConfig::builder().value(-5.0).build()).unwrap();
        assert_eq!(gauge.value(), 0.0);
    }

    #[test]
    fn set_value_clamps_and_rotates_needle() {
        let mut gauge = Gauge::new(sample_config()).unwrap();
        gauge.set_value(250.0);
        assert_eq!(gauge.value(), 100.0);
        assert_eq!(gauge.needle_angle(), 135.0);
        gauge.apply(GaugeCommand::SetValue(-3.0));
        assert_eq!(gauge.value(), 0.0);
        assert_eq!(gauge.needle_angle(), -135.0);
    }

    #[test]
    fn out_of_range_segment_aborts_construction() {
        let config = GaugeConfig::builder()
            .segments(vec![Segment::new(90.0, 110.0, "danger")])
            .build();
        assert!(matches!(
            Gauge::new(config),
            Err(GaugeError::OutOfRange { value, .. }) if value == 110.0
        ));
    }

    #[test]
    fn invalid_range_aborts_construction() {
        let config = GaugeConfig::builder().min(5.0).max(5.0).build();
        assert!(matches!(
            Gauge::new(config),
            Err(GaugeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn frame_interval_follows_framerate_cap() {
        assert_eq!(frame_interval(50.0), Duration::from_millis(20));
        let fallback = Duration::from_secs_f64(1.0 / 60.0);
        for rate in [0.0, -30.0, f64::NAN, 1e-320] {
            assert_eq!(frame_interval(rate), fallback, "rate {rate}");
        }
    }

    #[test]
    fn missing_font_yields_none() {
        assert!(load_font(None).is_none());
        assert!(load_font(Some(b"not a font")).is_none());
    }
}
