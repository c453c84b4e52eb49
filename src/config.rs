use bon::Builder;
use serde::Deserialize;
use std::path::Path;

use crate::error::GaugeError;

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, for SVG styles.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colors for every part of the gauge, plus one per segment kind.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub boundary: Color,
    pub hole: Color,
    pub ring: Color,
    pub base: Color,
    pub ticks: Color,
    pub text: Color,
    pub needle: Color,
    pub centre_fill: Color,
    pub centre_stroke: Color,
    pub segment_colors: Vec<(String, Color)>,
    /// Used for segment kinds missing from `segment_colors`.
    pub fallback_segment: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::new(0xff, 0xff, 0xff),
            boundary: Color::new(0xcc, 0xcc, 0xcc),
            hole: Color::new(0xff, 0xff, 0xff),
            ring: Color::new(0xe6, 0xe6, 0xe6),
            base: Color::new(0xff, 0xff, 0xff),
            ticks: Color::new(0x33, 0x33, 0x33),
            text: Color::new(0x33, 0x33, 0x33),
            needle: Color::new(0x22, 0x22, 0x22),
            centre_fill: Color::new(0xee, 0xee, 0xee),
            centre_stroke: Color::new(0xcc, 0xcc, 0xcc),
            segment_colors: vec![
                ("ok".to_string(), Color::new(0x4c, 0xaf, 0x50)),
                ("warn".to_string(), Color::new(0xff, 0xb3, 0x00)),
                ("danger".to_string(), Color::new(0xe5, 0x39, 0x35)),
            ],
            fallback_segment: Color::new(0x9e, 0x9e, 0x9e),
        }
    }
}

impl Theme {
    pub fn segment_color(&self, kind: &str) -> Color {
        self.segment_colors
            .iter()
            .find(|(name, _)| name == kind)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback_segment)
    }

    /// Adds or replaces the color for a segment kind.
    pub fn with_segment_color(mut self, kind: impl Into<String>, color: Color) -> Self {
        let kind = kind.into();
        match self.segment_colors.iter_mut().find(|(name, _)| *name == kind) {
            Some(entry) => entry.1 = color,
            None => self.segment_colors.push((kind, color)),
        }
        self
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

/// A colored stretch of the ring between two values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    /// Free-form category such as "warn" or "danger"; selects the segment's color.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, kind: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
        }
    }
}

/// Everything a gauge needs at construction.
///
/// Deserializes from the JSON option object `{min, max, value, values,
/// majorTicks, minorTicks, segments: [{start, end, type}], label}`; missing
/// keys take the builder defaults.
#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 100.0)]
    pub max: f64,
    /// Initial needle value; `min` when absent.
    pub value: Option<f64>,
    /// Values that get a text label.
    #[builder(default)]
    pub values: Vec<f64>,
    #[builder(default)]
    pub major_ticks: Vec<f64>,
    #[builder(default)]
    pub minor_ticks: Vec<f64>,
    #[builder(default)]
    pub segments: Vec<Segment>,
    /// Caption under the needle.
    #[builder(default, into)]
    pub label: String,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        GaugeConfig::builder().build()
    }
}

impl GaugeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, GaugeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GaugeError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded gauge config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }
}

// ============================================================================
// DISPLAY CONFIGURATION
// ============================================================================

/// Window and rendering settings for the on-screen gauge.
#[derive(Debug, Clone, Builder)]
pub struct DisplayConfig {
    #[builder(default = "Gauge".to_string(), into)]
    pub title: String,
    #[builder(default = 300)]
    pub window_width: usize,
    #[builder(default = 300)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// TrueType/OpenType bytes for labels; text is skipped without it.
    pub font_data: Option<Vec<u8>>,
    #[builder(default)]
    pub theme: Theme,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builder_defaults() {
        let config = GaugeConfig::builder().build();
        assert_eq!((config.min, config.max), (0.0, 100.0));
        assert_eq!(config.value, None);
        assert!(config.values.is_empty());
        assert!(config.segments.is_empty());
        assert_eq!(config.label, "");
    }

    #[test]
    fn parses_option_object() {
        let json = r#"{
            "min": 0,
            "max": 200,
            "value": 120,
            "values": [0, 100, 200],
            "majorTicks": [50, 100, 150],
            "minorTicks": [25, 75],
            "segments": [{"start": 150, "end": 200, "type": "danger"}],
            "label": "RPM"
        }"#;
        let config = GaugeConfig::from_json_str(json).unwrap();
        assert_eq!(config.max, 200.0);
        assert_eq!(config.value, Some(120.0));
        assert_eq!(config.major_ticks, vec![50.0, 100.0, 150.0]);
        assert_eq!(config.minor_ticks, vec![25.0, 75.0]);
        assert_eq!(config.segments, vec![Segment::new(150.0, 200.0, "danger")]);
        assert_eq!(config.label, "RPM");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = GaugeConfig::from_json_str(r#"{"label": "Load"}"#).unwrap();
        assert_eq!((config.min, config.max), (0.0, 100.0));
        assert!(config.major_ticks.is_empty());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GaugeConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GaugeError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min": -10, "max": 10, "value": 3}}"#).unwrap();
        let config = GaugeConfig::from_path(file.path()).unwrap();
        assert_eq!((config.min, config.max, config.value), (-10.0, 10.0, Some(3.0)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GaugeConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GaugeError::Io(_)));
    }

    #[test]
    fn theme_segment_colors() {
        let theme = Theme::default().with_segment_color("cold", Color::new(0, 0, 0xff));
        assert_eq!(theme.segment_color("cold"), Color::new(0, 0, 0xff));
        assert_eq!(theme.segment_color("danger"), Color::new(0xe5, 0x39, 0x35));
        assert_eq!(theme.segment_color("unknown"), theme.fallback_segment);
        assert_eq!(Color::new(0xe5, 0x39, 0x35).to_hex(), "#e53935");
    }
}
