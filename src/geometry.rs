//! Angle, arc and position math for the gauge ring.
//!
//! The ring is a circle whose circumference is 100 units, so every dash length
//! below doubles as a percentage of the circle. A quarter of it is a blank gap
//! centred at the bottom; the remaining 75 units (270 degrees) carry the value
//! range, starting bottom-left and sweeping clockwise to bottom-right.
//!
//! Positions are relative to the ring centre in a y-down frame, with angles
//! measured clockwise from the east axis.

use log::debug;
use std::f64::consts::PI;

use crate::error::GaugeError;

// ============================================================================
// RING CONSTANTS
// ============================================================================

/// Needle sweep across the value range, in degrees.
pub const SWEEP_DEGREES: f64 = 270.0;
/// Needle angle at `min`, in degrees from twelve o'clock.
pub const START_DEGREES: f64 = -135.0;
/// Rotation from the east axis to the start of the arc.
pub const ARC_ROTATION_DEGREES: f64 = 135.0;

/// Share of the circumference that carries the value range.
pub const USABLE_SHARE: f64 = 0.75;
/// Blank dash reserved at the bottom of the ring.
pub const GAP_LENGTH: f64 = 25.0;
/// Dash offset that lines a segment's start up with the start of the arc.
pub const SEGMENT_BASE_OFFSET: f64 = 62.5;
/// Dash offset shared by the major tick ring and the base track.
pub const GAP_DASH_OFFSET: f64 = -12.5;
pub const CIRCUMFERENCE: f64 = 100.0;

pub const TICK_NOTCH_WIDTH: f64 = 0.4;

pub const LABEL_RADIUS_SIDE: f64 = 13.0;
pub const LABEL_RADIUS_TOP: f64 = 12.0;

pub const MINOR_TICK_OUTER_RADIUS: f64 = 17.6;
pub const MINOR_TICK_INNER_RADIUS: f64 = 16.9;

// ============================================================================
// RANGE
// ============================================================================

/// Value domain of a gauge. Always `min < max` with both bounds finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, GaugeError> {
        if !(min.is_finite() && max.is_finite() && max > min) {
            return Err(GaugeError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Rejects anything outside `[min, max]`, including NaN.
    pub fn check(&self, value: f64) -> Result<f64, GaugeError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(GaugeError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Clamps into `[min, max]`. NaN settles on `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

// ============================================================================
// LAYOUT OUTPUT TYPES
// ============================================================================

/// Dash pattern for the major tick ring.
///
/// `entries` alternates arc runs and notches, beginning and ending with a run.
/// The renderer lays [`GAP_LENGTH`] in front of it, so the first drawn dash
/// covers the bottom gap and every later dash is a tick notch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashPattern {
    entries: Vec<f64>,
}

impl DashPattern {
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full stroke dash array, gap token included.
    pub fn dash_array(&self) -> Vec<f64> {
        std::iter::once(GAP_LENGTH)
            .chain(self.entries.iter().copied())
            .collect()
    }

    pub fn offset(&self) -> f64 {
        GAP_DASH_OFFSET
    }
}

/// Which side of the ring a value label sits on, used to pick its text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Left,
    Top,
    Right,
}

impl LabelAnchor {
    fn classify(rotated_degrees: f64) -> Self {
        if rotated_degrees < 225.0 {
            LabelAnchor::Left
        } else if rotated_degrees < 315.0 {
            LabelAnchor::Top
        } else {
            LabelAnchor::Right
        }
    }

    /// Labels above the centre sit slightly closer in; their text is taller than it is wide.
    pub fn radius(self) -> f64 {
        match self {
            LabelAnchor::Top => LABEL_RADIUS_TOP,
            LabelAnchor::Left | LabelAnchor::Right => LABEL_RADIUS_SIDE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelAnchor::Left => "left",
            LabelAnchor::Top => "top",
            LabelAnchor::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueLabel {
    pub value: f64,
    /// Angle from the east axis, radians.
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    pub anchor: LabelAnchor,
}

/// Short radial line; `(x1, y1)` on the outer radius, `(x2, y2)` on the inner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinorTick {
    pub value: f64,
    pub angle: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Dash parameters that paint one segment as a single stroked run of the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDash {
    /// Drawn length, already scaled to the usable arc.
    pub percent: f64,
    pub offset: f64,
}

impl SegmentDash {
    pub fn dash_array(&self) -> [f64; 2] {
        [self.percent, CIRCUMFERENCE - self.percent]
    }
}

// ============================================================================
// GAUGE GEOMETRY
// ============================================================================

/// Stateless mapping from a value range onto the gauge ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    range: Range,
}

impl GaugeGeometry {
    pub fn new(range: Range) -> Self {
        Self { range }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Position of `value` along the usable arc, in `[0, 1]`.
    pub fn fraction_for(&self, value: f64) -> Result<f64, GaugeError> {
        let value = self.range.check(value)?;
        Ok(self.fraction_unchecked(value))
    }

    /// Needle rotation for `value` in degrees, `-135` at `min` and `135` at `max`.
    pub fn angle_for(&self, value: f64) -> Result<f64, GaugeError> {
        let value = self.range.check(value)?;
        Ok(self.angle_unchecked(value))
    }

    /// Needle rotation for an arbitrary value, clamped into range first.
    pub fn needle_angle(&self, value: f64) -> f64 {
        self.angle_unchecked(self.range.clamp(value))
    }

    fn fraction_unchecked(&self, value: f64) -> f64 {
        (value - self.range.min) / self.range.span()
    }

    fn angle_unchecked(&self, value: f64) -> f64 {
        self.fraction_unchecked(value) * SWEEP_DEGREES + START_DEGREES
    }

    /// Ring units covered per unit of value.
    fn multiplier(&self) -> f64 {
        USABLE_SHARE * CIRCUMFERENCE / self.range.span()
    }

    /// Every entry must be in range and no smaller than the one before it.
    fn validate(&self, values: &[f64]) -> Result<(), GaugeError> {
        let mut previous = self.range.min;
        for &value in values {
            self.range.check(value)?;
            if value < previous {
                return Err(GaugeError::Descending { previous, value });
            }
            previous = value;
        }
        Ok(())
    }

    /// Walks the list as successive steps from `min`, returning the running
    /// arc angle (radians, from the start of the arc) reached at each value.
    fn cumulative_angles(&self, values: &[f64]) -> Result<Vec<f64>, GaugeError> {
        self.validate(values)?;
        let multiplier = self.multiplier();
        let mut previous = self.range.min;
        let mut angle = 0.0;
        Ok(values
            .iter()
            .map(|&value| {
                angle += (value - previous) * multiplier / CIRCUMFERENCE * 2.0 * PI;
                previous = value;
                angle
            })
            .collect())
    }

    /// Builds the run/notch pattern for the major tick ring.
    ///
    /// The run leaving the arc start gives up half a notch and every later run
    /// gives up a full one, so each notch is centred on its tick. The unclamped
    /// pattern is half a notch short of the usable arc; that tail stays blank.
    /// A final run to `max` is added when the list stops short of it.
    pub fn layout_major_ticks(&self, ticks: &[f64]) -> Result<DashPattern, GaugeError> {
        self.validate(ticks)?;

        let min = self.range.min;
        let mut stops: Vec<f64> = ticks.iter().copied().skip_while(|&t| t == min).collect();
        if stops.is_empty() {
            return Ok(DashPattern::default());
        }
        stops.dedup();
        if stops.last() != Some(&self.range.max) {
            stops.push(self.range.max);
        }

        let multiplier = self.multiplier();
        let last = stops.len() - 1;
        let mut entries = Vec::with_capacity(2 * stops.len() - 1);
        let mut previous = min;
        for (i, &stop) in stops.iter().enumerate() {
            let notch = if i == 0 { TICK_NOTCH_WIDTH / 2.0 } else { TICK_NOTCH_WIDTH };
            let run = (stop - previous) * multiplier - notch;
            entries.push(run.max(0.0));
            if i < last {
                entries.push(TICK_NOTCH_WIDTH);
            }
            previous = stop;
        }

        debug!("major tick pattern: {:?}", entries);
        Ok(DashPattern { entries })
    }

    /// Places one label per value around the ring.
    pub fn layout_value_labels(&self, values: &[f64]) -> Result<Vec<ValueLabel>, GaugeError> {
        let angles = self.cumulative_angles(values)?;
        let labels = values
            .iter()
            .zip(angles)
            .map(|(&value, angle)| {
                let rotated = angle + ARC_ROTATION_DEGREES.to_radians();
                let anchor = LabelAnchor::classify(rotated.to_degrees());
                let (x, y) = point_at(rotated, anchor.radius());
                ValueLabel {
                    value,
                    angle: rotated,
                    x,
                    y,
                    anchor,
                }
            })
            .collect::<Vec<_>>();
        debug!("laid out {} value labels", labels.len());
        Ok(labels)
    }

    /// One radial line per value, spanning the minor tick band.
    pub fn layout_minor_ticks(&self, values: &[f64]) -> Result<Vec<MinorTick>, GaugeError> {
        let angles = self.cumulative_angles(values)?;
        Ok(values
            .iter()
            .zip(angles)
            .map(|(&value, angle)| {
                let rotated = angle + ARC_ROTATION_DEGREES.to_radians();
                let (x1, y1) = point_at(rotated, MINOR_TICK_OUTER_RADIUS);
                let (x2, y2) = point_at(rotated, MINOR_TICK_INNER_RADIUS);
                MinorTick {
                    value,
                    angle: rotated,
                    x1,
                    y1,
                    x2,
                    y2,
                }
            })
            .collect())
    }

    pub fn segment_dash(&self, start: f64, end: f64) -> Result<SegmentDash, GaugeError> {
        self.range.check(start)?;
        self.range.check(end)?;
        if end < start {
            return Err(GaugeError::Descending {
                previous: start,
                value: end,
            });
        }
        let start_percent = self.fraction_unchecked(start) * CIRCUMFERENCE;
        let end_percent = self.fraction_unchecked(end) * CIRCUMFERENCE;
        let percent = (end_percent - start_percent) * USABLE_SHARE;
        Ok(SegmentDash {
            percent,
            offset: SEGMENT_BASE_OFFSET - start_percent * USABLE_SHARE,
        })
    }
}

/// Point at `radius` along `angle` (radians clockwise from east, y down).
pub fn point_at(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geometry(min: f64, max: f64) -> GaugeGeometry {
        GaugeGeometry::new(Range::new(min, max).unwrap())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn range_rejects_inverted_and_degenerate_bounds() {
        assert!(matches!(
            Range::new(10.0, 10.0),
            Err(GaugeError::InvalidRange { .. })
        ));
        assert!(Range::new(10.0, 0.0).is_err());
        assert!(Range::new(f64::NAN, 1.0).is_err());
        assert!(Range::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn clamp_settles_nan_on_min() {
        let range = Range::new(-5.0, 5.0).unwrap();
        assert_eq!(range.clamp(f64::NAN), -5.0);
        assert_eq!(range.clamp(100.0), 5.0);
        assert_eq!(range.clamp(-100.0), -5.0);
    }

    #[test]
    fn needle_angles_at_ends_and_middle() {
        let g = geometry(0.0, 100.0);
        assert_close(g.angle_for(0.0).unwrap(), -135.0);
        assert_close(g.angle_for(50.0).unwrap(), 0.0);
        assert_close(g.angle_for(100.0).unwrap(), 135.0);
    }

    #[test]
    fn angle_for_rejects_values_outside_range() {
        let g = geometry(0.0, 100.0);
        match g.angle_for(100.5) {
            Err(GaugeError::OutOfRange { value, min, max }) => {
                assert_eq!((value, min, max), (100.5, 0.0, 100.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(g.fraction_for(-0.1).is_err());
    }

    #[test]
    fn fraction_for_is_linear_over_offset_range() {
        let g = geometry(-50.0, 150.0);
        assert_close(g.fraction_for(-50.0).unwrap(), 0.0);
        assert_close(g.fraction_for(50.0).unwrap(), 0.5);
        assert_close(g.fraction_for(150.0).unwrap(), 1.0);
    }

    #[test]
    fn needle_angle_clamps() {
        let g = geometry(0.0, 100.0);
        assert_close(g.needle_angle(1e9), 135.0);
        assert_close(g.needle_angle(-1e9), -135.0);
    }

    #[test]
    fn major_ticks_add_terminal_run_and_centre_notches() {
        let g = geometry(0.0, 100.0);
        let pattern = g.layout_major_ticks(&[25.0, 50.0, 75.0]).unwrap();
        let expected = [18.55, 0.4, 18.35, 0.4, 18.35, 0.4, 18.35];
        assert_eq!(pattern.entries().len(), expected.len());
        for (actual, expected) in pattern.entries().iter().zip(expected) {
            assert_close(*actual, expected);
        }
        let total: f64 = pattern.entries().iter().sum();
        assert_close(total, 75.0 - TICK_NOTCH_WIDTH / 2.0);
        assert_close(pattern.dash_array()[0], GAP_LENGTH);
        assert_close(pattern.offset(), -12.5);
    }

    #[test]
    fn leading_min_and_trailing_max_do_not_add_runs() {
        let g = geometry(0.0, 100.0);
        let bare = g.layout_major_ticks(&[25.0, 50.0, 75.0]).unwrap();
        let bounded = g.layout_major_ticks(&[0.0, 25.0, 50.0, 75.0, 100.0]).unwrap();
        assert_eq!(bare, bounded);
    }

    #[test]
    fn repeated_major_ticks_share_one_notch() {
        let g = geometry(0.0, 100.0);
        let repeated = g.layout_major_ticks(&[50.0, 50.0]).unwrap();
        let single = g.layout_major_ticks(&[50.0]).unwrap();
        assert_eq!(repeated, single);
        assert_eq!(single.entries().len(), 3);
    }

    #[test]
    fn empty_major_ticks_give_empty_pattern() {
        let g = geometry(0.0, 100.0);
        assert!(g.layout_major_ticks(&[]).unwrap().is_empty());
        assert!(g.layout_major_ticks(&[0.0]).unwrap().is_empty());
    }

    #[test]
    fn single_tick_at_max_is_one_unbroken_run() {
        let g = geometry(0.0, 100.0);
        let pattern = g.layout_major_ticks(&[100.0]).unwrap();
        assert_eq!(pattern.entries().len(), 1);
        assert_close(pattern.entries()[0], 75.0 - TICK_NOTCH_WIDTH / 2.0);
    }

    #[test]
    fn major_ticks_reject_out_of_range_and_descending() {
        let g = geometry(0.0, 100.0);
        assert!(matches!(
            g.layout_major_ticks(&[25.0, 125.0]),
            Err(GaugeError::OutOfRange { value, .. }) if value == 125.0
        ));
        assert!(matches!(
            g.layout_major_ticks(&[50.0, 25.0]),
            Err(GaugeError::Descending { previous, value }) if previous == 50.0 && value == 25.0
        ));
    }

    #[test]
    fn value_labels_classify_by_side() {
        let g = geometry(0.0, 100.0);
        let labels = g.layout_value_labels(&[0.0, 50.0, 100.0]).unwrap();
        let anchors: Vec<_> = labels.iter().map(|l| l.anchor).collect();
        assert_eq!(
            anchors,
            [LabelAnchor::Left, LabelAnchor::Top, LabelAnchor::Right]
        );

        let half = 13.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_close(labels[0].x, -half);
        assert_close(labels[0].y, half);
        assert_close(labels[1].x, 0.0);
        assert_close(labels[1].y, -12.0);
        assert_close(labels[2].x, half);
        assert_close(labels[2].y, half);
    }

    #[test]
    fn value_label_anchor_edges() {
        // A third of the range lands on the left/top boundary at 225 degrees.
        let g = geometry(0.0, 3.0);
        let labels = g.layout_value_labels(&[0.9, 1.1, 1.9, 2.1]).unwrap();
        let anchors: Vec<_> = labels.iter().map(|l| l.anchor).collect();
        assert_eq!(
            anchors,
            [
                LabelAnchor::Left,
                LabelAnchor::Top,
                LabelAnchor::Top,
                LabelAnchor::Right
            ]
        );
    }

    #[test]
    fn leading_min_label_sits_at_arc_start() {
        let g = geometry(10.0, 20.0);
        let labels = g.layout_value_labels(&[10.0, 20.0]).unwrap();
        assert_eq!(labels.len(), 2);
        assert_close(labels[0].angle, 0.75 * PI);
        assert_close(labels[1].angle, 2.25 * PI);
    }

    #[test]
    fn value_labels_do_not_touch_input() {
        let g = geometry(0.0, 100.0);
        let values = vec![20.0, 40.0];
        let labels = g.layout_value_labels(&values).unwrap();
        assert_eq!(values, vec![20.0, 40.0]);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn minor_ticks_span_the_band() {
        let g = geometry(0.0, 100.0);
        let ticks = g.layout_minor_ticks(&[50.0]).unwrap();
        assert_eq!(ticks.len(), 1);
        let tick = ticks[0];
        assert_close(tick.x1, 0.0);
        assert_close(tick.y1, -17.6);
        assert_close(tick.x2, 0.0);
        assert_close(tick.y2, -16.9);
    }

    #[test]
    fn minor_ticks_emit_one_line_per_value() {
        let g = geometry(0.0, 100.0);
        let ticks = g.layout_minor_ticks(&[0.0, 10.0, 20.0]).unwrap();
        assert_eq!(ticks.len(), 3);
        assert_close(ticks[0].angle, 0.75 * PI);
        assert!(g.layout_minor_ticks(&[10.0, -1.0]).is_err());
    }

    #[test]
    fn segment_dash_for_first_quarter() {
        let g = geometry(0.0, 100.0);
        let dash = g.segment_dash(0.0, 25.0).unwrap();
        assert_close(dash.percent, 18.75);
        assert_close(dash.offset, 62.5);
        let [drawn, blank] = dash.dash_array();
        assert_close(drawn, 18.75);
        assert_close(blank, 81.25);
    }

    #[test]
    fn full_segment_covers_usable_arc() {
        let g = geometry(-20.0, 20.0);
        let dash = g.segment_dash(-20.0, 20.0).unwrap();
        assert_close(dash.percent, 75.0);
        assert_close(dash.offset, 62.5);
        let tail = g.segment_dash(0.0, 20.0).unwrap();
        assert_close(tail.offset, 62.5 - 37.5);
    }

    #[test]
    fn segment_dash_rejects_bad_bounds() {
        let g = geometry(0.0, 100.0);
        assert!(g.segment_dash(-1.0, 10.0).is_err());
        assert!(g.segment_dash(0.0, 101.0).is_err());
        assert!(matches!(
            g.segment_dash(60.0, 40.0),
            Err(GaugeError::Descending { .. })
        ));
    }
}
