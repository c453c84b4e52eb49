//! Fixed 40x40 drawing space shared by the renderers.

pub const VIEW_SIZE: f64 = 40.0;
pub const CENTER: f64 = 20.0;

/// Ring radius giving a circumference of exactly 100 (`100 / 2pi`).
pub const RING_RADIUS: f64 = 15.91549430918954;
pub const RING_WIDTH: f64 = 3.5;

pub const BOUNDARY_RADIUS: f64 = 19.0;
pub const BOUNDARY_WIDTH: f64 = 0.2;

pub const MINOR_TICK_WIDTH: f64 = 0.2;

/// The needle reaches from the centre to the ring radius.
pub const NEEDLE_TIP_Y: f64 = 4.08450569081046;
pub const NEEDLE_WIDTH: f64 = 0.6;

pub const CENTRE_RADIUS: f64 = 1.5;
pub const CENTRE_STROKE_WIDTH: f64 = 0.1;

pub const VALUE_LABEL_SIZE: f64 = 2.4;
pub const CAPTION_SIZE: f64 = 3.0;
/// Caption baseline: 60% down the view, nudged 2 units lower.
pub const CAPTION_Y: f64 = VIEW_SIZE * 0.6 + 2.0;

/// Base track covering the bottom gap.
pub const BASE_DASH: [f64; 2] = [25.0, 75.0];
