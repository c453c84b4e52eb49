//! Standalone SVG markup for a gauge.
//!
//! Elements carry the `gauge-*` classes an external stylesheet can target; an
//! embedded `<style>` block built from the [`Theme`] makes the file render on
//! its own.

use std::fmt::Write;

use crate::config::Theme;
use crate::dims::*;
use crate::Gauge;

/// Renders the full gauge, back to front.
pub fn render(gauge: &Gauge, theme: &Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="svg-gauge" width="100%" height="100%" viewBox="0 0 {size} {size}">"#,
        size = fmt_num(VIEW_SIZE)
    );
    write_style(&mut out, gauge, theme);

    let _ = writeln!(
        out,
        r#"<circle class="gauge-boundary" cx="{c}" cy="{c}" r="{r}" fill="transparent"/>"#,
        c = fmt_num(CENTER),
        r = fmt_num(BOUNDARY_RADIUS)
    );
    let _ = writeln!(
        out,
        r#"<circle class="gauge-hole" cx="{c}" cy="{c}" r="{r}" fill="{fill}"/>"#,
        c = fmt_num(CENTER),
        r = RING_RADIUS,
        fill = theme.hole.to_hex()
    );
    write_ring(&mut out, "gauge-ring", &[], None);

    for segment in gauge.segments() {
        let class = format!("gauge-segment-{}", class_name(&segment.kind));
        write_ring(
            &mut out,
            &class,
            &segment.dash.dash_array(),
            Some(segment.dash.offset),
        );
    }

    let ticks = gauge.major_ticks();
    if !ticks.is_empty() {
        write_ring(
            &mut out,
            "gauge-major-ticks",
            &ticks.dash_array(),
            Some(ticks.offset()),
        );
    }
    write_ring(
        &mut out,
        "gauge-segment gauge-segment-base",
        &BASE_DASH,
        Some(crate::geometry::GAP_DASH_OFFSET),
    );

    let hidden = if gauge.label().is_empty() {
        r#" style="display:none""#
    } else {
        ""
    };
    let _ = writeln!(
        out,
        r#"<text class="gauge-text" y="60%" transform="translate(0, 2)"{hidden}><tspan x="50%" class="gauge-label">{}</tspan></text>"#,
        escape(gauge.label())
    );

    for label in gauge.value_labels() {
        let _ = writeln!(
            out,
            r#"<text class="gauge-value-label gauge-value-label-{}" x="{}" y="{}">{}</text>"#,
            label.anchor.as_str(),
            fmt_num(CENTER + label.x),
            fmt_num(CENTER + label.y),
            escape(&label.value.to_string())
        );
    }

    for tick in gauge.minor_ticks() {
        let _ = writeln!(
            out,
            r#"<line class="gauge-minor-tick" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            fmt_num(CENTER + tick.x1),
            fmt_num(CENTER + tick.y1),
            fmt_num(CENTER + tick.x2),
            fmt_num(CENTER + tick.y2)
        );
    }

    let _ = writeln!(
        out,
        r#"<line class="gauge-needle" x1="{c}" y1="{c}" x2="{c}" y2="{tip}" transform="rotate({angle} {c} {c})"/>"#,
        c = fmt_num(CENTER),
        tip = NEEDLE_TIP_Y,
        angle = fmt_num(gauge.needle_angle())
    );
    let _ = writeln!(
        out,
        r#"<circle class="gauge-centre" cx="{c}" cy="{c}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="{w}"/>"#,
        c = fmt_num(CENTER),
        r = fmt_num(CENTRE_RADIUS),
        fill = theme.centre_fill.to_hex(),
        stroke = theme.centre_stroke.to_hex(),
        w = fmt_num(CENTRE_STROKE_WIDTH)
    );
    out.push_str("</svg>\n");
    out
}

fn write_ring(out: &mut String, class: &str, dash: &[f64], offset: Option<f64>) {
    let _ = write!(
        out,
        r#"<circle class="{class}" cx="{c}" cy="{c}" r="{r}" fill="transparent" stroke-width="{w}""#,
        c = fmt_num(CENTER),
        r = RING_RADIUS,
        w = fmt_num(RING_WIDTH)
    );
    if !dash.is_empty() {
        let array = dash.iter().map(|d| fmt_num(*d)).collect::<Vec<_>>().join(" ");
        let _ = write!(out, r#" stroke-dasharray="{array}""#);
    }
    if let Some(offset) = offset {
        let _ = write!(out, r#" stroke-dashoffset="{}""#, fmt_num(offset));
    }
    out.push_str("/>\n");
}

fn write_style(out: &mut String, gauge: &Gauge, theme: &Theme) {
    out.push_str("<style>\n");
    let _ = writeln!(
        out,
        ".gauge-boundary {{ stroke: {}; stroke-width: {}; }}",
        theme.boundary.to_hex(),
        fmt_num(BOUNDARY_WIDTH)
    );
    let _ = writeln!(out, ".gauge-ring {{ stroke: {}; }}", theme.ring.to_hex());
    let _ = writeln!(out, ".gauge-major-ticks {{ stroke: {}; }}", theme.ticks.to_hex());
    let _ = writeln!(out, ".gauge-segment-base {{ stroke: {}; }}", theme.base.to_hex());

    let mut seen: Vec<&str> = Vec::new();
    for segment in gauge.segments() {
        if seen.contains(&segment.kind.as_str()) {
            continue;
        }
        seen.push(&segment.kind);
        let _ = writeln!(
            out,
            ".gauge-segment-{} {{ stroke: {}; }}",
            class_name(&segment.kind),
            theme.segment_color(&segment.kind).to_hex()
        );
    }

    let _ = writeln!(
        out,
        ".gauge-minor-tick {{ stroke: {}; stroke-width: {}; }}",
        theme.ticks.to_hex(),
        fmt_num(MINOR_TICK_WIDTH)
    );
    let _ = writeln!(
        out,
        ".gauge-needle {{ stroke: {}; stroke-width: {}; stroke-linecap: round; }}",
        theme.needle.to_hex(),
        fmt_num(NEEDLE_WIDTH)
    );
    let _ = writeln!(
        out,
        ".gauge-value-label {{ fill: {}; font-size: {}px; dominant-baseline: middle; }}",
        theme.text.to_hex(),
        fmt_num(VALUE_LABEL_SIZE)
    );
    out.push_str(".gauge-value-label-left { text-anchor: start; }\n");
    out.push_str(".gauge-value-label-top { text-anchor: middle; }\n");
    out.push_str(".gauge-value-label-right { text-anchor: end; }\n");
    let _ = writeln!(
        out,
        ".gauge-text {{ fill: {}; font-size: {}px; text-anchor: middle; }}",
        theme.text.to_hex(),
        fmt_num(CAPTION_SIZE)
    );
    out.push_str("</style>\n");
}

/// Rounds to six decimals and drops a negative zero.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Segment kinds become part of a CSS class; anything but `[A-Za-z0-9_-]` is replaced.
fn class_name(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
