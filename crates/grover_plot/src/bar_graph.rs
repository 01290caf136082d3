//! Grouped accuracy bars
//!
//! Gantree: L5_Plot → BarGraph
//!
//! Two bars per marked state, typically unencoded against encoded runs.

use crate::output::{
    escape_xml, figure_path, plot_error, write_figure, PlotOptions, BAR_GRAPH_DIR,
};
use grover_core::{AccuracyMap, GroverError, GroverResult};
use std::fmt::Write;
use std::path::PathBuf;

/// Bar width in category units
pub const BAR_WIDTH: f64 = 0.35;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 60.0;
const BOTTOM: f64 = 80.0;
const Y_MAX: f64 = 1.05;

const COLOR_1: &str = "#1f77b4";
const COLOR_2: &str = "#ff7f0e";

struct Axes {
    n: usize,
}

impl Axes {
    fn plot_width(&self) -> f64 {
        WIDTH - LEFT - RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - TOP - BOTTOM
    }

    /// Category axis spans [-0.5, n - 0.5]
    fn x(&self, data: f64) -> f64 {
        LEFT + (data + 0.5) / self.n as f64 * self.plot_width()
    }

    fn y(&self, value: f64) -> f64 {
        TOP + self.plot_height() * (1.0 - value / Y_MAX)
    }
}

fn write_bar(svg: &mut String, axes: &Axes, center: f64, value: f64, color: &str) -> std::fmt::Result {
    let left = axes.x(center - BAR_WIDTH / 2.0);
    let right = axes.x(center + BAR_WIDTH / 2.0);
    let top = axes.y(value.clamp(0.0, Y_MAX));
    writeln!(
        svg,
        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
        left,
        top,
        right - left,
        axes.y(0.0) - top,
        color
    )
}

fn write_legend(svg: &mut String, label1: &str, label2: &str) -> std::fmt::Result {
    let width = 20.0 + 8.0 * label1.chars().count().max(label2.chars().count()) as f64;
    let x = WIDTH - RIGHT - width - 10.0;
    let y = TOP + 10.0;

    writeln!(
        svg,
        r##"  <rect x="{:.2}" y="{}" width="{:.2}" height="50" fill="#ffffff" stroke="#cccccc"/>"##,
        x - 8.0,
        y,
        width + 16.0
    )?;
    for (i, (label, color)) in [(label1, COLOR_1), (label2, COLOR_2)].iter().enumerate() {
        let row = y + 15.0 + i as f64 * 20.0;
        writeln!(
            svg,
            r#"  <rect x="{:.2}" y="{}" width="14" height="10" fill="{}"/>"#,
            x,
            row - 5.0,
            color
        )?;
        writeln!(
            svg,
            r#"  <text x="{:.2}" y="{}" dominant-baseline="central" font-size="13">{}</text>"#,
            x + 20.0,
            row,
            escape_xml(label)
        )?;
    }
    Ok(())
}

fn write_figure_body(
    svg: &mut String,
    map1: &AccuracyMap,
    label1: &str,
    map2: &AccuracyMap,
    label2: &str,
    title: &str,
) -> std::fmt::Result {
    let states = map1.states();
    let axes = Axes { n: states.len() };

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    )?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
        LEFT + axes.plot_width() / 2.0,
        TOP - 25.0,
        escape_xml(title)
    )?;

    // y grid and ticks
    for tick in 0..=5 {
        let value = tick as f64 * 0.2;
        let y = axes.y(value);
        writeln!(
            svg,
            r##"  <line x1="{}" y1="{:.2}" x2="{}" y2="{:.2}" stroke="#e0e0e0"/>"##,
            LEFT,
            y,
            WIDTH - RIGHT,
            y
        )?;
        writeln!(
            svg,
            r#"  <text x="{}" y="{:.2}" text-anchor="end" dominant-baseline="central" font-size="12">{:.1}</text>"#,
            LEFT - 8.0,
            y,
            value
        )?;
    }

    for (i, state) in states.iter().enumerate() {
        let center = i as f64;
        write_bar(svg, &axes, center - BAR_WIDTH / 2.0, map1.get_or_zero(*state), COLOR_1)?;
        write_bar(svg, &axes, center + BAR_WIDTH / 2.0, map2.get_or_zero(*state), COLOR_2)?;
        writeln!(
            svg,
            r#"  <text x="{:.2}" y="{}" text-anchor="middle" font-size="13">{}</text>"#,
            axes.x(center),
            HEIGHT - BOTTOM + 20.0,
            state
        )?;
    }

    writeln!(
        svg,
        r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#333333"/>"##,
        LEFT,
        TOP,
        axes.plot_width(),
        axes.plot_height()
    )?;
    writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="15">Oracle Marked State</text>"#,
        LEFT + axes.plot_width() / 2.0,
        HEIGHT - 25.0
    )?;
    writeln!(
        svg,
        r#"  <text x="{x}" y="{y}" text-anchor="middle" font-size="15" transform="rotate(-90 {x} {y})">Accuracy</text>"#,
        x = 25.0,
        y = TOP + axes.plot_height() / 2.0
    )?;

    write_legend(svg, label1, label2)?;
    writeln!(svg, "</svg>")
}

/// Grouped bars over the marked states of `map1`, in its order.
/// States missing from `map2` are drawn at zero.
/// Gantree: bar_graph_svg(map1, label1, map2, label2, title) -> Result<String> // SVG 문자열
pub fn bar_graph_svg(
    map1: &AccuracyMap,
    label1: &str,
    map2: &AccuracyMap,
    label2: &str,
    title: &str,
) -> GroverResult<String> {
    if map1.is_empty() {
        return Err(GroverError::PlotError("bar graph needs at least one marked state".to_string()));
    }

    let mut svg = String::new();
    write_figure_body(&mut svg, map1, label1, map2, label2, title).map_err(plot_error)?;
    Ok(svg)
}

/// Write the bar graph below `<root>/bar_graph/` and return its path
/// Gantree: render_bar_graph(..., options) -> Result<PathBuf> // 파일 출력
pub fn render_bar_graph(
    map1: &AccuracyMap,
    label1: &str,
    map2: &AccuracyMap,
    label2: &str,
    title: &str,
    options: &PlotOptions,
) -> GroverResult<PathBuf> {
    let svg = bar_graph_svg(map1, label1, map2, label2, title)?;
    let path = figure_path(&options.output_root, BAR_GRAPH_DIR, options.format)?;
    write_figure(&path, &svg, options.format)?;
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
