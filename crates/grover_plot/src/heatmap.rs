//! Accuracy heatmap
//!
//! Gantree: L5_Plot → Heatmap
//!
//! 4×4 grid of oracle marked state against detected state. Only the
//! diagonal carries data; the rest of the grid is zero by construction.

use crate::output::{escape_xml, figure_path, plot_error, write_figure, PlotOptions, HEATMAP_DIR};
use grover_core::{AccuracyMap, GroverResult, MarkedState};
use std::fmt::Write;
use std::path::PathBuf;

/// YlGnBu control points, low to high
const YLGNBU: [(u8, u8, u8); 9] = [
    (0xff, 0xff, 0xd9),
    (0xed, 0xf8, 0xb1),
    (0xc7, 0xe9, 0xb4),
    (0x7f, 0xcd, 0xbb),
    (0x41, 0xb6, 0xc4),
    (0x1d, 0x91, 0xc0),
    (0x22, 0x5e, 0xa8),
    (0x25, 0x34, 0x94),
    (0x08, 0x1d, 0x58),
];

const PANEL_WIDTH: f64 = 600.0;
const PANEL_HEIGHT: f64 = 600.0;
const GRID_LEFT: f64 = 90.0;
const GRID_TOP: f64 = 70.0;
const CELL: f64 = 100.0;
const COLORBAR_GAP: f64 = 20.0;
const COLORBAR_WIDTH: f64 = 18.0;
const COLORBAR_STEPS: usize = 50;

/// Diagonal matrix over `00, 01, 10, 11`; absent states read as 0
/// Gantree: accuracy_matrix(map) -> [[f64;4];4] // 대각 행렬
pub fn accuracy_matrix(map: &AccuracyMap) -> [[f64; 4]; 4] {
    let mut matrix = [[0.0; 4]; 4];
    for state in MarkedState::ALL {
        let i = state.index();
        matrix[i][i] = map.get_or_zero(state);
    }
    matrix
}

/// YlGnBu color for `value`, clamped to [0, 1]
pub fn ylgnbu(value: f64) -> (u8, u8, u8) {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let scaled = v * (YLGNBU.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(YLGNBU.len() - 1);
    let t = scaled - lo as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (a, b) = (YLGNBU[lo], YLGNBU[hi]);
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Annotation color readable on the given cell color
fn text_color((r, g, b): (u8, u8, u8)) -> &'static str {
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance < 128.0 {
        "#ffffff"
    } else {
        "#262626"
    }
}

/// One heatmap panel offset `dx` pixels to the right
fn write_panel(svg: &mut String, map: &AccuracyMap, title: &str, dx: f64) -> std::fmt::Result {
    let matrix = accuracy_matrix(map);
    let grid = CELL * 4.0;

    writeln!(svg, r#"  <g transform="translate({},0)">"#, dx)?;
    writeln!(
        svg,
        r#"    <text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
        GRID_LEFT + grid / 2.0,
        GRID_TOP - 30.0,
        escape_xml(title)
    )?;

    // rows top to bottom: marked 00..11
    for (row, values) in matrix.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let x = GRID_LEFT + col as f64 * CELL;
            let y = GRID_TOP + row as f64 * CELL;
            let color = ylgnbu(value);
            writeln!(
                svg,
                r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                x,
                y,
                CELL,
                CELL,
                hex(color)
            )?;
            writeln!(
                svg,
                r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-size="16" fill="{}">{:.2}</text>"#,
                x + CELL / 2.0,
                y + CELL / 2.0,
                text_color(color),
                value
            )?;
        }
    }

    for state in MarkedState::ALL {
        let offset = state.index() as f64 * CELL + CELL / 2.0;
        writeln!(
            svg,
            r#"    <text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
            GRID_LEFT + offset,
            GRID_TOP + grid + 22.0,
            state
        )?;
        writeln!(
            svg,
            r#"    <text x="{}" y="{}" text-anchor="end" dominant-baseline="central" font-size="14">{}</text>"#,
            GRID_LEFT - 10.0,
            GRID_TOP + offset,
            state
        )?;
    }

    writeln!(
        svg,
        r#"    <text x="{}" y="{}" text-anchor="middle" font-size="15">Detected State</text>"#,
        GRID_LEFT + grid / 2.0,
        GRID_TOP + grid + 55.0
    )?;
    writeln!(
        svg,
        r#"    <text x="{x}" y="{y}" text-anchor="middle" font-size="15" transform="rotate(-90 {x} {y})">Oracle Marked State</text>"#,
        x = GRID_LEFT - 55.0,
        y = GRID_TOP + grid / 2.0
    )?;

    write_colorbar(svg, GRID_LEFT + grid + COLORBAR_GAP, GRID_TOP, grid)?;
    writeln!(svg, "  </g>")
}

/// Vertical color scale fixed to [0, 1]
fn write_colorbar(svg: &mut String, x: f64, top: f64, height: f64) -> std::fmt::Result {
    let step = height / COLORBAR_STEPS as f64;
    for i in 0..COLORBAR_STEPS {
        let value = 1.0 - (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        writeln!(
            svg,
            r#"    <rect x="{}" y="{:.2}" width="{}" height="{:.2}" fill="{}"/>"#,
            x,
            top + i as f64 * step,
            COLORBAR_WIDTH,
            step + 0.5,
            hex(ylgnbu(value))
        )?;
    }
    for tick in 0..=5 {
        let value = tick as f64 * 0.2;
        let y = top + height * (1.0 - value);
        writeln!(
            svg,
            r#"    <text x="{}" y="{:.2}" dominant-baseline="central" font-size="12">{:.1}</text>"#,
            x + COLORBAR_WIDTH + 6.0,
            y,
            value
        )?;
    }
    Ok(())
}

/// Render one heatmap, or two side by side, as an SVG document
/// Gantree: heatmap_svg(map1, title1, second) -> Result<String> // SVG 문자열
pub fn heatmap_svg(
    map1: &AccuracyMap,
    title1: &str,
    second: Option<(&AccuracyMap, &str)>,
) -> GroverResult<String> {
    let panels = if second.is_some() { 2.0 } else { 1.0 };
    let width = PANEL_WIDTH * panels;

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = width,
        h = PANEL_HEIGHT
    )
    .map_err(plot_error)?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##).map_err(plot_error)?;

    write_panel(&mut svg, map1, title1, 0.0).map_err(plot_error)?;
    if let Some((map2, title2)) = second {
        write_panel(&mut svg, map2, title2, PANEL_WIDTH).map_err(plot_error)?;
    }
    writeln!(svg, "</svg>").map_err(plot_error)?;

    Ok(svg)
}

/// Write the heatmap below `<root>/heatmap/` and return its path
/// Gantree: render_heatmap(map1, title1, second, options) -> Result<PathBuf> // 파일 출력
pub fn render_heatmap(
    map1: &AccuracyMap,
    title1: &str,
    second: Option<(&AccuracyMap, &str)>,
    options: &PlotOptions,
) -> GroverResult<PathBuf> {
    let svg = heatmap_svg(map1, title1, second)?;
    let path = figure_path(&options.output_root, HEATMAP_DIR, options.format)?;
    write_figure(&path, &svg, options.format)?;
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
