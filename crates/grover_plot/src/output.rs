//! Figure output
//!
//! Gantree: L5_Plot → Output
//!
//! Image format, output location and timestamped file naming. Figures
//! are assembled as SVG; PNG output rasterizes that SVG with `resvg`.

use chrono::Local;
use grover_core::{GroverError, GroverResult};
use resvg::{tiny_skia, usvg};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Subdirectory for heatmaps
pub const HEATMAP_DIR: &str = "heatmap";

/// Subdirectory for bar graphs
pub const BAR_GRAPH_DIR: &str = "bar_graph";

/// Timestamp pattern for figure file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Image format of written figures
/// Gantree: ImageFormat // 이미지 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster image
    #[default]
    Png,
    /// Scalable vector graphics, written as-is
    Svg,
}

impl ImageFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where and how figures are written
/// Gantree: PlotOptions // 출력 옵션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Root directory, figures go into `heatmap/` and `bar_graph/` below it
    pub output_root: PathBuf,

    /// Image format
    pub format: ImageFormat,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            format: ImageFormat::default(),
        }
    }
}

impl PlotOptions {
    /// Options writing below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: root.into(),
            ..Self::default()
        }
    }

    /// Set image format
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }
}

/// Fresh path `<root>/<subdir>/<timestamp>.<ext>`, creating the directory.
/// A `_1`, `_2`, ... suffix is added when the second is already taken.
/// Gantree: figure_path(root, subdir, format) -> Result<PathBuf> // 파일 경로
pub fn figure_path(root: &Path, subdir: &str, format: ImageFormat) -> GroverResult<PathBuf> {
    let dir = root.join(subdir);
    fs::create_dir_all(&dir)?;

    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let ext = format.extension();

    let mut path = dir.join(format!("{}.{}", stamp, ext));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}.{}", stamp, suffix, ext));
        suffix += 1;
    }
    Ok(path)
}

/// Rasterize an SVG document into PNG bytes at its declared size
/// Gantree: rasterize(svg) -> Result<Vec<u8>> // PNG 변환
pub fn rasterize(svg: &str) -> GroverResult<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| GroverError::PlotError(e.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| GroverError::PlotError(format!("empty canvas {}x{}", size.width(), size.height())))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| GroverError::PlotError(e.to_string()))
}

/// Write an SVG figure in `format` through a buffered writer
/// Gantree: write_figure(path, svg, format) -> Result // 파일 쓰기
pub fn write_figure(path: &Path, svg: &str, format: ImageFormat) -> GroverResult<()> {
    let bytes = match format {
        ImageFormat::Png => rasterize(svg)?,
        ImageFormat::Svg => svg.as_bytes().to_vec(),
    };

    let file = File::create(path)
        .map_err(|e| GroverError::FileError(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Escape text for use inside SVG markup
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// fmt::Write failures while assembling a figure
pub(crate) fn plot_error(_: fmt::Error) -> GroverError {
    GroverError::PlotError("failed to format figure".to_string())
}

// ============================================================================
// Tests
// ============================================================================
