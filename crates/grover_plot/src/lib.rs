//! # Grover Plot
//!
//! Accuracy figures for search sweeps, assembled as SVG and written as PNG or SVG.
//!
//! ## Gantree Architecture
//!
//! ```text
//! grover_plot // L5: Visualizer
//!     Output // 형식, 경로, 파일 쓰기
//!     Heatmap // 표시 상태 × 검출 상태
//!     BarGraph // 두 스윕 비교 막대
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grover_plot::prelude::*;
//! use grover_core::{AccuracyMap, MarkedState};
//!
//! let map = AccuracyMap::from_pairs([(MarkedState::S00, 0.97), (MarkedState::S11, 0.88)]).unwrap();
//! let svg = heatmap_svg(&map, "unencoded circuit run on Ideal Simulator", None).unwrap();
//! assert!(svg.contains(">0.97<"));
//!
//! let matrix = accuracy_matrix(&map);
//! assert_eq!(matrix[3][3], 0.88);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Image format and file placement (Gantree: L5_Plot → Output)
pub mod output;

/// Heatmaps (Gantree: L5_Plot → Heatmap)
pub mod heatmap;

/// Bar graphs (Gantree: L5_Plot → BarGraph)
pub mod bar_graph;

// ============================================================================
// Re-exports
// ============================================================================

pub use bar_graph::{bar_graph_svg, render_bar_graph, BAR_WIDTH};
pub use heatmap::{accuracy_matrix, heatmap_svg, render_heatmap};
pub use output::{figure_path, ImageFormat, PlotOptions};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use grover_plot::prelude::*;
    //! ```

    pub use crate::bar_graph::{bar_graph_svg, render_bar_graph};
    pub use crate::heatmap::{accuracy_matrix, heatmap_svg, render_heatmap};
    pub use crate::output::{ImageFormat, PlotOptions};
}

// ============================================================================
// Integration Tests
// ============================================================================
