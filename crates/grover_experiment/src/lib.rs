//! # Grover Experiment
//!
//! Marked-state sweeps: one search circuit per marked state, executed through
//! the backend adapter and scored against the expected outcome.
//!
//! ## Gantree Architecture
//!
//! ```text
//! grover_experiment // L4: Experiment Runner
//!     Runner // 모드, 계획, 정확도, 스윕
//!     Config // JSON 실험 설정
//!     ExperimentRunner // 설정 → 백엔드 → 스윕 → 그림
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grover_experiment::prelude::*;
//! use grover_backend::SimulatorBackend;
//!
//! let plan = SweepPlan::from_pairs([("00", "00"), ("01", "01"), ("10", "10"), ("11", "11")]).unwrap();
//! let backend = SimulatorBackend::ideal(2).with_seed(42);
//!
//! let (accuracy, title) = run_sweep(&plan, &backend, SweepMode::Unencoded, 1000).unwrap();
//! assert_eq!(accuracy.len(), 4);
//! assert_eq!(title, "unencoded circuit run on Ideal Simulator");
//! ```
//!
//! ## From a Config
//!
//! ```rust
//! use grover_experiment::prelude::*;
//!
//! let config = ExperimentConfig::from_json(r#"{"mode": "encoded_2", "shots": 200, "seed": 1}"#).unwrap();
//! let outcome = ExperimentRunner::new(config).run().unwrap();
//! assert_eq!(outcome.accuracy.mean(), Some(1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Sweep modes, plans and accuracy (Gantree: L4_Experiment → Runner)
pub mod runner;

/// Experiment configuration (Gantree: L4_Experiment → Config)
pub mod config;

/// Config-driven runs and figures (Gantree: L4_Experiment → ExperimentRunner)
pub mod experiment;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{BackendKind, ExperimentConfig};
pub use experiment::{render_comparison, ComparisonFigures, ExperimentRunner};
pub use runner::{
    accuracy, post_selected_accuracy, run_sweep, run_sweep_with, PlanEntry, SweepMode, SweepOptions,
    SweepOutcome, SweepPlan,
};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use grover_experiment::prelude::*;
    //! ```

    pub use crate::config::{BackendKind, ExperimentConfig};
    pub use crate::experiment::{render_comparison, ExperimentRunner};
    pub use crate::runner::{run_sweep, run_sweep_with, SweepMode, SweepOptions, SweepOutcome, SweepPlan};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
