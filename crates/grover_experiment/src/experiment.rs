//! Experiment runner
//!
//! Gantree: L4_Experiment → ExperimentRunner
//!
//! Ties a config to a backend, runs the sweep and writes figures.

use crate::config::ExperimentConfig;
use crate::runner::{run_sweep_with, SweepOutcome};
use grover_backend::{Backend, SimulatorBackend};
use grover_core::GroverResult;
use grover_plot::{render_bar_graph, render_heatmap, PlotOptions};
use std::path::PathBuf;
use std::time::Instant;

/// Figures written for a pair of sweeps
/// Gantree: ComparisonFigures // 비교 그림
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonFigures {
    /// Side-by-side heatmaps
    pub heatmap: PathBuf,
    /// Grouped bar graph
    pub bar_graph: PathBuf,
}

/// Config-driven sweep
/// Gantree: ExperimentRunner // 실험 실행기
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    config: ExperimentConfig,
    backend: SimulatorBackend,
}

impl ExperimentRunner {
    /// Build the backend the config names
    pub fn new(config: ExperimentConfig) -> Self {
        let backend = config.build_backend();
        Self { config, backend }
    }

    /// Configuration
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Backend in use
    pub fn backend(&self) -> &SimulatorBackend {
        &self.backend
    }

    /// Validate the config and run the sweep
    /// Gantree: run() -> Result<SweepOutcome> // 스윕 실행
    pub fn run(&self) -> GroverResult<SweepOutcome> {
        self.config.validate()?;
        log::info!("running {}", self.config);

        let start = Instant::now();
        let plan = self.config.sweep_plan()?;
        let options = self.config.sweep_options()?;
        let outcome = run_sweep_with(&plan, &self.backend, self.config.mode, self.config.shots, &options)
            .inspect_err(|e| log::warn!("{} sweep failed at {:?} stage: {}", self.config.mode, e.stage(), e))?;

        log::info!(
            "{} finished in {} ms on {}",
            outcome.title,
            start.elapsed().as_millis(),
            self.backend.name()
        );
        Ok(outcome)
    }

    /// Run, then write a heatmap of the result
    pub fn run_and_plot(&self) -> GroverResult<(SweepOutcome, PathBuf)> {
        let outcome = self.run()?;
        let path = render_heatmap(&outcome.accuracy, &outcome.title, None, &self.config.plot_options())?;
        Ok((outcome, path))
    }
}

/// Heatmaps side by side and a grouped bar graph for two sweeps.
/// Bars follow the marked-state order of `first`.
/// Gantree: render_comparison(first, second, title, options) -> Result<ComparisonFigures> // 비교
pub fn render_comparison(
    first: &SweepOutcome,
    second: &SweepOutcome,
    title: &str,
    options: &PlotOptions,
) -> GroverResult<ComparisonFigures> {
    let heatmap = render_heatmap(
        &first.accuracy,
        &first.title,
        Some((&second.accuracy, &second.title)),
        options,
    )?;
    let bar_graph = render_bar_graph(
        &first.accuracy,
        first.mode.as_str(),
        &second.accuracy,
        second.mode.as_str(),
        title,
        options,
    )?;
    Ok(ComparisonFigures { heatmap, bar_graph })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SweepMode;
    use approx::assert_relative_eq;
    use grover_core::{GroverError, MarkedState};
    use grover_plot::ImageFormat;

    #[test]
    fn test_runner_uses_config_backend() {
        let runner = ExperimentRunner::new(ExperimentConfig::helmi(SweepMode::Encoded));
        assert_eq!(runner.backend().name(), "IQMFakeAdonisBackend");
        assert_eq!(runner.config().mode, SweepMode::Encoded);
    }

    #[test]
    fn test_run_ideal_encoded() {
        let config = ExperimentConfig::ideal(SweepMode::Encoded).with_seed(4).with_shots(300);
        let outcome = ExperimentRunner::new(config).run().unwrap();

        assert_eq!(outcome.title, "encoded circuit run on Ideal Simulator");
        assert_eq!(outcome.accuracy.states(), MarkedState::ALL.to_vec());
        for (_, value) in outcome.accuracy.iter() {
            assert_relative_eq!(value, 1.0);
        }
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let runner = ExperimentRunner::new(ExperimentConfig::default().with_shots(0));
        assert!(matches!(runner.run(), Err(GroverError::ShotsOutOfRange(..))));
    }

    #[test]
    fn test_run_and_plot_writes_heatmap() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExperimentConfig::default()
            .with_seed(2)
            .with_shots(100)
            .with_output_dir(dir.path())
            .with_image_format(ImageFormat::Svg);

        let (outcome, path) = ExperimentRunner::new(config).run_and_plot().unwrap();

        assert_eq!(outcome.accuracy.len(), 4);
        assert!(path.starts_with(dir.path().join("heatmap")));
        assert!(std::fs::read_to_string(path).unwrap().contains("unencoded circuit run on Ideal Simulator"));
    }

    #[test]
    fn test_render_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let base = ExperimentConfig::default()
            .with_seed(6)
            .with_shots(100)
            .with_output_dir(dir.path())
            .with_image_format(ImageFormat::Svg);

        let unencoded = ExperimentRunner::new(base.clone()).run().unwrap();
        let encoded = ExperimentRunner::new(base.clone().with_mode(SweepMode::Encoded2)).run().unwrap();

        let figures = render_comparison(&unencoded, &encoded, "Ideal Simulator", &base.plot_options()).unwrap();

        assert!(figures.heatmap.exists());
        let bars = std::fs::read_to_string(&figures.bar_graph).unwrap();
        assert!(bars.contains(">unencoded<") && bars.contains(">encoded_2<"));
    }
}
