//! Experiment configuration
//!
//! Gantree: L4_Experiment → Config
//!
//! One JSON-serializable record describing a sweep: what to run, where to
//! run it and where figures go.

use crate::runner::{PlanEntry, SweepMode, SweepOptions, SweepPlan};
use grover_backend::{ExecuteOptions, SimulatorBackend, Target};
use grover_circuits::QubitCount;
use grover_core::{execution, grover, helmi, GroverError, GroverResult};
use grover_plot::{ImageFormat, PlotOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Widest circuit the runner builds (encoded data plus two ancillas)
const IDEAL_WIDTH: usize = grover::CODE_QUBITS + 2;

/// Backend a sweep runs on
/// Gantree: BackendKind // ideal | helmi_simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Noiseless state-vector simulator
    #[default]
    Ideal,
    /// Adonis-topology simulator with Helmi noise
    HelmiSimulator,
}

impl BackendKind {
    /// Instantiate the backend, seeded when `seed` is given
    pub fn build(&self, seed: Option<u64>) -> SimulatorBackend {
        let backend = match self {
            BackendKind::Ideal => SimulatorBackend::ideal(IDEAL_WIDTH),
            BackendKind::HelmiSimulator => SimulatorBackend::fake_adonis(),
        };
        match seed {
            Some(seed) => backend.with_seed(seed),
            None => backend,
        }
    }
}

/// Sweep configuration
/// Gantree: ExperimentConfig // 실험 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    // ========================================================================
    // Sweep
    // ========================================================================
    /// Circuit family
    pub mode: SweepMode,

    /// Marked state → expected bitstring; the canonical table when absent
    pub plan: Option<Vec<PlanEntry>>,

    /// Width of unencoded circuits (2 or 4)
    pub unencoded_qubits: usize,

    /// Measure the stabilizers of encoded circuits
    pub syndrome: bool,

    // ========================================================================
    // Execution
    // ========================================================================
    /// Backend to run on
    pub backend: BackendKind,

    /// Shots per circuit
    pub shots: u64,

    /// RNG seed for reproducible runs
    pub seed: Option<u64>,

    // ========================================================================
    // Transpilation
    // ========================================================================
    /// Physical qubit names, logical qubit `i` goes to `qubit_order[i]`
    pub qubit_order: Vec<String>,

    /// Transpiler optimization level (0-3)
    pub optimization_level: u8,

    // ========================================================================
    // Output
    // ========================================================================
    /// Figures go below this directory
    pub output_dir: PathBuf,

    /// Figure format
    pub image_format: ImageFormat,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            mode: SweepMode::Unencoded,
            plan: None,
            unencoded_qubits: 2,
            syndrome: false,
            backend: BackendKind::Ideal,
            shots: execution::DEFAULT_SHOTS,
            seed: None,
            qubit_order: helmi::DEFAULT_QUBIT_ORDER.iter().map(|s| s.to_string()).collect(),
            optimization_level: helmi::DEFAULT_OPTIMIZATION_LEVEL,
            output_dir: PathBuf::from("."),
            image_format: ImageFormat::default(),
        }
    }
}

impl ExperimentConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Noiseless sweep of `mode`
    pub fn ideal(mode: SweepMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Sweep of `mode` on the Helmi stand-in
    pub fn helmi(mode: SweepMode) -> Self {
        Self {
            mode,
            backend: BackendKind::HelmiSimulator,
            ..Self::default()
        }
    }

    /// Parse from JSON text; absent fields take their defaults
    pub fn from_json(json: &str) -> GroverResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> GroverResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GroverError::FileError(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON
    pub fn to_json(&self) -> GroverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set sweep mode
    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set plan from `(marked, expected)` string pairs; checked by [`Self::validate`]
    pub fn with_plan<M: AsRef<str>, E: AsRef<str>>(mut self, pairs: &[(M, E)]) -> GroverResult<Self> {
        let plan = SweepPlan::from_pairs(pairs.iter().map(|(m, e)| (m.as_ref(), e.as_ref())))?;
        self.plan = Some(plan.entries().to_vec());
        Ok(self)
    }

    /// Set qubit order
    pub fn with_qubit_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.qubit_order = order.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Set optimization level
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }

    /// Set unencoded width
    pub fn with_unencoded_qubits(mut self, qubits: usize) -> Self {
        self.unencoded_qubits = qubits;
        self
    }

    /// Enable syndrome extraction
    pub fn with_syndrome(mut self, syndrome: bool) -> Self {
        self.syndrome = syndrome;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set image format
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Same backend and output, the other side of the unencoded/encoded
    /// comparison. A custom plan only fits its own mode, so the counterpart
    /// runs the canonical table without syndrome.
    /// Gantree: counterpart() -> Self // 비교 상대
    pub fn counterpart(&self) -> Self {
        let mode = match self.mode {
            SweepMode::Unencoded => SweepMode::Encoded,
            _ => SweepMode::Unencoded,
        };
        Self {
            mode,
            plan: None,
            syndrome: false,
            ..self.clone()
        }
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Plan to run: the configured entries, or the canonical table
    pub fn sweep_plan(&self) -> GroverResult<SweepPlan> {
        match &self.plan {
            Some(entries) => SweepPlan::from_entries(entries.clone()),
            None => Ok(SweepPlan::canonical(self.circuit_kind()?)),
        }
    }

    /// Options for the runner
    pub fn sweep_options(&self) -> GroverResult<SweepOptions> {
        Ok(SweepOptions::default()
            .with_unencoded_qubits(QubitCount::try_from(self.unencoded_qubits)?)
            .with_syndrome(self.syndrome)
            .with_execute(self.execute_options()))
    }

    /// Options for the backend adapter
    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions::default()
            .with_qubit_order(&self.qubit_order)
            .with_optimization_level(self.optimization_level)
    }

    /// Options for figure output
    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions::new(&self.output_dir).with_format(self.image_format)
    }

    /// Backend described by this config
    pub fn build_backend(&self) -> SimulatorBackend {
        self.backend.build(self.seed)
    }

    fn circuit_kind(&self) -> GroverResult<grover_circuits::CircuitKind> {
        let qubits = QubitCount::try_from(self.unencoded_qubits)?;
        Ok(self.mode.kind(qubits, self.syndrome))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> GroverResult<()> {
        if self.shots == 0 || self.shots > execution::MAX_SHOTS {
            return Err(GroverError::ShotsOutOfRange(self.shots, 1, execution::MAX_SHOTS));
        }

        if self.optimization_level > 3 {
            return Err(GroverError::InvalidOptimizationLevel(self.optimization_level));
        }

        let kind = self.circuit_kind()?;
        self.sweep_plan()?;

        let mut seen = HashSet::new();
        if let Some(dup) = self.qubit_order.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(GroverError::InvalidLayout(format!("qubit '{}' listed twice", dup)));
        }

        if self.backend == BackendKind::HelmiSimulator {
            let target = Target::iqm_adonis();
            target.layout_from_names(&self.qubit_order)?;
            if kind.num_qubits() > target.num_qubits() {
                return Err(GroverError::InvalidConfig(format!(
                    "{} needs {} qubits, {} has {}",
                    kind,
                    kind.num_qubits(),
                    target.name(),
                    target.num_qubits()
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExperimentConfig({}, {:?}, shots={}, order=[{}], level={})",
            self.mode,
            self.backend,
            self.shots,
            self.qubit_order.join(","),
            self.optimization_level
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grover_backend::Backend;
    use grover_core::MarkedState;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();

        assert_eq!(config.mode, SweepMode::Unencoded);
        assert_eq!(config.backend, BackendKind::Ideal);
        assert_eq!(config.shots, 1000);
        assert_eq!(config.qubit_order, ["QB3", "QB1", "QB2", "QB4"]);
        assert_eq!(config.optimization_level, 3);
        assert_eq!(config.unencoded_qubits, 2);
        assert!(!config.syndrome);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_kind() {
        let ideal = BackendKind::Ideal.build(Some(1));
        let helmi = BackendKind::HelmiSimulator.build(None);

        assert_eq!(ideal.name(), "aer_simulator");
        assert_eq!(ideal.num_qubits(), 6);
        assert_eq!(helmi.name(), "IQMFakeAdonisBackend");
        assert!(helmi.target().is_some());
    }

    #[test]
    fn test_json_round_trip_and_partial() {
        let config = ExperimentConfig::helmi(SweepMode::Encoded2)
            .with_seed(9)
            .with_plan(&[("01", "0010")])
            .unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"encoded_2\""));
        assert!(json.contains("\"helmi_simulator\""));
        assert_eq!(ExperimentConfig::from_json(&json).unwrap(), config);

        let partial = ExperimentConfig::from_json(r#"{"mode": "encoded", "shots": 250}"#).unwrap();
        assert_eq!(partial.mode, SweepMode::Encoded);
        assert_eq!(partial.shots, 250);
        assert_eq!(partial.optimization_level, 3);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.json");
        std::fs::write(
            &path,
            r#"{"backend": "helmi_simulator", "plan": [{"marked": "11", "expected": "11"}]}"#,
        )
        .unwrap();

        let config = ExperimentConfig::from_json_file(&path).unwrap();
        let plan = config.sweep_plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].marked, MarkedState::S11);

        assert!(matches!(
            ExperimentConfig::from_json_file(dir.path().join("missing.json")),
            Err(GroverError::FileError(_))
        ));
    }

    #[test]
    fn test_canonical_plan_follows_mode() {
        let config = ExperimentConfig::ideal(SweepMode::Encoded).with_syndrome(true);
        let expected: Vec<String> =
            config.sweep_plan().unwrap().entries().iter().map(|e| e.expected.clone()).collect();
        assert_eq!(expected, ["000000", "001100", "010100", "011000"]);
    }

    #[test]
    fn test_counterpart_drops_custom_plan() {
        let config = ExperimentConfig::ideal(SweepMode::Unencoded)
            .with_plan(&[("00", "00"), ("01", "01"), ("10", "10"), ("11", "11")])
            .unwrap()
            .with_seed(9);

        let other = config.counterpart();

        assert_eq!(other.mode, SweepMode::Encoded);
        assert!(other.plan.is_none());
        assert_eq!(other.seed, Some(9));
        let expected: Vec<String> =
            other.sweep_plan().unwrap().entries().iter().map(|e| e.expected.clone()).collect();
        assert_eq!(expected, ["0000", "0011", "0101", "0110"]);
        assert_eq!(other.counterpart().mode, SweepMode::Unencoded);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ExperimentConfig::default().with_shots(0).validate(),
            Err(GroverError::ShotsOutOfRange(..))
        ));
        assert!(matches!(
            ExperimentConfig::default().with_optimization_level(4).validate(),
            Err(GroverError::InvalidOptimizationLevel(4))
        ));
        assert!(matches!(
            ExperimentConfig::default().with_unencoded_qubits(3).validate(),
            Err(GroverError::UnsupportedQubitCount(3))
        ));
        assert!(matches!(
            ExperimentConfig::helmi(SweepMode::Unencoded).with_qubit_order(&["QB1", "QB7"]).validate(),
            Err(GroverError::UnknownQubitName(_))
        ));
        assert!(matches!(
            ExperimentConfig::default().with_qubit_order(&["QB1", "QB1"]).validate(),
            Err(GroverError::InvalidLayout(_))
        ));
        // six qubits do not fit the five-qubit device
        assert!(matches!(
            ExperimentConfig::helmi(SweepMode::Encoded).with_syndrome(true).validate(),
            Err(GroverError::InvalidConfig(_))
        ));
        assert!(ExperimentConfig::ideal(SweepMode::Encoded).with_syndrome(true).validate().is_ok());
    }

    #[test]
    fn test_conversions() {
        let config = ExperimentConfig::default()
            .with_unencoded_qubits(4)
            .with_qubit_order(&["QB3", "QB5"])
            .with_optimization_level(0)
            .with_output_dir("/tmp/figs");

        let options = config.sweep_options().unwrap();
        assert_eq!(options.unencoded_qubits, QubitCount::Four);
        assert_eq!(options.execute.qubit_order, ["QB3", "QB5"]);
        assert_eq!(options.execute.optimization_level, 0);
        assert_eq!(config.plot_options().output_root, PathBuf::from("/tmp/figs"));
    }
}
