//! Backend interface
//!
//! Gantree: L3_Backend → BackendTrait
//!
//! What a backend takes (a compiled circuit and a shot count) and what it
//! hands back (a histogram keyed with the highest clbit leftmost).

use crate::target::Target;
use grover_core::{execution, Circuit, Counts, GroverError, GroverResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Histogram of one run plus where it came from
/// Gantree: ExecutionResult // 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Bitstring → shots, highest clbit leftmost
    pub counts: Counts,
    /// Shots requested
    pub shots: u64,
    /// Name reported by the backend
    pub backend: String,
    /// Wall-clock run time
    pub elapsed_ms: Option<u64>,
    /// Sampling seed, when fixed
    pub seed: Option<u64>,
    /// Noise description for simulated runs
    pub noise: Option<String>,
}

impl ExecutionResult {
    /// Bare result with no timing or provenance
    pub fn new(counts: Counts, shots: u64, backend: impl Into<String>) -> Self {
        Self {
            counts,
            shots,
            backend: backend.into(),
            elapsed_ms: None,
            seed: None,
            noise: None,
        }
    }

    /// Shots that landed in the histogram
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Fraction of shots that read `bitstring`
    pub fn probability(&self, bitstring: &str) -> f64 {
        match self.shots {
            0 => 0.0,
            shots => self.counts.get(bitstring).copied().unwrap_or(0) as f64 / shots as f64,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shots on {}, {} outcomes", self.shots, self.backend, self.counts.len())?;
        if let Some(ms) = self.elapsed_ms {
            write!(f, " in {} ms", ms)?;
        }
        Ok(())
    }
}

/// Something that can run circuits
/// Gantree: BackendTrait // 백엔드 인터페이스
pub trait Backend: Send + Sync {
    /// Name used to pick the display label
    fn name(&self) -> &str;

    /// Physical qubits available
    fn num_qubits(&self) -> usize;

    /// Run `circuit` for `shots` shots
    /// Gantree: execute(circuit, shots) -> Result<ExecutionResult>
    fn execute(&self, circuit: &Circuit, shots: u64) -> GroverResult<ExecutionResult>;

    /// Run several circuits in order
    fn execute_batch(&self, circuits: &[Circuit], shots: u64) -> GroverResult<Vec<ExecutionResult>> {
        circuits.iter().map(|c| self.execute(c, shots)).collect()
    }

    /// Device model, when the backend stands for real hardware
    fn target(&self) -> Option<&Target> {
        None
    }

    /// False only for real hardware
    fn is_simulator(&self) -> bool {
        true
    }

    /// Largest accepted shot count
    fn max_shots(&self) -> u64 {
        execution::MAX_SHOTS
    }
}

/// Reject shot counts outside `1..=backend.max_shots()`
pub fn check_shots(backend: &dyn Backend, shots: u64) -> GroverResult<()> {
    match backend.max_shots() {
        max if (1..=max).contains(&shots) => Ok(()),
        max => Err(GroverError::ShotsOutOfRange(shots, 1, max)),
    }
}

// ============================================================================
// Tests
// ============================================================================
