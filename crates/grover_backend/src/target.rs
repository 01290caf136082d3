//! Device target description
//!
//! Gantree: L3_Backend → Target
//!
//! Qubit names, coupling graph and native gates of a physical device.

use grover_core::{helmi, GroverError, GroverResult, QubitId, Topology};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical device description
/// Gantree: Target // 디바이스 타깃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    name: String,
    qubit_names: Vec<String>,
    topology: Topology,
    basis_gates: Vec<String>,
}

impl Target {
    /// Create a target, checking the topology covers every named qubit
    pub fn new(
        name: impl Into<String>,
        qubit_names: Vec<String>,
        topology: Topology,
        basis_gates: Vec<String>,
    ) -> GroverResult<Self> {
        if topology.num_qubits() > qubit_names.len() {
            return Err(GroverError::QubitOutOfRange {
                qubit: topology.num_qubits() - 1,
                max: qubit_names.len().saturating_sub(1),
            });
        }
        Ok(Self {
            name: name.into(),
            qubit_names,
            topology,
            basis_gates,
        })
    }

    /// IQM Adonis (Helmi): QB1..QB5 in a star around QB3, native prx + cz
    /// Gantree: iqm_adonis() -> Self // 헬미 타깃
    pub fn iqm_adonis() -> Self {
        let topology = Topology::helmi();

        Self {
            name: "IQM Adonis".to_string(),
            qubit_names: helmi::QUBIT_NAMES.iter().map(|s| s.to_string()).collect(),
            topology,
            basis_gates: helmi::BASIS_GATES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Target name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical qubits
    pub fn num_qubits(&self) -> usize {
        self.qubit_names.len()
    }

    /// Physical qubit names in index order
    pub fn qubit_names(&self) -> &[String] {
        &self.qubit_names
    }

    /// Coupling graph
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Native operation names
    pub fn basis_gates(&self) -> &[String] {
        &self.basis_gates
    }

    /// Check whether `gate` is a native operation
    pub fn supports(&self, gate: &str) -> bool {
        self.basis_gates.iter().any(|g| g == gate)
    }

    /// Physical index of a named qubit
    /// Gantree: qubit_name_to_index(name) -> Result<QubitId> // 이름→인덱스
    pub fn qubit_name_to_index(&self, name: &str) -> GroverResult<QubitId> {
        self.qubit_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| GroverError::UnknownQubitName(name.to_string()))
    }

    /// Physical indices for a list of qubit names
    pub fn layout_from_names<S: AsRef<str>>(&self, names: &[S]) -> GroverResult<Vec<QubitId>> {
        names
            .iter()
            .map(|n| self.qubit_name_to_index(n.as_ref()))
            .collect()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Target({}, {} qubits, basis [{}])",
            self.name,
            self.num_qubits(),
            self.basis_gates.join(", ")
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
