//! Error types for Grover
//!
//! Gantree: L0_Foundation → Errors
//!
//! One error enum shared by every crate in the workspace, grouped by the
//! stage that raises it.

// Field meaning is carried by the messages
#![allow(missing_docs)]

use thiserror::Error;

/// Workspace error
/// Gantree: GroverError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroverError {
    // ========================================================================
    // Input
    // ========================================================================
    /// Gantree: InvalidMarkedState(String) // 마킹 상태
    #[error("marked state '{0}' is not one of 00, 01, 10, 11")]
    InvalidMarkedState(String),

    #[error("'{0}' is not a bitstring of 0s and 1s")]
    InvalidBitstring(String),

    /// Gantree: InvalidProbability(f64) // 확률 범위
    #[error("probability {0} lies outside [0, 1]")]
    InvalidProbability(f64),

    #[error("'{0}' is not a measurement basis (X, Y or Z)")]
    InvalidBasis(String),

    #[error("search circuits come in 2 or 4 qubits, not {0}")]
    UnsupportedQubitCount(usize),

    #[error("[[4,2,2]] encoding variant must be 1 or 2, got {0}")]
    InvalidEncodingVariant(u8),

    // ========================================================================
    // Circuit
    // ========================================================================
    /// Gantree: QubitOutOfRange{qubit,max} // 큐비트 범위
    #[error("qubit {qubit} does not exist (highest is {max})")]
    QubitOutOfRange { qubit: usize, max: usize },

    #[error("gate on qubit {qubit} in a {num_qubits}-qubit circuit")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    #[error("measurement into clbit {clbit} with only {num_clbits} clbits declared")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    #[error("register '{0}' has zero width")]
    EmptyRegister(String),

    #[error("circuit has no gates")]
    EmptyCircuit,

    // ========================================================================
    // Device and Transpilation
    // ========================================================================
    #[error("coupling map has no edges")]
    EmptyCouplingMap,

    #[error("coupling ({0}, {1}) joins a qubit to itself")]
    InvalidCoupling(usize, usize),

    /// Gantree: TopologyViolation{q1,q2} // 연결 위반
    #[error("two-qubit gate on uncoupled qubits {q1} and {q2}")]
    TopologyViolation { q1: usize, q2: usize },

    #[error("qubits {0} and {1} are not connected on the device")]
    PathNotFound(usize, usize),

    #[error("device has no qubit named '{0}'")]
    UnknownQubitName(String),

    #[error("layout rejected: {0}")]
    InvalidLayout(String),

    #[error("no rule lowers '{0}' into the target basis")]
    UnsupportedGate(String),

    #[error("optimization level {0} is above 3")]
    InvalidOptimizationLevel(u8),

    // ========================================================================
    // Execution
    // ========================================================================
    /// Gantree: BackendError(String) // 백엔드
    #[error("backend failed: {0}")]
    BackendError(String),

    #[error("{0} shots requested, allowed range is {1}..={2}")]
    ShotsOutOfRange(u64, u64, u64),

    #[error("noise strength {0} lies outside [0, 1]")]
    InvalidNoiseLevel(f64),

    // ========================================================================
    // Experiment and Output
    // ========================================================================
    #[error("accuracy for '{0}' was already recorded")]
    AccuracyAlreadyRecorded(String),

    #[error("bad experiment config: {0}")]
    InvalidConfig(String),

    #[error("figure could not be written: {0}")]
    PlotError(String),

    #[error("json: {0}")]
    JsonError(String),

    #[error("file: {0}")]
    FileError(String),
}

/// Result alias used across the workspace
/// Gantree: GroverResult<T> // type alias
pub type GroverResult<T> = Result<T, GroverError>;

/// Pipeline stage an error belongs to
/// Gantree: ErrorStage // 오류 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Rejected user input
    Input,
    /// Malformed circuit
    Circuit,
    /// Layout, routing or basis translation
    Transpile,
    /// Backend run
    Execution,
    /// Sweep bookkeeping, config and file output
    Experiment,
}

impl GroverError {
    /// Stage that raised the error
    pub fn stage(&self) -> ErrorStage {
        use GroverError::*;
        match self {
            InvalidMarkedState(_)
            | InvalidBitstring(_)
            | InvalidProbability(_)
            | InvalidBasis(_)
            | UnsupportedQubitCount(_)
            | InvalidEncodingVariant(_) => ErrorStage::Input,
            QubitOutOfRange { .. }
            | GateQubitMismatch { .. }
            | ClbitOutOfRange { .. }
            | EmptyRegister(_)
            | EmptyCircuit => ErrorStage::Circuit,
            EmptyCouplingMap
            | InvalidCoupling(..)
            | TopologyViolation { .. }
            | PathNotFound(..)
            | UnknownQubitName(_)
            | InvalidLayout(_)
            | UnsupportedGate(_)
            | InvalidOptimizationLevel(_) => ErrorStage::Transpile,
            BackendError(_) | ShotsOutOfRange(..) | InvalidNoiseLevel(_) => ErrorStage::Execution,
            AccuracyAlreadyRecorded(_) | InvalidConfig(_) | PlotError(_) | JsonError(_) | FileError(_) => {
                ErrorStage::Experiment
            }
        }
    }
}

impl From<serde_json::Error> for GroverError {
    fn from(err: serde_json::Error) -> Self {
        GroverError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for GroverError {
    fn from(err: std::io::Error) -> Self {
        GroverError::FileError(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
