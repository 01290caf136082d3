//! Constants for Grover
//!
//! Gantree: L0_Foundation → Constants
//!
//! Search-circuit parameters, the IQM Helmi (Adonis) device description
//! and execution defaults.

// ============================================================================
// Grover Constants
// Gantree: grover // 탐색 상수
// ============================================================================

pub mod grover {
    //! Grover circuit parameters

    use std::f64::consts::FRAC_PI_2;

    /// Rz angle applied to every data qubit by the encoded oracle
    pub const ENCODED_ORACLE_PHASE: f64 = FRAC_PI_2;

    /// Number of data qubits in a [[4,2,2]] block
    pub const CODE_QUBITS: usize = 4;

    /// Ancilla register for the ZZZZ stabilizer
    pub const ANCILLA_X: &str = "ancilla_x";

    /// Ancilla register for the XXXX stabilizer
    pub const ANCILLA_Z: &str = "ancilla_z";
}

// ============================================================================
// Helmi Device Constants
// Gantree: helmi // 디바이스 상수
// ============================================================================

pub mod helmi {
    //! IQM Adonis-class 5-qubit device (Helmi) as seen by the fake backend

    /// Physical qubit names; index in this array is the physical index
    pub const QUBIT_NAMES: [&str; 5] = ["QB1", "QB2", "QB3", "QB4", "QB5"];

    /// Star coupling centered on QB3
    pub const COUPLING_MAP: [(usize, usize); 4] = [(0, 2), (1, 2), (2, 3), (2, 4)];

    /// Native gates accepted by the device
    pub const BASIS_GATES: [&str; 4] = ["prx", "cz", "measure", "barrier"];

    /// Logical → physical mapping used for 4-qubit circuits
    pub const DEFAULT_QUBIT_ORDER: [&str; 4] = ["QB3", "QB1", "QB2", "QB4"];

    /// Default transpiler optimization level
    pub const DEFAULT_OPTIMIZATION_LEVEL: u8 = 3;

    /// Single-qubit gate depolarizing probability
    pub const GATE_ERROR_1Q: f64 = 0.002;

    /// Two-qubit gate depolarizing probability
    pub const GATE_ERROR_2Q: f64 = 0.03;

    /// Symmetric readout flip probability
    pub const READOUT_ERROR: f64 = 0.03;
}

// ============================================================================
// Execution Constants
// Gantree: execution // 실행 상수
// ============================================================================

pub mod execution {
    //! Backend identities and shot limits

    /// Identity of the noiseless reference simulator
    pub const IDEAL_BACKEND_NAME: &str = "aer_simulator";

    /// Identity of the noisy Helmi stand-in
    pub const FAKE_HELMI_BACKEND_NAME: &str = "IQMFakeAdonisBackend";

    /// Default shots per circuit
    pub const DEFAULT_SHOTS: u64 = 1000;

    /// Maximum shots per execution
    pub const MAX_SHOTS: u64 = 100_000;
}

// ============================================================================
// Tests
// ============================================================================
