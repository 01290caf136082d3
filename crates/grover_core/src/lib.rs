//! # Grover Core
//!
//! Core types, circuits, and topology for Grover search with
//! [[4,2,2]] error detection.
//!
//! ## Gantree Architecture
//!
//! ```text
//! grover_core // L0+L1: Foundation + Circuit
//!     L0_Foundation // 기반 타입/상수/에러
//!         CoreTypes // 핵심 타입
//!         AccuracyMap // 정확도 맵
//!         Constants // 디바이스/실행 상수
//!         Errors // 에러 타입
//!     L1_Circuit // 회로 구조
//!         Gate // 게이트 enum
//!         Circuit // 회로 + 레지스터
//!         CircuitBuilder // 빌더 패턴
//!         Topology // 큐비트 토폴로지
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grover_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new(2)
//!     .h(0)
//!     .h(1)
//!     .cz(0, 1)
//!     .measure_all()
//!     .build();
//!
//! assert_eq!(circuit.num_clbits(), 2);
//! println!("{}", circuit.to_qasm());
//! ```
//!
//! ## Marked States
//!
//! ```rust
//! use grover_core::prelude::*;
//!
//! let marked: MarkedState = "01".parse().unwrap();
//! assert_eq!(marked.as_str(), "01");
//! assert!("012".parse::<MarkedState>().is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Accuracy map (Gantree: L0_Foundation → AccuracyMap)
pub mod accuracy;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

/// Qubit topology (Gantree: L1_Circuit → Topology)
pub mod topology;

// ============================================================================
// Re-exports
// ============================================================================

pub use accuracy::AccuracyMap;
pub use builder::CircuitBuilder;
pub use circuit::{Circuit, Register};
pub use constants::{execution, grover, helmi};
pub use error::{ErrorStage, GroverError, GroverResult};
pub use gate::{Gate, Matrix2};
pub use topology::Topology;
pub use types::{
    Angle, Basis, Bitstring, ClbitId, Counts, MarkedState, Probability, QubitId,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use grover_core::prelude::*;
    //! ```

    pub use crate::accuracy::AccuracyMap;
    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::{Circuit, Register};
    pub use crate::constants::{execution, grover, helmi};
    pub use crate::error::{GroverError, GroverResult};
    pub use crate::gate::Gate;
    pub use crate::topology::Topology;
    pub use crate::types::{
        Angle, Basis, Bitstring, ClbitId, Counts, MarkedState, Probability, QubitId,
    };
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_helmi_topology_from_constants() {
        let topo = Topology::from_coupling_map(&helmi::COUPLING_MAP).unwrap();

        assert_eq!(topo.num_qubits(), helmi::QUBIT_NAMES.len());
        assert_eq!(topo.degree(2), 4);
        assert_eq!(topo.diameter(), 2);
    }

    #[test]
    fn test_registers_and_measurement() {
        let circuit = CircuitBuilder::new(4)
            .register(grover::ANCILLA_X, 1)
            .register(grover::ANCILLA_Z, 1)
            .cx(0, 4)
            .measure_all()
            .build();

        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_clbits(), 6);
        assert_eq!(circuit.registers().len(), 3);
        assert!(circuit.has_terminal_measurements());
    }

    #[test]
    fn test_accuracy_from_counts() {
        let mut counts = Counts::new();
        counts.insert("01".to_string(), 930);
        counts.insert("11".to_string(), 70);

        let hits = counts.get("01").copied().unwrap_or(0);
        let p = Probability::from_ratio(hits, 1000).unwrap();

        let mut map = AccuracyMap::new();
        map.insert(MarkedState::S01, p.value()).unwrap();
        assert!((map.get(MarkedState::S01).unwrap() - 0.93).abs() < 1e-10);
    }

    #[test]
    fn test_bitstring_reversal_matches_clbit_order() {
        // clbit 0 is printed rightmost by the simulator
        let raw = Bitstring::parse("0011").unwrap();
        let canonical = raw.reversed();
        assert_eq!(canonical.get(0), Some(true));
        assert_eq!(canonical.to_string(), "1100");
    }
}
