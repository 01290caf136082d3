//! # Grover Circuits
//!
//! Search circuits for a 2-bit marked state: plain Grover on 2 or 4 qubits,
//! and the same search carried out inside the [[4,2,2]] error-detecting code.
//!
//! ## Gantree Architecture
//!
//! ```text
//! grover_circuits // L2: Circuit Generator
//!     Oracle // 위상 오라클 + 진폭 반전
//!     Code422 // 인코딩/디코딩, 인코딩 오라클, 신드롬
//!     Generator // 완성 회로 + 기대 결과
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grover_circuits::prelude::*;
//! use grover_core::MarkedState;
//!
//! let circuit = build_unencoded(MarkedState::S10, QubitCount::Four);
//! assert_eq!(circuit.num_qubits(), 4);
//!
//! let kind = CircuitKind::Encoded { variant: EncodingVariant::Star, syndrome: true };
//! assert_eq!(kind.build(MarkedState::S01).num_qubits(), 6);
//! assert_eq!(kind.expected_outcome(MarkedState::S01), "001100");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Unencoded oracle and diffusion (Gantree: L2_Circuits → Oracle)
pub mod oracle;

/// [[4,2,2]] code stages (Gantree: L2_Circuits → Code422)
pub mod code422;

/// Complete circuits (Gantree: L2_Circuits → Generator)
pub mod generator;

// ============================================================================
// Re-exports
// ============================================================================

pub use code422::{add_syndrome_422, decode, encode, encoded_oracle, inversion, EncodingVariant};
pub use generator::{build_encoded, build_unencoded, measure_in_basis, CircuitKind};
pub use oracle::{diffusion, oracle, QubitCount};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use grover_circuits::prelude::*;
    //! ```

    pub use crate::code422::{
        add_syndrome_422, decode, encode, encoded_oracle, inversion, EncodingVariant,
    };
    pub use crate::generator::{build_encoded, build_unencoded, measure_in_basis, CircuitKind};
    pub use crate::oracle::QubitCount;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
