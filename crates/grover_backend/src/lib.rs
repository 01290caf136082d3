//! # Grover Backend
//!
//! Execution backends, the Helmi device target and the transpiler that maps
//! search circuits onto it.
//!
//! ## Gantree Architecture
//!
//! ```text
//! grover_backend // L3: Backend Adapter
//!     BackendTrait // 백엔드 인터페이스
//!     NoiseModel // 노이즈 모델
//!     Target // 디바이스 타깃 (Helmi)
//!     SimulatorBackend // 상태벡터 시뮬레이터
//!     Synthesis // PRX 합성 + 가상 Z
//!     Transpiler // 배치/라우팅/번역
//!     Adapter // 라벨, 배치 고정, 실행
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grover_backend::prelude::*;
//! use grover_core::CircuitBuilder;
//!
//! let backend = SimulatorBackend::ideal(2).with_seed(42);
//! let circuit = CircuitBuilder::new(2).x(0).measure_all().build();
//!
//! // counts come back with character i = qubit i
//! let (counts, label) = execute(&circuit, &backend, 100).unwrap();
//! assert_eq!(counts.get("10"), Some(&100));
//! assert_eq!(label, "Ideal Simulator");
//! ```
//!
//! ## Helmi Stand-in
//!
//! ```rust
//! use grover_backend::prelude::*;
//! use grover_core::CircuitBuilder;
//!
//! let backend = SimulatorBackend::fake_adonis().with_seed(7);
//! let circuit = CircuitBuilder::new(4).h(0).cx(0, 1).measure_all().build();
//!
//! let native = transpile_circuit(&circuit, &backend, &["QB3", "QB1", "QB2", "QB4"], 4, 3).unwrap();
//! assert!(native.gates().iter().all(|g| ["prx", "cz", "measure", "barrier"].contains(&g.name())));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Execution types and backend trait (Gantree: L3_Backend)
pub mod execution;

/// Depolarizing and readout noise (Gantree: L3_Backend → NoiseModel)
pub mod noise;

/// Device description (Gantree: L3_Backend → Target)
pub mod target;

/// Simulator backend (Gantree: L3_Backend → SimulatorBackend)
pub mod simulator;

/// Native gate synthesis (Gantree: L3_Backend → Synthesis)
pub mod synthesis;

/// Layout, routing and translation (Gantree: L3_Backend → Transpiler)
pub mod transpiler;

/// Labels, pinned transpilation and execution (Gantree: L3_Backend → Adapter)
pub mod adapter;

// ============================================================================
// Re-exports
// ============================================================================

pub use adapter::{
    default_compile, execute, execute_with, resolve_backend_label, reverse_keys, transpile_circuit,
    ExecuteOptions,
};
pub use execution::{Backend, ExecutionResult};
pub use noise::NoiseModel;
pub use simulator::SimulatorBackend;
pub use target::Target;
pub use transpiler::{TranspiledCircuit, Transpiler, TranspilerConfig};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use grover_backend::prelude::*;
    //! ```

    pub use crate::adapter::{
        execute, execute_with, resolve_backend_label, transpile_circuit, ExecuteOptions,
    };
    pub use crate::execution::{Backend, ExecutionResult};
    pub use crate::noise::NoiseModel;
    pub use crate::simulator::SimulatorBackend;
    pub use crate::target::Target;
    pub use crate::transpiler::{TranspiledCircuit, Transpiler, TranspilerConfig};
}

// ============================================================================
// Integration Tests
// ============================================================================
