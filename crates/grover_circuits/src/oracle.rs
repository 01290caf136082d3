//! Unencoded oracle and amplitude inversion
//!
//! Gantree: L2_Circuits → Oracle
//!
//! Phase oracles for the 2- and 4-qubit search circuits. The 4-qubit
//! circuit runs two copies of the 2-qubit search side by side on the
//! pairs (0,1) and (2,3).

use grover_core::{CircuitBuilder, GroverError, MarkedState, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of an unencoded search circuit
/// Gantree: QubitCount // 2 | 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QubitCount {
    /// One search pair
    #[default]
    Two,
    /// Two search pairs
    Four,
}

impl QubitCount {
    /// Number of qubits
    pub fn count(&self) -> usize {
        match self {
            QubitCount::Two => 2,
            QubitCount::Four => 4,
        }
    }

    /// Qubit pairs the CZ layers act on
    pub fn cz_pairs(&self) -> &'static [(QubitId, QubitId)] {
        match self {
            QubitCount::Two => &[(0, 1)],
            QubitCount::Four => &[(0, 1), (2, 3)],
        }
    }

    /// All qubit indices
    pub fn qubits(&self) -> Vec<QubitId> {
        (0..self.count()).collect()
    }
}

impl TryFrom<usize> for QubitCount {
    type Error = GroverError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(QubitCount::Two),
            4 => Ok(QubitCount::Four),
            _ => Err(GroverError::UnsupportedQubitCount(n)),
        }
    }
}

impl fmt::Display for QubitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// X gates applied before the CZ layer
fn pre_flips(marked: MarkedState, qubits: QubitCount) -> &'static [QubitId] {
    match (qubits, marked) {
        (QubitCount::Two, MarkedState::S11) => &[0, 1],
        (QubitCount::Two, MarkedState::S01) => &[0],
        (QubitCount::Two, MarkedState::S10) => &[1],
        (QubitCount::Two, MarkedState::S00) => &[],
        (QubitCount::Four, MarkedState::S11) => &[0, 1, 2, 3],
        (QubitCount::Four, MarkedState::S01) => &[2, 0],
        (QubitCount::Four, MarkedState::S10) => &[3, 1],
        (QubitCount::Four, MarkedState::S00) => &[],
    }
}

/// X gates applied after the CZ layer
fn post_flips(marked: MarkedState, qubits: QubitCount) -> &'static [QubitId] {
    match (qubits, marked) {
        (QubitCount::Two, MarkedState::S00) => &[0, 1],
        (QubitCount::Two, MarkedState::S01) => &[0],
        (QubitCount::Two, MarkedState::S10) => &[1],
        (QubitCount::Two, MarkedState::S11) => &[],
        (QubitCount::Four, MarkedState::S00) => &[0, 1, 2, 3],
        (QubitCount::Four, MarkedState::S01) => &[0, 2],
        (QubitCount::Four, MarkedState::S10) => &[1, 3],
        (QubitCount::Four, MarkedState::S11) => &[],
    }
}

/// CZ on every search pair
fn cz_layer(mut builder: CircuitBuilder, qubits: QubitCount) -> CircuitBuilder {
    for &(a, b) in qubits.cz_pairs() {
        builder = builder.cz(a, b);
    }
    builder
}

/// Append the phase oracle for `marked`, followed by a barrier
/// Gantree: oracle(b, marked, n) -> CircuitBuilder // 오라클
pub fn oracle(builder: CircuitBuilder, marked: MarkedState, qubits: QubitCount) -> CircuitBuilder {
    let builder = builder.x_on(pre_flips(marked, qubits));
    let builder = cz_layer(builder, qubits);
    builder.x_on(post_flips(marked, qubits)).barrier()
}

/// Append the amplitude inversion (diffusion) step
/// Gantree: diffusion(b, n) -> CircuitBuilder // 진폭 반전
pub fn diffusion(builder: CircuitBuilder, qubits: QubitCount) -> CircuitBuilder {
    let all = qubits.qubits();
    let builder = builder.h_on(&all).x_on(&all);
    let builder = cz_layer(builder, qubits);
    builder.x_on(&all).h_on(&all)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grover_core::Gate;

    #[test]
    fn test_qubit_count_try_from() {
        assert_eq!(QubitCount::try_from(2).unwrap(), QubitCount::Two);
        assert_eq!(QubitCount::try_from(4).unwrap(), QubitCount::Four);
        assert!(matches!(
            QubitCount::try_from(3),
            Err(GroverError::UnsupportedQubitCount(3))
        ));
    }

    #[test]
    fn test_oracle_01_four_qubits() {
        let circuit = oracle(CircuitBuilder::new(4), MarkedState::S01, QubitCount::Four).build();

        assert_eq!(
            circuit.gates()[..6].to_vec(),
            vec![
                Gate::X(2),
                Gate::X(0),
                Gate::Cz(0, 1),
                Gate::Cz(2, 3),
                Gate::X(0),
                Gate::X(2),
            ]
        );
        assert!(circuit.gates()[6].is_barrier());
    }

    #[test]
    fn test_oracle_cz_count() {
        for marked in MarkedState::ALL {
            let two = oracle(CircuitBuilder::new(2), marked, QubitCount::Two).build();
            let four = oracle(CircuitBuilder::new(4), marked, QubitCount::Four).build();
            assert_eq!(two.count_2q(), 1);
            assert_eq!(four.count_2q(), 2);
        }
    }

    #[test]
    fn test_diffusion_structure() {
        let circuit = diffusion(CircuitBuilder::new(2), QubitCount::Two).build();

        assert_eq!(circuit.count_named("h"), 4);
        assert_eq!(circuit.count_named("x"), 4);
        assert_eq!(circuit.count_named("cz"), 1);
    }
}
