//! Circuit generator
//!
//! Gantree: L2_Circuits → Generator
//!
//! Builds complete (unmeasured) search circuits for a marked state.

use crate::code422::{self, EncodingVariant};
use crate::oracle::{self, QubitCount};
use grover_core::{grover, Basis, Circuit, CircuitBuilder, MarkedState, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unencoded Grover search on 2 or 4 qubits
/// Gantree: build_unencoded(marked, n) -> Circuit // 비인코딩 회로
pub fn build_unencoded(marked: MarkedState, qubits: QubitCount) -> Circuit {
    log::debug!("building unencoded {}-qubit circuit for {}", qubits, marked);

    let builder = CircuitBuilder::with_name(qubits.count(), format!("grover_unencoded_{}", marked))
        .h_layer()
        .barrier();
    let builder = oracle::oracle(builder, marked, qubits);
    oracle::diffusion(builder, qubits).build()
}

/// Grover search inside the [[4,2,2]] code, with optional syndrome extraction
/// Gantree: build_encoded(marked, variant, syndrome) -> Circuit // 인코딩 회로
pub fn build_encoded(marked: MarkedState, variant: EncodingVariant, include_syndrome: bool) -> Circuit {
    log::debug!(
        "building encoded circuit for {} (variant {}, syndrome {})",
        marked,
        variant,
        include_syndrome
    );

    let data: Vec<QubitId> = (0..grover::CODE_QUBITS).collect();
    let builder = CircuitBuilder::with_name(grover::CODE_QUBITS, format!("grover_encoded_{}", marked));
    let builder = code422::encode(builder, variant).h_on(&data).barrier();
    let builder = code422::encoded_oracle(builder, marked);
    let mut builder = code422::inversion(builder);
    if include_syndrome {
        builder = code422::add_syndrome_422(builder);
    }
    code422::decode(builder, variant).build()
}

/// Rotate `qubit` so that a following Z measurement reads out `basis`
/// Gantree: measure_in_basis(b, basis, q) -> CircuitBuilder // 파울리 기저
pub fn measure_in_basis(builder: CircuitBuilder, basis: Basis, qubit: QubitId) -> CircuitBuilder {
    builder.apply_basis(qubit, basis)
}

// ============================================================================
// Circuit Kind
// ============================================================================

/// Which family of search circuit to build
/// Gantree: CircuitKind // 회로 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitKind {
    /// Plain Grover search
    Unencoded(QubitCount),
    /// [[4,2,2]]-protected search
    Encoded {
        /// Encoder wiring
        variant: EncodingVariant,
        /// Append stabilizer ancillas
        syndrome: bool,
    },
}

impl CircuitKind {
    /// Build the circuit for `marked`
    pub fn build(&self, marked: MarkedState) -> Circuit {
        match *self {
            CircuitKind::Unencoded(qubits) => build_unencoded(marked, qubits),
            CircuitKind::Encoded { variant, syndrome } => build_encoded(marked, variant, syndrome),
        }
    }

    /// Number of data qubits (excludes syndrome ancillas)
    pub fn data_qubits(&self) -> usize {
        match self {
            CircuitKind::Unencoded(qubits) => qubits.count(),
            CircuitKind::Encoded { .. } => grover::CODE_QUBITS,
        }
    }

    /// Total circuit width
    pub fn num_qubits(&self) -> usize {
        match self {
            CircuitKind::Encoded { syndrome: true, .. } => grover::CODE_QUBITS + 2,
            _ => self.data_qubits(),
        }
    }

    /// Ideal measured bitstring for `marked`, character `i` = qubit `i`
    /// Gantree: expected_outcome(marked) -> String // 기대 결과
    pub fn expected_outcome(&self, marked: MarkedState) -> String {
        let data = match (self, marked) {
            (CircuitKind::Unencoded(QubitCount::Two), m) => m.as_str(),
            (CircuitKind::Unencoded(QubitCount::Four), MarkedState::S00) => "0000",
            (CircuitKind::Unencoded(QubitCount::Four), MarkedState::S01) => "0101",
            (CircuitKind::Unencoded(QubitCount::Four), MarkedState::S10) => "1010",
            (CircuitKind::Unencoded(QubitCount::Four), MarkedState::S11) => "1111",
            (CircuitKind::Encoded { variant, .. }, m) => match (variant, m) {
                (_, MarkedState::S00) => "0000",
                (EncodingVariant::Star, MarkedState::S01) => "0011",
                (EncodingVariant::Star, MarkedState::S10) => "0101",
                (EncodingVariant::Star, MarkedState::S11) => "0110",
                (EncodingVariant::Chain, MarkedState::S01) => "0010",
                (EncodingVariant::Chain, MarkedState::S10) => "0111",
                (EncodingVariant::Chain, MarkedState::S11) => "0101",
            },
        };

        let ancillas = self.num_qubits() - self.data_qubits();
        format!("{}{}", data, "0".repeat(ancillas))
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitKind::Unencoded(q) => write!(f, "unencoded_{}q", q),
            CircuitKind::Encoded { variant, syndrome } => {
                write!(f, "encoded_{}", variant)?;
                if *syndrome {
                    write!(f, "_syndrome")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grover_core::Gate;

    #[test]
    fn test_unencoded_widths() {
        assert_eq!(build_unencoded(MarkedState::S01, QubitCount::Two).num_qubits(), 2);
        assert_eq!(build_unencoded(MarkedState::S01, QubitCount::Four).num_qubits(), 4);
    }

    #[test]
    fn test_unencoded_starts_with_superposition() {
        let circuit = build_unencoded(MarkedState::S10, QubitCount::Four);
        assert_eq!(
            circuit.gates()[..4].to_vec(),
            vec![Gate::H(0), Gate::H(1), Gate::H(2), Gate::H(3)]
        );
    }

    #[test]
    fn test_encoded_syndrome_adds_two_registers() {
        let plain = build_encoded(MarkedState::S11, EncodingVariant::Star, false);
        let checked = build_encoded(MarkedState::S11, EncodingVariant::Star, true);

        assert_eq!(plain.num_qubits(), 4);
        assert_eq!(plain.registers().len(), 1);
        assert_eq!(checked.num_qubits(), 6);
        assert_eq!(checked.registers().len(), 3);
        assert!(checked.registers()[1..].iter().all(|r| r.size == 1));
    }

    #[test]
    fn test_encoded_ends_with_decode() {
        let circuit = build_encoded(MarkedState::S01, EncodingVariant::Chain, false);
        let n = circuit.gate_count();
        assert_eq!(circuit.gates()[n - 1], Gate::H(0));
        assert_eq!(circuit.gates()[n - 2], Gate::Cnot(0, 1));
        assert_eq!(circuit.gates()[n - 4], Gate::Cnot(2, 3));
    }

    #[test]
    fn test_measure_in_basis() {
        let circuit = measure_in_basis(CircuitBuilder::new(1), Basis::Y, 0).build();
        assert_eq!(circuit.gates().to_vec(), vec![Gate::Sdg(0), Gate::H(0)]);
    }

    #[test]
    fn test_expected_outcome_lengths() {
        let kinds = [
            CircuitKind::Unencoded(QubitCount::Two),
            CircuitKind::Unencoded(QubitCount::Four),
            CircuitKind::Encoded { variant: EncodingVariant::Star, syndrome: false },
            CircuitKind::Encoded { variant: EncodingVariant::Chain, syndrome: true },
        ];
        for kind in kinds {
            for marked in MarkedState::ALL {
                assert_eq!(kind.expected_outcome(marked).len(), kind.num_qubits());
            }
        }
    }

    #[test]
    fn test_expected_outcome_syndrome_suffix() {
        let kind = CircuitKind::Encoded { variant: EncodingVariant::Star, syndrome: true };
        assert_eq!(kind.expected_outcome(MarkedState::S10), "010100");
    }

    #[test]
    fn test_kind_display() {
        let kind = CircuitKind::Encoded { variant: EncodingVariant::Chain, syndrome: true };
        assert_eq!(kind.to_string(), "encoded_chain_syndrome");
        assert_eq!(CircuitKind::Unencoded(QubitCount::Four).to_string(), "unencoded_4q");
    }
}
