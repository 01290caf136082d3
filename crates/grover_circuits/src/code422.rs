//! [[4,2,2]] error-detecting code
//!
//! Gantree: L2_Circuits → Code422
//!
//! Encoding, decoding, the encoded-space oracle and stabilizer
//! syndrome extraction on four data qubits (0..=3).

use grover_core::{grover, CircuitBuilder, GroverError, MarkedState, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATA: [QubitId; 4] = [0, 1, 2, 3];

/// Encoder wiring
/// Gantree: EncodingVariant // 1 | 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EncodingVariant {
    /// Fan-out from qubit 0: CX(0,1), CX(0,2), CX(0,3)
    #[default]
    Star = 1,
    /// Nearest-neighbour chain: CX(0,1), CX(1,2), CX(2,3)
    Chain = 2,
}

impl EncodingVariant {
    /// CX sequence used after H(0) when encoding
    fn cx_sequence(&self) -> [(QubitId, QubitId); 3] {
        match self {
            EncodingVariant::Star => [(0, 1), (0, 2), (0, 3)],
            EncodingVariant::Chain => [(0, 1), (1, 2), (2, 3)],
        }
    }
}

impl TryFrom<u8> for EncodingVariant {
    type Error = GroverError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(EncodingVariant::Star),
            2 => Ok(EncodingVariant::Chain),
            _ => Err(GroverError::InvalidEncodingVariant(v)),
        }
    }
}

impl fmt::Display for EncodingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingVariant::Star => write!(f, "star"),
            EncodingVariant::Chain => write!(f, "chain"),
        }
    }
}

/// Encode |00⟩ into the code space, followed by a barrier
/// Gantree: encode(b, variant) -> CircuitBuilder // 인코딩
pub fn encode(builder: CircuitBuilder, variant: EncodingVariant) -> CircuitBuilder {
    let mut builder = builder.h(0);
    for (c, t) in variant.cx_sequence() {
        builder = builder.cx(c, t);
    }
    builder.barrier()
}

/// Undo [`encode`]: the CX sequence in reverse, then H(0)
/// Gantree: decode(b, variant) -> CircuitBuilder // 디코딩
pub fn decode(builder: CircuitBuilder, variant: EncodingVariant) -> CircuitBuilder {
    let mut builder = builder;
    for (c, t) in variant.cx_sequence().into_iter().rev() {
        builder = builder.cx(c, t);
    }
    builder.h(0)
}

/// X flips framing the logical phase for `marked`
fn oracle_flips(marked: MarkedState) -> &'static [QubitId] {
    match marked {
        MarkedState::S00 => &[1, 2],
        MarkedState::S01 => &[0, 2],
        MarkedState::S10 => &[0, 1],
        MarkedState::S11 => &[],
    }
}

/// Append the encoded-space oracle for `marked`
/// Gantree: encoded_oracle(b, marked) -> CircuitBuilder // 인코딩 오라클
pub fn encoded_oracle(builder: CircuitBuilder, marked: MarkedState) -> CircuitBuilder {
    let flips = oracle_flips(marked);
    let phase = grover::ENCODED_ORACLE_PHASE;

    if flips.is_empty() {
        return builder.barrier().rz_on(&DATA, phase).barrier();
    }

    builder
        .x_on(flips)
        .barrier()
        .rz_on(&DATA, phase)
        .barrier()
        .x_on(flips)
        .barrier()
}

/// Append the encoded amplitude inversion
/// Gantree: inversion(b) -> CircuitBuilder // 진폭 반전
pub fn inversion(builder: CircuitBuilder) -> CircuitBuilder {
    let builder = builder.h_on(&DATA).barrier();
    encoded_oracle(builder, MarkedState::S00)
        .h_on(&DATA)
        .barrier()
}

/// Append one-qubit registers `ancilla_x` and `ancilla_z` and extract the
/// ZZZZ and XXXX stabilizer parities into them
/// Gantree: add_syndrome_422(b) -> CircuitBuilder // 신드롬 추출
pub fn add_syndrome_422(builder: CircuitBuilder) -> CircuitBuilder {
    let ancilla_x = builder.num_qubits();
    let ancilla_z = ancilla_x + 1;
    let mut builder = builder
        .register(grover::ANCILLA_X, 1)
        .register(grover::ANCILLA_Z, 1);

    for q in DATA {
        builder = builder.cx(q, ancilla_x);
    }
    builder = builder.barrier();

    for q in DATA {
        builder = builder.h(q).cx(q, ancilla_z).h(q);
    }
    builder.barrier()
}

// ============================================================================
// Tests
// ============================================================================
