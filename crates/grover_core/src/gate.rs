//! Quantum gate definitions for Grover
//!
//! Gantree: L1_Circuit → Gate
//!
//! Gates used by the search and [[4,2,2]] circuits, plus the IQM native
//! phased-RX that synthesis lowers every single-qubit gate into.

use crate::types::{Angle, Basis, ClbitId, QubitId};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// Single-qubit unitary as a row-major 2x2 matrix
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Quantum gate
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),
    /// Pauli-X
    X(QubitId),
    /// Pauli-Y
    Y(QubitId),
    /// Pauli-Z
    Z(QubitId),
    /// Quarter turn about Z
    S(QubitId),
    /// Inverse of S
    Sdg(QubitId),
    /// X rotation
    Rx(QubitId, Angle),
    /// Y rotation
    Ry(QubitId, Angle),
    /// Z rotation
    /// Gantree: Rz(QubitId, Angle) // Z 회전
    Rz(QubitId, Angle),
    /// Rotation by θ about the equatorial axis at azimuth φ
    /// Gantree: Prx(QubitId, Angle, Angle) // IQM 네이티브
    Prx(QubitId, Angle, Angle),

    /// Controlled-X, control first
    /// Gantree: Cnot(QubitId, QubitId) // 제어, 대상
    Cnot(QubitId, QubitId),
    /// Controlled-Z, the Helmi native entangler
    /// Gantree: Cz(QubitId, QubitId) // 제어-Z
    Cz(QubitId, QubitId),
    /// Exchange two qubits
    Swap(QubitId, QubitId),

    /// Read a qubit into a classical bit
    /// Gantree: Measure(QubitId, ClbitId) // 측정
    Measure(QubitId, ClbitId),
    /// Scheduling fence; empty means every qubit
    Barrier(Vec<QubitId>),
}

impl Gate {
    /// Target of a single-qubit gate or measurement
    fn single(&self) -> Option<QubitId> {
        match *self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::Prx(q, _, _)
            | Gate::Measure(q, _) => Some(q),
            _ => None,
        }
    }

    /// Operands of a two-qubit gate
    fn pair(&self) -> Option<(QubitId, QubitId)> {
        match *self {
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => Some((a, b)),
            _ => None,
        }
    }

    /// Rotation angles in QASM argument order
    fn params(&self) -> Vec<Angle> {
        match *self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) => vec![a],
            Gate::Prx(_, theta, phi) => vec![theta, phi],
            _ => Vec::new(),
        }
    }

    /// Qubits the gate acts on, in operand order
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match (self.single(), self.pair(), self) {
            (Some(q), _, _) => vec![q],
            (_, Some((a, b)), _) => vec![a, b],
            (_, _, Gate::Barrier(qs)) => qs.clone(),
            _ => Vec::new(),
        }
    }

    /// Single-qubit unitary (measurements excluded)
    /// Gantree: is_single_qubit(&self) -> bool // 1Q 판별
    pub fn is_single_qubit(&self) -> bool {
        self.single().is_some() && !self.is_measurement()
    }

    /// Two-qubit gate
    /// Gantree: is_two_qubit(&self) -> bool // 2Q 판별
    pub fn is_two_qubit(&self) -> bool {
        self.pair().is_some()
    }

    /// Measurement
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(..))
    }

    /// Barrier
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Lower-case OpenQASM name, as listed in backend basis sets
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::Rx(..) => "rx",
            Gate::Ry(..) => "ry",
            Gate::Rz(..) => "rz",
            Gate::Prx(..) => "prx",
            Gate::Cnot(..) => "cx",
            Gate::Cz(..) => "cz",
            Gate::Swap(..) => "swap",
            Gate::Measure(..) => "measure",
            Gate::Barrier(_) => "barrier",
        }
    }

    /// Matrix of a single-qubit unitary
    /// Gantree: matrix(&self) -> Option<Matrix2> // 2x2 행렬
    pub fn matrix(&self) -> Option<Matrix2> {
        let half_turn = |theta: Angle| ((theta / 2.0).cos(), (theta / 2.0).sin());

        Some(match *self {
            Gate::H(_) => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            Gate::X(_) => [[ZERO, ONE], [ONE, ZERO]],
            Gate::Y(_) => [[ZERO, -I], [I, ZERO]],
            Gate::Z(_) => diagonal(ONE, -ONE),
            Gate::S(_) => diagonal(ONE, I),
            Gate::Sdg(_) => diagonal(ONE, -I),
            Gate::Rz(_, theta) => diagonal(Complex64::from_polar(1.0, -theta / 2.0), Complex64::from_polar(1.0, theta / 2.0)),
            // Rx and Ry are Prx at azimuth 0 and π/2
            Gate::Rx(_, theta) => return Gate::Prx(0, theta, 0.0).matrix(),
            Gate::Ry(_, theta) => {
                let (c, s) = half_turn(theta);
                [[c.into(), (-s).into()], [s.into(), c.into()]]
            }
            Gate::Prx(_, theta, phi) => {
                let (c, s) = half_turn(theta);
                [
                    [c.into(), -I * Complex64::from_polar(s, -phi)],
                    [-I * Complex64::from_polar(s, phi), c.into()],
                ]
            }
            _ => return None,
        })
    }

    /// Same gate with every qubit sent through `map`
    /// Gantree: remap(&self, f) -> Gate // 큐비트 재배치
    pub fn remap(&self, map: impl Fn(QubitId) -> QubitId) -> Gate {
        let mut gate = self.clone();
        match &mut gate {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::Prx(q, _, _)
            | Gate::Measure(q, _) => *q = map(*q),
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => {
                *a = map(*a);
                *b = map(*b);
            }
            Gate::Barrier(qs) => qs.iter_mut().for_each(|q| *q = map(*q)),
        }
        gate
    }

    /// OpenQASM 2.0 statement over flat `q`/`c` registers
    /// Gantree: to_qasm(&self) -> String // QASM 변환
    pub fn to_qasm(&self) -> String {
        let operands: Vec<String> = self.qubits().iter().map(|q| format!("q[{}]", q)).collect();
        match self {
            Gate::Measure(q, c) => format!("measure q[{}] -> c[{}];", q, c),
            Gate::Barrier(qs) if qs.is_empty() => "barrier q;".to_string(),
            _ => {
                let params = self.params();
                let head = if params.is_empty() {
                    self.name().to_string()
                } else {
                    let args: Vec<String> = params.iter().map(Angle::to_string).collect();
                    format!("{}({})", self.name(), args.join(","))
                };
                format!("{} {};", head, operands.join(","))
            }
        }
    }

    /// Rotation taking the eigenbasis of `basis` onto Z
    pub fn basis_transform(qubit: QubitId, basis: Basis) -> Vec<Gate> {
        match basis {
            Basis::X => vec![Gate::H(qubit)],
            Basis::Y => vec![Gate::Sdg(qubit), Gate::H(qubit)],
            Basis::Z => Vec::new(),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_qasm())
    }
}

fn diagonal(a: Complex64, d: Complex64) -> Matrix2 {
    [[a, ZERO], [ZERO, d]]
}

/// Row-major product `a · b`
pub fn matmul2(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let cell = |r: usize, c: usize| a[r][0] * b[0][c] + a[r][1] * b[1][c];
    [[cell(0, 0), cell(0, 1)], [cell(1, 0), cell(1, 1)]]
}

/// 2x2 identity
pub fn identity2() -> Matrix2 {
    diagonal(ONE, ONE)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &Matrix2, b: &Matrix2) {
        for (row_a, row_b) in a.iter().zip(b) {
            for (x, y) in row_a.iter().zip(row_b) {
                assert_relative_eq!(x.re, y.re, epsilon = 1e-10);
                assert_relative_eq!(x.im, y.im, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_operands_and_kind() {
        assert_eq!(Gate::Cz(3, 1).qubits(), vec![3, 1]);
        assert_eq!(Gate::Measure(3, 0).qubits(), vec![3]);
        assert!(Gate::Prx(0, 1.0, 0.0).is_single_qubit());
        assert!(!Gate::Measure(0, 0).is_single_qubit());
        assert!(Gate::Swap(0, 1).is_two_qubit());
        assert!(Gate::Barrier(vec![]).qubits().is_empty());
    }

    #[test]
    fn test_qasm_statements() {
        assert_eq!(Gate::Cnot(0, 1).to_qasm(), "cx q[0],q[1];");
        assert_eq!(Gate::Rz(2, 0.5).to_qasm(), "rz(0.5) q[2];");
        assert_eq!(Gate::Prx(1, 1.5, 0.25).to_string(), "prx(1.5,0.25) q[1];");
        assert_eq!(Gate::Measure(2, 1).to_qasm(), "measure q[2] -> c[1];");
        assert_eq!(Gate::Barrier(vec![0, 2]).to_qasm(), "barrier q[0],q[2];");
    }

    #[test]
    fn test_remap_through_helmi_layout() {
        let layout = [2, 0, 1, 3];
        assert_eq!(Gate::Cz(0, 2).remap(|q| layout[q]), Gate::Cz(2, 1));
        assert_eq!(Gate::Measure(1, 1).remap(|q| layout[q]), Gate::Measure(0, 1));
        assert_eq!(Gate::Barrier(vec![0, 3]).remap(|q| layout[q]), Gate::Barrier(vec![2, 3]));
    }

    #[test]
    fn test_prx_covers_rx_and_ry() {
        let theta = 0.7;
        assert_matrix_eq(&Gate::Prx(0, theta, 0.0).matrix().unwrap(), &Gate::Rx(0, theta).matrix().unwrap());
        assert_matrix_eq(&Gate::Prx(0, theta, PI / 2.0).matrix().unwrap(), &Gate::Ry(0, theta).matrix().unwrap());
    }

    #[test]
    fn test_hzh_is_x_and_s_sdg_cancel() {
        let h = Gate::H(0).matrix().unwrap();
        let z = Gate::Z(0).matrix().unwrap();
        assert_matrix_eq(&matmul2(&h, &matmul2(&z, &h)), &Gate::X(0).matrix().unwrap());

        let s = Gate::S(0).matrix().unwrap();
        let sdg = Gate::Sdg(0).matrix().unwrap();
        assert_matrix_eq(&matmul2(&s, &sdg), &identity2());
    }

    #[test]
    fn test_only_single_qubit_unitaries_have_matrices() {
        assert!(Gate::Cz(0, 1).matrix().is_none());
        assert!(Gate::Measure(0, 0).matrix().is_none());
    }

    #[test]
    fn test_basis_transform() {
        assert_eq!(Gate::basis_transform(0, Basis::Y), vec![Gate::Sdg(0), Gate::H(0)]);
        assert!(Gate::basis_transform(0, Basis::Z).is_empty());
    }
}
