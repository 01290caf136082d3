//! Native gate synthesis
//!
//! Gantree: L3_Backend → Synthesis
//!
//! Rewrites a routed circuit into a device basis. When `prx` is native,
//! every single-qubit gate is absorbed into a `prx` plus a virtual Z frame.
//! Z rotations commute with CZ and with measurement, so the frame is never
//! emitted.

use grover_core::{gate::matmul2, Angle, Gate, GroverError, GroverResult, Matrix2, QubitId};
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const EPS: f64 = 1e-9;

/// True when `basis` is empty (anything goes) or names `gate`
pub(crate) fn basis_supports(basis: &[String], gate: &str) -> bool {
    basis.is_empty() || basis.iter().any(|g| g == gate)
}

/// Wrap into [-π, π)
pub(crate) fn normalize_angle(angle: Angle) -> Angle {
    (angle + PI).rem_euclid(TAU) - PI
}

// ============================================================================
// Two-Qubit Expansion
// ============================================================================

/// Expand CX, CZ and SWAP until every two-qubit gate is native
/// Gantree: expand_two_qubit(gates, basis) -> Result<Vec<Gate>> // 2Q 분해
pub fn expand_two_qubit(gates: &[Gate], basis: &[String]) -> GroverResult<Vec<Gate>> {
    let mut out = Vec::with_capacity(gates.len());
    for gate in gates {
        expand_gate(gate, basis, &mut out)?;
    }
    Ok(out)
}

fn expand_gate(gate: &Gate, basis: &[String], out: &mut Vec<Gate>) -> GroverResult<()> {
    match *gate {
        Gate::Cnot(c, t) if !basis_supports(basis, "cx") => {
            if !basis_supports(basis, "cz") {
                return Err(GroverError::UnsupportedGate("cx".to_string()));
            }
            out.extend([Gate::H(t), Gate::Cz(c, t), Gate::H(t)]);
        }
        Gate::Cz(a, b) if !basis_supports(basis, "cz") => {
            if !basis_supports(basis, "cx") {
                return Err(GroverError::UnsupportedGate("cz".to_string()));
            }
            out.extend([Gate::H(b), Gate::Cnot(a, b), Gate::H(b)]);
        }
        Gate::Swap(a, b) if !basis_supports(basis, "swap") => {
            for cx in [Gate::Cnot(a, b), Gate::Cnot(b, a), Gate::Cnot(a, b)] {
                expand_gate(&cx, basis, out)?;
            }
        }
        _ => out.push(gate.clone()),
    }
    Ok(())
}

// ============================================================================
// Euler Decomposition
// ============================================================================

/// Rz matrix
pub(crate) fn rz_matrix(angle: Angle) -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    [
        [Complex64::from_polar(1.0, -angle / 2.0), zero],
        [zero, Complex64::from_polar(1.0, angle / 2.0)],
    ]
}

/// ZYZ angles `(a, b, c)` with `u ≅ Rz(a)·Ry(b)·Rz(c)` up to global phase
/// Gantree: zyz_angles(u) -> (a, b, c) // 오일러 분해
pub fn zyz_angles(u: &Matrix2) -> (Angle, Angle, Angle) {
    let det = u[0][0] * u[1][1] - u[0][1] * u[1][0];
    let scale = det.sqrt();
    let w00 = u[0][0] / scale;
    let w10 = u[1][0] / scale;
    let w11 = u[1][1] / scale;

    let b = 2.0 * w10.norm().atan2(w00.norm());
    let sum = 2.0 * w11.arg();
    let diff = 2.0 * w10.arg();

    if w10.norm() < EPS {
        (sum, 0.0, 0.0)
    } else if w11.norm() < EPS {
        (diff, b, 0.0)
    } else {
        ((sum + diff) / 2.0, b, (sum - diff) / 2.0)
    }
}

// ============================================================================
// Virtual-Z Frame Synthesis
// ============================================================================

/// Per-qubit frame state while emitting `prx` + CZ
/// Gantree: FrameSynth // 가상 Z 프레임
struct FrameSynth {
    /// Pending Rz per qubit: ideal = Rz(frame) · emitted
    frames: Vec<Angle>,
    /// Fused, not yet emitted single-qubit unitaries
    pending: Vec<Option<Matrix2>>,
    fuse: bool,
    out: Vec<Gate>,
}

impl FrameSynth {
    fn new(num_qubits: usize, fuse: bool) -> Self {
        Self {
            frames: vec![0.0; num_qubits],
            pending: vec![None; num_qubits],
            fuse,
            out: Vec::new(),
        }
    }

    fn push_1q(&mut self, q: QubitId, m: Matrix2) {
        if !self.fuse {
            self.emit(q, &m);
            return;
        }
        self.pending[q] = Some(match self.pending[q].take() {
            Some(prev) => matmul2(&m, &prev),
            None => m,
        });
    }

    fn flush(&mut self, q: QubitId) {
        if let Some(m) = self.pending[q].take() {
            self.emit(q, &m);
        }
    }

    fn flush_all(&mut self) {
        for q in 0..self.pending.len() {
            self.flush(q);
        }
    }

    /// Emit `u` after the current frame, leaving the residual Z in the frame
    fn emit(&mut self, q: QubitId, u: &Matrix2) {
        let v = matmul2(u, &rz_matrix(self.frames[q]));
        let (a, b, c) = zyz_angles(&v);
        if b.abs() > EPS {
            self.out.push(Gate::Prx(q, b, normalize_angle(FRAC_PI_2 - c)));
        }
        self.frames[q] = normalize_angle(a + c);
    }

    /// Apply the frame physically so a non-commuting gate sees the true state
    fn settle(&mut self, q: QubitId) {
        let zeta = normalize_angle(self.frames[q]);
        if zeta.abs() > EPS {
            self.out.push(Gate::Prx(q, PI, 0.0));
            self.out.push(Gate::Prx(q, PI, zeta / 2.0));
        }
        self.frames[q] = 0.0;
    }
}

/// Rewrite single-qubit gates into `prx` with virtual Z frames
/// Gantree: synthesize_prx(gates, n, fuse) -> Vec<Gate> // PRX 합성
pub fn synthesize_prx(gates: &[Gate], num_qubits: usize, fuse: bool) -> Vec<Gate> {
    let mut synth = FrameSynth::new(num_qubits, fuse);

    for gate in gates {
        match gate {
            Gate::Cz(a, b) => {
                synth.flush(*a);
                synth.flush(*b);
                synth.out.push(gate.clone());
            }
            Gate::Cnot(a, b) | Gate::Swap(a, b) => {
                for q in [*a, *b] {
                    synth.flush(q);
                    synth.settle(q);
                }
                synth.out.push(gate.clone());
            }
            Gate::Measure(q, _) => {
                synth.flush(*q);
                synth.out.push(gate.clone());
            }
            Gate::Barrier(qs) => {
                if qs.is_empty() {
                    synth.flush_all();
                } else {
                    for &q in qs {
                        synth.flush(q);
                    }
                }
                synth.out.push(gate.clone());
            }
            _ => {
                if let (Some(m), Some(&q)) = (gate.matrix(), gate.qubits().first()) {
                    synth.push_1q(q, m);
                }
            }
        }
    }

    synth.flush_all();
    synth.out
}

// ============================================================================
// Peephole Cancellation
// ============================================================================

fn cancels(prev: &Gate, next: &Gate) -> bool {
    match (prev, next) {
        (Gate::Cz(a, b), Gate::Cz(c, d)) => (a == c && b == d) || (a == d && b == c),
        (Gate::Cnot(a, b), Gate::Cnot(c, d)) => a == c && b == d,
        _ => false,
    }
}

/// Drop adjacent self-inverse CZ/CX pairs; barriers block cancellation
/// Gantree: cancel_pairs(gates, n) -> Vec<Gate> // 상쇄
pub fn cancel_pairs(gates: &[Gate], num_qubits: usize) -> Vec<Gate> {
    let mut out: Vec<Option<Gate>> = Vec::with_capacity(gates.len());
    let mut last_on: Vec<Option<usize>> = vec![None; num_qubits];

    for gate in gates {
        let qubits = match gate {
            Gate::Barrier(qs) if qs.is_empty() => (0..num_qubits).collect(),
            _ => gate.qubits(),
        };

        if let [a, b] = qubits.as_slice() {
            if let (Some(i), Some(j)) = (last_on[*a], last_on[*b]) {
                let hit = i == j && out[i].as_ref().map_or(false, |prev| cancels(prev, gate));
                if hit {
                    out[i] = None;
                    last_on[*a] = None;
                    last_on[*b] = None;
                    continue;
                }
            }
        }

        let index = out.len();
        out.push(Some(gate.clone()));
        for q in qubits {
            last_on[q] = Some(index);
        }
    }

    out.into_iter().flatten().collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grover_core::gate::identity2;

    /// `x ≅ y` up to global phase
    fn assert_equiv(x: &Matrix2, y: &Matrix2) {
        let (r, c) = if x[0][0].norm() > 0.1 { (0, 0) } else { (1, 0) };
        let phase = y[r][c] / x[r][c];
        for i in 0..2 {
            for j in 0..2 {
                let d = x[i][j] * phase - y[i][j];
                assert!(d.norm() < 1e-9, "mismatch at ({}, {}): {:?} vs {:?}", i, j, x, y);
            }
        }
    }

    fn sample_gates() -> Vec<Gate> {
        vec![
            Gate::H(0),
            Gate::X(0),
            Gate::Y(0),
            Gate::Z(0),
            Gate::S(0),
            Gate::Sdg(0),
            Gate::Rx(0, 0.3),
            Gate::Ry(0, -1.1),
            Gate::Rz(0, 2.2),
            Gate::Prx(0, 0.7, 0.4),
        ]
    }

    #[test]
    fn test_zyz_reconstructs() {
        for gate in sample_gates() {
            let u = gate.matrix().unwrap();
            let (a, b, c) = zyz_angles(&u);
            let rebuilt = matmul2(
                &rz_matrix(a),
                &matmul2(&Gate::Ry(0, b).matrix().unwrap(), &rz_matrix(c)),
            );
            assert_equiv(&rebuilt, &u);
        }
    }

    #[test]
    fn test_emit_preserves_unitary_with_frame() {
        for gate in sample_gates() {
            let u = gate.matrix().unwrap();
            let mut synth = FrameSynth::new(1, false);
            synth.frames[0] = 0.9;

            synth.emit(0, &u);

            let emitted = synth
                .out
                .iter()
                .fold(identity2(), |acc, g| matmul2(&g.matrix().unwrap(), &acc));
            let lhs = matmul2(&rz_matrix(synth.frames[0]), &emitted);
            let rhs = matmul2(&u, &rz_matrix(0.9));
            assert_equiv(&lhs, &rhs);
        }
    }

    #[test]
    fn test_settle_applies_frame() {
        let mut synth = FrameSynth::new(1, false);
        synth.frames[0] = 1.3;
        synth.settle(0);

        assert_eq!(synth.out.len(), 2);
        let m = matmul2(&synth.out[1].matrix().unwrap(), &synth.out[0].matrix().unwrap());
        assert_equiv(&m, &rz_matrix(1.3));
        assert_relative_eq!(synth.frames[0], 0.0);
    }

    #[test]
    fn test_rz_is_virtual() {
        let out = synthesize_prx(&[Gate::Rz(0, 0.5), Gate::Z(0)], 1, true);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fusion_merges_runs() {
        let gates = vec![Gate::H(0), Gate::X(0), Gate::Ry(0, 0.4), Gate::Cz(0, 1)];
        let fused = synthesize_prx(&gates, 2, true);
        let unfused = synthesize_prx(&gates, 2, false);

        assert_eq!(fused.iter().filter(|g| g.name() == "prx").count(), 1);
        assert_eq!(unfused.iter().filter(|g| g.name() == "prx").count(), 3);
    }

    #[test]
    fn test_h_squared_vanishes_when_fused() {
        let out = synthesize_prx(&[Gate::H(0), Gate::H(0)], 1, true);
        assert!(out.is_empty());
    }

    #[test]
    fn test_expand_cx_into_cz() {
        let basis: Vec<String> = ["prx", "cz"].iter().map(|s| s.to_string()).collect();
        let out = expand_two_qubit(&[Gate::Cnot(0, 1)], &basis).unwrap();
        assert_eq!(out, vec![Gate::H(1), Gate::Cz(0, 1), Gate::H(1)]);
    }

    #[test]
    fn test_expand_swap() {
        let basis: Vec<String> = ["prx", "cz"].iter().map(|s| s.to_string()).collect();
        let out = expand_two_qubit(&[Gate::Swap(0, 1)], &basis).unwrap();
        assert_eq!(out.iter().filter(|g| g.name() == "cz").count(), 3);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_expand_without_entangler_fails() {
        let basis: Vec<String> = vec!["prx".to_string()];
        assert!(matches!(
            expand_two_qubit(&[Gate::Cz(0, 1)], &basis),
            Err(GroverError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_cancel_pairs() {
        let gates = vec![Gate::Cz(0, 1), Gate::Cz(1, 0), Gate::H(2)];
        assert_eq!(cancel_pairs(&gates, 3), vec![Gate::H(2)]);
    }

    #[test]
    fn test_barrier_blocks_cancel() {
        let gates = vec![Gate::Cnot(0, 1), Gate::Barrier(vec![]), Gate::Cnot(0, 1)];
        assert_eq!(cancel_pairs(&gates, 2).len(), 3);
    }

    #[test]
    fn test_cx_direction_matters() {
        let gates = vec![Gate::Cnot(0, 1), Gate::Cnot(1, 0)];
        assert_eq!(cancel_pairs(&gates, 2).len(), 2);
    }

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(3.0 * PI), -PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(0.5), 0.5, epsilon = 1e-12);
    }
}
