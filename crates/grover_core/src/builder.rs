//! Circuit builder for Grover
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for the fixed-size search and code circuits. Gates that
//! do not fit the circuit are dropped; the first such error is kept and
//! reported by [`CircuitBuilder::try_build`].

use crate::circuit::Circuit;
use crate::error::{GroverError, GroverResult};
use crate::gate::Gate;
use crate::types::{Angle, Basis, ClbitId, QubitId};

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    circuit: Circuit,

    /// Gantree: error: Option<GroverError> // 첫 오류
    error: Option<GroverError>,
}

impl CircuitBuilder {
    /// Builder over `num_qubits` qubits in register `q`
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            error: None,
        }
    }

    /// Builder for a named circuit
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
            error: None,
        }
    }

    fn record<T>(&mut self, result: GroverResult<T>) {
        if let Err(e) = result {
            self.error = self.error.take().or(Some(e));
        }
    }

    fn push(mut self, gate: Gate) -> Self {
        let result = self.circuit.add_gate(gate);
        self.record(result);
        self
    }

    fn push_each(self, qubits: &[QubitId], gate: impl Fn(QubitId) -> Gate) -> Self {
        qubits.iter().fold(self, |b, &q| b.push(gate(q)))
    }

    fn all_qubits(&self) -> Vec<QubitId> {
        (0..self.circuit.num_qubits()).collect()
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Hadamard
    /// Gantree: h(self, q) -> Self // H 추가
    pub fn h(self, qubit: QubitId) -> Self {
        self.push(Gate::H(qubit))
    }

    /// Pauli-X
    pub fn x(self, qubit: QubitId) -> Self {
        self.push(Gate::X(qubit))
    }

    /// Pauli-Y
    pub fn y(self, qubit: QubitId) -> Self {
        self.push(Gate::Y(qubit))
    }

    /// Pauli-Z
    pub fn z(self, qubit: QubitId) -> Self {
        self.push(Gate::Z(qubit))
    }

    /// Phase gate S
    pub fn s(self, qubit: QubitId) -> Self {
        self.push(Gate::S(qubit))
    }

    /// S†
    pub fn sdg(self, qubit: QubitId) -> Self {
        self.push(Gate::Sdg(qubit))
    }

    /// X rotation
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Rx(qubit, angle))
    }

    /// Y rotation
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Ry(qubit, angle))
    }

    /// Z rotation
    /// Gantree: rz(self, q, a) -> Self // Rz 추가
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Rz(qubit, angle))
    }

    /// Phased RX, the IQM native single-qubit gate
    pub fn prx(self, qubit: QubitId, theta: Angle, phi: Angle) -> Self {
        self.push(Gate::Prx(qubit, theta, phi))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Controlled-X
    /// Gantree: cx(self, c, t) -> Self // CX 추가
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cnot(control, target))
    }

    /// Controlled-Z
    /// Gantree: cz(self, a, b) -> Self // CZ 추가
    pub fn cz(self, a: QubitId, b: QubitId) -> Self {
        self.push(Gate::Cz(a, b))
    }

    /// SWAP
    pub fn swap(self, a: QubitId, b: QubitId) -> Self {
        self.push(Gate::Swap(a, b))
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// H on each listed qubit
    pub fn h_on(self, qubits: &[QubitId]) -> Self {
        self.push_each(qubits, Gate::H)
    }

    /// X on each listed qubit
    pub fn x_on(self, qubits: &[QubitId]) -> Self {
        self.push_each(qubits, Gate::X)
    }

    /// Rz(angle) on each listed qubit
    pub fn rz_on(self, qubits: &[QubitId], angle: Angle) -> Self {
        self.push_each(qubits, |q| Gate::Rz(q, angle))
    }

    /// H on every qubit
    pub fn h_layer(self) -> Self {
        let all = self.all_qubits();
        self.h_on(&all)
    }

    /// Rotate `qubit` so a Z measurement reads out `basis`
    /// Gantree: apply_basis(self, q, basis) -> Self // 기저 변환
    pub fn apply_basis(self, qubit: QubitId, basis: Basis) -> Self {
        Gate::basis_transform(qubit, basis)
            .into_iter()
            .fold(self, |b, gate| b.push(gate))
    }

    // ========================================================================
    // Registers, Measurement and Barriers
    // ========================================================================

    /// Append a named quantum register
    /// Gantree: register(self, name, size) -> Self // 보조 레지스터
    pub fn register(mut self, name: &str, size: usize) -> Self {
        let result = self.circuit.add_register(name, size);
        self.record(result);
        self
    }

    /// Append a named classical register
    pub fn classical_register(mut self, name: &str, size: usize) -> Self {
        let result = self.circuit.add_classical_register(name, size);
        self.record(result);
        self
    }

    /// Measure `qubit` into `clbit`
    pub fn measure(self, qubit: QubitId, clbit: ClbitId) -> Self {
        self.push(Gate::Measure(qubit, clbit))
    }

    /// Barrier, then every qubit into a new `meas` register
    /// Gantree: measure_all(self) -> Self // 전체 측정
    pub fn measure_all(mut self) -> Self {
        let result = self.circuit.measure_all();
        self.record(result);
        self
    }

    /// Barrier over every current qubit
    /// Gantree: barrier(self) -> Self // 배리어
    pub fn barrier(self) -> Self {
        let all = self.all_qubits();
        self.push(Gate::Barrier(all))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finish, ignoring any dropped gates
    /// Gantree: build(self) -> Circuit // 빌드
    pub fn build(self) -> Circuit {
        self.circuit
    }

    /// Finish, failing on the first dropped gate or an empty circuit
    pub fn try_build(self) -> GroverResult<Circuit> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.circuit.is_empty() {
            return Err(GroverError::EmptyCircuit);
        }
        Ok(self.circuit)
    }

    /// Current width
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_with_measurement() {
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).measure_all().build();

        assert_eq!(circuit.num_qubits(), 2);
        // H, CX, barrier, 2 measurements
        assert_eq!(circuit.gate_count(), 5);
    }

    #[test]
    fn test_layers() {
        let circuit = CircuitBuilder::new(4)
            .h_layer()
            .x_on(&[1, 2])
            .rz_on(&[0, 1, 2, 3], 0.5)
            .build();

        assert_eq!(circuit.count_named("h"), 4);
        assert_eq!(circuit.count_named("x"), 2);
        assert_eq!(circuit.count_named("rz"), 4);
    }

    #[test]
    fn test_ancilla_register_widens_circuit() {
        let builder = CircuitBuilder::new(4).register("ancilla_x", 1);
        assert_eq!(builder.num_qubits(), 5);

        let circuit = builder.cx(0, 4).barrier().build();
        assert_eq!(circuit.count_2q(), 1);
        assert_eq!(circuit.gates().last(), Some(&Gate::Barrier(vec![0, 1, 2, 3, 4])));
    }

    #[test]
    fn test_out_of_range_gate_is_dropped_and_reported() {
        let circuit = CircuitBuilder::new(2).h(7).x(1).build();
        assert_eq!(circuit.gate_count(), 1);

        let result = CircuitBuilder::new(2).h(7).x(1).cz(0, 5).try_build();
        assert!(matches!(result, Err(GroverError::GateQubitMismatch { qubit: 7, .. })));
    }

    #[test]
    fn test_basis_transform() {
        let circuit = CircuitBuilder::new(3)
            .apply_basis(0, Basis::X)
            .apply_basis(1, Basis::Y)
            .apply_basis(2, Basis::Z)
            .build();

        // X: H, Y: Sdg + H, Z: none
        assert_eq!(circuit.gate_count(), 3);
        assert_eq!(circuit.gates()[1], Gate::Sdg(1));
    }

    #[test]
    fn test_try_build_empty() {
        assert!(matches!(CircuitBuilder::new(2).try_build(), Err(GroverError::EmptyCircuit)));
        assert!(CircuitBuilder::new(1).x(0).try_build().is_ok());
    }
}
