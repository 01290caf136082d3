//! Quantum circuit structure for Grover
//!
//! Gantree: L1_Circuit → Circuit
//!
//! Append-only gate list. Qubits and classical bits are laid out as
//! consecutive named registers: the search register `q` first, then any
//! syndrome ancillas, with measurement bits in their own register.

use crate::error::{GroverError, GroverResult};
use crate::gate::Gate;
use crate::types::{ClbitId, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::ops::Range;

/// Named contiguous block of qubits or classical bits
/// Gantree: Register // 레지스터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name, e.g. `q`, `ancilla_x` or `meas`
    pub name: String,
    /// First index covered
    pub start: usize,
    /// Width
    pub size: usize,
}

impl Register {
    fn after(previous: &[Register], name: String, size: usize) -> GroverResult<Self> {
        if size == 0 {
            return Err(GroverError::EmptyRegister(name));
        }
        let start = previous.last().map_or(0, |r| r.start + r.size);
        Ok(Self { name, start, size })
    }

    /// Indices covered by this register
    pub fn indices(&self) -> Range<usize> {
        self.start..self.start + self.size
    }
}

fn width(registers: &[Register]) -> usize {
    registers.last().map_or(0, |r| r.start + r.size)
}

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Gantree: qubits: Vec<Register> // 양자 레지스터
    qubits: Vec<Register>,

    /// Gantree: clbits: Vec<Register> // 고전 레지스터
    clbits: Vec<Register>,

    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,

    name: Option<String>,
}

impl Circuit {
    /// Empty circuit with the search register `q`
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        let qubits = Register::after(&[], "q".to_string(), num_qubits)
            .map(|r| vec![r])
            .unwrap_or_default();
        Self {
            qubits,
            clbits: Vec::new(),
            gates: Vec::new(),
            name: None,
        }
    }

    /// Empty named circuit
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(num_qubits)
        }
    }

    // ========================================================================
    // Registers
    // ========================================================================

    /// Append a quantum register, returning its first qubit
    /// Gantree: add_register(name, size) -> Result<QubitId> // 레지스터 추가
    pub fn add_register(&mut self, name: impl Into<String>, size: usize) -> GroverResult<QubitId> {
        let register = Register::after(&self.qubits, name.into(), size)?;
        let start = register.start;
        self.qubits.push(register);
        Ok(start)
    }

    /// Append a classical register, returning its first bit
    pub fn add_classical_register(&mut self, name: impl Into<String>, size: usize) -> GroverResult<ClbitId> {
        let register = Register::after(&self.clbits, name.into(), size)?;
        let start = register.start;
        self.clbits.push(register);
        Ok(start)
    }

    /// Quantum registers in qubit order
    pub fn registers(&self) -> &[Register] {
        &self.qubits
    }

    /// Classical registers in bit order
    pub fn classical_registers(&self) -> &[Register] {
        &self.clbits
    }

    /// Quantum register by name
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.qubits.iter().find(|r| r.name == name)
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Append a gate; every operand must already exist
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> GroverResult<()> {
        let num_qubits = self.num_qubits();
        if let Some(qubit) = gate.qubits().into_iter().find(|&q| q >= num_qubits) {
            return Err(GroverError::GateQubitMismatch { qubit, num_qubits });
        }
        match gate {
            Gate::Measure(_, clbit) if clbit >= self.num_clbits() => Err(GroverError::ClbitOutOfRange {
                clbit,
                num_clbits: self.num_clbits(),
            }),
            _ => {
                self.gates.push(gate);
                Ok(())
            }
        }
    }

    /// Append gates in order, stopping at the first rejected one
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> GroverResult<()> {
        gates.into_iter().try_for_each(|gate| self.add_gate(gate))
    }

    /// Barrier, then qubit `i` into bit `i` of a new `meas` register
    /// Gantree: measure_all(&mut) -> Result // 전체 측정
    pub fn measure_all(&mut self) -> GroverResult<()> {
        let n = self.num_qubits();
        let first = self.add_classical_register("meas", n)?;
        self.add_gate(Gate::Barrier((0..n).collect()))?;
        self.add_gates((0..n).map(|q| Gate::Measure(q, first + q)))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Total qubits over all registers
    pub fn num_qubits(&self) -> usize {
        width(&self.qubits)
    }

    /// Total classical bits over all registers
    pub fn num_clbits(&self) -> usize {
        width(&self.clbits)
    }

    /// Gate sequence
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when no gate has been added
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Layers of non-barrier gates on the longest qubit timeline
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits()];
        for gate in self.gates.iter().filter(|g| !g.is_barrier()) {
            let qubits = gate.qubits();
            let next = qubits.iter().map(|&q| layer[q]).max().unwrap_or(0) + 1;
            for q in qubits {
                layer[q] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Number of gates, barriers and measurements included
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Number of measurements
    pub fn count_measurements(&self) -> usize {
        self.gates.iter().filter(|g| g.is_measurement()).count()
    }

    /// Number of gates called `name`
    pub fn count_named(&self, name: &str) -> usize {
        self.gates.iter().filter(|g| g.name() == name).count()
    }

    /// Operand pairs of every two-qubit gate, in order
    pub fn two_qubit_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.gates
            .iter()
            .filter(|g| g.is_two_qubit())
            .filter_map(|g| match g.qubits()[..] {
                [a, b] => Some((a, b)),
                _ => None,
            })
            .collect()
    }

    /// Whether every measurement comes after the last unitary on its qubit
    pub fn has_terminal_measurements(&self) -> bool {
        let mut measured = vec![false; self.num_qubits()];
        self.gates.iter().all(|gate| match gate {
            Gate::Measure(q, _) => {
                measured[*q] = true;
                true
            }
            Gate::Barrier(_) => true,
            _ => gate.qubits().iter().all(|&q| !measured[q]),
        })
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// OpenQASM 2.0 with one `qreg`/`creg` per register
    /// Gantree: to_qasm(&self) -> String // QASM2 출력
    pub fn to_qasm(&self) -> String {
        let mut out = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
        for reg in &self.qubits {
            let _ = writeln!(out, "qreg {}[{}];", reg.name, reg.size);
        }
        for reg in &self.clbits {
            let _ = writeln!(out, "creg {}[{}];", reg.name, reg.size);
        }
        for gate in &self.gates {
            let _ = writeln!(out, "{}", self.qasm_operands(gate));
        }
        out
    }

    /// Rewrite the flat `q[i]`/`c[j]` operands of a gate into register-local names
    fn qasm_operands(&self, gate: &Gate) -> String {
        let flat = gate.to_qasm();
        let (head, _) = flat.split_once(' ').unwrap_or((flat.as_str(), ""));
        let mut qubits = gate.qubits().into_iter().map(|q| local(&self.qubits, q));

        match gate {
            Gate::Measure(_, c) => format!(
                "measure {} -> {};",
                qubits.next().unwrap_or_default(),
                local(&self.clbits, *c)
            ),
            Gate::Barrier(qs) if qs.is_empty() => flat,
            _ => format!("{} {};", head, qubits.collect::<Vec<_>>().join(",")),
        }
    }
}

fn local(registers: &[Register], index: usize) -> String {
    registers
        .iter()
        .find(|r| r.indices().contains(&index))
        .map_or_else(|| format!("q[{}]", index), |r| format!("{}[{}]", r.name, index - r.start))
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regs: Vec<String> = self
            .qubits
            .iter()
            .chain(&self.clbits)
            .map(|r| format!("{}[{}]", r.name, r.size))
            .collect();
        write!(
            f,
            "{} ({}; {} gates, {} two-qubit, depth {})",
            self.name().unwrap_or("circuit"),
            regs.join(" "),
            self.gate_count(),
            self.count_2q(),
            self.depth()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_search_register() {
        let circuit = Circuit::new(4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.registers()[0].name, "q");
        assert!(circuit.is_empty());
        assert!(Circuit::new(0).registers().is_empty());
    }

    #[test]
    fn test_operands_are_checked() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::Cnot(0, 2)).unwrap();

        assert!(matches!(
            circuit.add_gate(Gate::H(5)),
            Err(GroverError::GateQubitMismatch { qubit: 5, num_qubits: 3 })
        ));
        assert!(matches!(
            circuit.add_gate(Gate::Measure(0, 0)),
            Err(GroverError::ClbitOutOfRange { .. })
        ));
        assert_eq!(circuit.gate_count(), 1);
    }

    #[test]
    fn test_ancilla_registers_follow_search_register() {
        let mut circuit = Circuit::new(4);
        assert_eq!(circuit.add_register("ancilla_x", 1).unwrap(), 4);
        assert_eq!(circuit.add_register("ancilla_z", 1).unwrap(), 5);

        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.register("ancilla_z").unwrap().indices(), 5..6);
        assert!(matches!(circuit.add_register("none", 0), Err(GroverError::EmptyRegister(_))));
    }

    #[test]
    fn test_measure_all() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.measure_all().unwrap();

        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.count_measurements(), 3);
        assert_eq!(circuit.classical_registers()[0].name, "meas");
        assert!(circuit.gates()[1].is_barrier());
        assert_eq!(circuit.gates()[4], Gate::Measure(2, 2));
        assert!(circuit.has_terminal_measurements());
    }

    #[test]
    fn test_gate_after_measurement_detected() {
        let mut circuit = Circuit::new(1);
        circuit.measure_all().unwrap();
        circuit.add_gate(Gate::X(0)).unwrap();
        assert!(!circuit.has_terminal_measurements());
    }

    #[test]
    fn test_depth_skips_barriers() {
        let mut circuit = Circuit::new(3);
        circuit
            .add_gates([Gate::H(0), Gate::H(1), Gate::Barrier(vec![0, 1, 2]), Gate::Cnot(0, 1), Gate::H(2)])
            .unwrap();

        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.two_qubit_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_to_qasm_uses_register_names() {
        let mut circuit = Circuit::new(2);
        circuit.add_register("ancilla_x", 1).unwrap();
        circuit.add_gates([Gate::H(0), Gate::Cnot(1, 2)]).unwrap();
        circuit.measure_all().unwrap();

        let qasm = circuit.to_qasm();
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("qreg ancilla_x[1];"));
        assert!(qasm.contains("creg meas[3];"));
        assert!(qasm.contains("cx q[1],ancilla_x[0];"));
        assert!(qasm.contains("measure ancilla_x[0] -> meas[2];"));
    }
}
