//! Simulator backend for Grover
//!
//! Gantree: L3_Backend → SimulatorBackend
//!
//! Dense state-vector simulator with optional depolarizing and readout
//! noise. Counts keys print the highest classical bit leftmost.

use crate::execution::{check_shots, Backend, ExecutionResult};
use crate::noise::NoiseModel;
use crate::target::Target;
use grover_core::{execution, Circuit, Counts, Gate, GroverError, GroverResult, Matrix2, QubitId};
use num_complex::Complex64;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::time::Instant;

/// Simulator backend with noise model
/// Gantree: SimulatorBackend // 시뮬레이터 구현
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Backend name
    name: String,

    /// Number of qubits
    num_qubits: usize,

    /// Noise model
    noise_model: NoiseModel,

    /// Device the simulator stands in for
    target: Option<Target>,

    /// Random seed
    seed: Option<u64>,
}

impl SimulatorBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new simulator backend
    pub fn new(num_qubits: usize, noise_model: NoiseModel) -> Self {
        Self {
            name: "grover_simulator".to_string(),
            num_qubits,
            noise_model,
            target: None,
            seed: None,
        }
    }

    /// Noiseless, unconstrained simulator
    /// Gantree: ideal(n) -> Self // 이상적 시뮬레이터
    pub fn ideal(num_qubits: usize) -> Self {
        Self::new(num_qubits, NoiseModel::ideal()).with_name(execution::IDEAL_BACKEND_NAME)
    }

    /// Noisy stand-in for the Helmi device: Adonis target plus Helmi error rates
    /// Gantree: fake_adonis() -> Self // 가짜 헬미
    pub fn fake_adonis() -> Self {
        let target = Target::iqm_adonis();
        Self::new(target.num_qubits(), NoiseModel::helmi())
            .with_name(execution::FAKE_HELMI_BACKEND_NAME)
            .with_target(target)
    }

    /// Create from depolarizing error rate
    pub fn from_depol(num_qubits: usize, p_depol: f64) -> GroverResult<Self> {
        let noise_model = NoiseModel::from_depol(p_depol)?;
        Ok(Self::new(num_qubits, noise_model))
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set backend name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Constrain execution to a device target
    pub fn with_target(mut self, target: Target) -> Self {
        self.num_qubits = target.num_qubits();
        self.target = Some(target);
        self
    }

    /// Replace the noise model, rejecting rates outside [0, 1]
    pub fn with_noise(mut self, noise_model: NoiseModel) -> GroverResult<Self> {
        noise_model.validate()?;
        self.noise_model = noise_model;
        Ok(self)
    }

    /// Noise model in use
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Reject circuits the device could not run as given
    fn check_circuit(&self, circuit: &Circuit) -> GroverResult<()> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(GroverError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                max: self.num_qubits.saturating_sub(1),
            });
        }

        if let Some(target) = &self.target {
            target.topology().validate_circuit(circuit)?;
            if let Some(gate) = circuit.gates().iter().find(|g| !target.supports(g.name())) {
                return Err(GroverError::UnsupportedGate(gate.name().to_string()));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Simulate circuit and return counts
    fn simulate(&self, circuit: &Circuit, shots: u64, rng: &mut StdRng) -> Counts {
        if self.noise_model.is_ideal() && circuit.has_terminal_measurements() {
            return self.sample_ideal(circuit, shots, rng);
        }

        let mut counts: Counts = HashMap::new();
        for _ in 0..shots {
            let bitstring = self.simulate_single_shot(circuit, rng);
            *counts.entry(bitstring).or_insert(0) += 1;
        }
        counts
    }

    /// Evolve once, then sample every shot from the final distribution
    fn sample_ideal(&self, circuit: &Circuit, shots: u64, rng: &mut StdRng) -> Counts {
        let n = circuit.num_qubits();
        let mut state = initial_state(n);
        for gate in circuit.gates() {
            apply_unitary(&mut state, gate);
        }

        let mut cumulative = Vec::with_capacity(state.len());
        let mut total = 0.0;
        for amp in &state {
            total += amp.norm_sqr();
            cumulative.push(total);
        }

        let readout = readout_map(circuit);
        let mut counts: Counts = HashMap::new();
        for _ in 0..shots {
            let r = rng.gen::<f64>() * total;
            let outcome = cumulative.partition_point(|&c| c <= r).min(state.len() - 1);
            let bits: Vec<bool> = readout
                .iter()
                .map(|q| q.map_or(false, |q| outcome & (1 << q) != 0))
                .collect();
            *counts.entry(format_clbits(&bits)).or_insert(0) += 1;
        }
        counts
    }

    /// Simulate a single shot with mid-circuit collapse and noise
    fn simulate_single_shot(&self, circuit: &Circuit, rng: &mut StdRng) -> String {
        let n = circuit.num_qubits();
        let mut state = initial_state(n);
        let mut clbits = vec![false; circuit.num_clbits()];

        for gate in circuit.gates() {
            match gate {
                Gate::Measure(q, c) => {
                    let outcome = collapse(&mut state, *q, rng);
                    clbits[*c] = self.flip_readout(outcome, rng);
                }
                Gate::Barrier(_) => {}
                _ => {
                    apply_unitary(&mut state, gate);
                    self.apply_depolarizing(&mut state, gate, rng);
                }
            }
        }

        if circuit.count_measurements() == 0 {
            let bits: Vec<bool> = (0..n)
                .map(|q| {
                    let outcome = collapse(&mut state, q, rng);
                    self.flip_readout(outcome, rng)
                })
                .collect();
            return format_clbits(&bits);
        }

        format_clbits(&clbits)
    }

    /// Random Pauli after a gate with the gate's error probability
    fn apply_depolarizing(&self, state: &mut [Complex64], gate: &Gate, rng: &mut StdRng) {
        let qubits = gate.qubits();
        match qubits.as_slice() {
            [q] => {
                let p = self.noise_model.gate_error_1q();
                if p > 0.0 && rng.gen::<f64>() < p {
                    apply_pauli(state, *q, rng.gen_range(1..4));
                }
            }
            [a, b] => {
                let p = self.noise_model.gate_error_2q();
                if p > 0.0 && rng.gen::<f64>() < p {
                    // one of the 15 non-identity two-qubit Paulis
                    let k = rng.gen_range(1..16);
                    apply_pauli(state, *a, k % 4);
                    apply_pauli(state, *b, k / 4);
                }
            }
            _ => {}
        }
    }

    fn flip_readout(&self, outcome: bool, rng: &mut StdRng) -> bool {
        let p = self.noise_model.readout_error();
        if p > 0.0 && rng.gen::<f64>() < p {
            !outcome
        } else {
            outcome
        }
    }
}

// ============================================================================
// State Vector Kernels
// ============================================================================

fn initial_state(n: usize) -> Vec<Complex64> {
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
    state[0] = Complex64::new(1.0, 0.0);
    state
}

/// Apply a unitary gate; measurements and barriers are ignored
fn apply_unitary(state: &mut [Complex64], gate: &Gate) {
    match *gate {
        Gate::Cnot(c, t) => apply_cnot(state, c, t),
        Gate::Cz(a, b) => apply_cz(state, a, b),
        Gate::Swap(a, b) => apply_swap(state, a, b),
        Gate::Measure(_, _) | Gate::Barrier(_) => {}
        _ => {
            if let (Some(m), Some(&q)) = (gate.matrix(), gate.qubits().first()) {
                apply_single_qubit_gate(state, q, &m);
            }
        }
    }
}

fn apply_single_qubit_gate(state: &mut [Complex64], q: QubitId, m: &Matrix2) {
    let mask = 1 << q;
    for i in 0..state.len() {
        if i & mask == 0 {
            let j = i | mask;
            let (a, b) = (state[i], state[j]);
            state[i] = m[0][0] * a + m[0][1] * b;
            state[j] = m[1][0] * a + m[1][1] * b;
        }
    }
}

/// 0 = I, 1 = X, 2 = Y, 3 = Z
fn apply_pauli(state: &mut [Complex64], q: QubitId, pauli: usize) {
    let gate = match pauli {
        1 => Gate::X(q),
        2 => Gate::Y(q),
        3 => Gate::Z(q),
        _ => return,
    };
    apply_unitary(state, &gate);
}

fn apply_cnot(state: &mut [Complex64], control: QubitId, target: QubitId) {
    let control_mask = 1 << control;
    let target_mask = 1 << target;

    for i in 0..state.len() {
        if (i & control_mask) != 0 && (i & target_mask) == 0 {
            state.swap(i, i | target_mask);
        }
    }
}

fn apply_cz(state: &mut [Complex64], q1: QubitId, q2: QubitId) {
    let mask = (1 << q1) | (1 << q2);
    for (i, amp) in state.iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

fn apply_swap(state: &mut [Complex64], q1: QubitId, q2: QubitId) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;

    for i in 0..state.len() {
        let bit1 = (i & mask1) != 0;
        let bit2 = (i & mask2) != 0;
        if bit1 && !bit2 {
            state.swap(i, i ^ mask1 ^ mask2);
        }
    }
}

/// Projective Z measurement of `q`; returns the outcome and renormalizes
fn collapse(state: &mut [Complex64], q: QubitId, rng: &mut StdRng) -> bool {
    let mask = 1 << q;
    let p1: f64 = state
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask != 0)
        .map(|(_, a)| a.norm_sqr())
        .sum();

    let outcome = rng.gen::<f64>() < p1;
    let kept = if outcome { p1 } else { 1.0 - p1 };
    let scale = if kept > 0.0 { 1.0 / kept.sqrt() } else { 0.0 };

    for (i, amp) in state.iter_mut().enumerate() {
        if ((i & mask) != 0) == outcome {
            *amp *= scale;
        } else {
            *amp = Complex64::new(0.0, 0.0);
        }
    }
    outcome
}

/// Qubit read into each clbit; all qubits in order when nothing is measured
fn readout_map(circuit: &Circuit) -> Vec<Option<QubitId>> {
    if circuit.count_measurements() == 0 {
        return (0..circuit.num_qubits()).map(Some).collect();
    }

    let mut map = vec![None; circuit.num_clbits()];
    for gate in circuit.gates() {
        if let Gate::Measure(q, c) = *gate {
            map[c] = Some(q);
        }
    }
    map
}

/// Clbit 0 is the rightmost character
fn format_clbits(bits: &[bool]) -> String {
    bits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn execute(&self, circuit: &Circuit, shots: u64) -> GroverResult<ExecutionResult> {
        check_shots(self, shots)?;
        self.check_circuit(circuit)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let start = Instant::now();
        let counts = self.simulate(circuit, shots, &mut rng);
        let elapsed = start.elapsed().as_millis() as u64;

        log::debug!(
            "{}: {} shots on {} qubits, {} outcomes in {} ms",
            self.name,
            shots,
            circuit.num_qubits(),
            counts.len(),
            elapsed
        );

        Ok(ExecutionResult {
            elapsed_ms: Some(elapsed),
            seed: self.seed,
            noise: Some(self.noise_model.to_string()),
            ..ExecutionResult::new(counts, shots, self.name.clone())
        })
    }

    fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================
