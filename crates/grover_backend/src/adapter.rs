//! Backend adapter
//!
//! Gantree: L3_Backend → Adapter
//!
//! Human-readable backend labels, layout-pinned transpilation onto the
//! device, and execution with counts keys put back in qubit order.

use crate::execution::Backend;
use crate::transpiler::{Transpiler, TranspilerConfig};
use grover_core::{execution, helmi, Circuit, Counts, GroverError, GroverResult};

/// Label for the noisy Helmi stand-in
pub const HELMI_SIMULATOR_LABEL: &str = "Helmi simulator";

/// Label for the noiseless simulator
pub const IDEAL_SIMULATOR_LABEL: &str = "Ideal Simulator";

/// Label for anything else, assumed to be the device itself
pub const HELMI_DEVICE_LABEL: &str = "Helmi quantum computer";

/// Optimization level used when no explicit layout applies
const DEFAULT_COMPILE_LEVEL: u8 = 1;

/// Options for [`execute_with`]
/// Gantree: ExecuteOptions // 실행 옵션
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteOptions {
    /// Physical qubit names, logical qubit `i` goes to `qubit_order[i]`
    pub qubit_order: Vec<String>,

    /// Transpiler optimization level for layout-pinned circuits
    pub optimization_level: u8,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            qubit_order: helmi::DEFAULT_QUBIT_ORDER.iter().map(|s| s.to_string()).collect(),
            optimization_level: helmi::DEFAULT_OPTIMIZATION_LEVEL,
        }
    }
}

impl ExecuteOptions {
    /// Set qubit order
    pub fn with_qubit_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.qubit_order = order.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Set optimization level
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }
}

/// Display label for a backend
/// Gantree: resolve_backend_label(backend) -> &str // 라벨
pub fn resolve_backend_label(backend: &dyn Backend) -> &'static str {
    match backend.name() {
        execution::FAKE_HELMI_BACKEND_NAME => HELMI_SIMULATOR_LABEL,
        execution::IDEAL_BACKEND_NAME => IDEAL_SIMULATOR_LABEL,
        _ => HELMI_DEVICE_LABEL,
    }
}

fn is_unconstrained(backend: &dyn Backend) -> bool {
    backend.name() == execution::IDEAL_BACKEND_NAME || backend.target().is_none()
}

/// Transpile with logical qubit `i` pinned to the physical qubit named
/// `qubit_order[i]`, for the first `n_qubits` names. Couplings touching the
/// remaining names are removed so routing never passes through them.
/// The ideal simulator gets the circuit back unchanged.
/// Gantree: transpile_circuit(c, backend, order, n, level) -> Result<Circuit> // 배치 고정
pub fn transpile_circuit<S: AsRef<str>>(
    circuit: &Circuit,
    backend: &dyn Backend,
    qubit_order: &[S],
    n_qubits: usize,
    optimization_level: u8,
) -> GroverResult<Circuit> {
    let target = match backend.target() {
        Some(target) if !is_unconstrained(backend) => target,
        _ => return Ok(circuit.clone()),
    };

    let layout = target.layout_from_names(qubit_order)?;
    if n_qubits > layout.len() {
        return Err(GroverError::InvalidLayout(format!(
            "{} qubits requested from an order of {}",
            n_qubits,
            layout.len()
        )));
    }
    let (kept, removed) = layout.split_at(n_qubits);
    let topology = target.topology().without_qubits(removed);

    let config = TranspilerConfig::for_target(target)
        .with_topology(topology)
        .with_initial_layout(kept.to_vec())
        .with_optimization_level(optimization_level);

    let transpiled = Transpiler::new(config).transpile(circuit)?;
    log::debug!("{} on {}: {}", circuit.name().unwrap_or("circuit"), backend.name(), transpiled);
    Ok(transpiled.circuit)
}

/// Compile without a pinned layout (perfect-layout search, level 1)
pub fn default_compile(circuit: &Circuit, backend: &dyn Backend) -> GroverResult<Circuit> {
    let target = match backend.target() {
        Some(target) if !is_unconstrained(backend) => target,
        _ => return Ok(circuit.clone()),
    };

    let config = TranspilerConfig::for_target(target).with_optimization_level(DEFAULT_COMPILE_LEVEL);
    Ok(Transpiler::new(config).transpile(circuit)?.circuit)
}

/// Reverse every key so character `i` is classical bit `i`
/// Gantree: reverse_keys(counts) -> Counts // 비트 순서
pub fn reverse_keys(counts: Counts) -> Counts {
    counts
        .into_iter()
        .map(|(key, n)| (key.chars().rev().collect(), n))
        .collect()
}

/// Run `circuit` with default options
/// Gantree: execute(c, backend, shots) -> Result<(Counts, label)> // 실행
pub fn execute(circuit: &Circuit, backend: &dyn Backend, shots: u64) -> GroverResult<(Counts, &'static str)> {
    execute_with(circuit, backend, shots, &ExecuteOptions::default())
}

/// Compile for the backend, run, and return canonical-order counts plus the label
pub fn execute_with(
    circuit: &Circuit,
    backend: &dyn Backend,
    shots: u64,
    options: &ExecuteOptions,
) -> GroverResult<(Counts, &'static str)> {
    let label = resolve_backend_label(backend);

    let compiled = if circuit.num_qubits() == options.qubit_order.len() {
        transpile_circuit(
            circuit,
            backend,
            &options.qubit_order,
            circuit.num_qubits(),
            options.optimization_level,
        )?
    } else {
        default_compile(circuit, backend)?
    };

    let result = backend.execute(&compiled, shots)?;
    log::debug!("{} ({}): {}", label, backend.name(), result);

    Ok((reverse_keys(result.counts), label))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::ExecutionResult;
    use crate::simulator::SimulatorBackend;
    use crate::target::Target;
    use grover_core::CircuitBuilder;

    /// Stands in for the real device: only reports a name
    struct DeviceStub;

    impl Backend for DeviceStub {
        fn name(&self) -> &str {
            "helmi"
        }

        fn num_qubits(&self) -> usize {
            5
        }

        fn execute(&self, _circuit: &Circuit, shots: u64) -> GroverResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::new(), shots, "helmi"))
        }

        fn is_simulator(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(resolve_backend_label(&SimulatorBackend::fake_adonis()), "Helmi simulator");
        assert_eq!(resolve_backend_label(&SimulatorBackend::ideal(4)), "Ideal Simulator");
        assert_eq!(resolve_backend_label(&DeviceStub), "Helmi quantum computer");
    }

    #[test]
    fn test_reverse_keys() {
        let mut counts = Counts::new();
        counts.insert("0011".to_string(), 7);
        counts.insert("1000".to_string(), 3);

        let reversed = reverse_keys(counts);
        assert_eq!(reversed.get("1100"), Some(&7));
        assert_eq!(reversed.get("0001"), Some(&3));
    }

    #[test]
    fn test_counts_are_bit_reversed() {
        let circuit = CircuitBuilder::new(3).x(0).measure_all().build();

        let raw = SimulatorBackend::ideal(3).execute(&circuit, 10).unwrap().counts;
        let (counts, label) = execute(&circuit, &SimulatorBackend::ideal(3), 10).unwrap();

        assert_eq!(raw.get("001"), Some(&10));
        assert_eq!(counts.get("100"), Some(&10));
        assert_eq!(label, "Ideal Simulator");
    }

    #[test]
    fn test_ideal_transpile_is_identity() {
        let circuit = CircuitBuilder::new(4).h(0).cx(0, 3).build();
        let out = transpile_circuit(
            &circuit,
            &SimulatorBackend::ideal(4),
            &helmi::DEFAULT_QUBIT_ORDER,
            4,
            3,
        )
        .unwrap();
        assert_eq!(out, circuit);
    }

    #[test]
    fn test_transpile_pins_layout() {
        let backend = SimulatorBackend::fake_adonis();
        let circuit = CircuitBuilder::new(4).x(0).cx(0, 1).cx(0, 2).cx(0, 3).measure_all().build();

        let out = transpile_circuit(&circuit, &backend, &helmi::DEFAULT_QUBIT_ORDER, 4, 3).unwrap();
        let target = Target::iqm_adonis();

        assert_eq!(out.num_qubits(), 5);
        assert!(out.gates().iter().all(|g| target.supports(g.name())));
        // every CX fans out from QB3, the star centre
        assert_eq!(out.count_named("cz"), 3);
        assert!(out.two_qubit_pairs().iter().all(|&(a, b)| a == 2 || b == 2));
    }

    #[test]
    fn test_transpile_unknown_name() {
        let circuit = CircuitBuilder::new(2).cz(0, 1).build();
        let result = transpile_circuit(&circuit, &SimulatorBackend::fake_adonis(), &["QB1", "QB9"], 2, 1);
        assert!(matches!(result, Err(GroverError::UnknownQubitName(_))));
    }

    #[test]
    fn test_transpile_excludes_unused_order_qubits() {
        // QB3 is listed but not used, so QB1-QB2 cannot route through it
        let circuit = CircuitBuilder::new(2).cz(0, 1).build();
        let result = transpile_circuit(
            &circuit,
            &SimulatorBackend::fake_adonis(),
            &["QB1", "QB2", "QB3"],
            2,
            1,
        );
        assert!(matches!(result, Err(GroverError::PathNotFound(0, 1))));
    }

    #[test]
    fn test_execute_on_fake_adonis() {
        let backend = SimulatorBackend::fake_adonis().with_seed(5);
        let circuit = CircuitBuilder::new(4).x(0).x(3).measure_all().build();

        let (counts, label) = execute(&circuit, &backend, 1000).unwrap();
        let best = counts.iter().max_by_key(|(_, &n)| n).map(|(k, _)| k.as_str());

        assert_eq!(label, "Helmi simulator");
        assert_eq!(best, Some("1001"));
        assert_eq!(counts.values().sum::<u64>(), 1000);
    }

    #[test]
    fn test_six_qubits_do_not_fit_adonis() {
        let circuit = CircuitBuilder::new(6).measure_all().build();
        let result = execute(&circuit, &SimulatorBackend::fake_adonis(), 100);
        assert!(matches!(result, Err(GroverError::QubitOutOfRange { .. })));
    }

    #[test]
    fn test_custom_order_and_level() {
        let options = ExecuteOptions::default()
            .with_qubit_order(&["QB3", "QB5"])
            .with_optimization_level(0);
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).measure_all().build();
        let backend = SimulatorBackend::fake_adonis().with_seed(8);

        let (counts, _) = execute_with(&circuit, &backend, 2000, &options).unwrap();
        let correlated = counts.get("00").copied().unwrap_or(0) + counts.get("11").copied().unwrap_or(0);
        assert!(correlated > 1600);
    }
}
