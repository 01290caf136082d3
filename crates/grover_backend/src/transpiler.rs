//! Circuit transpilation for coupled devices
//!
//! Gantree: L3_Backend → Transpiler
//!
//! Layout, SWAP routing and translation into a device's native gates.
//! Optimization levels follow the usual 0..=3 scale:
//! 0 translates gate by gate, 1 fuses single-qubit runs, 2 also cancels
//! adjacent CZ/CX pairs, 3 repeats translation until the gate count settles.

use crate::synthesis::{basis_supports, cancel_pairs, expand_two_qubit, synthesize_prx};
use crate::target::Target;
use grover_core::{Circuit, Gate, GroverError, GroverResult, QubitId, Topology};
use std::cmp::Reverse;
use std::fmt;

/// Two-qubit gates scored when choosing how to split a SWAP chain
const LOOKAHEAD: usize = 4;

/// Translation passes at level 3
const MAX_PASSES: usize = 3;

/// Transpiler configuration
#[derive(Debug, Clone)]
pub struct TranspilerConfig {
    /// Target basis gates; empty accepts every gate
    pub basis_gates: Vec<String>,

    /// Coupling graph; `None` means all-to-all
    pub topology: Option<Topology>,

    /// Physical qubit for each logical qubit
    pub initial_layout: Option<Vec<QubitId>>,

    /// Optimization level (0-3)
    pub optimization_level: u8,

    /// Number of qubits on target
    pub num_qubits: usize,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            basis_gates: Vec::new(),
            topology: None,
            initial_layout: None,
            optimization_level: 1,
            num_qubits: 0,
        }
    }
}

impl TranspilerConfig {
    /// Create config for a device target
    pub fn for_target(target: &Target) -> Self {
        Self {
            basis_gates: target.basis_gates().to_vec(),
            topology: Some(target.topology().clone()),
            num_qubits: target.num_qubits(),
            ..Default::default()
        }
    }

    /// Set optimization level
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }

    /// Pin logical qubit `i` to physical qubit `layout[i]`
    pub fn with_initial_layout(mut self, layout: Vec<QubitId>) -> Self {
        self.initial_layout = Some(layout);
        self
    }

    /// Replace the coupling graph
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }
}

/// Output of [`Transpiler::transpile`]
/// Gantree: TranspiledCircuit // 트랜스파일 결과
#[derive(Debug, Clone)]
pub struct TranspiledCircuit {
    /// Physical circuit
    pub circuit: Circuit,

    /// Physical qubit of each logical qubit before the first gate
    pub initial_layout: Vec<QubitId>,

    /// Physical qubit of each logical qubit after the last gate
    pub final_layout: Vec<QubitId>,

    /// SWAPs inserted by routing
    pub swaps: usize,
}

impl fmt::Display for TranspiledCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transpiled({} gates, depth {}, {} swaps, layout {:?} -> {:?})",
            self.circuit.gate_count(),
            self.circuit.depth(),
            self.swaps,
            self.initial_layout,
            self.final_layout
        )
    }
}

/// Circuit transpiler
/// Gantree: Transpiler // 트랜스파일러
pub struct Transpiler {
    config: TranspilerConfig,
}

impl Transpiler {
    /// Create new transpiler
    pub fn new(config: TranspilerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &TranspilerConfig {
        &self.config
    }

    /// Map `circuit` onto the device and translate it to native gates
    /// Gantree: transpile(circuit) -> Result<TranspiledCircuit> // 트랜스파일
    pub fn transpile(&self, circuit: &Circuit) -> GroverResult<TranspiledCircuit> {
        let level = self.config.optimization_level;
        if level > 3 {
            return Err(GroverError::InvalidOptimizationLevel(level));
        }

        let physical = self.physical_width(circuit)?;
        let initial_layout = self.choose_layout(circuit, physical)?;

        let routed = match &self.config.topology {
            Some(topology) => route(circuit, topology, &initial_layout, physical)?,
            None => Routed {
                gates: circuit
                    .gates()
                    .iter()
                    .map(|g| g.remap(|q| initial_layout[q]))
                    .collect(),
                final_layout: initial_layout.clone(),
                swaps: 0,
            },
        };

        let mut gates = self.translate(&routed.gates, physical)?;
        if level == 3 {
            for _ in 1..MAX_PASSES {
                let next = self.translate(&gates, physical)?;
                if next.len() >= gates.len() {
                    break;
                }
                gates = next;
            }
        }

        let output = rebuild(circuit, physical, gates)?;
        log::debug!(
            "transpiled {}: {} -> {} gates, {} swaps, layout {:?}",
            circuit.name().unwrap_or("circuit"),
            circuit.gate_count(),
            output.gate_count(),
            routed.swaps,
            initial_layout
        );

        Ok(TranspiledCircuit {
            circuit: output,
            initial_layout,
            final_layout: routed.final_layout,
            swaps: routed.swaps,
        })
    }

    fn physical_width(&self, circuit: &Circuit) -> GroverResult<usize> {
        let device = self
            .config
            .topology
            .as_ref()
            .map_or(self.config.num_qubits, |t| t.num_qubits().max(self.config.num_qubits));

        if device == 0 {
            return Ok(circuit.num_qubits());
        }
        if circuit.num_qubits() > device {
            return Err(GroverError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                max: device - 1,
            });
        }
        Ok(device)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn choose_layout(&self, circuit: &Circuit, physical: usize) -> GroverResult<Vec<QubitId>> {
        let n = circuit.num_qubits();

        if let Some(layout) = &self.config.initial_layout {
            validate_layout(layout, n, physical)?;
            return Ok(layout.clone());
        }

        let perfect = self
            .config
            .topology
            .as_ref()
            .and_then(|t| find_perfect_layout(circuit, t, physical));
        Ok(perfect.unwrap_or_else(|| (0..n).collect()))
    }

    // ========================================================================
    // Basis Translation
    // ========================================================================

    fn translate(&self, gates: &[Gate], physical: usize) -> GroverResult<Vec<Gate>> {
        let basis = &self.config.basis_gates;
        let level = self.config.optimization_level;

        let expanded = expand_two_qubit(gates, basis)?;

        let mut out = if !basis.is_empty() && basis_supports(basis, "prx") {
            synthesize_prx(&expanded, physical, level >= 1)
        } else {
            if let Some(gate) = expanded
                .iter()
                .find(|g| g.is_single_qubit() && !basis_supports(basis, g.name()))
            {
                return Err(GroverError::UnsupportedGate(gate.name().to_string()));
            }
            expanded
        };

        if level >= 2 {
            out = cancel_pairs(&out, physical);
        }
        Ok(out)
    }
}

/// Check a user layout: one entry per logical qubit, distinct, on the device
pub fn validate_layout(layout: &[QubitId], logical: usize, physical: usize) -> GroverResult<()> {
    if layout.len() != logical {
        return Err(GroverError::InvalidLayout(format!(
            "{} entries for {} qubits",
            layout.len(),
            logical
        )));
    }

    let mut seen = vec![false; physical];
    for &p in layout {
        if p >= physical {
            return Err(GroverError::InvalidLayout(format!(
                "physical qubit {} outside 0..{}",
                p, physical
            )));
        }
        if seen[p] {
            return Err(GroverError::InvalidLayout(format!("physical qubit {} repeated", p)));
        }
        seen[p] = true;
    }
    Ok(())
}

/// Layout in which every interacting pair is adjacent, if one exists
/// Gantree: find_perfect_layout(circuit, topo) -> Option<Vec> // 완전 배치
pub fn find_perfect_layout(
    circuit: &Circuit,
    topology: &Topology,
    physical: usize,
) -> Option<Vec<QubitId>> {
    let n = circuit.num_qubits();
    if n > physical {
        return None;
    }

    let mut pairs: Vec<(QubitId, QubitId)> = circuit
        .two_qubit_pairs()
        .into_iter()
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();

    let degree = |q: QubitId| pairs.iter().filter(|&&(a, b)| a == q || b == q).count();
    let mut order: Vec<QubitId> = (0..n).collect();
    order.sort_by_key(|&q| Reverse(degree(q)));

    let mut search = LayoutSearch {
        pairs: &pairs,
        topology,
        assigned: vec![None; n],
        used: vec![false; physical],
    };

    if search.place(&order) {
        search.assigned.into_iter().collect()
    } else {
        None
    }
}

struct LayoutSearch<'a> {
    pairs: &'a [(QubitId, QubitId)],
    topology: &'a Topology,
    assigned: Vec<Option<QubitId>>,
    used: Vec<bool>,
}

impl LayoutSearch<'_> {
    fn place(&mut self, order: &[QubitId]) -> bool {
        let Some((&logical, rest)) = order.split_first() else {
            return true;
        };

        for p in 0..self.used.len() {
            if self.used[p] || !self.fits(logical, p) {
                continue;
            }
            self.assigned[logical] = Some(p);
            self.used[p] = true;
            if self.place(rest) {
                return true;
            }
            self.assigned[logical] = None;
            self.used[p] = false;
        }
        false
    }

    fn fits(&self, logical: QubitId, p: QubitId) -> bool {
        self.pairs.iter().all(|&(a, b)| {
            let other = if a == logical {
                b
            } else if b == logical {
                a
            } else {
                return true;
            };
            self.assigned[other].map_or(true, |po| self.topology.is_connected(p, po))
        })
    }
}

// ============================================================================
// Routing
// ============================================================================

struct Routed {
    gates: Vec<Gate>,
    final_layout: Vec<QubitId>,
    swaps: usize,
}

/// Logical ↔ physical bookkeeping during routing
struct Mapping {
    log2phys: Vec<QubitId>,
    phys2log: Vec<Option<QubitId>>,
}

impl Mapping {
    fn new(layout: &[QubitId], physical: usize) -> Self {
        let mut phys2log = vec![None; physical];
        for (l, &p) in layout.iter().enumerate() {
            phys2log[p] = Some(l);
        }
        Self {
            log2phys: layout.to_vec(),
            phys2log,
        }
    }

    fn swap(&mut self, p1: QubitId, p2: QubitId) {
        self.phys2log.swap(p1, p2);
        for p in [p1, p2] {
            if let Some(l) = self.phys2log[p] {
                self.log2phys[l] = p;
            }
        }
    }
}

/// SWAPs along `path` that leave its ends adjacent, `k` of them moving the
/// start forward and the rest moving the end back
fn swap_chain(path: &[QubitId], k: usize) -> Vec<(QubitId, QubitId)> {
    let hops = path.len() - 2;
    let last = path.len() - 1;
    let forward = (0..k).map(|i| (path[i], path[i + 1]));
    let backward = (0..hops - k).map(|j| (path[last - j], path[last - j - 1]));
    forward.chain(backward).collect()
}

/// Place every gate on coupled physical qubits, inserting SWAPs
/// Gantree: route(circuit, topo, layout) -> Result<Routed> // 라우팅
fn route(
    circuit: &Circuit,
    topology: &Topology,
    layout: &[QubitId],
    physical: usize,
) -> GroverResult<Routed> {
    let distances = topology.distance_matrix();
    let dist = |a: QubitId, b: QubitId| {
        distances
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .flatten()
            .unwrap_or(physical)
    };

    let gates = circuit.gates();
    let mut mapping = Mapping::new(layout, physical);
    let mut out = Vec::with_capacity(gates.len());
    let mut swaps = 0;

    for (index, gate) in gates.iter().enumerate() {
        if let (true, [a, b]) = (gate.is_two_qubit(), &gate.qubits()[..]) {
            let (pa, pb) = (mapping.log2phys[*a], mapping.log2phys[*b]);
            if !topology.is_connected(pa, pb) {
                let path = topology
                    .shortest_path(pa, pb)
                    .ok_or(GroverError::PathNotFound(pa, pb))?;

                let upcoming: Vec<(QubitId, QubitId)> = gates[index + 1..]
                    .iter()
                    .filter(|g| g.is_two_qubit())
                    .take(LOOKAHEAD)
                    .filter_map(|g| match g.qubits()[..] {
                        [x, y] => Some((x, y)),
                        _ => None,
                    })
                    .collect();

                let mut best: Option<(usize, Vec<(QubitId, QubitId)>)> = None;
                for k in 0..=path.len() - 2 {
                    let chain = swap_chain(&path, k);
                    let mut trial = Mapping {
                        log2phys: mapping.log2phys.clone(),
                        phys2log: mapping.phys2log.clone(),
                    };
                    for &(p1, p2) in &chain {
                        trial.swap(p1, p2);
                    }
                    let cost: usize = upcoming
                        .iter()
                        .map(|&(x, y)| dist(trial.log2phys[x], trial.log2phys[y]))
                        .sum();
                    if best.as_ref().map_or(true, |(c, _)| cost < *c) {
                        best = Some((cost, chain));
                    }
                }

                for (p1, p2) in best.map(|(_, chain)| chain).unwrap_or_default() {
                    mapping.swap(p1, p2);
                    out.push(Gate::Swap(p1, p2));
                    swaps += 1;
                }
            }
        }

        out.push(gate.remap(|q| mapping.log2phys[q]));
    }

    Ok(Routed {
        gates: out,
        final_layout: mapping.log2phys,
        swaps,
    })
}

/// Physical-width circuit with the source's classical registers
fn rebuild(source: &Circuit, physical: usize, gates: Vec<Gate>) -> GroverResult<Circuit> {
    let mut circuit = match source.name() {
        Some(name) => Circuit::with_name(physical, name),
        None => Circuit::new(physical),
    };
    for reg in source.classical_registers() {
        circuit.add_classical_register(reg.name.clone(), reg.size)?;
    }
    circuit.add_gates(gates)?;
    Ok(circuit)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::Backend;
    use crate::simulator::SimulatorBackend;
    use grover_core::CircuitBuilder;

    fn adonis_config() -> TranspilerConfig {
        TranspilerConfig::for_target(&Target::iqm_adonis())
    }

    fn is_native(circuit: &Circuit) -> bool {
        let target = Target::iqm_adonis();
        circuit.gates().iter().all(|g| target.supports(g.name()))
            && target.topology().validate_circuit(circuit).is_ok()
    }

    /// 2-qubit search marking |11⟩
    fn marked_11() -> Circuit {
        CircuitBuilder::new(2)
            .h(0)
            .h(1)
            .cz(0, 1)
            .h(0)
            .h(1)
            .x(0)
            .x(1)
            .cz(0, 1)
            .x(0)
            .x(1)
            .h(0)
            .h(1)
            .measure_all()
            .build()
    }

    #[test]
    fn test_invalid_level() {
        let transpiler = Transpiler::new(adonis_config().with_optimization_level(4));
        assert!(matches!(
            transpiler.transpile(&marked_11()),
            Err(GroverError::InvalidOptimizationLevel(4))
        ));
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(&[2, 0], 2, 5).is_ok());
        assert!(validate_layout(&[2], 2, 5).is_err());
        assert!(validate_layout(&[2, 2], 2, 5).is_err());
        assert!(validate_layout(&[2, 7], 2, 5).is_err());
    }

    #[test]
    fn test_perfect_layout_on_star() {
        let circuit = CircuitBuilder::new(3).cz(0, 1).cz(0, 2).build();
        let topology = Topology::star(2, 5);

        let layout = find_perfect_layout(&circuit, &topology, 5).unwrap();
        assert_eq!(layout[0], 2);
    }

    #[test]
    fn test_no_perfect_layout_for_disjoint_pairs() {
        let circuit = CircuitBuilder::new(4).cz(0, 1).cz(2, 3).build();
        assert!(find_perfect_layout(&circuit, &Topology::star(2, 5), 5).is_none());
    }

    #[test]
    fn test_output_is_native() {
        for level in 0..=3 {
            let transpiler = Transpiler::new(adonis_config().with_optimization_level(level));
            let result = transpiler.transpile(&marked_11()).unwrap();
            assert!(is_native(&result.circuit), "level {}", level);
            assert_eq!(result.circuit.num_qubits(), 5);
            assert_eq!(result.circuit.num_clbits(), 2);
        }
    }

    #[test]
    fn test_transpiled_search_still_finds_11() {
        for level in 0..=3 {
            let transpiler = Transpiler::new(
                adonis_config()
                    .with_optimization_level(level)
                    .with_initial_layout(vec![2, 0]),
            );
            let result = transpiler.transpile(&marked_11()).unwrap();
            let counts = SimulatorBackend::ideal(5)
                .execute(&result.circuit, 200)
                .unwrap()
                .counts;
            assert_eq!(counts.get("11"), Some(&200), "level {}", level);
        }
    }

    #[test]
    fn test_routing_inserts_swap() {
        let circuit = CircuitBuilder::new(2).x(0).cx(0, 1).measure_all().build();
        let transpiler = Transpiler::new(
            adonis_config()
                .with_optimization_level(0)
                .with_initial_layout(vec![0, 1]),
        );

        let result = transpiler.transpile(&circuit).unwrap();
        assert_eq!(result.swaps, 1);
        assert_eq!(result.initial_layout, vec![0, 1]);
        assert_ne!(result.final_layout, result.initial_layout);
        assert_eq!(result.circuit.count_named("cz"), 4);
        assert!(is_native(&result.circuit));

        let counts = SimulatorBackend::ideal(5)
            .execute(&result.circuit, 100)
            .unwrap()
            .counts;
        assert_eq!(counts.get("11"), Some(&100));
    }

    #[test]
    fn test_level2_cancels_double_cz() {
        let circuit = CircuitBuilder::new(2).cz(0, 1).cz(0, 1).measure_all().build();
        let transpiler = Transpiler::new(
            adonis_config()
                .with_optimization_level(2)
                .with_initial_layout(vec![2, 0]),
        );

        let result = transpiler.transpile(&circuit).unwrap();
        assert_eq!(result.circuit.count_named("cz"), 0);
    }

    #[test]
    fn test_non_prx_basis_rejects_unknown_gate() {
        let config = TranspilerConfig {
            basis_gates: ["x", "cx", "measure", "barrier"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let transpiler = Transpiler::new(config);

        assert!(transpiler.transpile(&CircuitBuilder::new(2).x(0).cx(0, 1).build()).is_ok());
        assert!(matches!(
            transpiler.transpile(&CircuitBuilder::new(1).h(0).build()),
            Err(GroverError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_too_wide_for_device() {
        let transpiler = Transpiler::new(adonis_config());
        let circuit = CircuitBuilder::new(6).build();
        assert!(matches!(
            transpiler.transpile(&circuit),
            Err(GroverError::QubitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_swap_chain_splits() {
        let path = [0, 2, 1];
        assert_eq!(swap_chain(&path, 0), vec![(1, 2)]);
        assert_eq!(swap_chain(&path, 1), vec![(0, 2)]);
    }
}
