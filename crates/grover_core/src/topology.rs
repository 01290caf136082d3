//! Qubit topology for Grover
//!
//! Gantree: L1_Circuit → Topology
//!
//! Undirected coupling graphs for devices and the routing queries the
//! transpiler runs against them. Couplings are stored as `(low, high)`
//! pairs; CZ is symmetric so direction never matters.

use crate::circuit::Circuit;
use crate::constants::helmi;
use crate::error::{GroverError, GroverResult};
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Undirected coupling graph
/// Gantree: Topology // 큐비트 토폴로지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Gantree: edges: Vec<(QubitId, QubitId)> // 정규화된 간선
    edges: Vec<(QubitId, QubitId)>,

    /// Gantree: adjacency: Vec<Vec<QubitId>> // 정렬된 이웃 목록
    adjacency: Vec<Vec<QubitId>>,

    name: Option<String>,
}

impl Topology {
    // ========================================================================
    // Constructors
    // ========================================================================

    fn build(num_qubits: usize, pairs: impl IntoIterator<Item = (QubitId, QubitId)>) -> Self {
        let mut edges: Vec<_> = pairs.into_iter().map(|(a, b)| (a.min(b), a.max(b))).collect();
        edges.sort_unstable();
        edges.dedup();

        let mut adjacency = vec![Vec::new(); num_qubits];
        for &(a, b) in &edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }

        Self {
            edges,
            adjacency,
            name: None,
        }
    }

    /// From a coupling list; the qubit count is one past the largest index.
    /// Reversed duplicates collapse into one coupling.
    /// Gantree: from_coupling_map(map) -> Result<Self> // 맵에서 생성
    pub fn from_coupling_map(coupling_map: &[(QubitId, QubitId)]) -> GroverResult<Self> {
        if coupling_map.is_empty() {
            return Err(GroverError::EmptyCouplingMap);
        }
        if let Some(&(a, b)) = coupling_map.iter().find(|(a, b)| a == b) {
            return Err(GroverError::InvalidCoupling(a, b));
        }

        let num_qubits = coupling_map
            .iter()
            .map(|&(a, b)| a.max(b) + 1)
            .max()
            .unwrap_or(0);
        Ok(Self::build(num_qubits, coupling_map.iter().copied()))
    }

    /// Chain 0-1-2-...-(n-1)
    pub fn linear(n: usize) -> Self {
        Self::build(n, (1..n).map(|i| (i - 1, i))).named(format!("linear_{}", n))
    }

    /// Every qubit coupled to `center` only
    /// Gantree: star(center, n) -> Self // 스타
    pub fn star(center: QubitId, n: usize) -> Self {
        let n = n.max(center + 1);
        Self::build(n, (0..n).filter(|&q| q != center).map(|q| (center, q))).named(format!("star_{}", n))
    }

    /// Helmi coupling from the device constants
    /// Gantree: helmi() -> Self // 헬미 결합
    pub fn helmi() -> Self {
        Self::build(helmi::QUBIT_NAMES.len(), helmi::COUPLING_MAP).named("helmi")
    }

    /// Same qubits, minus every coupling that touches one of `removed`
    /// Gantree: without_qubits(qs) -> Self // 간선 제거
    pub fn without_qubits(&self, removed: &[QubitId]) -> Self {
        let kept = self
            .edges
            .iter()
            .copied()
            .filter(|(a, b)| !removed.contains(a) && !removed.contains(b));

        let mut topology = Self::build(self.num_qubits(), kept);
        topology.name = self.name.clone();
        topology
    }

    /// Attach a display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.adjacency.len()
    }

    /// Couplings as `(low, high)` pairs, sorted
    pub fn edges(&self) -> &[(QubitId, QubitId)] {
        &self.edges
    }

    /// Display name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // ========================================================================
    // Connectivity Queries
    // ========================================================================

    /// Whether a two-qubit gate may act on `q1`, `q2` directly
    /// Gantree: is_connected(q1, q2) -> bool // 연결 여부
    pub fn is_connected(&self, q1: QubitId, q2: QubitId) -> bool {
        q1 == q2 || self.neighbors(q1).binary_search(&q2).is_ok()
    }

    /// Sorted neighbours; empty for out-of-range qubits
    pub fn neighbors(&self, qubit: QubitId) -> &[QubitId] {
        self.adjacency.get(qubit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of couplings at `qubit`
    pub fn degree(&self, qubit: QubitId) -> usize {
        self.neighbors(qubit).len()
    }

    /// BFS from `start`: hop counts and the predecessor on a shortest path
    fn bfs(&self, start: QubitId) -> (Vec<Option<usize>>, Vec<Option<QubitId>>) {
        let n = self.num_qubits();
        let mut dist = vec![None; n];
        let mut parent = vec![None; n];
        if start >= n {
            return (dist, parent);
        }

        dist[start] = Some(0);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((current, d)) = queue.pop_front() {
            for &next in &self.adjacency[current] {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    parent[next] = Some(current);
                    queue.push_back((next, d + 1));
                }
            }
        }
        (dist, parent)
    }

    /// Shortest path including both ends; lowest-index neighbours win ties
    /// Gantree: shortest_path(q1, q2) -> Option<Vec> // 최단 경로
    pub fn shortest_path(&self, start: QubitId, end: QubitId) -> Option<Vec<QubitId>> {
        let (dist, parent) = self.bfs(start);
        dist.get(end).copied().flatten()?;

        let mut path = vec![end];
        let mut node = end;
        while let Some(prev) = parent[node] {
            path.push(prev);
            node = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Hop count between two qubits
    pub fn distance(&self, q1: QubitId, q2: QubitId) -> Option<usize> {
        self.bfs(q1).0.get(q2).copied().flatten()
    }

    /// All-pairs hop counts; `None` where unreachable
    /// Gantree: distance_matrix() -> Vec<Vec<Option<usize>>> // 거리 행렬
    pub fn distance_matrix(&self) -> Vec<Vec<Option<usize>>> {
        (0..self.num_qubits()).map(|q| self.bfs(q).0).collect()
    }

    /// Longest shortest path between reachable qubits
    pub fn diameter(&self) -> usize {
        self.distance_matrix()
            .into_iter()
            .flatten()
            .flatten()
            .max()
            .unwrap_or(0)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that a circuit fits and only couples adjacent qubits
    /// Gantree: validate_circuit(&self, Circuit) -> Result // 검증
    pub fn validate_circuit(&self, circuit: &Circuit) -> GroverResult<()> {
        if circuit.num_qubits() > self.num_qubits() {
            return Err(GroverError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                max: self.num_qubits().saturating_sub(1),
            });
        }

        match circuit
            .two_qubit_pairs()
            .into_iter()
            .find(|&(q1, q2)| !self.is_connected(q1, q2))
        {
            Some((q1, q2)) => Err(GroverError::TopologyViolation { q1, q2 }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self.edges.iter().map(|(a, b)| format!("{}-{}", a, b)).collect();
        write!(
            f,
            "{}[{} qubits: {}]",
            self.name.as_deref().unwrap_or("topology"),
            self.num_qubits(),
            edges.join(" ")
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
