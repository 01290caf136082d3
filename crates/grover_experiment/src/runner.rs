//! Marked-state sweeps
//!
//! Gantree: L4_Experiment → Runner
//!
//! Builds one search circuit per marked state, runs it through the backend
//! adapter and turns the histograms into an accuracy map.

use grover_backend::execution::check_shots;
use grover_backend::{execute_with, resolve_backend_label, Backend, ExecuteOptions};
use grover_circuits::{CircuitKind, EncodingVariant, QubitCount};
use grover_core::{AccuracyMap, Bitstring, Counts, GroverError, GroverResult, MarkedState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Sweep Mode
// ============================================================================

/// Which circuit family a sweep runs
/// Gantree: SweepMode // unencoded | encoded | encoded_2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SweepMode {
    /// Plain Grover search
    #[default]
    #[serde(rename = "unencoded")]
    Unencoded,
    /// [[4,2,2]] with the star encoder
    #[serde(rename = "encoded")]
    Encoded,
    /// [[4,2,2]] with the chain encoder
    #[serde(rename = "encoded_2")]
    Encoded2,
}

impl SweepMode {
    /// Parse `unencoded`, `encoded` or `encoded_2`
    pub fn parse(s: &str) -> GroverResult<Self> {
        match s {
            "unencoded" => Ok(SweepMode::Unencoded),
            "encoded" => Ok(SweepMode::Encoded),
            "encoded_2" => Ok(SweepMode::Encoded2),
            _ => Err(GroverError::InvalidConfig(format!("unknown sweep mode '{}'", s))),
        }
    }

    /// Name used in titles
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepMode::Unencoded => "unencoded",
            SweepMode::Encoded => "encoded",
            SweepMode::Encoded2 => "encoded_2",
        }
    }

    /// Circuit family for this mode. `syndrome` only affects encoded modes.
    pub fn kind(&self, unencoded_qubits: QubitCount, syndrome: bool) -> CircuitKind {
        match self {
            SweepMode::Unencoded => CircuitKind::Unencoded(unencoded_qubits),
            SweepMode::Encoded => CircuitKind::Encoded { variant: EncodingVariant::Star, syndrome },
            SweepMode::Encoded2 => CircuitKind::Encoded { variant: EncodingVariant::Chain, syndrome },
        }
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SweepMode {
    type Err = GroverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Sweep Plan
// ============================================================================

/// Marked state and the bitstring counted as a hit
/// Gantree: PlanEntry // (표시 상태, 기대 비트열)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Oracle marked state
    pub marked: MarkedState,

    /// Expected measured bitstring, character `i` = qubit `i`
    pub expected: String,
}

/// Ordered marked state → expected bitstring table
/// Gantree: SweepPlan // 스윕 계획
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
    entries: Vec<PlanEntry>,
}

impl SweepPlan {
    /// Validate entries: binary non-empty expectations, each marked state once
    pub fn from_entries(entries: Vec<PlanEntry>) -> GroverResult<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.expected.is_empty() {
                return Err(GroverError::InvalidBitstring(entry.expected.clone()));
            }
            Bitstring::parse(&entry.expected)?;
            if entries[..i].iter().any(|e| e.marked == entry.marked) {
                return Err(GroverError::AccuracyAlreadyRecorded(entry.marked.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Build from string pairs such as `[("00", "00"), ("01", "01")]`
    /// Gantree: from_pairs(pairs) -> Result<SweepPlan> // 문자열 쌍
    pub fn from_pairs<M, E>(pairs: impl IntoIterator<Item = (M, E)>) -> GroverResult<Self>
    where
        M: AsRef<str>,
        E: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(m, e)| {
                Ok(PlanEntry {
                    marked: MarkedState::parse(m.as_ref())?,
                    expected: e.as_ref().to_string(),
                })
            })
            .collect::<GroverResult<Vec<_>>>()?;
        Self::from_entries(entries)
    }

    /// All four marked states with the ideal outcome of `kind`
    /// Gantree: canonical(kind) -> SweepPlan // 기대 결과 표
    pub fn canonical(kind: CircuitKind) -> Self {
        let entries = MarkedState::ALL
            .iter()
            .map(|&marked| PlanEntry {
                marked,
                expected: kind.expected_outcome(marked),
            })
            .collect();
        Self { entries }
    }

    /// Entries in sweep order
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Options and Outcome
// ============================================================================

/// Knobs for [`run_sweep_with`]
/// Gantree: SweepOptions // 스윕 옵션
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepOptions {
    /// Width of unencoded circuits
    pub unencoded_qubits: QubitCount,

    /// Append syndrome ancillas to encoded circuits
    pub syndrome: bool,

    /// Layout and optimization level for the adapter
    pub execute: ExecuteOptions,
}

impl SweepOptions {
    /// Set unencoded width
    pub fn with_unencoded_qubits(mut self, qubits: QubitCount) -> Self {
        self.unencoded_qubits = qubits;
        self
    }

    /// Enable or disable syndrome extraction
    pub fn with_syndrome(mut self, syndrome: bool) -> Self {
        self.syndrome = syndrome;
        self
    }

    /// Set adapter options
    pub fn with_execute(mut self, execute: ExecuteOptions) -> Self {
        self.execute = execute;
        self
    }
}

/// Everything a sweep produced
/// Gantree: SweepOutcome // 스윕 결과
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    /// Mode that was run
    pub mode: SweepMode,

    /// Backend label
    pub label: String,

    /// `"<mode> circuit run on <label>"`
    pub title: String,

    /// Hits / shots per marked state
    pub accuracy: AccuracyMap,

    /// Canonical-order histogram per marked state, in sweep order
    pub counts: Vec<(MarkedState, Counts)>,

    /// Accuracy among shots with a trivial syndrome, when ancillas were measured
    pub post_selected: Option<AccuracyMap>,

    /// Shots per circuit
    pub shots: u64,
}

impl SweepOutcome {
    /// Histogram recorded for `marked`
    pub fn counts_for(&self, marked: MarkedState) -> Option<&Counts> {
        self.counts.iter().find(|(m, _)| *m == marked).map(|(_, c)| c)
    }
}

impl fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.accuracy)?;
        if let Some(post) = &self.post_selected {
            write!(f, " (post-selected {})", post)?;
        }
        Ok(())
    }
}

// ============================================================================
// Accuracy
// ============================================================================

/// Fraction of `shots` that read exactly `expected`; a key of another
/// width never counts
/// Gantree: accuracy(counts, expected, shots) -> f64 // 정확도
pub fn accuracy(counts: &Counts, expected: &str, shots: u64) -> f64 {
    match shots {
        0 => 0.0,
        shots => counts.get(expected).copied().unwrap_or(0) as f64 / shots as f64,
    }
}

/// Hits among shots whose trailing syndrome bits are all zero; 0 when none are
/// Gantree: post_selected_accuracy(counts, expected, data_qubits) -> f64 // 사후 선택
pub fn post_selected_accuracy(counts: &Counts, expected: &str, data_qubits: usize) -> f64 {
    let Ok(expected) = Bitstring::parse(expected) else {
        return 0.0;
    };

    let (mut hits, mut kept) = (0u64, 0u64);
    for (key, &n) in counts {
        let Ok(outcome) = Bitstring::parse(key) else {
            continue;
        };
        if outcome.split_syndrome(data_qubits).1.is_zero() {
            kept += n;
            if outcome.starts_with(&expected) {
                hits += n;
            }
        }
    }

    match kept {
        0 => 0.0,
        _ => hits as f64 / kept as f64,
    }
}

// ============================================================================
// Sweep
// ============================================================================

/// Run every plan entry with default options; returns the accuracy map and
/// the figure title
/// Gantree: run_sweep(plan, backend, mode, shots) -> Result<(AccuracyMap, String)> // 스윕
pub fn run_sweep(
    plan: &SweepPlan,
    backend: &dyn Backend,
    mode: SweepMode,
    shots: u64,
) -> GroverResult<(AccuracyMap, String)> {
    let outcome = run_sweep_with(plan, backend, mode, shots, &SweepOptions::default())?;
    Ok((outcome.accuracy, outcome.title))
}

/// Run every plan entry and keep counts and post-selection alongside accuracy
pub fn run_sweep_with(
    plan: &SweepPlan,
    backend: &dyn Backend,
    mode: SweepMode,
    shots: u64,
    options: &SweepOptions,
) -> GroverResult<SweepOutcome> {
    check_shots(backend, shots)?;

    let kind = mode.kind(options.unencoded_qubits, options.syndrome);
    let with_syndrome = kind.num_qubits() > kind.data_qubits();
    let label = resolve_backend_label(backend);

    let mut accuracy_map = AccuracyMap::new();
    let mut post_selected = AccuracyMap::new();
    let mut all_counts = Vec::with_capacity(plan.len());

    log::info!("{} sweep on {}: {} states, {} shots", kind, backend.name(), plan.len(), shots);

    for entry in plan.entries() {
        let mut circuit = kind.build(entry.marked);
        circuit.measure_all()?;

        let (counts, _) = execute_with(&circuit, backend, shots, &options.execute)?;

        let value = accuracy(&counts, &entry.expected, shots);
        accuracy_map.insert(entry.marked, value)?;
        log::info!("marked {} -> {}: accuracy {:.4}", entry.marked, entry.expected, value);

        if with_syndrome {
            let post = post_selected_accuracy(&counts, &entry.expected, kind.data_qubits());
            post_selected.insert(entry.marked, post)?;
        }
        all_counts.push((entry.marked, counts));
    }

    Ok(SweepOutcome {
        mode,
        label: label.to_string(),
        title: format!("{} circuit run on {}", mode, label),
        accuracy: accuracy_map,
        counts: all_counts,
        post_selected: with_syndrome.then_some(post_selected),
        shots,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grover_backend::SimulatorBackend;

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|(k, n)| (k.to_string(), *n)).collect()
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("unencoded".parse::<SweepMode>().unwrap(), SweepMode::Unencoded);
        assert_eq!("encoded".parse::<SweepMode>().unwrap(), SweepMode::Encoded);
        assert_eq!("encoded_2".parse::<SweepMode>().unwrap(), SweepMode::Encoded2);
        assert!(SweepMode::parse("encoded_3").is_err());
        assert_eq!(SweepMode::Encoded2.to_string(), "encoded_2");
    }

    #[test]
    fn test_mode_kind() {
        assert_eq!(
            SweepMode::Unencoded.kind(QubitCount::Four, true),
            CircuitKind::Unencoded(QubitCount::Four)
        );
        assert_eq!(
            SweepMode::Encoded2.kind(QubitCount::Two, true),
            CircuitKind::Encoded { variant: EncodingVariant::Chain, syndrome: true }
        );
    }

    #[test]
    fn test_plan_from_pairs() {
        let plan = SweepPlan::from_pairs([("11", "0110"), ("00", "0000")]).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.entries()[0].marked, MarkedState::S11);

        assert!(matches!(
            SweepPlan::from_pairs([("2", "00")]),
            Err(GroverError::InvalidMarkedState(_))
        ));
        assert!(matches!(
            SweepPlan::from_pairs([("01", "0a")]),
            Err(GroverError::InvalidBitstring(_))
        ));
        assert!(matches!(
            SweepPlan::from_pairs([("01", "")]),
            Err(GroverError::InvalidBitstring(_))
        ));
        assert!(matches!(
            SweepPlan::from_pairs([("01", "01"), ("01", "10")]),
            Err(GroverError::AccuracyAlreadyRecorded(_))
        ));
    }

    #[test]
    fn test_canonical_plan() {
        let plan = SweepPlan::canonical(CircuitKind::Encoded {
            variant: EncodingVariant::Star,
            syndrome: false,
        });
        let expected: Vec<&str> = plan.entries().iter().map(|e| e.expected.as_str()).collect();
        assert_eq!(expected, ["0000", "0011", "0101", "0110"]);
    }

    #[test]
    fn test_accuracy_is_exact_lookup() {
        let c = counts(&[("0011", 700), ("0010", 200), ("001100", 50), ("1111", 50)]);
        assert_relative_eq!(accuracy(&c, "0011", 1000), 0.7);
        assert_eq!(accuracy(&c, "001", 1000), 0.0);
        assert_eq!(accuracy(&c, "0101", 1000), 0.0);
        assert_eq!(accuracy(&c, "0011", 0), 0.0);
    }

    #[test]
    fn test_short_expectations_never_match_wider_outcomes() {
        let plan = SweepPlan::from_pairs([("00", "00"), ("01", "01"), ("10", "10"), ("11", "11")]).unwrap();
        let backend = SimulatorBackend::ideal(6).with_seed(8);

        let outcome = run_sweep_with(&plan, &backend, SweepMode::Encoded, 1000, &SweepOptions::default()).unwrap();

        for entry in plan.entries() {
            let counts = outcome.counts_for(entry.marked).unwrap();
            let hits = counts.get(&entry.expected).copied().unwrap_or(0);
            assert_eq!(hits, 0);
            assert!(counts.keys().all(|key| key.len() == 4));
            assert_eq!(outcome.accuracy.get_or_zero(entry.marked), hits as f64 / 1000.0);
        }
    }

    #[test]
    fn test_post_selection_drops_flagged_shots() {
        let c = counts(&[("001100", 600), ("001110", 300), ("111100", 100)]);

        assert_relative_eq!(accuracy(&c, "001100", 1000), 0.6);
        assert_relative_eq!(post_selected_accuracy(&c, "001100", 4), 600.0 / 700.0);
        assert_eq!(post_selected_accuracy(&counts(&[("000010", 5)]), "000000", 4), 0.0);
    }

    #[test]
    fn test_unencoded_sweep_on_ideal() {
        let plan = SweepPlan::from_pairs([("00", "00"), ("01", "01"), ("10", "10"), ("11", "11")]).unwrap();
        let backend = SimulatorBackend::ideal(6).with_seed(42);

        let (map, title) = run_sweep(&plan, &backend, SweepMode::Unencoded, 1000).unwrap();

        assert_eq!(map.len(), 4);
        for (_, value) in map.iter() {
            assert_relative_eq!(value, 1.0);
        }
        assert_eq!(title, "unencoded circuit run on Ideal Simulator");
    }

    #[test]
    fn test_sweep_keeps_plan_order_and_counts() {
        let plan = SweepPlan::from_pairs([("10", "0101"), ("01", "0011")]).unwrap();
        let backend = SimulatorBackend::ideal(6).with_seed(1);

        let outcome = run_sweep_with(&plan, &backend, SweepMode::Encoded, 200, &SweepOptions::default()).unwrap();

        assert_eq!(outcome.accuracy.states(), vec![MarkedState::S10, MarkedState::S01]);
        assert_eq!(outcome.counts_for(MarkedState::S10).and_then(|c| c.get("0101")), Some(&200));
        assert!(outcome.post_selected.is_none());
        assert_eq!(outcome.shots, 200);
    }

    #[test]
    fn test_syndrome_sweep_reports_post_selection() {
        let kind = CircuitKind::Encoded { variant: EncodingVariant::Chain, syndrome: true };
        let options = SweepOptions::default().with_syndrome(true);
        let backend = SimulatorBackend::ideal(6).with_seed(3);

        let outcome =
            run_sweep_with(&SweepPlan::canonical(kind), &backend, SweepMode::Encoded2, 500, &options).unwrap();

        let post = outcome.post_selected.as_ref().unwrap();
        for state in MarkedState::ALL {
            assert_relative_eq!(outcome.accuracy.get_or_zero(state), 1.0);
            assert_relative_eq!(post.get_or_zero(state), 1.0);
        }
    }

    #[test]
    fn test_shots_checked_before_running() {
        let plan = SweepPlan::canonical(CircuitKind::Unencoded(QubitCount::Two));
        let backend = SimulatorBackend::ideal(2);

        assert!(matches!(
            run_sweep(&plan, &backend, SweepMode::Unencoded, 0),
            Err(GroverError::ShotsOutOfRange(0, 1, _))
        ));
        assert!(run_sweep(&plan, &backend, SweepMode::Unencoded, backend.max_shots() + 1).is_err());
    }

    #[test]
    fn test_helmi_simulator_sweep() {
        let plan = SweepPlan::canonical(CircuitKind::Unencoded(QubitCount::Two));
        let backend = SimulatorBackend::fake_adonis().with_seed(11);

        let outcome = run_sweep_with(&plan, &backend, SweepMode::Unencoded, 1000, &SweepOptions::default()).unwrap();

        assert_eq!(outcome.label, "Helmi simulator");
        for (_, value) in outcome.accuracy.iter() {
            assert!(value > 0.5 && value <= 1.0);
        }
    }
}
