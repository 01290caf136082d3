//! Accuracy map
//!
//! Gantree: L0_Foundation → AccuracyMap
//!
//! Marked state → accuracy, in the order the sweep produced it.

use crate::error::{GroverError, GroverResult};
use crate::types::{MarkedState, Probability};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-marked-state accuracy, insertion ordered, written once per key
/// Gantree: AccuracyMap // 정확도 맵
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMap {
    entries: Vec<(MarkedState, Probability)>,
}

impl AccuracyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the accuracy for `state`
    /// Gantree: insert(state, value) -> Result // 1회 기록
    pub fn insert(&mut self, state: MarkedState, value: f64) -> GroverResult<()> {
        if self.contains(state) {
            return Err(GroverError::AccuracyAlreadyRecorded(state.to_string()));
        }
        let value = Probability::new(value)?;
        self.entries.push((state, value));
        Ok(())
    }

    /// Build from `(state, value)` pairs, validating each
    pub fn from_pairs(pairs: impl IntoIterator<Item = (MarkedState, f64)>) -> GroverResult<Self> {
        let mut map = Self::new();
        for (state, value) in pairs {
            map.insert(state, value)?;
        }
        Ok(map)
    }

    /// Accuracy for `state`, if recorded
    pub fn get(&self, state: MarkedState) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, p)| p.value())
    }

    /// Accuracy for `state`, zero when absent
    pub fn get_or_zero(&self, state: MarkedState) -> f64 {
        self.get(state).unwrap_or(0.0)
    }

    /// Check whether `state` has been recorded
    pub fn contains(&self, state: MarkedState) -> bool {
        self.entries.iter().any(|(s, _)| *s == state)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (MarkedState, f64)> + '_ {
        self.entries.iter().map(|(s, p)| (*s, p.value()))
    }

    /// Marked states in insertion order
    pub fn states(&self) -> Vec<MarkedState> {
        self.entries.iter().map(|(s, _)| *s).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean accuracy over recorded states
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|(_, p)| p.value()).sum();
        Some(sum / self.entries.len() as f64)
    }
}

impl fmt::Display for AccuracyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(s, p)| format!("{}: {:.4}", s, p.value()))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
