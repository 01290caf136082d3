//! Core types for Grover
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases and validated wrapper types used by circuit
//! generation, execution and accuracy reporting.

use crate::error::{GroverError, GroverResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Classical bit identifier (0-indexed)
pub type ClbitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

/// Measurement counts: bitstring -> count
/// Gantree: Counts // pub type Counts = HashMap<String, u64>
pub type Counts = HashMap<String, u64>;

// ============================================================================
// MarkedState
// ============================================================================

/// Oracle target over the 2-bit search space
/// Gantree: MarkedState // 닫힌 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkedState {
    /// |00⟩
    #[serde(rename = "00")]
    S00,
    /// |01⟩
    #[serde(rename = "01")]
    S01,
    /// |10⟩
    #[serde(rename = "10")]
    S10,
    /// |11⟩
    #[serde(rename = "11")]
    S11,
}

impl MarkedState {
    /// All marked states in canonical order
    pub const ALL: [MarkedState; 4] = [
        MarkedState::S00,
        MarkedState::S01,
        MarkedState::S10,
        MarkedState::S11,
    ];

    const LABELS: [&'static str; 4] = ["00", "01", "10", "11"];

    /// Parse the canonical 2-character form
    /// Gantree: parse(s) -> Result<Self> // 파싱
    pub fn parse(s: &str) -> GroverResult<Self> {
        Self::LABELS
            .iter()
            .position(|&label| label == s)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| GroverError::InvalidMarkedState(s.to_string()))
    }

    /// Position in canonical order
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        Self::LABELS[self.index()]
    }

    /// Value of the first and second search bit
    /// Gantree: bits() -> (bool, bool) // 비트 쌍
    pub fn bits(&self) -> (bool, bool) {
        (self.index() & 0b10 != 0, self.index() & 0b01 != 0)
    }
}

impl fmt::Display for MarkedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkedState {
    type Err = GroverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Probability
// ============================================================================

/// Accuracy or error rate, checked to lie in [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty
    pub const ONE: Self = Self(1.0);

    /// Checked constructor; NaN is rejected
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> GroverResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GroverError::InvalidProbability(value))
        }
    }

    /// `hits / total` as a probability; zero when nothing was counted
    pub fn from_ratio(hits: u64, total: u64) -> GroverResult<Self> {
        match total {
            0 => Ok(Self::ZERO),
            _ => Self::new(hits as f64 / total as f64),
        }
    }

    /// Raw value
    /// Gantree: value() -> f64 // 값 반환
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = GroverError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

// ============================================================================
// Bitstring
// ============================================================================

/// Measured outcome, character `i` holding classical bit `i`
/// Gantree: Bitstring // 비트열 타입
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring(Vec<bool>);

impl Bitstring {
    /// Parse a string of `0`/`1` characters
    /// Gantree: parse(s) -> Result<Self> // 파싱
    pub fn parse(s: &str) -> GroverResult<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(GroverError::InvalidBitstring(s.to_string())),
            })
            .collect::<GroverResult<Vec<_>>>()
            .map(Self)
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same bits in opposite order
    /// Gantree: reversed() -> Self // 비트 순서 반전
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Whether the leading bits equal `prefix`
    pub fn starts_with(&self, prefix: &Bitstring) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Data bits and the syndrome bits that follow them
    /// Gantree: split_syndrome(n) -> (Self, Self) // 데이터/신드롬 분리
    pub fn split_syndrome(&self, data_bits: usize) -> (Bitstring, Bitstring) {
        let (data, syndrome) = self.0.split_at(data_bits.min(self.len()));
        (Self(data.to_vec()), Self(syndrome.to_vec()))
    }

    /// True when every bit is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| !b)
    }
}

#[cfg(test)]
impl Bitstring {
    /// Bit at `index` (test-only accessor)
    pub(crate) fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.0.iter().map(|&b| if b { '1' } else { '0' }).collect();
        f.write_str(&s)
    }
}

impl FromStr for Bitstring {
    type Err = GroverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Basis
// ============================================================================

/// Measurement basis for a single qubit
/// Gantree: Basis // X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// X (Hadamard) basis
    X,
    /// Y basis
    Y,
    /// Z (computational) basis
    Z,
}

impl FromStr for Basis {
    type Err = GroverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Ok(Basis::X),
            "Y" => Ok(Basis::Y),
            "Z" => Ok(Basis::Z),
            _ => Err(GroverError::InvalidBasis(s.to_string())),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_marked_state_parse() {
        for state in MarkedState::ALL {
            assert_eq!(MarkedState::parse(state.as_str()).unwrap(), state);
        }
        assert_eq!("10".parse::<MarkedState>().unwrap(), MarkedState::S10);
    }

    #[test]
    fn test_marked_state_rejects_others() {
        for bad in ["", "0", "2", "012", "ab", "1 1"] {
            let err = MarkedState::parse(bad).unwrap_err();
            assert!(matches!(err, GroverError::InvalidMarkedState(_)));
        }
    }

    #[test]
    fn test_marked_state_serde() {
        let json = serde_json::to_string(&MarkedState::S01).unwrap();
        assert_eq!(json, "\"01\"");
        let back: MarkedState = serde_json::from_str("\"11\"").unwrap();
        assert_eq!(back, MarkedState::S11);
    }

    #[test]
    fn test_marked_state_bits() {
        assert_eq!(MarkedState::S10.bits(), (true, false));
        assert_eq!(MarkedState::S01.bits(), (false, true));
        assert_eq!(MarkedState::S11.index(), 3);
    }

    #[test]
    fn test_probability_bounds() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_from_ratio() {
        assert_relative_eq!(Probability::from_ratio(250, 1000).unwrap().value(), 0.25);
        assert_eq!(Probability::from_ratio(0, 0).unwrap(), Probability::ZERO);
        assert!(Probability::from_ratio(3, 2).is_err());
    }

    #[test]
    fn test_probability_serde_is_checked() {
        assert_eq!(serde_json::to_string(&Probability::ONE).unwrap(), "1.0");
        assert!(serde_json::from_str::<Probability>("1.5").is_err());
    }

    #[test]
    fn test_bitstring_syndrome_split() {
        let bs = Bitstring::parse("010100").unwrap();
        let (data, syndrome) = bs.split_syndrome(4);

        assert_eq!(data.to_string(), "0101");
        assert!(syndrome.is_zero());
        assert!(bs.starts_with(&data));
        assert_eq!(bs.reversed().to_string(), "001010");
        assert!(bs.split_syndrome(9).1.is_empty());
    }

    #[test]
    fn test_bitstring_invalid() {
        assert!(matches!(Bitstring::parse("01a"), Err(GroverError::InvalidBitstring(_))));
    }

    #[test]
    fn test_basis_parse() {
        assert_eq!("x".parse::<Basis>().unwrap(), Basis::X);
        assert_eq!(Basis::Y.to_string(), "Y");
        assert!(matches!("Q".parse::<Basis>(), Err(GroverError::InvalidBasis(_))));
    }
}
