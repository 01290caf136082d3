//! Noise model for Grover
//!
//! Gantree: L3_Backend → NoiseModel
//!
//! Depolarizing error after each native gate and a symmetric readout flip.
//! The Helmi preset is what makes the fake Adonis backend imperfect.

use grover_core::{helmi, GroverError, GroverResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error rates applied by the state-vector simulator
/// Gantree: NoiseModel // 노이즈 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Gantree: single_qubit: f64 // 1Q 탈분극
    single_qubit: f64,

    /// Gantree: two_qubit: f64 // CZ 탈분극
    two_qubit: f64,

    /// Gantree: readout: f64 // 측정 반전
    readout: f64,
}

impl NoiseModel {
    /// No errors at all
    /// Gantree: ideal() -> Self // 이상적
    pub fn ideal() -> Self {
        Self::default()
    }

    /// Rates in line with published Helmi calibration data
    /// Gantree: helmi() -> Self // 헬미
    pub fn helmi() -> Self {
        Self {
            single_qubit: helmi::GATE_ERROR_1Q,
            two_qubit: helmi::GATE_ERROR_2Q,
            readout: helmi::READOUT_ERROR,
        }
    }

    /// One knob: `p` per single-qubit gate, `10p` per CZ, `p/4` per readout.
    /// `p` must lie in [0, 0.1].
    pub fn from_depol(p: f64) -> GroverResult<Self> {
        if !(0.0..=0.1).contains(&p) {
            return Err(GroverError::InvalidNoiseLevel(p));
        }
        Ok(Self {
            single_qubit: p,
            two_qubit: p * 10.0,
            readout: p / 4.0,
        })
    }

    /// Replace the readout flip rate
    pub fn with_readout_error(self, readout: f64) -> Self {
        Self { readout, ..self }
    }

    /// Depolarizing probability after a single-qubit gate
    pub fn gate_error_1q(&self) -> f64 {
        self.single_qubit
    }

    /// Depolarizing probability after a two-qubit gate
    pub fn gate_error_2q(&self) -> f64 {
        self.two_qubit
    }

    /// Probability that a measured bit is flipped
    pub fn readout_error(&self) -> f64 {
        self.readout
    }

    /// True when sampling needs no noise handling
    pub fn is_ideal(&self) -> bool {
        *self == Self::ideal()
    }

    /// Every rate must be a probability
    pub fn validate(&self) -> GroverResult<()> {
        [self.single_qubit, self.two_qubit, self.readout]
            .into_iter()
            .find(|rate| !(0.0..=1.0).contains(rate))
            .map_or(Ok(()), |rate| Err(GroverError::InvalidNoiseLevel(rate)))
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ideal() {
            return f.write_str("noiseless");
        }
        write!(
            f,
            "depolarizing 1q {:.4} / 2q {:.4}, readout {:.4}",
            self.single_qubit, self.two_qubit, self.readout
        )
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
    fn test_presets() {
        assert!(NoiseModel::ideal().is_ideal());
        assert_eq!(NoiseModel::ideal().to_string(), "noiseless");

        let helmi = NoiseModel::helmi();
        assert!(!helmi.is_ideal());
        assert!(helmi.gate_error_2q() > helmi.gate_error_1q());
        assert!(helmi.validate().is_ok());
    }

    #[test]
    fn test_from_depol_scales_rates() {
        let model = NoiseModel::from_depol(0.01).unwrap();
        assert_relative_eq!(model.gate_error_2q(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(model.readout_error(), 0.0025, epsilon = 1e-12);

        assert!(matches!(NoiseModel::from_depol(0.5), Err(GroverError::InvalidNoiseLevel(_))));
        assert!(NoiseModel::from_depol(-0.01).is_err());
    }

    #[test]
    fn test_validate_catches_bad_readout() {
        let model = NoiseModel::ideal().with_readout_error(2.0);
        assert!(matches!(model.validate(), Err(GroverError::InvalidNoiseLevel(r)) if r == 2.0));
    }
}
