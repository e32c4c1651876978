//! Tuning configuration for trust decay, intensity mapping, and narration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::intensity::IntensityScale;
use crate::trust::TrustStatus;

const DEFAULT_TUNING_DATA: &str = include_str!("../data/tuning.json");

/// Errors raised when tuning configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be between 0.00 and 1.00 (got {value:.2})")]
    FractionOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be above {lower} (got {value})")]
    ThresholdOrder {
        field: &'static str,
        lower: i32,
        value: i32,
    },
    #[error("{field} must not be negative (got {value})")]
    NegativeDecay { field: &'static str, value: i32 },
}

/// Complete tuning bundle consumed by a [`crate::Playthrough`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TuningConfig {
    #[serde(default)]
    pub trust: TrustConfig,
    #[serde(default)]
    pub intensity: IntensityConfig,
    #[serde(default)]
    pub narration: NarrationConfig,
}

impl TuningConfig {
    /// Parse the embedded tuning asset, falling back to compiled defaults.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_TUNING_DATA) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("embedded tuning data rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self::load_from_static()
    }

    /// Parse and validate tuning data.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates a tuning invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first invariant violated by any section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trust.validate()?;
        self.narration.validate()
    }
}

/// Trust score arithmetic and threshold boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(default = "TrustConfig::default_starting_score")]
    pub starting_score: i32,
    #[serde(default = "TrustConfig::default_passive_decay")]
    pub passive_decay_per_scene: i32,
    #[serde(default = "TrustConfig::default_penalty_fraction")]
    pub bad_decision_penalty_fraction: f64,
    #[serde(default = "TrustConfig::default_moderate")]
    pub moderate_threshold: i32,
    #[serde(default = "TrustConfig::default_warning")]
    pub warning_threshold: i32,
    #[serde(default = "TrustConfig::default_critical")]
    pub critical_threshold: i32,
    #[serde(default = "TrustConfig::default_failure")]
    pub failure_threshold: i32,
}

impl TrustConfig {
    const fn default_starting_score() -> i32 {
        constants::TRUST_STARTING_SCORE
    }

    const fn default_passive_decay() -> i32 {
        constants::TRUST_PASSIVE_DECAY_PER_SCENE
    }

    const fn default_penalty_fraction() -> f64 {
        constants::TRUST_BAD_DECISION_PENALTY_FRACTION
    }

    const fn default_moderate() -> i32 {
        constants::TRUST_MODERATE_THRESHOLD
    }

    const fn default_warning() -> i32 {
        constants::TRUST_WARNING_THRESHOLD
    }

    const fn default_critical() -> i32 {
        constants::TRUST_CRITICAL_THRESHOLD
    }

    const fn default_failure() -> i32 {
        constants::TRUST_FAILURE_THRESHOLD
    }

    /// Classify a score against this configuration's boundaries.
    #[must_use]
    pub const fn status_for(&self, score: i32) -> TrustStatus {
        if score <= self.failure_threshold {
            TrustStatus::Failure
        } else if score <= self.critical_threshold {
            TrustStatus::Critical
        } else if score <= self.warning_threshold {
            TrustStatus::Warning
        } else if score < self.moderate_threshold {
            TrustStatus::Moderate
        } else {
            TrustStatus::Safe
        }
    }

    /// # Errors
    ///
    /// Returns an error when the fraction leaves `[0, 1]`, decay is negative,
    /// the failure boundary sits below the score floor, or the thresholds are
    /// not strictly ascending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.bad_decision_penalty_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigError::FractionOutOfRange {
                field: "trust.bad_decision_penalty_fraction",
                value: fraction,
            });
        }
        if self.passive_decay_per_scene < 0 {
            return Err(ConfigError::NegativeDecay {
                field: "trust.passive_decay_per_scene",
                value: self.passive_decay_per_scene,
            });
        }
        // Decay and penalties stop at the floor, so a lower boundary is unreachable.
        if self.failure_threshold < constants::TRUST_SCORE_FLOOR {
            return Err(ConfigError::ThresholdOrder {
                field: "trust.failure_threshold",
                lower: constants::TRUST_SCORE_FLOOR - 1,
                value: self.failure_threshold,
            });
        }
        let ladder = [
            ("trust.critical_threshold", self.failure_threshold, self.critical_threshold),
            ("trust.warning_threshold", self.critical_threshold, self.warning_threshold),
            ("trust.moderate_threshold", self.warning_threshold, self.moderate_threshold),
            ("trust.starting_score", self.failure_threshold, self.starting_score),
        ];
        for (field, lower, value) in ladder {
            if value <= lower {
                return Err(ConfigError::ThresholdOrder {
                    field,
                    lower,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            starting_score: Self::default_starting_score(),
            passive_decay_per_scene: Self::default_passive_decay(),
            bad_decision_penalty_fraction: Self::default_penalty_fraction(),
            moderate_threshold: Self::default_moderate(),
            warning_threshold: Self::default_warning(),
            critical_threshold: Self::default_critical(),
            failure_threshold: Self::default_failure(),
        }
    }
}

/// Intensity scale selection and scene gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityConfig {
    #[serde(default)]
    pub scale: IntensityScale,
    #[serde(default = "IntensityConfig::default_first_corrupt_scene")]
    pub first_corrupt_scene: u32,
}

impl IntensityConfig {
    const fn default_first_corrupt_scene() -> u32 {
        constants::INTENSITY_FIRST_CORRUPT_SCENE
    }
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            scale: IntensityScale::default(),
            first_corrupt_scene: Self::default_first_corrupt_scene(),
        }
    }
}

/// Thresholds for the ending narration branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationConfig {
    #[serde(default = "NarrationConfig::default_success_min")]
    pub success_min_score: i32,
    #[serde(default = "NarrationConfig::default_failure_below")]
    pub failure_below_score: i32,
    #[serde(default = "NarrationConfig::default_risky_margin")]
    pub risky_margin: u32,
}

impl NarrationConfig {
    const fn default_success_min() -> i32 {
        constants::NARRATION_SUCCESS_MIN_SCORE
    }

    const fn default_failure_below() -> i32 {
        constants::NARRATION_FAILURE_BELOW_SCORE
    }

    const fn default_risky_margin() -> u32 {
        constants::NARRATION_RISKY_MARGIN
    }

    /// # Errors
    ///
    /// Returns an error when the failure boundary sits above the success boundary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.success_min_score < self.failure_below_score {
            return Err(ConfigError::ThresholdOrder {
                field: "narration.success_min_score",
                lower: self.failure_below_score,
                value: self.success_min_score,
            });
        }
        Ok(())
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            success_min_score: Self::default_success_min(),
            failure_below_score: Self::default_failure_below(),
            risky_margin: Self::default_risky_margin(),
        }
    }
}
