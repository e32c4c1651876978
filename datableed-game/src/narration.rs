//! Ending narration branch selection.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::NarrationConfig;

/// Count of good versus risky choices made during a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionTally {
    pub good: u32,
    pub risky: u32,
}

impl DecisionTally {
    pub const fn record_good(&mut self) {
        self.good = self.good.saturating_add(1);
    }

    pub const fn record_risky(&mut self) {
        self.risky = self.risky.saturating_add(1);
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.good.saturating_add(self.risky)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationBranch {
    Success,
    Moderate,
    Failure,
}

impl NarrationBranch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Moderate => "moderate",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for NarrationBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the narration branch with default thresholds.
#[must_use]
pub fn select_narration(score: i32, tally: DecisionTally) -> NarrationBranch {
    select_narration_with(score, tally, &NarrationConfig::default())
}

#[must_use]
pub const fn select_narration_with(
    score: i32,
    tally: DecisionTally,
    cfg: &NarrationConfig,
) -> NarrationBranch {
    if score >= cfg.success_min_score && tally.good > tally.risky {
        NarrationBranch::Success
    } else if score < cfg.failure_below_score
        || tally.risky >= tally.good.saturating_add(cfg.risky_margin)
    {
        NarrationBranch::Failure
    } else {
        NarrationBranch::Moderate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn tally(good: u32, risky: u32) -> DecisionTally {
        DecisionTally { good, risky }
    }

    #[test]
    fn high_score_with_more_good_choices_succeeds() {
        assert_eq!(select_narration(70, tally(3, 2)), NarrationBranch::Success);
        assert_eq!(select_narration(115, tally(1, 0)), NarrationBranch::Success);
    }

    #[test]
    fn high_score_without_good_majority_is_moderate() {
        assert_eq!(select_narration(80, tally(2, 2)), NarrationBranch::Moderate);
        assert_eq!(select_narration(69, tally(4, 0)), NarrationBranch::Moderate);
    }

    #[test]
    fn low_score_or_risky_margin_fails() {
        assert_eq!(select_narration(39, tally(5, 0)), NarrationBranch::Failure);
        assert_eq!(select_narration(60, tally(1, 3)), NarrationBranch::Failure);
        assert_eq!(select_narration(60, tally(1, 2)), NarrationBranch::Moderate);
        assert_eq!(select_narration(40, tally(0, 0)), NarrationBranch::Moderate);
    }

    #[test]
    fn tally_counts_saturate() {
        let mut t = tally(u32::MAX, 0);
        t.record_good();
        t.record_risky();
        assert_eq!(t.good, u32::MAX);
        assert_eq!(t.risky, 1);
        assert_eq!(t.total(), u32::MAX);
        assert_eq!(NarrationBranch::Failure.to_string(), "failure");
    }

    #[test]
    fn custom_thresholds_apply() {
        let cfg = NarrationConfig {
            success_min_score: 90,
            failure_below_score: 20,
            risky_margin: 1,
        };
        assert_eq!(select_narration_with(85, tally(3, 0), &cfg), NarrationBranch::Moderate);
        assert_eq!(select_narration_with(85, tally(1, 2), &cfg), NarrationBranch::Failure);
    }
}
