//! Horror intensity mapping.
//!
//! Pure, stateless translation from trust score, scene number, and the
//! consecutive bad-decision streak into a corruption level and the effect
//! parameters renderers consume. Every function here is total: inputs
//! outside the tuned ranges clamp to the nearest bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{IntensityConfig, TrustConfig};
use crate::constants::{
    ANIMATION_INTERVAL_SCENE4_HEAVY_MS, ANIMATION_INTERVAL_SCENE4_LIGHT_MS,
    ANIMATION_INTERVAL_SCENE5_HEAVY_MS, ANIMATION_INTERVAL_SCENE5_LIGHT_MS,
    ANIMATION_INTERVAL_SCENE6_HEAVY_MS, ANIMATION_INTERVAL_SCENE6_LIGHT_MS, FILTER_STRENGTH,
    GLITCH_LEVEL1, GLITCH_LEVEL2, GLITCH_LEVEL3, GLITCH_LEVEL4, INTENSITY_FIRST_CORRUPT_SCENE,
    INTENSITY_LAST_TUNED_SCENE, INTENSITY_MAX_LEVEL, SIGNED_LEVEL0_MIN, SIGNED_LEVEL1_MIN,
    SIGNED_LEVEL2_MIN, SIGNED_LEVEL3_MIN,
};

/// Discrete corruption level in `0..=4`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "u8", into = "u8")]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    pub const CALM: Self = Self(0);
    pub const MAX: Self = Self(INTENSITY_MAX_LEVEL);

    /// Construct a level, clamping anything above the maximum.
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > INTENSITY_MAX_LEVEL {
            Self::MAX
        } else {
            Self(level)
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_calm(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for IntensityLevel {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<IntensityLevel> for u8 {
    fn from(value: IntensityLevel) -> Self {
        value.0
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Which score scale drives [`IntensityMapper::level`].
///
/// `Unsigned` is the canonical 0..100+ scale the trust state produces.
/// `Signed` is the older -100..100 design table; it is only used when a
/// tuning file selects it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityScale {
    #[default]
    Unsigned,
    Signed,
}

/// Screen transition used when cutting between scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Cut,
    Crossfade,
    Glitch,
    Static,
    Blackout,
}

/// Glitch cadence. `frequency_ms == None` means glitches never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlitchTiming {
    pub frequency_ms: Option<u32>,
    pub duration_ms: u32,
}

/// Everything a renderer needs for the current moment of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectProfile {
    pub level: IntensityLevel,
    pub animation_interval_ms: Option<u32>,
    pub glitch: GlitchTiming,
    pub filter_strength: f32,
    pub transition: TransitionKind,
}

/// Level on the canonical unsigned scale: the severity of the trust status
/// under the default thresholds (safe 0, moderate 1, warning 2, critical 3,
/// failure 4).
#[must_use]
pub fn compute_level(score: i32) -> IntensityLevel {
    compute_level_with(score, &TrustConfig::default())
}

/// Unsigned-scale level against custom trust thresholds.
#[must_use]
pub const fn compute_level_with(score: i32, trust: &TrustConfig) -> IntensityLevel {
    IntensityLevel::new(trust.status_for(score).severity())
}

/// Level on the superseded signed design scale.
#[must_use]
pub const fn compute_level_signed(score: i32) -> IntensityLevel {
    let level = if score >= SIGNED_LEVEL0_MIN {
        0
    } else if score >= SIGNED_LEVEL1_MIN {
        1
    } else if score >= SIGNED_LEVEL2_MIN {
        2
    } else if score >= SIGNED_LEVEL3_MIN {
        3
    } else {
        4
    };
    IntensityLevel::new(level)
}

/// Corruption frame interval. `None` while no corruption can show.
#[must_use]
pub const fn compute_animation_interval(level: IntensityLevel, scene_number: u32) -> Option<u32> {
    compute_animation_interval_gated(level, scene_number, INTENSITY_FIRST_CORRUPT_SCENE)
}

/// Frame interval with a custom first corrupt scene. Scenes before the tuned
/// table use the scene-4 row; scenes past it use the scene-6 row.
#[must_use]
pub const fn compute_animation_interval_gated(
    level: IntensityLevel,
    scene_number: u32,
    first_corrupt_scene: u32,
) -> Option<u32> {
    if level.is_calm() || scene_number < first_corrupt_scene {
        return None;
    }
    let heavy = level.get() >= 2;
    let scene = if scene_number > INTENSITY_LAST_TUNED_SCENE {
        INTENSITY_LAST_TUNED_SCENE
    } else if scene_number < INTENSITY_FIRST_CORRUPT_SCENE {
        INTENSITY_FIRST_CORRUPT_SCENE
    } else {
        scene_number
    };
    let interval = match (scene, heavy) {
        (4, false) => ANIMATION_INTERVAL_SCENE4_LIGHT_MS,
        (4, true) => ANIMATION_INTERVAL_SCENE4_HEAVY_MS,
        (5, false) => ANIMATION_INTERVAL_SCENE5_LIGHT_MS,
        (5, true) => ANIMATION_INTERVAL_SCENE5_HEAVY_MS,
        (_, false) => ANIMATION_INTERVAL_SCENE6_LIGHT_MS,
        (_, true) => ANIMATION_INTERVAL_SCENE6_HEAVY_MS,
    };
    Some(interval)
}

#[must_use]
pub const fn compute_glitch_timing(level: IntensityLevel) -> GlitchTiming {
    let (frequency, duration) = match level.get() {
        0 => {
            return GlitchTiming {
                frequency_ms: None,
                duration_ms: 0,
            };
        }
        1 => GLITCH_LEVEL1,
        2 => GLITCH_LEVEL2,
        3 => GLITCH_LEVEL3,
        _ => GLITCH_LEVEL4,
    };
    GlitchTiming {
        frequency_ms: Some(frequency),
        duration_ms: duration,
    }
}

#[must_use]
pub fn compute_filter_strength(level: IntensityLevel) -> f32 {
    FILTER_STRENGTH
        .get(usize::from(level.get()))
        .copied()
        .unwrap_or(1.0)
}

#[must_use]
pub const fn compute_transition(level: IntensityLevel) -> TransitionKind {
    match level.get() {
        0 => TransitionKind::Cut,
        1 => TransitionKind::Crossfade,
        2 => TransitionKind::Glitch,
        3 => TransitionKind::Static,
        _ => TransitionKind::Blackout,
    }
}

/// Corruption keyed off consecutive bad decisions: one level per decision, capped.
#[must_use]
pub fn corruption_level_for_streak(consecutive_bad: u32) -> IntensityLevel {
    IntensityLevel::new(u8::try_from(consecutive_bad).unwrap_or(INTENSITY_MAX_LEVEL))
}

/// Configured mapper bundling the scale choice and scene gating.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMapper {
    config: IntensityConfig,
    trust: TrustConfig,
}

impl Default for IntensityMapper {
    fn default() -> Self {
        Self::new(IntensityConfig::default(), TrustConfig::default())
    }
}

impl IntensityMapper {
    #[must_use]
    pub const fn new(config: IntensityConfig, trust: TrustConfig) -> Self {
        Self { config, trust }
    }

    #[must_use]
    pub const fn scale(&self) -> IntensityScale {
        self.config.scale
    }

    /// Score-driven level on the configured scale.
    #[must_use]
    pub const fn level(&self, score: i32) -> IntensityLevel {
        match self.config.scale {
            IntensityScale::Unsigned => compute_level_with(score, &self.trust),
            IntensityScale::Signed => compute_level_signed(score),
        }
    }

    /// Effective level combining score and streak, gated by scene.
    #[must_use]
    pub fn effective_level(
        &self,
        score: i32,
        scene_number: u32,
        consecutive_bad: u32,
    ) -> IntensityLevel {
        if scene_number < self.config.first_corrupt_scene {
            return IntensityLevel::CALM;
        }
        self.level(score)
            .max(corruption_level_for_streak(consecutive_bad))
    }

    #[must_use]
    pub fn profile(&self, score: i32, scene_number: u32, consecutive_bad: u32) -> EffectProfile {
        let level = self.effective_level(score, scene_number, consecutive_bad);
        EffectProfile {
            level,
            animation_interval_ms: compute_animation_interval_gated(
                level,
                scene_number,
                self.config.first_corrupt_scene,
            ),
            glitch: compute_glitch_timing(level),
            filter_strength: compute_filter_strength(level),
            transition: compute_transition(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lv(n: u8) -> IntensityLevel {
        IntensityLevel::new(n)
    }

    #[test]
    fn unsigned_levels_follow_trust_status() {
        assert_eq!(compute_level(140), lv(0));
        assert_eq!(compute_level(50), lv(0));
        assert_eq!(compute_level(49), lv(1));
        assert_eq!(compute_level(30), lv(2));
        assert_eq!(compute_level(10), lv(3));
        assert_eq!(compute_level(0), lv(4));
        assert_eq!(compute_level(i32::MIN), lv(4));
    }

    #[test]
    fn compute_level_is_referentially_transparent() {
        for score in [-20, 0, 9, 29, 75, 200] {
            assert_eq!(compute_level(score), compute_level(score));
        }
    }

    #[test]
    fn signed_table_buckets_and_clamps() {
        assert_eq!(compute_level_signed(100), lv(0));
        assert_eq!(compute_level_signed(500), lv(0));
        assert_eq!(compute_level_signed(20), lv(0));
        assert_eq!(compute_level_signed(19), lv(1));
        assert_eq!(compute_level_signed(0), lv(1));
        assert_eq!(compute_level_signed(-1), lv(2));
        assert_eq!(compute_level_signed(-30), lv(2));
        assert_eq!(compute_level_signed(-31), lv(3));
        assert_eq!(compute_level_signed(-60), lv(3));
        assert_eq!(compute_level_signed(-61), lv(4));
        assert_eq!(compute_level_signed(-1_000), lv(4));
    }

    #[test]
    fn animation_interval_is_scene_gated() {
        for scene in 0..=3 {
            assert_eq!(compute_animation_interval(lv(3), scene), None);
        }
        assert_eq!(compute_animation_interval(lv(0), 6), None);
        assert_eq!(compute_animation_interval(lv(1), 4), Some(16_000));
        assert_eq!(compute_animation_interval(lv(2), 4), Some(12_000));
        assert_eq!(compute_animation_interval(lv(1), 5), Some(10_000));
        assert_eq!(compute_animation_interval(lv(4), 5), Some(8_000));
        assert_eq!(compute_animation_interval(lv(1), 6), Some(8_000));
        assert_eq!(compute_animation_interval(lv(3), 6), Some(6_000));
        assert_eq!(compute_animation_interval(lv(3), 11), Some(6_000));
    }

    #[test]
    fn glitch_timing_escalates_with_level() {
        assert_eq!(
            compute_glitch_timing(lv(0)),
            GlitchTiming {
                frequency_ms: None,
                duration_ms: 0
            }
        );
        let timings: Vec<(Option<u32>, u32)> = (1..=4)
            .map(|n| {
                let t = compute_glitch_timing(lv(n));
                (t.frequency_ms, t.duration_ms)
            })
            .collect();
        assert_eq!(
            timings,
            vec![
                (Some(15_000), 200),
                (Some(8_000), 500),
                (Some(3_000), 1_000),
                (Some(1_000), 2_000),
            ]
        );
    }

    #[test]
    fn levels_clamp_at_max() {
        assert_eq!(IntensityLevel::new(9), IntensityLevel::MAX);
        assert_eq!(IntensityLevel::from(250).get(), 4);
        assert_eq!(compute_transition(lv(4)), TransitionKind::Blackout);
        assert!((compute_filter_strength(lv(4)) - 1.0).abs() < f32::EPSILON);
        assert!(compute_filter_strength(lv(0)).abs() < f32::EPSILON);
    }

    #[test]
    fn streak_drives_corruption_up_to_max() {
        assert_eq!(corruption_level_for_streak(0), lv(0));
        assert_eq!(corruption_level_for_streak(2), lv(2));
        assert_eq!(corruption_level_for_streak(17), lv(4));
    }

    #[test]
    fn profile_is_calm_before_corrupt_scenes() {
        let mapper = IntensityMapper::default();
        let profile = mapper.profile(5, 3, 4);
        assert!(profile.level.is_calm());
        assert_eq!(profile.animation_interval_ms, None);
        assert_eq!(profile.transition, TransitionKind::Cut);
    }

    #[test]
    fn profile_takes_worse_of_score_and_streak() {
        let mapper = IntensityMapper::default();
        let by_streak = mapper.profile(90, 5, 3);
        assert_eq!(by_streak.level, lv(3));
        assert_eq!(by_streak.animation_interval_ms, Some(8_000));
        assert_eq!(by_streak.glitch.frequency_ms, Some(3_000));

        let by_score = mapper.profile(25, 4, 1);
        assert_eq!(by_score.level, lv(2));
        assert_eq!(by_score.animation_interval_ms, Some(12_000));
    }

    #[test]
    fn lowered_gate_still_yields_frame_interval() {
        let early = IntensityMapper::new(
            IntensityConfig {
                first_corrupt_scene: 2,
                ..IntensityConfig::default()
            },
            TrustConfig::default(),
        );
        let profile = early.profile(25, 2, 0);
        assert_eq!(profile.level, lv(2));
        assert_eq!(profile.glitch.frequency_ms, Some(8_000));
        assert_eq!(profile.animation_interval_ms, Some(12_000));
        assert!(early.profile(25, 1, 0).animation_interval_ms.is_none());
        assert_eq!(compute_animation_interval_gated(lv(1), 3, 2), Some(16_000));
        assert_eq!(compute_animation_interval_gated(lv(1), 4, 5), None);
    }

    #[test]
    fn signed_scale_only_when_selected() {
        let signed = IntensityMapper::new(
            IntensityConfig {
                scale: IntensityScale::Signed,
                ..IntensityConfig::default()
            },
            TrustConfig::default(),
        );
        assert_eq!(signed.level(15), lv(1));
        assert_eq!(IntensityMapper::default().level(15), lv(2));
        assert_eq!(IntensityMapper::default().scale(), IntensityScale::Unsigned);
    }

    #[test]
    fn level_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&lv(3)).expect("serialize"), "3");
        let parsed: IntensityLevel = serde_json::from_str("12").expect("deserialize");
        assert_eq!(parsed, IntensityLevel::MAX);
    }
}
