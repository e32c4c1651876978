//! Centralized balance and tuning constants for the Data_Bleed trust engine.
//!
//! These values define the deterministic math for trust decay and horror
//! escalation. They seed the defaults of [`crate::config::TuningConfig`];
//! the embedded JSON asset mirrors them and may override them per build.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_TRUST_DECAY: &str = "log.trust.decay";
pub(crate) const LOG_TRUST_PENALTY: &str = "log.trust.penalty";
pub(crate) const LOG_TRUST_BONUS: &str = "log.trust.bonus";
pub(crate) const LOG_TRUST_RESET: &str = "log.trust.reset";
pub(crate) const LOG_THRESHOLD_WARNING: &str = "log.threshold.warning";
pub(crate) const LOG_THRESHOLD_CRITICAL: &str = "log.threshold.critical";
pub(crate) const LOG_THRESHOLD_FAILURE: &str = "log.threshold.failure";
pub(crate) const LOG_SCENE_ENTER: &str = "log.scene.enter";

// Trust tuning -------------------------------------------------------------
pub(crate) const TRUST_STARTING_SCORE: i32 = 100;
pub(crate) const TRUST_PASSIVE_DECAY_PER_SCENE: i32 = 5;
pub(crate) const TRUST_BAD_DECISION_PENALTY_FRACTION: f64 = 0.25;
pub(crate) const TRUST_MODERATE_THRESHOLD: i32 = 50;
pub(crate) const TRUST_WARNING_THRESHOLD: i32 = 30;
pub(crate) const TRUST_CRITICAL_THRESHOLD: i32 = 10;
pub(crate) const TRUST_FAILURE_THRESHOLD: i32 = 0;
pub(crate) const TRUST_SCORE_FLOOR: i32 = 0;

// Intensity tuning ---------------------------------------------------------
pub(crate) const INTENSITY_MAX_LEVEL: u8 = 4;
/// Earliest scene that may show corruption; earlier scenes render calm.
pub(crate) const INTENSITY_FIRST_CORRUPT_SCENE: u32 = 4;
/// Scenes past this one reuse its animation row.
pub(crate) const INTENSITY_LAST_TUNED_SCENE: u32 = 6;

// Signed design-document scale: lower bound (inclusive) of levels 0..=3.
pub(crate) const SIGNED_LEVEL0_MIN: i32 = 20;
pub(crate) const SIGNED_LEVEL1_MIN: i32 = 0;
pub(crate) const SIGNED_LEVEL2_MIN: i32 = -30;
pub(crate) const SIGNED_LEVEL3_MIN: i32 = -60;

// Corruption frame intervals in milliseconds, keyed by scene 4, 5, 6.
pub(crate) const ANIMATION_INTERVAL_SCENE4_LIGHT_MS: u32 = 16_000;
pub(crate) const ANIMATION_INTERVAL_SCENE4_HEAVY_MS: u32 = 12_000;
pub(crate) const ANIMATION_INTERVAL_SCENE5_LIGHT_MS: u32 = 10_000;
pub(crate) const ANIMATION_INTERVAL_SCENE5_HEAVY_MS: u32 = 8_000;
pub(crate) const ANIMATION_INTERVAL_SCENE6_LIGHT_MS: u32 = 8_000;
pub(crate) const ANIMATION_INTERVAL_SCENE6_HEAVY_MS: u32 = 6_000;

// Glitch cadence per level 1..=4 as (frequency, duration) in milliseconds.
pub(crate) const GLITCH_LEVEL1: (u32, u32) = (15_000, 200);
pub(crate) const GLITCH_LEVEL2: (u32, u32) = (8_000, 500);
pub(crate) const GLITCH_LEVEL3: (u32, u32) = (3_000, 1_000);
pub(crate) const GLITCH_LEVEL4: (u32, u32) = (1_000, 2_000);

// Screen filter opacity per level 0..=4.
pub(crate) const FILTER_STRENGTH: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

// Narration tuning ---------------------------------------------------------
pub(crate) const NARRATION_SUCCESS_MIN_SCORE: i32 = 70;
pub(crate) const NARRATION_FAILURE_BELOW_SCORE: i32 = 40;
pub(crate) const NARRATION_RISKY_MARGIN: u32 = 2;

// Session defaults ---------------------------------------------------------
pub(crate) const DEFAULT_FIRST_SCENE: u32 = 1;
