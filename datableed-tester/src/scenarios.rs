//! Scenario catalog for automated playthroughs.
//!
//! Each scenario pairs a [`SimulationPlan`] with expectations evaluated against
//! every iteration's [`SimulationSummary`].

use anyhow::{Result, ensure};
use datableed_game::{DecisionKind, IntensityLevel, NarrationBranch, ThresholdCrossing};
use std::sync::Arc;

use crate::logic::{GameTester, GameplayStrategy, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("cautious-run", "Cautious Playthrough"),
        ("reckless-run", "Reckless Playthrough"),
        ("balanced-run", "Balanced Playthrough"),
        ("impulsive-run", "Impulsive Playthrough"),
        ("determinism", "Deterministic Replay Verification"),
        ("floor-invariant", "Trust Floor Invariant"),
        ("history-chain", "History Chain Consistency"),
        ("early-calm", "Early Scenes Stay Calm"),
        ("decay-only", "Passive Decay Without Bonuses"),
    ]
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::new(
            "Smoke Test",
            SimulationPlan::new(GameplayStrategy::Balanced).with_expectation(smoke_expectation),
        ),
        "cautious-run" | "cautious" => TestScenario::new(
            "Cautious Playthrough",
            SimulationPlan::new(GameplayStrategy::Cautious).with_expectation(cautious_expectation),
        ),
        "reckless-run" | "reckless" => TestScenario::new(
            "Reckless Playthrough",
            SimulationPlan::new(GameplayStrategy::Reckless).with_expectation(reckless_expectation),
        ),
        "balanced-run" | "balanced" => TestScenario::new(
            "Balanced Playthrough",
            SimulationPlan::new(GameplayStrategy::Balanced).with_expectation(balanced_expectation),
        ),
        "impulsive-run" | "impulsive" => TestScenario::new(
            "Impulsive Playthrough",
            impulsive_plan()
                .with_expectation(history_chain_expectation)
                .with_expectation(floor_expectation),
        ),
        "determinism" | "deterministic" => TestScenario::new(
            "Deterministic Replay Verification",
            impulsive_plan().with_expectation(determinism_expectation),
        ),
        "floor-invariant" | "floor" => TestScenario::new(
            "Trust Floor Invariant",
            SimulationPlan::new(GameplayStrategy::Reckless)
                .with_scenes(12)
                .with_prompts_per_scene(2)
                .with_expectation(floor_expectation)
                .with_expectation(decay_failure_expectation),
        ),
        "history-chain" | "history" => TestScenario::new(
            "History Chain Consistency",
            SimulationPlan::new(GameplayStrategy::Impulsive)
                .with_scenes(10)
                .with_prompts_per_scene(2)
                .with_expectation(history_chain_expectation),
        ),
        "early-calm" | "calm" => TestScenario::new(
            "Early Scenes Stay Calm",
            SimulationPlan::new(GameplayStrategy::Reckless)
                .with_scenes(3)
                .with_expectation(early_calm_expectation),
        ),
        "decay-only" | "decay" => TestScenario::new(
            "Passive Decay Without Bonuses",
            SimulationPlan::new(GameplayStrategy::Cautious)
                .with_good_bonus(0)
                .with_expectation(decay_only_expectation),
        ),
        _ => return None,
    };
    Some(scenario)
}

fn impulsive_plan() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Impulsive).with_prompts_per_scene(3)
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.scenes_played == 6,
        "expected 6 scenes, played {}",
        summary.scenes_played
    );
    ensure!(!summary.history.is_empty(), "history should not be empty");
    ensure!(
        summary.final_score >= summary.tuning.trust.failure_threshold,
        "score {} below the floor",
        summary.final_score
    );
    Ok(())
}

fn cautious_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.narration == NarrationBranch::Success,
        "cautious play should end in success, got {}",
        summary.narration
    );
    ensure!(
        summary.crossings.is_empty(),
        "no thresholds should be crossed: {:?}",
        summary.crossings
    );
    ensure!(summary.peak_level.is_calm(), "corruption should never appear");
    ensure!(
        summary.final_score > summary.tuning.trust.starting_score,
        "good choices should outpace decay"
    );
    Ok(())
}

fn reckless_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.narration == NarrationBranch::Failure,
        "reckless play should end in failure narration, got {}",
        summary.narration
    );
    ensure!(
        summary.peak_level == IntensityLevel::MAX,
        "a six-scene losing streak should max corruption, peaked at {}",
        summary.peak_level
    );
    let order: Vec<ThresholdCrossing> = summary.crossings.iter().map(|(c, _)| *c).collect();
    let mut sorted = order.clone();
    sorted.sort_by_key(|c| match c {
        ThresholdCrossing::Warning => 0,
        ThresholdCrossing::Critical => 1,
        ThresholdCrossing::Failure => 2,
    });
    ensure!(
        !order.is_empty() && order == sorted,
        "crossings should deepen monotonically: {order:?}"
    );
    Ok(())
}

fn balanced_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(!summary.failed, "balanced play should never fail");
    ensure!(
        summary.final_score > summary.tuning.trust.warning_threshold,
        "balanced play should stay above warning, ended at {}",
        summary.final_score
    );
    ensure!(
        summary.tally.good > 0 && summary.tally.risky > 0,
        "balanced play should mix choices: {:?}",
        summary.tally
    );
    Ok(())
}

fn floor_expectation(summary: &SimulationSummary) -> Result<()> {
    let floor = summary.tuning.trust.failure_threshold.min(0);
    if let Some(event) = summary.history.iter().find(|e| e.score_after < floor) {
        anyhow::bail!(
            "score fell below the floor in scene {}: {}",
            event.scene_number,
            event.score_after
        );
    }
    Ok(())
}

fn decay_failure_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.failed, "a long reckless run should fail");
    ensure!(summary.final_score == 0, "failure lands exactly on zero");
    ensure!(
        summary.failed_at_scene == Some(summary.scenes_played),
        "run should stop in the scene that failed, stopped at {} (failed {:?})",
        summary.scenes_played,
        summary.failed_at_scene
    );
    let last = summary.history.last();
    ensure!(
        last.is_some_and(|e| e.kind == DecisionKind::PassiveDecay),
        "only passive decay should reach zero, last event {last:?}"
    );
    Ok(())
}

fn history_chain_expectation(summary: &SimulationSummary) -> Result<()> {
    for pair in summary.history.windows(2) {
        ensure!(
            pair[0].score_after == pair[1].score_before,
            "history broken between scene {} and {}",
            pair[0].scene_number,
            pair[1].scene_number
        );
    }
    let last = summary.history.last().map(|e| e.score_after);
    ensure!(
        last.unwrap_or(summary.tuning.trust.starting_score) == summary.final_score,
        "final score {} does not match history {last:?}",
        summary.final_score
    );
    Ok(())
}

fn determinism_expectation(summary: &SimulationSummary) -> Result<()> {
    let replay = GameTester::new(Arc::clone(&summary.tuning), false)
        .run_plan(&impulsive_plan(), summary.seed);
    ensure!(
        replay.history_digest() == summary.history_digest(),
        "seed {} produced different histories",
        summary.seed
    );
    Ok(())
}

fn early_calm_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.peak_level.is_calm(),
        "scenes 1-3 should render calm, peaked at {}",
        summary.peak_level
    );
    ensure!(
        summary.final_profile.animation_interval_ms.is_none(),
        "no corruption frames before scene 4: {:?}",
        summary.final_profile
    );
    Ok(())
}

fn decay_only_expectation(summary: &SimulationSummary) -> Result<()> {
    let trust = &summary.tuning.trust;
    let decayed_scenes = i32::try_from(summary.scenes_played.saturating_sub(1))?;
    let expected = trust.starting_score - trust.passive_decay_per_scene * decayed_scenes;
    ensure!(
        summary.final_score == expected,
        "zero bonuses should leave only decay: expected {expected}, got {}",
        summary.final_score
    );
    ensure!(
        summary.decisions.iter().all(|d| d.good && d.amount == 0),
        "every choice should be safe and worth nothing"
    );
    ensure!(
        summary.final_profile.level == summary.peak_level,
        "profile level {} should match peak {}",
        summary.final_profile.level,
        summary.peak_level
    );
    Ok(())
}
