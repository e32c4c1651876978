use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use datableed_game::{
    Choice, DecisionEvent, DecisionTally, EffectProfile, IntensityLevel, NarrationBranch,
    Playthrough, ThresholdCrossing, TrustEvent, TrustStatus, TuningConfig,
};
use sha2::{Digest, Sha256};

use crate::logic::policy::{DecisionPoint, GameplayStrategy};

pub const DEFAULT_SCENES: u32 = 6;
pub const DEFAULT_PROMPTS_PER_SCENE: u8 = 1;
pub const DEFAULT_GOOD_BONUS: i32 = 10;

/// Scripted run of a playthrough under one strategy.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub scenes: u32,
    pub prompts_per_scene: u8,
    pub good_bonus: i32,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            scenes: DEFAULT_SCENES,
            prompts_per_scene: DEFAULT_PROMPTS_PER_SCENE,
            good_bonus: DEFAULT_GOOD_BONUS,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_scenes(mut self, scenes: u32) -> Self {
        self.scenes = scenes;
        self
    }

    #[must_use]
    pub const fn with_prompts_per_scene(mut self, prompts: u8) -> Self {
        self.prompts_per_scene = prompts;
        self
    }

    #[must_use]
    pub const fn with_good_bonus(mut self, bonus: i32) -> Self {
        self.good_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's failure message.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One resolved decision point.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub scene_number: u32,
    pub prompt_index: u8,
    pub good: bool,
    pub amount: i32,
    pub score_after: i32,
    pub rationale: Option<String>,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub scenes_played: u32,
    pub final_score: i32,
    pub final_status: TrustStatus,
    pub failed: bool,
    pub failed_at_scene: Option<u32>,
    pub decisions: Vec<DecisionRecord>,
    pub crossings: Vec<(ThresholdCrossing, i32)>,
    pub peak_level: IntensityLevel,
    pub final_profile: EffectProfile,
    pub narration: NarrationBranch,
    pub tally: DecisionTally,
    pub history: Vec<DecisionEvent>,
    pub tuning: Arc<TuningConfig>,
}

impl SimulationSummary {
    /// Hex SHA-256 over the serialized trust history.
    #[must_use]
    pub fn history_digest(&self) -> String {
        let payload = serde_json::to_vec(&self.history).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(payload);
        format!("{:x}", hasher.finalize())
    }
}

/// Headless deterministic runner for the trust engine.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    tuning: Arc<TuningConfig>,
}

impl GameTester {
    pub const fn new(tuning: Arc<TuningConfig>, verbose: bool) -> Self {
        Self { verbose, tuning }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let mut session = Playthrough::new(self.tuning.as_ref().clone());
        let crossings = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&crossings);
        session.subscribe(move |event: &TrustEvent| {
            if let TrustEvent::ThresholdCrossed { crossing, score } = *event {
                sink.borrow_mut().push((crossing, score));
            }
        });

        let mut policy = plan.strategy.create_policy(seed);
        let mut decisions = Vec::new();
        let mut peak_level = IntensityLevel::CALM;
        let mut scenes_played = 0;
        let mut failed_at_scene = None;

        'scenes: for scene in 1..=plan.scenes {
            scenes_played = scene;
            let entry = session.enter_scene(scene);
            peak_level = peak_level.max(session.effects().level);
            if entry.failed {
                failed_at_scene = Some(scene);
                break;
            }
            for prompt_index in 0..plan.prompts_per_scene {
                let point = DecisionPoint {
                    scene_number: scene,
                    prompt_index,
                    score: session.trust().score(),
                    status: session.trust().status(),
                    consecutive_bad: session.consecutive_bad(),
                };
                let decision = policy.decide(&point);
                let choice = if decision.good {
                    Choice::good(
                        format!("scene {scene} prompt {prompt_index}: safe"),
                        plan.good_bonus,
                    )
                } else {
                    Choice::bad(format!("scene {scene} prompt {prompt_index}: risky"))
                };
                let outcome = session.choose(choice);
                peak_level = peak_level.max(session.effects().level);
                if self.verbose {
                    println!(
                        "    scene {scene} prompt {prompt_index}: {} ({}) -> {}",
                        if decision.good { "safe" } else { "risky" },
                        policy.name(),
                        outcome.score
                    );
                }
                decisions.push(DecisionRecord {
                    scene_number: scene,
                    prompt_index,
                    good: decision.good,
                    amount: outcome.amount,
                    score_after: outcome.score,
                    rationale: decision.rationale,
                });
                if outcome.failed {
                    failed_at_scene = Some(scene);
                    break 'scenes;
                }
            }
        }

        log::debug!(
            "seed {seed} {}: final score {} after {scenes_played} scenes",
            plan.strategy,
            session.trust().score()
        );

        let crossings = crossings.borrow().clone();
        SimulationSummary {
            seed,
            strategy: plan.strategy,
            scenes_played,
            final_score: session.trust().score(),
            final_status: session.trust().status(),
            failed: session.has_failed(),
            failed_at_scene,
            decisions,
            crossings,
            peak_level,
            final_profile: session.effects(),
            narration: session.narration(),
            tally: session.tally(),
            history: session.trust().history().to_vec(),
            tuning: Arc::clone(&self.tuning),
        }
    }
}
