use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::simulation::{GameTester, SimulationPlan, SimulationSummary};
use crate::scenarios::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub strategy: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Final score of the last iteration.
    pub final_score: i32,
    pub narration: String,
    /// SHA-256 of the last iteration's history.
    pub history_digest: String,
    /// Mean wall time of the passing iterations.
    #[serde(rename = "average_ms", with = "millis")]
    pub average_duration: Duration,
    /// Wall time of each passing iteration, in milliseconds.
    pub iteration_ms: Vec<u64>,
}

pub struct LogicTester {
    game_tester: GameTester,
}

impl LogicTester {
    pub const fn new(game_tester: GameTester) -> Self {
        Self { game_tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.game_tester.verbose() {
                println!(
                    "🧪 Testing scenario: {} (strategy: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.strategy,
                    seed
                );
            }

            let result = self.run_single_scenario(scenario, seed, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let run = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let avg_duration = if run.timings.is_empty() {
            Duration::ZERO
        } else {
            run.timings.iter().sum::<Duration>()
                / u32::try_from(run.timings.len()).unwrap_or(1)
        };

        let (final_score, narration, history_digest) = run.last.as_ref().map_or_else(
            || (0, String::new(), String::new()),
            |summary| {
                (
                    summary.final_score,
                    summary.narration.to_string(),
                    summary.history_digest(),
                )
            },
        );

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            strategy: scenario.plan.strategy.label().to_string(),
            seed,
            passed: run.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: run.successes,
            failures: run.failures,
            final_score,
            narration,
            history_digest,
            average_duration: avg_duration,
            iteration_ms: run.timings.iter().map(|d| millis::of(*d)).collect(),
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> IterationRun {
        let verbose = self.game_tester.verbose();
        let mut run = IterationRun::default();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = self.game_tester.run_plan(plan, iteration_seed);

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let context = summarize_decision_path(&summary);
                run.failures.push(format!(
                    "Iteration {} (strategy {}, seed {}, scenes {}, score {}, status {}, narration {}): {} | {}",
                    i + 1,
                    summary.strategy.label(),
                    summary.seed,
                    summary.scenes_played,
                    summary.final_score,
                    summary.final_status,
                    summary.narration,
                    err,
                    context
                ));

                if verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                    println!(
                        "     ↳ Seed {} | Scenes {} | Score {} | Decisions: {}",
                        summary.seed, summary.scenes_played, summary.final_score, context
                    );
                }
            } else {
                run.successes += 1;
                let duration = start_time.elapsed();
                run.timings.push(duration);

                if verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) score:{} narration:{} strategy:{}",
                        i + 1,
                        iterations,
                        summary.final_score,
                        summary.narration,
                        summary.strategy.label()
                    );
                }
            }
            run.last = Some(summary);
        }

        run
    }
}

#[derive(Default)]
struct IterationRun {
    successes: usize,
    failures: Vec<String>,
    timings: Vec<Duration>,
    last: Option<SimulationSummary>,
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn summarize_decision_path(summary: &SimulationSummary) -> String {
    if summary.decisions.is_empty() {
        return "no decisions recorded".to_string();
    }

    summary
        .decisions
        .iter()
        .rev()
        .take(3)
        .map(|entry| {
            let rationale = entry
                .rationale
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("-");
            format!(
                "scene {} prompt {}: {} ({}) -> {} reason {}",
                entry.scene_number,
                entry.prompt_index,
                if entry.good { "safe" } else { "risky" },
                entry.amount,
                entry.score_after,
                rationale
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// `Duration` as whole milliseconds on the wire.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn of(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(of(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
