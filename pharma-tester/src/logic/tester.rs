use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::simulation::{SimulationPlan, SimulationSummary, run_plan};
use crate::scenario::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub engine: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    /// Iterations that ended in approval.
    pub wins: usize,
    pub average_steps: f64,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
}

struct IterationTally {
    successes: usize,
    wins: usize,
    steps: u64,
    failures: Vec<String>,
    performance_data: Vec<Duration>,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (target: {} strategy: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.target,
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
        let tally = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let avg_duration = if tally.performance_data.is_empty() {
            Duration::ZERO
        } else {
            tally.performance_data.iter().sum::<Duration>()
                / u32::try_from(tally.performance_data.len()).unwrap_or(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let average_steps = if iterations == 0 {
            0.0
        } else {
            tally.steps as f64 / iterations as f64
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            engine: scenario.plan.target.engine().label().to_string(),
            seed,
            passed: tally.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: tally.successes,
            wins: tally.wins,
            average_steps,
            failures: tally.failures,
            average_duration: avg_duration,
            performance_data: tally.performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> IterationTally {
        let mut tally = IterationTally {
            successes: 0,
            wins: 0,
            steps: 0,
            failures: Vec::new(),
            performance_data: Vec::new(),
        };

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = run_plan(plan, iteration_seed);
            tally.steps += u64::from(summary.steps);
            if summary.won {
                tally.wins += 1;
            }

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let context = summarize_decision_path(&summary);
                let status = if summary.game_ended {
                    "ended"
                } else {
                    "halted"
                };
                tally.failures.push(format!(
                    "Iteration {} ({}, strategy {}, seed {}, steps {}, status {}, ending '{}'): {} | {} | final {}",
                    i + 1,
                    summary.target,
                    summary.strategy.label(),
                    summary.seed,
                    summary.steps,
                    status,
                    summary.ending_message,
                    err,
                    context,
                    summary.final_snapshot()
                ));

                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                    println!(
                        "     ↳ Seed {} | Steps {} | {} | Decisions: {}",
                        summary.seed,
                        summary.steps,
                        summary.final_snapshot(),
                        context
                    );
                }
            } else {
                tally.successes += 1;
                let duration = start_time.elapsed();
                tally.performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) steps:{} ending:{} strategy:{}",
                        i + 1,
                        iterations,
                        summary.steps,
                        summary.ending_message,
                        summary.strategy.label()
                    );
                }
            }
        }

        tally
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(format!("{err:#}"));
        }
    }
    None
}

fn summarize_decision_path(summary: &SimulationSummary) -> String {
    if summary.decision_log.is_empty() {
        return "no decisions recorded".to_string();
    }

    summary
        .decision_log
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
                "step {} ({}): {} [{}] reason {}",
                entry.step, entry.prompt_id, entry.choice_id, entry.policy_name, rationale
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
