//! Game runner - connects the Q-learning agent to the simulation loop

use std::error::Error;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::infra::{AgentStore, GameObserver, Simulation, StepResult};

use super::agent::{EpisodeReport, QAgent};
use super::metrics::EvaluationMetrics;
use super::phase::PhaseTransition;
use super::q_function::Weights;
use super::random::RandomSource;

/// Weights to start the run with: loaded from `store` when requested,
/// otherwise (or when loading fails) uniform random in `[-1, 1]`.
pub fn initial_weights(
    load: bool,
    store: &impl AgentStore,
    rng: &mut impl RandomSource,
) -> Weights {
    if !load {
        return Weights::random(rng);
    }

    match store.load_weights() {
        Ok(weights) => {
            info!("Loaded weights {:?}", weights.values());
            weights
        }
        Err(e) => {
            warn!("{}; falling back to random weights", e);
            Weights::random(rng)
        }
    }
}

/// Drives episodes until the learning budget is spent.
pub struct RLGameRunner<S: Simulation, St: AgentStore, R: RandomSource> {
    simulation: S,
    store: St,
    agent: QAgent<R>,
    observer: Box<dyn GameObserver>,
    /// Learning episodes to play before stopping
    episode_budget: u32,
    metrics: EvaluationMetrics,
}

impl<S: Simulation, St: AgentStore, R: RandomSource> RLGameRunner<S, St, R> {
    pub fn new(
        simulation: S,
        store: St,
        agent: QAgent<R>,
        observer: impl GameObserver + 'static,
        episode_budget: u32,
    ) -> Self {
        Self {
            simulation,
            store,
            agent,
            observer: Box::new(observer),
            episode_budget,
            metrics: EvaluationMetrics::new(),
        }
    }

    pub fn agent(&self) -> &QAgent<R> {
        &self.agent
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    fn budget_exhausted(&self) -> bool {
        self.agent.scheduler().episodes_played() > self.episode_budget
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.observer.on_run_start(self.episode_budget);

        let mut episode = 0;
        loop {
            episode += 1;
            let report = self.play_episode(episode).await?;
            self.finish_episode(episode, &report);

            if self.budget_exhausted() {
                info!(
                    "Episode budget of {} exhausted after {} episodes",
                    self.episode_budget, episode
                );
                break;
            }
        }

        self.metrics.print_summary();
        Ok(())
    }

    async fn play_episode(&mut self, episode: u32) -> Result<EpisodeReport, Box<dyn Error>> {
        let snapshot = self.simulation.start().await?;
        self.observer
            .on_episode_start(episode, self.agent.scheduler().phase(), &snapshot);

        let mut orders = self.agent.begin_episode(&snapshot);
        self.observer.on_tick(&snapshot, &orders);

        loop {
            let tick_start = Instant::now();

            let snapshot = match self.simulation.act(&orders).await? {
                StepResult::Running(snapshot) => snapshot,
                StepResult::Finished(snapshot) => return Ok(self.agent.end_episode(&snapshot)),
            };
            orders = self.agent.step(&snapshot);
            self.observer.on_tick(&snapshot, &orders);

            let tick_duration = tick_start.elapsed();
            if tick_duration.as_millis() > 100 {
                debug!(
                    "Tick {} took {:.2}ms ({} orders)",
                    snapshot.tick,
                    tick_duration.as_secs_f64() * 1000.0,
                    orders.len()
                );
            }
        }
    }

    /// Persist and report a finished episode. Store failures are not fatal.
    fn finish_episode(&mut self, episode: u32, report: &EpisodeReport) {
        if let Err(e) = self.store.save_weights(self.agent.weights()) {
            self.observer.on_store_error(&e.to_string());
        }

        match report.transition {
            PhaseTransition::EnteredTesting => {
                info!("Weights frozen for a testing block");
            }
            PhaseTransition::CompletedTestBlock(average) => {
                info!("Testing block complete, average reward {:.2}", average);
                let history = self.agent.scheduler().history();
                if let Err(e) = self.store.save_history(history) {
                    self.observer.on_store_error(&e.to_string());
                }
                self.observer.on_test_block_complete(history);
            }
            PhaseTransition::None => {}
        }

        self.observer.on_episode_finished(episode, report);
        self.metrics.record_episode(report);
    }
}
