//! Q-learning squad controller

use tracing::{debug, info};

use crate::infra::UnitId;
use crate::state::{Orders, RewardLedger, Roster, TickSnapshot};

use super::config::LearningConfig;
use super::events::has_event;
use super::features;
use super::phase::{Phase, PhaseScheduler, PhaseTransition};
use super::policy::select_target;
use super::q_function::{Weights, best_q_value, td_update};
use super::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Summary of a finished episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    /// Phase the episode was played in
    pub phase: Phase,
    pub outcome: Outcome,
    pub friendly_survivors: usize,
    pub enemy_survivors: usize,
    /// Mean cumulative reward per friendly unit
    pub mean_reward: f64,
    pub final_tick: u32,
    pub transition: PhaseTransition,
}

/// Owns all run state: weights, roster, reward ledger and phase schedule.
pub struct QAgent<R: RandomSource> {
    config: LearningConfig,
    weights: Weights,
    roster: Roster,
    ledger: RewardLedger,
    scheduler: PhaseScheduler,
    rng: R,
}

impl<R: RandomSource> QAgent<R> {
    pub fn new(config: LearningConfig, weights: Weights, rng: R) -> Self {
        let scheduler = PhaseScheduler::new(config.learning_block, config.testing_block);
        Self {
            config,
            weights,
            roster: Roster::new(),
            ledger: RewardLedger::new(),
            scheduler,
            rng,
        }
    }

    /// Agent with uniform random weights in `[-1, 1]`.
    pub fn with_random_weights(config: LearningConfig, mut rng: R) -> Self {
        let weights = Weights::random(&mut rng);
        Self::new(config, weights, rng)
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    pub fn is_frozen(&self) -> bool {
        self.scheduler.is_frozen()
    }

    /// First tick of an episode: rebuild the roster and ledger, then decide.
    pub fn begin_episode(&mut self, snapshot: &TickSnapshot) -> Orders {
        self.roster
            .initialize(snapshot, self.config.player, self.config.enemy);
        self.ledger.reset(self.roster.friendly());
        info!(
            "Episode start ({:?}): {} vs {}",
            self.scheduler.phase(),
            self.roster.friendly().len(),
            self.roster.enemy().len()
        );
        self.step(snapshot)
    }

    /// One tick: book rewards and deaths, then pick targets if an event occurred.
    pub fn step(&mut self, snapshot: &TickSnapshot) -> Orders {
        self.bookkeeping(snapshot);

        let mut orders = Orders::new();
        if !has_event(snapshot.previous_turn.as_ref(), &self.roster) {
            return orders;
        }

        let friendly: Vec<UnitId> = self.roster.friendly().to_vec();
        for attacker in friendly {
            let Some(selection) = select_target(
                attacker,
                self.roster.enemy(),
                &self.weights,
                snapshot,
                self.config.epsilon,
                &mut self.rng,
            ) else {
                continue;
            };

            if !self.scheduler.is_frozen() {
                self.learn(attacker, selection.target, snapshot);
            }

            debug!(
                "tick {}: {} -> {}{}",
                snapshot.tick,
                attacker,
                selection.target,
                if selection.explored { " (explore)" } else { "" }
            );
            orders.insert(attacker, selection.target);
        }

        orders
    }

    /// Final bookkeeping, outcome and phase transition for the episode.
    pub fn end_episode(&mut self, snapshot: &TickSnapshot) -> EpisodeReport {
        self.bookkeeping(snapshot);

        let phase = self.scheduler.phase();
        let friendly_survivors = self.roster.friendly().len();
        let enemy_survivors = self.roster.enemy().len();
        let outcome = if friendly_survivors > enemy_survivors {
            Outcome::Victory
        } else {
            Outcome::Defeat
        };
        let mean_reward = self.ledger.mean_cumulative();
        let transition = self.scheduler.on_episode_end(mean_reward);

        EpisodeReport {
            phase,
            outcome,
            friendly_survivors,
            enemy_survivors,
            mean_reward,
            final_tick: snapshot.tick,
            transition,
        }
    }

    fn bookkeeping(&mut self, snapshot: &TickSnapshot) {
        let previous = snapshot.previous_turn.as_ref();
        self.ledger.accumulate(previous, &self.roster);

        if let Some(log) = previous {
            for unit in self.roster.remove_dead(&log.deaths) {
                self.ledger.retire(unit);
            }
        }
    }

    fn learn(&mut self, attacker: UnitId, defender: UnitId, snapshot: &TickSnapshot) {
        let features = features::extract(attacker, defender, snapshot);
        let reward = self.ledger.get(attacker).unwrap_or(0.0);
        let best_q = best_q_value(&self.weights, attacker, self.roster.enemy(), snapshot);
        self.weights = td_update(
            &self.weights,
            &features,
            reward,
            best_q,
            self.config.gamma,
            self.config.learning_rate,
        );
    }
}
