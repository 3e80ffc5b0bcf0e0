use std::collections::BTreeMap;

use tracing::trace;

use crate::infra::UnitId;
use crate::state::{Roster, TurnLog};

pub const KILL_REWARD: f64 = 100.0;
pub const LOSS_PENALTY: f64 = 100.0;
pub const ACTION_COST: f64 = 0.1;

/// Reward earned by `unit` during the previous tick. Zero on the first tick.
///
/// Death classification relies on `roster` still holding the units that died
/// on that tick, so call this before removing them.
pub fn step_reward(unit: UnitId, previous_turn: Option<&TurnLog>, roster: &Roster) -> f64 {
    let Some(log) = previous_turn else {
        return 0.0;
    };

    let mut reward = 0.0;

    for damage in &log.damage {
        if damage.attacker == unit {
            reward += damage.amount as f64;
        } else if damage.defender == unit {
            reward -= damage.amount as f64;
        }
    }

    for death in &log.deaths {
        if roster.is_friendly(death.unit) {
            reward -= LOSS_PENALTY;
        } else if roster.is_enemy(death.unit) {
            reward += KILL_REWARD;
        }
    }

    if log.was_issued(unit) {
        reward -= ACTION_COST;
    }

    reward
}

/// Cumulative reward per friendly unit since the start of the episode.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    live: BTreeMap<UnitId, f64>,
    /// Final totals of units that died this episode.
    retired: BTreeMap<UnitId, f64>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new episode with a zero entry for every friendly unit.
    pub fn reset(&mut self, friendly: &[UnitId]) {
        self.live = friendly.iter().map(|&id| (id, 0.0)).collect();
        self.retired.clear();
    }

    /// Add the previous tick's reward to every tracked friendly unit.
    pub fn accumulate(&mut self, previous_turn: Option<&TurnLog>, roster: &Roster) {
        for &unit in roster.friendly() {
            let reward = step_reward(unit, previous_turn, roster);
            let total = self.live.entry(unit).or_insert(0.0);
            *total += reward;
            if reward != 0.0 {
                trace!("unit {} reward {:+.1} (total {:.1})", unit, reward, total);
            }
        }
    }

    /// Move a dead unit's entry out of the live ledger.
    pub fn retire(&mut self, unit: UnitId) {
        if let Some(total) = self.live.remove(&unit) {
            self.retired.insert(unit, total);
        }
    }

    pub fn get(&self, unit: UnitId) -> Option<f64> {
        self.live.get(&unit).copied()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.live.contains_key(&unit)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Mean cumulative reward over every unit that fought this episode.
    pub fn mean_cumulative(&self) -> f64 {
        let count = self.live.len() + self.retired.len();
        if count == 0 {
            return 0.0;
        }
        let total: f64 = self.live.values().chain(self.retired.values()).sum();
        total / count as f64
    }
}
