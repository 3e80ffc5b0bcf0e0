//! Epsilon-greedy target selection

use crate::infra::UnitId;
use crate::state::TickSnapshot;

use super::features;
use super::q_function::{Weights, q_value};
use super::random::RandomSource;

/// Chosen defender for one attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub target: UnitId,
    /// Picked at random rather than by maximum Q-value.
    pub explored: bool,
}

/// Pick which of `enemies` `attacker` should attack.
///
/// On the first tick of an episode, and with probability `epsilon` otherwise,
/// a uniformly random enemy is chosen. Otherwise the enemy with the highest
/// Q-value wins, ties going to the earliest in roster order.
pub fn select_target(
    attacker: UnitId,
    enemies: &[UnitId],
    weights: &Weights,
    snapshot: &TickSnapshot,
    epsilon: f64,
    rng: &mut impl RandomSource,
) -> Option<Selection> {
    if enemies.is_empty() {
        return None;
    }

    if snapshot.is_first_tick() || rng.next_uniform() < epsilon {
        let target = enemies[rng.next_index(enemies.len())];
        return Some(Selection {
            target,
            explored: true,
        });
    }

    let mut target = enemies[0];
    let mut best = f64::NEG_INFINITY;
    for &enemy in enemies {
        let q = q_value(weights, &features::extract(attacker, enemy, snapshot));
        if q > best {
            best = q;
            target = enemy;
        }
    }

    Some(Selection {
        target,
        explored: false,
    })
}
