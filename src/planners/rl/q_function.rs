//! Linear Q-function and its update rule

use crate::infra::UnitId;
use crate::state::TickSnapshot;

use super::features::{self, FeatureVector, NUM_FEATURES};
use super::random::RandomSource;

/// Weights of the linear Q-function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights(pub [f64; NUM_FEATURES]);

impl Weights {
    /// Uniform random weights in `[-1, 1]`.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let mut values = [0.0; NUM_FEATURES];
        for value in values.iter_mut() {
            *value = rng.next_uniform() * 2.0 - 1.0;
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }
}

/// `Σ weights[i] * features[i]`
pub fn q_value(weights: &Weights, features: &FeatureVector) -> f64 {
    weights
        .0
        .iter()
        .zip(features.0.iter())
        .map(|(w, f)| w * f)
        .sum()
}

/// Highest Q-value `attacker` can reach against any of `enemies`, or 0 if there are none.
pub fn best_q_value(
    weights: &Weights,
    attacker: UnitId,
    enemies: &[UnitId],
    snapshot: &TickSnapshot,
) -> f64 {
    enemies
        .iter()
        .map(|&enemy| q_value(weights, &features::extract(attacker, enemy, snapshot)))
        .fold(None, |best: Option<f64>, q| Some(best.map_or(q, |b| b.max(q))))
        .unwrap_or(0.0)
}

/// One TD step toward `reward + gamma * best_q`.
///
/// Each new weight is anchored on its feature value rather than on the
/// previous weight: `w'[i] = f[i] - lr * (q - target) * f[i]`.
pub fn td_update(
    weights: &Weights,
    features: &FeatureVector,
    reward: f64,
    best_q: f64,
    gamma: f64,
    learning_rate: f64,
) -> Weights {
    let q = q_value(weights, features);
    let target = reward + gamma * best_q;

    let mut next = [0.0; NUM_FEATURES];
    for (i, value) in next.iter_mut().enumerate() {
        let loss = (q - target) * features.0[i];
        *value = features.0[i] - learning_rate * loss;
    }
    Weights(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::planners::rl::random::ScriptedRandom;
    use crate::state::UnitView;

    #[test]
    fn test_q_value_is_dot_product() {
        let weights = Weights([0.5, -1.0, 2.0, 0.0, 4.0]);
        let features = FeatureVector([1.0, 2.0, 3.0, 100.0, 0.25]);
        assert!((q_value(&weights, &features) - (0.5 - 2.0 + 6.0 + 0.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_random_weights_in_range() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.25, 0.5, 0.75, 0.999]);
        let weights = Weights::random(&mut rng);
        assert_eq!(weights.values()[0], -1.0);
        assert_eq!(weights.values()[2], 0.0);
        assert!(weights.values().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn test_update_with_zero_gap_returns_features() {
        let weights = Weights([0.3, -0.2, 0.1, 0.05, -0.7]);
        let features = FeatureVector([1.0, 50.0, 1.25, 100.0, 0.5]);
        let best_q = 3.0;
        let gamma = 0.9;
        let reward = q_value(&weights, &features) - gamma * best_q;

        let next = td_update(&weights, &features, reward, best_q, gamma, 0.0001);

        for (w, f) in next.values().iter().zip(features.values()) {
            assert!((w - f).abs() < 1e-9);
        }
    }

    #[test]
    fn test_update_rule_literal() {
        let weights = Weights([1.0, 0.0, 0.0, 0.0, 0.0]);
        let features = FeatureVector([1.0, 2.0, 0.0, 0.0, 1.0]);
        // q = 1, target = 10 + 0.9 * 5 = 14.5, gap = -13.5
        let next = td_update(&weights, &features, 10.0, 5.0, 0.9, 0.0001);

        let expected = [
            1.0 + 0.0001 * 13.5,
            2.0 + 0.0001 * 27.0,
            0.0,
            0.0,
            1.0 + 0.0001 * 13.5,
        ];
        for (w, e) in next.values().iter().zip(expected.iter()) {
            assert!((w - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_best_q_value_scans_enemies() {
        let snapshot = TickSnapshot::new(
            0,
            vec![
                UnitView::new(1, 0, "footman", Position::new(0, 0), 100),
                UnitView::new(10, 1, "footman", Position::new(4, 0), 100),
                UnitView::new(11, 1, "footman", Position::new(1, 0), 100),
            ],
        );
        let weights = Weights([0.0, 1.0, 0.0, 0.0, 0.0]);

        assert_eq!(best_q_value(&weights, 1, &[10, 11], &snapshot), 100.0);
        assert_eq!(best_q_value(&weights, 1, &[], &snapshot), 0.0);
    }

    #[test]
    fn test_best_q_value_all_negative() {
        let snapshot = TickSnapshot::new(
            0,
            vec![
                UnitView::new(1, 0, "footman", Position::new(0, 0), 100),
                UnitView::new(10, 1, "footman", Position::new(2, 0), 100),
            ],
        );
        let weights = Weights([-1.0, -1.0, 0.0, 0.0, 0.0]);

        assert_eq!(best_q_value(&weights, 1, &[10], &snapshot), -51.0);
    }
}
