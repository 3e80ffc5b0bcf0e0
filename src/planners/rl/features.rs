//! Feature extraction for (attacker, defender) pairs
//!
//! | index | feature                                                  |
//! |-------|----------------------------------------------------------|
//! | 0     | bias, always 1                                           |
//! | 1     | proximity: `100 / chebyshev distance` (distance >= 1)    |
//! | 2     | hitpoint ratio attacker / defender                       |
//! | 3     | follow-through: 100 if last tick's target was defender   |
//! | 4     | crowding: `1 / n` where n units targeted defender        |
//!
//! Features 3 and 4 read the previous tick's command feedback and stay 0 on
//! the first tick of an episode.

use crate::infra::UnitId;
use crate::state::TickSnapshot;

pub const NUM_FEATURES: usize = 5;

const PROXIMITY_SCALE: f64 = 100.0;
const FOLLOW_THROUGH: f64 = 100.0;
const SWITCHED_TARGET: f64 = 1.0;

/// Fixed-size encoding of one candidate attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; NUM_FEATURES]);

impl FeatureVector {
    /// Features of a pair where one of the units no longer exists.
    pub const VANISHED: FeatureVector = FeatureVector([1.0, 0.0, 0.0, 0.0, 0.0]);

    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }
}

/// Compute the feature vector for `attacker` attacking `defender`.
pub fn extract(attacker: UnitId, defender: UnitId, snapshot: &TickSnapshot) -> FeatureVector {
    let (Some(att), Some(def)) = (snapshot.unit(attacker), snapshot.unit(defender)) else {
        return FeatureVector::VANISHED;
    };

    let mut features = [0.0; NUM_FEATURES];
    features[0] = 1.0;

    let distance = att.position.distance(&def.position).max(1);
    features[1] = PROXIMITY_SCALE / distance as f64;

    features[2] = if def.hp > 0 {
        att.hp as f64 / def.hp as f64
    } else {
        1.0
    };

    if let Some(log) = snapshot.previous_turn.as_ref() {
        features[3] = match log.feedback_for(attacker) {
            Some(feedback) if feedback.target == Some(defender) => FOLLOW_THROUGH,
            Some(_) => SWITCHED_TARGET,
            None => 0.0,
        };

        let piled_on = log
            .feedback
            .iter()
            .filter(|f| f.target == Some(defender))
            .count();
        features[4] = if piled_on > 0 {
            1.0 / piled_on as f64
        } else {
            1.0
        };
    }

    FeatureVector(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::state::{CommandFeedback, CommandStatus, TurnLog, UnitView};

    fn units(defender_pos: Position, attacker_hp: i32, defender_hp: i32) -> Vec<UnitView> {
        vec![
            UnitView::new(1, 0, "footman", Position::new(4, 4), attacker_hp),
            UnitView::new(2, 0, "footman", Position::new(4, 5), 160),
            UnitView::new(10, 1, "footman", defender_pos, defender_hp),
            UnitView::new(11, 1, "footman", Position::new(8, 8), 160),
        ]
    }

    fn feedback(unit: UnitId, target: UnitId) -> CommandFeedback {
        CommandFeedback {
            unit,
            target: Some(target),
            status: CommandStatus::Incomplete,
        }
    }

    #[test]
    fn test_bias_is_always_one() {
        let snapshot = TickSnapshot::new(3, units(Position::new(7, 1), 50, 0));
        for (a, d) in [(1, 10), (2, 11), (1, 99), (99, 10)] {
            assert_eq!(extract(a, d, &snapshot).values()[0], 1.0);
        }
    }

    #[test]
    fn test_vanished_unit_features() {
        let snapshot = TickSnapshot::new(3, units(Position::new(5, 5), 160, 160));
        assert_eq!(extract(1, 42, &snapshot), FeatureVector::VANISHED);
        assert_eq!(extract(42, 10, &snapshot), FeatureVector::VANISHED);
    }

    #[test]
    fn test_adjacent_equal_health_first_tick() {
        let snapshot = TickSnapshot::new(0, units(Position::new(5, 5), 10, 10));
        let features = extract(1, 10, &snapshot);
        assert_eq!(features, FeatureVector([1.0, 100.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_adjacent_equal_health_no_feedback() {
        let snapshot = TickSnapshot::new(4, units(Position::new(5, 5), 10, 10))
            .with_previous_turn(TurnLog::default());
        let features = extract(1, 10, &snapshot);
        assert_eq!(features, FeatureVector([1.0, 100.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_colocated_units_clamp_distance() {
        let snapshot = TickSnapshot::new(1, units(Position::new(4, 4), 10, 20));
        let features = extract(1, 10, &snapshot);
        assert_eq!(features.values()[1], 100.0);
        assert!((features.values()[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dead_defender_health_ratio() {
        let snapshot = TickSnapshot::new(1, units(Position::new(8, 4), 10, 0));
        let features = extract(1, 10, &snapshot);
        assert_eq!(features.values()[1], 25.0);
        assert_eq!(features.values()[2], 1.0);
    }

    #[test]
    fn test_follow_through_and_crowding() {
        let log = TurnLog {
            feedback: vec![feedback(1, 10), feedback(2, 10)],
            ..TurnLog::default()
        };
        let snapshot =
            TickSnapshot::new(6, units(Position::new(6, 6), 160, 160)).with_previous_turn(log);

        let same = extract(1, 10, &snapshot);
        assert_eq!(same.values()[3], 100.0);
        assert!((same.values()[4] - 0.5).abs() < 1e-12);

        let other = extract(1, 11, &snapshot);
        assert_eq!(other.values()[3], 1.0);
        assert_eq!(other.values()[4], 1.0);
    }
}
