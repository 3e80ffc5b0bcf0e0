use crate::state::{CommandStatus, Roster, TurnLog};

/// Whether the previous tick warrants recomputing targets.
///
/// True on the first tick, after any death, after damage to a tracked
/// friendly unit, or while a tracked friendly unit's command is unfinished.
pub fn has_event(previous_turn: Option<&TurnLog>, roster: &Roster) -> bool {
    let Some(log) = previous_turn else {
        return true;
    };

    if !log.deaths.is_empty() {
        return true;
    }

    if log.damage.iter().any(|d| roster.is_friendly(d.defender)) {
        return true;
    }

    log.feedback
        .iter()
        .any(|f| roster.is_friendly(f.unit) && f.status == CommandStatus::Incomplete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::state::{CommandFeedback, DamageEvent, DeathEvent, TickSnapshot, UnitView};

    fn roster() -> Roster {
        let snapshot = TickSnapshot::new(
            0,
            vec![
                UnitView::new(1, 0, "footman", Position::new(0, 0), 160),
                UnitView::new(10, 1, "footman", Position::new(3, 3), 160),
            ],
        );
        let mut roster = Roster::new();
        roster.initialize(&snapshot, 0, 1);
        roster
    }

    #[test]
    fn test_first_tick_is_event() {
        assert!(has_event(None, &roster()));
    }

    #[test]
    fn test_quiet_tick_is_not_event() {
        let log = TurnLog {
            feedback: vec![CommandFeedback {
                unit: 1,
                target: Some(10),
                status: CommandStatus::Completed,
            }],
            ..TurnLog::default()
        };
        assert!(!has_event(Some(&log), &roster()));
        assert!(!has_event(Some(&TurnLog::default()), &roster()));
    }

    #[test]
    fn test_death_is_event() {
        let log = TurnLog {
            deaths: vec![DeathEvent { owner: 1, unit: 10 }],
            ..TurnLog::default()
        };
        assert!(has_event(Some(&log), &roster()));
    }

    #[test]
    fn test_damage_only_counts_against_friendlies() {
        let roster = roster();
        let outgoing = TurnLog {
            damage: vec![DamageEvent {
                attacker: 1,
                defender: 10,
                amount: 6,
            }],
            ..TurnLog::default()
        };
        assert!(!has_event(Some(&outgoing), &roster));

        let incoming = TurnLog {
            damage: vec![DamageEvent {
                attacker: 10,
                defender: 1,
                amount: 6,
            }],
            ..TurnLog::default()
        };
        assert!(has_event(Some(&incoming), &roster));
    }

    #[test]
    fn test_incomplete_command_is_event() {
        let log = TurnLog {
            feedback: vec![CommandFeedback {
                unit: 1,
                target: Some(10),
                status: CommandStatus::Incomplete,
            }],
            ..TurnLog::default()
        };
        assert!(has_event(Some(&log), &roster()));
    }
}
