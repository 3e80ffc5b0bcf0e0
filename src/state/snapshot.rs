use std::collections::BTreeMap;

use crate::infra::{PlayerId, Position, UnitId};

/// A unit as seen by the controller on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitView {
    pub id: UnitId,
    pub owner: PlayerId,
    pub unit_type: String,
    pub position: Position,
    pub hp: i32,
}

impl UnitView {
    pub fn new(id: UnitId, owner: PlayerId, unit_type: &str, position: Position, hp: i32) -> Self {
        Self {
            id,
            owner,
            unit_type: unit_type.to_string(),
            position,
            hp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub amount: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathEvent {
    pub owner: PlayerId,
    pub unit: UnitId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    Incomplete,
    Failed,
}

/// Outcome of a unit's standing command on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFeedback {
    pub unit: UnitId,
    pub target: Option<UnitId>,
    pub status: CommandStatus,
}

/// Everything the simulation logged for the controlling player during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnLog {
    pub damage: Vec<DamageEvent>,
    pub deaths: Vec<DeathEvent>,
    /// Units that received a new command on that tick.
    pub issued: Vec<UnitId>,
    pub feedback: Vec<CommandFeedback>,
}

impl TurnLog {
    pub fn feedback_for(&self, unit: UnitId) -> Option<&CommandFeedback> {
        self.feedback.iter().find(|f| f.unit == unit)
    }

    pub fn was_issued(&self, unit: UnitId) -> bool {
        self.issued.contains(&unit)
    }
}

/// Immutable view of the simulation handed to the controller once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSnapshot {
    pub tick: u32,
    pub units: BTreeMap<UnitId, UnitView>,
    /// Log of the tick before this one; `None` on the first tick of an episode.
    pub previous_turn: Option<TurnLog>,
}

impl TickSnapshot {
    pub fn new(tick: u32, units: impl IntoIterator<Item = UnitView>) -> Self {
        Self {
            tick,
            units: units.into_iter().map(|u| (u.id, u)).collect(),
            previous_turn: None,
        }
    }

    pub fn with_previous_turn(mut self, log: TurnLog) -> Self {
        self.previous_turn = Some(log);
        self
    }

    pub fn is_first_tick(&self) -> bool {
        self.previous_turn.is_none()
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.get(&id)
    }

    /// Units owned by `player`, in listing order.
    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &UnitView> {
        self.units.values().filter(move |u| u.owner == player)
    }
}

/// Attack commands for one tick: attacker → target.
pub type Orders = BTreeMap<UnitId, UnitId>;
