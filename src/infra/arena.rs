//! In-process skirmish between two squads of footmen

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::infra::simulation::{Simulation, SimulationError, StepResult};
use crate::infra::{Bounds, PlayerId, Position, UnitId};
use crate::state::{
    CommandFeedback, CommandStatus, DamageEvent, DeathEvent, Orders, TickSnapshot, TurnLog,
    UnitView,
};

pub const FOOTMAN_HP: i32 = 160;
pub const FOOTMAN_MIN_DAMAGE: i32 = 3;
pub const FOOTMAN_MAX_DAMAGE: i32 = 9;

const ENEMY_ID_OFFSET: UnitId = 100;

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub squad_size: u32,
    pub max_ticks: u32,
    pub player: PlayerId,
    pub enemy: PlayerId,
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            squad_size: 5,
            max_ticks: 500,
            player: 0,
            enemy: 1,
            seed: 12345,
        }
    }
}

#[derive(Debug, Clone)]
struct ArenaUnit {
    view: UnitView,
    order: Option<UnitId>,
}

pub struct Arena {
    config: ArenaConfig,
    bounds: Bounds,
    rng: StdRng,
    units: BTreeMap<UnitId, ArenaUnit>,
    tick: u32,
    previous_turn: Option<TurnLog>,
    running: bool,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let height = config.squad_size as i32 * 2 + 3;
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            bounds: Bounds::from_size(16, height),
            config,
            rng,
            units: BTreeMap::new(),
            tick: 0,
            previous_turn: None,
            running: false,
        }
    }

    fn deploy(&mut self) {
        self.units.clear();
        let right = self.bounds.max_x - 1;
        for i in 0..self.config.squad_size {
            let y = 1 + 2 * i as i32;
            let friendly = i + 1;
            let enemy = ENEMY_ID_OFFSET + i + 1;
            self.spawn(friendly, self.config.player, Position::new(1, y));
            self.spawn(enemy, self.config.enemy, Position::new(right, y));
        }
    }

    fn spawn(&mut self, id: UnitId, owner: PlayerId, position: Position) {
        let view = UnitView::new(id, owner, "Footman", position, FOOTMAN_HP);
        self.units.insert(id, ArenaUnit { view, order: None });
    }

    fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.tick,
            units: self
                .units
                .iter()
                .map(|(&id, unit)| (id, unit.view.clone()))
                .collect(),
            previous_turn: self.previous_turn.clone(),
        }
    }

    fn squad_alive(&self, player: PlayerId) -> bool {
        self.units.values().any(|u| u.view.owner == player)
    }

    fn is_over(&self) -> bool {
        !self.squad_alive(self.config.player)
            || !self.squad_alive(self.config.enemy)
            || self.tick >= self.config.max_ticks
    }

    /// Enemy units without a live target go after the nearest friendly unit.
    fn assign_enemy_targets(&mut self) {
        let friendly: Vec<(UnitId, Position)> = self
            .units
            .values()
            .filter(|u| u.view.owner == self.config.player)
            .map(|u| (u.view.id, u.view.position))
            .collect();

        let live: Vec<UnitId> = self.units.keys().copied().collect();
        for unit in self.units.values_mut() {
            if unit.view.owner != self.config.enemy {
                continue;
            }
            if unit.order.is_some_and(|t| live.contains(&t)) {
                continue;
            }
            let pos = unit.view.position;
            unit.order = friendly
                .iter()
                .min_by_key(|(id, p)| (pos.distance(p), *id))
                .map(|(id, _)| *id);
        }
    }

    fn free_step(&self, mover: UnitId, from: Position, target: Position) -> Option<Position> {
        let occupied = |pos: &Position| {
            self.units
                .values()
                .any(|u| u.view.id != mover && u.view.position == *pos)
        };

        let direct = from.step_toward(&target);
        if self.bounds.contains(&direct) && !occupied(&direct) {
            return Some(direct);
        }

        let current = from.distance(&target);
        from.neighbors()
            .into_iter()
            .filter(|p| self.bounds.contains(p) && !occupied(p))
            .filter(|p| p.distance(&target) < current)
            .min_by_key(|p| p.distance(&target))
    }

    fn resolve_tick(&mut self) -> TurnLog {
        let mut log = TurnLog::default();
        let player = self.config.player;
        let ids: Vec<UnitId> = self.units.keys().copied().collect();

        for id in ids {
            let Some(unit) = self.units.get(&id) else {
                continue; // killed earlier this tick
            };
            let Some(target_id) = unit.order else {
                continue;
            };
            let owner = unit.view.owner;
            let from = unit.view.position;

            let status = match self.units.get(&target_id).map(|t| t.view.position) {
                None => {
                    if let Some(unit) = self.units.get_mut(&id) {
                        unit.order = None;
                    }
                    CommandStatus::Failed
                }
                Some(target_pos) if from.distance(&target_pos) <= 1 => {
                    let amount = self.rng.random_range(FOOTMAN_MIN_DAMAGE..=FOOTMAN_MAX_DAMAGE);
                    log.damage.push(DamageEvent {
                        attacker: id,
                        defender: target_id,
                        amount,
                    });

                    let killed = self
                        .units
                        .get_mut(&target_id)
                        .map(|t| {
                            t.view.hp -= amount;
                            t.view.hp <= 0
                        })
                        .unwrap_or(false);

                    if killed {
                        if let Some(dead) = self.units.remove(&target_id) {
                            trace!("unit {} killed by {}", target_id, id);
                            log.deaths.push(DeathEvent {
                                owner: dead.view.owner,
                                unit: target_id,
                            });
                        }
                        if let Some(unit) = self.units.get_mut(&id) {
                            unit.order = None;
                        }
                        CommandStatus::Completed
                    } else {
                        CommandStatus::Incomplete
                    }
                }
                Some(target_pos) => {
                    if let Some(next) = self.free_step(id, from, target_pos)
                        && let Some(unit) = self.units.get_mut(&id)
                    {
                        unit.view.position = next;
                    }
                    CommandStatus::Incomplete
                }
            };

            if owner == player {
                log.feedback.push(CommandFeedback {
                    unit: id,
                    target: Some(target_id),
                    status,
                });
            }
        }

        log
    }
}

impl Simulation for Arena {
    async fn start(&mut self) -> Result<TickSnapshot, SimulationError> {
        if self.config.squad_size == 0 {
            return Err(SimulationError::StartFailed {
                reason: "squad size is zero".to_string(),
            });
        }
        self.deploy();
        self.tick = 0;
        self.previous_turn = None;
        self.running = true;
        debug!("Arena deployed {} footmen per side", self.config.squad_size);
        Ok(self.snapshot())
    }

    async fn act(&mut self, orders: &Orders) -> Result<StepResult, SimulationError> {
        if !self.running {
            return Err(SimulationError::NotStarted);
        }

        let mut issued = Vec::new();
        for (&attacker, &target) in orders {
            match self.units.get_mut(&attacker) {
                Some(unit) if unit.view.owner == self.config.player => {
                    unit.order = Some(target);
                    issued.push(attacker);
                }
                _ => trace!("Ignoring order for unit {}", attacker),
            }
        }

        self.assign_enemy_targets();
        let mut log = self.resolve_tick();
        log.issued = issued;

        self.tick += 1;
        self.previous_turn = Some(log);

        if self.is_over() {
            self.running = false;
            Ok(StepResult::Finished(self.snapshot()))
        } else {
            Ok(StepResult::Running(self.snapshot()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(result: StepResult) -> TickSnapshot {
        match result {
            StepResult::Running(snapshot) | StepResult::Finished(snapshot) => snapshot,
        }
    }

    fn config(squad_size: u32) -> ArenaConfig {
        ArenaConfig {
            squad_size,
            ..ArenaConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_deploys_both_squads() {
        let mut arena = Arena::new(config(3));
        let snapshot = arena.start().await.unwrap();

        assert_eq!(snapshot.tick, 0);
        assert!(snapshot.is_first_tick());
        assert_eq!(snapshot.units_of(0).count(), 3);
        assert_eq!(snapshot.units_of(1).count(), 3);
        assert!(snapshot.units.values().all(|u| u.hp == FOOTMAN_HP));
    }

    #[tokio::test]
    async fn test_act_before_start_fails() {
        let mut arena = Arena::new(config(1));
        assert!(matches!(
            arena.act(&Orders::new()).await,
            Err(SimulationError::NotStarted)
        ));
    }

    #[tokio::test]
    async fn test_ordered_unit_closes_in_and_reports() {
        let mut arena = Arena::new(config(1));
        arena.start().await.unwrap();

        let orders = Orders::from([(1, 101)]);
        let snapshot = snapshot_of(arena.act(&orders).await.unwrap());
        let log = snapshot.previous_turn.as_ref().unwrap();

        assert_eq!(log.issued, vec![1]);
        assert_eq!(
            log.feedback_for(1).map(|f| f.status),
            Some(CommandStatus::Incomplete)
        );
        assert_eq!(snapshot.unit(1).unwrap().position, Position::new(2, 1));
    }

    #[tokio::test]
    async fn test_duel_runs_to_completion() {
        let mut arena = Arena::new(config(1));
        arena.start().await.unwrap();

        let orders = Orders::from([(1, 101)]);
        let mut finished = None;
        for _ in 0..500 {
            match arena.act(&orders).await.unwrap() {
                StepResult::Running(_) => {}
                StepResult::Finished(snapshot) => {
                    finished = Some(snapshot);
                    break;
                }
            }
        }

        let snapshot = finished.expect("duel should end");
        let log = snapshot.previous_turn.as_ref().unwrap();
        assert_eq!(log.deaths.len(), 1);
        assert_eq!(snapshot.units.len(), 1);
    }

    #[tokio::test]
    async fn test_same_seed_same_episode() {
        let mut a = Arena::new(config(2));
        let mut b = Arena::new(config(2));
        a.start().await.unwrap();
        b.start().await.unwrap();

        let orders = Orders::from([(1, 101), (2, 101)]);
        for _ in 0..40 {
            let sa = snapshot_of(a.act(&orders).await.unwrap());
            let sb = snapshot_of(b.act(&orders).await.unwrap());
            assert_eq!(sa, sb);
        }
    }
}
