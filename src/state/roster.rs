use tracing::{debug, warn};

use crate::infra::{PlayerId, UnitId};
use crate::state::{DeathEvent, TickSnapshot};

/// The only unit type the controller commands or targets.
pub const TRACKED_UNIT_TYPE: &str = "footman";

/// Live friendly and enemy unit ids for the current episode, in listing order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    friendly: Vec<UnitId>,
    enemy: Vec<UnitId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both rosters from the snapshot's unit listing.
    pub fn initialize(&mut self, snapshot: &TickSnapshot, friendly: PlayerId, enemy: PlayerId) {
        self.friendly = Self::collect(snapshot, friendly);
        self.enemy = Self::collect(snapshot, enemy);
        debug!(
            "Roster initialized: {} friendly, {} enemy",
            self.friendly.len(),
            self.enemy.len()
        );
    }

    fn collect(snapshot: &TickSnapshot, player: PlayerId) -> Vec<UnitId> {
        snapshot
            .units_of(player)
            .filter_map(|unit| {
                if unit.unit_type.eq_ignore_ascii_case(TRACKED_UNIT_TYPE) {
                    Some(unit.id)
                } else {
                    warn!("Unknown unit type: {} (unit {})", unit.unit_type, unit.id);
                    None
                }
            })
            .collect()
    }

    /// Drop every reported dead unit. Returns the friendly ids that were removed.
    pub fn remove_dead(&mut self, deaths: &[DeathEvent]) -> Vec<UnitId> {
        let mut removed = Vec::new();
        for death in deaths {
            if let Some(idx) = self.friendly.iter().position(|&id| id == death.unit) {
                removed.push(self.friendly.remove(idx));
            } else if let Some(idx) = self.enemy.iter().position(|&id| id == death.unit) {
                self.enemy.remove(idx);
            } else {
                warn!(
                    "Unknown unit killed: {} (player {})",
                    death.unit, death.owner
                );
            }
        }
        removed
    }

    pub fn friendly(&self) -> &[UnitId] {
        &self.friendly
    }

    pub fn enemy(&self) -> &[UnitId] {
        &self.enemy
    }

    pub fn is_friendly(&self, id: UnitId) -> bool {
        self.friendly.contains(&id)
    }

    pub fn is_enemy(&self, id: UnitId) -> bool {
        self.enemy.contains(&id)
    }
}
