mod ledger;
mod roster;
mod snapshot;

pub use ledger::{ACTION_COST, KILL_REWARD, LOSS_PENALTY, RewardLedger, step_reward};
pub use roster::{Roster, TRACKED_UNIT_TYPE};
pub use snapshot::{
    CommandFeedback, CommandStatus, DamageEvent, DeathEvent, Orders, TickSnapshot, TurnLog,
    UnitView,
};
