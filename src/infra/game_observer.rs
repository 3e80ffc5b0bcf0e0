use crate::planners::rl::{EpisodeReport, Phase, PerformanceHistory};
use crate::state::{Orders, TickSnapshot};

/// Trait for observing the run as it progresses
pub trait GameObserver {
    /// Called once before the first episode
    fn on_run_start(&mut self, episode_budget: u32);

    /// Called when an episode starts
    fn on_episode_start(&mut self, episode: u32, phase: Phase, snapshot: &TickSnapshot);

    /// Called every tick with the orders issued for it (possibly none)
    fn on_tick(&mut self, snapshot: &TickSnapshot, orders: &Orders);

    /// Called when an episode finishes
    fn on_episode_finished(&mut self, episode: u32, report: &EpisodeReport);

    /// Called when a block of testing episodes completes
    fn on_test_block_complete(&mut self, history: &PerformanceHistory);

    /// Called when persistence fails; the run continues in memory
    fn on_store_error(&mut self, _message: &str) {
        // Default implementation does nothing
    }
}
