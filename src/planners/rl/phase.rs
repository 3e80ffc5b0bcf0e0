//! Learning/testing phase schedule

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Learning,
    /// Weights are frozen and episodes only measure performance.
    Testing,
}

/// What changed at an episode boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseTransition {
    None,
    EnteredTesting,
    /// A testing block finished with this average reward; learning resumes.
    CompletedTestBlock(f64),
}

/// Average test reward recorded after a block of testing episodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceRecord {
    /// Learning episodes played before the block.
    pub episodes_played: u32,
    pub average_reward: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceHistory {
    records: Vec<PerformanceRecord>,
}

impl PerformanceHistory {
    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&PerformanceRecord> {
        self.records.last()
    }

    fn push(&mut self, record: PerformanceRecord) {
        self.records.push(record);
    }
}

#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    learning_block: u32,
    testing_block: u32,
    phase: Phase,
    learning_in_block: u32,
    testing_in_block: u32,
    episodes_played: u32,
    running_test_reward: f64,
    history: PerformanceHistory,
}

impl PhaseScheduler {
    pub fn new(learning_block: u32, testing_block: u32) -> Self {
        Self {
            learning_block,
            testing_block,
            phase: Phase::Learning,
            learning_in_block: 0,
            testing_in_block: 0,
            episodes_played: 0,
            running_test_reward: 0.0,
            history: PerformanceHistory::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_frozen(&self) -> bool {
        self.phase == Phase::Testing
    }

    /// Learning episodes completed over the whole run.
    pub fn episodes_played(&self) -> u32 {
        self.episodes_played
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    /// Close the current episode. `mean_reward` is only used while testing.
    pub fn on_episode_end(&mut self, mean_reward: f64) -> PhaseTransition {
        match self.phase {
            Phase::Learning => {
                self.learning_in_block += 1;
                self.episodes_played += 1;
                if self.learning_in_block >= self.learning_block {
                    self.learning_in_block = 0;
                    self.phase = Phase::Testing;
                    info!(
                        "Entering testing phase after {} learning episodes",
                        self.episodes_played
                    );
                    return PhaseTransition::EnteredTesting;
                }
                PhaseTransition::None
            }
            Phase::Testing => {
                self.testing_in_block += 1;
                self.running_test_reward += mean_reward;
                if self.testing_in_block >= self.testing_block {
                    let average = self.running_test_reward / self.testing_block as f64;
                    self.history.push(PerformanceRecord {
                        episodes_played: self.episodes_played,
                        average_reward: average,
                    });
                    self.testing_in_block = 0;
                    self.running_test_reward = 0.0;
                    self.phase = Phase::Learning;
                    info!("Test block complete: average reward {:.2}", average);
                    return PhaseTransition::CompletedTestBlock(average);
                }
                PhaseTransition::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezes_after_ten_learning_episodes() {
        let mut scheduler = PhaseScheduler::new(10, 5);
        for _ in 0..9 {
            assert_eq!(scheduler.on_episode_end(0.0), PhaseTransition::None);
            assert!(!scheduler.is_frozen());
        }
        assert_eq!(scheduler.on_episode_end(0.0), PhaseTransition::EnteredTesting);
        assert!(scheduler.is_frozen());
        assert_eq!(scheduler.episodes_played(), 10);
    }

    #[test]
    fn test_testing_block_records_mean() {
        let mut scheduler = PhaseScheduler::new(10, 5);
        for _ in 0..10 {
            scheduler.on_episode_end(999.0);
        }

        let rewards = [10.0, -20.0, 30.0, 5.0, 25.0];
        for &reward in &rewards[..4] {
            assert_eq!(scheduler.on_episode_end(reward), PhaseTransition::None);
            assert!(scheduler.is_frozen());
        }
        assert_eq!(
            scheduler.on_episode_end(rewards[4]),
            PhaseTransition::CompletedTestBlock(10.0)
        );

        assert!(!scheduler.is_frozen());
        assert_eq!(scheduler.history().len(), 1);
        assert_eq!(
            scheduler.history().last(),
            Some(&PerformanceRecord {
                episodes_played: 10,
                average_reward: 10.0
            })
        );
        // Testing episodes do not count toward the learning total.
        assert_eq!(scheduler.episodes_played(), 10);
    }

    #[test]
    fn test_second_cycle_resets_running_sum() {
        let mut scheduler = PhaseScheduler::new(10, 5);
        for cycle in 0..2 {
            for _ in 0..10 {
                scheduler.on_episode_end(0.0);
            }
            for _ in 0..5 {
                scheduler.on_episode_end(cycle as f64 * 4.0);
            }
        }

        let records = scheduler.history().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].episodes_played, 10);
        assert_eq!(records[0].average_reward, 0.0);
        assert_eq!(records[1].episodes_played, 20);
        assert_eq!(records[1].average_reward, 4.0);
    }
}
