use crate::infra::PlayerId;

/// Learning parameters of the Q-learning agent
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Discount factor
    pub gamma: f64,
    /// Step size of the weight update
    pub learning_rate: f64,
    /// Probability of a random target outside the first tick
    pub epsilon: f64,
    /// Learning episodes per block
    pub learning_block: u32,
    /// Testing episodes per block
    pub testing_block: u32,
    /// Player the agent controls
    pub player: PlayerId,
    /// Opposing player
    pub enemy: PlayerId,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            learning_rate: 0.0001,
            epsilon: 0.02,
            learning_block: 10,
            testing_block: 5,
            player: 0,
            enemy: 1,
        }
    }
}
