use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::infra::{ArenaConfig, PlayerId};

pub const DEFAULT_WEIGHTS_PATH: &str = "agent_weights/weights.txt";
pub const DEFAULT_HISTORY_PATH: &str = "outputs/rewards.csv";

/// Run settings read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Learning episodes after which the run stops
    pub episodes: u32,
    /// Start from the weight file instead of random weights
    pub load_weights: bool,
    pub weights_path: PathBuf,
    pub history_path: PathBuf,
    /// Seed of the agent's exploration and weight initialization
    pub seed: u64,
    /// Seed of the arena's damage rolls
    pub arena_seed: u64,
    /// Footmen per side in the arena
    pub squad_size: u32,
    /// Arena tick limit per episode
    pub max_ticks: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: 10,
            load_weights: false,
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            seed: 12345,
            arena_seed: 12346,
            squad_size: 5,
            max_ticks: 500,
        }
    }
}

fn get_env_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

impl RunConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let episodes = get_env_var::<u32>("SKIRMBOT_EPISODES").unwrap_or_else(|| {
            warn!(
                "Number of episodes not specified. Defaulting to {} episodes.",
                defaults.episodes
            );
            defaults.episodes
        });

        let load_weights = get_env_var::<bool>("SKIRMBOT_LOAD_WEIGHTS").unwrap_or_else(|| {
            warn!("Load weights not specified. Defaulting to random weights.");
            false
        });

        let seed = get_env_var("SKIRMBOT_SEED").unwrap_or(defaults.seed);

        Self {
            episodes,
            load_weights,
            weights_path: env::var("SKIRMBOT_WEIGHTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.weights_path),
            history_path: env::var("SKIRMBOT_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_path),
            seed,
            arena_seed: get_env_var("SKIRMBOT_ARENA_SEED").unwrap_or(seed.wrapping_add(1)),
            squad_size: get_env_var("SKIRMBOT_SQUAD_SIZE").unwrap_or(defaults.squad_size),
            max_ticks: get_env_var("SKIRMBOT_MAX_TICKS").unwrap_or(defaults.max_ticks),
        }
    }

    pub fn arena_config(&self, player: PlayerId, enemy: PlayerId) -> ArenaConfig {
        ArenaConfig {
            squad_size: self.squad_size,
            max_ticks: self.max_ticks,
            player,
            enemy,
            seed: self.arena_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planners::rl::{RandomSource, seeded};

    #[test]
    fn test_run_config_default() {
        let config = RunConfig::default();
        assert_eq!(config.episodes, 10);
        assert!(!config.load_weights);
        assert_eq!(config.weights_path, PathBuf::from("agent_weights/weights.txt"));
        assert_eq!(config.history_path, PathBuf::from("outputs/rewards.csv"));
    }

    #[test]
    fn test_arena_rolls_independent_of_agent_draws() {
        let config = RunConfig::default();
        let arena = config.arena_config(0, 1);
        assert_ne!(arena.seed, config.seed);

        let mut agent_rng = seeded(config.seed);
        let mut arena_rng = seeded(arena.seed);
        let agent_draws: Vec<f64> = (0..3).map(|_| agent_rng.next_uniform()).collect();
        let arena_draws: Vec<f64> = (0..3).map(|_| arena_rng.next_uniform()).collect();
        assert_ne!(agent_draws, arena_draws);
    }
}
