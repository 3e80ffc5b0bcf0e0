//! Run-level evaluation metrics

use std::collections::HashMap;

use super::agent::{EpisodeReport, Outcome};
use super::phase::Phase;

#[derive(Debug, Clone, Default)]
pub struct PhaseStats {
    pub episodes: usize,
    pub victories: usize,
    pub total_reward: f64,
}

/// Aggregated outcome of every episode played.
#[derive(Debug, Clone, Default)]
pub struct EvaluationMetrics {
    pub num_episodes: usize,
    pub num_victories: usize,
    pub total_reward: f64,
    pub total_ticks: usize,
    /// Per-phase statistics
    pub phase_stats: HashMap<&'static str, PhaseStats>,
}

fn phase_key(phase: Phase) -> &'static str {
    match phase {
        Phase::Learning => "learning",
        Phase::Testing => "testing",
    }
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, report: &EpisodeReport) {
        let won = report.outcome == Outcome::Victory;

        self.num_episodes += 1;
        self.total_reward += report.mean_reward;
        self.total_ticks += report.final_tick as usize;
        if won {
            self.num_victories += 1;
        }

        let stats = self.phase_stats.entry(phase_key(report.phase)).or_default();
        stats.episodes += 1;
        stats.total_reward += report.mean_reward;
        if won {
            stats.victories += 1;
        }
    }

    pub fn num_defeats(&self) -> usize {
        self.num_episodes - self.num_victories
    }

    pub fn victory_rate(&self) -> f64 {
        if self.num_episodes > 0 {
            self.num_victories as f64 / self.num_episodes as f64
        } else {
            0.0
        }
    }

    pub fn avg_reward(&self) -> f64 {
        if self.num_episodes > 0 {
            self.total_reward / self.num_episodes as f64
        } else {
            0.0
        }
    }

    pub fn avg_ticks(&self) -> f64 {
        if self.num_episodes > 0 {
            self.total_ticks as f64 / self.num_episodes as f64
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Episodes: {}", self.num_episodes);
        tracing::info!(
            "Victories: {} / Defeats: {} ({:.1}%)",
            self.num_victories,
            self.num_defeats(),
            self.victory_rate() * 100.0
        );
        tracing::info!("Avg Reward: {:.2}", self.avg_reward());
        tracing::info!("Avg Ticks: {:.1}", self.avg_ticks());

        let mut phases: Vec<_> = self.phase_stats.keys().collect();
        phases.sort();
        for &phase in &phases {
            let stats = &self.phase_stats[phase];
            let avg_reward = if stats.episodes > 0 {
                stats.total_reward / stats.episodes as f64
            } else {
                0.0
            };
            tracing::info!(
                "  {}: {} episodes, {} victories, avg_reward={:.2}",
                phase,
                stats.episodes,
                stats.victories,
                avg_reward
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planners::rl::PhaseTransition;

    fn report(phase: Phase, outcome: Outcome, mean_reward: f64, final_tick: u32) -> EpisodeReport {
        EpisodeReport {
            phase,
            outcome,
            friendly_survivors: 1,
            enemy_survivors: 0,
            mean_reward,
            final_tick,
            transition: PhaseTransition::None,
        }
    }

    #[test]
    fn test_evaluation_metrics() {
        let mut metrics = EvaluationMetrics::new();

        metrics.record_episode(&report(Phase::Learning, Outcome::Victory, 10.0, 40));
        metrics.record_episode(&report(Phase::Testing, Outcome::Defeat, 5.0, 60));

        assert_eq!(metrics.num_episodes, 2);
        assert_eq!(metrics.num_defeats(), 1);
        assert!((metrics.avg_reward() - 7.5).abs() < 1e-9);
        assert!((metrics.victory_rate() - 0.5).abs() < 1e-9);
        assert!((metrics.avg_ticks() - 50.0).abs() < 1e-9);
        assert_eq!(metrics.phase_stats["testing"].episodes, 1);
    }
}
