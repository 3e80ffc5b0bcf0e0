use std::io::{self, Write};

use time::{OffsetDateTime, format_description};
use tracing::{debug, info, warn};

use crate::infra::GameObserver;
use crate::planners::rl::{EpisodeReport, Outcome, PerformanceHistory, Phase};
use crate::state::{Orders, TickSnapshot};

pub struct DefaultObserver;

/// Local time as `YYYY-MM-DD HH:MM:SS`, falling back to UTC when the offset is unknown.
fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        .ok()
        .and_then(|format| now.format(&format).ok())
        .unwrap_or_else(|| now.to_string())
}

/// Render the test-phase history as the "games played / reward" table.
pub fn render_history(history: &PerformanceHistory) -> String {
    const HEADER_GAP: usize = "-------------     ".len();

    let mut out = String::new();
    out.push_str("\nGames Played      Average Cumulative Reward\n");
    out.push_str("-------------     -------------------------\n");
    for record in history.records() {
        let games = record.episodes_played.to_string();
        out.push_str(&format!(
            "{:<width$}{:.2}\n",
            games,
            record.average_reward,
            width = HEADER_GAP
        ));
    }
    out
}

impl GameObserver for DefaultObserver {
    fn on_run_start(&mut self, episode_budget: u32) {
        info!("Run started at {}", timestamp());
        info!("- episode budget: {}", episode_budget);
    }

    fn on_episode_start(&mut self, episode: u32, phase: Phase, snapshot: &TickSnapshot) {
        let label = match phase {
            Phase::Learning => "learning",
            Phase::Testing => "testing",
        };
        info!(
            "Episode {} ({}) started with {} units",
            episode,
            label,
            snapshot.units.len()
        );
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot, orders: &Orders) {
        if !orders.is_empty() {
            debug!("tick: {}, orders: {:?}", snapshot.tick, orders);
        }
    }

    fn on_episode_finished(&mut self, episode: u32, report: &EpisodeReport) {
        let verdict = match report.outcome {
            Outcome::Victory => "VICTORY!",
            Outcome::Defeat => "DEFEAT",
        };
        info!(
            "Episode {} finished at tick {}: {} ({} vs {} survivors, mean reward {:.2})",
            episode,
            report.final_tick,
            verdict,
            report.friendly_survivors,
            report.enemy_survivors,
            report.mean_reward
        );
    }

    fn on_test_block_complete(&mut self, history: &PerformanceHistory) {
        let _ = write!(io::stdout(), "{}", render_history(history));
        let _ = writeln!(io::stdout());
    }

    fn on_store_error(&mut self, message: &str) {
        warn!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planners::rl::PhaseScheduler;

    #[test]
    fn test_render_history_table() {
        let mut scheduler = PhaseScheduler::new(1, 1);
        scheduler.on_episode_end(0.0);
        scheduler.on_episode_end(-12.5);

        let table = render_history(scheduler.history());
        assert!(table.contains("Games Played      Average Cumulative Reward"));
        assert!(table.contains(&format!("1{}-12.50\n", " ".repeat(17))));
    }
}
