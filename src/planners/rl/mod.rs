//! Reinforcement learning planner using linear-approximation Q-learning
//!
//! Every friendly footman picks an enemy to attack. Targets are scored by a
//! linear Q-function over five hand-crafted features, chosen epsilon-greedily,
//! and the weights are trained online during learning blocks and frozen
//! during testing blocks.
//!
//! # Architecture
//!
//! ```text
//! TickSnapshot
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bookkeeping                                                │
//! │  - RewardLedger accumulates per-unit reward                 │
//! │  - Roster drops units that died last tick                   │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  has_event()                                                │
//! │  - Decide after deaths, hits taken or incomplete commands   │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Policy                                                     │
//! │  - features::extract() → q_value() per enemy                │
//! │  - epsilon-greedy target selection                          │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  td_update() unless the PhaseScheduler has frozen learning  │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//!  Orders
//! ```

pub mod agent;
pub mod config;
pub mod events;
pub mod features;
pub mod game;
pub mod metrics;
pub mod phase;
pub mod policy;
pub mod q_function;
pub mod random;

// Re-export commonly used types
pub use agent::{EpisodeReport, Outcome, QAgent};
pub use config::LearningConfig;
pub use events::has_event;
pub use features::{FeatureVector, NUM_FEATURES};
pub use game::{RLGameRunner, initial_weights};
pub use metrics::EvaluationMetrics;
pub use phase::{Phase, PhaseScheduler, PhaseTransition, PerformanceHistory, PerformanceRecord};
pub use policy::{Selection, select_target};
pub use q_function::{Weights, best_q_value, q_value, td_update};
pub use random::{RandomSource, seeded};
