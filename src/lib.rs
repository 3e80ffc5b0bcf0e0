pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use infra::{Arena, Position, RunConfig};
pub use planners::rl::{LearningConfig, QAgent, RLGameRunner};
pub use state::{Orders, TickSnapshot};
