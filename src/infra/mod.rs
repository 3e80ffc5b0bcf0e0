mod arena;
mod config;
mod default_observer;
mod game_observer;
mod simulation;
mod store;
mod types;

pub use arena::{Arena, ArenaConfig, FOOTMAN_HP};
pub use config::{DEFAULT_HISTORY_PATH, DEFAULT_WEIGHTS_PATH, RunConfig};
pub use default_observer::{DefaultObserver, render_history};
pub use game_observer::GameObserver;
pub use simulation::{Simulation, SimulationError, StepResult};
pub use store::{AgentStore, FileStore, MemoryStore, StoreError};
pub use types::{Bounds, PlayerId, Position, UnitId};
