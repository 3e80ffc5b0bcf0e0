use std::error::Error;
use std::fmt;

use crate::state::{Orders, TickSnapshot};

#[derive(Debug)]
pub enum SimulationError {
    NotStarted,
    StartFailed { reason: String },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::NotStarted => write!(formatter, "No episode in progress"),
            SimulationError::StartFailed { reason } => {
                write!(formatter, "Start failed ({})", reason)
            }
        }
    }
}

impl Error for SimulationError {}

/// Result of advancing the simulation by one tick.
#[derive(Debug, Clone)]
pub enum StepResult {
    Running(TickSnapshot),
    /// The episode is over; this is its last snapshot.
    Finished(TickSnapshot),
}

/// The turn-based simulation the controller plays against.
#[allow(async_fn_in_trait)]
pub trait Simulation {
    /// Reset and return the first tick of a new episode.
    async fn start(&mut self) -> Result<TickSnapshot, SimulationError>;

    /// Apply `orders` and advance one tick.
    async fn act(&mut self, orders: &Orders) -> Result<StepResult, SimulationError>;
}
