//! Orchestration services over the board domain.

mod board;
mod simulation;

pub use board::{
    BOARD_STORAGE_KEY, BoardPersistenceError, BoardService, ExternalUpdateOutcome, ReorderOutcome,
};
pub use simulation::{ExternalActor, SimulationConfig};
