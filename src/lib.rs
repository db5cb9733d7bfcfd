//! Penguin Climb - a seeded vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, game state)
//! - `session`: Fixed-timestep loop, game-over prompt and restarts
//! - `highscores`: Persistent leaderboard
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance
//! - `ui`: Text prompt state

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScores;
pub use session::{PromptOutcome, Session};
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time accepted by the accumulator (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
