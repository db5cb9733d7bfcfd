//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same tuning and input sequence,
//! the simulation produces identical results.

pub mod level;
pub mod movement;
pub mod physics;
pub mod rng;
pub mod state;
pub mod tick;

pub use level::{Level, generate_level, pick_platform_type};
pub use physics::{Aabb, ArcadePhysics, ContactReport, PhysicsWorld, WorldBounds};
pub use rng::SeededRng;
pub use state::{GamePhase, GameState, Motion, Platform, PlatformType, Player};
pub use tick::{TickInput, tick};
