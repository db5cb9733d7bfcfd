//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within a tick
//! the order is fixed: platforms move, the player's velocity is resolved from
//! the input snapshot, physics integrates and reports contacts, the hazard
//! floor rises and checks for a kill, then score and camera update.

use super::movement::{apply_surface_flags, resolve_movement};
use super::physics::{PhysicsWorld, WorldBounds};
use super::state::{GamePhase, GameState};

/// Held input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Space or up arrow
    pub jump: bool,
}

impl TickInput {
    /// Any horizontal key held (left and right together still count)
    pub fn horizontal_held(&self) -> bool {
        self.left || self.right
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<P: PhysicsWorld + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    physics: &P,
    dt: f32,
) {
    // Frozen after death
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    for platform in &mut state.movers {
        platform.advance(dt);
    }

    // --- Movement ---
    let previous_contact = state.contact;
    if resolve_movement(
        &mut state.player,
        input,
        &previous_contact,
        &state.movers,
        &state.tuning,
    ) && !state.has_jumped
    {
        log::debug!("First jump at tick {}; hazard floor armed", state.time_ticks);
        state.has_jumped = true;
    }

    let bounds = WorldBounds {
        left: 0.0,
        right: state.tuning.game_width,
        bottom: state.tuning.map_height,
    };
    let contact = physics.step(
        &mut state.player,
        &state.platforms,
        &state.movers,
        bounds,
        dt,
    );
    apply_surface_flags(&mut state.player, &contact, input, &state.movers);
    state.contact = contact;

    // --- Hazard ---
    if state.has_jumped {
        state.hazard.raise(state.tuning.hazard_rise_per_tick);
    }
    if physics.overlaps(&state.player.aabb(), &state.hazard.aabb()) {
        enter_game_over(state);
        return;
    }

    // --- Score & camera ---
    state.score = height_score(state.score, state.player.pos.y, &state.tuning);
    state.camera.follow(state.player.pos.y);
}

/// Score for the current height, never below the previous score
pub fn height_score(previous: u32, player_y: f32, tuning: &crate::tuning::Tuning) -> u32 {
    let climbed = ((tuning.map_height - player_y) / 10.0).floor();
    let height = if climbed.is_finite() && climbed > 0.0 {
        climbed.min(u32::MAX as f32) as u32
    } else {
        0
    };
    previous.max(height).min(tuning.max_score())
}

fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.player.hit = true;
    state.player.walking = false;
    state.final_score = Some(state.score);
    log::info!(
        "Game over at tick {}: score {}, floor top at y={:.1}",
        state.time_ticks,
        state.score,
        state.hazard.top_edge()
    );
}
