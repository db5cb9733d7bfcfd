//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; a restart replaces it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{Level, generate_level};
use super::physics::{Aabb, ContactReport};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player touched the hazard floor; simulation frozen
    GameOver,
}

/// Platform behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    Normal,
    Moving,
    Ice,
}

/// How a platform moves after placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Static,
    /// Constant speed with a periodic sign flip
    Reversal {
        origin: Vec2,
        speed: f32,
        turn_delay: f32,
        timer: f32,
    },
    /// Linear ping-pong between `origin_x` and `origin_x + travel`
    Tween {
        origin_x: f32,
        travel: f32,
        leg_duration: f32,
        elapsed: f32,
    },
}

/// A platform entity. `pos` is the center; the collision footprint is `size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformType,
    /// Position in the generated column (None for drifters)
    pub column_index: Option<u32>,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Slippery surface
    pub is_ice: bool,
    pub motion: Motion,
}

impl Platform {
    pub fn new_static(id: u32, kind: PlatformType, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            column_index: None,
            pos,
            size,
            vel: Vec2::ZERO,
            is_ice: kind == PlatformType::Ice,
            motion: Motion::Static,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size * 0.5)
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Move a platform along its motion for `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        match &mut self.motion {
            Motion::Static => {}
            Motion::Reversal {
                origin,
                speed,
                turn_delay,
                timer,
            } => {
                self.pos += self.vel * dt;
                *timer += dt;
                if *turn_delay <= 0.0 {
                    return;
                }
                while *timer >= *turn_delay {
                    *timer -= *turn_delay;
                    if self.vel.x == 0.0 {
                        // Stalled: restart from the origin heading forward
                        self.pos = *origin;
                        self.vel.x = *speed;
                    } else {
                        self.vel.x = -self.vel.x;
                    }
                }
            }
            Motion::Tween {
                origin_x,
                travel,
                leg_duration,
                elapsed,
            } => {
                if *leg_duration <= 0.0 {
                    return;
                }
                *elapsed = (*elapsed + dt) % (2.0 * *leg_duration);
                let t = *elapsed / *leg_duration;
                let leg_speed = *travel / *leg_duration;
                if t < 1.0 {
                    self.pos.x = *origin_x + *travel * t;
                    self.vel.x = leg_speed;
                } else {
                    self.pos.x = *origin_x + *travel * (2.0 - t);
                    self.vel.x = -leg_speed;
                }
            }
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_moving_platform: bool,
    pub on_ice_platform: bool,
    /// Horizontal input held this tick (drives the walk animation)
    pub walking: bool,
    /// Set when the hazard floor got the player
    pub hit: bool,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            on_moving_platform: false,
            on_ice_platform: false,
            walking: false,
            hit: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size * 0.5)
    }

    /// Render scale (the sprite shrinks on death)
    pub fn scale(&self) -> f32 {
        if self.hit { 0.75 } else { 1.0 }
    }
}

/// Rising floor anchored at the bottom of the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardFloor {
    /// How far the floor has risen since level start
    pub rise: f32,
    pub thickness: f32,
    pub width: f32,
    /// World y the floor is anchored to
    pub base_y: f32,
}

impl HazardFloor {
    pub fn new(width: f32, base_y: f32, thickness: f32) -> Self {
        Self {
            rise: 0.0,
            thickness,
            width,
            base_y,
        }
    }

    pub fn top_edge(&self) -> f32 {
        self.base_y - self.thickness / 2.0 - self.rise
    }

    pub fn aabb(&self) -> Aabb {
        let top = self.top_edge();
        let bottom = self.base_y + self.thickness / 2.0;
        Aabb::from_edges(0.0, top, self.width, bottom)
    }

    pub fn raise(&mut self, amount: f32) {
        self.rise += amount.max(0.0);
    }
}

/// One-way vertical camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World y of the top of the view
    pub scroll_y: f32,
    pub dead_zone: f32,
}

impl Camera {
    pub fn new(scroll_y: f32, dead_zone: f32) -> Self {
        Self {
            scroll_y,
            dead_zone,
        }
    }

    /// Scroll up when the target rises into the dead zone. Never scrolls down.
    pub fn follow(&mut self, target_y: f32) {
        if target_y < self.scroll_y + self.dead_zone {
            self.scroll_y = target_y - self.dead_zone;
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Normal and ice platforms (tested first in contact resolution)
    pub platforms: Vec<Platform>,
    /// Column moving platforms and drifters
    pub movers: Vec<Platform>,
    pub hazard: HazardFloor,
    pub score: u32,
    /// Score recorded on entering GameOver
    pub final_score: Option<u32>,
    /// Gates the hazard floor
    pub has_jumped: bool,
    pub camera: Camera,
    /// Contacts from the most recent physics step
    pub contact: ContactReport,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Build a fresh run: generate the level and spawn the player
    pub fn new(tuning: Tuning) -> Self {
        let Level {
            platforms,
            movers,
            hazard,
        } = generate_level(&tuning);

        let spawn = Vec2::new(tuning.start_x, tuning.map_height - tuning.spawn_offset_y);
        let player = Player::new(
            spawn,
            Vec2::new(tuning.player_width, tuning.player_height),
        );
        let camera = Camera::new(
            (tuning.map_height - tuning.game_height).max(0.0),
            tuning.camera_dead_zone,
        );

        Self {
            tuning,
            phase: GamePhase::Running,
            player,
            platforms,
            movers,
            hazard,
            score: 0,
            final_score: None,
            has_jumped: false,
            camera,
            contact: ContactReport::default(),
            time_ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// All platforms of the generated column, bottom to top
    pub fn column(&self) -> Vec<&Platform> {
        let mut column: Vec<&Platform> = self
            .platforms
            .iter()
            .chain(self.movers.iter())
            .filter(|p| p.column_index.is_some())
            .collect();
        column.sort_by_key(|p| p.column_index);
        column
    }
}
