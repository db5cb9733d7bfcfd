//! Data-driven game balance
//!
//! Every gameplay constant lives here so levels can be retuned from a JSON
//! file without recompiling. Missing fields fall back to the reference layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::PlatformType;

/// Size and texture key for one platform type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    /// Texture key handed to renderers, unused by the simulation
    pub texture: String,
}

impl PlatformConfig {
    fn new(width: f32, height: f32, texture: &str) -> Self {
        Self {
            width,
            height,
            texture: texture.to_string(),
        }
    }
}

/// Per-type platform configs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfigs {
    pub normal: PlatformConfig,
    pub moving: PlatformConfig,
    pub ice: PlatformConfig,
}

impl Default for PlatformConfigs {
    fn default() -> Self {
        Self {
            normal: PlatformConfig::new(100.0, 20.0, "platform"),
            moving: PlatformConfig::new(70.0, 20.0, "platformRed"),
            ice: PlatformConfig::new(100.0, 20.0, "platformIce"),
        }
    }
}

impl PlatformConfigs {
    pub fn get(&self, kind: PlatformType) -> &PlatformConfig {
        match kind {
            PlatformType::Normal => &self.normal,
            PlatformType::Moving => &self.moving,
            PlatformType::Ice => &self.ice,
        }
    }
}

/// Integer weights for the platform type draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformWeights {
    pub normal: u32,
    pub moving: u32,
    pub ice: u32,
}

impl Default for PlatformWeights {
    fn default() -> Self {
        Self {
            normal: 60,
            moving: 100,
            ice: 20,
        }
    }
}

impl PlatformWeights {
    /// Weights in draw order. The order is part of the level format.
    pub fn ordered(&self) -> [(PlatformType, u32); 3] {
        [
            (PlatformType::Normal, self.normal),
            (PlatformType::Moving, self.moving),
            (PlatformType::Ice, self.ice),
        ]
    }

    /// Sum of all weights; wide enough that no `u32` weights overflow it
    pub fn total(&self) -> u64 {
        self.normal as u64 + self.moving as u64 + self.ice as u64
    }
}

/// All tunable gameplay values.
///
/// Coordinates are screen space: y grows downward, so climbing means
/// decreasing y. Velocities are pixels per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub game_width: f32,
    pub game_height: f32,
    pub map_height: f32,
    /// Score cap; `None` derives it from the map height
    pub max_score: Option<u32>,

    // === Generation ===
    pub level_seed: String,
    pub drifter_seed: String,
    pub platform_count: u32,
    pub min_distance_y: i32,
    pub max_distance_y: i32,
    /// Accepted for config compatibility; the x window only uses the maximum
    pub min_distance_x: i32,
    pub max_distance_x: i32,
    /// Center x of the starting platform
    pub start_x: f32,
    /// Distance from the map bottom to the starting platform center
    pub start_offset_y: f32,
    /// Width lost per generation index on normal/ice platforms
    pub width_shrink_rate: f32,
    pub min_platform_width: f32,
    pub weights: PlatformWeights,
    pub platforms: PlatformConfigs,

    // === Moving platforms ===
    pub moving_speed: f32,
    /// Seconds between velocity flips on column moving platforms
    pub moving_turn_delay: f32,
    /// Separately seeded drifting platforms
    pub drifter_count: u32,
    pub drifter_travel: f32,
    /// Seconds per leg of the drifter ping-pong
    pub drifter_leg_duration: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the map bottom to the spawn point
    pub spawn_offset_y: f32,
    pub gravity: f32,
    pub movement_speed: f32,
    pub max_speed: f32,
    pub damping_factor: f32,
    pub ice_damping_factor: f32,
    /// Vertical velocity set on jump (negative is up)
    pub jump_velocity: f32,

    // === Hazard & camera ===
    pub hazard_rise_per_tick: f32,
    pub hazard_thickness: f32,
    pub camera_dead_zone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let game_width = 400.0;
        let map_height = 1200.0;
        Self {
            game_width,
            game_height: 600.0,
            map_height,
            max_score: None,

            level_seed: "penguin-climb-v1".to_string(),
            drifter_seed: "penguin-climb-moving-v1".to_string(),
            platform_count: 74,
            min_distance_y: 60,
            max_distance_y: 100,
            min_distance_x: 50,
            max_distance_x: 150,
            start_x: 200.0,
            start_offset_y: 50.0,
            width_shrink_rate: 0.5,
            min_platform_width: 50.0,
            weights: PlatformWeights::default(),
            platforms: PlatformConfigs::default(),

            moving_speed: 100.0,
            moving_turn_delay: 2.0,
            drifter_count: (map_height / 200.0) as u32,
            drifter_travel: game_width / 3.0,
            drifter_leg_duration: 2.0,

            player_width: 32.0,
            player_height: 32.0,
            spawn_offset_y: 90.0,
            gravity: 300.0,
            movement_speed: 40.0,
            max_speed: 100.0,
            damping_factor: 0.1,
            ice_damping_factor: 0.99,
            jump_velocity: -250.0,

            hazard_rise_per_tick: 0.1,
            hazard_thickness: 20.0,
            camera_dead_zone: 200.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Malformed tuning {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Score cap for a run
    pub fn max_score(&self) -> u32 {
        self.max_score
            .unwrap_or_else(|| (self.map_height / 10.0).max(0.0) as u32)
    }

    /// Y of the starting platform center
    pub fn start_y(&self) -> f32 {
        self.map_height - self.start_offset_y
    }

    /// Highest rise of a standing jump (pixels)
    pub fn max_jump_height(&self) -> f32 {
        if self.gravity <= 0.0 {
            return f32::INFINITY;
        }
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }

    /// Clamp values that would break the simulation, warning about each fix
    pub fn sanitized(mut self) -> Self {
        if self.max_speed < 0.0 {
            log::warn!("max_speed {} is negative, using its magnitude", self.max_speed);
            self.max_speed = -self.max_speed;
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            log::warn!("damping_factor {} outside [0, 1], clamping", self.damping_factor);
            self.damping_factor = self.damping_factor.clamp(0.0, 1.0);
        }
        if !(0.0..=1.0).contains(&self.ice_damping_factor) {
            log::warn!(
                "ice_damping_factor {} outside [0, 1], clamping",
                self.ice_damping_factor
            );
            self.ice_damping_factor = self.ice_damping_factor.clamp(0.0, 1.0);
        }
        if self.hazard_rise_per_tick < 0.0 {
            log::warn!("hazard_rise_per_tick cannot be negative, using 0");
            self.hazard_rise_per_tick = 0.0;
        }
        let base = self.platforms.normal.width.min(self.platforms.ice.width);
        if self.min_platform_width > base {
            log::warn!(
                "min_platform_width {} exceeds base width {}, lowering",
                self.min_platform_width,
                base
            );
            self.min_platform_width = base;
        }
        if self.moving_speed > self.max_speed {
            log::warn!(
                "moving_speed {} exceeds max_speed {}; riders will be clamped",
                self.moving_speed,
                self.max_speed
            );
        }
        if self.max_distance_y as f32 > self.max_jump_height() {
            log::warn!(
                "max_distance_y {} exceeds jump height {:.1}; some platforms may be unreachable",
                self.max_distance_y,
                self.max_jump_height()
            );
        }
        self
    }
}
