//! Physics capability: gravity, integration and AABB contact reporting
//!
//! Gameplay rules never talk to a physics engine directly. They call a
//! [`PhysicsWorld`] and read back a [`ContactReport`], so the whole
//! simulation runs headless in tests.
//!
//! [`ArcadePhysics`] is the built-in implementation: axis-separable
//! move-and-slide. X is resolved first, then Y using the corrected X. A
//! solid only blocks motion if the mover started on the near side of it,
//! so platforms sliding into the player never teleport them. Moves longer
//! than the player's own extent are swept in slices (up to
//! `MAX_SWEEP_STEPS`), so fast falls cannot skip thin platforms.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Platform, PlatformType, Player};

/// Penetration below this is treated as touching, not overlapping
const EPS: f32 = 0.001;

/// Axis-aligned box stored as center + half extents (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            center: Vec2::new((left + right) / 2.0, (top + bottom) / 2.0),
            half: Vec2::new((right - left) / 2.0, (bottom - top) / 2.0),
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Strict overlap with some tolerance; shared edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right() - EPS
            && self.right() > other.left() + EPS
            && self.top() < other.bottom() - EPS
            && self.bottom() > other.top() + EPS
    }

    /// Overlap or shared edge
    pub fn touches(&self, other: &Aabb) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }
}

/// Which platform collection a contact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformGroup {
    Static,
    Moving,
}

/// The platform touched last during a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceContact {
    pub group: PlatformGroup,
    /// Index into the group's slice
    pub index: usize,
    pub platform_id: u32,
    pub kind: PlatformType,
    pub is_ice: bool,
}

/// Result of one physics step for the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReport {
    /// Something is directly below the player
    pub grounded: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_up: bool,
    /// Last normal/ice platform contacted
    pub static_contact: Option<SurfaceContact>,
    /// Last moving platform contacted
    pub moving_contact: Option<SurfaceContact>,
}

impl ContactReport {
    /// The platform touched last. The static group resolves before the
    /// moving group, so a moving contact takes precedence.
    pub fn surface(&self) -> Option<SurfaceContact> {
        self.moving_contact.or(self.static_contact)
    }

    /// Moving platform the player is standing on, if any
    pub fn standing_on_mover(&self) -> Option<SurfaceContact> {
        if self.grounded { self.moving_contact } else { None }
    }
}

/// Horizontal walls and the floor of the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Minimal physics contract the simulation relies on
pub trait PhysicsWorld {
    /// Apply gravity, integrate `player` for `dt`, resolve against `statics`
    /// then `movers`, and report contacts.
    fn step(
        &self,
        player: &mut Player,
        statics: &[Platform],
        movers: &[Platform],
        bounds: WorldBounds,
        dt: f32,
    ) -> ContactReport;

    /// Whether two bodies are in contact (shared edges count)
    fn overlaps(&self, a: &Aabb, b: &Aabb) -> bool {
        a.touches(b)
    }
}

/// Arcade-style physics: constant gravity, no bounce, solid platforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcadePhysics {
    pub gravity: f32,
}

impl ArcadePhysics {
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

impl PhysicsWorld for ArcadePhysics {
    fn step(
        &self,
        player: &mut Player,
        statics: &[Platform],
        movers: &[Platform],
        bounds: WorldBounds,
        dt: f32,
    ) -> ContactReport {
        let mut report = ContactReport::default();
        player.vel.y += self.gravity * dt;

        let groups = [(PlatformGroup::Static, statics), (PlatformGroup::Moving, movers)];
        let half = player.size * 0.5;

        // --- X axis ---
        let dx = player.vel.x * dt;
        let steps = sweep_steps(dx, player.size.x);
        for _ in 0..steps {
            if sweep_x(player, &groups, dx / steps as f32, &mut report) {
                break;
            }
        }

        // World walls
        if player.pos.x - half.x < bounds.left {
            player.pos.x = bounds.left + half.x;
            report.blocked_left = true;
        }
        if player.pos.x + half.x > bounds.right {
            player.pos.x = bounds.right - half.x;
            report.blocked_right = true;
        }
        if (report.blocked_left && player.vel.x < 0.0) || (report.blocked_right && player.vel.x > 0.0)
        {
            player.vel.x = 0.0;
        }

        // --- Y axis ---
        let dy = player.vel.y * dt;
        let steps = sweep_steps(dy, player.size.y);
        for _ in 0..steps {
            if sweep_y(player, &groups, dy / steps as f32, &mut report) {
                break;
            }
        }

        if player.pos.y + half.y >= bounds.bottom {
            player.pos.y = bounds.bottom - half.y;
            report.grounded = true;
        }
        if (report.grounded && player.vel.y > 0.0) || (report.blocked_up && player.vel.y < 0.0) {
            player.vel.y = 0.0;
        }

        report
    }
}

/// Upper bound on sweep slices per axis per step
const MAX_SWEEP_STEPS: u32 = 64;

/// Slices needed so no single move is longer than the player's extent.
/// Shorter moves cannot skip over a platform of any thickness.
fn sweep_steps(distance: f32, extent: f32) -> u32 {
    if extent <= 0.0 {
        return 1;
    }
    ((distance.abs() / extent).ceil() as u32).clamp(1, MAX_SWEEP_STEPS)
}

type Groups<'a> = [(PlatformGroup, &'a [Platform]); 2];

/// Move horizontally by `dx`, stopping at the first solid side. Returns true if blocked.
fn sweep_x(player: &mut Player, groups: &Groups, dx: f32, report: &mut ContactReport) -> bool {
    if dx == 0.0 {
        return false;
    }
    let half = player.size * 0.5;
    let start = player.aabb();
    let mut x = player.pos.x + dx;
    let mut blocked = false;
    for &(group, platforms) in groups {
        for (index, platform) in platforms.iter().enumerate() {
            let solid = platform.aabb();
            let moved = Aabb::new(Vec2::new(x, player.pos.y), half);
            if !moved.overlaps(&solid) {
                continue;
            }
            if dx > 0.0 && start.right() <= solid.left() + EPS {
                x = solid.left() - half.x;
                report.blocked_right = true;
            } else if dx < 0.0 && start.left() >= solid.right() - EPS {
                x = solid.right() + half.x;
                report.blocked_left = true;
            } else {
                continue;
            }
            blocked = true;
            report.record(group, index, platform);
        }
    }
    player.pos.x = x;
    blocked
}

/// Move vertically by `dy`, landing on or bumping the first solid face. Returns true on contact.
fn sweep_y(player: &mut Player, groups: &Groups, dy: f32, report: &mut ContactReport) -> bool {
    if dy == 0.0 {
        return false;
    }
    let half = player.size * 0.5;
    let start = player.aabb();
    let mut y = player.pos.y + dy;
    let mut hit = false;
    for &(group, platforms) in groups {
        for (index, platform) in platforms.iter().enumerate() {
            let solid = platform.aabb();
            let moved = Aabb::new(Vec2::new(player.pos.x, y), half);
            if !moved.overlaps(&solid) {
                continue;
            }
            if dy > 0.0 && start.bottom() <= solid.top() + EPS {
                y = solid.top() - half.y;
                report.grounded = true;
            } else if dy < 0.0 && start.top() >= solid.bottom() - EPS {
                y = solid.bottom() + half.y;
                report.blocked_up = true;
            } else {
                continue;
            }
            hit = true;
            report.record(group, index, platform);
        }
    }
    player.pos.y = y;
    hit
}

impl ContactReport {
    fn record(&mut self, group: PlatformGroup, index: usize, platform: &Platform) {
        let contact = SurfaceContact {
            group,
            index,
            platform_id: platform.id,
            kind: platform.kind,
            is_ice: platform.is_ice,
        };
        match group {
            PlatformGroup::Static => self.static_contact = Some(contact),
            PlatformGroup::Moving => self.moving_contact = Some(contact),
        }
    }
}
