//! Extraction Run - A top-down survival and extraction arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, combat, spawning, phases)
//! - `session`: Run lifecycle, settlement and collaborator dispatch
//! - `platform`: Input mapping and the pausable game clock
//! - `persistence`: Meta-progression save record and stores
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Player body
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Enemy bodies and rewards
    pub const DRONE_RADIUS: f32 = 15.0;
    pub const DRONE_HEALTH: f32 = 3.0;
    pub const DRONE_SCORE: u64 = 10;
    pub const DRONE_EXPLOSION: u32 = 8;
    pub const DRONE_SCRAP: u32 = 1;
    pub const WALKER_RADIUS: f32 = 25.0;
    pub const WALKER_HEALTH: f32 = 12.0;
    pub const WALKER_SCORE: u64 = 50;
    pub const WALKER_EXPLOSION: u32 = 15;
    pub const WALKER_SCRAP: u32 = 5;
    /// Probability a spawned enemy is a walker
    pub const WALKER_CHANCE: f64 = 0.2;
    /// Spawn distance outside the screen edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 50.0;
    /// Health scales by (1 + score / this)
    pub const ENEMY_HEALTH_SCORE_DIVISOR: f32 = 2000.0;
    /// Fastest spawn interval (ms) regardless of score
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 500.0;
    /// Spawn interval shrinks by this many ms per point of score
    pub const SPAWN_INTERVAL_PER_SCORE_MS: f32 = 5.0;
    /// Contact drain per frame while an enemy overlaps the player
    pub const CONTACT_DAMAGE: f32 = 0.5;
    pub const CONTACT_SHAKE: f32 = 0.5;
    /// Velocity nudge between overlapping enemies
    pub const SEPARATION_PUSH: f32 = 0.1;

    /// Projectiles
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const MUZZLE_OFFSET: f32 = 35.0;
    pub const SHOT_SHAKE: f32 = 2.0;
    /// Damage bonus per damage upgrade level
    pub const DAMAGE_PER_LEVEL: f32 = 0.2;
    /// Speed bonus per speed upgrade level
    pub const SPEED_PER_LEVEL: f32 = 0.1;
    /// Turret bullets deal this fraction of base damage
    pub const TURRET_DAMAGE_FACTOR: f32 = 0.5;
    pub const TURRET_RADIUS: f32 = 15.0;

    /// Currency pickups
    pub const SCRAP_RADIUS: f32 = 6.0;
    pub const SCRAP_VALUE: u64 = 10;
    pub const SCRAP_ATTRACT_RADIUS: f32 = 50.0;
    pub const SCRAP_DAMPING: f32 = 0.95;
    pub const SCRAP_BOUNCE: f32 = -0.5;
    pub const SCRAP_MAGNET: f32 = 0.1;

    /// Effects
    pub const IMPACT_INTENSITY: u32 = 2;
    pub const EXPLOSION_SHAKE_PER_INTENSITY: f32 = 0.8;
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Level layout
    pub const OBSTACLE_CANDIDATES: usize = 20;
    pub const OBSTACLE_MIN_SIZE: f32 = 60.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 200.0;
    /// Obstacles centered closer than this to the spawn point are dropped
    pub const SPAWN_CLEARANCE: f32 = 250.0;
    pub const DECORATION_COUNT: usize = 50;
    pub const DECORATION_MIN_SIZE: f32 = 5.0;
    pub const DECORATION_MAX_SIZE: f32 = 15.0;
    /// Fraction of decorations drawn as rubble (the rest are craters)
    pub const RUBBLE_CHANCE: f64 = 0.8;

    /// Extraction zone placement
    pub const ZONE_MARGIN: f32 = 100.0;
    pub const ZONE_PLACEMENT_ATTEMPTS: u32 = 100;
}

/// Angle (radians) of the direction from `from` toward `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Uniform value in `[min, max)`; returns `min` when the range is empty
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}
