//! Data-driven game balance
//!
//! Every value here can be overridden from a JSON file; missing keys keep
//! their defaults so partial files are valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield size
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    /// Movement per frame before speed upgrades
    pub base_player_speed: f32,
    /// Bullet travel per frame
    pub bullet_speed: f32,
    /// Minimum ms between shots at fire-rate level 1
    pub fire_interval_ms: f64,
    pub base_damage: f32,
    pub magazine_size: u32,
    pub reload_ms: f64,

    // === Enemies ===
    pub drone_speed: f32,
    pub walker_speed: f32,
    /// Spawn interval (ms) at score 0
    pub spawn_interval_ms: f32,

    // === Gadget ===
    pub turret_lifespan_ms: f32,
    pub turret_cooldown_ms: f64,
    pub turret_fire_interval_ms: f64,
    pub turret_range: f32,

    // === Extraction loop ===
    /// Seconds until the extraction zone opens
    pub run_duration_secs: f32,
    /// Seconds the player must hold the zone
    pub extraction_secs: f32,
    pub extraction_radius: f32,

    // === Economy ===
    pub upgrade_base_cost: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1280.0,
            arena_height: 720.0,

            base_player_speed: 4.0,
            bullet_speed: 12.0,
            fire_interval_ms: 150.0,
            base_damage: 2.5,
            magazine_size: 30,
            reload_ms: 1500.0,

            drone_speed: 3.0,
            walker_speed: 1.0,
            spawn_interval_ms: 2000.0,

            turret_lifespan_ms: 10_000.0,
            turret_cooldown_ms: 15_000.0,
            turret_fire_interval_ms: 200.0,
            turret_range: 400.0,

            run_duration_secs: 120.0,
            extraction_secs: 5.0,
            extraction_radius: 100.0,

            upgrade_base_cost: 100,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Center of the playfield (player spawn point)
    pub fn arena_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}
