//! Game balance knobs
//!
//! Loaded from JSON so balance can be tweaked without a rebuild. Every field
//! falls back to the matching constant in [`crate::consts`], so a file only
//! needs to list what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LoadError;

/// Tunable gameplay numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub starting_health: i32,
    /// Acceleration from a fully held direction (tiles/sec²)
    pub player_acceleration: f32,
    /// Velocity multiplier applied once per frame
    pub player_friction: f32,
    pub player_max_velocity: f32,
    pub invincibility_duration: f32,
    pub knockback_duration: f32,
    pub knockback_step: f32,

    // === Weapons ===
    pub sword_swing_duration: f32,
    pub sword_cooldown: f32,
    pub sword_reach: i32,
    pub crossbow_cooldown: f32,
    pub bolt_speed: f32,
    pub bolt_range: f32,

    // === Enemies ===
    pub enemy_spawn_delay: f32,
    pub max_enemies: usize,
    pub enemy_move_delay: f32,
    pub enemy_move_speed: f32,
    pub kills_for_charger: u32,
    pub charger_move_interval: f32,
    pub charger_health: i32,
    pub charger_invincibility: f32,

    // === Loot ===
    pub explosion_duration: f32,
    pub gold_fly_duration: f32,
    pub max_gold_items: usize,
    pub max_health_pickups: usize,
    pub health_spawn_interval: f32,
    pub health_pickup_heal: i32,

    // === Camera ===
    pub camera_dead_zone: f32,
    pub camera_max_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_health: STARTING_HEALTH,
            player_acceleration: PLAYER_ACCELERATION,
            player_friction: PLAYER_FRICTION,
            player_max_velocity: PLAYER_MAX_VELOCITY,
            invincibility_duration: INVINCIBILITY_DURATION,
            knockback_duration: KNOCKBACK_DURATION,
            knockback_step: KNOCKBACK_STEP,

            sword_swing_duration: SWORD_SWING_DURATION,
            sword_cooldown: SWORD_COOLDOWN,
            sword_reach: SWORD_REACH,
            crossbow_cooldown: CROSSBOW_COOLDOWN,
            bolt_speed: BOLT_SPEED,
            bolt_range: BOLT_RANGE,

            enemy_spawn_delay: ENEMY_SPAWN_DELAY,
            max_enemies: MAX_ENEMIES,
            enemy_move_delay: ENEMY_MOVE_DELAY,
            enemy_move_speed: ENEMY_MOVE_SPEED,
            kills_for_charger: KILLS_FOR_CHARGER,
            charger_move_interval: CHARGER_MOVE_INTERVAL,
            charger_health: CHARGER_HEALTH,
            charger_invincibility: CHARGER_INVINCIBILITY,

            explosion_duration: EXPLOSION_DURATION,
            gold_fly_duration: GOLD_FLY_DURATION,
            max_gold_items: MAX_GOLD_ITEMS,
            max_health_pickups: MAX_HEALTH_PICKUPS,
            health_spawn_interval: HEALTH_SPAWN_INTERVAL,
            health_pickup_heal: HEALTH_PICKUP_HEAL,

            camera_dead_zone: CAMERA_DEAD_ZONE,
            camera_max_step: CAMERA_MAX_STEP,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Clamp values that would break simulation invariants
    fn sanitized(mut self) -> Self {
        self.starting_health = self.starting_health.clamp(1, MAX_HEALTH);
        self.player_friction = self.player_friction.clamp(0.0, 1.0);
        self.sword_reach = self.sword_reach.max(1);
        self.charger_health = self.charger_health.max(1);
        self.kills_for_charger = self.kills_for_charger.max(1);
        self
    }
}
