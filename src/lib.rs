//! Rogue Adventure - simulation core of a tile-based action roguelike
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, AI, spawning, screens)
//! - `tuning`: Data-driven game balance
//! - `error`: Map/tuning loading errors
//!
//! Rendering, audio and input polling live outside this crate. The
//! presentation layer reads a [`sim::GameState`] once per frame and the input
//! layer hands in a [`sim::FrameInput`].

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::LoadError;
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Health ceiling for the player
    pub const MAX_HEALTH: i32 = 10;
    /// Health at the start of a run
    pub const STARTING_HEALTH: i32 = 7;

    /// Side length of a spawn-density chunk, in tiles
    pub const CHUNK_SIZE: i32 = 20;
    /// Enemies + spinners allowed per chunk
    pub const MAX_ENEMIES_PER_CHUNK: usize = 2;
    /// Global cap, applied separately to enemies and to spinners
    pub const MAX_ENEMIES: usize = 20;
    pub const ENEMY_SPAWN_DELAY: f32 = 1.0;

    /// Random-walk cadence and speed (tiles/sec)
    pub const ENEMY_MOVE_DELAY: f32 = 0.5;
    pub const ENEMY_MOVE_SPEED: f32 = 3.0;
    /// Distance at which a walking enemy counts as arrived
    pub const ENEMY_ARRIVE_EPSILON: f32 = 0.1;

    /// Contact box half-extent for regular enemies and the charger
    pub const ENEMY_RADIUS: f32 = 0.5;
    /// Spinners are bigger targets and bigger hazards
    pub const SPINNER_RADIUS: f32 = 0.9;
    pub const SPINNER_LAUNCH_SPEED: f32 = 2.5;
    /// Blade rotation (radians/sec)
    pub const SPINNER_SPIN_RATE: f32 = 12.0;
    pub const SPINNER_MAX_FLIGHT: f32 = 4.0;

    pub const KESTREL_HOP_DELAY: f32 = 0.1;
    pub const KESTREL_REST_DELAY: f32 = 1.5;
    pub const KESTREL_HOPS: u8 = 3;
    pub const KESTREL_MOVE_SPEED: f32 = 6.0;

    pub const MINOTAUR_MOVE_DELAY: f32 = 1.0;
    pub const MINOTAUR_MOVE_SPEED: f32 = 2.0;

    /// Charger (boss)
    pub const KILLS_FOR_CHARGER: u32 = 10;
    pub const CHARGER_MOVE_INTERVAL: f32 = 0.3;
    pub const CHARGER_HEALTH: i32 = 5;
    pub const CHARGER_INVINCIBILITY: f32 = 0.5;
    pub const CHARGER_CONTACT_DAMAGE: i32 = 2;
    pub const CHARGER_KNOCKBACK: f32 = 1.5;
    pub const CHARGER_SPAWN_ATTEMPTS: u32 = 10;
    /// Charger must appear strictly farther than this (Chebyshev) from the player
    pub const CHARGER_MIN_SPAWN_DISTANCE: f32 = 3.0;

    /// Player movement
    pub const PLAYER_ACCELERATION: f32 = 24.0;
    pub const PLAYER_FRICTION: f32 = 0.9;
    pub const PLAYER_MAX_VELOCITY: f32 = 3.0;
    pub const STICK_DEADZONE: f32 = 0.2;
    pub const STICK_WEIGHT: f32 = 1.5;
    pub const INVINCIBILITY_DURATION: f32 = 1.0;

    pub const KNOCKBACK_DURATION: f32 = 0.08;
    /// Distance moved per knockback frame at strength 1.0
    pub const KNOCKBACK_STEP: f32 = 0.5;

    /// Melee
    pub const SWORD_SWING_DURATION: f32 = 0.25;
    pub const SWORD_COOLDOWN: f32 = 1.0;
    pub const SWORD_MIN_COOLDOWN: f32 = 0.3;
    pub const SWORD_REACH: i32 = 1;

    /// Ranged
    pub const CROSSBOW_COOLDOWN: f32 = 2.0;
    pub const BOLT_SPEED: f32 = 8.0;
    pub const BOLT_RANGE: f32 = 10.0;

    /// Loot and effects
    pub const EXPLOSION_DURATION: f32 = 0.5;
    pub const GOLD_FLY_DURATION: f32 = 0.3;
    pub const MAX_GOLD_ITEMS: usize = 3;
    pub const MAX_HEALTH_PICKUPS: usize = 2;
    pub const HEALTH_SPAWN_INTERVAL: f32 = 30.0;
    pub const HEALTH_PICKUP_HEAL: i32 = 20;
    pub const DEBUG_GOLD_GRANT: u32 = 100;

    /// Camera
    pub const CAMERA_DEAD_ZONE: f32 = 5.0;
    pub const CAMERA_MAX_STEP: f32 = 0.5;

    /// Emergency placement when the player starts inside a wall
    pub const WALKABLE_SEARCH_RADIUS: i32 = 20;
    pub const FALLBACK_ROOM_WIDTH: i32 = 7;
    pub const FALLBACK_ROOM_HEIGHT: i32 = 5;
}

/// Tile containing a continuous position (integer coordinates are tile centers)
#[inline]
pub fn tile_of(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

/// Center of a tile in world space
#[inline]
pub fn tile_center(tile: IVec2) -> Vec2 {
    tile.as_vec2()
}

/// Spawn-density chunk of a continuous position
#[inline]
pub fn chunk_of(pos: Vec2) -> IVec2 {
    (pos / consts::CHUNK_SIZE as f32).floor().as_ivec2()
}

/// Chebyshev (king-move) distance between two points
#[inline]
pub fn chebyshev(a: Vec2, b: Vec2) -> f32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// True if both axis deltas are strictly inside `half_extent`
#[inline]
pub fn within_box(a: Vec2, b: Vec2, half_extent: f32) -> bool {
    let d = (a - b).abs();
    d.x < half_extent && d.y < half_extent
}
