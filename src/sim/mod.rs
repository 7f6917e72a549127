//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Caller-supplied frame delta only
//! - Seeded RNG only (stored in the state, so snapshots resume identically)
//! - Stable iteration order (entity vectors are scanned front to back)
//! - No rendering or platform dependencies

pub mod ai;
pub mod camera;
pub mod combat;
pub mod input;
pub mod map;
pub mod player;
pub mod shop;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ai::{AiContext, Contact, Effects};
pub use input::{FrameInput, Key, MenuOption};
pub use map::TileMap;
pub use shop::{ShopCategory, ShopEffect, ShopItem, ShopState};
pub use state::{
    AdventurePhase, Banner, Bolt, Charger, Crossbow, Direction, Enemy, EnemyKind, Explosion,
    FlyingGold, GameEvent, GameState, GoldPile, HealthPickup, KestrelState, Knockback, Player,
    Screen, SpinnerState, Sword,
};
pub use tick::{idle, tick};
