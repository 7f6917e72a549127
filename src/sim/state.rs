//! Game state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives in
//! [`GameState`], which is also the single owner of the seeded RNG.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::TileMap;
use super::shop::ShopState;
use super::spawner;
use crate::consts::*;
use crate::tile_center;
use crate::tuning::Tuning;

/// Which modal screen is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Menu,
    Adventure,
    Shop,
    Bestiary,
    CharacterSet,
    DevTesting,
}

/// Progress of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdventurePhase {
    #[default]
    Exploring,
    /// Health hit zero; the world is frozen until a key is pressed
    Defeated,
}

/// Cardinal facing, +y is down the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Dominant axis of a vector; ties go horizontal. `None` for zero.
    pub fn from_vec(v: Vec2) -> Option<Self> {
        if v == Vec2::ZERO {
            return None;
        }
        Some(if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    /// True if `target` lies strictly on this side of `origin`
    pub fn faces(self, origin: Vec2, target: Vec2) -> bool {
        match self {
            Direction::Up => target.y < origin.y,
            Direction::Down => target.y > origin.y,
            Direction::Left => target.x < origin.x,
            Direction::Right => target.x > origin.x,
        }
    }
}

/// Forced displacement after taking a hit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Knockback {
    pub active: bool,
    pub direction: Direction,
    /// Multiplier on the per-frame step
    pub strength: f32,
    pub timer: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    /// Aim for sword and crossbow
    pub facing: Direction,
    pub health: i32,
    pub max_health: i32,
    pub gold: u32,
    /// Seconds of invincibility left
    pub invincibility_timer: f32,
    pub knockback: Knockback,
}

impl Player {
    pub fn new(position: Vec2, health: i32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            facing: Direction::default(),
            health: health.clamp(0, MAX_HEALTH),
            max_health: MAX_HEALTH,
            gold: 0,
            invincibility_timer: 0.0,
            knockback: Knockback::default(),
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }

    pub fn tile(&self) -> IVec2 {
        crate::tile_of(self.position)
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sword {
    pub swinging: bool,
    pub swing_time: f32,
    pub swing_direction: Direction,
    /// A target was struck during the current swing
    pub hit_landed: bool,
    pub cooldown_timer: f32,
    pub cooldown_duration: f32,
    pub reach: i32,
}

impl Sword {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            swinging: false,
            swing_time: 0.0,
            swing_direction: Direction::default(),
            hit_landed: false,
            cooldown_timer: 0.0,
            cooldown_duration: tuning.sword_cooldown,
            reach: tuning.sword_reach,
        }
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown_timer > 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown_duration;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossbow {
    pub owned: bool,
    pub cooldown_timer: f32,
    pub cooldown_duration: f32,
}

impl Crossbow {
    pub fn on_cooldown(&self) -> bool {
        self.cooldown_timer > 0.0
    }
}

/// A crossbow bolt in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bolt {
    pub position: Vec2,
    pub direction: Direction,
    pub distance_traveled: f32,
}

/// Burst-hop bookkeeping for kestrels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KestrelState {
    /// Hops left before the next rest
    pub hops_left: u8,
}

impl Default for KestrelState {
    fn default() -> Self {
        Self {
            hops_left: KESTREL_HOPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinnerState {
    /// Travel heading once launched (radians)
    pub direction_angle: f32,
    /// Blade rotation, purely visual
    pub spin_angle: f32,
    pub move_speed: f32,
    /// Seconds since the last launch
    pub flight_time: f32,
}

/// Enemy behaviour variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Plain random walker
    Cedilla,
    /// Random walker that hops in quick bursts
    Kestrel(KestrelState),
    /// Slow stalker that closes in on the player
    Minotaur,
    /// Blade that sits still until struck, then flies off
    Spinner(SpinnerState),
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Cedilla => "cedilla",
            EnemyKind::Kestrel(_) => "kestrel",
            EnemyKind::Minotaur => "minotaur",
            EnemyKind::Spinner(_) => "spinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Vec2,
    pub target: Vec2,
    pub alive: bool,
    pub moving: bool,
    pub move_timer: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(kind: EnemyKind, tile: IVec2) -> Self {
        let position = tile_center(tile);
        Self {
            position,
            target: position,
            alive: true,
            moving: false,
            move_timer: 0.0,
            kind,
        }
    }

    pub fn spinner(tile: IVec2, direction_angle: f32) -> Self {
        Self::new(
            EnemyKind::Spinner(SpinnerState {
                direction_angle,
                spin_angle: 0.0,
                move_speed: 0.0,
                flight_time: 0.0,
            }),
            tile,
        )
    }

    pub fn is_spinner(&self) -> bool {
        matches!(self.kind, EnemyKind::Spinner(_))
    }

    /// Half-extent of the contact and hit box
    pub fn radius(&self) -> f32 {
        if self.is_spinner() { SPINNER_RADIUS } else { ENEMY_RADIUS }
    }

    pub fn contact_damage(&self) -> i32 {
        match self.kind {
            EnemyKind::Minotaur => 2,
            _ => 1,
        }
    }

    pub fn knockback_strength(&self) -> f32 {
        match self.kind {
            EnemyKind::Minotaur => 1.5,
            _ => 1.0,
        }
    }
}

/// The boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charger {
    pub position: Vec2,
    pub move_timer: f32,
    /// Displayed health, `max_health - hit_count`
    pub health: i32,
    pub max_health: i32,
    pub hit_count: i32,
    pub invincibility_timer: f32,
}

impl Charger {
    pub fn new(tile: IVec2, max_health: i32) -> Self {
        Self {
            position: tile_center(tile),
            move_timer: 0.0,
            health: max_health,
            max_health,
            hit_count: 0,
            invincibility_timer: 0.0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldPile {
    pub position: Vec2,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPickup {
    pub position: Vec2,
}

/// Death effect; drops gold when it burns out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub position: Vec2,
    pub timer: f32,
}

/// Gold travelling to the purse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyingGold {
    pub start: Vec2,
    pub value: u32,
    pub timer: f32,
}

/// On-screen announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    /// Seconds shown so far
    pub timer: f32,
}

/// Things that happened this frame, for sound/flash hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScreenChanged { from: Screen, to: Screen },
    EnemySpawned { position: Vec2, kind: EnemyKind },
    EnemyKilled { position: Vec2 },
    SpinnerLaunched { position: Vec2 },
    SpinnerShattered { position: Vec2 },
    PlayerDamaged { amount: i32, health: i32 },
    PlayerDefeated,
    ChargerSpawned { position: Vec2 },
    ChargerHit { health: i32 },
    ChargerDefeated { position: Vec2 },
    BoltFired { direction: Direction },
    GoldCollected { value: u32 },
    GoldBanked { value: u32, total: u32 },
    HealthCollected { health: i32 },
    ItemPurchased { id: String, price: u32 },
    QuitRequested,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub map: TileMap,
    pub screen: Screen,
    pub phase: AdventurePhase,
    /// Simulation tick counter
    pub time_ticks: u64,

    pub player: Player,
    pub sword: Sword,
    pub crossbow: Crossbow,
    pub bolts: Vec<Bolt>,

    /// Regular enemies and spinners, in spawn order
    pub enemies: Vec<Enemy>,
    pub charger: Option<Charger>,
    pub enemies_killed: u32,

    pub gold_items: Vec<GoldPile>,
    pub health_pickups: Vec<HealthPickup>,
    pub explosions: Vec<Explosion>,
    pub flying_gold: Vec<FlyingGold>,

    pub camera: Vec2,
    pub shop: ShopState,
    pub banner: Option<Banner>,

    pub spawn_timer: f32,
    pub health_spawn_timer: f32,
    /// Debug toggles
    pub spawn_enabled: bool,
    pub movement_enabled: bool,
    /// The walkable-start check has run for this run
    pub entered_adventure: bool,
    /// CRT post-processing toggle, read by the presentation layer
    pub crt_enabled: bool,
    pub quit_requested: bool,

    /// Cleared at the start of every tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on `map`, sitting at the menu with a fresh run ready
    pub fn new(map: TileMap, tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(Vec2::ZERO, tuning.starting_health);
        let sword = Sword::new(&tuning);
        let crossbow = Crossbow {
            owned: false,
            cooldown_timer: 0.0,
            cooldown_duration: tuning.crossbow_cooldown,
        };
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            map,
            screen: Screen::Menu,
            phase: AdventurePhase::Exploring,
            time_ticks: 0,
            player,
            sword,
            crossbow,
            bolts: Vec::new(),
            enemies: Vec::new(),
            charger: None,
            enemies_killed: 0,
            gold_items: Vec::new(),
            health_pickups: Vec::new(),
            explosions: Vec::new(),
            flying_gold: Vec::new(),
            camera: Vec2::ZERO,
            shop: ShopState::stocked(),
            banner: None,
            spawn_timer: 0.0,
            health_spawn_timer: 0.0,
            spawn_enabled: true,
            movement_enabled: true,
            entered_adventure: false,
            crt_enabled: true,
            quit_requested: false,
            events: Vec::new(),
        };
        state.start_run();
        state
    }

    /// Reset everything run-scoped: player, weapons, entities, shop.
    /// The map (including any carved rooms) and the RNG stream carry over.
    pub fn start_run(&mut self) {
        let start = self
            .map
            .floor_tiles()
            .collect::<Vec<_>>()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(IVec2::ZERO);

        self.player = Player::new(tile_center(start), self.tuning.starting_health);
        self.sword = Sword::new(&self.tuning);
        self.crossbow = Crossbow {
            owned: false,
            cooldown_timer: 0.0,
            cooldown_duration: self.tuning.crossbow_cooldown,
        };
        self.bolts.clear();
        self.enemies.clear();
        self.charger = None;
        self.enemies_killed = 0;
        self.gold_items.clear();
        self.health_pickups.clear();
        self.explosions.clear();
        self.flying_gold.clear();
        self.camera = self.player.position;
        self.shop = ShopState::stocked();
        self.banner = None;
        self.spawn_timer = 0.0;
        self.health_spawn_timer = 0.0;
        self.phase = AdventurePhase::Exploring;
        self.entered_adventure = false;

        spawner::try_spawn_enemy(self);
        for _ in 0..self.tuning.max_gold_items {
            spawner::spawn_gold(self);
        }
        log::info!("New run started at ({}, {})", start.x, start.y);
    }

    /// Switch screens, recording the change
    pub fn set_screen(&mut self, to: Screen) {
        if self.screen == to {
            return;
        }
        let from = self.screen;
        self.screen = to;
        log::info!("Screen {:?} -> {:?}", from, to);
        self.events.push(GameEvent::ScreenChanged { from, to });
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive && !e.is_spinner()).count()
    }

    pub fn live_spinner_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive && e.is_spinner()).count()
    }

    /// Drop dead enemies, keeping spawn order
    pub fn prune_dead(&mut self) {
        self.enemies.retain(|e| e.alive);
    }
}
