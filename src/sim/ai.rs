//! Enemy behaviour
//!
//! Each enemy kind advances through one `advance` call per frame and reports
//! what it did to the player. Damage is applied afterwards by
//! [`resolve_contacts`], so the player takes at most one hit per frame.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::SliceRandom;

use super::map::TileMap;
use super::player;
use super::state::{Charger, Enemy, EnemyKind, GameEvent, GameState, SpinnerState};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{tile_center, tile_of, within_box};

/// King-move neighbours
const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Read-only world view for one AI step
pub struct AiContext<'a> {
    pub map: &'a TileMap,
    pub tuning: &'a Tuning,
    pub player: Vec2,
    pub movement_enabled: bool,
    pub dt: f32,
}

/// An entity touching the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub source: Vec2,
    pub damage: i32,
    pub knockback: f32,
}

/// Outcome of one enemy step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effects {
    pub contact: Option<Contact>,
    /// A flying spinner broke apart this step
    pub shattered: bool,
}

impl Enemy {
    /// Advance one frame according to kind
    pub fn advance<R: Rng + ?Sized>(&mut self, ctx: &AiContext, rng: &mut R) -> Effects {
        let mut effects = Effects::default();
        if !self.alive {
            return effects;
        }

        match self.kind {
            EnemyKind::Cedilla => {
                if ctx.movement_enabled {
                    let (delay, speed) = (ctx.tuning.enemy_move_delay, ctx.tuning.enemy_move_speed);
                    if self.idle_until(delay, ctx.dt) {
                        self.pick_random_target(ctx.map, rng);
                    }
                    self.step_toward_target(ctx.map, speed, ctx.dt);
                }
            }
            EnemyKind::Kestrel(mut kestrel) => {
                if ctx.movement_enabled {
                    let delay = if kestrel.hops_left == 0 {
                        KESTREL_REST_DELAY
                    } else {
                        KESTREL_HOP_DELAY
                    };
                    if self.idle_until(delay, ctx.dt) {
                        if kestrel.hops_left == 0 {
                            kestrel.hops_left = KESTREL_HOPS;
                        }
                        self.pick_random_target(ctx.map, rng);
                    }
                    if self.step_toward_target(ctx.map, KESTREL_MOVE_SPEED, ctx.dt) {
                        kestrel.hops_left = kestrel.hops_left.saturating_sub(1);
                    }
                    self.kind = EnemyKind::Kestrel(kestrel);
                }
            }
            EnemyKind::Minotaur => {
                if ctx.movement_enabled {
                    if self.idle_until(MINOTAUR_MOVE_DELAY, ctx.dt) {
                        self.pick_target_toward(ctx.map, ctx.player);
                    }
                    self.step_toward_target(ctx.map, MINOTAUR_MOVE_SPEED, ctx.dt);
                }
            }
            EnemyKind::Spinner(mut spinner) => {
                effects.shattered = self.fly(&mut spinner, ctx);
                self.kind = EnemyKind::Spinner(spinner);
            }
        }

        if self.alive && within_box(self.position, ctx.player, self.radius()) {
            effects.contact = Some(Contact {
                source: self.position,
                damage: self.contact_damage(),
                knockback: self.knockback_strength(),
            });
        }
        effects
    }

    /// Count idle time; true when the wait is over and a new move should start
    fn idle_until(&mut self, delay: f32, dt: f32) -> bool {
        if self.moving {
            return false;
        }
        self.move_timer += dt;
        if self.move_timer >= delay {
            self.move_timer = 0.0;
            true
        } else {
            false
        }
    }

    /// Target the first walkable neighbour in a shuffled order; stays idle if
    /// boxed in
    fn pick_random_target<R: Rng + ?Sized>(&mut self, map: &TileMap, rng: &mut R) {
        let tile = tile_of(self.position);
        let mut dirs = NEIGHBOURS;
        dirs.shuffle(rng);
        if let Some(next) = dirs.iter().map(|d| tile + *d).find(|t| map.is_walkable(*t)) {
            self.target = tile_center(next);
            self.moving = true;
        }
    }

    /// Target the walkable neighbour nearest to `goal`
    fn pick_target_toward(&mut self, map: &TileMap, goal: Vec2) {
        let tile = tile_of(self.position);
        let best = NEIGHBOURS
            .iter()
            .map(|d| tile + *d)
            .filter(|t| map.is_walkable(*t))
            .min_by(|a, b| {
                let da = tile_center(*a).distance_squared(goal);
                let db = tile_center(*b).distance_squared(goal);
                da.total_cmp(&db)
            });
        if let Some(next) = best {
            self.target = tile_center(next);
            self.moving = true;
        }
    }

    /// Interpolate toward the target. Snaps on arrival and halts in place if
    /// the next step would enter a wall. Returns true when the move ended.
    fn step_toward_target(&mut self, map: &TileMap, speed: f32, dt: f32) -> bool {
        if !self.moving {
            return false;
        }
        let to_target = self.target - self.position;
        let dist = to_target.length();
        let step = speed * dt;
        if dist < ENEMY_ARRIVE_EPSILON || step >= dist {
            self.position = self.target;
            self.moving = false;
            return true;
        }
        let next = self.position + to_target / dist * step;
        if !map.is_walkable_at(next) {
            self.moving = false;
            return true;
        }
        self.position = next;
        false
    }

    /// Spin, and fly if launched. Returns true if the spinner shattered.
    fn fly(&mut self, spinner: &mut SpinnerState, ctx: &AiContext) -> bool {
        spinner.spin_angle = (spinner.spin_angle + SPINNER_SPIN_RATE * ctx.dt) % TAU;
        if !self.moving || !ctx.movement_enabled {
            return false;
        }
        spinner.flight_time += ctx.dt;
        let next = self.position + Vec2::from_angle(spinner.direction_angle) * spinner.move_speed * ctx.dt;
        if spinner.flight_time > SPINNER_MAX_FLIGHT || !ctx.map.is_walkable_at(next) {
            self.alive = false;
            self.moving = false;
            return true;
        }
        self.position = next;
        false
    }

    /// Send a spinner flying along `direction`. No-op for other kinds.
    pub fn launch(&mut self, direction: Vec2) {
        if let EnemyKind::Spinner(ref mut spinner) = self.kind {
            spinner.direction_angle = direction.y.atan2(direction.x);
            spinner.move_speed = SPINNER_LAUNCH_SPEED;
            spinner.flight_time = 0.0;
            self.moving = true;
        }
    }
}

impl Charger {
    /// Pursue the player one tile at a time, horizontal first
    pub fn advance(&mut self, ctx: &AiContext) -> Option<Contact> {
        self.invincibility_timer = (self.invincibility_timer - ctx.dt).max(0.0);

        if ctx.movement_enabled {
            self.move_timer += ctx.dt;
            if self.move_timer >= ctx.tuning.charger_move_interval {
                self.move_timer = 0.0;
                let delta = ctx.player - self.position;
                let sign = |v: f32| {
                    if v > 0.5 {
                        1.0
                    } else if v < -0.5 {
                        -1.0
                    } else {
                        0.0
                    }
                };
                let step_x = Vec2::new(sign(delta.x), 0.0);
                let step_y = Vec2::new(0.0, sign(delta.y));
                if step_x != Vec2::ZERO && ctx.map.is_walkable_at(self.position + step_x) {
                    self.position += step_x;
                } else if step_y != Vec2::ZERO && ctx.map.is_walkable_at(self.position + step_y) {
                    self.position += step_y;
                }
            }
        }

        within_box(self.position, ctx.player, ENEMY_RADIUS).then_some(Contact {
            source: self.position,
            damage: CHARGER_CONTACT_DAMAGE,
            knockback: CHARGER_KNOCKBACK,
        })
    }
}

/// Advance every enemy and the charger. Returns the contacts made this frame
/// in update order.
pub fn update_enemies(state: &mut GameState, dt: f32) -> Vec<Contact> {
    let ctx = AiContext {
        map: &state.map,
        tuning: &state.tuning,
        player: state.player.position,
        movement_enabled: state.movement_enabled,
        dt,
    };
    let mut contacts = Vec::new();

    for enemy in state.enemies.iter_mut() {
        let effects = enemy.advance(&ctx, &mut state.rng);
        if effects.shattered {
            log::debug!("Spinner shattered at {}", enemy.position);
            state.events.push(GameEvent::SpinnerShattered {
                position: enemy.position,
            });
        }
        contacts.extend(effects.contact);
    }
    if let Some(charger) = state.charger.as_mut() {
        contacts.extend(charger.advance(&ctx));
    }

    state.prune_dead();
    contacts
}

/// Apply the first contact that lands; the invincibility it grants blocks
/// the rest
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) {
    for contact in contacts {
        if player::damage_player(state, contact.damage, contact.source, contact.knockback) {
            break;
        }
    }
}
