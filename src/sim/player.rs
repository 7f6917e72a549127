//! Player movement, damage and pickups

use glam::{IVec2, Vec2};

use super::input::FrameInput;
use super::state::{AdventurePhase, Direction, FlyingGold, GameEvent, GameState, Knockback};
use crate::consts::*;
use crate::{chebyshev, tile_center};

/// Velocities below this are snapped to rest
const REST_SPEED: f32 = 0.001;

/// Move the player for one frame. Returns true if the position changed.
pub fn update_player(state: &mut GameState, input: &FrameInput, dt: f32) -> bool {
    let player = &mut state.player;
    let map = &state.map;
    let tuning = &state.tuning;
    player.previous_position = player.position;

    if player.knockback.active {
        let kb = &mut player.knockback;
        kb.timer += dt;
        if kb.timer < tuning.knockback_duration {
            let next = player.position + kb.direction.unit() * tuning.knockback_step * kb.strength;
            if map.is_walkable_at(next) {
                player.position = next;
            } else {
                *kb = Knockback::default();
            }
        }
        if kb.timer >= tuning.knockback_duration {
            *kb = Knockback::default();
        }
        player.velocity = Vec2::ZERO;
        return player.position != player.previous_position;
    }

    let mut accel = input.held_direction().normalize_or_zero();
    if input.stick.length() > STICK_DEADZONE {
        accel += input.stick * STICK_WEIGHT;
    }
    player.velocity += accel * tuning.player_acceleration * dt;
    player.velocity *= tuning.player_friction;
    player.velocity = player.velocity.clamp_length_max(tuning.player_max_velocity);
    if player.velocity.length() < REST_SPEED {
        player.velocity = Vec2::ZERO;
    }

    if let Some(facing) = Direction::from_vec(player.velocity) {
        player.facing = facing;
    }

    // One axis at a time so walls can be slid along
    let step_x = player.position + Vec2::new(player.velocity.x * dt, 0.0);
    if map.is_walkable_at(step_x) {
        player.position = step_x;
    } else {
        player.velocity.x = 0.0;
    }
    let step_y = player.position + Vec2::new(0.0, player.velocity.y * dt);
    if map.is_walkable_at(step_y) {
        player.position = step_y;
    } else {
        player.velocity.y = 0.0;
    }

    player.position != player.previous_position
}

/// Start a knockback pushing the player away from `source`
pub fn apply_knockback(state: &mut GameState, source: Vec2, strength: f32) {
    let player = &mut state.player;
    let delta = player.position - source;
    let direction = if delta.x.abs() < 0.1 && delta.y.abs() < 0.1 {
        player.facing.opposite()
    } else if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    player.knockback = Knockback {
        active: true,
        direction,
        strength,
        timer: 0.0,
    };
}

/// Hurt the player unless invincible. Grants invincibility, knocks back and
/// flips the run to defeated when health runs out. Returns true if applied.
pub fn damage_player(state: &mut GameState, amount: i32, source: Vec2, strength: f32) -> bool {
    if state.player.is_invincible() || state.phase == AdventurePhase::Defeated {
        return false;
    }
    state.player.take_damage(amount);
    state.player.invincibility_timer = state.tuning.invincibility_duration;
    apply_knockback(state, source, strength);
    state.events.push(GameEvent::PlayerDamaged {
        amount,
        health: state.player.health,
    });
    log::debug!("Player hit for {} ({} left)", amount, state.player.health);

    if state.player.is_dead() {
        state.phase = AdventurePhase::Defeated;
        state.player.knockback = Knockback::default();
        state.player.velocity = Vec2::ZERO;
        state.events.push(GameEvent::PlayerDefeated);
        log::info!("Player defeated with {} gold", state.player.gold);
    }
    true
}

pub fn update_invincibility(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    if player.invincibility_timer > 0.0 {
        player.invincibility_timer = (player.invincibility_timer - dt).max(0.0);
    }
}

/// Pick up the first gold pile within reach; it flies to the purse
pub fn collect_gold(state: &mut GameState) -> bool {
    let pos = state.player.position;
    let Some(index) = state
        .gold_items
        .iter()
        .position(|g| chebyshev(g.position, pos) <= 1.0)
    else {
        return false;
    };
    let pile = state.gold_items.remove(index);
    state.flying_gold.push(FlyingGold {
        start: pile.position,
        value: pile.value,
        timer: 0.0,
    });
    state.events.push(GameEvent::GoldCollected { value: pile.value });
    true
}

/// Send `amount` gold to the purse from the player's position
pub fn grant_gold(state: &mut GameState, amount: u32) {
    state.flying_gold.push(FlyingGold {
        start: state.player.position,
        value: amount,
        timer: 0.0,
    });
}

/// Bank flying gold whose animation has finished
pub fn update_flying_gold(state: &mut GameState, dt: f32) {
    let duration = state.tuning.gold_fly_duration;
    let mut banked = Vec::new();
    state.flying_gold.retain_mut(|g| {
        g.timer += dt;
        if g.timer >= duration {
            banked.push(g.value);
            false
        } else {
            true
        }
    });
    for value in banked {
        state.player.gold = state.player.gold.saturating_add(value);
        state.events.push(GameEvent::GoldBanked {
            value,
            total: state.player.gold,
        });
    }
}

/// Consume the first health pickup within reach
pub fn collect_health(state: &mut GameState) -> bool {
    let pos = state.player.position;
    let Some(index) = state
        .health_pickups
        .iter()
        .position(|h| chebyshev(h.position, pos) <= 1.0)
    else {
        return false;
    };
    state.health_pickups.remove(index);
    state.player.heal(state.tuning.health_pickup_heal);
    state.events.push(GameEvent::HealthCollected {
        health: state.player.health,
    });
    true
}

/// Make sure the player is standing somewhere walkable, searching outward
/// ring by ring and carving a room as a last resort
pub fn ensure_walkable_start(state: &mut GameState) {
    let origin = state.player.tile();
    if state.map.is_walkable(origin) {
        return;
    }

    let found = (1..=WALKABLE_SEARCH_RADIUS).find_map(|r| {
        (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| IVec2::new(dx, dy)))
            .filter(|d| d.x.abs() == r || d.y.abs() == r)
            .map(|d| origin + d)
            .find(|tile| state.map.is_walkable(*tile))
    });

    let tile = match found {
        Some(tile) => tile,
        None => {
            log::warn!(
                "No walkable tile within {} of ({}, {}); carving a room",
                WALKABLE_SEARCH_RADIUS,
                origin.x,
                origin.y
            );
            state
                .map
                .carve_room(origin, FALLBACK_ROOM_WIDTH, FALLBACK_ROOM_HEIGHT)
        }
    };
    state.player.position = tile_center(tile);
    state.player.previous_position = state.player.position;
    state.player.velocity = Vec2::ZERO;
    state.camera = state.player.position;
}
