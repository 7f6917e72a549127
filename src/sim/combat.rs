//! Sword, crossbow and the kill -> explosion -> gold chain

use glam::Vec2;
use rand::Rng;

use super::spawner;
use super::state::{Bolt, Explosion, GameEvent, GameState, GoldPile};
use crate::consts::*;
use crate::{chebyshev, within_box};

/// Bolt proximity needed to strike a target
const BOLT_HIT_RADIUS: f32 = 0.5;
/// Gold piles dropped by a defeated charger
const CHARGER_GOLD_PILES: usize = 3;

/// True if `target` is inside sword reach on the side the player faces.
/// Larger targets (`radius` above half a tile) extend the reach.
pub fn sword_reaches(state: &GameState, target: Vec2, radius: f32) -> bool {
    let player = state.player.position;
    let reach = state.sword.reach as f32 + (radius - ENEMY_RADIUS);
    chebyshev(player, target) <= reach && state.player.facing.faces(player, target)
}

/// Begin a swing on an attack press. Ignored mid-swing or on cooldown.
pub fn start_swing(state: &mut GameState) -> bool {
    let sword = &mut state.sword;
    if sword.swinging || sword.on_cooldown() {
        return false;
    }
    sword.swinging = true;
    sword.swing_time = 0.0;
    sword.swing_direction = state.player.facing;
    sword.hit_landed = false;
    check_sword_hits(state);
    true
}

/// Resolve the active swing against everything in reach.
///
/// Kills at most one regular enemy; the charger and every spinner are tested
/// on their own. Runs on the attack press and again after each frame the
/// player moves while the swing is out. Returns true on any hit.
pub fn check_sword_hits(state: &mut GameState) -> bool {
    if !state.sword.swinging {
        return false;
    }
    let mut hit = false;

    let victim = state
        .enemies
        .iter()
        .position(|e| e.alive && !e.is_spinner() && sword_reaches(state, e.position, e.radius()));
    if let Some(index) = victim {
        kill_enemy(state, index);
        hit = true;
    }

    if let Some(charger) = state.charger {
        if sword_reaches(state, charger.position, ENEMY_RADIUS) && hit_charger(state) {
            hit = true;
        }
    }

    let player = state.player.position;
    let facing = state.player.facing.unit();
    let spinners: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive && e.is_spinner() && sword_reaches(state, e.position, e.radius()))
        .map(|(i, _)| i)
        .collect();
    for index in spinners {
        let spinner = &mut state.enemies[index];
        let away = (spinner.position - player).normalize_or(facing);
        spinner.launch(away);
        state.events.push(GameEvent::SpinnerLaunched {
            position: spinner.position,
        });
        hit = true;
    }

    if hit {
        state.sword.hit_landed = true;
        state.sword.start_cooldown();
    }
    hit
}

/// Swing and cooldown timers. A swing that ends without a hit starts the
/// cooldown when it ends.
pub fn update_sword(state: &mut GameState, dt: f32) {
    let sword = &mut state.sword;
    if sword.cooldown_timer > 0.0 {
        sword.cooldown_timer = (sword.cooldown_timer - dt).max(0.0);
    }
    if sword.swinging {
        sword.swing_time += dt;
        if sword.swing_time >= state.tuning.sword_swing_duration {
            sword.swinging = false;
            sword.swing_time = 0.0;
            if !sword.hit_landed {
                sword.start_cooldown();
            }
        }
    }
}

/// Kill a regular enemy: explosion now, gold when it burns out
pub fn kill_enemy(state: &mut GameState, index: usize) {
    let Some(enemy) = state.enemies.get_mut(index) else {
        return;
    };
    if !enemy.alive {
        return;
    }
    enemy.alive = false;
    enemy.moving = false;
    let position = enemy.position;

    state.explosions.push(Explosion {
        position,
        timer: 0.0,
    });
    state.enemies_killed += 1;
    state.events.push(GameEvent::EnemyKilled { position });
    log::debug!("Enemy killed at {} ({} kills)", position, state.enemies_killed);

    spawner::try_spawn_charger(state);
}

/// Land a hit on the charger unless it is in its post-hit window.
/// Returns true if the hit counted.
pub fn hit_charger(state: &mut GameState) -> bool {
    let Some(charger) = state.charger.as_mut() else {
        return false;
    };
    if charger.is_invincible() {
        return false;
    }
    charger.hit_count += 1;
    charger.health = charger.max_health - charger.hit_count;
    charger.invincibility_timer = state.tuning.charger_invincibility;
    let (health, position, dead) = (charger.health, charger.position, charger.hit_count >= charger.max_health);
    state.events.push(GameEvent::ChargerHit { health });
    log::debug!("Charger hit ({} left)", health);

    if dead {
        state.charger = None;
        state.banner = None;
        state.explosions.push(Explosion {
            position,
            timer: 0.0,
        });
        for i in 0..CHARGER_GOLD_PILES {
            let offset = Vec2::new(i as f32 - 1.0, 0.0);
            let spot = if state.map.is_walkable_at(position + offset) {
                position + offset
            } else {
                position
            };
            let value = state.rng.random_range(10..=20);
            state.gold_items.push(GoldPile {
                position: spot,
                value,
            });
        }
        state.events.push(GameEvent::ChargerDefeated { position });
        log::info!("Charger defeated");
    }
    true
}

/// Loose a bolt along the facing direction
pub fn fire_crossbow(state: &mut GameState) -> bool {
    let crossbow = &mut state.crossbow;
    if !crossbow.owned || crossbow.on_cooldown() {
        return false;
    }
    crossbow.cooldown_timer = crossbow.cooldown_duration;
    let direction = state.player.facing;
    state.bolts.push(Bolt {
        position: state.player.position,
        direction,
        distance_traveled: 0.0,
    });
    state.events.push(GameEvent::BoltFired { direction });
    true
}

pub fn update_crossbow(state: &mut GameState, dt: f32) {
    let crossbow = &mut state.crossbow;
    if crossbow.cooldown_timer > 0.0 {
        crossbow.cooldown_timer = (crossbow.cooldown_timer - dt).max(0.0);
    }
}

/// Fly bolts; a bolt is spent on its first hit, past its range, or off the map
pub fn update_bolts(state: &mut GameState, dt: f32) {
    let step = state.tuning.bolt_speed * dt;
    let range = state.tuning.bolt_range;
    let max = Vec2::new(state.map.width() as f32 - 1.0, state.map.height() as f32 - 1.0);

    let mut i = 0;
    while i < state.bolts.len() {
        let bolt = &mut state.bolts[i];
        bolt.position += bolt.direction.unit() * step;
        bolt.distance_traveled += step;
        let Bolt {
            position,
            distance_traveled,
            ..
        } = *bolt;

        let victim = state
            .enemies
            .iter()
            .position(|e| e.alive && !e.is_spinner() && within_box(position, e.position, BOLT_HIT_RADIUS));
        let spent = if let Some(index) = victim {
            kill_enemy(state, index);
            true
        } else if state
            .charger
            .is_some_and(|c| within_box(position, c.position, BOLT_HIT_RADIUS))
        {
            hit_charger(state);
            true
        } else {
            distance_traveled > range
                || position.x < 0.0
                || position.y < 0.0
                || position.x > max.x
                || position.y > max.y
        };

        if spent {
            state.bolts.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Burn down explosions; each drops a 3-7 gold pile when it expires
pub fn update_explosions(state: &mut GameState, dt: f32) {
    let duration = state.tuning.explosion_duration;
    let mut expired = Vec::new();
    state.explosions.retain_mut(|e| {
        e.timer += dt;
        if e.timer >= duration {
            expired.push(e.position);
            false
        } else {
            true
        }
    });
    for position in expired {
        let value = state.rng.random_range(3..=7);
        state.gold_items.push(GoldPile { position, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::map::TileMap;
    use crate::sim::state::{Charger, Direction, Enemy, EnemyKind};
    use glam::IVec2;

    fn arena() -> GameState {
        let row = ".".repeat(20);
        let map = TileMap::parse(&vec![row; 12].join("\n")).unwrap();
        let mut state = GameState::new(map, Tuning::default(), 77);
        state.enemies.clear();
        state.gold_items.clear();
        state.events.clear();
        state.player.position = Vec2::new(5.0, 5.0);
        state.player.facing = Direction::Right;
        state
    }

    fn cedilla_at(state: &mut GameState, x: i32, y: i32) {
        state.enemies.push(Enemy::new(EnemyKind::Cedilla, IVec2::new(x, y)));
    }

    #[test]
    fn test_sword_hits_in_front_only() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        cedilla_at(&mut state, 4, 5);
        assert!(start_swing(&mut state));
        assert!(!state.enemies[0].alive);
        assert!(state.enemies[1].alive);
        assert_eq!(state.enemies_killed, 1);
    }

    #[test]
    fn test_sword_behind_misses() {
        let mut state = arena();
        cedilla_at(&mut state, 4, 5);
        start_swing(&mut state);
        assert!(state.enemies[0].alive);
        assert!(!state.sword.on_cooldown());
    }

    #[test]
    fn test_one_regular_kill_per_check() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        cedilla_at(&mut state, 6, 4);
        start_swing(&mut state);
        assert_eq!(state.enemies.iter().filter(|e| e.alive).count(), 1);
    }

    #[test]
    fn test_reach_upgrade_extends_sword() {
        let mut state = arena();
        cedilla_at(&mut state, 7, 5);
        start_swing(&mut state);
        assert!(state.enemies[0].alive);

        let mut state = arena();
        state.sword.reach = 2;
        cedilla_at(&mut state, 7, 5);
        start_swing(&mut state);
        assert!(!state.enemies[0].alive);
    }

    #[test]
    fn test_swing_gated_by_swing_and_cooldown() {
        let mut state = arena();
        assert!(start_swing(&mut state));
        assert!(!start_swing(&mut state));
        // Miss: cooldown starts when the swing ends
        for _ in 0..20 {
            update_sword(&mut state, SIM_DT);
        }
        assert!(!state.sword.swinging);
        assert!(state.sword.on_cooldown());
        assert!(!start_swing(&mut state));
        update_sword(&mut state, SWORD_COOLDOWN);
        assert!(start_swing(&mut state));
    }

    #[test]
    fn test_hit_starts_cooldown_immediately() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        start_swing(&mut state);
        assert!(state.sword.swinging);
        assert!(state.sword.on_cooldown());
    }

    #[test]
    fn test_recheck_after_move_scores_again() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        start_swing(&mut state);
        cedilla_at(&mut state, 7, 5);
        state.player.position = Vec2::new(6.0, 5.0);
        assert!(check_sword_hits(&mut state));
        assert_eq!(state.enemies_killed, 2);
    }

    #[test]
    fn test_spinner_is_launched_not_killed() {
        let mut state = arena();
        state.enemies.push(Enemy::spinner(IVec2::new(6, 5), 0.0));
        assert!(start_swing(&mut state));
        let spinner = state.enemies[0];
        assert!(spinner.alive);
        assert!(spinner.moving);
        match spinner.kind {
            EnemyKind::Spinner(s) => assert!(s.direction_angle.abs() < 1e-5),
            _ => unreachable!(),
        }
        assert_eq!(state.enemies_killed, 0);
    }

    #[test]
    fn test_spinner_and_enemy_hit_in_same_swing() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        state.enemies.push(Enemy::spinner(IVec2::new(6, 5), 1.0));
        start_swing(&mut state);
        assert!(!state.enemies[0].alive);
        assert!(state.enemies[1].moving);
    }

    #[test]
    fn test_charger_needs_five_spaced_hits() {
        let mut state = arena();
        state.charger = Some(Charger::new(IVec2::new(6, 5), CHARGER_HEALTH));

        let mut counted = 0;
        for _ in 0..CHARGER_HEALTH - 1 {
            assert!(hit_charger(&mut state));
            counted += 1;
            // Hits inside the window are ignored
            assert!(!hit_charger(&mut state));
            let charger = state.charger.as_mut().unwrap();
            assert_eq!(charger.hit_count, counted);
            assert_eq!(charger.health, CHARGER_HEALTH - counted);
            charger.invincibility_timer = 0.0;
        }
        assert!(state.charger.is_some());
        assert!(hit_charger(&mut state));
        assert!(state.charger.is_none());
        assert_eq!(state.gold_items.len(), 3);
        assert!(state.gold_items.iter().all(|g| (10..=20).contains(&g.value)));
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::ChargerDefeated { .. })));
    }

    #[test]
    fn test_kill_spawns_gold_only_after_explosion() {
        let mut state = arena();
        cedilla_at(&mut state, 6, 5);
        start_swing(&mut state);
        assert!(state.gold_items.is_empty());
        assert_eq!(state.explosions.len(), 1);

        update_explosions(&mut state, EXPLOSION_DURATION / 2.0);
        assert!(state.gold_items.is_empty());
        update_explosions(&mut state, EXPLOSION_DURATION / 2.0);
        assert_eq!(state.gold_items.len(), 1);
        assert!(state.explosions.is_empty());
        assert_eq!(state.gold_items[0].position, Vec2::new(6.0, 5.0));
        assert!((3..=7).contains(&state.gold_items[0].value));
    }

    #[test]
    fn test_tenth_kill_brings_charger() {
        let mut state = arena();
        state.enemies_killed = KILLS_FOR_CHARGER - 1;
        cedilla_at(&mut state, 6, 5);
        start_swing(&mut state);
        assert!(state.charger.is_some());
        assert_eq!(state.enemies_killed, 0);
    }

    #[test]
    fn test_crossbow_requires_ownership_and_cooldown() {
        let mut state = arena();
        assert!(!fire_crossbow(&mut state));
        state.crossbow.owned = true;
        assert!(fire_crossbow(&mut state));
        assert!(!fire_crossbow(&mut state));
        update_crossbow(&mut state, CROSSBOW_COOLDOWN);
        assert!(fire_crossbow(&mut state));
        assert_eq!(state.bolts.len(), 2);
    }

    #[test]
    fn test_bolt_kills_and_is_spent_same_frame() {
        let mut state = arena();
        state.crossbow.owned = true;
        cedilla_at(&mut state, 8, 5);
        fire_crossbow(&mut state);
        for _ in 0..30 {
            update_bolts(&mut state, SIM_DT);
            if state.bolts.is_empty() {
                break;
            }
        }
        assert!(state.bolts.is_empty());
        assert!(!state.enemies[0].alive);
        assert_eq!(state.enemies_killed, 1);
    }

    #[test]
    fn test_bolt_range_limit() {
        let row = ".".repeat(40);
        let map = TileMap::parse(&row).unwrap();
        let mut state = GameState::new(map, Tuning::default(), 1);
        state.enemies.clear();
        state.player.position = Vec2::new(1.0, 0.0);
        state.player.facing = Direction::Right;
        state.crossbow.owned = true;
        fire_crossbow(&mut state);
        // 10 tiles at 8 tiles/s is 1.25 s
        for _ in 0..74 {
            update_bolts(&mut state, SIM_DT);
        }
        assert_eq!(state.bolts.len(), 1);
        for _ in 0..3 {
            update_bolts(&mut state, SIM_DT);
        }
        assert!(state.bolts.is_empty());
    }

    #[test]
    fn test_bolt_leaves_map() {
        let mut state = arena();
        state.crossbow.owned = true;
        state.player.facing = Direction::Up;
        fire_crossbow(&mut state);
        // y = 5 to below 0 takes 5/8 s
        for _ in 0..40 {
            update_bolts(&mut state, SIM_DT);
        }
        assert!(state.bolts.is_empty());
    }

    #[test]
    fn test_bolt_spent_on_invincible_charger() {
        let mut state = arena();
        state.crossbow.owned = true;
        let mut charger = Charger::new(IVec2::new(6, 5), CHARGER_HEALTH);
        charger.invincibility_timer = CHARGER_INVINCIBILITY;
        state.charger = Some(charger);
        fire_crossbow(&mut state);
        for _ in 0..10 {
            update_bolts(&mut state, SIM_DT);
        }
        assert!(state.bolts.is_empty());
        assert_eq!(state.charger.unwrap().hit_count, 0);
    }
}
