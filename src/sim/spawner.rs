//! Entity placement
//!
//! Enemies only ever appear in the 3x3 block of chunks around the player, and
//! each chunk holds a bounded number of them. Pickups go anywhere on free
//! floor. The charger enters from a map edge once enough kills pile up.

use std::collections::HashMap;

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Banner, Charger, Enemy, EnemyKind, GameEvent, GameState, GoldPile, HealthPickup};
use crate::consts::*;
use crate::{chebyshev, chunk_of, tile_center, tile_of};

pub const CHARGER_BANNER: &str = "THE CHARGER APPROACHES";

/// Entities added by one timed spawn (walker + spinner)
const SPAWN_PAIR: usize = 2;

/// Advance the spawn timer; attempt a pair spawn each time it fills
pub fn update_spawner(state: &mut GameState, dt: f32) {
    if !state.spawn_enabled {
        return;
    }
    state.spawn_timer += dt;
    if state.spawn_timer >= state.tuning.enemy_spawn_delay {
        state.spawn_timer = 0.0;
        try_spawn_enemy(state);
    }
}

/// Tiles a live entity (or the player) stands on
fn occupied_tiles(state: &GameState) -> Vec<IVec2> {
    let mut tiles = vec![state.player.tile()];
    tiles.extend(state.enemies.iter().filter(|e| e.alive).map(|e| tile_of(e.position)));
    if let Some(charger) = &state.charger {
        tiles.push(tile_of(charger.position));
    }
    tiles
}

/// Free floor tiles in the chunk window around the player.
/// With `respect_density`, chunks without room for a whole pair are skipped.
fn enemy_candidates(state: &GameState, respect_density: bool) -> Vec<IVec2> {
    let mut per_chunk: HashMap<IVec2, usize> = HashMap::new();
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        *per_chunk.entry(chunk_of(enemy.position)).or_default() += 1;
    }
    let occupied = occupied_tiles(state);

    let center = chunk_of(state.player.position);
    let min = (center - IVec2::ONE) * CHUNK_SIZE;
    let max = (center + IVec2::splat(2)) * CHUNK_SIZE - IVec2::ONE;

    state
        .map
        .floor_tiles_in(min, max)
        .filter(|tile| !occupied.contains(tile))
        .filter(|tile| {
            !respect_density
                || per_chunk
                    .get(&chunk_of(tile_center(*tile)))
                    .copied()
                    .unwrap_or(0)
                    + SPAWN_PAIR
                    <= MAX_ENEMIES_PER_CHUNK
        })
        .collect()
}

/// Spawn a random walker and a spinner together on a free floor tile near
/// the player. Returns the tile, or `None` when capped or out of room.
pub fn try_spawn_enemy(state: &mut GameState) -> Option<IVec2> {
    if !state.spawn_enabled {
        return None;
    }
    let cap = state.tuning.max_enemies;
    if state.live_enemy_count() >= cap || state.live_spinner_count() >= cap {
        log::trace!("Spawn skipped: at enemy cap");
        return None;
    }

    let candidates = enemy_candidates(state, true);
    let Some(tile) = candidates.choose(&mut state.rng).copied() else {
        log::trace!("Spawn skipped: no free floor near player");
        return None;
    };

    let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
    let walker = Enemy::new(EnemyKind::Cedilla, tile);
    let spinner = Enemy::spinner(tile, angle);
    for enemy in [walker, spinner] {
        state.events.push(GameEvent::EnemySpawned {
            position: enemy.position,
            kind: enemy.kind,
        });
        state.enemies.push(enemy);
    }
    log::debug!("Spawned enemy pair at ({}, {})", tile.x, tile.y);
    Some(tile)
}

/// Place a single enemy of `kind` near the player, ignoring density caps
pub fn spawn_enemy_of_kind(state: &mut GameState, kind: EnemyKind) -> Option<IVec2> {
    let candidates = enemy_candidates(state, false);
    let tile = candidates.choose(&mut state.rng).copied()?;
    let enemy = Enemy::new(kind, tile);
    state.events.push(GameEvent::EnemySpawned {
        position: enemy.position,
        kind,
    });
    state.enemies.push(enemy);
    log::debug!("Spawned {} at ({}, {})", kind.name(), tile.x, tile.y);
    Some(tile)
}

/// Free floor anywhere on the map, excluding tiles holding pickups
fn free_floor(state: &GameState) -> Vec<IVec2> {
    let mut occupied = occupied_tiles(state);
    occupied.extend(state.gold_items.iter().map(|g| tile_of(g.position)));
    occupied.extend(state.health_pickups.iter().map(|h| tile_of(h.position)));
    state
        .map
        .floor_tiles()
        .filter(|tile| !occupied.contains(tile))
        .collect()
}

/// Place a gold pile worth 1-5 if under the cap
pub fn spawn_gold(state: &mut GameState) -> bool {
    if state.gold_items.len() >= state.tuning.max_gold_items {
        return false;
    }
    let candidates = free_floor(state);
    let Some(tile) = candidates.choose(&mut state.rng).copied() else {
        return false;
    };
    let value = state.rng.random_range(1..=5);
    state.gold_items.push(GoldPile {
        position: tile_center(tile),
        value,
    });
    true
}

/// Place a health pickup if under the cap
pub fn spawn_health(state: &mut GameState) -> bool {
    if state.health_pickups.len() >= state.tuning.max_health_pickups {
        return false;
    }
    let candidates = free_floor(state);
    let Some(tile) = candidates.choose(&mut state.rng).copied() else {
        return false;
    };
    state.health_pickups.push(HealthPickup {
        position: tile_center(tile),
    });
    log::debug!("Health pickup at ({}, {})", tile.x, tile.y);
    true
}

pub fn update_health_spawner(state: &mut GameState, dt: f32) {
    state.health_spawn_timer += dt;
    if state.health_spawn_timer >= state.tuning.health_spawn_interval {
        state.health_spawn_timer = 0.0;
        spawn_health(state);
    }
}

/// First walkable tile walking inward from a random point on a random edge
fn random_edge_tile(state: &mut GameState) -> Option<IVec2> {
    let width = state.map.width();
    let height = state.map.height();
    if width == 0 || height == 0 {
        return None;
    }
    let side = state.rng.random_range(0..4);
    let (start, step, len) = match side {
        0 => (IVec2::new(state.rng.random_range(0..width), 0), IVec2::Y, height),
        1 => (IVec2::new(state.rng.random_range(0..width), height - 1), IVec2::NEG_Y, height),
        2 => (IVec2::new(0, state.rng.random_range(0..height)), IVec2::X, width),
        _ => (IVec2::new(width - 1, state.rng.random_range(0..height)), IVec2::NEG_X, width),
    };
    (0..len)
        .map(|i| start + step * i)
        .find(|tile| state.map.is_walkable(*tile))
}

/// Bring in the charger once the kill threshold is met. Returns true if it
/// appeared. On failure the kill count is kept so the next kill retries.
pub fn try_spawn_charger(state: &mut GameState) -> bool {
    if state.charger.is_some() || state.enemies_killed < state.tuning.kills_for_charger {
        return false;
    }

    for _ in 0..CHARGER_SPAWN_ATTEMPTS {
        let Some(tile) = random_edge_tile(state) else {
            continue;
        };
        let far_enough = chebyshev(tile_center(tile), state.player.position) > CHARGER_MIN_SPAWN_DISTANCE;
        let blocked = state
            .enemies
            .iter()
            .any(|e| e.alive && tile_of(e.position) == tile);
        if far_enough && !blocked {
            let charger = Charger::new(tile, state.tuning.charger_health);
            state.charger = Some(charger);
            state.enemies_killed = 0;
            state.banner = Some(Banner {
                text: CHARGER_BANNER.to_string(),
                timer: 0.0,
            });
            state.events.push(GameEvent::ChargerSpawned {
                position: charger.position,
            });
            log::info!("Charger spawned at ({}, {})", tile.x, tile.y);
            return true;
        }
    }
    log::debug!("Charger placement failed, will retry");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::map::TileMap;
    use glam::Vec2;

    /// Open floor, `w` x `h`, no walls
    fn open_map(w: usize, h: usize) -> TileMap {
        let row = ".".repeat(w);
        TileMap::parse(&vec![row; h].join("\n")).unwrap()
    }

    fn empty_state(map: TileMap) -> GameState {
        let mut state = GameState::new(map, Tuning::default(), 1234);
        state.enemies.clear();
        state.gold_items.clear();
        state
    }

    #[test]
    fn test_spawns_stay_in_chunk_window() {
        let mut state = empty_state(open_map(100, 100));
        state.player.position = Vec2::new(50.0, 50.0);
        let player_chunk = chunk_of(state.player.position);

        for _ in 0..30 {
            let before = occupied_tiles(&state);
            let Some(tile) = try_spawn_enemy(&mut state) else {
                break;
            };
            assert!(state.map.is_floor(tile));
            assert!(!before.contains(&tile));
            let chunk = chunk_of(tile_center(tile));
            let d = (chunk - player_chunk).abs();
            assert!(d.x <= 1 && d.y <= 1, "spawned in chunk {chunk}");
        }
    }

    #[test]
    fn test_chunk_density_cap() {
        let mut state = empty_state(open_map(60, 60));
        state.player.position = Vec2::new(30.0, 30.0);
        while try_spawn_enemy(&mut state).is_some() {}

        let mut per_chunk: HashMap<IVec2, usize> = HashMap::new();
        for e in &state.enemies {
            *per_chunk.entry(chunk_of(e.position)).or_default() += 1;
        }
        // Pairs land together, so every chunk in the window fills exactly
        assert!(per_chunk.values().all(|&n| n <= MAX_ENEMIES_PER_CHUNK));
        assert_eq!(per_chunk.len(), 9);
    }

    #[test]
    fn test_lone_survivor_chunk_takes_no_pair() {
        let mut state = empty_state(open_map(60, 60));
        state.player.position = Vec2::new(30.0, 30.0);
        let survivor = IVec2::new(25, 25);
        state.enemies.push(Enemy::spinner(survivor, 0.0));
        while try_spawn_enemy(&mut state).is_some() {}

        let mut per_chunk: HashMap<IVec2, usize> = HashMap::new();
        for e in state.enemies.iter().filter(|e| e.alive) {
            *per_chunk.entry(chunk_of(e.position)).or_default() += 1;
        }
        assert_eq!(per_chunk[&chunk_of(tile_center(survivor))], 1);
        assert!(per_chunk.values().all(|&n| n <= MAX_ENEMIES_PER_CHUNK));
        assert_eq!(per_chunk.len(), 9);
    }

    #[test]
    fn test_global_cap() {
        let tuning = Tuning {
            max_enemies: 2,
            ..Tuning::default()
        };
        let mut state = GameState::new(open_map(100, 100), tuning, 5);
        state.player.position = Vec2::new(50.0, 50.0);
        for _ in 0..10 {
            try_spawn_enemy(&mut state);
        }
        assert_eq!(state.live_enemy_count(), 2);
        assert_eq!(state.live_spinner_count(), 2);
    }

    #[test]
    fn test_no_candidates_is_silent_and_resets_timer() {
        let map = TileMap::parse("|.|").unwrap();
        let mut state = empty_state(map);
        state.player.position = Vec2::new(1.0, 0.0);
        state.spawn_timer = 0.99;
        update_spawner(&mut state, 0.02);
        assert!(state.enemies.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_disabled_spawning() {
        let mut state = empty_state(open_map(10, 10));
        state.spawn_enabled = false;
        update_spawner(&mut state, 5.0);
        assert!(try_spawn_enemy(&mut state).is_none());
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_gold_cap_and_values() {
        let mut state = empty_state(open_map(10, 10));
        for _ in 0..10 {
            spawn_gold(&mut state);
        }
        assert_eq!(state.gold_items.len(), MAX_GOLD_ITEMS);
        assert!(state.gold_items.iter().all(|g| (1..=5).contains(&g.value)));
    }

    #[test]
    fn test_health_spawns_on_interval() {
        let mut state = empty_state(open_map(10, 10));
        update_health_spawner(&mut state, HEALTH_SPAWN_INTERVAL - 1.0);
        assert!(state.health_pickups.is_empty());
        update_health_spawner(&mut state, 1.0);
        assert_eq!(state.health_pickups.len(), 1);
    }

    #[test]
    fn test_charger_spawns_far_from_player_and_resets_kills() {
        let mut state = empty_state(open_map(30, 30));
        state.player.position = Vec2::new(15.0, 15.0);
        state.enemies_killed = KILLS_FOR_CHARGER;
        assert!(try_spawn_charger(&mut state));
        let charger = state.charger.unwrap();
        assert!(chebyshev(charger.position, state.player.position) > CHARGER_MIN_SPAWN_DISTANCE);
        assert_eq!(charger.health, CHARGER_HEALTH);
        assert_eq!(state.enemies_killed, 0);
        assert_eq!(state.banner.as_ref().unwrap().text, CHARGER_BANNER);
        // Only one at a time
        state.enemies_killed = KILLS_FOR_CHARGER;
        assert!(!try_spawn_charger(&mut state));
    }

    #[test]
    fn test_charger_placement_failure_keeps_kills() {
        // Every floor tile is within 3 of the player
        let mut state = empty_state(open_map(3, 3));
        state.player.position = Vec2::new(1.0, 1.0);
        state.enemies_killed = KILLS_FOR_CHARGER;
        assert!(!try_spawn_charger(&mut state));
        assert!(state.charger.is_none());
        assert_eq!(state.enemies_killed, KILLS_FOR_CHARGER);
    }

    #[test]
    fn test_dev_spawn_of_kind() {
        let mut state = empty_state(open_map(10, 10));
        let tile = spawn_enemy_of_kind(&mut state, EnemyKind::Minotaur).unwrap();
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Minotaur);
        assert_ne!(tile, state.player.tile());
    }
}
