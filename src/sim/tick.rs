//! Per-frame simulation tick
//!
//! Drains the frame's key presses into the live screen's handler, then (in
//! Adventure) advances the world in a fixed order: player, weapons, bolts,
//! enemies, contacts, spawning, timers, camera.

use super::input::{FrameInput, Key, MenuOption};
use super::state::{AdventurePhase, EnemyKind, GameEvent, GameState, KestrelState, Screen};
use super::{ai, camera, combat, player, shop, spawner};
use crate::consts::DEBUG_GOLD_GRANT;

/// Advance the game by one frame, consuming the frame's key presses
pub fn tick(state: &mut GameState, input: &mut FrameInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    if let Some(option) = input.menu_click.take() {
        if state.screen == Screen::Menu {
            select_menu_option(state, option);
        }
    }

    while let Some(key) = input.key_events.pop_front() {
        match state.screen {
            Screen::Menu => handle_menu_key(state, key),
            Screen::Adventure => handle_adventure_key(state, key),
            Screen::Shop => handle_shop_key(state, key),
            Screen::Bestiary | Screen::CharacterSet => state.set_screen(Screen::Menu),
            Screen::DevTesting => handle_dev_key(state, key),
        }
    }

    if state.screen == Screen::Adventure {
        update_adventure(state, input, dt);
    }
}

fn select_menu_option(state: &mut GameState, option: MenuOption) {
    match option {
        MenuOption::Adventure => state.set_screen(Screen::Adventure),
        MenuOption::CharacterSet => state.set_screen(Screen::CharacterSet),
        MenuOption::Bestiary => state.set_screen(Screen::Bestiary),
        MenuOption::DevTesting => state.set_screen(Screen::DevTesting),
        MenuOption::ToggleCrt => {
            state.crt_enabled = !state.crt_enabled;
            log::debug!("CRT effect {}", if state.crt_enabled { "on" } else { "off" });
        }
        MenuOption::Quit => {
            state.quit_requested = true;
            state.events.push(GameEvent::QuitRequested);
            log::info!("Quit requested");
        }
    }
}

fn handle_menu_key(state: &mut GameState, key: Key) {
    let option = match key {
        Key::A => MenuOption::Adventure,
        Key::C => MenuOption::CharacterSet,
        Key::B => MenuOption::Bestiary,
        Key::D => MenuOption::DevTesting,
        Key::T => MenuOption::ToggleCrt,
        Key::X => MenuOption::Quit,
        _ => return,
    };
    select_menu_option(state, option);
}

fn handle_adventure_key(state: &mut GameState, key: Key) {
    if state.phase == AdventurePhase::Defeated {
        state.start_run();
        state.set_screen(Screen::Menu);
        return;
    }
    match key {
        Key::Escape => state.set_screen(Screen::Menu),
        Key::B => {
            state.shop.selected = 0;
            state.set_screen(Screen::Shop);
        }
        Key::Space => {
            combat::start_swing(state);
        }
        Key::F => {
            combat::fire_crossbow(state);
        }
        Key::G => player::grant_gold(state, DEBUG_GOLD_GRANT),
        _ => {}
    }
}

fn handle_shop_key(state: &mut GameState, key: Key) {
    match key {
        Key::Escape => state.set_screen(Screen::Adventure),
        Key::Up => state.shop.select_prev(),
        Key::Down => state.shop.select_next(),
        Key::Enter => {
            shop::purchase_selected(state);
        }
        _ => {}
    }
}

fn handle_dev_key(state: &mut GameState, key: Key) {
    match key {
        Key::E => {
            state.spawn_enabled = !state.spawn_enabled;
            log::info!("Enemy spawning {}", if state.spawn_enabled { "enabled" } else { "disabled" });
        }
        Key::M => {
            state.movement_enabled = !state.movement_enabled;
            log::info!("Enemy movement {}", if state.movement_enabled { "enabled" } else { "disabled" });
        }
        Key::Digit1 => {
            spawner::spawn_enemy_of_kind(state, EnemyKind::Kestrel(KestrelState::default()));
        }
        Key::Digit2 => {
            spawner::spawn_enemy_of_kind(state, EnemyKind::Minotaur);
        }
        _ => state.set_screen(Screen::Menu),
    }
}

fn update_adventure(state: &mut GameState, input: &FrameInput, dt: f32) {
    if !state.entered_adventure {
        player::ensure_walkable_start(state);
        state.entered_adventure = true;
    }
    if state.phase == AdventurePhase::Defeated {
        return;
    }

    // Movement, then anything a step can trigger
    if player::update_player(state, input, dt) {
        player::collect_gold(state);
        if state.sword.swinging {
            combat::check_sword_hits(state);
        }
    }

    combat::update_sword(state, dt);
    combat::update_crossbow(state, dt);
    combat::update_bolts(state, dt);

    let contacts = ai::update_enemies(state, dt);
    ai::resolve_contacts(state, &contacts);

    spawner::update_spawner(state, dt);

    player::update_invincibility(state, dt);
    combat::update_explosions(state, dt);
    player::update_flying_gold(state, dt);
    spawner::update_health_spawner(state, dt);
    player::collect_health(state);
    if let Some(banner) = state.banner.as_mut() {
        banner.timer += dt;
    }

    state.camera = camera::follow(
        state.camera,
        state.player.position,
        state.tuning.camera_dead_zone,
        state.tuning.camera_max_step,
    );
}

/// Convenience for drivers that only want to push the world forward
pub fn idle(state: &mut GameState, dt: f32) {
    tick(state, &mut FrameInput::default(), dt);
}
