//! Rogue Adventure headless driver
//!
//! Loads a map (and optional tuning file), then plays a scripted session
//! through the simulation and prints a JSON summary. Useful for soak runs and
//! for checking that a seed replays identically.
//!
//! Usage: `rogue-adventure [MAP] [--tuning FILE] [--seed N] [--frames N] [--dump]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use serde::Serialize;

    use rogue_adventure::consts::SIM_DT;
    use rogue_adventure::sim::{FrameInput, GameEvent, GameState, Key, Screen, TileMap, tick};
    use rogue_adventure::{LoadError, Tuning};

    /// Small arena used when no map path is given
    const DEMO_MAP: &str = "\
╔══════════════════════════════════════╗
║......................................║
║......................................║
║.........║║║..............║║║........║
║......................................║
║......................................║
║.........║║║..............║║║........║
║......................................║
║......................................║
╚══════════════════════════════════════╝";

    /// Seconds per leg of the scripted walk
    const LEG_SECONDS: f32 = 1.5;

    struct Args {
        map: Option<String>,
        tuning: Option<String>,
        seed: u64,
        frames: u32,
        dump: bool,
    }

    impl Default for Args {
        fn default() -> Self {
            Self {
                map: None,
                tuning: None,
                seed: 0x5EED,
                frames: 60 * 60,
                dump: false,
            }
        }
    }

    fn parse_args() -> Args {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--tuning" => args.tuning = iter.next(),
                "--seed" => {
                    if let Some(seed) = iter.next().and_then(|s| s.parse().ok()) {
                        args.seed = seed;
                    } else {
                        log::warn!("--seed expects an integer, keeping {}", args.seed);
                    }
                }
                "--frames" => {
                    if let Some(frames) = iter.next().and_then(|s| s.parse().ok()) {
                        args.frames = frames;
                    } else {
                        log::warn!("--frames expects an integer, keeping {}", args.frames);
                    }
                }
                "--dump" => args.dump = true,
                other => args.map = Some(other.to_string()),
            }
        }
        args
    }

    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        frames: u32,
        screen: Option<Screen>,
        health: i32,
        gold: u32,
        enemies_alive: usize,
        enemies_killed_total: u32,
        damage_taken: i32,
        defeats: u32,
        chargers_defeated: u32,
        items_purchased: u32,
    }

    impl Summary {
        fn record(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::EnemyKilled { .. } => self.enemies_killed_total += 1,
                    GameEvent::PlayerDamaged { amount, .. } => self.damage_taken += amount,
                    GameEvent::PlayerDefeated => self.defeats += 1,
                    GameEvent::ChargerDefeated { .. } => self.chargers_defeated += 1,
                    GameEvent::ItemPurchased { .. } => self.items_purchased += 1,
                    _ => {}
                }
            }
        }
    }

    fn load_session(args: &Args) -> Result<GameState, LoadError> {
        let map = match &args.map {
            Some(path) => TileMap::load(path)?,
            None => TileMap::parse(DEMO_MAP)?,
        };
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        Ok(GameState::new(map, tuning, args.seed))
    }

    /// Scripted input for one frame: walk a square, swing twice a second,
    /// fire the crossbow now and then and restart after a defeat.
    fn scripted_input(state: &GameState, frame: u32) -> FrameInput {
        let legs = [Key::Right, Key::Down, Key::Left, Key::Up];
        let frames_per_leg = (LEG_SECONDS / SIM_DT) as u32;
        let leg = legs[(frame / frames_per_leg.max(1)) as usize % legs.len()];

        let mut input = FrameInput::hold(&[leg]);
        match state.screen {
            Screen::Menu => input.key_events.push_back(Key::A),
            Screen::Adventure => {
                if frame % 30 == 0 {
                    input.key_events.push_back(Key::Space);
                }
                if frame % 240 == 120 {
                    input.key_events.push_back(Key::F);
                }
            }
            _ => input.key_events.push_back(Key::Escape),
        }
        input
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let args = parse_args();

        let mut state = match load_session(&args) {
            Ok(state) => state,
            Err(err) => {
                log::error!("Failed to start session: {err}");
                return ExitCode::FAILURE;
            }
        };
        log::info!(
            "Session ready: {}x{} map, seed {}",
            state.map.width(),
            state.map.height(),
            args.seed
        );

        let mut summary = Summary {
            seed: args.seed,
            frames: args.frames,
            ..Summary::default()
        };
        for frame in 0..args.frames {
            let mut input = scripted_input(&state, frame);
            tick(&mut state, &mut input, SIM_DT);
            summary.record(&state.events);
            if state.quit_requested {
                break;
            }
        }

        summary.screen = Some(state.screen);
        summary.health = state.player.health;
        summary.gold = state.player.gold;
        summary.enemies_alive = state.live_enemy_count();

        let output = if args.dump {
            serde_json::to_string_pretty(&state)
        } else {
            serde_json::to_string_pretty(&summary)
        };
        match output {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("Failed to serialize output: {err}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no standalone wasm driver
}
