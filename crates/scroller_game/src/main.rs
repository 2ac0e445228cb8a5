//! Pixel Scroller: headless driver for the side-scroller simulation.
//!
//! Boots a `GameWorld` from a JSON config (or the built-in tuning when no
//! config file exists), then runs the frame loop:
//!
//!   1. apply this frame's held actions (edges are derived from the previous frame)
//!   2. `tick` the world
//!   3. forward HUD events and present sprites to the logging sinks
//!   4. clear input edges
//!
//! Input comes from a replay file; without one the driver runs an idle demo.
//! By default every frame uses the replay's fixed step. `--realtime` instead
//! measures wall-clock deltas with `FrameClock` and paces frames to the
//! replay rate.

mod ai;
mod assets;
mod collision;
mod combat;
mod config;
mod controller;
mod entity;
mod frame_event;
mod render;
mod replay;
mod state_machine;
mod world;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use scroller_core::input::InputState;
use scroller_core::time::FrameClock;

use assets::ImageSheetLoader;
use config::{load_config_from_path, GameConfig};
use frame_event::FrameEvent;
use render::{dispatch_hud, Hud, LogHud, LogRenderer};
use replay::{load_replay_from_path, ReplayStep};
use world::GameWorld;

const DEFAULT_CONFIG_PATH: &str = "assets/config/game.json";
const IDLE_DEMO_FRAMES: usize = 600;
const DEMO_DT: f32 = 1.0 / 60.0;

struct DriverArgs {
    config_path: Option<PathBuf>,
    replay_path: Option<PathBuf>,
    realtime: bool,
}

fn usage() -> String {
    "Usage: cargo run -p scroller_game -- [config.json] [replay.json] [--realtime]\nExample: cargo run -p scroller_game -- assets/config/game.json assets/replays/demo.json".to_string()
}

fn parse_args(args: &[String]) -> Result<DriverArgs, String> {
    let mut positional = Vec::new();
    let mut realtime = false;
    for arg in args {
        match arg.as_str() {
            "--realtime" => realtime = true,
            "-h" | "--help" => return Err(usage()),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown flag '{flag}'\n{}", usage()));
            }
            path => positional.push(PathBuf::from(path)),
        }
    }
    if positional.len() > 2 {
        return Err(usage());
    }
    let mut positional = positional.into_iter();
    Ok(DriverArgs {
        config_path: positional.next(),
        replay_path: positional.next(),
        realtime,
    })
}

fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    match path {
        Some(path) => load_config_from_path(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config_from_path(default_path)
            } else {
                log::info!(
                    "No config at '{}'; using built-in tuning",
                    default_path.display()
                );
                Ok(GameConfig::default())
            }
        }
    }
}

fn log_event(event: &FrameEvent) {
    match event {
        FrameEvent::AttackStarted { id } => log::debug!("Entity #{id} attacks"),
        FrameEvent::HeroDamaged { health } => log::info!("Hero hit, health {health}"),
        FrameEvent::EnemyDamaged { id, health } => {
            log::info!("Enemy #{id} hit, health {health}")
        }
        FrameEvent::EntityDied { id } => log::info!("Entity #{id} died"),
        FrameEvent::Outcome(outcome) => log::info!("Outcome: {outcome:?}"),
    }
}

fn run(
    world: &mut GameWorld,
    fixed_dt: f32,
    steps: &[ReplayStep],
    realtime: bool,
) -> Result<(LogRenderer, LogHud), String> {
    let mut input = InputState::new();
    let mut renderer = LogRenderer::default();
    let mut hud = LogHud::default();
    hud.show_health(world.hero().health);

    let mut clock = FrameClock::new(world.config().max_dt);
    let frame_budget = Duration::from_secs_f32(fixed_dt);

    for step in steps {
        let frame_start = Instant::now();
        if step.restart {
            world.restart()?;
            hud.show_health(world.hero().health);
            hud.clear_message();
        }

        input.apply_held(&step.held);
        let dt = if realtime {
            f64::from(clock.begin_frame())
        } else {
            f64::from(fixed_dt)
        };
        let events = world.tick(dt, &input)?;
        for event in &events {
            log_event(event);
        }
        dispatch_hud(&events, &mut hud);
        world.present(&mut renderer);
        input.end_frame();

        if realtime {
            if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    if realtime {
        log::info!(
            "Realtime pacing: {:.1} fps ({:.2} ms/frame) over {:.2}s",
            clock.smoothed_fps,
            clock.smoothed_frame_time_ms,
            clock.total_time
        );
    }
    Ok((renderer, hud))
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let driver = parse_args(&args)?;

    log::info!("Pixel Scroller starting...");
    let config = load_config(driver.config_path.as_deref())?;
    let root = std::env::current_dir()
        .map_err(|e| format!("Failed to resolve working directory: {e}"))?;
    let loader = ImageSheetLoader::new(root);
    let mut world = GameWorld::boot(config, &loader)?;

    let (fixed_dt, steps) = match &driver.replay_path {
        Some(path) => {
            let replay = load_replay_from_path(path)?;
            log::info!(
                "Loaded replay '{}' ({} frames at {:.4}s)",
                path.display(),
                replay.total_frames(),
                replay.fixed_dt
            );
            (replay.fixed_dt, replay.expanded_inputs())
        }
        None => {
            log::info!("No replay given; running {IDLE_DEMO_FRAMES} idle frames");
            let idle = ReplayStep {
                held: Vec::new(),
                restart: false,
            };
            (DEMO_DT, vec![idle; IDLE_DEMO_FRAMES])
        }
    };

    let (renderer, hud) = run(&mut world, fixed_dt, &steps, driver.realtime)?;

    let alive = world
        .enemies()
        .iter()
        .filter(|enemy| !enemy.is_dead())
        .count();
    log::info!(
        "Finished after {} ticks: outcome {:?}, hero health {}, {}/{} enemies alive, {} sprites drawn",
        world.tick_count(),
        world.outcome(),
        world.hero().health,
        alive,
        world.enemies().len(),
        renderer.draws
    );
    log::info!(
        "HUD last showed health {} with message {:?}",
        hud.health.map_or_else(|| "-".to_string(), |h| h.to_string()),
        hud.message.as_deref().unwrap_or("")
    );
    Ok(())
}
