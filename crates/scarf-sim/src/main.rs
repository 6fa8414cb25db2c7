use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scarf_core::context::GameContext;
use scarf_core::events::{EventKind, GameEvent};
use scarf_core::input::InputSnapshot;
use scarf_core::scene::{Scene, run_frame};
use scarf_platformer::NinjaPlatformer;
use scarf_platformer::config::ScarfConfig;
use scarf_platformer::tiles::{Level, LevelBundle, LevelError, generate_level, test_level};

/// Run the Scarf of Night platformer headless with scripted input.
#[derive(Parser)]
#[command(name = "scarf-sim", version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON map bundle to load levels from
    #[arg(long)]
    map: Option<PathBuf>,

    /// Level number within the map bundle
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Generate a procedural level from this seed instead
    #[arg(long, conflicts_with = "map")]
    seed: Option<u64>,

    /// TOML config file (defaults to $SCARF_CONFIG or config/scarf.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log the HUD every N frames (0 disables)
    #[arg(long, default_value_t = 30)]
    hud_every: u64,
}

/// Deterministic input pattern: run right, hop every second, dash every
/// three seconds, glide on the way down, and try to climb any wall hit.
fn scripted_input(frame: u64) -> InputSnapshot {
    let second = frame % 60;
    InputSnapshot {
        right: frame % 240 < 200,
        left: frame % 240 >= 220,
        up: frame % 120 >= 90,
        jump_pressed: second < 6,
        dash: frame % 180 == 100,
        glide: (30..50).contains(&second),
        ..Default::default()
    }
}

fn select_level(args: &Args, config: &ScarfConfig) -> Result<Level, LevelError> {
    if let Some(seed) = args.seed {
        let mut level = generate_level(seed, config.tile_size);
        level.number = args.level;
        return Ok(level);
    }
    match &args.map {
        Some(path) => LevelBundle::from_path(path)?.level(args.level, config.tile_size),
        None => Ok(test_level()),
    }
}

fn log_events(ctx: &mut GameContext) {
    ctx.dispatcher.on(EventKind::LevelLoaded, |e| {
        tracing::info!(event = ?e, "level");
    });
    ctx.dispatcher.on(EventKind::GoalReached, |e| {
        if let GameEvent::GoalReached { time } = e {
            tracing::info!(time, "Goal reached");
        }
    });
    for kind in [
        EventKind::Jumped,
        EventKind::WallJumped,
        EventKind::Dashed,
        EventKind::ClimbStarted,
        EventKind::WallSlideStarted,
        EventKind::Landed,
        EventKind::FellOutOfWorld,
        EventKind::Respawned,
    ] {
        ctx.dispatcher.on(kind, |e| tracing::debug!(event = ?e, "player"));
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ScarfConfig::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            },
        },
        None => ScarfConfig::load(),
    };

    let level = match select_level(&args, &config) {
        Ok(level) => level,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let mut ctx = GameContext::new(level.number);
    log_events(&mut ctx);

    let mut game = NinjaPlatformer::new(level, config);
    game.init(&mut ctx);
    tracing::info!(scene = game.name(), frames = args.frames, dt = args.dt, "Simulation starting");

    for frame in 0..args.frames {
        run_frame(&mut game, &mut ctx, args.dt, &scripted_input(frame));

        if args.hud_every > 0 && frame % args.hud_every == 0 {
            tracing::info!(frame, "{}", game.hud());
        }
        if game.is_complete() {
            tracing::info!(frame, "Level complete");
            break;
        }
    }

    let state = game.state();
    tracing::info!(
        elapsed = ctx.elapsed,
        deaths = state.deaths,
        complete = state.complete,
        best = ?ctx.best_time(game.level().number),
        "Simulation finished"
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_repeats_every_four_seconds() {
        for frame in 0..240 {
            assert_eq!(scripted_input(frame), scripted_input(frame + 240));
        }
    }

    #[test]
    fn script_never_holds_both_directions() {
        for frame in 0..240 {
            let input = scripted_input(frame);
            assert!(!(input.left && input.right), "frame {frame}");
        }
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["scarf-sim"]);
        assert_eq!(args.frames, 600);
        assert_eq!(args.level, 1);
        assert!(args.map.is_none() && args.seed.is_none());
    }

    #[test]
    fn seed_and_map_conflict() {
        let res = Args::try_parse_from(["scarf-sim", "--seed", "3", "--map", "maps.json"]);
        assert!(res.is_err());
    }

    #[test]
    fn seeded_level_takes_requested_number() {
        let args = Args::parse_from(["scarf-sim", "--seed", "9", "--level", "5"]);
        let level = select_level(&args, &ScarfConfig::default()).unwrap();
        assert_eq!(level.number, 5);
        assert!(level.goal.is_some());
    }

    #[test]
    fn default_runs_test_level() {
        let args = Args::parse_from(["scarf-sim"]);
        let level = select_level(&args, &ScarfConfig::default()).unwrap();
        assert_eq!(level, test_level());
    }
}
