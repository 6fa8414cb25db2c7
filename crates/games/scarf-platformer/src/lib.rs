pub mod collision;
pub mod config;
pub mod physics;
pub mod sensor;
pub mod state;
pub mod tiles;

use serde::{Deserialize, Serialize};

use scarf_core::context::GameContext;
use scarf_core::events::GameEvent;
use scarf_core::input::{InputSnapshot, JumpLatch};
use scarf_core::math::Vec2;
use scarf_core::scene::Scene;
use scarf_core::scene_boilerplate;

use collision::CollisionSystem;
use config::ScarfConfig;
use physics::{NinjaPlayer, StepReport};
use state::MovementState;
use tiles::{Level, test_level};

/// Upper bound on substeps per frame, so a multi-second stall cannot turn
/// into an unbounded loop.
pub const MAX_SUBSTEPS: u32 = 64;

/// Snapshot-able scene state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformerState {
    pub player: NinjaPlayer,
    /// Left edge of the camera window, world x.
    pub camera_x: f32,
    /// Seconds simulated on the current level.
    pub level_time: f32,
    pub deaths: u32,
    pub complete: bool,
}

impl PlatformerState {
    fn fresh(level: &Level, config: &ScarfConfig) -> Self {
        Self {
            player: NinjaPlayer::with_config(level.spawn.x, level.spawn.y, config.physics.clone()),
            camera_x: 0.0,
            level_time: 0.0,
            deaths: 0,
            complete: false,
        }
    }
}

/// Debug readout of the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub state: MovementState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub wall_slide_timer: f32,
    pub stamina: f32,
    pub chakra: f32,
    pub on_ground: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl std::fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "state={} pos=({:.1},{:.1}) vel=({:.1},{:.1}) slide_t={:.2} stamina={:.1} chakra={:.1} ground={} walls=[{}{}]",
            self.state,
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.wall_slide_timer,
            self.stamina,
            self.chakra,
            self.on_ground,
            if self.wall_left { "L" } else { "-" },
            if self.wall_right { "R" } else { "-" },
        )
    }
}

/// Number of equal substeps `dt` is split into so none exceeds `max_dt`.
/// `max_dt <= 0` disables splitting.
pub fn substep_count(dt: f32, max_dt: f32) -> u32 {
    if max_dt <= 0.0 || dt <= max_dt {
        return 1;
    }
    let steps = (dt / max_dt).ceil();
    if steps > MAX_SUBSTEPS as f32 {
        tracing::debug!(dt, max_dt, "Frame too long, capping substeps");
        MAX_SUBSTEPS
    } else {
        steps as u32
    }
}

/// The single-player ninja platformer.
///
/// Each frame follows the camera, culls tiles to the viewport, steps the
/// player and checks for falls and the goal.
pub struct NinjaPlatformer {
    config: ScarfConfig,
    level: Level,
    collision: CollisionSystem,
    state: PlatformerState,
    jump_latch: JumpLatch,
    paused: bool,
}

impl NinjaPlatformer {
    pub fn new(level: Level, config: ScarfConfig) -> Self {
        let state = PlatformerState::fresh(&level, &config);
        Self {
            config,
            level,
            collision: CollisionSystem::default(),
            state,
            jump_latch: JumpLatch::default(),
            paused: false,
        }
    }

    /// Swap in a new level. Takes effect on the next `init`.
    pub fn load_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn state(&self) -> &PlatformerState {
        &self.state
    }

    pub fn player(&self) -> &NinjaPlayer {
        &self.state.player
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &ScarfConfig {
        &self.config
    }

    pub fn hud(&self) -> HudSnapshot {
        let p = &self.state.player;
        HudSnapshot {
            state: p.state,
            position: p.position,
            velocity: p.velocity,
            wall_slide_timer: p.wall_slide_timer,
            stamina: p.stamina,
            chakra: p.chakra,
            on_ground: p.on_ground,
            wall_left: p.wall_left,
            wall_right: p.wall_right,
        }
    }

    fn follow_camera(&mut self) {
        let camera_x = (self.state.player.position.x - self.config.camera_lead_x).max(0.0);
        self.state.camera_x = camera_x;
        self.level.tiles.set_camera_offset(Vec2::new(camera_x, 0.0));
        let viewport = Vec2::new(self.config.viewport_width, self.config.viewport_height);
        self.collision
            .set_collidable_tiles(self.level.tiles.visible_collidable_tiles(viewport));
    }

    fn respawn(&mut self) {
        let spawn = self.level.spawn;
        self.state.player = NinjaPlayer::with_config(spawn.x, spawn.y, self.config.physics.clone());
        self.state.deaths += 1;
        tracing::info!(
            level = self.level.number,
            deaths = self.state.deaths,
            "Player fell out of the world, respawning"
        );
    }

    fn push_step_events(report: &StepReport, direction: i8, events: &mut Vec<GameEvent>) {
        if report.jumped {
            events.push(GameEvent::Jumped);
        }
        if let Some(away_from) = report.wall_jumped {
            events.push(GameEvent::WallJumped { away_from });
        }
        if report.dashed {
            events.push(GameEvent::Dashed { direction });
        }
        if report.climb_started {
            events.push(GameEvent::ClimbStarted);
        }
        if let Some(impact_speed) = report.landed {
            events.push(GameEvent::Landed { impact_speed });
        }
        if let Some(side) = report.wall_slide_started {
            events.push(GameEvent::WallSlideStarted { side });
        }
    }
}

impl Default for NinjaPlatformer {
    fn default() -> Self {
        Self::new(test_level(), ScarfConfig::default())
    }
}

impl Scene for NinjaPlatformer {
    fn name(&self) -> &str {
        "Scarf of Night"
    }

    fn init(&mut self, ctx: &mut GameContext) {
        self.state = PlatformerState::fresh(&self.level, &self.config);
        self.jump_latch = JumpLatch::default();
        self.paused = false;
        self.follow_camera();
        ctx.current_level = self.level.number;

        tracing::info!(
            level = self.level.number,
            tiles = self.level.tiles.len(),
            spawn_x = self.level.spawn.x,
            spawn_y = self.level.spawn.y,
            "Level loaded"
        );
        ctx.emit(&[GameEvent::LevelLoaded {
            level: self.level.number,
        }]);
    }

    /// `input.jump_pressed` may be either the raw button level or an edge;
    /// the scene latches it so one press jumps once.
    fn update(
        &mut self,
        ctx: &mut GameContext,
        dt: f32,
        input: &InputSnapshot,
    ) -> Vec<GameEvent> {
        if self.paused || self.state.complete {
            return Vec::new();
        }
        if !dt.is_finite() || dt <= 0.0 {
            tracing::debug!(dt, "Ignoring frame with invalid dt");
            return Vec::new();
        }

        self.jump_latch.observe(input.jump_pressed);
        let frame_input = InputSnapshot {
            jump_pressed: self.jump_latch.take(),
            ..*input
        };

        self.follow_camera();

        let mut events = Vec::new();
        let steps = substep_count(dt, self.config.max_substep_dt);
        let sub_dt = dt / steps as f32;
        for i in 0..steps {
            let step_input = if i == 0 {
                frame_input
            } else {
                frame_input.without_edges()
            };
            let report = self.state.player.step(sub_dt, &step_input, &self.collision);
            Self::push_step_events(&report, self.state.player.direction, &mut events);
        }
        self.state.level_time += dt;

        if self.state.player.position.y > self.config.fall_death_y {
            events.push(GameEvent::FellOutOfWorld);
            self.respawn();
            events.push(GameEvent::Respawned);
        }

        if let Some(goal) = self.level.goal
            && self.state.player.get_rect().collides_with(&goal)
        {
            self.state.complete = true;
            let time = self.state.level_time;
            let best = ctx.record_time(self.level.number, time);
            tracing::info!(level = self.level.number, time, new_best = best, "Goal reached");
            events.push(GameEvent::GoalReached { time });
        }

        events
    }

    scene_boilerplate!(state_type: PlatformerState);
}
