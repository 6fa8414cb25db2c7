use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gravity acceleration (px/s^2, downward).
pub const GRAVITY: f32 = 1800.0;
/// Horizontal acceleration from left/right input (px/s^2).
pub const HORIZONTAL_ACCELERATION: f32 = 1200.0;
/// Horizontal speed cap (px/s).
pub const MAX_VELOCITY_X: f32 = 400.0;
/// Vertical speed cap (px/s).
pub const MAX_VELOCITY_Y: f32 = 800.0;

/// Ground jump velocity (negative is up).
pub const JUMP_VELOCITY: f32 = -600.0;
/// Vertical velocity of a wall jump.
pub const WALL_JUMP_VELOCITY: f32 = -500.0;
/// Horizontal push away from the wall on a wall jump.
pub const WALL_JUMP_HORIZONTAL_VELOCITY: f32 = 300.0;
/// Climb speed while holding up/down on a wall.
pub const CLIMB_VELOCITY: f32 = 200.0;
/// Horizontal speed set by a dash.
pub const DASH_VELOCITY: f32 = 700.0;

/// Wall-slide descent ramp (px/s^2).
pub const WALL_SLIDE_ACCELERATION: f32 = 400.0;
/// Wall-slide descent cap (px/s).
pub const MAX_WALL_SLIDE_VELOCITY: f32 = 200.0;

/// Multiplicative per-step horizontal decay on the ground.
pub const GROUND_FRICTION: f32 = 0.85;
/// Multiplicative per-step horizontal decay in the air.
pub const AIR_FRICTION: f32 = 0.98;
/// Multiplicative per-step horizontal decay while sliding.
pub const SLIDE_FRICTION: f32 = 0.6;

/// Gravity multiplier while gliding.
pub const GLIDE_GRAVITY_SCALE: f32 = 0.3;
/// Downward velocity multiplier applied each gliding step.
pub const GLIDE_FALL_DAMPING: f32 = 0.3;
/// Gravity multiplier while wall-sliding.
pub const WALL_SLIDE_GRAVITY_SCALE: f32 = 0.6;

/// Stamina spent per wall jump.
pub const WALL_JUMP_COST: f32 = 8.0;
/// Stamina drained per second while climbing.
pub const WALL_RUN_COST: f32 = 4.0;
/// Chakra spent per dash.
pub const DASH_COST: f32 = 20.0;
/// Stamina drained per second while gliding.
pub const GLIDE_COST: f32 = 6.0;
/// Stamina regained per second on the ground or a wall.
pub const STAMINA_REGEN: f32 = 25.0;
/// Stamina regained per second while airborne and off the wall.
pub const AIR_STAMINA_REGEN: f32 = 0.0;
/// Chakra regained per second, always.
pub const CHAKRA_REGEN: f32 = 20.0;
/// Upper bound of both resource pools.
pub const MAX_RESOURCE: f32 = 100.0;

/// Seconds between dashes.
pub const DASH_COOLDOWN: f32 = 0.8;
/// Player body width (px).
pub const PLAYER_WIDTH: f32 = 32.0;
/// Player body height (px).
pub const PLAYER_HEIGHT: f32 = 64.0;

/// Width of each wall probe (px).
pub const WALL_PROBE_WIDTH: f32 = 5.0;
/// How far a probe reaches past the body edge (px).
pub const WALL_PROBE_REACH: f32 = 2.0;
/// Vertical inset of the probe from the body's top and bottom (px).
pub const WALL_PROBE_MARGIN: f32 = 5.0;

/// Tunable movement parameters. `Default` matches the module constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NinjaPhysicsConfig {
    pub gravity: f32,
    pub horizontal_acceleration: f32,
    pub max_velocity_x: f32,
    pub max_velocity_y: f32,
    pub jump_velocity: f32,
    pub wall_jump_velocity: f32,
    pub wall_jump_horizontal_velocity: f32,
    pub climb_velocity: f32,
    pub dash_velocity: f32,
    pub wall_slide_acceleration: f32,
    pub max_wall_slide_velocity: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub slide_friction: f32,
    pub glide_gravity_scale: f32,
    pub glide_fall_damping: f32,
    pub wall_slide_gravity_scale: f32,
    pub wall_jump_cost: f32,
    pub wall_run_cost: f32,
    pub dash_cost: f32,
    pub glide_cost: f32,
    pub stamina_regen: f32,
    pub air_stamina_regen: f32,
    pub chakra_regen: f32,
    pub dash_cooldown: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub wall_probe_width: f32,
    pub wall_probe_reach: f32,
    pub wall_probe_margin: f32,
}

impl Default for NinjaPhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            horizontal_acceleration: HORIZONTAL_ACCELERATION,
            max_velocity_x: MAX_VELOCITY_X,
            max_velocity_y: MAX_VELOCITY_Y,
            jump_velocity: JUMP_VELOCITY,
            wall_jump_velocity: WALL_JUMP_VELOCITY,
            wall_jump_horizontal_velocity: WALL_JUMP_HORIZONTAL_VELOCITY,
            climb_velocity: CLIMB_VELOCITY,
            dash_velocity: DASH_VELOCITY,
            wall_slide_acceleration: WALL_SLIDE_ACCELERATION,
            max_wall_slide_velocity: MAX_WALL_SLIDE_VELOCITY,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            slide_friction: SLIDE_FRICTION,
            glide_gravity_scale: GLIDE_GRAVITY_SCALE,
            glide_fall_damping: GLIDE_FALL_DAMPING,
            wall_slide_gravity_scale: WALL_SLIDE_GRAVITY_SCALE,
            wall_jump_cost: WALL_JUMP_COST,
            wall_run_cost: WALL_RUN_COST,
            dash_cost: DASH_COST,
            glide_cost: GLIDE_COST,
            stamina_regen: STAMINA_REGEN,
            air_stamina_regen: AIR_STAMINA_REGEN,
            chakra_regen: CHAKRA_REGEN,
            dash_cooldown: DASH_COOLDOWN,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            wall_probe_width: WALL_PROBE_WIDTH,
            wall_probe_reach: WALL_PROBE_REACH,
            wall_probe_margin: WALL_PROBE_MARGIN,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarfConfig {
    pub physics: NinjaPhysicsConfig,
    /// Viewport used to cull collidable tiles (px).
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal distance the camera keeps between its left edge and the player.
    pub camera_lead_x: f32,
    /// Falling below this y (px, downward) respawns the player.
    pub fall_death_y: f32,
    /// Largest integration step; longer frames are split. 0 disables splitting.
    pub max_substep_dt: f32,
    /// Edge length of one map cell when loading ASCII maps (px).
    pub tile_size: f32,
}

impl Default for ScarfConfig {
    fn default() -> Self {
        Self {
            physics: NinjaPhysicsConfig::default(),
            viewport_width: 1280.0,
            viewport_height: 768.0,
            camera_lead_x: 640.0,
            fall_death_y: 2500.0,
            max_substep_dt: 1.0 / 30.0,
            tile_size: 64.0,
        }
    }
}

/// Failure to read or parse a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Parse { path, source } => write!(f, "failed to parse {path}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl ScarfConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Load config from `SCARF_CONFIG` or `config/scarf.toml`. Falls back to
    /// defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("SCARF_CONFIG").unwrap_or_else(|_| "config/scarf.toml".to_string());
        match Self::from_path(&path) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {path}");
                cfg
            },
            Err(ConfigError::Io { .. }) => {
                tracing::info!("No {path} found, using defaults");
                Self::default()
            },
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = NinjaPhysicsConfig::default();
        assert_eq!(cfg.gravity, GRAVITY);
        assert_eq!(cfg.dash_cost, DASH_COST);
        assert_eq!(cfg.player_height, PLAYER_HEIGHT);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = ScarfConfig::from_toml_str(
            r#"
            fall_death_y = 3000.0

            [physics]
            gravity = 900.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fall_death_y, 3000.0);
        assert_eq!(cfg.physics.gravity, 900.0);
        assert_eq!(cfg.physics.jump_velocity, JUMP_VELOCITY);
        assert_eq!(cfg.viewport_width, 1280.0);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ScarfConfig::from_toml_str("").unwrap(), ScarfConfig::default());
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(ScarfConfig::from_toml_str("physics = 3").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScarfConfig::from_path("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("definitely/not/here.toml"));
    }

    #[test]
    fn sample_config_parses() {
        let cfg = ScarfConfig::from_toml_str(include_str!("../../../../config/scarf.toml")).unwrap();
        assert_eq!(cfg.physics.gravity, GRAVITY);
        assert_eq!(cfg.camera_lead_x, 640.0);
        assert_eq!(cfg.physics.wall_probe_width, WALL_PROBE_WIDTH);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = ScarfConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(ScarfConfig::from_toml_str(&text).unwrap(), cfg);
    }
}
