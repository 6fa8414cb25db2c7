use serde::{Deserialize, Serialize};

use crate::config::NinjaPhysicsConfig;

/// Discrete movement mode of the ninja. Governs gravity, friction and which
/// inputs are honoured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    #[default]
    Normal,
    Sliding,
    Climbing,
    Gliding,
    Dashing,
    WallSliding,
}

impl MovementState {
    pub const ALL: [MovementState; 6] = [
        MovementState::Normal,
        MovementState::Sliding,
        MovementState::Climbing,
        MovementState::Gliding,
        MovementState::Dashing,
        MovementState::WallSliding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MovementState::Normal => "normal",
            MovementState::Sliding => "sliding",
            MovementState::Climbing => "climbing",
            MovementState::Gliding => "gliding",
            MovementState::Dashing => "dashing",
            MovementState::WallSliding => "wall_sliding",
        }
    }

    /// Fraction of gravity applied in this state.
    pub fn gravity_scale(self, cfg: &NinjaPhysicsConfig) -> f32 {
        match self {
            MovementState::Normal | MovementState::Sliding | MovementState::Dashing => 1.0,
            MovementState::Gliding => cfg.glide_gravity_scale,
            MovementState::WallSliding => cfg.wall_slide_gravity_scale,
            MovementState::Climbing => 0.0,
        }
    }

    /// Whether left/right input accelerates the body.
    pub fn steerable(self) -> bool {
        matches!(
            self,
            MovementState::Normal | MovementState::Gliding | MovementState::WallSliding
        )
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(MovementState::default(), MovementState::Normal);
    }

    #[test]
    fn gravity_scales() {
        let cfg = NinjaPhysicsConfig::default();
        assert_eq!(MovementState::Normal.gravity_scale(&cfg), 1.0);
        assert_eq!(MovementState::Sliding.gravity_scale(&cfg), 1.0);
        assert_eq!(MovementState::Dashing.gravity_scale(&cfg), 1.0);
        assert_eq!(MovementState::Gliding.gravity_scale(&cfg), 0.3);
        assert_eq!(MovementState::WallSliding.gravity_scale(&cfg), 0.6);
        assert_eq!(MovementState::Climbing.gravity_scale(&cfg), 0.0);
    }

    #[test]
    fn names_match_serde() {
        for state in MovementState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.name()));
            assert_eq!(state.to_string(), state.name());
        }
    }

    #[test]
    fn only_free_states_steer() {
        assert!(MovementState::Normal.steerable());
        assert!(MovementState::Gliding.steerable());
        assert!(MovementState::WallSliding.steerable());
        assert!(!MovementState::Sliding.steerable());
        assert!(!MovementState::Dashing.steerable());
        assert!(!MovementState::Climbing.steerable());
    }
}
