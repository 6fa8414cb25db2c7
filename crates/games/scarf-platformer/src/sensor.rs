//! Wall proximity probes.
//!
//! Collision correction only reports a wall once the body overlaps it. Wall
//! slides and wall jumps need to know about a wall the body is merely
//! touching, so two thin probes straddle the body's left and right edges and
//! reach a couple of pixels past them.

use serde::{Deserialize, Serialize};

use scarf_core::math::Rect;

use crate::collision::CollisionSystem;
use crate::config::NinjaPhysicsConfig;

/// Which sides of the body have a wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
}

/// Probe covering the body's left edge.
pub fn left_probe(body: &Rect, cfg: &NinjaPhysicsConfig) -> Rect {
    Rect::new(
        body.left() - cfg.wall_probe_reach,
        body.top() + cfg.wall_probe_margin,
        cfg.wall_probe_width,
        body.height - 2.0 * cfg.wall_probe_margin,
    )
}

/// Probe covering the body's right edge.
pub fn right_probe(body: &Rect, cfg: &NinjaPhysicsConfig) -> Rect {
    Rect::new(
        body.right() + cfg.wall_probe_reach - cfg.wall_probe_width,
        body.top() + cfg.wall_probe_margin,
        cfg.wall_probe_width,
        body.height - 2.0 * cfg.wall_probe_margin,
    )
}

/// Cast both probes against the collision system's tiles.
pub fn sense_walls(body: &Rect, system: &CollisionSystem, cfg: &NinjaPhysicsConfig) -> WallContact {
    WallContact {
        left: system.probe(&left_probe(body, cfg)),
        right: system.probe(&right_probe(body, cfg)),
    }
}
