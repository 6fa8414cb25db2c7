use serde::{Deserialize, Serialize};

use scarf_core::math::{Rect, Vec2};

/// Axis a collision is resolved along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionAxis {
    Horizontal,
    Vertical,
}

/// Face of the tile the player was pushed out of.
///
/// `Top` means the player landed on the tile; `Left` means the player ran
/// into the tile's left face, so the wall is on the player's right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl CollisionSide {
    pub fn axis(self) -> CollisionAxis {
        match self {
            CollisionSide::Top | CollisionSide::Bottom => CollisionAxis::Vertical,
            CollisionSide::Left | CollisionSide::Right => CollisionAxis::Horizontal,
        }
    }
}

/// Result of one player/tile overlap test. Produced and consumed within a
/// single resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub side: CollisionSide,
    /// Minimum translation that separates the player from `tile`.
    pub correction: Vec2,
    /// The offending tile, in the same space as the player rect.
    pub tile: Rect,
}

impl Collision {
    pub fn axis(&self) -> CollisionAxis {
        self.side.axis()
    }
}

/// Tile edges closer than this are treated as touching (px).
const SEAM_EPSILON: f32 = 1e-3;

/// Minimum-translation resolution of a single overlap.
///
/// The four penetration depths are compared and the smallest wins; equal
/// depths resolve in the order top, bottom, left, right so vertical
/// contacts take priority over horizontal ones.
pub fn resolve_overlap(player: &Rect, tile: &Rect) -> Option<Collision> {
    resolve_through_faces(player, tile, |_| true)
}

/// Like [`resolve_overlap`], but only faces for which `open` holds are
/// candidates. `None` when no candidate face is left.
fn resolve_through_faces(
    player: &Rect,
    tile: &Rect,
    open: impl Fn(CollisionSide) -> bool,
) -> Option<Collision> {
    let overlap_left = player.right() - tile.left();
    let overlap_right = tile.right() - player.left();
    let overlap_top = player.bottom() - tile.top();
    let overlap_bottom = tile.bottom() - player.top();

    if overlap_left <= 0.0 || overlap_right <= 0.0 || overlap_top <= 0.0 || overlap_bottom <= 0.0
    {
        return None;
    }

    // Earlier entries win ties.
    let candidates = [
        (CollisionSide::Top, overlap_top, Vec2::new(0.0, -overlap_top)),
        (CollisionSide::Bottom, overlap_bottom, Vec2::new(0.0, overlap_bottom)),
        (CollisionSide::Left, overlap_left, Vec2::new(-overlap_left, 0.0)),
        (CollisionSide::Right, overlap_right, Vec2::new(overlap_right, 0.0)),
    ];

    let (side, _, correction) = candidates
        .into_iter()
        .filter(|(side, ..)| open(*side))
        .fold(None, |best: Option<(CollisionSide, f32, Vec2)>, c| match best {
            Some(b) if b.1 <= c.1 => Some(b),
            _ => Some(c),
        })?;

    Some(Collision {
        side,
        correction,
        tile: *tile,
    })
}

/// Holds the static tiles the player is tested against this frame.
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    tiles: Vec<Rect>,
    /// Subtracted from every tile before testing. Zero when tiles and player
    /// share world space.
    world_offset: Vec2,
}

impl CollisionSystem {
    pub fn new(tiles: Vec<Rect>) -> Self {
        Self {
            tiles,
            world_offset: Vec2::ZERO,
        }
    }

    pub fn set_collidable_tiles(&mut self, tiles: Vec<Rect>) {
        self.tiles = tiles;
    }

    pub fn set_world_offset(&mut self, offset: Vec2) {
        self.world_offset = offset;
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles adjusted by the world offset.
    pub fn tiles(&self) -> impl Iterator<Item = Rect> + '_ {
        let offset = -self.world_offset;
        self.tiles.iter().map(move |t| t.translated(offset))
    }

    /// One [`Collision`] per tile the player strictly overlaps, in tile
    /// order. Corrections are independent; callers apply them in sequence.
    ///
    /// A face shared with a neighbouring tile is never chosen, so a player
    /// crossing the seam between two floor cells is lifted rather than
    /// stopped. The neighbour reports its own collision.
    pub fn detect_collisions(&self, player: &Rect) -> Vec<Collision> {
        self.tiles()
            .filter(|tile| player.collides_with(tile))
            .filter_map(|tile| {
                resolve_through_faces(player, &tile, |side| {
                    !self.face_is_shared(player, &tile, side)
                })
            })
            .collect()
    }

    /// Whether another tile sits flush against `side` of `tile` and covers
    /// the whole stretch of that face the player overlaps.
    fn face_is_shared(&self, player: &Rect, tile: &Rect, side: CollisionSide) -> bool {
        let flush = |a: f32, b: f32| (a - b).abs() <= SEAM_EPSILON;
        let (lo, hi) = match side.axis() {
            CollisionAxis::Horizontal => {
                (player.top().max(tile.top()), player.bottom().min(tile.bottom()))
            },
            CollisionAxis::Vertical => {
                (player.left().max(tile.left()), player.right().min(tile.right()))
            },
        };

        self.tiles().any(|other| match side {
            CollisionSide::Top => {
                flush(other.bottom(), tile.top()) && other.left() <= lo && other.right() >= hi
            },
            CollisionSide::Bottom => {
                flush(other.top(), tile.bottom()) && other.left() <= lo && other.right() >= hi
            },
            CollisionSide::Left => {
                flush(other.right(), tile.left()) && other.top() <= lo && other.bottom() >= hi
            },
            CollisionSide::Right => {
                flush(other.left(), tile.right()) && other.top() <= lo && other.bottom() >= hi
            },
        })
    }

    /// Whether `probe` strictly overlaps any tile.
    pub fn probe(&self, probe: &Rect) -> bool {
        self.tiles().any(|tile| probe.collides_with(&tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 32.0, 64.0)
    }

    #[test]
    fn landing_resolves_upward() {
        let tile = Rect::new(0.0, 100.0, 64.0, 64.0);
        // Player bottom at 110 -> 10px into the tile top
        let player = player_at(16.0, 46.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Top);
        assert_eq!(c.axis(), CollisionAxis::Vertical);
        assert_eq!(c.correction, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn head_bump_resolves_downward() {
        let tile = Rect::new(0.0, 0.0, 64.0, 64.0);
        let player = player_at(16.0, 60.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Bottom);
        assert_eq!(c.correction, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn running_into_left_face_pushes_left() {
        let tile = Rect::new(100.0, 0.0, 64.0, 200.0);
        let player = player_at(70.0, 50.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Left);
        assert_eq!(c.axis(), CollisionAxis::Horizontal);
        assert_eq!(c.correction, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn running_into_right_face_pushes_right() {
        let tile = Rect::new(0.0, 0.0, 64.0, 200.0);
        let player = player_at(61.0, 50.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Right);
        assert_eq!(c.correction, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn touching_tile_produces_no_collision() {
        let tile = Rect::new(0.0, 64.0, 64.0, 64.0);
        let player = player_at(0.0, 0.0);
        assert_eq!(resolve_overlap(&player, &tile), None);
        let system = CollisionSystem::new(vec![tile]);
        assert!(system.detect_collisions(&player).is_empty());
    }

    #[test]
    fn equal_overlaps_prefer_vertical() {
        // Corner overlap of 4px on both axes.
        let tile = Rect::new(28.0, 60.0, 64.0, 64.0);
        let player = player_at(0.0, 0.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Top);
    }

    #[test]
    fn equal_top_and_bottom_prefers_top() {
        // Thin tile fully inside the player's vertical span.
        let tile = Rect::new(0.0, 30.0, 64.0, 4.0);
        let player = player_at(16.0, 0.0);
        let c = resolve_overlap(&player, &tile).unwrap();
        assert_eq!(c.side, CollisionSide::Top);
    }

    #[test]
    fn correction_leaves_player_tangent() {
        let tile = Rect::new(0.0, 100.0, 200.0, 32.0);
        let player = player_at(50.0, 41.5);
        let system = CollisionSystem::new(vec![tile]);
        let collisions = system.detect_collisions(&player);
        assert_eq!(collisions.len(), 1);
        let corrected = player.translated(collisions[0].correction);
        assert_eq!(corrected.bottom(), tile.top());
        assert!(!corrected.collides_with(&tile));
    }

    #[test]
    fn one_collision_per_overlapping_tile() {
        let tiles = vec![
            Rect::new(0.0, 60.0, 20.0, 20.0),
            Rect::new(20.0, 60.0, 20.0, 20.0),
            Rect::new(500.0, 500.0, 20.0, 20.0),
        ];
        let system = CollisionSystem::new(tiles);
        let collisions = system.detect_collisions(&player_at(4.0, 0.0));
        assert_eq!(collisions.len(), 2);
        assert_eq!(collisions[0].tile.x, 0.0);
        assert_eq!(collisions[1].tile.x, 20.0);
    }

    #[test]
    fn seam_between_floor_cells_is_not_a_wall() {
        let tiles = vec![
            Rect::new(0.0, 100.0, 64.0, 64.0),
            Rect::new(64.0, 100.0, 64.0, 64.0),
        ];
        let system = CollisionSystem::new(tiles);
        // Half a pixel into the floor, a third of a pixel past the seam.
        let player = player_at(32.3, 36.5);
        let collisions = system.detect_collisions(&player);
        assert_eq!(collisions.len(), 2);
        assert!(collisions.iter().all(|c| c.side == CollisionSide::Top));
        // The bare overlap test alone would call it a wall.
        let second = resolve_overlap(&player, &collisions[1].tile).unwrap();
        assert_eq!(second.side, CollisionSide::Left);
    }

    #[test]
    fn seam_in_a_wall_column_is_not_a_floor() {
        let tiles = vec![
            Rect::new(0.0, 0.0, 64.0, 64.0),
            Rect::new(0.0, 64.0, 64.0, 64.0),
        ];
        let system = CollisionSystem::new(tiles);
        // Pressed into the wall's right face, feet just past the cell seam.
        let player = player_at(63.7, 0.1);
        let collisions = system.detect_collisions(&player);
        assert_eq!(collisions.len(), 2);
        assert!(collisions.iter().all(|c| c.side == CollisionSide::Right));
    }

    #[test]
    fn real_wall_face_still_blocks() {
        // Floor cell with a one-cell wall standing on it further right.
        let tiles = vec![
            Rect::new(0.0, 100.0, 64.0, 64.0),
            Rect::new(64.0, 100.0, 64.0, 64.0),
            Rect::new(128.0, 36.0, 64.0, 64.0),
        ];
        let system = CollisionSystem::new(tiles);
        let player = player_at(98.0, 36.0);
        let collisions = system.detect_collisions(&player);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].side, CollisionSide::Left);
        assert_eq!(collisions[0].correction, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn fully_enclosed_tile_yields_nothing() {
        let tiles = vec![
            Rect::new(64.0, 64.0, 64.0, 64.0),
            Rect::new(64.0, 0.0, 64.0, 64.0),
            Rect::new(64.0, 128.0, 64.0, 64.0),
            Rect::new(0.0, 64.0, 64.0, 64.0),
            Rect::new(128.0, 64.0, 64.0, 64.0),
        ];
        let system = CollisionSystem::new(tiles);
        let player = Rect::new(80.0, 80.0, 32.0, 32.0);
        assert!(system.detect_collisions(&player).is_empty());
    }

    #[test]
    fn empty_tile_list_yields_nothing() {
        let system = CollisionSystem::default();
        assert!(system.detect_collisions(&player_at(0.0, 0.0)).is_empty());
        assert!(!system.probe(&player_at(0.0, 0.0)));
    }

    #[test]
    fn world_offset_shifts_tiles() {
        let mut system = CollisionSystem::new(vec![Rect::new(100.0, 100.0, 64.0, 64.0)]);
        let player = player_at(10.0, 50.0);
        assert!(system.detect_collisions(&player).is_empty());
        system.set_world_offset(Vec2::new(90.0, 0.0));
        let collisions = system.detect_collisions(&player);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].tile.x, 10.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn single_correction_removes_overlap(
                px in -60.0f32..60.0,
                py in -100.0f32..60.0,
                tw in 8.0f32..128.0,
                th in 8.0f32..128.0,
            ) {
                let tile = Rect::new(0.0, 0.0, tw, th);
                let player = player_at(px, py);
                if let Some(c) = resolve_overlap(&player, &tile) {
                    let corrected = player.translated(c.correction);
                    let axis_overlap = match c.axis() {
                        CollisionAxis::Vertical => {
                            (corrected.bottom().min(tile.bottom())
                                - corrected.top().max(tile.top())).max(0.0)
                        },
                        CollisionAxis::Horizontal => {
                            (corrected.right().min(tile.right())
                                - corrected.left().max(tile.left())).max(0.0)
                        },
                    };
                    prop_assert!(axis_overlap.abs() < 1e-3, "residual overlap {axis_overlap}");
                    // Only the resolution axis moves.
                    match c.axis() {
                        CollisionAxis::Vertical => prop_assert_eq!(c.correction.x, 0.0),
                        CollisionAxis::Horizontal => prop_assert_eq!(c.correction.y, 0.0),
                    }
                }
            }
        }
    }
}
