use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use scarf_core::math::{Rect, Vec2};

/// Map cell that becomes a solid tile.
pub const SOLID_CELL: char = 'W';
/// Map cell marking the player spawn (one tile above the marker).
pub const SPAWN_CELL: char = 'P';
/// Map cell marking the level goal.
pub const GOAL_CELL: char = 'F';

/// A static rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
    pub collidable: bool,
}

/// Owns the level's tiles and answers "which tiles can the player hit".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileManager {
    tiles: Vec<Tile>,
    camera_offset: Vec2,
}

impl TileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tile(&mut self, x: f32, y: f32, width: f32, height: f32, collidable: bool) {
        self.tiles.push(Tile {
            rect: Rect::new(x, y, width, height),
            collidable,
        });
    }

    pub fn set_camera_offset(&mut self, offset: Vec2) {
        self.camera_offset = offset;
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Every collidable tile, in insertion order.
    pub fn collidable_tiles(&self) -> Vec<Rect> {
        self.tiles
            .iter()
            .filter(|t| t.collidable)
            .map(|t| t.rect)
            .collect()
    }

    /// Collidable tiles intersecting the viewport placed at the camera
    /// offset. Rects are returned in world space.
    pub fn visible_collidable_tiles(&self, viewport: Vec2) -> Vec<Rect> {
        let view = Rect::new(
            self.camera_offset.x,
            self.camera_offset.y,
            viewport.x,
            viewport.y,
        );
        self.tiles
            .iter()
            .filter(|t| t.collidable && t.rect.collides_with(&view))
            .map(|t| t.rect)
            .collect()
    }
}

/// Failure to build a level from map data.
#[derive(Debug)]
pub enum LevelError {
    Empty,
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    MissingSpawn,
    UnknownLevel(u32),
    Json(serde_json::Error),
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "level map is empty"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(f, "map row {row} has {found} cells, expected {expected}"),
            Self::MissingSpawn => write!(f, "level map has no '{SPAWN_CELL}' spawn marker"),
            Self::UnknownLevel(n) => write!(f, "level {n} not found in map bundle"),
            Self::Json(e) => write!(f, "invalid map bundle: {e}"),
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A playable level: its tiles, where the player starts and where it ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub number: u32,
    pub tiles: TileManager,
    /// Top-left of the player body at spawn.
    pub spawn: Vec2,
    pub goal: Option<Rect>,
}

/// Cell-grid contents before the spawn requirement is checked.
struct Assembled {
    tiles: TileManager,
    spawn: Option<Vec2>,
    goal: Option<Rect>,
}

fn assemble(rows: &[Vec<char>], tile_size: f32) -> Assembled {
    let mut out = Assembled {
        tiles: TileManager::new(),
        spawn: None,
        goal: None,
    };
    for (y, row) in rows.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let px = x as f32 * tile_size;
            let py = y as f32 * tile_size;
            match cell {
                SOLID_CELL => out.tiles.add_tile(px, py, tile_size, tile_size, true),
                // First marker wins.
                SPAWN_CELL if out.spawn.is_none() => {
                    out.spawn = Some(Vec2::new(px, py - tile_size));
                },
                GOAL_CELL => out.goal = Some(Rect::new(px, py, tile_size, tile_size)),
                _ => {},
            }
        }
    }
    out
}

impl Level {
    /// Parse rows of map cells. Leading and trailing blank lines are ignored;
    /// every other row must have the same width.
    pub fn from_rows<S: AsRef<str>>(
        number: u32,
        rows: &[S],
        tile_size: f32,
    ) -> Result<Self, LevelError> {
        let mut grid: Vec<Vec<char>> = rows
            .iter()
            .map(|r| r.as_ref().trim_end_matches('\r').chars().collect())
            .collect();
        while grid.last().is_some_and(Vec::is_empty) {
            grid.pop();
        }
        let first = grid.iter().position(|r| !r.is_empty()).ok_or(LevelError::Empty)?;
        let grid = &grid[first..];

        let expected = grid[0].len();
        for (i, row) in grid.iter().enumerate() {
            if row.len() != expected {
                return Err(LevelError::Ragged {
                    row: first + i,
                    expected,
                    found: row.len(),
                });
            }
        }

        let assembled = assemble(grid, tile_size);
        let spawn = assembled.spawn.ok_or(LevelError::MissingSpawn)?;
        tracing::debug!(
            level = number,
            tiles = assembled.tiles.len(),
            has_goal = assembled.goal.is_some(),
            "Parsed level map"
        );
        Ok(Self {
            number,
            tiles: assembled.tiles,
            spawn,
            goal: assembled.goal,
        })
    }

    /// Parse a newline-separated ASCII map.
    pub fn from_ascii(number: u32, map: &str, tile_size: f32) -> Result<Self, LevelError> {
        let rows: Vec<&str> = map.lines().collect();
        Self::from_rows(number, &rows, tile_size)
    }
}

/// One entry of a map bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMap {
    pub level: u32,
    pub tiles: Vec<String>,
}

/// The on-disk map bundle: `{"levels": [{"level": 1, "tiles": [...]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelBundle {
    #[serde(default)]
    pub levels: Vec<LevelMap>,
}

impl LevelBundle {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn level_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().map(|l| l.level)
    }

    /// Build level `number`. The first entry with that number is used.
    pub fn level(&self, number: u32, tile_size: f32) -> Result<Level, LevelError> {
        let map = self
            .levels
            .iter()
            .find(|l| l.level == number)
            .ok_or(LevelError::UnknownLevel(number))?;
        Level::from_rows(number, &map.tiles, tile_size)
    }
}

/// Hand-built sandbox: a long floor, four platforms and three tall walls for
/// wall slides. No goal.
pub fn test_level() -> Level {
    let mut tiles = TileManager::new();

    for x in (0..2000).step_by(64) {
        tiles.add_tile(x as f32, 700.0, 64.0, 68.0, true);
    }

    tiles.add_tile(300.0, 600.0, 200.0, 32.0, true);
    tiles.add_tile(600.0, 500.0, 150.0, 32.0, true);
    tiles.add_tile(900.0, 400.0, 100.0, 32.0, true);
    tiles.add_tile(1200.0, 300.0, 100.0, 32.0, true);

    tiles.add_tile(200.0, 400.0, 50.0, 300.0, true);
    tiles.add_tile(500.0, 200.0, 50.0, 500.0, true);
    tiles.add_tile(1000.0, 100.0, 50.0, 600.0, true);

    Level {
        number: 0,
        tiles,
        spawn: Vec2::new(100.0, 300.0),
        goal: None,
    }
}

/// Chunk width in cells.
const CHUNK_WIDTH: usize = 8;
/// Number of chunks in a generated level, including the flat spawn chunk.
const NUM_CHUNKS: usize = 8;
/// Generated level height in cells.
pub const GENERATED_HEIGHT: usize = 12;
/// Generated level width in cells.
pub const GENERATED_WIDTH: usize = CHUNK_WIDTH * NUM_CHUNKS;

/// Deterministic procedural level. Same seed, same map.
pub fn generate_level(seed: u64, tile_size: f32) -> Level {
    let mut grid = vec![vec!['.'; GENERATED_WIDTH]; GENERATED_HEIGHT];
    let ground = GENERATED_HEIGHT - 2;

    for row in &mut grid[ground..] {
        row.fill(SOLID_CELL);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for chunk in 1..NUM_CHUNKS {
        generate_chunk(&mut grid, &mut rng, chunk * CHUNK_WIDTH);
    }

    // Spawn chunk stays flat with a back wall.
    for row in &mut grid[ground - 4..ground] {
        row[0] = SOLID_CELL;
    }
    grid[ground - 1][2] = SPAWN_CELL;
    grid[ground - 1][GENERATED_WIDTH - 3] = GOAL_CELL;
    for cell in &mut grid[ground][GENERATED_WIDTH - CHUNK_WIDTH..] {
        *cell = SOLID_CELL;
    }

    let assembled = assemble(&grid, tile_size);
    let spawn = assembled
        .spawn
        .unwrap_or_else(|| Vec2::new(2.0 * tile_size, (ground as f32 - 2.0) * tile_size));
    tracing::debug!(seed, tiles = assembled.tiles.len(), "Generated level");
    Level {
        number: 0,
        tiles: assembled.tiles,
        spawn,
        goal: assembled.goal,
    }
}

fn generate_chunk(grid: &mut [Vec<char>], rng: &mut StdRng, base_x: usize) {
    let ground = GENERATED_HEIGHT - 2;
    let end = (base_x + CHUNK_WIDTH).min(GENERATED_WIDTH);

    match rng.random_range(0u8..5) {
        0 => {
            // Pit through the ground.
            let pit_start = base_x + rng.random_range(2..5);
            let pit_width = rng.random_range(1..3);
            for x in pit_start..(pit_start + pit_width).min(end) {
                for row in &mut grid[ground..] {
                    row[x] = '.';
                }
            }
        },
        1 => {
            // Floating platform.
            let y = rng.random_range(ground - 4..ground - 1);
            let start = base_x + rng.random_range(1..3);
            let len = rng.random_range(2..5);
            for x in start..(start + len).min(end) {
                grid[y][x] = SOLID_CELL;
            }
        },
        2 => {
            // Staircase.
            for i in 0..4 {
                let x = base_x + 1 + i * 2;
                if x + 1 < end {
                    for y in ground - 1 - i..ground {
                        grid[y][x] = SOLID_CELL;
                        grid[y][x + 1] = SOLID_CELL;
                    }
                }
            }
        },
        3 => {
            // Climbable wall with a gap near the top.
            let x = base_x + CHUNK_WIDTH / 2;
            let gap = rng.random_range(2..5);
            for (y, row) in grid.iter_mut().enumerate().take(ground).skip(2) {
                if y != gap && y != gap + 1 {
                    row[x] = SOLID_CELL;
                }
            }
        },
        _ => {
            // Chimney: two walls for wall jumps, open at the top.
            let left = base_x + 2;
            let right = left + 3;
            let top = rng.random_range(3..6);
            for row in &mut grid[top..ground] {
                row[left] = SOLID_CELL;
                row[right] = SOLID_CELL;
            }
        },
    }
}
