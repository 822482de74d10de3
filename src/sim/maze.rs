//! Maze grid: tile codes, level parsing and world/tile mapping
//!
//! The grid is indexed `[row][col]` where the row follows world X and the
//! column follows world Z. Tile `(i, j)` is centred at world `(2i, 2j)`.

use std::borrow::Cow;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH, TILE_SIZE};
use crate::tuning::{DonutTuning, DonutVacancy};

/// A single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Void - anything standing here falls
    #[default]
    Empty,
    /// Solid floor / crate
    Floor,
    /// Floor carrying a collectible coin
    Coin,
    /// Unstable tile that collapses after being stood on
    Donut,
}

impl Tile {
    /// Decode a level-file tile code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Floor),
            2 => Some(Tile::Coin),
            3 => Some(Tile::Donut),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Tile::Empty => 0,
            Tile::Floor => 1,
            Tile::Coin => 2,
            Tile::Donut => 3,
        }
    }

    /// Whether a grounded tank is held up by this tile
    pub fn is_supporting(self) -> bool {
        self.code() >= 1
    }
}

/// In-bounds grid coordinate.
///
/// Only constructible through checked paths, so indexing the grid with one
/// never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct TileCoord {
    row: usize,
    col: usize,
}

/// Grid indices outside the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tile ({row}, {col}) is outside the {MAZE_HEIGHT}x{MAZE_WIDTH} maze")]
pub struct TileOutOfBounds {
    pub row: usize,
    pub col: usize,
}

impl TileCoord {
    /// `None` when the indices fall outside the grid
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < MAZE_HEIGHT && col < MAZE_WIDTH).then_some(Self { row, col })
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// World-space centre (x, z) of this tile
    pub fn to_world(self) -> (f32, f32) {
        (self.row as f32 * TILE_SIZE, self.col as f32 * TILE_SIZE)
    }
}

impl TryFrom<(usize, usize)> for TileCoord {
    type Error = TileOutOfBounds;

    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(row, col).ok_or(TileOutOfBounds { row, col })
    }
}

impl From<TileCoord> for (usize, usize) {
    fn from(coord: TileCoord) -> Self {
        (coord.row, coord.col)
    }
}

/// Raw (possibly out-of-range) tile indices containing a world point
#[inline]
pub fn world_to_tile(x: f32, z: f32) -> (i32, i32) {
    let half = TILE_SIZE / 2.0;
    (
        ((x + half) / TILE_SIZE).floor() as i32,
        ((z + half) / TILE_SIZE).floor() as i32,
    )
}

/// Raw tile indices of the nearest tile centre (used for ground support)
#[inline]
pub fn nearest_tile(x: f32, z: f32) -> (i32, i32) {
    ((x / TILE_SIZE).round() as i32, (z / TILE_SIZE).round() as i32)
}

/// Where level text comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LevelSource {
    /// Read from disk on every level load
    File(PathBuf),
    /// Already in memory (tests, embedded levels)
    Inline(String),
}

impl LevelSource {
    pub fn read(&self) -> Result<Cow<'_, str>, LevelError> {
        match self {
            LevelSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| LevelError::Io {
                    path: path.clone(),
                    source,
                }),
            LevelSource::Inline(text) => Ok(Cow::Borrowed(text)),
        }
    }
}

/// Level loading failure. Never fatal: the previous grid stays in place.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not open maze file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level {level} not found in maze data")]
    LevelNotFound { level: u8 },
}

/// Visual/logical stage of an unstable tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DonutPhase {
    /// Not yet stood on
    Idle,
    /// Wobbling sideways by `offset`
    Shaking { offset: f32 },
    /// Sinking, `depth` is negative
    Dropping { depth: f32 },
}

/// The maze grid plus per-tile collapse counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    cells: [[Tile; MAZE_WIDTH]; MAZE_HEIGHT],
    /// Collapse counters, parallel to `cells` (0 = untouched)
    donut_frames: [[u32; MAZE_WIDTH]; MAZE_HEIGHT],
}

impl Maze {
    /// An all-void grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one level out of a multi-level text block.
    ///
    /// The level starts after a `LEVEL <n>` header line and spans the next
    /// `MAZE_HEIGHT` lines of whitespace-separated tile codes. Short or
    /// malformed lines leave the remaining cells empty.
    pub fn parse_level(text: &str, level: u8) -> Result<Self, LevelError> {
        let mut lines = text.lines();
        let found = lines.by_ref().any(|line| is_level_header(line, level));
        if !found {
            return Err(LevelError::LevelNotFound { level });
        }

        let mut maze = Self::new();
        for (row, line) in lines.take(MAZE_HEIGHT).enumerate() {
            for (col, token) in line.split_whitespace().take(MAZE_WIDTH).enumerate() {
                let Ok(code) = token.parse::<i32>() else {
                    log::warn!("Level {level}: malformed cell '{token}' at row {row}, rest of row left empty");
                    break;
                };
                maze.cells[row][col] = Tile::from_code(code).unwrap_or_else(|| {
                    log::warn!("Level {level}: unknown tile code {code} at ({row}, {col})");
                    Tile::Empty
                });
            }
        }
        Ok(maze)
    }

    /// Replace this grid with `level` from `source`.
    ///
    /// Returns the level's coin count. On error the grid is left untouched.
    pub fn load(&mut self, source: &LevelSource, level: u8) -> Result<usize, LevelError> {
        let text = source.read()?;
        *self = Self::parse_level(&text, level)?;
        let coins = self.coin_count();
        log::info!("Level {level} loaded with {coins} coins");
        Ok(coins)
    }

    /// Tile at raw indices, `None` when outside the grid
    pub fn cell(&self, row: i32, col: i32) -> Option<Tile> {
        self.coord(row, col).map(|c| self.get(c))
    }

    /// Bounds-check raw indices
    pub fn coord(&self, row: i32, col: i32) -> Option<TileCoord> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        TileCoord::new(row, col)
    }

    /// In-bounds tile containing a world point
    pub fn tile_at(&self, x: f32, z: f32) -> Option<TileCoord> {
        let (row, col) = world_to_tile(x, z);
        self.coord(row, col)
    }

    pub fn get(&self, coord: TileCoord) -> Tile {
        self.cells[coord.row][coord.col]
    }

    pub fn set(&mut self, coord: TileCoord, tile: Tile) {
        self.cells[coord.row][coord.col] = tile;
        if tile != Tile::Donut {
            self.donut_frames[coord.row][coord.col] = 0;
        }
    }

    /// Turn a coin tile into plain floor. Returns whether a coin was there.
    pub fn collect_coin(&mut self, coord: TileCoord) -> bool {
        if self.get(coord) != Tile::Coin {
            return false;
        }
        self.set(coord, Tile::Floor);
        true
    }

    pub fn coin_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&tile| tile == Tile::Coin)
            .count()
    }

    /// Centre tile, where the tank spawns
    pub fn center(&self) -> TileCoord {
        TileCoord {
            row: MAZE_HEIGHT / 2,
            col: MAZE_WIDTH / 2,
        }
    }

    /// Iterate `(coord, tile)` in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .map(move |(col, &tile)| (TileCoord { row, col }, tile))
        })
    }

    /// Collapse counter of a tile (0 when idle or not a donut)
    pub fn donut_frame(&self, coord: TileCoord) -> u32 {
        self.donut_frames[coord.row][coord.col]
    }

    /// Current collapse stage of a donut tile, `None` for other tiles
    pub fn donut_phase(&self, coord: TileCoord, tuning: &DonutTuning) -> Option<DonutPhase> {
        if self.get(coord) != Tile::Donut {
            return None;
        }
        let frame = self.donut_frame(coord);
        Some(if frame == 0 {
            DonutPhase::Idle
        } else if frame < tuning.drop_start {
            DonutPhase::Shaking {
                offset: tuning.shake_amplitude * (frame as f32 * 0.5).sin(),
            }
        } else {
            DonutPhase::Dropping {
                depth: -((frame - tuning.drop_start) as f32 * tuning.drop_rate),
            }
        })
    }

    /// Advance every donut counter by one tick.
    ///
    /// `occupied` is the tile a grounded tank stands on. Returns the tiles
    /// that collapsed this tick (now `Tile::Empty`).
    pub fn advance_donuts(&mut self, occupied: Option<TileCoord>, tuning: &DonutTuning) -> Vec<TileCoord> {
        let mut removed = Vec::new();
        for row in 0..MAZE_HEIGHT {
            for col in 0..MAZE_WIDTH {
                if self.cells[row][col] != Tile::Donut {
                    continue;
                }
                let coord = TileCoord { row, col };
                let frame = &mut self.donut_frames[row][col];
                if occupied == Some(coord) {
                    *frame += 1;
                } else {
                    match tuning.vacancy {
                        DonutVacancy::Freeze => {}
                        DonutVacancy::Continue if *frame > 0 => *frame += 1,
                        DonutVacancy::Continue => {}
                        DonutVacancy::Reset => *frame = 0,
                    }
                }
                if *frame >= tuning.remove_at {
                    self.set(coord, Tile::Empty);
                    removed.push(coord);
                }
            }
        }
        removed
    }
}

fn is_level_header(line: &str, level: u8) -> bool {
    let mut tokens = line.split_whitespace();
    tokens.next() == Some("LEVEL") && tokens.next().and_then(|n| n.parse::<u8>().ok()) == Some(level)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Build level text from a closure over (row, col)
    pub(crate) fn level_text(level: u8, code: impl Fn(usize, usize) -> i32) -> String {
        let mut text = format!("LEVEL {level}\n");
        for row in 0..MAZE_HEIGHT {
            let line: Vec<String> = (0..MAZE_WIDTH).map(|col| code(row, col).to_string()).collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_requested_level_only() {
        let text = format!("{}{}", level_text(1, |_, _| 1), level_text(2, |r, c| if r == c { 2 } else { 0 }));
        let maze = Maze::parse_level(&text, 2).unwrap();
        assert_eq!(maze.coin_count(), MAZE_WIDTH);
        assert_eq!(maze.cell(3, 3), Some(Tile::Coin));
        assert_eq!(maze.cell(3, 4), Some(Tile::Empty));
    }

    #[test]
    fn header_match_is_exact() {
        let text = level_text(12, |_, _| 1);
        assert!(matches!(
            Maze::parse_level(&text, 1),
            Err(LevelError::LevelNotFound { level: 1 })
        ));
    }

    #[test]
    fn short_and_malformed_lines_leave_void() {
        let mut text = String::from("LEVEL 1\n1 1 2\n1 x 1 1\n");
        text.push_str("3 3 3 3 3 3 3 3 3 3 3 3 3 3 3 3 3\n");
        let maze = Maze::parse_level(&text, 1).unwrap();
        assert_eq!(maze.cell(0, 2), Some(Tile::Coin));
        assert_eq!(maze.cell(0, 3), Some(Tile::Empty));
        assert_eq!(maze.cell(1, 0), Some(Tile::Floor));
        assert_eq!(maze.cell(1, 1), Some(Tile::Empty));
        assert_eq!(maze.cell(1, 2), Some(Tile::Empty));
        assert_eq!(maze.cell(2, 14), Some(Tile::Donut));
        assert_eq!(maze.cell(3, 0), Some(Tile::Empty));
    }

    #[test]
    fn failed_load_keeps_previous_grid() {
        let source = LevelSource::Inline(level_text(1, |_, _| 2));
        let mut maze = Maze::new();
        assert_eq!(maze.load(&source, 1).unwrap(), MAZE_WIDTH * MAZE_HEIGHT);

        assert!(maze.load(&source, 3).is_err());
        assert_eq!(maze.coin_count(), MAZE_WIDTH * MAZE_HEIGHT);

        let missing = LevelSource::File(PathBuf::from("/nonexistent/maze.txt"));
        assert!(matches!(maze.load(&missing, 1), Err(LevelError::Io { .. })));
        assert_eq!(maze.coin_count(), MAZE_WIDTH * MAZE_HEIGHT);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let maze = Maze::new();
        assert_eq!(maze.cell(-1, 0), None);
        assert_eq!(maze.cell(0, MAZE_WIDTH as i32), None);
        assert_eq!(maze.tile_at(-1.5, 4.0), None);
        assert_eq!(maze.tile_at(100.0, 4.0), None);
    }

    #[test]
    fn coords_outside_the_grid_cannot_be_built() {
        assert_eq!(TileCoord::new(20, 20), None);
        assert_eq!(TileCoord::new(MAZE_HEIGHT, 0), None);
        assert_eq!(TileCoord::new(0, MAZE_WIDTH), None);
        assert_eq!(Maze::new().coord(0, MAZE_WIDTH as i32), None);

        let corner = TileCoord::new(MAZE_HEIGHT - 1, MAZE_WIDTH - 1).unwrap();
        assert_eq!(Maze::new().get(corner), Tile::Empty);
        assert_eq!(TileCoord::try_from((20, 20)), Err(TileOutOfBounds { row: 20, col: 20 }));

        let json = serde_json::to_string(&corner).unwrap();
        assert_eq!(json, "[14,14]");
        assert_eq!(serde_json::from_str::<TileCoord>(&json).unwrap(), corner);
        assert!(serde_json::from_str::<TileCoord>("[20,20]").is_err());
    }

    #[test]
    fn tile_edges_follow_floor_mapping() {
        assert_eq!(world_to_tile(0.99, 2.99), (0, 1));
        assert_eq!(world_to_tile(1.0, 3.0), (1, 2));
        assert_eq!(world_to_tile(-0.99, 0.0), (0, 0));
        assert_eq!(world_to_tile(-1.01, 0.0), (-1, 0));
    }

    #[test]
    fn collect_coin_is_idempotent() {
        let mut maze = Maze::parse_level(&level_text(1, |_, _| 2), 1).unwrap();
        let coord = TileCoord::new(4, 5).unwrap();
        assert!(maze.collect_coin(coord));
        assert_eq!(maze.get(coord), Tile::Floor);
        assert!(!maze.collect_coin(coord));
        assert_eq!(maze.coin_count(), MAZE_WIDTH * MAZE_HEIGHT - 1);
    }

    fn donut_maze() -> Maze {
        Maze::parse_level(&level_text(1, |_, _| 3), 1).unwrap()
    }

    #[test]
    fn donut_collapses_after_configured_ticks() {
        let tuning = DonutTuning::default();
        let mut maze = donut_maze();
        let here = TileCoord::new(7, 7).unwrap();

        for _ in 0..99 {
            assert!(maze.advance_donuts(Some(here), &tuning).is_empty());
        }
        assert!(matches!(maze.donut_phase(here, &tuning), Some(DonutPhase::Dropping { .. })));
        assert_eq!(maze.advance_donuts(Some(here), &tuning), vec![here]);
        assert_eq!(maze.get(here), Tile::Empty);
        assert_eq!(maze.donut_frame(here), 0);

        // Gone for good
        for _ in 0..200 {
            assert!(maze.advance_donuts(Some(here), &tuning).is_empty());
        }
        assert_eq!(maze.get(here), Tile::Empty);
    }

    #[test]
    fn donut_phases_progress() {
        let tuning = DonutTuning::default();
        let mut maze = donut_maze();
        let here = TileCoord::new(0, 0).unwrap();
        assert_eq!(maze.donut_phase(here, &tuning), Some(DonutPhase::Idle));

        maze.advance_donuts(Some(here), &tuning);
        assert!(matches!(maze.donut_phase(here, &tuning), Some(DonutPhase::Shaking { .. })));

        for _ in 1..35 {
            maze.advance_donuts(Some(here), &tuning);
        }
        assert_eq!(maze.donut_frame(here), 35);
        assert_eq!(maze.donut_phase(here, &tuning), Some(DonutPhase::Dropping { depth: -0.0 }));
    }

    #[test]
    fn vacancy_policies() {
        let here = TileCoord::new(2, 2).unwrap();
        for (vacancy, expected) in [
            (DonutVacancy::Freeze, 10),
            (DonutVacancy::Continue, 20),
            (DonutVacancy::Reset, 0),
        ] {
            let tuning = DonutTuning {
                vacancy,
                ..Default::default()
            };
            let mut maze = donut_maze();
            for _ in 0..10 {
                maze.advance_donuts(Some(here), &tuning);
            }
            for _ in 0..10 {
                maze.advance_donuts(None, &tuning);
            }
            assert_eq!(maze.donut_frame(here), expected, "{vacancy:?}");
            // Untouched tiles never start on their own
            assert_eq!(maze.donut_frame(TileCoord::new(9, 9).unwrap()), 0);
        }
    }

    proptest! {
        #[test]
        fn tile_mapping_round_trips(row in 0..MAZE_HEIGHT, col in 0..MAZE_WIDTH) {
            let maze = Maze::new();
            let coord = TileCoord::new(row, col).unwrap();
            let (x, z) = coord.to_world();
            prop_assert_eq!(maze.tile_at(x, z), Some(coord));
            prop_assert_eq!(maze.coord(nearest_tile(x, z).0, nearest_tile(x, z).1), Some(coord));
        }

        #[test]
        fn points_inside_a_tile_map_to_it(
            row in 0..MAZE_HEIGHT,
            col in 0..MAZE_WIDTH,
            dx in -0.99f32..0.99,
            dz in -0.99f32..0.99,
        ) {
            let maze = Maze::new();
            let coord = TileCoord::new(row, col).unwrap();
            let (x, z) = coord.to_world();
            prop_assert_eq!(maze.tile_at(x + dx, z + dz), Some(coord));
        }

        #[test]
        fn collecting_never_exceeds_total(picks in proptest::collection::vec((0..MAZE_HEIGHT, 0..MAZE_WIDTH), 0..400)) {
            let mut maze = Maze::parse_level(&level_text(1, |r, c| if (r + c) % 3 == 0 { 2 } else { 1 }), 1).unwrap();
            let total = maze.coin_count();
            let mut collected = 0;
            for (row, col) in picks {
                if maze.collect_coin(TileCoord::new(row, col).unwrap()) {
                    collected += 1;
                }
            }
            prop_assert!(collected <= total);
            prop_assert_eq!(maze.coin_count(), total - collected);
        }
    }
}
