//! Stage grid: tiles, spawns and the obstacle list built from them
//!
//! A stage is edited cell by cell, exported as JSON once valid, and turned
//! into world-space `Wall`/`Hole` obstacles when a game starts.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::error::StageError;
use super::hitbox::Hitbox;
use super::obstacle::{Hole, Obstacle, Wall};
use super::tank::TankColor;
use crate::settings::Settings;

/// (row, column)
pub type GridPos = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapTile {
    Floor,
    Wall,
    BreakableWall,
    Hole,
}

impl MapTile {
    /// Wire code used in stage JSON
    pub fn code(self) -> u8 {
        match self {
            MapTile::Floor => 0,
            MapTile::Wall => 1,
            MapTile::BreakableWall => 2,
            MapTile::Hole => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, StageError> {
        match code {
            0 => Ok(MapTile::Floor),
            1 => Ok(MapTile::Wall),
            2 => Ok(MapTile::BreakableWall),
            3 => Ok(MapTile::Hole),
            other => Err(StageError::UnknownTile(other)),
        }
    }

    /// Editor tool name
    pub fn from_name(name: &str) -> Result<Self, StageError> {
        match name {
            "floor" => Ok(MapTile::Floor),
            "wall" => Ok(MapTile::Wall),
            "breakable" => Ok(MapTile::BreakableWall),
            "hole" => Ok(MapTile::Hole),
            other => Err(StageError::UnknownTileName(other.to_string())),
        }
    }

    pub fn blocks_tanks(self) -> bool {
        !matches!(self, MapTile::Floor)
    }

    pub fn blocks_shots(self) -> bool {
        matches!(self, MapTile::Wall | MapTile::BreakableWall)
    }

    pub fn breakable(self) -> bool {
        matches!(self, MapTile::BreakableWall)
    }

    /// Tiles never collide directly; see [`Stage::build_obstacles`]
    pub fn collision(self) -> Hitbox {
        Hitbox::Null
    }
}

/// What the spawn tool places on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    Player1,
    Player2,
    Enemy(TankColor),
}

impl Spawn {
    pub fn from_name(name: &str) -> Result<Self, StageError> {
        let color = match name {
            "Player1" => return Ok(Spawn::Player1),
            "Player2" => return Ok(Spawn::Player2),
            "Brown" => TankColor::Brown,
            "Grey" => TankColor::Grey,
            "Teal" => TankColor::Teal,
            "Yellow" => TankColor::Yellow,
            "Red" => TankColor::Red,
            "Green" => TankColor::Green,
            "Purple" => TankColor::Purple,
            "White" => TankColor::White,
            "Black" => TankColor::Black,
            other => return Err(StageError::UnknownSpawnName(other.to_string())),
        };
        Ok(Spawn::Enemy(color))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    grid: Vec<Vec<MapTile>>,
    pub p1: Option<GridPos>,
    pub p2: Option<GridPos>,
    enemies: Vec<Vec<Option<TankColor>>>,
}

/// JSON layout: tiles are `[code, i, j]` triples
#[derive(Debug, Serialize, Deserialize)]
struct StageRecord {
    grid: Vec<Vec<(u8, usize, usize)>>,
    p1: Option<GridPos>,
    p2: Option<GridPos>,
    enemies: Vec<Vec<Option<TankColor>>>,
}

impl Stage {
    /// All floor, players in the first two cells of the top row
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: vec![vec![MapTile::Floor; cols]; rows],
            p1: Some((0, 0)),
            p2: Some((0, 1)),
            enemies: vec![vec![None; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    fn check_bounds(&self, (i, j): GridPos) -> Result<(), StageError> {
        if i < self.rows() && j < self.cols() {
            Ok(())
        } else {
            Err(StageError::OutOfBounds((i, j)))
        }
    }

    pub fn tile(&self, i: usize, j: usize) -> Option<MapTile> {
        self.grid.get(i)?.get(j).copied()
    }

    pub fn enemy(&self, i: usize, j: usize) -> Option<TankColor> {
        *self.enemies.get(i)?.get(j)?
    }

    /// Enemy spawns in row-major order
    pub fn enemies(&self) -> impl Iterator<Item = (GridPos, TankColor)> + '_ {
        self.enemies.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, enemy)| enemy.map(|color| ((i, j), color)))
        })
    }

    /// Back to bare floor, dropping any spawn that pointed here
    pub fn reset_tile(&mut self, i: usize, j: usize) -> Result<(), StageError> {
        self.check_bounds((i, j))?;
        self.grid[i][j] = MapTile::Floor;
        self.enemies[i][j] = None;
        if self.p1 == Some((i, j)) {
            self.p1 = None;
        }
        if self.p2 == Some((i, j)) {
            self.p2 = None;
        }
        Ok(())
    }

    pub fn set_tile(&mut self, tile: MapTile, i: usize, j: usize) -> Result<(), StageError> {
        self.reset_tile(i, j)?;
        self.grid[i][j] = tile;
        Ok(())
    }

    /// Place a spawn on a cell, turning it back into floor first
    pub fn set_spawn(&mut self, spawn: Spawn, i: usize, j: usize) -> Result<(), StageError> {
        self.reset_tile(i, j)?;
        match spawn {
            Spawn::Player1 => self.p1 = Some((i, j)),
            Spawn::Player2 => self.p2 = Some((i, j)),
            Spawn::Enemy(color) => self.enemies[i][j] = Some(color),
        }
        Ok(())
    }

    fn check_player_spawn(&self, pos: GridPos) -> Result<(), StageError> {
        self.check_bounds(pos)?;
        let (i, j) = pos;
        if self.grid[i][j] != MapTile::Floor {
            return Err(StageError::SpawnNotFloor(pos));
        }
        if self.enemies[i][j].is_some() {
            return Err(StageError::SpawnOccupied(pos));
        }
        Ok(())
    }

    /// Check the stage is playable
    pub fn validate(&self) -> Result<(), StageError> {
        let (Some(p1), Some(p2)) = (self.p1, self.p2) else {
            return Err(StageError::MissingSpawn);
        };
        if p1 == p2 {
            return Err(StageError::SharedSpawn(p1));
        }
        self.check_player_spawn(p1)?;
        self.check_player_spawn(p2)?;

        if self.enemies.len() != self.rows() {
            return Err(StageError::ShapeMismatch);
        }
        for (i, (tiles, enemies)) in self.grid.iter().zip(&self.enemies).enumerate() {
            if tiles.len() != self.cols() || enemies.len() != tiles.len() {
                return Err(StageError::ShapeMismatch);
            }
            for (j, (tile, enemy)) in tiles.iter().zip(enemies).enumerate() {
                if enemy.is_some() && *tile != MapTile::Floor {
                    return Err(StageError::EnemyNotFloor((i, j)));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Export; incomplete stages are refused
    pub fn to_json(&self) -> Result<String, StageError> {
        self.validate()?;
        let record = StageRecord {
            grid: self
                .grid
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    row.iter()
                        .enumerate()
                        .map(|(j, tile)| (tile.code(), i, j))
                        .collect()
                })
                .collect(),
            p1: self.p1,
            p2: self.p2,
            enemies: self.enemies.clone(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Import. The result is well-formed but may still fail [`Stage::validate`].
    pub fn from_json(json: &str) -> Result<Self, StageError> {
        let record: StageRecord = serde_json::from_str(json)?;
        let cols = record.grid.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(StageError::EmptyGrid);
        }
        if record.enemies.len() != record.grid.len() {
            return Err(StageError::ShapeMismatch);
        }

        let mut grid = Vec::with_capacity(record.grid.len());
        for (i, (row, enemies)) in record.grid.iter().zip(&record.enemies).enumerate() {
            if row.len() != cols || enemies.len() != cols {
                return Err(StageError::ShapeMismatch);
            }
            let tiles = row
                .iter()
                .enumerate()
                .map(|(j, &(code, ti, tj))| {
                    if (ti, tj) != (i, j) {
                        return Err(StageError::TileOutOfPlace {
                            expected: (i, j),
                            found: (ti, tj),
                        });
                    }
                    MapTile::from_code(code)
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(tiles);
        }

        Ok(Self {
            grid,
            p1: record.p1,
            p2: record.p2,
            enemies: record.enemies,
        })
    }

    /// World-space obstacles for every blocking tile, row-major
    pub fn build_obstacles(&self, settings: &Settings) -> Vec<Obstacle> {
        let r = settings.obstacle_radius();
        let mut obstacles = Vec::new();
        for (i, row) in self.grid.iter().enumerate() {
            for (j, tile) in row.iter().enumerate() {
                let c = settings.tile_center(i, j);
                match tile {
                    MapTile::Floor => {}
                    MapTile::Wall | MapTile::BreakableWall => {
                        obstacles.push(Wall::new(c.x, c.y, r).into());
                    }
                    MapTile::Hole => obstacles.push(Hole::new(c.x, c.y, r).into()),
                }
            }
        }
        log::debug!(
            "built {} obstacles from {}x{} stage",
            obstacles.len(),
            self.rows(),
            self.cols()
        );
        obstacles
    }

    /// Where a tank spawned on `pos` starts
    pub fn spawn_position(pos: GridPos, settings: &Settings) -> DVec2 {
        settings.tile_center(pos.0, pos.1)
    }
}
