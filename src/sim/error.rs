//! Error types for stage data and simulation bookkeeping
//!
//! Expected gameplay outcomes (bounces, expiry, hits) are not errors; they are
//! reported through `ShotOutcome` and `GameEvent`.

use thiserror::Error;

use super::stage::GridPos;
use super::tank::TankId;

/// Stage data that cannot be loaded, edited, or played
#[derive(Debug, Error)]
pub enum StageError {
    #[error("stage JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown tile code {0}")]
    UnknownTile(u8),
    #[error("unknown tile name '{0}'")]
    UnknownTileName(String),
    #[error("unknown spawn name '{0}'")]
    UnknownSpawnName(String),
    #[error("stage grid is empty")]
    EmptyGrid,
    #[error("stage rows or enemy grid do not share one shape")]
    ShapeMismatch,
    #[error("tile at {found:?} is stored at {expected:?}")]
    TileOutOfPlace { expected: GridPos, found: GridPos },
    #[error("cell {0:?} is outside the grid")]
    OutOfBounds(GridPos),
    #[error("both player spawns must be placed")]
    MissingSpawn,
    #[error("player spawns share cell {0:?}")]
    SharedSpawn(GridPos),
    #[error("player spawn {0:?} is not on a floor tile")]
    SpawnNotFloor(GridPos),
    #[error("player spawn {0:?} is occupied by an enemy")]
    SpawnOccupied(GridPos),
    #[error("enemy at {0:?} is not on a floor tile")]
    EnemyNotFloor(GridPos),
}

/// Simulation bookkeeping failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("tank {0} is already destroyed")]
    AlreadyDestroyed(TankId),
    #[error("no tank with id {0}")]
    UnknownTank(TankId),
    #[error("tank {0} is simulated locally and does not accept peer snapshots")]
    NotRemote(TankId),
    #[error("invalid shot speed {0}")]
    InvalidShotSpeed(u8),
}
