//! Game state: everything one simulation step reads and writes
//!
//! The orchestrator owns a `GameState` and passes it into [`super::tick`].
//! Tanks are kept in ascending id order so iteration is stable.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::error::{SimError, StageError};
use super::obstacle::{Edge, Obstacle};
use super::stage::Stage;
use super::tank::{Control, Tank, TankColor, TankId};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Arena boundary, always the first collision candidate
    pub edge: Edge,
    /// Walls and holes in stage order
    pub obstacles: Vec<Obstacle>,
    pub tanks: Vec<Tank>,
    pub phase: GamePhase,
    pub time_ticks: u64,
    /// Kills credited to each tank
    pub kills: BTreeMap<TankId, u32>,
    next_id: TankId,
}

impl GameState {
    /// Empty arena
    pub fn new(settings: &Settings) -> Self {
        Self {
            edge: settings.edge(),
            obstacles: Vec::new(),
            tanks: Vec::new(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            kills: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Build a game from a stage
    ///
    /// Player 1 is simulated locally, player 2 is driven by `peer`, and enemy
    /// spawns become local tanks of their archetype.
    pub fn from_stage(
        stage: &Stage,
        settings: &Settings,
        peer: Control,
    ) -> Result<Self, StageError> {
        stage.validate()?;
        if stage.rows() != settings.grid_rows || stage.cols() != settings.grid_cols {
            return Err(StageError::ShapeMismatch);
        }
        let (Some(p1), Some(p2)) = (stage.p1, stage.p2) else {
            return Err(StageError::MissingSpawn);
        };

        let mut state = Self::new(settings);
        state.obstacles = stage.build_obstacles(settings);
        state.add_tank(TankColor::Player, Control::Local, Stage::spawn_position(p1, settings));
        state.add_tank(TankColor::Player, peer, Stage::spawn_position(p2, settings));
        for (pos, color) in stage.enemies() {
            state.add_tank(color, Control::Local, Stage::spawn_position(pos, settings));
        }

        log::info!(
            "Stage loaded: {} obstacles, {} tanks",
            state.obstacles.len(),
            state.tanks.len()
        );
        Ok(state)
    }

    pub fn add_tank(&mut self, color: TankColor, control: Control, pos: DVec2) -> TankId {
        let id = self.next_id;
        self.next_id += 1;
        self.tanks.push(Tank::new(id, color, control, pos));
        id
    }

    fn index_of(&self, id: TankId) -> Option<usize> {
        self.tanks.binary_search_by_key(&id, |t| t.id).ok()
    }

    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.index_of(id).map(|i| &self.tanks[i])
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.index_of(id).map(move |i| &mut self.tanks[i])
    }

    /// Collision candidates for anything belonging to `exclude`
    ///
    /// Order: arena edge, stage obstacles, then every other living tank.
    pub fn colliders(&self, exclude: TankId) -> Vec<Collider> {
        let obstacles = std::iter::once(Obstacle::Edge(self.edge))
            .chain(self.obstacles.iter().copied())
            .map(Collider::Obstacle);
        let tanks = self
            .tanks
            .iter()
            .filter(|t| t.alive && t.id != exclude)
            .map(|t| Collider::Tank {
                id: t.id,
                hitbox: t.pos,
            });
        obstacles.chain(tanks).collect()
    }

    /// Collision candidates for the shots of `owner`
    ///
    /// Shots mirrored from the peer only hit locally simulated tanks; the peer
    /// decides hits on its own tanks.
    pub fn shot_colliders(&self, owner: TankId) -> Vec<Collider> {
        let mut colliders = self.colliders(owner);
        if self.tank(owner).is_some_and(|t| t.control == Control::Remote) {
            colliders.retain(|c| match c {
                Collider::Obstacle(_) => true,
                Collider::Tank { id, .. } => {
                    self.tank(*id).is_some_and(|t| t.control == Control::Local)
                }
            });
        }
        colliders
    }

    /// Destroy `target`, crediting `killer`
    pub fn kill(&mut self, target: TankId, killer: TankId) -> Result<(), SimError> {
        let tank = self.tank_mut(target).ok_or(SimError::UnknownTank(target))?;
        tank.kill(killer)?;
        *self.kills.entry(killer).or_default() += 1;
        Ok(())
    }

    pub fn alive_count(&self) -> usize {
        self.tanks.iter().filter(|t| t.alive).count()
    }
}
