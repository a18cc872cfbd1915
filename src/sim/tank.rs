//! Tanks: movable, killable actors that own the shots they fire
//!
//! Archetypes differ only in their starting stats; see [`TankColor::preset`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::error::SimError;
use super::hitbox::TankHitbox;
use super::shot::{Shot, ShotOutcome, ShotRecord, ShotType};
use crate::consts::CANNON_LENGTH;
use crate::polar_to_cartesian;

/// Stable tank identifier within a game
pub type TankId = u32;

/// Units moved per step on each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSpeed {
    Stationary = 0,
    Slow = 1,
    Med = 2,
    Fast = 3,
}

impl MoveSpeed {
    pub fn value(self) -> f64 {
        f64::from(self as u8)
    }
}

/// Ticks between shots (tracked, not enforced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cooldown {
    Slow = 2,
    Fast = 1,
}

/// Tank archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TankColor {
    Player,
    Brown,
    Grey,
    Teal,
    Yellow,
    Red,
    Green,
    Purple,
    White,
    Black,
}

/// Starting stats of an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankPreset {
    pub ammo: u32,
    pub mines: u32,
    pub speed: MoveSpeed,
    pub cooldown: Cooldown,
    pub shot_type: ShotType,
}

impl TankColor {
    pub const ALL: [TankColor; 10] = [
        TankColor::Player,
        TankColor::Brown,
        TankColor::Grey,
        TankColor::Teal,
        TankColor::Yellow,
        TankColor::Red,
        TankColor::Green,
        TankColor::Purple,
        TankColor::White,
        TankColor::Black,
    ];

    pub fn preset(self) -> TankPreset {
        use super::shot::ShotSpeed as S;
        use self::{Cooldown as C, MoveSpeed as M};

        let (ammo, mines, speed, cooldown, shot) = match self {
            TankColor::Player => (5, 2, M::Med, C::Fast, ShotType::new(S::Slow, 1)),
            TankColor::Brown => (1, 0, M::Stationary, C::Slow, ShotType::new(S::Slow, 1)),
            TankColor::Grey => (1, 0, M::Slow, C::Slow, ShotType::new(S::Slow, 1)),
            TankColor::Teal => (1, 0, M::Slow, C::Slow, ShotType::new(S::Fast, 0)),
            TankColor::Yellow => (1, 4, M::Med, C::Slow, ShotType::new(S::Slow, 1)),
            TankColor::Red => (3, 0, M::Slow, C::Fast, ShotType::new(S::Slow, 1)),
            TankColor::Green => (2, 0, M::Stationary, C::Fast, ShotType::new(S::Fast, 2)),
            TankColor::Purple => (5, 2, M::Med, C::Fast, ShotType::new(S::Slow, 1)),
            TankColor::White => (5, 2, M::Slow, C::Fast, ShotType::new(S::Slow, 1)),
            TankColor::Black => (2, 2, M::Fast, C::Fast, ShotType::new(S::Fast, 0)),
        };
        TankPreset {
            ammo,
            mines,
            speed,
            cooldown,
            shot_type: shot,
        }
    }
}

/// Who drives a tank: this simulation, or snapshots from the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Local,
    Remote,
}

/// Directional keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    /// Unit step per axis; opposite keys cancel
    pub fn axis(&self) -> DVec2 {
        let x = match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let y = match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        DVec2::new(x, y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub id: TankId,
    pub color: TankColor,
    pub control: Control,
    /// Committed position
    pub pos: TankHitbox,
    /// Cannon facing, radians
    pub angle: f64,
    pub ammo: u32,
    pub max_ammo: u32,
    pub mines: u32,
    pub max_mines: u32,
    pub speed: MoveSpeed,
    pub cooldown: Cooldown,
    pub shot_type: ShotType,
    /// Shots in flight, oldest first
    pub shots: Vec<Shot>,
    pub alive: bool,
}

impl Tank {
    pub fn new(id: TankId, color: TankColor, control: Control, pos: DVec2) -> Self {
        let preset = color.preset();
        Self {
            id,
            color,
            control,
            pos: TankHitbox { pos },
            angle: 0.0,
            ammo: preset.ammo,
            max_ammo: preset.ammo,
            mines: preset.mines,
            max_mines: preset.mines,
            speed: preset.speed,
            cooldown: preset.cooldown,
            shot_type: preset.shot_type,
            shots: Vec::new(),
            alive: true,
        }
    }

    /// Tentative next position; nothing is committed
    pub fn try_move(&self, input: MoveInput) -> TankHitbox {
        TankHitbox {
            pos: self.pos.pos + input.axis() * self.speed.value(),
        }
    }

    /// Correct `next` against the obstacles in order
    ///
    /// Other tanks in the list are ignored: tanks may overlap each other.
    pub fn resolve_collision(&self, next: TankHitbox, colliders: &[Collider]) -> TankHitbox {
        colliders
            .iter()
            .fold(next, |next, collider| match collider {
                Collider::Obstacle(obstacle) if obstacle.collides(&next) => {
                    obstacle.push_back(next, self.pos.pos)
                }
                _ => next,
            })
    }

    /// Move, resolve, commit
    pub fn step(&mut self, input: MoveInput, colliders: &[Collider]) {
        let next = self.try_move(input);
        self.pos = self.resolve_collision(next, colliders);
    }

    /// Point the cannon at `target`
    pub fn aim_at(&mut self, target: DVec2) {
        let delta = target - self.pos.pos;
        if delta != DVec2::ZERO {
            self.angle = delta.y.atan2(delta.x);
        }
    }

    /// Spawn a shot at the cannon tip. Ammo and cooldown are not consulted.
    pub fn shoot(&mut self) -> &Shot {
        let tip = self.pos.pos + polar_to_cartesian(CANNON_LENGTH, self.angle);
        self.shots.push(Shot::new(self.id, self.shot_type, tip, self.angle));
        &self.shots[self.shots.len() - 1]
    }

    /// Mark this tank destroyed by `killer`
    pub fn kill(&mut self, killer: TankId) -> Result<(), SimError> {
        if !self.alive {
            return Err(SimError::AlreadyDestroyed(self.id));
        }
        self.alive = false;
        log::info!("tank {} ({:?}) destroyed by tank {}", self.id, self.color, killer);
        Ok(())
    }

    /// Drop an owned shot
    ///
    /// # Panics
    ///
    /// If `index` does not name a shot this tank owns.
    pub fn remove_shot(&mut self, index: usize) -> Shot {
        assert!(
            index < self.shots.len(),
            "tank {} does not own shot {} (has {})",
            self.id,
            index,
            self.shots.len()
        );
        self.shots.remove(index)
    }

    /// Step every shot; returns the finished ones as (index, outcome), ascending
    pub fn step_shots(&mut self, colliders: &[Collider]) -> Vec<(usize, ShotOutcome)> {
        self.shots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, shot)| match shot.step(colliders) {
                ShotOutcome::Continued => None,
                outcome => Some((i, outcome)),
            })
            .collect()
    }

    pub fn serialize_shots(&self) -> Vec<ShotRecord> {
        self.shots.iter().map(Shot::to_record).collect()
    }

    /// Replace the shot list with mirrored peer shots
    pub fn deserialize_shots(&mut self, records: &[ShotRecord]) {
        self.shots = records
            .iter()
            .map(|record| Shot::from_record(self.id, record))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EPS;
    use crate::sim::hitbox::Body;
    use crate::sim::obstacle::{Edge, Hole, Obstacle, Wall};
    use crate::sim::shot::ShotSpeed;

    fn player_at(x: f64, y: f64) -> Tank {
        Tank::new(1, TankColor::Player, Control::Local, DVec2::new(x, y))
    }

    #[test]
    fn test_presets() {
        let black = TankColor::Black.preset();
        assert_eq!(black.speed, MoveSpeed::Fast);
        assert_eq!(black.shot_type, ShotType::new(ShotSpeed::Fast, 0));
        let brown = TankColor::Brown.preset();
        assert_eq!(brown.speed, MoveSpeed::Stationary);
        assert_eq!(brown.ammo, 1);
        assert!(TankColor::ALL.iter().all(|c| c.preset().ammo > 0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let tank = player_at(100.0, 100.0);
        let all = MoveInput {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(tank.try_move(all).pos, DVec2::new(100.0, 100.0));

        let up_down_right = MoveInput {
            up: true,
            down: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(tank.try_move(up_down_right).pos, DVec2::new(102.0, 100.0));
    }

    #[test]
    fn test_diagonal_moves_both_axes() {
        let tank = player_at(100.0, 100.0);
        let input = MoveInput {
            up: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(tank.try_move(input).pos, DVec2::new(98.0, 98.0));
    }

    #[test]
    fn test_stationary_tank_never_moves() {
        let tank = Tank::new(2, TankColor::Brown, Control::Local, DVec2::new(50.0, 50.0));
        let input = MoveInput {
            down: true,
            ..Default::default()
        };
        assert_eq!(tank.try_move(input).pos, DVec2::new(50.0, 50.0));
    }

    #[test]
    fn test_step_stops_at_wall() {
        let mut tank = player_at(84.0, 50.0);
        let wall: Collider = Obstacle::from(Wall::new(110.0, 50.0, 10.0)).into();
        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        tank.step(input, &[wall]);
        assert!((tank.pos.x2() - (100.0 - EPS)).abs() < 1e-9);
    }

    #[test]
    fn test_step_stays_inside_edge_and_out_of_holes() {
        let edge: Collider = Obstacle::from(Edge::new(0.0, 0.0, 800.0, 600.0)).into();
        let hole: Collider = Obstacle::from(Hole::new(60.0, 40.0, 12.0)).into();
        let mut tank = player_at(16.0, 40.0);
        let input = MoveInput {
            left: true,
            ..Default::default()
        };
        tank.step(input, &[edge, hole]);
        assert!((tank.pos.x1() - EPS).abs() < 1e-9);

        let mut tank = player_at(32.0, 40.0);
        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        tank.step(input, &[edge, hole]);
        // Right edge of the box stops just short of the rim at x=48
        assert!((tank.pos.x2() - (48.0 - EPS)).abs() < 1e-9);
    }

    #[test]
    fn test_tanks_do_not_block_tanks() {
        let mut tank = player_at(100.0, 100.0);
        let other = Collider::Tank {
            id: 2,
            hitbox: TankHitbox::new(110.0, 100.0),
        };
        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        tank.step(input, &[other]);
        assert_eq!(tank.pos.pos, DVec2::new(102.0, 100.0));
    }

    #[test]
    fn test_shoot_spawns_at_cannon_tip() {
        let mut tank = player_at(100.0, 100.0);
        tank.aim_at(DVec2::new(100.0, 200.0));
        let shot = tank.shoot().clone();
        assert!((shot.pos.pos - DVec2::new(100.0, 130.0)).length() < 1e-9);
        assert_eq!(shot.owner, 1);
        assert_eq!(shot.bounces, 1);
        assert!(!shot.is_rocket());
        // Firing is not gated on ammo
        for _ in 0..10 {
            tank.shoot();
        }
        assert_eq!(tank.shots.len(), 11);
        assert_eq!(tank.ammo, 5);
    }

    #[test]
    fn test_kill_twice_reports_error() {
        let mut tank = player_at(0.0, 0.0);
        assert_eq!(tank.kill(2), Ok(()));
        assert!(!tank.alive);
        assert_eq!(tank.kill(2), Err(SimError::AlreadyDestroyed(1)));
    }

    #[test]
    #[should_panic(expected = "does not own shot")]
    fn test_remove_unowned_shot_panics() {
        let mut tank = player_at(0.0, 0.0);
        tank.remove_shot(0);
    }

    #[test]
    fn test_step_shots_reports_finished() {
        let mut tank = player_at(100.0, 100.0);
        tank.shot_type = ShotType::new(ShotSpeed::Slow, 0);
        tank.shoot();
        tank.angle = std::f64::consts::PI;
        tank.shoot();
        // Only the first shot (heading +x) runs into the wall
        let wall: Collider = Obstacle::from(Wall::new(142.0, 100.0, 10.0)).into();
        let finished = tank.step_shots(&[wall]);
        assert_eq!(finished, vec![(0, ShotOutcome::Expired)]);
    }

    #[test]
    fn test_shot_list_round_trip() {
        let mut tank = player_at(100.0, 100.0);
        tank.shot_type = ShotType::new(ShotSpeed::Fast, 2);
        tank.shoot();
        tank.aim_at(DVec2::new(0.0, 0.0));
        tank.shoot();

        let records = tank.serialize_shots();
        let mut mirror = Tank::new(1, TankColor::Player, Control::Remote, DVec2::ZERO);
        mirror.deserialize_shots(&records);
        assert_eq!(mirror.shots, tank.shots);
        assert!(mirror.shots.iter().all(Shot::is_rocket));
    }
}
