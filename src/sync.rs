//! Peer snapshot messages
//!
//! Each client sends its own tank's position and shot list once per tick. The
//! relay forwards them untouched, so the receiving side overwrites the remote
//! tank with whatever arrives last. There is no ordering or staleness check.

use serde::{Deserialize, Serialize};

use crate::sim::error::SimError;
use crate::sim::hitbox::TankHitbox;
use crate::sim::shot::ShotRecord;
use crate::sim::state::GameState;
use crate::sim::tank::{Control, Tank, TankId};

/// `{id, x, y, cannon_dir}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub id: TankId,
    pub x: f64,
    pub y: f64,
    pub cannon_dir: f64,
}

impl PositionSnapshot {
    pub fn capture(tank: &Tank) -> Self {
        Self {
            id: tank.id,
            x: tank.pos.pos.x,
            y: tank.pos.pos.y,
            cannon_dir: tank.angle,
        }
    }
}

/// `{id, shots: [{x, y, a, s, b}, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotsSnapshot {
    pub id: TankId,
    pub shots: Vec<ShotRecord>,
}

impl ShotsSnapshot {
    pub fn capture(tank: &Tank) -> Self {
        Self {
            id: tank.id,
            shots: tank.serialize_shots(),
        }
    }
}

/// Any message a peer sends; told apart by shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncMessage {
    Position(PositionSnapshot),
    Shots(ShotsSnapshot),
}

impl SyncMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn id(&self) -> TankId {
        match self {
            SyncMessage::Position(p) => p.id,
            SyncMessage::Shots(s) => s.id,
        }
    }

    /// Overwrite the addressed remote tank
    pub fn apply_to(&self, state: &mut GameState) -> Result<(), SimError> {
        let id = self.id();
        let tank = state.tank_mut(id).ok_or(SimError::UnknownTank(id))?;
        if tank.control != Control::Remote {
            return Err(SimError::NotRemote(id));
        }
        match self {
            SyncMessage::Position(p) => {
                tank.pos = TankHitbox::new(p.x, p.y);
                tank.angle = p.cannon_dir;
            }
            SyncMessage::Shots(s) => tank.deserialize_shots(&s.shots),
        }
        Ok(())
    }
}

/// Messages describing `tank` for this tick
pub fn outgoing(tank: &Tank) -> [SyncMessage; 2] {
    [
        SyncMessage::Position(PositionSnapshot::capture(tank)),
        SyncMessage::Shots(ShotsSnapshot::capture(tank)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::tank::TankColor;
    use glam::DVec2;

    fn peers() -> (GameState, TankId, TankId) {
        let mut state = GameState::new(&Settings::default());
        let local = state.add_tank(TankColor::Player, Control::Local, DVec2::new(50.0, 50.0));
        let remote = state.add_tank(TankColor::Player, Control::Remote, DVec2::new(700.0, 500.0));
        (state, local, remote)
    }

    #[test]
    fn test_parse_by_shape() {
        let pos = SyncMessage::from_json(r#"{"id":2,"x":10.0,"y":20.0,"cannon_dir":1.5}"#).unwrap();
        assert!(matches!(pos, SyncMessage::Position(p) if p.x == 10.0 && p.cannon_dir == 1.5));

        let json = r#"{"id":2,"shots":[{"x":1,"y":2,"a":0.5,"s":1,"b":1}]}"#;
        let shots = SyncMessage::from_json(json).unwrap();
        let SyncMessage::Shots(s) = shots else {
            panic!("expected shots snapshot");
        };
        assert_eq!(s.shots.len(), 1);

        assert!(SyncMessage::from_json(r#"{"id":2}"#).is_err());
    }

    #[test]
    fn test_position_applies_to_remote() {
        let (mut state, _, remote) = peers();
        let msg = SyncMessage::Position(PositionSnapshot {
            id: remote,
            x: 300.0,
            y: 200.0,
            cannon_dir: 2.0,
        });
        msg.apply_to(&mut state).unwrap();
        let tank = state.tank(remote).unwrap();
        assert_eq!(tank.pos.pos, DVec2::new(300.0, 200.0));
        assert_eq!(tank.angle, 2.0);
    }

    #[test]
    fn test_local_and_unknown_rejected() {
        let (mut state, local, _) = peers();
        let mut msg = SyncMessage::Position(PositionSnapshot {
            id: local,
            x: 0.0,
            y: 0.0,
            cannon_dir: 0.0,
        });
        assert_eq!(msg.apply_to(&mut state), Err(SimError::NotRemote(local)));
        assert_eq!(state.tank(local).unwrap().pos.pos, DVec2::new(50.0, 50.0));

        if let SyncMessage::Position(p) = &mut msg {
            p.id = 42;
        }
        assert_eq!(msg.apply_to(&mut state), Err(SimError::UnknownTank(42)));
    }

    #[test]
    fn test_shots_mirror_peer() {
        let (mut state, local, remote) = peers();
        let tank = state.tank_mut(local).unwrap();
        tank.shoot();
        tank.aim_at(DVec2::new(50.0, 0.0));
        tank.shoot();
        let [_, shots] = outgoing(state.tank(local).unwrap());

        // Re-address to the remote tank as the peer would see it
        let SyncMessage::Shots(mut snapshot) = shots else {
            panic!("expected shots snapshot");
        };
        snapshot.id = remote;
        let json = SyncMessage::Shots(snapshot).to_json().unwrap();
        SyncMessage::from_json(&json).unwrap().apply_to(&mut state).unwrap();

        let sent = state.tank(local).unwrap().serialize_shots();
        assert_eq!(state.tank(remote).unwrap().serialize_shots(), sent);
        assert!(state.tank(remote).unwrap().shots.iter().all(|s| s.owner == remote));
    }

    #[test]
    fn test_last_message_wins() {
        let (mut state, _, remote) = peers();
        for x in [10.0, 30.0, 20.0] {
            SyncMessage::Position(PositionSnapshot {
                id: remote,
                x,
                y: 0.0,
                cannon_dir: 0.0,
            })
            .apply_to(&mut state)
            .unwrap();
        }
        assert_eq!(state.tank(remote).unwrap().pos.pos.x, 20.0);
    }
}
