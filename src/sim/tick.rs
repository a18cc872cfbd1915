//! Fixed step simulation tick
//!
//! One call moves every local tank, fires requested shots, then advances all
//! shots and settles their outcomes. Shots mirrored from the peer keep flying
//! between snapshots and can hit local tanks.

use glam::DVec2;

use super::shot::ShotOutcome;
use super::state::{GamePhase, GameState};
use super::tank::{Control, MoveInput, TankId};

/// Commands for one tank during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TankInput {
    pub id: TankId,
    pub movement: MoveInput,
    /// Point the cannon at this world position
    pub aim: Option<DVec2>,
    pub fire: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    pub tanks: Vec<TankInput>,
}

/// Something worth showing or scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ShotFired { owner: TankId },
    ShotExpired { owner: TankId },
    TankKilled { killed: TankId, killer: TankId },
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
        };
        log::debug!("phase -> {:?}", state.phase);
    }
    if state.phase == GamePhase::Paused {
        return events;
    }

    state.time_ticks += 1;

    // Tanks: remote ones are placed by peer snapshots only
    for i in 0..state.tanks.len() {
        let (id, control, alive) = {
            let t = &state.tanks[i];
            (t.id, t.control, t.alive)
        };
        if !alive || control == Control::Remote {
            continue;
        }
        let Some(cmd) = input.tanks.iter().find(|c| c.id == id) else {
            continue;
        };

        let colliders = state.colliders(id);
        let tank = &mut state.tanks[i];
        if let Some(target) = cmd.aim {
            tank.aim_at(target);
        }
        tank.step(cmd.movement, &colliders);
        if cmd.fire {
            tank.shoot();
            events.push(GameEvent::ShotFired { owner: id });
        }
    }

    // Shots: settle finished ones from the back so indices stay valid
    for i in 0..state.tanks.len() {
        let owner = state.tanks[i].id;
        if state.tanks[i].shots.is_empty() {
            continue;
        }
        let colliders = state.shot_colliders(owner);
        let finished = state.tanks[i].step_shots(&colliders);

        for (index, outcome) in finished.into_iter().rev() {
            match outcome {
                ShotOutcome::Continued => {}
                ShotOutcome::Expired => {
                    state.tanks[i].remove_shot(index);
                    events.push(GameEvent::ShotExpired { owner });
                }
                ShotOutcome::Hit(target) => {
                    match state.kill(target, owner) {
                        Ok(()) => events.push(GameEvent::TankKilled {
                            killed: target,
                            killer: owner,
                        }),
                        Err(e) => log::warn!("shot from tank {} hit tank {}: {}", owner, target, e),
                    }
                    state.tanks[i].remove_shot(index);
                }
            }
        }
    }

    events
}
