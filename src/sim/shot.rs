//! Shots: projectiles that bounce off walls and the arena edge
//!
//! A shot flies until it either runs out of bounces or reaches a tank. Each
//! step moves it `speed` units along `angle`, checks the tentative position
//! against the collision candidates in the order given, and commits only if
//! the shot is still alive.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::error::SimError;
use super::hitbox::{Body, ShotHitbox};
use super::tank::TankId;
use crate::{normalize_angle, polar_to_cartesian};

/// Units travelled per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ShotSpeed {
    Slow = 1,
    Fast = 2,
}

impl ShotSpeed {
    pub fn value(self) -> f64 {
        f64::from(u8::from(self))
    }
}

impl From<ShotSpeed> for u8 {
    fn from(speed: ShotSpeed) -> Self {
        speed as u8
    }
}

impl TryFrom<u8> for ShotSpeed {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ShotSpeed::Slow),
            2 => Ok(ShotSpeed::Fast),
            other => Err(SimError::InvalidShotSpeed(other)),
        }
    }
}

/// Template a tank stamps its shots from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotType {
    pub speed: ShotSpeed,
    pub max_bounces: u32,
}

impl ShotType {
    pub const fn new(speed: ShotSpeed, max_bounces: u32) -> Self {
        Self { speed, max_bounces }
    }
}

/// What happened to a shot during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Still flying, position committed
    Continued,
    /// Bounce budget exhausted; the owner should drop the shot
    Expired,
    /// Reached the given tank; the owner should drop the shot
    Hit(TankId),
}

/// Mirror `angle` about the surface whose normal points along `normal`
///
/// The incoming direction is turned around first (±π, keeping the result in
/// range), then mirrored about the normal line. Angles are canvas-clockwise
/// with 0 along +x.
pub fn reflect_angle(angle: f64, normal: f64) -> f64 {
    let reversed = if angle < PI { angle + PI } else { angle - PI };
    normalize_angle(reversed - 2.0 * (reversed - normal))
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    /// Tank that fired it
    pub owner: TankId,
    /// Committed position
    pub pos: ShotHitbox,
    /// Heading in radians, [0, 2π)
    pub angle: f64,
    pub speed: ShotSpeed,
    /// Remaining bounces
    pub bounces: u32,
}

impl Shot {
    pub fn new(owner: TankId, shot_type: ShotType, pos: DVec2, angle: f64) -> Self {
        Self {
            owner,
            pos: ShotHitbox { pos },
            angle: normalize_angle(angle),
            speed: shot_type.speed,
            bounces: shot_type.max_bounces,
        }
    }

    pub fn is_rocket(&self) -> bool {
        self.speed == ShotSpeed::Fast
    }

    /// Tentative next position; nothing is committed
    pub fn try_move(&self) -> ShotHitbox {
        self.pos.translated(polar_to_cartesian(self.speed.value(), self.angle))
    }

    /// Check `next` against every candidate in order
    ///
    /// Reflecting surfaces bounce the shot (angle taken from the surface
    /// facing the committed position) and pull `next` back out. The first tank
    /// reached ends the shot.
    pub fn resolve_collision(
        &mut self,
        next: ShotHitbox,
        colliders: &[Collider],
    ) -> (ShotHitbox, ShotOutcome) {
        let mut next = next;
        for collider in colliders {
            match collider {
                Collider::Obstacle(obstacle) => {
                    if !obstacle.collides(&next) {
                        continue;
                    }
                    let Some(normal) = obstacle.normal_at(self.pos.pos) else {
                        continue;
                    };
                    if self.bounces == 0 {
                        log::debug!("shot from tank {} expired", self.owner);
                        return (next, ShotOutcome::Expired);
                    }
                    self.bounces -= 1;
                    self.angle = reflect_angle(self.angle, normal);
                    next = obstacle.push_back(next, self.pos.pos);
                }
                Collider::Tank { id, hitbox } => {
                    if next.hitbox().collide(&hitbox.hitbox()) {
                        return (next, ShotOutcome::Hit(*id));
                    }
                }
            }
        }
        (next, ShotOutcome::Continued)
    }

    /// Move, resolve, and commit if still flying
    pub fn step(&mut self, colliders: &[Collider]) -> ShotOutcome {
        let next = self.try_move();
        let (next, outcome) = self.resolve_collision(next, colliders);
        if outcome == ShotOutcome::Continued {
            self.pos = next;
        }
        outcome
    }

    pub fn to_record(&self) -> ShotRecord {
        ShotRecord {
            x: self.pos.pos.x,
            y: self.pos.pos.y,
            angle: self.angle,
            speed: self.speed,
            bounces: self.bounces,
        }
    }

    pub fn from_record(owner: TankId, record: &ShotRecord) -> Self {
        Self {
            owner,
            pos: ShotHitbox::new(record.x, record.y),
            angle: record.angle,
            speed: record.speed,
            bounces: record.bounces,
        }
    }
}

/// Wire form of a shot. `is_rocket` is not sent; it follows from `speed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "a")]
    pub angle: f64,
    #[serde(rename = "s")]
    pub speed: ShotSpeed,
    #[serde(rename = "b")]
    pub bounces: u32,
}
