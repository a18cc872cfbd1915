//! Collision candidates handed to the movement passes
//!
//! The game loop decides what a body may run into and in which order; the
//! movement code never discovers world geometry on its own.

use super::hitbox::TankHitbox;
use super::obstacle::Obstacle;
use super::tank::TankId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Obstacle(Obstacle),
    /// Another tank's committed position
    Tank { id: TankId, hitbox: TankHitbox },
}

impl From<Obstacle> for Collider {
    fn from(o: Obstacle) -> Self {
        Collider::Obstacle(o)
    }
}
