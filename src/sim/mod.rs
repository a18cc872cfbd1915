//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only, no wall clock
//! - No randomness
//! - Stable iteration order (by tank ID, then shot age)
//! - No rendering, transport or platform dependencies

pub mod collider;
pub mod error;
pub mod hitbox;
pub mod obstacle;
pub mod shot;
pub mod stage;
pub mod state;
pub mod tank;
pub mod tick;
pub mod vector;

pub use collider::Collider;
pub use error::{SimError, StageError};
pub use hitbox::{
    Body, CapsuleHitbox, Collide, Hitbox, PointHitbox, RectHitbox, ShotHitbox, SphereHitbox,
    TankHitbox,
};
pub use obstacle::{Edge, Hole, Obstacle, Wall};
pub use shot::{Shot, ShotOutcome, ShotRecord, ShotSpeed, ShotType, reflect_angle};
pub use stage::{GridPos, MapTile, Spawn, Stage};
pub use state::{GamePhase, GameState};
pub use tank::{Control, Cooldown, MoveInput, MoveSpeed, Tank, TankColor, TankId, TankPreset};
pub use tick::{GameEvent, TankInput, TickInput, tick};
pub use vector::{NormalizedVector, Vector};
