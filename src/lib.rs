//! Tank Duel - collision and physics core for a two-player arcade tank battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hitboxes, obstacles, shots, tanks, stages, tick)
//! - `sync`: Peer snapshot messages exchanged through the relay
//! - `settings`: Arena geometry and driver configuration

pub mod settings;
pub mod sim;
pub mod sync;

pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Tolerance for float comparisons and push-back clearance
    pub const EPS: f64 = 0.000001;

    /// Arena dimensions (canvas pixels)
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;

    /// Stage grid
    pub const GRID_ROWS: usize = 18;
    pub const GRID_COLS: usize = 26;
    /// Gap between a tile's border and the obstacle drawn inside it
    pub const BLOCK_MARGIN: f64 = 3.0;

    /// Tank hitbox half-extents (30x24 body)
    pub const TANK_RX: f64 = 15.0;
    pub const TANK_RY: f64 = 12.0;
    /// Distance from tank center to cannon tip, where shots spawn
    pub const CANNON_LENGTH: f64 = 2.0 * TANK_RX;

    /// Shot radius
    pub const SHOT_RADIUS: f64 = 5.0;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
///
/// Angles run clockwise on screen since the canvas y axis points down.
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
