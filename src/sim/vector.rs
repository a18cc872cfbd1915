//! 2D vector helpers on top of `glam::DVec2`
//!
//! Add, subtract, scale and dot come straight from glam. This module only adds
//! the pieces the collision code needs on top: the clockwise normal and a
//! direction that remembers the length it was normalized from.

use glam::DVec2;

/// Positions and free vectors share one type
pub type Vector = DVec2;

/// Unit direction plus the magnitude of the vector it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedVector {
    pub dir: DVec2,
    /// Length before normalization (0 for a degenerate input)
    pub mag: f64,
}

impl NormalizedVector {
    pub fn new(v: DVec2) -> Self {
        Self {
            dir: v.normalize_or_zero(),
            mag: v.length(),
        }
    }
}

/// Direction pointing from `from` to `to`
#[inline]
pub fn direction(to: DVec2, from: DVec2) -> NormalizedVector {
    NormalizedVector::new(to - from)
}

/// 90 degrees clockwise on screen (canvas y axis points down)
#[inline]
pub fn normal(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

/// Clamp `val` into the interval spanned by `a` and `b`, in either order
#[inline]
pub fn clip(val: f64, a: f64, b: f64) -> f64 {
    val.clamp(a.min(b), a.max(b))
}
