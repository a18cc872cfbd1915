//! Static level geometry: the arena edge, walls and holes
//!
//! Each obstacle answers three questions about a moving body:
//! does the tentative position collide, where is the nearest legal position
//! (`push_back`), and, for surfaces shots bounce off, which way does the surface
//! face at a given point (`normal_at`, an angle in canvas-clockwise radians).
//!
//! `push_back` never mutates: it returns the corrected body.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use super::hitbox::{Body, Collide, Hitbox, RectHitbox, SphereHitbox};
use crate::consts::EPS;

/// Side of a box nearest to a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Ties resolve left, then right, then top, then bottom.
fn closest_side(p: DVec2, rect: &RectHitbox) -> Side {
    let dist_x1 = (p.x - rect.x1).abs();
    let dist_x2 = (p.x - rect.x2).abs();
    let dist_y1 = (p.y - rect.y1).abs();
    let dist_y2 = (p.y - rect.y2).abs();
    let closest = dist_x1.min(dist_x2).min(dist_y1).min(dist_y2);

    if closest == dist_x1 {
        Side::Left
    } else if closest == dist_x2 {
        Side::Right
    } else if closest == dist_y1 {
        Side::Top
    } else {
        Side::Bottom
    }
}

/// World boundary. Anything poking outside the box collides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub bounds: RectHitbox,
}

impl Edge {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            bounds: RectHitbox::new(x1, y1, x2, y2),
        }
    }

    pub fn collides<B: Body>(&self, body: &B) -> bool {
        body.x1() < self.bounds.x1
            || body.x2() > self.bounds.x2
            || body.y1() < self.bounds.y1
            || body.y2() > self.bounds.y2
    }

    /// Clamp every violated side back inside the boundary
    pub fn push_back<B: Body>(&self, body: B) -> B {
        let mut body = body;
        if body.x1() < self.bounds.x1 {
            body = body.with_x1(self.bounds.x1 + EPS);
        }
        if body.x2() > self.bounds.x2 {
            body = body.with_x2(self.bounds.x2 - EPS);
        }
        if body.y1() < self.bounds.y1 {
            body = body.with_y1(self.bounds.y1 + EPS);
        }
        if body.y2() > self.bounds.y2 {
            body = body.with_y2(self.bounds.y2 - EPS);
        }
        body
    }

    /// Inward-facing normal of the boundary line nearest to `p`
    pub fn normal_at(&self, p: DVec2) -> f64 {
        match closest_side(p, &self.bounds) {
            Side::Left => 0.0,
            Side::Right => PI,
            Side::Top => FRAC_PI_2,
            Side::Bottom => 3.0 * FRAC_PI_2,
        }
    }
}

/// Solid block centered on a tile. Tanks test against its box, shots test their
/// circle against the same box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub center: DVec2,
    pub r: f64,
    pub hitbox: RectHitbox,
}

impl Wall {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            r,
            hitbox: RectHitbox::new(x - r, y - r, x + r, y + r),
        }
    }

    pub fn collides<B: Body>(&self, body: &B) -> bool {
        Hitbox::Rect(self.hitbox).collide(&body.hitbox())
    }

    /// Push out along the dominant axis of approach only
    ///
    /// `from` is the body's last legal position; it decides which face the
    /// body came through.
    pub fn push_back<B: Body>(&self, body: B, from: DVec2) -> B {
        let dist_x = (from.x - self.center.x).abs();
        let dist_y = (from.y - self.center.y).abs();

        if dist_x > dist_y {
            if from.x < self.center.x {
                body.with_x2(self.hitbox.x1 - EPS)
            } else {
                body.with_x1(self.hitbox.x2 + EPS)
            }
        } else if from.y < self.center.y {
            body.with_y2(self.hitbox.y1 - EPS)
        } else {
            body.with_y1(self.hitbox.y2 + EPS)
        }
    }

    /// Outward-facing normal of the face nearest to `p`
    pub fn normal_at(&self, p: DVec2) -> f64 {
        match closest_side(p, &self.hitbox) {
            Side::Left => PI,
            Side::Right => 0.0,
            Side::Top => 3.0 * FRAC_PI_2,
            Side::Bottom => FRAC_PI_2,
        }
    }
}

/// Circular pit. Stops tanks, shots fly over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub hitbox: SphereHitbox,
}

impl Hole {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            hitbox: SphereHitbox::new(x, y, r),
        }
    }

    pub fn center(&self) -> DVec2 {
        self.hitbox.center
    }

    pub fn r(&self) -> f64 {
        self.hitbox.r
    }

    pub fn collides<B: Body>(&self, body: &B) -> bool {
        B::BLOCKED_BY_HOLES && self.hitbox.collide_rect(&body.bounds())
    }

    /// Slide the body radially so its nearest point sits just outside the rim
    pub fn push_back<B: Body>(&self, body: B) -> B {
        let center = self.center();
        let clearance = self.r() + EPS;
        let closest = body.closest_point(center);
        let offset = closest - center;
        let dist = offset.length();

        if dist > self.r() {
            return body;
        }
        if dist > 0.0 {
            let tangent = center + offset / dist * clearance;
            return body.translated(tangent - closest);
        }

        // Hole center lies under the body: no radial direction, so leave
        // through whichever side needs the least travel.
        let b = body.bounds();
        let candidates = [
            DVec2::new(center.x - clearance - b.x2, 0.0),
            DVec2::new(center.x + clearance - b.x1, 0.0),
            DVec2::new(0.0, center.y - clearance - b.y2),
            DVec2::new(0.0, center.y + clearance - b.y1),
        ];
        let shift = candidates[1..].iter().fold(candidates[0], |best, &c| {
            if c.length_squared() < best.length_squared() {
                c
            } else {
                best
            }
        });
        body.translated(shift)
    }
}

/// Any piece of static geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Edge(Edge),
    Wall(Wall),
    Hole(Hole),
}

impl Obstacle {
    pub fn collides<B: Body>(&self, body: &B) -> bool {
        match self {
            Obstacle::Edge(e) => e.collides(body),
            Obstacle::Wall(w) => w.collides(body),
            Obstacle::Hole(h) => h.collides(body),
        }
    }

    /// Corrected position for `body`; `from` is its last legal position
    pub fn push_back<B: Body>(&self, body: B, from: DVec2) -> B {
        match self {
            Obstacle::Edge(e) => e.push_back(body),
            Obstacle::Wall(w) => w.push_back(body, from),
            Obstacle::Hole(h) => h.push_back(body),
        }
    }

    /// Reflection normal, `None` for surfaces nothing bounces off
    pub fn normal_at(&self, p: DVec2) -> Option<f64> {
        match self {
            Obstacle::Edge(e) => Some(e.normal_at(p)),
            Obstacle::Wall(w) => Some(w.normal_at(p)),
            Obstacle::Hole(_) => None,
        }
    }
}

impl From<Edge> for Obstacle {
    fn from(e: Edge) -> Self {
        Obstacle::Edge(e)
    }
}

impl From<Wall> for Obstacle {
    fn from(w: Wall) -> Self {
        Obstacle::Wall(w)
    }
}

impl From<Hole> for Obstacle {
    fn from(h: Hole) -> Self {
        Obstacle::Hole(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hitbox::{ShotHitbox, TankHitbox};
    use proptest::prelude::*;

    fn arena() -> Edge {
        Edge::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_edge_collides_outside_only() {
        let edge = arena();
        assert!(!edge.collides(&TankHitbox::new(400.0, 300.0)));
        assert!(!edge.collides(&TankHitbox::new(15.0, 12.0)));
        assert!(edge.collides(&TankHitbox::new(14.0, 300.0)));
        assert!(edge.collides(&ShotHitbox::new(400.0, 597.0)));
    }

    #[test]
    fn test_edge_push_back_clamps_inward() {
        let edge = arena();
        let fixed = edge.push_back(TankHitbox::new(5.0, 595.0));
        assert!((fixed.x1() - EPS).abs() < 1e-9);
        assert!((fixed.y2() - (600.0 - EPS)).abs() < 1e-9);
        assert!(!edge.collides(&fixed));
    }

    #[test]
    fn test_edge_normals_point_inward() {
        let edge = arena();
        assert_eq!(edge.normal_at(DVec2::new(2.0, 300.0)), 0.0);
        assert_eq!(edge.normal_at(DVec2::new(798.0, 300.0)), PI);
        assert_eq!(edge.normal_at(DVec2::new(400.0, 1.0)), FRAC_PI_2);
        assert_eq!(edge.normal_at(DVec2::new(400.0, 599.0)), 3.0 * FRAC_PI_2);
    }

    #[test]
    fn test_edge_normal_tie_prefers_left_then_right_then_top() {
        let edge = Edge::new(0.0, 0.0, 100.0, 100.0);
        // Equidistant from left and top
        assert_eq!(edge.normal_at(DVec2::new(10.0, 10.0)), 0.0);
        // Equidistant from right and bottom
        assert_eq!(edge.normal_at(DVec2::new(90.0, 90.0)), PI);
        // Dead center: all four sides tie
        assert_eq!(edge.normal_at(DVec2::new(50.0, 50.0)), 0.0);
    }

    #[test]
    fn test_wall_normals_point_outward() {
        let wall = Wall::new(110.0, 50.0, 10.0);
        assert_eq!(wall.normal_at(DVec2::new(95.0, 50.0)), PI);
        assert_eq!(wall.normal_at(DVec2::new(125.0, 50.0)), 0.0);
        assert_eq!(wall.normal_at(DVec2::new(110.0, 35.0)), 3.0 * FRAC_PI_2);
        assert_eq!(wall.normal_at(DVec2::new(110.0, 65.0)), FRAC_PI_2);
    }

    #[test]
    fn test_wall_collides_tank_box_and_shot_circle() {
        let wall = Wall::new(110.0, 50.0, 10.0);
        // Tank box touching the left face
        assert!(wall.collides(&TankHitbox::new(85.0, 50.0)));
        assert!(!wall.collides(&TankHitbox::new(84.0, 50.0)));
        // Shot circle touching the face is not a hit
        assert!(!wall.collides(&ShotHitbox::new(95.0, 50.0)));
        assert!(wall.collides(&ShotHitbox::new(97.0, 50.0)));
        // Diagonal off the corner: box corner overlaps but circle does not
        assert!(!wall.collides(&ShotHitbox::new(96.0, 36.0)));
    }

    #[test]
    fn test_wall_push_back_dominant_axis() {
        let wall = Wall::new(110.0, 50.0, 10.0);
        let from = DVec2::new(80.0, 45.0);
        let fixed = wall.push_back(TankHitbox::new(88.0, 47.0), from);
        assert!((fixed.x2() - (100.0 - EPS)).abs() < 1e-9);
        // Vertical coordinate untouched
        assert_eq!(fixed.pos.y, 47.0);

        let from = DVec2::new(112.0, 90.0);
        let fixed = wall.push_back(TankHitbox::new(112.0, 70.0), from);
        assert!((fixed.y1() - (60.0 + EPS)).abs() < 1e-9);
        assert_eq!(fixed.pos.x, 112.0);
    }

    #[test]
    fn test_hole_ignores_shots() {
        let hole = Hole::new(100.0, 100.0, 12.0);
        assert!(!hole.collides(&ShotHitbox::new(100.0, 100.0)));
        assert!(hole.collides(&TankHitbox::new(100.0, 120.0)));
        assert!(!hole.collides(&TankHitbox::new(100.0, 124.0)));
    }

    #[test]
    fn test_hole_push_back_radial() {
        let hole = Hole::new(100.0, 100.0, 12.0);
        // Tank top edge at y=110, 10 below the center
        let fixed = hole.push_back(TankHitbox::new(100.0, 122.0));
        assert!((fixed.y1() - (112.0 + EPS)).abs() < 1e-9);
        assert_eq!(fixed.pos.x, 100.0);
        assert!(!hole.collides(&fixed));
    }

    #[test]
    fn test_hole_push_back_noop_when_clear() {
        let hole = Hole::new(100.0, 100.0, 12.0);
        let tank = TankHitbox::new(200.0, 200.0);
        assert_eq!(hole.push_back(tank), tank);
    }

    #[test]
    fn test_hole_push_back_center_under_tank() {
        let hole = Hole::new(100.0, 100.0, 12.0);
        let fixed = hole.push_back(TankHitbox::new(104.0, 100.0));
        assert!(!hole.collides(&fixed));
        // Cheapest exit is to the right: 23 of travel versus 24 vertically
        assert!((fixed.x1() - (112.0 + EPS)).abs() < 1e-9);
        assert_eq!(fixed.pos.y, 100.0);
    }

    #[test]
    fn test_obstacle_normal_only_for_reflecting_surfaces() {
        let hole: Obstacle = Hole::new(0.0, 0.0, 5.0).into();
        assert_eq!(hole.normal_at(DVec2::ZERO), None);
        let wall: Obstacle = Wall::new(0.0, 0.0, 5.0).into();
        assert!(wall.normal_at(DVec2::new(-6.0, 0.0)).is_some());
    }

    proptest! {
        #[test]
        fn edge_push_back_is_legal(x in -50.0..850.0f64, y in -50.0..650.0f64) {
            let edge = arena();
            let tank = TankHitbox::new(x, y);
            if edge.collides(&tank) {
                prop_assert!(!edge.collides(&edge.push_back(tank)));
            }
            let shot = ShotHitbox::new(x, y);
            if edge.collides(&shot) {
                prop_assert!(!edge.collides(&edge.push_back(shot)));
            }
        }

        #[test]
        fn wall_push_back_is_legal(
            x in 60.0..160.0f64,
            y in 0.0..100.0f64,
            fx in 0.0..220.0f64,
            fy in -50.0..150.0f64,
        ) {
            let wall = Wall::new(110.0, 50.0, 12.0);
            let from = DVec2::new(fx, fy);
            let tank = TankHitbox::new(x, y);
            if wall.collides(&tank) {
                prop_assert!(!wall.collides(&wall.push_back(tank, from)));
            }
            let shot = ShotHitbox::new(x, y);
            if wall.collides(&shot) {
                prop_assert!(!wall.collides(&wall.push_back(shot, from)));
            }
        }

        #[test]
        fn hole_push_back_is_legal(x in 60.0..140.0f64, y in 60.0..140.0f64) {
            let hole = Hole::new(100.0, 100.0, 12.0);
            let tank = TankHitbox::new(x, y);
            if hole.collides(&tank) {
                prop_assert!(!hole.collides(&hole.push_back(tank)));
            }
        }
    }
}
