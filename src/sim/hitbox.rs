//! Hitbox shapes and pairwise collision predicates
//!
//! Every shape implements the full predicate set in [`Collide`]. Mixed pairs are
//! written once on one side and delegated from the other, so `a.collide(b)` and
//! `b.collide(a)` always agree.
//!
//! Boundary policy: point-in-sphere and sphere-sphere are strict (touching is
//! not a hit), rect containment and rect overlap are inclusive.

use glam::DVec2;

use super::vector::{clip, direction};
use crate::consts::{EPS, SHOT_RADIUS, TANK_RX, TANK_RY};

/// The four collision predicates every shape answers
pub trait Collide {
    fn collide_point(&self, p: &PointHitbox) -> bool;
    fn collide_sphere(&self, s: &SphereHitbox) -> bool;
    fn collide_rect(&self, r: &RectHitbox) -> bool;
    fn collide_caps(&self, c: &CapsuleHitbox) -> bool;
}

/// Degenerate shape: a single position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHitbox {
    pub pos: DVec2,
}

impl PointHitbox {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }
}

impl Collide for PointHitbox {
    fn collide_point(&self, p: &PointHitbox) -> bool {
        (self.pos.x - p.pos.x).abs() < EPS && (self.pos.y - p.pos.y).abs() < EPS
    }

    fn collide_sphere(&self, s: &SphereHitbox) -> bool {
        s.collide_point(self)
    }

    fn collide_rect(&self, r: &RectHitbox) -> bool {
        r.collide_point(self)
    }

    fn collide_caps(&self, c: &CapsuleHitbox) -> bool {
        c.collide_point(self)
    }
}

/// Circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHitbox {
    pub center: DVec2,
    pub r: f64,
}

impl SphereHitbox {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            r,
        }
    }

    pub fn at(center: DVec2, r: f64) -> Self {
        Self { center, r }
    }
}

impl Collide for SphereHitbox {
    fn collide_point(&self, p: &PointHitbox) -> bool {
        self.center.distance(p.pos) < self.r
    }

    fn collide_sphere(&self, s: &SphereHitbox) -> bool {
        self.center.distance(s.center) < self.r + s.r
    }

    fn collide_rect(&self, r: &RectHitbox) -> bool {
        let closest = r.closest_point(self.center);
        self.collide_point(&PointHitbox { pos: closest })
    }

    fn collide_caps(&self, c: &CapsuleHitbox) -> bool {
        c.collide_sphere(self)
    }
}

/// Axis-aligned box with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectHitbox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RectHitbox {
    /// Corners may be given in any order
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Box of half-extents `half` around `center`
    pub fn centered(center: DVec2, half: DVec2) -> Self {
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Point of the box nearest to `p` (`p` itself when inside)
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(clip(p.x, self.x1, self.x2), clip(p.y, self.y1, self.y2))
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x1, self.y1),
            DVec2::new(self.x2, self.y1),
            DVec2::new(self.x2, self.y2),
            DVec2::new(self.x1, self.y2),
        ]
    }
}

impl Collide for RectHitbox {
    fn collide_point(&self, p: &PointHitbox) -> bool {
        self.x1 <= p.pos.x && p.pos.x <= self.x2 && self.y1 <= p.pos.y && p.pos.y <= self.y2
    }

    fn collide_sphere(&self, s: &SphereHitbox) -> bool {
        s.collide_rect(self)
    }

    fn collide_rect(&self, o: &RectHitbox) -> bool {
        (self.x1 <= o.x2 && self.x2 >= o.x1) && (self.y1 <= o.y2 && self.y2 >= o.y1)
    }

    fn collide_caps(&self, c: &CapsuleHitbox) -> bool {
        c.collide_rect(self)
    }
}

/// A sphere of radius `r` swept from `p1` to `p2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleHitbox {
    pub p1: DVec2,
    pub p2: DVec2,
    pub r: f64,
    direction: DVec2,
    length: f64,
    bounding_box: RectHitbox,
}

impl CapsuleHitbox {
    pub fn new(p1: DVec2, p2: DVec2, r: f64) -> Self {
        let axis = direction(p2, p1);
        let bounding_box = RectHitbox::new(
            p1.x.min(p2.x) - r,
            p1.y.min(p2.y) - r,
            p1.x.max(p2.x) + r,
            p1.y.max(p2.y) + r,
        );
        Self {
            p1,
            p2,
            r,
            direction: axis.dir,
            length: axis.mag,
            bounding_box,
        }
    }

    /// Unit vector from `p1` to `p2` (zero when the endpoints coincide)
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn bounding_box(&self) -> &RectHitbox {
        &self.bounding_box
    }

    /// Point on the axis segment nearest to `p`
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        let t = (p - self.p1).dot(self.direction).clamp(0.0, self.length);
        self.p1 + self.direction * t
    }

    /// The swept sphere at the axis point nearest to `p`
    fn sphere_near(&self, p: DVec2) -> SphereHitbox {
        SphereHitbox::at(self.closest_point(p), self.r)
    }
}

impl Collide for CapsuleHitbox {
    fn collide_point(&self, p: &PointHitbox) -> bool {
        self.sphere_near(p.pos).collide_point(p)
    }

    fn collide_sphere(&self, s: &SphereHitbox) -> bool {
        self.sphere_near(s.center).collide_sphere(s)
    }

    /// Conservative approximation, not an exact separating-axis test.
    fn collide_rect(&self, r: &RectHitbox) -> bool {
        if !self.bounding_box.collide_rect(r) {
            return false;
        }
        if SphereHitbox::at(self.p1, self.r).collide_rect(r)
            || SphereHitbox::at(self.p2, self.r).collide_rect(r)
        {
            return true;
        }
        let mid = self.closest_point(r.center());
        let corners = r.corners();
        let vertex = corners[1..].iter().fold(corners[0], |best, &c| {
            if c.distance_squared(mid) < best.distance_squared(mid) {
                c
            } else {
                best
            }
        });
        self.sphere_near(vertex).collide_rect(r)
    }

    // Capsule pairs are never tested in play: no two capsule entities coexist.
    fn collide_caps(&self, _c: &CapsuleHitbox) -> bool {
        false
    }
}

/// Closed set of collision shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox {
    /// Never collides (non-solid tiles)
    Null,
    Point(PointHitbox),
    Sphere(SphereHitbox),
    Rect(RectHitbox),
    Capsule(CapsuleHitbox),
}

impl Hitbox {
    /// Pick the predicate on `self` that matches the shape of `other`
    pub fn collide(&self, other: &Hitbox) -> bool {
        match other {
            Hitbox::Null => false,
            Hitbox::Point(p) => self.collide_point(p),
            Hitbox::Sphere(s) => self.collide_sphere(s),
            Hitbox::Rect(r) => self.collide_rect(r),
            Hitbox::Capsule(c) => self.collide_caps(c),
        }
    }
}

impl Collide for Hitbox {
    fn collide_point(&self, p: &PointHitbox) -> bool {
        match self {
            Hitbox::Null => false,
            Hitbox::Point(h) => h.collide_point(p),
            Hitbox::Sphere(h) => h.collide_point(p),
            Hitbox::Rect(h) => h.collide_point(p),
            Hitbox::Capsule(h) => h.collide_point(p),
        }
    }

    fn collide_sphere(&self, s: &SphereHitbox) -> bool {
        match self {
            Hitbox::Null => false,
            Hitbox::Point(h) => h.collide_sphere(s),
            Hitbox::Sphere(h) => h.collide_sphere(s),
            Hitbox::Rect(h) => h.collide_sphere(s),
            Hitbox::Capsule(h) => h.collide_sphere(s),
        }
    }

    fn collide_rect(&self, r: &RectHitbox) -> bool {
        match self {
            Hitbox::Null => false,
            Hitbox::Point(h) => h.collide_rect(r),
            Hitbox::Sphere(h) => h.collide_rect(r),
            Hitbox::Rect(h) => h.collide_rect(r),
            Hitbox::Capsule(h) => h.collide_rect(r),
        }
    }

    fn collide_caps(&self, c: &CapsuleHitbox) -> bool {
        match self {
            Hitbox::Null => false,
            Hitbox::Point(h) => h.collide_caps(c),
            Hitbox::Sphere(h) => h.collide_caps(c),
            Hitbox::Rect(h) => h.collide_caps(c),
            Hitbox::Capsule(h) => h.collide_caps(c),
        }
    }
}

impl From<PointHitbox> for Hitbox {
    fn from(h: PointHitbox) -> Self {
        Hitbox::Point(h)
    }
}

impl From<SphereHitbox> for Hitbox {
    fn from(h: SphereHitbox) -> Self {
        Hitbox::Sphere(h)
    }
}

impl From<RectHitbox> for Hitbox {
    fn from(h: RectHitbox) -> Self {
        Hitbox::Rect(h)
    }
}

impl From<CapsuleHitbox> for Hitbox {
    fn from(h: CapsuleHitbox) -> Self {
        Hitbox::Capsule(h)
    }
}

/// A moving box of fixed half-extents around a center point
///
/// Edge accessors are derived from the center. The `with_*` setters return a
/// copy relocated so that the named edge sits at the given coordinate, which is
/// how obstacles express their corrections.
pub trait Body: Copy {
    const HALF_EXTENTS: DVec2;
    /// Whether holes in the floor stop this body
    const BLOCKED_BY_HOLES: bool;

    fn center(&self) -> DVec2;
    fn moved_to(self, center: DVec2) -> Self;
    /// Shape used against solid obstacles and other bodies
    fn hitbox(&self) -> Hitbox;

    fn x1(&self) -> f64 {
        self.center().x - Self::HALF_EXTENTS.x
    }
    fn y1(&self) -> f64 {
        self.center().y - Self::HALF_EXTENTS.y
    }
    fn x2(&self) -> f64 {
        self.center().x + Self::HALF_EXTENTS.x
    }
    fn y2(&self) -> f64 {
        self.center().y + Self::HALF_EXTENTS.y
    }

    fn with_x1(self, x1: f64) -> Self {
        let c = self.center();
        self.moved_to(DVec2::new(x1 + Self::HALF_EXTENTS.x, c.y))
    }
    fn with_y1(self, y1: f64) -> Self {
        let c = self.center();
        self.moved_to(DVec2::new(c.x, y1 + Self::HALF_EXTENTS.y))
    }
    fn with_x2(self, x2: f64) -> Self {
        let c = self.center();
        self.moved_to(DVec2::new(x2 - Self::HALF_EXTENTS.x, c.y))
    }
    fn with_y2(self, y2: f64) -> Self {
        let c = self.center();
        self.moved_to(DVec2::new(c.x, y2 - Self::HALF_EXTENTS.y))
    }

    fn translated(self, delta: DVec2) -> Self {
        let c = self.center();
        self.moved_to(c + delta)
    }

    fn bounds(&self) -> RectHitbox {
        RectHitbox::centered(self.center(), Self::HALF_EXTENTS)
    }

    /// Point of the body's box nearest to `p`
    fn closest_point(&self, p: DVec2) -> DVec2 {
        self.bounds().closest_point(p)
    }
}

/// Tank body: a 30x24 box around the tank's center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankHitbox {
    pub pos: DVec2,
}

impl TankHitbox {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }

    pub fn rect(&self) -> RectHitbox {
        self.bounds()
    }
}

impl Body for TankHitbox {
    const HALF_EXTENTS: DVec2 = DVec2::new(TANK_RX, TANK_RY);
    const BLOCKED_BY_HOLES: bool = true;

    fn center(&self) -> DVec2 {
        self.pos
    }

    fn moved_to(self, center: DVec2) -> Self {
        Self { pos: center }
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Rect(self.rect())
    }
}

/// Shot body: a circle of radius 5, boxed for edge tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotHitbox {
    pub pos: DVec2,
}

impl ShotHitbox {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }

    pub fn sphere(&self) -> SphereHitbox {
        SphereHitbox::at(self.pos, SHOT_RADIUS)
    }
}

impl Body for ShotHitbox {
    const HALF_EXTENTS: DVec2 = DVec2::new(SHOT_RADIUS, SHOT_RADIUS);
    const BLOCKED_BY_HOLES: bool = false;

    fn center(&self) -> DVec2 {
        self.pos
    }

    fn moved_to(self, center: DVec2) -> Self {
        Self { pos: center }
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Sphere(self.sphere())
    }
}
