//! Primitive shapes understood by the narrowphase and the sweep caster.
//!
//! Coordinates are screen-style: `y` grows downward, so the `Top*` rect
//! alignments anchor the minimum-`y` edge.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Aabb, EPSILON};

/// Circle with its squared radius cached.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "CircleDef", into = "CircleDef")
)]
pub struct Circle {
    pub center: Vec2,
    radius: f32,
    radius_sq: f32,
}

impl Circle {
    /// Negative radii are treated as their absolute value.
    pub fn new(center: Vec2, radius: f32) -> Self {
        let radius = radius.abs();
        Self {
            center,
            radius,
            radius_sq: radius * radius,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radius_sq(&self) -> f32 {
        self.radius_sq
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.abs();
        self.radius_sq = self.radius * self.radius;
    }
}

/// Line segment stored as origin + unit direction + length.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "SegmentDef", into = "SegmentDef")
)]
pub struct Segment {
    pub origin: Vec2,
    dir: Vec2,
    len: f32,
}

impl Segment {
    /// `dir` is normalised; a zero direction yields a zero-length segment.
    pub fn new(origin: Vec2, dir: Vec2, len: f32) -> Self {
        let unit = dir.normalize_or_zero();
        let len = if unit == Vec2::ZERO { 0.0 } else { len.abs() };
        Self {
            origin,
            dir: unit,
            len,
        }
    }

    pub fn from_points(start: Vec2, end: Vec2) -> Self {
        let d = end - start;
        Self::new(start, d, d.length())
    }

    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    pub fn len(&self) -> f32 {
        self.len
    }

    pub fn is_degenerate(&self) -> bool {
        self.len <= EPSILON
    }

    pub fn start(&self) -> Vec2 {
        self.origin
    }

    pub fn end(&self) -> Vec2 {
        self.origin + self.dir * self.len
    }

    /// Full displacement from start to end.
    pub fn delta(&self) -> Vec2 {
        self.dir * self.len
    }

    pub fn midpoint(&self) -> Vec2 {
        self.origin + self.dir * (self.len * 0.5)
    }

    /// Point at distance `s` along the segment (not clamped).
    pub fn at(&self, s: f32) -> Vec2 {
        self.origin + self.dir * s
    }

    /// Scalar projection of `p` onto the segment axis, measured from the origin.
    pub fn project(&self, p: Vec2) -> f32 {
        (p - self.origin).dot(self.dir)
    }

    /// Closest point on the segment to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        self.at(self.project(p).clamp(0.0, self.len))
    }

    /// Unit normal of the segment's line, turned to face `reference`.
    pub fn normal_towards(&self, reference: Vec2) -> Vec2 {
        let n = self.dir.perp();
        if n.dot(reference - self.origin) < 0.0 { -n } else { n }
    }
}

/// Serialized form of [`Circle`]; loading goes through [`Circle::new`].
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct CircleDef {
    center: Vec2,
    radius: f32,
}

#[cfg(feature = "serde")]
impl From<CircleDef> for Circle {
    fn from(def: CircleDef) -> Self {
        Circle::new(def.center, def.radius)
    }
}

#[cfg(feature = "serde")]
impl From<Circle> for CircleDef {
    fn from(c: Circle) -> Self {
        CircleDef {
            center: c.center,
            radius: c.radius,
        }
    }
}

/// Serialized form of [`Segment`]; `dir` need not be normalised on disk.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct SegmentDef {
    origin: Vec2,
    dir: Vec2,
    len: f32,
}

#[cfg(feature = "serde")]
impl From<SegmentDef> for Segment {
    fn from(def: SegmentDef) -> Self {
        Segment::new(def.origin, def.dir, def.len)
    }
}

#[cfg(feature = "serde")]
impl From<Segment> for SegmentDef {
    fn from(s: Segment) -> Self {
        SegmentDef {
            origin: s.origin,
            dir: s.dir,
            len: s.len,
        }
    }
}

/// Which point of a [`Rect`] its `origin` designates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Alignment {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Alignment {
    /// Anchor as a fraction of the rect size, measured from the min corner.
    pub fn anchor(self) -> Vec2 {
        match self {
            Alignment::TopLeft => Vec2::new(0.0, 0.0),
            Alignment::Top => Vec2::new(0.5, 0.0),
            Alignment::TopRight => Vec2::new(1.0, 0.0),
            Alignment::Left => Vec2::new(0.0, 0.5),
            Alignment::Center => Vec2::new(0.5, 0.5),
            Alignment::Right => Vec2::new(1.0, 0.5),
            Alignment::BottomLeft => Vec2::new(0.0, 1.0),
            Alignment::Bottom => Vec2::new(0.5, 1.0),
            Alignment::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Axis-aligned rectangle positioned by an aligned origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
    pub align: Alignment,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2, align: Alignment) -> Self {
        Self {
            origin,
            size: size.abs(),
            align,
        }
    }

    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size, Alignment::Center)
    }

    /// Offset from `origin` to the min corner.
    pub fn offset(&self) -> Vec2 {
        -self.size * self.align.anchor()
    }

    pub fn min(&self) -> Vec2 {
        self.origin + self.offset()
    }

    pub fn max(&self) -> Vec2 {
        self.min() + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.min(),
            max: self.max(),
        }
    }

    /// Corners in winding order starting at the min corner.
    pub fn corners(&self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
    }

    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::from_points(c[0], c[1]),
            Segment::from_points(c[1], c[2]),
            Segment::from_points(c[2], c[3]),
            Segment::from_points(c[3], c[0]),
        ]
    }
}

/// Polygon given by an ordered vertex list; edges wrap around.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn from_rect(rect: &Rect) -> Self {
        Self::new(rect.corners().to_vec())
    }

    /// Fewer than three vertices enclose no area.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::from_points(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertex average. Zero for an empty polygon.
    pub fn centroid(&self) -> Vec2 {
        if self.vertices.is_empty() {
            return Vec2::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32
    }

    pub fn aabb(&self) -> Aabb {
        let mut it = self.vertices.iter().copied();
        let Some(first) = it.next() else {
            return Aabb {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            };
        };
        it.fold(Aabb { min: first, max: first }, |acc, v| Aabb {
            min: acc.min.min(v),
            max: acc.max.max(v),
        })
    }

    /// True when every turn has the same sign (collinear runs allowed).
    pub fn is_convex(&self) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let n = self.vertices.len();
        let mut sign = 0.0f32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let turn = (b - a).perp_dot(c - b);
            if turn.abs() <= EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = turn.signum();
            } else if turn.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }

    /// Ray-crossing parity test with a ray cast along +x.
    pub fn contains_point(&self, p: Vec2) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > p.y) != (vj.y > p.y) {
                let x_cross = vj.x + (p.y - vj.y) * (vi.x - vj.x) / (vi.y - vj.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }
}

/// Closed set of collision primitives.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    Point(Vec2),
    Circle(Circle),
    Segment(Segment),
    Rect(Rect),
    Polygon(Polygon),
}

impl Primitive {
    pub fn point(p: Vec2) -> Self {
        Primitive::Point(p)
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Primitive::Circle(Circle::new(center, radius))
    }

    pub fn segment(start: Vec2, end: Vec2) -> Self {
        Primitive::Segment(Segment::from_points(start, end))
    }

    pub fn rect(origin: Vec2, size: Vec2, align: Alignment) -> Self {
        Primitive::Rect(Rect::new(origin, size, align))
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Self {
        Primitive::Polygon(Polygon::new(vertices))
    }

    /// The point normals are oriented against by default.
    pub fn center(&self) -> Vec2 {
        match self {
            Primitive::Point(p) => *p,
            Primitive::Circle(c) => c.center,
            Primitive::Segment(s) => s.midpoint(),
            Primitive::Rect(r) => r.center(),
            Primitive::Polygon(poly) => poly.centroid(),
        }
    }

    /// The point that `set_position` moves: origin for segments and rects,
    /// first vertex for polygons.
    pub fn position(&self) -> Vec2 {
        match self {
            Primitive::Point(p) => *p,
            Primitive::Circle(c) => c.center,
            Primitive::Segment(s) => s.origin,
            Primitive::Rect(r) => r.origin,
            Primitive::Polygon(poly) => poly.vertices.first().copied().unwrap_or(Vec2::ZERO),
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position();
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Primitive::Point(p) => *p += delta,
            Primitive::Circle(c) => c.center += delta,
            Primitive::Segment(s) => s.origin += delta,
            Primitive::Rect(r) => r.origin += delta,
            Primitive::Polygon(poly) => poly.translate(delta),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Primitive::Point(p) => Aabb { min: *p, max: *p },
            Primitive::Circle(c) => Aabb::from_center(c.center, Vec2::splat(c.radius())),
            Primitive::Segment(s) => Aabb::new(s.start(), s.end()),
            Primitive::Rect(r) => r.aabb(),
            Primitive::Polygon(poly) => poly.aabb(),
        }
    }

    /// Boundary vertices of edge-shaped variants; empty for points and circles.
    pub fn vertices(&self) -> Vec<Vec2> {
        match self {
            Primitive::Point(_) | Primitive::Circle(_) => Vec::new(),
            Primitive::Segment(s) => vec![s.start(), s.end()],
            Primitive::Rect(r) => r.corners().to_vec(),
            Primitive::Polygon(poly) => poly.vertices.clone(),
        }
    }

    /// Boundary edges of edge-shaped variants; empty for points and circles.
    pub fn edges(&self) -> Vec<Segment> {
        match self {
            Primitive::Point(_) | Primitive::Circle(_) => Vec::new(),
            Primitive::Segment(s) => vec![*s],
            Primitive::Rect(r) => r.edges().to_vec(),
            Primitive::Polygon(poly) => poly.edges().collect(),
        }
    }
}

impl From<Circle> for Primitive {
    fn from(c: Circle) -> Self {
        Primitive::Circle(c)
    }
}

impl From<Segment> for Primitive {
    fn from(s: Segment) -> Self {
        Primitive::Segment(s)
    }
}

impl From<Rect> for Primitive {
    fn from(r: Rect) -> Self {
        Primitive::Rect(r)
    }
}

impl From<Polygon> for Primitive {
    fn from(p: Polygon) -> Self {
        Primitive::Polygon(p)
    }
}
