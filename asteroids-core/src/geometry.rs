//! Toroidal-arena geometry.
//!
//! Every function here is pure and fails soft: non-finite or degenerate input
//! yields a sentinel ("not inside", infinite distance, the lower bound) rather
//! than a panic, because half-torn-down entities can be queried within the
//! same frame that removes them.

use core::f32::consts::PI;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::constants::TAU;

const ON_EDGE_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` radians.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Maps `v` into `[lo, hi)` with a double modulo so negative input wraps
/// correctly. Returns `lo` when the range is empty or `v` is not finite.
pub fn wrap(v: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if !v.is_finite() || !span.is_finite() || span <= 0.0 {
        return lo;
    }
    if v >= lo && v < hi {
        return v;
    }

    let wrapped = ((v - lo) % span + span) % span + lo;
    if wrapped < lo || wrapped >= hi {
        lo
    } else {
        wrapped
    }
}

#[inline]
pub fn wrap_point(p: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap(p.x, 0.0, width), wrap(p.y, 0.0, height))
}

/// Signed offset from `from` to `to` along an axis of length `extent`,
/// taking the short way around. Result lies in `[-extent/2, extent/2)`.
pub fn shortest_delta(from: f32, to: f32, extent: f32) -> f32 {
    let half = extent * 0.5;
    wrap(to - from + half, 0.0, extent) - half
}

/// Copy of `p` translated to whichever toroidal image lies nearest `anchor`.
pub fn nearest_image(anchor: Vec2, p: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        anchor.x + shortest_delta(anchor.x, p.x, width),
        anchor.y + shortest_delta(anchor.y, p.y, height),
    )
}

/// Squared distance on the torus: per axis `min(|d|, extent - |d|)`.
/// Returns `f32::INFINITY` for non-finite input.
pub fn wrap_aware_distance_squared(p: Vec2, q: Vec2, width: f32, height: f32) -> f32 {
    if !p.is_finite() || !q.is_finite() || !(width > 0.0) || !(height > 0.0) {
        return f32::INFINITY;
    }

    let dx = (p.x - q.x).abs() % width;
    let dy = (p.y - q.y).abs() % height;
    let dx = dx.min(width - dx);
    let dy = dy.min(height - dy);
    dx * dx + dy * dy
}

pub fn circles_collide_wrapped(
    a: Vec2,
    a_radius: f32,
    b: Vec2,
    b_radius: f32,
    width: f32,
    height: f32,
) -> bool {
    let reach = a_radius + b_radius;
    wrap_aware_distance_squared(a, b, width, height) <= reach * reach
}

/// Plain Euclidean circle test, for entities treated as on-screen only.
pub fn circles_collide(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let reach = a_radius + b_radius;
    (a - b).length_squared() <= reach * reach
}

/// Ray-casting parity test, boundary inclusive: a point on any vertex or
/// edge (horizontal edges included) is inside. Fewer than three vertices or
/// a non-finite query point is never inside.
pub fn point_in_polygon(poly: &[Vec2], px: f32, py: f32) -> bool {
    if poly.len() < 3 || !px.is_finite() || !py.is_finite() {
        return false;
    }

    let p = Vec2::new(px, py);
    let mut inside = false;
    let mut j = poly.len() - 1;

    for i in 0..poly.len() {
        let a = poly[j];
        let b = poly[i];
        j = i;

        if on_segment(a, b, p) {
            return true;
        }

        if a.y == b.y {
            continue;
        }

        let (min_y, max_y) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        if py < min_y || py >= max_y {
            continue;
        }

        let x_intercept = a.x + (py - a.y) * (b.x - a.x) / (b.y - a.y);
        if px == x_intercept {
            return true;
        }
        if px < x_intercept {
            inside = !inside;
        }
    }

    inside
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    let ab = b - a;
    let ap = p - a;
    let cross = ab.x * ap.y - ab.y * ap.x;
    let scale = ab.length().max(1.0);
    if cross.abs() > ON_EDGE_EPSILON * scale {
        return false;
    }

    let min_x = a.x.min(b.x) - ON_EDGE_EPSILON;
    let max_x = a.x.max(b.x) + ON_EDGE_EPSILON;
    let min_y = a.y.min(b.y) - ON_EDGE_EPSILON;
    let max_y = a.y.max(b.y) + ON_EDGE_EPSILON;
    p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
}

/// Rotates each local vertex by `angle`, then translates by `(cx, cy)`.
pub fn transform_vertices(local: &[Vec2], cx: f32, cy: f32, angle: f32) -> Vec<Vec2> {
    let (sin, cos) = angle.sin_cos();
    local
        .iter()
        .map(|v| Vec2::new(v.x * cos - v.y * sin + cx, v.x * sin + v.y * cos + cy))
        .collect()
}

/// `t²(3 − 2t)` with `t` clamped to `[0, 1]`. A zero-width edge is a step.
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    if e1 == e0 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    if t.is_nan() {
        return 0.0;
    }
    t * t * (3.0 - 2.0 * t)
}

/// Normalizes an angle into `[-π, π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    wrap(angle + PI, 0.0, TAU) - PI
}

#[cfg(test)]
mod proptest_geometry;
