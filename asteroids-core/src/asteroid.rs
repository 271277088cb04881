use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_BASE_SPEED_MAX, ASTEROID_BASE_SPEED_MIN, ASTEROID_CHILD_JITTER,
    ASTEROID_IRREGULARITY, ASTEROID_SPIN_MAX, ASTEROID_TIER_TABLE, ASTEROID_VERTICES_MAX,
    ASTEROID_VERTICES_MIN, TAU, WAVE_SAFE_RADIUS, WAVE_SPAWN_ATTEMPTS,
};
use crate::geometry::{
    nearest_image, point_in_polygon, transform_vertices, wrap, wrap_aware_distance_squared,
    wrap_point, Vec2,
};
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AsteroidTier {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl AsteroidTier {
    pub fn from_u8(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Small),
            2 => Some(Self::Medium),
            3 => Some(Self::Large),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn radius(self) -> f32 {
        ASTEROID_TIER_TABLE[self as usize - 1].0
    }

    #[inline]
    pub fn points(self) -> u32 {
        ASTEROID_TIER_TABLE[self as usize - 1].1
    }

    /// Smaller fragments move faster: `1.5 − tier·0.3`.
    #[inline]
    pub fn speed_multiplier(self) -> f32 {
        1.5 - f32::from(self.as_u8()) * 0.3
    }

    /// Tier of the two fragments this asteroid splits into.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub spin: f32,
    pub tier: AsteroidTier,
    pub radius: f32,
    pub points: u32,
    /// Closed outline in local space. Generated outlines stay within
    /// `radius`; hand-built ones may not.
    pub shape: Vec<Vec2>,
}

impl Asteroid {
    pub fn random(rng: &mut SeededRng, tier: AsteroidTier, pos: Vec2) -> Self {
        let radius = tier.radius();
        let vertex_count = rng.next_range(ASTEROID_VERTICES_MIN, ASTEROID_VERTICES_MAX + 1);
        let step = TAU / vertex_count as f32;
        let shape = (0..vertex_count)
            .map(|i| {
                let jitter = 1.0 - ASTEROID_IRREGULARITY * rng.next_f32();
                Vec2::from_angle(step * i as f32) * (radius * jitter)
            })
            .collect();

        let speed =
            rng.range_f32(ASTEROID_BASE_SPEED_MIN, ASTEROID_BASE_SPEED_MAX) * tier.speed_multiplier();
        let vel = Vec2::from_angle(rng.angle()) * speed;
        let angle = rng.angle();
        let spin = rng.range_f32(-ASTEROID_SPIN_MAX, ASTEROID_SPIN_MAX);

        Self::with_shape(tier, pos, vel, angle, spin, shape)
    }

    pub fn with_shape(
        tier: AsteroidTier,
        pos: Vec2,
        vel: Vec2,
        angle: f32,
        spin: f32,
        shape: Vec<Vec2>,
    ) -> Self {
        Self {
            pos,
            vel,
            angle,
            spin,
            tier,
            radius: tier.radius(),
            points: tier.points(),
            shape,
        }
    }

    pub fn world_polygon(&self) -> Vec<Vec2> {
        transform_vertices(&self.shape, self.pos.x, self.pos.y, self.angle)
    }

    /// Distance from the centre to the farthest outline vertex, never less
    /// than `radius`.
    pub fn outer_radius(&self) -> f32 {
        self.shape
            .iter()
            .map(|v| v.length())
            .fold(self.radius, f32::max)
    }

    /// World polygon placed at the toroidal image of this asteroid closest to
    /// `anchor`, so shapes straddling an edge still meet their neighbours.
    pub fn world_polygon_near(&self, anchor: Vec2, width: f32, height: f32) -> Vec<Vec2> {
        let center = nearest_image(anchor, self.pos, width, height);
        transform_vertices(&self.shape, center.x, center.y, self.angle)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AsteroidField {
    asteroids: Vec<Asteroid>,
}

impl AsteroidField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the field and places `count` large asteroids at least
    /// `WAVE_SAFE_RADIUS` (wrap-aware) from `avoid`.
    pub fn spawn_wave(
        &mut self,
        rng: &mut SeededRng,
        count: usize,
        avoid: Vec2,
        width: f32,
        height: f32,
    ) {
        self.asteroids.clear();
        let safe_sq = WAVE_SAFE_RADIUS * WAVE_SAFE_RADIUS;

        for _ in 0..count {
            let mut pos = Vec2::new(rng.range_f32(0.0, width), rng.range_f32(0.0, height));
            let mut attempts = 1;
            while attempts < WAVE_SPAWN_ATTEMPTS
                && wrap_aware_distance_squared(pos, avoid, width, height) < safe_sq
            {
                pos = Vec2::new(rng.range_f32(0.0, width), rng.range_f32(0.0, height));
                attempts += 1;
            }
            if wrap_aware_distance_squared(pos, avoid, width, height) < safe_sq {
                // Arena too cramped for sampling to succeed; push out radially.
                pos = wrap_point(avoid + Vec2::from_angle(rng.angle()) * WAVE_SAFE_RADIUS, width, height);
            }
            self.asteroids
                .push(Asteroid::random(rng, AsteroidTier::Large, pos));
        }
    }

    pub fn push(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        for asteroid in &mut self.asteroids {
            asteroid.pos = wrap_point(asteroid.pos + asteroid.vel * dt, width, height);
            asteroid.angle = wrap(asteroid.angle + asteroid.spin * dt, 0.0, TAU);
        }
    }

    /// Removes the asteroid at `index` and returns its point value. Tiers
    /// above small leave two fresh fragments one tier down near the parent's
    /// last position. Out-of-range indices are a no-op.
    pub fn break_at(
        &mut self,
        rng: &mut SeededRng,
        index: usize,
        width: f32,
        height: f32,
    ) -> Option<u32> {
        if index >= self.asteroids.len() {
            return None;
        }
        let parent = self.asteroids.remove(index);

        if let Some(child_tier) = parent.tier.child() {
            for _ in 0..2 {
                let jitter = Vec2::new(
                    rng.range_f32(-ASTEROID_CHILD_JITTER, ASTEROID_CHILD_JITTER),
                    rng.range_f32(-ASTEROID_CHILD_JITTER, ASTEROID_CHILD_JITTER),
                );
                let pos = wrap_point(parent.pos + jitter, width, height);
                self.asteroids.push(Asteroid::random(rng, child_tier, pos));
            }
        }

        tracing::trace!(
            tier = parent.tier.as_u8(),
            remaining = self.asteroids.len(),
            "asteroid broken"
        );
        Some(parent.points)
    }

    /// Index of the first asteroid, in field order, whose polygon contains
    /// `point`.
    pub fn check_bullet_collision(&self, point: Vec2, width: f32, height: f32) -> Option<usize> {
        self.asteroids.iter().position(|asteroid| {
            let reach = asteroid.outer_radius();
            if wrap_aware_distance_squared(point, asteroid.pos, width, height) > reach * reach {
                return false;
            }
            let poly = asteroid.world_polygon_near(point, width, height);
            point_in_polygon(&poly, point.x, point.y)
        })
    }

    /// Bidirectional vertex containment against the ship's world polygon.
    ///
    /// Approximation: two outlines that cross only along edges, with no
    /// vertex of either inside the other, are not detected.
    pub fn check_player_collision(
        &self,
        ship: &[Vec2],
        ship_center: Vec2,
        ship_radius: f32,
        width: f32,
        height: f32,
    ) -> bool {
        self.first_player_collision(ship, ship_center, ship_radius, width, height)
            .is_some()
    }

    pub fn first_player_collision(
        &self,
        ship: &[Vec2],
        ship_center: Vec2,
        ship_radius: f32,
        width: f32,
        height: f32,
    ) -> Option<usize> {
        if ship.len() < 3 {
            return None;
        }

        // The hull nose sits past the nominal ship radius.
        let ship_reach = ship
            .iter()
            .map(|v| (*v - ship_center).length())
            .fold(ship_radius, f32::max);

        self.asteroids.iter().position(|asteroid| {
            let reach = asteroid.outer_radius() + ship_reach;
            if wrap_aware_distance_squared(ship_center, asteroid.pos, width, height) > reach * reach
            {
                return false;
            }
            let poly = asteroid.world_polygon_near(ship_center, width, height);
            ship.iter().any(|v| point_in_polygon(&poly, v.x, v.y))
                || poly.iter().any(|v| point_in_polygon(ship, v.x, v.y))
        })
    }

    pub fn clear(&mut self) {
        self.asteroids.clear();
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Asteroid> {
        self.asteroids.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.iter()
    }
}
