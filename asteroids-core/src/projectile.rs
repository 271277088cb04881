use serde::Serialize;

use crate::geometry::{wrap_point, Vec2};

/// Remaining life below this counts as expired, so accumulated `dt`
/// rounding cannot keep a bullet alive one frame past its lifetime.
const LIFE_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub radius: f32,
}

/// Ordered pool of live bullets. Iteration order is spawn order.
#[derive(Clone, Debug, Default)]
pub struct BulletPool {
    bullets: Vec<Bullet>,
}

impl BulletPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, life: f32, radius: f32) {
        self.bullets.push(Bullet {
            pos,
            vel,
            life,
            radius,
        });
    }

    /// Counts lifetimes down, drops expired bullets and moves the rest with
    /// toroidal wrap. Returns how many expired.
    pub fn update(&mut self, dt: f32, width: f32, height: f32) -> usize {
        let before = self.bullets.len();
        self.bullets.retain_mut(|bullet| {
            bullet.life -= dt;
            if bullet.life <= LIFE_EPSILON {
                return false;
            }
            bullet.pos = wrap_point(bullet.pos + bullet.vel * dt, width, height);
            true
        });
        before - self.bullets.len()
    }

    pub fn remove(&mut self, index: usize) -> Option<Bullet> {
        if index < self.bullets.len() {
            Some(self.bullets.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bullet> {
        self.bullets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter()
    }

    pub fn as_slice(&self) -> &[Bullet] {
        &self.bullets
    }
}
