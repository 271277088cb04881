use serde::Serialize;

use crate::constants::{
    PARTICLE_CAP, PARTICLE_LIFETIME_MAX, PARTICLE_LIFETIME_MIN, PARTICLE_SPEED_MAX,
    PARTICLE_SPEED_MIN,
};
use crate::geometry::{wrap_point, Vec2};
use crate::rng::SeededRng;

/// Cosmetic debris point. Never takes part in collision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Opacity in `[0, 1]`, fading linearly with remaining life.
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burst(&mut self, rng: &mut SeededRng, origin: Vec2, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= PARTICLE_CAP {
                return;
            }
            let speed = rng.range_f32(PARTICLE_SPEED_MIN, PARTICLE_SPEED_MAX);
            let life = rng.range_f32(PARTICLE_LIFETIME_MIN, PARTICLE_LIFETIME_MAX);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(rng.angle()) * speed,
                life,
                max_life: life,
            });
        }
    }

    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        for particle in &mut self.particles {
            particle.life -= dt;
            particle.pos = wrap_point(particle.pos + particle.vel * dt, width, height);
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_particles_fade_and_expire() {
        let mut rng = SeededRng::new(11);
        let mut field = ParticleField::new();
        field.burst(&mut rng, Vec2::new(400.0, 300.0), 16);
        assert_eq!(field.len(), 16);
        assert!(field.iter().all(|p| p.alpha() == 1.0));

        field.update(PARTICLE_LIFETIME_MIN * 0.5, 800.0, 600.0);
        assert_eq!(field.len(), 16);
        assert!(field.iter().all(|p| p.alpha() < 1.0 && p.alpha() > 0.0));

        for _ in 0..40 {
            field.update(1.0 / 30.0, 800.0, 600.0);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn burst_respects_cap() {
        let mut rng = SeededRng::new(3);
        let mut field = ParticleField::new();
        field.burst(&mut rng, Vec2::ZERO, PARTICLE_CAP + 50);
        assert_eq!(field.len(), PARTICLE_CAP);
    }
}
