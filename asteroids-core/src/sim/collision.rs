//! Per-frame collision resolution.
//!
//! Precedence: player vs asteroids, player vs craft body, player vs craft
//! bullets (these three stop at the first hit and only run while the ship
//! is active), then every player bullet vs asteroids, then every player
//! bullet vs the craft.

use super::Simulation;
use crate::audio::Cue;
use crate::constants::{EXPLOSION_PARTICLES_PER_TIER, HOSTILE_POINTS, SHIP_EXPLOSION_PARTICLES};

/// Explosion cue size for the hostile craft.
const HOSTILE_EXPLOSION_SIZE: u8 = 4;

impl Simulation {
    pub(super) fn resolve_collisions(&mut self) {
        if self.player.is_alive() {
            self.resolve_player_hits();
        }
        self.resolve_bullets_vs_asteroids();
        self.resolve_bullets_vs_hostile();
    }

    fn resolve_player_hits(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        let (pos, radius) = (self.player.pos, self.player.radius);

        let hull = self.player.world_polygon();
        if self
            .asteroids
            .check_player_collision(&hull, pos, radius, width, height)
        {
            self.destroy_player();
            return;
        }

        if self.hostile.craft_hits_player(pos, radius, width, height) {
            self.destroy_player();
            return;
        }

        if let Some(index) = self
            .hostile
            .bullet_hitting_player(pos, radius, width, height)
        {
            self.hostile.bullets_mut().remove(index);
            self.destroy_player();
        }
    }

    fn resolve_bullets_vs_asteroids(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        let mut index = 0;
        while let Some(bullet) = self.bullets.get(index).copied() {
            let Some(hit) = self
                .asteroids
                .check_bullet_collision(bullet.pos, width, height)
            else {
                index += 1;
                continue;
            };
            self.bullets.remove(index);
            self.destroy_asteroid(hit);
            self.check_wave_clear();
        }
    }

    fn resolve_bullets_vs_hostile(&mut self) {
        let mut index = 0;
        while let Some(bullet) = self.bullets.get(index).copied() {
            if !self.hostile.bullet_hits_craft(bullet.pos, bullet.radius) {
                index += 1;
                continue;
            }
            self.bullets.remove(index);
            self.destroy_hostile();
            self.check_wave_clear();
        }
    }

    /// Costs a life. No-op unless the ship is active.
    pub(super) fn destroy_player(&mut self) -> bool {
        let was_thrusting = self.player.is_thrusting();
        let pos = self.player.pos;
        if !self.player.hit(&mut self.rng) {
            return false;
        }

        self.lives -= 1;
        self.particles
            .burst(&mut self.rng, pos, SHIP_EXPLOSION_PARTICLES);
        if was_thrusting {
            self.cue(Cue::ThrustStop);
        }
        self.cue(Cue::Explosion(0));
        if self.hostile.force_leave(self.config.width) {
            tracing::debug!("hostile craft leaving after player death");
        }
        tracing::info!(lives = self.lives, x = pos.x, y = pos.y, "player destroyed");
        true
    }

    fn destroy_asteroid(&mut self, index: usize) {
        let (width, height) = (self.config.width, self.config.height);
        let Some((tier, pos)) = self.asteroids.get(index).map(|a| (a.tier, a.pos)) else {
            return;
        };
        let Some(points) = self.asteroids.break_at(&mut self.rng, index, width, height) else {
            return;
        };

        self.add_score(points);
        self.particles.burst(
            &mut self.rng,
            pos,
            EXPLOSION_PARTICLES_PER_TIER * usize::from(tier.as_u8()),
        );
        self.cue(Cue::Explosion(tier.as_u8()));
    }

    fn destroy_hostile(&mut self) {
        let Some(craft) = self.hostile.destroy() else {
            return;
        };

        self.add_score(HOSTILE_POINTS);
        self.particles
            .burst(&mut self.rng, craft.pos, SHIP_EXPLOSION_PARTICLES);
        self.cue(Cue::Explosion(HOSTILE_EXPLOSION_SIZE));
        self.cue(Cue::SirenStop);
        tracing::debug!(score = self.score, "hostile craft destroyed");
    }
}
