//! Read-only view of a frame for renderers and pilots.

use serde::Serialize;

use crate::geometry::Vec2;
use crate::hostile::HostilePhase;
use crate::player::{Lifecycle, SegmentView};
use crate::projectile::Bullet;
use crate::sim::GameMode;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub lifecycle: Lifecycle,
    /// False during the blink-off half of the invulnerability window.
    pub visible: bool,
    pub invulnerable: f32,
    pub fire_cooldown: f32,
    pub hyperspace_cooldown: f32,
    /// World hull; empty unless the ship is active.
    pub polygon: Vec<Vec2>,
    pub segments: Vec<SegmentView>,
    /// Completed fraction of the death, respawn or wreck-fade animation.
    /// `None` while the ship is active or removed.
    pub animation_progress: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AsteroidSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub tier: u8,
    pub radius: f32,
    pub polygon: Vec<Vec2>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostileSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub phase: HostilePhase,
    pub polygon: Vec<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub pos: Vec2,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub width: f32,
    pub height: f32,
    pub mode: GameMode,
    pub score: u32,
    pub lives: i32,
    pub wave: u32,
    pub next_extra_life_score: u32,
    pub rng_state: u32,
    pub hostile_spawn_timer: f32,
    pub player: PlayerSnapshot,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub bullets: Vec<Bullet>,
    pub hostile: Option<HostileSnapshot>,
    pub hostile_bullets: Vec<Bullet>,
    pub particles: Vec<ParticleSnapshot>,
}

impl WorldSnapshot {
    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }
}
