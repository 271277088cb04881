use super::{wave_asteroid_count, GameMode, ReplayResult};
use crate::asteroid::AsteroidField;
use crate::audio::{emit, AudioSink, Cue, NullAudio};
use crate::config::SimConfig;
use crate::constants::{
    ASTEROID_VERTICES_MAX, ASTEROID_VERTICES_MIN, EXTRA_LIFE_SCORE_STEP,
    HOSTILE_DESPAWN_MARGIN, HYPERSPACE_COOLDOWN, MAX_FRAME_DT, PARTICLE_CAP, SHIP_BULLET_LIMIT,
    SHIP_FIRE_COOLDOWN, SHIP_HULL, SHIP_SPAWN_INVULNERABLE, STARTING_LIVES,
};
use crate::error::{RuleCode, SimError};
use crate::geometry::Vec2;
use crate::hostile::HostileBay;
use crate::input::{Command, FrameInput};
use crate::particles::ParticleField;
use crate::player::{AnimationEvent, Lifecycle, Player};
use crate::projectile::{Bullet, BulletPool};
use crate::rng::SeededRng;
use crate::snapshot::{
    AsteroidSnapshot, HostileSnapshot, ParticleSnapshot, PlayerSnapshot, WorldSnapshot,
};

/// One self-contained game. Every entity collection, counter and the random
/// generator live here; independent instances never share state.
pub struct Simulation {
    pub(super) config: SimConfig,
    pub(super) rng: SeededRng,
    pub(super) audio: Box<dyn AudioSink>,
    pub(super) mode: GameMode,
    pub(super) score: u32,
    pub(super) lives: i32,
    pub(super) wave: u32,
    pub(super) next_extra_life_score: u32,
    pub(super) frame_count: u32,
    pub(super) quit_requested: bool,
    pub(super) player: Player,
    pub(super) asteroids: AsteroidField,
    pub(super) bullets: BulletPool,
    pub(super) hostile: HostileBay,
    pub(super) particles: ParticleField,
}

impl Simulation {
    /// Builds a simulation sitting on the title screen.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = SeededRng::new(config.seed);
        let hostile = HostileBay::new(&mut rng);

        Ok(Self {
            config,
            rng,
            audio: Box::new(NullAudio),
            mode: GameMode::Title,
            score: 0,
            lives: STARTING_LIVES,
            wave: 0,
            next_extra_life_score: EXTRA_LIFE_SCORE_STEP,
            frame_count: 0,
            quit_requested: false,
            player: Player::new(config.width, config.height),
            asteroids: AsteroidField::new(),
            bullets: BulletPool::new(),
            hostile,
            particles: ParticleField::new(),
        })
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn asteroids(&self) -> &AsteroidField {
        &self.asteroids
    }

    pub fn bullets(&self) -> &BulletPool {
        &self.bullets
    }

    pub fn hostile(&self) -> &HostileBay {
        &self.hostile
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn result(&self) -> ReplayResult {
        ReplayResult {
            final_score: self.score,
            final_lives: self.lives,
            final_wave: self.wave,
            final_rng_state: self.rng.state(),
            frame_count: self.frame_count,
            mode: self.mode,
        }
    }

    /// Applies a discrete key press. Returns false when the command has no
    /// meaning in the current mode.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::StartGame => {
                if self.mode != GameMode::Title {
                    return false;
                }
                self.start_game();
                true
            }
            Command::Restart => {
                self.start_game();
                true
            }
            Command::ReturnToTitle => {
                self.silence_loops();
                self.discard_entities();
                self.mode = GameMode::Title;
                tracing::info!(score = self.score, "returned to title");
                true
            }
            Command::Quit => {
                self.quit_requested = true;
                true
            }
        }
    }

    fn start_game(&mut self) {
        self.silence_loops();
        self.discard_entities();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.wave = 0;
        self.next_extra_life_score = EXTRA_LIFE_SCORE_STEP;
        self.mode = GameMode::Playing;
        self.start_next_wave();
    }

    fn silence_loops(&mut self) {
        if self.player.is_thrusting() {
            self.cue(Cue::ThrustStop);
        }
        if self.hostile.is_present() {
            self.cue(Cue::SirenStop);
        }
    }

    /// Drops every collection outright; no graceful drain.
    fn discard_entities(&mut self) {
        self.player = Player::new(self.config.width, self.config.height);
        self.asteroids.clear();
        self.bullets.clear();
        self.hostile.clear(&mut self.rng);
        self.particles.clear();
    }

    /// Replaces the asteroid field with `count` large asteroids kept clear of
    /// the ship (or the arena centre while the ship is not active).
    pub fn spawn_wave(&mut self, count: usize) {
        let avoid = if self.player.is_alive() {
            self.player.pos
        } else {
            Vec2::new(self.config.width * 0.5, self.config.height * 0.5)
        };
        self.asteroids.spawn_wave(
            &mut self.rng,
            count,
            avoid,
            self.config.width,
            self.config.height,
        );
    }

    pub(super) fn start_next_wave(&mut self) {
        self.wave += 1;
        let count = wave_asteroid_count(self.wave);
        self.spawn_wave(count);
        tracing::info!(wave = self.wave, asteroids = count, "wave started");
    }

    /// Starts the next wave once the field is empty, no craft is around and
    /// the ship is fully alive.
    pub(super) fn check_wave_clear(&mut self) -> bool {
        let clear = self.mode == GameMode::Playing
            && self.asteroids.is_empty()
            && !self.hostile.is_present()
            && self.player.is_alive();
        if clear {
            self.start_next_wave();
        }
        clear
    }

    pub(super) fn cue(&mut self, cue: Cue) {
        emit(self.audio.as_mut(), cue);
    }

    /// Score is frozen once the last life is gone.
    pub(super) fn add_score(&mut self, points: u32) {
        if matches!(
            self.player.lifecycle(),
            Lifecycle::Wreck | Lifecycle::Removed
        ) {
            return;
        }
        self.score = self.score.saturating_add(points);
        while self.score >= self.next_extra_life_score {
            self.lives += 1;
            self.next_extra_life_score = self
                .next_extra_life_score
                .saturating_add(EXTRA_LIFE_SCORE_STEP);
            self.cue(Cue::ExtraLife);
            tracing::info!(lives = self.lives, score = self.score, "extra life");
            if self.next_extra_life_score == u32::MAX {
                break;
            }
        }
    }

    /// Advances one frame. `dt` is clamped to [`MAX_FRAME_DT`]; non-finite or
    /// negative values count as zero.
    pub fn step(&mut self, input: FrameInput, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt.min(MAX_FRAME_DT)
        } else {
            0.0
        };
        let (width, height) = (self.config.width, self.config.height);
        self.frame_count = self.frame_count.wrapping_add(1);

        if self.mode == GameMode::Title {
            self.particles.update(dt, width, height);
            return;
        }

        self.update_player_animation(dt);
        self.update_player_controls(input, dt);

        self.asteroids.update(dt, width, height);
        self.bullets.update(dt, width, height);
        self.update_hostile(dt);
        self.hostile.update_bullets(dt, width, height);

        self.particles.update(dt, width, height);

        self.resolve_collisions();

        self.check_wave_clear();
        let spawn_allowed = self.mode == GameMode::Playing && self.player.is_alive();
        if self.hostile.tick_spawn_timer(&mut self.rng, dt, spawn_allowed)
            && self.hostile.spawn(&mut self.rng, width, height)
        {
            self.cue(Cue::SirenStart);
        }
    }

    fn update_player_animation(&mut self, dt: f32) {
        let (width, height) = (self.config.width, self.config.height);
        let Some(event) = self
            .player
            .update_death_animation(dt, self.lives, width, height)
        else {
            return;
        };

        match event {
            AnimationEvent::RespawnStarted => {
                tracing::info!(lives = self.lives, "respawn started");
            }
            AnimationEvent::Respawned => {
                self.cue(Cue::SpawnClick);
                tracing::info!(lives = self.lives, "player respawned");
            }
            AnimationEvent::Wrecked => {
                tracing::info!(score = self.score, "no lives left");
            }
            AnimationEvent::WreckFaded => {
                self.mode = GameMode::GameOver;
                tracing::info!(score = self.score, wave = self.wave, "game over");
            }
        }
    }

    fn update_player_controls(&mut self, input: FrameInput, dt: f32) {
        let (width, height) = (self.config.width, self.config.height);
        let events = self
            .player
            .update(&mut self.rng, dt, input, width, height);

        if events.thrust_started {
            self.cue(Cue::ThrustStart);
        }
        if events.thrust_stopped {
            self.cue(Cue::ThrustStop);
        }
        if events.hyperspace {
            self.cue(Cue::Hyperspace);
        }
        if input.fire && self.player.fire(&mut self.bullets, width, height) {
            self.cue(Cue::Fire);
        }
    }

    fn update_hostile(&mut self, dt: f32) {
        let (width, height) = (self.config.width, self.config.height);
        let target = self.player.is_alive().then_some(self.player.pos);
        let outcome = self
            .hostile
            .update(&mut self.rng, dt, target, width, height);

        if outcome.fired {
            self.cue(Cue::HostileFire);
        }
        if outcome.despawned {
            self.cue(Cue::SirenStop);
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let player = &self.player;
        WorldSnapshot {
            frame_count: self.frame_count,
            width: self.config.width,
            height: self.config.height,
            mode: self.mode,
            score: self.score,
            lives: self.lives,
            wave: self.wave,
            next_extra_life_score: self.next_extra_life_score,
            rng_state: self.rng.state(),
            hostile_spawn_timer: self.hostile.spawn_timer(),
            player: PlayerSnapshot {
                pos: player.pos,
                vel: player.vel,
                angle: player.angle,
                radius: player.radius,
                lifecycle: player.lifecycle(),
                visible: player.is_visible(),
                invulnerable: player.invulnerable_remaining(),
                fire_cooldown: player.fire_cooldown(),
                hyperspace_cooldown: player.hyperspace_cooldown(),
                polygon: if player.is_alive() {
                    player.world_polygon()
                } else {
                    Vec::new()
                },
                segments: player.segments(),
                animation_progress: player.animation_progress(),
            },
            asteroids: self
                .asteroids
                .iter()
                .map(|asteroid| AsteroidSnapshot {
                    pos: asteroid.pos,
                    vel: asteroid.vel,
                    angle: asteroid.angle,
                    tier: asteroid.tier.as_u8(),
                    radius: asteroid.radius,
                    polygon: asteroid.world_polygon(),
                })
                .collect(),
            bullets: self.bullets.as_slice().to_vec(),
            hostile: self.hostile.craft().map(|craft| HostileSnapshot {
                pos: craft.pos,
                vel: craft.vel,
                radius: craft.radius,
                phase: self.hostile.phase(),
                polygon: craft.world_polygon(),
            }),
            hostile_bullets: self.hostile.bullets().as_slice().to_vec(),
            particles: self
                .particles
                .iter()
                .map(|particle| ParticleSnapshot {
                    pos: particle.pos,
                    alpha: particle.alpha(),
                })
                .collect(),
        }
    }

    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        let (width, height) = (self.config.width, self.config.height);
        let in_arena =
            |p: Vec2| p.is_finite() && p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y < height;

        if self.mode != GameMode::Title && self.wave < 1 {
            return Err(RuleCode::GlobalWaveNonZero);
        }

        let lifecycle = self.player.lifecycle();
        let mode_lives_consistent = match self.mode {
            GameMode::Title => true,
            GameMode::Playing => {
                self.lives > 0 || matches!(lifecycle, Lifecycle::Dying | Lifecycle::Wreck)
            }
            GameMode::GameOver => self.lives <= 0,
        };
        if !mode_lives_consistent {
            return Err(RuleCode::GlobalModeLivesConsistency);
        }

        let next_extra_life_valid = self.next_extra_life_score > self.score
            && self.next_extra_life_score >= EXTRA_LIFE_SCORE_STEP
            && self.next_extra_life_score % EXTRA_LIFE_SCORE_STEP == 0;
        if !next_extra_life_valid {
            return Err(RuleCode::GlobalNextExtraLifeScore);
        }

        if !in_arena(self.player.pos)
            || !self.player.vel.is_finite()
            || !self.player.angle.is_finite()
        {
            return Err(RuleCode::PlayerBounds);
        }

        let lifecycle_valid = match lifecycle {
            Lifecycle::Removed => self.mode == GameMode::GameOver,
            Lifecycle::Wreck => self.lives <= 0 && self.mode == GameMode::Playing,
            Lifecycle::Active | Lifecycle::Dying | Lifecycle::Respawning => {
                self.mode != GameMode::GameOver
            }
        };
        if !lifecycle_valid || (self.player.is_alive() && self.player.is_animating()) {
            return Err(RuleCode::PlayerLifecycleFlags);
        }

        let timer_ok = |t: f32, max: f32| t.is_finite() && (0.0..=max).contains(&t);
        if !timer_ok(self.player.fire_cooldown(), SHIP_FIRE_COOLDOWN)
            || !timer_ok(self.player.hyperspace_cooldown(), HYPERSPACE_COOLDOWN)
            || !timer_ok(self.player.invulnerable_remaining(), SHIP_SPAWN_INVULNERABLE)
        {
            return Err(RuleCode::PlayerTimerRange);
        }

        let expected_segments = if self.player.is_animating() {
            SHIP_HULL.len()
        } else {
            0
        };
        if self.player.segment_count() != expected_segments {
            return Err(RuleCode::PlayerSegmentCount);
        }

        if self.bullets.len() > SHIP_BULLET_LIMIT {
            return Err(RuleCode::PlayerBulletLimit);
        }

        let bullet_ok = |bullet: &Bullet| bullet.life > 0.0 && in_arena(bullet.pos);
        if !self.bullets.iter().all(bullet_ok) {
            return Err(RuleCode::PlayerBulletState);
        }
        if !self.hostile.bullets().iter().all(bullet_ok) {
            return Err(RuleCode::HostileBulletState);
        }

        let vertex_range = ASTEROID_VERTICES_MIN as usize..=ASTEROID_VERTICES_MAX as usize;
        for asteroid in self.asteroids.iter() {
            let valid = in_arena(asteroid.pos)
                && asteroid.vel.is_finite()
                && asteroid.angle.is_finite()
                && asteroid.radius == asteroid.tier.radius()
                && vertex_range.contains(&asteroid.shape.len());
            if !valid {
                return Err(RuleCode::AsteroidState);
            }
        }

        if let Some(craft) = self.hostile.craft() {
            let x_limit = HOSTILE_DESPAWN_MARGIN + craft.radius;
            let valid = craft.pos.is_finite()
                && craft.vel.is_finite()
                && craft.pos.x >= -x_limit
                && craft.pos.x <= width + x_limit
                && craft.pos.y >= -height
                && craft.pos.y < 2.0 * height
                && craft.lifetime >= 0.0;
            if !valid {
                return Err(RuleCode::HostileState);
            }
        }

        if self.particles.len() > PARTICLE_CAP
            || !self
                .particles
                .iter()
                .all(|p| p.life > 0.0 && p.pos.is_finite())
        {
            return Err(RuleCode::ParticleState);
        }

        Ok(())
    }
}
