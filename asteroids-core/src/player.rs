//! The player ship and its death/respawn animation.
//!
//! Lifecycle: `Active -> Dying -> Respawning -> Active`, or
//! `Dying -> Wreck -> Removed` when no lives remain. The two animated
//! phases each own an immutable record of the pose they started from.

use serde::Serialize;

use crate::constants::{
    BLINK_PERIOD, BULLET_RADIUS, DYING_DURATION, HYPERSPACE_COOLDOWN, HYPERSPACE_INVULNERABLE,
    PLAYER_BULLET_LIFETIME, PLAYER_BULLET_SPEED, RESPAWN_DURATION,
    SEGMENT_DAMPING, SEGMENT_SPEED_MAX, SEGMENT_SPEED_MIN, SEGMENT_SPIN_MAX, SHIP_BULLET_LIMIT,
    SHIP_DEFAULT_ANGLE, SHIP_FIRE_COOLDOWN, SHIP_FRICTION, SHIP_HULL, SHIP_MAX_SPEED,
    SHIP_RADIUS, SHIP_ROTATION_RATE, SHIP_SPAWN_INVULNERABLE, SHIP_THRUST, WRECK_FADE_DURATION,
};
use crate::geometry::{normalize_angle, smoothstep, transform_vertices, wrap_point, Vec2};
use crate::input::FrameInput;
use crate::projectile::BulletPool;
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    Dying,
    Respawning,
    /// Lives exhausted; the scattered segments are fading out.
    Wreck,
    /// Wreck fade finished. Only a restart brings the ship back.
    Removed,
}

/// One hull edge, described in ship-local space around its own midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeShape {
    home: Vec2,
    half: Vec2,
}

fn hull_edges() -> Vec<EdgeShape> {
    let hull = local_hull();
    (0..hull.len())
        .map(|i| {
            let a = hull[i];
            let b = hull[(i + 1) % hull.len()];
            let home = (a + b) * 0.5;
            EdgeShape {
                home,
                half: b - home,
            }
        })
        .collect()
}

pub fn local_hull() -> Vec<Vec2> {
    SHIP_HULL.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

/// Free-flying hull edge. `offset` is the segment centre relative to the
/// phase anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    shape: EdgeShape,
    offset: Vec2,
    angle: f32,
    vel: Vec2,
    spin: f32,
}

impl Segment {
    fn endpoints(&self, anchor: Vec2) -> (Vec2, Vec2) {
        let centre = anchor + self.offset;
        let half = self.shape.half.rotate(self.angle);
        (centre - half, centre + half)
    }
}

/// Where the ship was when it died.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DeathPose {
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct Dispersal {
    origin: DeathPose,
    segments: Vec<Segment>,
    elapsed: f32,
}

impl Dispersal {
    fn advance(&mut self, dt: f32, width: f32, height: f32) {
        for segment in &mut self.segments {
            segment.offset += segment.vel * dt;
            segment.angle += segment.spin * dt;
            segment.vel = segment.vel * SEGMENT_DAMPING;

            let (a, b) = segment.endpoints(self.origin.pos);
            let escaping_x = (a.x < 0.0 || b.x < 0.0) && segment.vel.x < 0.0
                || (a.x > width || b.x > width) && segment.vel.x > 0.0;
            let escaping_y = (a.y < 0.0 || b.y < 0.0) && segment.vel.y < 0.0
                || (a.y > height || b.y > height) && segment.vel.y > 0.0;
            if escaping_x {
                segment.vel.x = -segment.vel.x;
            }
            if escaping_y {
                segment.vel.y = -segment.vel.y;
            }
        }
        self.elapsed += dt;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SegmentPose {
    offset: Vec2,
    angle: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct Reassembly {
    centre: Vec2,
    shapes: Vec<EdgeShape>,
    /// Captured once when the phase begins; never written afterwards.
    start: Vec<SegmentPose>,
    elapsed: f32,
}

impl Reassembly {
    fn progress(&self) -> f32 {
        smoothstep(0.0, RESPAWN_DURATION, self.elapsed)
    }

    fn pose(&self, index: usize) -> Option<SegmentPose> {
        let start = self.start.get(index)?;
        let shape = self.shapes.get(index)?;
        let t = self.progress();
        let target_offset = shape.home.rotate(SHIP_DEFAULT_ANGLE);
        let turn = normalize_angle(SHIP_DEFAULT_ANGLE - start.angle);
        Some(SegmentPose {
            offset: start.offset + (target_offset - start.offset) * t,
            angle: start.angle + turn * t,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Active,
    Dying(Dispersal),
    Respawning(Reassembly),
    Wreck(Dispersal),
    Removed,
}

/// Render view of one animated segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SegmentView {
    pub a: Vec2,
    pub b: Vec2,
    pub alpha: f32,
}

/// Side effects of a movement update, for the host to turn into cues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementEvents {
    pub thrust_started: bool,
    pub thrust_stopped: bool,
    pub hyperspace: bool,
}

/// Phase changes reported by [`Player::update_death_animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    RespawnStarted,
    Respawned,
    Wrecked,
    WreckFaded,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub(crate) fire_cooldown: f32,
    pub(crate) invulnerable: f32,
    pub(crate) hyperspace_cooldown: f32,
    thrusting: bool,
    phase: Phase,
}

impl Player {
    /// A fresh ship at the arena centre with the spawn blink running.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width * 0.5, height * 0.5),
            vel: Vec2::ZERO,
            angle: SHIP_DEFAULT_ANGLE,
            radius: SHIP_RADIUS,
            fire_cooldown: 0.0,
            invulnerable: SHIP_SPAWN_INVULNERABLE,
            hyperspace_cooldown: 0.0,
            thrusting: false,
            phase: Phase::Active,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.phase {
            Phase::Active => Lifecycle::Active,
            Phase::Dying(_) => Lifecycle::Dying,
            Phase::Respawning(_) => Lifecycle::Respawning,
            Phase::Wreck(_) => Lifecycle::Wreck,
            Phase::Removed => Lifecycle::Removed,
        }
    }

    /// Controllable and collidable.
    pub fn is_alive(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::Dying(_) | Phase::Respawning(_) | Phase::Wreck(_)
        )
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn invulnerable_remaining(&self) -> f32 {
        self.invulnerable
    }

    pub fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }

    pub fn hyperspace_cooldown(&self) -> f32 {
        self.hyperspace_cooldown
    }

    /// Whether the hull should be drawn this frame. Blinks while the
    /// invulnerability timer runs; the timer has no effect on damage.
    pub fn is_visible(&self) -> bool {
        if !self.is_alive() {
            return false;
        }
        if self.invulnerable <= 0.0 {
            return true;
        }
        ((self.invulnerable / BLINK_PERIOD) as u32) % 2 == 0
    }

    pub fn world_polygon(&self) -> Vec<Vec2> {
        transform_vertices(&local_hull(), self.pos.x, self.pos.y, self.angle)
    }

    pub fn death_pose(&self) -> Option<DeathPose> {
        match &self.phase {
            Phase::Dying(d) | Phase::Wreck(d) => Some(d.origin),
            _ => None,
        }
    }

    /// Applies held input for one frame. Does nothing outside `Active`.
    pub fn update(
        &mut self,
        rng: &mut SeededRng,
        dt: f32,
        input: FrameInput,
        width: f32,
        height: f32,
    ) -> MovementEvents {
        let mut events = MovementEvents::default();
        if !self.is_alive() {
            events.thrust_stopped = self.stop_thrust();
            return events;
        }

        if input.left {
            self.angle -= SHIP_ROTATION_RATE * dt;
        }
        if input.right {
            self.angle += SHIP_ROTATION_RATE * dt;
        }
        self.angle = normalize_angle(self.angle);

        if input.thrust {
            self.vel += Vec2::from_angle(self.angle) * (SHIP_THRUST * dt);
            if !self.thrusting {
                self.thrusting = true;
                events.thrust_started = true;
            }
        } else {
            events.thrust_stopped = self.stop_thrust();
        }

        self.vel = self.vel * SHIP_FRICTION;
        let speed = self.vel.length();
        if speed > SHIP_MAX_SPEED {
            self.vel = self.vel * (SHIP_MAX_SPEED / speed);
        }
        self.pos = wrap_point(self.pos + self.vel * dt, width, height);

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.hyperspace_cooldown = (self.hyperspace_cooldown - dt).max(0.0);

        if input.hyperspace && self.hyperspace_cooldown <= 0.0 {
            self.pos = Vec2::new(rng.range_f32(0.0, width), rng.range_f32(0.0, height));
            self.vel = Vec2::ZERO;
            self.hyperspace_cooldown = HYPERSPACE_COOLDOWN;
            self.invulnerable = self.invulnerable.max(HYPERSPACE_INVULNERABLE);
            events.hyperspace = true;
        }

        events
    }

    fn stop_thrust(&mut self) -> bool {
        std::mem::replace(&mut self.thrusting, false)
    }

    /// Launches a bullet from the nose. False when not `Active`, cooling
    /// down, or the pool is full.
    pub fn fire(&mut self, bullets: &mut BulletPool, width: f32, height: f32) -> bool {
        if !self.is_alive() || self.fire_cooldown > 0.0 || bullets.len() >= SHIP_BULLET_LIMIT {
            return false;
        }
        let dir = Vec2::from_angle(self.angle);
        let muzzle = wrap_point(self.pos + dir * (self.radius + 3.0), width, height);
        bullets.spawn(
            muzzle,
            self.vel + dir * PLAYER_BULLET_SPEED,
            PLAYER_BULLET_LIFETIME,
            BULLET_RADIUS,
        );
        self.fire_cooldown = SHIP_FIRE_COOLDOWN;
        true
    }

    /// Breaks the ship into one spinning segment per hull edge. No-op
    /// (false) unless `Active`. Lives are the caller's business.
    pub fn hit(&mut self, rng: &mut SeededRng) -> bool {
        if !self.is_alive() {
            return false;
        }

        let origin = DeathPose {
            pos: self.pos,
            angle: self.angle,
        };
        let segments = hull_edges()
            .into_iter()
            .map(|shape| {
                let offset = shape.home.rotate(origin.angle);
                let heading = if offset.length_squared() > f32::EPSILON {
                    offset.angle()
                } else {
                    rng.angle()
                };
                let speed = rng.range_f32(SEGMENT_SPEED_MIN, SEGMENT_SPEED_MAX);
                Segment {
                    shape,
                    offset,
                    angle: origin.angle,
                    vel: Vec2::from_angle(heading + rng.range_f32(-0.5, 0.5)) * speed,
                    spin: rng.range_f32(-SEGMENT_SPIN_MAX, SEGMENT_SPIN_MAX),
                }
            })
            .collect();

        self.vel = Vec2::ZERO;
        self.thrusting = false;
        self.phase = Phase::Dying(Dispersal {
            origin,
            segments,
            elapsed: 0.0,
        });
        true
    }

    /// Advances whichever animation is running. At the end of `Dying`,
    /// `lives_remaining` alone decides between respawn and wreck.
    pub fn update_death_animation(
        &mut self,
        dt: f32,
        lives_remaining: i32,
        width: f32,
        height: f32,
    ) -> Option<AnimationEvent> {
        match &mut self.phase {
            Phase::Active | Phase::Removed => None,
            Phase::Dying(dispersal) => {
                dispersal.advance(dt, width, height);
                if dispersal.elapsed < DYING_DURATION {
                    return None;
                }
                if lives_remaining > 0 {
                    self.start_respawn_animation(width, height);
                    Some(AnimationEvent::RespawnStarted)
                } else {
                    dispersal.elapsed = 0.0;
                    let wreck = dispersal.clone();
                    self.phase = Phase::Wreck(wreck);
                    Some(AnimationEvent::Wrecked)
                }
            }
            Phase::Respawning(reassembly) => {
                reassembly.elapsed += dt;
                if reassembly.elapsed < RESPAWN_DURATION {
                    return None;
                }
                self.pos = reassembly.centre;
                self.vel = Vec2::ZERO;
                self.angle = SHIP_DEFAULT_ANGLE;
                self.fire_cooldown = 0.0;
                self.hyperspace_cooldown = 0.0;
                self.invulnerable = SHIP_SPAWN_INVULNERABLE;
                self.phase = Phase::Active;
                Some(AnimationEvent::Respawned)
            }
            Phase::Wreck(dispersal) => {
                dispersal.advance(dt, width, height);
                if dispersal.elapsed < WRECK_FADE_DURATION {
                    return None;
                }
                self.phase = Phase::Removed;
                Some(AnimationEvent::WreckFaded)
            }
        }
    }

    /// Moves from `Dying` into `Respawning` around the arena centre,
    /// keeping every segment where it currently is on screen.
    pub fn start_respawn_animation(&mut self, width: f32, height: f32) -> bool {
        let Phase::Dying(dispersal) = &self.phase else {
            return false;
        };

        let centre = Vec2::new(width * 0.5, height * 0.5);
        let start = dispersal
            .segments
            .iter()
            .map(|segment| SegmentPose {
                offset: dispersal.origin.pos + segment.offset - centre,
                angle: segment.angle,
            })
            .collect();
        let shapes = dispersal.segments.iter().map(|s| s.shape).collect();

        self.pos = centre;
        self.phase = Phase::Respawning(Reassembly {
            centre,
            shapes,
            start,
            elapsed: 0.0,
        });
        true
    }

    /// World endpoints of the animated segments. Empty when no animation
    /// is running.
    pub fn segments(&self) -> Vec<SegmentView> {
        match &self.phase {
            Phase::Dying(dispersal) => Self::dispersal_views(dispersal, 1.0),
            Phase::Wreck(dispersal) => {
                let alpha = (1.0 - dispersal.elapsed / WRECK_FADE_DURATION).clamp(0.0, 1.0);
                Self::dispersal_views(dispersal, alpha)
            }
            Phase::Respawning(reassembly) => (0..reassembly.shapes.len())
                .filter_map(|i| {
                    let pose = reassembly.pose(i)?;
                    let half = reassembly.shapes[i].half.rotate(pose.angle);
                    let centre = reassembly.centre + pose.offset;
                    Some(SegmentView {
                        a: centre - half,
                        b: centre + half,
                        alpha: 1.0,
                    })
                })
                .collect(),
            Phase::Active | Phase::Removed => Vec::new(),
        }
    }

    pub fn segment_count(&self) -> usize {
        match &self.phase {
            Phase::Dying(d) | Phase::Wreck(d) => d.segments.len(),
            Phase::Respawning(r) => r.start.len(),
            Phase::Active | Phase::Removed => 0,
        }
    }

    fn dispersal_views(dispersal: &Dispersal, alpha: f32) -> Vec<SegmentView> {
        dispersal
            .segments
            .iter()
            .map(|segment| {
                let (a, b) = segment.endpoints(dispersal.origin.pos);
                SegmentView { a, b, alpha }
            })
            .collect()
    }

    /// Normalized progress of the running animation, if any.
    pub fn animation_progress(&self) -> Option<f32> {
        let (elapsed, duration) = match &self.phase {
            Phase::Dying(d) => (d.elapsed, DYING_DURATION),
            Phase::Respawning(r) => (r.elapsed, RESPAWN_DURATION),
            Phase::Wreck(d) => (d.elapsed, WRECK_FADE_DURATION),
            Phase::Active | Phase::Removed => return None,
        };
        Some((elapsed / duration).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 800.0;
    const H: f32 = 600.0;
    const DT: f32 = 1.0 / 60.0;

    fn run_animation(player: &mut Player, lives: i32, seconds: f32) -> Vec<AnimationEvent> {
        let frames = (seconds / DT).ceil() as usize + 1;
        (0..frames)
            .filter_map(|_| player.update_death_animation(DT, lives, W, H))
            .collect()
    }

    #[test]
    fn new_player_is_active_at_centre_and_blinking() {
        let player = Player::new(W, H);
        assert_eq!(player.lifecycle(), Lifecycle::Active);
        assert_eq!(player.pos, Vec2::new(400.0, 300.0));
        assert!(player.invulnerable_remaining() > 0.0);
        assert_eq!(player.world_polygon().len(), 3);
    }

    #[test]
    fn thrust_accelerates_along_facing_and_speed_is_clamped() {
        let mut rng = SeededRng::new(1);
        let mut player = Player::new(W, H);
        let input = FrameInput {
            thrust: true,
            ..FrameInput::default()
        };
        let first = player.update(&mut rng, DT, input, W, H);
        assert!(first.thrust_started);
        assert!(player.vel.y < 0.0, "default facing is up");
        assert!(player.vel.x.abs() < 1e-3);

        for _ in 0..2000 {
            player.update(&mut rng, DT, input, W, H);
        }
        assert!(player.vel.length() <= SHIP_MAX_SPEED + 1e-3);

        let released = player.update(&mut rng, DT, FrameInput::default(), W, H);
        assert!(released.thrust_stopped);
    }

    #[test]
    fn friction_bleeds_speed_without_thrust() {
        let mut rng = SeededRng::new(1);
        let mut player = Player::new(W, H);
        player.vel = Vec2::new(100.0, 0.0);
        player.update(&mut rng, DT, FrameInput::default(), W, H);
        assert!((player.vel.x - 99.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_follows_left_and_right() {
        let mut rng = SeededRng::new(1);
        let mut player = Player::new(W, H);
        let start = player.angle;
        let left = FrameInput {
            left: true,
            ..FrameInput::default()
        };
        player.update(&mut rng, 0.1, left, W, H);
        assert!((player.angle - (start - SHIP_ROTATION_RATE * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn hyperspace_relocates_and_respects_cooldown() {
        let mut rng = SeededRng::new(99);
        let mut player = Player::new(W, H);
        player.invulnerable = 0.0;
        player.vel = Vec2::new(50.0, 50.0);
        let jump = FrameInput {
            hyperspace: true,
            ..FrameInput::default()
        };

        let events = player.update(&mut rng, DT, jump, W, H);
        assert!(events.hyperspace);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(player.invulnerable_remaining() >= HYPERSPACE_INVULNERABLE - 1e-6);
        assert!(player.pos.x >= 0.0 && player.pos.x < W);

        let again = player.update(&mut rng, DT, jump, W, H);
        assert!(!again.hyperspace, "cooldown blocks a second jump");
    }

    #[test]
    fn fire_honours_cooldown_and_bullet_limit() {
        let mut player = Player::new(W, H);
        let mut bullets = BulletPool::new();
        assert!(player.fire(&mut bullets, W, H));
        assert!(!player.fire(&mut bullets, W, H), "cooling down");
        assert_eq!(bullets.len(), 1);

        for _ in 0..SHIP_BULLET_LIMIT {
            player.fire_cooldown = 0.0;
            player.fire(&mut bullets, W, H);
        }
        assert_eq!(bullets.len(), SHIP_BULLET_LIMIT);
        player.fire_cooldown = 0.0;
        assert!(!player.fire(&mut bullets, W, H));
    }

    #[test]
    fn hit_only_applies_while_active() {
        let mut rng = SeededRng::new(4);
        let mut player = Player::new(W, H);
        assert!(player.invulnerable_remaining() > 0.0);
        assert!(player.hit(&mut rng), "blinking does not block damage");
        assert_eq!(player.lifecycle(), Lifecycle::Dying);
        assert_eq!(player.segment_count(), SHIP_HULL.len());
        assert!(!player.hit(&mut rng));
        assert!(!player.fire(&mut BulletPool::new(), W, H));
        assert_eq!(player.death_pose().map(|p| p.pos), Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn dying_then_respawning_then_active() {
        let mut rng = SeededRng::new(8);
        let mut player = Player::new(W, H);
        player.pos = Vec2::new(100.0, 100.0);
        player.hit(&mut rng);

        let events = run_animation(&mut player, 2, DYING_DURATION);
        assert_eq!(events, vec![AnimationEvent::RespawnStarted]);
        assert_eq!(player.lifecycle(), Lifecycle::Respawning);

        let events = run_animation(&mut player, 2, RESPAWN_DURATION);
        assert_eq!(events, vec![AnimationEvent::Respawned]);
        assert_eq!(player.lifecycle(), Lifecycle::Active);
        assert_eq!(player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(player.angle, SHIP_DEFAULT_ANGLE);
        assert_eq!(player.invulnerable_remaining(), SHIP_SPAWN_INVULNERABLE);
        assert_eq!(player.segment_count(), 0);
    }

    #[test]
    fn dying_without_lives_wrecks_then_fades() {
        let mut rng = SeededRng::new(8);
        let mut player = Player::new(W, H);
        player.hit(&mut rng);

        let events = run_animation(&mut player, 0, DYING_DURATION);
        assert_eq!(events, vec![AnimationEvent::Wrecked]);
        assert_eq!(player.lifecycle(), Lifecycle::Wreck);
        let alpha = player.segments()[0].alpha;
        assert!(alpha > 0.9);

        let events = run_animation(&mut player, 0, WRECK_FADE_DURATION);
        assert_eq!(events, vec![AnimationEvent::WreckFaded]);
        assert_eq!(player.lifecycle(), Lifecycle::Removed);
        assert!(player.segments().is_empty());
        assert_eq!(player.update_death_animation(DT, 3, W, H), None);
    }

    #[test]
    fn respawn_starts_where_segments_are_and_ends_on_the_hull() {
        let mut rng = SeededRng::new(21);
        let mut player = Player::new(W, H);
        player.pos = Vec2::new(60.0, 500.0);
        player.hit(&mut rng);
        run_animation(&mut player, 1, DYING_DURATION * 0.5);

        let before = player.segments();
        assert!(player.start_respawn_animation(W, H));
        let after = player.segments();
        for (old, new) in before.iter().zip(&after) {
            assert!((old.a - new.a).length() < 1e-2, "no visual jump");
            assert!((old.b - new.b).length() < 1e-2);
        }
        assert!(!player.start_respawn_animation(W, H), "only from dying");

        let target = transform_vertices(&local_hull(), W * 0.5, H * 0.5, SHIP_DEFAULT_ANGLE);
        assert_eq!(player.update_death_animation(RESPAWN_DURATION - 0.01, 1, W, H), None);
        let near_end = player.segments();
        for (i, seg) in near_end.iter().enumerate() {
            assert!((seg.a - target[i]).length() < 1.0, "segment {i} closes on its edge");
        }
    }

    #[test]
    fn segments_bounce_off_the_arena_bounds() {
        let mut rng = SeededRng::new(5);
        let mut player = Player::new(W, H);
        player.pos = Vec2::new(2.0, 2.0);
        player.hit(&mut rng);
        for _ in 0..((DYING_DURATION / DT) as usize - 1) {
            player.update_death_animation(DT, 1, W, H);
            for seg in player.segments() {
                for p in [seg.a, seg.b] {
                    assert!(p.x > -40.0 && p.y > -40.0, "segment escaped to {p:?}");
                }
            }
        }
    }

    #[test]
    fn blink_toggles_visibility_only() {
        let mut player = Player::new(W, H);
        player.invulnerable = BLINK_PERIOD * 0.5;
        assert!(player.is_visible());
        player.invulnerable = BLINK_PERIOD * 1.5;
        assert!(!player.is_visible());
        player.invulnerable = 0.0;
        assert!(player.is_visible());
    }
}
