//! The roaming hostile craft.
//!
//! At most one craft exists at a time. Its life runs
//! `Absent -> Active -> Leaving -> Absent`; once leaving, it no longer
//! redirects or fires and only heads for the nearest side edge.

use serde::Serialize;

use crate::constants::{
    BULLET_RADIUS, HOSTILE_AIM_JITTER, HOSTILE_BULLET_LIFETIME, HOSTILE_BULLET_SPEED,
    HOSTILE_DESPAWN_MARGIN, HOSTILE_EDGE_MARGIN, HOSTILE_FIRE_INTERVAL, HOSTILE_HULL,
    HOSTILE_LEAVE_SPEED, HOSTILE_LIFETIME_MAX, HOSTILE_LIFETIME_MIN, HOSTILE_RADIUS,
    HOSTILE_REDIRECT_MAX, HOSTILE_REDIRECT_MIN, HOSTILE_SPAWN_MAX, HOSTILE_SPAWN_MIN,
    HOSTILE_SPEED,
};
use crate::geometry::{
    circles_collide, circles_collide_wrapped, shortest_delta, transform_vertices, wrap, wrap_point,
    Vec2,
};
use crate::projectile::BulletPool;
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostilePhase {
    Absent,
    Active,
    Leaving,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Redirect {
    Vertical,
    Horizontal,
    SeekPlayer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostileCraft {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds of roaming left before the craft starts leaving.
    pub lifetime: f32,
    pub leaving: bool,
    entered: bool,
    redirect_timer: f32,
    fire_timer: f32,
}

impl HostileCraft {
    pub fn local_hull() -> Vec<Vec2> {
        HOSTILE_HULL.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    pub fn world_polygon(&self) -> Vec<Vec2> {
        transform_vertices(&Self::local_hull(), self.pos.x, self.pos.y, 0.0)
    }

    fn begin_leaving(&mut self, width: f32) {
        if self.leaving {
            return;
        }
        self.leaving = true;
        let direction = if self.pos.x < width * 0.5 { -1.0 } else { 1.0 };
        self.vel = Vec2::new(direction * HOSTILE_LEAVE_SPEED, 0.0);
    }

    fn near_side_edge(&self, width: f32) -> bool {
        self.pos.x < HOSTILE_EDGE_MARGIN || self.pos.x > width - HOSTILE_EDGE_MARGIN
    }
}

/// What happened to the craft during one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostileUpdate {
    pub fired: bool,
    pub started_leaving: bool,
    pub despawned: bool,
}

/// Owner of the single craft slot, its bullet pool and its spawn timer.
#[derive(Clone, Debug)]
pub struct HostileBay {
    craft: Option<HostileCraft>,
    bullets: BulletPool,
    spawn_timer: f32,
}

impl HostileBay {
    pub fn new(rng: &mut SeededRng) -> Self {
        Self {
            craft: None,
            bullets: BulletPool::new(),
            spawn_timer: rng.range_f32(HOSTILE_SPAWN_MIN, HOSTILE_SPAWN_MAX),
        }
    }

    pub fn phase(&self) -> HostilePhase {
        match &self.craft {
            None => HostilePhase::Absent,
            Some(craft) if craft.leaving => HostilePhase::Leaving,
            Some(_) => HostilePhase::Active,
        }
    }

    pub fn craft(&self) -> Option<&HostileCraft> {
        self.craft.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.craft.is_some()
    }

    pub fn bullets(&self) -> &BulletPool {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut BulletPool {
        &mut self.bullets
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Counts the spawn timer down while `allowed` and no craft is present.
    /// Returns true once the craft is due; the timer is re-armed.
    pub fn tick_spawn_timer(&mut self, rng: &mut SeededRng, dt: f32, allowed: bool) -> bool {
        if self.craft.is_some() || !allowed {
            return false;
        }
        self.spawn_timer = (self.spawn_timer - dt).max(0.0);
        if self.spawn_timer > 0.0 {
            return false;
        }
        self.spawn_timer = rng.range_f32(HOSTILE_SPAWN_MIN, HOSTILE_SPAWN_MAX);
        true
    }

    /// Brings the craft in from a random side edge. No-op (false) when a
    /// craft already exists.
    pub fn spawn(&mut self, rng: &mut SeededRng, width: f32, height: f32) -> bool {
        if self.craft.is_some() {
            return false;
        }

        let from_left = rng.chance(0.5);
        let x = if from_left {
            -HOSTILE_RADIUS
        } else {
            width + HOSTILE_RADIUS
        };
        let y = rng.range_f32(height * 0.15, height * 0.85);
        let vx = if from_left { HOSTILE_SPEED } else { -HOSTILE_SPEED };
        let vy = rng.range_f32(-0.3, 0.3) * HOSTILE_SPEED;

        self.craft = Some(HostileCraft {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: HOSTILE_RADIUS,
            lifetime: rng.range_f32(HOSTILE_LIFETIME_MIN, HOSTILE_LIFETIME_MAX),
            leaving: false,
            entered: false,
            redirect_timer: rng.range_f32(HOSTILE_REDIRECT_MIN, HOSTILE_REDIRECT_MAX),
            fire_timer: HOSTILE_FIRE_INTERVAL,
        });
        tracing::debug!(from_left, y, "hostile craft spawned");
        true
    }

    /// Forces the craft into its terminal leaving behaviour. Returns false
    /// when there is no craft or it is already leaving.
    pub fn force_leave(&mut self, width: f32) -> bool {
        match &mut self.craft {
            Some(craft) if !craft.leaving => {
                craft.begin_leaving(width);
                tracing::debug!("hostile craft ordered to leave");
                true
            }
            _ => false,
        }
    }

    /// Removes the craft outright (shot down), returning it.
    pub fn destroy(&mut self) -> Option<HostileCraft> {
        self.craft.take()
    }

    pub fn update_bullets(&mut self, dt: f32, width: f32, height: f32) {
        self.bullets.update(dt, width, height);
    }

    /// Advances the craft. `target` is the player position when the player
    /// is fully alive; the craft only aims and seeks when it has one.
    pub fn update(
        &mut self,
        rng: &mut SeededRng,
        dt: f32,
        target: Option<Vec2>,
        width: f32,
        height: f32,
    ) -> HostileUpdate {
        let mut outcome = HostileUpdate::default();
        let Some(craft) = self.craft.as_mut() else {
            return outcome;
        };

        if !craft.leaving {
            craft.lifetime = (craft.lifetime - dt).max(0.0);
            if craft.lifetime <= 0.0 {
                craft.begin_leaving(width);
                outcome.started_leaving = true;
            }
        }

        craft.pos += craft.vel * dt;

        if !craft.entered
            && craft.pos.x >= craft.radius
            && craft.pos.x <= width - craft.radius
        {
            craft.entered = true;
        }
        if !craft.leaving
            && craft.entered
            && (craft.pos.x <= craft.radius || craft.pos.x >= width - craft.radius)
        {
            craft.begin_leaving(width);
            outcome.started_leaving = true;
        }

        // Only a craft crossing a side edge keeps its row unwrapped; once
        // inside, it wraps vertically like everything else.
        let crossing_side = !craft.entered || craft.leaving;
        if !(crossing_side && craft.near_side_edge(width)) {
            craft.pos.y = wrap(craft.pos.y, 0.0, height);
        }

        if craft.pos.x < -HOSTILE_DESPAWN_MARGIN || craft.pos.x > width + HOSTILE_DESPAWN_MARGIN {
            self.craft = None;
            outcome.despawned = true;
            tracing::debug!("hostile craft left the arena");
            return outcome;
        }
        if craft.leaving {
            return outcome;
        }

        craft.redirect_timer -= dt;
        if craft.redirect_timer <= 0.0 {
            craft.redirect_timer = rng.range_f32(HOSTILE_REDIRECT_MIN, HOSTILE_REDIRECT_MAX);
            let redirect = match rng.next_int(3) {
                0 => Redirect::Vertical,
                1 => Redirect::Horizontal,
                _ => Redirect::SeekPlayer,
            };
            craft.vel = redirected_velocity(rng, craft, redirect, target, width, height);
        }

        craft.fire_timer -= dt;
        if craft.fire_timer <= 0.0 {
            craft.fire_timer = HOSTILE_FIRE_INTERVAL;
            if let Some(target) = target {
                let aim = Vec2::new(
                    shortest_delta(craft.pos.x, target.x, width),
                    shortest_delta(craft.pos.y, target.y, height),
                )
                .angle()
                    + rng.range_f32(-HOSTILE_AIM_JITTER, HOSTILE_AIM_JITTER);
                let dir = Vec2::from_angle(aim);
                let muzzle = craft.pos + dir * (craft.radius + 4.0);
                self.bullets.spawn(
                    wrap_point(muzzle, width, height),
                    dir * HOSTILE_BULLET_SPEED,
                    HOSTILE_BULLET_LIFETIME,
                    BULLET_RADIUS,
                );
                outcome.fired = true;
            }
        }

        outcome
    }

    /// Player bullet vs craft body. Plain circle test: the craft is treated
    /// as on-screen.
    pub fn bullet_hits_craft(&self, point: Vec2, radius: f32) -> bool {
        self.craft
            .as_ref()
            .is_some_and(|craft| circles_collide(point, radius, craft.pos, craft.radius))
    }

    pub fn craft_hits_player(&self, pos: Vec2, radius: f32, width: f32, height: f32) -> bool {
        self.craft.as_ref().is_some_and(|craft| {
            circles_collide_wrapped(pos, radius, craft.pos, craft.radius, width, height)
        })
    }

    /// Index of the first hostile bullet touching the player.
    pub fn bullet_hitting_player(
        &self,
        pos: Vec2,
        radius: f32,
        width: f32,
        height: f32,
    ) -> Option<usize> {
        self.bullets.iter().position(|bullet| {
            circles_collide_wrapped(pos, radius, bullet.pos, bullet.radius, width, height)
        })
    }

    /// Drops the craft and every hostile bullet.
    pub fn clear(&mut self, rng: &mut SeededRng) {
        self.craft = None;
        self.bullets.clear();
        self.spawn_timer = rng.range_f32(HOSTILE_SPAWN_MIN, HOSTILE_SPAWN_MAX);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, craft: HostileCraft) {
        self.craft = Some(craft);
    }
}

fn redirected_velocity(
    rng: &mut SeededRng,
    craft: &HostileCraft,
    redirect: Redirect,
    target: Option<Vec2>,
    width: f32,
    height: f32,
) -> Vec2 {
    match (redirect, target) {
        (Redirect::Horizontal, _) => Vec2::new(rng.sign() * HOSTILE_SPEED, craft.vel.y * 0.25),
        (Redirect::SeekPlayer, Some(target)) => {
            let delta = Vec2::new(
                shortest_delta(craft.pos.x, target.x, width),
                shortest_delta(craft.pos.y, target.y, height),
            );
            if delta.length_squared() <= f32::EPSILON {
                craft.vel
            } else {
                Vec2::from_angle(delta.angle()) * HOSTILE_SPEED
            }
        }
        (Redirect::Vertical, _) | (Redirect::SeekPlayer, None) => Vec2::new(
            craft.vel.x,
            rng.sign() * rng.range_f32(0.4, 1.0) * HOSTILE_SPEED,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 800.0;
    const H: f32 = 600.0;
    const DT: f32 = 1.0 / 60.0;

    fn craft_at(pos: Vec2, vel: Vec2) -> HostileCraft {
        HostileCraft {
            pos,
            vel,
            radius: HOSTILE_RADIUS,
            lifetime: 100.0,
            leaving: false,
            entered: true,
            redirect_timer: 100.0,
            fire_timer: 100.0,
        }
    }

    #[test]
    fn spawns_once_from_a_side_edge_moving_inward() {
        let mut rng = SeededRng::new(42);
        let mut bay = HostileBay::new(&mut rng);
        assert_eq!(bay.phase(), HostilePhase::Absent);
        assert!(bay.spawn(&mut rng, W, H));
        assert!(!bay.spawn(&mut rng, W, H), "second spawn is a no-op");

        let craft = bay.craft().expect("craft present");
        assert_eq!(bay.phase(), HostilePhase::Active);
        if craft.pos.x < 0.0 {
            assert!(craft.vel.x > 0.0);
        } else {
            assert!(craft.pos.x > W);
            assert!(craft.vel.x < 0.0);
        }
        assert!((HOSTILE_LIFETIME_MIN..HOSTILE_LIFETIME_MAX).contains(&craft.lifetime));
    }

    #[test]
    fn lifetime_expiry_starts_leaving_and_then_despawns() {
        let mut rng = SeededRng::new(7);
        let mut bay = HostileBay::new(&mut rng);
        let mut craft = craft_at(Vec2::new(300.0, 300.0), Vec2::new(0.0, 0.0));
        craft.lifetime = DT * 0.5;
        bay.place(craft);

        let outcome = bay.update(&mut rng, DT, None, W, H);
        assert!(outcome.started_leaving);
        assert_eq!(bay.phase(), HostilePhase::Leaving);
        let vel = bay.craft().expect("still present").vel;
        assert!(vel.x < 0.0, "leaves toward the nearer left edge");

        let mut despawned = false;
        for _ in 0..600 {
            let outcome = bay.update(&mut rng, DT, Some(Vec2::new(400.0, 300.0)), W, H);
            assert!(!outcome.fired, "a leaving craft never fires");
            if outcome.despawned {
                despawned = true;
                break;
            }
            assert_eq!(bay.phase(), HostilePhase::Leaving, "leaving is irreversible");
        }
        assert!(despawned);
        assert_eq!(bay.phase(), HostilePhase::Absent);
    }

    #[test]
    fn reaching_a_side_edge_after_entry_starts_leaving() {
        let mut rng = SeededRng::new(9);
        let mut bay = HostileBay::new(&mut rng);
        bay.place(craft_at(Vec2::new(W - HOSTILE_RADIUS - 1.0, 200.0), Vec2::new(120.0, 0.0)));

        let outcome = bay.update(&mut rng, DT, None, W, H);
        assert!(outcome.started_leaving);
        assert!(bay.craft().expect("present").vel.x > 0.0);
    }

    #[test]
    fn force_leave_is_idempotent() {
        let mut rng = SeededRng::new(1);
        let mut bay = HostileBay::new(&mut rng);
        assert!(!bay.force_leave(W));
        bay.place(craft_at(Vec2::new(600.0, 300.0), Vec2::ZERO));
        assert!(bay.force_leave(W));
        assert!(!bay.force_leave(W));
        assert_eq!(bay.phase(), HostilePhase::Leaving);
    }

    #[test]
    fn fires_at_the_player_within_jitter() {
        let mut rng = SeededRng::new(5);
        let mut bay = HostileBay::new(&mut rng);
        let mut craft = craft_at(Vec2::new(200.0, 300.0), Vec2::ZERO);
        craft.fire_timer = DT * 0.5;
        bay.place(craft);

        let outcome = bay.update(&mut rng, DT, Some(Vec2::new(500.0, 300.0)), W, H);
        assert!(outcome.fired);
        let bullet = bay.bullets().get(0).expect("bullet spawned");
        let heading = bullet.vel.angle();
        assert!(heading.abs() <= HOSTILE_AIM_JITTER + 1e-4);
    }

    #[test]
    fn holds_fire_without_a_target() {
        let mut rng = SeededRng::new(5);
        let mut bay = HostileBay::new(&mut rng);
        let mut craft = craft_at(Vec2::new(200.0, 300.0), Vec2::ZERO);
        craft.fire_timer = DT * 0.5;
        bay.place(craft);

        let outcome = bay.update(&mut rng, DT, None, W, H);
        assert!(!outcome.fired);
        assert!(bay.bullets().is_empty());
    }

    #[test]
    fn vertical_wrap_is_suppressed_near_side_edges() {
        let mut rng = SeededRng::new(3);
        let mut bay = HostileBay::new(&mut rng);
        bay.place(craft_at(Vec2::new(400.0, 599.0), Vec2::new(0.0, 120.0)));
        bay.update(&mut rng, DT, None, W, H);
        assert!(bay.craft().expect("present").pos.y < 10.0, "wraps mid-arena");

        let mut rng = SeededRng::new(3);
        let mut bay = HostileBay::new(&mut rng);
        let mut edge = craft_at(Vec2::new(10.0, 599.0), Vec2::new(0.0, 120.0));
        edge.entered = false;
        bay.place(edge);
        bay.update(&mut rng, DT, None, W, H);
        assert!(bay.craft().expect("present").pos.y > H, "no wrap near the edge");
    }

    #[test]
    fn entered_craft_hugging_a_side_still_wraps_vertically() {
        let mut rng = SeededRng::new(3);
        let mut bay = HostileBay::new(&mut rng);
        bay.place(craft_at(Vec2::new(25.0, 599.0), Vec2::new(0.0, 120.0)));

        for _ in 0..600 {
            bay.update(&mut rng, DT, None, W, H);
            let craft = bay.craft().expect("present");
            assert!((0.0..H).contains(&craft.pos.y), "y = {}", craft.pos.y);
        }
    }

    #[test]
    fn collision_queries() {
        let mut rng = SeededRng::new(3);
        let mut bay = HostileBay::new(&mut rng);
        bay.place(craft_at(Vec2::new(790.0, 300.0), Vec2::ZERO));

        assert!(bay.bullet_hits_craft(Vec2::new(780.0, 300.0), 2.0));
        // Bullets do not wrap onto the craft.
        assert!(!bay.bullet_hits_craft(Vec2::new(2.0, 300.0), 2.0));
        // The player does.
        assert!(bay.craft_hits_player(Vec2::new(2.0, 300.0), 12.0, W, H));

        bay.bullets_mut()
            .spawn(Vec2::new(798.0, 100.0), Vec2::ZERO, 1.0, 2.0);
        assert_eq!(bay.bullet_hitting_player(Vec2::new(3.0, 100.0), 12.0, W, H), Some(0));
        assert_eq!(bay.bullet_hitting_player(Vec2::new(300.0, 100.0), 12.0, W, H), None);
    }

    #[test]
    fn spawn_timer_only_runs_when_allowed() {
        let mut rng = SeededRng::new(77);
        let mut bay = HostileBay::new(&mut rng);
        let initial = bay.spawn_timer();
        assert!(!bay.tick_spawn_timer(&mut rng, initial + 1.0, false));
        assert_eq!(bay.spawn_timer(), initial);
        assert!(bay.tick_spawn_timer(&mut rng, initial + 1.0, true));
        assert!(bay.spawn_timer() >= HOSTILE_SPAWN_MIN);
    }
}
