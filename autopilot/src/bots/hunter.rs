//! Wrap-aware target hunter.
//!
//! Each frame it looks for the threat with the smallest predicted clearance
//! over a short horizon. A closing threat is escaped by turning away and
//! thrusting; a hopeless one by hyperspace. Otherwise it leads the nearest
//! target and fires once the nose lines up.

use super::{can_control, no_input, AutopilotBot};
use arena_core::constants::{PLAYER_BULLET_LIFETIME, PLAYER_BULLET_SPEED};
use arena_core::geometry::{normalize_angle, shortest_delta, Vec2};
use arena_core::rng::SeededRng;
use arena_core::{FrameInput, WorldSnapshot};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct HunterConfig {
    pub id: &'static str,
    pub description: &'static str,
    /// Seconds of straight-line motion checked for each threat.
    pub lookahead: f32,
    /// Clearance below which the ship turns away and runs.
    pub evade_margin: f32,
    /// Clearance below which hyperspace is used if it is ready.
    pub panic_margin: f32,
    /// Only threats this close in time count as a panic.
    pub panic_horizon: f32,
    /// Radians off the aim line that still count as lined up.
    pub fire_tolerance: f32,
    /// Fraction of bullet travel range worth shooting at.
    pub range_fraction: f32,
    /// Ship speed above which the hunter stops thrusting.
    pub speed_cap: f32,
    /// Preference for the hostile craft over a rock at equal distance.
    pub hostile_bias: f32,
}

pub(super) fn hunter_configs() -> &'static [HunterConfig] {
    &[
        HunterConfig {
            id: "hunter",
            description: "Leads the nearest target, dodges closing threats, hyperspaces when cornered.",
            lookahead: 0.9,
            evade_margin: 28.0,
            panic_margin: 6.0,
            panic_horizon: 0.12,
            fire_tolerance: 0.08,
            range_fraction: 0.85,
            speed_cap: 180.0,
            hostile_bias: 1.6,
        },
        HunterConfig {
            id: "hunter-cautious",
            description: "Hunter with a wide safety bubble and a shorter firing range.",
            lookahead: 1.3,
            evade_margin: 55.0,
            panic_margin: 10.0,
            panic_horizon: 0.18,
            fire_tolerance: 0.06,
            range_fraction: 0.6,
            speed_cap: 140.0,
            hostile_bias: 1.2,
        },
    ]
}

#[derive(Clone, Copy, Debug)]
struct Body {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
}

#[derive(Clone, Copy, Debug)]
struct Threat {
    /// Wrap-aware offset from the ship at time zero.
    offset: Vec2,
    clearance: f32,
    time: f32,
}

pub struct HunterBot {
    cfg: HunterConfig,
    rng: SeededRng,
    /// Turn direction used when a threat sits dead astern.
    evade_sign: f32,
}

impl HunterBot {
    pub fn new(cfg: HunterConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(0),
            evade_sign: 1.0,
        }
    }

    fn most_urgent_threat(&self, world: &WorldSnapshot, ship: Body) -> Option<Threat> {
        let asteroids = world.asteroids.iter().map(|a| Body {
            pos: a.pos,
            vel: a.vel,
            radius: a.radius,
        });
        let hostile = world.hostile.iter().map(|h| Body {
            pos: h.pos,
            vel: h.vel,
            radius: h.radius,
        });
        let shots = world.hostile_bullets.iter().map(|b| Body {
            pos: b.pos,
            vel: b.vel,
            radius: b.radius,
        });

        asteroids
            .chain(hostile)
            .chain(shots)
            .map(|body| closest_approach(ship, body, world.width, world.height, self.cfg.lookahead))
            .min_by(|a, b| a.clearance.total_cmp(&b.clearance))
    }

    /// Heading that leads the best target, with its wrap-aware distance.
    fn aim(&self, world: &WorldSnapshot, ship: Body) -> Option<(f32, f32)> {
        let rocks = world.asteroids.iter().map(|a| {
            (
                Body {
                    pos: a.pos,
                    vel: a.vel,
                    radius: a.radius,
                },
                1.0,
            )
        });
        let craft = world.hostile.iter().map(|h| {
            (
                Body {
                    pos: h.pos,
                    vel: h.vel,
                    radius: h.radius,
                },
                self.cfg.hostile_bias,
            )
        });

        rocks
            .chain(craft)
            .map(|(body, bias)| {
                let offset = wrap_offset(ship.pos, body.pos, world.width, world.height);
                let distance = offset.length();
                (body, offset, distance, distance / bias)
            })
            .min_by(|a, b| a.3.total_cmp(&b.3))
            .map(|(body, offset, distance, _)| {
                // Bullets inherit no ship velocity, so lead on target velocity alone.
                let flight = distance / PLAYER_BULLET_SPEED;
                let lead = offset + body.vel * flight;
                (lead.angle(), distance)
            })
    }

    fn steer(&self, angle: f32, heading: f32, input: &mut FrameInput) -> f32 {
        let diff = normalize_angle(heading - angle);
        if diff > self.cfg.fire_tolerance * 0.5 {
            input.right = true;
        } else if diff < -self.cfg.fire_tolerance * 0.5 {
            input.left = true;
        }
        diff
    }
}

impl AutopilotBot for HunterBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, seed: u32) {
        let hash = self
            .cfg
            .id
            .bytes()
            .fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(b));
        self.rng = SeededRng::new(seed ^ hash ^ 0x4E47_7E12);
        self.evade_sign = self.rng.sign();
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        if !can_control(world) {
            return no_input();
        }

        let player = &world.player;
        let ship = Body {
            pos: player.pos,
            vel: player.vel,
            radius: player.radius,
        };
        let mut input = no_input();

        if let Some(threat) = self.most_urgent_threat(world, ship) {
            if threat.clearance < self.cfg.panic_margin
                && threat.time <= self.cfg.panic_horizon
                && player.hyperspace_cooldown <= 0.0
            {
                input.hyperspace = true;
                return input;
            }

            if threat.clearance < self.cfg.evade_margin {
                let away = (-threat.offset).angle();
                let diff = normalize_angle(away - player.angle);
                if diff.abs() > std::f32::consts::PI - 0.2 {
                    // Threat is straight ahead: pick a side and commit.
                    input.left = self.evade_sign < 0.0;
                    input.right = self.evade_sign > 0.0;
                } else {
                    self.steer(player.angle, away, &mut input);
                }
                input.thrust = diff.abs() < 1.0 && player.vel.length() < self.cfg.speed_cap;
                input.fire = player.fire_cooldown <= 0.0;
                return input;
            }
        }

        if let Some((heading, distance)) = self.aim(world, ship) {
            let diff = self.steer(player.angle, heading, &mut input);
            let range = PLAYER_BULLET_SPEED * PLAYER_BULLET_LIFETIME * self.cfg.range_fraction;
            input.fire = diff.abs() <= self.cfg.fire_tolerance
                && distance <= range
                && player.fire_cooldown <= 0.0;
        }

        input
    }
}

fn wrap_offset(from: Vec2, to: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        shortest_delta(from.x, to.x, width),
        shortest_delta(from.y, to.y, height),
    )
}

/// Smallest edge-to-edge gap between two bodies moving in straight lines
/// over `[0, horizon]`, measured from the nearest toroidal image.
fn closest_approach(ship: Body, body: Body, width: f32, height: f32, horizon: f32) -> Threat {
    let offset = wrap_offset(ship.pos, body.pos, width, height);
    let rel_vel = body.vel - ship.vel;
    let speed_sq = rel_vel.length_squared();
    let time = if speed_sq > f32::EPSILON {
        (-(offset.x * rel_vel.x + offset.y * rel_vel.y) / speed_sq).clamp(0.0, horizon)
    } else {
        0.0
    };
    let gap = (offset + rel_vel * time).length() - ship.radius - body.radius;
    Threat {
        offset,
        clearance: gap,
        time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Command, SimConfig, Simulation};

    fn playing_world(seed: u32) -> Simulation {
        let mut sim = Simulation::new(SimConfig::with_seed(seed)).unwrap();
        sim.handle_command(Command::StartGame);
        sim
    }

    fn hunter() -> HunterBot {
        let mut bot = HunterBot::new(hunter_configs()[0]);
        bot.reset(7);
        bot
    }

    #[test]
    fn closest_approach_sees_across_the_seam() {
        let ship = Body {
            pos: Vec2::new(5.0, 300.0),
            vel: Vec2::ZERO,
            radius: 12.0,
        };
        let rock = Body {
            pos: Vec2::new(790.0, 300.0),
            vel: Vec2::new(50.0, 0.0),
            radius: 10.0,
        };
        let threat = closest_approach(ship, rock, 800.0, 600.0, 1.0);
        assert!((threat.offset.x + 15.0).abs() < 1e-3);
        assert!(threat.clearance < 0.0);
        assert!((threat.time - 0.3).abs() < 1e-5);
    }

    #[test]
    fn receding_threat_keeps_its_current_gap() {
        let ship = Body {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
            radius: 12.0,
        };
        let rock = Body {
            pos: Vec2::new(500.0, 300.0),
            vel: Vec2::new(40.0, 0.0),
            radius: 10.0,
        };
        let threat = closest_approach(ship, rock, 800.0, 600.0, 1.0);
        assert_eq!(threat.time, 0.0);
        assert!((threat.clearance - 78.0).abs() < 1e-3);
    }

    #[test]
    fn idle_outside_active_play() {
        let sim = Simulation::new(SimConfig::with_seed(3)).unwrap();
        let mut bot = hunter();
        assert_eq!(bot.next_input(&sim.snapshot()), no_input());
    }

    #[test]
    fn never_presses_opposing_turn_keys() {
        let mut sim = playing_world(0x1234);
        let mut bot = hunter();
        for _ in 0..600 {
            let world = sim.snapshot();
            let input = bot.next_input(&world);
            assert!(!(input.left && input.right));
            sim.step(input, 1.0 / 60.0);
        }
    }

    #[test]
    fn same_seed_same_decisions() {
        let run = |seed| {
            let mut sim = playing_world(seed);
            let mut bot = hunter();
            bot.reset(seed);
            let mut bytes = Vec::new();
            for _ in 0..300 {
                let input = bot.next_input(&sim.snapshot());
                bytes.push(arena_core::encode_input_byte(input));
                sim.step(input, 1.0 / 60.0);
            }
            bytes
        };
        assert_eq!(run(99), run(99));
    }
}
