use core::f32::consts::{FRAC_PI_2, PI};

// Arena
pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;
/// Upper bound applied to every frame's `dt`.
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
pub const FIXED_FRAME_DT: f32 = 1.0 / 60.0;

// Progression
pub const STARTING_LIVES: i32 = 3;
pub const EXTRA_LIFE_SCORE_STEP: u32 = 10_000;
pub const WAVE_SAFE_RADIUS: f32 = 150.0;
pub const WAVE_SPAWN_ATTEMPTS: u32 = 100;
pub const WAVE_ASTEROID_CAP: usize = 12;

// Player ship
pub const SHIP_RADIUS: f32 = 12.0;
pub const SHIP_ROTATION_RATE: f32 = 4.5;
pub const SHIP_THRUST: f32 = 300.0;
pub const SHIP_FRICTION: f32 = 0.99;
pub const SHIP_MAX_SPEED: f32 = 350.0;
/// Facing angle of a freshly spawned ship (screen up, y grows downward).
pub const SHIP_DEFAULT_ANGLE: f32 = -FRAC_PI_2;
pub const SHIP_HULL: [(f32, f32); 3] = [(15.0, 0.0), (-10.0, -9.0), (-10.0, 9.0)];
pub const SHIP_FIRE_COOLDOWN: f32 = 0.2;
pub const SHIP_BULLET_LIMIT: usize = 8;
pub const SHIP_SPAWN_INVULNERABLE: f32 = 3.0;
pub const HYPERSPACE_COOLDOWN: f32 = 2.0;
pub const HYPERSPACE_INVULNERABLE: f32 = 1.0;
pub const BLINK_PERIOD: f32 = 0.2;

// Death / respawn animation
pub const DYING_DURATION: f32 = 2.0;
pub const RESPAWN_DURATION: f32 = 1.5;
pub const WRECK_FADE_DURATION: f32 = 2.0;
pub const SEGMENT_SPEED_MIN: f32 = 40.0;
pub const SEGMENT_SPEED_MAX: f32 = 110.0;
pub const SEGMENT_SPIN_MAX: f32 = 4.0;
pub const SEGMENT_DAMPING: f32 = 0.98;

// Bullets
pub const PLAYER_BULLET_SPEED: f32 = 500.0;
pub const PLAYER_BULLET_LIFETIME: f32 = 1.0;
pub const BULLET_RADIUS: f32 = 2.0;
pub const HOSTILE_BULLET_SPEED: f32 = 260.0;
pub const HOSTILE_BULLET_LIFETIME: f32 = 1.6;

// Asteroids
pub const ASTEROID_BASE_SPEED_MIN: f32 = 30.0;
pub const ASTEROID_BASE_SPEED_MAX: f32 = 60.0;
pub const ASTEROID_SPIN_MAX: f32 = 1.5;
pub const ASTEROID_VERTICES_MIN: i32 = 8;
pub const ASTEROID_VERTICES_MAX: i32 = 12;
pub const ASTEROID_IRREGULARITY: f32 = 0.35;
pub const ASTEROID_CHILD_JITTER: f32 = 5.0;
/// `(radius, points)` indexed by `tier - 1`.
pub const ASTEROID_TIER_TABLE: [(f32, u32); 3] = [(10.0, 100), (20.0, 50), (35.0, 20)];

// Hostile craft
pub const HOSTILE_RADIUS: f32 = 15.0;
pub const HOSTILE_SPEED: f32 = 90.0;
pub const HOSTILE_LEAVE_SPEED: f32 = 140.0;
pub const HOSTILE_LIFETIME_MIN: f32 = 8.0;
pub const HOSTILE_LIFETIME_MAX: f32 = 14.0;
pub const HOSTILE_REDIRECT_MIN: f32 = 1.0;
pub const HOSTILE_REDIRECT_MAX: f32 = 2.5;
pub const HOSTILE_FIRE_INTERVAL: f32 = 1.3;
pub const HOSTILE_AIM_JITTER: f32 = 0.15;
pub const HOSTILE_EDGE_MARGIN: f32 = 40.0;
pub const HOSTILE_DESPAWN_MARGIN: f32 = 50.0;
pub const HOSTILE_SPAWN_MIN: f32 = 12.0;
pub const HOSTILE_SPAWN_MAX: f32 = 22.0;
pub const HOSTILE_POINTS: u32 = 300;
pub const HOSTILE_HULL: [(f32, f32); 8] = [
    (-15.0, 0.0),
    (-7.0, -5.0),
    (-4.0, -10.0),
    (4.0, -10.0),
    (7.0, -5.0),
    (15.0, 0.0),
    (7.0, 6.0),
    (-7.0, 6.0),
];

// Particles
pub const EXPLOSION_PARTICLES_PER_TIER: usize = 8;
pub const SHIP_EXPLOSION_PARTICLES: usize = 24;
pub const PARTICLE_SPEED_MIN: f32 = 20.0;
pub const PARTICLE_SPEED_MAX: f32 = 120.0;
pub const PARTICLE_LIFETIME_MIN: f32 = 0.4;
pub const PARTICLE_LIFETIME_MAX: f32 = 1.0;
pub const PARTICLE_CAP: usize = 512;

pub const TAU: f32 = 2.0 * PI;
