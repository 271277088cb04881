use core::fmt;

/// Invariant families checked by [`crate::sim::Simulation::validate_invariants`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleCode {
    GlobalModeLivesConsistency,
    GlobalWaveNonZero,
    GlobalNextExtraLifeScore,
    PlayerBounds,
    PlayerLifecycleFlags,
    PlayerTimerRange,
    PlayerSegmentCount,
    PlayerBulletLimit,
    PlayerBulletState,
    HostileBulletState,
    AsteroidState,
    HostileState,
    ParticleState,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalModeLivesConsistency => write!(f, "GLOBAL_MODE_LIVES_CONSISTENCY"),
            Self::GlobalWaveNonZero => write!(f, "GLOBAL_WAVE_NONZERO"),
            Self::GlobalNextExtraLifeScore => write!(f, "GLOBAL_NEXT_EXTRA_LIFE_SCORE"),
            Self::PlayerBounds => write!(f, "PLAYER_BOUNDS"),
            Self::PlayerLifecycleFlags => write!(f, "PLAYER_LIFECYCLE_FLAGS"),
            Self::PlayerTimerRange => write!(f, "PLAYER_TIMER_RANGE"),
            Self::PlayerSegmentCount => write!(f, "PLAYER_SEGMENT_COUNT"),
            Self::PlayerBulletLimit => write!(f, "PLAYER_BULLET_LIMIT"),
            Self::PlayerBulletState => write!(f, "PLAYER_BULLET_STATE"),
            Self::HostileBulletState => write!(f, "HOSTILE_BULLET_STATE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::HostileState => write!(f, "HOSTILE_STATE"),
            Self::ParticleState => write!(f, "PARTICLE_STATE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    InvalidArena { width: f32, height: f32 },
    InvalidFrameDt { dt: f32 },
    ReservedInputBitsNonZero { frame: u32, byte: u8 },
    RuleViolation { frame: u32, rule: RuleCode },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArena { width, height } => write!(
                f,
                "arena dimensions must be finite and positive: got {width}x{height}"
            ),
            Self::InvalidFrameDt { dt } => {
                write!(f, "frame dt must be finite and non-negative: got {dt}")
            }
            Self::ReservedInputBitsNonZero { frame, byte } => write!(
                f,
                "input byte reserved bits set at frame {frame}: 0x{byte:02x}"
            ),
            Self::RuleViolation { frame, rule } => {
                write!(f, "rule violation at frame {frame}: {rule}")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Failure reported by an [`crate::audio::AudioSink`]. The simulation never
/// propagates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioError {
    pub reason: String,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio cue failed: {}", self.reason)
    }
}

impl std::error::Error for AudioError {}
