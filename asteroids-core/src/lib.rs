pub mod asteroid;
pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hostile;
pub mod input;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod sim;
pub mod snapshot;

pub use audio::{AudioSink, Cue, NullAudio};
pub use config::SimConfig;
pub use error::{AudioError, RuleCode, SimError};
pub use input::{decode_input_byte, encode_input_byte, Command, FrameInput};
pub use sim::{replay, replay_strict, wave_asteroid_count, GameMode, ReplayResult, Simulation};
pub use snapshot::WorldSnapshot;
