//! Fire-and-forget audio cue contract.
//!
//! The simulation only ever talks to a [`AudioSink`]; it never observes
//! whether a cue actually played. [`NullAudio`] is the sink used when no
//! audio device is available.

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    ThrustStart,
    ThrustStop,
    Fire,
    /// Asteroid tier, or 0 for the player ship and 4 for the hostile craft.
    Explosion(u8),
    Hyperspace,
    SirenStart,
    SirenStop,
    HostileFire,
    SpawnClick,
    ExtraLife,
}

pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    #[inline]
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Plays `cue`, swallowing any failure.
pub(crate) fn emit(sink: &mut dyn AudioSink, cue: Cue) {
    if let Err(err) = sink.play(cue) {
        tracing::trace!(?cue, %err, "audio cue dropped");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records every cue into a shared log.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingAudio {
        pub(crate) log: Rc<RefCell<Vec<Cue>>>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.log.borrow_mut().push(cue);
            Ok(())
        }
    }

    /// Fails every cue.
    pub(crate) struct BrokenAudio;

    impl AudioSink for BrokenAudio {
        fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
            Err(AudioError {
                reason: "device unplugged".to_string(),
            })
        }
    }
}
