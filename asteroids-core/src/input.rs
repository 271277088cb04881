use serde::{Deserialize, Serialize};

use crate::error::SimError;

const LEFT_BIT: u8 = 0x01;
const RIGHT_BIT: u8 = 0x02;
const THRUST_BIT: u8 = 0x04;
const FIRE_BIT: u8 = 0x08;
const HYPERSPACE_BIT: u8 = 0x10;
const RESERVED_BITS: u8 = !(LEFT_BIT | RIGHT_BIT | THRUST_BIT | FIRE_BIT | HYPERSPACE_BIT);

/// Held-key state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    pub hyperspace: bool,
}

/// Discrete key-press events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartGame,
    Restart,
    ReturnToTitle,
    Quit,
}

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { LEFT_BIT } else { 0 })
        | (if input.right { RIGHT_BIT } else { 0 })
        | (if input.thrust { THRUST_BIT } else { 0 })
        | (if input.fire { FIRE_BIT } else { 0 })
        | (if input.hyperspace { HYPERSPACE_BIT } else { 0 })
}

/// Lenient decode: reserved bits are ignored.
#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: (byte & LEFT_BIT) != 0,
        right: (byte & RIGHT_BIT) != 0,
        thrust: (byte & THRUST_BIT) != 0,
        fire: (byte & FIRE_BIT) != 0,
        hyperspace: (byte & HYPERSPACE_BIT) != 0,
    }
}

pub fn decode_input_byte_strict(frame: u32, byte: u8) -> Result<FrameInput, SimError> {
    if (byte & RESERVED_BITS) != 0 {
        return Err(SimError::ReservedInputBitsNonZero { frame, byte });
    }
    Ok(decode_input_byte(byte))
}
