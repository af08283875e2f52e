use serde::{Deserialize, Serialize};

const LEFT: u8 = 0x01;
const RIGHT: u8 = 0x02;
const THRUST: u8 = 0x04;
const REVERSE: u8 = 0x08;
const FIRE: u8 = 0x10;
const RESERVED_MASK: u8 = 0xE0;

/// Controls held during one frame. `left`/`right` turn the ship,
/// `thrust`/`reverse` walk it along its heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub reverse: bool,
    pub fire: bool,
}

impl FrameInput {
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        thrust: false,
        reverse: false,
        fire: false,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { LEFT } else { 0 })
        | (if input.right { RIGHT } else { 0 })
        | (if input.thrust { THRUST } else { 0 })
        | (if input.reverse { REVERSE } else { 0 })
        | (if input.fire { FIRE } else { 0 })
}

pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: byte & LEFT != 0,
        right: byte & RIGHT != 0,
        thrust: byte & THRUST != 0,
        reverse: byte & REVERSE != 0,
        fire: byte & FIRE != 0,
    }
}

/// Rejects bytes with any of the unused high bits set.
pub fn validate_input_byte(frame: u32, byte: u8) -> Result<FrameInput, InputError> {
    if byte & RESERVED_MASK != 0 {
        return Err(InputError { frame, byte });
    }
    Ok(decode_input_byte(byte))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputError {
    pub frame: u32,
    pub byte: u8,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "input byte reserved bits set at frame {}: 0x{:02x}",
            self.frame, self.byte
        )
    }
}

impl std::error::Error for InputError {}
