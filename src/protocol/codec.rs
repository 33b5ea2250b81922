// Packing of (id, command, payload) messages into 16-bit wire words

use super::command::Command;
use super::layout::BitLayout;
use crate::bitwise::{place_u16, take_u16};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid bit layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid bit layout syntax {0:?}, expected id/command/payload widths like 4/4/8")]
    InvalidLayoutSyntax(String),

    #[error("{field} value {value:#x} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u16,
        bits: u8,
    },
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Logical message exchanged with the peer modem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Unit identifier
    pub id: u8,
    pub command: Command,
    pub payload: u16,
}

impl Message {
    pub fn new(id: u8, command: Command, payload: u16) -> Self {
        Self {
            id,
            command,
            payload,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} command={} payload={}",
            self.id, self.command, self.payload
        )
    }
}

/// Packed 16-bit encoding of a [`Message`], transmitted high byte first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireWord(pub u16);

impl WireWord {
    pub fn value(self) -> u16 {
        self.0
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Render as `0b` followed by all 16 bits, MSB first
    pub fn to_binary_string(self) -> String {
        format!("{:#018b}", self.0)
    }
}

impl From<u16> for WireWord {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<WireWord> for u16 {
    fn from(word: WireWord) -> Self {
        word.0
    }
}

impl fmt::Display for WireWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

impl fmt::Binary for WireWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

/// Stateless encoder/decoder bound to one [`BitLayout`]
///
/// `encode` silently truncates each field to its width, matching what the
/// modem firmware does. Use [`Codec::encode_checked`] to reject values that
/// would lose bits instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    layout: BitLayout,
}

impl Codec {
    pub fn new(layout: BitLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> BitLayout {
        self.layout
    }

    /// Pack the fields into a wire word, masking each to its width
    pub fn encode(&self, id: u8, command: Command, payload: u16) -> WireWord {
        let l = &self.layout;
        let word = place_u16(id as u16, l.id_shift(), l.id_bits())
            | place_u16(command.code() as u16, l.command_shift(), l.command_bits())
            | place_u16(payload, 0, l.payload_bits());
        WireWord(word)
    }

    pub fn encode_message(&self, message: &Message) -> WireWord {
        self.encode(message.id, message.command, message.payload)
    }

    /// Like [`Codec::encode_message`] but fails when a field exceeds its width
    pub fn encode_checked(&self, message: &Message) -> Result<WireWord> {
        let l = &self.layout;
        check_field("id", message.id as u16, l.id_bits(), l.id_mask())?;
        check_field(
            "command",
            message.command.code() as u16,
            l.command_bits(),
            l.command_mask(),
        )?;
        check_field("payload", message.payload, l.payload_bits(), l.payload_mask())?;
        Ok(self.encode_message(message))
    }

    /// Unpack a wire word
    pub fn decode(&self, word: WireWord) -> Message {
        let l = &self.layout;
        let w = word.value();
        Message {
            id: take_u16(w, l.id_shift(), l.id_bits()) as u8,
            command: Command::from_code(take_u16(w, l.command_shift(), l.command_bits()) as u8),
            payload: take_u16(w, 0, l.payload_bits()),
        }
    }

    /// Unpack two received bytes, high byte first
    pub fn decode_bytes(&self, bytes: [u8; 2]) -> Message {
        self.decode(WireWord::from_be_bytes(bytes))
    }
}

fn check_field(field: &'static str, value: u16, bits: u8, mask: u16) -> Result<()> {
    if value & !mask != 0 {
        return Err(CodecError::FieldOverflow { field, value, bits });
    }
    Ok(())
}
